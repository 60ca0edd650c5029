use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod app;
mod bible;
mod config;
mod db;
mod error;
mod models;
mod plan;
mod services;
mod stats;
mod store;
mod tui;

use app::App;
use config::Config;
use error::{AppError, Result};
use tui::{draw, handle_key_event};

#[derive(Debug, Default)]
struct Args {
    date: Option<NaiveDate>,
    stats: bool,
    toggle: bool,
    reset_guest: bool,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--date" => {
                let raw = iter
                    .next()
                    .ok_or_else(|| AppError::InvalidDate("--date needs a value".to_string()))?;
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|e| AppError::InvalidDate(format!("{raw}: {e}")))?;
                parsed.date = Some(date);
            }
            "--stats" => parsed.stats = true,
            "--toggle" => parsed.toggle = true,
            "--reset-guest" => parsed.reset_guest = true,
            other => tracing::warn!("Ignoring unknown argument {}", other),
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let args = parse_args(&args)?;

    let config = Config::load()?;

    // Clear this device's guest progress and exit
    if args.reset_guest {
        db::LocalStorage::new(&config.db_path)
            .await?
            .remove_item(store::GUEST_PROGRESS_KEY)
            .await?;
        println!("Cleared guest progress");
        return Ok(());
    }

    let mut app = App::new(&config, args.date).await?;

    if args.toggle {
        match app.toggle_current().await {
            Some(_) => println!("{}", app.status_message.as_deref().unwrap_or_default()),
            None => println!("No plan for {}", app.selected_date),
        }
        return Ok(());
    }

    if args.stats {
        app.wait_for_videos().await;
        print_summary(&app);
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn print_summary(app: &App) {
    println!("{}", app.selected_date.format("%Y-%m-%d"));

    match &app.current_plan {
        Some(plan) => {
            let mark = if app.is_completed() { "✓" } else { "○" };
            println!("{mark} Plan Day {}: {}", plan.entry.day_of_year, plan.entry.title);
            println!("  [{}]", plan.category);
            for line in textwrap::wrap(&plan.summary, 70) {
                println!("  {line}");
            }
            println!("  ⏳ {}", plan.reading_time);
            if let Some(video) = &plan.video {
                println!("  ▶ {} {}", video.title, video.watch_url());
            }
        }
        None => println!("표시할 말씀이 없습니다."),
    }

    println!();
    println!("연속읽기: {}일", app.stats.streak);
    println!("전체 진행상황: {}%", app.stats.progress_percent);
    println!("D-{} Left", app.stats.days_left);
    if app.is_guest() {
        println!("(게스트 모드)");
    }
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Advance spinner animation
        app.tick_spinner();

        // Poll for the playlist fetch
        app.poll_video_result();

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) =
                        handle_key_event(key, app.show_help, app.book_detail_open, app.map_expanded)
                    {
                        let should_quit = app.handle_action(action).await?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
