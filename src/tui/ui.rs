use chrono::Datelike;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::bible::{book_progress, chapter_read};
use crate::models::VideoStatus;
use crate::services::youtube::parse_duration_to_minutes;

const ACCENT: Color = Color::Rgb(78, 86, 209);
const TEAL: Color = Color::Rgb(61, 170, 156);

pub fn draw(frame: &mut Frame, app: &App) {
    let map_height = if app.map_expanded {
        Constraint::Min(8)
    } else {
        Constraint::Length(3)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(3),  // Streak + progress
            Constraint::Min(12),    // Plan card + video
            map_height,             // Progress map
            Constraint::Length(1),  // Status line
        ])
        .split(frame.area());

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(chunks[2]);

    render_header(frame, app, chunks[0]);
    render_stats(frame, app, chunks[1]);
    render_plan_card(frame, app, middle[0]);
    render_video(frame, app, middle[1]);
    render_progress_map(frame, app, chunks[3]);
    render_status(frame, app, chunks[4]);

    if app.book_detail_open {
        render_book_detail(frame, app);
    }

    if app.show_help {
        render_help(frame);
    }
}

fn weekday_label(weekday: chrono::Weekday) -> &'static str {
    match weekday {
        chrono::Weekday::Mon => "월",
        chrono::Weekday::Tue => "화",
        chrono::Weekday::Wed => "수",
        chrono::Weekday::Thu => "목",
        chrono::Weekday::Fri => "금",
        chrono::Weekday::Sat => "토",
        chrono::Weekday::Sun => "일",
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let who = match &app.user {
        Some(user) => user.email.clone().unwrap_or_else(|| user.id.clone()),
        None => "게스트".to_string(),
    };
    let today_marker = if app.selected_date == app.today { " · 오늘" } else { "" };

    let block = Block::default()
        .title(" 성경 365 ")
        .title(Line::from(format!(" {who} ")).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = Line::from(vec![
        Span::styled("◀ h  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!(
                "{} ({}){}",
                app.selected_date.format("%Y-%m-%d"),
                weekday_label(app.selected_date.weekday()),
                today_marker
            ),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  l ▶", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("    D-{} Left", app.stats.days_left),
            Style::default().fg(ACCENT),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
        .split(area);

    let streak = Paragraph::new(format!("🔥 {}일", app.stats.streak)).block(
        Block::default()
            .title(" 연속읽기 ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(streak, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" 전체 진행상황 ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(TEAL)),
        )
        .gauge_style(Style::default().fg(TEAL))
        .percent(app.stats.progress_percent.min(100) as u16)
        .label(format!("{}%", app.stats.progress_percent));
    frame.render_widget(gauge, chunks[1]);
}

fn render_plan_card(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Today's Plan ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let Some(plan) = &app.current_plan else {
        let empty = Paragraph::new("\n표시할 말씀이 없습니다.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let completed = app.is_completed();
    let title_style = if completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    let keyword_style = if completed {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(ACCENT)
    };

    let keywords: Vec<Span> = plan
        .keywords()
        .map(|tag| Span::styled(format!("{tag} "), keyword_style))
        .collect();

    let button = if completed {
        Span::styled(
            " ✓ 기록 완료 ",
            Style::default().bg(TEAL).fg(Color::White),
        )
    } else {
        Span::styled(
            " ○ 성경 읽기 완료 (space) ",
            Style::default().bg(ACCENT).fg(Color::White),
        )
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("Plan Day {}", plan.entry.day_of_year),
            Style::default().fg(ACCENT),
        )),
        Line::from(""),
        Line::from(Span::styled(plan.entry.title.clone(), title_style)),
        Line::from(""),
        Line::from(Span::styled(
            format!("[{}]", plan.category),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            plan.headline().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(keywords),
        Line::from(Span::styled(
            format!("⏳ {}", plan.reading_time),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(button),
    ];

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_video(frame: &mut Frame, app: &App, area: Rect) {
    let day = app.selected_day_of_year();
    let block = Block::default()
        .title(" 오늘의 성경 읽기 ")
        .title(Line::from(format!(" {day}일차 ")).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let video = app.current_plan.as_ref().and_then(|p| p.video.as_ref());

    let mut lines: Vec<Line> = match (app.video_status, video) {
        (VideoStatus::Loading, _) => vec![Line::from(format!(
            "{} 오늘의 성경 읽기 영상을 불러오는 중...",
            app.spinner()
        ))],
        _ if app.is_no_video_day() => {
            vec![Line::from(format!("{day}일차는 영상이 제공되지 않습니다."))]
        }
        (VideoStatus::NoApiKey, _) => vec![
            Line::from("영상을 찾을 수 없습니다"),
            Line::from(Span::styled(
                "config.toml에 youtube_api_key 설정이 필요합니다.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        (VideoStatus::Failed, _) | (VideoStatus::Loaded, None) => vec![
            Line::from("영상을 찾을 수 없습니다"),
            Line::from(Span::styled(
                "해당 날짜의 영상이 재생목록에 없거나 API 키 설정이 필요합니다.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        (VideoStatus::Loaded, Some(video)) => {
            let mut lines = vec![Line::from(Span::styled(
                video.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            if let Some(duration) = &video.duration {
                lines.push(Line::from(Span::styled(
                    format!("소요시간 약 {}분", parse_duration_to_minutes(duration)),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines.push(Line::from(Span::styled(
                video.watch_url(),
                Style::default().fg(Color::Blue),
            )));
            lines.push(Line::from("o: 영상 열기"));
            lines
        }
    };

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "YouTube Guide",
        Style::default().fg(TEAL).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from("p: NEW 365 성경 읽기 영상(재생목록)"));
    lines.push(Line::from("i: 소개 영상"));
    lines.push(Line::from("O: 구약 개관   N: 신약 개관 (공동체성경읽기)"));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_progress_map(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.map_expanded {
        format!(" 성경 읽기표 [{}] ", app.map_filter.label())
    } else {
        " 성경 읽기표 ".to_string()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightRed));

    if !app.map_expanded {
        let paragraph = Paragraph::new("m: 전체 목록 펼치기")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .visible_books()
        .iter()
        .map(|book| {
            let progress = book_progress(book, &app.stats.completed_verses);
            let filled = (progress / 10.0).round() as usize;
            let bar = format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled));
            let style = if progress >= 100.0 {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else if progress > 0.0 {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<10}", book.name), style),
                Span::styled(bar, Style::default().fg(ACCENT)),
                Span::styled(format!(" {:>3}%", progress.round() as u32), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.map_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let hints = "h/l:날짜  t:오늘  space:완료  m:읽기표  f:필터  ?:도움말  q:종료";
    let text = match &app.status_message {
        Some(message) => format!("{message}  |  {hints}"),
        None => hints.to_string(),
    };

    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_book_detail(frame: &mut Frame, app: &App) {
    let Some(book) = app.selected_book() else {
        return;
    };
    let area = centered_rect(60, 60, frame.area());
    let progress = book_progress(book, &app.stats.completed_verses);

    let block = Block::default()
        .title(format!(" {} ({}%) ", book.name, progress.round() as u32))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let cells: Vec<Span> = (1..=book.chapters)
        .map(|ch| {
            let style = if chapter_read(book, ch, &app.stats.completed_verses) {
                Style::default().bg(ACCENT).fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!("{ch:>4} "), style)
        })
        .collect();

    let lines: Vec<Line> = cells
        .chunks(10)
        .map(|row| Line::from(row.to_vec()))
        .collect();

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 70, frame.area());

    let help_text = vec![
        "",
        " Navigation:",
        "   h / ←    Previous day",
        "   l / →    Next day",
        "   t        Today",
        "",
        " Reading:",
        "   space    Mark today's reading complete / undo",
        "   o        Open today's video",
        "   p        Open NEW 365 playlist",
        "   i        Open intro video",
        "   O / N    Open OT / NT overview",
        "",
        " Progress map:",
        "   m        Expand / collapse",
        "   f        Cycle filter (전체/구약/신약)",
        "   j / k    Move selection",
        "   Enter    Show chapters",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
