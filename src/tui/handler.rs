use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    PrevDay,
    NextDay,
    GoToToday,
    ToggleComplete,
    OpenVideo,
    OpenPlaylist,
    OpenIntro,
    OpenOtOverview,
    OpenNtOverview,
    // Progress map actions
    ToggleMap,
    CycleMapFilter,
    MapUp,
    MapDown,
    OpenBookDetail,
    CloseBookDetail,
    ShowHelp,
    HideHelp,
}

pub fn handle_key_event(
    key: KeyEvent,
    show_help: bool,
    book_detail_open: bool,
    map_expanded: bool,
) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    if book_detail_open {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(AppAction::CloseBookDetail),
            _ => None,
        };
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(AppAction::PrevDay),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Some(AppAction::NextDay),
        (KeyCode::Char('t'), _) => Some(AppAction::GoToToday),

        (KeyCode::Char(' '), _) => Some(AppAction::ToggleComplete),
        (KeyCode::Enter, _) if map_expanded => Some(AppAction::OpenBookDetail),
        (KeyCode::Enter, _) => Some(AppAction::ToggleComplete),

        (KeyCode::Char('o'), _) => Some(AppAction::OpenVideo),
        (KeyCode::Char('p'), _) => Some(AppAction::OpenPlaylist),
        (KeyCode::Char('i'), _) => Some(AppAction::OpenIntro),
        (KeyCode::Char('O'), _) => Some(AppAction::OpenOtOverview),
        (KeyCode::Char('N'), _) => Some(AppAction::OpenNtOverview),

        (KeyCode::Char('m'), _) => Some(AppAction::ToggleMap),
        (KeyCode::Char('f'), _) => Some(AppAction::CycleMapFilter),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MapUp),
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MapDown),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}
