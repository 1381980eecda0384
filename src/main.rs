use snapsort::cli::Args;
use snapsort::controller::Sorter;
use snapsort::domain::Direction;
use snapsort::error::SortError;
use snapsort::hotkeys::BindOutcome;
use snapsort::tui::{
    self, handle_capture_input, handle_confirm_input, handle_key_event, handle_text_input,
    render, CaptureAction, ConfirmAction, KeyAction, TextAction, UiState, ViewState,
};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::{
    io,
    time::{Duration, Instant},
};

/// Poll timeout used when no timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

fn main() -> io::Result<()> {
    let args = Args::parse();
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let mut sorter = match Sorter::new(args.directory, args.settings) {
        Ok(sorter) => sorter,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut sorter);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = sorter.shutdown() {
        eprintln!("Warning: failed to save settings: {}", e);
    }
    result
}

/// Main application loop: draw, wait for input or the next timer
/// deadline, route events, then fire due timers.
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    sorter: &mut Sorter,
) -> io::Result<()> {
    let mut ui = UiState::new();

    let size = terminal.size()?;
    let (vw, vh) = tui::image_viewport(Rect::new(0, 0, size.width, size.height));
    sorter.viewport_resized(vw, vh, Instant::now());

    loop {
        terminal.draw(|frame| render(frame, sorter, &ui))?;

        let now = Instant::now();
        let timeout = sorter
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(sorter, &mut ui, key)? {
                        break;
                    }
                }
                Event::Resize(width, height) => {
                    let (vw, vh) = tui::image_viewport(Rect::new(0, 0, width, height));
                    sorter.viewport_resized(vw, vh, Instant::now());
                }
                _ => {}
            }
        }

        let now = Instant::now();
        for id in sorter.take_due(now) {
            sorter.on_timer(id, now);
        }
    }

    Ok(())
}

/// Routes a key press through the active view. Returns `true` to quit.
fn handle_key(sorter: &mut Sorter, ui: &mut UiState, key: KeyEvent) -> io::Result<bool> {
    let now = Instant::now();
    let view = ui.view.clone();

    match view {
        ViewState::Help => {
            // Any key closes help
            ui.view = ViewState::Browsing;
        }

        ViewState::KeyCapture => match handle_capture_input(key) {
            CaptureAction::Bind(token) => {
                if let Some(folder) = selected_folder(sorter, ui) {
                    match sorter.bind(&folder, token.clone()).map_err(io::Error::other)? {
                        BindOutcome::Bound => ui.view = ViewState::Browsing,
                        BindOutcome::Conflict { holder } => {
                            ui.view = ViewState::ConfirmRebind { key: token, holder };
                        }
                    }
                } else {
                    ui.view = ViewState::Browsing;
                }
            }
            CaptureAction::Reserved(token) => {
                sorter.set_status(format!("[{}] is reserved and cannot be bound", token));
            }
            CaptureAction::Cancel => ui.view = ViewState::Browsing,
            CaptureAction::None => {}
        },

        ViewState::ConfirmRebind { key: token, .. } => match handle_confirm_input(key) {
            ConfirmAction::Confirm => {
                if let Some(folder) = selected_folder(sorter, ui) {
                    sorter.rebind(&folder, token).map_err(io::Error::other)?;
                }
                ui.view = ViewState::Browsing;
            }
            ConfirmAction::Cancel => ui.view = ViewState::Browsing,
            ConfirmAction::None => {}
        },

        ViewState::NewFolder { input } => match handle_text_input(key) {
            TextAction::Submit => {
                let result = sorter.add_folder(&input);
                report(sorter, result)?;
                ui.clamp_selection(sorter.folders().len());
                ui.view = ViewState::Browsing;
            }
            TextAction::Cancel => ui.view = ViewState::Browsing,
            TextAction::Backspace => {
                if let ViewState::NewFolder { input } = &mut ui.view {
                    input.pop();
                }
            }
            TextAction::Insert(c) => {
                if let ViewState::NewFolder { input } = &mut ui.view {
                    input.push(c);
                }
            }
            TextAction::None => {}
        },

        ViewState::RenameFolder { input } => match handle_text_input(key) {
            TextAction::Submit => {
                if let Some(folder) = selected_folder(sorter, ui) {
                    let result = sorter.rename_folder(&folder, &input);
                    report(sorter, result)?;
                }
                ui.view = ViewState::Browsing;
            }
            TextAction::Cancel => ui.view = ViewState::Browsing,
            TextAction::Backspace => {
                if let ViewState::RenameFolder { input } = &mut ui.view {
                    input.pop();
                }
            }
            TextAction::Insert(c) => {
                if let ViewState::RenameFolder { input } = &mut ui.view {
                    input.push(c);
                }
            }
            TextAction::None => {}
        },

        ViewState::ConfirmDelete => match handle_confirm_input(key) {
            ConfirmAction::Confirm => {
                if let Some(folder) = selected_folder(sorter, ui) {
                    let result = sorter.delete_folder(&folder);
                    report(sorter, result)?;
                }
                ui.clamp_selection(sorter.folders().len());
                ui.view = ViewState::Browsing;
            }
            ConfirmAction::Cancel => ui.view = ViewState::Browsing,
            ConfirmAction::None => {}
        },

        ViewState::Browsing => match handle_key_event(key) {
            KeyAction::Quit => return Ok(true),
            KeyAction::NextImage => {
                sorter
                    .navigate(Direction::Forward, now)
                    .map_err(io::Error::other)?;
            }
            KeyAction::PrevImage => {
                sorter
                    .navigate(Direction::Back, now)
                    .map_err(io::Error::other)?;
            }
            KeyAction::Undo => sorter.undo(now).map_err(io::Error::other)?,
            KeyAction::Help => ui.view = ViewState::Help,
            KeyAction::SelectPrev => ui.select_prev(),
            KeyAction::SelectNext => ui.select_next(sorter.folders().len()),
            KeyAction::ClassifySelected => {
                sorter.classify(ui.selected, now).map_err(io::Error::other)?;
            }
            KeyAction::BeginCapture => {
                if selected_folder(sorter, ui).is_some() {
                    ui.view = ViewState::KeyCapture;
                }
            }
            KeyAction::AddFolder => {
                ui.view = ViewState::NewFolder {
                    input: String::new(),
                };
            }
            KeyAction::RenameFolder => {
                if let Some(folder) = selected_folder(sorter, ui) {
                    ui.view = ViewState::RenameFolder { input: folder };
                }
            }
            KeyAction::DeleteFolder => {
                if selected_folder(sorter, ui).is_some() {
                    ui.view = ViewState::ConfirmDelete;
                }
            }
            KeyAction::Hotkey(token) => {
                sorter
                    .classify_by_key(&token, now)
                    .map_err(io::Error::other)?;
            }
            KeyAction::None => {}
        },
    }

    Ok(false)
}

fn selected_folder(sorter: &Sorter, ui: &UiState) -> Option<String> {
    sorter.folders().get(ui.selected).cloned()
}

/// Surfaces refused folder operations on the status line; anything
/// else is an unexpected I/O failure and aborts.
fn report(sorter: &mut Sorter, result: snapsort::Result<()>) -> io::Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(
            e @ (SortError::FolderExists(_)
            | SortError::UnknownFolder(_)
            | SortError::LastFolder
            | SortError::Config(_)),
        ) => {
            sorter.set_status(e.to_string());
            Ok(())
        }
        Err(e) => Err(io::Error::other(e)),
    }
}
