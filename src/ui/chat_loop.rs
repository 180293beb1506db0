use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{
            self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
            KeyModifiers, MouseEventKind,
        },
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use tokio::sync::mpsc;

use crate::api::client::{fetch_models, send_chat};
use crate::api::ModelEntry;
use crate::auth::CredentialStore;
use crate::commands::{process_input, CommandResult};
use crate::core::app::{App, ChatJob, Focus};
use crate::core::config::Config;
use crate::ui::renderer::{ui, MODEL_PANEL_WIDTH};
use crate::ui::scroll::ScrollCalculator;
use crate::ui::transcript::build_transcript_lines;

/// Completions posted back to the UI loop by spawned gateway tasks.
enum AppEvent {
    CatalogLoaded {
        api_key: String,
        result: Result<Vec<ModelEntry>, String>,
    },
    ChatCompleted {
        dispatch_id: i64,
        result: Result<HashMap<String, String>, String>,
    },
}

pub async fn run_chat(config: Config, endpoint: String) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(config, endpoint, CredentialStore::new());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    // A stored credential loads the catalog without waiting for input.
    if app.wants_startup_catalog_load() {
        if let Some(job) = app.submit_credential() {
            spawn_catalog_load(tx.clone(), &app, job.api_key);
        }
    }

    let result = loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        break Ok(());
                    }

                    // A notice blocks everything else; the next keypress
                    // dismisses it.
                    if app.notice.is_some() {
                        app.notice = None;
                        continue;
                    }

                    if app.settings_open {
                        handle_settings_key(&mut app, key.code, &tx);
                        continue;
                    }

                    match key.code {
                        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            app.new_chat();
                        }
                        KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            app.open_settings();
                        }
                        KeyCode::Tab => {
                            app.focus = match app.focus {
                                Focus::Input => Focus::Models,
                                Focus::Models => Focus::Input,
                            };
                        }
                        _ => match app.focus {
                            Focus::Input => {
                                handle_input_key(&mut app, key.code, &tx, &terminal)
                            }
                            Focus::Models => handle_models_key(&mut app, key.code),
                        },
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => scroll_transcript(&mut app, &terminal, -3),
                    MouseEventKind::ScrollDown => scroll_transcript(&mut app, &terminal, 3),
                    _ => {}
                },
                _ => {}
            }
        }

        // Drain gateway completions posted while we were polling.
        while let Ok(event) = rx.try_recv() {
            match event {
                AppEvent::CatalogLoaded { api_key, result } => {
                    app.on_catalog_loaded(api_key, result);
                }
                AppEvent::ChatCompleted {
                    dispatch_id,
                    result,
                } => {
                    app.on_chat_complete(dispatch_id, result);
                }
            }
        }
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn handle_settings_key(
    app: &mut App,
    code: KeyCode,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match code {
        KeyCode::Enter => {
            if let Some(job) = app.submit_credential() {
                spawn_catalog_load(tx.clone(), app, job.api_key);
            }
        }
        KeyCode::Esc => app.close_settings(),
        KeyCode::Char(c) => app.settings_input.push(c),
        KeyCode::Backspace => {
            app.settings_input.pop();
        }
        _ => {}
    }
}

fn handle_input_key(
    app: &mut App,
    code: KeyCode,
    tx: &mpsc::UnboundedSender<AppEvent>,
    terminal: &Terminal<CrosstermBackend<io::Stdout>>,
) {
    match code {
        KeyCode::Enter => {
            let input = app.input.clone();
            match process_input(app, &input) {
                CommandResult::Continue => app.input.clear(),
                CommandResult::ProcessAsMessage(_) => {
                    if let Some(job) = app.send_message() {
                        spawn_chat_dispatch(tx.clone(), app, job);
                    }
                }
            }
        }
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Left => app.workspace.cycle_tab(false),
        KeyCode::Right => app.workspace.cycle_tab(true),
        KeyCode::Up => scroll_transcript(app, terminal, -1),
        KeyCode::Down => scroll_transcript(app, terminal, 1),
        _ => {}
    }
}

fn handle_models_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.toggle_model_under_cursor(),
        KeyCode::Up => app.catalog_cursor_up(),
        KeyCode::Down => app.catalog_cursor_down(),
        KeyCode::Esc => {
            app.filter.clear();
            app.clamp_catalog_cursor();
        }
        KeyCode::Char(c) => {
            app.filter.push(c);
            app.clamp_catalog_cursor();
        }
        KeyCode::Backspace => {
            app.filter.pop();
            app.clamp_catalog_cursor();
        }
        _ => {}
    }
}

/// Manual scrolling turns auto-scroll off; reaching the bottom again turns
/// it back on.
fn scroll_transcript(
    app: &mut App,
    terminal: &Terminal<CrosstermBackend<io::Stdout>>,
    delta: i32,
) {
    let size = terminal.size().unwrap_or_default();
    let transcript_width = size.width.saturating_sub(MODEL_PANEL_WIDTH);
    // Tab bar, chips and input rows plus the transcript title.
    let available_height = size.height.saturating_sub(5).saturating_sub(1);

    let lines = build_transcript_lines(&app.workspace, &app.catalog, app.pending_dispatch.is_some());
    let max_offset =
        ScrollCalculator::scroll_to_bottom(&lines, transcript_width, available_height);

    let current = if app.auto_scroll {
        max_offset
    } else {
        app.scroll_offset.min(max_offset)
    };
    let next = current.saturating_add_signed(delta as i16).min(max_offset);

    app.scroll_offset = next;
    app.auto_scroll = next >= max_offset;
}

fn spawn_catalog_load(tx: mpsc::UnboundedSender<AppEvent>, app: &App, api_key: String) {
    let client = app.client.clone();
    let endpoint = app.endpoint.clone();
    tokio::spawn(async move {
        let result = fetch_models(&client, &endpoint, &api_key)
            .await
            .map(|r| r.models)
            .map_err(|e| e.to_string());
        let _ = tx.send(AppEvent::CatalogLoaded { api_key, result });
    });
}

fn spawn_chat_dispatch(tx: mpsc::UnboundedSender<AppEvent>, app: &App, job: ChatJob) {
    let client = app.client.clone();
    let endpoint = app.endpoint.clone();
    let ChatJob {
        dispatch_id,
        api_key,
        targets,
        messages,
    } = job;
    tokio::spawn(async move {
        let result = send_chat(&client, &endpoint, &api_key, targets, messages)
            .await
            .map(|r| r.responses)
            .map_err(|e| e.to_string());
        let _ = tx.send(AppEvent::ChatCompleted {
            dispatch_id,
            result,
        });
    });
}
