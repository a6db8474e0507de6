mod clipboard;
mod help;
mod state;
mod view;

use crate::cli::{AppContext, Cli};
use crate::orchestrator::{self, FormEvent, UiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use state::{Row, UiState};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub async fn run(args: Cli, ctx: AppContext) -> Result<()> {
    // Unbounded channels keep the UI thread from ever waiting on the runtime.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<FormEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let AppContext { user, host, api } = ctx;
    let mut state = UiState::new(user, args.api_base_url.clone());
    state.prefill(args.field_inputs()?, &args.images);

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(state, event_rx, cmd_tx));

    orchestrator::run_controller(host, api, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }
    Ok(())
}

/// What the loop should do after a key press.
enum Flow {
    Continue,
    Quit,
}

/// Run the TUI loop on a dedicated thread. The form state lives here and nowhere else.
fn run_threaded(
    mut state: UiState,
    mut event_rx: UnboundedReceiver<FormEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        // Drain job completions without blocking to keep the UI responsive.
        while let Ok(ev) = event_rx.try_recv() {
            state.apply_event(ev);
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| view::draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if let Flow::Quit = handle_key(&mut state, &cmd_tx, k) {
                    let _ = cmd_tx.send(UiCommand::Quit);
                    break Ok(());
                }
                // Redraw right away so typing feels immediate.
                terminal.draw(|f| view::draw(f.area(), f, &state)).ok();
                last_tick = Instant::now();
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn handle_key(state: &mut UiState, cmd_tx: &UnboundedSender<UiCommand>, k: KeyEvent) -> Flow {
    match (k.modifiers, k.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => return Flow::Quit,
        (_, KeyCode::F(1)) => {
            state.show_help = !state.show_help;
            return Flow::Continue;
        }
        _ => {}
    }

    if state.form.navigated().is_some() {
        match k.code {
            KeyCode::Char('y') => {
                if let Some(url) = state.listing_url() {
                    state.info = match clipboard::copy_to_clipboard(&url) {
                        Ok(()) => format!("✓ Copied to clipboard: {url}"),
                        Err(e) => format!("Clipboard copy failed: {e:#}"),
                    };
                }
            }
            KeyCode::Enter | KeyCode::Char('q') => return Flow::Quit,
            _ => {}
        }
        return Flow::Continue;
    }

    state.info.clear();
    match k.code {
        KeyCode::Tab | KeyCode::Down => state.focus_next(),
        KeyCode::BackTab | KeyCode::Up => state.focus_prev(),
        KeyCode::Left if state.focused() == Row::Images => state.select_image(-1),
        KeyCode::Right if state.focused() == Row::Images => state.select_image(1),
        KeyCode::Delete | KeyCode::Char('d') if state.focused() == Row::Images => {
            state.remove_selected_image();
        }
        KeyCode::Backspace => state.backspace(),
        KeyCode::Enter => match state.focused() {
            Row::Files => {
                if let Some(paths) = state.request_upload() {
                    let _ = cmd_tx.send(UiCommand::Upload(paths));
                }
            }
            Row::Submit => {
                if let Some(req) = state.request_submit() {
                    let _ = cmd_tx.send(UiCommand::Submit(Box::new(req)));
                }
            }
            Row::Field(f) if f.is_checkbox() => state.toggle(),
            _ => state.focus_next(),
        },
        KeyCode::Char(' ') if matches!(state.focused(), Row::Field(f) if f.is_checkbox()) => {
            state.toggle();
        }
        KeyCode::Char(c) => {
            state.type_char(c);
        }
        _ => {}
    }
    Flow::Continue
}
