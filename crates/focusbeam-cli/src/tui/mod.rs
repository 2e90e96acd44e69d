//! Interactive timer screen.
//!
//! The screen is a thin host: it renders [`Snapshot`]s published by the
//! countdown driver and maps key presses to [`Intent`]s.

mod view;

use std::io::{self, IsTerminal};
use std::thread;

use crossterm::{
    cursor,
    event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use focusbeam_core::{Config, Intent, SessionType, Snapshot, Step, TimerDriver, TimerHandle};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Send(Intent),
    Quit,
}

pub async fn run(initial: Option<SessionType>) -> Result<(), Box<dyn std::error::Error>> {
    if !io::stdin().is_terminal() {
        return Err("stdin must be a tty; use `focusbeam timer` for headless runs".into());
    }

    let config = Config::load_or_default();
    let mut timer = config.session_timer();
    if let Some(session) = initial {
        timer.select_type(session);
    }
    let handle = TimerDriver::spawn(timer);

    let result = run_screen(&handle).await;

    let timer = handle.shutdown().await?;
    let stats = timer.stats();
    tracing::info!(
        completed_focus_blocks = stats.completed_focus_blocks,
        total_focus_minutes = stats.total_focus_minutes,
        "session ended"
    );
    result
}

async fn run_screen(handle: &TimerHandle) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard::new(restore_terminal);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    event_loop(&mut terminal, handle).await
}

/// Puts the terminal back when dropped, whichever way the screen exits.
struct TerminalGuard {
    restore: fn() -> io::Result<()>,
}

impl TerminalGuard {
    fn new(restore: fn() -> io::Result<()>) -> Self {
        Self { restore }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = (self.restore)() {
            tracing::error!(error = %e, "failed to restore terminal");
        }
    }
}

fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen, cursor::Show)?;
    raw
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    handle: &TimerHandle,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal_events = spawn_terminal_events();
    let mut snapshots = handle.snapshots();

    loop {
        let snap = snapshots.borrow_and_update().clone();
        terminal.draw(|f| view::render(f, &snap))?;

        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            evt = terminal_events.recv() => {
                let Some(evt) = evt else { break };
                // Anything else (resize, focus) just falls through to a redraw.
                if let TermEvent::Key(key) = evt {
                    match map_key(key, &snap) {
                        Some(Action::Send(intent)) => handle.send(intent).await?,
                        Some(Action::Quit) => break,
                        None => {}
                    }
                }
            }
        }
    }
    Ok(())
}

/// Blocking crossterm reads on a plain thread, forwarded into the runtime.
fn spawn_terminal_events() -> mpsc::Receiver<TermEvent> {
    let (tx, rx) = mpsc::channel(16);
    thread::spawn(move || loop {
        let evt = match event::read() {
            Ok(evt) => evt,
            Err(e) => {
                tracing::error!(error = %e, "terminal event read failed");
                break;
            }
        };
        if tx.blocking_send(evt).is_err() {
            break;
        }
    });
    rx
}

fn map_key(key: KeyEvent, snap: &Snapshot) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    let current = snap.current_type;
    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char(' ') | KeyCode::Enter => Action::Send(Intent::Toggle),
        KeyCode::Char('r') => Action::Send(Intent::Reset),
        KeyCode::Char('1') => Action::Send(Intent::SelectType(SessionType::Focus)),
        KeyCode::Char('2') => Action::Send(Intent::SelectType(SessionType::ShortBreak)),
        KeyCode::Char('3') => Action::Send(Intent::SelectType(SessionType::LongBreak)),
        KeyCode::Tab => Action::Send(Intent::SelectType(current.next())),
        // Duration controls are disabled while running.
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up if !snap.is_running => {
            Action::Send(Intent::StepDuration(current, Step::Up))
        }
        KeyCode::Char('-') | KeyCode::Down if !snap.is_running => {
            Action::Send(Intent::StepDuration(current, Step::Down))
        }
        _ => return None,
    };
    Some(action)
}
