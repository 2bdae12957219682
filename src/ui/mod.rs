pub mod components;
pub mod theme;

use crate::app::{AppState, event::handle_key_event};
use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use todo_store::import::PostsLoaded;
use todo_store::store::Action;
use tokio::sync::mpsc;
use tracing::info;

const TICK_RATE: Duration = Duration::from_millis(250);

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = disable_raw_mode();
        let _ = execute!(stdout, LeaveAlternateScreen);
        let _ = stdout.flush();
    }
}

/// Receivers the UI loop drains alongside terminal input.
pub struct Channels {
    pub results: mpsc::UnboundedReceiver<Action>,
    pub posts: mpsc::UnboundedReceiver<PostsLoaded>,
}

pub async fn run_tui(mut state: AppState, mut channels: Channels) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    state.reload();
    let result = run_app(&mut terminal, &mut state, &mut channels).await;
    state.shutdown();
    terminal.show_cursor()?;
    info!("TUI closed");

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    channels: &mut Channels,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK_RATE);

    loop {
        terminal.draw(|f| {
            components::render(f, state);
        })?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    handle_key_event(key, state)?;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(action) = channels.results.recv() => state.apply_result(action),
            Some(loaded) = channels.posts.recv() => state.apply_posts(loaded),
            _ = tick.tick() => state.tick(Instant::now()),
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
