//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! Toggle timers run as spawned tokio tasks. When a ticket's latency elapses
//! (or the ticket is cancelled) the task sends a `UiEvent` to `inbox_tx`, and
//! the runtime drains `inbox_rx` each frame. The runtime also subscribes to
//! the tree's published sequence and redraws as soon as it changes.

mod inbox;

use std::future::Future;
use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use lazytree_core::{ToggleTicket, VisibleNode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick cadence while a toggle is loading or the user is interacting.
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll duration when idle (nothing loading, no recent input).
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Runs the event loop and executes effects.
/// Terminal state is restored on drop and on panic.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    /// Inbox sender - spawned toggle timers send events here.
    inbox_tx: UiEventSender,
    /// Inbox receiver - runtime drains this each frame.
    inbox_rx: UiEventReceiver,
    /// Published visible sequence; a change schedules a redraw.
    tree_rx: watch::Receiver<Vec<VisibleNode>>,
    /// Last time a Tick event was emitted.
    last_tick: Instant,
    /// Last time a terminal event was received (for fast tick during interaction).
    last_terminal_event: Instant,
}

impl TuiRuntime {
    /// Creates a new TUI runtime and takes over the terminal.
    pub fn new(state: AppState) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let tree_rx = state.tree.subscribe();

        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            inbox_tx,
            inbox_rx,
            tree_rx,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs the main event loop until the user quits.
    pub fn run(&mut self) -> Result<()> {
        debug!(visible = self.state.tree.len(), "tree view started");
        let result = self.event_loop();
        debug!(pending = self.state.tree.pending_count(), "tree view stopped");
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true; // Start dirty to ensure initial render

        while !self.state.should_quit {
            let mut events = self.collect_events()?;

            // Frame goes first so the viewport is current before key handling.
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                // Only Tick triggers render; everything else batches to it.
                if matches!(&event, UiEvent::Tick) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            // Splices and loading flags show up without waiting for a Tick.
            if take_tree_change(&mut self.tree_rx) {
                dirty = true;
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects events from the inbox and the terminal, then a Tick if due.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let recent_terminal_activity = self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let needs_fast_poll = self.state.tree.pending_count() > 0 || recent_terminal_activity;
        let tick_interval = if needs_fast_poll {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Block until the next tick is due, unless there is already work.
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::ScheduleToggle { ticket } => self.schedule_toggle(ticket),
        }
    }

    /// Waits out the ticket's latency on a tokio task.
    fn schedule_toggle(&self, ticket: ToggleTicket) {
        let record = ticket.record;
        trace!(%record, action = %ticket.action, latency = ?ticket.latency(), "scheduling toggle");
        self.spawn_effect(async move {
            match ticket.ready().await {
                Some(ready) => UiEvent::ToggleReady(ready),
                None => UiEvent::ToggleCancelled { record },
            }
        });
    }

    /// Spawns an async effect and sends its result event to the inbox.
    fn spawn_effect<Fut>(&self, fut: Fut)
    where
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(fut.await);
        });
    }
}

/// Consumes a pending change notification from the tree, if any.
fn take_tree_change(rx: &mut watch::Receiver<Vec<VisibleNode>>) -> bool {
    if rx.has_changed().unwrap_or(false) {
        drop(rx.borrow_and_update());
        true
    } else {
        false
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lazytree_core::{FlatTree, HierarchyStore, RecordId, ToggleAction, TreeOptions};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tree_changes_mark_the_frame_dirty_once() {
        let mut tree = FlatTree::new(Arc::new(HierarchyStore::sample()), TreeOptions::default());
        let mut rx = tree.subscribe();
        assert!(!take_tree_change(&mut rx));

        let ticket = tree.begin_toggle(RecordId(1), ToggleAction::Expand).unwrap();
        assert!(take_tree_change(&mut rx));
        assert!(!take_tree_change(&mut rx));

        let ready = ticket.ready().await.unwrap();
        tree.finish_toggle(ready);
        assert!(take_tree_change(&mut rx));
        assert_eq!(rx.borrow().len(), 5);
    }

    #[test]
    fn test_ignored_toggle_does_not_mark_the_frame_dirty() {
        let mut tree = FlatTree::new(Arc::new(HierarchyStore::sample()), TreeOptions::default());
        let mut rx = tree.subscribe();

        // Apple is hidden until Fruits expands.
        assert!(tree.begin_toggle(RecordId(2), ToggleAction::Expand).is_none());
        assert!(!take_tree_change(&mut rx));
    }
}
