//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use lazytree_core::{ToggleAction, ToggleReady};
use tracing::trace;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::render;
use crate::state::AppState;

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            if app.tree.pending_count() > 0 {
                app.spinner_frame = app.spinner_frame.wrapping_add(1);
            }
            vec![]
        }
        UiEvent::Frame { height, .. } => {
            app.set_viewport_height(render::list_height(height));
            vec![]
        }
        UiEvent::Terminal(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            handle_key(app, key)
        }
        UiEvent::Terminal(_) => vec![],
        UiEvent::ToggleReady(ready) => {
            handle_toggle_ready(app, ready);
            vec![]
        }
        UiEvent::ToggleCancelled { record } => {
            trace!(%record, "toggle ticket cancelled");
            vec![]
        }
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let page = app.viewport_height.max(1).cast_signed();

    match key.code {
        KeyCode::Char('c') if ctrl => vec![UiEffect::Quit],
        KeyCode::Char('q') => vec![UiEffect::Quit],
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_by(-1);
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_by(1);
            vec![]
        }
        KeyCode::PageUp => {
            app.move_by(-page);
            vec![]
        }
        KeyCode::PageDown => {
            app.move_by(page);
            vec![]
        }
        KeyCode::Home | KeyCode::Char('g') => {
            app.select(0);
            vec![]
        }
        KeyCode::End | KeyCode::Char('G') => {
            app.select(usize::MAX);
            vec![]
        }
        KeyCode::Enter | KeyCode::Char(' ') => toggle_selected(app),
        KeyCode::Right | KeyCode::Char('l') => expand_or_descend(app),
        KeyCode::Left | KeyCode::Char('h') => collapse_or_ascend(app),
        KeyCode::Esc => {
            if let Some(id) = app.selected_id() {
                app.tree.cancel_toggle(id);
            }
            vec![]
        }
        _ => vec![],
    }
}

/// Flips the selected node. A second press while loading reverses the
/// pending toggle instead of restarting it.
fn toggle_selected(app: &mut AppState) -> Vec<UiEffect> {
    let Some(node) = app.selected_node() else {
        return vec![];
    };
    let id = node.id();
    let action = match app.tree.pending_action(id) {
        Some(pending) => pending.reversed(),
        None => ToggleAction::from(!node.is_expanded),
    };
    begin(app, action)
}

fn expand_or_descend(app: &mut AppState) -> Vec<UiEffect> {
    let Some(node) = app.selected_node() else {
        return vec![];
    };
    if node.is_expanded {
        let has_children = app
            .tree
            .nodes()
            .get(app.selected + 1)
            .is_some_and(|next| next.level > node.level);
        if has_children {
            app.move_by(1);
        }
        return vec![];
    }
    begin(app, ToggleAction::Expand)
}

fn collapse_or_ascend(app: &mut AppState) -> Vec<UiEffect> {
    let Some(node) = app.selected_node() else {
        return vec![];
    };
    if node.is_expanded || app.tree.pending_action(node.id()) == Some(ToggleAction::Expand) {
        return begin(app, ToggleAction::Collapse);
    }
    if let Some(parent) = app.tree.parent_position(app.selected) {
        app.select(parent);
    }
    vec![]
}

fn begin(app: &mut AppState, action: ToggleAction) -> Vec<UiEffect> {
    let Some(id) = app.selected_id() else {
        return vec![];
    };
    match app.tree.begin_toggle(id, action) {
        Some(ticket) => vec![UiEffect::ScheduleToggle { ticket }],
        None => vec![],
    }
}

fn handle_toggle_ready(app: &mut AppState, ready: ToggleReady) {
    let selected = app.selected_id();
    if !app.tree.finish_toggle(ready) {
        return;
    }
    // Keep the cursor on the same record; if a collapse removed it, land on
    // the collapsed node instead.
    let still_visible = selected.is_some_and(|id| app.select_id(id));
    if !still_visible && !app.select_id(ready.record) {
        app.select(app.selected);
    }
}
