//! Application state for the tree view.
//!
//! ```text
//! AppState
//! ├── tree: FlatTree        (visible sequence + pending toggles)
//! ├── selected / offset     (cursor and scroll position in the sequence)
//! └── view settings         (indent width, viewport height, spinner)
//! ```

use lazytree_core::{FlatTree, RecordId, VisibleNode};

pub struct AppState {
    pub tree: FlatTree,
    /// Index of the highlighted row in the visible sequence.
    pub selected: usize,
    /// Index of the first row shown in the list viewport.
    pub offset: usize,
    /// Rows available to the list, updated from each frame.
    pub viewport_height: usize,
    pub indent_width: u16,
    pub spinner_frame: usize,
    pub should_quit: bool,
    /// Where the hierarchy came from (shown in the header).
    pub source: String,
}

impl AppState {
    pub fn new(tree: FlatTree, indent_width: u16, source: String) -> Self {
        Self {
            tree,
            selected: 0,
            offset: 0,
            viewport_height: 1,
            indent_width,
            spinner_frame: 0,
            should_quit: false,
            source,
        }
    }

    pub fn selected_node(&self) -> Option<&VisibleNode> {
        self.tree.nodes().get(self.selected)
    }

    pub fn selected_id(&self) -> Option<RecordId> {
        self.selected_node().map(VisibleNode::id)
    }

    /// Moves the cursor to `index` (clamped) and scrolls it into view.
    pub fn select(&mut self, index: usize) {
        let last = self.tree.len().saturating_sub(1);
        self.selected = index.min(last);
        self.scroll_into_view();
    }

    /// Moves the cursor by `delta` rows.
    pub fn move_by(&mut self, delta: isize) {
        self.select(self.selected.saturating_add_signed(delta));
    }

    /// Moves the cursor to the node showing `id`, if visible.
    pub fn select_id(&mut self, id: RecordId) -> bool {
        match self.tree.position(id) {
            Some(index) => {
                self.select(index);
                true
            }
            None => false,
        }
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        self.scroll_into_view();
    }

    fn scroll_into_view(&mut self) {
        let height = self.viewport_height.max(1);
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
        let max_offset = self.tree.len().saturating_sub(height);
        self.offset = self.offset.min(max_offset);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lazytree_core::{HierarchyStore, ToggleAction, TreeOptions};

    use super::*;

    fn state() -> AppState {
        let tree = FlatTree::new(Arc::new(HierarchyStore::sample()), TreeOptions::immediate());
        AppState::new(tree, 2, "sample".to_string())
    }

    #[test]
    fn test_select_clamps_to_last_row() {
        let mut app = state();
        app.select(10);
        assert_eq!(app.selected, 1);
        app.move_by(-5);
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn test_scrolls_to_keep_selection_visible() {
        let mut app = state();
        app.tree.toggle(RecordId(1), ToggleAction::Expand).await;
        app.tree.toggle(RecordId(5), ToggleAction::Expand).await;
        app.set_viewport_height(3);

        app.select(6);
        assert_eq!(app.offset, 4);

        app.select(1);
        assert_eq!(app.offset, 1);
    }

    #[test]
    fn test_select_id() {
        let mut app = state();
        assert!(app.select_id(RecordId(5)));
        assert_eq!(app.selected, 1);
        assert!(!app.select_id(RecordId(2)));
    }
}
