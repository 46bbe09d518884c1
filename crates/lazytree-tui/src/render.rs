//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui Frame, and never
//! mutate state or return effects.

use lazytree_core::VisibleNode;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::common::text::truncate_with_ellipsis;
use crate::state::AppState;

const HEADER_HEIGHT: u16 = 1;
const STATUS_HEIGHT: u16 = 1;
/// Top and bottom border of the list block.
const LIST_CHROME: u16 = 2;

/// Spinner frames shown next to a loading node.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

const MARKER_EXPANDED: &str = "▾ ";
const MARKER_COLLAPSED: &str = "▸ ";
const MARKER_LEAF: &str = "  ";

const HINTS: &str = "enter toggle · esc cancel · q quit ";

/// Rows available to the node list for a terminal `height`.
pub fn list_height(height: u16) -> usize {
    height.saturating_sub(HEADER_HEIGHT + STATUS_HEIGHT + LIST_CHROME) as usize
}

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let [header, list, status] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(frame.area());

    render_header(app, frame, header);
    render_list(app, frame, list);
    render_status_line(app, frame, status);
}

fn render_header(app: &AppState, frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" lazytree", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(" · {}", app.source),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_list(app: &AppState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
    let lines: Vec<Line> = app
        .tree
        .nodes()
        .iter()
        .enumerate()
        .skip(app.offset)
        .take(inner.height as usize)
        .map(|(index, node)| {
            node_line(
                node,
                app.indent_width,
                usize::from(inner.width),
                spinner,
                index == app.selected,
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn node_line(
    node: &VisibleNode,
    indent_width: u16,
    width: usize,
    spinner: &str,
    selected: bool,
) -> Line<'static> {
    let indent = " ".repeat(node.level * usize::from(indent_width));
    let marker = if node.is_expanded {
        MARKER_EXPANDED
    } else if node.expandable {
        MARKER_COLLAPSED
    } else {
        MARKER_LEAF
    };
    let kind = format!("  {}", node.record.kind);
    let loading = if node.is_loading {
        format!(" {spinner}")
    } else {
        String::new()
    };

    let reserved = indent.width() + marker.width() + kind.width() + loading.width();
    let name = truncate_with_ellipsis(node.name(), width.saturating_sub(reserved));

    let mut spans = vec![
        Span::raw(indent),
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::raw(name),
        Span::styled(kind, Style::default().add_modifier(Modifier::DIM)),
    ];
    if node.is_loading {
        spans.push(Span::styled(loading, Style::default().fg(Color::Yellow)));
    }

    let line = Line::from(spans);
    if selected {
        line.style(Style::default().add_modifier(Modifier::REVERSED))
    } else {
        line
    }
}

fn render_status_line(app: &AppState, frame: &mut Frame, area: Rect) {
    let summary = format!(
        " {} visible · {} loading",
        app.tree.len(),
        app.tree.pending_count()
    );
    frame.render_widget(
        Paragraph::new(summary).style(Style::default().fg(Color::Gray)),
        area,
    );
    frame.render_widget(
        Paragraph::new(HINTS)
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lazytree_core::{FlatTree, HierarchyStore, RecordId, ToggleAction, TreeOptions};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    use super::*;

    const WIDTH: u16 = 60;
    const HEIGHT: u16 = 10;

    fn app(options: TreeOptions) -> AppState {
        let tree = FlatTree::new(Arc::new(HierarchyStore::sample()), options);
        let mut app = AppState::new(tree, 2, "sample".to_string());
        app.set_viewport_height(list_height(HEIGHT));
        app
    }

    fn draw(app: &AppState) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn row(buffer: &Buffer, y: u16) -> String {
        (0..WIDTH).map(|x| buffer[(x, y)].symbol()).collect()
    }

    /// Buffer row of the first list entry (header, then top border).
    const FIRST_ROW: u16 = 2;

    #[test]
    fn test_renders_roots_collapsed() {
        let buffer = draw(&app(TreeOptions::immediate()));

        assert!(row(&buffer, 0).contains("lazytree · sample"));
        assert!(row(&buffer, FIRST_ROW).contains("▸ Fruits  pdf"));
        assert!(row(&buffer, FIRST_ROW + 1).contains("▸ Vegetables  png"));
        assert!(row(&buffer, HEIGHT - 1).contains("2 visible · 0 loading"));
    }

    #[tokio::test]
    async fn test_renders_children_indented() {
        let mut app = app(TreeOptions::immediate());
        app.tree.toggle(RecordId(1), ToggleAction::Expand).await;
        let buffer = draw(&app);

        assert!(row(&buffer, FIRST_ROW).contains("│▾ Fruits"));
        assert!(row(&buffer, FIRST_ROW + 1).contains("│  ▸ Apple  doc"));
        assert!(row(&buffer, FIRST_ROW + 2).contains("│    Orange  pdf"));
        assert!(row(&buffer, FIRST_ROW + 4).contains("│▸ Vegetables"));
    }

    #[test]
    fn test_loading_node_shows_spinner() {
        let mut app = app(TreeOptions::default());
        let _ticket = app.tree.begin_toggle(RecordId(5), ToggleAction::Expand);
        let buffer = draw(&app);

        assert!(row(&buffer, FIRST_ROW + 1).contains("Vegetables  png ◐"));
        assert!(!row(&buffer, FIRST_ROW).contains('◐'));
        assert!(row(&buffer, HEIGHT - 1).contains("2 visible · 1 loading"));
    }

    #[test]
    fn test_selected_row_is_reversed() {
        let mut app = app(TreeOptions::immediate());
        app.select(1);
        let buffer = draw(&app);

        let reversed = |y: u16| {
            buffer[(1, y)]
                .style()
                .add_modifier
                .contains(Modifier::REVERSED)
        };
        assert!(!reversed(FIRST_ROW));
        assert!(reversed(FIRST_ROW + 1));
    }

    #[test]
    fn test_long_names_are_truncated() {
        let store = HierarchyStore::builder()
            .root(lazytree_core::Record::new(1, "x".repeat(100), "txt"))
            .build()
            .unwrap();
        let tree = FlatTree::new(Arc::new(store), TreeOptions::immediate());
        let app = AppState::new(tree, 2, "test".to_string());
        let buffer = draw(&app);

        let first = row(&buffer, FIRST_ROW);
        assert!(first.contains("x…  txt"));
        assert!(first.ends_with('│'));
    }

    #[test]
    fn test_list_height_leaves_room_for_chrome() {
        assert_eq!(list_height(10), 6);
        assert_eq!(list_height(3), 0);
    }
}
