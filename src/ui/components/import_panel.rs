use crate::app::AppState;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use todo_store::import::{ImportPanel, PostWithPriority};

pub fn render(f: &mut Frame, state: &AppState, area: Rect) {
    let panel = &state.import;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(
            " Import posts ({} selected) ",
            panel.selected_count()
        ));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    if panel.loading {
        let loading = Paragraph::new(Span::styled(
            "Loading posts…",
            Style::default().fg(Color::Cyan),
        ));
        f.render_widget(loading, chunks[0]);
        return;
    }

    if let Some(error) = &panel.error {
        let lines = vec![
            Line::from(Span::styled(error.as_str(), Style::default().fg(state.theme.toast_error))),
            Line::from(Span::styled("Press r to retry", Style::default().fg(state.theme.muted))),
        ];
        f.render_widget(Paragraph::new(lines), chunks[0]);
        return;
    }

    let items: Vec<ListItem> = panel
        .posts()
        .iter()
        .map(|post| post_item(post, panel, state))
        .collect();
    let list = List::new(items).highlight_style(Style::default().bg(state.theme.highlight_bg));
    let mut list_state = ListState::default().with_selected(Some(panel.cursor()));
    f.render_stateful_widget(list, chunks[0], &mut list_state);

    f.render_widget(Paragraph::new(pagination_line(panel, state)), chunks[1]);
}

fn post_item<'a>(post: &'a PostWithPriority, panel: &ImportPanel, state: &AppState) -> ListItem<'a> {
    let checkbox = if panel.is_selected(post.id()) { "[x] " } else { "[ ] " };
    let header = Line::from(vec![
        Span::raw(checkbox),
        Span::styled(
            format!("#{} ", post.id()),
            Style::default().fg(state.theme.muted),
        ),
        Span::styled(post.post.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(
            post.priority.as_str(),
            Style::default().fg(state.theme.priority_color(post.priority)),
        ),
    ]);
    let body = Line::from(Span::styled(
        format!("    {}", post.post.body.lines().next().unwrap_or_default()),
        Style::default().fg(state.theme.muted),
    ));
    ListItem::new(vec![header, body])
}

fn pagination_line<'a>(panel: &ImportPanel, state: &AppState) -> Line<'a> {
    let dim = Style::default().fg(state.theme.muted);
    let mut spans = vec![Span::styled(
        if panel.can_go_previous() { "‹ " } else { "  " },
        dim,
    )];
    for page in panel.page_numbers() {
        let style = if page == panel.current_page() {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            dim
        };
        spans.push(Span::styled(format!(" {page} "), style));
    }
    spans.push(Span::styled(if panel.can_go_next() { " ›" } else { "  " }, dim));
    spans.push(Span::styled(
        format!(
            "   page {} of {} · {} posts",
            panel.current_page(),
            panel.total_pages(),
            panel.total_posts()
        ),
        dim,
    ));
    Line::from(spans)
}
