use crate::app::AppState;
use crate::app::mode::Mode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use todo_store::todo::{Origin, Todo};

pub fn render(f: &mut Frame, state: &mut AppState, area: Rect) {
    let todos = state.visible_todos();
    let focused = state.mode != Mode::Import;
    let border_style = if focused {
        Style::default().fg(state.theme.foreground)
    } else {
        Style::default().fg(state.theme.muted)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" Tasks ({}) ", todos.len()));

    if todos.is_empty() {
        let message = if state.todo_state().todos.is_empty() {
            "No tasks yet. Press n to add one."
        } else {
            "No tasks match the current filter."
        };
        let empty = Paragraph::new(Span::styled(message, Style::default().fg(state.theme.muted)))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = todos.iter().map(|todo| todo_item(todo, state)).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(state.theme.highlight_bg));

    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(state.cursor));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn todo_item<'a>(todo: &'a Todo, state: &AppState) -> ListItem<'a> {
    let checkbox = if todo.completed { "[x] " } else { "[ ] " };
    let title_style = if todo.completed {
        Style::default()
            .fg(state.theme.completed)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(state.theme.foreground)
    };

    let mut spans = vec![
        Span::raw(checkbox),
        Span::styled(todo.title.as_str(), title_style),
        Span::raw("  "),
        Span::styled(
            todo.priority.as_str(),
            Style::default().fg(state.theme.priority_color(todo.priority)),
        ),
    ];
    if todo.origin == Some(Origin::Api) {
        spans.push(Span::styled(" [api]", Style::default().fg(state.theme.muted)));
    }

    let mut lines = vec![Line::from(spans)];
    if let Some(description) = &todo.description {
        lines.push(Line::from(Span::styled(
            format!("    {description}"),
            Style::default().fg(state.theme.muted),
        )));
    }
    ListItem::new(lines)
}
