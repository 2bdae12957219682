pub mod import_panel;
pub mod status_bar;
pub mod todo_list;

use crate::app::AppState;
use crate::app::form::FormField;
use crate::app::mode::Mode;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use todo_store::todo::Priority;

pub fn render(f: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Todo list (+ import panel)
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    render_header(f, state, chunks[0]);

    if state.mode == Mode::Import {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        todo_list::render(f, state, columns[0]);
        import_panel::render(f, state, columns[1]);
    } else {
        todo_list::render(f, state, chunks[1]);
    }

    status_bar::render(f, state, chunks[2]);

    if state.mode.is_form() {
        render_form_modal(f, state);
    }

    if state.show_help {
        render_help_overlay(f, state);
    }

    render_toasts(f, state);
}

fn render_header(f: &mut Frame, state: &mut AppState, area: Rect) {
    let todo_state = state.store.snapshot();
    let total = state.selectors.todos_count(&todo_state);
    let active = state.selectors.active_count(&todo_state);
    let completed = state.selectors.completed_count(&todo_state);
    let groups = state.selectors.todos_by_priority(&todo_state);

    let active_tab = Style::default().fg(Color::Black).bg(Color::Cyan);
    let idle_tab = Style::default().fg(state.theme.muted);

    let mut tabs = vec![Span::styled(" Filter: ", Style::default().fg(state.theme.foreground))];
    for filter in [
        todo_store::todo::Filter::All,
        todo_store::todo::Filter::Active,
        todo_store::todo::Filter::Completed,
    ] {
        let style = if filter == todo_state.filter { active_tab } else { idle_tab };
        tabs.push(Span::styled(format!(" {filter} "), style));
        tabs.push(Span::raw(" "));
    }
    if !todo_state.search_term.is_empty() {
        tabs.push(Span::styled(
            format!("  search: \"{}\"", todo_state.search_term),
            Style::default().fg(Color::Yellow),
        ));
    }

    let mut counts = vec![Span::styled(
        format!(" {total} total · {active} active · {completed} completed   "),
        Style::default().fg(state.theme.foreground),
    )];
    for priority in [Priority::High, Priority::Medium, Priority::Low] {
        counts.push(Span::styled(
            format!("{priority} {}  ", groups.get(priority).len()),
            Style::default().fg(state.theme.priority_color(priority)),
        ));
    }
    if todo_state.loading {
        counts.push(Span::styled("loading…", Style::default().fg(Color::Cyan)));
    }

    let mut lines = vec![Line::from(tabs), Line::from(counts)];
    if let Some(error) = &todo_state.error {
        lines.push(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(state.theme.toast_error),
        )));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_form_modal(f: &mut Frame, state: &AppState) {
    let form = &state.form;
    let title = if form.target.is_some() { " Edit task " } else { " New task " };
    let area = centered_fixed(60, form.fields().len() as u16 * 2 + 4, f.area());

    let label_style = Style::default().fg(state.theme.muted);
    let focus_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    let mut cursor = None;
    for (row, field) in form.fields().iter().enumerate() {
        let focused = *field == form.focus;
        let style = if focused { focus_style } else { label_style };
        lines.push(Line::from(Span::styled(format!("{}:", field.label()), style)));

        let value = match field {
            FormField::Title => {
                if focused {
                    cursor = Some((form.title.cursor_column(), row as u16 * 2 + 1));
                }
                Span::raw(form.title.value().to_string())
            }
            FormField::Description => {
                if focused {
                    cursor = Some((form.description.cursor_column(), row as u16 * 2 + 1));
                }
                Span::raw(form.description.value().to_string())
            }
            FormField::Priority => Span::styled(
                format!("< {} >", form.priority),
                Style::default().fg(state.theme.priority_color(form.priority)),
            ),
            FormField::Completed => Span::raw(if form.completed { "[x]" } else { "[ ]" }),
        };
        lines.push(Line::from(value));
    }

    let hint = if form.is_valid() {
        " Enter save · Tab next · Esc cancel "
    } else {
        " Title required · Esc cancel "
    };

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_bottom(Line::from(hint).centered())
            .style(Style::default().bg(state.theme.background)),
    );

    f.render_widget(Clear, area);
    f.render_widget(widget, area);

    if let Some((x, y)) = cursor {
        f.set_cursor_position((area.x + 1 + x, area.y + 1 + y));
    }
}

fn render_help_overlay(f: &mut Frame, state: &AppState) {
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(state.theme.foreground);
    let section_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let section = |name: &str| Line::from(Span::styled(format!("  ── {name} ──"), section_style));
    let entry = |keys: &str, desc: &str| {
        Line::from(vec![
            Span::styled(format!("    {keys:<16}"), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let lines = vec![
        section("Tasks"),
        entry("j / k", "Move cursor"),
        entry("n / a", "New task"),
        entry("e / Enter", "Edit task"),
        entry("x / Space", "Toggle done"),
        entry("p", "Cycle priority"),
        entry("d", "Delete task"),
        entry("C", "Clear completed"),
        entry("r", "Reload"),
        Line::from(""),
        section("View"),
        entry("f", "Cycle filter"),
        entry("/", "Search"),
        Line::from(""),
        section("Import"),
        entry("i / Tab", "Open import panel"),
        entry("h / l, 1-9", "Change page"),
        entry("Space", "Select post"),
        entry("a / A", "Select all / none"),
        entry("p", "Cycle post priority"),
        entry("Enter", "Import selected"),
        entry("D", "Drop post onto list"),
        Line::from(""),
        entry("q", "Quit"),
    ];

    let area = centered_rect(50, 80, f.area());
    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(state.theme.background)),
    );

    f.render_widget(Clear, area);
    f.render_widget(widget, area);
}

fn render_toasts(f: &mut Frame, state: &AppState) {
    let screen = f.area();
    let width = 40.min(screen.width);
    let x = screen.width.saturating_sub(width + 1);

    for (i, toast) in state.toasts.toasts().iter().rev().take(4).enumerate() {
        let y = 1 + i as u16;
        if y + 1 >= screen.height {
            break;
        }
        let area = Rect::new(x, y, width, 1);
        let style = Style::default()
            .fg(Color::White)
            .bg(state.theme.toast_color(toast.kind))
            .add_modifier(Modifier::BOLD);
        f.render_widget(Clear, area);
        f.render_widget(Paragraph::new(format!(" {} ", toast.message)).style(style), area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Horizontally a percentage, vertically a fixed number of rows.
fn centered_fixed(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let y = r.y + (r.height - height) / 2;
    let column = centered_rect(percent_x, 100, r);
    Rect::new(column.x, y, column.width, height)
}
