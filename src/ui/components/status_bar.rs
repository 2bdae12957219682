use crate::app::AppState;
use crate::app::mode::Mode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn render(f: &mut Frame, state: &AppState, area: Rect) {
    if state.mode == Mode::ConfirmDelete {
        render_confirm_delete(f, state, area);
        return;
    }

    if state.mode == Mode::Search {
        render_search(f, state, area);
        return;
    }

    let hint = match state.mode {
        Mode::Import => "Space select  Enter import  D drop  h/l page  Esc back",
        _ => "? help  q quit",
    };
    let version_text = format!("v{VERSION}");
    let left_content = format!(" {} | {hint}", state.mode);

    let padding = padding(
        area.width,
        left_content.chars().count().saturating_add(version_text.len()).saturating_add(1),
    );

    let status_line = format!("{}{:>padding$}{} ", left_content, "", version_text);

    let style = Style::default()
        .fg(state.theme.status_bar_fg)
        .bg(state.theme.status_bar_bg);
    f.render_widget(Paragraph::new(Line::from(Span::styled(status_line, style))), area);
}

fn render_confirm_delete(f: &mut Frame, state: &AppState, area: Rect) {
    let title = state.pending_delete_title().unwrap_or("this task");
    let prompt = format!(" Delete \"{title}\"? (Y/n) ");

    let style = Style::default()
        .fg(ratatui::style::Color::White)
        .bg(state.theme.toast_warning)
        .add_modifier(Modifier::BOLD);

    let padding = padding(area.width, prompt.chars().count());
    let status_line = format!("{}{:padding$}", prompt, "");

    f.render_widget(Paragraph::new(Line::from(Span::styled(status_line, style))), area);
}

fn render_search(f: &mut Frame, state: &AppState, area: Rect) {
    let prefix = " / ";
    let style = Style::default()
        .fg(state.theme.status_bar_fg)
        .bg(state.theme.status_bar_bg);
    let line = format!("{prefix}{}", state.search.value());
    let padding = padding(area.width, line.chars().count());
    let status_line = format!("{}{:padding$}", line, "");

    f.render_widget(Paragraph::new(Line::from(Span::styled(status_line, style))), area);
    f.set_cursor_position((
        area.x
            .saturating_add(prefix.len() as u16)
            .saturating_add(state.search.cursor_column()),
        area.y,
    ));
}

/// Columns left over after `used` columns of content, never negative.
fn padding(width: u16, used: usize) -> usize {
    usize::from(width).saturating_sub(used)
}
