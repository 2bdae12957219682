use super::form::FormField;
use super::mode::Mode;
use super::state::AppState;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use todo_store::utils::unicode::TextField;

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return Ok(());
    }

    if state.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            state.show_help = false;
        }
        return Ok(());
    }

    match state.mode {
        Mode::Navigate => handle_navigate_mode(key, state),
        Mode::Add | Mode::Edit => handle_form_mode(key, state),
        Mode::Search => handle_search_mode(key, state),
        Mode::ConfirmDelete => handle_confirm_delete_mode(key, state),
        Mode::Import => handle_import_mode(key, state),
    }
    Ok(())
}

fn handle_navigate_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char('q') => state.should_quit = true,
        KeyCode::Char('?') => state.show_help = true,
        KeyCode::Up | KeyCode::Char('k') => state.move_cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_cursor_down(),
        KeyCode::Char('x') | KeyCode::Char(' ') => state.toggle_selected(),
        KeyCode::Char('n') | KeyCode::Char('a') => state.open_add_form(),
        KeyCode::Char('e') | KeyCode::Enter => state.open_edit_form(),
        KeyCode::Char('d') | KeyCode::Delete => state.request_delete_selected(),
        KeyCode::Char('p') => state.set_selected_priority_next(),
        KeyCode::Char('f') => state.cycle_filter(),
        KeyCode::Char('/') => state.enter_search(),
        KeyCode::Char('C') => state.clear_completed(),
        KeyCode::Char('r') => state.reload(),
        KeyCode::Char('i') | KeyCode::Tab => state.open_import(),
        KeyCode::Esc => state.toasts.clear(),
        _ => {}
    }
}

/// Shared line-editing keys. Returns false when the key is not an edit key.
fn edit_text(field: &mut TextField, key: KeyEvent) -> bool {
    let word = key.modifiers.contains(KeyModifiers::ALT)
        || key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left if word => field.move_word_left(),
        KeyCode::Right if word => field.move_word_right(),
        KeyCode::Left => field.move_left(),
        KeyCode::Right => field.move_right(),
        KeyCode::Home => field.home(),
        KeyCode::End => field.end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => field.insert(c),
        _ => return false,
    }
    true
}

fn handle_form_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc => return state.close_form(),
        KeyCode::Enter => return state.submit_form(),
        KeyCode::Tab | KeyCode::Down => return state.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => return state.form.focus_prev(),
        _ => {}
    }

    if let Some(field) = state.form.focused_text_mut() {
        edit_text(field, key);
        return;
    }

    match (state.form.focus, key.code) {
        (FormField::Priority, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) => {
            state.form.cycle_focused()
        }
        (FormField::Priority, KeyCode::Char(c)) => {
            if let Ok(priority) = c.to_string().parse() {
                state.form.priority = priority;
            }
        }
        (FormField::Completed, KeyCode::Char(' ') | KeyCode::Char('x')) => {
            state.form.cycle_focused()
        }
        _ => {}
    }
}

fn handle_search_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Enter => state.mode = Mode::Navigate,
        KeyCode::Esc => state.clear_search(),
        _ => {
            if edit_text(&mut state.search, key) {
                state.sync_search();
            }
        }
    }
}

fn handle_confirm_delete_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => state.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => state.cancel_delete(),
        _ => {}
    }
}

fn handle_import_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc | KeyCode::Tab | KeyCode::Char('i') => state.mode = Mode::Navigate,
        KeyCode::Char('q') => state.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => state.import.move_cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => state.import.move_cursor_down(),
        KeyCode::Right | KeyCode::Char('l') => state.next_posts_page(),
        KeyCode::Left | KeyCode::Char('h') => state.previous_posts_page(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(page) = c.to_digit(10) {
                state.go_to_posts_page(page as usize);
            }
        }
        KeyCode::Char(' ') => {
            if let Some(id) = state.import.highlighted().map(|p| p.id()) {
                state.import.toggle_selection(id);
            }
        }
        KeyCode::Char('a') => state.import.select_all(),
        KeyCode::Char('A') => state.import.deselect_all(),
        KeyCode::Char('p') => {
            if let Some(id) = state.import.highlighted().map(|p| p.id()) {
                state.import.cycle_priority(id);
            }
        }
        KeyCode::Enter => state.import_selected(),
        KeyCode::Char('D') => state.drop_highlighted_post(),
        KeyCode::Char('r') => {
            let page = state.import.current_page();
            state.load_posts_page(page);
        }
        _ => {}
    }
}
