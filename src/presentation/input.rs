use crate::application::App;
use crate::presentation::{contains, dialog_region, host_region, sheet_handle_row};
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }
        if app.session.confirmation().is_open() {
            Self::handle_dialog_keys(app, key);
        } else if app.session.is_showing() {
            Self::handle_host_keys(app, key);
        } else {
            Self::handle_home_keys(app, key);
        }
    }

    fn handle_home_keys(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_home(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_home(1),
            KeyCode::Enter => app.open_selected(),
            KeyCode::Char('d') => app.deep_link_support(),
            KeyCode::Char('s') => app.toggle_session(),
            KeyCode::Esc => app.status_message = None,
            // 'q' is handled by the main loop
            _ => {}
        }
    }

    fn handle_host_keys(app: &mut App, key: KeyCode) {
        app.status_message = None;
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_list(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_list(1),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.drill_down(),
            KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => app.go_back(),
            KeyCode::Esc => {
                app.dismiss_outside();
            }
            KeyCode::Char('d') => app.deep_link_support(),
            KeyCode::Char('x') => app.request_destructive(),
            KeyCode::Char('p') => app.request_payment(),
            KeyCode::Char('s') => app.toggle_session(),
            _ => {}
        }
    }

    fn handle_dialog_keys(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('y') => app.confirm_submit(),
            KeyCode::Esc | KeyCode::Char('n') => app.confirm_close(),
            // Sign-out must get through even a loading dialog
            KeyCode::Char('s') => app.toggle_session(),
            _ => {}
        }
    }

    /// Clicks outside the dialog or host count as outside dismissals; the
    /// bottom sheet's handle row can be dragged down to close it.
    pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
        let area = Rect::new(0, 0, app.viewport_width, app.viewport_height);
        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if app.session.confirmation().is_open() {
                    if !contains(dialog_region(area), column, row) {
                        app.dismiss_outside();
                    }
                    return;
                }
                if !app.session.is_showing() {
                    return;
                }
                if sheet_handle_row(app, area) == Some(row) {
                    app.drag_anchor = Some(row);
                } else if !contains(host_region(app, area), column, row) {
                    app.dismiss_outside();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(last) = app.drag_anchor {
                    app.session.drag_by(i32::from(row) - i32::from(last));
                    app.drag_anchor = Some(row);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if app.drag_anchor.take().is_some() {
                    app.session.release_drag();
                }
            }
            _ => {}
        }
    }
}
