use crate::application::{App, HostMode};
use ratatui::layout::Rect;

const DIALOG_WIDTH: u16 = 56;
const DIALOG_HEIGHT: u16 = 9;

/// Screen rectangle occupied by the host for the current viewport.
///
/// The side panel hugs the right edge at full height; the bottom sheet
/// spans the full width and is pushed down by the drag offset. While the
/// host is exiting, both slide out towards their anchored edge.
pub fn host_region(app: &App, area: Rect) -> Rect {
    let host = app.session.host();
    let config = host.config();
    let exit_shift = |size: u16| -> u16 {
        match app.exit_progress() {
            Some((remaining, total)) => {
                let done = u32::from(total.saturating_sub(remaining));
                (u32::from(size) * done / u32::from(total.max(1))) as u16
            }
            None => 0,
        }
    };

    match app.host_mode() {
        HostMode::SidePanel => {
            let width = config
                .width
                .unwrap_or(app.layout.side_panel_width)
                .min(area.width);
            let shift = exit_shift(width);
            Rect {
                x: area.x + area.width - width + shift,
                y: area.y,
                width: width - shift,
                height: area.height,
            }
        }
        HostMode::BottomSheet => {
            let default_height =
                (u32::from(area.height) * u32::from(app.layout.sheet_height_percent) / 100) as u16;
            let height = config.height.unwrap_or(default_height).min(area.height);
            let shift = host.drag_offset().saturating_add(exit_shift(height)).min(height);
            Rect {
                x: area.x,
                y: area.y + area.height - height + shift,
                width: area.width,
                height: height - shift,
            }
        }
    }
}

/// Row holding the bottom sheet's drag handle, if the sheet is showing.
pub fn sheet_handle_row(app: &App, area: Rect) -> Option<u16> {
    if app.host_mode() != HostMode::BottomSheet || !app.session.host().is_open() {
        return None;
    }
    let region = host_region(app, area);
    (region.height > 0).then_some(region.y)
}

pub fn dialog_region(area: Rect) -> Rect {
    let width = DIALOG_WIDTH.min(area.width);
    let height = DIALOG_HEIGHT.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
