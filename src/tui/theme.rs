//! Color constants for the terminal menu

use ratatui::prelude::*;

pub const TITLE_OK: Color = Color::Green;
pub const TITLE_ALERT: Color = Color::LightRed;
pub const TITLE_WARNING: Color = Color::Yellow;
pub const TITLE_PENDING: Color = Color::Gray;

pub const MUTED: Color = Color::DarkGray;
pub const ROW_ALT_BG: Color = Color::Rgb(30, 30, 36);
pub const ROW_SELECTED: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Cyan)
    .add_modifier(Modifier::BOLD);

pub const STATUS_BAR_BG: Color = Color::Rgb(40, 40, 48);
pub const STATUS_KEY_COLOR: Color = Color::Cyan;
pub const FLASH_SUCCESS: Color = Color::Green;
pub const FLASH_ERROR: Color = Color::Red;

/// Title color follows the status marker at the start of the title.
pub fn title_color(title: &str) -> Color {
    if title.starts_with("🟢") {
        TITLE_OK
    } else if title.starts_with("🔴") || title.starts_with("❌") {
        TITLE_ALERT
    } else if title.starts_with("⚠") {
        TITLE_WARNING
    } else {
        TITLE_PENDING
    }
}
