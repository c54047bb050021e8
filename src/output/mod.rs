pub mod formatter;
pub mod menu;

pub use formatter::{
    error_title, format_plain, format_swiftbar, menu_rows, relative_time, status_title,
    truncate_title,
};
pub use menu::{render, MenuRow, MenuState};
