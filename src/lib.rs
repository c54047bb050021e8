pub mod browser;
pub mod config;
pub mod credentials;
pub mod github;
pub mod instance;
pub mod logging;
pub mod output;
pub mod poll;
pub mod tui;
pub mod watch;
