pub mod shared;
pub mod config;
pub mod domain;
pub mod i18n;
pub mod infrastructure;

#[cfg(test)]
pub mod testing;

pub use shared::*;
pub use config::Settings;
pub use i18n::{Locale, get_localized_error, parse_accept_language};

