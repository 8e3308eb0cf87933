pub mod handlers;
pub mod widgets;

pub use handlers::{GridNavigation, handle_form_input, handle_search_input};
pub use widgets::*;
