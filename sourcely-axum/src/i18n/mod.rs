pub mod cookie;
pub mod middleware;

pub use cookie::RequestStorage;
pub use middleware::{CURRENT_LANG, current_lang, handle_i18n};
