//! Request handlers.

pub mod health;
pub mod redirect;
pub mod shorten;
pub mod user_urls;

pub use health::ping_handler;
pub use redirect::redirect_handler;
pub use shorten::{batch_shorten_handler, shorten_handler, shorten_text_handler};
pub use user_urls::{delete_user_urls_handler, user_urls_handler};
