pub mod cookie;
pub mod flash;
pub mod html;

pub use cookie::read_cookie;
pub use flash::{Flash, FlashLevel, redirect_with_flash};
pub use html::escape_html;
