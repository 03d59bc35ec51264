pub mod fallback;
pub mod resolver;
pub mod shortener;
pub mod slug;

pub use fallback::fallback_target;
pub use resolver::resolve;
pub use shortener::{normalize_url, short_link, shorten};
pub use slug::SlugAllocator;
