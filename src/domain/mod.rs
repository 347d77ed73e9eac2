pub mod cache_keys;
pub mod cards;
pub mod errors;
pub mod fallback;
pub mod images;
pub mod ports;
pub mod text;

// Re-exports
pub use errors::{CacheError, RenderError};
