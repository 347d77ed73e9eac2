pub mod og_images;

pub use og_images::{ImageSource, OgImage, OgImageQuery, OgImageService, RenderMode};
