#![allow(clippy::unwrap_used, clippy::expect_used)]

mod helpers;
mod og_image_api;
