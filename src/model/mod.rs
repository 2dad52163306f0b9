//! Document model types shared by the text and image extractors.
//!
//! A [`Document`] is the text view of one PDF; [`TextBlock`] and
//! [`ExtractedImage`] are what the extractors produce from it.

mod block;
mod document;
mod extracted;
mod page;

pub use block::{block_file_name, TextBlock};
pub use document::Document;
pub use extracted::{image_file_name, ExtractedImage};
pub use page::PageText;
