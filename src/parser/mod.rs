//! PDF text loading.

mod backend;

pub use backend::{LopdfSource, TextSource};
