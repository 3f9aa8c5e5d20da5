//! BMS library tools - shared modules for the duplicate resolver and folder opener.

pub mod db;
pub mod error;
pub mod fs_ops;
pub mod library;
pub mod logging;
pub mod models;
pub mod opener;
pub mod progress;
pub mod prompt;
pub mod resolver;
pub mod safety;

pub use error::{LibraryError, Result};
pub use library::Library;
