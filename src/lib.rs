//! Songlist Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod config;
pub mod csv;
pub mod pipeline;
pub mod server;
pub mod sheet;
pub mod social;
pub mod text;

// Re-export commonly used types for convenience
pub use catalog::{Catalog, Review, Song, Tag, TagTaxonomy};
pub use config::AppConfig;
pub use server::{run_server, RequestsLoggingLevel};
