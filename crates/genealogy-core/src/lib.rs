//! Genealogy Core — shared error type, configuration, and graph records.

pub mod config;
pub mod error;
pub mod types;

pub use config::GenealogyConfig;
pub use error::{Error, Result};
pub use types::{Edge, Person, Thesis};
