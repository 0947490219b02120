//! File storage for sophconf configuration trees
//!
//! Loads a [`Config`](sophconf::Config) from TOML, JSON or YAML and writes
//! it back atomically. The format follows the file extension.

pub mod error;
pub mod format;
pub mod io;
pub mod store;

pub use error::{Error, Result};
pub use format::Format;
pub use store::ConfigStore;
