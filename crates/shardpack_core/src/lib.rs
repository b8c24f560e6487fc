pub mod error;
pub mod loader;
pub mod plugin;
pub mod types;
pub mod url;

pub use error::*;
