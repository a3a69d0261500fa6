//! Error types for the tabwise protocol layer.

mod browser;
mod provider;
mod store;

pub use browser::*;
pub use provider::*;
pub use store::*;
