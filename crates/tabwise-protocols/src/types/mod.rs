//! Common types used across tabwise.

mod browser;
mod common;
mod intent;
mod message;
mod result;
mod turn;

pub use browser::*;
pub use common::*;
pub use intent::*;
pub use message::*;
pub use result::*;
pub use turn::*;
