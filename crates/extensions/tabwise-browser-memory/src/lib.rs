//! In-process browser for tabwise.
//!
//! Implements the tab, bookmark and history ports over a [`BrowserState`]
//! that can be loaded from and written back to a JSON file.

mod browser;
mod state;

pub use browser::MemoryBrowser;
pub use state::BrowserState;
