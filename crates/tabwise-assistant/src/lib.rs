//! # tabwise assistant
//!
//! Turns a free-text request into at most one browser action:
//! snapshot the tabs, prompt the model, parse its reply into an
//! [`Intent`](tabwise_protocols::types::Intent) and execute it under the
//! tab protection rules.

pub mod assistant;
pub mod bookmarks;
pub mod error;
pub mod executor;
pub mod insights;
pub mod intent;
pub mod prompt;
pub mod snapshot;

#[cfg(test)]
mod test_support;

pub use assistant::{AssistantOptions, TabAssistant};
pub use bookmarks::{find_duplicate_bookmarks, flatten_bookmarks, search_bookmarks};
pub use error::AssistantError;
pub use executor::ActionExecutor;
pub use insights::{
    browsing_statistics_from, inactive_candidates, BrowsingAnalysis, BrowsingInsights,
    BrowsingStatistics, DomainVisits, InactiveTab,
};
pub use intent::{extract_embedded_json, extract_json_value, parse_intent, ParseFailure};
pub use prompt::build_assistant_prompt;
pub use snapshot::{extract_domain, is_internal_url, snapshot_from, SnapshotProvider};
