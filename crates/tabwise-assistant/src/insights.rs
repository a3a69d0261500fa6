//! Model-assisted tab and browsing insights.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use tabwise_config::{split_keywords, MAX_INACTIVE_THRESHOLD_MINUTES};
use tabwise_protocols::store::keys;
use tabwise_protocols::types::{
    BookmarkRecord, BrowserTab, DuplicateGroup, HistoryItem, HistoryQuery, TabCategory, TabId,
};

use crate::assistant::TabAssistant;
use crate::bookmarks::find_duplicate_bookmarks;
use crate::error::AssistantError;
use crate::intent::{extract_embedded_json, parse_categories};
use crate::prompt::{browsing_analysis_prompt, categorize_prompt, inactive_prompt, InactiveCandidate};
use crate::snapshot::{extract_domain, is_internal_url};

const DEFAULT_INACTIVE_MINUTES: u64 = 30;
const ANALYSIS_SAMPLE: usize = 50;
const ANALYSIS_MAX_RESULTS: usize = 500;
const STATISTICS_MAX_RESULTS: usize = 10_000;
const TOP_DOMAINS: usize = 10;

/// A tab suggested for closing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InactiveTab {
    /// Position in the candidate list.
    pub index: usize,
    pub tab_id: TabId,
    pub title: String,
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainVisits {
    pub domain: String,
    pub visit_count: usize,
}

/// Visit counts over a recent window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowsingStatistics {
    pub days: u32,
    pub total_visits: usize,
    pub unique_domains: usize,
    pub avg_visits_per_day: u64,
    pub top_domains: Vec<DomainVisits>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowsingInsights {
    #[serde(default)]
    pub top_categories: Vec<String>,
    #[serde(default)]
    pub productivity_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowsingAnalysis {
    #[serde(default)]
    pub insights: BrowsingInsights,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl BrowsingAnalysis {
    /// Returned when there is no history to look at.
    pub fn not_enough_data() -> Self {
        Self {
            insights: BrowsingInsights::default(),
            recommendations: vec!["Not enough browsing data to analyze yet.".to_string()],
        }
    }

    /// Returned when the model's reply could not be read.
    pub fn neutral() -> Self {
        Self {
            insights: BrowsingInsights {
                top_categories: vec!["Work".to_string(), "Entertainment".to_string()],
                productivity_score: 50,
            },
            recommendations: vec!["Try to plan your browsing time.".to_string()],
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        let obj = value.as_object()?;
        let insights = obj.get("insights").and_then(Value::as_object);
        let top_categories = insights
            .and_then(|i| i.get("topCategories"))
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();
        let productivity_score = insights
            .and_then(|i| i.get("productivityScore"))
            .and_then(Value::as_f64)
            .map(|score| score.round().clamp(0.0, 100.0) as u8)
            .unwrap_or(0);
        let recommendations = obj
            .get("recommendations")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();

        Some(Self {
            insights: BrowsingInsights {
                top_categories,
                productivity_score,
            },
            recommendations,
        })
    }
}

/// Domain visit counts for `items`, most visited first.
pub fn browsing_statistics_from(items: &[HistoryItem], days: u32) -> BrowsingStatistics {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for item in items {
        *counts.entry(extract_domain(&item.url)).or_default() += 1;
    }

    let unique_domains = counts.len();
    let mut top_domains: Vec<DomainVisits> = counts
        .into_iter()
        .map(|(domain, visit_count)| DomainVisits { domain, visit_count })
        .collect();
    top_domains.sort_by(|a, b| b.visit_count.cmp(&a.visit_count).then_with(|| a.domain.cmp(&b.domain)));
    top_domains.truncate(TOP_DOMAINS);

    let days = days.max(1);
    BrowsingStatistics {
        days,
        total_visits: items.len(),
        unique_domains,
        avg_visits_per_day: (items.len() as f64 / f64::from(days)).round() as u64,
        top_domains,
    }
}

fn threshold_minutes(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|&m| m > 0 && m <= MAX_INACTIVE_THRESHOLD_MINUTES)
    .unwrap_or(DEFAULT_INACTIVE_MINUTES)
}

fn threshold_delta(minutes: u64) -> Duration {
    i64::try_from(minutes)
        .ok()
        .and_then(Duration::try_minutes)
        .unwrap_or_else(|| Duration::minutes(DEFAULT_INACTIVE_MINUTES as i64))
}

/// Start of a `days`-long window ending now; the earliest representable
/// instant when the window reaches past it.
fn window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(days.max(1)))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn keep_keywords(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_keywords(s),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(split_keywords)
            .collect(),
        _ => Vec::new(),
    }
}

/// Tabs idle for longer than `threshold` that are neither protected nor
/// matched by a keep-keyword. Tabs that never report an access time count
/// as just used.
pub fn inactive_candidates<'a>(
    tabs: &'a [BrowserTab],
    now: DateTime<Utc>,
    threshold: Duration,
    keywords: &[String],
) -> Vec<&'a BrowserTab> {
    tabs.iter()
        .filter(|tab| !tab.active && !tab.pinned)
        .filter(|tab| !is_internal_url(tab.url.as_deref().unwrap_or_default()))
        .filter(|tab| now - tab.last_accessed.unwrap_or(now) > threshold)
        .filter(|tab| {
            let text = format!(
                "{} {}",
                tab.title.as_deref().unwrap_or_default(),
                tab.url.as_deref().unwrap_or_default()
            )
            .to_lowercase();
            !keywords.iter().any(|k| text.contains(k.as_str()))
        })
        .collect()
}

impl TabAssistant {
    /// Stale tabs the model considers safe to close.
    pub async fn identify_inactive_tabs(&self) -> Result<Vec<InactiveTab>, AssistantError> {
        let minutes = threshold_minutes(
            &self
                .settings
                .get_or(keys::TAB_INACTIVE_THRESHOLD, json!(DEFAULT_INACTIVE_MINUTES))
                .await,
        );
        let keywords = keep_keywords(&self.settings.get_or(keys::TAB_KEEP_KEYWORDS, json!("")).await);

        let tabs = self.ports.tabs.query_tabs().await?;
        let now = Utc::now();
        let candidates = inactive_candidates(&tabs, now, threshold_delta(minutes), &keywords);
        debug!("{} inactive candidates (threshold {} min)", candidates.len(), minutes);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let shown: Vec<InactiveCandidate<'_>> = candidates
            .iter()
            .map(|tab| InactiveCandidate {
                title: tab.title.as_deref().unwrap_or_default(),
                last_accessed: tab
                    .last_accessed
                    .unwrap_or(now)
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            })
            .collect();

        let raw = self.complete(inactive_prompt(&shown), 0.3, 1000).await?;
        let to_inactive = |index: usize, reason: String| {
            let tab = candidates[index];
            InactiveTab {
                index,
                tab_id: tab.id,
                title: tab.title.clone().unwrap_or_default(),
                url: tab.url.clone().unwrap_or_default(),
                reason,
            }
        };

        let picked = extract_embedded_json(&raw)
            .as_ref()
            .and_then(|v| v.get("inactive"))
            .and_then(Value::as_array)
            .cloned();

        match picked {
            Some(items) => Ok(items
                .iter()
                .filter_map(|item| {
                    let index = item.get("index").and_then(Value::as_u64)? as usize;
                    if index >= candidates.len() {
                        return None;
                    }
                    let reason = item
                        .get("reason")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                    Some(to_inactive(index, reason))
                })
                .collect()),
            None => {
                warn!("Unreadable inactive-tab reply, suggesting every candidate");
                Ok((0..candidates.len())
                    .map(|i| to_inactive(i, format!("Not visited for over {minutes} minutes")))
                    .collect())
            }
        }
    }

    /// Topic groups over the current snapshot.
    pub async fn categorize_tabs(&self) -> Result<Vec<TabCategory>, AssistantError> {
        let tabs = self.snapshot.snapshot_tabs().await?;
        if tabs.is_empty() {
            return Ok(Vec::new());
        }

        let raw = self.complete(categorize_prompt(&tabs), 0.3, 1500).await?;
        let Some(value) = extract_embedded_json(&raw) else {
            warn!("Unreadable categorization reply");
            return Ok(Vec::new());
        };

        let groups = value
            .get("categories")
            .or_else(|| value.get("groups"))
            .map(parse_categories)
            .unwrap_or_default();

        Ok(groups
            .into_iter()
            .filter_map(|mut category| {
                let mut seen = BTreeSet::new();
                category.tabs.retain(|&i| i < tabs.len() && seen.insert(i));
                (!category.tabs.is_empty()).then_some(category)
            })
            .collect())
    }

    async fn recent_history(&self, days: u32, max_results: usize) -> Result<Vec<HistoryItem>, AssistantError> {
        let since = window_start(Utc::now(), days);
        let query = HistoryQuery::since(since).with_max_results(max_results);
        Ok(self.ports.history.search_history(query).await?)
    }

    pub async fn browsing_statistics(&self, days: u32) -> Result<BrowsingStatistics, AssistantError> {
        let items = self.recent_history(days, STATISTICS_MAX_RESULTS).await?;
        Ok(browsing_statistics_from(&items, days))
    }

    pub async fn analyze_browsing(&self, days: u32) -> Result<BrowsingAnalysis, AssistantError> {
        let items = self.recent_history(days, ANALYSIS_MAX_RESULTS).await?;
        if items.is_empty() {
            return Ok(BrowsingAnalysis::not_enough_data());
        }

        let sample = &items[..items.len().min(ANALYSIS_SAMPLE)];
        let raw = self.complete(browsing_analysis_prompt(sample, days), 0.5, 1000).await?;

        Ok(extract_embedded_json(&raw)
            .and_then(BrowsingAnalysis::from_value)
            .unwrap_or_else(|| {
                warn!("Unreadable browsing analysis, using neutral result");
                BrowsingAnalysis::neutral()
            }))
    }

    /// Every URL-bearing bookmark.
    pub async fn bookmarks(&self) -> Result<Vec<BookmarkRecord>, AssistantError> {
        Ok(self.snapshot.bookmarks().await?)
    }

    pub async fn find_duplicate_bookmarks(&self) -> Result<Vec<DuplicateGroup>, AssistantError> {
        Ok(find_duplicate_bookmarks(&self.bookmarks().await?))
    }
}

#[cfg(test)]
#[path = "insights_tests.rs"]
mod tests;
