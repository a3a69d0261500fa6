use chrono::{Duration, Utc};
use tabwise_browser_memory::BrowserState;
use tabwise_config::Config;
use tabwise_protocols::types::{BookmarkNode, BrowserTab, HistoryItem};

use super::*;
use crate::test_support::{Harness, ScriptedProvider};

fn idle_tab(id: i64, title: &str, url: &str, idle_minutes: i64) -> BrowserTab {
    BrowserTab::new(id, title, url).with_last_accessed(Utc::now() - Duration::minutes(idle_minutes))
}

fn visit(id: &str, url: &str, minutes_ago: i64) -> HistoryItem {
    HistoryItem {
        id: id.to_string(),
        url: url.to_string(),
        title: format!("Page {id}"),
        last_visit_time: Utc::now() - Duration::minutes(minutes_ago),
    }
}

fn mixed_tabs() -> BrowserState {
    BrowserState {
        tabs: vec![
            idle_tab(1, "Mail", "https://mail.example.com", 120).with_active(true),
            idle_tab(2, "Old article", "https://blog.example.com/post", 90),
            idle_tab(3, "Fresh", "https://fresh.example.com", 5),
            idle_tab(4, "Dashboard", "https://grafana.internal/d/1", 240).with_pinned(true),
            idle_tab(5, "Recipe", "https://food.example.com/soup", 600),
        ],
        ..Default::default()
    }
}

#[test]
fn test_inactive_candidates_filters() {
    let state = mixed_tabs();
    let now = Utc::now();
    let ids: Vec<i64> = inactive_candidates(&state.tabs, now, Duration::minutes(30), &[])
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![2, 5]);

    let keep = vec!["soup".to_string()];
    let ids: Vec<i64> = inactive_candidates(&state.tabs, now, Duration::minutes(30), &keep)
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn test_inactive_candidates_without_access_time() {
    let tabs = vec![BrowserTab::new(1, "Unknown", "https://unknown.example")];
    assert!(inactive_candidates(&tabs, Utc::now(), Duration::minutes(1), &[]).is_empty());
}

#[test]
fn test_threshold_and_keywords_from_values() {
    assert_eq!(threshold_minutes(&json!(45)), 45);
    assert_eq!(threshold_minutes(&json!("15")), 15);
    assert_eq!(threshold_minutes(&json!(0)), DEFAULT_INACTIVE_MINUTES);
    assert_eq!(threshold_minutes(&json!("soon")), DEFAULT_INACTIVE_MINUTES);

    assert_eq!(keep_keywords(&json!("Docs, JIRA ,")), vec!["docs", "jira"]);
    assert_eq!(keep_keywords(&json!(["a", "b,c"])), vec!["a", "b", "c"]);
    assert!(keep_keywords(&json!(null)).is_empty());
}

#[test]
fn test_out_of_range_threshold_falls_back() {
    assert_eq!(threshold_minutes(&json!(1_000_000_000_000_000u64)), DEFAULT_INACTIVE_MINUTES);
    assert_eq!(threshold_minutes(&json!(u64::MAX)), DEFAULT_INACTIVE_MINUTES);
    assert_eq!(
        threshold_minutes(&json!(MAX_INACTIVE_THRESHOLD_MINUTES)),
        MAX_INACTIVE_THRESHOLD_MINUTES
    );
    assert_eq!(threshold_delta(u64::MAX), Duration::minutes(30));
    assert_eq!(threshold_delta(90), Duration::minutes(90));
}

#[tokio::test]
async fn test_identify_inactive_tabs_with_huge_threshold() {
    let mut config = Config::default();
    config.tabs.inactive_threshold_minutes = 1_000_000_000_000_000;
    let provider = ScriptedProvider::new().reply("not json");
    let h = Harness::with_config(mixed_tabs(), provider, config);

    let inactive = h.assistant.identify_inactive_tabs().await.unwrap();

    let ids: Vec<i64> = inactive.iter().map(|t| t.tab_id).collect();
    assert_eq!(ids, vec![2, 5]);
    assert!(inactive.iter().all(|t| t.reason == "Not visited for over 30 minutes"));
}

#[tokio::test]
async fn test_identify_inactive_tabs_uses_model_choice() {
    let provider = ScriptedProvider::new().reply(
        r#"{"inactive":[{"index":1,"reason":"Recipe you already cooked"},{"index":7,"reason":"bogus"}]}"#,
    );
    let h = Harness::new(mixed_tabs(), provider);

    let inactive = h.assistant.identify_inactive_tabs().await.unwrap();

    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].index, 1);
    assert_eq!(inactive[0].tab_id, 5);
    assert_eq!(inactive[0].reason, "Recipe you already cooked");

    let requests = h.provider.requests();
    assert_eq!(requests[0].temperature, Some(0.3));
    assert_eq!(requests[0].max_tokens, Some(1000));
    let prompt = &requests[0].messages[1].content;
    assert!(prompt.contains("[0] Old article"));
    assert!(prompt.contains("[1] Recipe"));
    assert!(!prompt.contains("Fresh"));
}

#[tokio::test]
async fn test_identify_inactive_tabs_fallback() {
    let provider = ScriptedProvider::new().reply("I think all of them.");
    let h = Harness::new(mixed_tabs(), provider);

    let inactive = h.assistant.identify_inactive_tabs().await.unwrap();

    assert_eq!(inactive.len(), 2);
    assert!(inactive.iter().all(|t| t.reason == "Not visited for over 30 minutes"));
    assert_eq!(inactive[0].tab_id, 2);
}

#[tokio::test]
async fn test_identify_inactive_tabs_honours_settings() {
    let mut config = Config::default();
    config.tabs.inactive_threshold_minutes = 300;
    config.tabs.keep_keywords = vec!["food".to_string()];
    let h = Harness::with_config(mixed_tabs(), ScriptedProvider::new(), config);

    let inactive = h.assistant.identify_inactive_tabs().await.unwrap();

    assert!(inactive.is_empty());
    assert_eq!(h.provider.call_count(), 0);
}

#[tokio::test]
async fn test_categorize_tabs_validates_indices() {
    let provider = ScriptedProvider::new().reply(
        r#"```json
{"categories":[
  {"name":"Reading","tabs":[1,1,42],"reason":"articles"},
  {"name":"Ghosts","tabs":[99]},
  {"category":"Work","tabs":[0,3]}
]}
```"#,
    );
    let h = Harness::new(mixed_tabs(), provider);

    let categories = h.assistant.categorize_tabs().await.unwrap();

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name, "Reading");
    assert_eq!(categories[0].tabs, vec![1]);
    assert_eq!(categories[1].name, "Work");
    assert_eq!(categories[1].tabs, vec![0, 3]);
    assert_eq!(h.provider.requests()[0].max_tokens, Some(1500));
}

#[tokio::test]
async fn test_categorize_tabs_unreadable_and_empty() {
    let h = Harness::new(mixed_tabs(), ScriptedProvider::new().reply("no idea"));
    assert!(h.assistant.categorize_tabs().await.unwrap().is_empty());

    let h = Harness::new(BrowserState::default(), ScriptedProvider::new());
    assert!(h.assistant.categorize_tabs().await.unwrap().is_empty());
    assert_eq!(h.provider.call_count(), 0);
}

#[test]
fn test_browsing_statistics_from() {
    let items = vec![
        visit("1", "https://www.rust-lang.org/learn", 1),
        visit("2", "https://rust-lang.org/tools", 2),
        visit("3", "https://news.example.com", 3),
        visit("4", "https://blog.example.com", 4),
        visit("5", "https://news.example.com/a", 5),
    ];

    let stats = browsing_statistics_from(&items, 2);

    assert_eq!(stats.days, 2);
    assert_eq!(stats.total_visits, 5);
    assert_eq!(stats.unique_domains, 3);
    assert_eq!(stats.avg_visits_per_day, 3);
    assert_eq!(
        stats.top_domains,
        vec![
            DomainVisits { domain: "news.example.com".to_string(), visit_count: 2 },
            DomainVisits { domain: "rust-lang.org".to_string(), visit_count: 2 },
            DomainVisits { domain: "blog.example.com".to_string(), visit_count: 1 },
        ]
    );
}

#[test]
fn test_browsing_statistics_top_ten() {
    let items: Vec<HistoryItem> = (0..15)
        .map(|i| visit(&i.to_string(), &format!("https://site{i:02}.example"), i))
        .collect();
    let stats = browsing_statistics_from(&items, 7);
    assert_eq!(stats.unique_domains, 15);
    assert_eq!(stats.top_domains.len(), 10);
    assert_eq!(stats.top_domains[0].domain, "site00.example");
    assert_eq!(stats.avg_visits_per_day, 2);
}

#[tokio::test]
async fn test_browsing_statistics_window() {
    let state = BrowserState {
        history: vec![
            visit("1", "https://a.example", 10),
            visit("2", "https://a.example", 60 * 24 * 3),
        ],
        ..Default::default()
    };
    let h = Harness::new(state, ScriptedProvider::new());

    let stats = h.assistant.browsing_statistics(1).await.unwrap();

    assert_eq!(stats.total_visits, 1);
    assert_eq!(stats.top_domains[0].domain, "a.example");
    assert_eq!(h.provider.call_count(), 0);
}

#[test]
fn test_window_start_saturates() {
    let now = Utc::now();
    assert_eq!(window_start(now, 2), now - Duration::days(2));
    assert_eq!(window_start(now, 0), now - Duration::days(1));
    assert_eq!(window_start(now, u32::MAX), DateTime::<Utc>::MIN_UTC);
}

#[tokio::test]
async fn test_huge_day_windows_cover_all_history() {
    let state = BrowserState {
        history: vec![
            visit("1", "https://a.example", 10),
            visit("2", "https://b.example", 60 * 24 * 400),
        ],
        ..Default::default()
    };
    let provider = ScriptedProvider::new()
        .reply(r#"{"insights":{"topCategories":["Reading"],"productivityScore":60},"recommendations":[]}"#);
    let h = Harness::new(state, provider);

    let stats = h.assistant.browsing_statistics(u32::MAX).await.unwrap();
    assert_eq!(stats.total_visits, 2);
    assert_eq!(stats.days, u32::MAX);

    let analysis = h.assistant.analyze_browsing(u32::MAX).await.unwrap();
    assert_eq!(analysis.insights.productivity_score, 60);
    assert!(h.provider.requests()[0].messages[1].content.contains("Visits (most recent 2)"));
}

#[tokio::test]
async fn test_analyze_browsing_without_history() {
    let h = Harness::new(BrowserState::default(), ScriptedProvider::new());

    let analysis = h.assistant.analyze_browsing(7).await.unwrap();

    assert_eq!(analysis, BrowsingAnalysis::not_enough_data());
    assert_eq!(analysis.insights.productivity_score, 0);
    assert_eq!(h.provider.call_count(), 0);
}

#[tokio::test]
async fn test_analyze_browsing_parses_and_clamps() {
    let state = BrowserState {
        history: (0..60).map(|i| visit(&i.to_string(), "https://docs.rs/x", i)).collect(),
        ..Default::default()
    };
    let provider = ScriptedProvider::new().reply(
        r#"Here you go: {"insights":{"topCategories":["Programming"],"productivityScore":140},"recommendations":["Keep it up"]}"#,
    );
    let h = Harness::new(state, provider);

    let analysis = h.assistant.analyze_browsing(7).await.unwrap();

    assert_eq!(analysis.insights.top_categories, vec!["Programming"]);
    assert_eq!(analysis.insights.productivity_score, 100);
    assert_eq!(analysis.recommendations, vec!["Keep it up"]);

    let request = &h.provider.requests()[0];
    assert_eq!(request.temperature, Some(0.5));
    assert_eq!(request.max_tokens, Some(1000));
    assert!(request.messages[1].content.contains("Visits (most recent 50)"));
}

#[tokio::test]
async fn test_analyze_browsing_neutral_fallback() {
    let state = BrowserState {
        history: vec![visit("1", "https://docs.rs", 1)],
        ..Default::default()
    };
    let h = Harness::new(state, ScriptedProvider::new().reply("Looks fine to me"));

    let analysis = h.assistant.analyze_browsing(7).await.unwrap();

    assert_eq!(analysis, BrowsingAnalysis::neutral());
    assert_eq!(analysis.insights.productivity_score, 50);
}

#[test]
fn test_analysis_serializes_camel_case() {
    let json = serde_json::to_value(BrowsingAnalysis::neutral()).unwrap();
    assert_eq!(json["insights"]["productivityScore"], 50);
    assert_eq!(json["insights"]["topCategories"][0], "Work");
}

#[tokio::test]
async fn test_find_duplicate_bookmarks() {
    let state = BrowserState {
        bookmarks: vec![BookmarkNode::folder("0", "root").with_children(vec![
            BookmarkNode::leaf("1", "Rust", "https://rust-lang.org"),
            BookmarkNode::folder("2", "Lang").with_children(vec![BookmarkNode::leaf(
                "3",
                "Rust again",
                "https://rust-lang.org",
            )]),
            BookmarkNode::leaf("4", "Crates", "https://crates.io"),
        ])],
        ..Default::default()
    };
    let h = Harness::new(state, ScriptedProvider::new());

    assert_eq!(h.assistant.bookmarks().await.unwrap().len(), 3);

    let groups = h.assistant.find_duplicate_bookmarks().await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].url, "https://rust-lang.org");
    assert_eq!(groups[0].count, 2);
}
