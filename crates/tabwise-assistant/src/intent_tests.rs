use super::*;

const CLOSE_JSON: &str = r#"{"action": "CLOSE_TABS", "tabIndices": [2, 4], "message": "Closing the video tabs."}"#;

#[test]
fn test_direct_json() {
    let intent = parse_intent(CLOSE_JSON).unwrap();
    assert_eq!(
        intent.action,
        IntentAction::CloseTabs {
            tab_indices: vec![2, 4]
        }
    );
    assert_eq!(intent.message_text(), "Closing the video tabs.");
}

#[test]
fn test_parse_is_deterministic() {
    assert_eq!(parse_intent(CLOSE_JSON), parse_intent(CLOSE_JSON));
    let prose = "no json here";
    assert_eq!(parse_intent(prose), parse_intent(prose));
}

#[test]
fn test_fenced_block_matches_unwrapped() {
    let tagged = format!("Sure! Here you go:\n```json\n{CLOSE_JSON}\n```\nAnything else?");
    let untagged = format!("```\n{CLOSE_JSON}\n```");
    let direct = parse_intent(CLOSE_JSON).unwrap();
    assert_eq!(parse_intent(&tagged).unwrap(), direct);
    assert_eq!(parse_intent(&untagged).unwrap(), direct);
}

#[test]
fn test_fenced_block_skips_non_json_fence() {
    let raw = format!("```bash\nls -la\n```\n\n```json\n{CLOSE_JSON}\n```");
    assert!(parse_intent(&raw).is_ok());
}

#[test]
fn test_json_inside_prose_is_failure() {
    let raw = r#"I won't close anything. A close request looks like {"action":"CLOSE_TABS","tabIndices":[1]}."#;
    let failure = parse_intent(raw).unwrap_err();
    assert_eq!(failure.into_raw(), raw);
    assert!(extract_json_value(raw).is_none());
}

#[test]
fn test_embedded_json_for_insights() {
    let raw = r#"Here you go: {"inactive": [{"index": 0, "reason": "a {b}"}]} Done."#;
    let value = extract_embedded_json(raw).unwrap();
    assert_eq!(value["inactive"][0]["reason"], "a {b}");
    assert_eq!(extract_embedded_json(r#"{"direct": true}"#).unwrap()["direct"], true);
    assert!(extract_embedded_json("no json at all").is_none());
}

#[test]
fn test_prose_is_failure_with_raw_text() {
    let raw = "You have quite a few tabs open about cooking.";
    let failure = parse_intent(raw).unwrap_err();
    assert_eq!(failure.into_raw(), raw);
}

#[test]
fn test_malformed_json_is_failure() {
    let raw = r#"{"action": "CLOSE_TABS", "tabIndices": [1, 2"#;
    assert!(parse_intent(raw).is_err());
    assert!(parse_intent("").is_err());
}

#[test]
fn test_non_object_json_is_failure() {
    assert!(parse_intent("[1, 2, 3]").is_err());
    assert!(parse_intent("\"CLOSE_TABS\"").is_err());
    assert!(parse_intent("42").is_err());
}

#[test]
fn test_unknown_action_is_unrecognized() {
    let intent = parse_intent(r#"{"action": "REOPEN_TABS", "message": "I can't do that."}"#).unwrap();
    assert_eq!(
        intent.action,
        IntentAction::Unrecognized {
            requested: Some("REOPEN_TABS".to_string())
        }
    );
    assert_eq!(intent.kind(), None);
    assert_eq!(intent.message_text(), "I can't do that.");
}

#[test]
fn test_missing_action_is_unrecognized() {
    let intent = parse_intent(r#"{"message": "Hello there"}"#).unwrap();
    assert_eq!(intent.action, IntentAction::Unrecognized { requested: None });
}

#[test]
fn test_action_aliases() {
    let analyze = parse_intent(r#"{"action": "ANALYZE", "message": "m"}"#).unwrap();
    assert_eq!(analyze.action, IntentAction::AnalyzeTabs);

    let categorize = parse_intent(
        r#"{"action": "categorize", "categories": [{"name": "Work", "tabs": [0, 1], "reason": "jira"}]}"#,
    )
    .unwrap();
    match categorize.action {
        IntentAction::CategorizeTabs { categories } => {
            assert_eq!(categories.len(), 1);
            assert_eq!(categories[0].name, "Work");
            assert_eq!(categories[0].tabs, vec![0, 1]);
            assert_eq!(categories[0].reason.as_deref(), Some("jira"));
        }
        other => panic!("unexpected action: {other:?}"),
    }
}

#[test]
fn test_lenient_indices() {
    let intent = parse_intent(r#"{"action": "CLOSE_TABS", "tabIndices": [0, "3", -1, 2.5, null, "x"]}"#).unwrap();
    assert_eq!(intent.action, IntentAction::CloseTabs { tab_indices: vec![0, 3] });

    let missing = parse_intent(r#"{"action": "KEEP_TABS"}"#).unwrap();
    assert_eq!(missing.action, IntentAction::KeepTabs { tab_indices: vec![] });
}

#[test]
fn test_save_tabs_optional_fields() {
    let all = parse_intent(r#"{"action": "SAVE_TABS_AS_BOOKMARKS", "folderName": "  "}"#).unwrap();
    assert_eq!(
        all.action,
        IntentAction::SaveTabsAsBookmarks {
            tab_indices: None,
            folder_name: None
        }
    );

    let some = parse_intent(r#"{"action": "SAVE_TABS_AS_BOOKMARKS", "tabIndices": [1], "folderName": "Research"}"#)
        .unwrap();
    assert_eq!(
        some.action,
        IntentAction::SaveTabsAsBookmarks {
            tab_indices: Some(vec![1]),
            folder_name: Some("Research".to_string())
        }
    );
}

#[test]
fn test_blank_bookmark_query_is_none() {
    let intent = parse_intent(r#"{"action": "LIST_BOOKMARKS", "bookmarkQuery": ""}"#).unwrap();
    assert_eq!(intent.action, IntentAction::ListBookmarks { bookmark_query: None });
}

#[test]
fn test_parse_categories_accepts_group_shape() {
    let value = serde_json::json!([
        {"category": "News", "tabs": [2]},
        {"name": "", "tabs": [1]},
        "not an object"
    ]);
    let categories = parse_categories(&value);
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "News");
}

#[test]
fn test_balanced_object_ignores_braces_in_strings() {
    let raw = r#"prefix {"message": "a } b", "nested": {"x": 1}} suffix"#;
    assert_eq!(
        balanced_object(raw),
        Some(r#"{"message": "a } b", "nested": {"x": 1}}"#)
    );
    assert_eq!(balanced_object("no braces"), None);
    assert_eq!(balanced_object("{ unterminated"), None);
}
