//! Subcommand handlers for tabwise.

use anyhow::bail;
use serde_json::Value;
use tracing::info;

use tabwise_assistant::snapshot_from;
use tabwise_protocols::store::SettingsStore;
use tabwise_protocols::types::{ExecutionResult, TurnRole};

use crate::app::App;
use crate::cli::{Commands, ConfigAction};

/// Dispatch one parsed command.
pub(crate) async fn run(app: &App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Ask { text, json } => ask(app, &text.join(" "), json).await,
        Commands::History { clear, json } => history(app, clear, json).await,
        Commands::Inactive => inactive(app).await,
        Commands::Categorize => categorize(app).await,
        Commands::Duplicates => duplicates(app).await,
        Commands::Stats { days } => stats(app, days).await,
        Commands::Analyze { days } => analyze(app, days).await,
        Commands::TestConnection => test_connection(app).await,
        Commands::Config { action } => config(app, action).await,
    }
}

async fn ask(app: &App, text: &str, json: bool) -> anyhow::Result<()> {
    let result = app.assistant.handle_request(text).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_result(app, &result);
    Ok(())
}

fn print_result(app: &App, result: &ExecutionResult) {
    if result.is_error() {
        eprintln!("{}", result.display_text());
        return;
    }
    println!("{}", result.display_text());

    if let Some(categories) = &result.categories {
        let tabs = snapshot_from(&app.browser.state().tabs);
        for category in categories {
            println!("\n{}", category.name);
            for &index in &category.tabs {
                match tabs.get(index) {
                    Some(tab) => println!("  [{}] {}", index, tab.title),
                    None => println!("  [{}]", index),
                }
            }
        }
    }
}

async fn history(app: &App, clear: bool, json: bool) -> anyhow::Result<()> {
    if clear {
        app.assistant.clear_history().await?;
        println!("Conversation history cleared.");
        return Ok(());
    }

    let turns = app.assistant.history().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&turns)?);
        return Ok(());
    }
    if turns.is_empty() {
        println!("No conversation history.");
        return Ok(());
    }

    for turn in &turns {
        let speaker = match turn.role {
            TurnRole::User => "you",
            TurnRole::Assistant => "assistant",
        };
        println!(
            "[{}] {}: {}",
            turn.timestamp.format("%Y-%m-%d %H:%M"),
            speaker,
            turn.content
        );
    }
    Ok(())
}

async fn inactive(app: &App) -> anyhow::Result<()> {
    let tabs = app.assistant.identify_inactive_tabs().await?;
    if tabs.is_empty() {
        println!("No inactive tabs found.");
        return Ok(());
    }

    println!("{} tab(s) could be closed:", tabs.len());
    for tab in &tabs {
        println!("  {} - {}", tab.title, tab.url);
        if !tab.reason.is_empty() {
            println!("    {}", tab.reason);
        }
    }
    Ok(())
}

async fn categorize(app: &App) -> anyhow::Result<()> {
    let categories = app.assistant.categorize_tabs().await?;
    if categories.is_empty() {
        println!("No categories found.");
        return Ok(());
    }

    let tabs = snapshot_from(&app.browser.state().tabs);
    for category in &categories {
        match &category.reason {
            Some(reason) => println!("{} ({})", category.name, reason),
            None => println!("{}", category.name),
        }
        for &index in &category.tabs {
            if let Some(tab) = tabs.get(index) {
                println!("  [{}] {} - {}", index, tab.title, tab.domain);
            }
        }
    }
    Ok(())
}

async fn duplicates(app: &App) -> anyhow::Result<()> {
    let groups = app.assistant.find_duplicate_bookmarks().await?;
    if groups.is_empty() {
        println!("No duplicate bookmarks found.");
        return Ok(());
    }

    for group in &groups {
        println!("{} ({} bookmarks)", group.url, group.count);
        for bookmark in &group.bookmarks {
            println!("  - {} [{}]", bookmark.title, bookmark.id);
        }
    }
    Ok(())
}

async fn stats(app: &App, days: u32) -> anyhow::Result<()> {
    let stats = app.assistant.browsing_statistics(days).await?;

    println!("Last {} day(s):", stats.days);
    println!("  Total visits:       {}", stats.total_visits);
    println!("  Unique domains:     {}", stats.unique_domains);
    println!("  Visits per day:     {}", stats.avg_visits_per_day);
    if !stats.top_domains.is_empty() {
        println!("  Top domains:");
        for domain in &stats.top_domains {
            println!("    {:<30} {}", domain.domain, domain.visit_count);
        }
    }
    Ok(())
}

async fn analyze(app: &App, days: u32) -> anyhow::Result<()> {
    let analysis = app.assistant.analyze_browsing(days).await?;

    if !analysis.insights.top_categories.is_empty() {
        println!("Top categories: {}", analysis.insights.top_categories.join(", "));
    }
    println!("Productivity score: {}/100", analysis.insights.productivity_score);
    for recommendation in &analysis.recommendations {
        println!("  - {}", recommendation);
    }
    Ok(())
}

async fn test_connection(app: &App) -> anyhow::Result<()> {
    let result = app.provider.test_connection().await;
    if !result.success {
        bail!("Connection failed: {}", result.message);
    }

    match &result.model {
        Some(model) => println!("{} (model: {})", result.message, model),
        None => println!("{}", result.message),
    }
    Ok(())
}

async fn config(app: &App, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            match app.settings.get(&key).await? {
                Some(Value::String(s)) => println!("{}", s),
                Some(value) => println!("{}", value),
                None => println!("(unset)"),
            }
        }
        ConfigAction::Set { key, value } => {
            app.settings.set(&key, Value::String(value)).await?;
            info!("Setting {} updated", key);
            println!("{} updated.", key);
        }
    }
    Ok(())
}
