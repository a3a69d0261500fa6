//! CLI definitions for tabwise.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Longest look-back window accepted by `stats` and `analyze` (100 years).
const MAX_DAYS: i64 = 36_500;

/// tabwise CLI.
#[derive(Parser)]
#[command(name = "tabwise")]
#[command(about = "Manage browser tabs and bookmarks with natural-language requests")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.tabwise/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Browser state file with tabs, bookmarks and history (default: ~/.tabwise/browser.json)
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Send a request to the assistant
    Ask {
        /// Request text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or clear the conversation history
    History {
        /// Remove every stored turn
        #[arg(long)]
        clear: bool,

        /// Print turns as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest stale tabs to close
    Inactive,

    /// Group open tabs by topic
    Categorize,

    /// List bookmarks that share a URL
    Duplicates,

    /// Show visit statistics
    Stats {
        /// Number of days to look back
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=MAX_DAYS))]
        days: u32,
    },

    /// Ask the model to characterise recent browsing
    Analyze {
        /// Number of days to look back
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=MAX_DAYS))]
        days: u32,
    },

    /// Check that the chat API answers
    TestConnection,

    /// Read or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Print a setting
    Get {
        /// Setting key (apiBaseUrl, apiKey, apiModel, tabInactiveThreshold, tabKeepKeywords)
        key: String,
    },

    /// Change a setting and save the config file
    Set {
        /// Setting key
        key: String,

        /// New value
        value: String,
    },
}

impl Commands {
    /// Whether the command can change the browser state.
    pub(crate) fn mutates_browser(&self) -> bool {
        matches!(self, Commands::Ask { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_joins_words() {
        let cli = Cli::try_parse_from(["tabwise", "ask", "close", "all", "news", "tabs"]).unwrap();
        match cli.command {
            Commands::Ask { text, json } => {
                assert_eq!(text.join(" "), "close all news tabs");
                assert!(!json);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_global_paths() {
        let cli = Cli::try_parse_from([
            "tabwise",
            "stats",
            "--days",
            "3",
            "--state",
            "/tmp/b.json",
            "--config",
            "/tmp/c.toml",
        ])
        .unwrap();
        assert_eq!(cli.state.as_deref(), Some(std::path::Path::new("/tmp/b.json")));
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/c.toml")));
        assert!(matches!(cli.command, Commands::Stats { days: 3 }));
        assert!(!cli.command.mutates_browser());
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from(["tabwise", "config", "set", "tabInactiveThreshold", "45"]).unwrap();
        match cli.command {
            Commands::Config {
                action: ConfigAction::Set { key, value },
            } => {
                assert_eq!(key, "tabInactiveThreshold");
                assert_eq!(value, "45");
            }
            _ => panic!("expected config set"),
        }
    }

    #[test]
    fn test_days_range() {
        assert!(Cli::try_parse_from(["tabwise", "stats", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["tabwise", "analyze", "--days", "4294967295"]).is_err());
        let cli = Cli::try_parse_from(["tabwise", "analyze", "--days", "36500"]).unwrap();
        assert!(matches!(cli.command, Commands::Analyze { days: 36_500 }));
        let cli = Cli::try_parse_from(["tabwise", "stats"]).unwrap();
        assert!(matches!(cli.command, Commands::Stats { days: 7 }));
    }

    #[test]
    fn test_ask_requires_text() {
        assert!(Cli::try_parse_from(["tabwise", "ask"]).is_err());
    }
}
