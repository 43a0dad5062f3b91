use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use reqwest::Client;

use crate::chat::{self, Model};
use crate::config::Config;
use crate::search::{self, DEFAULT_MAX_RESULTS, DEFAULT_MAX_TOKENS_PER_PAGE, SearchRequest};

#[derive(Parser)]
#[command(name = "plx", about = "Perplexity API client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands. The `///` doc comments double as `--help` text.
#[derive(Subcommand)]
pub enum Commands {
    /// General question answering with web search
    Ask {
        /// Your question
        query: String,
    },
    /// Deep research and comprehensive analysis
    Research {
        /// Research topic or question
        query: String,
        /// Remove <think>...</think> tags from the response
        #[arg(long)]
        strip_thinking: bool,
    },
    /// Advanced reasoning and problem-solving
    Reason {
        /// Reasoning task or problem
        query: String,
        /// Remove <think>...</think> tags from the response
        #[arg(long)]
        strip_thinking: bool,
    },
    /// Web search with ranked results
    Search {
        /// Search query
        query: String,
        /// Maximum number of results (1-20)
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: u32,
        /// Maximum tokens per page (256-2048)
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS_PER_PAGE)]
        max_tokens_per_page: u32,
        /// ISO country code for regional results (e.g. JP, US)
        #[arg(long)]
        country: Option<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}

/// Prints top-level usage to stdout, for the no-subcommand path.
pub fn print_help() -> Result<()> {
    Cli::command().print_help()?;
    Ok(())
}

/// Routes a subcommand to its flow and prints the rendered output. Errors
/// bubble up to the binary boundary, which reports them and exits non-zero.
pub async fn run(command: Commands, client: &Client, cfg: &Config) -> Result<()> {
    match command {
        Commands::Ask { query } => {
            let answer = chat::chat_completion(client, cfg, &query, Model::SonarPro, false).await?;
            println!("{}", answer);
        }
        Commands::Research {
            query,
            strip_thinking,
        } => {
            let answer =
                chat::chat_completion(client, cfg, &query, Model::SonarDeepResearch, strip_thinking)
                    .await?;
            println!("{}", answer);
        }
        Commands::Reason {
            query,
            strip_thinking,
        } => {
            let answer =
                chat::chat_completion(client, cfg, &query, Model::SonarReasoningPro, strip_thinking)
                    .await?;
            println!("{}", answer);
        }
        Commands::Search {
            query,
            max_results,
            max_tokens_per_page,
            country,
        } => {
            let request = SearchRequest {
                query,
                max_results,
                max_tokens_per_page,
                country,
            };
            let listing = search::web_search(client, cfg, &request).await?;
            print!("{}", listing);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands};

    #[test]
    fn parses_ask_with_query() {
        let cli = Cli::parse_from(["plx", "ask", "What is the capital of France?"]);
        match cli.command {
            Some(Commands::Ask { query }) => {
                assert_eq!(query, "What is the capital of France?");
            }
            _ => panic!("expected ask subcommand"),
        }
    }

    #[test]
    fn strip_thinking_defaults_off_and_parses_on() {
        let cli = Cli::parse_from(["plx", "research", "topic"]);
        match cli.command {
            Some(Commands::Research { strip_thinking, .. }) => assert!(!strip_thinking),
            _ => panic!("expected research subcommand"),
        }

        let cli = Cli::parse_from(["plx", "reason", "puzzle", "--strip-thinking"]);
        match cli.command {
            Some(Commands::Reason { strip_thinking, .. }) => assert!(strip_thinking),
            _ => panic!("expected reason subcommand"),
        }
    }

    #[test]
    fn search_defaults_and_overrides() {
        let cli = Cli::parse_from(["plx", "search", "rust"]);
        match cli.command {
            Some(Commands::Search {
                max_results,
                max_tokens_per_page,
                country,
                ..
            }) => {
                assert_eq!(max_results, 10);
                assert_eq!(max_tokens_per_page, 1024);
                assert_eq!(country, None);
            }
            _ => panic!("expected search subcommand"),
        }

        let cli = Cli::parse_from([
            "plx",
            "search",
            "rust",
            "--max-results",
            "3",
            "--max-tokens-per-page",
            "256",
            "--country",
            "JP",
        ]);
        match cli.command {
            Some(Commands::Search {
                query,
                max_results,
                max_tokens_per_page,
                country,
            }) => {
                assert_eq!(query, "rust");
                assert_eq!(max_results, 3);
                assert_eq!(max_tokens_per_page, 256);
                assert_eq!(country.as_deref(), Some("JP"));
            }
            _ => panic!("expected search subcommand"),
        }
    }

    #[test]
    fn no_subcommand_parses_as_none() {
        let cli = Cli::parse_from(["plx"]);
        assert!(cli.command.is_none());
    }
}
