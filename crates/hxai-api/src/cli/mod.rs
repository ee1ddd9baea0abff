//! CLI command definitions for the `hxai` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod document;
pub mod generate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Generate HTML fragments with a language model and splice them into a page.
#[derive(Parser)]
#[command(name = "hxai", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (defaults to ./hxai.toml).
    #[arg(long, global = true, env = "HXAI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of plain text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(
        long,
        global = true,
        env = "HXAI_OTEL",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on (overrides the config file).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides the config file).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate a fragment once and print it.
    #[command(alias = "gen")]
    Generate {
        /// What to build.
        prompt: String,

        /// Element id to patch in the stored document.
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Restore the stored document to the starting template.
    Reset,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_with_global_flags() {
        let cli = Cli::try_parse_from([
            "hxai", "generate", "a red button", "--target", "hero", "--json", "-vv",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate { prompt, target } => {
                assert_eq!(prompt, "a red button");
                assert_eq!(target.as_deref(), Some("hero"));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["hxai", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(8080));
                assert_eq!(host, None);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_generate_requires_prompt() {
        assert!(Cli::try_parse_from(["hxai", "generate"]).is_err());
    }
}
