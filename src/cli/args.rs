//! CLI argument definitions using clap derive

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cript-ingest")]
#[command(author, version, about = "Upload polymer materials from a CSV file into CRIPT")]
#[command(long_about = "Reads diblock polymer simulation records from a CSV file and uploads one \
material per row into a CRIPT inventory, creating or updating the inventory and its materials by name. \
Settings missing from config.yaml are asked for interactively.")]
pub struct Cli {
    /// Config file with host, token, group, project, collection, inventory, public and path
    #[arg(long, short = 'c', env = "CRIPT_INGEST_CONFIG", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Fail on missing settings instead of prompting for them
    #[arg(long)]
    pub no_prompt: bool,

    /// Run against an in-memory repository; nothing is sent to the server
    #[arg(long)]
    pub dry_run: bool,

    /// Print a CSV template with the expected columns and exit
    #[arg(long)]
    pub template: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress per-row output and logs
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable diagnostic logs (honours RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["cript-ingest"]).unwrap();
        assert!(!cli.dry_run);
        assert!(!cli.no_prompt);
        assert!(!cli.global.quiet);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["cript-ingest", "-q", "-v"]).is_err());
    }
}
