use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vetquick")]
#[command(author, version, about = "Pet symptom triage chat with a local consultation log", long_about = None)]
pub struct Cli {
    /// SQLite file for saved records (overrides storage.db_path)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start a symptom consultation (default)
    Chat {
        /// Keep the transcript when a save is declined
        #[arg(long, conflicts_with = "reset_on_decline")]
        keep_history: bool,

        /// Clear the transcript when a save is declined
        #[arg(long)]
        reset_on_decline: bool,
    },

    /// Show records saved today
    Today,

    /// Show every saved record, newest first
    History,

    /// Settings (not available yet)
    Settings,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Chat {
            keep_history: false,
            reset_on_decline: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["vetquick"]).unwrap();
        assert_eq!(cli.command.unwrap_or_default(), Commands::default());
    }

    #[test]
    fn test_global_db_flag() {
        let cli = Cli::try_parse_from(["vetquick", "history", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.command, Some(Commands::History));
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }

    #[test]
    fn test_discard_flags_conflict() {
        let result =
            Cli::try_parse_from(["vetquick", "chat", "--keep-history", "--reset-on-decline"]);
        assert!(result.is_err());
    }
}
