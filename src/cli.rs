//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;
use crate::core::render::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "ygo-deckdb", version)]
#[command(about = "Generate a Yu-Gi-Oh! card database from a deck list, correcting misspelled card names")]
pub struct Args {
    /// Deck list with one card name per line (built-in sample deck if omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file for the generated database
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write a list of corrected card names to this file
    #[arg(short, long)]
    pub corrections: Option<PathBuf>,

    /// Number of cards resolved concurrently
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Directory for cached API responses
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Always fetch from the API
    #[arg(long)]
    pub no_cache: bool,

    /// Clear the response cache before running
    #[arg(long)]
    pub clear_cache: bool,

    /// Minimum similarity for fuzzy matches, in (0, 1]
    #[arg(long)]
    pub similarity_threshold: Option<f64>,

    /// Extra TOML config file, layered over the user config
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write JSON logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Apply flags on top of the file and environment layers.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.output {
            config.output.path = path.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(path) = &self.corrections {
            config.output.corrections_path = Some(path.clone());
        }
        if let Some(threads) = self.threads {
            config.runtime.max_workers = threads;
        }
        if let Some(dir) = &self.cache_dir {
            config.client.cache_dir = dir.clone();
        }
        if self.no_cache {
            config.client.use_cache = false;
        }
        if let Some(threshold) = self.similarity_threshold {
            config.resolution.similarity_threshold = threshold;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "ygo-deckdb",
            "-i",
            "deck.txt",
            "-f",
            "json",
            "-t",
            "8",
            "--no-cache",
            "--similarity-threshold",
            "0.85",
            "-c",
            "fixes.txt",
            "-vv",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(args.input, Some(PathBuf::from("deck.txt")));
        assert_eq!(args.verbose, 2);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.runtime.max_workers, 8);
        assert!(!config.client.use_cache);
        assert_eq!(config.resolution.similarity_threshold, 0.85);
        assert_eq!(config.output.corrections_path, Some(PathBuf::from("fixes.txt")));
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::try_parse_from(["ygo-deckdb"]).unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Args::try_parse_from(["ygo-deckdb", "--format", "yaml"]).is_err());
    }
}
