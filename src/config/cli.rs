use crate::config::toml_config::CourseConfig;
use crate::core::normalizer::NormalizationMode;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "course-etl")]
#[command(about = "Recover structured mini-courses from generator output")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the normalization mode from the config
    #[arg(long, value_enum, global = true)]
    pub mode: Option<NormalizationMode>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, global = true, help = "Print the document on a single line")]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the recovery pipeline over a saved raw response
    Parse {
        /// File holding the raw response, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },
    /// Ask the generator webhook for a course, then recover it
    Generate {
        #[arg(short, long)]
        theme: String,

        #[arg(long)]
        endpoint: Option<String>,

        #[arg(long)]
        attempts: Option<u32>,
    },
}

impl CliConfig {
    /// Loads the config file (or defaults), applies flag overrides and validates.
    pub fn resolve(&self) -> Result<CourseConfig> {
        let mut config = match &self.config {
            Some(path) => CourseConfig::from_file(path)?,
            None => CourseConfig::default(),
        };

        if let Some(mode) = self.mode {
            tracing::info!("🔧 Normalization mode overridden to: {}", mode);
            config.normalization.mode = mode;
        }
        if self.compact {
            config.output.pretty = false;
        }
        if let Command::Generate {
            endpoint, attempts, ..
        } = &self.command
        {
            if let Some(endpoint) = endpoint {
                config.source.endpoint = endpoint.clone();
            }
            if let Some(attempts) = attempts {
                config.source.attempts = *attempts;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommand_defaults_to_stdin() {
        let cli = CliConfig::try_parse_from(["course-etl", "parse"]).unwrap();
        match cli.command {
            Command::Parse { input } => assert_eq!(input, PathBuf::from("-")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_generate_overrides_config() {
        let cli = CliConfig::try_parse_from([
            "course-etl",
            "generate",
            "--theme",
            "Photosynthesis",
            "--endpoint",
            "https://hooks.example.com/course",
            "--attempts",
            "3",
            "--mode",
            "strict",
            "--compact",
        ])
        .unwrap();

        let config = cli.resolve().unwrap();
        assert_eq!(config.source.endpoint, "https://hooks.example.com/course");
        assert_eq!(config.source.attempts, 3);
        assert_eq!(config.normalization.mode, NormalizationMode::Strict);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let cli = CliConfig::try_parse_from([
            "course-etl",
            "generate",
            "--theme",
            "x",
            "--endpoint",
            "not a url",
        ])
        .unwrap();
        assert!(cli.resolve().is_err());
    }

    #[test]
    fn test_unknown_mode_rejected_by_parser() {
        assert!(CliConfig::try_parse_from(["course-etl", "--mode", "lenient", "parse"]).is_err());
    }
}
