use crate::config::Config;
use clap::{ArgAction, Args};
use std::path::PathBuf;

// Global flags shared across every subcommand.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Path to a config.toml file
    #[arg(
        short = 'c',
        long,
        value_name = "PATH",
        env = "TESTFORGE_CONFIG",
        global = true
    )]
    pub config: Option<PathBuf>,

    /// Directory for generated artifacts (default: ./output)
    #[arg(
        long = "output-dir",
        value_name = "DIR",
        env = "TESTFORGE_OUTPUT_DIR",
        global = true
    )]
    pub output_dir: Option<PathBuf>,

    /// LLM provider id (google, openai, ollama, custom)
    #[arg(long, value_name = "ID", env = "TESTFORGE_PROVIDER", global = true)]
    pub provider: Option<String>,

    /// Model name override
    #[arg(long, value_name = "MODEL", env = "TESTFORGE_MODEL", global = true)]
    pub model: Option<String>,

    /// Disable coloured terminal output (the NO_COLOR environment variable
    /// is honoured separately, with any non-empty value)
    #[arg(long = "no-color", action = ArgAction::SetTrue, global = true)]
    pub no_color: bool,
}

impl CommonArgs {
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone()
    }

    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }

        if let Some(provider) = &self.provider {
            if *provider != config.provider {
                // A provider switch invalidates a configured model name.
                config.model = None;
            }
            config.provider = provider.clone();
        }

        if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_args() -> CommonArgs {
        CommonArgs {
            config: None,
            output_dir: None,
            provider: None,
            model: None,
            no_color: false,
        }
    }

    #[test]
    fn overrides_replace_config_fields() {
        let mut config = Config::default();
        let mut args = bare_args();
        args.output_dir = Some(PathBuf::from("/tmp/artifacts"));
        args.provider = Some("openai".to_string());
        args.model = Some("gpt-4.1".to_string());

        args.apply_overrides(&mut config);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/artifacts"));
        assert_eq!(config.provider, "openai");
        assert_eq!(config.model.as_deref(), Some("gpt-4.1"));
    }

    #[test]
    fn provider_switch_clears_stale_model() {
        let mut config = Config::default();
        config.model = Some("gemini-2.5-flash".to_string());
        let mut args = bare_args();
        args.provider = Some("openai".to_string());

        args.apply_overrides(&mut config);
        assert_eq!(config.provider, "openai");
        assert!(config.model.is_none());
    }
}
