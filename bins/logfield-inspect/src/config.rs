use clap::{Args, Parser, Subcommand};
use logfield_engine::DispatchConfig;
use serde::Deserialize;

use crate::error::InspectError;

#[derive(Parser)]
#[command(name = "logfield-inspect", about = "Inspect the log field serializer catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every registered handler and where it landed in the registry
    Catalog(CatalogArgs),
    /// Build the registry and serialize a set of sample log fields
    Check(CheckArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    /// Path to the TOML config file. Defaults apply when omitted.
    #[arg(long, env = "LOGFIELD_CONFIG")]
    pub config: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct CatalogArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Clone, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Degrade unknown values to text even if the config says to fail
    #[arg(long)]
    pub fallback: bool,
}

// ---- TOML Config ----

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InspectConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl InspectConfig {
    pub fn load(args: &ConfigArgs) -> Result<Self, InspectError> {
        let Some(path) = &args.config else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|e| InspectError::Config {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| InspectError::Config {
            path: path.clone(),
            detail: e.to_string(),
        })
    }

    pub fn parse(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[cfg(test)]
mod tests {
    use logfield_engine::{DuplicatePolicy, OnUnknown};

    use super::*;

    #[test]
    fn dispatch_table_is_optional() {
        let cfg = InspectConfig::parse("").unwrap();
        assert_eq!(cfg.dispatch, DispatchConfig::default());
    }

    #[test]
    fn reads_dispatch_table() {
        let cfg = InspectConfig::parse(
            r#"
            [dispatch]
            raise_on_unknown = false
            duplicate_types = "reject"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.dispatch.on_unknown(), OnUnknown::Fallback);
        assert_eq!(cfg.dispatch.duplicate_types, DuplicatePolicy::Reject);
    }

    #[test]
    fn missing_file_names_path() {
        let args = ConfigArgs {
            config: Some("/nonexistent/logfield.toml".into()),
        };
        let err = InspectConfig::load(&args).unwrap_err();
        assert!(err.to_string().starts_with("config (/nonexistent/logfield.toml):"));
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["logfield-inspect", "check", "--fallback"]).unwrap();
        assert!(matches!(cli.command, Commands::Check(CheckArgs { fallback: true, .. })));
    }
}
