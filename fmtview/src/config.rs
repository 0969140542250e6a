//! User configuration.
//!
//! Read once at startup from `$XDG_CONFIG_HOME/fmtview/config.toml` (or the
//! `--config` path). Every key is optional. A missing file means defaults; a
//! malformed one is logged and ignored.

use std::path::{Path, PathBuf};

use fmtview_core::FormatOptions;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self { command: "prettier".to_owned(), args: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: String,
    pub format: FormatOptions,
    pub formatter: FormatterConfig,
    pub debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            format: FormatOptions::default(),
            formatter: FormatterConfig::default(),
            debounce_ms: 500,
        }
    }
}

/// Returns the path to the fmtview config file.
///
/// Prefers `$XDG_CONFIG_HOME/fmtview/config.toml`; falls back to
/// `~/.config/fmtview/config.toml` when the env var is absent.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("fmtview").join("config.toml")
}

pub fn parse(raw: &str) -> Result<Config, toml::de::Error> {
    let mut config: Config = toml::from_str(raw)?;
    config.format = config.format.normalized();
    Ok(config)
}

pub fn load(path: &Path) -> Config {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            log::debug!("no config at {}: {e}", path.display());
            return Config::default();
        }
    };
    match parse(&raw) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("config parse error in {}: {e}", path.display());
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmtview_core::options::{TabWidth, TrailingComma};

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let raw = r#"
            theme = "dark"
            debounce_ms = 250

            [format]
            tab_width = 4
            trailing_comma = "all"
            print_width = 500

            [formatter]
            command = "npx"
            args = ["prettier"]
        "#;
        let config = parse(raw).unwrap();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.format.tab_width, TabWidth::Four);
        assert_eq!(config.format.trailing_comma, TrailingComma::All);
        assert_eq!(config.format.print_width, 200);
        assert!(config.format.semicolons);
        assert_eq!(config.formatter.command, "npx");
        assert_eq!(config.formatter.args, vec!["prettier".to_owned()]);
    }

    #[test]
    fn bad_tab_width_is_rejected() {
        assert!(parse("[format]\ntab_width = 3").is_err());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let config = load(Path::new("/nonexistent/fmtview/config.toml"));
        assert_eq!(config, Config::default());
    }
}
