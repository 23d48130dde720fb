// SPDX-License-Identifier: MIT
//
// Configuration: optional TOML file at `~/.kilo/config.toml`.
//
// Every key is optional and a missing file means "all defaults":
//
//   banner            = "Kilo editor -- version 0.1.0"
//   read_timeout_ds   = 1      # raw-mode read timeout, deciseconds
//   probe_scratch_len = 31     # max bytes read for a cursor report
//   log_level         = "info" # tracing filter directive
//
// A file that exists but cannot be read or parsed is reported to the caller,
// which logs it and carries on with defaults. Configuration never stops the
// editor from starting.

use std::fs;
use std::path::{Path, PathBuf};

use kilo_term::probe::MAX_REPORT_LEN;
use kilo_term::terminal::DEFAULT_READ_TIMEOUT_DS;
use serde::Deserialize;
use thiserror::Error;

/// Smallest useful cursor-report scratch area: `ESC [ 1 ; 1 R` plus slack.
const MIN_PROBE_SCRATCH_LEN: usize = 8;

/// Why the config file was ignored.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Editor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Welcome banner; `None` uses the built-in one.
    pub banner: Option<String>,
    /// Raw-mode `VTIME`, in deciseconds.
    pub read_timeout_ds: u8,
    /// Upper bound on the cursor-report reply.
    pub probe_scratch_len: usize,
    /// `tracing` filter directive for the log file.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            banner: None,
            read_timeout_ds: DEFAULT_READ_TIMEOUT_DS,
            probe_scratch_len: MAX_REPORT_LEN,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load `~/.kilo/config.toml`, or defaults if there is none.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load() -> Result<Self, ConfigError> {
        match kilo_dir() {
            Some(dir) => Self::load_from(&dir.join("config.toml")),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The banner text to draw.
    #[must_use]
    pub fn banner(&self) -> String {
        self.banner
            .clone()
            .unwrap_or_else(kilo_editor::default_banner)
    }

    /// Read timeout, never zero.
    #[must_use]
    pub fn read_timeout_ds(&self) -> u8 {
        self.read_timeout_ds.max(1)
    }

    /// Cursor-report scratch length, within what the parser accepts.
    #[must_use]
    pub fn probe_scratch_len(&self) -> usize {
        self.probe_scratch_len
            .clamp(MIN_PROBE_SCRATCH_LEN, MAX_REPORT_LEN)
    }
}

/// `~/.kilo`, if a home directory is known.
#[must_use]
pub fn kilo_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(".kilo"))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Config {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(parse(""), Config::default());
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.read_timeout_ds(), 1);
        assert_eq!(config.probe_scratch_len(), 31);
        assert_eq!(config.log_level, "info");
        assert!(config.banner().starts_with("Kilo editor -- version "));
    }

    #[test]
    fn every_key_is_read() {
        let config = parse(
            r#"
            banner = "hello"
            read_timeout_ds = 5
            probe_scratch_len = 16
            log_level = "debug"
            "#,
        );
        assert_eq!(config.banner(), "hello");
        assert_eq!(config.read_timeout_ds(), 5);
        assert_eq!(config.probe_scratch_len(), 16);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse("read_timeout_ds = 3");
        assert_eq!(config.read_timeout_ds(), 3);
        assert_eq!(config.probe_scratch_len(), 31);
        assert_eq!(config.banner, None);
    }

    #[test]
    fn zero_timeout_is_raised() {
        assert_eq!(parse("read_timeout_ds = 0").read_timeout_ds(), 1);
    }

    #[test]
    fn scratch_len_is_clamped() {
        assert_eq!(parse("probe_scratch_len = 1").probe_scratch_len(), 8);
        assert_eq!(parse("probe_scratch_len = 4096").probe_scratch_len(), 31);
    }

    #[test]
    fn out_of_range_timeout_is_a_parse_error() {
        assert!(toml::from_str::<Config>("read_timeout_ds = 300").is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("colour = \"red\"").is_err());
    }

    #[test]
    fn missing_file_is_defaults() {
        let path = Path::new("/nonexistent/kilo/config.toml");
        assert_eq!(Config::load_from(path).unwrap(), Config::default());
    }

    #[test]
    fn unparsable_file_names_the_path() {
        let path = std::env::temp_dir().join(format!("kilo-config-{}.toml", std::process::id()));
        fs::write(&path, "banner = [").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        let _ = fs::remove_file(&path);

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("kilo-config-"));
    }
}
