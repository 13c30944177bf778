//! `cclib::config`: the small piece of ambient configuration the facade needs to find proof keys
//! and pick default proof-of-work/rounding parameters, loaded with the same layered-precedence
//! pattern as the teacher's `ZalletConfig::load` (env overrides file overrides built-in default).
//! This is not a blockchain consensus-parameters file; those are out of scope.

use std::path::PathBuf;

use config::{Config as RawConfig, Environment, File};
use serde::{Deserialize, Serialize};

use crate::amount::Rounding;
use crate::error::{ErrorKind, Result, err};

/// Default proof-of-work difficulty used when neither a config file nor `CCLIB_POW_DIFFICULTY`
/// names one.
pub const DEFAULT_POW_DIFFICULTY: u64 = 1;
/// Default PoW timestamp acceptance window, in seconds, looking into the past and future.
pub const DEFAULT_POW_PAST_WINDOW_SECS: u32 = 60 * 60;
pub const DEFAULT_POW_FUTURE_WINDOW_SECS: u32 = 60 * 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// Directory `cclib::keys::KeyStore` loads prove/verify key files from. `None` means the
    /// store is never populated from disk (callers must supply keys directly).
    pub proof_key_dir: Option<PathBuf>,
    pub pow_difficulty: u64,
    pub pow_past_window_secs: u32,
    pub pow_future_window_secs: u32,
    pub default_rounding: Rounding,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            proof_key_dir: None,
            pow_difficulty: DEFAULT_POW_DIFFICULTY,
            pow_past_window_secs: DEFAULT_POW_PAST_WINDOW_SECS,
            pow_future_window_secs: DEFAULT_POW_FUTURE_WINDOW_SECS,
            default_rounding: Rounding::Closest,
        }
    }
}

impl Config {
    /// Loads a `Config` with the teacher's precedence: built-in default, overlaid by an optional
    /// TOML file, overlaid by `CCLIB_*` environment variables (`CCLIB_POW_DIFFICULTY`,
    /// `CCLIB_PROOF_KEY_DIR`, and so on; nested keys use `__` as the separator).
    pub fn load(file_path: Option<&std::path::Path>) -> Result<Self> {
        let mut builder = RawConfig::builder().add_source(RawConfig::try_from(&Config::default())?);
        if let Some(path) = file_path {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder = builder.add_source(Environment::with_prefix("CCLIB").separator("__"));

        let raw = builder.build().map_err(|e| err!(ErrorKind::InvalidConfig, "loading configuration: {e}"))?;
        raw.try_deserialize().map_err(|e| err!(ErrorKind::InvalidConfig, "parsing configuration: {e}"))
    }
}
