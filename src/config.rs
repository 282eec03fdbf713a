//! Scanner configuration
//!
//! Settings follow zbar's `symbology.name=value` form, e.g. `qrcode.disable`,
//! `code128.enable=1`, `*.disable` or `binarizer.window=41`. Environment
//! variables layer on top of the defaults through [`ScanConfig::from_env`].

use std::str::FromStr;

use crate::error::{Result, ScanError};
use crate::models::{SymbologySet, SymbologyType};
use crate::utils::binarization::BinarizerConfig;

/// Comma separated list of enabled symbologies
pub const ENV_SYMBOLOGIES: &str = "BARCODE_SYMBOLOGIES";
/// Binarizer window side in pixels
pub const ENV_BINARIZE_WINDOW: &str = "BARCODE_BINARIZE_WINDOW";
/// Binarizer margin below the local mean
pub const ENV_BINARIZE_MARGIN: &str = "BARCODE_BINARIZE_MARGIN";
/// Non-zero to scan symbologies in parallel
pub const ENV_PARALLEL: &str = "BARCODE_PARALLEL";

/// Everything a [`ScanEngine`](crate::ScanEngine) can be tuned with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Symbologies to look for
    pub symbologies: SymbologySet,
    /// Thresholding parameters
    pub binarizer: BinarizerConfig,
    /// Run the enabled symbologies on the rayon pool
    pub parallel: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            symbologies: SymbologySet::all(),
            binarizer: BinarizerConfig::default(),
            parallel: false,
        }
    }
}

impl ScanConfig {
    /// Configuration restricted to `symbologies`
    pub fn with_symbologies(symbologies: impl IntoIterator<Item = SymbologyType>) -> Self {
        Self {
            symbologies: symbologies.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Apply one `target.name[=value]` setting
    ///
    /// Targets are a symbology name, `*` for every symbology, `binarizer`
    /// (`window`, `margin`) or `scanner` (`parallel`). A missing value means 1.
    pub fn apply_setting(&mut self, setting: &str) -> Result<()> {
        let invalid = || ScanError::InvalidConfig(format!("malformed setting '{setting}'"));
        let (key, value) = match setting.split_once('=') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (setting.trim(), "1"),
        };
        let (target, name) = key.split_once('.').ok_or_else(invalid)?;

        match (target.to_ascii_lowercase().as_str(), name.to_ascii_lowercase().as_str()) {
            ("binarizer", "window") => self.binarizer.window = parse_value(setting, value)?,
            ("binarizer", "margin") => self.binarizer.margin = parse_value(setting, value)?,
            ("scanner", "parallel") => self.parallel = parse_flag(setting, value)?,
            (target, switch @ ("enable" | "disable")) => {
                let on = parse_flag(setting, value)? == (switch == "enable");
                let targets: Vec<SymbologyType> = if target == "*" {
                    SymbologyType::ALL.to_vec()
                } else {
                    vec![target.parse()?]
                };
                for symbology in targets {
                    if on {
                        self.symbologies.insert(symbology);
                    } else {
                        self.symbologies.remove(symbology);
                    }
                }
            }
            _ => return Err(invalid()),
        }
        Ok(())
    }

    /// Defaults overridden by the `BARCODE_*` environment variables
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `BARCODE_*` names
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(list) = lookup(ENV_SYMBOLOGIES) {
            let parsed: std::result::Result<Vec<SymbologyType>, _> = list
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(SymbologyType::from_str)
                .collect();
            if let Ok(symbologies) = parsed {
                config.symbologies = symbologies.into_iter().collect();
            }
        }
        if let Some(window) = parse_var(&lookup, ENV_BINARIZE_WINDOW) {
            config.binarizer.window = window;
        }
        if let Some(margin) = parse_var(&lookup, ENV_BINARIZE_MARGIN) {
            config.binarizer.margin = margin;
        }
        if let Some(parallel) = parse_var::<u8>(&lookup, ENV_PARALLEL) {
            config.parallel = parallel != 0;
        }
        config
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|v| v.trim().parse::<T>().ok())
}

fn parse_value<T: FromStr>(setting: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ScanError::InvalidConfig(format!("bad value in '{setting}'")))
}

fn parse_flag(setting: &str, value: &str) -> Result<bool> {
    parse_value::<u8>(setting, value).map(|v| v != 0)
}
