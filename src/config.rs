//! Host configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use review_canvas::config::{CanvasConfig, CanvasVariant};

use crate::error::HostError;

pub const DEFAULT_SCAN_LATENCY_MS: u64 = 2500;
pub const DEFAULT_SETTLE_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub variant: CanvasVariant,
    /// Simulated annotation latency per item.
    pub scan_latency: Duration,
    /// Upper bound on waiting for outstanding scans at the end of a session.
    pub settle_timeout: Duration,
    /// JSON session script; the built-in demo runs when absent.
    pub script: Option<PathBuf>,
    pub bring_to_front: bool,
}

impl HostConfig {
    /// Build typed host config from environment variables.
    ///
    /// Optional:
    /// - `REVIEW_VARIANT`: `board` (default) or `single`
    /// - `REVIEW_SCAN_LATENCY_MS`: default 2500
    /// - `REVIEW_SETTLE_TIMEOUT_MS`: default 10000
    /// - `REVIEW_SCRIPT`: path to a session script
    /// - `REVIEW_BRING_TO_FRONT`: `true` or `false` (default)
    pub fn from_env() -> Result<Self, HostError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HostError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let variant = parse_variant(lookup("REVIEW_VARIANT").as_deref())?;
        let scan_latency = Duration::from_millis(parse_u64(
            "REVIEW_SCAN_LATENCY_MS",
            lookup("REVIEW_SCAN_LATENCY_MS").as_deref(),
            DEFAULT_SCAN_LATENCY_MS,
        )?);
        let settle_timeout = Duration::from_millis(parse_u64(
            "REVIEW_SETTLE_TIMEOUT_MS",
            lookup("REVIEW_SETTLE_TIMEOUT_MS").as_deref(),
            DEFAULT_SETTLE_TIMEOUT_MS,
        )?);
        let script = lookup("REVIEW_SCRIPT").filter(|raw| !raw.trim().is_empty()).map(PathBuf::from);
        let bring_to_front = parse_bool("REVIEW_BRING_TO_FRONT", lookup("REVIEW_BRING_TO_FRONT").as_deref())?;

        Ok(Self { variant, scan_latency, settle_timeout, script, bring_to_front })
    }

    /// Canvas preset for the configured variant with host overrides applied.
    ///
    /// The result is validated before it reaches the engine.
    pub fn canvas_config(&self) -> Result<CanvasConfig, HostError> {
        let canvas =
            CanvasConfig { bring_to_front_on_select: self.bring_to_front, ..CanvasConfig::for_variant(self.variant) };
        canvas.validate()?;
        Ok(canvas)
    }
}

fn parse_variant(raw: Option<&str>) -> Result<CanvasVariant, HostError> {
    match raw.map(str::trim).unwrap_or("board") {
        "board" => Ok(CanvasVariant::Board),
        "single" | "single_image" => Ok(CanvasVariant::SingleImage),
        other => Err(HostError::Config(format!("unknown REVIEW_VARIANT '{other}' (expected 'board' or 'single')"))),
    }
}

fn parse_u64(key: &str, raw: Option<&str>, default: u64) -> Result<u64, HostError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    raw.trim()
        .parse::<u64>()
        .map_err(|e| HostError::Config(format!("invalid {key} '{raw}': {e}")))
}

fn parse_bool(key: &str, raw: Option<&str>) -> Result<bool, HostError> {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("" | "false" | "0" | "no") => Ok(false),
        Some("true" | "1" | "yes") => Ok(true),
        Some(other) => Err(HostError::Config(format!("invalid {key} '{other}' (expected true or false)"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
