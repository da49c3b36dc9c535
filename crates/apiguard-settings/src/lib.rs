//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{ApiguardConfigV1, RuleConfig, SuppressionEntry};
pub use resolve::{Overrides, ResolvedConfig};

/// Stable schema identifier for apiguard config files.
pub const SCHEMA_CONFIG_V1: &str = "apiguard.config.v1";

/// Parse `apiguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<ApiguardConfigV1> {
    let cfg: ApiguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine (profiles + overrides + per-rule config).
pub fn resolve_config(
    cfg: ApiguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
