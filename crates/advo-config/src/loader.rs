// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./advo.toml` > `~/.config/advo/advo.toml` > `/etc/advo/advo.toml`
//! with environment variable overrides via `ADVO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AdvoConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/advo/advo.toml` (system-wide)
/// 3. `~/.config/advo/advo.toml` (user XDG config)
/// 4. `./advo.toml` (local directory)
/// 5. `ADVO_*` environment variables
pub fn load_config() -> Result<AdvoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdvoConfig::default()))
        .merge(Toml::file("/etc/advo/advo.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("advo/advo.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("advo.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config file specification.
pub fn load_config_from_str(toml_content: &str) -> Result<AdvoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdvoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AdvoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdvoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `ADVO_DEEPSEEK_API_KEY` must map to
/// `deepseek.api_key`, not `deepseek.api.key`.
fn env_provider() -> Env {
    Env::prefixed("ADVO_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: ADVO_DEEPSEEK_API_KEY -> "deepseek_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("app_", "app.", 1)
            .replacen("server_", "server.", 1)
            .replacen("deepseek_", "deepseek.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
