// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./attune.toml` > `~/.config/attune/attune.toml`
//! > `/etc/attune/attune.toml` with environment variable overrides via the
//! `ATTUNE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::AttuneConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/attune/attune.toml` (system-wide)
/// 3. `~/.config/attune/attune.toml` (user XDG config)
/// 4. `./attune.toml` (local directory)
/// 5. `ATTUNE_*` environment variables
pub fn load_config() -> Result<AttuneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AttuneConfig::default()))
        .merge(Toml::file("/etc/attune/attune.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("attune/attune.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("attune.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from an inline TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<AttuneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AttuneConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AttuneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AttuneConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `ATTUNE_MEMORY_MAX_SHORT_TERM` must map
/// to `memory.max_short_term`, not `memory.max.short.term`.
fn env_provider() -> Env {
    Env::prefixed("ATTUNE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: ATTUNE_MEMORY_MAX_SHORT_TERM -> "memory_max_short_term"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("inference_", "inference.", 1)
            .replacen("models_", "models.", 1)
            .replacen("memory_", "memory.", 1)
            .replacen("behavior_", "behavior.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
