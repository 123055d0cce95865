// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Attune companion engine.
//!
//! Layered TOML + environment loading via Figment, with typed model
//! structs and compiled defaults for every field.

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    AgentConfig, AttuneConfig, BehaviorConfig, InferenceConfig, MemoryConfig,
    ModelRolesConfig, StorageBackend, StorageConfig,
};
