// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic model routing for the Attune companion engine.
//!
//! Scores a fixed set of generation roles against intent, emotion,
//! temporal context, and mood drift. Zero-cost and deterministic: no
//! LLM pre-call, no network, no latency.

pub mod router;

pub use router::{ModelRole, ModelRouter, RouteDecision};
