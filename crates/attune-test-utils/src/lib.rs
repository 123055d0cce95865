// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock adapters for deterministic, CI-runnable Attune tests.
//!
//! No network, no disk, no randomness: every mock is scriptable and
//! inspectable from the test body.

pub mod mock_channel;
pub mod mock_embedder;
pub mod mock_provider;

pub use mock_channel::MockChannel;
pub use mock_embedder::MockEmbedder;
pub use mock_provider::{MockProvider, RecordedRequest};
