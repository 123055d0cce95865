// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure lexical classifiers for the Attune companion engine.
//!
//! Every function in this crate is deterministic and side-effect-free:
//! text in, label out, first matching pattern group wins, with a default
//! label when nothing matches. Classification never fails and never
//! touches memory, disk, or network.
//!
//! The pattern vocabularies are deliberately replaceable configuration;
//! downstream behavior depends only on the label enums.

pub mod emotion;
pub mod intent;
pub mod labels;
pub mod language;
mod patterns;
pub mod relationship;
pub mod validate;

pub use emotion::{detect_emotion, detect_emotional_event, detect_tone, EventSignal};
pub use intent::detect_intent;
pub use labels::{
    Emotion, EventKind, Intensity, Intent, Language, RelationshipKind, Tone,
};
pub use language::detect_language;
pub use relationship::{detect_relationship, RelationshipDetection};
pub use validate::{is_gibberish, is_valid_reply};
