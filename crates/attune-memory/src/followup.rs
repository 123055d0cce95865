// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotional-event follow-up scheduling.
//!
//! Each event kind has a time window after which the companion should
//! circle back -- soon enough to feel attentive, late enough not to hover.

use attune_classify::EventKind;
use chrono::{DateTime, Utc};

use crate::types::EmotionalEvent;

/// Follow-up window in hours for an event kind, or `None` if the kind is
/// never surfaced automatically.
pub fn follow_up_window(kind: EventKind) -> Option<(f64, f64)> {
    match kind {
        EventKind::Distress => Some((12.0, 48.0)),
        EventKind::Celebration => Some((24.0, 72.0)),
        EventKind::Vulnerability => Some((6.0, 36.0)),
        EventKind::Intimate | EventKind::Conflict => None,
    }
}

/// A follow-up the orchestrator should weave into the next reply.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUp {
    pub kind: EventKind,
    pub trigger: String,
    pub hours_since: f64,
    /// Context line injected into the prompt.
    pub context: String,
}

/// Scan events newest-first for one whose follow-up window is open.
///
/// Returns the index of the matching event; the caller flips its
/// `followed_up` flag so the event is surfaced at most once.
pub fn find_follow_up(events: &[EmotionalEvent], now: DateTime<Utc>) -> Option<usize> {
    for (idx, event) in events.iter().enumerate().rev() {
        if event.followed_up {
            continue;
        }
        let Some((min_h, max_h)) = follow_up_window(event.kind) else {
            continue;
        };
        let hours = (now - event.timestamp).num_seconds() as f64 / 3600.0;
        if hours >= min_h && hours <= max_h {
            return Some(idx);
        }
    }
    None
}

/// Build the prompt context line for a surfaced follow-up.
pub fn follow_up_context(event: &EmotionalEvent, hours_since: f64) -> String {
    let days = (hours_since / 24.0).floor() as i64;
    let when = if days == 0 {
        format!("{} hours ago", hours_since.floor() as i64)
    } else if days == 1 {
        "yesterday".to_string()
    } else {
        format!("{days} days ago")
    };

    match event.kind {
        EventKind::Distress => format!(
            "(emotional callback: the user went through {} {when}. check in gently on how they're feeling)",
            event.trigger
        ),
        EventKind::Celebration => format!(
            "(emotional callback: the user had {} {when}. reference it warmly)",
            event.trigger
        ),
        _ => format!(
            "(emotional callback: the user opened up about something personal {when}. show you remember and care)"
        ),
    }
}
