// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply validation heuristics.
//!
//! Generated text that trips these checks is treated the same as a
//! generation failure: the turn is dropped rather than delivering noise.

/// True if the text looks like model noise rather than language.
pub fn is_gibberish(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.len() < 3 {
        return true;
    }

    // Runs of 5+ identical characters ("aaaaa", "-----").
    let mut run_char = '\0';
    let mut run_len = 0usize;
    for c in trimmed.chars() {
        if c == run_char {
            run_len += 1;
            if run_len >= 5 {
                return true;
            }
        } else {
            run_char = c;
            run_len = 1;
        }
    }

    // Long strings with no vowels at all.
    if trimmed.len() > 20 && !trimmed.chars().any(|c| "aeiouAEIOU".contains(c)) {
        return true;
    }

    // More than half punctuation/symbols.
    let punct = trimmed
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .count();
    if punct * 2 > trimmed.chars().count() {
        return true;
    }

    false
}

/// True if the text is deliverable as a reply.
pub fn is_valid_reply(text: &str) -> bool {
    !text.trim().is_empty() && !is_gibberish(text)
}
