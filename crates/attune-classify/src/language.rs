// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language detection (English vs. Indonesian vs. mixed).
//!
//! Counts whole-word matches against common-word lists; a 1.2x dominance
//! ratio decides, with strong-indicator fallbacks for ambiguous text.

use std::sync::LazyLock;

use regex::Regex;

use crate::labels::Language;

static ENGLISH_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(the|you|and|to|is|are|i'm|it's|that|this|what|how|when|why|love|yes|no|ok|please|thank|but|with|for|from|have|do|will|would|could|should|can|know|think|want|need|like|feel|good|bad|time|day|night|today|tomorrow|sorry|thanks|hello|hi|bye|hey|here|make|tell|help|work|home|friend|never|always|maybe)\b",
    )
    .expect("english word pattern is valid")
});

static INDONESIAN_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(aku|kamu|iya|nggak|tidak|aja|dong|nih|banget|sih|deh|lah|kan|gue|lu|udah|belum|gimana|kenapa|dimana|kapan|siapa|sama|juga|masih|lagi|bisa|mau|pengen|kayak|terus|tapi|atau|kalau|kalo|ada|gak|ga|tau|bener|sayang|cinta|rindu|kangen|sedih|senang|capek|ngantuk|pusing|selamat|pagi|siang|sore|malam|maaf|terima|kasih|tolong|bantu|cerita|teman|kerja|main|makan|tidur|bikin|coba|bilang)\b",
    )
    .expect("indonesian word pattern is valid")
});

static STRONG_INDONESIAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(selamat|gimana|kenapa|dimana|siapa|dong|nih|banget|sih|deh|lah|gue|lu|gak|ga)\b")
        .expect("strong indonesian pattern is valid")
});

static STRONG_ENGLISH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(hey|what|how|where|when|who|why|please|thanks)\b")
        .expect("strong english pattern is valid")
});

/// Detect the dominant language of a message.
///
/// Returns `Mixed` when neither language clearly dominates and no strong
/// indicator word appears.
pub fn detect_language(text: &str) -> Language {
    let english_count = ENGLISH_WORDS.find_iter(text).count();
    let indo_count = INDONESIAN_WORDS.find_iter(text).count();

    if english_count as f64 > indo_count as f64 * 1.2 {
        return Language::English;
    }
    if indo_count as f64 > english_count as f64 * 1.2 {
        return Language::Indonesian;
    }

    if STRONG_INDONESIAN.is_match(text) {
        return Language::Indonesian;
    }
    if STRONG_ENGLISH.is_match(text) {
        return Language::English;
    }

    Language::Mixed
}
