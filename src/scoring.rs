//! Content scoring formulas.
//!
//! Two families live here: deterministic text metrics (word counts,
//! readability, SEO audit scores) and the jittered engagement estimates
//! (viral/revenue/trending/reach) attached to discovered articles. The
//! jittered scores are product behavior — ranges match what the dashboard
//! and copilot tools report.

use rand_core::{OsRng, RngCore};

// ── Jittered engagement estimates ─────────────────────────────────────────────

/// Uniform sample in `[lo, hi)`.
fn jitter(lo: f64, hi: f64) -> f64 {
    let unit = OsRng.next_u64() as f64 / (u64::MAX as f64 + 1.0);
    lo + unit * (hi - lo)
}

/// Viral potential, 60–100.
pub fn viral_score() -> f64 {
    jitter(60.0, 100.0)
}

/// Revenue potential, 70–100.
pub fn revenue_score() -> f64 {
    jitter(70.0, 100.0)
}

/// Trending potential, 5–10.
pub fn trending_potential() -> f64 {
    jitter(5.0, 10.0)
}

/// Estimated impressions, 100k–600k.
pub fn estimated_reach() -> i64 {
    jitter(100_000.0, 600_000.0) as i64
}

/// Integer sample in `[lo, hi)` — used by tool responses for projected
/// percentages and dollar figures.
pub fn jitter_range(lo: f64, hi: f64) -> f64 {
    jitter(lo, hi)
}

// ── Text metrics ──────────────────────────────────────────────────────────────

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Reading time in minutes at 200 wpm, rounded up, minimum 1.
pub fn reading_time_minutes(words: usize) -> usize {
    words.div_ceil(200).max(1)
}

/// Flesch Reading Ease approximation: `206.835 − 1.015 × words/sentence`,
/// clamped to 0–100.
pub fn readability_score(text: &str) -> f64 {
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1);
    let words = word_count(text).max(1);
    let avg_words_per_sentence = words as f64 / sentences as f64;
    (206.835 - 1.015 * avg_words_per_sentence).clamp(0.0, 100.0)
}

/// Additive SEO score for generated markdown: base 50, +10 each for an H1,
/// an H2, length over 800 words, internal link markers, and external link
/// markers. Capped at 100.
pub fn seo_score(text: &str) -> f64 {
    let mut score: f64 = 50.0;
    if text.lines().any(|l| l.starts_with("# ")) {
        score += 10.0;
    }
    if text.lines().any(|l| l.starts_with("## ")) {
        score += 10.0;
    }
    if word_count(text) > 800 {
        score += 10.0;
    }
    if text.contains("[INTERNAL_LINK:") {
        score += 10.0;
    }
    if text.contains("[EXTERNAL_LINK:") {
        score += 10.0;
    }
    score.min(100.0)
}

/// Quality gate used by the generation pipeline.
pub fn quality_passed(readability: f64, seo: f64) -> bool {
    readability > 60.0 && seo > 70.0
}

/// Occurrences of `keyword` per 100 words (case-insensitive).
pub fn keyword_density(text: &str, keyword: &str) -> f64 {
    let words = word_count(text).max(1);
    let hay = text.to_lowercase();
    let needle = keyword.to_lowercase();
    if needle.is_empty() {
        return 0.0;
    }
    let hits = hay.matches(&needle).count();
    hits as f64 / words as f64 * 100.0
}

/// Markdown heading count (`#` through `######`).
pub fn heading_count(text: &str) -> usize {
    text.lines()
        .filter(|l| {
            let hashes = l.chars().take_while(|c| *c == '#').count();
            (1..=6).contains(&hashes) && l.chars().nth(hashes) == Some(' ')
        })
        .count()
}

/// Markdown link count (`[text](url)`).
pub fn link_count(text: &str) -> usize {
    let mut count = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'[' {
            if let Some(close) = text[i..].find("](") {
                if text[i + close..].contains(')') {
                    count += 1;
                    i += close + 2;
                    continue;
                }
            }
        }
        i += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jittered_scores_stay_in_range() {
        for _ in 0..100 {
            let v = viral_score();
            assert!((60.0..100.0).contains(&v), "viral out of range: {v}");
            let r = revenue_score();
            assert!((70.0..100.0).contains(&r), "revenue out of range: {r}");
            let t = trending_potential();
            assert!((5.0..10.0).contains(&t), "trending out of range: {t}");
            let reach = estimated_reach();
            assert!((100_000..600_000).contains(&reach), "reach out of range: {reach}");
        }
    }

    #[test]
    fn readability_short_sentences_scores_high() {
        let text = "Short. Clear. Done.";
        assert!(readability_score(text) > 90.0);
    }

    #[test]
    fn readability_run_on_scores_low() {
        let long = (0..250).map(|_| "word").collect::<Vec<_>>().join(" ");
        assert_eq!(readability_score(&long), 0.0);
    }

    #[test]
    fn seo_score_is_additive() {
        assert_eq!(seo_score("plain text"), 50.0);
        assert_eq!(seo_score("# Title\nbody"), 60.0);
        assert_eq!(seo_score("# Title\n## Section\nbody"), 70.0);
        let long_body = (0..900).map(|_| "w").collect::<Vec<_>>().join(" ");
        let full = format!("# T\n## S\n{long_body}\n[INTERNAL_LINK: a]\n[EXTERNAL_LINK: b]");
        assert_eq!(seo_score(&full), 100.0);
    }

    #[test]
    fn quality_gate_thresholds() {
        assert!(quality_passed(61.0, 71.0));
        assert!(!quality_passed(60.0, 90.0));
        assert!(!quality_passed(90.0, 70.0));
    }

    #[test]
    fn word_and_reading_time() {
        assert_eq!(word_count("one two three"), 3);
        assert_eq!(reading_time_minutes(0), 1);
        assert_eq!(reading_time_minutes(200), 1);
        assert_eq!(reading_time_minutes(201), 2);
    }

    #[test]
    fn density_counts_case_insensitive() {
        let text = "Rust is great. rust is fast. RUST everywhere.";
        let d = keyword_density(text, "rust");
        assert!(d > 30.0 && d < 40.0, "density: {d}");
    }

    #[test]
    fn heading_and_link_counts() {
        let text = "# One\n## Two\nnot # a heading\n[a](http://x) and [b](http://y)";
        assert_eq!(heading_count(text), 2);
        assert_eq!(link_count(text), 2);
    }
}
