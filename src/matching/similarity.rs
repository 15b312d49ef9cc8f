//! Bounded edit-distance similarity between two names.

use crate::matching::normalize::normalize_for_comparison;

/// Similarity in [0,1] between two strings, computed over their
/// comparison-normalized forms.
///
/// Equal strings score 1.0; otherwise the score is
/// `1 - levenshtein(a, b) / max(len(a), len(b))` over characters. Two
/// strings that are both empty after normalization score 0.0, not 1.0 —
/// an empty name must never spuriously match.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize_for_comparison(a);
    let b = normalize_for_comparison(b);

    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let max_len = a.chars().count().max(b.chars().count());
    let distance = strsim::levenshtein(&a, &b);

    #[allow(clippy::cast_precision_loss)] // name lengths are tiny
    {
        1.0 - distance as f64 / max_len as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_after_normalization() {
        assert!((similarity("Smith", "smith") - 1.0).abs() < f64::EPSILON);
        assert!((similarity("José", "Jose") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_never_matches() {
        assert!((similarity("", "") - 0.0).abs() < f64::EPSILON);
        assert!((similarity("Smith", "") - 0.0).abs() < f64::EPSILON);
        assert!((similarity("", "Smith") - 0.0).abs() < f64::EPSILON);
        assert!((similarity("   ", "  ") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [("Hansen", "Hanssen"), ("Smith", "Smyth"), ("Berg", "Borg")];
        for (a, b) in pairs {
            assert!((similarity(a, b) - similarity(b, a)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_single_edit() {
        // "smith" vs "smyth": distance 1, max length 5
        let s = similarity("Smith", "Smyth");
        assert!((s - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_strings_score_low() {
        assert!(similarity("Smith", "Kowalczyk") < 0.3);
    }

    #[test]
    fn test_bounded() {
        for (a, b) in [("a", "zzzzzzzzzz"), ("x", "x"), ("", "y")] {
            let s = similarity(a, b);
            assert!((0.0..=1.0).contains(&s), "similarity({a}, {b}) = {s}");
        }
    }
}
