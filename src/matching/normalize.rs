//! Canonicalization of free-text names and codes.
//!
//! Registry searches are accent-insensitive, so outbound queries strip
//! diacritics. The Nordic letters å ä ö æ ø đ are kept intact in both
//! directions: the registry stores them as-is and stripping them would
//! conflate distinct Scandinavian surnames (Sørensen vs Sorensen).

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::core::Gender;

/// Letters exempt from diacritic stripping (Swedish/Finnish, Danish/
/// Norwegian, Sami), both cases.
const NORDIC_PRESERVE: [char; 12] = [
    'å', 'Å', 'ä', 'Ä', 'ö', 'Ö', 'æ', 'Æ', 'ø', 'Ø', 'đ', 'Đ',
];

/// Common alpha-2 (and alias) to ISO 3166-1 alpha-3 mappings seen in entry
/// lists. Anything already 3 alphabetic characters passes through untouched.
const COUNTRY_ALIASES: [(&str, &str); 25] = [
    ("US", "USA"),
    ("UK", "GBR"),
    ("GB", "GBR"),
    ("DE", "DEU"),
    ("FR", "FRA"),
    ("IT", "ITA"),
    ("ES", "ESP"),
    ("NL", "NLD"),
    ("BE", "BEL"),
    ("CH", "CHE"),
    ("AT", "AUT"),
    ("PL", "POL"),
    ("CZ", "CZE"),
    ("JP", "JPN"),
    ("CN", "CHN"),
    ("KR", "KOR"),
    ("AU", "AUS"),
    ("NZ", "NZL"),
    ("CA", "CAN"),
    ("BR", "BRA"),
    ("MX", "MEX"),
    ("AR", "ARG"),
    ("ZA", "ZAF"),
    ("RU", "RUS"),
    ("IN", "IND"),
];

/// Strip diacritics from a string, keeping the Nordic letters.
///
/// The input is recomposed (NFC) first so that a decomposed `a` + combining
/// ring is recognized as å and preserved; every other character is
/// canonically decomposed and its combining marks dropped.
fn strip_diacritics(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.nfc() {
        if NORDIC_PRESERVE.contains(&ch) {
            out.push(ch);
        } else {
            out.extend(std::iter::once(ch).nfd().filter(|c| !is_combining_mark(*c)));
        }
    }
    out
}

/// Normalize a name for similarity comparison: trimmed, lowercased,
/// diacritics stripped except the Nordic letters.
#[must_use]
pub fn normalize_for_comparison(s: &str) -> String {
    strip_diacritics(&s.trim().to_lowercase())
}

/// Normalize a name for an outbound registry query. Case is preserved;
/// diacritics are stripped (except Nordic) so the remote search is
/// accent-insensitive.
#[must_use]
pub fn normalize_for_query(s: &str) -> String {
    strip_diacritics(s.trim())
}

/// Normalize a nationality code toward ISO 3166-1 alpha-3.
///
/// Unmapped inputs pass through uppercased; downstream treats them as
/// opaque codes rather than failing.
#[must_use]
pub fn normalize_nationality(s: &str) -> String {
    let upper = s.trim().to_uppercase();

    if upper.len() == 3 && upper.chars().all(|c| c.is_ascii_alphabetic()) {
        return upper;
    }

    for (alias, alpha3) in COUNTRY_ALIASES {
        if upper == alias {
            return alpha3.to_string();
        }
    }

    upper
}

/// Map a free-text gender marker to `M`/`W`. Returns `None` for anything
/// outside the known synonym sets; the caller decides the fallback.
#[must_use]
pub fn normalize_gender(s: &str) -> Option<Gender> {
    match s.trim().to_uppercase().as_str() {
        "M" | "MALE" | "MEN" | "MAN" => Some(Gender::Men),
        "W" | "F" | "FEMALE" | "WOMEN" | "WOMAN" => Some(Gender::Women),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_lowercases_and_trims() {
        assert_eq!(normalize_for_comparison("  John SMITH "), "john smith");
    }

    #[test]
    fn test_comparison_strips_diacritics() {
        assert_eq!(normalize_for_comparison("José García"), "jose garcia");
        assert_eq!(normalize_for_comparison("Müller"), "muller");
        assert_eq!(normalize_for_comparison("Chloé"), "chloe");
    }

    #[test]
    fn test_nordic_letters_preserved() {
        assert_eq!(normalize_for_comparison("Sørensen"), "sørensen");
        assert_eq!(normalize_for_comparison("Åberg"), "åberg");
        assert_eq!(normalize_for_comparison("Sjöström"), "sjöström");
        assert_eq!(normalize_for_comparison("Bæk"), "bæk");
    }

    #[test]
    fn test_decomposed_nordic_recomposed_then_preserved() {
        // "a" + combining ring above is the decomposed form of å
        let decomposed = "A\u{030A}berg";
        assert_eq!(normalize_for_comparison(decomposed), "åberg");
    }

    #[test]
    fn test_query_preserves_case() {
        assert_eq!(normalize_for_query("André"), "Andre");
        assert_eq!(normalize_for_query(" Ødegård "), "Ødegård");
    }

    #[test]
    fn test_nationality_alpha3_passthrough() {
        assert_eq!(normalize_nationality("SWE"), "SWE");
        assert_eq!(normalize_nationality("usa"), "USA");
    }

    #[test]
    fn test_nationality_alias_mapping() {
        assert_eq!(normalize_nationality("UK"), "GBR");
        assert_eq!(normalize_nationality("de"), "DEU");
        assert_eq!(normalize_nationality("US"), "USA");
    }

    #[test]
    fn test_nationality_unmapped_passthrough() {
        assert_eq!(normalize_nationality("XX"), "XX");
        assert_eq!(normalize_nationality("ZZZZ"), "ZZZZ");
    }

    #[test]
    fn test_gender_synonyms() {
        assert_eq!(normalize_gender("male"), Some(Gender::Men));
        assert_eq!(normalize_gender("MEN"), Some(Gender::Men));
        assert_eq!(normalize_gender("f"), Some(Gender::Women));
        assert_eq!(normalize_gender("Women"), Some(Gender::Women));
        assert_eq!(normalize_gender("x"), None);
        assert_eq!(normalize_gender(""), None);
    }
}
