use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical text normalization applied to every form and value before
/// comparison or storage: NFC composition plus whitespace trim.
pub fn normalize(s: &str) -> String {
    s.trim().nfc().collect()
}

/// Case-, diacritic- and punctuation-insensitive folding used by the
/// near-duplicate fingerprint: lowercase, NFD-decompose, drop combining
/// marks, keep alphanumerics only.
pub fn slug(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_composes() {
        // "e" + combining acute composes to a single scalar
        assert_eq!(normalize("  cafe\u{301}  "), "caf\u{e9}");
        assert_eq!(normalize("three"), "three");
    }

    #[test]
    fn slug_folds_case_and_diacritics() {
        assert_eq!(slug("Caf\u{e9}"), "cafe");
        assert_eq!(slug("cafe\u{301}"), "cafe");
        assert_eq!(slug("dvidešimt "), "dvidesimt");
    }

    #[test]
    fn slug_drops_punctuation_and_spaces() {
        assert_eq!(slug("twenty-one"), "twentyone");
        assert_eq!(slug("du ; dvi"), "dudvi");
    }

    #[test]
    fn cosmetic_variants_share_a_slug() {
        assert_eq!(slug("Vienuolika!"), slug("vienuolika"));
        assert_ne!(slug("vienuolika"), slug("dvylika"));
    }
}
