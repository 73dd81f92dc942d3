//! Name normalization.
//!
//! Maps an arbitrary display name onto a web-safe identifier made only of
//! lowercase ASCII letters, digits, `_` and `-`, with no repeated or
//! dangling separators. `normalize` is a fixed point: normalizing an already
//! normalized name returns it unchanged.

use tracing::warn;
use unicode_normalization::UnicodeNormalization;

use crate::errors::WebnormError;

/// Placeholder used when a name normalizes to nothing.
pub const DEGENERATE_PLACEHOLDER: &str = "untitled";

/// Normalize a display name.
///
/// Examples:
/// - `"  Café Amigos  "` -> `"cafe_amigos"`
/// - `"A---B   C"` -> `"a-b_c"`
/// - `"####"` -> `""`
pub fn normalize(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let lowered = collapsed.to_lowercase();

    // NFD splits accented letters into base + combining mark; the marks are
    // non-ASCII and fall out with everything else outside the allowed set.
    let ascii: String = lowered
        .nfd()
        .filter(|c| matches!(*c, 'a'..='z' | '0'..='9' | ' ' | '_' | '-'))
        .collect();

    let mut out = ascii.replace(' ', "_");
    loop {
        let next = tidy_separators(&out);
        if next == out {
            return out;
        }
        out = next;
    }
}

/// One pass of separator cleanup: collapse and trim `_`, then `-`.
fn tidy_separators(s: &str) -> String {
    let s = collapse_runs(s, '_');
    let s = s.trim_matches('_');
    let s = collapse_runs(s, '-');
    s.trim_matches('-').to_string()
}

fn collapse_runs(s: &str, sep: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last: Option<char> = None;
    for ch in s.chars() {
        if ch == sep && last == Some(sep) {
            continue;
        }
        out.push(ch);
        last = Some(ch);
    }
    out
}

/// True when `name` is already in normalized form.
pub fn is_normalized(name: &str) -> bool {
    !name.is_empty() && normalize(name) == name
}

/// Normalize `name`, substituting [`DEGENERATE_PLACEHOLDER`] when the result is empty.
///
/// The second element reports whether the placeholder was used.
pub fn destination_stem(name: &str) -> (String, bool) {
    let normalized = normalize(name);
    if normalized.is_empty() {
        let err = WebnormError::NormalizationDegenerate {
            name: name.to_string(),
        };
        warn!(
            code = err.code(),
            kind = err.kind(),
            input = name,
            placeholder = DEGENERATE_PLACEHOLDER,
            "{err}"
        );
        (DEGENERATE_PLACEHOLDER.to_string(), true)
    } else {
        (normalized, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_spaces() {
        assert_eq!(normalize("  Café Amigos  "), "cafe_amigos");
    }

    #[test]
    fn collapses_hyphens_and_whitespace() {
        assert_eq!(normalize("A---B   C"), "a-b_c");
    }

    #[test]
    fn symbols_only_is_empty() {
        assert_eq!(normalize("####"), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("日本語"), "");
    }

    #[test]
    fn drops_punctuation_between_words() {
        assert_eq!(normalize("Olá, Mundo!"), "ola_mundo");
        assert_eq!(normalize("a # b"), "a_b");
        assert_eq!(normalize("v1.2 final"), "v12_final");
    }

    #[test]
    fn trims_mixed_separators_to_fixed_point() {
        assert_eq!(normalize("-_a_-"), "a");
        assert_eq!(normalize("__--x--__"), "x");
        assert_eq!(normalize("a__b--c"), "a_b-c");
    }

    #[test]
    fn idempotent_on_assorted_inputs() {
        for input in [
            "  Café Amigos  ",
            "A---B   C",
            "Ção_-_Ñandú",
            "-_-_x_-_-",
            "Tab\tand\nnewline",
            "ÀÉÎÕÜ çñ",
            "already_fine-name",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn is_normalized_rejects_empty_and_dirty() {
        assert!(is_normalized("cafe_amigos"));
        assert!(!is_normalized("Cafe"));
        assert!(!is_normalized(""));
    }

    #[test]
    fn destination_stem_uses_placeholder() {
        assert_eq!(destination_stem("####"), ("untitled".to_string(), true));
        assert_eq!(destination_stem("Foo Bar"), ("foo_bar".to_string(), false));
    }
}
