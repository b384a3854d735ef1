//! Similarity scorers
//!
//! Both scorers are total: any pair of strings yields a score in [0, 1].
//! Inputs that cannot be compared (empty text, fingerprints of different
//! lengths) score 0.

use std::collections::HashMap;

/// Cosine similarity of the term-frequency vectors of two texts
///
/// Texts are lower-cased and split on runs of non-word characters (anything
/// other than a letter, digit or `_`). No stemming, no stop words.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let freq_a = term_frequencies(a);
    let freq_b = term_frequencies(b);

    if freq_a.is_empty() || freq_b.is_empty() {
        return 0.0;
    }

    // Terms missing from one side contribute nothing to the dot product
    let dot: f64 = freq_a
        .iter()
        .filter_map(|(term, &count_a)| freq_b.get(term).map(|&count_b| count_a * count_b))
        .sum();
    // Counts are integers, so the squared norms and their product are exact
    // and identical texts divide to exactly 1
    let denominator = (squared_norm(&freq_a) * squared_norm(&freq_b)).sqrt();

    (dot / denominator).clamp(0.0, 1.0)
}

/// Normalized Hamming similarity of two fingerprint digests
///
/// Digests of different lengths are incomparable and score 0.
pub fn fingerprint_similarity(a: &str, b: &str) -> f64 {
    let chars_a: Vec<char> = a.chars().collect();
    let chars_b: Vec<char> = b.chars().collect();

    if chars_a.len() != chars_b.len() || chars_a.is_empty() {
        return 0.0;
    }

    let distance = chars_a
        .iter()
        .zip(&chars_b)
        .filter(|(x, y)| x != y)
        .count();

    1.0 - distance as f64 / chars_a.len() as f64
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut freq = HashMap::new();
    let lowered = text.to_lowercase();
    for term in lowered
        .split(|c: char| !is_word_char(c))
        .filter(|t| !t.is_empty())
    {
        *freq.entry(term.to_string()).or_insert(0.0) += 1.0;
    }
    freq
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn squared_norm(freq: &HashMap<String, f64>) -> f64 {
    freq.values().map(|v| v * v).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_text_identical_is_one() {
        let lyrics = "Nakupenda, nakupenda sana\nWewe ni wangu";
        assert_eq!(text_similarity(lyrics, lyrics), 1.0);
    }

    #[test]
    fn test_text_ignores_case_and_punctuation() {
        assert_eq!(text_similarity("Hello, World!", "hello world"), 1.0);
        assert_eq!(text_similarity("rock'n'roll", "rock n roll"), 1.0);
    }

    #[test]
    fn test_text_is_symmetric() {
        let pairs = [
            ("the sun rises in the east", "the east is where the sun sets"),
            ("a a a b", "a b b b c"),
            ("", "anything"),
            ("one", "two"),
        ];
        for (a, b) in pairs {
            assert_eq!(text_similarity(a, b), text_similarity(b, a));
        }
    }

    #[test]
    fn test_text_disjoint_vocabulary_is_zero() {
        assert_eq!(text_similarity("red green blue", "cat dog bird"), 0.0);
    }

    #[test]
    fn test_text_empty_is_zero_not_nan() {
        assert_eq!(text_similarity("", ""), 0.0);
        assert_eq!(text_similarity("", "some lyrics"), 0.0);
        assert_eq!(text_similarity("some lyrics", ""), 0.0);
        // Only separators: no tokens
        assert_eq!(text_similarity("!!! ... ---", "some lyrics"), 0.0);
    }

    #[test]
    fn test_text_partial_overlap() {
        // A = {a:1, b:1}, B = {a:1, c:1} -> 1 / (sqrt2 * sqrt2)
        assert_relative_eq!(text_similarity("a b", "a c"), 0.5, epsilon = 1e-12);
        // A = {a:2, b:1}, B = {a:1} -> 2 / sqrt5
        assert_relative_eq!(
            text_similarity("a a b", "a"),
            2.0 / 5.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_text_counts_unicode_letters_as_words() {
        assert_eq!(text_similarity("Café déjà vu", "café DÉJÀ vu"), 1.0);
        assert_eq!(text_similarity("café", "caf"), 0.0);
    }

    #[test]
    fn test_fingerprint_identical_is_one() {
        assert_eq!(fingerprint_similarity("a1b2c3d4", "a1b2c3d4"), 1.0);
    }

    #[test]
    fn test_fingerprint_all_different_is_zero() {
        assert_eq!(fingerprint_similarity("aaaa", "bbbb"), 0.0);
    }

    #[test]
    fn test_fingerprint_length_mismatch_is_zero() {
        assert_eq!(fingerprint_similarity("abcd", "abcde"), 0.0);
        assert_eq!(fingerprint_similarity("", "a"), 0.0);
    }

    #[test]
    fn test_fingerprint_empty_is_zero() {
        assert_eq!(fingerprint_similarity("", ""), 0.0);
    }

    #[test]
    fn test_fingerprint_partial() {
        assert_relative_eq!(fingerprint_similarity("abcd", "abcf"), 0.75);
        assert_relative_eq!(fingerprint_similarity("0000ffff", "0000ff00"), 0.75);
    }

    #[test]
    fn test_fingerprint_is_symmetric() {
        let pairs = [("abcd", "abzz"), ("1234", "4321"), ("abc", "abcd")];
        for (a, b) in pairs {
            assert_eq!(fingerprint_similarity(a, b), fingerprint_similarity(b, a));
        }
    }
}
