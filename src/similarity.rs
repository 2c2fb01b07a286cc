//! Longest-common-subsequence similarity over signature hex strings.
//!
//! This is the canonical metric (spec §4.4): `2*M / (|a| + |b|)` where
//! `M` is the length of a longest common subsequence of the two hex
//! character sequences. It is what both pairwise comparisons and the
//! consolidator use.
//!
//! An alternative Jaccard-over-8-char-shingle metric exists in the
//! source material this was distilled from, but the specification
//! fixes LCS-ratio as the single canonical choice; Jaccard is not
//! implemented here (see DESIGN.md).

/// Similarity ratio in `[0.0, 1.0]`. Returns `0.0` if either input is
/// empty.
pub fn similarity(sig_a: &str, sig_b: &str) -> f64 {
    if sig_a.is_empty() || sig_b.is_empty() {
        return 0.0;
    }

    let m = longest_common_subsequence_len(sig_a.as_bytes(), sig_b.as_bytes());
    (2 * m) as f64 / (sig_a.len() + sig_b.len()) as f64
}

/// Classic O(n*m) LCS length with a rolling two-row table, so memory
/// stays O(min(n, m)) even for the longest signatures a max-size file
/// can produce.
fn longest_common_subsequence_len(a: &[u8], b: &[u8]) -> usize {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for &lb in long {
        for (j, &sb) in short.iter().enumerate() {
            curr[j + 1] = if lb == sb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_yield_zero() {
        assert_eq!(similarity("", "abcd1234"), 0.0);
        assert_eq!(similarity("abcd1234", ""), 0.0);
        assert_eq!(similarity("", ""), 0.0);
    }

    #[test]
    fn self_similarity_is_one() {
        let sig = "deadbeefcafef00d12345678";
        assert_eq!(similarity(sig, sig), 1.0);
    }

    #[test]
    fn symmetry() {
        let a = "0011223344556677";
        let b = "00112233ffeeddcc";
        assert_eq!(similarity(a, b), similarity(b, a));
    }

    #[test]
    fn range_is_bounded() {
        let a = "00112233445566778899aabbccddeeff";
        let b = "ffeeddccbbaa99887766554433221100";
        let r = similarity(a, b);
        assert!((0.0..=1.0).contains(&r));
    }

    #[test]
    fn completely_disjoint_alphabets_share_nothing() {
        // No shared characters at all -> LCS is empty -> ratio 0.
        assert_eq!(similarity("aaaaaaaa", "bbbbbbbb"), 0.0);
    }
}
