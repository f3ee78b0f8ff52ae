//! Levenshtein edit distance over code points.

/// Minimum number of single-character insertions, deletions and
/// substitutions turning `a` into `b`.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows instead of the full matrix.
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Similarity percentage in `[0, 100]` given a precomputed distance.
///
/// Two empty strings are 100% similar.
pub fn similarity(a: &str, b: &str, distance: usize) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100.0;
    }
    let score = (max_len as f64 - distance as f64) / max_len as f64 * 100.0;
    score.clamp(0.0, 100.0)
}
