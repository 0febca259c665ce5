//! Character-level text similarity based on Levenshtein edit distance.
//!
//! Comparison works on Unicode scalar values after lower-casing. Nothing else is
//! folded: punctuation, whitespace and accents all count as edits. Cost is
//! quadratic in text length per pair, which is fine for evaluation-sized inputs.

pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// Classic unit-cost edit distance (insert, delete, substitute).
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];

    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in dp[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1]
            } else {
                1 + dp[i - 1][j - 1].min(dp[i - 1][j]).min(dp[i][j - 1])
            };
        }
    }

    dp[a.len()][b.len()]
}

/// Similarity in `[0, 1]`: `1 - distance / max_len` over the normalized texts.
///
/// Two empty strings are identical and score `1.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return 1.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }

    1.0 - levenshtein(&a, &b) as f64 / max_len as f64
}
