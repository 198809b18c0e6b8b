//! Edit-distance and phonetic similarity for near-duplicate names

use super::phonetic::PhoneticEncoder;

/// String similarity checks built on Levenshtein distance and phonetic codes
#[derive(Clone, Copy, Debug, Default)]
pub struct FuzzyMatcher {
    encoder: PhoneticEncoder,
}

impl FuzzyMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Levenshtein distance with unit costs for insert, delete and substitute
    ///
    /// Computed over `char`s on the full dynamic-programming matrix.
    pub fn levenshtein_distance(&self, a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];
        for (i, row) in matrix.iter_mut().enumerate() {
            row[0] = i;
        }
        for j in 0..=b.len() {
            matrix[0][j] = j;
        }

        for i in 1..=a.len() {
            for j in 1..=b.len() {
                let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
                matrix[i][j] = (matrix[i - 1][j] + 1)
                    .min(matrix[i][j - 1] + 1)
                    .min(matrix[i - 1][j - 1] + cost);
            }
        }

        matrix[a.len()][b.len()]
    }

    /// Normalized similarity in `[0, 1]`
    ///
    /// Two empty strings score 0.0: there is nothing to compare, which is
    /// not the same as being identical.
    pub fn calculate_similarity(&self, a: &str, b: &str) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        if a == b {
            return 1.0;
        }

        let a = a.to_lowercase();
        let b = b.to_lowercase();
        let max_len = a.chars().count().max(b.chars().count());
        let distance = self.levenshtein_distance(&a, &b);

        1.0 - distance as f64 / max_len as f64
    }

    pub fn get_phonetic_code(&self, name: &str) -> String {
        self.encoder.encode(name)
    }

    /// Two names are phonetically similar iff their codes are equal
    pub fn is_phonetically_similar(&self, a: &str, b: &str) -> bool {
        self.get_phonetic_code(a) == self.get_phonetic_code(b)
    }
}
