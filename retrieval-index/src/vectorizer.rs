use std::collections::{HashMap, HashSet};

/// Sparse weight vector: `(column, weight)` pairs in strictly ascending
/// column order. An empty vector is the zero vector.
pub type SparseVector = Vec<(usize, f32)>;

/// Case-folded word splitting on any non-alphanumeric boundary.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Term-to-column mapping plus the smoothed IDF weight per column, frozen
/// at fit time. Queries look terms up here and never extend it.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    index_of: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.index_of.get(term).copied()
    }

    fn idf(&self, column: usize) -> f32 {
        self.idf.get(column).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: Vocabulary,
}

impl TfidfVectorizer {
    /// Builds the vocabulary from the corpus and projects every document
    /// into its row vector. Row `i` corresponds to the `i`-th input text.
    ///
    /// Weighting: `tf(t, d) * idf(t)` with `idf(t) = ln((1 + N) / (1 + df(t))) + 1`,
    /// rows L2-normalized. Rows are produced by the same projection used for
    /// queries, so transforming a corpus text reproduces its row exactly.
    pub fn fit<'a, I>(texts: I) -> (Self, Vec<SparseVector>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let corpus_tokens: Vec<Vec<String>> = texts.into_iter().map(tokenize).collect();

        let mut index_of: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for tokens in &corpus_tokens {
            let mut seen_in_document: HashSet<usize> = HashSet::new();
            for token in tokens {
                let column = match index_of.get(token) {
                    Some(&column) => column,
                    None => {
                        let column = document_frequency.len();
                        index_of.insert(token.clone(), column);
                        document_frequency.push(0);
                        column
                    }
                };
                if seen_in_document.insert(column) {
                    if let Some(count) = document_frequency.get_mut(column) {
                        *count += 1;
                    }
                }
            }
        }

        let corpus_size = corpus_tokens.len();
        let idf = document_frequency
            .iter()
            .map(|&df| ((1 + corpus_size) as f32 / (1 + df) as f32).ln() + 1.0)
            .collect();

        let vectorizer = Self {
            vocabulary: Vocabulary { index_of, idf },
        };

        let matrix = corpus_tokens
            .iter()
            .map(|tokens| vectorizer.project(tokens))
            .collect();

        (vectorizer, matrix)
    }

    /// Projects arbitrary text against the fitted vocabulary. Tokens absent
    /// from the vocabulary are dropped; an all-unknown text yields the zero
    /// vector, which is a valid outcome rather than an error.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.project(&tokenize(text))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    fn project(&self, tokens: &[String]) -> SparseVector {
        let mut term_counts: HashMap<usize, f32> = HashMap::new();
        for token in tokens {
            if let Some(column) = self.vocabulary.column(token) {
                *term_counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut weights: SparseVector = term_counts
            .into_iter()
            .map(|(column, tf)| (column, tf * self.vocabulary.idf(column)))
            .collect();
        weights.sort_unstable_by_key(|&(column, _)| column);

        l2_normalize(&mut weights);
        weights
    }
}

fn l2_normalize(vector: &mut SparseVector) {
    let norm = vector
        .iter()
        .map(|&(_, weight)| weight * weight)
        .sum::<f32>()
        .sqrt();
    if norm > 0.0 {
        for (_, weight) in vector.iter_mut() {
            *weight /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_folds_case_and_strips_punctuation() {
        assert_eq!(
            tokenize("Hello, World! it's 2024"),
            vec!["hello", "world", "it", "s", "2024"]
        );
        assert!(tokenize("--- ???").is_empty());
    }

    #[test]
    fn single_document_idf_is_one() {
        // N = 1, df = 1: ln(2/2) + 1 = 1.
        let (vectorizer, matrix) = TfidfVectorizer::fit(["apple"]);
        let column = vectorizer.vocabulary().column("apple").unwrap();
        assert_eq!(matrix.len(), 1);
        // Single-term document normalizes to weight 1 regardless of idf.
        assert_eq!(matrix[0], vec![(column, 1.0)]);
    }

    #[test]
    fn rows_are_unit_length() {
        let (_, matrix) = TfidfVectorizer::fit(["apple banana", "banana cherry durian"]);
        for row in &matrix {
            let norm: f32 = row.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-6, "row norm was {norm}");
        }
    }

    #[test]
    fn corpus_wide_terms_get_lower_idf_than_distinctive_ones() {
        let (vectorizer, matrix) =
            TfidfVectorizer::fit(["apple banana", "apple cherry", "apple durian"]);
        // "apple" appears everywhere, so within any row its weight must be
        // below the weight of the document's distinctive term.
        let apple = vectorizer.vocabulary().column("apple").unwrap();
        for row in &matrix {
            let apple_weight = row
                .iter()
                .find(|&&(c, _)| c == apple)
                .map(|&(_, w)| w)
                .unwrap();
            let other_weight = row
                .iter()
                .find(|&&(c, _)| c != apple)
                .map(|&(_, w)| w)
                .unwrap();
            assert!(apple_weight < other_weight);
        }
    }

    #[test]
    fn transform_reproduces_fitted_rows_exactly() {
        let texts = [
            "the quick brown fox",
            "jumped over the lazy dog",
            "the dog barked",
        ];
        let (vectorizer, matrix) = TfidfVectorizer::fit(texts);
        for (text, row) in texts.iter().zip(&matrix) {
            assert_eq!(&vectorizer.transform(text), row);
        }
    }

    #[test]
    fn unknown_tokens_are_dropped_not_added() {
        let (vectorizer, _) = TfidfVectorizer::fit(["apple banana"]);
        let vocabulary_size = vectorizer.vocabulary().len();

        let projected = vectorizer.transform("zeppelin apple");
        assert_eq!(projected.len(), 1, "only the known token survives");
        assert_eq!(vectorizer.vocabulary().len(), vocabulary_size);
    }

    #[test]
    fn all_unknown_query_is_the_zero_vector() {
        let (vectorizer, _) = TfidfVectorizer::fit(["apple banana"]);
        assert!(vectorizer.transform("zeppelin submarine").is_empty());
    }

    #[test]
    fn empty_corpus_fits_an_empty_vocabulary() {
        let (vectorizer, matrix) = TfidfVectorizer::fit([]);
        assert!(vectorizer.vocabulary().is_empty());
        assert!(matrix.is_empty());
        assert!(vectorizer.transform("anything").is_empty());
    }
}
