use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};

lazy_static! {
    static ref TERM: Regex = Regex::new(r"[a-z0-9]{2,}").unwrap();
}

/// Lowercase word runs of two or more characters, stop words removed
pub fn tokenize(text: &str, stop_words: &BTreeSet<String>) -> Vec<String> {
    let lower = text.to_lowercase();
    TERM.find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !stop_words.contains(*t))
        .map(str::to_string)
        .collect()
}

/// Vocabulary and smoothed inverse document frequencies fitted on a corpus
#[derive(Debug, Clone)]
pub struct TfidfModel {
    vocab: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfModel {
    /// Keep the `max_features` most frequent terms (ties alphabetical) and
    /// weight them with `ln((1 + n) / (1 + df)) + 1`
    pub fn fit(documents: &[Vec<String>], max_features: usize) -> Self {
        let mut term_counts: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();

        for terms in documents {
            let mut seen: HashSet<&str> = HashSet::new();
            for term in terms {
                *term_counts.entry(term.as_str()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }

        let mut term_pairs: Vec<(&str, usize)> = term_counts.into_iter().collect();
        term_pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        term_pairs.truncate(max_features);

        let doc_count = documents.len() as f64;
        let mut vocab = HashMap::with_capacity(term_pairs.len());
        let mut idf = Vec::with_capacity(term_pairs.len());
        for (idx, (term, _count)) in term_pairs.into_iter().enumerate() {
            let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
            vocab.insert(term.to_string(), idx);
            idf.push(((1.0 + doc_count) / (1.0 + df)).ln() + 1.0);
        }

        Self { vocab, idf }
    }

    pub fn vocab_len(&self) -> usize {
        self.vocab.len()
    }

    /// Raw term count times idf, L2-normalized. Documents without any
    /// vocabulary term map to the zero vector.
    pub fn transform(&self, terms: &[String]) -> Vec<f64> {
        let mut vector = vec![0.0; self.vocab.len()];
        for term in terms {
            if let Some(&idx) = self.vocab.get(term) {
                vector[idx] += 1.0;
            }
        }
        for (value, idf) in vector.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm: f64 = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in vector.iter_mut() {
                *value /= norm;
            }
        }
        vector
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Pairwise cosine similarity of the texts: symmetric, diagonal 1.0,
/// every value within [0, 1]
pub fn similarity_matrix(texts: &[&str], stop_words: &BTreeSet<String>, max_features: usize) -> Vec<Vec<f64>> {
    let documents: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t, stop_words)).collect();
    let model = TfidfModel::fit(&documents, max_features);
    let vectors: Vec<Vec<f64>> = documents.iter().map(|d| model.transform(d)).collect();

    let n = vectors.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let sim = dot(&vectors[i], &vectors[j]).clamp(0.0, 1.0);
            matrix[i][j] = sim;
            matrix[j][i] = sim;
        }
    }
    matrix
}
