use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};

lazy_static! {
    static ref CONTENT_WORD: Regex = Regex::new(r"[a-z]{4,}").unwrap();
}

/// Most frequent content words over `texts`: lowercase alphabetic runs of
/// at least four letters, stop words removed. Ranked by count, ties by the
/// position of the first occurrence.
pub fn top_terms<'a, I>(texts: I, stop_words: &BTreeSet<String>, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    // term -> (count, first seen)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut position = 0;

    for text in texts {
        let lower = text.to_lowercase();
        for word in CONTENT_WORD.find_iter(&lower).map(|m| m.as_str()) {
            if stop_words.contains(word) {
                continue;
            }
            let entry = counts.entry(word.to_string()).or_insert((0, position));
            entry.0 += 1;
            position += 1;
        }
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(term, (count, first))| (term, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(n);
    ranked.into_iter().map(|(term, count, _)| (term, count)).collect()
}
