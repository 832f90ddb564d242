//! Interest-based event recommendations.
//!
//! Events are ranked by TF-IDF cosine similarity between a free-text
//! interest and each event's title, description and location. Tokens are
//! lowercased runs of two or more word characters with English stop words
//! removed. `idf = ln((1 + n) / (1 + df)) + 1` and vectors are L2-normalized.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::event::Event;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
        "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
        "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything",
        "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became", "because",
        "become", "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below",
        "beside", "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call",
        "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail",
        "do", "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
        "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
        "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
        "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
        "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
        "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
        "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
        "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
        "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
        "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
        "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
        "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
        "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
        "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
        "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
        "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
        "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
        "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
        "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
        "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together",
        "too", "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up",
        "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
        "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
        "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom",
        "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
        "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Sparse term vector: vocabulary index -> weight.
type TermVector = HashMap<usize, f64>;

/// TF-IDF model fitted over a snapshot of events.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    documents: Vec<TermVector>,
}

impl Recommender {
    /// Fit the model; one document per event, same order as `events`.
    pub fn fit(events: &[Event]) -> Self {
        let token_lists: Vec<Vec<String>> =
            events.iter().map(|e| tokenize(&corpus_text(e))).collect();

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();

        for tokens in &token_lists {
            let unique: HashSet<&String> = tokens.iter().collect();
            for token in unique {
                let next = vocabulary.len();
                let idx = *vocabulary.entry(token.clone()).or_insert(next);
                if idx == doc_freq.len() {
                    doc_freq.push(0);
                }
                doc_freq[idx] += 1;
            }
        }

        let n = events.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut model = Recommender {
            vocabulary,
            idf,
            documents: Vec::new(),
        };
        model.documents = token_lists.iter().map(|t| model.vectorize(t)).collect();
        model
    }

    /// Cosine similarity of `interest` against every fitted event.
    pub fn scores(&self, interest: &str) -> Vec<f64> {
        let query = self.vectorize(&tokenize(interest));

        self.documents
            .iter()
            .map(|doc| {
                query
                    .iter()
                    .filter_map(|(idx, q)| doc.get(idx).map(|d| q * d))
                    .sum()
            })
            .collect()
    }

    /// Up to `top_n` events with a positive score, best first.
    /// Equal scores keep the order of `events`.
    pub fn recommend<'a>(
        &self,
        events: &'a [Event],
        interest: &str,
        top_n: usize,
    ) -> Vec<&'a Event> {
        let mut ranked: Vec<(usize, f64)> = self
            .scores(interest)
            .into_iter()
            .enumerate()
            .filter(|(_, score)| *score > 0.0)
            .collect();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranked
            .into_iter()
            .take(top_n)
            .filter_map(|(idx, _)| events.get(idx))
            .collect()
    }

    /// Term counts weighted by idf, L2-normalized. Unknown terms are dropped.
    fn vectorize(&self, tokens: &[String]) -> TermVector {
        let mut vector = TermVector::new();
        for token in tokens {
            if let Some(&idx) = self.vocabulary.get(token) {
                *vector.entry(idx).or_insert(0.0) += self.idf[idx];
            }
        }

        let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            vector.values_mut().for_each(|w| *w /= norm);
        }
        vector
    }
}

/// Text an event is matched on.
fn corpus_text(event: &Event) -> String {
    [
        Some(event.title.as_str()),
        event.description.as_deref(),
        event.location.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}

fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(t))
        .map(String::from)
        .collect()
}
