//! Tokenization, n-gram extraction and TF-IDF weighting.

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Common English words plus generic web/navigation terms that carry no topical signal.
pub static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // English
        "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her",
        "was", "one", "our", "out", "day", "get", "has", "him", "his", "how", "its", "may",
        "new", "now", "old", "see", "two", "way", "who", "did", "yes", "let", "put", "say",
        "she", "too", "use", "that", "with", "have", "this", "will", "your", "from", "they",
        "know", "want", "been", "good", "much", "some", "time", "very", "when", "come",
        "here", "just", "like", "long", "make", "many", "more", "only", "over", "such",
        "take", "than", "them", "well", "were", "what", "where", "which", "while", "about",
        "after", "again", "also", "because", "before", "being", "between", "both", "could",
        "does", "doing", "down", "during", "each", "even", "every", "few", "further",
        "into", "most", "other", "should", "same", "their", "theirs", "then", "there",
        "these", "those", "through", "under", "until", "would", "you're", "it's", "don't",
        "can't", "won't", "i'm", "we're", "they're", "that's", "there's", "what's", "let's",
        "own", "off", "once", "why", "above", "below", "against", "own", "really", "thing",
        "things", "still", "need", "needs", "using", "used", "make", "makes", "made",
        "going", "got", "way", "ways", "lot", "lots", "able", "via", "etc", "without",
        "within", "around", "across", "another", "something", "anything", "everything",
        "however", "though", "although", "whether", "yet", "since", "per",
        // Web
        "click", "here", "read", "more", "home", "page", "menu", "login", "sign",
        "search", "share", "comment", "comments", "reply", "posted", "post", "posts",
        "privacy", "policy", "terms", "cookie", "cookies", "copyright", "rights",
        "reserved", "subscribe", "newsletter", "email", "contact", "skip", "content",
        "next", "previous", "prev", "back", "top", "view", "views", "link", "links",
        "follow", "twitter", "facebook", "linkedin", "instagram", "youtube", "pinterest",
        "website", "site", "www", "http", "https", "com", "html", "amp", "nbsp",
    ]
    .into_iter()
    .collect()
});

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Lowercases, strips punctuation (apostrophes and hyphens survive), splits on
/// whitespace and drops short tokens and stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '\'' || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .map(|word| word.trim_matches(|c| c == '\'' || c == '-'))
        .filter(|word| word.chars().count() > 2 && !is_stop_word(word))
        .map(str::to_string)
        .collect()
}

/// Sliding-window phrases of `n` consecutive tokens joined by a single space.
pub fn ngrams(tokens: &[String], n: usize) -> Vec<String> {
    if n == 0 || tokens.len() < n {
        return Vec::new();
    }
    tokens.windows(n).map(|window| window.join(" ")).collect()
}

/// Lowercased, whitespace-collapsed form used to compare headings across pages.
pub fn normalize_heading(heading: &str) -> String {
    heading
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// TF-IDF weights for every term of `documents[target_index]`.
///
/// TF = count in target / total terms in target, IDF = ln(N / df). Terms are
/// returned best first, ties broken alphabetically.
pub fn tfidf(documents: &[Vec<String>], target_index: usize) -> Vec<(String, f64)> {
    let Some(target) = documents.get(target_index) else {
        return Vec::new();
    };
    if target.is_empty() {
        return Vec::new();
    }

    let mut doc_frequency: HashMap<&str, usize> = HashMap::new();
    for doc in documents {
        let unique: HashSet<&str> = doc.iter().map(String::as_str).collect();
        for term in unique {
            *doc_frequency.entry(term).or_insert(0) += 1;
        }
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for term in target {
        *counts.entry(term.as_str()).or_insert(0) += 1;
    }

    let total_terms = target.len() as f64;
    let total_docs = documents.len() as f64;

    let mut scores: Vec<(String, f64)> = counts
        .into_iter()
        .map(|(term, count)| {
            let df = doc_frequency.get(term).copied().unwrap_or(1).max(1) as f64;
            let tf = count as f64 / total_terms;
            (term.to_string(), tf * (total_docs / df).ln())
        })
        .collect();

    scores.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_tokenize_filters_short_and_stop_words() {
        let result = tokenize("The Best Shopify Apps for 2024!");
        assert_eq!(result, vec!["best", "shopify", "apps", "2024"]);
    }

    #[test]
    fn test_tokenize_keeps_apostrophes_and_hyphens() {
        let result = tokenize("Shopify's drop-shipping guide, (updated).");
        assert_eq!(result, vec!["shopify's", "drop-shipping", "guide", "updated"]);
    }

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        assert_eq!(tokenize("make.com/pricing"), vec!["pricing"]);
        assert_eq!(tokenize("kinsta,wp-engine"), vec!["kinsta", "wp-engine"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  a an -- ' ").is_empty());
    }

    #[test]
    fn test_ngrams() {
        let words = tokens(&["coffee", "grinder", "review", "guide"]);
        assert_eq!(
            ngrams(&words, 2),
            vec!["coffee grinder", "grinder review", "review guide"]
        );
        assert_eq!(
            ngrams(&words, 3),
            vec!["coffee grinder review", "grinder review guide"]
        );
        assert!(ngrams(&words, 5).is_empty());
        assert!(ngrams(&words, 0).is_empty());
    }

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading("  Top   Shopify\tPlugins "), "top shopify plugins");
    }

    #[test]
    fn test_tfidf_prefers_rare_terms() {
        let docs = vec![
            tokens(&["shopify", "pricing", "plans"]),
            tokens(&["shopify", "themes"]),
            tokens(&["shopify", "apps"]),
        ];

        let scores = tfidf(&docs, 0);
        assert_eq!(scores.len(), 3);
        // "shopify" is everywhere, so ln(3/3) = 0
        let shopify = scores.iter().find(|(t, _)| t == "shopify").unwrap();
        assert_eq!(shopify.1, 0.0);
        assert!(scores[0].1 > 0.0);
        assert_ne!(scores[0].0, "shopify");
    }

    #[test]
    fn test_tfidf_out_of_range_and_empty() {
        let docs = vec![tokens(&["alpha"]), vec![]];
        assert!(tfidf(&docs, 5).is_empty());
        assert!(tfidf(&docs, 1).is_empty());
    }
}
