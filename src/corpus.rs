//! Site-wide statistics: boilerplate phrases, domain stop words and per-page term profiles.

use crate::config::AnalysisOptions;
use crate::models::PageData;
use crate::text::{ngrams, normalize_heading, tfidf, tokenize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// How many top TF-IDF body terms join a page's title terms as key terms.
const KEY_BODY_TERMS: usize = 10;

/// Counts, for every item, how many pages produced it, and keeps the ones at or
/// above `threshold` share of the page set.
fn frequent_items<I>(per_page: I, page_count: usize, threshold: f64) -> HashSet<String>
where
    I: IntoIterator<Item = HashSet<String>>,
{
    if page_count == 0 {
        return HashSet::new();
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for items in per_page {
        for item in items {
            *counts.entry(item).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count as f64 / page_count as f64 >= threshold)
        .map(|(item, _)| item)
        .collect()
}

fn body_phrases(tokens: &[String]) -> Vec<String> {
    let mut phrases = ngrams(tokens, 2);
    phrases.extend(ngrams(tokens, 3));
    phrases
}

/// Phrases (body 2-/3-grams and normalized headings) found on at least
/// `threshold` of the pages. These are template/navigation text.
pub fn build_boilerplate_index(pages: &[PageData], threshold: f64) -> HashSet<String> {
    let per_page = pages.iter().map(|page| {
        let tokens = tokenize(&page.body_text);
        let mut phrases: HashSet<String> = body_phrases(&tokens).into_iter().collect();
        phrases.extend(
            page_headings(page)
                .map(normalize_heading)
                .filter(|h| !h.is_empty()),
        );
        phrases
    });

    frequent_items(per_page, pages.len(), threshold)
}

/// Single words found on at least `threshold` of the pages.
pub fn build_domain_stop_words(pages: &[PageData], threshold: f64) -> HashSet<String> {
    let per_page = pages
        .iter()
        .map(|page| tokenize(&page_text(page)).into_iter().collect());

    frequent_items(per_page, pages.len(), threshold)
}

/// H1 followed by the remaining headings, skipping blanks.
pub(crate) fn page_headings(page: &PageData) -> impl Iterator<Item = &str> {
    std::iter::once(page.h1.as_str())
        .chain(page.headings.iter().map(String::as_str))
        .filter(|h| !h.trim().is_empty())
}

fn page_text(page: &PageData) -> String {
    let mut text = String::with_capacity(page.title.len() + page.body_text.len() + 64);
    text.push_str(&page.title);
    for heading in page_headings(page) {
        text.push('\n');
        text.push_str(heading);
    }
    text.push('\n');
    text.push_str(&page.body_text);
    text
}

/// Term view of a single page with domain stop words already removed.
#[derive(Debug, Clone, Default)]
pub struct PageProfile {
    pub title_terms: BTreeSet<String>,
    pub heading_terms: BTreeSet<String>,
    pub body_counts: BTreeMap<String, usize>,
    /// Terms that describe what this page is about when it is a link target
    pub key_terms: BTreeSet<String>,
    /// Unique body 2-/3-grams in order of first appearance
    pub phrases: Vec<String>,
    /// Original heading text, H1 first
    pub headings: Vec<String>,
}

/// Indexes built once per page set and shared by every pairwise comparison.
#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    pub boilerplate: HashSet<String>,
    pub domain_stop_words: HashSet<String>,
    pub profiles: Vec<PageProfile>,
}

impl CorpusStats {
    pub fn build(pages: &[PageData], options: &AnalysisOptions) -> Self {
        let (boilerplate, domain_stop_words) = if pages.len() >= options.min_pages_for_corpus_stats
        {
            (
                build_boilerplate_index(pages, options.boilerplate_threshold),
                build_domain_stop_words(pages, options.domain_stop_word_threshold),
            )
        } else {
            (HashSet::new(), HashSet::new())
        };

        let body_tokens: Vec<Vec<String>> =
            pages.iter().map(|page| tokenize(&page.body_text)).collect();

        let profiles = pages
            .iter()
            .enumerate()
            .map(|(index, page)| {
                Self::profile(page, &body_tokens, index, &domain_stop_words)
            })
            .collect();

        tracing::debug!(
            pages = pages.len(),
            boilerplate = boilerplate.len(),
            domain_stop_words = domain_stop_words.len(),
            "Built corpus statistics"
        );

        Self {
            boilerplate,
            domain_stop_words,
            profiles,
        }
    }

    fn profile(
        page: &PageData,
        body_tokens: &[Vec<String>],
        index: usize,
        stop_words: &HashSet<String>,
    ) -> PageProfile {
        let keep = |term: &String| !stop_words.contains(term);

        let title_terms: BTreeSet<String> =
            tokenize(&page.title).into_iter().filter(keep).collect();
        let heading_terms: BTreeSet<String> = page_headings(page)
            .flat_map(tokenize)
            .filter(keep)
            .collect();

        let tokens = &body_tokens[index];
        let mut body_counts = BTreeMap::new();
        for token in tokens.iter().filter(|t| keep(*t)) {
            *body_counts.entry(token.clone()).or_insert(0) += 1;
        }

        let mut key_terms = title_terms.clone();
        key_terms.extend(tokenize(&page.h1).into_iter().filter(keep));
        key_terms.extend(
            tfidf(body_tokens, index)
                .into_iter()
                .filter(|(term, score)| *score > 0.0 && keep(term))
                .take(KEY_BODY_TERMS)
                .map(|(term, _)| term),
        );

        let mut seen = HashSet::new();
        let phrases = body_phrases(tokens)
            .into_iter()
            .filter(|phrase| seen.insert(phrase.clone()))
            .collect();

        PageProfile {
            title_terms,
            heading_terms,
            body_counts,
            key_terms,
            phrases,
            headings: page_headings(page).map(|h| h.trim().to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, title: &str, body: &str) -> PageData {
        PageData {
            url: url.to_string(),
            title: title.to_string(),
            body_text: body.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_boilerplate_threshold() {
        let pages: Vec<PageData> = (0..10)
            .map(|i| {
                let body = if i < 4 {
                    format!("premium coffee grinders topic{i} details")
                } else {
                    format!("unique story number{i} words")
                };
                page(&format!("https://example.com/{i}"), "Title", &body)
            })
            .collect();

        let boilerplate = build_boilerplate_index(&pages, 0.4);
        assert!(boilerplate.contains("premium coffee grinders"));
        assert!(boilerplate.contains("premium coffee"));

        let strict = build_boilerplate_index(&pages, 0.5);
        assert!(!strict.contains("premium coffee grinders"));
    }

    #[test]
    fn test_boilerplate_includes_shared_headings() {
        let pages: Vec<PageData> = (0..5)
            .map(|i| PageData {
                headings: vec!["Related   Articles".to_string(), format!("Section {i}")],
                ..page(&format!("https://example.com/{i}"), "Title", "body text")
            })
            .collect();

        let boilerplate = build_boilerplate_index(&pages, 0.4);
        assert!(boilerplate.contains("related articles"));
        assert!(!boilerplate.contains("section 1"));
    }

    #[test]
    fn test_domain_stop_words() {
        let pages = vec![
            page("https://a.test/1", "Espresso machines", "espresso beans grinder"),
            page("https://a.test/2", "Espresso cups", "espresso latte art"),
            page("https://a.test/3", "Tea kettles", "kettle water boil"),
            page("https://a.test/4", "Espresso tamper", "tamper pressure"),
        ];

        let stop_words = build_domain_stop_words(&pages, 0.5);
        assert!(stop_words.contains("espresso"));
        assert!(!stop_words.contains("kettle"));
        assert!(!stop_words.contains("tamper"));
    }

    #[test]
    fn test_empty_page_set() {
        assert!(build_boilerplate_index(&[], 0.4).is_empty());
        assert!(build_domain_stop_words(&[], 0.5).is_empty());
        let stats = CorpusStats::build(&[], &AnalysisOptions::default());
        assert!(stats.profiles.is_empty());
    }

    #[test]
    fn test_small_sites_skip_corpus_indexes() {
        let pages = vec![
            page("https://a.test/1", "Shopify apps", "shopify apps list"),
            page("https://a.test/2", "Shopify pricing", "shopify pricing plans"),
        ];

        let stats = CorpusStats::build(&pages, &AnalysisOptions::default());
        assert!(stats.boilerplate.is_empty());
        assert!(stats.domain_stop_words.is_empty());
        assert!(stats.profiles[1].key_terms.contains("shopify"));
        assert!(stats.profiles[1].key_terms.contains("pricing"));
    }

    #[test]
    fn test_profile_drops_domain_stop_words() {
        let pages: Vec<PageData> = (0..4)
            .map(|i| {
                page(
                    &format!("https://a.test/{i}"),
                    &format!("Espresso guide part{i}"),
                    &format!("espresso grinder{i} review"),
                )
            })
            .collect();

        let stats = CorpusStats::build(&pages, &AnalysisOptions::default());
        assert!(stats.domain_stop_words.contains("espresso"));
        let profile = &stats.profiles[0];
        assert!(!profile.title_terms.contains("espresso"));
        assert!(!profile.key_terms.contains("espresso"));
        assert!(profile.key_terms.contains("part0"));
        assert_eq!(profile.body_counts.get("grinder0"), Some(&1));
    }
}
