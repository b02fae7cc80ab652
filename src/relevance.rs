//! Pairwise topical relevance and anchor-text selection.

use crate::corpus::PageProfile;
use crate::text::{normalize_heading, tokenize};
use std::collections::HashSet;

const TITLE_WEIGHT: u32 = 5;
const HEADING_WEIGHT: u32 = 3;
/// Cap on how much a single repeated body term can contribute.
const BODY_TERM_CAP: usize = 5;
const MAX_REASON_TERMS: usize = 3;
const MAX_HEADING_ANCHOR_WORDS: usize = 5;
const HEADING_ANCHOR_BONUS: f64 = 1.5;
const FALLBACK_ANCHOR_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceScore {
    pub score: u32,
    pub shared_terms: Vec<String>,
    pub reason: String,
}

/// Scores how strongly `source` is about what `target` is about.
///
/// Title overlap is the strongest signal, then headings, then body term
/// frequency. Both profiles must already have domain stop words removed.
pub fn score_relevance(source: &PageProfile, target: &PageProfile) -> RelevanceScore {
    let key_terms = &target.key_terms;

    let title_matches: Vec<&String> = source.title_terms.intersection(key_terms).collect();
    let heading_matches: Vec<&String> = source.heading_terms.intersection(key_terms).collect();

    let mut body_matches: Vec<(&String, usize)> = key_terms
        .iter()
        .filter_map(|term| source.body_counts.get(term).map(|count| (term, *count)))
        .collect();
    body_matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let body_score: usize = body_matches
        .iter()
        .map(|(_, count)| (*count).min(BODY_TERM_CAP))
        .sum();

    let score = TITLE_WEIGHT * title_matches.len() as u32
        + HEADING_WEIGHT * heading_matches.len() as u32
        + body_score as u32;

    let mut shared_terms: Vec<String> = Vec::new();
    for term in title_matches
        .into_iter()
        .chain(heading_matches)
        .chain(body_matches.into_iter().map(|(term, _)| term))
    {
        if !shared_terms.contains(term) {
            shared_terms.push(term.clone());
        }
    }

    let reason = if shared_terms.is_empty() {
        "No shared topics".to_string()
    } else {
        let named: Vec<&str> = shared_terms
            .iter()
            .take(MAX_REASON_TERMS)
            .map(String::as_str)
            .collect();
        format!("Both pages cover: {}", named.join(", "))
    };

    RelevanceScore {
        score,
        shared_terms,
        reason,
    }
}

/// Picks the source phrase that best describes the target as anchor text.
///
/// Candidates are the source body 2-/3-grams and short headings that mention
/// the target's key terms; boilerplate phrases never qualify. Falls back to the
/// target title when nothing matches.
pub fn find_anchor_text(
    source: &PageProfile,
    target: &PageProfile,
    target_title: &str,
    boilerplate: &HashSet<String>,
) -> String {
    let mut best: Option<(f64, String)> = None;
    let mut consider = |score: f64, text: &str| {
        if score > 0.0 && best.as_ref().is_none_or(|(top, _)| score > *top) {
            best = Some((score, text.to_string()));
        }
    };

    for phrase in &source.phrases {
        if boilerplate.contains(phrase) {
            continue;
        }
        let words: Vec<&str> = phrase.split(' ').collect();
        let matched = words
            .iter()
            .filter(|w| target.key_terms.contains(**w))
            .count();
        consider(matched as f64 / words.len() as f64, phrase.as_str());
    }

    for heading in &source.headings {
        if heading.split_whitespace().count() > MAX_HEADING_ANCHOR_WORDS
            || boilerplate.contains(&normalize_heading(heading))
        {
            continue;
        }
        let words = tokenize(heading);
        if words.is_empty() {
            continue;
        }
        let matched = words
            .iter()
            .filter(|w| target.key_terms.contains(*w))
            .count();
        consider(
            matched as f64 / words.len() as f64 * HEADING_ANCHOR_BONUS,
            heading.as_str(),
        );
    }

    match best {
        Some((_, text)) => text,
        None => truncate_chars(target_title.trim(), FALLBACK_ANCHOR_CHARS),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect::<String>().trim_end().to_string()
}
