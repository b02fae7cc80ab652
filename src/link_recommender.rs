use crate::config::AnalysisOptions;
use crate::corpus::CorpusStats;
use crate::models::{LinkRecommendation, PageData, Relevance};
use crate::relevance::{find_anchor_text, score_relevance};
use std::collections::{HashMap, HashSet};
use url::Url;

/// Sites with more domain stop words than this are topically homogeneous and
/// need a higher minimum score before a pair counts as related.
const HOMOGENEOUS_SITE_STOP_WORDS: usize = 5;
const MIN_SCORE_HOMOGENEOUS: u32 = 8;
const MIN_SCORE_DEFAULT: u32 = 5;

const LONG_PAGE_BODY_CHARS: usize = 3000;
const MAX_LINKS_LONG_PAGE: usize = 5;
const MAX_LINKS_SHORT_PAGE: usize = 3;

pub struct LinkRecommender;

impl LinkRecommender {
    /// Recommends internal links between `pages`, best candidates first.
    ///
    /// With `focus_url` set, only pairs where that page is the source or the
    /// target are considered.
    pub fn find_link_opportunities(
        pages: &[PageData],
        focus_url: Option<&str>,
        options: &AnalysisOptions,
    ) -> Vec<LinkRecommendation> {
        let stats = CorpusStats::build(pages, options);
        let min_score = if stats.domain_stop_words.len() > HOMOGENEOUS_SITE_STOP_WORDS {
            MIN_SCORE_HOMOGENEOUS
        } else {
            MIN_SCORE_DEFAULT
        };

        let paths: Vec<String> = pages.iter().map(|p| normalize_path(&p.url)).collect();
        let focus_path = focus_url.map(normalize_path);

        let mut candidates: Vec<LinkRecommendation> = Vec::new();

        for (source_idx, source) in pages.iter().enumerate() {
            let base = Url::parse(&source.url).ok();
            let linked_paths: HashSet<String> = source
                .internal_links
                .iter()
                .filter(|href| Self::is_same_site(&source.url, href))
                .map(|href| Self::resolve_path(base.as_ref(), href))
                .collect();
            let boost = Self::priority_boost(source.internal_links.len());

            for (target_idx, target) in pages.iter().enumerate() {
                if source_idx == target_idx || paths[source_idx] == paths[target_idx] {
                    continue;
                }
                if let Some(focus) = &focus_path
                    && &paths[source_idx] != focus
                    && &paths[target_idx] != focus
                {
                    continue;
                }

                let source_profile = &stats.profiles[source_idx];
                let target_profile = &stats.profiles[target_idx];

                let relevance = score_relevance(source_profile, target_profile);
                if relevance.score < min_score {
                    continue;
                }

                let anchor = find_anchor_text(
                    source_profile,
                    target_profile,
                    &target.title,
                    &stats.boilerplate,
                );
                let anchor = if anchor.is_empty() {
                    target.url.clone()
                } else {
                    anchor
                };

                candidates.push(LinkRecommendation {
                    source_url: source.url.clone(),
                    source_title: source.title.clone(),
                    target_url: target.url.clone(),
                    target_title: target.title.clone(),
                    suggested_anchor_text: anchor,
                    relevance_score: (relevance.score as f64 * boost * 10.0).round() / 10.0,
                    relevance: Relevance::from_score(relevance.score),
                    reason: relevance.reason,
                    already_linked: linked_paths.contains(&paths[target_idx]),
                });
            }
        }

        // Stable sort keeps page order for equal scores
        candidates.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

        let caps: HashMap<&str, usize> = pages
            .iter()
            .map(|page| (page.url.as_str(), Self::max_links_for(page)))
            .collect();
        let mut per_source: HashMap<String, usize> = HashMap::new();
        let total_candidates = candidates.len();

        let recommendations: Vec<LinkRecommendation> = candidates
            .into_iter()
            .filter(|rec| {
                let cap = caps
                    .get(rec.source_url.as_str())
                    .copied()
                    .unwrap_or(MAX_LINKS_SHORT_PAGE);
                let used = per_source.entry(rec.source_url.clone()).or_insert(0);
                if *used < cap {
                    *used += 1;
                    true
                } else {
                    false
                }
            })
            .collect();

        tracing::debug!(
            pages = pages.len(),
            min_score,
            candidates = total_candidates,
            recommendations = recommendations.len(),
            "Link recommendations assembled"
        );

        recommendations
    }

    /// Pages with few outbound links need new links most.
    fn priority_boost(outbound_links: usize) -> f64 {
        if outbound_links < 3 {
            1.5
        } else if outbound_links < 10 {
            1.2
        } else {
            1.0
        }
    }

    fn max_links_for(page: &PageData) -> usize {
        if page.body_text.chars().count() > LONG_PAGE_BODY_CHARS {
            MAX_LINKS_LONG_PAGE
        } else {
            MAX_LINKS_SHORT_PAGE
        }
    }

    /// Path an href points to, resolved against the page it appears on.
    fn resolve_path(base: Option<&Url>, href: &str) -> String {
        match base.map(|base| base.join(href.trim())) {
            Some(Ok(resolved)) => normalize_path(resolved.as_str()),
            _ => normalize_path(href),
        }
    }

    /// Relative hrefs always belong to the page's site; absolute ones must share its host.
    fn is_same_site(page_url: &str, href: &str) -> bool {
        match (Url::parse(page_url), Url::parse(href)) {
            (Ok(page), Ok(link)) => page.host_str() == link.host_str(),
            (_, Err(_)) => true,
            (Err(_), Ok(_)) => true,
        }
    }
}

/// Lowercased URL path without trailing slashes (`/` for the root).
///
/// Strings that do not parse as absolute URLs are cleaned up by hand instead,
/// so relative hrefs and junk never fail.
pub fn normalize_path(url: &str) -> String {
    let path = match Url::parse(url.trim()) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => {
            let mut rest = url.trim();
            if let Some(pos) = rest.find("://") {
                rest = &rest[pos + 3..];
                rest = rest.find('/').map_or("", |slash| &rest[slash..]);
            }
            let end = rest.find(['?', '#']).unwrap_or(rest.len());
            rest[..end].to_string()
        }
    };

    let trimmed = path.trim_end_matches('/').to_lowercase();
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed
    } else {
        format!("/{}", trimmed)
    }
}
