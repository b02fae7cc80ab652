//! Brand mention detection with disambiguation of brand names that are also
//! everyday words ("Make", "Ghost", "Wave").

use crate::config::AnalysisOptions;
use crate::models::{AffiliateProgram, BrandMention, PageData};
use regex::Regex;
use std::collections::HashSet;

pub const DEFAULT_AMBIGUOUS_BRAND_WORDS: &[&str] = &[
    "make", "ghost", "wave", "notion", "zoom", "slack", "square", "stripe", "buffer", "drift",
    "loom", "monday", "frame", "copper", "close", "front", "hive", "linear", "pitch", "mint",
    "honey", "later", "bonsai", "wise", "mercury", "ramp", "fathom", "plausible", "segment",
    "amplitude", "beacon", "teachable", "medium", "carrot", "jasper",
];

pub const DEFAULT_TECH_CONTEXT_WORDS: &[&str] = &[
    "software", "app", "apps", "tool", "tools", "platform", "saas", "integration",
    "integrations", "integrate", "automate", "automates", "automation", "automations",
    "workflow", "workflows", "api", "plugin", "plugins", "dashboard", "account", "subscription",
    "pricing", "plan", "plans", "signup", "cloud", "hosting", "trial", "features", "template",
    "templates", "zapier", "crm", "analytics", "online", "editor", "extension", "install",
    "startup", "payments", "checkout", "invoicing", "meetings", "chat", "messaging", "seo",
    "marketing", "newsletter", "no-code", "nocode", "website", "store", "ecommerce",
];

/// TLDs that turn a brand word into a domain name ("make" -> "make.com").
const BRAND_DOMAIN_SUFFIXES: &str = "com|io|co|app|ai|net|org|so|dev|me|hq";

const CONTEXT_CHARS: usize = 60;
const TECH_WINDOW_CHARS: usize = 80;

struct CompiledVariation {
    pattern: Regex,
    /// Present only for ambiguous variations, which need corroboration
    domain_pattern: Option<Regex>,
}

struct CompiledProgram<'p> {
    program: &'p AffiliateProgram,
    variations: Vec<CompiledVariation>,
    link_slugs: Vec<String>,
}

/// All accepted mentions of one brand across the page set.
#[derive(Debug, Clone)]
pub struct BrandMentions<'p> {
    pub program: &'p AffiliateProgram,
    pub mentions: Vec<BrandMention>,
}

pub struct BrandMatcher {
    ambiguous_words: HashSet<String>,
    tech_words: HashSet<String>,
    min_signals: usize,
}

impl BrandMatcher {
    pub fn new(options: &AnalysisOptions) -> Self {
        Self {
            ambiguous_words: options
                .ambiguous_brand_words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .collect(),
            tech_words: options
                .tech_context_words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .collect(),
            min_signals: options.min_disambiguation_signals,
        }
    }

    /// Finds every brand of `programs` mentioned on `pages`.
    ///
    /// Brands come back in catalog order; brands without an accepted mention
    /// are left out.
    pub fn find_mentions<'p>(
        &self,
        pages: &[PageData],
        programs: &'p [AffiliateProgram],
    ) -> Vec<BrandMentions<'p>> {
        let compiled: Vec<CompiledProgram<'p>> =
            programs.iter().map(|p| self.compile(p)).collect();

        let mut results = Vec::new();
        for program in &compiled {
            let mentions: Vec<BrandMention> = pages
                .iter()
                .flat_map(|page| self.page_mentions(page, program))
                .collect();

            if !mentions.is_empty() {
                results.push(BrandMentions {
                    program: program.program,
                    mentions,
                });
            }
        }

        tracing::debug!(
            pages = pages.len(),
            programs = programs.len(),
            brands_found = results.len(),
            "Brand mention scan complete"
        );

        results
    }

    fn compile<'p>(&self, program: &'p AffiliateProgram) -> CompiledProgram<'p> {
        let variations: Vec<&str> = if program.variations.is_empty() {
            vec![program.brand.as_str()]
        } else {
            program.variations.iter().map(String::as_str).collect()
        };

        let compiled = variations
            .into_iter()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .filter_map(|variation| {
                let escaped = regex::escape(variation);
                let pattern = match Regex::new(&format!(r"(?i)\b{}\b", escaped)) {
                    Ok(pattern) => pattern,
                    Err(e) => {
                        tracing::warn!(brand = %program.brand, variation, error = %e, "Skipping brand variation");
                        return None;
                    }
                };
                let domain_pattern = if self.is_ambiguous(variation) {
                    Regex::new(&format!(r"(?i)\b{}\.(?:{})\b", escaped, BRAND_DOMAIN_SUFFIXES))
                        .ok()
                } else {
                    None
                };
                Some(CompiledVariation {
                    pattern,
                    domain_pattern,
                })
            })
            .collect();

        let brand = program.brand.to_lowercase();
        let words: Vec<&str> = brand.split_whitespace().collect();
        let mut link_slugs = vec![words.concat()];
        if words.len() > 1 {
            link_slugs.push(words.join("-"));
        }

        CompiledProgram {
            program,
            variations: compiled,
            link_slugs,
        }
    }

    /// Single everyday words need corroboration; multi-word and domain-style
    /// variations are specific enough on their own.
    fn is_ambiguous(&self, variation: &str) -> bool {
        let variation = variation.trim();
        !variation.contains(char::is_whitespace)
            && !variation.contains('.')
            && self.ambiguous_words.contains(&variation.to_lowercase())
    }

    fn page_mentions(&self, page: &PageData, program: &CompiledProgram) -> Vec<BrandMention> {
        let text = search_text(page);

        // Variations are ordered most specific first; the first one with an
        // accepted match on this page wins.
        let mut accepted: Vec<(usize, usize)> = Vec::new();
        for variation in &program.variations {
            accepted = variation
                .pattern
                .find_iter(&text)
                .map(|m| (m.start(), m.end()))
                .filter(|&(start, end)| match &variation.domain_pattern {
                    Some(domain) => {
                        self.signal_count(&text, start, end, domain, page) >= self.min_signals
                    }
                    None => true,
                })
                .collect();

            if !accepted.is_empty() {
                break;
            }
        }

        if accepted.is_empty() {
            return Vec::new();
        }

        let brand_links: Vec<&String> = page
            .internal_links
            .iter()
            .filter(|href| {
                let href = href.to_lowercase();
                program
                    .link_slugs
                    .iter()
                    .any(|slug| !slug.is_empty() && href.contains(slug.as_str()))
            })
            .collect();

        // Each link to the brand accounts for one mention, in order of appearance
        accepted
            .into_iter()
            .enumerate()
            .map(|(i, (start, end))| {
                let link = brand_links.get(i);
                BrandMention {
                    brand: program.program.brand.clone(),
                    page_url: page.url.clone(),
                    page_title: page.title.clone(),
                    context: context_snippet(&text, start, end),
                    is_linked: link.is_some(),
                    link_url: link.map(|href| href.to_string()),
                }
            })
            .collect()
    }

    /// Counts independent signals that an everyday word is used as a brand name.
    fn signal_count(
        &self,
        text: &str,
        start: usize,
        end: usize,
        domain: &Regex,
        page: &PageData,
    ) -> usize {
        let mut signals = 0;

        if is_mid_sentence_capitalized(text, start) {
            signals += 1;
        }

        let before = &text[back_chars(text, start, TECH_WINDOW_CHARS)..start];
        let after = &text[end..forward_chars(text, end, TECH_WINDOW_CHARS)];
        let has_tech_context = [before, after].iter().any(|window| {
            window
                .to_lowercase()
                .split(|c: char| !(c.is_alphanumeric() || c == '-'))
                .any(|word| self.tech_words.contains(word))
        });
        if has_tech_context {
            signals += 1;
        }

        let domain_elsewhere = domain
            .find_iter(text)
            .any(|m| m.end() <= start || m.start() >= end)
            || page
                .internal_links
                .iter()
                .any(|href| domain.is_match(href));
        if domain_elsewhere {
            signals += 1;
        }

        signals
    }
}

/// Title, headings and body joined with line breaks so each acts as a sentence boundary.
fn search_text(page: &PageData) -> String {
    let mut parts: Vec<&str> = vec![page.title.as_str(), page.h1.as_str()];
    parts.extend(page.headings.iter().map(String::as_str));
    parts.push(page.body_text.as_str());
    parts
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_mid_sentence_capitalized(text: &str, start: usize) -> bool {
    let starts_upper = text[start..]
        .chars()
        .next()
        .is_some_and(char::is_uppercase);
    if !starts_upper || text[..start].chars().count() < 2 {
        return false;
    }

    let previous = text[..start]
        .trim_end_matches([' ', '\t'])
        .chars()
        .next_back();
    !matches!(previous, None | Some('.' | '!' | '?' | '\n' | '\r'))
}

/// Byte offset `n` characters before `idx` (or 0).
fn back_chars(text: &str, idx: usize, n: usize) -> usize {
    text[..idx]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map_or(idx, |(i, _)| i)
}

/// Byte offset `n` characters after `idx` (or the end of `text`).
fn forward_chars(text: &str, idx: usize, n: usize) -> usize {
    text[idx..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| idx + i)
}

/// Up to 60 characters either side of the match, whitespace collapsed, with
/// ellipses where the text was cut.
fn context_snippet(text: &str, start: usize, end: usize) -> String {
    let from = back_chars(text, start, CONTEXT_CHARS);
    let to = forward_chars(text, end, CONTEXT_CHARS);
    let body = text[from..to].split_whitespace().collect::<Vec<_>>().join(" ");

    let mut snippet = String::with_capacity(body.len() + 6);
    if from > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(&body);
    if to < text.len() {
        snippet.push_str("...");
    }
    snippet
}
