use crate::brand_matcher::{BrandMatcher, BrandMentions};
use crate::config::AnalysisOptions;
use crate::models::{
    AffiliateOpportunity, AffiliateProgram, AffiliateReport, NicheMatch, PageData, PageMentions,
    ProgramType,
};
use crate::niche::{detect_niches, is_universal_category, niche_by_id};
use crate::suggestions::suggest_programs;
use std::collections::HashSet;

const MAX_CONTEXTS_PER_PAGE: usize = 3;
const MAX_QUICK_WINS: usize = 5;
/// Below this many keyword hits the top niche is too weak to penalize anything.
const MIN_CONFIDENT_NICHE_SCORE: usize = 5;
const NICHES_CONSIDERED: usize = 2;

const UNLINKED_MENTION_POINTS: f64 = 10.0;
const PAGE_POINTS: f64 = 5.0;
const NO_PROGRAM_MENTION_POINTS: f64 = 2.0;

const RELEVANT_NICHE_FACTOR: f64 = 1.0;
const UNIVERSAL_CATEGORY_FACTOR: f64 = 0.6;
const OFF_NICHE_FACTOR: f64 = 0.2;

pub struct AffiliateAnalyzer;

impl AffiliateAnalyzer {
    /// Scans `pages` for brands from `programs` and ranks what can be monetized.
    pub fn build_report(
        pages: &[PageData],
        programs: &[AffiliateProgram],
        domain: &str,
        options: &AnalysisOptions,
    ) -> AffiliateReport {
        let matcher = BrandMatcher::new(options);
        let brand_mentions = matcher.find_mentions(pages, programs);
        let detected_niches = detect_niches(pages);

        let mut opportunities = Vec::new();
        let mut already_linked = Vec::new();
        let mut outreach_opportunities = Vec::new();
        let mut found_brands: HashSet<String> = HashSet::new();

        for brand in &brand_mentions {
            let opportunity = Self::build_opportunity(brand, &detected_niches);
            found_brands.insert(opportunity.brand.to_lowercase());

            if !opportunity.has_affiliate_program {
                if opportunity.total_mentions > 0 {
                    outreach_opportunities.push(opportunity);
                }
            } else if opportunity.unlinked_mentions > 0 {
                opportunities.push(opportunity);
            } else if opportunity.linked_mentions > 0 {
                already_linked.push(opportunity);
            }
        }

        for bucket in [
            &mut opportunities,
            &mut already_linked,
            &mut outreach_opportunities,
        ] {
            bucket.sort_by(|a, b| b.score.cmp(&a.score));
        }

        let quick_wins: Vec<AffiliateOpportunity> = opportunities
            .iter()
            .take(MAX_QUICK_WINS)
            .cloned()
            .collect();

        let suggested_programs = suggest_programs(programs, &detected_niches, &found_brands);

        tracing::info!(
            domain,
            pages = pages.len(),
            brands = brand_mentions.len(),
            opportunities = opportunities.len(),
            already_linked = already_linked.len(),
            outreach = outreach_opportunities.len(),
            suggestions = suggested_programs.len(),
            "Affiliate report built"
        );

        AffiliateReport {
            domain: domain.to_string(),
            pages_analyzed: pages.len(),
            total_brands_found: brand_mentions.len(),
            detected_niches,
            opportunities,
            already_linked,
            outreach_opportunities,
            quick_wins,
            suggested_programs,
        }
    }

    fn build_opportunity(brand: &BrandMentions, niches: &[NicheMatch]) -> AffiliateOpportunity {
        let mut pages: Vec<PageMentions> = Vec::new();
        for mention in &brand.mentions {
            let index = match pages.iter().position(|p| p.url == mention.page_url) {
                Some(index) => index,
                None => {
                    pages.push(PageMentions {
                        url: mention.page_url.clone(),
                        title: mention.page_title.clone(),
                        mention_count: 0,
                        unlinked_count: 0,
                        contexts: Vec::new(),
                    });
                    pages.len() - 1
                }
            };

            let page = &mut pages[index];
            page.mention_count += 1;
            if !mention.is_linked {
                page.unlinked_count += 1;
            }
            if page.contexts.len() < MAX_CONTEXTS_PER_PAGE {
                page.contexts.push(mention.context.clone());
            }
        }

        let total_mentions = brand.mentions.len();
        let unlinked_mentions = brand.mentions.iter().filter(|m| !m.is_linked).count();
        let linked_mentions = total_mentions - unlinked_mentions;

        let program = brand.program;
        let niche_relevance = Self::niche_relevance(&program.category, niches);
        let raw_score = match Self::type_factor(program.program_type) {
            Some(factor) => {
                (unlinked_mentions as f64 * UNLINKED_MENTION_POINTS
                    + pages.len() as f64 * PAGE_POINTS)
                    * factor
            }
            None => total_mentions as f64 * NO_PROGRAM_MENTION_POINTS,
        };

        AffiliateOpportunity {
            brand: program.brand.clone(),
            program: program.clone(),
            total_mentions,
            unlinked_mentions,
            linked_mentions,
            pages,
            has_affiliate_program: program.has_affiliate_program(),
            score: (raw_score * niche_relevance).round() as u32,
        }
    }

    /// Recurring commissions are worth the most over time.
    fn type_factor(program_type: ProgramType) -> Option<f64> {
        match program_type {
            ProgramType::Recurring => Some(2.0),
            ProgramType::Flat => Some(1.5),
            ProgramType::Percentage => Some(1.3),
            ProgramType::None => None,
        }
    }

    /// How well a program category fits the site's detected niches.
    ///
    /// No penalty is applied when the niche signal is missing or weak.
    pub fn niche_relevance(category: &str, niches: &[NicheMatch]) -> f64 {
        match niches.first() {
            None => return RELEVANT_NICHE_FACTOR,
            Some(top) if top.score < MIN_CONFIDENT_NICHE_SCORE => return RELEVANT_NICHE_FACTOR,
            Some(_) => {}
        }

        let in_top_niches = niches
            .iter()
            .take(NICHES_CONSIDERED)
            .filter_map(|m| niche_by_id(&m.niche))
            .any(|niche| niche.is_relevant(category));

        if in_top_niches {
            RELEVANT_NICHE_FACTOR
        } else if is_universal_category(category) {
            UNIVERSAL_CATEGORY_FACTOR
        } else {
            OFF_NICHE_FACTOR
        }
    }
}
