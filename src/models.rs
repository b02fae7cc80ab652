use serde::{Deserialize, Serialize};

/// A crawled page as handed over by the crawler. Read-only to the analyzers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageData {
    pub url: String,
    pub title: String,
    pub h1: String,
    pub headings: Vec<String>,
    pub meta_description: String,
    pub body_text: String,
    pub internal_links: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramType {
    Flat,
    Percentage,
    Recurring,
    None,
}

/// Reference entry from the affiliate program catalog.
///
/// `variations` are matched in order and must be listed from most specific to
/// least specific: matching stops at the first variation that yields an
/// accepted mention on a page, so reordering changes which snippets are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateProgram {
    pub brand: String,
    #[serde(default)]
    pub variations: Vec<String>,
    #[serde(default)]
    pub program_name: String,
    #[serde(default)]
    pub commission: String,
    #[serde(rename = "type")]
    pub program_type: ProgramType,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub signup_url: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AffiliateProgram {
    pub fn has_affiliate_program(&self) -> bool {
        self.program_type != ProgramType::None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandMention {
    pub brand: String,
    pub page_url: String,
    pub page_title: String,
    pub context: String,
    pub is_linked: bool,
    pub link_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMentions {
    pub url: String,
    pub title: String,
    pub mention_count: usize,
    pub unlinked_count: usize,
    pub contexts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateOpportunity {
    pub brand: String,
    pub program: AffiliateProgram,
    pub total_mentions: usize,
    pub unlinked_mentions: usize,
    pub linked_mentions: usize,
    pub pages: Vec<PageMentions>,
    pub has_affiliate_program: bool,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedProgram {
    pub program: AffiliateProgram,
    pub reason: String,
    pub niche: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicheMatch {
    pub niche: String,
    pub label: String,
    pub score: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateReport {
    pub domain: String,
    pub pages_analyzed: usize,
    pub total_brands_found: usize,
    pub detected_niches: Vec<NicheMatch>,
    pub opportunities: Vec<AffiliateOpportunity>,
    pub already_linked: Vec<AffiliateOpportunity>,
    pub outreach_opportunities: Vec<AffiliateOpportunity>,
    pub quick_wins: Vec<AffiliateOpportunity>,
    pub suggested_programs: Vec<SuggestedProgram>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relevance {
    High,
    Medium,
    Low,
}

impl Relevance {
    pub fn from_score(score: u32) -> Self {
        if score >= 15 {
            Relevance::High
        } else if score >= 8 {
            Relevance::Medium
        } else {
            Relevance::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecommendation {
    pub source_url: String,
    pub source_title: String,
    pub target_url: String,
    pub target_title: String,
    pub suggested_anchor_text: String,
    pub relevance_score: f64,
    pub relevance: Relevance,
    pub reason: String,
    pub already_linked: bool,
}

/// Combined output of a CLI run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub snapshot: String,
    pub timestamp: String,
    pub link_recommendations: Option<Vec<LinkRecommendation>>,
    pub affiliate: Option<AffiliateReport>,
    pub summary: AnalysisSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub pages_analyzed: usize,
    pub link_recommendations: usize,
    pub high_relevance_links: usize,
    pub brands_found: usize,
    pub opportunities: usize,
    pub suggested_programs: usize,
}
