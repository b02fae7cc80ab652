use crate::models::{
    AffiliateOpportunity, AffiliateReport, AnalysisReport, AnalysisSummary, LinkRecommendation,
    Relevance,
};
use anyhow::{Context, Result};
use colored::*;
use std::fs::File;
use std::io::Write;

/// Recommendations printed per section in the text report.
const TEXT_REPORT_LIMIT: usize = 25;

pub struct Reporter;

impl Reporter {
    pub fn generate_report(
        snapshot: &str,
        pages_analyzed: usize,
        link_recommendations: Option<Vec<LinkRecommendation>>,
        affiliate: Option<AffiliateReport>,
    ) -> AnalysisReport {
        let summary = Self::calculate_summary(
            pages_analyzed,
            link_recommendations.as_deref(),
            affiliate.as_ref(),
        );
        let timestamp = chrono::Utc::now().to_rfc3339();

        AnalysisReport {
            snapshot: snapshot.to_string(),
            timestamp,
            link_recommendations,
            affiliate,
            summary,
        }
    }

    fn calculate_summary(
        pages_analyzed: usize,
        links: Option<&[LinkRecommendation]>,
        affiliate: Option<&AffiliateReport>,
    ) -> AnalysisSummary {
        let links = links.unwrap_or_default();

        AnalysisSummary {
            pages_analyzed,
            link_recommendations: links.len(),
            high_relevance_links: links
                .iter()
                .filter(|rec| rec.relevance == Relevance::High)
                .count(),
            brands_found: affiliate.map_or(0, |a| a.total_brands_found),
            opportunities: affiliate.map_or(0, |a| a.opportunities.len()),
            suggested_programs: affiliate.map_or(0, |a| a.suggested_programs.len()),
        }
    }

    pub fn print_text_report(report: &AnalysisReport) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "Linkwise - Analysis Report".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!("{}: {}", "Snapshot".bright_white().bold(), report.snapshot);
        println!("{}: {}", "Timestamp".bright_white().bold(), report.timestamp);
        println!();

        println!("{}", "Summary".bright_yellow().bold().underline());
        println!(
            "  Pages Analyzed:        {}",
            report.summary.pages_analyzed.to_string().bright_green()
        );
        if report.link_recommendations.is_some() {
            println!(
                "  Link Recommendations:  {}",
                report.summary.link_recommendations.to_string().bright_green()
            );
            println!(
                "  High Relevance:        {}",
                report.summary.high_relevance_links.to_string().bright_green()
            );
        }
        if report.affiliate.is_some() {
            println!(
                "  Brands Found:          {}",
                report.summary.brands_found.to_string().bright_green()
            );
            println!(
                "  Opportunities:         {}",
                if report.summary.opportunities > 0 {
                    report.summary.opportunities.to_string().yellow()
                } else {
                    report.summary.opportunities.to_string().bright_green()
                }
            );
            println!(
                "  Suggested Programs:    {}",
                report.summary.suggested_programs.to_string().bright_cyan()
            );
        }
        println!();

        if let Some(links) = &report.link_recommendations {
            Self::print_links(links);
        }
        if let Some(affiliate) = &report.affiliate {
            Self::print_affiliate(affiliate);
        }

        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    fn print_links(links: &[LinkRecommendation]) {
        println!(
            "{}",
            "Internal Link Recommendations".bright_yellow().bold().underline()
        );
        if links.is_empty() {
            println!("  No related page pairs found.");
            println!();
            return;
        }

        for rec in links.iter().take(TEXT_REPORT_LIMIT) {
            let relevance = match rec.relevance {
                Relevance::High => "HIGH".bright_green(),
                Relevance::Medium => "MED ".yellow(),
                Relevance::Low => "LOW ".dimmed(),
            };
            println!();
            println!(
                "  [{}] {} {} {}",
                relevance,
                rec.source_url.bright_white(),
                "->".bright_blue(),
                rec.target_url.bright_white()
            );
            println!("    Anchor: \"{}\"", rec.suggested_anchor_text.bright_cyan());
            println!("    Score:  {:.1}  {}", rec.relevance_score, rec.reason);
            if rec.already_linked {
                println!("    {}", "Already linked".dimmed());
            }
        }
        if links.len() > TEXT_REPORT_LIMIT {
            println!();
            println!(
                "  ... and {} more (use --output json for the full list)",
                links.len() - TEXT_REPORT_LIMIT
            );
        }
        println!();
    }

    fn print_affiliate(report: &AffiliateReport) {
        println!("{}", "Affiliate Opportunities".bright_yellow().bold().underline());
        println!("  Domain: {}", report.domain.bright_white());

        if !report.detected_niches.is_empty() {
            let niches: Vec<String> = report
                .detected_niches
                .iter()
                .take(3)
                .map(|n| format!("{} ({})", n.label, n.score))
                .collect();
            println!("  Niches: {}", niches.join(", "));
        }

        Self::print_bucket("Quick Wins", &report.quick_wins);
        Self::print_bucket("Unlinked Mentions", &report.opportunities);
        Self::print_bucket("Already Linked", &report.already_linked);
        Self::print_bucket("Outreach (no program)", &report.outreach_opportunities);

        if !report.suggested_programs.is_empty() {
            println!();
            println!("  {}", "Suggested Programs".bright_white().bold());
            for suggestion in report.suggested_programs.iter().take(TEXT_REPORT_LIMIT) {
                println!(
                    "    {} [{}] {}",
                    suggestion.program.brand.bright_cyan(),
                    suggestion.program.category,
                    suggestion.reason
                );
            }
        }
        println!();
    }

    fn print_bucket(name: &str, bucket: &[AffiliateOpportunity]) {
        if bucket.is_empty() {
            return;
        }
        println!();
        println!("  {}", name.bright_white().bold());
        for opportunity in bucket.iter().take(TEXT_REPORT_LIMIT) {
            println!(
                "    {} score {} | {} mentions ({} unlinked) on {} page(s)",
                opportunity.brand.bright_cyan(),
                opportunity.score.to_string().bright_green(),
                opportunity.total_mentions,
                opportunity.unlinked_mentions,
                opportunity.pages.len()
            );
        }
    }

    pub fn save_json_report(report: &AnalysisReport, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(filename)
            .with_context(|| format!("Failed to create report file: {}", filename))?;
        file.write_all(json.as_bytes())?;
        println!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}
