pub mod affiliate;
pub mod brand_matcher;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod link_recommender;
pub mod models;
pub mod niche;
pub mod relevance;
pub mod reporter;
pub mod snapshot;
pub mod suggestions;
pub mod text;

use affiliate::AffiliateAnalyzer;
use anyhow::{Context, Result};
use cli::Cli;
use colored::*;
use config::{AnalysisOptions, Config};
use link_recommender::LinkRecommender;
use models::{AffiliateProgram, AffiliateReport, LinkRecommendation, PageData};
use reporter::Reporter;
use std::path::Path;

/// Recommends internal links between crawled pages using the default tuning.
pub fn find_link_opportunities(
    pages: &[PageData],
    focus_url: Option<&str>,
) -> Vec<LinkRecommendation> {
    find_link_opportunities_with_options(pages, focus_url, &AnalysisOptions::default())
}

pub fn find_link_opportunities_with_options(
    pages: &[PageData],
    focus_url: Option<&str>,
    options: &AnalysisOptions,
) -> Vec<LinkRecommendation> {
    LinkRecommender::find_link_opportunities(pages, focus_url, options)
}

/// Finds monetizable brand mentions and program suggestions using the default tuning.
pub fn build_affiliate_report(
    pages: &[PageData],
    programs: &[AffiliateProgram],
    domain: &str,
) -> AffiliateReport {
    build_affiliate_report_with_options(pages, programs, domain, &AnalysisOptions::default())
}

pub fn build_affiliate_report_with_options(
    pages: &[PageData],
    programs: &[AffiliateProgram],
    domain: &str,
    options: &AnalysisOptions,
) -> AffiliateReport {
    AffiliateAnalyzer::build_report(pages, programs, domain, options)
}

pub fn run(args: Cli) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(Path::new(path))?,
        None => Config::from_default_paths()?.unwrap_or_default(),
    };
    let options = config.analysis_options(&args);
    let args = config.merge_with_cli(&args);

    let (run_links, run_affiliate) = match args.mode.as_str() {
        "links" => (true, false),
        "affiliate" => (false, true),
        "all" => (true, true),
        other => anyhow::bail!("Unknown mode '{}': expected links, affiliate, or all", other),
    };
    let json_output = match args.output.as_str() {
        "json" => true,
        "text" => false,
        other => anyhow::bail!("Unknown output format '{}': expected text or json", other),
    };

    if !json_output {
        println!(
            "{}",
            "Linkwise - Internal Link & Affiliate Analyzer"
                .bright_cyan()
                .bold()
        );
        println!("{}", "=".repeat(50).bright_blue());
        println!();
        println!("{} {}", "Snapshot:".bright_white().bold(), args.snapshot);
        println!("{} {}", "Mode:".bright_white().bold(), args.mode);
        println!();
    }

    let pages = snapshot::load_pages(Path::new(&args.snapshot))?;
    if pages.is_empty() {
        tracing::warn!(snapshot = %args.snapshot, "Snapshot contains no pages");
    }

    let programs = match (&args.programs, run_affiliate) {
        (Some(path), true) => Some(snapshot::load_programs(Path::new(path))?),
        (None, true) if !run_links => {
            anyhow::bail!("Affiliate analysis requires a program catalog (--programs)")
        }
        (None, true) => {
            tracing::warn!("No program catalog given, skipping affiliate analysis");
            None
        }
        (_, false) => None,
    };

    if args.verbose && !json_output {
        println!(
            "{} {} pages loaded",
            "Success:".bright_green().bold(),
            pages.len()
        );
        println!();
    }

    let link_recommendations = if run_links {
        if args.verbose && !json_output {
            println!("{}", "Finding internal link opportunities...".bright_yellow());
        }
        Some(LinkRecommender::find_link_opportunities(
            &pages,
            args.focus.as_deref(),
            &options,
        ))
    } else {
        None
    };

    let affiliate = match &programs {
        Some(programs) => {
            if args.verbose && !json_output {
                println!("{}", "Scanning brand mentions...".bright_yellow());
            }
            let domain = match &args.domain {
                Some(domain) => domain.clone(),
                None => default_domain(&pages),
            };
            Some(AffiliateAnalyzer::build_report(
                &pages, programs, &domain, &options,
            ))
        }
        None => None,
    };

    let report = Reporter::generate_report(
        &args.snapshot,
        pages.len(),
        link_recommendations,
        affiliate,
    );

    if json_output {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize analysis report")?;
        println!("{}", json);
    } else {
        Reporter::print_text_report(&report);
    }

    if let Some(filename) = args.save {
        Reporter::save_json_report(&report, &filename)?;
    }

    Ok(())
}

/// Host of the first page with an absolute URL.
fn default_domain(pages: &[PageData]) -> String {
    pages
        .iter()
        .filter_map(|page| url::Url::parse(&page.url).ok())
        .find_map(|url| url.host_str().map(|host| host.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}
