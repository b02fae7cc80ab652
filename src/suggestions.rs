use crate::models::{AffiliateProgram, NicheMatch, SuggestedProgram};
use crate::niche::niche_by_id;
use std::collections::{HashMap, HashSet};

/// The top niche needs at least this many keyword hits before suggesting anything.
const MIN_NICHE_SCORE: usize = 3;
const MAX_PER_CATEGORY: usize = 5;
const MAX_SUGGESTIONS: usize = 40;

/// Proposes programs the site does not mention yet but that fit its top niche.
///
/// `found_brands` holds the lowercased brands already seen on the site.
/// Programs are ranked by how well their category fits the niche, then by
/// catalog order.
pub fn suggest_programs(
    programs: &[AffiliateProgram],
    niches: &[NicheMatch],
    found_brands: &HashSet<String>,
) -> Vec<SuggestedProgram> {
    let Some(top) = niches.first().filter(|m| m.score >= MIN_NICHE_SCORE) else {
        return Vec::new();
    };
    let Some(niche) = niche_by_id(&top.niche) else {
        return Vec::new();
    };

    let mut candidates: Vec<(u8, &AffiliateProgram)> = programs
        .iter()
        .filter(|p| p.has_affiliate_program())
        .filter(|p| !found_brands.contains(&p.brand.to_lowercase()))
        .filter_map(|p| niche.category_priority(&p.category).map(|rank| (rank, p)))
        .collect();
    candidates.sort_by_key(|(rank, _)| *rank);

    let mut per_category: HashMap<String, usize> = HashMap::new();
    let mut suggestions = Vec::new();

    for (_, program) in candidates {
        if suggestions.len() >= MAX_SUGGESTIONS {
            break;
        }
        let used = per_category
            .entry(program.category.to_lowercase())
            .or_insert(0);
        if *used >= MAX_PER_CATEGORY {
            continue;
        }
        *used += 1;

        let reason = match niche.angle_for(&program.category) {
            Some(angle) => angle.to_string(),
            None => format!(
                "{} fits {} content: mention it where readers compare {} options",
                program.brand,
                niche.label.to_lowercase(),
                program.category
            ),
        };

        suggestions.push(SuggestedProgram {
            program: program.clone(),
            reason,
            niche: niche.label.to_string(),
        });
    }

    tracing::debug!(
        niche = niche.id,
        suggestions = suggestions.len(),
        "Program suggestions ranked"
    );

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProgramType;

    fn program(brand: &str, category: &str, program_type: ProgramType) -> AffiliateProgram {
        AffiliateProgram {
            brand: brand.to_string(),
            variations: vec![brand.to_lowercase()],
            program_name: String::new(),
            commission: String::new(),
            program_type,
            network: String::new(),
            signup_url: String::new(),
            category: category.to_string(),
            description: None,
        }
    }

    fn blogging(score: usize) -> Vec<NicheMatch> {
        vec![NicheMatch {
            niche: "blogging".to_string(),
            label: "Blogging & Content Creation".to_string(),
            score,
        }]
    }

    #[test]
    fn test_requires_confident_niche() {
        let programs = vec![program("Kinsta", "hosting", ProgramType::Flat)];
        assert!(suggest_programs(&programs, &[], &HashSet::new()).is_empty());
        assert!(suggest_programs(&programs, &blogging(2), &HashSet::new()).is_empty());
        assert_eq!(suggest_programs(&programs, &blogging(3), &HashSet::new()).len(), 1);
    }

    #[test]
    fn test_ranks_by_category_priority() {
        let programs = vec![
            program("ConvertKit", "email", ProgramType::Recurring),
            program("Fitbit", "fitness", ProgramType::Percentage),
            program("Kinsta", "hosting", ProgramType::Flat),
            program("Semrush", "seo", ProgramType::Recurring),
            program("Free Tool", "hosting", ProgramType::None),
        ];

        let suggestions = suggest_programs(&programs, &blogging(20), &HashSet::new());
        let brands: Vec<&str> = suggestions
            .iter()
            .map(|s| s.program.brand.as_str())
            .collect();
        assert_eq!(brands, vec!["Kinsta", "ConvertKit", "Semrush"]);
        assert_eq!(suggestions[0].niche, "Blogging & Content Creation");
        assert!(suggestions[0].reason.contains("hosting"));
    }

    #[test]
    fn test_skips_brands_found_on_site() {
        let programs = vec![
            program("Kinsta", "hosting", ProgramType::Flat),
            program("Bluehost", "hosting", ProgramType::Flat),
        ];
        let found: HashSet<String> = ["kinsta".to_string()].into_iter().collect();

        let suggestions = suggest_programs(&programs, &blogging(20), &found);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].program.brand, "Bluehost");
    }

    #[test]
    fn test_caps_per_category_and_total() {
        let mut programs: Vec<AffiliateProgram> = (0..8)
            .map(|i| program(&format!("Host{i}"), "hosting", ProgramType::Flat))
            .collect();
        for category in ["website-builder", "email", "seo", "themes", "ai", "design", "education"] {
            for i in 0..8 {
                programs.push(program(
                    &format!("{category}{i}"),
                    category,
                    ProgramType::Recurring,
                ));
            }
        }

        let suggestions = suggest_programs(&programs, &blogging(20), &HashSet::new());
        assert_eq!(suggestions.len(), 40);
        let hosting = suggestions
            .iter()
            .filter(|s| s.program.category == "hosting")
            .count();
        assert_eq!(hosting, 5);
    }

    #[test]
    fn test_generic_reason_fallback() {
        let programs = vec![program("Canva", "design", ProgramType::Recurring)];
        let suggestions = suggest_programs(&programs, &blogging(20), &HashSet::new());
        assert!(suggestions[0].reason.starts_with("Canva fits blogging"));
    }
}
