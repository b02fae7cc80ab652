//! Site topic classification from pooled page text.

use crate::corpus::page_headings;
use crate::models::{NicheMatch, PageData};
use once_cell::sync::Lazy;
use regex::Regex;

/// A coarse site topic with the keywords that reveal it and the affiliate
/// categories that suit it.
#[derive(Debug)]
pub struct Niche {
    pub id: &'static str,
    pub label: &'static str,
    pub keywords: &'static [&'static str],
    /// Affiliate categories relevant to this niche with their priority (1 = best fit)
    pub categories: &'static [(&'static str, u8)],
    /// Content angle to pitch for a category, when one fits better than the generic wording
    pub angles: &'static [(&'static str, &'static str)],
}

impl Niche {
    pub fn category_priority(&self, category: &str) -> Option<u8> {
        self.categories
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(category))
            .map(|(_, priority)| *priority)
    }

    pub fn is_relevant(&self, category: &str) -> bool {
        self.category_priority(category).is_some()
    }

    pub fn angle_for(&self, category: &str) -> Option<&'static str> {
        self.angles
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(category))
            .map(|(_, angle)| *angle)
    }
}

/// Categories that monetize on almost any site that runs on the web.
pub const UNIVERSAL_CATEGORIES: &[&str] = &[
    "hosting",
    "website-builder",
    "seo",
    "email",
    "vpn",
    "security",
    "analytics",
    "domains",
];

pub fn is_universal_category(category: &str) -> bool {
    UNIVERSAL_CATEGORIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(category))
}

pub static NICHES: &[Niche] = &[
    Niche {
        id: "blogging",
        label: "Blogging & Content Creation",
        keywords: &[
            "blog", "blogging", "blogger", "bloggers", "wordpress", "content creator",
            "monetize", "monetization", "affiliate marketing", "niche site", "traffic",
            "pageviews", "adsense", "mediavine", "writing", "editorial calendar", "guest post",
            "publish", "publishing", "audience", "creator", "creators", "passive income",
        ],
        categories: &[
            ("hosting", 1),
            ("website-builder", 2),
            ("email", 3),
            ("seo", 4),
            ("themes", 5),
            ("ai", 6),
            ("design", 7),
            ("education", 8),
        ],
        angles: &[
            ("hosting", "Every blog needs a host: write a hosting comparison or setup tutorial"),
            ("email", "Grow the newsletter: review email tools for bloggers"),
            ("seo", "Show readers how you research keywords and grow traffic"),
            ("themes", "Showcase the theme behind your own blog"),
            ("ai", "Compare AI writing assistants for drafting posts"),
        ],
    },
    Niche {
        id: "web-development",
        label: "Web Development",
        keywords: &[
            "developer", "developers", "javascript", "typescript", "react", "node", "python",
            "css", "html", "framework", "frontend", "backend", "deploy", "deployment",
            "github", "git", "database", "server", "serverless", "docker", "kubernetes",
            "api", "code", "coding", "programming", "devops", "repository", "localhost",
        ],
        categories: &[
            ("hosting", 1),
            ("cloud", 2),
            ("developer-tools", 3),
            ("domains", 4),
            ("security", 5),
            ("education", 6),
            ("analytics", 7),
        ],
        angles: &[
            ("hosting", "Benchmark deploy targets in a hands-on hosting tutorial"),
            ("cloud", "Walk through a production deployment on a cloud platform"),
            ("developer-tools", "Write up the tools in your daily development workflow"),
            ("education", "Recommend courses for developers leveling up"),
        ],
    },
    Niche {
        id: "ecommerce",
        label: "E-commerce",
        keywords: &[
            "ecommerce", "e-commerce", "online store", "shopify", "woocommerce", "dropshipping",
            "store", "products", "product", "checkout", "cart", "inventory", "shipping",
            "fulfillment", "merchant", "merchants", "sell online", "conversion rate", "sku",
            "print on demand", "amazon fba", "etsy", "storefront", "payments",
        ],
        categories: &[
            ("ecommerce", 1),
            ("payments", 2),
            ("email", 3),
            ("marketing", 4),
            ("shipping", 5),
            ("design", 6),
            ("analytics", 7),
        ],
        angles: &[
            ("ecommerce", "Compare store platforms for new sellers"),
            ("payments", "Explain payment processing fees with real numbers"),
            ("email", "Show abandoned-cart email flows that recover sales"),
            ("shipping", "Break down shipping and fulfillment options"),
        ],
    },
    Niche {
        id: "digital-marketing",
        label: "Digital Marketing & SEO",
        keywords: &[
            "seo", "marketing", "keyword", "keywords", "backlinks", "backlink", "serp",
            "ranking", "rankings", "google search", "organic traffic", "content marketing",
            "social media", "campaign", "campaigns", "leads", "lead generation", "funnel",
            "conversion", "ppc", "ads", "advertising", "email marketing", "growth",
            "search console", "link building", "audit",
        ],
        categories: &[
            ("seo", 1),
            ("marketing", 2),
            ("email", 3),
            ("analytics", 4),
            ("crm", 5),
            ("social-media", 6),
            ("ai", 7),
        ],
        angles: &[
            ("seo", "Run a tool-by-tool SEO audit case study"),
            ("marketing", "Document a campaign end to end with the tools used"),
            ("email", "Compare email platforms by deliverability and automation"),
            ("crm", "Show how leads move through your CRM pipeline"),
        ],
    },
    Niche {
        id: "saas-productivity",
        label: "SaaS & Productivity",
        keywords: &[
            "productivity", "saas", "workflow", "workflows", "automation", "automate",
            "project management", "task", "tasks", "team", "teams", "collaboration",
            "remote work", "software", "integrations", "integration", "dashboard", "no-code",
            "template", "templates", "calendar", "meetings", "notes", "time tracking",
        ],
        categories: &[
            ("productivity", 1),
            ("automation", 2),
            ("crm", 3),
            ("communication", 4),
            ("ai", 5),
            ("finance", 6),
        ],
        angles: &[
            ("productivity", "Share the stack you actually use to get work done"),
            ("automation", "Build a step-by-step automation recipe"),
            ("communication", "Compare team chat and video tools for remote work"),
        ],
    },
    Niche {
        id: "design",
        label: "Design & Creative",
        keywords: &[
            "design", "designer", "designers", "graphic design", "logo", "typography", "font",
            "fonts", "illustration", "figma", "photoshop", "illustrator", "mockup", "mockups",
            "branding", "color palette", "ui", "ux", "creative", "portfolio", "icons",
        ],
        categories: &[
            ("design", 1),
            ("stock-media", 2),
            ("website-builder", 3),
            ("education", 4),
            ("ai", 5),
        ],
        angles: &[
            ("design", "Review the design tools behind a recent project"),
            ("stock-media", "Curate asset bundles for a design tutorial"),
            ("education", "Recommend courses that build a design portfolio"),
        ],
    },
    Niche {
        id: "finance",
        label: "Personal Finance & Investing",
        keywords: &[
            "finance", "money", "budget", "budgeting", "savings", "save money", "invest",
            "investing", "investment", "stocks", "etf", "index fund", "retirement", "401k",
            "credit card", "credit score", "debt", "loan", "mortgage", "tax", "taxes",
            "crypto", "bitcoin", "net worth", "dividend", "frugal", "bank", "banking",
        ],
        categories: &[
            ("finance", 1),
            ("banking", 2),
            ("investing", 3),
            ("crypto", 4),
            ("insurance", 5),
            ("education", 6),
        ],
        angles: &[
            ("finance", "Compare budgeting apps with your own spending data"),
            ("banking", "Rank high-yield accounts and bank bonuses"),
            ("investing", "Explain how to open a first brokerage account"),
        ],
    },
    Niche {
        id: "security",
        label: "Privacy & Security",
        keywords: &[
            "privacy", "security", "vpn", "encryption", "password", "passwords",
            "password manager", "malware", "antivirus", "hacker", "hackers", "phishing",
            "data breach", "two-factor", "2fa", "firewall", "anonymous", "tracking",
            "cybersecurity", "identity theft",
        ],
        categories: &[
            ("vpn", 1),
            ("security", 2),
            ("password-manager", 3),
            ("backup", 4),
        ],
        angles: &[
            ("vpn", "Test VPN speeds and streaming support"),
            ("security", "Write a practical security checklist"),
            ("password-manager", "Migrate readers to a password manager step by step"),
        ],
    },
    Niche {
        id: "education",
        label: "Online Courses & Education",
        keywords: &[
            "course", "courses", "online course", "learn", "learning", "students", "student",
            "teacher", "teaching", "lesson", "lessons", "tutorial", "tutorials",
            "certification", "certificate", "curriculum", "e-learning", "class", "classes",
            "study", "skills", "coaching",
        ],
        categories: &[
            ("education", 1),
            ("course-platform", 2),
            ("ai", 3),
            ("productivity", 4),
        ],
        angles: &[
            ("education", "Recommend the courses that fill gaps in your tutorials"),
            ("course-platform", "Compare platforms for launching your own course"),
        ],
    },
    Niche {
        id: "ai",
        label: "AI & Automation",
        keywords: &[
            "artificial intelligence", "machine learning", "chatgpt", "openai", "gpt",
            "llm", "prompt", "prompts", "ai tool", "ai tools", "generative", "chatbot",
            "automation", "neural", "midjourney", "copilot", "ai writing", "model", "models",
        ],
        categories: &[
            ("ai", 1),
            ("automation", 2),
            ("productivity", 3),
            ("developer-tools", 4),
            ("cloud", 5),
        ],
        angles: &[
            ("ai", "Benchmark AI tools on a real task"),
            ("automation", "Connect AI tools into an automated workflow"),
        ],
    },
    Niche {
        id: "fitness",
        label: "Health & Fitness",
        keywords: &[
            "fitness", "workout", "workouts", "exercise", "gym", "training", "strength",
            "cardio", "running", "yoga", "nutrition", "diet", "protein", "weight loss",
            "muscle", "health", "healthy", "calories", "supplements", "recovery", "wellness",
        ],
        categories: &[
            ("fitness", 1),
            ("nutrition", 2),
            ("health", 3),
            ("wearables", 4),
            ("apparel", 5),
        ],
        angles: &[
            ("fitness", "Review the gear used in your training plan"),
            ("nutrition", "Compare supplements and meal plans you have tried"),
            ("wearables", "Test fitness trackers over a full training block"),
        ],
    },
    Niche {
        id: "travel",
        label: "Travel",
        keywords: &[
            "travel", "traveling", "travelling", "trip", "trips", "flight", "flights",
            "hotel", "hotels", "hostel", "itinerary", "destination", "destinations",
            "backpacking", "vacation", "passport", "airport", "luggage", "tour", "tours",
            "road trip", "digital nomad",
        ],
        categories: &[
            ("travel", 1),
            ("booking", 2),
            ("insurance", 3),
            ("vpn", 4),
            ("gear", 5),
            ("banking", 6),
        ],
        angles: &[
            ("travel", "Add booking tools to destination guides"),
            ("booking", "Show how you find cheap flights and stays"),
            ("insurance", "Explain travel insurance with a real claim story"),
        ],
    },
    Niche {
        id: "photography-video",
        label: "Photography & Video",
        keywords: &[
            "photography", "photographer", "photo", "photos", "camera", "cameras", "lens",
            "lenses", "lightroom", "editing", "video", "videos", "youtube", "filmmaking",
            "drone", "tripod", "footage", "premiere", "final cut", "streaming", "podcast",
        ],
        categories: &[
            ("photography", 1),
            ("video", 2),
            ("stock-media", 3),
            ("gear", 4),
            ("design", 5),
            ("education", 6),
        ],
        angles: &[
            ("photography", "List the camera bag behind your best shots"),
            ("video", "Compare editing software on the same project"),
            ("stock-media", "Curate stock footage and music for creators"),
        ],
    },
    Niche {
        id: "gaming",
        label: "Gaming",
        keywords: &[
            "gaming", "gamer", "gamers", "game", "games", "console", "playstation", "xbox",
            "nintendo", "steam", "pc build", "graphics card", "gpu", "fps", "esports",
            "twitch", "controller", "headset", "multiplayer",
        ],
        categories: &[
            ("gaming", 1),
            ("hardware", 2),
            ("gear", 3),
            ("streaming", 4),
            ("vpn", 5),
        ],
        angles: &[
            ("gaming", "Round up deals on games you have reviewed"),
            ("hardware", "Document a full PC build with parts links"),
        ],
    },
    Niche {
        id: "home-garden",
        label: "Home & Garden",
        keywords: &[
            "home", "house", "garden", "gardening", "kitchen", "diy", "renovation",
            "furniture", "decor", "interior design", "plants", "lawn", "tools", "cleaning",
            "bedroom", "bathroom", "smart home", "appliance", "appliances", "backyard",
        ],
        categories: &[
            ("home", 1),
            ("garden", 2),
            ("tools", 3),
            ("smart-home", 4),
            ("furniture", 5),
        ],
        angles: &[
            ("home", "Link the products used in your project write-ups"),
            ("smart-home", "Walk through a smart home setup room by room"),
        ],
    },
];

static NICHE_PATTERNS: Lazy<Vec<Vec<Regex>>> = Lazy::new(|| {
    NICHES
        .iter()
        .map(|niche| {
            niche
                .keywords
                .iter()
                .map(|keyword| {
                    Regex::new(&format!(r"\b{}\b", regex::escape(keyword)))
                        .expect("niche keyword pattern should be valid")
                })
                .collect()
        })
        .collect()
});

pub fn niche_by_id(id: &str) -> Option<&'static Niche> {
    NICHES.iter().find(|niche| niche.id == id)
}

/// Scores every niche by whole-word keyword hits over the pooled site text.
///
/// Niches without a hit are dropped; the rest come back best first.
pub fn detect_niches(pages: &[PageData]) -> Vec<NicheMatch> {
    let corpus = pooled_text(pages);

    let mut matches: Vec<NicheMatch> = NICHES
        .iter()
        .zip(NICHE_PATTERNS.iter())
        .filter_map(|(niche, patterns)| {
            let score: usize = patterns.iter().map(|p| p.find_iter(&corpus).count()).sum();
            (score > 0).then(|| NicheMatch {
                niche: niche.id.to_string(),
                label: niche.label.to_string(),
                score,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::debug!(
        niches = matches.len(),
        top = matches.first().map(|m| m.niche.as_str()).unwrap_or("none"),
        "Niche detection complete"
    );

    matches
}

fn pooled_text(pages: &[PageData]) -> String {
    let mut corpus = String::new();
    for page in pages {
        corpus.push_str(&page.title);
        corpus.push('\n');
        for heading in page_headings(page) {
            corpus.push_str(heading);
            corpus.push('\n');
        }
        corpus.push_str(&page.meta_description);
        corpus.push('\n');
        corpus.push_str(&page.body_text);
        corpus.push('\n');
    }
    corpus.to_lowercase()
}
