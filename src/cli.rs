use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "linkwise")]
#[command(
    about = "Finds internal-link and affiliate opportunities in a crawled website",
    long_about = None
)]
pub struct Cli {
    /// Crawl snapshot: a JSON file of pages or a directory of saved .html files
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: String,

    /// Affiliate program catalog (JSON, TOML, or YAML)
    #[arg(short, long)]
    pub programs: Option<String>,

    /// Analysis to run: links, affiliate, or all
    #[arg(short, long, default_value = "all")]
    pub mode: String,

    /// Only recommend links from or to this URL
    #[arg(short, long)]
    pub focus: Option<String>,

    /// Domain name used in the affiliate report (default: host of the first page)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub output: String,

    /// Save report to file
    #[arg(short, long)]
    pub save: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Share of pages a phrase must appear on to count as boilerplate (default: 0.4)
    #[arg(long)]
    pub boilerplate_threshold: Option<f64>,

    /// Share of pages a word must appear on to count as a domain stop word (default: 0.5)
    #[arg(long)]
    pub stopword_threshold: Option<f64>,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long)]
    pub config: Option<String>,
}
