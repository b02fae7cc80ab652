use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::brand_matcher::{DEFAULT_AMBIGUOUS_BRAND_WORDS, DEFAULT_TECH_CONTEXT_WORDS};
use crate::cli::Cli;

/// Tunable parameters of the analysis heuristics.
///
/// The thresholds and word lists are empirical, so they live here rather than
/// as constants in the analyzers. Any field left out of a config file keeps its
/// default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Share of pages (0.0-1.0) a 2-/3-word phrase or heading must appear on to be boilerplate
    pub boilerplate_threshold: f64,

    /// Share of pages (0.0-1.0) a word must appear on to be a domain stop word
    pub domain_stop_word_threshold: f64,

    /// Below this many pages no boilerplate or domain stop words are derived
    pub min_pages_for_corpus_stats: usize,

    /// Independent signals an ambiguous brand mention needs before it is accepted
    pub min_disambiguation_signals: usize,

    /// Brand variations that are also everyday English words
    pub ambiguous_brand_words: Vec<String>,

    /// Words that indicate a software/SaaS context around a mention
    pub tech_context_words: Vec<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            boilerplate_threshold: 0.4,
            domain_stop_word_threshold: 0.5,
            min_pages_for_corpus_stats: 4,
            min_disambiguation_signals: 2,
            ambiguous_brand_words: DEFAULT_AMBIGUOUS_BRAND_WORDS
                .iter()
                .map(|w| w.to_string())
                .collect(),
            tech_context_words: DEFAULT_TECH_CONTEXT_WORDS
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}

/// Configuration file structure that mirrors CLI arguments
/// All fields are optional to allow partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Affiliate program catalog path
    pub programs: Option<String>,

    /// Analysis to run: links, affiliate, or all
    pub mode: Option<String>,

    /// Only recommend links from or to this URL
    pub focus: Option<String>,

    /// Domain name used in the affiliate report
    pub domain: Option<String>,

    /// Output format: text or json
    pub output: Option<String>,

    /// Save report to file
    pub save: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,

    /// Heuristic tuning
    #[serde(default)]
    pub analysis: AnalysisOptions,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    /// Lookup order when several files could hold the config.
    pub const ALL: [ConfigFormat; 3] = [
        ConfigFormat::Json,
        ConfigFormat::Toml,
        ConfigFormat::Yaml,
    ];

    /// `stem.ext` for every supported extension, in lookup order
    pub fn file_names(stem: &str) -> impl Iterator<Item = String> + '_ {
        Self::ALL
            .into_iter()
            .flat_map(|format| format.extensions())
            .map(move |ext| format!("{stem}.{ext}"))
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }

    /// Deserialize `contents` in this format; `kind` and `path` name the file in errors
    pub fn parse<T: serde::de::DeserializeOwned>(
        &self,
        contents: &str,
        path: &Path,
        kind: &str,
    ) -> Result<T> {
        let value = match self {
            ConfigFormat::Json => serde_json::from_str(contents)
                .with_context(|| format!("Failed to parse JSON {}: {}", kind, path.display()))?,
            ConfigFormat::Toml => toml::from_str(contents)
                .with_context(|| format!("Failed to parse TOML {}: {}", kind, path.display()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(contents)
                .with_context(|| format!("Failed to parse YAML {}: {}", kind, path.display()))?,
        };
        Ok(value)
    }
}

/// `$XDG_CONFIG_HOME/linkwise`, or `~/.config/linkwise` when the variable is unset or empty.
fn user_config_dir() -> Option<PathBuf> {
    let config_home = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()?.join(".config"),
    };
    Some(config_home.join("linkwise"))
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("Unsupported config file format: {}", path.display()))?;

        format.parse(&contents, path, "config")
    }

    /// Candidate config files, most specific first: `linkwise.*` in the
    /// working directory, then `config.*` in the user config directory.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = ConfigFormat::file_names("linkwise")
            .map(PathBuf::from)
            .collect();

        if let Some(dir) = user_config_dir() {
            paths.extend(ConfigFormat::file_names("config").map(|name| dir.join(name)));
        }

        paths
    }

    /// Try to load configuration from default paths
    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// Merge this configuration with CLI arguments
    /// CLI arguments take precedence over config file values
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        Cli {
            snapshot: cli.snapshot.clone(),
            programs: cli.programs.clone().or_else(|| self.programs.clone()),
            mode: if cli.mode != "all" {
                cli.mode.clone()
            } else {
                self.mode.clone().unwrap_or_else(|| cli.mode.clone())
            },
            focus: cli.focus.clone().or_else(|| self.focus.clone()),
            domain: cli.domain.clone().or_else(|| self.domain.clone()),
            output: if cli.output != "text" {
                cli.output.clone()
            } else {
                self.output.clone().unwrap_or_else(|| cli.output.clone())
            },
            save: cli.save.clone().or_else(|| self.save.clone()),
            verbose: if cli.verbose {
                cli.verbose
            } else {
                self.verbose.unwrap_or(cli.verbose)
            },
            boilerplate_threshold: cli.boilerplate_threshold,
            stopword_threshold: cli.stopword_threshold,
            config: cli.config.clone(),
        }
    }

    /// Analysis tuning from the config file with CLI threshold flags applied on top
    pub fn analysis_options(&self, cli: &Cli) -> AnalysisOptions {
        let mut options = self.analysis.clone();
        if let Some(threshold) = cli.boilerplate_threshold {
            options.boilerplate_threshold = threshold;
        }
        if let Some(threshold) = cli.stopword_threshold {
            options.domain_stop_word_threshold = threshold;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::NamedTempFile;

    fn default_cli() -> Cli {
        Cli {
            snapshot: "pages.json".to_string(),
            programs: None,
            mode: "all".to_string(),
            focus: None,
            domain: None,
            output: "text".to_string(),
            save: None,
            verbose: false,
            boilerplate_threshold: None,
            stopword_threshold: None,
            config: None,
        }
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.json")),
            Some(ConfigFormat::Json)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.toml")),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.YAML")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.yml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("config.txt")), None);
    }

    #[test]
    fn test_load_json_config() {
        let json_content = r#"
{
    "programs": "programs.json",
    "mode": "links",
    "output": "json",
    "verbose": true,
    "analysis": {
        "boilerplate_threshold": 0.3,
        "ambiguous_brand_words": ["make", "ghost"]
    }
}
        "#;

        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("json");
        fs::write(&temp_path, json_content).unwrap();

        let config = Config::from_file(&temp_path).unwrap();
        assert_eq!(config.programs, Some("programs.json".to_string()));
        assert_eq!(config.mode, Some("links".to_string()));
        assert_eq!(config.output, Some("json".to_string()));
        assert_eq!(config.verbose, Some(true));
        assert_eq!(config.analysis.boilerplate_threshold, 0.3);
        assert_eq!(config.analysis.ambiguous_brand_words, vec!["make", "ghost"]);
        // untouched fields keep their defaults
        assert_eq!(config.analysis.domain_stop_word_threshold, 0.5);
        assert_eq!(config.analysis.min_disambiguation_signals, 2);

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_load_toml_config() {
        let toml_content = r#"
mode = "affiliate"
domain = "example.com"

[analysis]
min_disambiguation_signals = 3
domain_stop_word_threshold = 0.6
        "#;

        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("toml");
        fs::write(&temp_path, toml_content).unwrap();

        let config = Config::from_file(&temp_path).unwrap();
        assert_eq!(config.mode, Some("affiliate".to_string()));
        assert_eq!(config.domain, Some("example.com".to_string()));
        assert_eq!(config.analysis.min_disambiguation_signals, 3);
        assert_eq!(config.analysis.domain_stop_word_threshold, 0.6);
        assert_eq!(config.analysis.boilerplate_threshold, 0.4);

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_load_yaml_config() {
        let yaml_content = r#"
output: "json"
focus: "https://example.com/pricing"
analysis:
  min_pages_for_corpus_stats: 10
        "#;

        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("yaml");
        fs::write(&temp_path, yaml_content).unwrap();

        let config = Config::from_file(&temp_path).unwrap();
        assert_eq!(config.output, Some("json".to_string()));
        assert_eq!(config.focus, Some("https://example.com/pricing".to_string()));
        assert_eq!(config.analysis.min_pages_for_corpus_stats, 10);

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_partial_config_uses_default_analysis() {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("json");
        fs::write(&temp_path, r#"{ "mode": "links" }"#).unwrap();

        let config = Config::from_file(&temp_path).unwrap();
        assert_eq!(config.programs, None);
        assert_eq!(config.analysis, AnalysisOptions::default());

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_invalid_json_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("json");
        fs::write(&temp_path, r#"{ invalid json }"#).unwrap();

        let result = Config::from_file(&temp_path);
        assert!(result.is_err());

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_invalid_toml_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("toml");
        fs::write(&temp_path, r#"[[[ invalid toml"#).unwrap();

        let result = Config::from_file(&temp_path);
        assert!(result.is_err());

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_unsupported_format() {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("txt");
        fs::write(&temp_path, "content").unwrap();

        let result = Config::from_file(&temp_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Unsupported config file format")
        );

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_merge_with_cli_defaults() {
        let config = Config {
            programs: Some("catalog.yaml".to_string()),
            mode: Some("links".to_string()),
            output: Some("json".to_string()),
            domain: Some("example.com".to_string()),
            ..Default::default()
        };

        let merged = config.merge_with_cli(&default_cli());
        assert_eq!(merged.snapshot, "pages.json");
        assert_eq!(merged.programs, Some("catalog.yaml".to_string())); // from config
        assert_eq!(merged.mode, "links"); // from config
        assert_eq!(merged.output, "json"); // from config
        assert_eq!(merged.domain, Some("example.com".to_string())); // from config
        assert!(!merged.verbose);
    }

    #[test]
    fn test_merge_with_cli_overrides() {
        let config = Config {
            programs: Some("catalog.yaml".to_string()),
            mode: Some("links".to_string()),
            output: Some("json".to_string()),
            verbose: Some(false),
            ..Default::default()
        };

        let cli = Cli {
            programs: Some("other.json".to_string()),
            mode: "affiliate".to_string(),
            output: "text".to_string(),
            save: Some("report.json".to_string()),
            verbose: true,
            ..default_cli()
        };

        let merged = config.merge_with_cli(&cli);
        assert_eq!(merged.programs, Some("other.json".to_string())); // CLI override
        assert_eq!(merged.mode, "affiliate"); // CLI override
        assert_eq!(merged.output, "json"); // "text" is the CLI default, config wins
        assert_eq!(merged.save, Some("report.json".to_string())); // CLI value
        assert!(merged.verbose); // CLI value
    }

    #[test]
    fn test_analysis_options_cli_thresholds_win() {
        let mut config = Config::default();
        config.analysis.boilerplate_threshold = 0.25;
        config.analysis.domain_stop_word_threshold = 0.7;

        let cli = Cli {
            stopword_threshold: Some(0.9),
            ..default_cli()
        };

        let options = config.analysis_options(&cli);
        assert_eq!(options.boilerplate_threshold, 0.25);
        assert_eq!(options.domain_stop_word_threshold, 0.9);
    }

    #[test]
    fn test_file_names_follow_lookup_order() {
        let names: Vec<String> = ConfigFormat::file_names("linkwise").collect();
        assert_eq!(
            names,
            vec!["linkwise.json", "linkwise.toml", "linkwise.yaml", "linkwise.yml"]
        );
    }

    #[test]
    #[serial]
    fn test_from_default_paths_lookup_order() {
        use std::env;
        use tempfile::tempdir;

        let work_dir = tempdir().unwrap();
        let config_home = tempdir().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(work_dir.path()).unwrap();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", config_home.path());
        }

        assert!(Config::from_default_paths().unwrap().is_none());

        let user_dir = config_home.path().join("linkwise");
        fs::create_dir_all(&user_dir).unwrap();
        fs::write(user_dir.join("config.yml"), "mode: affiliate\n").unwrap();
        let config = Config::from_default_paths().unwrap().unwrap();
        assert_eq!(config.mode, Some("affiliate".to_string()));

        // the working directory wins over the user config directory
        fs::write(work_dir.path().join("linkwise.toml"), "mode = \"links\"\n").unwrap();
        let config = Config::from_default_paths().unwrap().unwrap();
        assert_eq!(config.mode, Some("links".to_string()));

        env::set_current_dir(&original_dir).ok();
        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }
}
