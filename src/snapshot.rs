//! Loads crawl snapshots and affiliate program catalogs from disk.

use crate::config::ConfigFormat;
use crate::models::{AffiliateProgram, PageData};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

// Cached selectors to avoid repeated parsing and eliminate unwrap() calls
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector should be valid"));
static META_DESC_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name='description']").expect("meta description selector should be valid")
});
static CANONICAL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("link[rel='canonical'][href], meta[property='og:url'][content]")
        .expect("canonical selector should be valid")
});
static H1_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("h1 selector should be valid"));
static HEADINGS_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2, h3, h4, h5, h6").expect("headings selector should be valid")
});
static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("body selector should be valid"));
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("a[href] selector should be valid"));

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// Catalog files hold either a bare list or a `programs` table (TOML needs the latter).
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<AffiliateProgram>),
    Wrapped { programs: Vec<AffiliateProgram> },
}

/// Loads the affiliate program catalog from a JSON, TOML, or YAML file.
pub fn load_programs(path: &Path) -> Result<Vec<AffiliateProgram>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read program catalog: {}", path.display()))?;
    let format = ConfigFormat::from_path(path).with_context(|| {
        format!("Unsupported program catalog format: {}", path.display())
    })?;

    let catalog: CatalogFile = format.parse(&contents, path, "program catalog")?;
    let programs = match catalog {
        CatalogFile::List(programs) => programs,
        CatalogFile::Wrapped { programs } => programs,
    };

    tracing::info!(path = %path.display(), programs = programs.len(), "Loaded program catalog");
    Ok(programs)
}

/// Loads pages from a JSON snapshot file or a directory of saved HTML pages.
pub fn load_pages(path: &Path) -> Result<Vec<PageData>> {
    if path.is_dir() {
        load_html_dir(path)
    } else {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        let pages: Vec<PageData> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON snapshot: {}", path.display()))?;
        tracing::info!(path = %path.display(), pages = pages.len(), "Loaded snapshot");
        Ok(pages)
    }
}

fn load_html_dir(dir: &Path) -> Result<Vec<PageData>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read snapshot directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| matches!(ext.to_lowercase().as_str(), "html" | "htm"))
        })
        .collect();
    files.sort();

    let mut pages = Vec::with_capacity(files.len());
    for file in &files {
        match fs::read_to_string(file) {
            Ok(html) => pages.push(parse_html_page(&html, &fallback_url(dir, file))),
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "Skipping unreadable snapshot file");
            }
        }
    }

    tracing::info!(path = %dir.display(), pages = pages.len(), "Loaded HTML snapshot directory");
    Ok(pages)
}

/// Site-relative path derived from the file name, used when a page has no canonical URL.
fn fallback_url(dir: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(dir).unwrap_or(file).with_extension("");
    let path = relative.to_string_lossy().replace('\\', "/");
    if path == "index" {
        "/".to_string()
    } else {
        format!("/{}", path.trim_end_matches("/index"))
    }
}

/// Extracts the fields the analyzers need from a saved HTML page.
pub fn parse_html_page(html: &str, fallback_url: &str) -> PageData {
    let document = Html::parse_document(html);

    let url = document
        .select(&CANONICAL_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("href").or_else(|| el.value().attr("content")))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| fallback_url.to_string());
    let base = Url::parse(&url).ok();

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let meta_description = document
        .select(&META_DESC_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let mut h1_tags = document.select(&H1_SELECTOR).map(element_text);
    let h1 = h1_tags.next().unwrap_or_default();
    // Additional H1s are kept as ordinary headings
    let mut headings: Vec<String> = h1_tags.collect();
    headings.extend(document.select(&HEADINGS_SELECTOR).map(element_text));
    headings.retain(|h| !h.is_empty());

    let body_text = document
        .select(&BODY_SELECTOR)
        .next()
        .map(visible_text)
        .unwrap_or_default();

    let internal_links = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty() && !href.starts_with('#'))
        .map(|href| match &base {
            Some(base) => base
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        })
        .collect();

    PageData {
        url,
        title,
        h1,
        headings,
        meta_description,
        body_text,
        internal_links,
    }
}

fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of every node under `root` that is not inside a script/style-like element.
fn visible_text(root: ElementRef) -> String {
    let mut words: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }
    words.join(" ")
}
