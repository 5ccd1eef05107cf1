//! Markdown documentation index.
//!
//! Walks a docs directory recursively, reads every `*.md` file, splits off
//! YAML frontmatter and groups the files by their top-level folder. Rendering
//! the markdown is left to the client.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::types::Timestamp;

/// Category used for files directly under the docs root.
pub const DEFAULT_DOC_CATEGORY: &str = "General";

#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("Docs directory not found: {0}")]
    RootMissing(PathBuf),

    #[error("No markdown files found in {0}")]
    Empty(PathBuf),

    #[error("Failed to walk docs directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read doc file: {0}")]
    Io(#[from] std::io::Error),
}

/// One markdown file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocFile {
    pub name: String,
    pub path: String,
    pub relative_path: String,
    pub content: String,
    pub frontmatter: serde_json::Map<String, serde_json::Value>,
    pub category: String,
    pub last_modified: Timestamp,
}

/// All docs, sorted by category then name ignoring case, plus a by-category
/// grouping. `categories` follows the same case-insensitive order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsIndex {
    pub docs: Vec<DocFile>,
    pub grouped_docs: BTreeMap<String, Vec<DocFile>>,
    pub categories: Vec<String>,
    pub total_files: usize,
}

/// Scan `root` for markdown files. Blocking; call from a blocking context.
pub fn scan_docs(root: &Path) -> Result<DocsIndex, DocsError> {
    if !root.is_dir() {
        return Err(DocsError::RootMissing(root.to_path_buf()));
    }

    let mut docs = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        docs.push(read_doc(root, entry.path())?);
    }

    if docs.is_empty() {
        return Err(DocsError::Empty(root.to_path_buf()));
    }

    docs.sort_by(|a, b| {
        caseless_cmp(&a.category, &b.category).then_with(|| caseless_cmp(&a.name, &b.name))
    });

    let mut grouped_docs: BTreeMap<String, Vec<DocFile>> = BTreeMap::new();
    let mut categories: Vec<String> = Vec::new();
    for doc in &docs {
        if !grouped_docs.contains_key(&doc.category) {
            categories.push(doc.category.clone());
        }
        grouped_docs
            .entry(doc.category.clone())
            .or_default()
            .push(doc.clone());
    }

    Ok(DocsIndex {
        total_files: docs.len(),
        docs,
        grouped_docs,
        categories,
    })
}

/// Case-insensitive ordering with a byte-order tiebreak so it stays total.
fn caseless_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

fn read_doc(root: &Path, path: &Path) -> Result<DocFile, DocsError> {
    let bytes = std::fs::read(path)?;
    let raw = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Doc file is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    let modified = std::fs::metadata(path)?.modified()?;

    let (frontmatter_src, body) = split_frontmatter(&raw);
    let frontmatter = frontmatter_src
        .map(|src| parse_frontmatter(path, src))
        .unwrap_or_default();

    let relative = path.strip_prefix(root).unwrap_or(path);
    let components: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let category = if components.len() > 1 {
        components[0].clone()
    } else {
        DEFAULT_DOC_CATEGORY.to_string()
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match frontmatter.get("title").and_then(|t| t.as_str()) {
        Some(title) if !title.trim().is_empty() => title.to_string(),
        _ => display_name(&stem),
    };

    Ok(DocFile {
        name,
        path: file_name,
        relative_path: components.join("/"),
        content: body.to_string(),
        frontmatter,
        category,
        last_modified: Timestamp::from(modified),
    })
}

/// Split a leading `---` fenced YAML block from the markdown body.
fn split_frontmatter(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
    else {
        return (None, raw);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body.trim_start_matches(['\r', '\n']));
        }
        offset += line.len();
    }
    (None, raw)
}

fn parse_frontmatter(path: &Path, src: &str) -> serde_json::Map<String, serde_json::Value> {
    if src.trim().is_empty() {
        return serde_json::Map::new();
    }
    match serde_yaml::from_str::<serde_json::Map<String, serde_json::Value>>(src) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unparsable frontmatter");
            serde_json::Map::new()
        }
    }
}

/// `getting-started_guide` -> `Getting Started Guide`.
fn display_name(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut at_word_start = true;
    for c in stem.chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !c.is_alphanumeric();
    }
    out
}
