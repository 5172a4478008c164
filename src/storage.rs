//! On-disk layout for fetched pages and converted articles
//!
//! ```text
//! <root>/
//!   html/<PMCID>.html
//!   markdown/<PMCID>.md
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

const HTML_DIR: &str = "html";
const MARKDOWN_DIR: &str = "markdown";

/// Files of one output directory, keyed by PMCID
#[derive(Debug, Clone)]
pub struct ArticleStore {
    root: PathBuf,
}

impl ArticleStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn html_dir(&self) -> PathBuf {
        self.root.join(HTML_DIR)
    }

    pub fn markdown_dir(&self) -> PathBuf {
        self.root.join(MARKDOWN_DIR)
    }

    pub fn html_path(&self, pmcid: &str) -> PathBuf {
        self.html_dir().join(format!("{pmcid}.html"))
    }

    pub fn markdown_path(&self, pmcid: &str) -> PathBuf {
        self.markdown_dir().join(format!("{pmcid}.md"))
    }

    pub fn has_html(&self, pmcid: &str) -> bool {
        self.html_path(pmcid).is_file()
    }

    pub fn has_markdown(&self, pmcid: &str) -> bool {
        self.markdown_path(pmcid).is_file()
    }

    /// Write raw HTML, creating the directory if needed
    pub fn save_html(&self, pmcid: &str, html: &str) -> Result<PathBuf> {
        let path = self.html_path(pmcid);
        write_file(&path, html)?;
        Ok(path)
    }

    /// Write markdown, creating the directory if needed
    pub fn save_markdown(&self, pmcid: &str, markdown: &str) -> Result<PathBuf> {
        let path = self.markdown_path(pmcid);
        write_file(&path, markdown)?;
        Ok(path)
    }

    pub fn load_html(&self, pmcid: &str) -> Result<String> {
        Ok(fs::read_to_string(self.html_path(pmcid))?)
    }

    /// PMCIDs with a cached HTML page, sorted
    pub fn existing_html_ids(&self) -> Result<Vec<String>> {
        file_stems(&self.html_dir(), "html")
    }

    /// PMCIDs with a converted markdown file, sorted
    pub fn existing_markdown_ids(&self) -> Result<Vec<String>> {
        file_stems(&self.markdown_dir(), "md")
    }

    /// Every cached HTML page, sorted by path
    pub fn html_files(&self) -> Result<Vec<PathBuf>> {
        files_with_extension(&self.html_dir(), "html")
    }

    /// Every markdown file, sorted by path
    pub fn markdown_files(&self) -> Result<Vec<PathBuf>> {
        files_with_extension(&self.markdown_dir(), "md")
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    debug!(path = %path.display(), bytes = contents.len(), "Saved file");
    Ok(())
}

/// Files directly inside `dir` with the given extension; a missing directory is empty
pub(crate) fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_stems(dir: &Path, extension: &str) -> Result<Vec<String>> {
    Ok(files_with_extension(dir, extension)?
        .iter()
        .filter_map(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .collect())
}
