// snapshot/src/manifest.rs
//! Ordered list of logical paths to include in a snapshot.
//!
//! The built-in manifest is fixed at compile time. A manifest can also be
//! loaded from a file: either a JSON array of strings or one path per line
//! (blank lines and `#` comments skipped). Order is preserved exactly and
//! duplicates are kept.

use anyhow::{
    Context,
    Result
};
use std::{
    fs,
    path::Path
};

const DEFAULT_FILES: &[&str] = &[
    "TECHNICAL_SPEC.md",
    "src/index.css",
    "src/lib/supabase.js",
    "src/lib/db.js",
    "src/lib/analytics.js",
    "src/App.jsx",
    "src/components/Header.jsx",
    "src/components/Header.module.css",
    "src/components/MobileLayout.jsx",
    "src/components/LeftPanel.jsx",
    "src/components/CenterPanel.jsx",
    "src/components/RightPanel.jsx",
    "src/components/BottomConsole.jsx",
    "src/components/Scorebook.jsx",
    "src/components/RosterTab.jsx",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    paths: Vec<String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new(DEFAULT_FILES.iter().copied())
    }
}

impl Manifest {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { paths: paths.into_iter().map(Into::into).collect() }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("parsing manifest {}", path.display()))
    }

    /// Accept a JSON array of strings, else fall back to line-per-path.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim_start();
        if trimmed.starts_with('[') {
            let paths: Vec<String> = serde_json::from_str(trimmed)
                .context("manifest looks like JSON but is not an array of strings")?;
            return Ok(Self::new(paths.iter().map(|p| to_logical(p))));
        }

        let paths = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(to_logical);
        Ok(Self::new(paths))
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Manifest entries always use `/`, whichever form they were written in.
fn to_logical(p: &str) -> String {
    p.replace('\\', "/")
}

/* ================================== Tests ================================== */
