// snapshot/src/emit.rs
//! Snapshot emitter: manifest → banner-delimited, fenced transcript.
//!
//! Layout (every item below is one `write_line`, i.e. followed by `\n`):
//!
//! ````text
//! ====...====                      (80 x '=')
//! PITCH INTELLIGENCE -- FULL SOURCE SNAPSHOT
//! Paste this into a new Claude chat to continue development
//! ====...====
//!
//! ## FILE: <logical/path>          present entry
//! ```<label>
//! <contents, verbatim>
//! ```
//!
//! # MISSING: <logical/path>        missing entry
//! ====...====
//! END SNAPSHOT
//! ====...====
//! ````
//!
//! A fatal resolve error stops the stream where it happened: no END banner
//! follows, which is how a truncated artifact is told apart from a whole one.

use anyhow::{
    Context,
    Result
};
use std::{
    collections::VecDeque,
    io::Write
};

use crate::{
    encoding::EncodedWriter,
    labels::LabelTable,
    manifest::Manifest,
    resolve::Resolve,
};

pub const RULE: &str =
    "================================================================================";
pub const TITLE: &str = "PITCH INTELLIGENCE -- FULL SOURCE SNAPSHOT";
pub const SUBTITLE: &str = "Paste this into a new Claude chat to continue development";
pub const END_MARKER: &str = "END SNAPSHOT";
pub const FILE_PREFIX: &str = "## FILE: ";
pub const MISSING_PREFIX: &str = "# MISSING: ";
pub const FENCE: &str = "```";

/// Outcome of resolving one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmissionRecord {
    Missing { path: String },
    Present { path: String, label: String, contents: String },
}

impl EmissionRecord {
    pub fn path(&self) -> &str {
        match self {
            EmissionRecord::Missing { path } | EmissionRecord::Present { path, .. } => path,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, EmissionRecord::Missing { .. })
    }

    /// Push this record's lines onto `out`, consuming the contents.
    fn render_into(self, out: &mut VecDeque<String>) {
        match self {
            EmissionRecord::Missing { path } => {
                out.push_back(format!("{MISSING_PREFIX}{path}"));
            }
            EmissionRecord::Present { path, label, contents } => {
                out.push_back(format!("{FILE_PREFIX}{path}"));
                out.push_back(format!("{FENCE}{label}"));
                out.push_back(contents);
                out.push_back(FENCE.to_string());
                out.push_back(String::new());
            }
        }
    }
}

/// Counts for one pass. `bytes` is the UTF-8 length of all present contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub present: usize,
    pub missing: usize,
    pub bytes: usize,
}

impl EmitSummary {
    pub fn total(&self) -> usize {
        self.present + self.missing
    }

    fn record(&mut self, rec: &EmissionRecord) {
        match rec {
            EmissionRecord::Missing { .. } => self.missing += 1,
            EmissionRecord::Present { contents, .. } => {
                self.present += 1;
                self.bytes += contents.len();
            }
        }
    }
}

/// Holds the manifest and label table for a run. Nothing here is global:
/// tests build one with any manifest and pair it with any [`Resolve`].
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    manifest: Manifest,
    labels: LabelTable,
}

impl Emitter {
    pub fn new(manifest: Manifest, labels: LabelTable) -> Self {
        Self { manifest, labels }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Lazily resolve each manifest entry, in order. Stops after the first error.
    pub fn records<'a, R>(&'a self, resolver: &'a R) -> Records<'a, R>
    where
        R: Resolve + ?Sized,
    {
        Records { emitter: self, resolver, next: 0, failed: false }
    }

    /// Lazily produce every output line, banners included.
    pub fn lines<'a, R>(&'a self, resolver: &'a R) -> Lines<'a, R>
    where
        R: Resolve + ?Sized,
    {
        let mut pending = VecDeque::new();
        pending.extend(opening_banner());
        Lines {
            records: self.records(resolver),
            pending,
            summary: EmitSummary::default(),
            closed: false,
        }
    }

    /// Write the full snapshot to `out`. On error, whatever was written stays.
    pub fn emit<R, W>(&self, resolver: &R, out: &mut EncodedWriter<W>) -> Result<EmitSummary>
    where
        R: Resolve + ?Sized,
        W: Write,
    {
        let mut lines = self.lines(resolver);
        for line in lines.by_ref() {
            let line = line?;
            out.write_line(&line).context("writing snapshot output")?;
        }
        out.flush().context("flushing snapshot output")?;
        Ok(lines.summary())
    }
}

fn opening_banner() -> [String; 5] {
    [
        RULE.to_string(),
        TITLE.to_string(),
        SUBTITLE.to_string(),
        RULE.to_string(),
        String::new(),
    ]
}

fn closing_banner() -> [String; 3] {
    [RULE.to_string(), END_MARKER.to_string(), RULE.to_string()]
}

/* =============================== Iterators =============================== */

pub struct Records<'a, R: Resolve + ?Sized> {
    emitter: &'a Emitter,
    resolver: &'a R,
    next: usize,
    failed: bool,
}

impl<'a, R: Resolve + ?Sized> Iterator for Records<'a, R> {
    type Item = Result<EmissionRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let path = self.emitter.manifest.paths().get(self.next)?;
        self.next += 1;

        match self.resolver.resolve(path) {
            Ok(None) => {
                log::info!("missing: {path}");
                Some(Ok(EmissionRecord::Missing { path: path.clone() }))
            }
            Ok(Some(contents)) => Some(Ok(EmissionRecord::Present {
                path: path.clone(),
                label: self.emitter.labels.label_of(path).to_string(),
                contents,
            })),
            Err(e) => {
                self.failed = true;
                Some(Err(anyhow::Error::new(e).context(format!("reading {path}"))))
            }
        }
    }
}

pub struct Lines<'a, R: Resolve + ?Sized> {
    records: Records<'a, R>,
    pending: VecDeque<String>,
    summary: EmitSummary,
    closed: bool,
}

impl<'a, R: Resolve + ?Sized> Lines<'a, R> {
    /// Counts so far; final once the iterator is exhausted.
    pub fn summary(&self) -> EmitSummary {
        self.summary
    }
}

impl<'a, R: Resolve + ?Sized> Iterator for Lines<'a, R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(line));
            }
            if self.closed {
                return None;
            }
            match self.records.next() {
                Some(Ok(rec)) => {
                    self.summary.record(&rec);
                    rec.render_into(&mut self.pending);
                }
                Some(Err(e)) => {
                    self.closed = true;
                    return Some(Err(e));
                }
                None => {
                    self.closed = true;
                    self.pending.extend(closing_banner());
                }
            }
        }
    }
}

/* ================================== Tests ================================== */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        encoding::OutputEncoding,
        resolve::MemoryResolver
    };
    use std::io::ErrorKind;

    fn run(emitter: &Emitter, r: &MemoryResolver, enc: OutputEncoding) -> (Result<EmitSummary>, String) {
        let mut w = EncodedWriter::new(Vec::new(), enc);
        let res = emitter.emit(r, &mut w);
        (res, String::from_utf8_lossy(&w.into_inner()).into_owned())
    }

    fn emitter_for(paths: &[&str]) -> Emitter {
        Emitter::new(Manifest::new(paths.iter().copied()), LabelTable::default())
    }

    #[test]
    fn rule_is_eighty_equals() {
        assert_eq!(RULE.len(), 80);
        assert!(RULE.chars().all(|c| c == '='));
    }

    #[test]
    fn scenario_markdown_missing_css() {
        let r = MemoryResolver::new()
            .with_file("a.md", "# Title")
            .with_file("c.css", "body{}");
        let e = emitter_for(&["a.md", "b.missing", "c.css"]);
        let (res, out) = run(&e, &r, OutputEncoding::Utf8);
        let summary = res.unwrap();
        assert_eq!(summary, EmitSummary { present: 2, missing: 1, bytes: 13 });

        let expected = format!(
            "{RULE}\n{TITLE}\n{SUBTITLE}\n{RULE}\n\n\
             ## FILE: a.md\n```markdown\n# Title\n```\n\n\
             # MISSING: b.missing\n\
             ## FILE: c.css\n```css\nbody{{}}\n```\n\n\
             {RULE}\nEND SNAPSHOT\n{RULE}\n"
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn entry_lines_match_manifest_order() {
        let r = MemoryResolver::new().with_file("x.js", "1").with_file("z.jsx", "3");
        let paths = ["z.jsx", "y.md", "x.js", "y.md"];
        let e = emitter_for(&paths);
        let (_, out) = run(&e, &r, OutputEncoding::Utf8);
        let entries: Vec<&str> = out
            .lines()
            .filter_map(|l| l.strip_prefix(FILE_PREFIX).or_else(|| l.strip_prefix(MISSING_PREFIX)))
            .collect();
        assert_eq!(entries, paths);
    }

    #[test]
    fn unmapped_extension_gets_bare_fence() {
        let r = MemoryResolver::new().with_file("data.foo", "x");
        let (_, out) = run(&emitter_for(&["data.foo"]), &r, OutputEncoding::Utf8);
        assert!(out.contains("## FILE: data.foo\n```\nx\n```\n"));
    }

    #[test]
    fn contents_are_verbatim() {
        let body = "line1\r\n\ttabbed  \n\n  trailing\n";
        let r = MemoryResolver::new().with_file("notes.md", body);
        let (_, out) = run(&emitter_for(&["notes.md"]), &r, OutputEncoding::Utf8);
        let open = "```markdown\n";
        let start = out.find(open).unwrap() + open.len();
        let end = out[start..].find("\n```\n").unwrap() + start;
        assert_eq!(&out[start..end], body);
    }

    #[test]
    fn fatal_error_stops_without_end_banner() {
        let r = MemoryResolver::new()
            .with_file("a.md", "ok")
            .with_failure("b.js", ErrorKind::PermissionDenied)
            .with_file("c.css", "never");
        let (res, out) = run(&emitter_for(&["a.md", "b.js", "c.css"]), &r, OutputEncoding::Utf8);
        let err = res.unwrap_err();
        assert!(format!("{err:#}").contains("reading b.js"));
        assert!(out.contains("## FILE: a.md"));
        assert!(!out.contains("c.css"));
        assert!(!out.contains(END_MARKER));
    }

    #[test]
    fn records_carry_label_and_order() {
        let r = MemoryResolver::new().with_file("App.jsx", "x");
        let e = emitter_for(&["gone.md", "App.jsx"]);
        let recs: Vec<EmissionRecord> = e.records(&r).map(Result::unwrap).collect();
        assert_eq!(recs.len(), 2);
        assert!(recs[0].is_missing());
        assert_eq!(recs[0].path(), "gone.md");
        assert_eq!(
            recs[1],
            EmissionRecord::Present { path: "App.jsx".into(), label: "jsx".into(), contents: "x".into() }
        );
    }

    #[test]
    fn records_stop_after_error() {
        let r = MemoryResolver::new().with_failure("a", ErrorKind::Other);
        let e = emitter_for(&["a", "b"]);
        let mut it = e.records(&r);
        assert!(it.next().unwrap().is_err());
        assert!(it.next().is_none());
    }

    #[test]
    fn narrow_encoding_substitutes_in_place() {
        let r = MemoryResolver::new().with_file("a.md", "pre → post");
        let (res, out) = run(&emitter_for(&["a.md"]), &r, OutputEncoding::Ascii);
        assert!(res.is_ok());
        assert!(out.contains("\npre ? post\n"));
        assert!(out.ends_with(&format!("{END_MARKER}\n{RULE}\n")));
    }

    #[test]
    fn empty_manifest_is_just_banners() {
        let (res, out) = run(&emitter_for(&[]), &MemoryResolver::new(), OutputEncoding::Utf8);
        assert_eq!(res.unwrap().total(), 0);
        assert_eq!(out, format!("{RULE}\n{TITLE}\n{SUBTITLE}\n{RULE}\n\n{RULE}\n{END_MARKER}\n{RULE}\n"));
    }

    #[test]
    fn two_runs_are_identical() {
        let r = MemoryResolver::new().with_file("a.md", "é").with_file("b.js", "x");
        let e = emitter_for(&["a.md", "q", "b.js"]);
        let (_, first) = run(&e, &r, OutputEncoding::Utf8);
        let (_, second) = run(&e, &r, OutputEncoding::Utf8);
        assert_eq!(first, second);
    }

    #[test]
    fn lines_are_lazy() {
        let r = MemoryResolver::new().with_failure("boom", ErrorKind::Other);
        let e = emitter_for(&["boom"]);
        // Opening banner is available before anything is resolved.
        let first: Vec<String> = e.lines(&r).take(5).map(Result::unwrap).collect();
        assert_eq!(first[1], TITLE);
    }
}
