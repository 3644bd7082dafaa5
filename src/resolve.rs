// snapshot/src/resolve.rs
//! File resolution capability: logical path → optional text contents.
//!
//! `Ok(None)` means "not found" (including a path that runs through a
//! regular file) and is the only recoverable outcome.
//! Every other failure is returned as `Err` and aborts the snapshot.

use std::{
    collections::BTreeMap,
    fs,
    io::{
        self,
        ErrorKind
    },
    path::PathBuf,
};

use crate::util::{
    display_rel,
    logical_to_native
};

pub trait Resolve {
    /// Full text contents of `logical`, or `None` when it does not exist.
    fn resolve(&self, logical: &str) -> io::Result<Option<String>>;

    /// Existence check without reading contents.
    fn exists(&self, logical: &str) -> bool;
}

/* =============================== Filesystem =============================== */

/// Resolves logical paths against a project root on disk.
#[derive(Debug, Clone)]
pub struct FsResolver {
    root: PathBuf,
}

impl FsResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn native_path(&self, logical: &str) -> PathBuf {
        logical_to_native(&self.root, logical)
    }
}

impl Resolve for FsResolver {
    fn resolve(&self, logical: &str) -> io::Result<Option<String>> {
        let path = self.native_path(logical);
        // fs::read opens, reads to end and closes before returning, on both paths.
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if is_absent(&e) => return Ok(None),
            Err(e) => return Err(e),
        };
        log::debug!("read {} ({} bytes)", display_rel(&self.root, &path), bytes.len());
        decode_utf8(bytes).map(Some)
    }

    fn exists(&self, logical: &str) -> bool {
        self.native_path(logical).exists()
    }
}

/// `a.md/inner.js` with `a.md` a regular file fails with ENOTDIR; that path
/// does not exist either.
fn is_absent(e: &io::Error) -> bool {
    matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

/// Strict UTF-8 decode. Invalid input is fatal, like any other read error.
fn decode_utf8(bytes: Vec<u8>) -> io::Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        io::Error::new(ErrorKind::InvalidData, format!("not valid UTF-8: {}", e.utf8_error()))
    })
}

/* ================================ In-memory ================================ */

/// Map-backed resolver. Entries can also be set to fail with a given
/// `ErrorKind` to exercise the fatal path.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    files: BTreeMap<String, String>,
    failures: BTreeMap<String, ErrorKind>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, logical: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(logical, contents);
        self
    }

    pub fn with_failure(mut self, logical: impl Into<String>, kind: ErrorKind) -> Self {
        self.failures.insert(logical.into(), kind);
        self
    }

    pub fn insert(&mut self, logical: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(logical.into(), contents.into());
    }
}

impl Resolve for MemoryResolver {
    fn resolve(&self, logical: &str) -> io::Result<Option<String>> {
        if let Some(kind) = self.failures.get(logical) {
            return Err(io::Error::new(*kind, "injected failure"));
        }
        Ok(self.files.get(logical).cloned())
    }

    fn exists(&self, logical: &str) -> bool {
        self.files.contains_key(logical) || self.failures.contains_key(logical)
    }
}

/* ================================== Tests ================================== */
