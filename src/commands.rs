// snapshot/src/commands.rs

use anyhow::{
    anyhow,
    bail,
    Context,
    Result
};
use std::{
    env,
    fs,
    io::{
        self,
        BufWriter,
        Write
    },
    path::PathBuf
};
use crate::{
    encoding::{
        EncodedWriter,
        OutputEncoding
    },
    emit::Emitter,
    labels::LabelTable,
    manifest::Manifest,
    resolve::{
        FsResolver,
        Resolve
    },
};


pub fn run_cli() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    run(&args, &mut lock)
}

/// Dispatch on `args` (program name already stripped). Anything the command
/// prints goes to `stdout`; diagnostics go through `log`.
pub fn run(args: &[String], stdout: &mut dyn Write) -> Result<()> {
    let (cmd, rest) = match args.split_first() {
        Some((first, rest)) if !first.starts_with("--") || first == "--help" => (first.as_str(), rest),
        _ => ("snapshot", args),
    };

    match cmd {
        "snapshot"                => snapshot(&Options::parse(rest)?, stdout),
        "manifest"                => list_manifest(&Options::parse(rest)?, stdout),
        "labels"                  => list_labels(stdout),
        "help" | "-h" | "--help"  => print_help(stdout),
        other => Err(anyhow!("unknown command `{other}`; run `snapshot help`")),
    }
}

#[derive(Debug, Default)]
struct Options {
    root: Option<PathBuf>,
    manifest: Option<PathBuf>,
    out: Option<PathBuf>,
    encoding: OutputEncoding,
}

impl Options {
    /// `--key=value` flags only; unknown keys are errors.
    fn parse(args: &[String]) -> Result<Self> {
        let mut opts = Options::default();
        for arg in args {
            let (key, value) = parse_flag(arg)
                .ok_or_else(|| anyhow!("expected --key=value, got `{arg}`"))?;
            match key {
                "root"     => opts.root = Some(PathBuf::from(value)),
                "manifest" => opts.manifest = Some(PathBuf::from(value)),
                "out"      => opts.out = Some(PathBuf::from(value)),
                "encoding" => opts.encoding = value.parse()?,
                _ => bail!("unknown flag `--{key}`"),
            }
        }
        Ok(opts)
    }

    fn root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(r) => Ok(r.clone()),
            None => env::current_dir().context("failed to get current_dir"),
        }
    }

    fn manifest(&self) -> Result<Manifest> {
        match &self.manifest {
            Some(p) => Manifest::load(p),
            None => Ok(Manifest::default()),
        }
    }
}

fn parse_flag(arg: &str) -> Option<(&str, &str)> {
    let rest = arg.trim().strip_prefix("--")?;
    let (k, v) = rest.split_once('=')?;
    if k.is_empty() || v.is_empty() { return None; }
    Some((k, v))
}

fn snapshot(opts: &Options, stdout: &mut dyn Write) -> Result<()> {
    let root = opts.root()?;
    let emitter = Emitter::new(opts.manifest()?, LabelTable::default());
    let resolver = FsResolver::new(&root);
    log::debug!(
        "snapshot of {} entries under {} ({})",
        emitter.manifest().len(),
        root.display(),
        opts.encoding
    );

    let summary = match &opts.out {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut w = EncodedWriter::new(BufWriter::new(file), opts.encoding);
            let summary = emitter.emit(&resolver, &mut w)
                .with_context(|| format!("writing snapshot to {}", path.display()))?;
            writeln!(stdout, "Snapshot written to {}", path.display())?;
            summary
        }
        None => {
            let mut w = EncodedWriter::new(BufWriter::new(stdout), opts.encoding);
            emitter.emit(&resolver, &mut w)?
        }
    };

    log::info!(
        "snapshot complete: {} present, {} missing, {} bytes",
        summary.present, summary.missing, summary.bytes
    );
    Ok(())
}

/// One line per entry: status, label, path. Reads no contents.
fn list_manifest(opts: &Options, stdout: &mut dyn Write) -> Result<()> {
    let root = opts.root()?;
    let manifest = opts.manifest()?;
    let labels = LabelTable::default();
    let resolver = FsResolver::new(&root);

    for path in manifest.iter() {
        let status = if resolver.exists(path) { "present" } else { "missing" };
        let label = match labels.label_of(path) {
            "" => "-",
            l => l,
        };
        writeln!(stdout, "{status:<8} {label:<11} {path}")?;
    }
    Ok(())
}

fn list_labels(stdout: &mut dyn Write) -> Result<()> {
    for (ext, label) in LabelTable::default().iter() {
        writeln!(stdout, ".{ext:<6} {label}")?;
    }
    writeln!(stdout, "(other) <bare fence>")?;
    Ok(())
}

fn print_help(stdout: &mut dyn Write) -> Result<()> {
    writeln!(
        stdout,
r#"
Source Snapshot CLI

USAGE:
    snapshot [FLAGS]            # Emit the snapshot of the built-in manifest to stdout
    snapshot snapshot [FLAGS]   # Same as above
    snapshot manifest [FLAGS]   # List manifest entries with label and present/missing status
    snapshot labels             # Show the extension -> fence label table
    snapshot help               # Show this message

FLAGS:
    --root=DIR                  # Project root (default: current dir)
    --manifest=FILE             # JSON array or one path per line, replaces the built-in list
    --out=FILE                  # Write the snapshot to FILE instead of stdout
    --encoding=utf8|ascii|latin1
                                # Output encoding; unrepresentable chars become '?'

Diagnostics go to stderr; set RUST_LOG=info (or debug) for more detail.
"#
    )?;
    Ok(())
}

/* ================================== Tests ================================== */
