//! harrow - batch framework-migration tool
//!
//! Loads build descriptors and configuration files, runs the activated
//! rule set to convergence over each document in parallel, and writes the
//! changed documents back. Language-source documents carry a symbol table
//! the CLI cannot produce; they migrate through the library API instead.

mod cli;

use std::fs;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use harrow_core::{
    migrate, parse_pom, parse_properties, quarkus, register_manifest, write_pom, write_properties,
    Document, DocumentBody, DocumentOutcome, MigrationOptions, Severity,
};

use cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "harrow=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut catalog = quarkus::builtin()?;
    if let Some(path) = &args.manifest {
        let text = fs::read_to_string(path).with_context(|| format!("reading manifest {path}"))?;
        register_manifest(&mut catalog, &text)?;
    }

    if args.list_rules {
        for (name, def) in catalog.entries() {
            println!("{name}");
            println!("    {}", def.description());
        }
        return Ok(());
    }

    if args.rules.is_empty() {
        bail!("no rules activated; pass --rule (see --list-rules)");
    }
    if args.files.is_empty() {
        bail!("no input files given");
    }

    // Activation-time errors (unknown rule, cyclic composite) abort here,
    // before any document is read.
    let active = catalog.activate(&args.rules)?;

    let files = expand_globs(&args.files);
    let mut documents = Vec::new();
    for file in &files {
        match load_document(file) {
            Ok(Some(doc)) => documents.push(doc),
            Ok(None) => eprintln!("skipping {file}: not a migratable document kind"),
            Err(e) => eprintln!("skipping {file}: {e:#}"),
        }
    }
    if documents.is_empty() {
        bail!("none of the inputs were migratable");
    }

    let opts = MigrationOptions {
        max_passes: args.max_passes,
        threads: args.concurrency,
        ..MigrationOptions::default()
    };
    let outcomes = migrate(&documents, &active, &opts);

    let color = should_use_color(&args.color);
    let mut changed = 0usize;
    for outcome in &outcomes {
        report(outcome, color);
        if let Some(document) = outcome.change.document() {
            changed += 1;
            if !args.dry_run {
                fs::write(&outcome.origin, serialize_document(document))
                    .with_context(|| format!("writing {}", outcome.origin))?;
            }
        }
    }

    let suffix = if args.dry_run { " (dry run)" } else { "" };
    println!("{changed} of {} documents changed{suffix}", outcomes.len());
    Ok(())
}

fn report(outcome: &DocumentOutcome, color: bool) {
    if outcome.change.is_changed() {
        let touched = outcome.change.rules().join(", ");
        println!(
            "{} {} [{}]",
            paint("M", "32", color),
            outcome.origin,
            touched
        );
    }
    if outcome.non_convergent() {
        eprintln!(
            "{} {} did not converge; emitted last computed state",
            paint("warning:", "33", color),
            outcome.origin
        );
    }
    for message in &outcome.messages {
        if message.severity != Severity::Note {
            eprintln!("  {} {}", paint("!", "33", color), message.detail);
        }
    }
    for error in &outcome.rule_errors {
        eprintln!("  {} {}", paint("error:", "31", color), error);
    }
}

/// Load one file as a migratable document, detecting its kind by name.
fn load_document(path: &str) -> anyhow::Result<Option<Document>> {
    let kind = detect_kind(path);
    let text = match kind {
        FileKind::Unsupported => return Ok(None),
        _ => fs::read_to_string(path).with_context(|| format!("reading {path}"))?,
    };
    match kind {
        FileKind::Config => Ok(Some(Document::config(path, parse_properties(&text)?))),
        FileKind::Build => Ok(Some(Document::build(path, parse_pom(&text)?))),
        FileKind::Unsupported => Ok(None),
    }
}

fn serialize_document(document: &Document) -> String {
    match &document.body {
        DocumentBody::Config(root) => write_properties(root),
        DocumentBody::Build(file) => write_pom(file),
        // The CLI never loads source documents (no symbol table available).
        DocumentBody::Source(_) => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Config,
    Build,
    Unsupported,
}

fn detect_kind(path: &str) -> FileKind {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    if name.ends_with(".properties") {
        FileKind::Config
    } else if name == "pom.xml" || name.ends_with(".xml") {
        FileKind::Build
    } else {
        FileKind::Unsupported
    }
}

/// Expand glob patterns to file paths; non-glob arguments pass through.
fn expand_globs(patterns: &[String]) -> Vec<String> {
    let mut files = Vec::new();
    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') {
            match glob::glob(pattern) {
                Ok(paths) => {
                    for entry in paths.flatten() {
                        if entry.is_file() {
                            if let Some(path) = entry.to_str() {
                                files.push(path.to_string());
                            }
                        }
                    }
                }
                Err(e) => {
                    eprintln!("invalid glob pattern '{pattern}': {e}");
                }
            }
        } else {
            files.push(pattern.clone());
        }
    }
    files
}

fn should_use_color(choice: &str) -> bool {
    match choice {
        "always" => true,
        "never" => false,
        _ => atty::is(atty::Stream::Stdout),
    }
}

fn paint(s: &str, code: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{code}m{s}\x1b[0m")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_kind() {
        assert_eq!(detect_kind("pom.xml"), FileKind::Build);
        assert_eq!(detect_kind("modules/app/pom.xml"), FileKind::Build);
        assert_eq!(
            detect_kind("src/main/resources/application.properties"),
            FileKind::Config
        );
        assert_eq!(detect_kind("settings.xml"), FileKind::Build);
        assert_eq!(detect_kind("Main.java"), FileKind::Unsupported);
        assert_eq!(detect_kind("README.md"), FileKind::Unsupported);
    }

    #[test]
    fn test_expand_globs_passthrough() {
        let files = expand_globs(&["pom.xml".to_string()]);
        assert_eq!(files, vec!["pom.xml"]);
    }

    #[test]
    fn test_load_and_serialize_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("application.properties");
        fs::write(&path, "quarkus.http.port=8080\n").unwrap();

        let doc = load_document(path.to_str().unwrap()).unwrap().unwrap();
        assert_eq!(serialize_document(&doc), "quarkus.http.port=8080\n");
    }

    #[test]
    fn test_unsupported_files_are_skipped_not_errors() {
        assert!(load_document("Main.java").unwrap().is_none());
    }
}
