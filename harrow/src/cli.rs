//! CLI argument parsing using clap

use clap::Parser;

/// Batch framework-migration tool applying tree-rewrite rules
#[derive(Parser, Debug)]
#[command(name = "harrow")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Run the full Quarkus 2 migration over a project
    harrow --rule quarkus.quarkus2-migration "**/pom.xml" "**/*.properties"

    # Preview without writing anything back
    harrow --rule quarkus.rename-dev-instrumentation-property --dry-run src/main/resources/application.properties

    # Merge project-specific rules into the catalog
    harrow --manifest migration.yml --rule my.project-migration "**/*.properties"

    # See what the catalog offers
    harrow --list-rules
"#)]
pub struct Args {
    /// Files to migrate (supports glob patterns like "**/pom.xml")
    #[arg()]
    pub files: Vec<String>,

    /// Rule or composite names to activate (repeatable)
    #[arg(short = 'r', long = "rule")]
    pub rules: Vec<String>,

    /// Extra declarative rule manifest merged into the built-in catalog
    #[arg(short = 'm', long = "manifest")]
    pub manifest: Option<String>,

    /// List every registered rule with its description and exit
    #[arg(long = "list-rules")]
    pub list_rules: bool,

    /// Maximum rule-set passes per document before giving up on convergence
    #[arg(long = "max-passes", default_value_t = 5)]
    pub max_passes: usize,

    /// Number of parallel workers
    #[arg(short = 'c', long = "concurrency")]
    pub concurrency: Option<usize>,

    /// Report what would change without writing files
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Color output: auto (default), always, never
    #[arg(long = "color", default_value = "auto")]
    pub color: String,

    /// Show verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
