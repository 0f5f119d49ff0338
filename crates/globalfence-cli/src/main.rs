use clap::{Parser, Subcommand};
use colored::Colorize;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use globalfence_core::{Category, Config, Report, Runtime, Severity};
use globalfence_engine::{audit_catalogs, Categories, Synthesizer};
use globalfence_fixture::{render_fixture, write_all, write_fixture, FixtureChecker};

/// globalfence - Runtime-scoped global restrictions for lint configs
#[derive(Parser)]
#[command(name = "globalfence")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: globalfence.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the restriction rule document and the fixtures
    Generate {
        /// Only generate the fixture for this runtime
        #[arg(short, long)]
        runtime: Option<Runtime>,

        /// Output file for the rule document (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the rule entry for one runtime
    Rules {
        /// Runtime to print rules for
        #[arg(short, long)]
        runtime: Runtime,
    },

    /// Show how the catalog globals are classified
    Classify {
        /// List every name, not just counts
        #[arg(short, long)]
        list: bool,
    },

    /// Check fixtures are current and consistent with the rules
    Verify {
        /// Output file for report.json
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("globalfence.toml").exists() {
        Config::from_file(Path::new("globalfence.toml"))?
    } else {
        tracing::debug!("no config file found, using defaults");
        Config::default()
    };

    match cli.command {
        Commands::Generate { runtime, output } => generate_command(&config, runtime, output.as_deref()),
        Commands::Rules { runtime } => rules_command(&config, runtime),
        Commands::Classify { list } => classify_command(&config, list),
        Commands::Verify { report, markdown } => {
            verify_command(&config, report.as_deref(), markdown.as_deref())
        }
    }
}

/// Load catalogs and classify them
fn classify(config: &Config) -> Result<Categories> {
    let catalogs = config
        .load_catalogs()
        .context("Failed to load globals catalog")?;
    let categories = Categories::classify(&catalogs, &config.catalog.embedded_globals);

    for key in categories.conflicts() {
        tracing::warn!(key, "global has different values in server and browser catalogs");
    }

    Ok(categories)
}

fn catalog_label(config: &Config) -> String {
    config
        .catalog
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<builtin>".to_string())
}

/// Generate command - write rule document and fixtures
fn generate_command(config: &Config, runtime: Option<Runtime>, output: Option<&Path>) -> Result<()> {
    let categories = classify(config)?;
    let synthesizer = Synthesizer::from_config(&categories, config);

    let document = synthesizer.document(config);
    let output = output_path(config, output);
    std::fs::write(&output, document.to_json()?)
        .with_context(|| format!("Failed to write rule document {}", output.display()))?;
    tracing::info!(path = %output.display(), entries = document.entries.len(), "wrote rule document");

    let cache_dir = config.resolve(&config.cache_dir);
    let written = match runtime {
        Some(runtime) => vec![write_fixture(&cache_dir, runtime, &config.samples)?],
        None => write_all(&cache_dir, &config.samples)?,
    };

    println!("{} {}", "Rules:".bold(), output.display());
    for fixture in &written {
        println!(
            "  {} {:<9} {} ({} bytes, sha256 {})",
            "✓".green(),
            fixture.runtime.to_string(),
            fixture.path.display(),
            fixture.bytes,
            &fixture.digest[..12]
        );
    }

    Ok(())
}

/// Rule document path; a command-line path is taken relative to the working directory
fn output_path(config: &Config, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => config.resolve(&config.output),
    }
}

/// Rules command - print one runtime's config entry
fn rules_command(config: &Config, runtime: Runtime) -> Result<()> {
    let categories = classify(config)?;
    let entry = Synthesizer::from_config(&categories, config).entry(runtime, config.group_files(runtime));

    println!("{}", serde_json::to_string_pretty(&entry)?);
    Ok(())
}

/// Classify command - print category sizes
fn classify_command(config: &Config, list: bool) -> Result<()> {
    let categories = classify(config)?;

    println!("{} {}", "Catalog:".bold(), catalog_label(config));
    for category in Category::ALL {
        let names = categories.get(category);
        println!("  {:<14} {}", category.label(), names.len().to_string().cyan());

        if list {
            for name in names {
                println!("    {}", name);
            }
        }
    }

    let conflicts = categories.conflicts();
    if !conflicts.is_empty() {
        println!(
            "  {} {} key(s) differ between catalogs: {}",
            "⚠".yellow(),
            conflicts.len(),
            conflicts.join(", ")
        );
    }

    Ok(())
}

/// Verify command - freshness, fixture self-check, catalog audit
fn verify_command(config: &Config, report_path: Option<&Path>, markdown: Option<&Path>) -> Result<()> {
    let catalogs = config
        .load_catalogs()
        .context("Failed to load globals catalog")?;
    let categories = Categories::classify(&catalogs, &config.catalog.embedded_globals);
    let synthesizer = Synthesizer::from_config(&categories, config);
    let checker = FixtureChecker::new()?;

    let mut report = Report::new();
    report.extend(audit_catalogs(&catalogs, &categories, &catalog_label(config)));

    let cache_dir = config.resolve(&config.cache_dir);
    for runtime in Runtime::ALL {
        let label = config.fixture_path(runtime).display().to_string();
        let expected = render_fixture(runtime, &config.samples);
        let path = cache_dir.join(globalfence_fixture::fixture_file_name(runtime));

        tracing::debug!(runtime = %runtime, path = %path.display(), "verifying fixture");

        let entry = synthesizer.entry(runtime, config.group_files(runtime));
        report.extend(checker.verify(&path, &label, &expected, &entry)?);
        report.summary.fixtures_checked += 1;
    }

    if let Some(path) = report_path {
        report.save_to_file(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        tracing::info!(path = %path.display(), "report saved");
    }

    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))?;
        tracing::info!(path = %md_path.display(), "markdown report saved");
    }

    print_report_summary(&report);

    // Exit with error code if there are errors
    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Print report summary to stdout
fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Global Restriction Verification Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!("Fixtures checked: {}", report.summary.fixtures_checked);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Total diagnostics: {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }

    println!("  Info:     {}", report.summary.info);
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in &report.diagnostics {
            let severity_str = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };

            println!("  [{}] {}: {}", severity_str, diag.code, diag.message);

            if let Some(loc) = &diag.location {
                println!("    at {}", loc);
            }
            if let Some(rule) = &diag.rule {
                println!("    rule: {}", rule);
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Global Restriction Verification Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Fixtures checked: {}\n", report.summary.fixtures_checked));
    md.push_str(&format!("- Total diagnostics: {}\n", report.summary.total));
    md.push_str(&format!("- Errors: {}\n", report.summary.errors));
    md.push_str(&format!("- Warnings: {}\n", report.summary.warnings));
    md.push_str(&format!("- Info: {}\n", report.summary.info));
    md.push('\n');

    if report.diagnostics.is_empty() {
        md.push_str("✅ **No issues found!**\n");
    } else {
        md.push_str("## Diagnostics\n\n");

        for diag in &report.diagnostics {
            let severity_emoji = match diag.severity {
                Severity::Error => "❌",
                Severity::Warn => "⚠️",
                Severity::Info => "ℹ️",
            };

            md.push_str(&format!("### {} {} - {}\n\n", severity_emoji, diag.severity, diag.code));
            md.push_str(&format!("{}\n\n", diag.message));

            if let Some(loc) = &diag.location {
                md.push_str(&format!("**Location:** {}\n\n", loc));
            }
            if let Some(rule) = &diag.rule {
                md.push_str(&format!("**Rule:** `{}`\n\n", rule));
            }
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use globalfence_core::{Diagnostic, DiagnosticCode, Location};

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn runtime_argument_parses() {
        let cli = Cli::try_parse_from(["globalfence", "rules", "--runtime", "browser"]).unwrap();
        assert!(matches!(cli.command, Commands::Rules { runtime: Runtime::Browser }));

        assert!(Cli::try_parse_from(["globalfence", "rules", "--runtime", "deno"]).is_err());
    }

    #[test]
    fn output_flag_is_not_resolved_against_config_root() {
        let mut config = Config::default();
        config.project_root = PathBuf::from("/srv/project");

        assert_eq!(
            output_path(&config, Some(Path::new("out/rules.json"))),
            PathBuf::from("out/rules.json")
        );
        assert_eq!(
            output_path(&config, None),
            PathBuf::from("/srv/project/restricted-globals.json")
        );
    }

    #[test]
    fn markdown_report_lists_diagnostics() {
        let report = Report::from_diagnostics(vec![Diagnostic::new(
            DiagnosticCode::FixtureOutOfDate,
            Severity::Error,
            "Fixture is out of date",
        )
        .with_location(Location::new(".cache/eslint-check/none.ts"))]);

        let md = generate_markdown_report(&report);
        assert!(md.contains("FIXTURE_OUT_OF_DATE"));
        assert!(md.contains("**Location:** .cache/eslint-check/none.ts"));
    }
}
