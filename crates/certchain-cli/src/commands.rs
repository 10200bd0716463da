use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::json;
use tracing::info;

use certchain_ledger::{Ledger, LedgerConfig, SummaryRow};
use certchain_types::BlockHash;

use crate::cli::*;
use crate::manifest::Manifest;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Summary(args) => cmd_summary(build_ledger(config, &args.manifest)?, &cli.format),
        Command::Lookup(args) => cmd_lookup(build_ledger(config, &args.manifest)?, &args.name, &cli.format),
        Command::Validate(args) => {
            let ledger = build_ledger(config, &args.manifest)?;
            cmd_validate(&ledger, args.expect_head.as_deref(), &cli.format)
        }
        Command::Export(args) => {
            let ledger = build_ledger(config, &args.manifest)?;
            let written = export_certificates(&ledger, &args.name, &args.out)?;
            if written.is_empty() {
                println!("Certificate not found for {}", args.name.yellow());
            }
            for path in &written {
                println!("{} wrote {}", "✓".green().bold(), path.display());
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LedgerConfig> {
    let Some(path) = path else {
        return Ok(LedgerConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    LedgerConfig::from_toml_str(&text).with_context(|| format!("loading config {}", path.display()))
}

/// Replay `manifest` into a fresh ledger.
pub fn build_ledger(config: LedgerConfig, manifest: &Path) -> anyhow::Result<Ledger> {
    let (manifest, base) = Manifest::load(manifest)?;
    let mut ledger = Ledger::with_config(config);
    manifest.replay(&base, &mut ledger)?;
    info!(blocks = ledger.block_count(), records = ledger.record_count(), "ledger ready");
    Ok(ledger)
}

fn cmd_summary(ledger: Ledger, format: &OutputFormat) -> anyhow::Result<()> {
    let rows = ledger.summary();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No certificates issued.");
            }
            for row in &rows {
                print_row(row);
            }
            println!(
                "\n{} blocks, {} certificates",
                ledger.block_count().to_string().bold(),
                rows.len().to_string().bold()
            );
        }
    }
    Ok(())
}

fn cmd_lookup(ledger: Ledger, name: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<SummaryRow> = ledger.certificates(name).iter().map(|c| c.details()).collect();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text if rows.is_empty() => {
            println!("Certificate not found for {}", name.yellow());
        }
        OutputFormat::Text => rows.iter().for_each(print_row),
    }
    Ok(())
}

fn cmd_validate(ledger: &Ledger, expect_head: Option<&str>, format: &OutputFormat) -> anyhow::Result<()> {
    let report = ledger.audit();
    let head = &ledger.head().hash;
    let expected = expect_head.map(BlockHash::from_hex).transpose()?;
    let head_matches = expected.as_ref().map_or(true, |e| e == head);

    match format {
        OutputFormat::Json => {
            let violations: Vec<_> = report
                .violations
                .iter()
                .map(|v| json!({ "index": v.index, "kind": v.kind.to_string(), "description": v.description }))
                .collect();
            let out = json!({
                "valid": report.is_valid(),
                "block_count": report.block_count,
                "record_count": report.record_count,
                "head": head,
                "head_matches": head_matches,
                "violations": violations,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!(
                "Chain: {} blocks, {} certificates, head {}",
                report.block_count.to_string().bold(),
                report.record_count.to_string().bold(),
                head.short().cyan()
            );
            for v in &report.violations {
                println!("  {} {} {}: {}", "✗".red(), v.index, v.kind.to_string().yellow(), v.description);
            }
            if report.is_valid() {
                println!("{} Blockchain is valid", "✓".green().bold());
            }
        }
    }

    if let Some(first) = report.first_invalid() {
        bail!("blockchain is invalid, first bad block {first}");
    }
    if !head_matches {
        bail!("head hash {head} does not match expected");
    }
    Ok(())
}

/// Write each certificate matching `name` to `out` as pretty JSON.
pub fn export_certificates(ledger: &Ledger, name: &str, out: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
    let mut written = Vec::new();
    for cert in ledger.certificates(name) {
        let path = out.join(cert.export_filename());
        fs::write(&path, cert.to_json_pretty()?)
            .with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

fn print_row(row: &SummaryRow) {
    println!(
        "{} {} {}",
        row.block_index.to_string().dimmed(),
        format!("#{}", row.record_id).yellow(),
        row.subject_name.bold()
    );
    println!("    Course: {}", row.course);
    println!("    Issuer: {} ({})", row.issuer, row.issuer_id);
    println!("    Issued: {} at {}", row.issue_date, row.issued_at);
    if let Some(name) = &row.attachment_name {
        println!("    Attachment: {}", name.cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(dir: &Path) -> PathBuf {
        let path = dir.join("batch.toml");
        fs::write(
            &path,
            r#"
[[block]]
seal_token = 3

[[block.record]]
subject_name = "Ada Lovelace"
course = "CS101"
issuer = "MIT"
issuer_id = "U1"
issue_date = "2024-01-01"

[[block.record]]
subject_name = "ada lovelace"
course = "CS201"
"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn build_ledger_replays_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = build_ledger(LedgerConfig::default(), &write_manifest(dir.path())).unwrap();
        assert_eq!(ledger.block_count(), 2);
        assert_eq!(ledger.record_count(), 2);
        assert!(ledger.validate());
    }

    #[test]
    fn config_file_sets_genesis() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("ledger.toml");
        fs::write(&config_path, "genesis_seal_token = 42\n").unwrap();
        let config = load_config(Some(&config_path)).unwrap();
        let ledger = build_ledger(config, &write_manifest(dir.path())).unwrap();
        assert_eq!(ledger.chain()[0].seal_token.0, 42);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/ledger.toml"))).is_err());
        assert!(load_config(None).is_ok());
    }

    #[test]
    fn export_writes_one_file_per_match() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = build_ledger(LedgerConfig::default(), &write_manifest(dir.path())).unwrap();
        let out = dir.path().join("out");

        let written = export_certificates(&ledger, "ADA LOVELACE", &out).unwrap();
        assert_eq!(written, vec![out.join("certificate_1.json"), out.join("certificate_2.json")]);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written[1]).unwrap()).unwrap();
        assert_eq!(json["course"], "CS201");
        assert_eq!(json["record_id"], 2);
    }

    #[test]
    fn export_without_match_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = build_ledger(LedgerConfig::default(), &write_manifest(dir.path())).unwrap();
        let written = export_certificates(&ledger, "Grace Hopper", dir.path()).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn validate_checks_expected_head() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = build_ledger(LedgerConfig::default(), &write_manifest(dir.path())).unwrap();
        let head = ledger.head().hash.to_string();

        assert!(cmd_validate(&ledger, None, &OutputFormat::Json).is_ok());
        assert!(cmd_validate(&ledger, Some(&head.to_uppercase()), &OutputFormat::Text).is_ok());
        assert!(cmd_validate(&ledger, Some(&"0".repeat(64)), &OutputFormat::Text).is_err());
        assert!(cmd_validate(&ledger, Some("not-hex"), &OutputFormat::Text).is_err());
    }
}
