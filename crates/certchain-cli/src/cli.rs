use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "certchain",
    about = "certchain: hash-linked certificate issuance ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Ledger configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a manifest and print every issued certificate
    Summary(ManifestArgs),
    /// Replay a manifest and find certificates by subject name
    Lookup(LookupArgs),
    /// Replay a manifest and check chain integrity
    Validate(ValidateArgs),
    /// Replay a manifest and write matching certificates as JSON files
    Export(ExportArgs),
}

#[derive(Args)]
pub struct ManifestArgs {
    /// Issuance manifest (TOML)
    pub manifest: PathBuf,
}

#[derive(Args)]
pub struct LookupArgs {
    pub manifest: PathBuf,
    /// Subject name, matched exactly but ignoring case
    pub name: String,
}

#[derive(Args)]
pub struct ValidateArgs {
    pub manifest: PathBuf,
    /// Fail unless the head block has this hash
    #[arg(long)]
    pub expect_head: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    pub manifest: PathBuf,
    pub name: String,
    /// Directory to write `certificate_<id>.json` files into
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_summary() {
        let cli = Cli::try_parse_from(["certchain", "summary", "batch.toml"]).unwrap();
        if let Command::Summary(args) = cli.command {
            assert_eq!(args.manifest, PathBuf::from("batch.toml"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_lookup() {
        let cli = Cli::try_parse_from(["certchain", "lookup", "batch.toml", "Ada Lovelace"]).unwrap();
        if let Command::Lookup(args) = cli.command {
            assert_eq!(args.name, "Ada Lovelace");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_validate_expect_head() {
        let cli = Cli::try_parse_from(["certchain", "validate", "b.toml", "--expect-head", "ab"]).unwrap();
        if let Command::Validate(args) = cli.command {
            assert_eq!(args.expect_head, Some("ab".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_export_default_out() {
        let cli = Cli::try_parse_from(["certchain", "export", "b.toml", "Ada"]).unwrap();
        if let Command::Export(args) = cli.command {
            assert_eq!(args.out, PathBuf::from("."));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["certchain", "--verbose", "summary", "b.toml"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format_and_config() {
        let cli = Cli::try_parse_from([
            "certchain", "--format", "json", "--config", "ledger.toml", "summary", "b.toml",
        ])
        .unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("ledger.toml")));
    }

    #[test]
    fn missing_manifest_is_an_error() {
        assert!(Cli::try_parse_from(["certchain", "lookup"]).is_err());
    }
}
