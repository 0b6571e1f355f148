use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "geodid",
    about = "GeoDID pinning and resolution",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Client configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create, pin, load and extend a collection and an item against the embedded backend
    Demo(DemoArgs),
    /// Parse an identifier and show its parts
    Parse(ParseArgs),
    /// Print the content hash the embedded backend assigns to a file
    Hash(HashArgs),
    /// Show the effective client configuration
    Config,
}

#[derive(Args)]
pub struct DemoArgs {
    /// Path of the child item under the genesis collection
    #[arg(long, default_value = "item1")]
    pub item: String,

    /// Files to attach to the item as assets
    #[arg(long = "asset")]
    pub assets: Vec<PathBuf>,

    /// Wait for each pin job to reach a terminal status
    #[arg(long)]
    pub await_terminal: bool,
}

#[derive(Args)]
pub struct ParseArgs {
    pub geodid: String,
}

#[derive(Args)]
pub struct HashArgs {
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_demo_defaults() {
        let cli = Cli::try_parse_from(["geodid", "demo"]).unwrap();
        if let Command::Demo(args) = cli.command {
            assert_eq!(args.item, "item1");
            assert!(args.assets.is_empty());
            assert!(!args.await_terminal);
        } else {
            panic!("wrong command");
        }
        assert!(matches!(cli.format, OutputFormat::Text));
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_demo_with_assets() {
        let cli = Cli::try_parse_from([
            "geodid",
            "demo",
            "--asset",
            "photo.jpg",
            "--asset",
            "area.geojson",
            "--await-terminal",
            "--item",
            "plot7",
        ])
        .unwrap();
        if let Command::Demo(args) = cli.command {
            assert_eq!(
                args.assets,
                vec![PathBuf::from("photo.jpg"), PathBuf::from("area.geojson")]
            );
            assert!(args.await_terminal);
            assert_eq!(args.item, "plot7");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_identifier() {
        let cli = Cli::try_parse_from(["geodid", "parse", "did:geo:abc/item1"]).unwrap();
        if let Command::Parse(args) = cli.command {
            assert_eq!(args.geodid, "did:geo:abc/item1");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "geodid", "hash", "blob.bin", "--format", "json", "-c", "geodid.toml", "-v",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Hash(_)));
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("geodid.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["geodid", "config", "--format", "yaml"]).is_err());
    }

    #[test]
    fn parse_requires_identifier() {
        assert!(Cli::try_parse_from(["geodid", "parse"]).is_err());
    }
}
