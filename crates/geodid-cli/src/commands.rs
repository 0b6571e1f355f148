use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use geodid_sdk::{
    AstralClient, Asset, ClientConfig, DocumentInfo, GeoDid, GeoDidKind, InMemoryBackend, PinInfo,
};
use geodid_store::ContentHasher;
use serde_json::json;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Demo(args) => cmd_demo(args, config, cli.format).await,
        Command::Parse(args) => cmd_parse(args, cli.format),
        Command::Hash(args) => cmd_hash(args, cli.format),
        Command::Config => cmd_config(&config),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ClientConfig> {
    match path {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(ClientConfig::default()),
    }
}

async fn cmd_demo(
    args: DemoArgs,
    mut config: ClientConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if args.await_terminal {
        config.store = config.store.await_terminal();
    }
    let assets = args
        .assets
        .iter()
        .map(|path| read_asset(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let client = AstralClient::new(Arc::new(InMemoryBackend::new()), config);

    let collection = client.create_genesis_geodid(GeoDidKind::Collection).await?;
    let collection_pin = client.pin_document(&collection, None).await?;
    let token = collection_pin.credential.clone();
    client
        .load_document(&collection.geodid, Some(token.clone()))
        .await?;

    let item = client
        .create_child_geodid(GeoDidKind::Item, &collection.geodid, &args.item)
        .await?;
    let mut item_pin = client.pin_document(&item, Some(token.clone())).await?;
    let mut item_doc = client.load_document(&item.geodid, Some(token.clone())).await?.document;

    if !assets.is_empty() {
        let (updated, pin) = client
            .add_assets_and_pin(&item.geodid, assets, Some(token))
            .await?;
        item_doc = updated;
        item_pin = pin;
    }

    match format {
        OutputFormat::Json => {
            let out = json!({
                "collection": { "pin": collection_pin, "document": collection.document },
                "item": { "pin": item_pin, "document": item_doc.document },
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            print_pinned("Collection", &collection, &collection_pin);
            print_pinned("Item", &item_doc, &item_pin);
            for service in &item_doc.document.service {
                println!(
                    "    {} {} → {}",
                    "asset".cyan(),
                    service.id,
                    service.service_endpoint.short().yellow()
                );
            }
        }
    }
    Ok(())
}

fn print_pinned(label: &str, info: &DocumentInfo, pin: &PinInfo) {
    println!(
        "{} {} {}",
        "✓".green().bold(),
        label.bold(),
        info.geodid.to_string().cyan()
    );
    println!("  Type: {}", info.document.kind());
    println!("  CID: {}", pin.cid.to_string().yellow());
    println!("  Revision: {}", pin.revision);
    println!("  Pinned: {}", pin.pin_date.to_rfc3339().dimmed());
}

fn read_asset(path: &Path) -> anyhow::Result<Asset> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    let kind = match path.extension().and_then(|e| e.to_str()) {
        Some("json") | Some("geojson") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    };
    Ok(Asset::new(name, kind, data))
}

fn cmd_parse(args: ParseArgs, format: OutputFormat) -> anyhow::Result<()> {
    let geodid = GeoDid::parse(args.geodid)?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "id": geodid, "method": geodid.method(), "child": geodid.is_child() })
        ),
        OutputFormat::Text => {
            println!("{} {}", "✓".green().bold(), geodid.to_string().cyan());
            println!("  Method: {}", geodid.method().bold());
            println!("  Child: {}", if geodid.is_child() { "yes" } else { "no" });
        }
    }
    Ok(())
}

fn cmd_hash(args: HashArgs, format: OutputFormat) -> anyhow::Result<()> {
    let data = std::fs::read(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    let cid = ContentHasher::BLOB.hash(&data);
    match format {
        OutputFormat::Json => {
            let out = json!({ "path": args.path, "cid": cid, "size": data.len() });
            println!("{out}");
        }
        OutputFormat::Text => println!("{}  {}", cid.to_string().yellow(), args.path.display()),
    }
    Ok(())
}

fn cmd_config(config: &ClientConfig) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
