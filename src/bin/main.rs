//! Creative Pack CLI
//!
//! Inspect, validate, merge and convert Minecraft resource packs.

use clap::{Parser, Subcommand};
use creative_pack::text::json;
use creative_pack::{
    load_resource_pack, write_zip, AssetCategory, FormatRangeTable, HexMode, LegacySerializer,
    OverlayResolver, PackValidator,
};
use creative_pack::validate::VANILLA_SNAPSHOT_LATEST;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "creative-pack")]
#[command(author, version, about = "Assemble and inspect Minecraft resource packs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a resource pack
    Info {
        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        pack: PathBuf,
    },

    /// Check pack.mcmeta, icon and language files against a game version
    Validate {
        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        pack: PathBuf,

        /// Game version to check against (e.g., "1.20.1")
        #[arg(short, long)]
        target: String,

        /// JSON table of accepted formats per version
        #[arg(short, long, required_unless_present = "vanilla", conflicts_with = "vanilla")]
        formats: Option<PathBuf>,

        /// Use the built-in snapshot of vanilla releases instead of --formats
        #[arg(long)]
        vanilla: bool,
    },

    /// Stack several packs and write the merged result as a ZIP
    Merge {
        /// Packs to merge, lowest precedence first
        #[arg(short, long, required = true)]
        pack: Vec<PathBuf>,

        /// Explicit priority per pack, in the same order as --pack
        #[arg(long, allow_negative_numbers = true)]
        priority: Vec<i32>,

        /// Output ZIP path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Convert between JSON text components and legacy text
    Legacy {
        /// JSON component to serialize
        #[arg(long, conflicts_with = "parse", required_unless_present = "parse")]
        json: Option<String>,

        /// Legacy text to parse into a JSON component
        #[arg(long)]
        parse: Option<String>,

        /// Use '&' instead of '§' as the format marker
        #[arg(long)]
        ampersand: bool,

        /// Emit hex colors as §x sequences instead of the nearest named color
        #[arg(long)]
        hex: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { pack } => show_pack_info(&pack),
        Commands::Validate {
            pack,
            target,
            formats,
            vanilla: _,
        } => validate_pack(&pack, &target, formats.as_ref()),
        Commands::Merge {
            pack,
            priority,
            output,
        } => merge_packs(&pack, &priority, &output),
        Commands::Legacy {
            json,
            parse,
            ampersand,
            hex,
        } => convert_legacy(json, parse, ampersand, hex),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

type CliResult = Result<ExitCode, Box<dyn std::error::Error>>;

fn show_pack_info(pack_path: &PathBuf) -> CliResult {
    println!("Loading resource pack from {:?}...", pack_path);
    let pack = load_resource_pack(pack_path)?;

    println!("\nResource Pack Info:");
    println!("  Name: {}", pack.name());
    match pack.meta() {
        Some(meta) => {
            println!("  Pack format: {}", meta.format);
            if let Some(range) = meta.supported_formats {
                println!("  Supported formats: {}..={}", range.min, range.max);
            }
            println!("  Description: {}", meta.description.plain_text());
        }
        None => println!("  No pack.mcmeta"),
    }
    println!("  Icon: {}", if pack.icon().is_some() { "yes" } else { "no" });
    for category in AssetCategory::ALL {
        println!("  {}: {}", category, pack.count(category));
    }
    println!("  Namespaces: {}", pack.namespaces().join(", "));

    Ok(ExitCode::SUCCESS)
}

fn validate_pack(pack_path: &PathBuf, target: &str, formats: Option<&PathBuf>) -> CliResult {
    let table = match formats {
        Some(path) => FormatRangeTable::from_path(path)?,
        None => {
            println!("Using built-in vanilla formats (releases up to {})", VANILLA_SNAPSHOT_LATEST);
            FormatRangeTable::vanilla()
        }
    };
    let pack = load_resource_pack(pack_path)?;

    let report = PackValidator::new(table).validate_source(&pack, target);
    print!("{}", report);

    Ok(if report.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn merge_packs(packs: &[PathBuf], priorities: &[i32], output: &PathBuf) -> CliResult {
    if !priorities.is_empty() && priorities.len() != packs.len() {
        return Err(format!(
            "got {} priorities for {} packs; give one per pack or none",
            priorities.len(),
            packs.len()
        )
        .into());
    }

    let resolver = OverlayResolver::new();
    for (i, path) in packs.iter().enumerate() {
        let pack = load_resource_pack(path)?;
        let priority = priorities.get(i).copied();
        println!("  Registering {} ({} assets)", pack.name(), pack.len());
        resolver.register(pack, priority)?;
    }

    let view = resolver.snapshot();
    let meta = resolver.primary_meta();
    let icon = resolver.primary_icon();
    let data = write_zip(&view, meta.as_ref(), icon.as_ref())?;
    fs::write(output, &data)?;

    println!(
        "Merged {} packs into {} assets ({} bytes) at {:?}",
        packs.len(),
        view.len(),
        data.len(),
        output
    );
    Ok(ExitCode::SUCCESS)
}

fn convert_legacy(json_input: Option<String>, parse: Option<String>, ampersand: bool, hex: bool) -> CliResult {
    let serializer = if ampersand {
        LegacySerializer::ampersand()
    } else {
        LegacySerializer::section()
    };
    let serializer = serializer.with_hex_mode(if hex { HexMode::Bungee } else { HexMode::Downsample });

    if let Some(input) = json_input {
        let component = json::from_json_str(&input)?;
        println!("{}", serializer.serialize(&component)?);
    } else if let Some(input) = parse {
        let component = serializer.deserialize(&input);
        println!("{}", json::to_json_string(&component));
    }
    Ok(ExitCode::SUCCESS)
}
