//! resvar CLI
//!
//! Entry point for the `resvar` command-line tool.

use clap::{Parser, Subcommand};
use resvar::cache::CacheConfig;
use resvar::resolver::{ExplainDecision, ExplainReport};
use resvar::scan::{scan_for_id, scan_root};
use resvar::{FileProbe, Resolver, ResourceType, Settings, VariantIndex};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "resvar")]
#[command(about = "Device-variant resource resolution", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a resource id to its best-matching variant path
    Resolve {
        /// Resource root (overrides settings)
        #[arg(long, short = 'r')]
        root: Option<PathBuf>,

        /// Path to settings file (default: ./resvar.toml when present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Path to device profile file
        #[arg(long, short = 'd')]
        device: Option<PathBuf>,

        /// Output the full resolution record as JSON
        #[arg(long)]
        json: bool,

        /// Also write the resolution record to this file
        #[arg(long)]
        artifact: Option<PathBuf>,

        /// Resource type (image, layout, sound, bin)
        resource_type: String,

        /// Resource id (file name relative to a variant folder)
        id: String,
    },

    /// Explain a resolution decision without touching the cache
    Explain {
        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,

        /// Resource root (overrides settings)
        #[arg(long, short = 'r')]
        root: Option<PathBuf>,

        /// Path to settings file (default: ./resvar.toml when present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Path to device profile file
        #[arg(long, short = 'd')]
        device: Option<PathBuf>,

        /// Resource type (image, layout, sound, bin)
        resource_type: String,

        /// Resource id
        id: String,
    },

    /// List descriptor groups
    Groups {
        /// Resource root (overrides settings)
        #[arg(long, short = 'r')]
        root: Option<PathBuf>,

        /// Path to settings file (default: ./resvar.toml when present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Report which variant files exist under the resource root
    Scan {
        /// Resource root (overrides settings)
        #[arg(long, short = 'r')]
        root: Option<PathBuf>,

        /// Path to settings file (default: ./resvar.toml when present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Restrict the scan to one resource id
        #[arg(long)]
        id: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            root,
            config,
            device,
            json,
            artifact,
            resource_type,
            id,
        } => run_resolve(root, config, device, json, artifact, &resource_type, &id),
        Commands::Explain {
            human,
            root,
            config,
            device,
            resource_type,
            id,
        } => run_explain(human, root, config, device, &resource_type, &id),
        Commands::Groups { root, config, json } => run_groups(root, config, json),
        Commands::Scan {
            root,
            config,
            id,
            json,
        } => run_scan(root, config, id, json),
    }
}

fn run_resolve(
    root: Option<PathBuf>,
    config: Option<PathBuf>,
    device: Option<PathBuf>,
    json: bool,
    artifact: Option<PathBuf>,
    resource_type: &str,
    id: &str,
) {
    let resource_type = parse_resource_type(resource_type);
    let settings = load_settings(config, root);
    let resolver = build_resolver(&settings, device);

    let record = match resolver.resolve_with_artifact(resource_type, id) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("Resolution failed: {}", e);
            process::exit(1);
        }
    };

    if let Some(ref path) = artifact {
        if let Err(e) = record.write_to_file(path) {
            eprintln!("Error writing artifact: {}", e);
            process::exit(1);
        }
    }

    if json {
        match record.to_json() {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", record.resolved_path.display());
    }
}

fn run_explain(
    human: bool,
    root: Option<PathBuf>,
    config: Option<PathBuf>,
    device: Option<PathBuf>,
    resource_type: &str,
    id: &str,
) {
    let resource_type = parse_resource_type(resource_type);
    let settings = load_settings(config, root);
    let resolver = build_resolver(&settings, device);

    let report = match resolver.explain(resource_type, id) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Explain failed: {}", e);
            process::exit(1);
        }
    };

    if human {
        print_report(&report);
    } else {
        match report.to_json() {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    }
}

fn run_groups(root: Option<PathBuf>, config: Option<PathBuf>, json: bool) {
    let settings = load_settings(config, root);
    let index = load_index(&settings);

    if json {
        match serde_json::to_string_pretty(index.groups()) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if index.is_empty() {
        println!("No groups in descriptor.");
        return;
    }

    for group in index.groups() {
        println!(
            "{}: {} node(s), default folder '{}'",
            group.resource_type,
            group.nodes.len(),
            group.default_folder
        );
        for node in &group.nodes {
            let kinds: Vec<&str> = node.attributes.kinds().iter().map(|k| k.as_str()).collect();
            if kinds.is_empty() {
                println!("  {} (unconditional)", node.folder);
            } else {
                println!("  {} ({})", node.folder, kinds.join(", "));
            }
        }
    }
}

fn run_scan(root: Option<PathBuf>, config: Option<PathBuf>, id: Option<String>, json: bool) {
    let settings = load_settings(config, root);
    let index = load_index(&settings);

    if let Some(ref id) = id {
        let report = match scan_for_id(&index, &settings.resource_root, id) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("Scan failed: {}", e);
                process::exit(1);
            }
        };

        if json {
            print_json(&report);
            return;
        }

        for group in &report {
            println!("{}:", group.resource_type);
            for variant in &group.variants {
                let marker = if variant.present { "present" } else { "absent" };
                println!("  {:<24} {}", variant.folder, marker);
            }
            let marker = if group.default_present { "present" } else { "absent" };
            println!("  {:<24} {} (default)", group.default_folder, marker);
        }
        return;
    }

    let report = match scan_root(&index, &settings.resource_root) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Scan failed: {}", e);
            process::exit(1);
        }
    };

    if json {
        print_json(&report);
        return;
    }

    for group in &report {
        println!("{}:", group.resource_type);
        for folder in &group.folders {
            println!("  {} ({} file(s))", folder.folder, folder.files.len());
            for file in &folder.files {
                println!("    {}", file);
            }
        }
    }
}

fn parse_resource_type(s: &str) -> ResourceType {
    match ResourceType::from_str(s) {
        Some(ty) => ty,
        None => {
            eprintln!(
                "Unknown resource type '{}' (expected image, layout, sound, bin)",
                s
            );
            process::exit(1);
        }
    }
}

fn load_settings(config: Option<PathBuf>, root_override: Option<PathBuf>) -> Settings {
    let mut settings = match config {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Error loading settings: {}", e);
                process::exit(1);
            }
        },
        None => {
            let default_path = PathBuf::from("resvar.toml");
            if default_path.exists() {
                match Settings::load(&default_path) {
                    Ok(settings) => settings,
                    Err(e) => {
                        eprintln!("Error loading settings: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                Settings::default()
            }
        }
    };

    if let Some(root) = root_override {
        settings.resource_root = root;
    }
    settings
}

fn load_index(settings: &Settings) -> VariantIndex {
    match VariantIndex::load(&settings.descriptor_path()) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Error loading descriptor: {}", e);
            process::exit(1);
        }
    }
}

fn build_resolver(settings: &Settings, device: Option<PathBuf>) -> Resolver {
    let index = load_index(settings);

    let profile_path = device.unwrap_or_else(|| settings.device_profile_path());
    let probe = Box::new(FileProbe::new(profile_path));

    let cache = CacheConfig {
        threshold: settings.cache_threshold,
    };

    match Resolver::with_cache_config(index, settings.resource_root.clone(), probe, cache) {
        Ok(resolver) => resolver,
        Err(e) => {
            eprintln!("Error probing device: {}", e);
            process::exit(1);
        }
    }
}

fn print_report(report: &ExplainReport) {
    println!(
        "type: {}  id: {}",
        report.resource_type, report.resource_id
    );
    println!(
        "device: dpi={} width={} large={} bpp={} version={} language={}",
        report.device.screen_dpi,
        report.device.screen_width,
        report.device.screen_large,
        report.device.screen_bpp,
        report.device.platform_version,
        report.device.language
    );

    println!("nodes:");
    for (i, node) in report.nodes.iter().enumerate() {
        let verdict = if !node.file_exists {
            "file absent".to_string()
        } else if let Some(failed) = node.failed_condition {
            format!("failed {}", failed)
        } else {
            format!("matched, score {}", node.score)
        };
        println!("  {}. {:<24} {}", i + 1, node.folder, verdict);
    }

    match &report.decision {
        ExplainDecision::Selected {
            folder,
            path,
            score,
        } => println!(
            "decision: selected '{}' (score {}) -> {}",
            folder,
            score,
            path.display()
        ),
        ExplainDecision::Fallback { folder, path } => println!(
            "decision: fallback to default '{}' -> {}",
            folder,
            path.display()
        ),
        ExplainDecision::NoMatch => println!("decision: no match"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
