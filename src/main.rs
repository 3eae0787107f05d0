use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use log::LevelFilter;
use phishguard::components::{DecisionEngine, Verdict};
use phishguard::config::{Config, DEFAULT_CONFIG_PATH};
use phishguard::features::SchemaInfo;
use phishguard::LinearModel;
use std::path::Path;
use std::process;
use std::sync::Arc;

const SCORE_BAR_WIDTH: usize = 20;

#[tokio::main]
async fn main() {
    let matches = Command::new("phishguard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lexical URL phishing classifier")
        .long_about(
            "Scores URLs for phishing risk from their text alone:\n\
             • 35 lexical features (length, character mix, entropy, TLD, keywords)\n\
             • Rule engine that flags obvious red flags before any model runs\n\
             • Linear classifier artifact with a versioned feature schema\n\
             • Optional block/allow lists consulted first",
        )
        .arg(
            Arg::new("urls")
                .value_name("URL")
                .help("URLs to analyze")
                .num_args(0..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Read URLs from a file, one per line ('#' starts a comment)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value(DEFAULT_CONFIG_PATH),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Load configuration and model artifact, then exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("schema")
                .long("schema")
                .help("Print the feature schema as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print verdicts as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("show-features")
                .long("show-features")
                .help("Print the extracted feature vector for each URL")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logger based on verbose flag
    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    if matches.get_flag("schema") {
        match serde_json::to_string_pretty(&SchemaInfo::current()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing schema: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_PATH);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    let model = match LinearModel::load(&config.model.path) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("❌ Cannot analyze URLs: {e}");
            eprintln!(
                "   Train/provide the model artifact at '{}' (model.path in {}).",
                config.model.path, config_path
            );
            process::exit(1);
        }
    };

    if matches.get_flag("test-config") {
        let schema = SchemaInfo::current();
        println!("🔍 Testing configuration...");
        println!();
        println!("Model artifact: {}", config.model.path);
        println!(
            "Feature schema: v{} ({:08x}, {} features)",
            schema.version,
            schema.hash,
            schema.features.len()
        );
        println!(
            "Inference timeout: {} ms",
            config.model.inference_timeout_ms
        );
        println!(
            "Lookup lists: {} blocked, {} allowed",
            config.lookup.blocklist.len(),
            config.lookup.allowlist.len()
        );
        println!("✅ Configuration and model artifact validated");
        return;
    }

    let mut urls: Vec<String> = matches
        .get_many::<String>("urls")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    if let Some(file) = matches.get_one::<String>("file") {
        match read_url_file(file) {
            Ok(mut from_file) => urls.append(&mut from_file),
            Err(e) => {
                eprintln!("Error reading URL file: {e:#}");
                process::exit(1);
            }
        }
    }

    if urls.is_empty() {
        eprintln!("No URLs given. Pass URLs as arguments or use --file FILE.");
        process::exit(1);
    }

    let mut engine = DecisionEngine::new(Arc::new(model))
        .with_inference_timeout(config.model.inference_timeout());
    if let Some(lookup) = config.lookup.build() {
        log::info!("Loaded {} lookup entries", lookup.len());
        engine = engine.with_lookup(Box::new(lookup));
    }
    log::debug!(
        "Using {} classifier with {:?} inference timeout",
        engine.classifier_name(),
        engine.inference_timeout()
    );

    let json_output = matches.get_flag("json");
    let show_features = matches.get_flag("show-features");
    let mut verdicts = Vec::new();
    let mut failures = 0;

    for url in &urls {
        // Trimmed only to reject blank input; the extractor sees the raw text
        if url.trim().is_empty() {
            log::warn!("Skipping empty URL input");
            continue;
        }

        match engine.analyze_with_timeout(url).await {
            Ok(verdict) => {
                if !json_output {
                    print_verdict(&verdict, show_features);
                }
                verdicts.push(verdict);
            }
            Err(e) => {
                eprintln!("❌ {url}: {e}");
                failures += 1;
            }
        }
    }

    if json_output {
        match serde_json::to_string_pretty(&verdicts) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing verdicts: {e}");
                process::exit(1);
            }
        }
    }

    if failures > 0 {
        process::exit(1);
    }
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    if Path::new(path).exists() {
        Config::load(path).with_context(|| format!("failed to load {path}"))
    } else if path == DEFAULT_CONFIG_PATH {
        log::warn!("Configuration file '{path}' not found, using default configuration");
        Ok(Config::default())
    } else {
        anyhow::bail!("configuration file '{path}' not found")
    }
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Please edit the configuration file to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

fn read_url_file(path: &str) -> anyhow::Result<Vec<String>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read {path}"))?;
    Ok(content
        .lines()
        .filter(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(String::from)
        .collect())
}

fn score_bar(probability: f64) -> String {
    let filled = (probability.clamp(0.0, 1.0) * SCORE_BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(SCORE_BAR_WIDTH - filled)
    )
}

fn print_verdict(verdict: &Verdict, show_features: bool) {
    let headline = if verdict.is_phishing() {
        "🚨 PHISHING"
    } else {
        "✅ SAFE"
    };

    println!("🔗 {}", verdict.url);
    println!("   Verdict:  {}", headline);
    println!("   Category: {}", verdict.category);
    println!(
        "   Score:    {} {:.2}",
        score_bar(verdict.probability),
        verdict.probability
    );
    match &verdict.trigger {
        Some(trigger) => println!("   Reason:   {} ({})", verdict.reason, trigger),
        None => println!("   Reason:   {}", verdict.reason),
    }

    if show_features {
        println!("   Features:");
        for (name, value) in verdict.features.values() {
            println!("     {:<18} {}", name, value);
        }
    }
    println!();
}
