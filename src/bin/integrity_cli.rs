use anyhow::{bail, Context};
use integrity_ai_lib::models::{ParaphraseRequest, SentenceRequest, TextRequest, Tone, WordRequest};
use integrity_ai_lib::services::config_store::{AppConfig, ConfigStore};
use integrity_ai_lib::{init_logging, IntegrityService};
use serde::Serialize;
use tracing::{info, warn};

const USAGE: &str = "Usage:\n  integrity_cli <paraphrase|variants|synonyms|analyze|duplicates|health> [--tone <standard|fluent|formal>] [--file <path>] [--out <json_path>] [text...]\n\nNotes:\n  - Text comes from --file, or from the remaining arguments.\n  - Lexicon and scoring endpoints are read from the config file; INTEGRITY_* environment variables override it.";

const VALUE_FLAGS: &[&str] = &["--tone", "--file", "--out"];

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Arguments that are neither flags nor flag values, joined with spaces
fn positional_text(args: &[String]) -> String {
    let mut words = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        words.push(arg.as_str());
    }
    words.join(" ")
}

fn load_config() -> AppConfig {
    let loaded = match ConfigStore::default_config_dir() {
        Some(dir) => match ConfigStore::new(dir).load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Config unreadable, using defaults: {}", e);
                AppConfig::default()
            }
        },
        None => AppConfig::default(),
    };
    loaded.apply_env_overrides()
}

fn emit<T: Serialize>(value: &T, out_path: Option<&str>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out_path {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("write {} failed", path))?;
            info!("Wrote response to {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        return Ok(());
    }

    init_logging();

    let command = args[1].as_str();
    let rest = &args[2..];
    let tone = parse_arg_value(rest, "--tone")
        .map(|t| Tone::from_str(&t))
        .unwrap_or_default();
    let out_path = parse_arg_value(rest, "--out");
    let text = match parse_arg_value(rest, "--file") {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("read file {} failed", path))?,
        None => positional_text(rest),
    };

    let service = IntegrityService::from_config(load_config());
    let out = out_path.as_deref();

    match command {
        "paraphrase" => emit(
            &service.paraphrase(&ParaphraseRequest { content: text, tone }),
            out,
        ),
        "variants" => emit(
            &service.rewrite_sentence(&SentenceRequest { sentence: text, tone }),
            out,
        ),
        "synonyms" => emit(&service.synonyms(&WordRequest { word: text }), out),
        "analyze" => {
            let request = TextRequest {
                title: String::new(),
                content: text,
            };
            emit(&service.analyze(&request).await, out)
        }
        "duplicates" => {
            let request = TextRequest {
                title: String::new(),
                content: text,
            };
            emit(&service.duplicates(&request).await, out)
        }
        "health" => emit(&service.health(), out),
        other => {
            eprintln!("{}", USAGE);
            bail!("unknown command: {}", other)
        }
    }
}
