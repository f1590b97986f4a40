//! genai-cli: resolve the generative endpoint, send a prompt, or extract a
//! record from saved model output.
//!
//! Usage:
//!   genai-cli resolve [--model <id>] [--config <file>]
//!   genai-cli generate [--json] [--temperature <t>] [--max-tokens <n>] <prompt...>
//!   genai-cli extract --shape <name> <file>

use anyhow::{bail, Context};
use clinic_genai::flows::{CodingSuggestions, Diagnosis, Invoice, NoteDraft, ReceptionReply, StructuredRecord};
use clinic_genai::structured::{self, Shape};
use clinic_genai::{GenAi, GenerationOptions, ResolverConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let outcome = match args[1].as_str() {
        "resolve" => cmd_resolve(&args[2..]).await,
        "generate" => cmd_generate(&args[2..]).await,
        "extract" => cmd_extract(&args[2..]),
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"genai-cli: generative endpoint resolver and structured extractor

USAGE:
    genai-cli <COMMAND> [OPTIONS]

COMMANDS:
    resolve [--model <id>] [--config <file>]
                                Resolve and print the generation endpoint
    generate [--json] [--temperature <t>] [--max-tokens <n>] <prompt...>
                                Send one prompt and print the reply
    extract --shape <name> <file>
                                Extract a record from saved model output
                                (shapes: coding, diagnosis, note, invoice, reception)
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    GOOGLE_API_KEY              Provider credential
    GENAI_MODEL                 Pinned model override
    GENAI_BASE_URL              Provider base URL
    RUST_LOG                    Log filter (e.g. clinic_genai=debug)"#
    );
}

fn cmd_version() {
    println!("genai-cli {} (clinic-genai {})", env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_VERSION"));
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Arguments that are neither flags nor flag values.
fn positional<'a>(args: &'a [String], valued_flags: &[&str]) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
            continue;
        }
        if valued_flags.contains(&arg.as_str()) {
            skip = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

fn load_config(args: &[String]) -> anyhow::Result<ResolverConfig> {
    match flag_value(args, "--config") {
        Some(path) => Ok(ResolverConfig::from_yaml_file(path)
            .with_context(|| format!("loading {path}"))?
            .with_env_overrides()),
        None => Ok(ResolverConfig::from_env()),
    }
}

async fn cmd_resolve(args: &[String]) -> anyhow::Result<()> {
    let mut builder = GenAi::builder().config(load_config(args)?);
    if let Some(model) = flag_value(args, "--model") {
        builder = builder.pinned_model(model);
    }
    let genai = builder.build()?;
    let endpoint = genai.endpoint().await?;
    println!("{endpoint}");
    Ok(())
}

async fn cmd_generate(args: &[String]) -> anyhow::Result<()> {
    let prompt = positional(args, &["--temperature", "--max-tokens", "--config"]).join(" ");
    if prompt.trim().is_empty() {
        bail!("generate needs a prompt");
    }

    let mut options = GenerationOptions::new();
    if args.iter().any(|a| a == "--json") {
        options = options.json();
    }
    if let Some(t) = flag_value(args, "--temperature") {
        options = options.with_temperature(t.parse().context("--temperature expects a number")?);
    }
    if let Some(n) = flag_value(args, "--max-tokens") {
        options = options.with_max_output_tokens(n.parse().context("--max-tokens expects an integer")?);
    }

    let genai = GenAi::builder().config(load_config(args)?).build()?;
    let model = genai.model(options).await?;
    eprintln!("using {}", model.endpoint());
    println!("{}", model.generate(prompt).await?);
    Ok(())
}

fn shape_named(name: &str) -> anyhow::Result<Shape> {
    Ok(match name {
        "coding" => CodingSuggestions::shape(),
        "diagnosis" => Diagnosis::shape(),
        "note" => NoteDraft::shape(),
        "invoice" => Invoice::shape(),
        "reception" => ReceptionReply::shape(),
        other => bail!("unknown shape: {other}"),
    })
}

fn cmd_extract(args: &[String]) -> anyhow::Result<()> {
    let shape_name = flag_value(args, "--shape").context("extract needs --shape <name>")?;
    let shape = shape_named(shape_name)?;
    let files = positional(args, &["--shape"]);
    let path = files.first().context("extract needs a file")?;
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;

    let record = structured::extract(&raw, &shape)?;
    println!("{}", serde_json::to_string_pretty(record.as_value())?);
    Ok(())
}
