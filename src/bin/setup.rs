use std::env;

use anyhow::{anyhow, Context, Result};
use compass::workspace::{workspace_root, AppConfig, Workspace};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse()?;
    let root = workspace_root()?;
    let mut workspace = Workspace::open_at(&root)?;
    // Only persist what was passed explicitly, never keys picked up from the environment.
    let mut config = compass::workspace::load_or_default(&workspace.config_path)?;
    let changed = apply_overrides(&mut config, &args);

    if changed {
        workspace.config = config;
        workspace.save_config()?;
        println!(
            "Compass settings recorded at {}",
            workspace.config_path.display()
        );
    } else {
        println!("Compass settings already configured.");
    }
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &CliArgs) -> bool {
    let mut changed = false;
    if let Some(key) = &args.anthropic_key {
        config.llm.api_key = Some(key.clone());
        changed = true;
    }
    if let Some(model) = &args.model {
        if &config.llm.model != model {
            config.llm.model = model.clone();
            changed = true;
        }
    }
    if let Some(key) = &args.maps_key {
        config.places.api_key = Some(key.clone());
        changed = true;
    }
    if let Some(limit) = args.feed_limit {
        if config.community.feed_limit != limit {
            config.community.feed_limit = limit;
            changed = true;
        }
    }
    changed
}

#[derive(Default)]
struct CliArgs {
    anthropic_key: Option<String>,
    model: Option<String>,
    maps_key: Option<String>,
    feed_limit: Option<u32>,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut parsed = CliArgs::default();
        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--anthropic-key" => {
                    parsed.anthropic_key = Some(
                        args.next()
                            .context("Expected an API key after --anthropic-key")?,
                    );
                }
                "--model" => {
                    parsed.model = Some(args.next().context("Expected a model id after --model")?);
                }
                "--maps-key" => {
                    parsed.maps_key =
                        Some(args.next().context("Expected an API key after --maps-key")?);
                }
                "--feed-limit" => {
                    let value = args
                        .next()
                        .context("Expected a number after --feed-limit")?;
                    parsed.feed_limit = Some(
                        value
                            .parse()
                            .with_context(|| format!("Invalid feed limit '{value}'"))?,
                    );
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument '{other}'. Use --help to list options."
                    ))
                }
            }
        }
        Ok(parsed)
    }
}

fn print_help() {
    println!("Compass setup");
    println!("Records API keys and limits in config.toml.");
    println!("Usage: cargo run --bin setup -- [options]");
    println!("Options:");
    println!("  --anthropic-key <key>   Language model API key");
    println!("  --model <id>            Language model id");
    println!("  --maps-key <key>        Geocoding/places API key");
    println!("  --feed-limit <n>        Posts returned by the community feed");
}
