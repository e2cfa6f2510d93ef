//! Ori CLI — the main entry point.
//!
//! Two modes:
//! - `ori <prompt words...>` — answer one request and exit
//! - `ori`                   — interactive session (help/exit/quit)
//!
//! `-y` skips directive confirmation, `--model` and `--max-turns` override
//! the config, `--init-config` writes a starter config file and exits.

use clap::Parser;
use ori_config::AppConfig;

mod session;
mod terminal;

#[derive(Parser)]
#[command(
    name = "ori",
    about = "Ori — a directive-driven terminal assistant",
    version,
    author
)]
struct Cli {
    /// Prompt to answer in one shot; interactive mode when omitted
    #[arg(trailing_var_arg = true)]
    prompt: Vec<String>,

    /// Execute directives without asking for confirmation
    #[arg(short = 'y', long = "yes")]
    yes: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Override the configured model
    #[arg(long)]
    model: Option<String>,

    /// Override the directive turn limit per request
    #[arg(long)]
    max_turns: Option<u32>,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.init_config {
        return init_config();
    }

    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if cli.yes {
        config.agent.auto_confirm = true;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(max_turns) = cli.max_turns {
        config.agent.max_directive_turns = max_turns;
    }

    // Check for an API key early and explain the lookup chain on failure.
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key found!");
        eprintln!();
        eprintln!("  Ori looks for a key in this order:");
        eprintln!("    1. api_key in {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!("    2. ORI_API_KEY or OPENROUTER_API_KEY environment variable");
        eprintln!("    3. ./{}", ori_config::KEY_FILE_NAME);
        eprintln!("    4. {}", AppConfig::config_dir().join(ori_config::KEY_FILE_NAME).display());
        eprintln!();
        eprintln!("  Get an OpenRouter key at: https://openrouter.ai/keys");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    if cli.prompt.is_empty() {
        session::interactive(&config).await
    } else {
        session::one_shot(&config, &cli.prompt.join(" ")).await
    }
}

fn init_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = AppConfig::ensure_config_dir()?;
    let path = dir.join("config.toml");
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    std::fs::write(&path, AppConfig::default_toml())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
