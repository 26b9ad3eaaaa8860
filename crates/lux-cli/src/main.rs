mod server;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lux_core::{LightMemory, encode, fits_word256, to_binary, to_hex, visualize_light_memory};
use lux_store::LuxConfig;
use lux_store::config::CONFIG_ENV;
use rmcp::{ServiceExt, transport::stdio};

#[derive(Parser)]
#[command(name = "lux", about = "Photonic text codec and memory MCP server")]
struct Cli {
    /// Config file (defaults to $LUX_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server on stdio transport
    Serve,

    /// Encode text and print its photonic sequence
    Encode {
        /// Text to encode
        text: String,

        /// Category hint for words no keyword matches
        #[arg(long)]
        category: Option<String>,

        /// Print the full sequence as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render text as a light memory card
    Visualize {
        /// Text to render
        text: String,

        #[arg(long, default_value = "general")]
        category: String,

        /// Emotional resonance label
        #[arg(long)]
        resonance: Option<String>,
    },

    /// Print the effective configuration
    Config,
}

fn config_path(cli: &Cli) -> Option<PathBuf> {
    cli.config
        .clone()
        .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
}

fn load_config(cli: &Cli) -> Result<LuxConfig> {
    let path = config_path(cli);
    LuxConfig::load(path.as_deref()).with_context(|| match &path {
        Some(p) => format!("failed to load config from {}", p.display()),
        None => "failed to load config".to_string(),
    })
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Serve => cmd_serve(&cli).await,
        Commands::Encode {
            text,
            category,
            json,
        } => cmd_encode(text, category.as_deref(), *json),
        Commands::Visualize {
            text,
            category,
            resonance,
        } => cmd_visualize(text, category, resonance.as_deref()),
        Commands::Config => cmd_config(&cli),
    }
}

async fn cmd_serve(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let store = config.build_store().context("failed to build memory store")?;
    tracing::info!(
        "starting MCP server, ledger {} (timeout {}ms)",
        store.ledger().describe(),
        store.ledger_timeout().as_millis()
    );

    let server = server::LuxServer::new(store, config.context.limit);
    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await?;
    Ok(())
}

fn cmd_encode(text: &str, category: Option<&str>, json: bool) -> Result<()> {
    let seq = encode(text, category);

    if json {
        let out = serde_json::json!({
            "binary": to_binary(&seq),
            "hex": to_hex(&seq),
            "fitsWord256": fits_word256(&seq),
            "sequence": seq,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let names: Vec<&str> = seq.symbols.iter().map(|s| s.name()).collect();
    println!("symbols:    {}", names.join(" "));
    println!("energy:     {}", seq.energy_level);
    println!("coherence:  {:.2}", seq.coherence);
    println!("meaning:    {}", seq.meaning);
    println!("binary:     {}", to_binary(&seq));
    println!("hex:        {}", to_hex(&seq));
    if !fits_word256(&seq) {
        println!("note:       code exceeds 256 bits");
    }
    Ok(())
}

fn cmd_visualize(text: &str, category: &str, resonance: Option<&str>) -> Result<()> {
    let memory = LightMemory::new(text, category, resonance, &mut rand::rng());
    print!("{}", visualize_light_memory(&memory));
    Ok(())
}

fn cmd_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let source = config_path(cli);
    match source.as_deref().filter(|p: &&Path| p.exists()) {
        Some(p) => println!("# loaded from {}", p.display()),
        None => println!("# defaults"),
    }
    print!("{}", config.to_toml_string()?);
    println!("# effective ledger timeout: {}ms", config.ledger_timeout().as_millis());
    Ok(())
}
