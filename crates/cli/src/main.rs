use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use struk_ocr::{DateOrder, DecimalConvention, StrukConfig};
use tracing_subscriber::EnvFilter;

mod commands;

/// Pull merchant, date and amount out of receipt photos and OCR text.
#[derive(Parser)]
#[command(name = "struk", author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "STRUK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured date order (DMY, MDY, YMD)
    #[arg(long, global = true)]
    date_order: Option<DateOrder>,

    /// Override the configured decimal convention (none, comma, dot)
    #[arg(long, global = true)]
    decimal: Option<DecimalConvention>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract receipt fields from OCR text (file or stdin)
    Extract(commands::ExtractArgs),

    /// Scan a receipt image and print the pre-filled transaction draft
    Scan(commands::ScanArgs),

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = StrukConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(order) = cli.date_order {
        config.extraction.date_order = order;
    }
    if let Some(convention) = cli.decimal {
        config.extraction.decimal_convention = convention;
    }

    match cli.command {
        Commands::Extract(args) => commands::extract(args, &config),
        Commands::Scan(args) => commands::scan(args, &config).await,
        Commands::Config => commands::show_config(&config),
    }
}
