use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adcraft::assets::AssetLoader;
use adcraft::models::AppConfig;
use adcraft::server;
use adcraft::services::{decode_image, sniff_image, GenerationOutcome};

#[derive(Parser)]
#[command(name = "adcraft")]
#[command(about = "AdCraft - autonomous poster composition for product launches")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Compose a poster directly to a PNG file
    Render {
        /// Hero product image (PNG, JPEG or WebP)
        #[arg(short, long)]
        image: PathBuf,

        /// Product name
        #[arg(short, long)]
        name: String,

        /// Product description
        #[arg(short, long)]
        description: String,

        /// Output PNG file path (defaults to the product slug)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fixed seed for the generated copy
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Print the dominant colors of an image
    Palette {
        /// Image to analyse
        image: PathBuf,

        /// Number of colors
        #[arg(short, long, default_value_t = 5)]
        count: usize,
    },
    /// Write the embedded config.yaml to disk for customization
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            image,
            name,
            description,
            output,
            seed,
        }) => run_render_command(&image, name, description, output, seed).await,
        Some(Commands::Palette { image, count }) => run_palette_command(&image, count),
        Some(Commands::Init { force }) => run_init_command(force),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for one-shot commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adcraft=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn seed_assets(loader: &AssetLoader) {
    match loader.seed_if_configured() {
        Ok(report) if !report.is_empty() => {
            tracing::info!(
                fonts = report.fonts_seeded.len(),
                config = report.config_seeded,
                "Seeded configured asset paths"
            );
        }
        Err(e) => {
            tracing::warn!(%e, "Failed to seed assets");
        }
        _ => {}
    }
}

/// Run the full pipeline once and write the poster (no server needed)
async fn run_render_command(
    image: &Path,
    name: String,
    description: String,
    output: Option<PathBuf>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    init_cli_tracing();

    let asset_loader = Arc::new(AssetLoader::from_env());
    seed_assets(&asset_loader);
    let state = server::create_app_state(asset_loader)?;
    let studio = state.studio;

    let bytes = std::fs::read(image)?;
    studio.upload_image(bytes, None).await?;
    studio.set_brief(name, description).await?;

    if let GenerationOutcome::Superseded = studio.generate(seed).await? {
        anyhow::bail!("generation was superseded");
    }

    let download = studio
        .download()
        .await
        .ok_or_else(|| anyhow::anyhow!("no poster was rendered"))?;
    let output = output.unwrap_or_else(|| PathBuf::from(&download.file_name));
    std::fs::write(&output, &download.png)?;

    let snapshot = studio.snapshot().await;
    println!("Rendered {} ({} bytes)", output.display(), download.png.len());
    println!("  Tagline: {}", snapshot.tagline);
    println!("  CTA:     {}", snapshot.call_to_action);
    println!("  Palette: {}", snapshot.resolved_palette.join(" "));
    for insight in &snapshot.insights {
        println!("  - {}: {}", insight.title, insight.detail);
    }

    Ok(())
}

/// Print the extracted palette, most dominant first
fn run_palette_command(image: &Path, count: usize) -> anyhow::Result<()> {
    init_cli_tracing();

    let loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&loader);

    let bytes = std::fs::read(image)?;
    let format = sniff_image(&bytes, None)?;
    let decoded = decode_image(&bytes, format)?;

    for color in config.extractor().extract(&decoded, count) {
        println!("{}", color.to_hex_upper());
    }

    Ok(())
}

/// Extract the embedded config to the filesystem
fn run_init_command(force: bool) -> anyhow::Result<()> {
    let loader = AssetLoader::from_env();
    let report = loader.init(force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let fonts_dir = std::env::var("FONTS_DIR").ok();

    println!("AdCraft v{VERSION}");
    println!("Autonomous poster composition for product launches\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  FONTS_DIR   = {}",
        fonts_dir.as_deref().unwrap_or("(not set)")
    );

    println!("\nAsset Sources:");

    let loader = AssetLoader::new(
        fonts_dir.clone().map(PathBuf::from),
        config_file.clone().map(PathBuf::from),
    );

    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:  {config_source}");

    let fonts_count = loader.get_fonts().len();
    match fonts_dir {
        Some(ref path) if Path::new(path).exists() => {
            println!("  Fonts:   {path} + embedded ({fonts_count} files) + system fonts");
        }
        _ => println!("  Fonts:   embedded ({fonts_count} files) + system fonts"),
    }

    println!("\nCommands:");
    println!("  adcraft serve    Start the HTTP server");
    println!("  adcraft render   Compose a poster to a PNG file");
    println!("  adcraft palette  Print the dominant colors of an image");
    println!("  adcraft init     Extract the embedded config.yaml");
    println!("\nRun 'adcraft --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adcraft=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let asset_loader = Arc::new(AssetLoader::from_env());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    tracing::info!(
        fonts = ?asset_loader.fonts_dir().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        config = ?asset_loader.config_file().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        "Asset sources configured"
    );

    seed_assets(&asset_loader);

    let state = server::create_app_state(asset_loader)?;
    tracing::info!(
        width = state.config.canvas.width,
        height = state.config.canvas.height,
        "Poster canvas configured"
    );
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "AdCraft server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
