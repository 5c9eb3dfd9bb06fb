//! # labelweb CLI
//!
//! Command-line interface for the label service.
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP service
//! labelweb serve --config /appconfig/config.json
//!
//! # Render a label to PNG without a printer
//! labelweb render --text "Hello" --size 4x6in --out label.png
//!
//! # Show the size catalog for a printer
//! labelweb sizes --printer zebra
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use labelweb::{
    LabelError,
    config::{ConfigHandle, ConfigSource},
    engine::{LabelEngine, LabelRequest},
    logging,
    render::FontBook,
    server::{self, ServerConfig},
    sink::CupsSink,
};

/// labelweb - label designer and print service
#[derive(Parser, Debug)]
#[command(name = "labelweb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "/appconfig/config.json")]
    config: PathBuf,

    /// Configuration used when --config does not exist
    #[arg(long, global = true, default_value = "config.minimal.json")]
    fallback_config: PathBuf,

    /// Log level (overrides SERVER.LOGLEVEL)
    #[arg(long, global = true)]
    loglevel: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Port (overrides SERVER.PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Extra folder of .ttf/.otf fonts (overrides SERVER.ADDITIONAL_FONT_FOLDER)
        #[arg(long, value_name = "DIR")]
        font_folder: Option<PathBuf>,
    },

    /// Render a text label to a PNG file
    Render {
        /// Label text; use \n for line breaks
        #[arg(long)]
        text: String,

        /// Label size identifier (defaults to the configured default size)
        #[arg(long)]
        size: Option<String>,

        /// standard or rotated
        #[arg(long)]
        orientation: Option<String>,

        /// Starting font size in pixels
        #[arg(long)]
        font_size: Option<u32>,

        /// Output PNG
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },

    /// Print the size catalog for a printer
    Sizes {
        #[arg(long)]
        printer: Option<String>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build_engine(handle: ConfigHandle, font_folder: Option<&Path>) -> LabelEngine {
    let config = handle.snapshot();
    let mut fonts = FontBook::with_embedded();
    let folder = font_folder
        .map(Path::to_path_buf)
        .or_else(|| config.server.additional_font_folder.as_ref().map(PathBuf::from));
    if let Some(folder) = folder {
        let added = fonts.add_folder(&folder);
        log::info!("Loaded {} fonts from {}", added, folder.display());
    }
    let sink = CupsSink::new(config.printer.server.as_deref());
    LabelEngine::new(handle, Arc::new(sink), fonts)
}

fn run() -> Result<(), LabelError> {
    let cli = Cli::parse();

    let handle = ConfigHandle::from_source(ConfigSource {
        primary: cli.config.clone(),
        fallback: Some(cli.fallback_config.clone()),
    })?;
    let level = cli
        .loglevel
        .clone()
        .unwrap_or_else(|| handle.snapshot().server.loglevel.clone());
    logging::init_logging(&level);

    match cli.command {
        Commands::Serve { port, font_folder } => {
            let config = handle.snapshot();
            let engine = build_engine(handle, font_folder.as_deref());
            for warning in engine.validate() {
                log::warn!("{}", warning);
            }
            let listen_addr = format!(
                "{}:{}",
                config.server.host,
                port.unwrap_or(config.server.port)
            );
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(ServerConfig { listen_addr }, Arc::new(engine)))
        }
        Commands::Render {
            text,
            size,
            orientation,
            font_size,
            out,
        } => {
            let engine = build_engine(handle, None);
            let request = LabelRequest {
                text: Some(text.replace("\\n", "\n")),
                label_size: size,
                orientation,
                font_size,
                ..Default::default()
            };
            let ctx = engine.context(&request)?;
            let bitmap = engine.render_text(&ctx)?;
            bitmap.save_png(&out)?;
            println!(
                "Wrote {}x{} label '{}' to {}",
                bitmap.width(),
                bitmap.height(),
                ctx.size_id,
                out.display()
            );
            Ok(())
        }
        Commands::Sizes { printer } => {
            let engine = build_engine(handle, None);
            let catalog = engine.label_sizes(printer.as_deref());
            if catalog.is_empty() {
                println!("No label sizes available.");
            }
            for entry in catalog.iter() {
                println!("  {:<32} {}", entry.id, entry.label);
            }
            Ok(())
        }
    }
}
