use clap::{Parser, Subcommand};
use rust_barcode::render::{QrEncoder, code128, render_linear, render_matrix};
use rust_barcode::tools::{
    binary_stats, candidate_counts, grayscale_stats, load_grayscale, save_grayscale,
};
use rust_barcode::utils::binarization::adaptive_binarize;
use rust_barcode::{PixelBuffer, ScanConfig, ScanEngine, SymbologyType};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "barcodetool", version, about = "Code 128 and QR code scanner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode every symbol in an image
    Scan {
        #[arg(long)]
        image: PathBuf,
        /// Restrict the scan to these symbologies (repeatable)
        #[arg(long)]
        symbology: Vec<SymbologyType>,
        /// Binarizer window side in pixels
        #[arg(long)]
        window: Option<usize>,
    },
    /// Render a symbol to an image file
    Render {
        #[arg(long)]
        symbology: SymbologyType,
        #[arg(long)]
        data: String,
        #[arg(long)]
        out: PathBuf,
        /// Pixels per module
        #[arg(long, default_value_t = 4)]
        scale: usize,
    },
    /// Print binarization and candidate statistics for an image
    Debug {
        #[arg(long)]
        image: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Scan {
            image,
            symbology,
            window,
        } => scan_cmd(&image, symbology, window),
        Command::Render {
            symbology,
            data,
            out,
            scale,
        } => render_cmd(symbology, data.as_bytes(), &out, scale),
        Command::Debug { image } => debug_cmd(&image),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn load(image: &Path) -> Result<PixelBuffer<'static>, String> {
    load_grayscale(image).map_err(|err| format!("Failed to load image {}: {err}", image.display()))
}

fn scan_cmd(
    image: &Path,
    symbologies: Vec<SymbologyType>,
    window: Option<usize>,
) -> Result<(), String> {
    let mut config = ScanConfig::from_env();
    if !symbologies.is_empty() {
        config.symbologies = symbologies.into_iter().collect();
    }
    if let Some(window) = window {
        config.binarizer.window = window;
    }

    let pixels = load(image)?;
    let start = Instant::now();
    let results = ScanEngine::new(config).scan(&pixels);
    log::debug!(
        "scanned {}x{} in {:.2?}",
        pixels.width(),
        pixels.height(),
        start.elapsed()
    );

    for symbol in &results {
        println!("{}: {}", symbol.symbology, symbol.text());
    }
    Ok(())
}

fn render_cmd(symbology: SymbologyType, data: &[u8], out: &Path, scale: usize) -> Result<(), String> {
    if scale == 0 {
        return Err("--scale must be at least 1".to_string());
    }
    let image = match symbology {
        SymbologyType::Code128 => code128::encode(data)
            .and_then(|widths| render_linear(&widths, scale, 20 * scale, 10)),
        SymbologyType::QrCode => QrEncoder::default()
            .encode(data)
            .and_then(|grid| render_matrix(&grid, scale, 4)),
    }
    .map_err(|err| format!("Cannot render {symbology}: {err}"))?;

    save_grayscale(&image, out).map_err(|err| format!("Failed to write {}: {err}", out.display()))?;
    println!(
        "Wrote {} ({}x{})",
        out.display(),
        image.width(),
        image.height()
    );
    Ok(())
}

fn debug_cmd(image: &Path) -> Result<(), String> {
    let pixels = load(image)?;
    println!(
        "Image: {} ({}x{})",
        image.display(),
        pixels.width(),
        pixels.height()
    );

    let gray = grayscale_stats(pixels.samples());
    println!(
        "Grayscale range: {}-{}, average: {}",
        gray.min, gray.max, gray.avg
    );

    let config = ScanConfig::from_env();
    let binary = adaptive_binarize(&pixels, &config.binarizer);
    let stats = binary_stats(&binary);
    println!(
        "Binary: foreground={} total={} ratio={:.2}%",
        stats.black_pixels,
        stats.total_pixels,
        stats.black_ratio * 100.0
    );

    for (symbology, count) in candidate_counts(&binary) {
        println!("  {symbology}: {count} candidates");
    }
    let results = ScanEngine::new(config).scan(&pixels);
    println!("Decoded {} symbols", results.len());
    Ok(())
}
