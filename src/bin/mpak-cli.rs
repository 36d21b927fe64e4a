//! mpak-cli - Command-line interface for daoc-assets
//!
//! A command-line tool for listing, verifying and extracting MPAK archives
//! and for inspecting PCX images.

use clap::{Parser, Subcommand};
use daoc_assets::{open_archive, Archive, PcxDecoder, PixelFormat};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mpak-cli")]
#[command(about = "A CLI tool for MPAK archives and PCX images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the entries of an archive
    List {
        /// Archive to list
        archive: PathBuf,

        /// Show entry sizes
        #[arg(short, long)]
        long: bool,
    },

    /// Extract archive entries into a directory
    Extract {
        /// Archive to extract
        archive: PathBuf,

        /// Output directory
        output: PathBuf,

        /// Only extract entries whose name contains this text (repeatable)
        #[arg(short, long)]
        filter: Vec<String>,

        /// Force overwrite of existing files
        #[arg(long)]
        force: bool,
    },

    /// Check that archives decode with valid checksums
    Verify {
        /// Archives to verify
        #[arg(required = true)]
        archives: Vec<PathBuf>,
    },

    /// Show information about a PCX image
    PcxInfo {
        /// PCX file, or an archive when --entry is given
        input: PathBuf,

        /// Read the image from this archive entry
        #[arg(short, long)]
        entry: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::List { archive, long } => list_archive(&archive, long),
        Commands::Extract {
            archive,
            output,
            filter,
            force,
        } => extract_archive(&archive, &output, &filter, force, cli.quiet).map(|_| ()),
        Commands::Verify { archives } => verify_archives(&archives, cli.quiet),
        Commands::PcxInfo { input, entry } => show_pcx_info(&input, entry.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn list_archive(path: &Path, long: bool) -> Result<(), Box<dyn std::error::Error>> {
    let archive = open_archive(path)?;

    let mut entries: Vec<_> = archive.iter().collect();
    entries.sort_by(|a, b| a.name().cmp(b.name()));

    println!("Archive: {} ({} entries)", archive.name(), archive.len());
    for entry in entries {
        if long {
            println!("{:>10}  {}", entry.len(), entry.name());
        } else {
            println!("{}", entry.name());
        }
    }

    Ok(())
}

fn extract_archive(
    path: &Path,
    output: &Path,
    filters: &[String],
    force: bool,
    quiet: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let archive = open_archive(path)?;

    let selected: Vec<_> = archive
        .iter()
        .filter(|entry| {
            filters.is_empty() || filters.iter().any(|f| entry.name().contains(f.as_str()))
        })
        .collect();

    fs::create_dir_all(output)?;

    // Show progress bar for large archives
    let progress = if !quiet && selected.len() > 64 {
        let pb = ProgressBar::new(selected.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        pb.set_message("Extracting...");
        Some(pb)
    } else {
        None
    };

    // Resolve and check every target before writing anything
    let mut targets = Vec::with_capacity(selected.len());
    for entry in &selected {
        let target = safe_output_path(output, entry.name())
            .ok_or_else(|| format!("Refusing to extract unsafe entry name '{}'", entry.name()))?;

        if target.exists() && !force {
            return Err(format!(
                "Output file '{}' already exists. Use --force to overwrite",
                target.display()
            )
            .into());
        }
        targets.push((target, *entry));
    }

    let mut written = 0usize;
    let mut total_bytes = 0usize;
    for (target, entry) in &targets {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(target, entry.data())?;
        written += 1;
        total_bytes += entry.len();

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(ref pb) = progress {
        pb.finish_with_message("Extraction complete");
    }

    if !quiet {
        println!("✓ Extracted {} of {} entries", written, archive.len());
        println!("  Archive: {}", archive.name());
        println!("  Bytes:   {}", total_bytes);
        println!("  Time:    {:.2?}", start_time.elapsed());
    }

    Ok(written)
}

fn verify_archives(paths: &[PathBuf], quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut failures = 0usize;

    for path in paths {
        match Archive::open(path) {
            Ok(archive) => {
                if !quiet {
                    println!(
                        "✓ {}: '{}', {} entries",
                        path.display(),
                        archive.name(),
                        archive.len()
                    );
                }
            }
            Err(e) => {
                failures += 1;
                println!("✗ {}: {}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} archives failed verification", failures, paths.len()).into());
    }
    Ok(())
}

fn show_pcx_info(input: &Path, entry: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let decoder = match entry {
        Some(name) => {
            let archive = open_archive(input)?;
            let data = archive
                .get(name)
                .ok_or_else(|| format!("Entry '{}' not found in {}", name, input.display()))?;
            PcxDecoder::from_bytes(data)?
        }
        None => PcxDecoder::open(input)?,
    };

    let header = decoder.header();
    let image = decoder.image();
    let format = match image.pixel_format() {
        PixelFormat::Indexed8 => "8-bit indexed",
        PixelFormat::Rgb24 => "24-bit RGB",
    };

    println!("PCX Image Information:");
    match entry {
        Some(name) => println!("  Source: {} :: {}", input.display(), name),
        None => println!("  Source: {}", input.display()),
    }
    println!("  Size: {}x{}", image.width(), image.height());
    println!("  Format: {} ({} color planes)", format, header.color_planes);
    println!("  Version: {}", header.version);
    println!("  Encoding: {}", if header.is_rle() { "RLE" } else { "none" });
    println!("  Bytes per line: {}", header.bytes_per_line);
    println!("  Resolution: {}x{} dpi", header.hres, header.vres);

    if let Some(color) = image.pixel(0, 0) {
        println!("  Pixel (0,0): ({}, {}, {})", color.r, color.g, color.b);
    }

    Ok(())
}

/// Join an entry name under `root`, rejecting names that escape it
fn safe_output_path(root: &Path, name: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    let mut any = false;
    for part in name.split(['/', '\\']) {
        match part {
            "" | "." => continue,
            ".." => return None,
            part if part.contains(':') => return None,
            part => {
                path.push(part);
                any = true;
            }
        }
    }
    any.then_some(path)
}
