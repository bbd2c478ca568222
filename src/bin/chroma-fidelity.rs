use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use chroma_fidelity::analysis::default_stability_constant;
use chroma_fidelity::{
    formats, output, spectral, ChromaConverter, FidelityReport, Reconstruction, SimilarityScorer,
};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chroma-fidelity", version, about = "4:2:0 chroma reconstruction and SSIM scoring")]
struct Args {
    /// Show progress information (overridden by RUST_LOG)
    #[arg(long, global = true, default_value_t = false)]
    log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Subsample and reconstruct an image, save it and print its fidelity
    Reconstruct {
        input: PathBuf,
        output: PathBuf,
        /// JPEG quality 1-100 when the output is a JPEG
        #[arg(long, default_value_t = 95)]
        quality: u8,
        /// Also write the subsampled and reconstructed chroma planes here
        #[arg(long)]
        planes: Option<PathBuf>,
    },
    /// SSIM between two images of the same size
    Compare {
        reference: PathBuf,
        compared: PathBuf,
        /// Compare as single grayscale planes instead of per channel
        #[arg(long, default_value_t = false)]
        gray: bool,
        #[arg(long, default_value_t = default_stability_constant())]
        c1: f64,
        #[arg(long, default_value_t = default_stability_constant())]
        c2: f64,
    },
    /// Reconstruct and score every image in a directory
    Batch {
        dir: PathBuf,
        /// Worker threads (default: all cores)
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Separate the spectra of two real sequences with one complex DFT
    Separate {
        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        first: Vec<f64>,
        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        second: Vec<f64>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.log { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Reconstruct { input, output, quality, planes } => {
            let converter = ChromaConverter::new().with_quality(quality);
            let report = converter
                .convert(&input, &output)
                .context("Reconstruction failed")?;
            println!("{}", output.display());
            if let Some(dir) = planes {
                let reconstruction = converter.process(&input)?;
                save_chroma_planes(&reconstruction, &dir)?;
            }
            print_report(&report);
        }
        Command::Compare { reference, compared, gray, c1, c2 } => {
            let scorer = SimilarityScorer::new().with_c1(c1).with_c2(c2);
            if gray {
                let score = scorer.score_gray_files(&reference, &compared)?;
                println!("SSIM: {:.6}", score);
            } else {
                let report = scorer.report_files(&reference, &compared)?;
                print_report(&report);
            }
        }
        Command::Batch { dir, threads } => {
            if let Some(threads) = threads {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build_global()
                    .context("rayon init failed")?;
            }
            run_batch(&dir)?;
        }
        Command::Separate { first, second } => {
            let spectra = spectral::separate_real_spectra(&first, &second)?;
            println!("{:>4} {:>24} {:>24}", "k", "F1[k]", "F2[k]");
            for (k, (a, b)) in spectra.first.iter().zip(&spectra.second).enumerate() {
                println!(
                    "{:>4} {:>11.6}{:+11.6}i {:>11.6}{:+11.6}i",
                    k, a.re, a.im, b.re, b.im
                );
            }
        }
    }

    Ok(())
}

fn save_chroma_planes(reconstruction: &Reconstruction, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    // Chroma is zero-centred; shift it to mid-gray for viewing.
    let planes = [
        ("cb_subsampled.png", reconstruction.cb_subsampled.samples()),
        ("cr_subsampled.png", reconstruction.cr_subsampled.samples()),
        ("cb_reconstructed.png", &reconstruction.reconstructed_ycbcr.cb),
        ("cr_reconstructed.png", &reconstruction.reconstructed_ycbcr.cr),
    ];
    for (name, plane) in planes {
        let path = dir.join(name);
        output::save_plane(plane, &path, 128.0)?;
        println!("{}", path.display());
    }
    Ok(())
}

fn print_report(report: &FidelityReport) {
    println!("SSIM R:    {:.6}", report.channel_ssim[0]);
    println!("SSIM G:    {:.6}", report.channel_ssim[1]);
    println!("SSIM B:    {:.6}", report.channel_ssim[2]);
    println!("SSIM mean: {:.6}", report.mean_ssim);
    println!("SSIM luma: {:.6}", report.luma_ssim);
}

fn run_batch(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| formats::is_supported(p))
        .collect();
    files.sort();

    // Each file is an independent, stateless run.
    let converter = ChromaConverter::new();
    let results: Vec<_> = files
        .par_iter()
        .map(|path| (path, converter.evaluate(path)))
        .collect();

    println!(
        "{:<32} {:>6} {:>6} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "FILE", "W", "H", "SSIM_R", "SSIM_G", "SSIM_B", "MEAN", "LUMA"
    );
    println!("{}", "-".repeat(97));

    let mut failures = 0;
    for (path, result) in results {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("?");
        match result {
            Ok(evaluation) => {
                let (height, width, _) = evaluation.original.dim();
                let r = &evaluation.report;
                println!(
                    "{:<32} {:>6} {:>6} {:>9.6} {:>9.6} {:>9.6} {:>9.6} {:>9.6}",
                    name,
                    width,
                    height,
                    r.channel_ssim[0],
                    r.channel_ssim[1],
                    r.channel_ssim[2],
                    r.mean_ssim,
                    r.luma_ssim,
                );
            }
            Err(e) => {
                failures += 1;
                println!("{:<32} ERROR: {:#}", name, e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} files failed", failures, files.len());
    }
    Ok(())
}
