//! Small demo CLI exercising the adapter end to end: compress a file,
//! decompress it back, or dump the current statistics snapshot.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "zblock-cli", about = "Block-level ZSTD adapter demo")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a file into a single framed block.
    Compress {
        input: PathBuf,
        output: PathBuf,
        /// level_enum: 1..=19, or a fast tag such as -1 or -500.
        #[arg(short, long, default_value_t = 3)]
        level: i32,
    },
    /// Decompress a single framed block back to its original bytes.
    Decompress {
        input: PathBuf,
        output: PathBuf,
        /// Upper bound on the decompressed size; must be at least as large
        /// as the original source.
        #[arg(long, default_value_t = 256 * 1024 * 1024)]
        max_output: usize,
    },
    /// Run one compress/decompress cycle on an in-memory buffer and print
    /// the resulting statistics snapshot.
    Stats {
        input: PathBuf,
        #[arg(short, long, default_value_t = 3)]
        level: i32,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Compress { input, output, level } => run_compress(&input, &output, level),
        Command::Decompress {
            input,
            output,
            max_output,
        } => run_decompress(&input, &output, max_output),
        Command::Stats { input, level } => run_stats(&input, level),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("zblock-cli: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run_compress(input: &PathBuf, output: &PathBuf, level: i32) -> Result<(), String> {
    let src = fs::read(input).map_err(|e| format!("reading {}: {e}", input.display()))?;
    let mut dst = vec![0u8; src.len() + 8];
    let adapter = zblock::global();
    let written = adapter
        .compress(&src, &mut dst, level)
        .map_err(|e| format!("compress: {e}"))?;
    if written == src.len() {
        return Err("compression declined: block would not shrink at this level".to_string());
    }
    fs::write(output, &dst[..written]).map_err(|e| format!("writing {}: {e}", output.display()))?;
    println!(
        "{} -> {} ({} -> {} bytes, level {level})",
        input.display(),
        output.display(),
        src.len(),
        written
    );
    Ok(())
}

fn run_decompress(input: &PathBuf, output: &PathBuf, max_output: usize) -> Result<(), String> {
    let src = fs::read(input).map_err(|e| format!("reading {}: {e}", input.display()))?;
    let mut dst = vec![0u8; max_output];
    let adapter = zblock::global();
    let level = adapter
        .decompress(&src, &mut dst)
        .map_err(|e| format!("decompress: {e}"))?;
    fs::write(output, &dst).map_err(|e| format!("writing {}: {e}", output.display()))?;
    println!("{} -> {} (level {level})", input.display(), output.display());
    Ok(())
}

fn run_stats(input: &PathBuf, level: i32) -> Result<(), String> {
    let src = fs::read(input).map_err(|e| format!("reading {}: {e}", input.display()))?;
    let mut dst = vec![0u8; src.len() + 8];
    let adapter = zblock::global();
    let written = adapter
        .compress(&src, &mut dst, level)
        .map_err(|e| format!("compress: {e}"))?;
    println!("wrote {written} bytes from {} source bytes", src.len());
    for (name, value) in adapter.stats() {
        println!("{name}: {value}");
    }
    Ok(())
}
