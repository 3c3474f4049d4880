//! OxiBWT CLI - block-parallel Burrows-Wheeler Transform
//!
//! Forward and inverse transform of whole files, with the transformed stream
//! laid out as a 1-byte delimiter header followed by one transformed block
//! per input block.

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use commands::{cmd_forward, cmd_info, cmd_inverse, cmd_verify};
use oxibwt_core::DEFAULT_BLOCK_SIZE;
use std::path::PathBuf;
use utils::{DelimiterArgs, PipelineArgs, init_logging};

#[derive(Parser)]
#[command(name = "oxibwt")]
#[command(
    author,
    version,
    about = "Block-parallel Burrows-Wheeler Transform"
)]
#[command(long_about = "
OxiBWT splits a file into fixed-size blocks, applies the Burrows-Wheeler
Transform to each block on a pool of worker threads, and writes the blocks
back in their original order.

The block size is not stored in the output; pass the same -b to inverse.

Examples:
  oxibwt forward book.txt book.bwt
  oxibwt forward -b 4096 -j 8 -P book.txt book.bwt
  oxibwt inverse -b 4096 book.bwt book.out
  oxibwt verify -d 0x7e book.txt
  oxibwt info --json book.bwt
")]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a file
    #[command(alias = "f")]
    Forward {
        /// Input file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,

        #[command(flatten)]
        delimiter: DelimiterArgs,
    },

    /// Restore a transformed file
    #[command(alias = "i")]
    Inverse {
        /// Transformed input file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Transform and restore a file in memory, checking the round trip
    #[command(alias = "t")]
    Verify {
        /// File to verify
        input: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,

        #[command(flatten)]
        delimiter: DelimiterArgs,
    },

    /// Show the layout of a transformed file
    Info {
        /// Transformed file to inspect
        file: PathBuf,

        /// Block size the file was written with
        #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
        block_size: usize,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Forward {
            input,
            output,
            pipeline,
            delimiter,
        } => cmd_forward(&input, &output, &pipeline, &delimiter, cli.verbose),
        Commands::Inverse {
            input,
            output,
            pipeline,
        } => cmd_inverse(&input, &output, &pipeline, cli.verbose),
        Commands::Verify {
            input,
            pipeline,
            delimiter,
        } => cmd_verify(&input, &pipeline, &delimiter, cli.verbose),
        Commands::Info {
            file,
            block_size,
            json,
        } => cmd_info(&file, block_size, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
