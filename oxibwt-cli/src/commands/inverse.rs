//! Inverse command implementation.

use crate::utils::{
    PipelineArgs, ProgressSink, create_progress_bar, inverse_output_len, print_stats,
};
use oxibwt_core::io;
use oxibwt_pipeline::Pipeline;
use std::path::Path;

pub fn cmd_inverse(
    input: &Path,
    output: &Path,
    args: &PipelineArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.config();
    log::debug!("inverse {} -> {} with {:?}", input.display(), output.display(), config);
    let pipeline = Pipeline::new(config)?;
    let (reader, writer) = io::open(input, output, config.transformed_block_size())?;

    let input_len = std::fs::metadata(input)?.len();
    let pb = create_progress_bar(inverse_output_len(input_len, args.block_size), args.progress);
    let stats = pipeline.inverse(reader, ProgressSink::new(writer, pb))?;
    log::debug!("inverse finished: {:?}", stats);

    if verbose {
        print_stats("Inverse", &stats);
    }
    println!("Restored {} -> {}", input.display(), output.display());
    Ok(())
}
