//! Forward command implementation.

use crate::utils::{
    DelimiterArgs, PipelineArgs, ProgressSink, create_progress_bar, forward_output_len,
    print_stats,
};
use oxibwt_core::io;
use oxibwt_pipeline::Pipeline;
use std::path::Path;

pub fn cmd_forward(
    input: &Path,
    output: &Path,
    args: &PipelineArgs,
    delimiter: &DelimiterArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = delimiter.apply(args.config());
    log::debug!("forward {} -> {} with {:?}", input.display(), output.display(), config);
    let pipeline = Pipeline::new(config)?;

    // Resolve before opening so a failed scan never creates the output.
    let delimiter = pipeline.resolve_delimiter(input)?;
    let (reader, writer) = io::open(input, output, args.block_size)?;

    let input_len = std::fs::metadata(input)?.len();
    let pb = create_progress_bar(forward_output_len(input_len, args.block_size), args.progress);
    let stats = pipeline.forward(reader, ProgressSink::new(writer, pb), delimiter)?;
    log::debug!("forward finished: {:?}", stats);

    if verbose {
        print_stats("Forward", &stats);
    }
    println!("Transformed {} -> {}", input.display(), output.display());
    Ok(())
}
