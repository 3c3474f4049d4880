//! Verify command implementation.

use crate::utils::{DelimiterArgs, PipelineArgs, print_stats};
use oxibwt_pipeline::Pipeline;
use std::path::Path;

/// Forward- and inverse-transform `input` in memory and compare.
pub fn cmd_verify(
    input: &Path,
    args: &PipelineArgs,
    delimiter: &DelimiterArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::new(delimiter.apply(args.config()))?;
    let data = std::fs::read(input)?;
    log::debug!("verifying {} bytes from {}", data.len(), input.display());

    println!("Verifying {}", input.display());
    let (stream, forward) = pipeline.forward_to_vec(&data)?;
    let (restored, inverse) = pipeline.inverse_to_vec(&stream)?;

    if verbose {
        print_stats("  Forward", &forward);
        print_stats("  Inverse", &inverse);
    }

    if restored != data {
        log::warn!("round trip of {} does not match its input", input.display());
        let first_diff = restored
            .iter()
            .zip(&data)
            .position(|(a, b)| a != b)
            .unwrap_or(restored.len().min(data.len()));
        return Err(format!(
            "round trip mismatch at byte {} ({} bytes in, {} bytes out)",
            first_diff,
            data.len(),
            restored.len()
        )
        .into());
    }

    println!("OK: {} bytes in {} blocks", data.len(), forward.blocks);
    Ok(())
}
