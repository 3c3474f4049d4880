//! Info command implementation.

use oxibwt_core::OxiBwtError;
use oxibwt_pipeline::StreamInfo;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

pub fn cmd_info(
    file: &Path,
    block_size: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let info = read_stream_info(file, block_size)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Stream Information");
    println!("==================");
    println!("File: {}", file.display());
    println!("Size: {} bytes", info.stream_len);
    println!("Delimiter: {:#04x}", info.delimiter);
    println!("Block size: {} bytes", info.block_size);
    println!("Blocks: {}", info.blocks);
    println!("Original size: {} bytes", info.original_len);
    Ok(())
}

/// Read the header of `file` and derive its layout for `block_size`.
fn read_stream_info(file: &Path, block_size: usize) -> Result<StreamInfo, OxiBwtError> {
    let mut reader = File::open(file).map_err(|e| OxiBwtError::open(file, e))?;
    let mut header = [0u8; 1];
    match reader.read_exact(&mut header) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            return Err(OxiBwtError::MissingHeader);
        }
        Err(e) => return Err(e.into()),
    }
    let stream_len = reader.metadata()?.len();
    log::debug!(
        "{}: header {:#04x}, {} bytes",
        file.display(),
        header[0],
        stream_len
    );
    StreamInfo::new(header[0], stream_len, block_size)
}
