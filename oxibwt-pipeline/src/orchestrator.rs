//! Multi-threaded block pipeline.
//!
//! ```text
//! reader ──► BlockingQueue ──► worker × N ──► ReorderBuffer ──► writer
//! ```
//!
//! The reader runs on the calling thread and tags every chunk with its
//! index. Workers transform blocks in whatever order they finish; the
//! reorder buffer hands them to the single writer strictly in index order,
//! so the output is byte-identical to a sequential run for any worker count.
//!
//! Shutdown is sequenced: close the queue, join the workers, close the
//! reorder buffer, join the writer. Closing the reorder buffer any earlier
//! would hand in-flight blocks back to their workers instead of the writer.

use crate::block::Block;
use crate::queue::BlockingQueue;
use crate::reorder::ReorderBuffer;
use crate::stream::HEADER_LEN;
use oxibwt_core::config::{DelimiterStrategy, PipelineConfig};
use oxibwt_core::error::{OxiBwtError, Result};
use oxibwt_core::io::{self, ChunkReader, ChunkWriter};
use oxibwt_core::traits::{ChunkSink, ChunkSource};
use oxibwt_transform::{DelimiterSelector, SuffixArrayBuilder, forward_with, inverse};
use serde::Serialize;
use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::thread;

thread_local! {
    static SUFFIX_BUILDER: RefCell<SuffixArrayBuilder> = RefCell::new(SuffixArrayBuilder::new());
}

/// A transformed block, or the reason it could not be produced.
type Transformed = Result<Vec<u8>>;

/// Summary of a completed pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PipelineStats {
    /// Number of blocks processed.
    pub blocks: u64,
    /// Bytes consumed from the source, including any stream header.
    pub bytes_in: u64,
    /// Bytes handed to the sink, including any stream header.
    pub bytes_out: u64,
    /// Delimiter of the stream, when the run had one.
    pub delimiter: Option<u8>,
    /// Worker threads used.
    pub workers: usize,
}

/// Block pipeline driven by a [`PipelineConfig`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline after validating `config`.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Forward-transform every block of `source` into `sink`.
    ///
    /// `source` must yield chunks of `block_size` bytes. The sink receives the
    /// delimiter header followed by one transformed block per input block.
    pub fn forward<S, K>(&self, source: S, sink: K, delimiter: u8) -> Result<PipelineStats>
    where
        S: ChunkSource,
        K: ChunkSink + Send,
    {
        log::debug!("forward transform with delimiter {:#04x}", delimiter);
        self.run(source, sink, Some(delimiter), |block| {
            Ok(SUFFIX_BUILDER.with(|builder| {
                forward_with(&mut builder.borrow_mut(), &block.data, delimiter)
            }))
        })
    }

    /// Invert a transformed stream from `source` into `sink`.
    ///
    /// Reads the 1-byte header first. `source` must then yield chunks of
    /// `block_size + 1` bytes.
    pub fn inverse<S, K>(&self, mut source: S, sink: K) -> Result<PipelineStats>
    where
        S: ChunkSource,
        K: ChunkSink + Send,
    {
        let header = source.read_header(HEADER_LEN)?;
        if header.len() != HEADER_LEN {
            return Err(OxiBwtError::MissingHeader);
        }
        let delimiter = header[0];
        log::debug!("inverse transform with delimiter {:#04x}", delimiter);

        let mut stats = self.run(source, sink, None, |block| {
            inverse(&block.data, delimiter).map_err(|e| e.into_block_error(block.index))
        })?;
        stats.bytes_in += HEADER_LEN as u64;
        stats.delimiter = Some(delimiter);
        Ok(stats)
    }

    /// Forward-transform the file at `input` into `output`.
    ///
    /// With [`DelimiterStrategy::Scan`] the input is scanned before `output`
    /// is created, so a missing delimiter leaves no partial output behind.
    pub fn forward_file(&self, input: &Path, output: &Path) -> Result<PipelineStats> {
        let delimiter = self.resolve_delimiter(input)?;
        let (reader, writer) = io::open(input, output, self.config.block_size)?;
        self.forward(reader, writer, delimiter)
    }

    /// Pick the delimiter for the file at `input` according to the
    /// configured strategy. A fixed delimiter does not touch the file.
    pub fn resolve_delimiter(&self, input: &Path) -> Result<u8> {
        match self.config.delimiter {
            DelimiterStrategy::Fixed(delimiter) => Ok(delimiter),
            DelimiterStrategy::Scan => {
                let file = File::open(input).map_err(|e| OxiBwtError::open(input, e))?;
                DelimiterSelector::scan(BufReader::new(file))
            }
        }
    }

    /// Invert the transformed file at `input` into `output`.
    pub fn inverse_file(&self, input: &Path, output: &Path) -> Result<PipelineStats> {
        let (reader, writer) = io::open(input, output, self.config.transformed_block_size())?;
        self.inverse(reader, writer)
    }

    /// Forward-transform an in-memory input through the worker pool.
    pub fn forward_to_vec(&self, data: &[u8]) -> Result<(Vec<u8>, PipelineStats)> {
        let delimiter = oxibwt_transform::resolve_delimiter(self.config.delimiter, data)?;
        let blocks = data.len().div_ceil(self.config.block_size);
        let mut writer = ChunkWriter::new(Vec::with_capacity(HEADER_LEN + data.len() + blocks));
        let stats = self.forward(
            ChunkReader::new(data, self.config.block_size),
            &mut writer,
            delimiter,
        )?;
        Ok((writer.into_inner()?, stats))
    }

    /// Invert an in-memory transformed stream through the worker pool.
    pub fn inverse_to_vec(&self, stream: &[u8]) -> Result<(Vec<u8>, PipelineStats)> {
        let mut writer = ChunkWriter::new(Vec::with_capacity(stream.len()));
        let stats = self.inverse(
            ChunkReader::new(stream, self.config.transformed_block_size()),
            &mut writer,
        )?;
        Ok((writer.into_inner()?, stats))
    }

    /// Run `transform` over every block of `source`, writing results to
    /// `sink` in block order.
    ///
    /// When `header` is set it is written once before the first block. The
    /// first error (read, transform, or write) aborts the run and is
    /// returned; blocks already written stay written.
    pub fn run<S, K, F>(
        &self,
        mut source: S,
        mut sink: K,
        header: Option<u8>,
        transform: F,
    ) -> Result<PipelineStats>
    where
        S: ChunkSource,
        K: ChunkSink + Send,
        F: Fn(&Block) -> Result<Vec<u8>> + Sync,
    {
        let workers = self.config.worker_count;
        let queue: BlockingQueue<Block> = BlockingQueue::new();
        let reorder: ReorderBuffer<Transformed> = ReorderBuffer::new(self.config.reorder_capacity);
        log::debug!(
            "pipeline setup: {} workers, reorder capacity {}",
            workers,
            self.config.reorder_capacity
        );

        thread::scope(|scope| {
            let writer = {
                let (sink, reorder) = (&mut sink, &reorder);
                scope.spawn(move || write_loop(sink, reorder, header))
            };
            let handles: Vec<_> = (0..workers)
                .map(|id| {
                    let (queue, reorder, transform) = (&queue, &reorder, &transform);
                    scope.spawn(move || work_loop(id, queue, reorder, transform))
                })
                .collect();

            log::debug!("pipeline running");
            let read_result = read_loop(&mut source, &queue, &reorder);

            queue.close();
            log::debug!("pipeline draining");
            let mut worker_panicked = false;
            for handle in handles {
                worker_panicked |= handle.join().is_err();
            }

            reorder.close();
            log::debug!("pipeline closing");
            let write_result = writer
                .join()
                .unwrap_or_else(|_| Err(OxiBwtError::worker_panicked("writer")));

            let (blocks, bytes_in) = read_result?;
            if worker_panicked {
                return Err(OxiBwtError::worker_panicked("worker"));
            }
            let bytes_out = write_result?;
            log::debug!(
                "pipeline done: {} blocks, {} bytes in, {} bytes out",
                blocks,
                bytes_in,
                bytes_out
            );

            Ok(PipelineStats {
                blocks,
                bytes_in,
                bytes_out,
                delimiter: header,
                workers,
            })
        })
    }
}

/// Split `source` into indexed blocks until it is exhausted or the writer
/// has stopped.
fn read_loop<S: ChunkSource>(
    source: &mut S,
    queue: &BlockingQueue<Block>,
    reorder: &ReorderBuffer<Transformed>,
) -> Result<(u64, u64)> {
    let mut index = 0u64;
    let mut bytes = 0u64;
    while source.has_more() {
        if reorder.is_closed() {
            log::debug!("writer stopped, reader halting at block {}", index);
            break;
        }
        let chunk = source.read_chunk()?;
        if chunk.is_empty() {
            break;
        }
        bytes += chunk.len() as u64;
        log::trace!("read block {} ({} bytes)", index, chunk.len());
        queue.push(Block::new(index, chunk));
        index += 1;
    }
    Ok((index, bytes))
}

fn work_loop<F>(
    id: usize,
    queue: &BlockingQueue<Block>,
    reorder: &ReorderBuffer<Transformed>,
    transform: &F,
) -> u64
where
    F: Fn(&Block) -> Result<Vec<u8>>,
{
    let mut done = 0u64;
    while let Some(block) = queue.pop() {
        if reorder.is_closed() {
            break;
        }
        let index = block.index;
        let result = panic::catch_unwind(AssertUnwindSafe(|| transform(&block)))
            .unwrap_or_else(|_| Err(OxiBwtError::worker_panicked("worker")));
        log::trace!("worker {} finished block {}", id, index);

        if let Err(err) = reorder.put(index, result) {
            log::warn!("worker {} dropped block {}: {}", id, index, err);
            break;
        }
        done += 1;
    }
    log::trace!("worker {} exiting after {} blocks", id, done);
    done
}

/// Drain the reorder buffer into `sink`. On failure the reorder buffer is
/// closed so producers stop instead of waiting on a dead writer.
fn write_loop<K: ChunkSink>(
    sink: &mut K,
    reorder: &ReorderBuffer<Transformed>,
    header: Option<u8>,
) -> Result<u64> {
    let result = drain_into(sink, reorder, header);
    if let Err(err) = &result {
        log::debug!("writer failed: {}", err);
        reorder.close();
    }
    result
}

fn drain_into<K: ChunkSink>(
    sink: &mut K,
    reorder: &ReorderBuffer<Transformed>,
    header: Option<u8>,
) -> Result<u64> {
    let mut written = 0u64;
    if let Some(delimiter) = header {
        sink.write_chunk(&[delimiter])?;
        written += HEADER_LEN as u64;
    }
    while let Some(item) = reorder.get_next() {
        let chunk = item?;
        sink.write_chunk(&chunk)?;
        written += chunk.len() as u64;
    }
    sink.close()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxibwt_transform::forward;

    fn config(workers: usize) -> PipelineConfig {
        PipelineConfig::new(4).with_workers(workers)
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(Pipeline::new(PipelineConfig::new(0)).is_err());
        assert!(Pipeline::new(config(0)).is_err());
    }

    #[test]
    fn test_keeps_validated_config() {
        let pipeline = Pipeline::new(config(3)).unwrap();
        assert_eq!(pipeline.config(), &config(3));
        assert_eq!(pipeline.config().reorder_capacity, 6);
    }

    #[test]
    fn test_forward_banana_single_block() {
        let pipeline = Pipeline::new(
            PipelineConfig::new(16)
                .with_workers(2)
                .with_delimiter(DelimiterStrategy::Fixed(b'~')),
        )
        .unwrap();
        let (out, stats) = pipeline.forward_to_vec(b"banana").unwrap();
        assert_eq!(out, b"~bnn~aaa");
        assert_eq!(stats.blocks, 1);
        assert_eq!(stats.bytes_in, 6);
        assert_eq!(stats.bytes_out, 8);
        assert_eq!(stats.delimiter, Some(b'~'));
    }

    #[test]
    fn test_forward_concatenates_blocks_in_order() {
        let data = b"abcdefghijklmnopqrstuvwxyz";
        let pipeline = Pipeline::new(config(3)).unwrap();
        let (out, stats) = pipeline.forward_to_vec(data).unwrap();

        let mut expected = vec![0u8];
        for chunk in data.chunks(4) {
            expected.extend(forward(chunk, 0));
        }
        assert_eq!(out, expected);
        assert_eq!(stats.blocks, 7);
    }

    #[test]
    fn test_empty_input_writes_only_header() {
        let pipeline = Pipeline::new(config(2)).unwrap();
        let (out, stats) = pipeline.forward_to_vec(b"").unwrap();
        assert_eq!(out, vec![0u8]);
        assert_eq!(stats.blocks, 0);

        let (restored, _) = pipeline.inverse_to_vec(&out).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_inverse_requires_header() {
        let pipeline = Pipeline::new(config(2)).unwrap();
        assert!(matches!(
            pipeline.inverse_to_vec(b""),
            Err(OxiBwtError::MissingHeader)
        ));
    }

    #[test]
    fn test_inverse_reports_corrupted_block_index() {
        let pipeline = Pipeline::new(config(2)).unwrap();
        let (mut stream, _) = pipeline.forward_to_vec(b"hello world!").unwrap();
        // Block 1 spans stream[6..11]; clobber its terminator.
        let block = &mut stream[6..11];
        let pos = block.iter().position(|&b| b == 0).unwrap();
        block[pos] = b'z';

        match pipeline.inverse_to_vec(&stream) {
            Err(OxiBwtError::CorruptedBlock { block, .. }) => assert_eq!(block, 1),
            other => panic!("expected corrupted block, got {:?}", other),
        }
    }

    #[test]
    fn test_transform_panic_becomes_error() {
        let pipeline = Pipeline::new(config(2)).unwrap();
        let mut out = ChunkWriter::new(Vec::new());
        let result = pipeline.run(
            ChunkReader::new(&b"0123456789"[..], 2),
            &mut out,
            None,
            |block| {
                if block.index == 2 {
                    panic!("boom");
                }
                Ok(block.data.clone())
            },
        );
        assert!(matches!(
            result,
            Err(OxiBwtError::WorkerPanicked { role: "worker" })
        ));
    }
}
