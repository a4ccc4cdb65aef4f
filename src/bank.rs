//! Batch generation of puzzle banks: many puzzles of one block size, of which
//! only sufficiently sparse or sufficiently difficult ones are kept. Kept
//! puzzles are written to the bank as soon as they are found.

use crate::error::{BankError, BankResult};
use crate::generator::{Generator, ReducerConfig};

use log::{debug, info};

use rand::Rng;

use serde::{Deserialize, Serialize};

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const MAX_FILE_NAME_ATTEMPTS: usize = 100;

/// Configuration of [generate_bank].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct BankConfig {

    /// The block size of the generated puzzles.
    pub block_size: usize,

    /// How many puzzles are generated. Fewer may be kept.
    pub count: usize,

    /// The configuration used to reduce every single puzzle. Its
    /// `min_missing` decides which puzzles are sparse enough to be kept.
    pub reducer: ReducerConfig,

    /// Puzzles that are not sparse enough are still kept if their
    /// [difficulty](crate::record::PuzzleRecord::difficulty) exceeds this
    /// value.
    pub passing_difficulty: usize
}

impl Default for BankConfig {
    fn default() -> BankConfig {
        BankConfig {
            block_size: 3,
            count: 100,
            reducer: ReducerConfig {
                target_missing: 61.0 / 81.0,
                min_missing: 0.0,
                time_budget: Duration::from_secs(10),
                batch_attempts: 5,
                finish_local_minimum: true
            },
            passing_difficulty: 100
        }
    }
}

/// Generates `config.count` puzzles and writes the record of every kept one
/// to `sink` right away, followed by a line break. A puzzle is kept if its
/// proportion of empty cells is at least `config.reducer.min_missing` or its
/// difficulty exceeds `config.passing_difficulty`. Returns the number of kept
/// puzzles.
///
/// # Errors
///
/// * `BankError::Generation` If [Generator::generate_puzzle] fails.
/// * `BankError::Io` If writing to `sink` fails.
///
/// In both cases all records kept before the error have been written.
pub fn generate_bank<R: Rng, W: Write>(generator: &mut Generator<R>,
        config: &BankConfig, sink: &mut W) -> BankResult<usize> {
    let start = Instant::now();
    let mut kept = 0;

    for number in 0..config.count {
        let puzzle =
            generator.generate_puzzle(config.block_size, &config.reducer)?;
        let record = puzzle.record;
        let difficulty = record.difficulty();

        if puzzle.outcome.meets_minimum ||
                difficulty > config.passing_difficulty {
            sink.write_all(format!("{}\n", record).as_bytes())?;
            sink.flush()?;
            kept += 1;
            info!(target: "bank",
                "puzzle {} with {} clues generated after {:?}, difficulty {}",
                number, record.clue_count(), start.elapsed(), difficulty);
        }
        else {
            debug!(target: "bank",
                "puzzle {} with {} clues and difficulty {} discarded",
                number, record.clue_count(), difficulty);
        }
    }

    info!(target: "bank", "kept {} of {} puzzles in {:?}", kept,
        config.count, start.elapsed());
    Ok(kept)
}

/// How [open_bank] treats a bank file that already exists.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputMode {

    /// New records are appended to the existing file.
    Append,

    /// The existing file is left untouched and the records go to the first
    /// free file name of the form `name(i).ext`.
    FreeName,

    /// The existing file is truncated.
    Overwrite
}

/// Returns the first path of the form `name(i).ext` next to `path` that does
/// not exist yet, trying `i` from 0 to 99.
pub fn free_path(path: &Path) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_string_lossy();
    let extension = path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (0..MAX_FILE_NAME_ATTEMPTS)
        .map(|i| path.with_file_name(format!("{}({}){}", stem, i, extension)))
        .find(|candidate| !candidate.exists())
}

/// Opens the bank file at `path` for writing according to `mode`. Missing
/// files are created. Returns the opened file and the path it was opened at,
/// which differs from `path` only in [OutputMode::FreeName].
///
/// # Errors
///
/// * `BankError::Io` If the file cannot be opened.
/// * `BankError::NoFreeFileName` If `path` exists, `mode` is
/// `OutputMode::FreeName` and all alternative names are taken.
pub fn open_bank(path: &Path, mode: OutputMode)
        -> BankResult<(File, PathBuf)> {
    let path = match mode {
        OutputMode::FreeName if path.exists() =>
            free_path(path).ok_or(BankError::NoFreeFileName)?,
        _ => path.to_path_buf()
    };
    let mut options = OpenOptions::new();

    match mode {
        OutputMode::Overwrite => options.write(true).truncate(true),
        _ => options.append(true)
    };

    let file = options.create(true).open(&path)?;
    Ok((file, path))
}
