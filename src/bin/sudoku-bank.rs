//! Generates puzzles and appends the kept ones to a puzzle bank file, one
//! two-line record per puzzle. Set `RUST_LOG=info` to follow the progress.

use block_sudoku::bank::{generate_bank, open_bank, BankConfig, OutputMode};
use block_sudoku::generator::{Generator, ReducerConfig};

use clap::Parser;

use rand::Rng;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Generates Sudoku puzzles with a unique solution and appends them to a
/// puzzle bank.
#[derive(Parser, Debug)]
#[command(name = "sudoku-bank", version, about)]
struct Cli {

    /// The bank file to which records are appended. It is created if missing.
    #[arg(short, long)]
    output: PathBuf,

    /// Do not append to an existing bank file, write to the first free name
    /// of the form `name(i).ext` instead.
    #[arg(long)]
    no_append: bool,

    /// Together with `--no-append`, truncate an existing bank file instead of
    /// looking for a free name.
    #[arg(long, requires = "no_append")]
    overwrite: bool,

    /// The block size of the puzzles, 3 for ordinary 9x9 Sudoku.
    #[arg(short, long, default_value_t = 3)]
    block_size: usize,

    /// The number of puzzles to generate.
    #[arg(short = 'n', long, default_value_t = 100)]
    count: usize,

    /// Time limit for reducing each puzzle, in seconds.
    #[arg(short, long, default_value_t = 10.0)]
    seconds: f64,

    /// The proportion of empty cells each puzzle should reach.
    #[arg(long, default_value_t = 61.0 / 81.0)]
    target_missing: f64,

    /// Puzzles with fewer empty cells are only kept if they are difficult.
    #[arg(long, default_value_t = 0.0)]
    min_missing: f64,

    /// Puzzles rated more difficult than this are always kept.
    #[arg(long, default_value_t = 100)]
    passing_difficulty: usize,

    /// Seed for reproducible generation.
    #[arg(long)]
    seed: Option<u64>
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        match (self.no_append, self.overwrite) {
            (false, _) => OutputMode::Append,
            (true, false) => OutputMode::FreeName,
            (true, true) => OutputMode::Overwrite
        }
    }

    fn config(&self) -> Result<BankConfig, Box<dyn Error>> {
        let time_budget = Duration::try_from_secs_f64(self.seconds)?;

        Ok(BankConfig {
            block_size: self.block_size,
            count: self.count,
            reducer: ReducerConfig {
                target_missing: self.target_missing,
                min_missing: self.min_missing,
                time_budget,
                finish_local_minimum: self.block_size == 3,
                ..ReducerConfig::default()
            },
            passing_difficulty: self.passing_difficulty
        })
    }
}

fn run<R: Rng>(mut generator: Generator<R>, config: &BankConfig,
        output: &Path, mode: OutputMode) -> Result<(), Box<dyn Error>> {
    let (mut file, path) = open_bank(output, mode)?;
    let kept = generate_bank(&mut generator, config, &mut file)?;

    println!("{} puzzles written to {}", kept, path.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let mode = cli.output_mode();

    match cli.seed {
        Some(seed) =>
            run(Generator::seeded(seed), &config, &cli.output, mode),
        None => run(Generator::new_default(), &config, &cli.output, mode)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn output_mode_flags() {
        let mode = |args: &[&str]| {
            let mut full = vec!["sudoku-bank", "-o", "bank.txt"];
            full.extend_from_slice(args);
            Cli::try_parse_from(full).map(|cli| cli.output_mode())
        };

        assert_eq!(OutputMode::Append, mode(&[]).unwrap());
        assert_eq!(OutputMode::FreeName, mode(&["--no-append"]).unwrap());
        assert_eq!(OutputMode::Overwrite,
            mode(&["--no-append", "--overwrite"]).unwrap());
        assert!(mode(&["--overwrite"]).is_err());
    }
}
