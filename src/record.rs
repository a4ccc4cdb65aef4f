//! This module contains the two-line text record in which puzzles are stored in
//! puzzle banks, see [PuzzleRecord].
//!
//! The first line holds five comma-separated integers: the block size, the
//! number of clues, the complexity score and two flags (`0` or `1`) telling
//! whether the puzzle was tried and done before. The second line holds all
//! `block_size⁴` cells, comma-separated, in left-to-right, top-to-bottom
//! order, with `0` for empty cells.
//!
//! ```text
//! 2,5,1,0,0
//! 0,0,0,4,0,4,3,0,0,3,0,0,0,0,1,0
//! ```

use crate::SudokuGrid;
use crate::error::{RecordError, RecordResult, SudokuError, SudokuResult};
use crate::solver::{BacktrackingSolver, SolutionLimit};

use log::warn;

use rand::Rng;

use serde::{Deserialize, Serialize};

use std::fmt::{self, Display, Formatter};

/// A puzzle together with the information stored about it in a puzzle bank.
/// Records are created from a puzzle by [PuzzleRecord::from_puzzle] or read
/// with [PuzzleRecord::parse], and written with their [Display]
/// implementation. Serde uses the same two-line text.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(into = "String", try_from = "String")]
pub struct PuzzleRecord {
    clue_count: usize,
    complexity: usize,
    tried_before: bool,
    done_before: bool,
    grid: SudokuGrid
}

impl PuzzleRecord {

    /// Creates a record for the given puzzle with a known complexity score.
    /// Both flags are unset.
    pub fn new(grid: SudokuGrid, complexity: usize) -> PuzzleRecord {
        PuzzleRecord {
            clue_count: grid.count_clues(),
            complexity,
            tried_before: false,
            done_before: false,
            grid
        }
    }

    /// Creates a record for the given puzzle, computing its complexity score
    /// as the number of guesses the solver had pending when it found the first
    /// solution. Both flags are unset.
    ///
    /// # Errors
    ///
    /// If the puzzle has no solution. In that case, `SudokuError::Unsolvable`
    /// is returned.
    pub fn from_puzzle<R: Rng>(grid: &SudokuGrid,
            solver: &mut BacktrackingSolver<R>) -> SudokuResult<PuzzleRecord> {
        let solved = solver.solutions(grid, SolutionLimit::Count(1))
            .into_iter()
            .next()
            .ok_or(SudokuError::Unsolvable)?;
        Ok(PuzzleRecord::new(grid.clone(), solved.guesses))
    }

    /// Returns this record with the flag indicating that the puzzle was tried
    /// before set to the given value.
    pub fn with_tried_before(mut self, tried_before: bool) -> PuzzleRecord {
        self.tried_before = tried_before;
        self
    }

    /// Returns this record with the flag indicating that the puzzle was solved
    /// before set to the given value.
    pub fn with_done_before(mut self, done_before: bool) -> PuzzleRecord {
        self.done_before = done_before;
        self
    }

    /// Gets the block size of the puzzle.
    pub fn block_size(&self) -> usize {
        self.grid.block_size()
    }

    /// Gets the number of clues of the puzzle.
    pub fn clue_count(&self) -> usize {
        self.clue_count
    }

    /// Gets the complexity score, that is, the number of pending guesses when
    /// the puzzle was first solved.
    pub fn complexity(&self) -> usize {
        self.complexity
    }

    /// Indicates whether the puzzle was tried before.
    pub fn tried_before(&self) -> bool {
        self.tried_before
    }

    /// Indicates whether the puzzle was solved before.
    pub fn done_before(&self) -> bool {
        self.done_before
    }

    /// Gets the puzzle.
    pub fn grid(&self) -> &SudokuGrid {
        &self.grid
    }

    /// A rough estimate of how hard the puzzle is for a human. Only 9x9
    /// puzzles are actually rated, by `2 · (5 · complexity - clues + 40)`
    /// clamped at 0. All 4x4 puzzles are rated 10 and all larger ones 100.
    pub fn difficulty(&self) -> usize {
        match self.block_size() {
            3 => {
                let score = (self.complexity as i64 * 5 -
                    self.clue_count as i64 + 40) * 2;
                score.max(0) as usize
            },
            2 => 10,
            n if n > 3 => 100,
            _ => 0
        }
    }

    /// Parses a record from its two lines. A trailing line break is accepted.
    ///
    /// # Errors
    ///
    /// Any specialization of `RecordError` (see that documentation).
    pub fn parse(text: &str) -> RecordResult<PuzzleRecord> {
        let lines = text.lines().collect::<Vec<_>>();

        if lines.len() != 2 {
            return Err(RecordError::WrongNumberOfLines);
        }

        PuzzleRecord::from_lines(lines[0], lines[1])
    }

    fn from_lines(header: &str, cells: &str) -> RecordResult<PuzzleRecord> {
        let fields = header.split(',')
            .map(|f| f.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()?;

        if fields.len() != 5 {
            return Err(RecordError::WrongNumberOfFields);
        }

        let grid = grid_from_line(cells, fields[0])?;
        let actual = grid.count_clues();

        if fields[1] != actual {
            return Err(RecordError::InconsistentClueCount {
                claimed: fields[1],
                actual
            });
        }

        Ok(PuzzleRecord::new(grid, fields[2])
            .with_tried_before(parse_flag(fields[3])?)
            .with_done_before(parse_flag(fields[4])?))
    }
}

fn parse_flag(value: usize) -> RecordResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(RecordError::InvalidFlag)
    }
}

fn flag(value: bool) -> u8 {
    if value { 1 } else { 0 }
}

impl Display for PuzzleRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{},{},{},{},{}", self.block_size(), self.clue_count,
            self.complexity, flag(self.tried_before), flag(self.done_before))?;
        f.write_str(&grid_to_line(&self.grid))
    }
}

impl From<PuzzleRecord> for String {
    fn from(record: PuzzleRecord) -> String {
        record.to_string()
    }
}

impl TryFrom<String> for PuzzleRecord {
    type Error = RecordError;

    fn try_from(text: String) -> RecordResult<PuzzleRecord> {
        PuzzleRecord::parse(&text)
    }
}

/// Writes the cells of a grid as a single comma-separated line, row by row,
/// with `0` for empty cells.
pub fn grid_to_line(grid: &SudokuGrid) -> String {
    grid.to_numbers().iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Reads a grid with blocks of the given size from a line as written by
/// [grid_to_line].
///
/// # Errors
///
/// * `RecordError::InvalidBlockSize` If `block_size` is less than 2 or too
/// large for a grid to fit into memory.
/// * `RecordError::NumberFormatError` If a cell is not a number.
/// * `RecordError::WrongNumberOfCells` If the line does not hold exactly
/// `block_size⁴` cells.
/// * `RecordError::InvalidNumber` If a cell is greater than `block_size²`.
pub fn grid_from_line(line: &str, block_size: usize)
        -> RecordResult<SudokuGrid> {
    if block_size < 2 {
        return Err(RecordError::InvalidBlockSize);
    }

    let expected = crate::cell_count(block_size)
        .ok_or(RecordError::InvalidBlockSize)?;
    let cells = line.split(',')
        .map(|c| c.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()?;

    if cells.len() != expected {
        return Err(RecordError::WrongNumberOfCells {
            expected,
            found: cells.len()
        });
    }

    SudokuGrid::from_cells(block_size, &cells)
        .map_err(|_| RecordError::InvalidNumber)
}

/// Reads all records from the text of a puzzle bank. Empty lines and lines
/// starting with `#` are skipped; every other line starts a record and is
/// followed by its cell line. Malformed records are skipped with a warning.
pub fn parse_bank(text: &str) -> Vec<PuzzleRecord> {
    let mut records = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((number, header)) = lines.next() {
        if header.trim().is_empty() || header.starts_with('#') {
            continue;
        }

        let cells = match lines.next() {
            Some((_, cells)) => cells,
            None => {
                warn!(target: "bank", "record at line {} has no cell line",
                    number + 1);
                break;
            }
        };

        match PuzzleRecord::from_lines(header, cells) {
            Ok(record) => records.push(record),
            Err(e) => warn!(target: "bank",
                "skipping record at line {}: {}", number + 1, e)
        }
    }

    records
}

#[cfg(test)]
mod tests {

    use super::*;

    const SMALL: &str = "2; , , ,4, ,4,3, , ,3, , , , ,1, ";
    const SMALL_RECORD: &str = "2,5,3,1,0\n\
        0,0,0,4,0,4,3,0,0,3,0,0,0,0,1,0";

    #[test]
    fn record_is_written_in_two_lines() {
        let grid = SudokuGrid::parse(SMALL).unwrap();
        let record = PuzzleRecord::new(grid, 3).with_tried_before(true);

        assert_eq!(SMALL_RECORD, record.to_string());
    }

    #[test]
    fn record_is_parsed() {
        let record = PuzzleRecord::parse(SMALL_RECORD).unwrap();

        assert_eq!(2, record.block_size());
        assert_eq!(5, record.clue_count());
        assert_eq!(3, record.complexity());
        assert!(record.tried_before());
        assert!(!record.done_before());
        assert_eq!(&SudokuGrid::parse(SMALL).unwrap(), record.grid());
        assert_eq!(record,
            PuzzleRecord::parse(&format!("{}\n", SMALL_RECORD)).unwrap());
    }

    #[test]
    fn written_record_parses_to_same_record() {
        let grid = SudokuGrid::parse("3;\
            0,2,3,4,5,6,7,8,9,\
            4,5,6,7,8,9,0,2,3,\
            7,8,9,1,0,3,0,5,6,\
            2,3,0,5,6,0,8,9,1,\
            5,6,0,8,9,1,2,3,4,\
            8,9,1,2,0,4,5,6,0,\
            3,4,5,6,7,8,9,1,2,\
            6,7,8,9,1,2,0,4,5,\
            9,1,2,3,4,5,6,7,8").unwrap();
        let record = PuzzleRecord::new(grid, 0).with_done_before(true);

        assert_eq!(record, PuzzleRecord::parse(&record.to_string()).unwrap());
    }

    #[test]
    fn malformed_records_are_rejected() {
        assert_eq!(Err(RecordError::WrongNumberOfLines),
            PuzzleRecord::parse("2,0,0,0,0"));
        assert_eq!(Err(RecordError::WrongNumberOfFields),
            PuzzleRecord::parse("2,0,0,0\n0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0"));
        assert_eq!(Err(RecordError::NumberFormatError),
            PuzzleRecord::parse("2,0,x,0,0\n0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0"));
        assert_eq!(Err(RecordError::InvalidBlockSize),
            PuzzleRecord::parse("1,1,0,0,0\n1"));
        assert_eq!(Err(RecordError::InvalidBlockSize),
            PuzzleRecord::parse("65536,0,0,0,0\n0"));
        assert_eq!(Err(RecordError::WrongNumberOfCells {
            expected: 8_100_000_000,
            found: 1
        }), PuzzleRecord::parse("300,0,0,0,0\n0"));
        assert_eq!(Err(RecordError::WrongNumberOfCells {
            expected: 16,
            found: 15
        }), PuzzleRecord::parse("2,0,0,0,0\n0,0,0,0,0,0,0,0,0,0,0,0,0,0,0"));
        assert_eq!(Err(RecordError::InvalidNumber),
            PuzzleRecord::parse("2,1,0,0,0\n5,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0"));
        assert_eq!(Err(RecordError::InconsistentClueCount {
            claimed: 2,
            actual: 1
        }), PuzzleRecord::parse("2,2,0,0,0\n4,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0"));
        assert_eq!(Err(RecordError::InvalidFlag),
            PuzzleRecord::parse("2,1,0,2,0\n4,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0"));
    }

    #[test]
    fn complexity_is_computed_from_solver() {
        let full = SudokuGrid::parse("2;3,1,2,4,2,4,3,1,1,3,4,2,4,2,1,3")
            .unwrap();
        let mut solver = BacktrackingSolver::seeded(0);
        let record = PuzzleRecord::from_puzzle(&full, &mut solver).unwrap();

        assert_eq!(0, record.complexity());
        assert_eq!(16, record.clue_count());

        let empty = SudokuGrid::new(2).unwrap();
        let record = PuzzleRecord::from_puzzle(&empty, &mut solver).unwrap();

        assert!(record.complexity() >= 1);
        assert_eq!(0, record.clue_count());

        let impossible = SudokuGrid::parse("2;1,1,,,,,,,,,,,,,,").unwrap();

        assert_eq!(Err(SudokuError::Unsolvable),
            PuzzleRecord::from_puzzle(&impossible, &mut solver));
    }

    #[test]
    fn difficulty_depends_on_block_size() {
        let small = PuzzleRecord::new(SudokuGrid::new(2).unwrap(), 7);
        let large = PuzzleRecord::new(SudokuGrid::new(4).unwrap(), 0);
        let tiny = PuzzleRecord::new(SudokuGrid::new(1).unwrap(), 0);

        assert_eq!(10, small.difficulty());
        assert_eq!(100, large.difficulty());
        assert_eq!(0, tiny.difficulty());
    }

    #[test]
    fn difficulty_of_nine_by_nine() {
        let mut grid = SudokuGrid::new(3).unwrap();

        for column in 0..9 {
            grid.set_cell(column, 0, column + 1).unwrap();
        }

        for column in 0..6 {
            grid.set_cell(column, 1, (column + 3) % 9 + 1).unwrap();
        }

        assert_eq!(15, grid.count_clues());
        assert_eq!(2 * (4 * 5 - 15 + 40),
            PuzzleRecord::new(grid.clone(), 4).difficulty());
        assert_eq!(50, PuzzleRecord::new(grid.clone(), 0).difficulty());

        let full = crate::generator::Generator::seeded(1)
            .generate_solved(3).unwrap();

        // 81 clues, no guesses: 2 * (0 - 81 + 40) is negative
        assert_eq!(0, PuzzleRecord::new(full, 0).difficulty());
    }

    #[test]
    fn bank_skips_comments_and_malformed_records() {
        let text = format!("# generated bank\n\
            \n\
            {}\n\
            2,1,0,0,0\n\
            9,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0\n\
            \n\
            {}\n\
            2,0,0,0,0\n", SMALL_RECORD, SMALL_RECORD);
        let records = parse_bank(&text);

        assert_eq!(2, records.len());
        assert_eq!(records[0], records[1]);
        assert_eq!(5, records[0].clue_count());
    }

    #[test]
    fn bank_skips_records_of_huge_block_size() {
        let text = format!("65536,0,0,0,0\n0\n\
            {}\n\
            300,1,0,0,0\n1\n", SMALL_RECORD);
        let records = parse_bank(&text);

        assert_eq!(1, records.len());
        assert_eq!(2, records[0].block_size());
    }

    #[test]
    fn grid_lines() {
        let grid = SudokuGrid::parse(SMALL).unwrap();
        let line = grid_to_line(&grid);

        assert_eq!("0,0,0,4,0,4,3,0,0,3,0,0,0,0,1,0", line);
        assert_eq!(Ok(grid), grid_from_line(&line, 2));
        assert_eq!(Err(RecordError::InvalidBlockSize), grid_from_line("", 0));
    }

    #[test]
    fn record_serde_uses_text() {
        let record = PuzzleRecord::parse(SMALL_RECORD).unwrap();
        let json = serde_json::to_string(&record).unwrap();

        assert_eq!(record, serde_json::from_str::<PuzzleRecord>(&json).unwrap());
        assert!(serde_json::from_str::<PuzzleRecord>("\"2,1,0,0,0\"").is_err());
    }
}
