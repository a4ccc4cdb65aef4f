//! This module contains some error and result definitions used in this crate.

use std::io;
use std::num::ParseIntError;

use thiserror::Error;

/// Miscellaneous errors that can occur on some methods in the
/// [root module](crate), the [solver](crate::solver) and the
/// [generator](crate::generator). This does not exclude errors that occur when
/// parsing grids or puzzle records, see [SudokuParseError] and [RecordError]
/// for those.
///
/// Note that a puzzle without a solution or with several solutions is *not*
/// an error. Those are ordinary outcomes of solving, see
/// [Solution](crate::solver::Solution).
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SudokuError {

    /// Indicates that the block size specified for a created grid is invalid.
    /// This is the case if it is 0.
    #[error("the block size must be at least 1")]
    InvalidDimensions,

    /// Indicates that some number is invalid for the size of the grid in
    /// question. This is the case if it is less than 1 or greater than the
    /// size.
    #[error("number is outside the range of the grid")]
    InvalidNumber,

    /// Indicates that the specified coordinates (column and row) lie outside
    /// the grid in question. This is the case if they are greater than or
    /// equal to the size.
    #[error("coordinates lie outside the grid")]
    OutOfBounds,

    /// Raised when a cell already holds a different number and the new number
    /// is not a remaining candidate there. This is a programming error of the
    /// caller and is never recovered internally.
    #[error("cannot assign {number} to cell ({column}, {row})")]
    InvalidAssignment {

        /// The column of the cell that was assigned.
        column: usize,

        /// The row of the cell that was assigned.
        row: usize,

        /// The rejected number.
        number: usize
    },

    /// Raised whenever a solution is required but the search space was
    /// exhausted without finding one, for example when checking whether clues
    /// can be removed from a grid that was not solvable to begin with.
    #[error("the grid has no solution")]
    Unsolvable,

    /// Indicates that a proportion of missing cells handed to the reducer is
    /// not in the range `[0, 1]`.
    #[error("proportion of missing cells must lie in [0, 1]")]
    InvalidProportion
}

/// Syntactic sugar for `Result<V, SudokuError>`.
pub type SudokuResult<V> = Result<V, SudokuError>;

/// An enumeration of the errors that may occur when parsing a
/// [SudokuGrid](crate::SudokuGrid) from its compact code.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SudokuParseError {

    /// Indicates that the code has the wrong number of parts, which are
    /// separated by semicolons. The code should have two parts: block size and
    /// cells (separated by ';'), so if the code does not contain exactly one
    /// semicolon, this error will be returned.
    #[error("code must consist of block size and cells separated by ';'")]
    WrongNumberOfParts,

    /// Indicates that the number of cells (which are separated by commas) does
    /// not equal the number deduced from the block size.
    #[error("number of cells does not match the block size")]
    WrongNumberOfCells,

    /// Indicates that the provided block size is invalid (zero).
    #[error("the block size must be at least 1")]
    InvalidDimensions,

    /// Indicates that one of the numbers (block size or cell content) could
    /// not be parsed.
    #[error("malformed number")]
    NumberFormatError,

    /// Indicates that a cell is filled with an invalid number (more than the
    /// grid size).
    #[error("cell number is outside the range of the grid")]
    InvalidNumber
}

/// Syntactic sugar for `Result<V, SudokuParseError>`.
pub type SudokuParseResult<V> = Result<V, SudokuParseError>;

impl From<ParseIntError> for SudokuParseError {
    fn from(_: ParseIntError) -> Self {
        SudokuParseError::NumberFormatError
    }
}

/// An enumeration of the ways a two-line
/// [PuzzleRecord](crate::record::PuzzleRecord) can be malformed. Records are
/// rejected at the boundary, so no malformed input ever reaches the solver.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RecordError {

    /// The text does not consist of a header line and a cell line.
    #[error("a record consists of exactly two lines")]
    WrongNumberOfLines,

    /// The header line does not contain exactly five comma-separated fields.
    #[error("the header line must contain exactly five fields")]
    WrongNumberOfFields,

    /// The cell line does not contain exactly `N⁴` entries.
    #[error("expected {expected} cells, found {found}")]
    WrongNumberOfCells {

        /// The number of cells implied by the block size in the header.
        expected: usize,

        /// The number of cells actually present.
        found: usize
    },

    /// The block size in the header is less than 2 or too large for a grid.
    #[error("the block size of a record must be at least 2 and fit a grid")]
    InvalidBlockSize,

    /// The clue count in the header disagrees with the cells.
    #[error("header claims {claimed} clues, but the grid has {actual}")]
    InconsistentClueCount {

        /// The clue count stated in the header.
        claimed: usize,

        /// The number of non-empty cells in the grid.
        actual: usize
    },

    /// A flag in the header is neither `0` nor `1`.
    #[error("flags must be 0 or 1")]
    InvalidFlag,

    /// A header field or cell could not be parsed as an integer.
    #[error("malformed number")]
    NumberFormatError,

    /// A cell holds a number greater than the grid size.
    #[error("cell number is outside the range of the grid")]
    InvalidNumber
}

/// Syntactic sugar for `Result<V, RecordError>`.
pub type RecordResult<V> = Result<V, RecordError>;

impl From<ParseIntError> for RecordError {
    fn from(_: ParseIntError) -> Self {
        RecordError::NumberFormatError
    }
}

/// Errors that abort the generation of a puzzle bank, see
/// [generate_bank](crate::bank::generate_bank). Records written before the
/// error remain in the sink.
#[derive(Debug, Error)]
pub enum BankError {

    /// Generating or reducing a puzzle failed.
    #[error("puzzle generation failed: {0}")]
    Generation(#[from] SudokuError),

    /// A kept record could not be written to the bank.
    #[error("could not write to the puzzle bank: {0}")]
    Io(#[from] io::Error),

    /// No unused file name was found next to an existing bank file.
    #[error("no free file name found for the puzzle bank")]
    NoFreeFileName
}

/// Syntactic sugar for `Result<V, BankError>`.
pub type BankResult<V> = Result<V, BankError>;
