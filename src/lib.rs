// Code lints

#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_import_braces)]
#![warn(unused_lifetimes)]
#![warn(unused_qualifications)]

// Doc lints

#![warn(rustdoc::broken_intra_doc_links)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_codeblock_attributes)]

//! This crate implements a Sudoku engine for square puzzles of any block size
//! `N`, that is, grids with `N²` rows, columns and blocks, each of which must
//! contain the digits `1` to `N²`. It supports the following key features:
//!
//! * Parsing and printing grids
//! * Checking grids for consistency
//! * Solving grids with constraint propagation and backtracking, counting
//! solutions up to a limit
//! * Generating random full grids, reproducibly if a seed is given
//! * Reducing full grids to puzzles with few clues and a unique solution
//! within a time budget
//! * Reading and writing the two-line puzzle records used by puzzle banks
//!
//! Note in this introduction we will mostly be using 4x4 Sudoku (block size 2)
//! due to their simpler nature.
//!
//! # Parsing and printing grids
//!
//! See [SudokuGrid::parse] for the exact format of a grid code. An example of
//! how to parse and display a grid is provided below.
//!
//! ```
//! use block_sudoku::SudokuGrid;
//!
//! let grid = SudokuGrid::parse("2;2, ,3, , ,1, , ,1, , ,4, ,2, ,3").unwrap();
//! println!("{}", grid);
//! ```
//!
//! # Solving grids
//!
//! The [BacktrackingSolver](solver::BacktrackingSolver) first commits every
//! cell that has only one remaining candidate and only guesses when no such
//! cell is left. It implements the [Solver](solver::Solver) trait, which
//! classifies a grid as impossible, uniquely solvable or ambiguous.
//!
//! ```
//! use block_sudoku::SudokuGrid;
//! use block_sudoku::solver::{BacktrackingSolver, Solution, Solver};
//!
//! // ╔═══╤═══╦═══╤═══╗
//! // ║   │   ║   │ 4 ║
//! // ╟───┼───╫───┼───╢
//! // ║   │ 4 ║ 3 │   ║
//! // ╠═══╪═══╬═══╪═══╣
//! // ║   │ 3 ║   │   ║
//! // ╟───┼───╫───┼───╢
//! // ║   │   ║ 1 │   ║
//! // ╚═══╧═══╩═══╧═══╝
//! let grid = SudokuGrid::parse("2; , , ,4, ,4,3, , ,3, , , , ,1, ").unwrap();
//! let mut solver = BacktrackingSolver::seeded(42);
//!
//! let expected =
//!     SudokuGrid::parse("2;3,1,2,4,2,4,3,1,1,3,4,2,4,2,1,3").unwrap();
//! assert_eq!(Solution::Unique(expected), solver.solve(&grid));
//! ```
//!
//! If a grid has several solutions, they can be enumerated with
//! [BacktrackingSolver::solutions](solver::BacktrackingSolver::solutions).
//!
//! # Generating puzzles
//!
//! Generation is done in two steps: generating a full grid using a
//! [Generator](generator::Generator) and then removing clues using a
//! [Reducer](generator::Reducer), which keeps the solution unique and stops
//! once the target number of missing cells is reached or its time budget is
//! used up.
//!
//! ```
//! use block_sudoku::generator::{Generator, Reducer, ReducerConfig};
//! use block_sudoku::solver::has_unique_solution;
//! use std::time::Duration;
//!
//! let mut generator = Generator::seeded(7);
//! let full = generator.generate_solved(3).unwrap();
//! assert!(full.is_full() && full.is_consistent());
//!
//! let config = ReducerConfig {
//!     target_missing: 0.5,
//!     time_budget: Duration::from_secs(10),
//!     ..ReducerConfig::default()
//! };
//! let mut reducer = Reducer::seeded(7);
//! let outcome = reducer.reduce(&full, &config).unwrap();
//!
//! assert!(outcome.success);
//! assert!(outcome.grid.count_clues() <= 40);
//! assert_eq!(Some(true), has_unique_solution(&outcome.grid));
//! ```
//!
//! # Note regarding performance
//!
//! Generating 9x9 puzzles is a matter of milliseconds, while uniqueness checks
//! on 16x16 grids with few clues can take seconds. It is strongly recommended
//! to use at least `opt-level = 2`, even in tests that use generation.

pub mod bank;
pub mod error;
pub mod generator;
pub mod record;
pub mod solver;
pub mod util;


use error::{SudokuError, SudokuParseError, SudokuParseResult, SudokuResult};

use serde::{Deserialize, Serialize};

use std::fmt::{self, Display, Formatter};

/// A Sudoku grid is composed of `size × size` cells that are organized into
/// square blocks of `block_size × block_size` cells, where
/// `size = block_size²`. Each cell may or may not be occupied by a number in
/// the range `[1, size]`.
///
/// In ordinary Sudoku, the block size is 3. With a block size of 2, the grid
/// looks like this:
///
/// ```text
/// ╔═══╤═══╦═══╤═══╗
/// ║   │   ║   │   ║
/// ╟───┼───╫───┼───╢
/// ║   │   ║   │   ║
/// ╠═══╪═══╬═══╪═══╣
/// ║   │   ║   │   ║
/// ╟───┼───╫───┼───╢
/// ║   │   ║   │   ║
/// ╚═══╧═══╩═══╧═══╝
/// ```
///
/// The grid itself does not enforce the Sudoku rules, use
/// [SudokuGrid::is_consistent] to check them. It is serialized by serde as its
/// [parseable string](SudokuGrid::to_parseable_string).
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(into = "String", try_from = "String")]
pub struct SudokuGrid {
    block_size: usize,
    size: usize,
    cells: Vec<Option<usize>>
}

fn digits(number: usize) -> usize {
    number.to_string().len()
}

fn line(grid: &SudokuGrid, start: &str, thick_sep: &str, thin_sep: &str,
        segment: impl Fn(usize) -> String, end: &str) -> String {
    let mut result = String::new();

    for x in 0..grid.size {
        if x == 0 {
            result.push_str(start);
        }
        else if x % grid.block_size == 0 {
            result.push_str(thick_sep);
        }
        else {
            result.push_str(thin_sep);
        }

        result.push_str(&segment(x));
    }

    result.push_str(end);
    result.push('\n');
    result
}

fn separator_line(grid: &SudokuGrid, start: &str, thick_sep: &str,
        thin_sep: &str, fill: &str, end: &str) -> String {
    let width = digits(grid.size) + 2;
    line(grid, start, thick_sep, thin_sep, |_| fill.repeat(width), end)
}

fn content_row(grid: &SudokuGrid, y: usize) -> String {
    let width = digits(grid.size);
    line(grid, "║", "║", "│", |x| {
        let content = match grid.cells[index(x, y, grid.size)] {
            Some(number) => number.to_string(),
            None => String::new()
        };
        format!(" {:>width$} ", content, width = width)
    }, "║")
}

impl Display for SudokuGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let thin = separator_line(self, "╟", "╫", "┼", "─", "╢");
        let thick = separator_line(self, "╠", "╬", "╪", "═", "╣");

        f.write_str(&separator_line(self, "╔", "╦", "╤", "═", "╗"))?;

        for y in 0..self.size {
            if y > 0 {
                if y % self.block_size == 0 {
                    f.write_str(&thick)?;
                }
                else {
                    f.write_str(&thin)?;
                }
            }

            f.write_str(&content_row(self, y))?;
        }

        let bottom = separator_line(self, "╚", "╩", "╧", "═", "╝");
        f.write_str(bottom.trim_end())
    }
}

pub(crate) fn index(column: usize, row: usize, size: usize) -> usize {
    row * size + column
}

/// Returns the number of cells of a grid with the given block size, or `None`
/// if the block size is zero or the grid could not be stored in memory.
pub(crate) fn cell_count(block_size: usize) -> Option<usize> {
    if block_size == 0 {
        return None;
    }

    let size = block_size.checked_mul(block_size)?;
    let cells = size.checked_mul(size)?;
    let bytes = cells.checked_mul(std::mem::size_of::<Option<usize>>())?;

    if bytes > isize::MAX as usize {
        None
    }
    else {
        Some(cells)
    }
}

/// Returns the cell indices of all cells sharing a row, column or block with
/// the cell at `(column, row)`, including the cell itself (possibly several
/// times).
pub(crate) fn peers(column: usize, row: usize, block_size: usize)
        -> impl Iterator<Item = usize> {
    let size = block_size * block_size;
    let block_column = column / block_size * block_size;
    let block_row = row / block_size * block_size;
    let in_row = (0..size).map(move |x| index(x, row, size));
    let in_column = (0..size).map(move |y| index(column, y, size));
    let in_block = (0..size).map(move |i| index(
        block_column + i % block_size,
        block_row + i / block_size,
        size));
    in_row.chain(in_column).chain(in_block)
}

impl SudokuGrid {

    /// Creates a new, empty Sudoku grid with blocks of the given size. The
    /// total width and height of the grid will be the square of `block_size`.
    ///
    /// # Errors
    ///
    /// If `block_size` is zero or so large that the grid does not fit into
    /// memory. In that case, `SudokuError::InvalidDimensions` is returned.
    pub fn new(block_size: usize) -> SudokuResult<SudokuGrid> {
        let cells = cell_count(block_size)
            .ok_or(SudokuError::InvalidDimensions)?;

        Ok(SudokuGrid {
            block_size,
            size: block_size * block_size,
            cells: vec![None; cells]
        })
    }

    /// Creates a grid from its cells in left-to-right, top-to-bottom order,
    /// where 0 denotes an empty cell.
    ///
    /// # Errors
    ///
    /// * `SudokuError::InvalidDimensions` If `block_size` is zero or the
    /// number of cells is not `block_size⁴`.
    /// * `SudokuError::InvalidNumber` If some cell is greater than the size.
    pub fn from_cells(block_size: usize, cells: &[usize])
            -> SudokuResult<SudokuGrid> {
        if cell_count(block_size) != Some(cells.len()) {
            return Err(SudokuError::InvalidDimensions);
        }

        let mut grid = SudokuGrid::new(block_size)?;

        for (cell, &number) in grid.cells.iter_mut().zip(cells.iter()) {
            if number > grid.size {
                return Err(SudokuError::InvalidNumber);
            }

            *cell = if number == 0 { None } else { Some(number) };
        }

        Ok(grid)
    }

    /// Parses a code encoding a Sudoku grid. The code has to be of the format
    /// `<block_size>;<cells>` where `<cells>` is a comma-separated list of
    /// entries, which are either empty, `0` (both meaning an empty cell) or a
    /// number. The entries are assigned left-to-right, top-to-bottom, where
    /// each row is completed before the next one is started. Whitespace in the
    /// entries is ignored to allow for more intuitive formatting. The number
    /// of entries must be `block_size⁴`.
    ///
    /// As an example, the code `2;1, ,2, , ,3, ,4, , , ,3, ,1, ,2` will parse
    /// to the following grid:
    ///
    /// ```text
    /// ╔═══╤═══╦═══╤═══╗
    /// ║ 1 │   ║ 2 │   ║
    /// ╟───┼───╫───┼───╢
    /// ║   │ 3 ║   │ 4 ║
    /// ╠═══╪═══╬═══╪═══╣
    /// ║   │   ║ 3 │   ║
    /// ╟───┼───╫───┼───╢
    /// ║   │ 1 ║   │ 2 ║
    /// ╚═══╧═══╩═══╧═══╝
    /// ```
    ///
    /// # Errors
    ///
    /// Any specialization of `SudokuParseError` (see that documentation).
    pub fn parse(code: &str) -> SudokuParseResult<SudokuGrid> {
        let parts: Vec<&str> = code.split(';').collect();

        if parts.len() != 2 {
            return Err(SudokuParseError::WrongNumberOfParts);
        }

        let block_size = parts[0].trim().parse::<usize>()?;
        let cells = cell_count(block_size)
            .ok_or(SudokuParseError::InvalidDimensions)?;
        let numbers: Vec<&str> = parts[1].split(',').collect();

        if numbers.len() != cells {
            return Err(SudokuParseError::WrongNumberOfCells);
        }

        let mut grid = SudokuGrid::new(block_size)
            .map_err(|_| SudokuParseError::InvalidDimensions)?;

        for (cell, number_str) in grid.cells.iter_mut().zip(numbers) {
            let number_str = number_str.trim();

            if number_str.is_empty() {
                continue;
            }

            let number = number_str.parse::<usize>()?;

            if number > grid.size {
                return Err(SudokuParseError::InvalidNumber);
            }

            if number > 0 {
                *cell = Some(number);
            }
        }

        Ok(grid)
    }

    /// Converts the grid into a `String` in a way that is consistent with
    /// [SudokuGrid::parse]. That is, a grid that is converted to a string and
    /// parsed again will not change, as is illustrated below.
    ///
    /// ```
    /// use block_sudoku::SudokuGrid;
    ///
    /// let mut grid = SudokuGrid::new(3).unwrap();
    /// grid.set_cell(1, 1, 4).unwrap();
    /// grid.set_cell(1, 2, 5).unwrap();
    ///
    /// let grid_str = grid.to_parseable_string();
    /// let grid_parsed = SudokuGrid::parse(grid_str.as_str()).unwrap();
    /// assert_eq!(grid, grid_parsed);
    /// ```
    pub fn to_parseable_string(&self) -> String {
        let cells = self.cells.iter()
            .map(|cell| cell.map(|n| n.to_string()).unwrap_or_default())
            .collect::<Vec<String>>()
            .join(",");
        format!("{};{}", self.block_size, cells)
    }

    /// Gets the size of one square block of the grid. For an ordinary Sudoku
    /// grid, this is 3.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Gets the total size of the grid on one axis, which is the square of the
    /// block size. This is also the largest number a cell can hold.
    pub fn size(&self) -> usize {
        self.size
    }

    fn verified_index(&self, column: usize, row: usize)
            -> SudokuResult<usize> {
        if column >= self.size || row >= self.size {
            Err(SudokuError::OutOfBounds)
        }
        else {
            Ok(index(column, row, self.size))
        }
    }

    /// Gets the content of the cell at the specified position.
    ///
    /// # Errors
    ///
    /// If either `column` or `row` are not in the range `[0, size[`. In that
    /// case, `SudokuError::OutOfBounds` is returned.
    pub fn get_cell(&self, column: usize, row: usize)
            -> SudokuResult<Option<usize>> {
        Ok(self.cells[self.verified_index(column, row)?])
    }

    /// Sets the content of the cell at the specified position to the given
    /// number. If the cell was not empty, the old number will be overwritten.
    /// No Sudoku rules are checked here; to enter a number while keeping track
    /// of the remaining candidates, use
    /// [SearchState::set_cell](crate::solver::SearchState::set_cell).
    ///
    /// # Errors
    ///
    /// * `SudokuError::OutOfBounds` If either `column` or `row` are not in the
    /// range `[0, size[`.
    /// * `SudokuError::InvalidNumber` If `number` is not in the range
    /// `[1, size]`.
    pub fn set_cell(&mut self, column: usize, row: usize, number: usize)
            -> SudokuResult<()> {
        let index = self.verified_index(column, row)?;

        if number == 0 || number > self.size {
            return Err(SudokuError::InvalidNumber);
        }

        self.cells[index] = Some(number);
        Ok(())
    }

    /// Clears the content of the cell at the specified position. If the cell
    /// is already empty, it will be left that way.
    ///
    /// # Errors
    ///
    /// If either `column` or `row` are not in the range `[0, size[`. In that
    /// case, `SudokuError::OutOfBounds` is returned.
    pub fn clear_cell(&mut self, column: usize, row: usize)
            -> SudokuResult<()> {
        let index = self.verified_index(column, row)?;
        self.cells[index] = None;
        Ok(())
    }

    /// Counts the number of clues given by this grid. This is the number of
    /// non-empty cells.
    pub fn count_clues(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Indicates whether this grid is full, i.e. every cell is filled with a
    /// number. This does not imply that the grid is consistent.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Indicates whether this grid is empty, i.e. no cell is filled with a
    /// number.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    fn group_has_duplicate(&self, group: impl Iterator<Item = usize>,
            seen: &mut [bool]) -> bool {
        for flag in seen.iter_mut() {
            *flag = false;
        }

        for cell in group {
            if let Some(number) = self.cells[cell] {
                if seen[number] {
                    return true;
                }

                seen[number] = true;
            }
        }

        false
    }

    /// Checks whether the grid satisfies the Sudoku rules, that is, whether no
    /// row, column or block contains the same number twice. Empty cells are
    /// ignored, so a consistent grid need not be full or solvable.
    pub fn is_consistent(&self) -> bool {
        let size = self.size;
        let block_size = self.block_size;
        let mut seen = vec![false; size + 1];

        for i in 0..size {
            let row = (0..size).map(|x| index(x, i, size));
            let column = (0..size).map(|y| index(i, y, size));
            let block_column = i % block_size * block_size;
            let block_row = i / block_size * block_size;
            let block = (0..size).map(|j| index(
                block_column + j % block_size,
                block_row + j / block_size,
                size));

            if self.group_has_duplicate(row, &mut seen) ||
                    self.group_has_duplicate(column, &mut seen) ||
                    self.group_has_duplicate(block, &mut seen) {
                return false;
            }
        }

        true
    }

    /// Indicates whether this grid configuration is a subset of another one.
    /// That is, all cells filled in this grid with some number must be filled
    /// in `other` with the same number.
    ///
    /// # Errors
    ///
    /// If the block sizes of this and the `other` grid are not the same. In
    /// that case, `SudokuError::InvalidDimensions` is returned.
    pub fn is_subset(&self, other: &SudokuGrid) -> SudokuResult<bool> {
        if self.block_size != other.block_size {
            return Err(SudokuError::InvalidDimensions);
        }

        Ok(self.cells.iter()
            .zip(other.cells.iter())
            .all(|(self_cell, other_cell)| match self_cell {
                Some(_) => self_cell == other_cell,
                None => true
            }))
    }

    /// Gets a reference to the slice which holds the cells. They are in
    /// left-to-right, top-to-bottom order, where rows are together.
    pub fn cells(&self) -> &[Option<usize>] {
        &self.cells
    }

    /// Returns the cells as numbers in left-to-right, top-to-bottom order,
    /// with 0 for empty cells.
    pub fn to_numbers(&self) -> Vec<usize> {
        self.cells.iter().map(|c| c.unwrap_or(0)).collect()
    }

    pub(crate) fn clear_index(&mut self, index: usize) {
        self.cells[index] = None;
    }

    pub(crate) fn set_index(&mut self, index: usize, number: usize) {
        self.cells[index] = Some(number);
    }
}

impl From<SudokuGrid> for String {
    fn from(grid: SudokuGrid) -> String {
        grid.to_parseable_string()
    }
}

impl TryFrom<String> for SudokuGrid {
    type Error = SudokuParseError;

    fn try_from(code: String) -> SudokuParseResult<SudokuGrid> {
        SudokuGrid::parse(&code)
    }
}
