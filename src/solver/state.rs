//! This module contains the [SearchState], which pairs a grid with the
//! candidates that remain for each of its cells.

use crate::{index, peers, SudokuGrid};
use crate::error::{SudokuError, SudokuResult};
use crate::solver::propagation;
use crate::util::CandidateSet;

/// A grid together with, for every cell, the set of numbers that may still go
/// there. For every filled cell, its number is its only candidate, and it is
/// removed from the candidates of all other cells in its row, column and
/// block, as long as the grid was entered through [SearchState::set_cell] or
/// the search. Cloning a state copies both parts, so branches of a search
/// never influence each other.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchState {
    grid: SudokuGrid,
    candidates: CandidateSet
}

impl SearchState {

    /// Creates a new state for the given grid in which every cell still has
    /// every number as a candidate, regardless of the clues already present.
    /// Clues only start restricting their peers once they are committed, see
    /// [SearchState::prepared].
    pub fn new(grid: SudokuGrid) -> SearchState {
        let candidates = CandidateSet::full(grid.size());

        SearchState {
            grid,
            candidates
        }
    }

    /// Creates a new state for the given grid and commits all of its clues, so
    /// that they are removed from the candidates of their peers. Empty cells
    /// left with a single candidate are filled in as well.
    pub fn prepared(grid: SudokuGrid) -> SearchState {
        let mut state = SearchState::new(grid);
        propagation::propagate_once(&mut state, true);
        state
    }

    /// Gets the grid in its current state of completion.
    pub fn grid(&self) -> &SudokuGrid {
        &self.grid
    }

    /// Gets the candidates of all cells.
    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// Consumes this state and returns its grid.
    pub fn into_grid(self) -> SudokuGrid {
        self.grid
    }

    /// Enters `number` into the cell at the given position, removes it from
    /// the candidates of every other cell in the same row, column and block,
    /// and makes it the only candidate of the cell itself.
    ///
    /// # Errors
    ///
    /// * `SudokuError::OutOfBounds` If either `column` or `row` are not in the
    /// range `[0, size[`.
    /// * `SudokuError::InvalidNumber` If `number` is not in the range
    /// `[1, size]`.
    /// * `SudokuError::InvalidAssignment` If the cell already holds a
    /// different number and `number` is no longer one of its candidates.
    pub fn set_cell(&mut self, column: usize, row: usize, number: usize)
            -> SudokuResult<()> {
        let size = self.grid.size();

        if column >= size || row >= size {
            return Err(SudokuError::OutOfBounds);
        }

        if number == 0 || number > size {
            return Err(SudokuError::InvalidNumber);
        }

        let cell = index(column, row, size);
        let current = self.grid.cells()[cell];

        if current.is_some() && current != Some(number) &&
                !self.candidates.contains(cell, number) {
            return Err(SudokuError::InvalidAssignment {
                column,
                row,
                number
            });
        }

        self.commit(cell, number);
        Ok(())
    }

    /// Commits `number` to the cell with the given index without any checks.
    /// The number must be in `[1, size]`.
    pub(crate) fn commit(&mut self, cell: usize, number: usize) {
        let size = self.grid.size();
        let column = cell % size;
        let row = cell / size;

        for peer in peers(column, row, self.grid.block_size()) {
            self.candidates.remove(peer, number);
        }

        self.candidates.fix(cell, number);
        self.grid.set_index(cell, number);
    }

    /// Removes `number` from the candidates of the cell with the given index.
    pub(crate) fn exclude(&mut self, cell: usize, number: usize) {
        self.candidates.remove(cell, number);
    }

    /// Indicates whether some cell has no candidates left, in which case this
    /// state cannot be completed to a solution.
    pub fn has_contradiction(&self) -> bool {
        (0..self.grid.cells().len()).any(|cell| self.candidates.count(cell) == 0)
    }

    /// Finds the cell with the fewest candidates among those that have more
    /// than one. Ties are resolved in favor of the first such cell in
    /// left-to-right, top-to-bottom order. Returns `None` if every cell has at
    /// most one candidate.
    pub fn most_constrained_cell(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;

        for cell in 0..self.grid.cells().len() {
            let count = self.candidates.count(cell);

            if count > 1 && best.map_or(true, |(_, c)| count < c) {
                best = Some((cell, count));

                if count == 2 {
                    break;
                }
            }
        }

        best.map(|(cell, _)| cell)
    }
}
