//! This module contains the logic for solving Sudoku.
//!
//! Most importantly, this module contains the definition of the
//! [Solver] trait and the [BacktrackingSolver] as a generally usable
//! implementation. The building blocks of the search, the [SearchState] and
//! the [propagation] functions, are exposed as well.

pub mod propagation;
pub mod state;

pub use state::SearchState;

use crate::SudokuGrid;
use crate::solver::propagation::{propagate_to_fixpoint, Propagation};

use log::trace;

use rand::{Rng, SeedableRng};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;

use rand_chacha::ChaCha8Rng;

/// An enumeration of the different ways a Sudoku can be solveable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Solution {

    /// Indicates that the Sudoku is not solveable at all.
    Impossible,

    /// Indicates that the Sudoku has a unique solution, which is wrapped in
    /// this instance.
    Unique(SudokuGrid),

    /// Indicates that the Sudoku has multiple solutions.
    Ambiguous
}

/// A trait for structs which have the ability to solve Sudoku. Solvers take
/// `&mut self` so they can carry the state of a random number generator that
/// decides which branches are explored first.
pub trait Solver {

    /// Solves the provided grid and classifies it as impossible, uniquely
    /// solvable or ambiguous.
    fn solve(&mut self, grid: &SudokuGrid) -> Solution;
}

/// The maximum number of solutions a search collects before it stops.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolutionLimit {

    /// Stop after the given number of solutions have been found. A meaningful
    /// limit is at least 1: `Count(0)` stops before the search starts, so it
    /// always yields no solutions, even for a solvable grid. Such an empty
    /// result must not be read as "no solution".
    Count(usize),

    /// Explore the entire search space.
    All
}

impl SolutionLimit {
    fn is_reached(self, found: usize) -> bool {
        match self {
            SolutionLimit::Count(limit) => found >= limit,
            SolutionLimit::All => false
        }
    }
}

/// A solution found by the [BacktrackingSolver] together with the number of
/// guesses that were still pending when it was found.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SolvedGrid {

    /// The full grid.
    pub grid: SudokuGrid,

    /// The number of saved branches on the frontier at the moment this
    /// solution was found. Used as a measure of how much guessing a puzzle
    /// requires.
    pub guesses: usize
}

/// A perfect [Solver] which first fills in every cell with a single remaining
/// candidate and only guesses once no such cell is left. Guesses are made on
/// the cell with the fewest candidates, trying a randomly chosen candidate
/// first. The search is iterative: states to return to are kept on an explicit
/// frontier, and every guess works on its own clone of the state, so no two
/// branches share anything.
///
/// The worst-case runtime is still exponential. With a seeded random number
/// generator, the order in which solutions are found is reproducible.
pub struct BacktrackingSolver<R: Rng> {
    rng: R
}

impl<R: Rng> BacktrackingSolver<R> {

    /// Creates a new backtracking solver that uses the given random number
    /// generator to decide which candidate to try first.
    pub fn new(rng: R) -> BacktrackingSolver<R> {
        BacktrackingSolver { rng }
    }

    /// Gets a mutable reference to the random number generator of this
    /// solver.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Searches for solutions of the given grid until `limit` is reached or
    /// the search space is exhausted. The solutions are returned in the order
    /// they were found. For a limit of at least 1, an empty vector means the
    /// grid has no solution; `SolutionLimit::Count(0)` always yields an empty
    /// vector without searching. Every solution agrees with all clues of
    /// `grid`.
    pub fn solutions(&mut self, grid: &SudokuGrid, limit: SolutionLimit)
            -> Vec<SolvedGrid> {
        let mut found = Vec::new();

        if limit.is_reached(0) {
            return found;
        }

        let mut frontier: Vec<SearchState> = Vec::new();
        let mut state = SearchState::prepared(grid.clone());

        loop {
            let dead_end = match propagate_to_fixpoint(&mut state) {
                Propagation::Solved => {
                    trace!(target: "solver",
                        "solution {} found with {} pending guesses",
                        found.len() + 1, frontier.len());
                    found.push(SolvedGrid {
                        grid: state.grid().clone(),
                        guesses: frontier.len()
                    });

                    if limit.is_reached(found.len()) {
                        break;
                    }

                    true
                },
                Propagation::Contradiction => true,
                Propagation::Progress => !self.branch(&mut state, &mut frontier)
            };

            if dead_end {
                match frontier.pop() {
                    Some(saved) => state = saved,
                    None => break
                }
            }
        }

        found
    }

    /// Guesses a candidate for the most constrained cell of `state`. The
    /// original state, with the guess excluded, is saved on the frontier and
    /// `state` continues with the guess committed. Returns `false` if there
    /// was nothing to guess.
    fn branch(&mut self, state: &mut SearchState,
            frontier: &mut Vec<SearchState>) -> bool {
        let cell = match state.most_constrained_cell() {
            Some(cell) => cell,
            None => return false
        };
        let options = state.candidates().iter(cell).collect::<Vec<_>>();
        let number = match options.choose(&mut self.rng) {
            Some(&number) => number,
            None => return false
        };

        trace!(target: "solver", "guessing {} in cell {} out of {:?}",
            number, cell, options);

        let mut guess = state.clone();
        guess.commit(cell, number);
        state.exclude(cell, number);
        frontier.push(std::mem::replace(state, guess));
        true
    }

    /// Indicates whether the given grid has exactly one solution. Returns
    /// `Some(true)` if so, `Some(false)` if it has several and `None` if it
    /// has none.
    pub fn has_unique_solution(&mut self, grid: &SudokuGrid) -> Option<bool> {
        match self.solutions(grid, SolutionLimit::Count(2)).len() {
            0 => None,
            1 => Some(true),
            _ => Some(false)
        }
    }
}

impl BacktrackingSolver<ChaCha8Rng> {

    /// Creates a new backtracking solver with a ChaCha random number generator
    /// seeded with the given value. Two solvers created with the same seed
    /// explore the same grid in the same order.
    pub fn seeded(seed: u64) -> BacktrackingSolver<ChaCha8Rng> {
        BacktrackingSolver::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl BacktrackingSolver<ThreadRng> {

    /// Creates a new backtracking solver that uses a [ThreadRng].
    pub fn new_default() -> BacktrackingSolver<ThreadRng> {
        BacktrackingSolver::new(rand::thread_rng())
    }
}

impl<R: Rng> Solver for BacktrackingSolver<R> {
    fn solve(&mut self, grid: &SudokuGrid) -> Solution {
        let mut solutions = self.solutions(grid, SolutionLimit::Count(2));

        match solutions.len() {
            0 => Solution::Impossible,
            1 => Solution::Unique(solutions.remove(0).grid),
            _ => Solution::Ambiguous
        }
    }
}

/// Indicates whether the given grid has exactly one solution, using a fixed
/// seed. See [BacktrackingSolver::has_unique_solution].
pub fn has_unique_solution(grid: &SudokuGrid) -> Option<bool> {
    BacktrackingSolver::seeded(0).has_unique_solution(grid)
}

#[cfg(test)]
mod tests {

    use super::*;

    fn test_solves_correctly(puzzle: &str, solution: &str) {
        let grid = SudokuGrid::parse(puzzle).unwrap();
        let mut solver = BacktrackingSolver::seeded(0);
        let found_solution = solver.solve(&grid);

        if let Solution::Unique(found) = found_solution {
            let expected_grid = SudokuGrid::parse(solution).unwrap();
            assert_eq!(expected_grid, found, "Solver gave wrong grid.");
        }
        else {
            panic!("Solveable sudoku marked as impossible or ambiguous.");
        }
    }

    // Classic puzzle from the World Puzzle Federation Sudoku Grand Prix 2020,
    // Round 8.

    #[test]
    fn backtracking_solves_classic_sudoku() {
        let puzzle = "3;\
             , , , ,8,1, , , ,\
             , ,2, , ,7,8, , ,\
             ,5,3, , , ,1,7, ,\
            3,7, , , , , , , ,\
            6, , , , , , , ,3,\
             , , , , , , ,2,4,\
             ,6,9, , , ,2,3, ,\
             , ,5,9, , ,4, , ,\
             , , ,6,5, , , , ";
        let solution = "3;\
            7,4,6,2,8,1,3,5,9,\
            9,1,2,5,3,7,8,4,6,\
            8,5,3,4,9,6,1,7,2,\
            3,7,4,1,2,5,6,9,8,\
            6,2,8,7,4,9,5,1,3,\
            5,9,1,3,6,8,7,2,4,\
            1,6,9,8,7,4,2,3,5,\
            2,8,5,9,1,3,4,6,7,\
            4,3,7,6,5,2,9,8,1";
        test_solves_correctly(puzzle, solution);
    }

    #[test]
    fn backtracking_solves_small_sudoku() {
        test_solves_correctly("2; , , ,4, ,4,3, , ,3, , , , ,1, ",
            "2;3,1,2,4,2,4,3,1,1,3,4,2,4,2,1,3");
    }

    fn sixteen_by_sixteen() -> SudokuGrid {
        SudokuGrid::parse("4;\
             1, 0, 0, 0, 0, 0, 0, 8, 9, 0,11, 0, 0, 0, 0,16,\
             5, 0, 0, 8, 9, 0,11, 0, 0,14,15,16, 0, 0, 3, 0,\
             9, 0,11, 0,13,14,15, 0, 0, 2, 0, 0, 5, 6, 7, 8,\
             0, 0, 0, 0, 0, 2, 0, 4, 0, 0, 7, 8, 9,10,11,12,\
             2, 0, 4, 5, 6, 0, 8, 9, 0, 0, 0, 0, 0,15,16, 0,\
             6, 7, 8, 0, 0, 0,12, 0, 0, 0,16, 1, 0, 3, 0, 0,\
            10,11, 0, 0,14,15,16, 1, 2, 3, 4, 5, 6, 0, 8, 9,\
            14,15, 0, 0, 2, 3, 0, 0, 6, 7, 0, 9, 0,11, 0, 0,\
             3, 0, 5, 6, 0, 0, 0,10, 0,12,13,14, 0, 0, 1, 0,\
             7, 8, 0,10,11,12, 0,14,15,16, 1, 2, 3, 0, 5, 6,\
            11,12,13, 0,15, 0, 1, 0, 3, 4, 5, 6, 7, 8, 0, 0,\
            15,16, 1, 2, 0, 4, 5, 6, 0, 0, 9, 0, 0,12, 0,14,\
             4, 5, 6, 7, 8, 9, 0, 0,12,13,14,15,16, 0, 0, 3,\
             0, 9, 0, 0,12, 0,14,15, 0, 1, 2, 0, 0, 5, 6, 7,\
            12, 0,14,15, 0, 0, 2, 0, 4, 0, 0, 0, 8, 9, 0, 0,\
            16, 0, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0,12, 0, 0,15").unwrap()
    }

    #[test]
    fn sixteen_by_sixteen_has_four_solutions() {
        let grid = sixteen_by_sixteen();
        let mut solver = BacktrackingSolver::seeded(3);
        let solutions = solver.solutions(&grid, SolutionLimit::All);

        assert_eq!(4, solutions.len());

        for (i, solution) in solutions.iter().enumerate() {
            assert!(solution.grid.is_full());
            assert!(solution.grid.is_consistent());
            assert!(grid.is_subset(&solution.grid).unwrap());

            for other in &solutions[(i + 1)..] {
                assert_ne!(solution.grid, other.grid);
            }
        }

        assert_eq!(Solution::Ambiguous, solver.solve(&grid));
        assert_eq!(Some(false), has_unique_solution(&grid));
    }

    #[test]
    fn solution_limit_is_respected() {
        let grid = sixteen_by_sixteen();
        let mut solver = BacktrackingSolver::seeded(5);

        assert_eq!(1, solver.solutions(&grid, SolutionLimit::Count(1)).len());
        assert_eq!(3, solver.solutions(&grid, SolutionLimit::Count(3)).len());
        assert_eq!(4, solver.solutions(&grid, SolutionLimit::Count(10)).len());
    }

    #[test]
    fn zero_limit_yields_nothing_even_when_solvable() {
        let grid = sixteen_by_sixteen();
        let mut solver = BacktrackingSolver::seeded(5);

        assert!(solver.solutions(&grid, SolutionLimit::Count(0)).is_empty());
        assert!(!solver.solutions(&grid, SolutionLimit::Count(1)).is_empty());
        assert!(solver.solutions(&SudokuGrid::new(2).unwrap(),
            SolutionLimit::Count(0)).is_empty());
    }

    #[test]
    fn nine_by_nine_with_ten_blanks_is_unique() {
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

        assert_eq!(Some(true), has_unique_solution(&grid));
    }

    #[test]
    fn empty_grid_is_ambiguous() {
        let grid = SudokuGrid::new(2).unwrap();
        let mut solver = BacktrackingSolver::seeded(1);

        assert_eq!(Solution::Ambiguous, solver.solve(&grid));
        assert_eq!(288, solver.solutions(&grid, SolutionLimit::All).len());
    }

    #[test]
    fn contradictory_grid_is_impossible() {
        let duplicate = SudokuGrid::parse("2;1,,,1,,,,,,,,,,,,").unwrap();
        let unfillable = SudokuGrid::parse("2;1,2,3,,,,,4,,,,,,,,").unwrap();
        let mut solver = BacktrackingSolver::seeded(2);

        assert_eq!(Solution::Impossible, solver.solve(&duplicate));
        assert_eq!(Solution::Impossible, solver.solve(&unfillable));
        assert_eq!(None, has_unique_solution(&unfillable));
        assert!(solver.solutions(&duplicate, SolutionLimit::All).is_empty());
    }

    #[test]
    fn full_grid_needs_no_guesses() {
        let grid = SudokuGrid::parse("2;3,1,2,4,2,4,3,1,1,3,4,2,4,2,1,3")
            .unwrap();
        let mut solver = BacktrackingSolver::seeded(4);
        let solutions = solver.solutions(&grid, SolutionLimit::All);

        assert_eq!(vec![SolvedGrid { grid, guesses: 0 }], solutions);
    }

    #[test]
    fn first_guess_leaves_one_pending_branch() {
        let grid = SudokuGrid::new(2).unwrap();
        let mut solver = BacktrackingSolver::seeded(6);
        let solutions = solver.solutions(&grid, SolutionLimit::Count(1));

        assert_eq!(1, solutions.len());
        assert!(solutions[0].guesses >= 1);
    }

    #[test]
    fn same_seed_gives_same_order() {
        let grid = SudokuGrid::new(2).unwrap();
        let first = BacktrackingSolver::seeded(11)
            .solutions(&grid, SolutionLimit::Count(5));
        let second = BacktrackingSolver::seeded(11)
            .solutions(&grid, SolutionLimit::Count(5));

        assert_eq!(first, second);
    }
}
