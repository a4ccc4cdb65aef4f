//! This module contains logic for generating random Sudoku.
//!
//! Generation of Sudoku puzzles is done by first generating a full grid with a
//! [Generator] and then removing clues using a [Reducer]. Whether a set of
//! clues can be removed is decided by [can_remove].

use crate::SudokuGrid;
use crate::error::{SudokuError, SudokuResult};
use crate::record::PuzzleRecord;
use crate::solver::{BacktrackingSolver, Solution, SolutionLimit, Solver};

use log::{debug, trace, warn};

use rand::{Rng, SeedableRng};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;

use rand_chacha::ChaCha8Rng;

use serde::{Deserialize, Serialize};

use std::time::{Duration, Instant};

/// A generator randomly generates a full [SudokuGrid], that is, a grid with no
/// missing digits that satisfies the Sudoku rules. It uses a random number
/// generator to decide the content. For most cases, sensible defaults are
/// provided by [Generator::new_default].
pub struct Generator<R: Rng> {
    rng: R
}

impl Generator<ThreadRng> {

    /// Creates a new generator that uses a [ThreadRng] to generate the random
    /// digits.
    pub fn new_default() -> Generator<ThreadRng> {
        Generator::new(rand::thread_rng())
    }
}

impl Generator<ChaCha8Rng> {

    /// Creates a new generator with a ChaCha random number generator seeded
    /// with the given value. Generators created with the same seed produce the
    /// same grids.
    pub fn seeded(seed: u64) -> Generator<ChaCha8Rng> {
        Generator::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// A puzzle produced by [Generator::generate_puzzle].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedPuzzle {

    /// The full grid the puzzle was reduced from, which is also its solution.
    pub solution: SudokuGrid,

    /// The result of reducing `solution`.
    pub outcome: ReductionOutcome,

    /// The record describing the reduced puzzle.
    pub record: PuzzleRecord
}

impl<R: Rng> Generator<R> {

    /// Creates a new generator that uses the given random number generator to
    /// generate random digits.
    pub fn new(rng: R) -> Generator<R> {
        Generator {
            rng
        }
    }

    /// Generates a new random full grid with blocks of the given size. The top
    /// row is filled with a random permutation of all numbers, the rest is
    /// completed by a [BacktrackingSolver] driven by the same random number
    /// generator.
    ///
    /// It is guaranteed that the result is full and consistent.
    ///
    /// # Errors
    ///
    /// * `SudokuError::InvalidDimensions` If `block_size` is zero.
    /// * `SudokuError::Unsolvable` If the solver does not complete the grid,
    /// which does not happen for valid block sizes.
    pub fn generate_solved(&mut self, block_size: usize)
            -> SudokuResult<SudokuGrid> {
        let mut grid = SudokuGrid::new(block_size)?;
        let size = grid.size();
        let mut top_row = (1..=size).collect::<Vec<_>>();
        top_row.shuffle(&mut self.rng);

        for (column, &number) in top_row.iter().enumerate() {
            grid.set_cell(column, 0, number)?;
        }

        let mut solver = BacktrackingSolver::new(&mut self.rng);
        let solved = solver.solutions(&grid, SolutionLimit::Count(1))
            .into_iter()
            .next()
            .ok_or(SudokuError::Unsolvable)?;

        debug!(target: "generator", "generated full {}x{} grid with {} guesses",
            size, size, solved.guesses);
        Ok(solved.grid)
    }

    /// Generates a full grid, reduces it with the given configuration and
    /// describes the result in a [PuzzleRecord]. The reducer and the solver
    /// computing the complexity use random number generators seeded from the
    /// one of this generator, so a seeded generator yields the same puzzle
    /// whenever the reduction is not cut short by the time budget.
    ///
    /// # Errors
    ///
    /// * `SudokuError::InvalidDimensions` If `block_size` is zero.
    /// * `SudokuError::InvalidProportion` If a proportion in `config` is not
    /// in `[0, 1]`.
    /// * `SudokuError::Unsolvable` If the reduced grid turns out to have no
    /// solution.
    pub fn generate_puzzle(&mut self, block_size: usize,
            config: &ReducerConfig) -> SudokuResult<GeneratedPuzzle> {
        let solution = self.generate_solved(block_size)?;
        let solver = BacktrackingSolver::new(
            ChaCha8Rng::seed_from_u64(self.rng.gen()));
        let mut reducer =
            Reducer::new(solver, ChaCha8Rng::seed_from_u64(self.rng.gen()));
        let outcome = reducer.reduce(&solution, config)?;
        let mut complexity_solver = BacktrackingSolver::new(
            ChaCha8Rng::seed_from_u64(self.rng.gen()));
        let record =
            PuzzleRecord::from_puzzle(&outcome.grid, &mut complexity_solver)?;

        Ok(GeneratedPuzzle {
            solution,
            outcome,
            record
        })
    }
}

/// The verdict of [can_remove] on a set of clues.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Removability {

    /// The grid still has a unique solution without the clues.
    Removable,

    /// Without the clues, the grid has several solutions.
    NotRemovable
}

/// Checks whether the clues at the given positions, specified as
/// `(column, row)` pairs, can be removed from `grid` without it losing its
/// unique solution. The grid itself is not changed. Removing no clues at all
/// is always possible for a uniquely solvable grid.
///
/// # Errors
///
/// * `SudokuError::OutOfBounds` If some position lies outside the grid.
/// * `SudokuError::Unsolvable` If the grid without the clues has no solution.
/// This can only happen if `grid` itself has none.
pub fn can_remove<S: Solver>(solver: &mut S, grid: &SudokuGrid,
        positions: &[(usize, usize)]) -> SudokuResult<Removability> {
    let mut reduced = grid.clone();

    for &(column, row) in positions {
        reduced.clear_cell(column, row)?;
    }

    classify(solver, &reduced)
}

fn can_remove_cells<S: Solver>(solver: &mut S, grid: &SudokuGrid,
        cells: &[usize]) -> SudokuResult<Removability> {
    let mut reduced = grid.clone();

    for &cell in cells {
        reduced.clear_index(cell);
    }

    classify(solver, &reduced)
}

fn classify<S: Solver>(solver: &mut S, grid: &SudokuGrid)
        -> SudokuResult<Removability> {
    match solver.solve(grid) {
        Solution::Unique(_) => Ok(Removability::Removable),
        Solution::Ambiguous => Ok(Removability::NotRemovable),
        Solution::Impossible => Err(SudokuError::Unsolvable)
    }
}

/// Configuration of a [Reducer] run.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ReducerConfig {

    /// The proportion of cells that should be empty in the reduced grid. The
    /// reducer stops as soon as at most `floor((1 - target_missing) · cells)`
    /// clues remain.
    pub target_missing: f64,

    /// The smallest acceptable proportion of empty cells. It does not steer
    /// the reduction, but is reported as [ReductionOutcome::meets_minimum].
    pub min_missing: f64,

    /// The wall-clock time after which the reducer returns the best grid found
    /// so far. It is checked between removal attempts, so a run may take
    /// slightly longer.
    pub time_budget: Duration,

    /// How many random sets of cells of the same size are tried before the
    /// size of removal batches is halved.
    pub batch_attempts: usize,

    /// If set, the time budget is only respected after at least one grid was
    /// reduced until no further clue could be removed.
    pub finish_local_minimum: bool
}

impl Default for ReducerConfig {
    fn default() -> ReducerConfig {
        ReducerConfig {
            target_missing: 0.5,
            min_missing: 0.0,
            time_budget: Duration::from_secs(10),
            batch_attempts: 5,
            finish_local_minimum: false
        }
    }
}

fn check_proportion(proportion: f64) -> SudokuResult<()> {
    if (0.0..=1.0).contains(&proportion) {
        Ok(())
    }
    else {
        Err(SudokuError::InvalidProportion)
    }
}

/// The result of [Reducer::reduce].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReductionOutcome {

    /// Whether `grid` has at most as many clues as the target proportion
    /// allows and was verified to have a unique solution.
    pub success: bool,

    /// Whether the proportion of empty cells in `grid` is at least the
    /// configured minimum.
    pub meets_minimum: bool,

    /// The grid with the fewest clues found.
    pub grid: SudokuGrid,

    /// The number of times a grid was reduced until no further clue could be
    /// removed.
    pub local_minima: usize
}

/// A reducer can be applied to the output of a [Generator] to remove numbers
/// from the grid as long as it is still uniquely solveable using the provided
/// [Solver]. A random number generator decides which digits are removed.
///
/// [Reducer::new_default] will yield a reducer with a [BacktrackingSolver] and
/// a [ThreadRng].
pub struct Reducer<S: Solver, R: Rng> {
    solver: S,
    rng: R
}

impl Reducer<BacktrackingSolver<ThreadRng>, ThreadRng> {

    /// Generates a new reducer with a [BacktrackingSolver] to check unique
    /// solveability and a [ThreadRng] to decide which digits are removed.
    pub fn new_default() -> Reducer<BacktrackingSolver<ThreadRng>, ThreadRng> {
        Reducer::new(BacktrackingSolver::new_default(), rand::thread_rng())
    }
}

impl Reducer<BacktrackingSolver<ChaCha8Rng>, ChaCha8Rng> {

    /// Generates a new reducer whose solver and removal choices are driven by
    /// ChaCha random number generators derived from the given seed.
    pub fn seeded(seed: u64)
            -> Reducer<BacktrackingSolver<ChaCha8Rng>, ChaCha8Rng> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let solver = BacktrackingSolver::seeded(rng.gen());
        Reducer::new(solver, rng)
    }
}

impl<S: Solver, R: Rng> Reducer<S, R> {

    /// Creates a new reducer with the given solver and random number
    /// generator.
    ///
    /// # Arguments
    ///
    /// * `solver`: A [Solver] to be used to check whether a reduced grid is
    /// still uniquely solveable.
    /// * `rng`: A random number generator that decides which digits are
    /// removed.
    pub fn new(solver: S, rng: R) -> Reducer<S, R> {
        Reducer {
            solver,
            rng
        }
    }

    /// Removes clues from `full` while keeping its solution unique, until at
    /// most `floor((1 - target_missing) · cells)` clues remain or the time
    /// budget is used up.
    ///
    /// Clues are first removed in random batches. Every cell that was
    /// removed, or whose removal failed on its own, is not considered again.
    /// Once no cell is left to try, the grid is a local minimum; it is
    /// remembered if it has fewer clues than the best grid so far, and the
    /// reduction starts over from `full`. The returned grid is the one with
    /// the fewest clues seen, which is `full` itself if nothing could be
    /// removed in time.
    ///
    /// # Errors
    ///
    /// * `SudokuError::InvalidProportion` If `target_missing` or `min_missing`
    /// is not in `[0, 1]`.
    /// * `SudokuError::Unsolvable` If `full` has no solution.
    pub fn reduce(&mut self, full: &SudokuGrid, config: &ReducerConfig)
            -> SudokuResult<ReductionOutcome> {
        check_proportion(config.target_missing)?;
        check_proportion(config.min_missing)?;

        if let Solution::Impossible = self.solver.solve(full) {
            return Err(SudokuError::Unsolvable);
        }

        let start = Instant::now();
        let cells = full.cells().len();
        let target = ((1.0 - config.target_missing) * cells as f64).floor()
            as usize;
        let initial_batch = ((cells - target.min(cells)) / 2).max(1);
        let filled = || full.cells().iter()
            .enumerate()
            .filter(|(_, c)| c.is_some())
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        let mut best = full.clone();
        let mut current = full.clone();
        let mut removable = filled();
        let mut batch = initial_batch;
        let mut local_minima = 0;

        loop {
            if current.count_clues() <= target {
                break;
            }

            let waiting_for_minimum =
                config.finish_local_minimum && local_minima == 0;

            if !waiting_for_minimum && start.elapsed() >= config.time_budget {
                debug!(target: "reducer", "time budget of {:?} used up",
                    config.time_budget);
                break;
            }

            if removable.is_empty() {
                local_minima += 1;
                debug!(target: "reducer",
                    "local minimum {} with {} clues, restarting",
                    local_minima, current.count_clues());

                if current.count_clues() < best.count_clues() {
                    best = current;
                }

                current = full.clone();
                removable = filled();
                batch = initial_batch;
                continue;
            }

            let excess = current.count_clues() - target;
            batch = batch.min(removable.len()).min(excess).max(1);

            if batch > 1 {
                self.remove_batch(&mut current, &mut removable, &mut batch,
                    config.batch_attempts)?;
            }
            else {
                self.remove_single(&mut current, &mut removable)?;
            }
        }

        if current.count_clues() < best.count_clues() {
            best = current;
        }

        let clues = best.count_clues();
        let verified = match self.solver.solve(&best) {
            Solution::Unique(solution) => full.is_subset(&solution)?,
            Solution::Ambiguous => false,
            Solution::Impossible => return Err(SudokuError::Unsolvable)
        };

        if !verified {
            warn!(target: "reducer",
                "reduced grid does not have the original solution:\n{}\n\
                initial grid:\n{}", best, full);
        }

        let proportion = clues as f64 / cells as f64;

        Ok(ReductionOutcome {
            success: verified && clues <= target,
            meets_minimum: proportion <= 1.0 - config.min_missing,
            grid: best,
            local_minima
        })
    }

    fn remove_batch(&mut self, current: &mut SudokuGrid,
            removable: &mut Vec<usize>, batch: &mut usize, attempts: usize)
            -> SudokuResult<()> {
        for _ in 0..attempts {
            let cells = removable.choose_multiple(&mut self.rng, *batch)
                .copied()
                .collect::<Vec<_>>();

            if can_remove_cells(&mut self.solver, current, &cells)?
                    == Removability::Removable {
                trace!(target: "reducer", "removed batch of {} clues",
                    cells.len());

                for &cell in &cells {
                    current.clear_index(cell);
                }

                removable.retain(|cell| !cells.contains(cell));
                return Ok(());
            }
        }

        *batch /= 2;
        Ok(())
    }

    fn remove_single(&mut self, current: &mut SudokuGrid,
            removable: &mut Vec<usize>) -> SudokuResult<()> {
        let index = self.rng.gen_range(0..removable.len());
        let cell = removable.swap_remove(index);

        if can_remove_cells(&mut self.solver, current, &[cell])?
                == Removability::Removable {
            current.clear_index(cell);
        }

        Ok(())
    }
}
