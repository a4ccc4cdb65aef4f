//! Naked-single propagation: every empty cell with exactly one remaining
//! candidate is filled in, repeatedly, until nothing changes.

use crate::solver::state::SearchState;

/// The status of a [SearchState] after propagating to a fixpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Propagation {

    /// No more forced cells exist, but some cells are still undecided. The
    /// search has to guess to continue.
    Progress,

    /// Some cell has no candidates left, so the state has no solution.
    Contradiction,

    /// Every cell is filled and no contradiction was found.
    Solved
}

/// Runs a single pass over all cells in left-to-right, top-to-bottom order and
/// commits every empty cell that has exactly one candidate. Commits made
/// during the pass are visible to the cells after it. If `initial` is set,
/// every filled cell is committed again as well, which removes the clues of a
/// fresh grid from the candidates of their peers.
///
/// Returns `true` if any empty cell was filled.
pub fn propagate_once(state: &mut SearchState, initial: bool) -> bool {
    let mut changed = false;

    for cell in 0..state.grid().cells().len() {
        match state.grid().cells()[cell] {
            Some(number) => {
                if initial {
                    state.commit(cell, number);
                }
            },
            None => {
                if let Some(number) = state.candidates().single(cell) {
                    state.commit(cell, number);
                    changed = true;
                }
            }
        }
    }

    changed
}

/// Repeats [propagate_once] (not initial) until a pass fills no cell, then
/// classifies the resulting state. A contradiction is reported even if the
/// grid is full.
pub fn propagate_to_fixpoint(state: &mut SearchState) -> Propagation {
    while propagate_once(state, false) { }

    if state.has_contradiction() {
        Propagation::Contradiction
    }
    else if state.grid().is_full() {
        Propagation::Solved
    }
    else {
        Propagation::Progress
    }
}
