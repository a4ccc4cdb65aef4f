//! This module contains utility functionality needed for this crate. Most
//! prominently, it contains the definition of the [CandidateSet] used for
//! storing which numbers may still go into each cell during a search.

use std::slice::Iter;

const WORD_BITS: usize = 64;

/// The candidate cube of a grid: for every cell and every number in
/// `[1, size]` one bit indicating whether the number is still legal in that
/// cell. Bit 0 of every cell is never set, so candidates can be addressed by
/// the number itself.
///
/// Cells are addressed by their index in left-to-right, top-to-bottom order,
/// just like [SudokuGrid::cells](crate::SudokuGrid::cells). All methods that
/// take a cell index panic if it is not less than `size²`.
///
/// Cloning a `CandidateSet` copies all words, so a clone never aliases the
/// bits of the original.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CandidateSet {
    size: usize,
    words_per_cell: usize,
    content: Vec<u64>
}

/// An iterator over the candidates of one cell in a [CandidateSet], in
/// ascending order.
pub struct CandidateIter<'a> {
    offset: usize,
    current: u64,
    words: Iter<'a, u64>
}

impl<'a> Iterator for CandidateIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.current = *self.words.next()?;
            self.offset += WORD_BITS;
        }

        let bit_index = self.current.trailing_zeros() as usize;
        self.current &= self.current - 1;
        Some(self.offset + bit_index)
    }
}

fn compute_index(number: usize) -> (usize, u64) {
    (number / WORD_BITS, 1u64 << (number % WORD_BITS))
}

impl CandidateSet {

    /// Creates a new candidate set for a grid of the given size (numbers
    /// `1..=size`) in which every number is a candidate for every cell.
    pub fn full(size: usize) -> CandidateSet {
        let words_per_cell = (size + WORD_BITS) / WORD_BITS;
        let mut cell = vec![0u64; words_per_cell];

        for number in 1..=size {
            let (word_index, mask) = compute_index(number);
            cell[word_index] |= mask;
        }

        let cells = size * size;
        let mut content = Vec::with_capacity(cells * words_per_cell);

        for _ in 0..cells {
            content.extend_from_slice(&cell);
        }

        CandidateSet {
            size,
            words_per_cell,
            content
        }
    }

    /// Gets the size of the grid this set belongs to, which is also the
    /// largest possible candidate.
    pub fn size(&self) -> usize {
        self.size
    }

    fn words(&self, cell: usize) -> &[u64] {
        let start = cell * self.words_per_cell;
        &self.content[start..(start + self.words_per_cell)]
    }

    fn words_mut(&mut self, cell: usize) -> &mut [u64] {
        let start = cell * self.words_per_cell;
        &mut self.content[start..(start + self.words_per_cell)]
    }

    /// Indicates whether `number` is still a candidate for the given cell.
    /// Numbers outside `[1, size]` are never candidates.
    pub fn contains(&self, cell: usize, number: usize) -> bool {
        if number == 0 || number > self.size {
            return false;
        }

        let (word_index, mask) = compute_index(number);
        self.words(cell)[word_index] & mask != 0
    }

    /// Removes `number` from the candidates of the given cell. Returns `true`
    /// if the set changed, that is, if `number` was a candidate before.
    pub fn remove(&mut self, cell: usize, number: usize) -> bool {
        if !self.contains(cell, number) {
            return false;
        }

        let (word_index, mask) = compute_index(number);
        self.words_mut(cell)[word_index] &= !mask;
        true
    }

    /// Makes `number` the one and only candidate of the given cell.
    ///
    /// # Panics
    ///
    /// If `number` is 0 or greater than the size.
    pub fn fix(&mut self, cell: usize, number: usize) {
        assert!(number >= 1 && number <= self.size,
            "candidate {} out of range", number);
        let (word_index, mask) = compute_index(number);
        let words = self.words_mut(cell);

        for word in words.iter_mut() {
            *word = 0;
        }

        words[word_index] = mask;
    }

    /// Counts the candidates remaining for the given cell.
    pub fn count(&self, cell: usize) -> usize {
        self.words(cell).iter()
            .map(|w| w.count_ones() as usize)
            .sum()
    }

    /// Returns the only candidate of the given cell, or `None` if there are
    /// zero or several.
    pub fn single(&self, cell: usize) -> Option<usize> {
        let mut iter = self.iter(cell);
        let first = iter.next()?;

        if iter.next().is_none() { Some(first) } else { None }
    }

    /// Returns an iterator over the candidates of the given cell in ascending
    /// order.
    pub fn iter(&self, cell: usize) -> CandidateIter<'_> {
        let mut words = self.words(cell).iter();
        let current = words.next().copied().unwrap_or(0);

        CandidateIter {
            offset: 0,
            current,
            words
        }
    }
}
