//! Predictions of future access patterns.

/// Predicts the sequence of rows/columns that will be requested.
pub trait Oracle: Send + Sync {
    /// Number of predictions available.
    fn total(&self) -> usize;

    /// The `i`-th predicted row/column, for `i < total()`.
    fn get(&self, i: usize) -> usize;
}

/// Predicts access to a contiguous run `[start, start + length)`.
#[derive(Debug, Clone, Copy)]
pub struct ConsecutiveOracle {
    start: usize,
    length: usize,
}

impl ConsecutiveOracle {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }
}

impl Oracle for ConsecutiveOracle {
    fn total(&self) -> usize {
        self.length
    }

    fn get(&self, i: usize) -> usize {
        debug_assert!(i < self.length);
        self.start + i
    }
}

/// Predicts access to an explicit sequence of rows/columns.
#[derive(Debug, Clone)]
pub struct FixedOracle {
    sequence: Vec<usize>,
}

impl FixedOracle {
    pub fn new(sequence: Vec<usize>) -> Self {
        Self { sequence }
    }
}

impl Oracle for FixedOracle {
    fn total(&self) -> usize {
        self.sequence.len()
    }

    fn get(&self, i: usize) -> usize {
        self.sequence[i]
    }
}
