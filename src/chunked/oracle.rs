//! Slab cache driven by an [`Oracle`].
//!
//! Each time the current batch of predictions runs out, the cache reads
//! ahead in the oracle until every slot is claimed, keeps the slabs that are
//! needed again, and repopulates the rest. Requests are then served in
//! prediction order without any lookups.

use crate::base::Oracle;
use rustc_hash::FxHashMap;
use std::sync::Arc;

pub struct OracleSlabCache<Chunk> {
    oracle: Arc<dyn Oracle>,
    counter: usize,
    max_predictions: usize,

    /// `(slot, offset inside the slab)` for each prediction in the batch.
    predictions: Vec<(usize, usize)>,
    fulfilled: usize,

    exists: FxHashMap<usize, usize>,
    next_exists: FxHashMap<usize, usize>,
    data: Vec<Option<Chunk>>,
    next_data: Vec<Option<Chunk>>,
    in_need: Vec<(usize, usize)>,
}

impl<Chunk> OracleSlabCache<Chunk> {
    /// Cache for up to `max_slabs` slabs, reading at most `per_iteration`
    /// predictions ahead. Both limits are raised to one if zero.
    pub fn new(oracle: Arc<dyn Oracle>, per_iteration: usize, max_slabs: usize) -> Self {
        let max_slabs = max_slabs.max(1);
        Self {
            oracle,
            counter: 0,
            max_predictions: per_iteration.max(1),
            predictions: Vec::new(),
            fulfilled: 0,
            exists: FxHashMap::default(),
            next_exists: FxHashMap::default(),
            data: (0..max_slabs).map(|_| None).collect(),
            next_data: (0..max_slabs).map(|_| None).collect(),
            in_need: Vec::with_capacity(max_slabs),
        }
    }

    pub fn max_slabs(&self) -> usize {
        self.data.len()
    }

    /// Slab holding the next predicted row/column, with that row/column's
    /// offset inside the slab, or `None` once the oracle is exhausted.
    ///
    /// `identify` maps a row/column to its slab id and offset; `create`
    /// allocates an empty slab; `populate` fills a slab for an id.
    pub fn next_chunk<I, C, P>(&mut self, identify: I, mut create: C, mut populate: P) -> Option<(&Chunk, usize)>
    where
        I: Fn(usize) -> (usize, usize),
        C: FnMut() -> Chunk,
        P: FnMut(usize, &mut Chunk),
    {
        if self.fulfilled < self.predictions.len() {
            let (slot, offset) = self.predictions[self.fulfilled];
            self.fulfilled += 1;
            return self.data[slot].as_ref().map(|chunk| (chunk, offset));
        }

        self.next_exists.clear();
        self.in_need.clear();
        self.predictions.clear();
        let max_slabs = self.data.len();
        let mut used = 0;

        while self.predictions.len() < self.max_predictions && self.counter < self.oracle.total() {
            let (id, offset) = identify(self.oracle.get(self.counter));
            let slot = match self.next_exists.get(&id) {
                Some(&slot) => slot,
                None => {
                    if used == max_slabs {
                        break;
                    }
                    self.next_exists.insert(id, used);
                    match self.exists.get(&id) {
                        Some(&old) => std::mem::swap(&mut self.next_data[used], &mut self.data[old]),
                        None => self.in_need.push((id, used)),
                    }
                    used += 1;
                    used - 1
                }
            };
            self.predictions.push((slot, offset));
            self.counter += 1;
        }

        // Reuse allocations from slabs that dropped out of the batch.
        let mut search = 0;
        for &(id, slot) in &self.in_need {
            let mut chunk = match self.next_data[slot].take() {
                Some(chunk) => chunk,
                None => {
                    while search < max_slabs && self.data[search].is_none() {
                        search += 1;
                    }
                    if search < max_slabs {
                        search += 1;
                        self.data[search - 1].take().unwrap_or_else(&mut create)
                    } else {
                        create()
                    }
                }
            };
            populate(id, &mut chunk);
            self.next_data[slot] = Some(chunk);
        }

        std::mem::swap(&mut self.data, &mut self.next_data);
        std::mem::swap(&mut self.exists, &mut self.next_exists);

        let &(slot, offset) = self.predictions.first()?;
        self.fulfilled = 1;
        self.data[slot].as_ref().map(|chunk| (chunk, offset))
    }
}
