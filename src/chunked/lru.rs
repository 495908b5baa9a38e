//! Least-recently-used cache with a fixed number of slots.

use rustc_hash::FxHashMap;
use std::hash::Hash;

struct Slot<Id, Chunk> {
    id: Id,
    chunk: Chunk,
    last_used: u64,
}

/// Caches up to `capacity` chunks. On a miss with a full cache, the least
/// recently used slot is repopulated in place, so chunk storage is reused.
pub struct LruChunkCache<Id, Chunk> {
    slots: Vec<Slot<Id, Chunk>>,
    lookup: FxHashMap<Id, usize>,
    capacity: usize,
    clock: u64,
}

impl<Id: Copy + Eq + Hash, Chunk> LruChunkCache<Id, Chunk> {
    /// A cache with `capacity` slots. A capacity of zero is raised to one,
    /// since the returned chunk has to live somewhere.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            lookup: FxHashMap::default(),
            capacity,
            clock: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Return the chunk for `id`, calling `create` for a new slot and
    /// `populate` to fill it when `id` is not already cached.
    pub fn find_chunk<C, P>(&mut self, id: Id, create: C, populate: P) -> &Chunk
    where
        C: FnOnce() -> Chunk,
        P: FnOnce(Id, &mut Chunk),
    {
        self.clock += 1;

        if let Some(&s) = self.lookup.get(&id) {
            let slot = &mut self.slots[s];
            slot.last_used = self.clock;
            return &slot.chunk;
        }

        let s = if self.slots.len() < self.capacity {
            self.slots.push(Slot {
                id,
                chunk: create(),
                last_used: self.clock,
            });
            self.slots.len() - 1
        } else {
            let s = self
                .slots
                .iter()
                .enumerate()
                .min_by_key(|(_, slot)| slot.last_used)
                .map_or(0, |(s, _)| s);
            let evicted = self.slots[s].id;
            self.lookup.remove(&evicted);
            self.slots[s].id = id;
            self.slots[s].last_used = self.clock;
            s
        };
        self.lookup.insert(id, s);

        let slot = &mut self.slots[s];
        populate(id, &mut slot.chunk);
        &slot.chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_eviction_order() {
        let created = Cell::new(0);
        let populated = Cell::new(0);
        let mut cache: LruChunkCache<usize, Vec<usize>> = LruChunkCache::new(2);

        let get = |cache: &mut LruChunkCache<usize, Vec<usize>>, id: usize| -> usize {
            let chunk = cache.find_chunk(
                id,
                || {
                    created.set(created.get() + 1);
                    vec![0; 3]
                },
                |id, chunk| {
                    populated.set(populated.get() + 1);
                    chunk.fill(id * 10);
                },
            );
            chunk[0]
        };

        assert_eq!(get(&mut cache, 1), 10);
        assert_eq!(get(&mut cache, 2), 20);
        assert_eq!(get(&mut cache, 1), 10);
        assert_eq!(populated.get(), 2);

        // 2 is now the least recently used.
        assert_eq!(get(&mut cache, 3), 30);
        assert_eq!(created.get(), 2);
        assert_eq!(populated.get(), 3);
        assert_eq!(get(&mut cache, 1), 10);
        assert_eq!(populated.get(), 3);
        assert_eq!(get(&mut cache, 2), 20);
        assert_eq!(populated.get(), 4);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_single_slot() {
        let mut cache: LruChunkCache<u32, u32> = LruChunkCache::new(1);
        assert_eq!(*cache.find_chunk(5, || 0, |id, c| *c = id), 5);
        assert_eq!(*cache.find_chunk(5, || 0, |_, c| *c = 99), 5);
        assert_eq!(*cache.find_chunk(6, || 0, |id, c| *c = id), 6);
        assert_eq!(cache.capacity(), 1);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut cache: LruChunkCache<u32, u32> = LruChunkCache::new(0);
        assert_eq!(cache.capacity(), 1);
        assert_eq!(*cache.find_chunk(3, || 0, |id, c| *c = id * 2), 6);
        assert_eq!(*cache.find_chunk(4, || 0, |id, c| *c = id * 2), 8);
        assert_eq!(cache.len(), 1);
    }
}
