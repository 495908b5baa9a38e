//! Splitting row/column loops across a rayon thread pool.

use crate::error::{MatrixError, Result};
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::debug;

fn build_pool(threads: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| MatrixError::InvalidArgument(format!("failed to build thread pool: {}", e)))
}

/// Split `0..tasks` into at most `threads` contiguous jobs.
///
/// Returns `(start, length)` for each job; empty jobs are never produced.
pub fn split_tasks(tasks: usize, threads: usize) -> Vec<(usize, usize)> {
    if tasks == 0 {
        return Vec::new();
    }
    let threads = threads.max(1);
    let per_worker = tasks.div_ceil(threads);
    let mut jobs = Vec::with_capacity(threads);
    let mut start = 0;
    while start < tasks {
        let length = per_worker.min(tasks - start);
        jobs.push((start, length));
        start += length;
    }
    jobs
}

/// Run `fun(worker, start, length)` over contiguous jobs covering `0..tasks`.
///
/// With one thread (or one job) everything runs on the calling thread.
/// The first error from any worker is returned.
pub fn parallelize<F>(fun: F, tasks: usize, threads: usize) -> Result<()>
where
    F: Fn(usize, usize, usize) -> Result<()> + Sync,
{
    let jobs = split_tasks(tasks, threads);
    if jobs.len() <= 1 {
        if let Some(&(start, length)) = jobs.first() {
            fun(0, start, length)?;
        }
        return Ok(());
    }

    debug!("Parallelizing {} tasks over {} workers", tasks, jobs.len());
    let pool = build_pool(jobs.len())?;
    pool.install(|| {
        jobs.par_iter()
            .enumerate()
            .try_for_each(|(worker, &(start, length))| fun(worker, start, length))
    })
}

/// Like [`parallelize`] but each job returns a value; results come back in
/// job order, so concatenating them follows `0..tasks`.
pub fn parallelize_map<R, F>(fun: F, tasks: usize, threads: usize) -> Result<Vec<R>>
where
    R: Send,
    F: Fn(usize, usize, usize) -> Result<R> + Sync,
{
    let jobs = split_tasks(tasks, threads);
    if jobs.len() <= 1 {
        return jobs
            .iter()
            .map(|&(start, length)| fun(0, start, length))
            .collect();
    }

    debug!("Mapping {} tasks over {} workers", tasks, jobs.len());
    let pool = build_pool(jobs.len())?;
    pool.install(|| {
        jobs.par_iter()
            .enumerate()
            .map(|(worker, &(start, length))| fun(worker, start, length))
            .collect()
    })
}

/// Fill `output` in parallel, handing each worker its own contiguous chunk.
///
/// `fun(start, chunk)` receives the offset of `chunk` within `output`.
pub fn parallelize_into<O, F>(output: &mut [O], threads: usize, fun: F) -> Result<()>
where
    O: Send,
    F: Fn(usize, &mut [O]) -> Result<()> + Sync,
{
    parallelize_blocks(output, 1, threads, fun)
}

/// Like [`parallelize_into`] but chunks always hold whole blocks of `stride`
/// elements, e.g. whole rows of a row-major array.
///
/// `fun(start, chunk)` receives the index of the first block in `chunk`.
pub fn parallelize_blocks<O, F>(output: &mut [O], stride: usize, threads: usize, fun: F) -> Result<()>
where
    O: Send,
    F: Fn(usize, &mut [O]) -> Result<()> + Sync,
{
    if stride == 0 || output.is_empty() {
        return Ok(());
    }
    let blocks = output.len() / stride;
    let jobs = split_tasks(blocks, threads);
    if jobs.len() <= 1 {
        return fun(0, output);
    }

    let per_worker = jobs[0].1;
    debug!("Parallelizing {} blocks over {} workers", blocks, jobs.len());
    let pool = build_pool(jobs.len())?;
    pool.install(|| {
        output
            .par_chunks_mut(per_worker * stride)
            .enumerate()
            .try_for_each(|(w, chunk)| fun(w * per_worker, chunk))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_split_tasks() {
        assert_eq!(split_tasks(10, 3), vec![(0, 4), (4, 4), (8, 2)]);
        assert_eq!(split_tasks(2, 5), vec![(0, 1), (1, 1)]);
        assert!(split_tasks(0, 5).is_empty());
        assert_eq!(split_tasks(7, 0), vec![(0, 7)]);
    }

    #[test]
    fn test_parallelize_covers_all_tasks() {
        let total = AtomicUsize::new(0);
        parallelize(
            |_, start, length| {
                total.fetch_add((start..start + length).sum::<usize>(), Ordering::SeqCst);
                Ok(())
            },
            100,
            4,
        )
        .unwrap();
        assert_eq!(total.load(Ordering::SeqCst), (0..100).sum::<usize>());
    }

    #[test]
    fn test_parallelize_propagates_errors() {
        let res = parallelize(
            |worker, _, _| {
                if worker == 1 {
                    Err(MatrixError::InvalidArgument("boom".to_string()))
                } else {
                    Ok(())
                }
            },
            10,
            3,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_parallelize_map_preserves_order() {
        let parts = parallelize_map(|_, start, length| Ok((start..start + length).collect::<Vec<_>>()), 23, 4)
            .unwrap();
        assert_eq!(parts.len(), 4);
        let flat: Vec<usize> = parts.into_iter().flatten().collect();
        assert_eq!(flat, (0..23).collect::<Vec<_>>());
    }

    #[test]
    fn test_parallelize_into() {
        let mut output = vec![0usize; 11];
        parallelize_into(&mut output, 3, |start, chunk| {
            for (i, o) in chunk.iter_mut().enumerate() {
                *o = start + i;
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(output, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn test_parallelize_blocks_keeps_rows_whole() {
        let mut output = vec![0usize; 5 * 3];
        parallelize_blocks(&mut output, 3, 2, |start, chunk| {
            assert_eq!(chunk.len() % 3, 0);
            for (r, row) in chunk.chunks_mut(3).enumerate() {
                row.fill(start + r);
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(output, vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);
    }
}
