//! In-memory transposition of contiguous arrays.

/// Transpose a row-major `nrow x ncol` array into a row-major `ncol x nrow` array.
///
/// Works in square tiles to keep both the reads and the writes cache-friendly.
pub fn transpose<T: Copy>(input: &[T], nrow: usize, ncol: usize, output: &mut [T]) {
    debug_assert_eq!(input.len(), nrow * ncol);
    debug_assert_eq!(output.len(), nrow * ncol);

    if nrow == 1 || ncol == 1 {
        output.copy_from_slice(input);
        return;
    }

    const TILE: usize = 16;
    let mut r0 = 0;
    while r0 < nrow {
        let r1 = (r0 + TILE).min(nrow);
        let mut c0 = 0;
        while c0 < ncol {
            let c1 = (c0 + TILE).min(ncol);
            for r in r0..r1 {
                let in_row = r * ncol;
                for c in c0..c1 {
                    output[c * nrow + r] = input[in_row + c];
                }
            }
            c0 = c1;
        }
        r0 = r1;
    }
}
