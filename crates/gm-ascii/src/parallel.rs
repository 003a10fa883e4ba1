//! Rendu par blocs de lignes (fork–join).
//!
//! La grille est découpée en plages contiguës `[start, end)`, une par
//! worker. Chaque worker écrit dans sa propre `String` ; les blocs sont
//! concaténés dans l'ordre des workers une fois tous terminés.

use std::ops::Range;

use gm_core::charset::Palette;
use gm_core::error::CoreError;
use gm_core::frame::LuminanceGrid;
use rayon::prelude::*;

use crate::luminance::{render_rows, text_capacity};

/// Available hardware parallelism, or 1 if it cannot be determined.
///
/// # Example
/// ```
/// use gm_ascii::parallel::default_worker_count;
/// assert!(default_worker_count() >= 1);
/// ```
#[must_use]
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// Split `[0, rows)` into `workers` contiguous ranges.
///
/// Each worker gets `rows / workers` rows; the last one also takes the
/// remainder. With more workers than rows, the leading ranges are empty.
///
/// # Errors
/// Returns [`CoreError::InvalidWorkerCount`] if `workers == 0`.
///
/// # Example
/// ```
/// use gm_ascii::parallel::partition_rows;
/// assert_eq!(partition_rows(10, 3).unwrap(), vec![0..3, 3..6, 6..10]);
/// assert_eq!(partition_rows(2, 3).unwrap(), vec![0..0, 0..0, 0..2]);
/// ```
pub fn partition_rows(rows: usize, workers: usize) -> Result<Vec<Range<usize>>, CoreError> {
    if workers == 0 {
        return Err(CoreError::InvalidWorkerCount);
    }
    let per_worker = rows / workers;
    Ok((0..workers)
        .map(|i| {
            let start = i * per_worker;
            let end = if i == workers - 1 {
                rows
            } else {
                (i + 1) * per_worker
            };
            start..end
        })
        .collect())
}

/// Render `grid` with `workers` independent row chunks.
///
/// Byte-identical to [`crate::luminance::render_text`] for every
/// `workers >= 1`. The grid and palette are only borrowed: workers never
/// write to shared state. The first chunk error fails the whole call.
///
/// # Errors
/// Returns [`CoreError::InvalidWorkerCount`] for zero workers, or the
/// error of a failing chunk.
///
/// # Example
/// ```
/// use gm_core::charset::Palette;
/// use gm_core::frame::LuminanceGrid;
/// use gm_ascii::luminance::render_text;
/// use gm_ascii::parallel::render_parallel;
///
/// let palette = Palette::new(" .:#@").unwrap();
/// let grid = LuminanceGrid::new(2, 3, vec![0, 50, 100, 150, 200, 255]).unwrap();
/// assert_eq!(render_parallel(&grid, &palette, 2).unwrap(), render_text(&grid, &palette));
/// ```
pub fn render_parallel(
    grid: &LuminanceGrid,
    palette: &Palette,
    workers: usize,
) -> Result<String, CoreError> {
    let chunks = partition_rows(grid.height(), workers)?;
    log::debug!(
        "Rendu parallèle : {} lignes, {workers} workers",
        grid.height()
    );

    let rendered = chunks
        .into_par_iter()
        .map(|rows| render_rows(grid, palette, rows))
        .collect::<Result<Vec<String>, CoreError>>()?;

    let mut out = String::with_capacity(text_capacity(grid.width(), grid.height(), palette));
    for chunk in &rendered {
        out.push_str(chunk);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::luminance::render_text;
    use gm_core::charset::CharsetPreset;

    fn noise(width: usize, height: usize) -> LuminanceGrid {
        // LCG: deterministic, covers the full sample range.
        let mut state = 0x2545_f491_u32;
        let data = (0..width * height)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
                (state >> 16) as u8
            })
            .collect();
        LuminanceGrid::new(width, height, data).unwrap()
    }

    #[test]
    fn partition_covers_every_row_once() {
        for rows in [0usize, 1, 7, 100, 101, 257] {
            for workers in 1..=rows + 6 {
                let ranges = partition_rows(rows, workers).unwrap();
                assert_eq!(ranges.len(), workers);
                let mut next = 0;
                for r in &ranges {
                    assert_eq!(r.start, next, "rows={rows} workers={workers}");
                    assert!(r.start <= r.end);
                    next = r.end;
                }
                assert_eq!(next, rows);
            }
        }
    }

    #[test]
    fn last_worker_absorbs_remainder() {
        let ranges = partition_rows(103, 4).unwrap();
        assert_eq!(ranges, vec![0..25, 25..50, 50..75, 75..103]);
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(matches!(
            partition_rows(10, 0),
            Err(CoreError::InvalidWorkerCount)
        ));
        let grid = noise(4, 4);
        let palette = Palette::preset(CharsetPreset::Simple);
        assert!(render_parallel(&grid, &palette, 0).is_err());
    }

    #[test]
    fn parallel_matches_sequential() {
        let grid = noise(83, 131);
        let hardware = default_worker_count();
        for preset in [
            CharsetPreset::Simple,
            CharsetPreset::Detailed,
            CharsetPreset::Blocks,
        ] {
            let palette = Palette::preset(preset);
            let expected = render_text(&grid, &palette);
            for workers in [1, 2, 3, hardware, grid.height() + 5] {
                let got = render_parallel(&grid, &palette, workers).unwrap();
                assert_eq!(got, expected, "{preset:?} avec {workers} workers");
            }
        }
    }

    #[test]
    fn parallel_on_empty_grid() {
        let grid = LuminanceGrid::new(0, 0, Vec::new()).unwrap();
        let palette = Palette::preset(CharsetPreset::Detailed);
        assert_eq!(render_parallel(&grid, &palette, 4).unwrap(), "");
    }
}
