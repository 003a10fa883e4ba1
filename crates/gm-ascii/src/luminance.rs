use std::ops::Range;

use gm_core::charset::Palette;
use gm_core::error::CoreError;
use gm_core::frame::LuminanceGrid;

/// Render a whole luminance grid as text, one glyph per sample.
///
/// Row-major, `\n` after each row. Single-threaded and deterministic.
///
/// # Example
/// ```
/// use gm_core::charset::Palette;
/// use gm_core::frame::LuminanceGrid;
/// use gm_ascii::luminance::render_text;
///
/// let palette = Palette::new(" .:#@").unwrap();
/// let grid = LuminanceGrid::new(3, 2, vec![0, 128, 255, 255, 128, 0]).unwrap();
/// assert_eq!(render_text(&grid, &palette), " :@\n@: \n");
/// ```
#[must_use]
pub fn render_text(grid: &LuminanceGrid, palette: &Palette) -> String {
    let mut out = String::with_capacity(text_capacity(grid.width(), grid.height(), palette));
    push_rows(&mut out, grid, palette, 0..grid.height());
    out
}

/// Render the half-open row range `rows` of `grid` into a private string.
///
/// This is the body each parallel worker runs.
///
/// # Errors
/// Returns [`CoreError::RowRange`] if the range is reversed or extends
/// past the last row.
///
/// # Example
/// ```
/// use gm_core::charset::Palette;
/// use gm_core::frame::LuminanceGrid;
/// use gm_ascii::luminance::render_rows;
///
/// let palette = Palette::new(" #").unwrap();
/// let grid = LuminanceGrid::new(2, 3, vec![0, 0, 255, 255, 0, 255]).unwrap();
/// assert_eq!(render_rows(&grid, &palette, 1..3).unwrap(), "##\n #\n");
/// assert!(render_rows(&grid, &palette, 2..4).is_err());
/// ```
pub fn render_rows(
    grid: &LuminanceGrid,
    palette: &Palette,
    rows: Range<usize>,
) -> Result<String, CoreError> {
    if rows.start > rows.end || rows.end > grid.height() {
        return Err(CoreError::RowRange {
            start: rows.start,
            end: rows.end,
            rows: grid.height(),
        });
    }
    let mut out = String::with_capacity(text_capacity(grid.width(), rows.len(), palette));
    push_rows(&mut out, grid, palette, rows);
    Ok(out)
}

/// Bytes needed for `rows` lines of `cols` glyphs plus newlines.
#[inline]
pub(crate) fn text_capacity(cols: usize, rows: usize, palette: &Palette) -> usize {
    rows * (cols * palette.max_utf8_len() + 1)
}

fn push_rows(out: &mut String, grid: &LuminanceGrid, palette: &Palette, rows: Range<usize>) {
    for y in rows {
        for &sample in grid.row(y) {
            out.push(palette.map(sample));
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::charset::CharsetPreset;

    fn gradient(width: usize, height: usize) -> LuminanceGrid {
        let data = (0..width * height).map(|i| (i * 7 % 256) as u8).collect();
        LuminanceGrid::new(width, height, data).unwrap()
    }

    #[test]
    fn output_dimensions_match_grid() {
        let grid = gradient(37, 11);
        for preset in [
            CharsetPreset::Simple,
            CharsetPreset::Detailed,
            CharsetPreset::Blocks,
        ] {
            let text = render_text(&grid, &Palette::preset(preset));
            assert!(text.ends_with('\n'));
            let lines: Vec<&str> = text.lines().collect();
            assert_eq!(lines.len(), 11);
            assert!(lines.iter().all(|l| l.chars().count() == 37));
        }
    }

    #[test]
    fn capacity_is_exact_for_ascii_palettes() {
        let grid = gradient(20, 5);
        let palette = Palette::preset(CharsetPreset::Simple);
        let text = render_text(&grid, &palette);
        assert_eq!(text.len(), text_capacity(20, 5, &palette));
    }

    #[test]
    fn black_grid_renders_lightest_glyph() {
        let palette = Palette::preset(CharsetPreset::Simple);
        let text = render_text(&LuminanceGrid::filled(4, 2, 0), &palette);
        assert_eq!(text, "    \n    \n");
    }

    #[test]
    fn empty_ranges_render_nothing() {
        let grid = gradient(5, 5);
        let palette = Palette::preset(CharsetPreset::Blocks);
        assert_eq!(render_rows(&grid, &palette, 5..5).unwrap(), "");
        assert_eq!(render_text(&LuminanceGrid::filled(0, 0, 0), &palette), "");
    }

    #[test]
    fn reversed_range_rejected() {
        let grid = gradient(2, 4);
        let palette = Palette::preset(CharsetPreset::Simple);
        #[allow(clippy::reversed_empty_ranges)]
        let err = render_rows(&grid, &palette, 3..1).unwrap_err();
        assert!(matches!(err, CoreError::RowRange { start: 3, end: 1, rows: 4 }));
    }
}
