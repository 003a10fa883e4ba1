use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 10 caractères — compact, bon contraste.
pub const CHARSET_SIMPLE: &str = " .:-=+*#%@";

/// 70 caractères — Paul Bourke, du plus clair au plus dense.
pub const CHARSET_DETAILED: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Blocs Unicode — pseudo-pixels.
pub const CHARSET_BLOCKS: &str = " ░▒▓█";

/// Built-in palettes, selectable by index on the command line.
///
/// # Example
/// ```
/// use gm_core::charset::CharsetPreset;
/// assert_eq!(CharsetPreset::from_index(2), Some(CharsetPreset::Blocks));
/// assert_eq!(CharsetPreset::from_index(3), None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CharsetPreset {
    /// `" .:-=+*#%@"`.
    Simple,
    /// Rampe Paul Bourke, 70 glyphes.
    #[default]
    Detailed,
    /// Ombrages `" ░▒▓█"`.
    Blocks,
}

impl CharsetPreset {
    /// Preset for the CLI index: 0 = simple, 1 = detailed, 2 = blocks.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Simple),
            1 => Some(Self::Detailed),
            2 => Some(Self::Blocks),
            _ => None,
        }
    }

    /// Glyphs of this preset, lightest → densest.
    #[must_use]
    pub fn chars(self) -> &'static str {
        match self {
            Self::Simple => CHARSET_SIMPLE,
            Self::Detailed => CHARSET_DETAILED,
            Self::Blocks => CHARSET_BLOCKS,
        }
    }
}

/// Index of the glyph for `sample` in a palette of `len` glyphs.
///
/// Linear quantization with integer truncation: 0 always maps to the
/// first glyph and 255 to the last one. Bucket widths are not uniform.
///
/// # Example
/// ```
/// use gm_core::charset::glyph_index;
/// assert_eq!(glyph_index(0, 10), 0);
/// assert_eq!(glyph_index(254, 10), 8);
/// assert_eq!(glyph_index(255, 10), 9);
/// ```
#[inline(always)]
#[must_use]
pub fn glyph_index(sample: u8, len: usize) -> usize {
    debug_assert!(len > 0, "empty palette");
    usize::from(sample) * (len - 1) / 255
}

/// Ordered glyph palette with its luminance lookup table.
///
/// The table is pre-computed at construction for O(1) per-pixel cost.
/// A palette is immutable once built and can be shared freely between
/// render workers.
///
/// # Example
/// ```
/// use gm_core::charset::Palette;
/// let palette = Palette::new(" .:#@").unwrap();
/// assert_eq!(palette.map(0), ' ');
/// assert_eq!(palette.map(128), ':');
/// assert_eq!(palette.map(255), '@');
/// ```
#[derive(Clone, Debug)]
pub struct Palette {
    glyphs: Vec<char>,
    lut: [char; 256],
    max_utf8_len: usize,
}

impl Palette {
    /// Build a palette from glyphs ordered lightest → densest.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidPalette`] if `charset` is empty.
    pub fn new(charset: &str) -> Result<Self, CoreError> {
        let glyphs: Vec<char> = charset.chars().collect();
        if glyphs.is_empty() {
            return Err(CoreError::InvalidPalette(
                "la palette doit contenir au moins un caractère".into(),
            ));
        }
        Ok(Self::from_glyphs(glyphs))
    }

    /// Palette of a built-in preset. Presets are never empty.
    ///
    /// # Example
    /// ```
    /// use gm_core::charset::{CharsetPreset, Palette};
    /// let palette = Palette::preset(CharsetPreset::Blocks);
    /// assert_eq!(palette.len(), 5);
    /// assert_eq!(palette.map(255), '█');
    /// ```
    #[must_use]
    pub fn preset(preset: CharsetPreset) -> Self {
        Self::from_glyphs(preset.chars().chars().collect())
    }

    fn from_glyphs(glyphs: Vec<char>) -> Self {
        let mut lut = [' '; 256];
        for (sample, slot) in (0..=255u8).zip(lut.iter_mut()) {
            *slot = glyphs[glyph_index(sample, glyphs.len())];
        }
        let max_utf8_len = glyphs.iter().map(|c| c.len_utf8()).max().unwrap_or(1);
        Self {
            glyphs,
            lut,
            max_utf8_len,
        }
    }

    /// Map a luminance value [0..255] to a glyph.
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance: u8) -> char {
        self.lut[luminance as usize]
    }

    /// Number of glyphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false: empty palettes are rejected by [`Palette::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyphs, lightest → densest.
    #[must_use]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Widest glyph in UTF-8 bytes, used to pre-size output buffers.
    #[must_use]
    pub fn max_utf8_len(&self) -> usize {
        self.max_utf8_len
    }
}
