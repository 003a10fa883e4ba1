use crate::error::CoreError;

/// Grille de luminance 8 bits, row-major. Immuable une fois construite.
///
/// Partagée en lecture seule entre les workers de rendu.
///
/// # Example
/// ```
/// use gm_core::frame::LuminanceGrid;
/// let grid = LuminanceGrid::new(4, 2, vec![0, 64, 128, 255, 1, 2, 3, 4]).unwrap();
/// assert_eq!(grid.get(3, 0), 255);
/// assert_eq!(grid.row(1), &[1, 2, 3, 4]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LuminanceGrid {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl LuminanceGrid {
    /// Wrap a row-major sample buffer.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if `data.len() != width * height`.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, CoreError> {
        if width.checked_mul(height) != Some(data.len()) {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Grille uniforme, pratique pour les tests.
    ///
    /// # Example
    /// ```
    /// use gm_core::frame::LuminanceGrid;
    /// let grid = LuminanceGrid::filled(3, 2, 7);
    /// assert_eq!(grid.samples().len(), 6);
    /// ```
    #[must_use]
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample at column `x`, row `y`.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < self.width && y < self.height, "sample out of bounds");
        self.data[y * self.width + x]
    }

    /// One row of samples.
    #[inline]
    #[must_use]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// All samples, row-major.
    #[must_use]
    pub fn samples(&self) -> &[u8] {
        &self.data
    }
}

/// Ordre de stockage des canaux d'une [`ColorGrid`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    /// R, G, B (sortie de la crate `image`).
    #[default]
    Rgb,
    /// B, G, R (convention de certains décodeurs).
    Bgr,
}

/// Grille couleur 3 canaux, row-major, 3 bytes par cellule.
///
/// Les canaux sont stockés dans l'ordre `order` ; [`ColorGrid::rgb`]
/// retourne toujours R, G, B.
///
/// # Example
/// ```
/// use gm_core::frame::{ChannelOrder, ColorGrid};
/// let grid = ColorGrid::new(1, 1, vec![10, 20, 30], ChannelOrder::Bgr).unwrap();
/// assert_eq!(grid.rgb(0, 0), (30, 20, 10));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorGrid {
    data: Vec<u8>,
    width: usize,
    height: usize,
    order: ChannelOrder,
}

impl ColorGrid {
    /// Wrap a row-major 3-channel buffer.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if `data.len() != width * height * 3`.
    pub fn new(
        width: usize,
        height: usize,
        data: Vec<u8>,
        order: ChannelOrder,
    ) -> Result<Self, CoreError> {
        let expected = width.checked_mul(height).and_then(|n| n.checked_mul(3));
        if expected != Some(data.len()) {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
            order,
        })
    }

    /// Columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw channel bytes, row-major, in storage order.
    #[must_use]
    pub fn samples(&self) -> &[u8] {
        &self.data
    }

    /// Storage order of the channels.
    #[must_use]
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Couleur en (r, g, b), quel que soit l'ordre de stockage.
    #[inline(always)]
    #[must_use]
    pub fn rgb(&self, x: usize, y: usize) -> (u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y * self.width + x) * 3;
        let (c0, c1, c2) = (self.data[idx], self.data[idx + 1], self.data[idx + 2]);
        match self.order {
            ChannelOrder::Rgb => (c0, c1, c2),
            ChannelOrder::Bgr => (c2, c1, c0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luminance_grid_rejects_bad_length() {
        let err = LuminanceGrid::new(3, 3, vec![0; 8]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidDimensions {
                width: 3,
                height: 3
            }
        ));
    }

    #[test]
    fn empty_grid_is_valid() {
        let grid = LuminanceGrid::new(0, 0, Vec::new()).unwrap();
        assert_eq!(grid.height(), 0);
    }

    #[test]
    fn color_grid_normalizes_channel_order() {
        let data = vec![1, 2, 3, 4, 5, 6];
        let rgb = ColorGrid::new(2, 1, data.clone(), ChannelOrder::Rgb).unwrap();
        let bgr = ColorGrid::new(2, 1, data, ChannelOrder::Bgr).unwrap();
        assert_eq!(rgb.rgb(1, 0), (4, 5, 6));
        assert_eq!(bgr.rgb(1, 0), (6, 5, 4));
    }

    #[test]
    fn color_grid_rejects_bad_length() {
        assert!(ColorGrid::new(2, 2, vec![0; 11], ChannelOrder::Rgb).is_err());
    }
}
