use std::path::Path;

use ::image::DynamicImage;
use gm_core::error::CoreError;
use gm_core::frame::{ChannelOrder, ColorGrid, LuminanceGrid};

/// Image source décodée, pleine résolution.
///
/// # Example
/// ```no_run
/// use gm_source::image::ImageSource;
/// use std::path::Path;
/// let source = ImageSource::open(Path::new("test.png")).unwrap();
/// let (w, h) = source.dimensions();
/// ```
pub struct ImageSource {
    image: DynamicImage,
}

impl ImageSource {
    /// Load and decode an image from disk.
    ///
    /// # Errors
    /// Returns [`CoreError::Decode`] if the path does not exist or is not
    /// a decodable image.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let image = ::image::open(path).map_err(|e| CoreError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        log::debug!(
            "Image décodée : {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self { image })
    }

    /// Wrap an already decoded image.
    #[must_use]
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// (width, height) in pixels.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Grille couleur pleine résolution, ordre RGB.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if the decoded buffer is inconsistent.
    pub fn color_grid(&self) -> Result<ColorGrid, CoreError> {
        let rgb = self.image.to_rgb8();
        let (w, h) = rgb.dimensions();
        ColorGrid::new(w as usize, h as usize, rgb.into_raw(), ChannelOrder::Rgb)
    }

    /// Conversion en niveaux de gris (pondération Rec. 709 de la crate `image`).
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if the decoded buffer is inconsistent.
    pub fn luminance_grid(&self) -> Result<LuminanceGrid, CoreError> {
        let luma = self.image.to_luma8();
        let (w, h) = luma.dimensions();
        LuminanceGrid::new(w as usize, h as usize, luma.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{Rgb, RgbImage};

    #[test]
    fn missing_file_is_decode_error() {
        let err = ImageSource::open(Path::new("does/not/exist.png"))
            .err()
            .unwrap();
        assert!(matches!(err, CoreError::Decode { .. }));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(
            ImageSource::open(&path),
            Err(CoreError::Decode { .. })
        ));
    }

    #[test]
    fn decoded_png_keeps_rgb_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbImage::from_pixel(3, 2, Rgb([200, 10, 20]))
            .save(&path)
            .unwrap();

        let source = ImageSource::open(&path).unwrap();
        assert_eq!(source.dimensions(), (3, 2));
        let color = source.color_grid().unwrap();
        assert_eq!(color.order(), ChannelOrder::Rgb);
        assert_eq!(color.rgb(2, 1), (200, 10, 20));
        let luma = source.luminance_grid().unwrap();
        assert_eq!((luma.width(), luma.height()), (3, 2));
    }

    #[test]
    fn black_and_white_map_to_luminance_extremes() {
        let mut img = RgbImage::from_pixel(2, 1, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 255, 255]));
        let luma = ImageSource::from_dynamic(DynamicImage::ImageRgb8(img))
            .luminance_grid()
            .unwrap();
        assert_eq!(luma.samples(), &[0, 255]);
    }
}
