use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use gm_core::error::CoreError;
use gm_core::frame::{ColorGrid, LuminanceGrid};
use rayon::prelude::*;

/// Resizer réutilisable, moyenne de zone.
///
/// Réduction : chaque cellule de sortie est la moyenne des pixels source
/// qu'elle recouvre, pondérés par leur fraction de recouvrement.
/// Agrandissement (sur au moins un axe) : interpolation bilinéaire via
/// fast_image_resize.
///
/// # Example
/// ```
/// use gm_source::resize::Resizer;
/// let r = Resizer::new();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch buffer for the source (fast_image_resize wants `&mut`).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new area-averaging resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
            src_buf: Vec::new(),
        }
    }

    /// Resize a luminance grid to `width × height`.
    ///
    /// # Errors
    /// Returns an error if either dimension is zero or the resize fails.
    ///
    /// # Example
    /// ```
    /// use gm_core::frame::LuminanceGrid;
    /// use gm_source::resize::Resizer;
    /// let src = LuminanceGrid::filled(100, 80, 200);
    /// let dst = Resizer::new().resize_luminance(&src, 10, 4).unwrap();
    /// assert_eq!((dst.width(), dst.height()), (10, 4));
    /// assert!(dst.samples().iter().all(|&s| s == 200));
    /// ```
    pub fn resize_luminance(
        &mut self,
        src: &LuminanceGrid,
        width: u32,
        height: u32,
    ) -> Result<LuminanceGrid> {
        let data = self.resize_raw(
            src.samples(),
            (src.width(), src.height()),
            (width, height),
            PixelType::U8,
        )?;
        Ok(LuminanceGrid::new(width as usize, height as usize, data)?)
    }

    /// Resize a color grid to `width × height`, keeping its channel order.
    ///
    /// # Errors
    /// Returns an error if either dimension is zero or the resize fails.
    pub fn resize_color(&mut self, src: &ColorGrid, width: u32, height: u32) -> Result<ColorGrid> {
        let data = self.resize_raw(
            src.samples(),
            (src.width(), src.height()),
            (width, height),
            PixelType::U8x3,
        )?;
        Ok(ColorGrid::new(
            width as usize,
            height as usize,
            data,
            src.order(),
        )?)
    }

    fn resize_raw(
        &mut self,
        src: &[u8],
        (src_w, src_h): (usize, usize),
        (dst_w, dst_h): (u32, u32),
        pixel_type: PixelType,
    ) -> Result<Vec<u8>> {
        if src_w == 0 || src_h == 0 {
            return Err(CoreError::InvalidDimensions {
                width: src_w,
                height: src_h,
            }
            .into());
        }
        if dst_w == 0 || dst_h == 0 {
            return Err(CoreError::InvalidDimensions {
                width: dst_w as usize,
                height: dst_h as usize,
            }
            .into());
        }
        if src_w == dst_w as usize && src_h == dst_h as usize {
            return Ok(src.to_vec());
        }
        if dst_w as usize <= src_w && dst_h as usize <= src_h {
            log::debug!("Moyenne de zone {src_w}x{src_h} → {dst_w}x{dst_h}");
            return Ok(area_average(
                src,
                (src_w, src_h),
                (dst_w as usize, dst_h as usize),
                pixel_type.size(),
            ));
        }

        // R1: forced copy by fast_image_resize API (requires &mut on source)
        self.src_buf.clear();
        self.src_buf.extend_from_slice(src);

        let src_image = Image::from_slice_u8(
            src_w as u32,
            src_h as u32,
            &mut self.src_buf,
            pixel_type,
        )
        .context("Invalid source dimensions")?;

        let mut dst = vec![0u8; dst_w as usize * dst_h as usize * pixel_type.size()];
        let mut dst_image = Image::from_slice_u8(dst_w, dst_h, &mut dst, pixel_type)
            .context("Invalid destination dimensions")?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("Resize failed")?;

        log::debug!("Redimensionnement {src_w}x{src_h} → {dst_w}x{dst_h}");
        Ok(dst)
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Source span of each output cell along one axis: first source index and
/// the overlap weight of each source pixel, summing to 1.
fn area_weights(src: usize, dst: usize) -> Vec<(usize, Vec<f64>)> {
    let scale = src as f64 / dst as f64;
    (0..dst)
        .map(|i| {
            let start = i as f64 * scale;
            let end = ((i + 1) as f64 * scale).min(src as f64);
            let first = (start.floor() as usize).min(src - 1);
            let last = (end.ceil() as usize).clamp(first + 1, src);
            let weights = (first..last)
                .map(|j| {
                    let lo = start.max(j as f64);
                    let hi = end.min((j + 1) as f64);
                    (hi - lo).max(0.0) / scale
                })
                .collect();
            (first, weights)
        })
        .collect()
}

/// Downscale by fractional-overlap area averaging. `dst` must not exceed
/// `src` on either axis.
fn area_average(
    src: &[u8],
    (src_w, src_h): (usize, usize),
    (dst_w, dst_h): (usize, usize),
    channels: usize,
) -> Vec<u8> {
    let xs = area_weights(src_w, dst_w);
    let ys = area_weights(src_h, dst_h);
    let src_stride = src_w * channels;
    let dst_stride = dst_w * channels;

    let mut dst = vec![0u8; dst_stride * dst_h];
    dst.par_chunks_mut(dst_stride)
        .zip(ys.par_iter())
        .for_each(|(out_row, (y0, wy))| {
            let mut acc = vec![0.0f64; dst_stride];
            for (dy, &w_row) in wy.iter().enumerate() {
                let row = &src[(y0 + dy) * src_stride..][..src_stride];
                for (cell, (x0, wx)) in acc.chunks_exact_mut(channels).zip(&xs) {
                    for (dx, &w_col) in wx.iter().enumerate() {
                        let px = &row[(x0 + dx) * channels..][..channels];
                        let w = w_row * w_col;
                        for (a, &v) in cell.iter_mut().zip(px) {
                            *a += w * f64::from(v);
                        }
                    }
                }
            }
            for (o, a) in out_row.iter_mut().zip(&acc) {
                *o = a.round().clamp(0.0, 255.0) as u8;
            }
        });
    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::frame::ChannelOrder;

    #[test]
    fn downscale_averages_areas() {
        // Left half black, right half white: 4×2 → 2×1.
        let src = LuminanceGrid::new(4, 2, vec![0, 0, 255, 255, 0, 0, 255, 255]).unwrap();
        let dst = Resizer::new().resize_luminance(&src, 2, 1).unwrap();
        assert_eq!(dst.samples(), &[0, 255]);
    }

    #[test]
    fn fractional_overlap_is_split() {
        // 3 → 2: the middle pixel straddles both outputs.
        let src = LuminanceGrid::new(3, 1, vec![0, 255, 0]).unwrap();
        let dst = Resizer::new().resize_luminance(&src, 2, 1).unwrap();
        assert_eq!(dst.samples(), &[85, 85]);

        let src = LuminanceGrid::new(3, 1, vec![0, 90, 180]).unwrap();
        let dst = Resizer::new().resize_luminance(&src, 2, 1).unwrap();
        // (0 + 90/2) / 1.5 = 30, (90/2 + 180) / 1.5 = 150
        assert_eq!(dst.samples(), &[30, 150]);
    }

    #[test]
    fn fractional_overlap_in_both_axes() {
        // Lone bright center of a 3×3: each 2×2 output gets (1/3)² of it.
        let mut data = vec![0; 9];
        data[4] = 255;
        let src = LuminanceGrid::new(3, 3, data).unwrap();
        let dst = Resizer::new().resize_luminance(&src, 2, 2).unwrap();
        assert_eq!(dst.samples(), &[28, 28, 28, 28]);
    }

    #[test]
    fn area_weights_sum_to_one() {
        for (src, dst) in [(1080, 34), (1920, 120), (7, 3), (5, 5), (9, 1)] {
            let spans = area_weights(src, dst);
            assert_eq!(spans.len(), dst);
            for (first, weights) in &spans {
                assert!(first + weights.len() <= src);
                let total: f64 = weights.iter().sum();
                assert!((total - 1.0).abs() < 1e-9, "{src}→{dst}: {total}");
            }
        }
    }

    #[test]
    fn enlargement_keeps_flat_regions() {
        let src = LuminanceGrid::filled(2, 2, 77);
        let dst = Resizer::new().resize_luminance(&src, 5, 1).unwrap();
        assert_eq!((dst.width(), dst.height()), (5, 1));
        assert!(dst.samples().iter().all(|&s| s == 77));
    }

    #[test]
    fn same_size_is_a_copy() {
        let src = LuminanceGrid::new(3, 1, vec![1, 2, 3]).unwrap();
        let dst = Resizer::new().resize_luminance(&src, 3, 1).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn zero_target_rejected() {
        let src = LuminanceGrid::filled(4, 4, 0);
        assert!(Resizer::new().resize_luminance(&src, 0, 2).is_err());
    }

    #[test]
    fn color_resize_keeps_order_and_color() {
        let data = [30u8, 20, 10].repeat(16);
        let src = ColorGrid::new(4, 4, data, ChannelOrder::Bgr).unwrap();
        let dst = Resizer::new().resize_color(&src, 2, 2).unwrap();
        assert_eq!(dst.order(), ChannelOrder::Bgr);
        assert_eq!(dst.rgb(1, 1), (10, 20, 30));
    }
}
