use gm_core::error::CoreError;
use gm_core::frame::LuminanceGrid;
use rayon::prelude::*;

/// Noyau gaussien 3 taps pour sigma = 0 : sigma dérivé de la taille du
/// noyau (0.8 pour 3×3), soit [1 2 1] / 4.
const KERNEL_3: [u32; 3] = [1, 2, 1];

/// Border index with reflect-101 (`gfedcb|abcdefgh|gfedcba`).
#[inline(always)]
fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let i = if i < 0 { -i } else { i };
    let i = if i > last { 2 * last - i } else { i };
    i as usize
}

/// Flou gaussien 3×3 séparable, sigma 0, bord reflect-101.
///
/// Réduit l'aliasing avant le sous-échantillonnage. Arrondi au plus
/// proche sur la somme entière des poids (16).
///
/// # Errors
/// Propagates [`CoreError::InvalidDimensions`] from grid construction.
///
/// # Example
/// ```
/// use gm_core::frame::LuminanceGrid;
/// use gm_source::filter::gaussian_blur_3x3;
/// let flat = LuminanceGrid::filled(8, 8, 42);
/// assert_eq!(gaussian_blur_3x3(&flat).unwrap(), flat);
/// ```
pub fn gaussian_blur_3x3(src: &LuminanceGrid) -> Result<LuminanceGrid, CoreError> {
    let (w, h) = (src.width(), src.height());
    if w == 0 || h == 0 {
        return Ok(src.clone());
    }

    // Passe horizontale : sommes pondérées ≤ 4 × 255.
    let mut horizontal = vec![0u16; w * h];
    horizontal
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, out)| {
            let row = src.row(y);
            for (x, acc) in out.iter_mut().enumerate() {
                let mut sum = 0u32;
                for (k, weight) in KERNEL_3.iter().enumerate() {
                    let sx = reflect_101(x as isize + k as isize - 1, w);
                    sum += weight * u32::from(row[sx]);
                }
                *acc = sum as u16;
            }
        });

    // Passe verticale : sommes ≤ 16 × 255.
    let mut out = vec![0u8; w * h];
    out.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, px) in row.iter_mut().enumerate() {
            let mut sum = 0u32;
            for (k, weight) in KERNEL_3.iter().enumerate() {
                let sy = reflect_101(y as isize + k as isize - 1, h);
                sum += weight * u32::from(horizontal[sy * w + x]);
            }
            *px = ((sum + 8) >> 4) as u8;
        }
    });

    LuminanceGrid::new(w, h, out)
}
