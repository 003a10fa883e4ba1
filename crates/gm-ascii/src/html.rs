use std::fmt::Write;

use gm_core::charset::Palette;
use gm_core::error::CoreError;
use gm_core::frame::{ColorGrid, LuminanceGrid};

/// Style du conteneur `<pre>`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HtmlStyle {
    /// Taille de police, en pixels.
    pub font_size: f32,
    /// Interligne.
    pub line_height: f32,
}

impl Default for HtmlStyle {
    fn default() -> Self {
        Self {
            font_size: 6.0,
            line_height: 1.0,
        }
    }
}

/// Render colored HTML with the default [`HtmlStyle`].
///
/// # Errors
/// Returns [`CoreError::InvalidDimensions`] if the grids differ in size.
///
/// # Example
/// ```
/// use gm_core::charset::Palette;
/// use gm_core::frame::{ChannelOrder, ColorGrid, LuminanceGrid};
/// use gm_ascii::html::render_html;
///
/// let palette = Palette::new(" #").unwrap();
/// let luma = LuminanceGrid::new(1, 1, vec![255]).unwrap();
/// let color = ColorGrid::new(1, 1, vec![255, 0, 16], ChannelOrder::Rgb).unwrap();
/// let html = render_html(&luma, &color, &palette).unwrap();
/// assert!(html.contains("<span style=\"color: rgb(255,0,16);\">#</span>\n"));
/// ```
pub fn render_html(
    luminance: &LuminanceGrid,
    color: &ColorGrid,
    palette: &Palette,
) -> Result<String, CoreError> {
    render_html_styled(luminance, color, palette, HtmlStyle::default())
}

/// Render one inline-colored span per cell inside a monospace `<pre>`.
///
/// The glyph comes from the luminance grid, the color from the color grid
/// at the same coordinate, always written as `rgb(R,G,B)` whatever the
/// grid's storage order. Glyphs significant to HTML are escaped.
///
/// # Errors
/// Returns [`CoreError::InvalidDimensions`] if the grids differ in size.
pub fn render_html_styled(
    luminance: &LuminanceGrid,
    color: &ColorGrid,
    palette: &Palette,
    style: HtmlStyle,
) -> Result<String, CoreError> {
    if luminance.width() != color.width() || luminance.height() != color.height() {
        return Err(CoreError::InvalidDimensions {
            width: color.width(),
            height: color.height(),
        });
    }

    // ~40 bytes per span.
    let mut html = String::with_capacity(luminance.width() * luminance.height() * 40 + 128);
    // Writing to a String cannot fail. `{:?}` keeps "1.0" and "1.25" as is.
    let _ = write!(
        html,
        "<pre style=\"font-family: monospace; line-height: {:?}; font-size: {}px;\">",
        style.line_height, style.font_size
    );

    for y in 0..luminance.height() {
        for (x, &sample) in luminance.row(y).iter().enumerate() {
            let (r, g, b) = color.rgb(x, y);
            let _ = write!(html, "<span style=\"color: rgb({r},{g},{b});\">");
            push_escaped(&mut html, palette.map(sample));
            html.push_str("</span>");
        }
        html.push('\n');
    }

    html.push_str("</pre>");
    Ok(html)
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '&' => out.push_str("&amp;"),
        '"' => out.push_str("&quot;"),
        c => out.push(c),
    }
}
