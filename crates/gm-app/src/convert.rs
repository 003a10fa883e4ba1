use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use gm_ascii::html::{HtmlStyle, render_html_styled};
use gm_ascii::luminance::render_text;
use gm_ascii::parallel::{default_worker_count, render_parallel};
use gm_core::charset::Palette;
use gm_core::config::ConvertConfig;
use gm_core::error::CoreError;
use gm_core::frame::LuminanceGrid;
use gm_source::filter::gaussian_blur_3x3;
use gm_source::image::ImageSource;
use gm_source::resize::Resizer;

/// Chemin de rendu choisi pour une conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPath {
    /// Boucle mono-thread.
    Sequential,
    /// Blocs de lignes, un par worker.
    Parallel {
        /// Nombre de blocs.
        workers: usize,
    },
}

impl fmt::Display for RenderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "séquentiel"),
            Self::Parallel { workers } => write!(f, "parallèle ({workers} workers)"),
        }
    }
}

/// Résultat d'une conversion texte.
#[derive(Debug)]
pub struct Conversion {
    /// Rendu texte, une ligne par rangée de la grille.
    pub text: String,
    /// Dimensions de l'image source (largeur, hauteur).
    pub source_size: (u32, u32),
    /// Dimensions de la sortie en caractères (largeur, hauteur).
    pub output_size: (u32, u32),
    /// Chemin de rendu utilisé.
    pub path: RenderPath,
    /// Durée totale : décodage, préparation et rendu.
    pub elapsed: Duration,
}

/// Hauteur de sortie en lignes pour une largeur cible.
///
/// With aspect preservation, `round(target_width * h / w * char_aspect)`;
/// `char_aspect` (0.5 by default) compensates for character cells being
/// about twice as tall as wide. Without it, `target_width / 2`. Never 0.
///
/// # Example
/// ```
/// use gm_app::convert::output_height;
/// assert_eq!(output_height((200, 100), 120, true, 0.5), 30);
/// assert_eq!(output_height((200, 100), 120, false, 0.5), 60);
/// ```
#[must_use]
pub fn output_height(
    (src_w, src_h): (u32, u32),
    target_width: u32,
    preserve_aspect: bool,
    char_aspect: f32,
) -> u32 {
    let height = if preserve_aspect && src_w > 0 {
        let aspect = f64::from(src_h) / f64::from(src_w);
        (f64::from(target_width) * aspect * f64::from(char_aspect)).round() as u32
    } else {
        target_width / 2
    };
    height.max(1)
}

/// Convertisseur image → texte / HTML, construit une fois par configuration.
///
/// Holds only immutable settings and the palette; every call allocates
/// its own grids and drops them when done.
pub struct Converter {
    palette: Palette,
    output_width: u32,
    preserve_aspect: bool,
    char_aspect: f32,
    blur: bool,
    parallel: bool,
    parallel_threshold: u32,
    workers: usize,
    html_style: HtmlStyle,
}

impl Converter {
    /// Build a converter from a configuration.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidPalette`] for an empty custom charset and
    /// [`CoreError::InvalidDimensions`] for a zero output width.
    pub fn from_config(config: &ConvertConfig) -> Result<Self, CoreError> {
        if config.output_width == 0 {
            return Err(CoreError::InvalidDimensions {
                width: 0,
                height: 0,
            });
        }
        Ok(Self {
            palette: config.palette()?,
            output_width: config.output_width,
            preserve_aspect: config.preserve_aspect,
            char_aspect: config.char_aspect,
            blur: config.blur,
            parallel: config.parallel,
            parallel_threshold: config.parallel_threshold,
            workers: config
                .workers
                .filter(|&n| n > 0)
                .unwrap_or_else(default_worker_count),
            html_style: HtmlStyle {
                font_size: config.html_font_size,
                line_height: config.html_line_height,
            },
        })
    }

    /// Render path for a grid of `rows` rows.
    #[must_use]
    pub fn render_path(&self, rows: u32) -> RenderPath {
        if self.parallel && rows > self.parallel_threshold {
            RenderPath::Parallel {
                workers: self.workers,
            }
        } else {
            RenderPath::Sequential
        }
    }

    /// Decode `path` and convert it to text.
    ///
    /// # Errors
    /// Returns [`CoreError::Decode`] if the image cannot be loaded, or any
    /// preparation or render error.
    pub fn convert(&self, path: &Path) -> Result<Conversion> {
        let start = Instant::now();
        let source = ImageSource::open(path)?;
        self.convert_from(&source, start)
    }

    fn convert_from(&self, source: &ImageSource, start: Instant) -> Result<Conversion> {
        let source_size = source.dimensions();
        let gray = source.luminance_grid()?;
        let gray = if self.blur {
            gaussian_blur_3x3(&gray)?
        } else {
            gray
        };

        let height = output_height(
            source_size,
            self.output_width,
            self.preserve_aspect,
            self.char_aspect,
        );
        let grid = Resizer::new().resize_luminance(&gray, self.output_width, height)?;
        drop(gray);

        let (text, path) = self.render(&grid)?;
        let elapsed = start.elapsed();
        log::info!(
            "Conversion {}x{} → {}x{height} ({path}) en {} ms",
            source_size.0,
            source_size.1,
            self.output_width,
            elapsed.as_millis()
        );

        Ok(Conversion {
            text,
            source_size,
            output_size: (self.output_width, height),
            path,
            elapsed,
        })
    }

    /// Render a prepared grid, choosing the path from its height.
    ///
    /// # Errors
    /// Propagates the failure of any render chunk.
    pub fn render(&self, grid: &LuminanceGrid) -> Result<(String, RenderPath), CoreError> {
        let path = self.render_path(grid.height() as u32);
        log::debug!("Chemin de rendu : {path}");
        let text = match path {
            RenderPath::Sequential => render_text(grid, &self.palette),
            RenderPath::Parallel { workers } => render_parallel(grid, &self.palette, workers)?,
        };
        Ok((text, path))
    }

    /// Decode `path` and convert it to colored HTML.
    ///
    /// # Errors
    /// Returns [`CoreError::Decode`] if the image cannot be loaded, or any
    /// preparation or render error.
    pub fn convert_html(&self, path: &Path) -> Result<String> {
        let source = ImageSource::open(path)?;
        self.convert_html_from(&source)
    }

    /// Color and luminance are both area-resized from the full-resolution
    /// image, without blur, so each span keeps the average source color.
    fn convert_html_from(&self, source: &ImageSource) -> Result<String> {
        let height = output_height(
            source.dimensions(),
            self.output_width,
            self.preserve_aspect,
            self.char_aspect,
        );
        let mut resizer = Resizer::new();
        let color = resizer.resize_color(&source.color_grid()?, self.output_width, height)?;
        let gray = resizer.resize_luminance(&source.luminance_grid()?, self.output_width, height)?;
        Ok(render_html_styled(
            &gray,
            &color,
            &self.palette,
            self.html_style,
        )?)
    }
}

/// One-shot conversion with default settings for everything else.
///
/// # Errors
/// Same as [`Converter::convert`].
pub fn convert(
    path: &Path,
    palette: Palette,
    target_width: u32,
    preserve_aspect: bool,
    use_parallel: bool,
) -> Result<Conversion> {
    let config = ConvertConfig {
        output_width: target_width,
        preserve_aspect,
        parallel: use_parallel,
        ..ConvertConfig::default()
    };
    let mut converter = Converter::from_config(&config)?;
    converter.palette = palette;
    converter.convert(path)
}
