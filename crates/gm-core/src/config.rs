use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{CharsetPreset, Palette};
use crate::error::CoreError;

/// Configuration complète d'une conversion.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine ;
/// les flags CLI sont appliqués par-dessus.
///
/// # Example
/// ```
/// use gm_core::config::ConvertConfig;
/// let config = ConvertConfig::default();
/// assert_eq!(config.output_width, 120);
/// assert_eq!(config.parallel_threshold, 100);
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ConvertConfig {
    // === Conversion ===
    /// Palette built-in utilisée si `custom_charset` est absent.
    pub charset: CharsetPreset,
    /// Palette personnalisée, du plus clair au plus dense.
    pub custom_charset: Option<String>,
    /// Largeur de sortie en caractères.
    pub output_width: u32,
    /// Conserver le ratio de l'image source.
    pub preserve_aspect: bool,
    /// Facteur hauteur/largeur d'une cellule de caractère (0.5 ≈ cellule 1:2).
    pub char_aspect: f32,
    /// Flou gaussien 3×3 avant redimensionnement.
    pub blur: bool,

    // === Parallélisme ===
    /// Autoriser le rendu par blocs de lignes.
    pub parallel: bool,
    /// Hauteur de sortie au-delà de laquelle le rendu parallèle est choisi.
    pub parallel_threshold: u32,
    /// Nombre de workers. `None` = parallélisme matériel disponible.
    pub workers: Option<usize>,

    // === HTML ===
    /// Produire la version HTML colorée.
    pub html_enabled: bool,
    /// Taille de police du conteneur `<pre>`, en pixels.
    pub html_font_size: f32,
    /// Interligne du conteneur `<pre>`.
    pub html_line_height: f32,

    // === Sortie ===
    /// Répertoire des fichiers produits.
    pub output_dir: PathBuf,
    /// Nom du fichier texte.
    pub ascii_file: String,
    /// Nom du fichier HTML.
    pub html_file: String,
    /// Aperçu affiché seulement si le texte fait moins de N caractères.
    pub preview_limit: usize,
    /// Longueur de l'aperçu, en caractères.
    pub preview_len: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            charset: CharsetPreset::Detailed,
            custom_charset: None,
            output_width: 120,
            preserve_aspect: true,
            char_aspect: 0.5,
            blur: true,
            parallel: true,
            parallel_threshold: 100,
            workers: None,
            html_enabled: true,
            html_font_size: 6.0,
            html_line_height: 1.0,
            output_dir: PathBuf::from("."),
            ascii_file: "output_ascii.txt".into(),
            html_file: "output_colored.html".into(),
            preview_limit: 10_000,
            preview_len: 1000,
        }
    }
}

impl ConvertConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.output_width = self.output_width.clamp(1, 4096);
        self.char_aspect = self.char_aspect.clamp(0.1, 4.0);
        self.html_font_size = self.html_font_size.clamp(1.0, 72.0);
        self.html_line_height = self.html_line_height.clamp(0.5, 4.0);
        if self.workers == Some(0) {
            log::warn!("workers = 0 ignoré, utilisation du parallélisme matériel");
            self.workers = None;
        }
    }

    /// Build the palette selected by this configuration.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidPalette`] if `custom_charset` is empty.
    ///
    /// # Example
    /// ```
    /// use gm_core::config::ConvertConfig;
    /// let mut config = ConvertConfig::default();
    /// config.custom_charset = Some(" #".into());
    /// assert_eq!(config.palette().unwrap().len(), 2);
    /// config.custom_charset = Some(String::new());
    /// assert!(config.palette().is_err());
    /// ```
    pub fn palette(&self) -> Result<Palette, CoreError> {
        match self.custom_charset.as_deref() {
            Some(charset) => Palette::new(charset),
            None => Ok(Palette::preset(self.charset)),
        }
    }

    /// Chemin complet du fichier texte.
    #[must_use]
    pub fn ascii_path(&self) -> PathBuf {
        self.output_dir.join(&self.ascii_file)
    }

    /// Chemin complet du fichier HTML.
    #[must_use]
    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join(&self.html_file)
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    convert: Option<ConvertSection>,
    parallel: Option<ParallelSection>,
    html: Option<HtmlSection>,
    output: Option<OutputSection>,
}

#[derive(Deserialize)]
struct ConvertSection {
    charset: Option<CharsetPreset>,
    custom_charset: Option<String>,
    width: Option<u32>,
    preserve_aspect: Option<bool>,
    char_aspect: Option<f32>,
    blur: Option<bool>,
}

#[derive(Deserialize)]
struct ParallelSection {
    enabled: Option<bool>,
    threshold_rows: Option<u32>,
    workers: Option<usize>,
}

#[derive(Deserialize)]
struct HtmlSection {
    enabled: Option<bool>,
    font_size: Option<f32>,
    line_height: Option<f32>,
}

#[derive(Deserialize)]
struct OutputSection {
    dir: Option<PathBuf>,
    ascii_file: Option<String>,
    html_file: Option<String>,
    preview_limit: Option<usize>,
    preview_len: Option<usize>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use gm_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("glyphmap.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ConvertConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))
}

/// Parse a TOML document and merge it onto [`ConvertConfig::default`].
///
/// # Errors
/// Returns an error if the document is not valid TOML for this schema.
///
/// # Example
/// ```
/// use gm_core::config::parse_config;
/// let config = parse_config("[parallel]\nthreshold_rows = 40\n").unwrap();
/// assert_eq!(config.parallel_threshold, 40);
/// assert_eq!(config.output_width, 120);
/// ```
pub fn parse_config(content: &str) -> Result<ConvertConfig> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = ConvertConfig::default();

    if let Some(c) = file.convert {
        if let Some(v) = c.charset {
            config.charset = v;
        }
        if let Some(v) = c.custom_charset {
            if v.is_empty() {
                return Err(CoreError::InvalidPalette("custom_charset est vide".into()).into());
            }
            config.custom_charset = Some(v);
        }
        if let Some(v) = c.width {
            config.output_width = v;
        }
        if let Some(v) = c.preserve_aspect {
            config.preserve_aspect = v;
        }
        if let Some(v) = c.char_aspect {
            config.char_aspect = v;
        }
        if let Some(v) = c.blur {
            config.blur = v;
        }
    }

    if let Some(p) = file.parallel {
        if let Some(v) = p.enabled {
            config.parallel = v;
        }
        if let Some(v) = p.threshold_rows {
            config.parallel_threshold = v;
        }
        if let Some(v) = p.workers {
            config.workers = Some(v);
        }
    }

    if let Some(h) = file.html {
        if let Some(v) = h.enabled {
            config.html_enabled = v;
        }
        if let Some(v) = h.font_size {
            config.html_font_size = v;
        }
        if let Some(v) = h.line_height {
            config.html_line_height = v;
        }
    }

    if let Some(o) = file.output {
        if let Some(v) = o.dir {
            config.output_dir = v;
        }
        if let Some(v) = o.ascii_file {
            config.ascii_file = v;
        }
        if let Some(v) = o.html_file {
            config.html_file = v;
        }
        if let Some(v) = o.preview_limit {
            config.preview_limit = v;
        }
        if let Some(v) = o.preview_len {
            config.preview_len = v;
        }
    }

    config.clamp_all();
    Ok(config)
}
