use thiserror::Error;

/// Errors originating from the conversion pipeline.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Image path missing, unreadable or not a decodable image.
    #[error("Impossible de charger l'image {path} : {reason}")]
    Decode {
        /// Path that failed to decode.
        path: String,
        /// Decoder diagnostic.
        reason: String,
    },

    /// Output file cannot be created or written.
    #[error("Impossible d'écrire le fichier {path}")]
    OutputWrite {
        /// Destination path.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Palette rejected at construction (empty).
    #[error("Palette invalide : {0}")]
    InvalidPalette(String),

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: usize,
        /// Height value.
        height: usize,
    },

    /// Parallel render requested with zero workers.
    #[error("Nombre de workers invalide : 0")]
    InvalidWorkerCount,

    /// A chunk row range falls outside the grid.
    #[error("Plage de lignes [{start}, {end}) hors de la grille ({rows} lignes)")]
    RowRange {
        /// First row (inclusive).
        start: usize,
        /// Last row (exclusive).
        end: usize,
        /// Grid row count.
        rows: usize,
    },
}
