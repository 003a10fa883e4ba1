use std::path::PathBuf;

use clap::Parser;
use gm_core::charset::CharsetPreset;
use gm_core::config::ConvertConfig;

/// glyphmap — convertit une image en art ASCII (texte et HTML coloré).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF).
    pub image: PathBuf,

    /// Largeur de sortie en caractères. Défaut : 120.
    #[arg(value_parser = clap::value_parser!(u32).range(1..=4096))]
    pub width: Option<u32>,

    /// Palette : 0 = simple, 1 = détaillée, 2 = blocs. Défaut : 1.
    #[arg(value_parser = clap::value_parser!(u8).range(0..=2))]
    pub charset: Option<u8>,

    /// Fichier de configuration TOML (optionnel).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Désactiver le rendu parallèle.
    #[arg(long, default_value_t = false)]
    pub no_parallel: bool,

    /// Ne pas conserver le ratio de l'image (hauteur = largeur / 2).
    #[arg(long, default_value_t = false)]
    pub no_aspect: bool,

    /// Nombre de workers du rendu parallèle. Défaut : cœurs disponibles.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub workers: Option<u32>,

    /// Hauteur de sortie au-delà de laquelle le rendu devient parallèle.
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Répertoire des fichiers produits.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Ne pas produire la version HTML.
    #[arg(long, default_value_t = false)]
    pub no_html: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut ConvertConfig) {
        if let Some(width) = self.width {
            config.output_width = width;
        }
        if let Some(preset) = self.charset.and_then(CharsetPreset::from_index) {
            config.charset = preset;
            config.custom_charset = None;
        }
        if self.no_parallel {
            config.parallel = false;
        }
        if self.no_aspect {
            config.preserve_aspect = false;
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers as usize);
        }
        if let Some(threshold) = self.threshold {
            config.parallel_threshold = threshold;
        }
        if let Some(ref dir) = self.output_dir {
            config.output_dir.clone_from(dir);
        }
        if self.no_html {
            config.html_enabled = false;
        }
    }
}
