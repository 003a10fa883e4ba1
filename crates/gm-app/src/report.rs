use std::io::{self, Write};
use std::path::Path;

use crate::convert::Conversion;

/// Aperçu du rendu : `len` premiers caractères, seulement si le texte
/// fait moins de `limit` caractères.
///
/// # Example
/// ```
/// use gm_app::report::preview;
/// assert_eq!(preview("ab\ncd\n", 10, 3), Some(("ab\n", true)));
/// assert_eq!(preview("ab\n", 10, 3), Some(("ab\n", false)));
/// assert_eq!(preview("ab\ncd\n", 4, 3), None);
/// ```
#[must_use]
pub fn preview(text: &str, limit: usize, len: usize) -> Option<(&str, bool)> {
    // At least `limit` characters: too long for a preview.
    if limit == 0 || text.chars().nth(limit - 1).is_some() {
        return None;
    }
    match text.char_indices().nth(len) {
        Some((end, _)) => Some((&text[..end], true)),
        None => Some((text, false)),
    }
}

/// Résumé console d'une conversion texte.
///
/// # Errors
/// Returns any error from writing to `out`.
pub fn write_summary<W: Write>(out: &mut W, conversion: &Conversion) -> io::Result<()> {
    let (sw, sh) = conversion.source_size;
    let (ow, oh) = conversion.output_size;
    writeln!(out, "Image originale : {sw}x{sh}")?;
    writeln!(out, "Sortie ASCII : {ow}x{oh}")?;
    writeln!(
        out,
        "Conversion terminée en {} ms ({})",
        conversion.elapsed.as_millis(),
        conversion.path
    )
}

/// Chemin d'un fichier produit.
///
/// # Errors
/// Returns any error from writing to `out`.
pub fn write_saved<W: Write>(out: &mut W, label: &str, path: &Path) -> io::Result<()> {
    writeln!(out, "{label} sauvegardé dans : {}", path.display())
}

/// Aperçu suivi d'une mention de troncature si besoin.
///
/// # Errors
/// Returns any error from writing to `out`.
pub fn write_preview<W: Write>(out: &mut W, text: &str, limit: usize, len: usize) -> io::Result<()> {
    if let Some((head, truncated)) = preview(text, limit, len) {
        write!(out, "\nAperçu :\n{head}")?;
        if truncated {
            writeln!(out, "\n... (tronqué, voir le fichier pour la sortie complète)")?;
        }
    }
    Ok(())
}
