use std::fs::File;
use std::io::Write;
use std::path::Path;

use gm_core::error::CoreError;

/// Taille des blocs d'écriture du fichier HTML.
pub const CHUNK_SIZE: usize = 8192;

fn write_error(path: &Path, source: std::io::Error) -> CoreError {
    CoreError::OutputWrite {
        path: path.display().to_string(),
        source,
    }
}

fn create(path: &Path) -> Result<File, CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;
    }
    File::create(path).map_err(|e| write_error(path, e))
}

/// Écrit le rendu texte en une seule passe.
///
/// # Errors
/// Returns [`CoreError::OutputWrite`] if the file cannot be created or written.
///
/// # Example
/// ```no_run
/// use gm_export::writer::write_text;
/// use std::path::Path;
/// write_text(Path::new("output_ascii.txt"), " .:\n").unwrap();
/// ```
pub fn write_text(path: &Path, content: &str) -> Result<(), CoreError> {
    let mut file = create(path)?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| write_error(path, e))?;
    log::debug!("{} octets écrits dans {}", content.len(), path.display());
    Ok(())
}

/// Écrit `content` par blocs de `chunk_size` octets.
///
/// The bytes on disk are identical to a single write.
///
/// # Errors
/// Returns [`CoreError::OutputWrite`] if the file cannot be created or
/// written, or [`CoreError::Config`] if `chunk_size` is zero.
pub fn write_chunked(path: &Path, content: &str, chunk_size: usize) -> Result<(), CoreError> {
    if chunk_size == 0 {
        return Err(CoreError::Config("taille de bloc nulle".into()));
    }
    let mut file = create(path)?;
    let mut chunks = 0usize;
    for chunk in content.as_bytes().chunks(chunk_size) {
        file.write_all(chunk).map_err(|e| write_error(path, e))?;
        chunks += 1;
    }
    file.flush().map_err(|e| write_error(path, e))?;
    log::debug!(
        "{} octets écrits dans {} ({chunks} blocs)",
        content.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_text(&path, "░▒▓\n@@@\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "░▒▓\n@@@\n");
    }

    #[test]
    fn chunked_write_matches_content_across_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        // Multi-byte glyphs straddle chunk boundaries; bytes must survive intact.
        let content = "<span>▓</span>\n".repeat(2000);
        write_chunked(&path, &content, CHUNK_SIZE).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.txt");
        write_text(&path, "x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn unwritable_destination_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        // The directory itself cannot be opened as a file.
        let err = write_text(dir.path(), "x").unwrap_err();
        assert!(matches!(err, CoreError::OutputWrite { .. }));
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        assert!(matches!(
            write_chunked(&path, "x", 0),
            Err(CoreError::Config(_))
        ));
    }
}
