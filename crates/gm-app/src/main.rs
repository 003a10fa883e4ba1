use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gm_app::convert::Converter;
use gm_app::report;
use gm_core::config::ConvertConfig;
use gm_export::writer::{CHUNK_SIZE, write_chunked, write_text};

mod cli;

fn main() -> ExitCode {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Convertir ; toute erreur tient sur une ligne
    exit_status(run(&cli), &mut std::io::stderr())
}

/// Map the outcome of [`run`] to an exit code, printing failures to `err`.
fn exit_status<W: Write>(result: Result<()>, err: &mut W) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            let _ = writeln!(err, "Erreur : {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli) -> Result<()> {
    let mut config = resolve_config(cli)?;
    cli.apply_overrides(&mut config);
    config.clamp_all();

    let converter = Converter::from_config(&config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    // Rendu texte
    let conversion = converter.convert(&cli.image)?;
    report::write_summary(&mut out, &conversion)?;

    let ascii_path = config.ascii_path();
    write_text(&ascii_path, &conversion.text)?;
    report::write_saved(&mut out, "ASCII", &ascii_path)?;
    report::write_preview(
        &mut out,
        &conversion.text,
        config.preview_limit,
        config.preview_len,
    )?;

    // Rendu HTML coloré
    if config.html_enabled {
        let html = converter
            .convert_html(&cli.image)
            .context("Échec du rendu HTML")?;
        let html_path = config.html_path();
        write_chunked(&html_path, &html, CHUNK_SIZE)?;
        report::write_saved(&mut out, "HTML coloré", &html_path)?;
    }

    out.flush()?;
    Ok(())
}

/// Resolve config: --config file if given, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<ConvertConfig> {
    match cli.config {
        Some(ref path) => gm_core::config::load_config(path),
        None => Ok(ConvertConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use image::{Rgb, RgbImage};
    use std::ffi::OsStr;
    use std::path::Path;

    fn parse(image: &Path, out_dir: &Path) -> cli::Cli {
        cli::Cli::try_parse_from([
            OsStr::new("glyphmap"),
            image.as_os_str(),
            OsStr::new("40"),
            OsStr::new("-o"),
            out_dir.as_os_str(),
        ])
        .unwrap()
    }

    fn failure_message(result: Result<()>) -> String {
        let mut err = Vec::new();
        assert_eq!(exit_status(result, &mut err), ExitCode::FAILURE);
        String::from_utf8(err).unwrap()
    }

    #[test]
    fn writes_text_and_html() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("gray.png");
        RgbImage::from_pixel(80, 40, Rgb([128, 128, 128]))
            .save(&image)
            .unwrap();
        let out = dir.path().join("out");

        let mut err = Vec::new();
        let status = exit_status(run(&parse(&image, &out)), &mut err);
        assert_eq!(status, ExitCode::SUCCESS);
        assert!(err.is_empty());

        let text = std::fs::read_to_string(out.join("output_ascii.txt")).unwrap();
        // 40 * 0.5 * 0.5 = 10 rows
        assert_eq!(text.lines().count(), 10);
        let html = std::fs::read_to_string(out.join("output_colored.html")).unwrap();
        assert!(html.ends_with("</pre>"));
    }

    #[test]
    fn missing_image_fails_with_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let cli = parse(&dir.path().join("absent.png"), dir.path());
        let message = failure_message(run(&cli));
        assert!(message.starts_with("Erreur : "));
        assert_eq!(message.lines().count(), 1);
        assert!(!dir.path().join("output_ascii.txt").exists());
    }

    #[test]
    fn unwritable_destination_fails_with_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("black.png");
        RgbImage::new(20, 20).save(&image).unwrap();
        // A regular file where the output directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let message = failure_message(run(&parse(&image, &blocker.join("sub"))));
        assert!(message.starts_with("Erreur : "));
        assert_eq!(message.lines().count(), 1);
    }
}
