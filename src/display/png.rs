// ============================================================================
// Sortie PNG : écran émulé
// ============================================================================
// L'image est entourée d'une marge de la couleur du cadre, comme la bordure
// physique de l'écran Inky, puis écrite en PNG RGB.
// ============================================================================

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use tracing::info;

use crate::display::DisplayOutput;
use crate::error::{Result, TickerError};
use crate::ui::{Accent, Frame, Ink};

/// Épaisseur du cadre autour de la zone dessinée, en pixels
pub const BORDER_MARGIN: u32 = 4;

/// Écrit chaque image reçue dans un fichier PNG (écrasé à chaque fois)
#[derive(Debug, Clone)]
pub struct PngOutput {
    path: PathBuf,
    accent: Accent,
}

impl PngOutput {
    pub fn new(path: impl Into<PathBuf>, accent: Accent) -> Self {
        Self {
            path: path.into(),
            accent,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Convertit l'image en RGB, cadre compris
pub fn to_rgb_image(frame: &Frame, border: Ink, accent: Accent) -> RgbImage {
    let width = frame.width() + 2 * BORDER_MARGIN;
    let height = frame.height() + 2 * BORDER_MARGIN;
    let border = Rgb(border.to_rgb(accent));

    RgbImage::from_fn(width, height, |x, y| {
        let inner = x
            .checked_sub(BORDER_MARGIN)
            .zip(y.checked_sub(BORDER_MARGIN))
            .and_then(|(x, y)| frame.pixel(x, y));
        match inner {
            Some(ink) => Rgb(ink.to_rgb(accent)),
            None => border,
        }
    })
}

/// Encode l'image en PNG, en mémoire
pub fn encode_png(frame: &Frame, border: Ink, accent: Accent) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    to_rgb_image(frame, border, accent)
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| TickerError::output("png", e))?;
    Ok(bytes.into_inner())
}

impl DisplayOutput for PngOutput {
    fn show(&mut self, frame: &Frame, border: Ink) -> Result<()> {
        let target = self.path.display().to_string();
        let bytes = encode_png(frame, border, self.accent)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TickerError::output(&target, e))?;
        }
        std::fs::write(&self.path, bytes).map_err(|e| TickerError::output(&target, e))?;

        info!(path = %target, width = frame.width(), height = frame.height(), "Frame written");
        Ok(())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_margin_and_colors() {
        let frame = Frame::filled(3, 2, Ink::Accent);
        let image = to_rgb_image(&frame, Ink::Black, Accent::Yellow);

        assert_eq!(image.dimensions(), (3 + 8, 2 + 8));
        assert_eq!(image.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(image.get_pixel(BORDER_MARGIN, BORDER_MARGIN), &Rgb([230, 190, 20]));
        assert_eq!(image.get_pixel(BORDER_MARGIN + 3, BORDER_MARGIN), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_png_round_trip_dimensions() {
        let bytes = encode_png(&Frame::new(212, 104), Ink::White, Accent::Red).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (220, 112));
        assert_eq!(decoded.get_pixel(110, 50), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_show_writes_file() {
        let dir = std::env::temp_dir().join(format!("inkyticker-png-{}", std::process::id()));
        let path = dir.join("frame.png");
        let mut output = PngOutput::new(&path, Accent::Red);

        output.show(&Frame::filled(10, 10, Ink::Black), Ink::Black).unwrap();
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unwritable_path_is_output_error() {
        let path = std::env::temp_dir()
            .join(format!("inkyticker-blocker-{}", std::process::id()));
        std::fs::write(&path, b"not a directory").unwrap();

        let mut output = PngOutput::new(path.join("frame.png"), Accent::Red);
        let err = output.show(&Frame::new(2, 2), Ink::White).unwrap_err();
        assert!(matches!(err, TickerError::Output { .. }));

        let _ = std::fs::remove_file(&path);
    }
}
