// ============================================================================
// Surface de dessin
// ============================================================================
// Le rendu ne connaît que le trait `Surface` : rectangles, texte, lignes,
// mesure de texte et rotation. `Frame` l'implémente avec embedded-graphics
// sur un framebuffer d'encres.
//
// CONCEPT RUST : Trait comme frontière
// - Les tests remplacent Frame par une surface qui enregistre les appels
// ============================================================================

use std::convert::Infallible;

use embedded_graphics::mono_font::iso_8859_15::{FONT_10X20, FONT_6X10, FONT_8X13, FONT_8X13_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, PrimitiveStyleBuilder, StrokeAlignment};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};

use crate::ui::color::{Accent, Ink};
use crate::ui::layout::Region;

/// Polices disponibles (bitmap, jeu ISO-8859-15 pour € £ ¥)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    /// Paire, date, période du graphique
    Small,
    /// Labels "High:" / "Low:"
    Medium,
    /// Valeurs high / low
    MediumBold,
    /// Prix courant
    Large,
}

impl FontSize {
    fn font(self) -> &'static MonoFont<'static> {
        match self {
            FontSize::Small => &FONT_6X10,
            FontSize::Medium => &FONT_8X13,
            FontSize::MediumBold => &FONT_8X13_BOLD,
            FontSize::Large => &FONT_10X20,
        }
    }
}

/// Primitives de dessin consommées par le rendu
pub trait Surface {
    /// Remplit la zone et trace sa bordure (1 pixel, bords inclus)
    fn fill_rect(&mut self, region: Region, fill: Ink, border: Ink);

    /// Dessine du texte, `position` = coin haut-gauche
    fn draw_text(&mut self, position: Point, text: &str, color: Ink, font: FontSize);

    fn draw_line(&mut self, from: Point, to: Point, color: Ink, thickness: u32);

    /// Taille (largeur, hauteur) du texte rendu
    fn measure_text(&self, text: &str, font: FontSize) -> Size;

    fn rotate_180(&mut self);
}

/// Image de l'écran : une encre par pixel, ligne par ligne
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Ink>,
}

impl Frame {
    /// Nouvelle image blanche
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Ink::White)
    }

    pub fn filled(width: u32, height: u32, ink: Ink) -> Self {
        Self {
            width,
            height,
            pixels: vec![ink; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Ink> {
        if x < self.width && y < self.height {
            self.pixels.get((y * self.width + x) as usize).copied()
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[Ink] {
        &self.pixels
    }

    /// Index de palette du pilote pour chaque pixel
    pub fn to_native(&self, accent: Accent) -> Vec<u8> {
        self.pixels.iter().map(|ink| ink.to_native(accent)).collect()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Frame {
    type Color = Ink;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, ink) in pixels {
            // Les pixels hors écran sont ignorés
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < self.width
                && (point.y as u32) < self.height
            {
                let index = point.y as u32 * self.width + point.x as u32;
                self.pixels[index as usize] = ink;
            }
        }
        Ok(())
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

impl Surface for Frame {
    fn fill_rect(&mut self, region: Region, fill: Ink, border: Ink) {
        let style = PrimitiveStyleBuilder::new()
            .fill_color(fill)
            .stroke_color(border)
            .stroke_width(1)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        infallible(region.outline().into_styled(style).draw(self));
    }

    fn draw_text(&mut self, position: Point, text: &str, color: Ink, font: FontSize) {
        let style = MonoTextStyle::new(font.font(), color);
        infallible(Text::with_baseline(text, position, style, Baseline::Top).draw(self));
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Ink, thickness: u32) {
        infallible(
            Line::new(from, to)
                .into_styled(PrimitiveStyle::with_stroke(color, thickness))
                .draw(self),
        );
    }

    fn measure_text(&self, text: &str, font: FontSize) -> Size {
        MonoTextStyle::new(font.font(), Ink::Black)
            .measure_string(text, Point::zero(), Baseline::Top)
            .bounding_box
            .size
    }

    fn rotate_180(&mut self) {
        self.pixels.reverse();
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
