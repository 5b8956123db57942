// ============================================================================
// Couleurs de l'écran e-ink
// ============================================================================
// L'écran n'a que trois encres : blanc, noir, et une troisième (rouge ou
// jaune selon le modèle). On les représente par un enum fermé, converti
// explicitement vers la valeur native (index de palette) ou vers du RGB.
//
// CONCEPT RUST : PixelColor
// - Ink implémente le trait de embedded-graphics pour pouvoir dessiner
//   directement avec des encres (Raw = () : pas de représentation binaire)
// ============================================================================

use clap::ValueEnum;
use embedded_graphics::pixelcolor::PixelColor;
use serde::{Deserialize, Serialize};

/// Une encre de l'écran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Ink {
    #[value(alias = "0")]
    White,
    #[value(alias = "1")]
    Black,
    /// Troisième encre (rouge/jaune)
    #[value(alias = "2")]
    Accent,
}

impl PixelColor for Ink {
    type Raw = ();
}

/// Couleur physique de la troisième encre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Red,
    Yellow,
    /// Écran noir et blanc : l'accent est imprimé en noir
    Black,
}

impl Ink {
    /// Index de palette attendu par le pilote Inky (WHITE=0, BLACK=1, couleur=2)
    pub fn to_native(self, accent: Accent) -> u8 {
        match (self, accent) {
            (Ink::White, _) => 0,
            (Ink::Black, _) | (Ink::Accent, Accent::Black) => 1,
            (Ink::Accent, _) => 2,
        }
    }

    /// Rendu RGB approximatif pour l'écran émulé
    pub fn to_rgb(self, accent: Accent) -> [u8; 3] {
        match (self, accent) {
            (Ink::White, _) => [255, 255, 255],
            (Ink::Black, _) | (Ink::Accent, Accent::Black) => [0, 0, 0],
            (Ink::Accent, Accent::Red) => [200, 30, 30],
            (Ink::Accent, Accent::Yellow) => [230, 190, 20],
        }
    }
}

/// Couleurs choisies par l'utilisateur pour chaque élément
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub background: Ink,
    pub text: Ink,
    pub price: Ink,
    pub graph_foreground: Ink,
    pub graph_background: Ink,
    pub border: Ink,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            background: Ink::White,
            text: Ink::Accent,
            price: Ink::Black,
            graph_foreground: Ink::White,
            graph_background: Ink::Black,
            border: Ink::Black,
        }
    }
}

/// Palette résolue, utilisée par le rendu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Ink,
    pub text: Ink,
    pub price: Ink,
    pub graph_foreground: Ink,
    pub graph_background: Ink,
    pub border: Ink,
}

/// Résout la palette : en mode monochrome, table fixe sans jamais d'accent
pub fn resolve_palette(scheme: &ColorScheme, monochrome: bool) -> Palette {
    if monochrome {
        return Palette {
            background: Ink::Black,
            text: Ink::White,
            price: Ink::White,
            graph_foreground: Ink::White,
            graph_background: Ink::Black,
            border: Ink::White,
        };
    }

    Palette {
        background: scheme.background,
        text: scheme.text,
        price: scheme.price,
        graph_foreground: scheme.graph_foreground,
        graph_background: scheme.graph_background,
        border: scheme.border,
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
