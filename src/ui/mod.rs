// ============================================================================
// Module : ui
// ============================================================================
// Tout ce qui produit l'image de l'écran :
// - layout : découpage en zones
// - color : encres et palette
// - chart : mise à l'échelle de l'historique
// - surface : primitives de dessin (embedded-graphics)
// - ticker : rendu de l'écran complet
// ============================================================================

pub mod chart;
pub mod color;
pub mod layout;
pub mod surface;
pub mod ticker;

pub use chart::{to_pixel, GraphMapper};
pub use color::{resolve_palette, Accent, ColorScheme, Ink, Palette};
pub use layout::{compute_layout, Layout, Region};
pub use surface::{FontSize, Frame, Surface};
pub use ticker::{render_ticker, TickerText};
