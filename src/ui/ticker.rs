// ============================================================================
// Ticker - Rendu de l'écran complet
// ============================================================================
// Ordre de dessin (les dessins suivants recouvrent les précédents) :
//   1. fond + bordure du header
//   2. nom de la paire
//   3. prix courant, centré dans le header
//   4. fond + bordure du graphique
//   5. courbe des prix
//   6. fond + bordure du panneau High/Low
//   7. labels et valeurs High/Low
//   8. période du graphique
//   9. date et heure, alignées à droite dans le header
// puis rotation de 180° si demandée.
// ============================================================================

use embedded_graphics::geometry::Point;
use tracing::debug;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::models::{format_price, MarketSnapshot, SeriesBounds, TickerFigures};
use crate::ui::chart::GraphMapper;
use crate::ui::color::Palette;
use crate::ui::layout::Layout;
use crate::ui::surface::{FontSize, Surface};

const LABEL_HIGH: &str = "High:";
const LABEL_LOW: &str = "Low:";

/// Textes affichés, déjà formatés
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerText {
    pub price: String,
    pub low: String,
    pub high: String,
}

impl TickerText {
    pub fn new(figures: &TickerFigures, config: &RenderConfig) -> Self {
        let format = |amount: f64| format_price(amount, &config.currency_symbol, &config.separator);
        Self {
            price: format(figures.current),
            low: format(figures.low),
            high: format(figures.high),
        }
    }
}

/// Dessine un écran complet sur `surface`
///
/// La mise à l'échelle est préparée avant tout dessin : un historique plat
/// échoue sans rien tracer.
pub fn render_ticker<S: Surface>(
    surface: &mut S,
    snapshot: &MarketSnapshot,
    bounds: &SeriesBounds,
    layout: &Layout,
    palette: &Palette,
    config: &RenderConfig,
    timestamp: &str,
) -> Result<TickerText> {
    let mapper = GraphMapper::new(*bounds, layout.graph, config.padding)?;
    let figures = TickerFigures::new(snapshot.current_price, bounds, config.holdings);
    let text = TickerText::new(&figures, config);
    debug!(price = %text.price, low = %text.low, high = %text.high, "Formatted prices");

    let padding = config.padding as i32;

    // Header
    surface.fill_rect(layout.header, palette.background, palette.border);
    surface.draw_text(
        Point::new(layout.header.x + padding, layout.header.y),
        &snapshot.pair,
        palette.text,
        FontSize::Small,
    );

    let size = surface.measure_text(&text.price, FontSize::Large);
    let center = layout.price.center();
    surface.draw_text(
        Point::new(
            center.x - size.width as i32 / 2,
            center.y - size.height as i32 / 2,
        ),
        &text.price,
        palette.price,
        FontSize::Large,
    );

    // Graphique
    surface.fill_rect(layout.graph, palette.graph_background, palette.border);
    let points = mapper.plot_series(&snapshot.series);
    for (point, source) in points.iter().zip(&snapshot.series) {
        debug!(time = source.timestamp, value = source.high, x = point.x, y = point.y, "Plotted point");
    }
    for segment in points.windows(2) {
        surface.draw_line(segment[0], segment[1], palette.graph_foreground, config.line_thickness);
    }

    // Panneau High / Low
    let stats = layout.stats;
    surface.fill_rect(stats, palette.background, palette.border);

    let label_high = surface.measure_text(LABEL_HIGH, FontSize::Medium);
    let label_low = surface.measure_text(LABEL_LOW, FontSize::Medium);
    let x_label = stats.x + padding;
    let y_top = stats.y + stats.height as i32 / 4 - label_high.height as i32 / 2;
    let y_bottom = stats.y + stats.height as i32 * 3 / 4 - label_low.height as i32 / 2;

    surface.draw_text(Point::new(x_label, y_top), LABEL_HIGH, palette.text, FontSize::Medium);
    surface.draw_text(Point::new(x_label, y_bottom), LABEL_LOW, palette.text, FontSize::Medium);

    for (value, y) in [(&text.high, y_top), (&text.low, y_bottom)] {
        let width = surface.measure_text(value, FontSize::MediumBold).width as i32;
        surface.draw_text(
            Point::new(stats.right() - width - padding, y),
            value,
            palette.price,
            FontSize::MediumBold,
        );
    }

    // Période du graphique
    surface.draw_text(
        Point::new(layout.graph.x + padding, layout.graph.y),
        &config.range_label(),
        palette.graph_foreground,
        FontSize::Small,
    );

    // Date et heure
    let width = surface.measure_text(timestamp, FontSize::Small).width as i32;
    surface.draw_text(
        Point::new(layout.header.right() - width - padding, layout.header.y),
        timestamp,
        palette.text,
        FontSize::Small,
    );

    if config.rotate {
        surface.rotate_180();
    }

    Ok(text)
}

// ============================================================================
// Tests unitaires
// ============================================================================
