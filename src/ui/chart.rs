// ============================================================================
// Chart - Mise à l'échelle de l'historique vers les pixels du graphique
// ============================================================================
// Transformation affine (timestamp, prix) -> (x, y) dans la zone graphique,
// avec `padding` pixels de marge sur chaque bord.
//
// L'axe Y de l'écran descend, celui d'un graphique de prix monte : après la
// mise à l'échelle, y est retourné par rapport au bord bas de la zone.
// ============================================================================

use embedded_graphics::geometry::Point;

use crate::error::{Result, TickerError};
use crate::models::{PricePoint, SeriesBounds};
use crate::ui::layout::Region;

/// Mise à l'échelle pour un jeu de bornes et une zone donnés
#[derive(Debug, Clone, Copy)]
pub struct GraphMapper {
    bounds: SeriesBounds,
    region: Region,
    padding: i32,
    delta_screen_x: f64,
    delta_screen_y: f64,
    delta_time: f64,
    delta_value: f64,
}

impl GraphMapper {
    /// Échoue si l'historique est plat ou ne contient qu'un instant
    pub fn new(bounds: SeriesBounds, region: Region, padding: u32) -> Result<Self> {
        let delta_time = bounds.time_span() as f64;
        let delta_value = bounds.value_span();

        if delta_time == 0.0 {
            return Err(TickerError::DegenerateRange { axis: "time" });
        }
        if delta_value == 0.0 {
            return Err(TickerError::DegenerateRange { axis: "value" });
        }

        let padding = padding as i32;
        Ok(Self {
            bounds,
            region,
            padding,
            delta_screen_x: (region.width as i32 - 2 * padding) as f64,
            delta_screen_y: (region.height as i32 - 2 * padding) as f64,
            delta_time,
            delta_value,
        })
    }

    /// Convertit un couple (timestamp, valeur) en pixel
    pub fn map(&self, time: i64, value: f64) -> Point {
        let origin_x = (self.region.x + self.padding) as f64;
        let origin_y = (self.region.y + self.padding) as f64;

        let x = ((time - self.bounds.min_time) as f64 * self.delta_screen_x / self.delta_time
            + origin_x)
            .round() as i32;
        let y_raw = ((value - self.bounds.min_value) * self.delta_screen_y / self.delta_value
            + origin_y)
            .round() as i32;

        // Symétrie par rapport au bord bas de la zone
        let y = self.region.bottom() - y_raw + self.region.y;

        Point::new(x, y)
    }

    /// Projette l'historique (champ `high`) dans l'ordre de livraison
    pub fn plot_series(&self, series: &[PricePoint]) -> Vec<Point> {
        series.iter().map(|p| self.map(p.timestamp, p.high)).collect()
    }
}

/// Forme "une seule fois" de la mise à l'échelle
pub fn to_pixel(
    time: i64,
    value: f64,
    bounds: &SeriesBounds,
    region: Region,
    padding: u32,
) -> Result<Point> {
    Ok(GraphMapper::new(*bounds, region, padding)?.map(time, value))
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::compute_bounds;

    fn scenario() -> (Vec<PricePoint>, SeriesBounds, Region) {
        let series = vec![
            PricePoint::new(0, 100.0, 90.0),
            PricePoint::new(60, 150.0, 80.0),
            PricePoint::new(120, 120.0, 95.0),
        ];
        let bounds = compute_bounds("XXBTZUSD", &series).unwrap();
        (series, bounds, Region::new(0, 52, 106, 52))
    }

    #[test]
    fn test_end_to_end_scenario() {
        let (series, bounds, region) = scenario();
        let mapper = GraphMapper::new(bounds, region, 5).unwrap();
        let points = mapper.plot_series(&series);

        // Premier point : bord gauche utile, bas de la zone utile
        assert_eq!(points[0], Point::new(5, 99));
        // Maximum : haut de la zone utile
        assert_eq!(points[1], Point::new(53, 57));
        // Dernier timestamp : bord droit utile
        assert_eq!(points[2].x, 101);
    }

    #[test]
    fn test_monotonic_axes() {
        let (_, bounds, region) = scenario();
        let mapper = GraphMapper::new(bounds, region, 5).unwrap();

        let mut last_x = i32::MIN;
        for t in (0..=120).step_by(10) {
            let p = mapper.map(t, 120.0);
            assert!(p.x > last_x);
            last_x = p.x;
        }

        let mut last_y = i32::MAX;
        for v in [100.0, 110.0, 120.0, 130.0, 140.0, 150.0] {
            let p = mapper.map(60, v);
            assert!(p.y < last_y, "value {} -> y {}", v, p.y);
            last_y = p.y;
        }
    }

    #[test]
    fn test_points_stay_inside_padded_region() {
        let (_, bounds, region) = scenario();
        let mapper = GraphMapper::new(bounds, region, 5).unwrap();
        for (t, v) in [(0, 100.0), (120, 150.0), (0, 150.0), (120, 100.0)] {
            let p = mapper.map(t, v);
            assert!(p.x >= region.x + 5 && p.x <= region.right() - 5);
            assert!(p.y >= region.y + 5 && p.y <= region.bottom() - 5);
        }
    }

    #[test]
    fn test_to_pixel_matches_mapper() {
        let (_, bounds, region) = scenario();
        assert_eq!(to_pixel(0, 100.0, &bounds, region, 5).unwrap(), Point::new(5, 99));
    }

    #[test]
    fn test_degenerate_ranges() {
        let flat = compute_bounds(
            "X",
            &[PricePoint::new(0, 10.0, 9.0), PricePoint::new(60, 10.0, 8.0)],
        )
        .unwrap();
        let err = GraphMapper::new(flat, Region::new(0, 0, 10, 10), 0).unwrap_err();
        assert!(matches!(err, TickerError::DegenerateRange { axis: "value" }));

        let single = compute_bounds("X", &[PricePoint::new(0, 10.0, 9.0)]).unwrap();
        let err = GraphMapper::new(single, Region::new(0, 0, 10, 10), 0).unwrap_err();
        assert!(matches!(err, TickerError::DegenerateRange { axis: "time" }));
    }
}
