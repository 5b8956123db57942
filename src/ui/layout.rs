// ============================================================================
// Layout : découpage de l'écran
// ============================================================================
// ┌──────────────────────────────┐
// │ header (paire, prix, date)   │  moitié haute, toute la largeur
// ├───────────────┬──────────────┤
// │ graphique     │ High / Low   │  moitié basse, coupée en deux
// └───────────────┴──────────────┘
//
// Avant le découpage, on retire `shrink` pixels à la largeur et à la
// hauteur : sur l'InkyPHAT, la bordure d'un rectangle qui touche le bord
// droit/bas de l'écran n'apparaît pas.
// ============================================================================

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::primitives::Rectangle;

/// Zone rectangulaire alignée sur les axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x + self.width as i32 / 2,
            self.y + self.height as i32 / 2,
        )
    }

    /// Rectangle à dessiner, bords inclus des deux côtés : deux régions
    /// voisines partagent leur ligne de bordure
    pub fn outline(&self) -> Rectangle {
        Rectangle::new(self.origin(), Size::new(self.width + 1, self.height + 1))
    }

    fn overlaps(&self, other: &Region) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Les quatre zones de l'écran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Surface utile après retrait du `shrink`
    pub width: u32,
    pub height: u32,
    pub header: Region,
    /// Zone du gros prix, à l'intérieur du header
    pub price: Region,
    pub graph: Region,
    pub stats: Region,
}

/// Calcule le layout pour un écran `display_width` x `display_height`
pub fn compute_layout(display_width: u32, display_height: u32, padding: u32, shrink: u32) -> Layout {
    let width = display_width.saturating_sub(shrink);
    let height = display_height.saturating_sub(shrink);

    let half_width = width / 2;
    let half_height = height / 2;
    let lower_height = height - half_height;

    let header = Region::new(0, 0, width, half_height);
    let price = Region::new(
        padding as i32,
        0,
        width.saturating_sub(2 * padding),
        half_height,
    );
    let graph = Region::new(0, half_height as i32, half_width, lower_height);
    let stats = Region::new(
        half_width as i32,
        half_height as i32,
        width - half_width,
        lower_height,
    );

    debug_assert!(!graph.overlaps(&stats) && !header.overlaps(&graph) && !header.overlaps(&stats));

    Layout {
        width,
        height,
        header,
        price,
        graph,
        stats,
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phat_layout_with_shrink() {
        let layout = compute_layout(212, 104, 0, 2);
        assert_eq!(layout.graph, Region::new(0, 51, 105, 51));
        assert_eq!(layout.stats, Region::new(105, 51, 105, 51));
        assert_eq!(layout.header, Region::new(0, 0, 210, 51));
    }

    #[test]
    fn test_regions_tile_without_gaps() {
        for (w, h) in [(212, 104), (400, 300), (213, 105), (17, 9)] {
            let layout = compute_layout(w, h, 5, 2);
            assert_eq!(layout.graph.right(), layout.stats.x);
            assert_eq!(layout.stats.right() as u32, layout.width);
            assert_eq!(layout.header.bottom(), layout.graph.y);
            assert_eq!(layout.graph.bottom() as u32, layout.height);
            assert_eq!(layout.stats.bottom(), layout.graph.bottom());
            assert!(!layout.graph.overlaps(&layout.stats));
        }
    }

    #[test]
    fn test_price_region_inside_header() {
        let layout = compute_layout(212, 104, 5, 2);
        assert_eq!(layout.price, Region::new(5, 0, 200, 51));
        assert_eq!(layout.price.center(), layout.header.center());
    }

    #[test]
    fn test_shrink_is_configurable() {
        let layout = compute_layout(400, 300, 5, 0);
        assert_eq!(layout.width, 400);
        assert_eq!(layout.graph, Region::new(0, 150, 200, 150));
    }

    #[test]
    fn test_outline_includes_far_edge() {
        let outline = Region::new(0, 51, 105, 51).outline();
        assert_eq!(outline.size, Size::new(106, 52));
    }
}
