// ============================================================================
// Structures : PricePoint, SeriesBounds
// ============================================================================
// Historique de prix réduit à ce que le graphique consomme : timestamp, plus
// haut et plus bas de chaque bougie OHLC.
//
// CONCEPTS RUST :
// 1. Copy : PricePoint est petit, on le copie au lieu de l'emprunter
// 2. Un seul passage (fold) pour calculer toutes les bornes
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{Result, TickerError};

/// Un point de l'historique (immuable une fois créé)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Secondes depuis l'epoch
    pub timestamp: i64,

    /// Prix le plus haut (High) : utilisé pour le graphique
    pub high: f64,

    /// Prix le plus bas (Low) : utilisé uniquement pour le "Low" affiché
    pub low: f64,
}

impl PricePoint {
    pub fn new(timestamp: i64, high: f64, low: f64) -> Self {
        Self {
            timestamp,
            high,
            low,
        }
    }
}

/// Bornes de l'historique, recalculées à chaque rendu
///
/// `min_value`/`max_value` portent sur le champ `high`, `low_extreme` sur le
/// champ `low`. Rien ne garantit `low_extreme <= min_value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesBounds {
    pub min_time: i64,
    pub max_time: i64,
    pub min_value: f64,
    pub max_value: f64,
    pub low_extreme: f64,
}

impl SeriesBounds {
    /// Le "High" affiché est le plus haut des `high`
    pub fn high_extreme(&self) -> f64 {
        self.max_value
    }

    pub fn time_span(&self) -> i64 {
        self.max_time - self.min_time
    }

    pub fn value_span(&self) -> f64 {
        self.max_value - self.min_value
    }
}

/// Calcule les bornes d'un historique non vide
///
/// Toutes les valeurs sont initialisées avec le premier point, puis mises à
/// jour indépendamment. L'ordre de livraison n'est pas modifié.
pub fn compute_bounds(pair: &str, series: &[PricePoint]) -> Result<SeriesBounds> {
    let (first, rest) = series.split_first().ok_or_else(|| TickerError::EmptySeries {
        pair: pair.to_string(),
    })?;

    let seed = SeriesBounds {
        min_time: first.timestamp,
        max_time: first.timestamp,
        min_value: first.high,
        max_value: first.high,
        low_extreme: first.low,
    };

    Ok(rest.iter().fold(seed, |b, p| SeriesBounds {
        min_time: b.min_time.min(p.timestamp),
        max_time: b.max_time.max(p.timestamp),
        min_value: b.min_value.min(p.high),
        max_value: b.max_value.max(p.high),
        low_extreme: b.low_extreme.min(p.low),
    }))
}

/// Données brutes d'un cycle de rendu : prix courant + historique
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub pair: String,
    pub current_price: f64,
    pub series: Vec<PricePoint>,
}

/// Les trois montants affichés (prix ou valeur des avoirs)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerFigures {
    pub current: f64,
    pub low: f64,
    pub high: f64,
}

impl TickerFigures {
    /// Applique le multiplicateur d'avoirs s'il est défini
    pub fn new(current_price: f64, bounds: &SeriesBounds, holdings: Option<f64>) -> Self {
        let factor = holdings.unwrap_or(1.0);
        Self {
            current: current_price * factor,
            low: bounds.low_extreme * factor,
            high: bounds.high_extreme() * factor,
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
