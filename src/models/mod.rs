// ============================================================================
// Module : models
// ============================================================================
// Structures de données et calculs purs (aucune I/O)
// ============================================================================

pub mod interval; // Choix de la granularité OHLC
pub mod ohlc;     // Historique et bornes
pub mod price;    // Formatage des montants

// Re-export des éléments principaux
pub use interval::{select_interval, Interval, MAX_API_DATAPOINTS};
pub use ohlc::{compute_bounds, MarketSnapshot, PricePoint, SeriesBounds, TickerFigures};
pub use price::{currency_symbol, format_price};
