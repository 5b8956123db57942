// ============================================================================
// Module : api
// ============================================================================
// Sources de données de marché. Le reste du crate ne dépend que du trait
// MarketData ; KrakenClient en est l'implémentation HTTP.
// ============================================================================

pub mod kraken; // Client API publique Kraken

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Interval, PricePoint};

pub use kraken::KrakenClient;

/// Source de prix courant et d'historique OHLC
#[async_trait]
pub trait MarketData {
    /// Dernier prix échangé pour la paire
    async fn current_price(&self, pair: &str) -> Result<f64>;

    /// Historique (timestamp, high, low) sur `range_days` jours, dans l'ordre
    /// de livraison de la source
    async fn historical_series(
        &self,
        pair: &str,
        range_days: u32,
        interval: Interval,
    ) -> Result<Vec<PricePoint>>;
}
