// ============================================================================
// Orchestration d'un run
// ============================================================================
// run_once : prix -> intervalle -> historique -> bornes -> layout -> rendu
//            -> une seule image envoyée à la sortie
// run_clean : remplissages pleine page successifs pour nettoyer l'écran
//
// Toute erreur arrête le run avant que la sortie ne soit touchée : l'écran
// garde l'image précédente.
//
// CONCEPT RUST : Génériques + ?Sized
// - run_once accepte aussi bien un KrakenClient qu'un `dyn MarketData`
// ============================================================================

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use tracing::{debug, info};

use crate::api::MarketData;
use crate::config::{DisplayModel, RenderConfig};
use crate::display::DisplayOutput;
use crate::error::Result;
use crate::models::{compute_bounds, Interval, MarketSnapshot};
use crate::ui::{render_ticker, Frame, Ink};

/// Résultat d'un run réussi
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub interval: Interval,
    pub points: usize,
    /// Montants tels qu'affichés
    pub price: String,
    pub low: String,
    pub high: String,
}

/// Produit et affiche un écran complet
pub async fn run_once<M, D, Tz>(
    config: &RenderConfig,
    source: &M,
    output: &mut D,
    now: DateTime<Tz>,
) -> Result<RunSummary>
where
    M: MarketData + ?Sized,
    D: DisplayOutput + ?Sized,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    info!(
        pair = %config.asset_pair,
        range_days = config.range_days,
        display = ?config.display,
        monochrome = config.monochrome,
        rotate = config.rotate,
        holdings = ?config.holdings,
        "Starting ticker run"
    );
    debug!(colors = ?config.colors, padding = config.padding, "Render parameters");

    println!("📡 Getting price data...");
    let current_price = source.current_price(&config.asset_pair).await?;

    let interval = config.interval();
    info!(
        interval = %interval,
        expected_points = interval.expected_points(config.range_days),
        "Selected OHLC interval"
    );

    let series = source
        .historical_series(&config.asset_pair, config.range_days, interval)
        .await?;
    let bounds = compute_bounds(&config.asset_pair, &series)?;
    info!(points = series.len(), ?bounds, "Historical data ready");

    let snapshot = MarketSnapshot {
        pair: config.asset_pair.clone(),
        current_price,
        series,
    };

    println!("🖌️  Plotting...");
    let layout = config.layout();
    let palette = config.palette();
    let timestamp = now.format(&config.date_format).to_string();
    let mut frame = Frame::new(config.display.width(), config.display.height());
    let text = render_ticker(&mut frame, &snapshot, &bounds, &layout, &palette, config, &timestamp)?;

    println!("🖥️  Updating display...");
    output.show(&frame, palette.border)?;
    info!(price = %text.price, "Display updated");

    Ok(RunSummary {
        interval,
        points: snapshot.series.len(),
        price: text.price,
        low: text.low,
        high: text.high,
    })
}

/// Ordre des remplissages d'un cycle de nettoyage
pub const CLEAN_SEQUENCE: [Ink; 3] = [Ink::Accent, Ink::Black, Ink::White];

/// Remplit tout l'écran `cycles` fois avec chaque encre, bordure comprise
///
/// Retourne le nombre d'images envoyées.
pub fn run_clean<D>(model: DisplayModel, cycles: u32, output: &mut D, pause: Duration) -> Result<usize>
where
    D: DisplayOutput + ?Sized,
{
    info!(?model, cycles, "Cleaning display");
    let mut pushed = 0;

    for cycle in 1..=cycles {
        for ink in CLEAN_SEQUENCE {
            if pushed > 0 && !pause.is_zero() {
                std::thread::sleep(pause);
            }
            println!("🧽 Cycle {}/{} : {:?}", cycle, cycles, ink);
            let frame = Frame::filled(model.width(), model.height(), ink);
            output.show(&frame, ink)?;
            pushed += 1;
        }
    }

    info!(pushed, "Display cleaned");
    Ok(pushed)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TickerError;
    use crate::models::PricePoint;
    use async_trait::async_trait;
    use chrono::Utc;

    /// Source de données en mémoire
    struct FakeMarket {
        price: f64,
        series: Vec<PricePoint>,
        fail_price: bool,
    }

    impl FakeMarket {
        fn with_series(series: Vec<PricePoint>) -> Self {
            Self {
                price: 45231.4,
                series,
                fail_price: false,
            }
        }
    }

    #[async_trait]
    impl MarketData for FakeMarket {
        async fn current_price(&self, pair: &str) -> Result<f64> {
            if self.fail_price {
                return Err(TickerError::parse(pair, "EQuery:Unknown asset pair"));
            }
            Ok(self.price)
        }

        async fn historical_series(
            &self,
            _pair: &str,
            _range_days: u32,
            _interval: Interval,
        ) -> Result<Vec<PricePoint>> {
            Ok(self.series.clone())
        }
    }

    /// Sortie qui garde les images reçues
    #[derive(Default)]
    struct Recorder {
        shown: Vec<(Frame, Ink)>,
    }

    impl DisplayOutput for Recorder {
        fn show(&mut self, frame: &Frame, border: Ink) -> Result<()> {
            self.shown.push((frame.clone(), border));
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
    }

    fn series() -> Vec<PricePoint> {
        vec![
            PricePoint::new(1_700_000_000, 44_000.0, 43_500.0),
            PricePoint::new(1_700_000_300, 45_500.0, 43_900.0),
            PricePoint::new(1_700_000_600, 45_100.0, 44_800.0),
        ]
    }

    #[tokio::test]
    async fn test_run_once_shows_one_frame() {
        let config = RenderConfig::default();
        let market = FakeMarket::with_series(series());
        let mut output = Recorder::default();

        let summary = run_once(&config, &market, &mut output, now()).await.unwrap();

        assert_eq!(summary.interval, Interval::M5);
        assert_eq!(summary.points, 3);
        assert_eq!(summary.price, "$ 45 231");
        assert_eq!(summary.high, "$ 45 500");
        assert_eq!(summary.low, "$ 43 500");

        assert_eq!(output.shown.len(), 1);
        let (frame, border) = &output.shown[0];
        assert_eq!((frame.width(), frame.height()), (212, 104));
        assert_eq!(*border, config.palette().border);
    }

    #[tokio::test]
    async fn test_run_once_works_through_trait_objects() {
        let config = RenderConfig::default();
        let market: Box<dyn MarketData + Send + Sync> = Box::new(FakeMarket::with_series(series()));
        let mut output: Box<dyn DisplayOutput> = Box::new(Recorder::default());

        assert!(run_once(&config, market.as_ref(), output.as_mut(), now()).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_series_never_reaches_display() {
        let config = RenderConfig::default();
        let market = FakeMarket::with_series(Vec::new());
        let mut output = Recorder::default();

        let err = run_once(&config, &market, &mut output, now()).await.unwrap_err();
        assert!(matches!(err, TickerError::EmptySeries { .. }));
        assert!(output.shown.is_empty());
    }

    #[tokio::test]
    async fn test_flat_series_is_degenerate() {
        let config = RenderConfig::default();
        let flat = vec![
            PricePoint::new(1_700_000_000, 100.0, 99.0),
            PricePoint::new(1_700_000_300, 100.0, 98.0),
        ];
        let market = FakeMarket::with_series(flat);
        let mut output = Recorder::default();

        let err = run_once(&config, &market, &mut output, now()).await.unwrap_err();
        assert!(matches!(err, TickerError::DegenerateRange { axis: "value" }));
        assert!(output.shown.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let config = RenderConfig::default();
        let market = FakeMarket {
            fail_price: true,
            ..FakeMarket::with_series(series())
        };
        let mut output = Recorder::default();

        let err = run_once(&config, &market, &mut output, now()).await.unwrap_err();
        assert!(matches!(err, TickerError::Parse { ref pair, .. } if pair == "XXBTZUSD"));
        assert!(output.shown.is_empty());
    }

    #[tokio::test]
    async fn test_rotation_changes_the_frame() {
        let market = FakeMarket::with_series(series());
        let mut straight = Recorder::default();
        let mut flipped = Recorder::default();

        let config = RenderConfig::default();
        run_once(&config, &market, &mut straight, now()).await.unwrap();
        let rotated = RenderConfig {
            rotate: true,
            ..RenderConfig::default()
        };
        run_once(&rotated, &market, &mut flipped, now()).await.unwrap();

        let mut expected = straight.shown[0].0.pixels().to_vec();
        expected.reverse();
        assert_eq!(flipped.shown[0].0.pixels(), expected.as_slice());
    }

    #[test]
    fn test_clean_cycles_through_inks() {
        let mut output = Recorder::default();
        let pushed = run_clean(DisplayModel::Phat, 2, &mut output, Duration::ZERO).unwrap();

        assert_eq!(pushed, 6);
        let borders: Vec<Ink> = output.shown.iter().map(|(_, border)| *border).collect();
        assert_eq!(
            borders,
            vec![Ink::Accent, Ink::Black, Ink::White, Ink::Accent, Ink::Black, Ink::White]
        );
        for (frame, ink) in &output.shown {
            assert!(frame.pixels().iter().all(|pixel| pixel == ink));
        }
    }
}
