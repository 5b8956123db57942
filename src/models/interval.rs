// ============================================================================
// Enum : Interval
// ============================================================================
// Granularité des bougies demandées à l'API OHLC de Kraken
//
// L'API renvoie au maximum 720 points par appel : on choisit la granularité la
// plus fine qui reste sous ce plafond pour la période demandée.
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

/// Nombre de minutes dans une journée
const MINUTES_PER_DAY: f64 = 1440.0;

/// Plafond de points renvoyés par l'appel OHLC de Kraken
pub const MAX_API_DATAPOINTS: u32 = 720;

/// Intervalle de temps entre les bougies
///
/// 1 minute existe aussi côté Kraken mais ne couvre même pas une journée
/// sous le plafond, on ne la propose donc pas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    /// 5 minutes
    M5,
    /// 15 minutes
    M15,
    /// 30 minutes
    M30,
    /// 1 heure
    H1,
    /// 4 heures
    H4,
    /// 1 jour
    D1,
    /// 1 semaine
    W1,
    /// 15 jours
    D15,
}

impl Interval {
    /// Tous les intervalles, du plus fin au plus grossier
    pub const ALL: [Interval; 8] = [
        Interval::M5,
        Interval::M15,
        Interval::M30,
        Interval::H1,
        Interval::H4,
        Interval::D1,
        Interval::W1,
        Interval::D15,
    ];

    /// Durée en minutes (valeur du paramètre `interval` de l'API)
    pub fn minutes(&self) -> u32 {
        match self {
            Interval::M5 => 5,
            Interval::M15 => 15,
            Interval::M30 => 30,
            Interval::H1 => 60,
            Interval::H4 => 240,
            Interval::D1 => 1440,
            Interval::W1 => 10080,
            Interval::D15 => 21600,
        }
    }

    /// Retourne le label court pour les logs
    pub fn label(&self) -> &'static str {
        match self {
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::H4 => "4h",
            Interval::D1 => "1d",
            Interval::W1 => "1w",
            Interval::D15 => "15d",
        }
    }

    /// Nombre de points attendus pour `range_days` jours à cette granularité
    ///
    /// Division flottante : 15 jours sur 1 jour de données donne 0.066...
    pub fn expected_points(&self, range_days: u32) -> f64 {
        MINUTES_PER_DAY / self.minutes() as f64 * range_days as f64
    }

    /// Choisit l'intervalle le plus fin dont le nombre de points attendus est
    /// strictement inférieur à `max_points`
    ///
    /// Si aucun ne convient, retourne le plus grossier (15 jours) : c'est un
    /// "best effort", pas une erreur.
    pub fn select(range_days: u32, max_points: u32) -> Interval {
        Self::ALL
            .iter()
            .copied()
            .find(|interval| interval.expected_points(range_days) < max_points as f64)
            .unwrap_or(Interval::D15)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Version "minutes" de [`Interval::select`]
pub fn select_interval(range_days: u32, max_points: u32) -> u32 {
    Interval::select(range_days, max_points).minutes()
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_day_uses_finest_interval() {
        // 1440 / 5 = 288 points < 720
        assert_eq!(Interval::select(1, MAX_API_DATAPOINTS), Interval::M5);
        assert_eq!(select_interval(1, 720), 5);
    }

    #[test]
    fn test_longer_ranges_get_coarser() {
        // 3 jours : 864 points en 5m, 288 en 15m
        assert_eq!(select_interval(3, 720), 15);
        // 30 jours : 720 points en 1h n'est pas strictement inférieur
        assert_eq!(select_interval(30, 720), 240);
        assert_eq!(select_interval(365, 720), 1440);
    }

    #[test]
    fn test_falls_back_to_coarsest() {
        assert_eq!(Interval::select(1_000_000, 720), Interval::D15);
        // 15 jours en 15d = exactement 1 point : aucun candidat sous le plafond
        assert_eq!(Interval::select(15, 1), Interval::D15);
        // 14 jours : 1 semaine donne 2 points, 15d en donne 0.93
        assert_eq!(Interval::select(14, 1), Interval::D15);
        assert_eq!(Interval::select(6, 1), Interval::W1);
    }

    #[test]
    fn test_result_respects_cap_or_is_coarsest() {
        for range in 1..=2000 {
            let interval = Interval::select(range, MAX_API_DATAPOINTS);
            assert!(
                interval.expected_points(range) < MAX_API_DATAPOINTS as f64
                    || interval == Interval::D15,
                "range {} -> {}",
                range,
                interval
            );
        }
    }

    #[test]
    fn test_candidates_are_ascending() {
        let minutes: Vec<u32> = Interval::ALL.iter().map(|i| i.minutes()).collect();
        assert_eq!(minutes, vec![5, 15, 30, 60, 240, 1440, 10080, 21600]);
    }
}
