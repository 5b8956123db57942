// ============================================================================
// Module : error
// ============================================================================
// Taxonomie des erreurs de la bibliothèque
//
// Toutes ces erreurs sont fatales pour un run : aucune image partielle n'est
// envoyée à l'écran. Le binaire les enveloppe dans anyhow pour l'affichage.
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// Erreurs possibles lors d'un rendu du ticker
#[derive(Debug, Error)]
pub enum TickerError {
    /// API injoignable ou erreur de transport
    #[error("Kraken API not reachable for {pair} (check the network connection and the API status): {source}")]
    Fetch {
        pair: String,
        #[source]
        source: reqwest::Error,
    },

    /// Réponse reçue mais sans les champs attendus (ex: paire inconnue)
    #[error("invalid or empty response from Kraken API for {pair} (is the asset pair valid?): {reason}")]
    Parse { pair: String, reason: String },

    /// L'historique ne contient aucune ligne
    #[error("no historical price data returned for {pair}")]
    EmptySeries { pair: String },

    /// Écart nul en temps ou en valeur : impossible de mettre à l'échelle
    #[error("cannot scale the graph: {axis} range is zero")]
    DegenerateRange { axis: &'static str },

    /// Échec d'écriture vers la sortie d'affichage
    #[error("display output failed ({target}): {reason}")]
    Output { target: String, reason: String },

    /// Fichier de configuration ou valeur invalide
    #[error("invalid configuration {path:?}: {reason}")]
    Config { path: Option<PathBuf>, reason: String },
}

impl TickerError {
    /// Raccourci pour les erreurs de parsing
    pub fn parse(pair: &str, reason: impl Into<String>) -> Self {
        TickerError::Parse {
            pair: pair.to_string(),
            reason: reason.into(),
        }
    }

    /// Raccourci pour les erreurs de sortie
    pub fn output(target: impl Into<String>, reason: impl ToString) -> Self {
        TickerError::Output {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    /// Raccourci pour une valeur de configuration invalide (hors fichier)
    pub fn config(reason: impl Into<String>) -> Self {
        TickerError::Config {
            path: None,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TickerError>;
