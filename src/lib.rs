// ============================================================================
// InkyTicker - Bibliothèque
// ============================================================================
// Ticker crypto pour écran e-ink : récupère le prix et l'historique d'une
// paire sur Kraken, dessine l'écran, et l'envoie à une sortie d'affichage.
//
// CONCEPT RUST : lib.rs vs main.rs
// - lib.rs : code réutilisable (et testable) exposé comme bibliothèque
// - main.rs : point d'entrée CLI qui assemble les morceaux
// ============================================================================

pub mod api; // Sources de données de marché
pub mod app; // Orchestration d'un run
pub mod config; // CLI, fichier JSON, configuration résolue
pub mod display; // Sorties d'affichage (PNG, terminal)
pub mod error; // TickerError
pub mod models; // Intervalles, historique, formatage des prix
pub mod ui; // Layout, couleurs, graphique, rendu
