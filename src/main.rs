// ============================================================================
// InkyTicker - Point d'entrée
// ============================================================================
// Un run = un écran : lit la configuration, récupère les prix sur Kraken,
// dessine l'écran et l'écrit en PNG (et dans le terminal avec --preview).
// À lancer périodiquement (cron, timer systemd) pour rafraîchir l'écran.
//
// CONCEPTS RUST CLÉS :
// 1. Async dans sync : tokio::runtime::Runtime pour les appels API
// 2. anyhow::Context : ajoute du contexte aux erreurs de la bibliothèque
// 3. Code de sortie explicite : 1 en cas d'erreur
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{error, info};

use inkyticker::api::KrakenClient;
use inkyticker::app::{run_clean, run_once};
use inkyticker::config::{CleanArgs, Cli, Command, RenderConfig, TickerArgs};
use inkyticker::display::{Outputs, PngOutput, TerminalPreview};
use inkyticker::ui::Accent;

// ============================================================================
// Logging
// ============================================================================

/// Initialise le logging vers fichier (et stderr avec --verbose)
///
/// Les logs sont écrits dans :
/// - Linux : ~/.local/share/inkyticker/logs/inkyticker.log
/// - macOS : ~/Library/Application Support/inkyticker/logs/inkyticker.log
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/inkyticker/logs/inkyticker.log
/// RUST_LOG=inkyticker=trace inkyticker --verbose
/// ```
fn init_logging(verbose: bool) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_dir = dirs::data_local_dir()
        .map(|dir| dir.join("inkyticker").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"));

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    // Rotation quotidienne : inkyticker.log.2026-10-18
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "inkyticker.log");

    let default_filter = if verbose {
        "inkyticker=debug,info"
    } else {
        "inkyticker=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        // CONCEPT : Option<Layer> est aussi un Layer (None = désactivé)
        .with(verbose.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .try_init()
        .context("Échec de l'initialisation du logging")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    let result = match cli.command {
        Some(Command::Clean(args)) => clean(args),
        None => ticker(&cli.ticker),
    };

    if let Err(e) = result {
        error!(error = ?e, "Run failed");
        eprintln!("❌ Erreur : {:#}", e);
        std::process::exit(1);
    }
}

/// Sorties d'affichage : PNG toujours, terminal en option
fn build_outputs(path: PathBuf, accent: Accent, preview: bool) -> Outputs {
    let outputs = Outputs::new().with(Box::new(PngOutput::new(path, accent)));
    if preview {
        outputs.with(Box::new(TerminalPreview::new(accent)))
    } else {
        outputs
    }
}

/// Un rendu du ticker
fn ticker(args: &TickerArgs) -> Result<()> {
    let config = RenderConfig::load(args).context("Configuration invalide")?;
    info!(pair = %config.asset_pair, output = %config.output.display(), "InkyTicker starting up");

    let client = KrakenClient::new().context("Impossible de créer le client HTTP")?;
    let mut outputs = build_outputs(config.output.clone(), config.accent, config.preview);

    // CONCEPT RUST : Exécuter du code async dans du code sync
    // - Runtime::block_on() attend la fin de la future
    let runtime = tokio::runtime::Runtime::new()?;
    let summary = runtime
        .block_on(run_once(&config, &client, &mut outputs, Local::now()))
        .with_context(|| format!("Échec du rendu pour {}", config.asset_pair))?;

    println!(
        "✅ Done : {} {} (low {}, high {}, {} points à {})",
        config.asset_pair, summary.price, summary.low, summary.high, summary.points, summary.interval
    );
    println!("   Image écrite dans {}", config.output.display());
    Ok(())
}

/// Nettoyage de l'écran
fn clean(args: CleanArgs) -> Result<()> {
    let mut outputs = build_outputs(args.output.clone(), args.accent, args.preview);
    let pushed = run_clean(
        args.display,
        args.cycles,
        &mut outputs,
        Duration::from_millis(args.pause_ms),
    )
    .context("Échec du nettoyage de l'écran")?;

    println!("✅ Done : {} images envoyées", pushed);
    Ok(())
}
