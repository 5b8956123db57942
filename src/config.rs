// ============================================================================
// Module : config
// ============================================================================
// Configuration d'un run, construite une seule fois :
//   valeurs par défaut -> fichier JSON (--config) -> arguments CLI
// puis figée dans un RenderConfig immuable.
//
// CONCEPTS RUST :
// 1. clap derive : les arguments sont décrits par des structs
// 2. Option<T> : "non renseigné" est distinct de la valeur par défaut,
//    ce qui permet de fusionner les sources
// ============================================================================

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use clap::{value_parser, Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TickerError};
use crate::models::{currency_symbol, Interval, MAX_API_DATAPOINTS};
use crate::ui::color::{resolve_palette, Accent, ColorScheme, Ink, Palette};
use crate::ui::layout::{compute_layout, Layout};

pub const DEFAULT_ASSET_PAIR: &str = "XXBTZUSD";
pub const DEFAULT_RANGE_DAYS: u32 = 1;
pub const DEFAULT_LINE_THICKNESS: u32 = 1;
/// Marge entre le bord d'une zone et son contenu
pub const DEFAULT_PADDING: u32 = 5;
/// Pixels retirés à droite et en bas (bordure invisible de l'InkyPHAT)
pub const DEFAULT_SHRINK: u32 = 2;
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";
pub const DEFAULT_SEPARATOR: &str = " ";
pub const DEFAULT_OUTPUT: &str = "inkyticker.png";

// ============================================================================
// Modèle d'écran
// ============================================================================

/// Écrans e-ink supportés
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayModel {
    /// InkyPHAT, 212x104
    #[default]
    Phat,
    /// InkyWHAT, 400x300
    What,
}

impl DisplayModel {
    pub fn width(&self) -> u32 {
        match self {
            DisplayModel::Phat => 212,
            DisplayModel::What => 400,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            DisplayModel::Phat => 104,
            DisplayModel::What => 300,
        }
    }
}

// ============================================================================
// Ligne de commande
// ============================================================================

/// Ticker crypto avec graphique pour écran e-ink Inky (pHAT / wHAT)
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Logs détaillés sur la sortie d'erreur
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub ticker: TickerArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Nettoie l'écran en le remplissant plusieurs fois de chaque couleur
    Clean(CleanArgs),
}

/// Arguments du rendu du ticker (commande par défaut)
#[derive(Debug, Default, Args)]
pub struct TickerArgs {
    /// Paire à suivre. Ex: XXBTZUSD, XXBTZEUR, XETHZUSD
    #[arg(short = 'p', long, visible_alias = "assetpair")]
    pub asset_pair: Option<String>,

    /// Symbole monétaire (déduit de la paire si absent)
    #[arg(short = 'c', long, alias = "currencysymbol")]
    pub currency_symbol: Option<String>,

    /// Nombre de jours d'historique dans le graphique
    #[arg(short = 'r', long = "range", value_parser = value_parser!(u32).range(1..))]
    pub range_days: Option<u32>,

    /// Avoirs : affiche leur valeur au lieu du prix unitaire
    #[arg(long)]
    pub holdings: Option<f64>,

    /// Retourne l'écran de 180°
    #[arg(short = 'f', long, alias = "flipscreen")]
    pub rotate: bool,

    /// Noir et blanc uniquement (rafraîchissement plus rapide)
    #[arg(long, visible_alias = "blackandwhite")]
    pub monochrome: bool,

    /// Couleur de fond
    #[arg(long, value_enum, alias = "backgroundcolor")]
    pub background_color: Option<Ink>,

    /// Couleur des textes (paire, labels, date)
    #[arg(long, value_enum, alias = "textcolor")]
    pub text_color: Option<Ink>,

    /// Couleur des prix
    #[arg(long, value_enum, alias = "pricecolor")]
    pub price_color: Option<Ink>,

    /// Couleur de la courbe
    #[arg(long, value_enum, alias = "graphforegroundcolor")]
    pub graph_foreground_color: Option<Ink>,

    /// Couleur de fond du graphique
    #[arg(long, value_enum, alias = "graphbackgroundcolor")]
    pub graph_background_color: Option<Ink>,

    /// Couleur des bordures
    #[arg(long, value_enum, alias = "bordercolor")]
    pub border_color: Option<Ink>,

    /// Épaisseur de la courbe en pixels
    #[arg(long, alias = "linethickness", value_parser = value_parser!(u32).range(1..))]
    pub line_thickness: Option<u32>,

    /// Marge intérieure des zones en pixels
    #[arg(long)]
    pub padding: Option<u32>,

    /// Modèle d'écran
    #[arg(long, value_enum)]
    pub display: Option<DisplayModel>,

    /// Couleur de la troisième encre
    #[arg(long, value_enum)]
    pub accent: Option<Accent>,

    /// Pixels retirés en largeur et hauteur avant le découpage
    #[arg(long)]
    pub shrink: Option<u32>,

    /// Nombre maximum de points renvoyés par l'API
    #[arg(long, value_parser = value_parser!(u32).range(1..))]
    pub max_points: Option<u32>,

    /// Format strftime de la date affichée
    #[arg(long)]
    pub date_format: Option<String>,

    /// Séparateur des milliers
    #[arg(long)]
    pub separator: Option<String>,

    /// Fichier PNG de l'écran émulé
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Affiche aussi l'image dans le terminal
    #[arg(long)]
    pub preview: bool,

    /// Fichier de configuration JSON
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Arguments de la commande `clean`
#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Nombre de cycles accent / noir / blanc
    #[arg(long, default_value_t = 3)]
    pub cycles: u32,

    #[arg(long, value_enum, default_value_t = DisplayModel::Phat)]
    pub display: DisplayModel,

    #[arg(long, value_enum, default_value_t = Accent::Red)]
    pub accent: Accent,

    /// Pause entre deux couleurs, en millisecondes
    #[arg(long, default_value_t = 1000)]
    pub pause_ms: u64,

    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    #[arg(long)]
    pub preview: bool,
}

// ============================================================================
// Fichier de configuration
// ============================================================================

/// Contenu du fichier JSON : tous les champs sont optionnels
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub asset_pair: Option<String>,
    pub currency_symbol: Option<String>,
    pub range_days: Option<u32>,
    pub holdings: Option<f64>,
    pub monochrome: Option<bool>,
    pub rotate: Option<bool>,
    pub background: Option<Ink>,
    pub text: Option<Ink>,
    pub price: Option<Ink>,
    pub graph_foreground: Option<Ink>,
    pub graph_background: Option<Ink>,
    pub border: Option<Ink>,
    pub line_thickness: Option<u32>,
    pub padding: Option<u32>,
    pub display: Option<DisplayModel>,
    pub accent: Option<Accent>,
    pub shrink: Option<u32>,
    pub max_points: Option<u32>,
    pub date_format: Option<String>,
    pub separator: Option<String>,
    pub output: Option<PathBuf>,
    pub preview: Option<bool>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| TickerError::Config {
            path: Some(path.to_path_buf()),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| TickerError::Config {
            path: Some(path.to_path_buf()),
            reason: e.to_string(),
        })
    }
}

// ============================================================================
// Configuration résolue
// ============================================================================

/// Paramètres d'un run, immuables après construction
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Toujours en majuscules
    pub asset_pair: String,
    pub currency_symbol: String,
    pub range_days: u32,
    pub holdings: Option<f64>,
    pub monochrome: bool,
    pub rotate: bool,
    pub line_thickness: u32,
    pub padding: u32,
    pub colors: ColorScheme,
    pub display: DisplayModel,
    pub accent: Accent,
    pub shrink: u32,
    pub max_points: u32,
    pub date_format: String,
    pub separator: String,
    pub output: PathBuf,
    pub preview: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            asset_pair: DEFAULT_ASSET_PAIR.to_string(),
            currency_symbol: currency_symbol(DEFAULT_ASSET_PAIR),
            range_days: DEFAULT_RANGE_DAYS,
            holdings: None,
            monochrome: false,
            rotate: false,
            line_thickness: DEFAULT_LINE_THICKNESS,
            padding: DEFAULT_PADDING,
            colors: ColorScheme::default(),
            display: DisplayModel::default(),
            accent: Accent::default(),
            shrink: DEFAULT_SHRINK,
            max_points: MAX_API_DATAPOINTS,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            preview: false,
        }
    }
}

impl RenderConfig {
    /// Lit le fichier de configuration éventuel puis applique les arguments
    pub fn load(args: &TickerArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        Self::from_sources(file, args)
    }

    /// Fusion défauts -> fichier -> CLI, puis validation
    pub fn from_sources(file: ConfigFile, args: &TickerArgs) -> Result<Self> {
        let defaults = Self::default();

        let asset_pair = args
            .asset_pair
            .clone()
            .or(file.asset_pair)
            .unwrap_or(defaults.asset_pair)
            .trim()
            .to_uppercase();

        let currency_symbol = args
            .currency_symbol
            .clone()
            .or(file.currency_symbol)
            .unwrap_or_else(|| currency_symbol(&asset_pair));

        let base = defaults.colors;
        let colors = ColorScheme {
            background: args.background_color.or(file.background).unwrap_or(base.background),
            text: args.text_color.or(file.text).unwrap_or(base.text),
            price: args.price_color.or(file.price).unwrap_or(base.price),
            graph_foreground: args
                .graph_foreground_color
                .or(file.graph_foreground)
                .unwrap_or(base.graph_foreground),
            graph_background: args
                .graph_background_color
                .or(file.graph_background)
                .unwrap_or(base.graph_background),
            border: args.border_color.or(file.border).unwrap_or(base.border),
        };

        let config = Self {
            asset_pair,
            currency_symbol,
            range_days: args.range_days.or(file.range_days).unwrap_or(defaults.range_days),
            holdings: args.holdings.or(file.holdings),
            monochrome: args.monochrome || file.monochrome.unwrap_or(defaults.monochrome),
            rotate: args.rotate || file.rotate.unwrap_or(defaults.rotate),
            line_thickness: args
                .line_thickness
                .or(file.line_thickness)
                .unwrap_or(defaults.line_thickness),
            padding: args.padding.or(file.padding).unwrap_or(defaults.padding),
            colors,
            display: args.display.or(file.display).unwrap_or(defaults.display),
            accent: args.accent.or(file.accent).unwrap_or(defaults.accent),
            shrink: args.shrink.or(file.shrink).unwrap_or(defaults.shrink),
            max_points: args.max_points.or(file.max_points).unwrap_or(defaults.max_points),
            date_format: args
                .date_format
                .clone()
                .or(file.date_format)
                .unwrap_or(defaults.date_format),
            separator: args.separator.clone().or(file.separator).unwrap_or(defaults.separator),
            output: args.output.clone().or(file.output).unwrap_or(defaults.output),
            preview: args.preview || file.preview.unwrap_or(defaults.preview),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.asset_pair.is_empty() {
            return Err(TickerError::config("asset pair must not be empty"));
        }
        if self.range_days == 0 {
            return Err(TickerError::config("range must be at least 1 day"));
        }
        if self.line_thickness == 0 {
            return Err(TickerError::config("line thickness must be at least 1 pixel"));
        }
        if self.max_points == 0 {
            return Err(TickerError::config("max points must be at least 1"));
        }
        if let Some(holdings) = self.holdings {
            if !(holdings.is_finite() && holdings > 0.0) {
                return Err(TickerError::config(format!(
                    "holdings must be a positive number, got {}",
                    holdings
                )));
            }
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(TickerError::config(format!(
                "invalid date format {:?}",
                self.date_format
            )));
        }
        let layout = self.layout();
        if layout.graph.width <= 2 * self.padding || layout.graph.height <= 2 * self.padding {
            return Err(TickerError::config(format!(
                "padding {} leaves no room for the graph",
                self.padding
            )));
        }
        Ok(())
    }

    /// Granularité OHLC pour la période demandée
    pub fn interval(&self) -> Interval {
        Interval::select(self.range_days, self.max_points)
    }

    pub fn layout(&self) -> Layout {
        compute_layout(
            self.display.width(),
            self.display.height(),
            self.padding,
            self.shrink,
        )
    }

    pub fn palette(&self) -> Palette {
        resolve_palette(&self.colors, self.monochrome)
    }

    /// Label de la période affiché dans le graphique, ex: "7D"
    pub fn range_label(&self) -> String {
        format!("{}D", self.range_days)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
