// ============================================================================
// Module : display
// ============================================================================
// Destinations d'une image terminée. Sans matériel Inky, l'écran est émulé :
// - png : fichier PNG aux couleurs de l'écran
// - preview : aperçu dans le terminal (ratatui)
// ============================================================================

pub mod png;
pub mod preview;

use crate::error::Result;
use crate::ui::{Frame, Ink};

pub use png::PngOutput;
pub use preview::TerminalPreview;

/// Reçoit une image complète et l'affiche
pub trait DisplayOutput {
    /// `border` est la couleur du cadre physique autour de la zone dessinée
    fn show(&mut self, frame: &Frame, border: Ink) -> Result<()>;
}

/// Envoie la même image à plusieurs sorties, dans l'ordre d'ajout
#[derive(Default)]
pub struct Outputs {
    targets: Vec<Box<dyn DisplayOutput>>,
}

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, target: Box<dyn DisplayOutput>) -> Self {
        self.targets.push(target);
        self
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl DisplayOutput for Outputs {
    fn show(&mut self, frame: &Frame, border: Ink) -> Result<()> {
        for target in &mut self.targets {
            target.show(frame, border)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Counter(Arc<Mutex<Vec<Ink>>>);

    impl DisplayOutput for Counter {
        fn show(&mut self, _frame: &Frame, border: Ink) -> Result<()> {
            if let Ok(mut seen) = self.0.lock() {
                seen.push(border);
            }
            Ok(())
        }
    }

    #[test]
    fn test_outputs_fan_out() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut outputs = Outputs::new()
            .with(Box::new(Counter(seen.clone())))
            .with(Box::new(Counter(seen.clone())));
        assert_eq!(outputs.len(), 2);

        outputs.show(&Frame::new(2, 2), Ink::Black).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![Ink::Black, Ink::Black]);
    }
}
