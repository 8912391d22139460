//! Fehlertypen fuer Ledwand
//!
//! Zentraler Fehler-Enum der alle Fehlerzustaende des Host-Seams abdeckt.
//! Untermodule koennen eigene Fehler definieren und via `#[from]` konvertieren.

use thiserror::Error;

/// Globaler Result-Alias fuer Ledwand
pub type Result<T> = std::result::Result<T, LedwandError>;

/// Alle moeglichen Fehler im Ledwand-Kern
#[derive(Debug, Error)]
pub enum LedwandError {
    // --- Module & Planung ---
    #[error("Unbekanntes Modul: {0}")]
    UnbekanntesModul(String),

    #[error("Planer nicht erreichbar: {0}")]
    PlanerNichtErreichbar(String),

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),
}

impl LedwandError {
    /// Erstellt einen internen Fehler aus einer beliebigen Nachricht
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fehler_anzeige() {
        let e = LedwandError::UnbekanntesModul("gfx_plasma".into());
        assert_eq!(e.to_string(), "Unbekanntes Modul: gfx_plasma");
    }

    #[test]
    fn intern_konstruktor() {
        let e = LedwandError::intern("kaputt");
        assert_eq!(e.to_string(), "Interner Fehler: kaputt");
    }
}
