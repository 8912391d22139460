//! Fehlertypen fuer den Ledwand Control-Channel

use thiserror::Error;

/// Alle moeglichen Fehler im Control-Crate
#[derive(Debug, Error)]
pub enum ControlError {
    /// Zeile ohne Newline ueberschreitet das Zeilenlimit.
    /// Fuer die betroffene Verbindung fatal; andere Verbindungen
    /// sind nicht betroffen.
    #[error("Zeile ueberschreitet das Limit von {limit} Bytes")]
    ZeileZuLang { limit: usize },

    #[error("Worker bereits beendet")]
    WorkerBeendet,

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),
}

pub type ControlResult<T> = std::result::Result<T, ControlError>;
