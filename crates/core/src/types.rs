//! Gemeinsame Identifikationstypen fuer Ledwand
//!
//! Modul-IDs verwenden das Newtype-Pattern um Verwechslungen mit
//! anderen Indizes zur Compilezeit auszuschliessen.

use serde::{Deserialize, Serialize};

/// Eindeutige Modul-ID innerhalb einer Registrierung
///
/// Die ID ist der Slot-Index in der [`ModulRegistrierung`]; sie ist
/// stabil fuer die Lebensdauer der Registrierung.
///
/// [`ModulRegistrierung`]: crate::registry::ModulRegistrierung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModulId(pub usize);

impl ModulId {
    /// Gibt den inneren Slot-Index zurueck
    pub fn inner(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ModulId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "modul:{}", self.0)
    }
}
