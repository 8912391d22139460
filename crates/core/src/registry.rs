//! Modul-Registrierung: Name -> [`ModulId`]
//!
//! Der Host registriert beim Start alle verfuegbaren Module; der
//! Control-Channel loest spaeter Namen aus Befehlszeilen auf. Die
//! Aufloesung laeuft auf dem Worker-Task des Control-Channels, die
//! Registrierung auf dem Haupt-Task, daher die nebenlaeufig nutzbaren
//! Container.

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::types::ModulId;

/// Tabelle aller dem Host bekannten Module
///
/// IDs sind fortlaufende Slot-Indizes; ein einmal registrierter Name
/// behaelt seine ID fuer die Lebensdauer der Registrierung.
#[derive(Debug, Default)]
pub struct ModulRegistrierung {
    nach_name: DashMap<String, ModulId>,
    namen: RwLock<Vec<String>>,
}

impl ModulRegistrierung {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Registriert ein Modul und gibt seine ID zurueck.
    /// Ein bereits registrierter Name behaelt seine bestehende ID.
    pub fn registrieren(&self, name: &str) -> ModulId {
        if let Some(id) = self.nach_name.get(name) {
            return *id;
        }
        let mut namen = self.namen.write();
        // Unter dem Schreib-Lock erneut pruefen, zwei nebenlaeufige
        // Registrierungen desselben Namens duerfen nur einen Slot belegen
        if let Some(id) = self.nach_name.get(name) {
            return *id;
        }
        let id = ModulId(namen.len());
        namen.push(name.to_string());
        self.nach_name.insert(name.to_string(), id);
        id
    }

    /// Loest einen Modulnamen auf
    pub fn finde(&self, name: &str) -> Option<ModulId> {
        self.nach_name.get(name).map(|eintrag| *eintrag)
    }

    /// Gibt den Namen zu einer ID zurueck
    pub fn name_von(&self, id: ModulId) -> Option<String> {
        self.namen.read().get(id.0).cloned()
    }

    /// Anzahl registrierter Module
    pub fn anzahl(&self) -> usize {
        self.namen.read().len()
    }

    pub fn ist_leer(&self) -> bool {
        self.anzahl() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registrieren_und_finden() {
        let reg = ModulRegistrierung::neu();
        let a = reg.registrieren("gfx_testpattern");
        let b = reg.registrieren("control_tcp");
        assert_ne!(a, b);
        assert_eq!(reg.finde("gfx_testpattern"), Some(a));
        assert_eq!(reg.finde("control_tcp"), Some(b));
        assert_eq!(reg.finde("gibtsnicht"), None);
    }

    #[test]
    fn doppelte_registrierung_behaelt_id() {
        let reg = ModulRegistrierung::neu();
        let a = reg.registrieren("gfx_testpattern");
        let a2 = reg.registrieren("gfx_testpattern");
        assert_eq!(a, a2);
        assert_eq!(reg.anzahl(), 1);
    }

    #[test]
    fn name_von_id() {
        let reg = ModulRegistrierung::neu();
        let id = reg.registrieren("gfx_drle_rotate");
        assert_eq!(reg.name_von(id).as_deref(), Some("gfx_drle_rotate"));
        assert_eq!(reg.name_von(ModulId(99)), None);
    }
}
