//! Host-Seam des Control-Channels
//!
//! Der Control-Channel implementiert keine Module und keinen Scheduler;
//! er fordert Modulwechsel ueber diesen Trait beim Host an. Alle
//! Methoden muessen von einem Nicht-Haupt-Task aufrufbar sein.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ModulId;

/// Name + ID des gerade aktiven Moduls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulInfo {
    pub id: ModulId,
    pub name: String,
}

/// Schnittstelle vom Control-Channel zum Host-Scheduler
///
/// Die Argumentlisten wandern per Move in den Host; der Aufrufer kann
/// sie danach nicht mehr verwenden (Eigentumsuebergabe ist hier Teil
/// des Vertrags, nicht Konvention).
#[async_trait]
pub trait ModulHost: Send + Sync {
    /// Loest einen Modulnamen auf
    fn finde_modul(&self, name: &str) -> Option<ModulId>;

    /// Gibt das gerade aktive Modul zurueck.
    /// Der Wert kann unmittelbar nach der Rueckgabe schon veraltet sein;
    /// der Host darf jederzeit selbst weiterschalten.
    fn aktuelles_modul(&self) -> ModulInfo;

    /// Plant das Modul "jetzt" ein und kehrt erst zurueck wenn der
    /// Wechsel sichtbar geworden ist (synchroner Handshake).
    async fn plane_jetzt(&self, id: ModulId, args: Vec<String>) -> Result<()>;

    /// Erzwingt einen sofortigen Wechsel ohne auf Sichtbarkeit zu warten
    fn erzwinge_sofort(&self, id: ModulId, args: Vec<String>);
}
