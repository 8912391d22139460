//! Referenz-Scheduler des Hosts
//!
//! Der Control-Channel fordert Modulwechsel ueber den
//! [`ModulHost`]-Trait an; dieser Planer nimmt die Auftraege entgegen,
//! wendet sie in Reihenfolge an und veroeffentlicht das aktive Modul
//! ueber einen Watch-Kanal. Geplante Wechsel werden dem Aufrufer erst
//! bestaetigt wenn der Wechsel sichtbar ist (synchroner Handshake);
//! erzwungene Wechsel laufen fire-and-forget.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use ledwand_core::{LedwandError, ModulHost, ModulId, ModulInfo, ModulRegistrierung, Result};

/// Das gerade aktive Modul samt der Argumente mit denen es laeuft
#[derive(Debug, Clone)]
pub struct AktivesModul {
    pub id: ModulId,
    pub name: String,
    pub args: Vec<String>,
}

/// Ein Wechselauftrag an den Scheduler-Task
struct Wechselauftrag {
    id: ModulId,
    args: Vec<String>,
    erzwungen: bool,
    /// Bestaetigung sobald der Wechsel sichtbar ist; nur bei geplanten
    /// Wechseln gesetzt
    bestaetigung: Option<oneshot::Sender<()>>,
}

/// Registry-gestuetzter Scheduler
pub struct Planer {
    registrierung: Arc<ModulRegistrierung>,
    auftraege: mpsc::UnboundedSender<Wechselauftrag>,
    aktuell: watch::Receiver<AktivesModul>,
}

impl Planer {
    /// Startet den Scheduler-Task mit dem gegebenen Startmodul.
    pub fn starten(
        registrierung: Arc<ModulRegistrierung>,
        start_modul: ModulId,
    ) -> Result<(Arc<Self>, JoinHandle<()>)> {
        let name = registrierung
            .name_von(start_modul)
            .ok_or_else(|| LedwandError::UnbekanntesModul(start_modul.to_string()))?;
        let (aktuell_tx, aktuell_rx) = watch::channel(AktivesModul {
            id: start_modul,
            name,
            args: Vec::new(),
        });
        let (auftrag_tx, auftrag_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(planer_schleife(
            registrierung.clone(),
            aktuell_tx,
            auftrag_rx,
        ));
        let planer = Arc::new(Self {
            registrierung,
            auftraege: auftrag_tx,
            aktuell: aktuell_rx,
        });
        Ok((planer, worker))
    }

    /// Beobachter auf das aktive Modul, z.B. fuer Renderer oder Tests
    pub fn beobachten(&self) -> watch::Receiver<AktivesModul> {
        self.aktuell.clone()
    }
}

async fn planer_schleife(
    registrierung: Arc<ModulRegistrierung>,
    aktuell: watch::Sender<AktivesModul>,
    mut auftraege: mpsc::UnboundedReceiver<Wechselauftrag>,
) {
    while let Some(auftrag) = auftraege.recv().await {
        let Some(name) = registrierung.name_von(auftrag.id) else {
            tracing::warn!(id = %auftrag.id, "Wechselauftrag fuer unbekannte Modul-ID verworfen");
            if let Some(bestaetigung) = auftrag.bestaetigung {
                let _ = bestaetigung.send(());
            }
            continue;
        };
        tracing::info!(
            modul = %name,
            erzwungen = auftrag.erzwungen,
            args = ?auftrag.args,
            "Modulwechsel"
        );
        let _ = aktuell.send(AktivesModul {
            id: auftrag.id,
            name,
            args: auftrag.args,
        });
        // Erst nach der Veroeffentlichung bestaetigen: der Aufrufer
        // darf den Wechsel danach ueberall sehen
        if let Some(bestaetigung) = auftrag.bestaetigung {
            let _ = bestaetigung.send(());
        }
    }
    tracing::debug!("Planer beendet");
}

#[async_trait]
impl ModulHost for Planer {
    fn finde_modul(&self, name: &str) -> Option<ModulId> {
        self.registrierung.finde(name)
    }

    fn aktuelles_modul(&self) -> ModulInfo {
        let aktiv = self.aktuell.borrow();
        ModulInfo {
            id: aktiv.id,
            name: aktiv.name.clone(),
        }
    }

    async fn plane_jetzt(&self, id: ModulId, args: Vec<String>) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.auftraege
            .send(Wechselauftrag {
                id,
                args,
                erzwungen: false,
                bestaetigung: Some(tx),
            })
            .map_err(|_| LedwandError::PlanerNichtErreichbar("Scheduler-Task beendet".into()))?;
        rx.await
            .map_err(|_| LedwandError::PlanerNichtErreichbar("Bestaetigung ausgeblieben".into()))
    }

    fn erzwinge_sofort(&self, id: ModulId, args: Vec<String>) {
        let _ = self.auftraege.send(Wechselauftrag {
            id,
            args,
            erzwungen: true,
            bestaetigung: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registrierung(module: &[&str]) -> Arc<ModulRegistrierung> {
        let reg = ModulRegistrierung::neu();
        for m in module {
            reg.registrieren(m);
        }
        Arc::new(reg)
    }

    #[tokio::test]
    async fn startmodul_ist_sofort_aktiv() {
        let reg = registrierung(&["gfx_testpattern", "sled"]);
        let start = reg.finde("gfx_testpattern").unwrap();
        let (planer, worker) = Planer::starten(reg, start).unwrap();
        assert_eq!(planer.aktuelles_modul().name, "gfx_testpattern");
        drop(planer);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn unbekanntes_startmodul_ist_ein_fehler() {
        let reg = registrierung(&["gfx_testpattern"]);
        assert!(Planer::starten(reg, ModulId(99)).is_err());
    }

    #[tokio::test]
    async fn geplanter_wechsel_ist_nach_bestaetigung_sichtbar() {
        let reg = registrierung(&["gfx_testpattern", "sled"]);
        let start = reg.finde("gfx_testpattern").unwrap();
        let sled = reg.finde("sled").unwrap();
        let (planer, worker) = Planer::starten(reg, start).unwrap();

        planer.plane_jetzt(sled, vec!["red".into()]).await.unwrap();
        let info = planer.aktuelles_modul();
        assert_eq!(info.id, sled);
        assert_eq!(info.name, "sled");

        drop(planer);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn erzwungener_wechsel_wird_angewendet() {
        let reg = registrierung(&["gfx_testpattern", "sled"]);
        let start = reg.finde("gfx_testpattern").unwrap();
        let sled = reg.finde("sled").unwrap();
        let (planer, worker) = Planer::starten(reg, start).unwrap();

        let mut beobachter = planer.beobachten();
        planer.erzwinge_sofort(sled, vec!["red".into()]);
        beobachter.changed().await.unwrap();
        {
            let aktiv = beobachter.borrow();
            assert_eq!(aktiv.name, "sled");
            assert_eq!(aktiv.args, vec!["red"]);
        }

        drop(planer);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn auftraege_werden_in_reihenfolge_angewendet() {
        let reg = registrierung(&["a", "b", "c"]);
        let start = reg.finde("a").unwrap();
        let b = reg.finde("b").unwrap();
        let c = reg.finde("c").unwrap();
        let (planer, worker) = Planer::starten(reg, start).unwrap();

        planer.erzwinge_sofort(b, Vec::new());
        planer.plane_jetzt(c, Vec::new()).await.unwrap();
        // Die Bestaetigung von c impliziert dass b vorher angewendet wurde
        assert_eq!(planer.aktuelles_modul().name, "c");

        drop(planer);
        worker.await.unwrap();
    }
}
