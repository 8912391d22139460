//! ledwand-server – Bibliotheks-Root
//!
//! Deklariert die Host-Module und verdrahtet Registrierung, Planer und
//! Control-Channel zum lauffaehigen Display-Host.

pub mod config;
pub mod planer;

use std::sync::Arc;

use anyhow::{Context, Result};

use config::ServerConfig;
use ledwand_control::{ControlKonfig, ControlServer};
use ledwand_core::ModulRegistrierung;
use planer::Planer;

/// Haelt den laufenden Host-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Host aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Module registrieren
    /// 2. Planer starten
    /// 3. Control-Channel starten
    /// 4. Auf Ctrl-C warten, dann geordnet abbauen
    pub async fn starten(self) -> Result<()> {
        let registrierung = Arc::new(ModulRegistrierung::neu());
        for name in &self.config.module.namen {
            registrierung.registrieren(name);
        }

        let start_modul = registrierung
            .finde(&self.config.module.start_modul)
            .with_context(|| {
                format!(
                    "Startmodul '{}' ist nicht registriert",
                    self.config.module.start_modul
                )
            })?;
        let (planer, planer_worker) = Planer::starten(registrierung.clone(), start_modul)?;

        let konfig = ControlKonfig {
            bind_addr: self
                .config
                .control_bind_adresse()
                .parse()
                .with_context(|| {
                    format!(
                        "Ungueltige Control-Adresse '{}'",
                        self.config.control_bind_adresse()
                    )
                })?,
            zeilenlimit_bytes: self.config.control.zeilenlimit_bytes,
        };
        let control = ControlServer::neu(konfig, planer.clone()).starten().await?;

        tracing::info!(
            host_name = %self.config.server.name,
            module = registrierung.anzahl(),
            start_modul = %self.config.module.start_modul,
            control = %control.lokale_adresse(),
            "Host laeuft. Warte auf Shutdown-Signal (Ctrl-C)..."
        );
        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown-Signal empfangen, Host wird beendet");

        control.stoppen().await;
        drop(planer);
        let _ = planer_worker.await;

        Ok(())
    }
}
