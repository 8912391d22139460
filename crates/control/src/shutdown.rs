//! Shutdown-Signal fuer den Control-Worker
//!
//! Einseitiger Signalweg: der Besitzer haelt das [`ShutdownSignal`],
//! die Ereignisschleife des Workers wartet auf dem
//! [`ShutdownEmpfaenger`] als einem von mehreren Ereignisquellen.
//! Ausloesen ist best-effort und idempotent.

use tokio::sync::watch;

/// Erstellt ein verbundenes Signal/Empfaenger-Paar
pub fn paar() -> (ShutdownSignal, ShutdownEmpfaenger) {
    let (sender, empfaenger) = watch::channel(false);
    (ShutdownSignal { sender }, ShutdownEmpfaenger { empfaenger })
}

/// Sendeseite: loest den Shutdown aus
#[derive(Debug)]
pub struct ShutdownSignal {
    sender: watch::Sender<bool>,
}

impl ShutdownSignal {
    /// Signalisiert dem Worker das Ende.
    /// Ein Sendefehler heisst der Worker ist bereits weg.
    pub fn ausloesen(&self) {
        let _ = self.sender.send(true);
    }
}

/// Empfangsseite: vom Worker gepollt
#[derive(Debug)]
pub struct ShutdownEmpfaenger {
    empfaenger: watch::Receiver<bool>,
}

impl ShutdownEmpfaenger {
    /// Wartet bis der Shutdown ausgeloest wurde.
    /// Eine weggefallene Sendeseite zaehlt ebenfalls als Shutdown.
    pub async fn ausgeloest(&mut self) {
        while !*self.empfaenger.borrow() {
            if self.empfaenger.changed().await.is_err() {
                return;
            }
        }
    }
}
