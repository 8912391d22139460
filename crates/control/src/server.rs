//! Verbindungsverwaltung und Ereignisschleife des Control-Channels
//!
//! Ein einzelner Worker-Task besitzt saemtlichen Verbindungszustand:
//! Annehmen neuer Verbindungen, Zeilen-Reassemblierung, Dispatch und
//! Abbau laufen alle in dieser einen Schleife. Pro Verbindung liest ein
//! schmaler Lese-Task rohe Haeppchen vom Socket und reicht sie ueber
//! einen Kanal herein; interpretiert wird dadurch zu jedem Zeitpunkt
//! hoechstens ein Befehl, und Befehle einer Verbindung behalten strikt
//! ihre Ankunftsreihenfolge.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tokio::io::AsyncReadExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use ledwand_core::ModulHost;

use crate::buffer::{ZeilenPuffer, ZEILENLIMIT};
use crate::dispatch::befehl_ausfuehren;
use crate::error::ControlResult;
use crate::parser::zeile_parsen;
use crate::shutdown::{self, ShutdownEmpfaenger, ShutdownSignal};

/// Control-Channel-Konfiguration
#[derive(Debug, Clone)]
pub struct ControlKonfig {
    pub bind_addr: SocketAddr,
    /// Maximale Zeilengroesse inklusive Terminator; laengere Zeilen
    /// beenden die Verbindung
    pub zeilenlimit_bytes: usize,
}

impl Default for ControlKonfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:7533".parse().unwrap(),
            zeilenlimit_bytes: ZEILENLIMIT,
        }
    }
}

/// Der Control-Channel-Server
///
/// Besitzt seine Konfiguration und den injizierten Host; mehrere
/// unabhaengige Instanzen koennen nebeneinander laufen.
pub struct ControlServer {
    konfig: ControlKonfig,
    host: Arc<dyn ModulHost>,
}

impl ControlServer {
    pub fn neu(konfig: ControlKonfig, host: Arc<dyn ModulHost>) -> Self {
        Self { konfig, host }
    }

    /// Bindet den Listener und startet den Worker-Task.
    ///
    /// Kehrt sofort zurueck; Bind-Fehler schlagen hier auf, bevor
    /// irgendeine Verbindung angenommen wurde. Beendet wird der Worker
    /// ueber [`ControlHandle::stoppen`].
    pub async fn starten(self) -> ControlResult<ControlHandle> {
        let listener = TcpListener::bind(self.konfig.bind_addr).await?;
        let lokale_adresse = listener.local_addr()?;
        let (signal, empfaenger) = shutdown::paar();

        tracing::info!(adresse = %lokale_adresse, "Control-Channel gestartet");
        let worker = tokio::spawn(ereignisschleife(
            listener,
            self.konfig,
            self.host,
            empfaenger,
        ));

        Ok(ControlHandle {
            signal,
            worker,
            lokale_adresse,
        })
    }
}

/// Griff auf einen laufenden Control-Channel
pub struct ControlHandle {
    signal: ShutdownSignal,
    worker: JoinHandle<()>,
    lokale_adresse: SocketAddr,
}

impl ControlHandle {
    /// Tatsaechlich gebundene Adresse (nuetzlich bei Port 0)
    pub fn lokale_adresse(&self) -> SocketAddr {
        self.lokale_adresse
    }

    /// Signalisiert den Shutdown und wartet bis der Worker alle
    /// Verbindungen geschlossen hat und vollstaendig beendet ist.
    pub async fn stoppen(self) {
        self.signal.ausloesen();
        if let Err(e) = self.worker.await {
            tracing::error!(fehler = %e, "Control-Worker unsauber beendet");
        }
    }
}

/// Ereignisse der Verbindungsleser an die Ereignisschleife
enum VerbindungsEreignis {
    Daten { id: u64, haeppchen: Bytes },
    Getrennt { id: u64 },
}

/// Zustand einer angenommenen Verbindung, exklusiv im Besitz der
/// Ereignisschleife
struct Verbindung {
    kennung: Uuid,
    adresse: SocketAddr,
    schreiber: OwnedWriteHalf,
    puffer: ZeilenPuffer,
    leser: JoinHandle<()>,
}

async fn ereignisschleife(
    listener: TcpListener,
    konfig: ControlKonfig,
    host: Arc<dyn ModulHost>,
    mut shutdown: ShutdownEmpfaenger,
) {
    let mut verbindungen: HashMap<u64, Verbindung> = HashMap::new();
    let mut naechste_id: u64 = 0;
    let (ereignis_tx, mut ereignisse) = mpsc::channel::<VerbindungsEreignis>(64);

    loop {
        tokio::select! {
            _ = shutdown.ausgeloest() => break,

            angenommen = listener.accept() => match angenommen {
                Ok((stream, adresse)) => {
                    let id = naechste_id;
                    naechste_id += 1;
                    verbindung_annehmen(id, stream, adresse, &konfig, &ereignis_tx, &mut verbindungen);
                }
                Err(e) => {
                    tracing::warn!(fehler = %e, "accept fehlgeschlagen");
                }
            },

            Some(ereignis) = ereignisse.recv() => match ereignis {
                VerbindungsEreignis::Daten { id, haeppchen } => {
                    let fatal = match verbindungen.get_mut(&id) {
                        Some(verbindung) => match verbindung.puffer.anfuegen(&haeppchen) {
                            Ok(zeilen) => {
                                for zeile in zeilen {
                                    if let Some(befehl) = zeile_parsen(&zeile) {
                                        befehl_ausfuehren(befehl, &mut verbindung.schreiber, host.as_ref()).await;
                                        // Dem Scheduler nach jedem Befehl eine Chance geben
                                        tokio::task::yield_now().await;
                                    }
                                }
                                false
                            }
                            Err(e) => {
                                tracing::debug!(
                                    verbindung = %verbindung.kennung,
                                    fehler = %e,
                                    "Protokollfehler, Verbindung wird geschlossen"
                                );
                                true
                            }
                        },
                        // Nachzuegler-Ereignis einer bereits entfernten Verbindung
                        None => false,
                    };
                    if fatal {
                        verbindung_schliessen(&mut verbindungen, id);
                    }
                }
                VerbindungsEreignis::Getrennt { id } => {
                    verbindung_schliessen(&mut verbindungen, id);
                }
            },
        }
    }

    // Geordneter Abbau: alle Leser stoppen, Sockets schliessen sich
    // beim Drop der Haelften.
    let offen = verbindungen.len();
    for (_, verbindung) in verbindungen.drain() {
        verbindung.leser.abort();
    }
    tracing::info!(verbindungen = offen, "Control-Channel beendet");
}

fn verbindung_annehmen(
    id: u64,
    stream: TcpStream,
    adresse: SocketAddr,
    konfig: &ControlKonfig,
    ereignis_tx: &mpsc::Sender<VerbindungsEreignis>,
    verbindungen: &mut HashMap<u64, Verbindung>,
) {
    let (leser, schreiber) = stream.into_split();
    let kennung = Uuid::new_v4();
    let leser_task = tokio::spawn(verbindungs_leser(id, leser, ereignis_tx.clone()));
    verbindungen.insert(
        id,
        Verbindung {
            kennung,
            adresse,
            schreiber,
            puffer: ZeilenPuffer::neu(konfig.zeilenlimit_bytes),
            leser: leser_task,
        },
    );
    tracing::debug!(
        verbindung = %kennung,
        adresse = %adresse,
        aktiv = verbindungen.len(),
        "Neue Control-Verbindung"
    );
}

fn verbindung_schliessen(verbindungen: &mut HashMap<u64, Verbindung>, id: u64) {
    if let Some(verbindung) = verbindungen.remove(&id) {
        verbindung.leser.abort();
        tracing::debug!(
            verbindung = %verbindung.kennung,
            adresse = %verbindung.adresse,
            aktiv = verbindungen.len(),
            "Control-Verbindung geschlossen"
        );
    }
}

/// Liest rohe Haeppchen vom Socket und reicht sie an die
/// Ereignisschleife weiter. EOF und Lesefehler werden gleich behandelt:
/// die Verbindung gilt als getrennt.
async fn verbindungs_leser(
    id: u64,
    mut leser: OwnedReadHalf,
    ereignisse: mpsc::Sender<VerbindungsEreignis>,
) {
    loop {
        let mut haeppchen = BytesMut::with_capacity(4096);
        match leser.read_buf(&mut haeppchen).await {
            Ok(0) => {
                let _ = ereignisse
                    .send(VerbindungsEreignis::Getrennt { id })
                    .await;
                return;
            }
            Ok(_) => {
                let daten = VerbindungsEreignis::Daten {
                    id,
                    haeppchen: haeppchen.freeze(),
                };
                if ereignisse.send(daten).await.is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::trace!(fehler = %e, "Lesefehler, Verbindung gilt als getrennt");
                let _ = ereignisse
                    .send(VerbindungsEreignis::Getrennt { id })
                    .await;
                return;
            }
        }
    }
}
