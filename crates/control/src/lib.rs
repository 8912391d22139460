//! ledwand-control – Control-Channel des Ledwand-Hosts
//!
//! Zeilenbasiertes Klartext-Protokoll ueber TCP (Standardport 7533):
//! ein Befehl pro Zeile, `Modulname [Argumente ...]\n`, mit Shell-artigem
//! Quoting und Escaping. Direktiven (`/then`, `/now`) haben
//! Protokollbedeutung; alles andere wird als Modulwechsel an den
//! [`ModulHost`] weitergereicht.
//!
//! Aufbau:
//! - [`buffer`]: Zeilen-Reassemblierung aus rohen Lesehaeppchen
//! - [`parser`]: Tokenizer fuer eine Befehlszeile
//! - [`dispatch`]: Befehlsausfuehrung gegen den Host
//! - [`server`]: Verbindungsverwaltung und Ereignisschleife
//! - [`shutdown`]: Signal zum geordneten Beenden des Workers
//!
//! [`ModulHost`]: ledwand_core::ModulHost

pub mod buffer;
pub mod dispatch;
pub mod error;
pub mod parser;
pub mod server;
pub mod shutdown;

pub use error::{ControlError, ControlResult};
pub use server::{ControlHandle, ControlKonfig, ControlServer};
