//! ledwand-core – Gemeinsame Typen, Traits und Fehlertypen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die vom
//! Control-Channel und vom Host gemeinsam genutzt werden: Modul-IDs,
//! die Modul-Registrierung und den [`ModulHost`]-Trait, ueber den der
//! Control-Channel Modulwechsel beim Host anfordert.

pub mod error;
pub mod host;
pub mod registry;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{LedwandError, Result};
pub use host::{ModulHost, ModulInfo};
pub use registry::ModulRegistrierung;
pub use types::ModulId;
