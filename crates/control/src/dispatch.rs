//! Befehlsausfuehrung gegen den Host
//!
//! Entscheidet pro Befehl zwischen Direktiven (`/then`, `/now`),
//! Weiterleitung unbekannter `/`-Tokens an das Fallback-Pseudomodul und
//! dem normalen Modulwechsel. Antworten an den Client sind best-effort;
//! Schreibfehler werden ignoriert, die Verbindung raeumt der
//! Verbindungsleser auf.

use ledwand_core::ModulHost;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::parser::Befehl;

/// Pseudomodul, an das unbekannte `/`-Direktiven als Argumente gehen.
/// `/blank` wird z.B. zu `control_tcp /blank`.
pub const FALLBACK_MODUL: &str = "control_tcp";

/// Fuehrt einen Befehl aus und schreibt etwaige Antworten auf die
/// Verbindung.
///
/// Die Argumentliste wandert bei erfolgreicher Aufloesung per Move in
/// den Host; ein nicht aufloesbarer Modulname wird absichtlich still
/// verworfen (der Client bekommt keine Fehlermeldung).
pub async fn befehl_ausfuehren<W>(befehl: Befehl, antwort: &mut W, host: &dyn ModulHost)
where
    W: AsyncWrite + Unpin,
{
    let Befehl { mut modul, mut args } = befehl;
    let mut erzwungen = false;

    if modul == "/then" {
        // Das erste Argument wird zum Modulnamen, der Rest rueckt nach.
        // "/then" ohne Argumente ist ein No-op.
        if args.is_empty() {
            return;
        }
        modul = args.remove(0);
        erzwungen = true;
    }

    if modul == "/now" {
        let info = host.aktuelles_modul();
        let _ = antwort
            .write_all(format!("now running: {}\n", info.name).as_bytes())
            .await;
        return;
    }

    // "/then /blank" ist ein nuetzliches Werkzeug
    if modul.starts_with('/') {
        args.insert(0, std::mem::replace(&mut modul, FALLBACK_MODUL.to_string()));
    }

    // Das Echo kommt vor (und unabhaengig von) der Namensaufloesung.
    let mut echo = format!("module: '{modul}', args:");
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            echo.push(',');
        }
        echo.push_str(&format!(" '{arg}'"));
    }
    echo.push('\n');
    let _ = antwort.write_all(echo.as_bytes()).await;

    let Some(id) = host.finde_modul(&modul) else {
        tracing::debug!(modul = %modul, "Unbekanntes Modul, Befehl verworfen");
        return;
    };

    if erzwungen {
        host.erzwinge_sofort(id, args);
    } else if let Err(e) = host.plane_jetzt(id, args).await {
        tracing::warn!(modul = %modul, fehler = %e, "Modulwechsel konnte nicht eingeplant werden");
    }
}
