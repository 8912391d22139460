//! Zeilen-Reassemblierung
//!
//! TCP liefert Haeppchen in beliebiger Stueckelung: eine Befehlszeile
//! kann ueber mehrere Reads verteilt ankommen, ein einzelner Read kann
//! mehrere Zeilen enthalten. Der [`ZeilenPuffer`] sammelt pro
//! Verbindung Bytes und gibt ausschliesslich vollstaendige, durch `\n`
//! abgeschlossene Zeilen heraus; der Rest nach dem letzten Newline
//! bleibt wortwoertlich fuer den naechsten Read erhalten.

use bytes::{Bytes, BytesMut};

use crate::error::{ControlError, ControlResult};

/// Maximale Zeilengroesse in Bytes, inklusive Terminator
pub const ZEILENLIMIT: usize = 0x2000;

/// Gepufferte, noch unvollstaendige Zeile einer Verbindung
#[derive(Debug)]
pub struct ZeilenPuffer {
    daten: BytesMut,
    limit: usize,
}

impl ZeilenPuffer {
    /// Erstellt einen leeren Puffer mit dem gegebenen Zeilenlimit
    pub fn neu(limit: usize) -> Self {
        Self {
            daten: BytesMut::new(),
            limit,
        }
    }

    /// Haengt ein Lesehaeppchen an und extrahiert alle dadurch
    /// vollstaendig gewordenen Zeilen, in Ankunftsreihenfolge und ohne
    /// den `\n`-Terminator.
    ///
    /// Die Suche nach dem letzten Newline laeuft rueckwaerts ueber den
    /// gesamten aktuellen Inhalt; alles dahinter bleibt als Rest im
    /// Puffer. Ueberschreitet eine Zeile (oder der Rest ohne Newline)
    /// das Limit, ist das fuer die Verbindung fatal:
    /// [`ControlError::ZeileZuLang`].
    pub fn anfuegen(&mut self, haeppchen: &[u8]) -> ControlResult<Vec<Bytes>> {
        self.daten.extend_from_slice(haeppchen);

        let mut zeilen = Vec::new();
        if let Some(pos) = self.daten.iter().rposition(|&b| b == b'\n') {
            // Alles bis einschliesslich des letzten Newlines ist
            // abgeschlossen; der Puffer behaelt nur den Rest.
            let mut fertig = self.daten.split_to(pos + 1);
            while let Some(ende) = fertig.iter().position(|&b| b == b'\n') {
                let mut zeile = fertig.split_to(ende + 1);
                zeile.truncate(ende);
                if zeile.len() > self.limit - 1 {
                    return Err(ControlError::ZeileZuLang { limit: self.limit });
                }
                zeilen.push(zeile.freeze());
            }
            debug_assert!(fertig.is_empty());
        }

        if self.daten.len() > self.limit - 1 {
            return Err(ControlError::ZeileZuLang { limit: self.limit });
        }
        Ok(zeilen)
    }

    /// Laenge des noch unvollstaendigen Rests
    pub fn rest_laenge(&self) -> usize {
        self.daten.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn als_strings(zeilen: Vec<Bytes>) -> Vec<String> {
        zeilen
            .into_iter()
            .map(|z| String::from_utf8_lossy(&z).into_owned())
            .collect()
    }

    #[test]
    fn eine_zeile_in_einem_stueck() {
        let mut p = ZeilenPuffer::neu(ZEILENLIMIT);
        let zeilen = p.anfuegen(b"gfx_testpattern rot\n").unwrap();
        assert_eq!(als_strings(zeilen), vec!["gfx_testpattern rot"]);
        assert_eq!(p.rest_laenge(), 0);
    }

    #[test]
    fn zeile_ueber_mehrere_reads_verteilt() {
        let mut p = ZeilenPuffer::neu(ZEILENLIMIT);
        assert!(p.anfuegen(b"gfx_test").unwrap().is_empty());
        assert!(p.anfuegen(b"pattern ").unwrap().is_empty());
        let zeilen = p.anfuegen(b"rot\n").unwrap();
        assert_eq!(als_strings(zeilen), vec!["gfx_testpattern rot"]);
    }

    #[test]
    fn mehrere_zeilen_in_einem_read() {
        let mut p = ZeilenPuffer::neu(ZEILENLIMIT);
        let zeilen = p.anfuegen(b"eins\nzwei\ndrei\n").unwrap();
        assert_eq!(als_strings(zeilen), vec!["eins", "zwei", "drei"]);
    }

    #[test]
    fn rest_nach_letztem_newline_bleibt_erhalten() {
        let mut p = ZeilenPuffer::neu(ZEILENLIMIT);
        let zeilen = p.anfuegen(b"eins\nzw").unwrap();
        assert_eq!(als_strings(zeilen), vec!["eins"]);
        assert_eq!(p.rest_laenge(), 2);
        let zeilen = p.anfuegen(b"ei\n").unwrap();
        assert_eq!(als_strings(zeilen), vec!["zwei"]);
    }

    #[test]
    fn leere_zeilen_werden_durchgereicht() {
        let mut p = ZeilenPuffer::neu(ZEILENLIMIT);
        let zeilen = p.anfuegen(b"\n\neins\n").unwrap();
        assert_eq!(als_strings(zeilen), vec!["", "", "eins"]);
    }

    #[test]
    fn ueberlange_zeile_ohne_newline_ist_fatal() {
        let mut p = ZeilenPuffer::neu(16);
        assert!(p.anfuegen(b"0123456789").unwrap().is_empty());
        let e = p.anfuegen(b"abcdefghij").unwrap_err();
        assert!(matches!(e, ControlError::ZeileZuLang { limit: 16 }));
    }

    #[test]
    fn ueberlange_abgeschlossene_zeile_ist_ebenfalls_fatal() {
        let mut p = ZeilenPuffer::neu(8);
        let e = p.anfuegen(b"zu lange zeile\n").unwrap_err();
        assert!(matches!(e, ControlError::ZeileZuLang { .. }));
    }

    #[test]
    fn zeile_exakt_am_limit_passt_noch() {
        // Limit inklusive Terminator: 7 Zeichen + '\n' bei Limit 8
        let mut p = ZeilenPuffer::neu(8);
        let zeilen = p.anfuegen(b"1234567\n").unwrap();
        assert_eq!(als_strings(zeilen), vec!["1234567"]);
    }

    #[test]
    fn binaerer_rest_bleibt_wortwoertlich() {
        let mut p = ZeilenPuffer::neu(ZEILENLIMIT);
        p.anfuegen(b"a\n\x01\x02").unwrap();
        assert_eq!(p.rest_laenge(), 2);
        let zeilen = p.anfuegen(b"\n").unwrap();
        assert_eq!(zeilen.len(), 1);
        assert_eq!(&zeilen[0][..], b"\x01\x02");
    }
}
