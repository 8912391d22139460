//! Tokenizer fuer eine Befehlszeile
//!
//! Zerlegt eine Zeile in Modulname plus Argumentliste, mit Shell-artiger
//! Semantik: Whitespace trennt Woerter, `'` und `"` quoten, Backslash
//! escapt das folgende Byte wortwoertlich. Kann Zeilen wie
//! `gfx_text "We are all equals here" 'don\'t panic'` verarbeiten.
//!
//! Whitespace ist jedes Byte <= 0x20 ausser `\n` und NUL; ein `\r` vor
//! dem Zeilenende wird damit stillschweigend geschluckt.

/// Ein geparster Befehl: Modulname plus Argumente
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Befehl {
    pub modul: String,
    pub args: Vec<String>,
}

/// Byte-Cursor ueber eine Befehlszeile
struct Wortscanner<'a> {
    daten: &'a [u8],
    pos: usize,
}

impl<'a> Wortscanner<'a> {
    fn neu(daten: &'a [u8]) -> Self {
        Self { daten, pos: 0 }
    }

    /// Ueberspringt Whitespace vor einem Wort.
    /// `\n` und NUL werden nicht konsumiert, die behandelt das Wort selbst.
    fn leerraum_ueberspringen(&mut self) {
        while let Some(&c) = self.daten.get(self.pos) {
            if c > b' ' || c == b'\n' || c == 0 {
                return;
            }
            self.pos += 1;
        }
    }

    /// Liest das naechste Wort.
    ///
    /// `traf_zeilenende` wird gesetzt sobald das Wort durch `\n`, NUL
    /// oder das Ende der Eingabe beendet wurde; der Aufrufer sucht dann
    /// nicht weiter. `None` heisst "kein Wort mehr"; ein betretenes,
    /// aber leeres Wort (z.B. `""`) liefert explizit den Leerstring.
    fn naechstes_wort(&mut self, traf_zeilenende: &mut bool) -> Option<String> {
        let mut wort: Option<Vec<u8>> = None;
        let mut escape = false;
        let mut quote: Option<u8> = None;
        let mut betreten = false;
        loop {
            let c = match self.daten.get(self.pos) {
                Some(&c) => {
                    self.pos += 1;
                    c
                }
                // Ende der Eingabe wirkt wie das Zeilenende
                None => {
                    *traf_zeilenende = true;
                    if betreten && wort.is_none() {
                        return Some(String::new());
                    }
                    return wort.map(|w| String::from_utf8_lossy(&w).into_owned());
                }
            };
            // NUL kann bei Shutdown-Rennen auftreten: sofort abbrechen
            // und das bisher Gesammelte zurueckgeben.
            if c == 0 {
                *traf_zeilenende = true;
                return wort.map(|w| String::from_utf8_lossy(&w).into_owned());
            }
            if c > b' ' || escape || quote.is_some() {
                betreten = true;
                if !escape {
                    if c == b'\\' {
                        escape = true;
                        continue;
                    }
                    match quote {
                        None => {
                            if c == b'"' || c == b'\'' {
                                quote = Some(c);
                                continue;
                            }
                        }
                        Some(q) if c == q => {
                            quote = None;
                            continue;
                        }
                        Some(_) => {}
                    }
                } else {
                    escape = false;
                }
                wort.get_or_insert_with(Vec::new).push(c);
            } else {
                if c == b'\n' {
                    *traf_zeilenende = true;
                }
                if betreten && wort.is_none() {
                    return Some(String::new());
                }
                return wort.map(|w| String::from_utf8_lossy(&w).into_owned());
            }
        }
    }
}

/// Parst eine vollstaendige Befehlszeile.
///
/// Das erste Wort ist der Modulname, alle weiteren sind Argumente.
/// `None` heisst: die Zeile enthaelt keinen Befehl (leer, nur
/// Whitespace oder leerer Modulname) und loest keinen Dispatch aus.
pub fn zeile_parsen(zeile: &[u8]) -> Option<Befehl> {
    let mut scanner = Wortscanner::neu(zeile);
    let mut traf_zeilenende = false;

    scanner.leerraum_ueberspringen();
    let modul = scanner.naechstes_wort(&mut traf_zeilenende)?;
    if modul.is_empty() {
        return None;
    }

    let mut args = Vec::new();
    while !traf_zeilenende {
        scanner.leerraum_ueberspringen();
        match scanner.naechstes_wort(&mut traf_zeilenende) {
            Some(arg) => args.push(arg),
            None => break,
        }
    }
    Some(Befehl { modul, args })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsen(zeile: &str) -> Option<Befehl> {
        zeile_parsen(zeile.as_bytes())
    }

    #[test]
    fn einfacher_befehl() {
        let b = parsen("gfx_testpattern rot blau").unwrap();
        assert_eq!(b.modul, "gfx_testpattern");
        assert_eq!(b.args, vec!["rot", "blau"]);
    }

    #[test]
    fn befehl_ohne_argumente() {
        let b = parsen("gfx_testpattern").unwrap();
        assert_eq!(b.modul, "gfx_testpattern");
        assert!(b.args.is_empty());
    }

    #[test]
    fn quoting_und_escaping() {
        let b = parsen(r#"foo "bar baz" 'qu\'ux' a\ b"#).unwrap();
        assert_eq!(b.modul, "foo");
        assert_eq!(b.args, vec!["bar baz", "qu'ux", "a b"]);
    }

    #[test]
    fn leeres_wort_bleibt_erhalten() {
        let b = parsen(r#"x """#).unwrap();
        assert_eq!(b.modul, "x");
        assert_eq!(b.args, vec![""]);
    }

    #[test]
    fn escapter_backslash() {
        let b = parsen(r"x a\\b").unwrap();
        assert_eq!(b.args, vec![r"a\b"]);
    }

    #[test]
    fn doppelquote_in_einfachen_quotes() {
        let b = parsen(r#"x 'sag "hallo"'"#).unwrap();
        assert_eq!(b.args, vec![r#"sag "hallo""#]);
    }

    #[test]
    fn leere_zeile_ist_kein_befehl() {
        assert_eq!(parsen(""), None);
        assert_eq!(parsen("   \t  "), None);
    }

    #[test]
    fn leerer_modulname_ist_kein_befehl() {
        assert_eq!(parsen(r#""" foo"#), None);
    }

    #[test]
    fn fuehrender_und_folgender_leerraum() {
        let b = parsen("  \t gfx_testpattern  rot  ").unwrap();
        assert_eq!(b.modul, "gfx_testpattern");
        assert_eq!(b.args, vec!["rot"]);
    }

    #[test]
    fn carriage_return_wird_geschluckt() {
        let b = parsen("gfx_testpattern rot\r").unwrap();
        assert_eq!(b.args, vec!["rot"]);
    }

    #[test]
    fn newline_beendet_die_wortsuche() {
        // Alles hinter dem Newline gehoert nicht mehr zu dieser Zeile
        let b = parsen("eins a\nzwei b").unwrap();
        assert_eq!(b.modul, "eins");
        assert_eq!(b.args, vec!["a"]);
    }

    #[test]
    fn nul_bricht_sofort_ab() {
        let b = zeile_parsen(b"eins a\0zwei").unwrap();
        assert_eq!(b.modul, "eins");
        assert_eq!(b.args, vec!["a"]);
    }

    #[test]
    fn nur_nul_ist_kein_befehl() {
        assert_eq!(zeile_parsen(b"\0"), None);
    }

    #[test]
    fn tabulator_trennt_woerter() {
        let b = parsen("a\tb\tc").unwrap();
        assert_eq!(b.modul, "a");
        assert_eq!(b.args, vec!["b", "c"]);
    }
}
