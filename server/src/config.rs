//! Host-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Host ohne Konfigurationsdatei
//! lauffaehig ist.

use serde::{Deserialize, Serialize};

/// Vollstaendige Host-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Host-Einstellungen
    pub server: ServerEinstellungen,
    /// Control-Channel-Einstellungen
    pub control: ControlEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// Modul-Einstellungen
    pub module: ModulEinstellungen,
}

/// Allgemeine Host-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Hosts
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Ledwand Host".into(),
        }
    }
}

/// Control-Channel-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlEinstellungen {
    /// Bind-Adresse fuer den Control-Channel
    pub bind_adresse: String,
    /// Port fuer den Control-Channel
    pub port: u16,
    /// Maximale Zeilengroesse in Bytes, inklusive Terminator
    pub zeilenlimit_bytes: usize,
}

impl Default for ControlEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 7533,
            zeilenlimit_bytes: 8192,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Modul-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulEinstellungen {
    /// Beim Start registrierte Module
    pub namen: Vec<String>,
    /// Modul das nach dem Start laeuft
    pub start_modul: String,
}

impl Default for ModulEinstellungen {
    fn default() -> Self {
        Self {
            namen: vec![
                "gfx_testpattern".into(),
                "gfx_autoterminal".into(),
                "gfx_drle_rotate".into(),
                "control_tcp".into(),
            ],
            start_modul: "gfx_testpattern".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Gibt die vollstaendige Bind-Adresse des Control-Channels zurueck
    pub fn control_bind_adresse(&self) -> String {
        format!("{}:{}", self.control.bind_adresse, self.control.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.control.port, 7533);
        assert_eq!(cfg.control.zeilenlimit_bytes, 8192);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.module.namen.contains(&"control_tcp".to_string()));
        assert_eq!(cfg.module.start_modul, "gfx_testpattern");
    }

    #[test]
    fn bind_adresse() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.control_bind_adresse(), "0.0.0.0:7533");
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [server]
            name = "Wohnzimmerwand"

            [control]
            port = 7600

            [module]
            namen = ["gfx_testpattern", "control_tcp"]
        "#;
        let cfg: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.server.name, "Wohnzimmerwand");
        assert_eq!(cfg.control.port, 7600);
        assert_eq!(cfg.module.namen.len(), 2);
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.control.zeilenlimit_bytes, 8192);
        assert_eq!(cfg.module.start_modul, "gfx_testpattern");
    }
}
