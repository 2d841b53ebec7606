// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SmsGateError};

/// Persistent bridge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Name of the logical bridge channel the host registers.
    pub channel_name: String,
    /// Request code attached to the Android runtime permission request.
    /// The host Activity sees it again in `onRequestPermissionsResult`.
    pub permission_request_code: i32,
    /// Animate presenting and dismissing the iOS composer.
    pub compose_animated: bool,
    /// Desktop stub only: log sends and report success instead of failing.
    pub desktop_dry_run: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel_name: "smsgate/sms".into(),
            permission_request_code: 123,
            compose_animated: true,
            desktop_dry_run: false,
        }
    }
}

impl BridgeConfig {
    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw)
            .map_err(|e| SmsGateError::Config(format!("{}: {e}", path.display())))
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = BridgeConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(cfg, BridgeConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cfg = BridgeConfig {
            desktop_dry_run: true,
            permission_request_code: 7,
            ..Default::default()
        };
        cfg.save(&path).unwrap();
        assert_eq!(BridgeConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "compose_animated": false }"#).unwrap();
        let cfg = BridgeConfig::load(&path).unwrap();
        assert!(!cfg.compose_animated);
        assert_eq!(cfg.permission_request_code, 123);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = BridgeConfig::load(&path).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
