//! Preference payloads for `app/preferences` / `app/setPreferences`

use serde::{Deserialize, Serialize};

/// The slice of the WebUI preference set the reconciler reads.
///
/// `app/preferences` returns one large flat object; everything outside
/// these fields is ignored on deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Preferences {
    /// Port used for incoming connections
    #[serde(default)]
    pub listen_port: u16,

    /// Whether UPnP/NAT-PMP port mapping is enabled
    #[serde(default)]
    pub upnp: bool,

    /// Whether a different port is picked on each start
    #[serde(default)]
    pub random_port: bool,
}

/// Preference update pushed through `app/setPreferences`.
///
/// Pinning a forwarded port only holds if the client stops remapping or
/// randomizing it, so the update always carries all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceUpdate {
    /// Port used for incoming connections
    pub listen_port: u16,

    /// Whether UPnP/NAT-PMP port mapping is enabled
    pub upnp: bool,

    /// Whether a different port is picked on each start
    pub random_port: bool,
}

impl PreferenceUpdate {
    /// Update that pins `port` and disables UPnP and port randomization.
    pub fn pinned_port(port: u16) -> Self {
        Self {
            listen_port: port,
            upnp: false,
            random_port: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_port_disables_remapping() {
        let update = PreferenceUpdate::pinned_port(51413);
        assert_eq!(update.listen_port, 51413);
        assert!(!update.upnp);
        assert!(!update.random_port);
    }

    #[test]
    fn test_update_serialization() {
        let update = PreferenceUpdate::pinned_port(51413);
        let json = serde_json::to_string(&update).unwrap();

        assert!(json.contains("\"listen_port\":51413"));
        assert!(json.contains("\"upnp\":false"));
        assert!(json.contains("\"random_port\":false"));
    }

    #[test]
    fn test_preferences_ignore_unknown_fields() {
        // app/preferences returns dozens of fields; only ours must decode
        let json = r#"{
            "listen_port": 6881,
            "upnp": true,
            "random_port": false,
            "max_connec": 500,
            "dht": true,
            "save_path": "/downloads"
        }"#;

        let prefs: Preferences = serde_json::from_str(json).unwrap();
        assert_eq!(prefs.listen_port, 6881);
        assert!(prefs.upnp);
        assert!(!prefs.random_port);
    }

    #[test]
    fn test_preferences_default_missing_fields() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs.listen_port, 0);
        assert!(!prefs.upnp);
        assert!(!prefs.random_port);
    }
}
