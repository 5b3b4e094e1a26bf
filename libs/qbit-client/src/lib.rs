//! qBittorrent WebUI API client
//!
//! Thin client for the slice of the WebUI API the port reconciler needs:
//! `auth/login`, `app/preferences` and `app/setPreferences`. The WebUI
//! hands out a `SID` session cookie at login; the client keeps it in
//! reqwest's cookie store so preference calls ride on the same session.
//!
//! # Usage
//!
//! ```no_run
//! use portsync_qbit::{Credentials, QbitClient};
//! use std::time::Duration;
//!
//! # async fn run() -> portsync_qbit::Result<()> {
//! let client = QbitClient::new(
//!     "http://localhost:8080",
//!     Credentials::new("admin", "adminadmin"),
//!     Duration::from_secs(10),
//! )?;
//!
//! client.login().await?;
//! let prefs = client.preferences().await?;
//! if prefs.listen_port != 51413 {
//!     client.set_listen_port(51413).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod preferences;

pub use client::{Credentials, QbitClient};
pub use error::{Error, Result};
pub use preferences::{PreferenceUpdate, Preferences};
