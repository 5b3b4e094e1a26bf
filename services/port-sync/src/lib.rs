//! VPN forwarded-port → qBittorrent reconciler
//!
//! Watches a VPN container's log output for the dynamically assigned
//! forwarded port and keeps qBittorrent's incoming connection port in sync
//! with it over the WebUI API. One remembered port, one fixed-interval
//! loop; nothing is persisted across restarts.

pub mod config;
pub mod docker;
pub mod error;
pub mod extract;
pub mod sync;
