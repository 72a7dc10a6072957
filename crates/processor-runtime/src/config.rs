//! # Processor Configuration
//!
//! Loaded once at startup from environment variables. The trusted CA key is
//! read from a file and validated as a curve point; any failure aborts
//! startup.

use aa_01_anchor_processor::{HandlerConfig, DEFAULT_FAMILY_NAME, DEFAULT_FAMILY_VERSION};
use aa_02_anchor_indexing::{IndexConfig, DEFAULT_COLLECTION, DEFAULT_DATABASE};
use anchor_telemetry::parse_flag;
use anyhow::{Context, Result};
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use shared_crypto::Secp256k1PublicKey;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default location of the trusted CA public key.
pub const DEFAULT_CA_PUBLIC_KEY_PATH: &str = "/etc/air-anchor/ca.pub";

/// Complete processor configuration.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Transaction family settings.
    pub handler: HandlerConfig,
    /// File holding the hex compressed CA public key.
    pub ca_public_key_path: PathBuf,
    /// Event bus capacity.
    pub event_bus_capacity: usize,
    /// Where the indexer keeps records.
    pub index: IndexConfig,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            handler: HandlerConfig::default(),
            ca_public_key_path: PathBuf::from(DEFAULT_CA_PUBLIC_KEY_PATH),
            event_bus_capacity: DEFAULT_CHANNEL_CAPACITY,
            index: IndexConfig::default(),
        }
    }
}

impl ProcessorConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AA_FAMILY_NAME` (default: locationKey)
    /// - `AA_FAMILY_VERSION` (default: 1.0)
    /// - `AA_CA_PUBLIC_KEY_PATH` (default: /etc/air-anchor/ca.pub)
    /// - `AA_REQUIRE_DEVICE_SIGNATURE` (default: false)
    /// - `AA_EVENT_BUS_CAPACITY` (default: 1000)
    /// - `AA_INDEX_DATABASE` / `AA_INDEX_COLLECTION` (default: air_anchor / anchors)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.handler.family_name =
            lookup("AA_FAMILY_NAME").unwrap_or_else(|| DEFAULT_FAMILY_NAME.to_string());
        config.handler.family_versions =
            vec![lookup("AA_FAMILY_VERSION").unwrap_or_else(|| DEFAULT_FAMILY_VERSION.to_string())];
        config.handler.require_device_signature = lookup("AA_REQUIRE_DEVICE_SIGNATURE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        if let Some(path) = lookup("AA_CA_PUBLIC_KEY_PATH") {
            config.ca_public_key_path = PathBuf::from(path);
        }

        if let Some(capacity) = lookup("AA_EVENT_BUS_CAPACITY") {
            match capacity.parse() {
                Ok(c) => config.event_bus_capacity = c,
                Err(_) => warn!(value = %capacity, "AA_EVENT_BUS_CAPACITY is not a number, using default"),
            }
        }

        config.index.database =
            lookup("AA_INDEX_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        config.index.collection =
            lookup("AA_INDEX_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

        config
    }
}

/// Read and validate the trusted CA public key.
pub fn load_ca_public_key(path: &Path) -> Result<Secp256k1PublicKey> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read CA public key from {}", path.display()))?;
    let key = Secp256k1PublicKey::from_hex(&contents)
        .with_context(|| format!("Invalid CA public key in {}", path.display()))?;

    info!(path = %path.display(), ca = %key, "Loaded trusted CA public key");
    Ok(key)
}
