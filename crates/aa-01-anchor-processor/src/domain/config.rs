//! Handler configuration.

use super::address::namespace_prefix;

/// Default transaction family.
pub const DEFAULT_FAMILY_NAME: &str = "locationKey";

/// Default family version.
pub const DEFAULT_FAMILY_VERSION: &str = "1.0";

/// Configuration for the anchor transaction handler.
///
/// The trusted CA key is not part of this struct; it is loaded separately and
/// handed to the `CertificateVerifier`.
#[derive(Clone, Debug)]
pub struct HandlerConfig {
    /// Transaction family name. Also the namespace seed.
    pub family_name: String,
    /// Accepted family versions.
    pub family_versions: Vec<String>,
    /// Additionally verify the device signature on the certificate request.
    pub require_device_signature: bool,
}

impl HandlerConfig {
    /// 6-hex-char namespace prefix of the family.
    pub fn namespace_prefix(&self) -> String {
        namespace_prefix(&self.family_name)
    }

    /// Event type emitted on admission.
    pub fn create_event_type(&self) -> String {
        format!("{}/create", self.family_name)
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            family_name: DEFAULT_FAMILY_NAME.to_string(),
            family_versions: vec![DEFAULT_FAMILY_VERSION.to_string()],
            require_device_signature: false,
        }
    }
}
