//! Relay configuration.

use serde::{Deserialize, Serialize};

use super::types::BackendKind;

/// Configuration for the relay uploader chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Backends to try, strictly in this order.
    #[serde(default = "default_backends")]
    pub backends: Vec<BackendKind>,

    #[serde(default)]
    pub transfer_sh: TransferShConfig,

    #[serde(default)]
    pub null_pointer: NullPointerConfig,

    #[serde(default)]
    pub file_io: FileIoConfig,
}

fn default_backends() -> Vec<BackendKind> {
    vec![
        BackendKind::TransferSh,
        BackendKind::NullPointer,
        BackendKind::FileIo,
    ]
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            backends: default_backends(),
            transfer_sh: TransferShConfig::default(),
            null_pointer: NullPointerConfig::default(),
            file_io: FileIoConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferShConfig {
    #[serde(default = "default_transfer_sh_url")]
    pub base_url: String,
    /// Large files over slow links: generous by default.
    #[serde(default = "default_transfer_sh_timeout")]
    pub timeout_secs: u64,
}

fn default_transfer_sh_url() -> String {
    "https://transfer.sh".to_string()
}

fn default_transfer_sh_timeout() -> u64 {
    300
}

impl Default for TransferShConfig {
    fn default() -> Self {
        Self {
            base_url: default_transfer_sh_url(),
            timeout_secs: default_transfer_sh_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullPointerConfig {
    #[serde(default = "default_null_pointer_url")]
    pub base_url: String,
    #[serde(default = "default_secondary_timeout")]
    pub timeout_secs: u64,
}

fn default_null_pointer_url() -> String {
    "https://0x0.st".to_string()
}

fn default_secondary_timeout() -> u64 {
    180
}

impl Default for NullPointerConfig {
    fn default() -> Self {
        Self {
            base_url: default_null_pointer_url(),
            timeout_secs: default_secondary_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileIoConfig {
    #[serde(default = "default_file_io_url")]
    pub base_url: String,
    #[serde(default = "default_secondary_timeout")]
    pub timeout_secs: u64,
}

fn default_file_io_url() -> String {
    "https://file.io".to_string()
}

impl Default for FileIoConfig {
    fn default() -> Self {
        Self {
            base_url: default_file_io_url(),
            timeout_secs: default_secondary_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chain_order() {
        let config = RelayConfig::default();
        assert_eq!(
            config.backends,
            vec![
                BackendKind::TransferSh,
                BackendKind::NullPointer,
                BackendKind::FileIo
            ]
        );
        assert_eq!(config.transfer_sh.timeout_secs, 300);
        assert_eq!(config.null_pointer.base_url, "https://0x0.st");
    }

    #[test]
    fn test_deserialize_reordered_chain() {
        let toml = r#"
            backends = ["file_io", "transfer_sh"]

            [transfer_sh]
            base_url = "https://transfer.example"
            timeout_secs = 30
        "#;
        let config: RelayConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.backends,
            vec![BackendKind::FileIo, BackendKind::TransferSh]
        );
        assert_eq!(config.transfer_sh.base_url, "https://transfer.example");
        assert_eq!(config.transfer_sh.timeout_secs, 30);
    }
}
