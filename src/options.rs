use std::net::IpAddr;
use std::net::ToSocketAddrs;
use std::path::Path;
use std::path::PathBuf;

use log::warn;

use crate::config::AddressFamily;
use crate::config::ClientConfig;
use crate::config::RelayTransport;
use crate::config::Transport;
use crate::config::DEFAULT_MESSAGE_LENGTH;
use crate::config::DEFAULT_STUN_PORT;
use crate::config::DEFAULT_STUN_TLS_PORT;
use crate::config::MAX_MESSAGE_LENGTH;
use crate::config::MIN_MESSAGE_LENGTH;
use crate::error::OptionsError;

/// relative lookups follow the conventional configuration directories
const CONFIG_SEARCH_DIRS: &[&str] = &["", "etc/", "../etc/", "/etc/", "/usr/local/etc/"];

/// Flag values exactly as given on the command line, before any implication
/// cascades. Duplicate flags are last-wins at the CLI layer.
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    pub use_tcp: bool,
    pub use_sctp: bool,
    pub tcp_relay: bool,
    pub passive_tcp: bool,
    pub client_to_client: bool,
    pub no_rtcp: bool,
    pub dual_allocation: bool,
    pub dont_fragment: bool,
    pub use_send_method: bool,
    pub mandatory_channel_padding: bool,

    pub secure: bool,
    pub null_cipher: bool,
    pub cipher_suite: Option<String>,
    pub certificate_file: Option<String>,
    pub private_key_file: Option<String>,
    pub ca_file: Option<String>,

    pub address_family: Option<AddressFamily>,
    pub peer_address: Option<String>,
    pub peer_port: Option<u16>,
    pub local_address: Option<String>,
    pub interface_name: Option<String>,
    pub port: Option<u16>,

    pub message_length: Option<i64>,
    pub message_count: Option<usize>,
    pub client_count: Option<usize>,
    pub packet_interval_ms: Option<u64>,
    pub bandwidth: Option<u64>,

    pub username: Option<String>,
    pub password: Option<String>,
    pub rest_secret: Option<String>,
    pub rest_separator: Option<char>,
    pub origin: Option<String>,
    pub oauth: bool,

    pub hang_on: bool,
    pub negative_test: bool,
    pub negative_protocol_test: bool,
    pub dos: bool,
    pub random_disconnect: bool,
    pub mobility: bool,
    pub no_permissions: bool,
    pub extra_requests: bool,
}

/// Resolves raw flags into one internally consistent configuration.
///
/// The order is fixed: literal values first, then the implication cascades,
/// then the port default, the message length bounds and finally the peer
/// address requirement. The cascades run once and are never re-evaluated.
pub fn resolve(raw: RawOptions) -> Result<ClientConfig, OptionsError> {
    let mut config = ClientConfig::default();

    config.transport = match (raw.use_tcp, raw.use_sctp) {
        (_, true) => Transport::TcpSctp,
        (true, false) => Transport::Tcp,
        (false, false) => Transport::Udp,
    };
    config.relay_transport = if raw.tcp_relay {
        RelayTransport::Tcp
    } else {
        RelayTransport::Udp
    };
    config.passive_tcp = raw.passive_tcp;
    config.client_to_client = raw.client_to_client;
    config.no_rtcp = raw.no_rtcp;
    config.dual_allocation = raw.dual_allocation;
    config.dont_fragment = raw.dont_fragment;
    config.channel_use_disabled = raw.use_send_method;
    config.mandatory_channel_padding = raw.mandatory_channel_padding;

    config.secure = raw.secure;
    config.null_cipher = raw.null_cipher;
    config.cipher_suite = raw.cipher_suite;
    config.certificate_file = raw
        .certificate_file
        .as_deref()
        .map(find_config_file)
        .transpose()?;
    config.private_key_file = raw
        .private_key_file
        .as_deref()
        .map(find_config_file)
        .transpose()?;
    config.ca_file = raw.ca_file.as_deref().map(find_config_file).transpose()?;

    config.address_family = raw.address_family.unwrap_or_default();
    if let Some(port) = raw.peer_port {
        config.peer_port = port;
    }
    config.local_address = raw.local_address.unwrap_or_default();
    config.interface_name = raw.interface_name.unwrap_or_default();

    if let Some(count) = raw.message_count {
        config.message_count = count;
    }
    if let Some(count) = raw.client_count {
        config.client_count = count;
    }
    if let Some(interval) = raw.packet_interval_ms {
        config.packet_interval = core::time::Duration::from_millis(interval);
    }
    config.bandwidth = raw.bandwidth.unwrap_or(0);

    config.username = raw.username.unwrap_or_default();
    config.password = raw.password.unwrap_or_default();
    config.rest_secret = raw.rest_secret;
    if let Some(separator) = raw.rest_separator {
        config.rest_separator = separator;
    }
    config.origin = raw.origin.unwrap_or_default();
    config.oauth = raw.oauth;

    config.hang_on = raw.hang_on;
    config.negative_test = raw.negative_test;
    config.negative_protocol_test = raw.negative_protocol_test;
    config.dos = raw.dos;
    config.random_disconnect = raw.random_disconnect;
    config.mobility = raw.mobility;
    config.no_permissions = raw.no_permissions;
    config.extra_requests = raw.extra_requests;

    if config.dual_allocation {
        config.no_rtcp = true;
    }
    if config.passive_tcp {
        config.relay_transport = RelayTransport::Tcp;
    }
    if config.null_cipher {
        config.secure = true;
    }
    if config.relay_transport == RelayTransport::Tcp {
        config.dont_fragment = false;
        config.no_rtcp = true;
        config.client_to_client = true;
        config.transport = config.transport.with_tcp();
        config.channel_use_disabled = true;
    }

    config.port = match raw.port {
        Some(port) => port,
        None if config.secure => DEFAULT_STUN_TLS_PORT,
        None => DEFAULT_STUN_PORT,
    };

    config.message_length =
        clamp_message_length(raw.message_length.unwrap_or(DEFAULT_MESSAGE_LENGTH as i64));

    if !config.client_to_client {
        let peer = raw
            .peer_address
            .as_deref()
            .ok_or(OptionsError::MissingPeerAddress)?;
        let address = resolve_peer_address(peer, config.peer_port)?;
        config.address_family = match address {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        };
        config.peer_address = Some(address);
    }

    Ok(config)
}

fn clamp_message_length(length: i64) -> usize {
    if length < MIN_MESSAGE_LENGTH as i64 {
        return MIN_MESSAGE_LENGTH;
    }
    if length > MAX_MESSAGE_LENGTH as i64 {
        warn!("Message length was corrected to {MAX_MESSAGE_LENGTH}");
        return MAX_MESSAGE_LENGTH;
    }
    length as usize
}

fn resolve_peer_address(address: &str, port: u16) -> Result<IpAddr, OptionsError> {
    if let Ok(address) = address.parse() {
        return Ok(address);
    }
    (address, port)
        .to_socket_addrs()
        .map_err(|_| OptionsError::InvalidPeerAddress(address.into()))?
        .next()
        .map(|resolved| resolved.ip())
        .ok_or_else(|| OptionsError::InvalidPeerAddress(address.into()))
}

pub fn find_config_file(name: &str) -> Result<PathBuf, OptionsError> {
    let path = Path::new(name);
    if path.is_absolute() {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(OptionsError::FileNotFound(path.to_path_buf()));
    }
    for dir in CONFIG_SEARCH_DIRS {
        let candidate = Path::new(dir).join(name);
        if candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(OptionsError::FileNotFound(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passive_tcp_implies_tcp_relay() {
        let raw = RawOptions {
            passive_tcp: true,
            client_to_client: true,
            ..Default::default()
        };
        let config = resolve(raw.clone()).unwrap();
        assert_eq!(config.relay_transport, RelayTransport::Tcp);
        assert!(config.passive_tcp);

        // resolution is a pure function of the raw flags
        let again = resolve(raw).unwrap();
        assert_eq!(again.relay_transport, RelayTransport::Tcp);
    }

    #[test]
    fn test_dual_allocation_implies_no_rtcp() {
        let data = [
            RawOptions {
                dual_allocation: true,
                client_to_client: true,
                ..Default::default()
            },
            RawOptions {
                dual_allocation: true,
                use_tcp: true,
                secure: true,
                peer_address: "192.0.2.7".to_string().into(),
                ..Default::default()
            },
        ];
        for raw in data {
            let config = resolve(raw).unwrap();
            assert!(config.no_rtcp);
            assert!(config.dual_allocation);
        }
    }

    #[test]
    fn test_tcp_relay_cascade() {
        let raw = RawOptions {
            tcp_relay: true,
            dont_fragment: true,
            ..Default::default()
        };
        let config = resolve(raw).unwrap();
        assert!(!config.dont_fragment);
        assert!(config.no_rtcp);
        assert!(config.client_to_client);
        assert_eq!(config.transport, Transport::Tcp);
        assert!(config.channel_use_disabled);
    }

    #[test]
    fn test_tcp_relay_keeps_sctp_overlay() {
        let raw = RawOptions {
            tcp_relay: true,
            use_sctp: true,
            ..Default::default()
        };
        let config = resolve(raw).unwrap();
        assert_eq!(config.transport, Transport::TcpSctp);
    }

    #[test]
    fn test_tcp_relay_ignores_peer_address() {
        let raw = RawOptions {
            tcp_relay: true,
            peer_address: "192.0.2.1".to_string().into(),
            address_family: AddressFamily::V6.into(),
            ..Default::default()
        };
        let config = resolve(raw).unwrap();
        assert_eq!(config.peer_address, None);
        assert_eq!(config.address_family, AddressFamily::V6);
    }

    #[test]
    fn test_null_cipher_implies_secure() {
        let raw = RawOptions {
            null_cipher: true,
            client_to_client: true,
            ..Default::default()
        };
        let config = resolve(raw).unwrap();
        assert!(config.secure);
        assert!(config.null_cipher);
    }

    #[test]
    fn test_default_port_resolution() {
        let data = [
            (None, false, DEFAULT_STUN_PORT),
            (None, true, DEFAULT_STUN_TLS_PORT),
            (Some(9999), false, 9999),
            (Some(9999), true, 9999),
        ];
        for (port, secure, expected) in data {
            let raw = RawOptions {
                port,
                secure,
                client_to_client: true,
                ..Default::default()
            };
            let config = resolve(raw).unwrap();
            assert_eq!(config.port, expected, "port {port:?} secure {secure}");
        }
    }

    #[test]
    fn test_message_length_bounds() {
        let data = [
            (i64::MIN, MIN_MESSAGE_LENGTH),
            (-1, MIN_MESSAGE_LENGTH),
            (0, MIN_MESSAGE_LENGTH),
            (MIN_MESSAGE_LENGTH as i64 - 1, MIN_MESSAGE_LENGTH),
            (MIN_MESSAGE_LENGTH as i64, MIN_MESSAGE_LENGTH),
            (100, 100),
            (MAX_MESSAGE_LENGTH as i64, MAX_MESSAGE_LENGTH),
            (MAX_MESSAGE_LENGTH as i64 + 1, MAX_MESSAGE_LENGTH),
            (i64::MAX, MAX_MESSAGE_LENGTH),
        ];
        for (length, expected) in data {
            let raw = RawOptions {
                message_length: length.into(),
                client_to_client: true,
                ..Default::default()
            };
            let config = resolve(raw).unwrap();
            assert_eq!(config.message_length, expected, "length {length}");
        }
    }

    #[test]
    fn test_peer_address_sets_family() {
        let data = [
            ("192.0.2.1", AddressFamily::V4),
            ("2001:db8::1", AddressFamily::V6),
        ];
        for (peer, expected) in data {
            let raw = RawOptions {
                peer_address: peer.to_string().into(),
                peer_port: Some(3480),
                // explicit flag loses to the parsed peer
                address_family: AddressFamily::Unspecified.into(),
                ..Default::default()
            };
            let config = resolve(raw).unwrap();
            assert_eq!(config.address_family, expected, "{peer}");
            assert!(config.peer_address.is_some());
        }
    }

    #[test]
    fn test_peer_address_overrides_family_flag() {
        let raw = RawOptions {
            peer_address: "192.0.2.1".to_string().into(),
            address_family: AddressFamily::V6.into(),
            ..Default::default()
        };
        let config = resolve(raw).unwrap();
        assert_eq!(config.address_family, AddressFamily::V4);
    }

    #[test]
    fn test_peer_address_required_without_client_to_client() {
        let result = resolve(RawOptions::default());
        assert!(matches!(result, Err(OptionsError::MissingPeerAddress)));

        let raw = RawOptions {
            client_to_client: true,
            ..Default::default()
        };
        assert!(resolve(raw).is_ok());
    }

    #[test]
    fn test_invalid_peer_address() {
        let raw = RawOptions {
            peer_address: "peer.does.not.resolve.invalid".to_string().into(),
            ..Default::default()
        };
        let result = resolve(raw);
        assert!(matches!(result, Err(OptionsError::InvalidPeerAddress(_))));
    }

    #[test]
    fn test_missing_certificate_file() {
        let raw = RawOptions {
            certificate_file: "/does/not/exist/cert.pem".to_string().into(),
            client_to_client: true,
            ..Default::default()
        };
        let result = resolve(raw);
        assert!(matches!(result, Err(OptionsError::FileNotFound(_))));
    }

    #[test]
    fn test_existing_certificate_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cert.pem");
        std::fs::write(&path, "-----BEGIN CERTIFICATE-----").unwrap();
        let raw = RawOptions {
            certificate_file: path.to_str().unwrap().to_string().into(),
            client_to_client: true,
            ..Default::default()
        };
        let config = resolve(raw).unwrap();
        assert_eq!(config.certificate_file, Some(path));
    }

    #[test]
    fn test_defaults() {
        let raw = RawOptions {
            client_to_client: true,
            ..Default::default()
        };
        let config = resolve(raw).unwrap();
        assert_eq!(config.transport, Transport::Udp);
        assert_eq!(config.relay_transport, RelayTransport::Udp);
        assert_eq!(config.message_count, 5);
        assert_eq!(config.client_count, 1);
        assert_eq!(config.peer_port, 3480);
        assert_eq!(config.rest_separator, ':');
        assert!(!config.secure);
        assert!(config.secure_contexts.is_empty());
    }
}
