use core::fmt::Display;
use core::fmt::Formatter;
use core::time::Duration;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::credentials::HashAlgorithm;
use crate::types::OauthKeys;
use crate::types::SecureContexts;

pub const DEFAULT_STUN_PORT: u16 = 3478;
pub const DEFAULT_STUN_TLS_PORT: u16 = 5349;
pub const DEFAULT_PEER_PORT: u16 = 3480;

/// capacity of the datagram exchange buffers
pub const STUN_BUFFER_SIZE: usize = 65507;
/// room kept for protocol headers when clamping payload sizes
pub const MAX_HEADER_RESERVE: usize = 100;
/// sequence number and timestamp prefix carried in every test message
pub const MESSAGE_INFO_SIZE: usize = 16;

pub const MIN_MESSAGE_LENGTH: usize = MESSAGE_INFO_SIZE;
pub const MAX_MESSAGE_LENGTH: usize = STUN_BUFFER_SIZE - MAX_HEADER_RESERVE;

pub const DEFAULT_MESSAGE_LENGTH: usize = 100;
pub const DEFAULT_MESSAGE_COUNT: usize = 5;
pub const DEFAULT_CLIENT_COUNT: usize = 1;
pub const DEFAULT_PACKET_INTERVAL: Duration = Duration::from_millis(20);
pub const DEFAULT_REST_SEPARATOR: char = ':';

pub const OAUTH_KEY_COUNT: usize = 3;
pub const MAX_SECURE_CONTEXTS: usize = 32;
/// chain verification limit when a trust anchor is configured
pub const VERIFY_DEPTH: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Udp,
    Tcp,
    /// SCTP runs as an overlay and keeps the TCP exchange active
    TcpSctp,
}

impl Transport {
    pub fn uses_tcp(self) -> bool {
        !matches!(self, Transport::Udp)
    }

    pub fn with_tcp(self) -> Self {
        match self {
            Transport::Udp => Transport::Tcp,
            other => other,
        }
    }
}

impl Display for Transport {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Transport::Udp => write!(f, "udp"),
            Transport::Tcp => write!(f, "tcp"),
            Transport::TcpSctp => write!(f, "tcp+sctp"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayTransport {
    #[default]
    Udp,
    Tcp,
}

impl Display for RelayTransport {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            RelayTransport::Udp => write!(f, "udp"),
            RelayTransport::Tcp => write!(f, "tcp"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFamily {
    #[default]
    Unspecified,
    V4,
    V6,
}

impl Display for AddressFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            AddressFamily::Unspecified => write!(f, "unspecified"),
            AddressFamily::V4 => write!(f, "ipv4"),
            AddressFamily::V6 => write!(f, "ipv6"),
        }
    }
}

/// Fully resolved client configuration. Built with defaults, mutated only
/// by the bootstrap pipeline and immutable once the session launcher takes
/// over.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub transport: Transport,
    pub relay_transport: RelayTransport,
    pub passive_tcp: bool,
    pub client_to_client: bool,
    pub no_rtcp: bool,
    pub dual_allocation: bool,
    pub dont_fragment: bool,
    pub channel_use_disabled: bool,
    pub mandatory_channel_padding: bool,

    pub secure: bool,
    pub null_cipher: bool,
    pub cipher_suite: Option<String>,
    pub certificate_file: Option<PathBuf>,
    pub private_key_file: Option<PathBuf>,
    pub ca_file: Option<PathBuf>,
    pub secure_contexts: SecureContexts,

    pub address_family: AddressFamily,
    pub port: u16,
    pub peer_address: Option<IpAddr>,
    pub peer_port: u16,
    pub local_address: String,
    pub interface_name: String,

    pub message_length: usize,
    pub message_count: usize,
    pub client_count: usize,
    pub packet_interval: Duration,
    pub bandwidth: u64,

    pub username: String,
    pub password: String,
    pub rest_secret: Option<String>,
    pub rest_separator: char,
    pub hash_algorithm: HashAlgorithm,
    pub origin: String,
    pub oauth: bool,
    pub oauth_keys: OauthKeys,

    pub hang_on: bool,
    pub negative_test: bool,
    pub negative_protocol_test: bool,
    pub dos: bool,
    pub random_disconnect: bool,
    pub mobility: bool,
    pub no_permissions: bool,
    pub extra_requests: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            relay_transport: RelayTransport::default(),
            passive_tcp: false,
            client_to_client: false,
            no_rtcp: false,
            dual_allocation: false,
            dont_fragment: false,
            channel_use_disabled: false,
            mandatory_channel_padding: false,
            secure: false,
            null_cipher: false,
            cipher_suite: None,
            certificate_file: None,
            private_key_file: None,
            ca_file: None,
            secure_contexts: SecureContexts::new(),
            address_family: AddressFamily::default(),
            port: DEFAULT_STUN_PORT,
            peer_address: None,
            peer_port: DEFAULT_PEER_PORT,
            local_address: String::new(),
            interface_name: String::new(),
            message_length: DEFAULT_MESSAGE_LENGTH,
            message_count: DEFAULT_MESSAGE_COUNT,
            client_count: DEFAULT_CLIENT_COUNT,
            packet_interval: DEFAULT_PACKET_INTERVAL,
            bandwidth: 0,
            username: String::new(),
            password: String::new(),
            rest_secret: None,
            rest_separator: DEFAULT_REST_SEPARATOR,
            hash_algorithm: HashAlgorithm::default(),
            origin: String::new(),
            oauth: false,
            oauth_keys: OauthKeys::new(),
            hang_on: false,
            negative_test: false,
            negative_protocol_test: false,
            dos: false,
            random_disconnect: false,
            mobility: false,
            no_permissions: false,
            extra_requests: false,
        }
    }
}
