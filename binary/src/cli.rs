use clap::ArgAction;
use clap::Parser;
use uclient::config::AddressFamily;
use uclient::options::RawOptions;

pub type BinError = Box<dyn std::error::Error + Sync + Send>;
pub type BinResult<T> = Result<T, BinError>;

/// TURN test client: resolves the invocation into one consistent
/// configuration, derives credentials, prepares secure transport and starts
/// the requested client sessions.
#[derive(Parser, Debug, Clone)]
#[command(name = "uclient", disable_help_flag = true, args_override_self = true)]
pub struct Args {
    /// TURN server address
    #[arg(value_name = "turn-server-ip-address")]
    pub target: Option<String>,

    /// TCP (default - UDP)
    #[arg(short = 't')]
    pub use_tcp: bool,

    /// SCTP (default - UDP)
    #[arg(short = 'b')]
    pub use_sctp: bool,

    /// TCP relay transport (default - UDP). Implies -t, -y, -c and ignores -s, -e, -r and -g
    #[arg(short = 'T')]
    pub tcp_relay: bool,

    /// Passive TCP (RFC6062 with active peer). Implies -T
    #[arg(short = 'P')]
    pub passive_tcp: bool,

    /// Use client-to-client connections
    #[arg(short = 'y')]
    pub client_to_client: bool,

    /// No rtcp connections
    #[arg(short = 'c')]
    pub no_rtcp: bool,

    /// Dual allocation (implies -c)
    #[arg(short = 'Z')]
    pub dual_allocation: bool,

    /// Secure connection: TLS for TCP, DTLS for UDP
    #[arg(short = 'S')]
    pub secure: bool,

    /// Secure connection with eNULL cipher
    #[arg(short = 'U')]
    pub null_cipher: bool,

    /// Cipher suite for TLS/DTLS. Default value is DEFAULT
    #[arg(short = 'F', value_name = "cipher-suite")]
    pub cipher_suite: Option<String>,

    /// Certificate file (for secure connections only, optional)
    #[arg(short = 'i', value_name = "cert-file")]
    pub certificate_file: Option<String>,

    /// Private key file (for secure connections only)
    #[arg(short = 'k', value_name = "key-file")]
    pub private_key_file: Option<String>,

    /// CA file for server certificate verification
    #[arg(short = 'E', value_name = "ca-file")]
    pub ca_file: Option<String>,

    /// IPv6 relay address requested
    #[arg(short = 'x')]
    pub ipv6: bool,

    /// IPv4 relay address explicitly requested
    #[arg(short = 'X')]
    pub ipv4: bool,

    /// Peer address
    #[arg(short = 'e', value_name = "peer-address")]
    pub peer_address: Option<String>,

    /// Peer port (default 3480)
    #[arg(short = 'r', value_name = "peer-port")]
    pub peer_port: Option<u16>,

    /// Local address
    #[arg(short = 'L', value_name = "local-address")]
    pub local_address: Option<String>,

    /// Local interface device (optional)
    #[arg(short = 'd', value_name = "device")]
    pub interface_name: Option<String>,

    /// TURN server port (default: 3478 unsecure, 5349 secure)
    #[arg(short = 'p', value_name = "port")]
    pub port: Option<u16>,

    /// Message length (default: 100 bytes)
    #[arg(short = 'l', value_name = "length")]
    pub message_length: Option<i64>,

    /// Number of messages to send (default: 5)
    #[arg(short = 'n', value_name = "number")]
    pub message_count: Option<usize>,

    /// Number of clients (default: 1)
    #[arg(short = 'm', value_name = "clients")]
    pub client_count: Option<usize>,

    /// Per-session packet interval in milliseconds (default: 20)
    #[arg(short = 'z', value_name = "milliseconds")]
    pub packet_interval_ms: Option<u64>,

    /// Include DONT_FRAGMENT option
    #[arg(short = 'g')]
    pub dont_fragment: bool,

    /// Mandatory channel padding
    #[arg(short = 'D')]
    pub mandatory_channel_padding: bool,

    /// Bandwidth for the bandwidth request in ALLOCATE (default: zero)
    #[arg(short = 'a', value_name = "bytes-per-second")]
    pub bandwidth: Option<u64>,

    /// STUN/TURN user name
    #[arg(short = 'u', value_name = "user")]
    pub username: Option<String>,

    /// STUN/TURN user password
    #[arg(short = 'w', value_name = "password")]
    pub password: Option<String>,

    /// TURN REST API "plain text" secret
    #[arg(short = 'W', value_name = "secret")]
    pub rest_secret: Option<String>,

    /// TURN REST API timestamp/username separator symbol (default: ':')
    #[arg(short = 'C', value_name = "character")]
    pub rest_separator: Option<char>,

    /// The ORIGIN STUN attribute value
    #[arg(short = 'o', value_name = "origin")]
    pub origin: Option<String>,

    /// Use oAuth with the built-in test keys
    #[arg(short = 'J')]
    pub oauth: bool,

    /// Use send method
    #[arg(short = 's')]
    pub use_send_method: bool,

    /// Hang on indefinitely after the last sent packet
    #[arg(short = 'h')]
    pub hang_on: bool,

    /// Negative tests (some limited cases only)
    #[arg(short = 'N')]
    pub negative_test: bool,

    /// Negative protocol tests
    #[arg(short = 'R')]
    pub negative_protocol_test: bool,

    /// DOS attack mode (quick connect and exit)
    #[arg(short = 'O')]
    pub dos: bool,

    /// Random disconnect after a few initial packets
    #[arg(short = 'B')]
    pub random_disconnect: bool,

    /// ICE Mobility engaged
    #[arg(short = 'M')]
    pub mobility: bool,

    /// Do not set permissions on TURN relay endpoints
    #[arg(short = 'I')]
    pub no_permissions: bool,

    /// Generate extra requests (create permissions, channel bind)
    #[arg(short = 'G')]
    pub extra_requests: bool,

    /// Verbose
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Print help
    #[arg(long = "help", action = ArgAction::HelpLong)]
    help: Option<bool>,
}

impl Args {
    pub fn into_raw(self) -> RawOptions {
        RawOptions {
            use_tcp: self.use_tcp,
            use_sctp: self.use_sctp,
            tcp_relay: self.tcp_relay,
            passive_tcp: self.passive_tcp,
            client_to_client: self.client_to_client,
            no_rtcp: self.no_rtcp,
            dual_allocation: self.dual_allocation,
            dont_fragment: self.dont_fragment,
            use_send_method: self.use_send_method,
            mandatory_channel_padding: self.mandatory_channel_padding,
            secure: self.secure,
            null_cipher: self.null_cipher,
            cipher_suite: self.cipher_suite,
            certificate_file: self.certificate_file,
            private_key_file: self.private_key_file,
            ca_file: self.ca_file,
            address_family: match (self.ipv6, self.ipv4) {
                (true, _) => Some(AddressFamily::V6),
                (false, true) => Some(AddressFamily::V4),
                (false, false) => None,
            },
            peer_address: self.peer_address,
            peer_port: self.peer_port,
            local_address: self.local_address,
            interface_name: self.interface_name,
            port: self.port,
            message_length: self.message_length,
            message_count: self.message_count,
            client_count: self.client_count,
            packet_interval_ms: self.packet_interval_ms,
            bandwidth: self.bandwidth,
            username: self.username,
            password: self.password,
            rest_secret: self.rest_secret,
            rest_separator: self.rest_separator,
            origin: self.origin,
            oauth: self.oauth,
            hang_on: self.hang_on,
            negative_test: self.negative_test,
            negative_protocol_test: self.negative_protocol_test,
            dos: self.dos,
            random_disconnect: self.random_disconnect,
            mobility: self.mobility,
            no_permissions: self.no_permissions,
            extra_requests: self.extra_requests,
        }
    }
}
