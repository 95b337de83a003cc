use core::fmt::Display;
use core::fmt::Formatter;
use std::error::Error;
use std::path::PathBuf;

pub type BoxedError = Box<dyn Error + Send + Sync>;
pub type BoxedResult<T> = Result<T, BoxedError>;

#[derive(Debug)]
pub enum OptionsError {
    MissingPeerAddress,
    InvalidPeerAddress(String),
    FileNotFound(PathBuf),
}

impl Error for OptionsError {}

impl Display for OptionsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            OptionsError::MissingPeerAddress => {
                write!(f, "Either a peer address or client-to-client must be specified")
            }
            OptionsError::InvalidPeerAddress(address) => {
                write!(f, "Unable to resolve peer address {address}")
            }
            OptionsError::FileNotFound(path) => {
                write!(f, "File {} not found", path.display())
            }
        }
    }
}

#[derive(Debug)]
pub enum CredentialError {
    Digest,
}

impl Error for CredentialError {}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            CredentialError::Digest => write!(f, "Failed to compute credential digest"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum OauthError {
    UnknownAlgorithm {
        kid: String,
        algorithm: String,
    },
    InvalidKeyEncoding {
        kid: String,
    },
    KeyLength {
        kid: String,
        expected: usize,
        actual: usize,
    },
    CapacityExceeded,
}

impl Error for OauthError {}

impl Display for OauthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            OauthError::UnknownAlgorithm { kid, algorithm } => {
                write!(f, "oauth key {kid}: unknown encryption algorithm {algorithm}")
            }
            OauthError::InvalidKeyEncoding { kid } => {
                write!(f, "oauth key {kid}: invalid base64 key material")
            }
            OauthError::KeyLength {
                kid,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "oauth key {kid}: decoded key is {actual} bytes, the declared algorithm requires {expected}"
                )
            }
            OauthError::CapacityExceeded => write!(f, "Too many oauth keys"),
        }
    }
}

#[derive(Debug)]
pub enum TlsError {
    DatagramUnsupported,
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    CertificateChain(PathBuf),
    PrivateKey(PathBuf),
    CaCertificates(PathBuf),
    CertificateKeyMismatch(rustls::Error),
    NoMatchingCipherSuites(String),
    Build(rustls::Error),
    TooManyContexts,
}

impl Error for TlsError {}

impl Display for TlsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            TlsError::DatagramUnsupported => write!(f, "DTLS is not supported"),
            TlsError::FileRead { path, source } => {
                write!(f, "Could not read {}: {source}", path.display())
            }
            TlsError::CertificateChain(path) => {
                write!(f, "Could not load certificate chain from {}", path.display())
            }
            TlsError::PrivateKey(path) => {
                write!(f, "Could not load private key from {}", path.display())
            }
            TlsError::CaCertificates(path) => {
                write!(f, "Cannot load CA certificates from {}", path.display())
            }
            TlsError::CertificateKeyMismatch(source) => {
                write!(f, "Private key does not match the certificate chain: {source}")
            }
            TlsError::NoMatchingCipherSuites(suites) => {
                write!(f, "No cipher suite matches {suites}")
            }
            TlsError::Build(source) => write!(f, "Could not build TLS context: {source}"),
            TlsError::TooManyContexts => write!(f, "Too many secure transport contexts"),
        }
    }
}

#[derive(Debug)]
pub enum BootstrapError {
    Options(OptionsError),
    Oauth(OauthError),
    Tls(TlsError),
}

impl Error for BootstrapError {}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            BootstrapError::Options(s) => s.fmt(f),
            BootstrapError::Oauth(s) => s.fmt(f),
            BootstrapError::Tls(s) => s.fmt(f),
        }
    }
}

impl From<OptionsError> for BootstrapError {
    fn from(source: OptionsError) -> Self {
        BootstrapError::Options(source)
    }
}

impl From<OauthError> for BootstrapError {
    fn from(source: OauthError) -> Self {
        BootstrapError::Oauth(source)
    }
}

impl From<TlsError> for BootstrapError {
    fn from(source: TlsError) -> Self {
        BootstrapError::Tls(source)
    }
}
