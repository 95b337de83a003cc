use core::fmt::Debug;
use core::fmt::Display;
use core::fmt::Formatter;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use log::info;
use log::warn;
use rustls::client::danger::HandshakeSignatureValid;
use rustls::client::danger::ServerCertVerified;
use rustls::client::danger::ServerCertVerifier;
use rustls::crypto::ring;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::CertificateDer;
use rustls::pki_types::PrivateKeyDer;
use rustls::pki_types::ServerName;
use rustls::pki_types::UnixTime;
use rustls::DigitallySignedStruct;
use rustls::RootCertStore;
use rustls::SignatureScheme;
use rustls::SupportedCipherSuite;

use crate::config::ClientConfig;
use crate::config::VERIFY_DEPTH;
use crate::error::TlsError;
use crate::types::SecureContexts;

/// Cipher selection for the secure transports, in precedence order: a null
/// cipher request beats a configured suite list, which beats the allow-all
/// default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherPolicy {
    Null,
    Suites(String),
    AllowAll,
}

impl CipherPolicy {
    pub fn resolve(null_cipher: bool, cipher_suite: Option<&str>) -> Self {
        if null_cipher {
            CipherPolicy::Null
        } else if let Some(suites) = cipher_suite {
            CipherPolicy::Suites(suites.into())
        } else {
            CipherPolicy::AllowAll
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportVariant {
    /// TLS over the stream transport
    Stream,
    /// DTLS over the datagram transport
    Datagram,
}

impl Display for TransportVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            TransportVariant::Stream => write!(f, "tls"),
            TransportVariant::Datagram => write!(f, "dtls"),
        }
    }
}

/// One ready-to-use secure transport context. Shared read-only with every
/// client session after handoff.
#[derive(Clone)]
pub struct SecureContext {
    pub variant: TransportVariant,
    pub tls: Arc<rustls::ClientConfig>,
}

impl Debug for SecureContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SecureContext")
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

/// Builds the secure transport contexts the resolved configuration calls
/// for, one per transport variant in use. Empty when the connection is not
/// secure.
pub fn build_contexts(config: &ClientConfig) -> Result<SecureContexts, TlsError> {
    let mut contexts = SecureContexts::new();
    if !config.secure {
        return Ok(contexts);
    }
    let policy = CipherPolicy::resolve(config.null_cipher, config.cipher_suite.as_deref());
    let variant = if config.transport.uses_tcp() {
        TransportVariant::Stream
    } else {
        TransportVariant::Datagram
    };
    let context = build_context(variant, &policy, config)?;
    contexts
        .push(context)
        .map_err(|_| TlsError::TooManyContexts)?;
    Ok(contexts)
}

fn build_context(
    variant: TransportVariant,
    policy: &CipherPolicy,
    config: &ClientConfig,
) -> Result<SecureContext, TlsError> {
    if variant == TransportVariant::Datagram {
        return Err(TlsError::DatagramUnsupported);
    }

    let provider = provider_for(policy)?;
    let builder = rustls::ClientConfig::builder_with_provider(Arc::new(provider))
        .with_safe_default_protocol_versions()
        .map_err(TlsError::Build)?;

    let identity = match (&config.certificate_file, &config.private_key_file) {
        (Some(certificate), Some(key)) => {
            Some((load_certificates(certificate)?, load_private_key(key)?))
        }
        _ => None,
    };

    let tls = match identity {
        Some((chain, key)) => match &config.ca_file {
            Some(ca) => {
                let roots = load_root_store(ca)?;
                info!(
                    "{variant}: peer verification enabled, chain depth limit {VERIFY_DEPTH}"
                );
                builder
                    .with_root_certificates(roots)
                    .with_client_auth_cert(chain, key)
                    .map_err(TlsError::CertificateKeyMismatch)?
            }
            None => builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert))
                .with_client_auth_cert(chain, key)
                .map_err(TlsError::CertificateKeyMismatch)?,
        },
        None => {
            debug!("{variant}: no client certificate, peer verification disabled");
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert))
                .with_no_client_auth()
        }
    };

    Ok(SecureContext {
        variant,
        tls: Arc::new(tls),
    })
}

fn provider_for(policy: &CipherPolicy) -> Result<CryptoProvider, TlsError> {
    let provider = ring::default_provider();
    match policy {
        CipherPolicy::AllowAll => Ok(provider),
        CipherPolicy::Null => {
            // no null suites exist in this build; the selection is not
            // fatal and the default list stays in effect
            warn!("null cipher suites are not available, using the default suite list");
            Ok(provider)
        }
        CipherPolicy::Suites(suites) => {
            let cipher_suites: Vec<_> = provider
                .cipher_suites
                .iter()
                .copied()
                .filter(|suite| suite_matches(suites, *suite))
                .collect();
            if cipher_suites.is_empty() {
                return Err(TlsError::NoMatchingCipherSuites(suites.clone()));
            }
            Ok(CryptoProvider {
                cipher_suites,
                ..provider
            })
        }
    }
}

// ":" separated name fragments matched against the suite names
fn suite_matches(suites: &str, suite: SupportedCipherSuite) -> bool {
    let name = format!("{:?}", suite.suite()).to_ascii_uppercase();
    suites
        .split(':')
        .map(str::trim)
        .filter(|wanted| !wanted.is_empty())
        .any(|wanted| name.contains(&wanted.to_ascii_uppercase()))
}

fn load_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let mut reader = open(path)?;
    let chain = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| TlsError::CertificateChain(path.to_path_buf()))?;
    if chain.is_empty() {
        return Err(TlsError::CertificateChain(path.to_path_buf()));
    }
    Ok(chain)
}

fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, TlsError> {
    let mut reader = open(path)?;
    rustls_pemfile::private_key(&mut reader)
        .map_err(|_| TlsError::PrivateKey(path.to_path_buf()))?
        .ok_or_else(|| TlsError::PrivateKey(path.to_path_buf()))
}

fn load_root_store(path: &Path) -> Result<RootCertStore, TlsError> {
    let certificates = load_certificates(path)?;
    let mut roots = RootCertStore::empty();
    let (added, _) = roots.add_parsable_certificates(certificates);
    if added == 0 {
        return Err(TlsError::CaCertificates(path.to_path_buf()));
    }
    Ok(roots)
}

fn open(path: &Path) -> Result<BufReader<File>, TlsError> {
    let file = File::open(path).map_err(|source| TlsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Verifier for contexts without a trust anchor: the peer certificate is
/// accepted as-is, handshake signatures are still checked.
#[derive(Debug)]
struct AcceptAnyServerCert;

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &ring::default_provider().signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &ring::default_provider().signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
