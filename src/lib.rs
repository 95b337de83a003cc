pub mod types {
    pub type OauthKeys = heapless::Vec<crate::oauth::OauthKey, { crate::config::OAUTH_KEY_COUNT }>;
    pub type SecureContexts =
        heapless::Vec<crate::tls::SecureContext, { crate::config::MAX_SECURE_CONTEXTS }>;
}

pub mod bootstrap;
pub mod config;
pub mod credentials;
pub mod error;
pub mod oauth;
pub mod options;
pub mod session;
pub mod tls;
