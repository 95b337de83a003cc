use log::debug;
use log::info;

use crate::config::ClientConfig;
use crate::credentials::apply_rest_credentials;
use crate::error::BootstrapError;
use crate::oauth::load_builtin_keys;
use crate::options::resolve;
use crate::options::RawOptions;
use crate::tls::build_contexts;

/// Runs the whole resolution pipeline: flag resolution, credential
/// derivation, key material loading and secure context building. The
/// returned configuration is final; no later stage mutates it.
pub fn prepare(raw: RawOptions, now_unix_secs: u64) -> Result<ClientConfig, BootstrapError> {
    let mut config = resolve(raw)?;
    apply_rest_credentials(&mut config, now_unix_secs);
    if config.oauth {
        config.oauth_keys = load_builtin_keys()?;
        debug!("loaded {} oauth test keys", config.oauth_keys.len());
    }
    config.secure_contexts = build_contexts(&config)?;
    if config.secure {
        info!(
            "prepared {} secure transport context(s)",
            config.secure_contexts.len()
        );
    }
    Ok(config)
}
