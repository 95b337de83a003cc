use log::debug;
use log::info;
use uclient::config::ClientConfig;
use uclient::error::BoxedResult;
use uclient::session::LaunchRequest;
use uclient::session::SessionLauncher;

/// Integration point for the session execution engine. The protocol
/// exchange lives outside this crate; this implementation reports the
/// resolved handoff values it would be started with.
#[derive(Default)]
pub struct EngineHandoff;

impl SessionLauncher for EngineHandoff {
    fn launch(&mut self, request: LaunchRequest, config: &ClientConfig) -> BoxedResult<()> {
        info!(
            "starting {} client(s) to {}:{}, {} message(s) each",
            request.client_count, request.server_address, request.port, request.message_count
        );
        if !request.local_address.is_empty() {
            info!("local address {}", request.local_address);
        }
        if !request.interface_name.is_empty() {
            info!("bound to interface {}", request.interface_name);
        }
        debug!(
            "transport: {}, relay transport: {}, message length: {}, secure contexts: {}, oauth keys: {}",
            config.transport,
            config.relay_transport,
            config.message_length,
            config.secure_contexts.len(),
            config.oauth_keys.len(),
        );
        Ok(())
    }
}
