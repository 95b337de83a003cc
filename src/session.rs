use crate::config::ClientConfig;
use crate::error::BoxedResult;

/// The values the session engine is started with, all fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub server_address: String,
    pub port: u16,
    pub interface_name: String,
    pub local_address: String,
    pub message_count: usize,
    pub client_count: usize,
}

impl LaunchRequest {
    pub fn new(server_address: &str, config: &ClientConfig) -> Self {
        Self {
            server_address: server_address.into(),
            port: config.port,
            interface_name: config.interface_name.clone(),
            local_address: config.local_address.clone(),
            message_count: config.message_count,
            client_count: config.client_count,
        }
    }
}

/// Boundary to the session execution engine. Called exactly once, after
/// the whole configuration pipeline has completed; the configuration is
/// immutable from that point on.
pub trait SessionLauncher {
    fn launch(&mut self, request: LaunchRequest, config: &ClientConfig) -> BoxedResult<()>;
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    /// records every handoff so tests can assert the launch happened once
    #[derive(Default)]
    pub struct RecordingLauncher {
        pub requests: Vec<LaunchRequest>,
    }

    impl SessionLauncher for RecordingLauncher {
        fn launch(&mut self, request: LaunchRequest, _config: &ClientConfig) -> BoxedResult<()> {
            self.requests.push(request);
            Ok(())
        }
    }
}
