//! Lazily constructed, resettable client slot.
//!
//! The binary owns one [`SharedClient`] and hands an `Arc` of it to every
//! tool. The first [`get`](SharedClient::get) builds the client from the
//! stored configuration; later calls return the same instance until
//! [`reset`](SharedClient::reset).

use super::config::ClientConfig;
use super::harvestr::{HarvestrClient, HarvestrResult};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Owner of the process-wide Harvestr client.
#[derive(Debug)]
pub struct SharedClient {
    /// Configuration used to build the client.
    config: ClientConfig,

    /// The current client, if built.
    client: Mutex<Option<Arc<HarvestrClient>>>,
}

impl SharedClient {
    /// Create an empty slot. Nothing is built until the first `get`.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: Mutex::new(None),
        }
    }

    /// Slot configured from the environment.
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    /// Slot holding an already built client.
    ///
    /// A later `reset` rebuilds from that client's configuration.
    pub fn from_client(client: HarvestrClient) -> Self {
        Self {
            config: client.config().clone(),
            client: Mutex::new(Some(Arc::new(client))),
        }
    }

    /// Get the client, building it on first access.
    ///
    /// Configuration errors are returned every time until the configuration
    /// is fixed; nothing is cached on failure.
    pub fn get(&self) -> HarvestrResult<Arc<HarvestrClient>> {
        let mut slot = self.client.lock();

        if let Some(client) = slot.as_ref() {
            return Ok(Arc::clone(client));
        }

        let client = Arc::new(HarvestrClient::with_config(self.config.clone())?);
        debug!(base_url = client.base_url(), "Created Harvestr client");
        *slot = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Whether a client has been built.
    pub fn is_initialized(&self) -> bool {
        self.client.lock().is_some()
    }

    /// Close and drop the current client. The next `get` builds a new one.
    pub fn reset(&self) {
        if let Some(client) = self.client.lock().take() {
            client.close();
            debug!("Reset Harvestr client");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_construction() {
        let shared = SharedClient::new(ClientConfig::with_token("t1"));
        assert!(!shared.is_initialized());

        shared.get().unwrap();
        assert!(shared.is_initialized());
    }

    #[test]
    fn test_same_instance_across_calls() {
        let shared = SharedClient::new(ClientConfig::with_token("t1"));
        let first = shared.get().unwrap();
        let second = shared.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_fresh_instance_after_reset() {
        let shared = SharedClient::new(ClientConfig::with_token("t1"));
        let first = shared.get().unwrap();

        shared.reset();
        assert!(!shared.is_initialized());

        let second = shared.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_reset_closes_connection() {
        let shared = SharedClient::new(ClientConfig::with_token("t1"));
        let client = shared.get().unwrap();
        client.connection().unwrap();
        assert!(client.is_connected());

        shared.reset();
        assert!(!client.is_connected());
    }

    #[test]
    fn test_missing_token_not_cached() {
        let shared = SharedClient::new(ClientConfig::default());
        assert!(shared.get().unwrap_err().is_config());
        assert!(shared.get().unwrap_err().is_config());
        assert!(!shared.is_initialized());
    }

    #[test]
    fn test_from_client_serves_given_instance() {
        let config = ClientConfig::with_token("t1").base_url("http://localhost:9");
        let shared = SharedClient::from_client(HarvestrClient::with_config(config).unwrap());
        assert!(shared.is_initialized());

        let client = shared.get().unwrap();
        assert_eq!(client.base_url(), "http://localhost:9");
        assert!(Arc::ptr_eq(&client, &shared.get().unwrap()));

        shared.reset();
        let rebuilt = shared.get().unwrap();
        assert!(!Arc::ptr_eq(&client, &rebuilt));
        assert_eq!(rebuilt.base_url(), "http://localhost:9");
    }

    #[test]
    fn test_reset_without_client() {
        let shared = SharedClient::new(ClientConfig::default());
        shared.reset();
        assert!(!shared.is_initialized());
    }
}
