//! Proxy pattern: a caching stand-in for a slow data server.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::DemoError;

/// Interface shared by the real server and its proxy.
pub trait Server {
    fn connect(&mut self) -> bool;
    fn get_data(&mut self, key: &str) -> Result<String, DemoError>;
}

#[derive(Debug, Default)]
pub struct RealServer {
    connects: usize,
    fetches: usize,
}

impl RealServer {
    pub const CONNECT_NOTE: &'static str = "Connecting to the real server...";
    pub const FETCH_NOTE: &'static str = "Retrieving data from the real server...";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect_count(&self) -> usize {
        self.connects
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    fn fetch(&mut self, key: &str) -> String {
        self.fetches += 1;
        debug!(key, fetches = self.fetches, "real server fetch");
        format!("Real Server Data: {key}")
    }
}

impl Server for RealServer {
    fn connect(&mut self) -> bool {
        self.connects += 1;
        debug!(connects = self.connects, "real server connect");
        true
    }

    fn get_data(&mut self, key: &str) -> Result<String, DemoError> {
        Ok(self.fetch(key))
    }
}

/// What the proxy does when data is requested before [`Server::connect`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectPolicy {
    /// Build and connect the real server on first use.
    #[default]
    Lazy,
    /// Fail with [`DemoError::NotConnected`].
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    RealServer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub data: String,
    pub source: FetchSource,
    /// Set when this request had to connect the real server first.
    pub connected: bool,
}

impl Fetched {
    /// Narration lines for this request, in the order things happened.
    pub fn notes(&self) -> Vec<&'static str> {
        let mut notes = Vec::new();
        if self.connected {
            notes.push(RealServer::CONNECT_NOTE);
        }
        notes.push(match self.source {
            FetchSource::Cache => ProxyServer::CACHE_NOTE,
            FetchSource::RealServer => RealServer::FETCH_NOTE,
        });
        notes
    }
}

/// Caches real server responses per key. Entries never expire.
#[derive(Debug, Default)]
pub struct ProxyServer {
    real: Option<RealServer>,
    cache: HashMap<String, String>,
    policy: ConnectPolicy,
    hits: usize,
    misses: usize,
}

impl ProxyServer {
    pub const CACHE_NOTE: &'static str = "Loading data from cache...";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ConnectPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ConnectPolicy {
        self.policy
    }

    pub fn is_connected(&self) -> bool {
        self.real.is_some()
    }

    /// The backing server, once a connection has been made.
    pub fn real_server(&self) -> Option<&RealServer> {
        self.real.as_ref()
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_cached(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    /// Cache `(hits, misses)` since the proxy was created.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }

    /// Like [`Server::get_data`], also reporting where the data came from.
    pub fn fetch(&mut self, key: &str) -> Result<Fetched, DemoError> {
        if let Some(data) = self.cache.get(key) {
            self.hits += 1;
            trace!(key, "proxy cache hit");
            return Ok(Fetched {
                data: data.clone(),
                source: FetchSource::Cache,
                connected: false,
            });
        }

        let connected = match self.policy {
            ConnectPolicy::Lazy if self.real.is_none() => {
                debug!(key, "connecting lazily before first fetch");
                self.connect();
                true
            }
            _ => false,
        };

        let real = self
            .real
            .as_mut()
            .ok_or_else(|| DemoError::not_connected(key))?;
        let data = real.get_data(key)?;

        self.misses += 1;
        trace!(key, "proxy cache miss");
        self.cache.insert(key.to_string(), data.clone());

        Ok(Fetched {
            data,
            source: FetchSource::RealServer,
            connected,
        })
    }
}

impl Server for ProxyServer {
    fn connect(&mut self) -> bool {
        self.real.get_or_insert_with(RealServer::new).connect()
    }

    fn get_data(&mut self, key: &str) -> Result<String, DemoError> {
        self.fetch(key).map(|fetched| fetched.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fetch_count(proxy: &ProxyServer) -> usize {
        proxy.real_server().map_or(0, RealServer::fetch_count)
    }

    #[test]
    fn test_real_server_responses() {
        let mut server = RealServer::new();
        assert!(server.connect());
        assert_eq!(server.get_data("image_1").unwrap(), "Real Server Data: image_1");
        assert_eq!(server.fetch_count(), 1);
    }

    #[test]
    fn test_second_request_is_cache_hit() {
        let mut proxy = ProxyServer::new();
        assert!(proxy.connect());

        let first = proxy.fetch("image_1").unwrap();
        assert_eq!(first.source, FetchSource::RealServer);
        assert_eq!(fetch_count(&proxy), 1);

        let second = proxy.fetch("image_1").unwrap();
        assert_eq!(second.source, FetchSource::Cache);
        assert_eq!(second.data, first.data);
        assert_eq!(fetch_count(&proxy), 1);
        assert_eq!(proxy.stats(), (1, 1));
    }

    #[test]
    fn test_keys_are_cached_independently() {
        let mut proxy = ProxyServer::new();
        proxy.connect();

        let one = proxy.get_data("image_1").unwrap();
        let two = proxy.get_data("image_2").unwrap();
        assert_ne!(one, two);
        assert_eq!(fetch_count(&proxy), 2);
        assert_eq!(proxy.cached_len(), 2);

        assert_eq!(proxy.get_data("image_1").unwrap(), one);
        assert_eq!(proxy.get_data("image_2").unwrap(), two);
        assert_eq!(fetch_count(&proxy), 2);
    }

    #[test]
    fn test_connect_builds_real_server_once() {
        let mut proxy = ProxyServer::new();
        assert!(!proxy.is_connected());

        proxy.connect();
        proxy.connect();
        let real = proxy.real_server().unwrap();
        assert_eq!(real.connect_count(), 2);
        assert_eq!(real.fetch_count(), 0);
    }

    #[test]
    fn test_lazy_policy_connects_on_first_fetch() {
        let mut proxy = ProxyServer::with_policy(ConnectPolicy::Lazy);
        let fetched = proxy.fetch("image_1").unwrap();

        assert!(fetched.connected);
        assert!(proxy.is_connected());
        assert_eq!(
            fetched.notes(),
            vec![RealServer::CONNECT_NOTE, RealServer::FETCH_NOTE]
        );
        assert_eq!(proxy.real_server().unwrap().connect_count(), 1);

        let again = proxy.fetch("image_2").unwrap();
        assert!(!again.connected);
    }

    #[test]
    fn test_strict_policy_rejects_unconnected_fetch() {
        let mut proxy = ProxyServer::with_policy(ConnectPolicy::Strict);
        match proxy.get_data("image_1") {
            Err(DemoError::NotConnected { key }) => assert_eq!(key, "image_1"),
            other => panic!("expected NotConnected, got {other:?}"),
        }
        assert_eq!(proxy.cached_len(), 0);
        assert!(!proxy.is_connected());

        proxy.connect();
        assert_eq!(proxy.get_data("image_1").unwrap(), "Real Server Data: image_1");
    }

    #[test]
    fn test_cache_hit_notes() {
        let mut proxy = ProxyServer::new();
        proxy.connect();
        proxy.fetch("k").unwrap();
        let hit = proxy.fetch("k").unwrap();
        assert_eq!(hit.notes(), vec![ProxyServer::CACHE_NOTE]);
    }

    proptest! {
        #[test]
        fn prop_each_key_fetched_once(
            keys in prop::collection::vec("[a-z]{1,4}", 1..40)
        ) {
            let mut proxy = ProxyServer::new();
            proxy.connect();

            for key in &keys {
                let data = proxy.get_data(key).unwrap();
                prop_assert_eq!(data, format!("Real Server Data: {key}"));
            }

            let distinct: std::collections::HashSet<&String> = keys.iter().collect();
            prop_assert_eq!(fetch_count(&proxy), distinct.len());
            prop_assert_eq!(proxy.cached_len(), distinct.len());
            prop_assert_eq!(proxy.stats(), (keys.len() - distinct.len(), distinct.len()));
        }
    }
}
