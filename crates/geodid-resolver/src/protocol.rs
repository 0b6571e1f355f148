//! Method-keyed driver table.

use std::collections::HashMap;
use std::sync::Arc;

use geodid_types::GeoDid;
use tracing::debug;

use crate::driver::{Driver, Resolution};
use crate::error::{ResolveError, ResolveResult};

/// Dispatches identifiers to the driver registered for their method.
///
/// Registration is additive: adding a driver for a new method never changes
/// how identifiers of other methods resolve.
#[derive(Clone, Default)]
pub struct ResolutionProtocol {
    drivers: HashMap<String, Arc<dyn Driver>>,
}

impl ResolutionProtocol {
    pub fn new(drivers: impl IntoIterator<Item = Arc<dyn Driver>>) -> Self {
        let mut protocol = Self::default();
        for driver in drivers {
            protocol.register(driver);
        }
        protocol
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_driver(mut self, driver: Arc<dyn Driver>) -> Self {
        self.register(driver);
        self
    }

    /// Install `driver` for its method, returning the one it replaces.
    pub fn register(&mut self, driver: Arc<dyn Driver>) -> Option<Arc<dyn Driver>> {
        let method = driver.method().to_string();
        debug!(%method, "registered resolution driver");
        self.drivers.insert(method, driver)
    }

    /// Registered methods, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.drivers.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    pub fn supports(&self, method: &str) -> bool {
        self.drivers.contains_key(method)
    }

    pub async fn resolve(&self, geodid: &GeoDid) -> ResolveResult<Resolution> {
        let driver = self
            .drivers
            .get(geodid.method())
            .ok_or_else(|| ResolveError::UnsupportedMethod {
                method: geodid.method().to_string(),
                geodid: geodid.clone(),
            })?;
        driver.resolve(geodid).await
    }

    /// Parse and resolve in one step.
    pub async fn resolve_str(&self, geodid: &str) -> ResolveResult<Resolution> {
        let geodid = GeoDid::parse(geodid)?;
        self.resolve(&geodid).await
    }
}

impl std::fmt::Debug for ResolutionProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionProtocol")
            .field("methods", &self.methods())
            .finish()
    }
}
