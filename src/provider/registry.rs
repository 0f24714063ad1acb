//! Provider registry: the lookup table from provider identity to provider factory.
//!
//! ## Usage Workflow
//! ```rust
//! use theorist::provider::{build_default_provider_registry, FnProvider};
//! use theorist::{row, ProviderId};
//! // 1. Start from the built-in providers
//! let mut registry = build_default_provider_registry();
//! // 2. Register project-specific providers at startup
//! let id = ProviderId::new("SquaresProvider", "my_tests");
//! registry.register_fn(id.clone(), |_, _| Ok(vec![row![1, 1], row![2, 4]]));
//! // 3. Discovery resolves providers by identity
//! assert!(registry.contains(&id));
//! assert!(registry.contains(&ProviderId::inline()));
//! ```
//!
//! ## Registry Invariant
//! Registration happens before discovery starts. Discovery only reads the registry, so one
//! registry can be shared across threads discovering different methods.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::trace;

use crate::metadata::{DataAttribute, MethodInfo, ProviderId};
use crate::provider::{DataProvider, FnProvider, InlineDataProvider, JsonDataProvider};
use crate::value::DataRow;
use crate::{err_ctx, TheoryError};

/// Builds a fresh provider instance. Called once per data attribute being resolved.
pub type ProviderFactory =
    Arc<dyn Fn() -> Result<Box<dyn DataProvider>, TheoryError> + Send + Sync>;

/// Registry of data provider factories, keyed by provider identity.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    factories: HashMap<ProviderId, ProviderFactory>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `id`, replacing any previous registration.
    ///
    /// Returns the replaced factory, if there was one.
    pub fn register<F>(&mut self, id: ProviderId, factory: F) -> Option<ProviderFactory>
    where
        F: Fn() -> Result<Box<dyn DataProvider>, TheoryError> + Send + Sync + 'static,
    {
        self.factories.insert(id, Arc::new(factory))
    }

    /// Registers a factory, returning an error if `id` is already taken.
    pub fn register_or_error<F>(&mut self, id: ProviderId, factory: F) -> Result<(), TheoryError>
    where
        F: Fn() -> Result<Box<dyn DataProvider>, TheoryError> + Send + Sync + 'static,
    {
        if self.factories.contains_key(&id) {
            return Err(err_ctx!(
                Config,
                format!("provider '{}' is already registered", id),
                id.name,
                "unregister the existing provider first or pick another identity"
            ));
        }
        self.factories.insert(id, Arc::new(factory));
        Ok(())
    }

    /// Registers a stateless provider type that is cheap to build.
    pub fn register_default<P>(&mut self, id: ProviderId) -> Option<ProviderFactory>
    where
        P: DataProvider + Default + 'static,
    {
        self.register(id, || Ok(Box::new(P::default()) as Box<dyn DataProvider>))
    }

    /// Registers a closure as the row source for `id`.
    pub fn register_fn<F>(&mut self, id: ProviderId, rows: F) -> Option<ProviderFactory>
    where
        F: Fn(&DataAttribute, &MethodInfo) -> Result<Vec<DataRow>, TheoryError>
            + Send
            + Sync
            + 'static,
    {
        let rows = Arc::new(rows);
        self.register(id, move || {
            let rows = Arc::clone(&rows);
            Ok(Box::new(FnProvider::new(move |attr: &DataAttribute, method: &MethodInfo| {
                rows(attr, method)
            })) as Box<dyn DataProvider>)
        })
    }

    pub fn unregister(&mut self, id: &ProviderId) -> Option<ProviderFactory> {
        self.factories.remove(id)
    }

    pub fn contains(&self, id: &ProviderId) -> bool {
        self.factories.contains_key(id)
    }

    /// Builds a provider instance for `id`.
    ///
    /// # Errors
    /// - `UnknownProvider` if nothing is registered under `id`
    /// - `ProviderConstruction` wrapping the factory's own error
    pub fn create(&self, id: &ProviderId) -> Result<Box<dyn DataProvider>, TheoryError> {
        let factory = self.factories.get(id).ok_or_else(|| {
            err_ctx!(
                UnknownProvider,
                format!("no provider registered as '{}'", id),
                id.name,
                "register the provider with ProviderRegistry::register before discovery"
            )
        })?;
        trace!(provider = %id, "constructing data provider");
        factory().map_err(|e| {
            err_ctx!(
                ProviderConstruction,
                format!("factory for '{}' failed", id),
                id.name
            )
            .with_source(e)
        })
    }

    /// Registered identities, sorted for stable output.
    pub fn list(&self) -> Vec<ProviderId> {
        let mut ids: Vec<_> = self.factories.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.list())
            .finish()
    }
}

/// Builds a registry holding the built-in inline and JSON providers.
///
/// # Example
/// ```rust
/// use theorist::provider::build_default_provider_registry;
/// let registry = build_default_provider_registry();
/// assert_eq!(registry.len(), 2);
/// ```
pub fn build_default_provider_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register_default::<InlineDataProvider>(ProviderId::inline());
    registry.register_default::<JsonDataProvider>(ProviderId::json());
    registry
}

static DEFAULT_REGISTRY: Lazy<Arc<ProviderRegistry>> =
    Lazy::new(|| Arc::new(build_default_provider_registry()));

/// Process-wide registry of built-in providers, built on first use.
pub fn default_provider_registry() -> Arc<ProviderRegistry> {
    Arc::clone(&DEFAULT_REGISTRY)
}
