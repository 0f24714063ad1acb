//! Data providers turn a data attribute into data rows.
//!
//! Providers are never instantiated from a type name at runtime. Each provider identity is
//! registered in a [`ProviderRegistry`] against a factory, and discovery looks the identity up
//! by name.

pub mod inline;
pub mod json;
pub mod registry;

pub use inline::InlineDataProvider;
pub use json::JsonDataProvider;
pub use registry::{
    build_default_provider_registry, default_provider_registry, ProviderFactory, ProviderRegistry,
};

use crate::metadata::{DataAttribute, MethodInfo};
use crate::value::DataRow;
use crate::TheoryError;

/// Produces the data rows for one data attribute on one theory.
///
/// Every returned row becomes one bound test case, in the order returned. An empty vector is
/// legal; an error abandons discovery of the whole theory.
pub trait DataProvider: Send + Sync {
    fn get_data(
        &self,
        attribute: &DataAttribute,
        method: &MethodInfo,
    ) -> Result<Vec<DataRow>, TheoryError>;
}

type RowsFn = dyn Fn(&DataAttribute, &MethodInfo) -> Result<Vec<DataRow>, TheoryError> + Send + Sync;

/// A provider backed by a closure, for rows computed in code.
pub struct FnProvider {
    rows: Box<RowsFn>,
}

impl FnProvider {
    pub fn new<F>(rows: F) -> Self
    where
        F: Fn(&DataAttribute, &MethodInfo) -> Result<Vec<DataRow>, TheoryError> + Send + Sync + 'static,
    {
        Self {
            rows: Box::new(rows),
        }
    }
}

impl DataProvider for FnProvider {
    fn get_data(
        &self,
        attribute: &DataAttribute,
        method: &MethodInfo,
    ) -> Result<Vec<DataRow>, TheoryError> {
        (self.rows)(attribute, method)
    }
}

impl std::fmt::Debug for FnProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProvider").finish_non_exhaustive()
    }
}
