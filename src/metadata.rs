//! Test metadata consumed by discovery.
//!
//! These types are the narrow view discovery has of the surrounding framework: which assembly,
//! type and method a theory lives on, the theory directive attached to it, and the data
//! attributes naming where its rows come from. They are produced by whatever reads annotations
//! from source; discovery only reads them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;
use crate::{err_ctx, err_msg, TheoryError};

/// The unit of compiled test code a theory belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssemblyInfo {
    pub name: String,
}

impl AssemblyInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The type declaring a theory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One declared parameter of a theory method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub type_name: String,
}

impl ParameterInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A declared test method together with its data attributes, in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
    #[serde(default)]
    pub data_attributes: Vec<DataAttribute>,
}

impl MethodInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.parameters.push(ParameterInfo::new(name, type_name));
        self
    }

    pub fn with_data(mut self, attribute: DataAttribute) -> Self {
        self.data_attributes.push(attribute);
        self
    }

    /// Data attributes in the order they were declared.
    pub fn data_attributes(&self) -> &[DataAttribute] {
        &self.data_attributes
    }
}

/// The method-level declaration that a method is a theory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TheoryDirective {
    /// Overrides the `Type.Method` prefix of every case's display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Presence means the theory is not expanded and never runs.
    #[serde(default)]
    pub skip: Option<String>,
}

impl TheoryDirective {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            skip: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn skip_reason(&self) -> Option<&str> {
        self.skip.as_deref()
    }
}

/// Identity of a data provider: a name plus the location that provides it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProviderId {
    pub name: String,
    pub location: String,
}

impl ProviderId {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    /// The built-in provider whose single row is the attribute's own arguments.
    pub fn inline() -> Self {
        Self::new("InlineDataProvider", crate::BUILTIN_LOCATION)
    }

    /// The built-in provider that reads rows from a JSON table.
    pub fn json() -> Self {
        Self::new("JsonDataProvider", crate::BUILTIN_LOCATION)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.location)
    }
}

/// Provider metadata attached to a data attribute.
///
/// Stored as raw constructor-style arguments; a well-formed binding has exactly two string
/// arguments, the provider name followed by its location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderBinding {
    pub args: Vec<Value>,
}

impl ProviderBinding {
    pub fn new(id: &ProviderId) -> Self {
        Self {
            args: vec![
                Value::String(id.name.clone()),
                Value::String(id.location.clone()),
            ],
        }
    }

    pub fn from_args(args: Vec<Value>) -> Self {
        Self { args }
    }

    /// Reads the provider identity out of the binding arguments.
    pub fn provider_id(&self) -> Result<ProviderId, TheoryError> {
        let [name, location] = self.args.as_slice() else {
            return Err(err_msg!(
                MalformedBinding,
                "expected 2 arguments (provider name, location), found {}",
                self.args.len()
            ));
        };
        match (name.as_str(), location.as_str()) {
            (Some(name), Some(location)) => Ok(ProviderId::new(name, location)),
            _ => Err(err_msg!(
                MalformedBinding,
                "arguments must be strings, found ({}, {})",
                name.type_name(),
                location.type_name()
            )),
        }
    }
}

/// A data-source annotation on a theory.
///
/// `args` is provider-specific configuration; `binding` names the provider that turns it into
/// rows. An attribute without a binding cannot be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataAttribute {
    pub name: String,
    #[serde(default)]
    pub binding: Option<ProviderBinding>,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl DataAttribute {
    pub fn new(name: impl Into<String>, provider: &ProviderId, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            binding: Some(ProviderBinding::new(provider)),
            args,
        }
    }

    /// An attribute with no provider binding at all.
    pub fn unbound(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            binding: None,
            args,
        }
    }

    /// `InlineData(args...)`: one row made of `args`.
    pub fn inline(args: Vec<Value>) -> Self {
        Self::new("InlineData", &ProviderId::inline(), args)
    }

    /// `JsonData(table)`: rows parsed from a JSON array of arrays.
    pub fn json(table: impl Into<String>) -> Self {
        Self::new("JsonData", &ProviderId::json(), vec![Value::String(table.into())])
    }

    pub fn binding(&self) -> Option<&ProviderBinding> {
        self.binding.as_ref()
    }

    /// Resolves the identity of the provider bound to this attribute.
    pub fn provider_id(&self) -> Result<ProviderId, TheoryError> {
        let binding = self.binding().ok_or_else(|| {
            err_ctx!(
                MissingBinding,
                format!("data attribute '{}' names no data provider", self.name),
                self.name,
                "attach a provider binding (provider name and location) to the attribute"
            )
        })?;
        binding.provider_id()
    }
}
