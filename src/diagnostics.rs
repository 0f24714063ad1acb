//!
//! ****************************************************************************************
//! ** ERROR CONSTRUCTION RULES FOR Theorist Error Macros (`err_msg!`, `err_ctx!`)        **
//! ****************************************************************************************
//!
//! # Overview
//!
//! This module defines the unified, `miette`-based diagnostic type for theory discovery and
//! execution. Every failure raised while resolving data providers, pulling data rows or running
//! a test case is a [`TheoryError`]. Construction goes through the `err_msg!` and `err_ctx!`
//! macros.
//!
//! # Error Construction Macros
//!
//! - **Use `err_msg!` for message-only errors.**
//!   - `err_msg!(Internal, "registry poisoned")`
//!   - `err_msg!(UnknownProvider, "no provider registered as '{}'", id)`
//!
//! - **Use `err_ctx!` when the error concerns a specific test method.**
//!   - `err_ctx!(NoData, msg, "Calc.Adds")`
//!   - `err_ctx!(MalformedBinding, msg, "Calc.Adds", "bindings take a provider name and a location")`
//!
//! - **Use `.with_source(err)` to chain an underlying cause.**
//!
//! # Rules
//!
//! - Discovery never returns a `TheoryError` to its caller. Errors produced during discovery are
//!   folded into a synthetic test case whose execution reports them.
//! - Messages are complete sentences without trailing punctuation.
//!
//! ****************************************************************************************

use miette::Diagnostic;
use thiserror::Error;

/// Boxed cause attached to a [`TheoryError`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Type-safe error classification enum that corresponds to TheoryError variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// A theory produced no data rows
    NoData,
    /// Data resolution for a theory failed
    DataResolution,
    /// A data attribute had no provider binding
    MissingBinding,
    /// A provider binding carried unusable arguments
    MalformedBinding,
    /// The named provider is not registered
    UnknownProvider,
    /// A provider factory failed
    ProviderConstruction,
    /// A provider failed while producing rows
    Provider,
    /// A provider panicked
    ProviderPanic,
    /// The test body failed
    Invocation,
    /// Configuration or logging setup failed
    Config,
    /// Internal errors
    Internal,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::NoData => "NoData",
            ErrorType::DataResolution => "DataResolution",
            ErrorType::MissingBinding => "MissingBinding",
            ErrorType::MalformedBinding => "MalformedBinding",
            ErrorType::UnknownProvider => "UnknownProvider",
            ErrorType::ProviderConstruction => "ProviderConstruction",
            ErrorType::Provider => "Provider",
            ErrorType::ProviderPanic => "ProviderPanic",
            ErrorType::Invocation => "Invocation",
            ErrorType::Config => "Config",
            ErrorType::Internal => "Internal",
        }
    }

    /// Diagnostic code reported through `miette`.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorType::NoData => "theorist::no_data",
            ErrorType::DataResolution => "theorist::data_resolution",
            ErrorType::MissingBinding => "theorist::missing_binding",
            ErrorType::MalformedBinding => "theorist::malformed_binding",
            ErrorType::UnknownProvider => "theorist::unknown_provider",
            ErrorType::ProviderConstruction => "theorist::provider_construction",
            ErrorType::Provider => "theorist::provider",
            ErrorType::ProviderPanic => "theorist::provider_panic",
            ErrorType::Invocation => "theorist::invocation",
            ErrorType::Config => "theorist::config",
            ErrorType::Internal => "theorist::internal",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal error context: which test method an error concerns, and how to fix it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// `Type.Method` identity of the offending test method (if any).
    pub method: Option<String>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_method(method: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            help: None,
        }
    }

    pub fn with_all(method: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            help: Some(help.into()),
        }
    }
}

/// Unified error type for discovery and execution failures.
#[derive(Debug, Error)]
pub enum TheoryError {
    #[error("{message}")]
    NoData {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("{message}")]
    DataResolution {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("Missing provider binding: {message}")]
    MissingBinding {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("Malformed provider binding: {message}")]
    MalformedBinding {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("Unknown provider: {message}")]
    UnknownProvider {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("Provider construction failed: {message}")]
    ProviderConstruction {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("Provider error: {message}")]
    Provider {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("Provider panicked: {message}")]
    ProviderPanic {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("Test failed: {message}")]
    Invocation {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
}

impl TheoryError {
    fn parts(&self) -> (&String, &ErrorContext, &Option<BoxedCause>) {
        match self {
            TheoryError::NoData { message, ctx, source }
            | TheoryError::DataResolution { message, ctx, source }
            | TheoryError::MissingBinding { message, ctx, source }
            | TheoryError::MalformedBinding { message, ctx, source }
            | TheoryError::UnknownProvider { message, ctx, source }
            | TheoryError::ProviderConstruction { message, ctx, source }
            | TheoryError::Provider { message, ctx, source }
            | TheoryError::ProviderPanic { message, ctx, source }
            | TheoryError::Invocation { message, ctx, source }
            | TheoryError::Config { message, ctx, source }
            | TheoryError::Internal { message, ctx, source } => (message, ctx, source),
        }
    }

    fn source_slot(&mut self) -> &mut Option<BoxedCause> {
        match self {
            TheoryError::NoData { source, .. }
            | TheoryError::DataResolution { source, .. }
            | TheoryError::MissingBinding { source, .. }
            | TheoryError::MalformedBinding { source, .. }
            | TheoryError::UnknownProvider { source, .. }
            | TheoryError::ProviderConstruction { source, .. }
            | TheoryError::Provider { source, .. }
            | TheoryError::ProviderPanic { source, .. }
            | TheoryError::Invocation { source, .. }
            | TheoryError::Config { source, .. }
            | TheoryError::Internal { source, .. } => source,
        }
    }

    /// Returns the type-safe error classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            TheoryError::NoData { .. } => ErrorType::NoData,
            TheoryError::DataResolution { .. } => ErrorType::DataResolution,
            TheoryError::MissingBinding { .. } => ErrorType::MissingBinding,
            TheoryError::MalformedBinding { .. } => ErrorType::MalformedBinding,
            TheoryError::UnknownProvider { .. } => ErrorType::UnknownProvider,
            TheoryError::ProviderConstruction { .. } => ErrorType::ProviderConstruction,
            TheoryError::Provider { .. } => ErrorType::Provider,
            TheoryError::ProviderPanic { .. } => ErrorType::ProviderPanic,
            TheoryError::Invocation { .. } => ErrorType::Invocation,
            TheoryError::Config { .. } => ErrorType::Config,
            TheoryError::Internal { .. } => ErrorType::Internal,
        }
    }

    /// The bare message, without the variant prefix.
    pub fn message(&self) -> &str {
        self.parts().0
    }

    pub fn context(&self) -> &ErrorContext {
        self.parts().1
    }

    /// Attaches an underlying cause, replacing any previous one.
    pub fn with_source(mut self, cause: impl Into<BoxedCause>) -> Self {
        *self.source_slot() = Some(cause.into());
        self
    }

    /// Renders this error followed by every cause in its `source()` chain, joined with `: `.
    pub fn chain_text(&self) -> String {
        let mut text = self.to_string();
        let mut next = std::error::Error::source(self);
        while let Some(cause) = next {
            text.push_str(": ");
            text.push_str(&cause.to_string());
            next = cause.source();
        }
        text
    }
}

impl Diagnostic for TheoryError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.error_type().code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.context()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }
}

/// Extracts the message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Constructs a TheoryError variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    // Message with format arguments
    ($variant:ident, $fmt:expr, $($arg:expr),+ $(,)?) => {
        $crate::TheoryError::$variant {
            message: format!($fmt, $($arg),+),
            ctx: $crate::ErrorContext { method: None, help: None },
            source: None,
        }
    };
    // Message only
    ($variant:ident, $msg:expr) => {
        $crate::TheoryError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::ErrorContext { method: None, help: None },
            source: None,
        }
    };
}

/// Constructs a TheoryError variant carrying the offending method identity and optional help.
#[macro_export]
macro_rules! err_ctx {
    // Message, method, help
    ($variant:ident, $msg:expr, $method:expr, $help:expr) => {
        $crate::TheoryError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                method: Some($method.to_string()),
                help: Some(format!("{}", $help)),
            },
            source: None,
        }
    };
    // Message, method
    ($variant:ident, $msg:expr, $method:expr) => {
        $crate::TheoryError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                method: Some($method.to_string()),
                help: None,
            },
            source: None,
        }
    };
}
