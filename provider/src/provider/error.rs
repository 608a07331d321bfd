use spi_model::{Condition, Error as ModelError};
use std::fmt::{Display, Formatter};

/// When a provider operation fails, it states whether the host may try again.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Recovery {
    /// The failure is temporary (throttling, a timeout, an eventually consistent read). The same
    /// call may succeed later.
    Transient,

    /// Trying again will fail the same way, e.g. invalid configuration or missing permissions.
    /// - The host should surface the error to a user instead of retrying.
    Unrecoverable,

    /// The provider cannot tell which of the above applies.
    Unknown,
}

impl Recovery {
    pub fn message(&self) -> &'static str {
        match self {
            Recovery::Transient => "A transient provider error occurred",
            Recovery::Unrecoverable => "An unrecoverable provider error occurred",
            Recovery::Unknown => "A provider error occurred",
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, Recovery::Unrecoverable)
    }
}

impl Display for Recovery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self.message(), f)
    }
}

/// A trait that you can implement for your own types to describe whether a failure involving them
/// can be retried.
///
/// # Example
///
/// ```
/// use spi_provider::provider::{AsRecovery, Recovery};
///
/// struct ApiResponse {
///     status: u16,
/// }
///
/// impl AsRecovery for ApiResponse {
///     fn as_recovery(&self) -> Recovery {
///         match self.status {
///             429 | 503 => Recovery::Transient,
///             400..=499 => Recovery::Unrecoverable,
///             _ => Recovery::Unknown,
///         }
///     }
/// }
/// ```
///
pub trait AsRecovery {
    fn as_recovery(&self) -> Recovery;
}

impl AsRecovery for Recovery {
    fn as_recovery(&self) -> Recovery {
        *self
    }
}

impl AsRecovery for &Recovery {
    fn as_recovery(&self) -> Recovery {
        **self
    }
}

/// The error type returned by provider operations.
#[derive(Debug)]
pub struct ProviderError {
    /// Whether the operation may be retried.
    recovery: Recovery,

    /// Any message to be included with the error. This will be included in the formatted display
    /// before `inner`.
    context: Option<String>,

    /// The validation conditions that caused this error, if it is a validation failure.
    conditions: Vec<Condition>,

    /// The error that caused this error.
    inner: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

/// The result type returned by provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

impl ProviderError {
    pub fn new_with_source_and_context<R, S, E>(recovery: R, context: S, source: E) -> Self
    where
        R: AsRecovery,
        S: Into<String>,
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            recovery: recovery.as_recovery(),
            context: Some(context.into()),
            conditions: Vec::new(),
            inner: Some(source.into()),
        }
    }

    pub fn new_with_source<R, E>(recovery: R, source: E) -> Self
    where
        R: AsRecovery,
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            recovery: recovery.as_recovery(),
            context: None,
            conditions: Vec::new(),
            inner: Some(source.into()),
        }
    }

    pub fn new_with_context<R, S>(recovery: R, context: S) -> Self
    where
        R: AsRecovery,
        S: Into<String>,
    {
        Self {
            recovery: recovery.as_recovery(),
            context: Some(context.into()),
            conditions: Vec::new(),
            inner: None,
        }
    }

    /// An unrecoverable validation failure carrying the conditions that caused it.
    pub fn invalid<S>(context: S, conditions: Vec<Condition>) -> Self
    where
        S: Into<String>,
    {
        Self {
            recovery: Recovery::Unrecoverable,
            context: Some(context.into()),
            conditions,
            inner: None,
        }
    }

    pub fn recovery(&self) -> Recovery {
        self.recovery
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn inner(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.inner.as_ref().map(|some| some.as_ref())
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.recovery())?;
        if let Some(context) = self.context() {
            write!(f, ", {}", context)?;
        }
        for condition in &self.conditions {
            write!(f, "\n  {}", condition)?;
        }
        if let Some(inner) = self.inner() {
            write!(f, ": {}", inner)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// Model errors are mistakes in a provider's declarations or a host's input; retrying never helps.
// Invalid configurations keep their conditions so the host can show them per property.
impl From<ModelError> for ProviderError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::InvalidConfiguration { conditions } => {
                Self::invalid("Invalid configuration", conditions)
            }
            other => Self::new_with_source(Recovery::Unrecoverable, other),
        }
    }
}

/// A trait that makes it possible to convert error types to `ProviderError` using a familiar
/// `context` function.
pub trait IntoProviderError<T> {
    /// Convert `self` into a `ProviderError`.
    fn context<R, S>(self, recovery: R, message: S) -> ProviderResult<T>
    where
        S: Into<String>,
        R: AsRecovery;
}

// Implement `IntoProviderError` for all standard `Error + Send + Sync + 'static` types.
impl<T, E> IntoProviderError<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<R, S>(self, recovery: R, message: S) -> ProviderResult<T>
    where
        S: Into<String>,
        R: AsRecovery,
    {
        self.map_err(|e| ProviderError::new_with_source_and_context(recovery, message, e))
    }
}

// Implement `IntoProviderError` for options where `None` is converted into an error.
impl<T> IntoProviderError<T> for std::option::Option<T> {
    fn context<R, S>(self, r: R, m: S) -> ProviderResult<T>
    where
        S: Into<String>,
        R: AsRecovery,
    {
        self.ok_or_else(|| ProviderError::new_with_context(r, m))
    }
}
