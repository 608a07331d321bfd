use std::fmt::{Display, Formatter};

/// This struct can serve as an `Error` type when you want to provide an error message, but have no
/// underlying error type. It allows a string to serve as the source of a [`ProviderError`], which
/// is handy in provider implementations that talk to APIs whose errors are plain strings, and in
/// mock providers.
///
/// # Example
///
/// ```
/// # use spi_provider::error::ErrorMessage;
/// # use spi_provider::provider::{ProviderError, Recovery};
/// let error = ProviderError::new_with_source(Recovery::Transient, ErrorMessage::from("busy"));
/// assert!(error.to_string().ends_with(": busy"));
/// ```
///
/// [`ProviderError`]: crate::provider::ProviderError
#[derive(Debug)]
pub struct ErrorMessage {
    message: String,
}

impl Display for ErrorMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.message, f)
    }
}

impl<S: Into<String>> From<S> for ErrorMessage {
    fn from(s: S) -> Self {
        Self { message: s.into() }
    }
}

impl std::error::Error for ErrorMessage {}
