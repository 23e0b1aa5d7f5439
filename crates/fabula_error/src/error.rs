//! Top-level error wrapper types.

use crate::{
    BuilderError, GenerationError, GenerationErrorKind, JsonError, ProviderError, StoreError,
};

/// This is the foundation error enum. Each fabula crate contributes the
/// variant covering its own failure domain.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaError, JsonError};
///
/// let json_err = JsonError::new("trailing characters");
/// let err: FabulaError = json_err.into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FabulaErrorKind {
    /// Outline store error
    #[from(StoreError)]
    Store(StoreError),
    /// Outline generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Model provider error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Fabula error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaResult, StoreError, StoreErrorKind};
///
/// fn might_fail() -> FabulaResult<()> {
///     Err(StoreError::new(StoreErrorKind::NotFound))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fabula Error: {}", _0)]
pub struct FabulaError(Box<FabulaErrorKind>);

impl FabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: FabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FabulaErrorKind {
        &self.0
    }

    /// HTTP-style status code carried on client-facing error events.
    ///
    /// Missing records map to 404 and continuation preconditions to 400.
    /// Every other failure is reported without a code.
    pub fn status_code(&self) -> Option<u16> {
        match self.kind() {
            FabulaErrorKind::Store(e) if e.kind.is_not_found() => Some(404),
            FabulaErrorKind::Generation(e) if e.kind == GenerationErrorKind::EmptyOutline => {
                Some(400)
            }
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to FabulaErrorKind
impl<T> From<T> for FabulaError
where
    T: Into<FabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fabula operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaResult, ProviderError, ProviderErrorKind};
///
/// fn call_provider() -> FabulaResult<String> {
///     Err(ProviderError::new(ProviderErrorKind::RateLimit))?
/// }
/// ```
pub type FabulaResult<T> = std::result::Result<T, FabulaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProviderErrorKind, StoreErrorKind};
    use uuid::Uuid;

    #[test]
    fn not_found_maps_to_404() {
        let id = Uuid::new_v4();
        let err = FabulaError::from(StoreError::new(StoreErrorKind::ProjectNotFound(id)));
        assert_eq!(err.status_code(), Some(404));

        let err = FabulaError::from(StoreError::new(StoreErrorKind::OutlineNotFound(id)));
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn empty_outline_maps_to_400() {
        let err = FabulaError::from(GenerationError::new(GenerationErrorKind::EmptyOutline));
        assert_eq!(err.status_code(), Some(400));
    }

    #[test]
    fn other_failures_carry_no_code() {
        let err = FabulaError::from(StoreError::new(StoreErrorKind::Query(
            "deadlock detected".to_string(),
        )));
        assert_eq!(err.status_code(), None);

        let err = FabulaError::from(ProviderError::new(ProviderErrorKind::RateLimit));
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn display_nests_kind_and_location() {
        let err = FabulaError::from(JsonError::new("bad payload"));
        let rendered = format!("{}", err);
        assert!(rendered.starts_with("Fabula Error: JSON Error: bad payload"));
        assert!(rendered.contains("error.rs"));
    }
}
