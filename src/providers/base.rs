//! Base provider trait for the AI collaborator
//!
//! The chat service and the career flows only ever need "text in, text
//! out, may fail". Concrete providers translate that into their own wire
//! format.

use async_trait::async_trait;

use crate::error::Result;

/// An AI backend that answers a single prompt
///
/// Implementations must map every transport or protocol failure to
/// [`CareerError::Provider`](crate::error::CareerError::Provider) so callers
/// can tell a failed reply apart from a storage or input error.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use careerchat::error::Result;
/// use careerchat::providers::Provider;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Provider for Echo {
///     fn name(&self) -> &'static str {
///         "echo"
///     }
///
///     async fn respond(&self, prompt: &str) -> Result<String> {
///         Ok(prompt.to_string())
///     }
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Returns the model's reply to `prompt`
    async fn respond(&self, prompt: &str) -> Result<String>;
}
