//! Result type aliases for the Lumen authorization engine.

use crate::LumenError;

/// A specialized `Result` type for Lumen operations.
pub type LumenResult<T> = Result<T, LumenError>;

/// A boxed future returning a `LumenResult`.
pub type BoxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = LumenResult<T>> + Send + 'a>>;
