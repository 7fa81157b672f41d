//! OAuth material that must never reach logs
//!
//! Client secrets from the downloaded client-secret files and the access
//! tokens handed to API clients both travel through structs that derive
//! `Debug` and get logged with `tracing`. Wrapping them keeps `{:?}` and `{}`
//! output at `[REDACTED]`, and every copy is zeroed when dropped.

use std::fmt;
use zeroize::Zeroize;

/// A client secret or bearer token.
pub struct Secret<T: Zeroize>(T);

impl<T: Zeroize> Secret<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Raw value, for building an `Authorization` header or a token form.
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl From<String> for Secret<String> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T: Zeroize> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<T: Zeroize> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<T: Zeroize> Drop for Secret<T> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Each clone owns and wipes its own buffer.
impl<T: Zeroize + Clone> Clone for Secret<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
