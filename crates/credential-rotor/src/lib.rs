//! Credential rotation for quota-limited API access
//!
//! Holds an ordered list of credential sets and switches to the next one when
//! the active credential reports quota exhaustion, replaying the interrupted
//! logical operation under the new credential. Connections are materialized
//! lazily, so credentials that are never needed never pay for authorization.
//!
//! Lifecycle:
//! 1. `Rotor::new()` with the configured credentials, index 0, no handle
//! 2. `Rotor::current()` connects credential 0 on first use and caches it
//! 3. An operation run through `Invoker::invoke()` fails with a quota error
//! 4. `Rotor::advance()` moves to the next credential and drops the handle
//! 5. The operation is replayed; past the last credential the run is over

pub mod credential;
pub mod error;
pub mod invoker;
pub mod quota;
pub mod rotor;

#[cfg(test)]
mod test_support;

pub use credential::CredentialSet;
pub use error::{Error, Result};
pub use invoker::Invoker;
pub use quota::{QUOTA_DOMAINS, classify};
pub use rotor::{ConnectFuture, Connector, Rotor};
