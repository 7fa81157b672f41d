//! Active-credential state and lazy connection materialization
//!
//! State is `{credentials, active_index, active_handle}`. The handle, when
//! present, was built from `credentials[active_index]`. The index only moves
//! forward: once it runs past the last credential the rotor stays exhausted
//! for the rest of the run.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, info, warn};

use crate::credential::CredentialSet;
use crate::error::{Error, Result};

/// Boxed future returned by `Connector::connect`.
pub type ConnectFuture<'a, H> = Pin<Box<dyn Future<Output = Result<H>> + Send + 'a>>;

/// Builds an authorized client handle for one credential set.
///
/// Failures must be reported as `Error::Authorization`; they are fatal and
/// never cause rotation.
pub trait Connector {
    /// Cheap-to-clone handle, bound to exactly one credential set.
    type Handle: Clone;

    fn connect<'a>(&'a self, credential: &'a CredentialSet) -> ConnectFuture<'a, Self::Handle>;
}

/// Ordered credential list with one lazily connected active entry.
pub struct Rotor<C: Connector> {
    connector: C,
    credentials: Vec<CredentialSet>,
    active_index: usize,
    active_handle: Option<C::Handle>,
}

impl<C: Connector> Rotor<C> {
    /// Create a rotor positioned on the first credential, not yet connected.
    pub fn new(connector: C, credentials: Vec<CredentialSet>) -> Result<Self> {
        if credentials.is_empty() {
            return Err(Error::NoCredentials);
        }
        info!(credentials = credentials.len(), "credential rotor initialized");
        Ok(Self {
            connector,
            credentials,
            active_index: 0,
            active_handle: None,
        })
    }

    /// Handle for the active credential, connecting on first use.
    pub async fn current(&mut self) -> Result<C::Handle> {
        if let Some(handle) = &self.active_handle {
            return Ok(handle.clone());
        }

        let credential = self
            .credentials
            .get(self.active_index)
            .ok_or(Error::Exhausted {
                configured: self.credentials.len(),
            })?;

        debug!(
            credential = credential.name(),
            index = self.active_index,
            "materializing client handle"
        );
        let handle = self.connector.connect(credential).await?;
        info!(
            credential = credential.name(),
            index = self.active_index,
            "credential authorized"
        );
        self.active_handle = Some(handle.clone());
        Ok(handle)
    }

    /// Move to the next credential and drop the cached handle.
    ///
    /// Fails with `Exhausted` when no credential is left; the rotor then
    /// stays exhausted.
    pub fn advance(&mut self) -> Result<()> {
        self.active_handle = None;
        let configured = self.credentials.len();

        if self.active_index + 1 >= configured {
            self.active_index = configured;
            warn!(configured, "no more API credentials left");
            return Err(Error::Exhausted { configured });
        }

        self.active_index += 1;
        info!(
            credential = self.credentials[self.active_index].name(),
            index = self.active_index,
            "rotated to next credential"
        );
        Ok(())
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// The active credential, `None` once exhausted.
    pub fn active_credential(&self) -> Option<&CredentialSet> {
        self.credentials.get(self.active_index)
    }

    /// Credentials not yet rotated away from, the active one included.
    pub fn remaining(&self) -> usize {
        self.credentials.len().saturating_sub(self.active_index)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn is_connected(&self) -> bool {
        self.active_handle.is_some()
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }
}
