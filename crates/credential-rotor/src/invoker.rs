//! Replay of logical operations across credential rotations
//!
//! An operation is a closure from a client handle to a future. On quota
//! exhaustion the whole closure is run again against the next credential, so
//! whatever it captured (a page cursor, an update payload) is re-issued as is.

use std::future::Future;

use tracing::warn;
use youtube_api::ErrorClassification;

use crate::error::{Error, Result};
use crate::quota::classify;
use crate::rotor::{Connector, Rotor};

/// Runs operations against the rotor's active credential.
pub struct Invoker<C: Connector> {
    rotor: Rotor<C>,
    rotations: usize,
}

impl<C: Connector> Invoker<C> {
    pub fn new(rotor: Rotor<C>) -> Self {
        Self {
            rotor,
            rotations: 0,
        }
    }

    pub fn rotor(&self) -> &Rotor<C> {
        &self.rotor
    }

    /// Rotations performed so far in this run.
    pub fn rotations(&self) -> usize {
        self.rotations
    }

    /// Run `operation`, rotating and replaying it on quota exhaustion.
    ///
    /// Non-quota API errors come back as `Error::Api` untouched. Rotor
    /// exhaustion and authorization failures end the invocation.
    pub async fn invoke<T, F, Fut>(&mut self, mut operation: F) -> Result<T>
    where
        F: FnMut(C::Handle) -> Fut,
        Fut: Future<Output = youtube_api::Result<T>>,
    {
        // Every failed pass consumes one credential.
        for _ in 0..self.rotor.remaining() {
            let handle = self.rotor.current().await?;
            match operation(handle).await {
                Ok(value) => return Ok(value),
                Err(error) if classify(&error) == ErrorClassification::QuotaExceeded => {
                    let credential = self
                        .rotor
                        .active_credential()
                        .map(|c| c.name().to_string())
                        .unwrap_or_default();
                    warn!(
                        %credential,
                        %error,
                        "request quota has been met, trying another API credential"
                    );
                    self.rotor.advance()?;
                    self.rotations += 1;
                }
                Err(error) => return Err(Error::Api(error)),
            }
        }

        Err(Error::Exhausted {
            configured: self.rotor.len(),
        })
    }
}
