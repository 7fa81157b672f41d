//! Scripted connector shared by the rotor and invoker tests

use std::path::Path;
use std::sync::Mutex;

use crate::credential::CredentialSet;
use crate::error::Error;
use crate::rotor::{ConnectFuture, Connector};

/// Connector whose handle is the credential's name. Records every connect.
#[derive(Default)]
pub struct FakeConnector {
    pub connects: Mutex<Vec<String>>,
    /// Credential name whose authorization fails.
    pub deny: Option<String>,
}

impl FakeConnector {
    pub fn connects(&self) -> Vec<String> {
        self.connects.lock().unwrap().clone()
    }
}

impl Connector for FakeConnector {
    type Handle = String;

    fn connect<'a>(&'a self, credential: &'a CredentialSet) -> ConnectFuture<'a, String> {
        Box::pin(async move {
            self.connects
                .lock()
                .unwrap()
                .push(credential.name().to_string());
            if self.deny.as_deref() == Some(credential.name()) {
                return Err(Error::Authorization {
                    credential: credential.name().to_string(),
                    reason: "user denied consent".into(),
                });
            }
            Ok(credential.name().to_string())
        })
    }
}

/// `count` credentials named `c0.json`, `c1.json`, ...
pub fn credentials(count: usize) -> Vec<CredentialSet> {
    (0..count)
        .map(|i| CredentialSet::new(format!("c{i}.json"), Path::new("/profile")))
        .collect()
}

pub fn quota_error() -> youtube_api::Error {
    youtube_api::ApiError::new(
        403,
        "youtube.quota",
        "quotaExceeded",
        "The request cannot be completed because you have exceeded your quota.",
    )
    .into()
}
