//! Google OAuth for installed applications
//!
//! Turns a downloaded client-secret file into a usable access token, reusing
//! a locally persisted token cache so repeated runs skip interactive consent.
//!
//! Authorization flow:
//! 1. `ClientSecrets::load()` reads the client-secret JSON
//! 2. `TokenCache::load()` opens `<profile-dir>/<credential-name>/tokens.json`
//! 3. `authorize()` reuses a fresh cached token, or refreshes an expiring one
//! 4. Otherwise `consent::request_consent()` runs the loopback PKCE flow and
//!    `token::exchange_code()` trades the code for tokens
//! 5. New tokens are persisted via `TokenCache::put()`

pub mod authorize;
pub mod cache;
pub mod consent;
pub mod constants;
pub mod error;
pub mod pkce;
pub mod secrets;
pub mod token;

pub use authorize::{AccessToken, AuthorizeOptions, authorize};
pub use cache::{StoredToken, TokenCache};
pub use constants::*;
pub use error::{Error, Result};
pub use secrets::ClientSecrets;
pub use token::{TokenResponse, exchange_code, refresh_token};
