//! Google OAuth constants
//!
//! Endpoint defaults used when a client-secret file omits them. Client ids and
//! secrets always come from the file.

/// Authorization endpoint for installed applications
pub const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// Token endpoint for code exchange and token refresh
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Full read/write access to the user's YouTube account. Updating playlist
/// item notes is not covered by the read-only scope.
pub const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube";

/// Key under which tokens are cached inside a credential's profile directory.
pub const DEFAULT_USER: &str = "user";

/// File name of the token cache inside a credential's profile directory.
pub const TOKEN_CACHE_FILE: &str = "tokens.json";

/// Cached tokens expiring within this window are refreshed before use.
pub const REFRESH_MARGIN_MS: u64 = 60_000;
