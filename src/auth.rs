//! Bearer credentials: redacted secrets, expiry arithmetic, and token endpoint payloads.

pub mod expiry;
pub mod grant;
pub mod secret;

pub use expiry::*;
pub use grant::*;
pub use secret::*;
