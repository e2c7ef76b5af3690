/*
[INPUT]:  HTTP client configuration and Keymaster API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod assets;
pub mod client;
pub mod credentials;
pub mod dmail;
pub mod error;
pub mod groups;
pub mod identity;
pub mod keys;
pub mod polls;
pub mod ready;
pub mod vaults;
pub mod wallet;

pub use error::{KeymasterError, Result};

pub use client::{ClientConfig, DEFAULT_BASE_URL, KEYMASTER_URL_ENV, KeymasterClient, OPTIONS_HEADER};
