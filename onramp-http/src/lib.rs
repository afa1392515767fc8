//! HTTP transport for the on-ramp purchase URL signing service.
//!
//! Provides [`signer::HttpUrlSigner`], a `reqwest`-backed implementation of
//! [`onramp::signing::UrlSigner`] targeting the wallet's remote
//! moonpay-sign endpoint.
//!
//! # Modules
//!
//! - [`constants`] — default signing origin and endpoint path
//! - [`signer`] — the HTTP URL signer and its configuration

pub mod constants;
pub mod signer;

pub use signer::{HttpUrlSigner, SignerConfig};
