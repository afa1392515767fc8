//! Fiat on-ramp purchase link resolution for wallets.
//!
//! Given the wallet's currently selected chain, this crate resolves which
//! buy-crypto providers support it, gathers the wallet addresses each
//! provider needs across its supported chains, and assembles a
//! ready-to-open purchase URL per provider. Moonpay links additionally
//! require an asynchronous remote-signing round trip, coordinated by a
//! versioned state machine with last-input-wins semantics.
//!
//! The wallet's account and chain registries are consumed through the
//! [`chain::AccountResolver`] / [`chain::ChainResolver`] traits, so the
//! whole resolution core is testable with in-memory fakes. The remote
//! signing transport lives behind [`signing::UrlSigner`]; the HTTP
//! implementation is provided by the `onramp-http` crate.
//!
//! # Modules
//!
//! - [`chain`] - Chain/account snapshots and the injected resolver traits
//! - [`provider`] - Provider descriptors and the ordered catalog
//! - [`params`] - Provider-specific URL parameter building
//! - [`url`] - Deterministic query-string assembly
//! - [`resolve`] - Catalog-wide resolution and final result assembly
//! - [`signing`] - The signing state machine and coordinator
//! - [`error`] - Signing error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use onramp::resolve::{assemble_resolution, moonpay_unsigned_url, resolve_providers};
//! use onramp::signing::SigningCoordinator;
//!
//! let coordinator = SigningCoordinator::new(signer);
//! let resolved = resolve_providers(&catalog, &accounts, &chains);
//! coordinator.update(moonpay_unsigned_url(&resolved));
//! let resolution = assemble_resolution(resolved, &coordinator.snapshot());
//! ```

pub mod chain;
pub mod error;
pub mod params;
pub mod provider;
pub mod resolve;
pub mod signing;
pub mod url;
