//! HTTP constants for the signing service.

/// Default signing service origin.
pub const DEFAULT_SIGNING_ORIGIN: &str = "https://wallet.keplr.app";

/// Path of the moonpay URL signing endpoint.
pub const MOONPAY_SIGN_PATH: &str = "/api/moonpay-sign";
