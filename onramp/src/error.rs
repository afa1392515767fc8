//! Error types for the signing path.
//!
//! The synchronous resolution path never fails — unsupported chains,
//! missing addresses, and unknown provider ids all degrade to absent
//! fields. Errors exist only where the network does: the remote URL
//! signing round trip.

/// Failure of a remote URL signing call.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// The request could not be sent or the response could not be read.
    #[error("signing request transport failure: {0}")]
    Transport(String),

    /// The signing service answered with a non-success status.
    #[error("signing service returned status {0}")]
    Status(u16),

    /// The signing service answered with an empty body.
    #[error("signing service returned an empty signed URL")]
    EmptyResponse,
}
