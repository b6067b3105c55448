use thiserror::Error;

/// Errors surfaced by the driver.
///
/// Every reading or configuration call is fallible; output values are only
/// meaningful when the result is `Ok`. The driver performs no internal
/// retries, so a caller wanting resilience retries the whole operation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No complete frame arrived within the receive deadline.
    #[error("no complete frame within the receive deadline")]
    Timeout,
    /// A full frame arrived but its checksum byte did not match.
    #[error("frame checksum mismatch")]
    Crc,
    /// The driver is not initialized, or a caller-supplied parameter is
    /// outside the accepted domain (e.g. an unsupported range value).
    #[error("invalid request or response")]
    InvalidResponse,
    /// The serial port failed, or a write transferred fewer bytes than a
    /// full frame.
    #[error("serial transport failure")]
    Transport,
}
