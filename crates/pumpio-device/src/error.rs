//! Error taxonomy for transports, poll cycles and sessions.
//!
//! Transport bindings map their native error codes (libusb codes, errno)
//! onto this one enum at the point where they surface, so everything above
//! the transport layer reasons about a single taxonomy. Nothing in this
//! crate retries; retry and pacing policy belongs to the caller, and the
//! [`is_retryable`](DeviceError::is_retryable) predicate is advisory only.

use core::fmt;

use pumpio_packet::PacketError;

/// Errors surfaced by device discovery, transfers and sessions.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DeviceError {
    /// No matching device on the bus or at the device node
    #[error("device not found: {0}")]
    NotFound(String),

    /// Device present but held by another owner
    #[error("device {0} is busy")]
    Busy(String),

    /// Opening the device or claiming its interface was refused
    #[error("permission denied for device: {0}")]
    PermissionDenied(String),

    /// A transfer did not complete within its bounded timeout
    #[error("device {device} timeout after {timeout_ms}ms")]
    Timeout {
        /// Device identifier
        device: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// A transfer moved the wrong number of bytes. Partial packets cannot
    /// be decoded, so a short transfer is always an error.
    #[error("short transfer on device {device}: expected {expected} bytes, moved {actual}")]
    ShortTransfer {
        /// Device identifier
        device: String,
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        actual: usize,
    },

    /// The device was unplugged while a session was open
    #[error("device gone: {0}")]
    Gone(String),

    /// Wire buffer had the wrong length for the packet codec
    #[error(transparent)]
    Packet(#[from] PacketError),

    /// The host or the USB library ran out of a resource
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Operation not supported by this board or backend
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Any other transfer-level failure
    #[error("transfer failed on device {device}: {message}")]
    Transfer {
        /// Device identifier
        device: String,
        /// Error message
        message: String,
    },
}

/// Result alias used throughout the device crate.
pub type DeviceResult<T> = Result<T, DeviceError>;

impl DeviceError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DeviceError::NotFound(_) => ErrorSeverity::Error,
            DeviceError::Busy(_) => ErrorSeverity::Warning,
            DeviceError::PermissionDenied(_) => ErrorSeverity::Error,
            DeviceError::Timeout { .. } => ErrorSeverity::Warning,
            DeviceError::ShortTransfer { .. } => ErrorSeverity::Error,
            DeviceError::Gone(_) => ErrorSeverity::Critical,
            DeviceError::Packet(_) => ErrorSeverity::Error,
            DeviceError::ResourceExhausted(_) => ErrorSeverity::Error,
            DeviceError::Unsupported(_) => ErrorSeverity::Info,
            DeviceError::Transfer { .. } => ErrorSeverity::Error,
        }
    }

    /// Check if this error means the device cannot be reached at all, as
    /// opposed to a transfer that merely failed.
    pub fn is_device_unavailable(&self) -> bool {
        matches!(
            self,
            DeviceError::NotFound(_) | DeviceError::Gone(_) | DeviceError::PermissionDenied(_)
        )
    }

    /// Check if retrying the same call might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DeviceError::Timeout { .. } | DeviceError::Busy(_))
    }

    /// Create a not found error.
    pub fn not_found(device: impl Into<String>) -> Self {
        DeviceError::NotFound(device.into())
    }

    /// Create a busy error.
    pub fn busy(device: impl Into<String>) -> Self {
        DeviceError::Busy(device.into())
    }

    /// Create a gone error.
    pub fn gone(device: impl Into<String>) -> Self {
        DeviceError::Gone(device.into())
    }

    /// Create a timeout error.
    pub fn timeout(device: impl Into<String>, timeout_ms: u64) -> Self {
        DeviceError::Timeout {
            device: device.into(),
            timeout_ms,
        }
    }

    /// Create a short transfer error.
    pub fn short_transfer(device: impl Into<String>, expected: usize, actual: usize) -> Self {
        DeviceError::ShortTransfer {
            device: device.into(),
            expected,
            actual,
        }
    }

    /// Create an unsupported operation error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        DeviceError::Unsupported(message.into())
    }

    /// Create a transfer error with a native error message.
    pub fn transfer(device: impl Into<String>, message: impl Into<String>) -> Self {
        DeviceError::Transfer {
            device: device.into(),
            message: message.into(),
        }
    }
}

/// Severity levels for device errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, may require attention
    Warning = 1,
    /// Error, operation failed
    Error = 2,
    /// Critical, the device is no longer usable
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
