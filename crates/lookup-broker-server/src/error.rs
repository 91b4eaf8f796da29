//! Server errors.

use thiserror::Error;

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured listen address is not a socket address.
    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        /// Configured address.
        addr: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },

    /// The listener could not be bound.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// Address the server tried to bind.
        addr: std::net::SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure of the listener.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_address_display() {
        let source = "nope".parse::<std::net::SocketAddr>().unwrap_err();
        let err = ServerError::InvalidAddress {
            addr: "nope".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid listen address 'nope'"));
    }

    #[test]
    fn test_io_from() {
        let err: ServerError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert_eq!(err.to_string(), "I/O error: boom");
    }
}
