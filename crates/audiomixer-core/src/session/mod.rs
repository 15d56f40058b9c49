//! Session daemon endpoint and transport errors
//!
//! The media session daemon listens on a Unix domain socket under the
//! user's runtime directory. The socket path is resolved from the
//! environment on every call; an unset `XDG_RUNTIME_DIR` is an error,
//! not a fallback.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

mod transport;

pub use transport::exchange;

/// Fixed service name of the session daemon socket
pub const SERVICE_NAME: &str = "pipewire-media-session";

/// `sockaddr_un` path capacity, including the nul terminator
pub const MAX_SOCKET_PATH: usize = 108;

/// Upper bound for an outgoing command, in bytes
pub const MAX_COMMAND_LEN: usize = 100;

/// Upper bound for a daemon reply, in bytes
pub const MAX_REPLY_LEN: usize = 10;

/// Transport error types, one per failure point of an exchange
#[derive(Debug, Error)]
pub enum TransportError {
    /// XDG_RUNTIME_DIR is missing from the process environment
    #[error("XDG_RUNTIME_DIR not set in the environment")]
    RuntimeDirUnset,

    /// The endpoint path does not fit in `sockaddr_un`
    #[error("socket path {} plus nul terminator exceeds 108 bytes", .path.display())]
    AddressTooLong { path: PathBuf },

    /// The command is empty
    #[error("empty command")]
    EmptyCommand,

    /// The command does not fit the daemon's command buffer
    #[error("command is {len} bytes, limit is 100")]
    CommandTooLong { len: usize },

    /// Socket allocation or setup failed
    #[error("failed to create socket: {0}")]
    Socket(#[source] io::Error),

    /// The daemon is not reachable at the endpoint
    #[error("failed to connect to {}: {source}", .path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the command failed
    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    /// The write call succeeded but consumed no bytes
    #[error("nothing was written")]
    NothingWritten,

    /// Reading the reply failed
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    /// The daemon closed the connection before sending any reply byte
    #[error("connection closed before any reply")]
    UnexpectedEof,

    /// The reply was not valid UTF-8
    #[error("reply is not valid UTF-8")]
    InvalidReply,
}

/// Resolve the user's runtime directory from the environment
pub fn runtime_dir() -> Result<PathBuf, TransportError> {
    std::env::var_os("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .ok_or(TransportError::RuntimeDirUnset)
}

/// Resolve the session daemon socket path.
///
/// The `sockaddr_un` capacity is checked here, before any socket is
/// created, rather than surfacing later as a connect failure.
pub fn socket_path() -> Result<PathBuf, TransportError> {
    let path = runtime_dir()?.join(SERVICE_NAME);
    if path.as_os_str().len() + 1 > MAX_SOCKET_PATH {
        return Err(TransportError::AddressTooLong { path });
    }
    Ok(path)
}
