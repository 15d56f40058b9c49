//! Command/reply transport to the session daemon
//!
//! One exchange per connection: connect, send the command in a single
//! logical write, read a single reply chunk, close. The protocol has no
//! framing; the daemon writes its whole reply in one operation and the
//! client reads it in one operation.

use std::io::{self, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

use super::{socket_path, TransportError, MAX_COMMAND_LEN, MAX_REPLY_LEN};

/// Read/write timeout for a single exchange.
///
/// The daemon protocol itself has no deadline; this bounds a call against
/// a wedged daemon instead of blocking forever.
const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Send one command to the session daemon and return its reply.
///
/// Every call opens a fresh connection; the stream closes when it drops,
/// on success and on every failure path alike. A failed exchange is never
/// retried here; callers retry by calling again, which reconnects.
pub fn exchange(command: &str) -> Result<String, TransportError> {
    if command.is_empty() {
        return Err(TransportError::EmptyCommand);
    }
    if command.len() > MAX_COMMAND_LEN {
        return Err(TransportError::CommandTooLong {
            len: command.len(),
        });
    }

    let path = socket_path()?;
    tracing::debug!(command, path = %path.display(), "session exchange");

    let mut stream = match UnixStream::connect(&path) {
        Ok(stream) => stream,
        Err(e) => return Err(classify_connect(path, e)),
    };
    stream
        .set_write_timeout(Some(IO_TIMEOUT))
        .map_err(TransportError::Socket)?;
    stream
        .set_read_timeout(Some(IO_TIMEOUT))
        .map_err(TransportError::Socket)?;

    write_command(&mut stream, command)?;
    let reply = read_reply(&mut stream)?;

    tracing::debug!(reply, "session reply");
    Ok(reply)
}

/// Split a connect failure into "endpoint not usable" vs "socket broken".
///
/// `UnixStream::connect` covers both socket allocation and the connect
/// itself, so the distinction comes from the error kind.
fn classify_connect(path: PathBuf, err: io::Error) -> TransportError {
    match err.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::NotFound
        | io::ErrorKind::AddrNotAvailable
        | io::ErrorKind::PermissionDenied => TransportError::Connect { path, source: err },
        _ => TransportError::Socket(err),
    }
}

/// Write the whole command, retrying only on interruption.
///
/// A write that succeeds with zero bytes consumed is an error; with a
/// timeout set, `WouldBlock` means the deadline expired and is fatal.
fn write_command(stream: &mut UnixStream, command: &str) -> Result<(), TransportError> {
    let bytes = command.as_bytes();
    let mut written = 0;
    while written < bytes.len() {
        match stream.write(&bytes[written..]) {
            Ok(0) => return Err(TransportError::NothingWritten),
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(TransportError::Write(e)),
        }
    }
    Ok(())
}

/// Read one reply chunk, retrying only on interruption.
///
/// A zero-byte read means the daemon closed the connection without
/// answering. The reply is bounded by the daemon's own reply buffer; a
/// single read into it captures everything the protocol can carry.
fn read_reply(stream: &mut UnixStream) -> Result<String, TransportError> {
    let mut buf = [0u8; MAX_REPLY_LEN];
    let n = loop {
        match stream.read(&mut buf) {
            Ok(0) => return Err(TransportError::UnexpectedEof),
            Ok(n) => break n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(TransportError::Read(e)),
        }
    };
    let reply = std::str::from_utf8(&buf[..n]).map_err(|_| TransportError::InvalidReply)?;
    Ok(reply.to_string())
}

#[cfg(test)]
mod tests {
    use std::net::Shutdown;
    use std::os::unix::net::UnixListener;
    use std::path::Path;
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::super::SERVICE_NAME;
    use super::*;

    /// Bind the daemon socket in `dir` and serve one connection: read a
    /// single command, write `reply` if given, then wait for the client
    /// side to close. Returns the received command bytes on join.
    fn spawn_daemon(dir: &Path, reply: Option<&'static str>) -> thread::JoinHandle<Vec<u8>> {
        let listener = UnixListener::bind(dir.join(SERVICE_NAME)).unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 256];
            let n = stream.read(&mut buf).unwrap();
            if let Some(reply) = reply {
                stream.write_all(reply.as_bytes()).unwrap();
            }
            stream.shutdown(Shutdown::Write).unwrap();
            // The client holds no connection across calls; its end must
            // close no matter how the exchange ended
            let mut rest = [0u8; 16];
            assert_eq!(stream.read(&mut rest).unwrap(), 0);
            buf[..n].to_vec()
        })
    }

    #[test]
    fn test_exchange_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let daemon = spawn_daemon(dir.path(), Some("42"));
        let reply = temp_env::with_var("XDG_RUNTIME_DIR", Some(dir.path()), || {
            exchange("volume default 42")
        })
        .unwrap();
        assert_eq!(reply, "42");
        assert_eq!(daemon.join().unwrap(), b"volume default 42");
    }

    #[test]
    fn test_exchange_eof_before_reply() {
        let dir = tempfile::tempdir().unwrap();
        let daemon = spawn_daemon(dir.path(), None);
        let err = temp_env::with_var("XDG_RUNTIME_DIR", Some(dir.path()), || {
            exchange("volume default -1")
        })
        .unwrap_err();
        assert!(matches!(err, TransportError::UnexpectedEof));
        daemon.join().unwrap();
    }

    #[test]
    fn test_exchange_connect_refused() {
        // No daemon bound in the runtime dir
        let dir = tempfile::tempdir().unwrap();
        let err = temp_env::with_var("XDG_RUNTIME_DIR", Some(dir.path()), || {
            exchange("mute default -1")
        })
        .unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
    }

    #[test]
    fn test_exchange_runtime_dir_unset() {
        let err = temp_env::with_var_unset("XDG_RUNTIME_DIR", || exchange("mute default -1"))
            .unwrap_err();
        assert!(matches!(err, TransportError::RuntimeDirUnset));
    }

    #[test]
    fn test_exchange_rejects_empty_command() {
        let err = temp_env::with_var_unset("XDG_RUNTIME_DIR", || exchange("")).unwrap_err();
        assert!(matches!(err, TransportError::EmptyCommand));
    }

    #[test]
    fn test_exchange_rejects_oversized_command() {
        // Bounds are checked before the environment is even consulted
        let command = format!("volume {} 42", "r".repeat(200));
        let err = temp_env::with_var_unset("XDG_RUNTIME_DIR", || exchange(&command)).unwrap_err();
        assert!(matches!(
            err,
            TransportError::CommandTooLong { len } if len == command.len()
        ));
    }

    #[test]
    fn test_exchange_reply_bounded_by_buffer() {
        // A reply longer than the reply buffer is cut off by the single
        // read, exactly as the fixed-size buffer did in the daemon protocol
        let dir = tempfile::tempdir().unwrap();
        let daemon = spawn_daemon(dir.path(), Some("12345678901234"));
        let reply = temp_env::with_var("XDG_RUNTIME_DIR", Some(dir.path()), || {
            exchange("volume default -1")
        })
        .unwrap();
        assert_eq!(reply, "1234567890");
        daemon.join().unwrap();
    }
}
