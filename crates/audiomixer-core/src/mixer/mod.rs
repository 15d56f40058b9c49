//! Mixer verb operations
//!
//! Each operation validates its input, formats a `"<verb> <role> <value>"`
//! command, runs one session exchange and interprets the decimal reply.
//! A negative reply is the daemon reporting failure for that verb.

use std::fmt;

use thiserror::Error;

use crate::session::{self, TransportError};

/// Value sent in place of a real one to query the current setting
pub const QUERY_SENTINEL: i32 = -1;

/// Mixer verbs understood by the session daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Volume,
    Mute,
    Zone,
}

impl Verb {
    /// Wire name of the verb
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Volume => "volume",
            Verb::Mute => "mute",
            Verb::Zone => "zone",
        }
    }

    /// Inclusive upper bound of the verb's value range (lower bound is 0)
    pub fn max_value(&self) -> i32 {
        match self {
            Verb::Volume => 100,
            Verb::Mute => 1,
            Verb::Zone => 4,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mixer operation error types
#[derive(Debug, Error)]
pub enum MixerError {
    /// The role token would corrupt the space-delimited command line
    #[error("invalid role {role:?} (must be non-empty, without whitespace)")]
    InvalidRole { role: String },

    /// The requested value is outside the verb's range
    #[error("invalid {verb} value {value} (must be between 0 and {max})")]
    InvalidValue { verb: Verb, value: i32, max: i32 },

    /// The exchange with the session daemon failed
    #[error("media-session communication failed")]
    Transport(#[from] TransportError),

    /// The daemon reported failure for this verb
    #[error("media-session replied {0}")]
    Daemon(i32),

    /// The daemon reply was not a decimal integer
    #[error("unexpected media-session reply {0:?}")]
    BadReply(String),
}

/// Get or set the volume for a stream role (range 0-100).
///
/// With `Some(v)` the volume is set to `v`; with `None` the current value
/// is queried. Returns the volume as reported back by the daemon.
pub fn volume(role: &str, value: Option<i32>) -> Result<i32, MixerError> {
    request(Verb::Volume, role, value)
}

/// Get or set mute for a stream role (0 or 1)
pub fn mute(role: &str, value: Option<i32>) -> Result<i32, MixerError> {
    request(Verb::Mute, role, value)
}

/// Get or set the output zone for a stream role (range 0-4)
pub fn zone(role: &str, value: Option<i32>) -> Result<i32, MixerError> {
    request(Verb::Zone, role, value)
}

/// Shared verb flow: validate, format, exchange, interpret.
///
/// Validation failures never touch the transport.
fn request(verb: Verb, role: &str, value: Option<i32>) -> Result<i32, MixerError> {
    if role.is_empty() || role.contains(char::is_whitespace) {
        return Err(MixerError::InvalidRole {
            role: role.to_string(),
        });
    }
    let value = match value {
        Some(v) if v < 0 || v > verb.max_value() => {
            return Err(MixerError::InvalidValue {
                verb,
                value: v,
                max: verb.max_value(),
            });
        }
        Some(v) => v,
        None => QUERY_SENTINEL,
    };

    let command = format!("{verb} {role} {value}");
    let reply = session::exchange(&command)?;

    let parsed = parse_reply(&reply)?;
    if parsed < 0 {
        tracing::warn!(%verb, role, reply = parsed, "daemon reported failure");
        return Err(MixerError::Daemon(parsed));
    }
    Ok(parsed)
}

/// Parse a daemon reply as a decimal integer.
///
/// Trailing nul bytes and whitespace are tolerated; anything else is not.
fn parse_reply(reply: &str) -> Result<i32, MixerError> {
    reply
        .trim_end_matches('\0')
        .trim()
        .parse()
        .map_err(|_| MixerError::BadReply(reply.to_string()))
}
