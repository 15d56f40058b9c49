//! Core library for audiomixer
//!
//! Forwards volume, mute and zone commands for named stream roles to the
//! PipeWire media session daemon over a Unix domain socket. Every command
//! is a self-contained connect/write/read/close exchange; nothing is
//! shared or cached between calls.

pub mod mixer;
pub mod session;
