//! Conference ticket intake: validation, avatar preview, serial generation and the
//! collecting/issued form lifecycle, independent of any particular rendering host.

pub mod config;
pub mod error;
pub mod intake;
pub mod telemetry;
