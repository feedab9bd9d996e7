//! Z-Wave Serial Controller Protocol
//!
//! This crate provides the wire-level building blocks shared by every
//! command-class handler: protocol constants, identity types, the payload
//! codec for subcommand-multiplexed classes, and the outbound envelope handed
//! to the transport.
//!
//! # Protocol Overview
//!
//! The host talks to the controller through data frames carrying a serial
//! message class (function id). Some message classes and many node command
//! classes multiplex several subcommands through one envelope:
//!
//! - **Requests** (host → controller/node): `[tag, args...]`
//! - **Responses** (controller/node → host): `[tag, fields...]`
//!
//! # Example
//!
//! ```rust
//! use zwctl_protocol::{codec, SubcommandTag};
//!
//! let request = codec::encode(SubcommandTag(0x02), &[0x01]);
//! assert_eq!(&request[..], &[0x02, 0x01]);
//!
//! let supported = codec::decode_flag(&[0x01, 0x02], 1, 0x02).unwrap();
//! assert!(supported);
//! ```

pub mod codec;
mod constants;
mod envelope;
mod error;
mod types;

pub use constants::*;
pub use envelope::*;
pub use error::*;
pub use types::*;
