//! Z-Wave Command-Class Handlers
//!
//! Transaction handlers for message classes and command classes that
//! multiplex several subcommands through one envelope. Each class is described
//! by a static [`CommandClassDef`] table; one generic [`SubcommandDispatcher`]
//! decodes responses against it into a per-handler [`CapabilityState`].
//!
//! # Layers
//!
//! - [`table`]: declarative subcommand tables (tag, field offset, mask/width)
//! - [`state`]: atomically updated capability cache, readable from any thread
//! - [`dispatcher`]: tag lookup, field decode, cache update, diagnostics
//! - [`adapter`]: request envelopes out, responses in, transaction completion
//! - [`classes`]: concrete handlers with typed accessors
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use zwctl_commandclass::{
//!     CommandClassHandler, CountingTransaction, HandlerConfig, MemorySink, SetupApiHandler,
//! };
//!
//! let handler = SetupApiHandler::new(&HandlerConfig::default(), Arc::new(MemorySink::new()));
//! assert_eq!(&handler.request_query().payload[..], &[0x01]);
//!
//! let tx = CountingTransaction::new(1);
//! assert!(handler.on_response(&tx, &[0x01, 0x02]));
//! assert!(handler.supports_tx_report());
//! assert!(tx.is_complete());
//! ```

pub mod adapter;
pub mod classes;
pub mod config;
pub mod diagnostics;
pub mod dispatcher;
pub mod registry;
pub mod state;
pub mod table;
pub mod transaction;

pub use adapter::TransactionAdapter;
pub use classes::*;
pub use config::{ConfigError, HandlerConfig};
pub use diagnostics::{
    DiagnosticContext, DiagnosticEvent, DiagnosticsSink, MemorySink, NullSink, TracingSink,
};
pub use dispatcher::{
    decode_fields, DecodedField, DispatchOutcome, HandledResult, SubcommandDispatcher,
};
pub use registry::{identity_for, serialized_name};
pub use state::{CapabilitySnapshot, CapabilityState, SnapshotValue};
pub use table::{CommandClassDef, FieldDef, FieldKind, SlotDef, SlotKind, SubcommandDef};
pub use transaction::{CountingTransaction, Transaction, TransactionId};
