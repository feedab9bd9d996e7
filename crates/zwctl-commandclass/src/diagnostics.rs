//! Diagnostics sinks.
//!
//! Handlers never reach for a global logger. They report through a
//! [`DiagnosticsSink`] injected at construction; [`TracingSink`] forwards to
//! `tracing`, [`MemorySink`] keeps events for inspection.

use std::fmt;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::{debug, warn};
use zwctl_protocol::{hex_encode, EndpointId, NodeId, ProtocolError, SubcommandTag};

/// Which handler binding an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticContext {
    /// Handler name.
    pub handler: &'static str,
    /// Node the handler is bound to.
    pub node: NodeId,
    /// Endpoint the handler is bound to.
    pub endpoint: EndpointId,
}

/// Something a handler wants reported.
///
/// Every event carries the payload it is about, so sinks can dump it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// A request envelope was built.
    RequestBuilt {
        /// Subcommand requested.
        tag: SubcommandTag,
        /// Encoded payload.
        payload: Bytes,
    },
    /// A response was decoded and the cache updated.
    ResponseDecoded {
        /// Subcommand decoded.
        tag: SubcommandTag,
        /// Subcommand name from the class table.
        subcommand: &'static str,
        /// Number of slots written.
        fields: usize,
        /// Raw response.
        payload: Bytes,
    },
    /// A response carried a tag the class does not know.
    UnknownSubcommand {
        /// The unknown tag.
        tag: SubcommandTag,
        /// Raw response.
        payload: Bytes,
    },
    /// A response was too short to decode.
    MalformedPayload {
        /// Tag, if the payload had one.
        tag: Option<SubcommandTag>,
        /// Length the subcommand needs, when the tag was known.
        needed: Option<usize>,
        /// Decode error.
        error: ProtocolError,
        /// Raw response.
        payload: Bytes,
    },
}

impl DiagnosticEvent {
    /// The payload the event is about.
    pub fn payload(&self) -> &Bytes {
        match self {
            DiagnosticEvent::RequestBuilt { payload, .. }
            | DiagnosticEvent::ResponseDecoded { payload, .. }
            | DiagnosticEvent::UnknownSubcommand { payload, .. }
            | DiagnosticEvent::MalformedPayload { payload, .. } => payload,
        }
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticEvent::RequestBuilt { tag, payload } => {
                write!(f, "request {} built ({} bytes)", tag, payload.len())
            }
            DiagnosticEvent::ResponseDecoded {
                tag, subcommand, ..
            } => write!(f, "response {} ({}) decoded", tag, subcommand),
            DiagnosticEvent::UnknownSubcommand { tag, .. } => {
                write!(f, "unknown subcommand {} in response", tag)
            }
            DiagnosticEvent::MalformedPayload { error, .. } => {
                write!(f, "malformed response: {}", error)
            }
        }
    }
}

/// Receiver for handler diagnostics.
pub trait DiagnosticsSink: Send + Sync + fmt::Debug {
    /// Record one event.
    fn record(&self, context: &DiagnosticContext, event: &DiagnosticEvent);
}

/// Forwards events to `tracing` with structured fields.
///
/// Successful traffic is logged at debug level, unknown and malformed
/// responses at warn level. With `trace_payloads` each event also carries a
/// `payload` field holding a hex dump.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    trace_payloads: bool,
}

impl TracingSink {
    /// Create a sink. With `trace_payloads` payloads are hex-dumped.
    pub fn new(trace_payloads: bool) -> Self {
        TracingSink { trace_payloads }
    }
}

impl DiagnosticsSink for TracingSink {
    fn record(&self, context: &DiagnosticContext, event: &DiagnosticEvent) {
        let handler = context.handler;
        let node = context.node.0;
        let endpoint = context.endpoint.0;
        let len = event.payload().len();
        // `None` fields are left out of the event entirely.
        let dump = self.trace_payloads.then(|| hex_encode(event.payload()));
        let payload = dump.as_deref();

        match event {
            DiagnosticEvent::RequestBuilt { tag, .. } => {
                debug!(handler, node, endpoint, tag = tag.0, len, payload, "request built");
            }
            DiagnosticEvent::ResponseDecoded {
                tag,
                subcommand,
                fields,
                ..
            } => {
                debug!(
                    handler,
                    node,
                    endpoint,
                    tag = tag.0,
                    subcommand,
                    fields,
                    len,
                    payload,
                    "response decoded"
                );
            }
            DiagnosticEvent::UnknownSubcommand { tag, .. } => {
                warn!(
                    handler,
                    node,
                    endpoint,
                    tag = tag.0,
                    len,
                    payload,
                    "unknown subcommand in response"
                );
            }
            DiagnosticEvent::MalformedPayload {
                tag, needed, error, ..
            } => {
                warn!(
                    handler,
                    node,
                    endpoint,
                    tag = tag.map(|t| t.0),
                    needed,
                    len,
                    payload,
                    %error,
                    "malformed response"
                );
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&self, _context: &DiagnosticContext, _event: &DiagnosticEvent) {}
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<(DiagnosticContext, DiagnosticEvent)>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded events, oldest first.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .iter()
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// Copy of the recorded events with their context.
    pub fn records(&self) -> Vec<(DiagnosticContext, DiagnosticEvent)> {
        self.events.lock().clone()
    }

    /// Remove and return every recorded event.
    pub fn take(&self) -> Vec<DiagnosticEvent> {
        std::mem::take(&mut *self.events.lock())
            .into_iter()
            .map(|(_, event)| event)
            .collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, context: &DiagnosticContext, event: &DiagnosticEvent) {
        self.events.lock().push((*context, event.clone()));
    }
}
