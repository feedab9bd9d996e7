//! Transaction adapter.
//!
//! The only surface the transport talks to: it builds request envelopes and
//! takes response payloads back, completing the owning transaction once per
//! response.

use std::sync::Arc;

use bytes::{BufMut, BytesMut};
use tracing::trace;
use zwctl_metrics::{metric_defs, metrics};
use zwctl_protocol::{
    codec, EndpointId, HandlerIdentity, NodeId, OutboundEnvelope, SerialMessageClass,
    SubcommandTag,
};

use crate::config::HandlerConfig;
use crate::diagnostics::{DiagnosticContext, DiagnosticEvent, DiagnosticsSink, TracingSink};
use crate::dispatcher::{HandledResult, SubcommandDispatcher};
use crate::state::CapabilityState;
use crate::table::CommandClassDef;
use crate::transaction::Transaction;

/// Binds a class table to one (node, endpoint) and mediates with the transport.
#[derive(Debug)]
pub struct TransactionAdapter {
    dispatcher: SubcommandDispatcher,
}

impl TransactionAdapter {
    /// Create an adapter reporting to `sink`.
    pub fn new(
        class: &'static CommandClassDef,
        config: &HandlerConfig,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        let context = DiagnosticContext {
            handler: class.name,
            node: config.node(),
            endpoint: config.endpoint_id(),
        };
        TransactionAdapter {
            dispatcher: SubcommandDispatcher::new(class, context, sink),
        }
    }

    /// Create an adapter reporting through `tracing`.
    pub fn with_tracing(class: &'static CommandClassDef, config: &HandlerConfig) -> Self {
        Self::new(class, config, Arc::new(TracingSink::new(config.trace_payloads)))
    }

    /// Routing identity of the class.
    pub fn identity(&self) -> HandlerIdentity {
        self.dispatcher.class().identity
    }

    /// Class table.
    pub fn class(&self) -> &'static CommandClassDef {
        self.dispatcher.class()
    }

    /// Node the handler is bound to.
    pub fn node_id(&self) -> NodeId {
        self.dispatcher.context().node
    }

    /// Endpoint the handler is bound to.
    pub fn endpoint(&self) -> EndpointId {
        self.dispatcher.context().endpoint
    }

    /// Capability cache.
    pub fn state(&self) -> &CapabilityState {
        self.dispatcher.state()
    }

    /// Build the envelope for one subcommand request.
    ///
    /// Serial API classes go straight to the controller under their own
    /// message class. Command classes are sent with `SendData` to the bound
    /// node, the class id prefixed to the payload. Endpoint encapsulation is
    /// left to the transport.
    pub fn build_request(&self, tag: SubcommandTag, args: &[u8]) -> OutboundEnvelope {
        let payload = codec::encode(tag, args);

        self.dispatcher.sink().record(
            self.dispatcher.context(),
            &DiagnosticEvent::RequestBuilt {
                tag,
                payload: payload.clone(),
            },
        );
        metrics::counter!(
            metric_defs::REQUESTS_BUILT.name,
            &self.dispatcher.labels().with(&[("subcommand", tag.to_string())])
        )
        .increment(1);

        match self.identity() {
            HandlerIdentity::SerialApi(message_class) => {
                OutboundEnvelope::new(message_class, payload)
            }
            HandlerIdentity::CommandClass(class_id) => {
                let mut buf = BytesMut::with_capacity(1 + payload.len());
                buf.put_u8(class_id.value());
                buf.extend_from_slice(&payload);
                OutboundEnvelope::to_node(
                    SerialMessageClass::SendData,
                    self.node_id(),
                    buf.freeze(),
                )
            }
        }
    }

    /// Decode a response without a transaction object.
    pub fn handle_response(&self, raw: &[u8]) -> HandledResult {
        self.dispatcher.handle_response(raw)
    }

    /// Transport callback: decode `raw` and complete `transaction`.
    ///
    /// Always returns `true`: unknown or truncated responses are consumed too,
    /// so one bad frame cannot stall the transaction pipeline.
    pub fn on_response(&self, transaction: &dyn Transaction, raw: &[u8]) -> bool {
        let result = self.dispatcher.handle_response(raw);
        trace!(
            handler = self.class().name,
            transaction = %transaction.id(),
            outcome = result.outcome().as_str(),
            "completing transaction"
        );
        transaction.set_complete();
        result.is_handled()
    }
}
