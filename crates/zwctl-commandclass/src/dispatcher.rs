//! Subcommand dispatcher.
//!
//! Reads the tag at offset 0 of a response, decodes the fields the class table
//! declares for that tag and writes them into the capability cache. Decode
//! faults are reported and absorbed here: every response counts as handled.

use std::sync::Arc;

use bytes::Bytes;
use zwctl_metrics::{metric_defs, metrics, HandlerLabels};
use zwctl_protocol::{codec, ProtocolError, SubcommandTag};

use crate::diagnostics::{DiagnosticContext, DiagnosticEvent, DiagnosticsSink};
use crate::state::CapabilityState;
use crate::table::{CommandClassDef, FieldKind, SubcommandDef};

/// A field value decoded from a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedField {
    /// Slot the value was written to.
    pub slot: usize,
    /// Slot name.
    pub name: &'static str,
    /// Decoded value (flags are 0 or 1).
    pub value: u32,
}

/// What the dispatcher did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Known subcommand, cache updated.
    Decoded {
        /// Subcommand tag.
        tag: SubcommandTag,
        /// Subcommand name.
        subcommand: &'static str,
        /// Values written to the cache.
        fields: Vec<DecodedField>,
    },
    /// Tag not in the class table. Cache untouched.
    UnknownSubcommand {
        /// The unknown tag.
        tag: SubcommandTag,
        /// Lookup error ([`ProtocolError::UnknownSubcommand`]).
        error: ProtocolError,
    },
    /// Payload too short. Cache untouched.
    Malformed {
        /// Tag, if the payload had one.
        tag: Option<SubcommandTag>,
        /// Decode error.
        error: ProtocolError,
    },
}

impl DispatchOutcome {
    /// Label value used for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Decoded { .. } => "decoded",
            DispatchOutcome::UnknownSubcommand { .. } => "unknown_subcommand",
            DispatchOutcome::Malformed { .. } => "malformed",
        }
    }
}

/// Result of handling one response.
///
/// Responses are never rejected: the transport always gets "handled". The
/// outcome is kept for callers that want to know what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledResult {
    outcome: DispatchOutcome,
}

impl HandledResult {
    /// Always `true`.
    pub fn is_handled(&self) -> bool {
        true
    }

    /// Whether the cache was updated.
    pub fn is_decoded(&self) -> bool {
        matches!(self.outcome, DispatchOutcome::Decoded { .. })
    }

    /// Tag read from the response, if any.
    pub fn tag(&self) -> Option<SubcommandTag> {
        match &self.outcome {
            DispatchOutcome::Decoded { tag, .. }
            | DispatchOutcome::UnknownSubcommand { tag, .. } => Some(*tag),
            DispatchOutcome::Malformed { tag, .. } => *tag,
        }
    }

    /// The dispatch outcome.
    pub fn outcome(&self) -> &DispatchOutcome {
        &self.outcome
    }

    /// Consume the result, returning the outcome.
    pub fn into_outcome(self) -> DispatchOutcome {
        self.outcome
    }
}

/// Decode every field `def` declares, without touching any state.
///
/// Fails on the first field that does not fit in `payload`.
pub fn decode_fields(
    class: &CommandClassDef,
    def: &SubcommandDef,
    payload: &[u8],
) -> Result<Vec<DecodedField>, ProtocolError> {
    def.fields
        .iter()
        .map(|field| -> Result<DecodedField, ProtocolError> {
            let value = match field.kind {
                FieldKind::Flag { mask } => {
                    u32::from(codec::decode_flag(payload, field.offset, mask)?)
                }
                FieldKind::Bool => u32::from(codec::decode_bool(payload, field.offset)?),
                FieldKind::Uint { width } => codec::decode_uint(payload, field.offset, width)?,
            };
            let name = class.slots.get(field.slot).map_or("?", |slot| slot.name);
            Ok(DecodedField {
                slot: field.slot,
                name,
                value,
            })
        })
        .collect()
}

/// Routes responses by subcommand tag and owns the capability cache.
#[derive(Debug)]
pub struct SubcommandDispatcher {
    class: &'static CommandClassDef,
    state: CapabilityState,
    context: DiagnosticContext,
    sink: Arc<dyn DiagnosticsSink>,
    labels: HandlerLabels,
}

impl SubcommandDispatcher {
    /// Create a dispatcher with an empty cache.
    pub fn new(
        class: &'static CommandClassDef,
        context: DiagnosticContext,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        SubcommandDispatcher {
            class,
            state: CapabilityState::new(class.slots),
            labels: HandlerLabels::new(context.node.0, context.endpoint.0, class.name),
            context,
            sink,
        }
    }

    /// The class table this dispatcher routes against.
    pub fn class(&self) -> &'static CommandClassDef {
        self.class
    }

    /// The capability cache.
    pub fn state(&self) -> &CapabilityState {
        &self.state
    }

    /// Diagnostic context of this binding.
    pub fn context(&self) -> &DiagnosticContext {
        &self.context
    }

    /// Diagnostics sink of this binding.
    pub fn sink(&self) -> &Arc<dyn DiagnosticsSink> {
        &self.sink
    }

    /// Metric labels of this binding.
    pub fn labels(&self) -> &HandlerLabels {
        &self.labels
    }

    /// Handle one response payload.
    pub fn handle_response(&self, raw: &[u8]) -> HandledResult {
        metrics::histogram!(metric_defs::RESPONSE_SIZE.name, &self.labels.to_labels())
            .record(raw.len() as f64);

        let outcome = self.dispatch(raw);

        metrics::counter!(
            metric_defs::RESPONSES.name,
            &self.labels.with(&[("outcome", outcome.as_str().to_string())])
        )
        .increment(1);

        HandledResult { outcome }
    }

    fn dispatch(&self, raw: &[u8]) -> DispatchOutcome {
        let tag = match codec::read_tag(raw) {
            Ok(tag) => tag,
            Err(error) => return self.malformed(None, None, error, raw),
        };

        let def = match self.class.lookup(tag) {
            Ok(def) => def,
            Err(error) => {
                metrics::counter!(
                    metric_defs::UNKNOWN_SUBCOMMANDS.name,
                    &self.labels.with(&[("tag", tag.to_string())])
                )
                .increment(1);
                self.sink.record(
                    &self.context,
                    &DiagnosticEvent::UnknownSubcommand {
                        tag,
                        payload: Bytes::copy_from_slice(raw),
                    },
                );
                return DispatchOutcome::UnknownSubcommand { tag, error };
            }
        };

        // Decode everything before writing anything.
        let fields = match decode_fields(self.class, def, raw) {
            Ok(fields) => fields,
            Err(error) => return self.malformed(Some(tag), Some(def.min_len()), error, raw),
        };

        for field in &fields {
            self.state.store(field.slot, field.value);
        }
        self.state.set_last_subcommand(tag);

        self.sink.record(
            &self.context,
            &DiagnosticEvent::ResponseDecoded {
                tag,
                subcommand: def.name,
                fields: fields.len(),
                payload: Bytes::copy_from_slice(raw),
            },
        );

        DispatchOutcome::Decoded {
            tag,
            subcommand: def.name,
            fields,
        }
    }

    fn malformed(
        &self,
        tag: Option<SubcommandTag>,
        needed: Option<usize>,
        error: ProtocolError,
        raw: &[u8],
    ) -> DispatchOutcome {
        metrics::counter!(metric_defs::DECODE_FAILURES.name, &self.labels.to_labels()).increment(1);
        self.sink.record(
            &self.context,
            &DiagnosticEvent::MalformedPayload {
                tag,
                needed,
                error: error.clone(),
                payload: Bytes::copy_from_slice(raw),
            },
        );
        DispatchOutcome::Malformed { tag, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use crate::table::{FieldDef, SlotDef};
    use zwctl_protocol::{EndpointId, HandlerIdentity, NodeId, SerialMessageClass};

    const SLOTS: &[SlotDef] = &[
        SlotDef::flag("supported"),
        SlotDef::flag("enabled"),
        SlotDef::value("counter"),
    ];
    const SUBCOMMANDS: &[SubcommandDef] = &[
        SubcommandDef {
            tag: SubcommandTag(0x01),
            name: "query",
            fields: &[FieldDef::flag(0, 1, 0x02)],
        },
        SubcommandDef {
            tag: SubcommandTag(0x02),
            name: "report",
            fields: &[FieldDef::bool(1, 1)],
        },
        SubcommandDef {
            tag: SubcommandTag(0x03),
            name: "counter",
            fields: &[FieldDef::bool(1, 1), FieldDef::uint(2, 2, 2)],
        },
    ];
    static CLASS: CommandClassDef = CommandClassDef {
        identity: HandlerIdentity::SerialApi(SerialMessageClass::SetupApi),
        name: "test",
        slots: SLOTS,
        subcommands: SUBCOMMANDS,
    };

    fn dispatcher() -> (SubcommandDispatcher, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let context = DiagnosticContext {
            handler: CLASS.name,
            node: NodeId(1),
            endpoint: EndpointId(0),
        };
        (SubcommandDispatcher::new(&CLASS, context, sink.clone()), sink)
    }

    #[test]
    fn test_decode_query_flag() {
        let (dispatcher, _) = dispatcher();
        let result = dispatcher.handle_response(&[0x01, 0x02]);

        assert!(result.is_handled());
        assert!(result.is_decoded());
        assert!(dispatcher.state().flag(0));
        assert!(!dispatcher.state().is_known(1));
        assert_eq!(dispatcher.state().last_subcommand(), Some(SubcommandTag(0x01)));
    }

    #[test]
    fn test_mask_only_tests_its_bit() {
        let (dispatcher, _) = dispatcher();
        dispatcher.handle_response(&[0x01, 0xFD]);
        assert!(!dispatcher.state().flag(0));
        assert!(dispatcher.state().is_known(0));
    }

    #[test]
    fn test_unknown_tag_leaves_state() {
        let (dispatcher, sink) = dispatcher();
        dispatcher.handle_response(&[0x02, 0x01]);
        let before = dispatcher.state().snapshot();

        let result = dispatcher.handle_response(&[0xFF, 0x00, 0x00]);

        assert!(result.is_handled());
        assert_eq!(
            result.outcome(),
            &DispatchOutcome::UnknownSubcommand {
                tag: SubcommandTag(0xFF),
                error: ProtocolError::UnknownSubcommand(0xFF),
            }
        );
        assert_eq!(dispatcher.state().snapshot(), before);
        assert_eq!(dispatcher.state().last_subcommand(), Some(SubcommandTag(0x02)));
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, DiagnosticEvent::UnknownSubcommand { tag, .. } if tag.0 == 0xFF)));
    }

    #[test]
    fn test_empty_payload_is_malformed() {
        let (dispatcher, sink) = dispatcher();
        let result = dispatcher.handle_response(&[]);

        assert!(result.is_handled());
        assert_eq!(result.tag(), None);
        assert!(matches!(
            result.outcome(),
            DispatchOutcome::Malformed {
                error: ProtocolError::MalformedPayload { .. },
                ..
            }
        ));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_short_payload_writes_nothing() {
        let (dispatcher, sink) = dispatcher();
        dispatcher.handle_response(&[0x01, 0x02]);

        // Second field of tag 0x03 is missing; the first must not be written either.
        let result = dispatcher.handle_response(&[0x03, 0x01, 0x00]);

        assert!(result.is_handled());
        assert_eq!(result.tag(), Some(SubcommandTag(0x03)));
        assert!(!dispatcher.state().is_known(1));
        assert!(!dispatcher.state().is_known(2));
        assert_eq!(dispatcher.state().last_subcommand(), Some(SubcommandTag(0x01)));
        assert!(matches!(
            sink.events().last(),
            Some(DiagnosticEvent::MalformedPayload {
                tag: Some(SubcommandTag(0x03)),
                needed: Some(4),
                payload,
                ..
            }) if payload.len() == 3
        ));
    }

    #[test]
    fn test_multi_byte_field() {
        let (dispatcher, _) = dispatcher();
        let result = dispatcher.handle_response(&[0x03, 0x00, 0x01, 0x2C]);

        match result.into_outcome() {
            DispatchOutcome::Decoded { fields, .. } => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[1].name, "counter");
                assert_eq!(fields[1].value, 300);
            }
            other => panic!("expected decoded outcome, got {:?}", other),
        }
        assert_eq!(dispatcher.state().get(2), Some(300));
        assert_eq!(dispatcher.state().get(1), Some(0));
    }

    #[test]
    fn test_decode_fields_is_pure() {
        let fields = decode_fields(&CLASS, &SUBCOMMANDS[1], &[0x02, 0x01]).expect("decode");
        assert_eq!(
            fields,
            vec![DecodedField {
                slot: 1,
                name: "enabled",
                value: 1
            }]
        );
        assert_eq!(
            decode_fields(&CLASS, &SUBCOMMANDS[1], &[0x02]),
            Err(ProtocolError::out_of_range(1, 1, 1))
        );
    }
}
