//! Serial API setup.
//!
//! Controller-level class multiplexing setup subcommands. Two are handled:
//!
//! | Tag    | Request         | Response                              |
//! |--------|-----------------|---------------------------------------|
//! | `0x01` | `[0x01]`        | `[0x01, supported]`, bit `0x02` = TX report supported |
//! | `0x02` | `[0x02, on]`    | `[0x02, enabled]`                     |

use std::sync::Arc;

use zwctl_protocol::{
    HandlerIdentity, OutboundEnvelope, SerialMessageClass, SubcommandTag, SETUPAPI_FLAG_TXREPORT,
    SETUPAPI_SUBCMD_QUERY, SETUPAPI_SUBCMD_TXREPORT,
};

use super::CommandClassHandler;
use crate::adapter::TransactionAdapter;
use crate::config::HandlerConfig;
use crate::diagnostics::DiagnosticsSink;
use crate::table::{CommandClassDef, FieldDef, SlotDef, SubcommandDef};

/// Query supported setup subcommands.
pub const SETUP_API_QUERY: SubcommandTag = SubcommandTag(SETUPAPI_SUBCMD_QUERY);
/// Enable or disable transmit status reports.
pub const SETUP_API_TX_REPORT: SubcommandTag = SubcommandTag(SETUPAPI_SUBCMD_TXREPORT);

const SLOT_SUPPORTS_TX_REPORT: usize = 0;
const SLOT_TX_REPORT_ENABLED: usize = 1;

/// Class table for the serial API setup handler.
pub static SETUP_API: CommandClassDef = CommandClassDef {
    identity: HandlerIdentity::SerialApi(SerialMessageClass::SetupApi),
    name: "setup_api",
    slots: &[
        SlotDef::flag("supports_tx_report"),
        SlotDef::flag("tx_report_enabled"),
    ],
    subcommands: &[
        SubcommandDef {
            tag: SETUP_API_QUERY,
            name: "query",
            fields: &[FieldDef::flag(SLOT_SUPPORTS_TX_REPORT, 1, SETUPAPI_FLAG_TXREPORT)],
        },
        SubcommandDef {
            tag: SETUP_API_TX_REPORT,
            name: "tx_report",
            fields: &[FieldDef::bool(SLOT_TX_REPORT_ENABLED, 1)],
        },
    ],
};

/// Handler for the serial API setup class.
#[derive(Debug)]
pub struct SetupApiHandler {
    adapter: TransactionAdapter,
}

impl SetupApiHandler {
    /// Create a handler reporting to `sink`.
    pub fn new(config: &HandlerConfig, sink: Arc<dyn DiagnosticsSink>) -> Self {
        SetupApiHandler {
            adapter: TransactionAdapter::new(&SETUP_API, config, sink),
        }
    }

    /// Create a handler reporting through `tracing`.
    pub fn with_tracing(config: &HandlerConfig) -> Self {
        SetupApiHandler {
            adapter: TransactionAdapter::with_tracing(&SETUP_API, config),
        }
    }

    /// Build a query request.
    pub fn request_query(&self) -> OutboundEnvelope {
        self.adapter.build_request(SETUP_API_QUERY, &[])
    }

    /// Build a request turning transmit status reports on or off.
    pub fn request_set_tx_report(&self, enable: bool) -> OutboundEnvelope {
        self.adapter
            .build_request(SETUP_API_TX_REPORT, &[u8::from(enable)])
    }

    /// Whether the controller reported transmit report support.
    pub fn supports_tx_report(&self) -> bool {
        self.adapter.state().flag(SLOT_SUPPORTS_TX_REPORT)
    }

    /// Whether the controller reported transmit reports enabled.
    pub fn tx_report_enabled(&self) -> bool {
        self.adapter.state().flag(SLOT_TX_REPORT_ENABLED)
    }

    /// Last subcommand decoded.
    pub fn last_subcommand(&self) -> Option<SubcommandTag> {
        self.adapter.state().last_subcommand()
    }
}

impl CommandClassHandler for SetupApiHandler {
    fn adapter(&self) -> &TransactionAdapter {
        &self.adapter
    }
}
