//! Scene actuator configuration command class (0x2C).
//!
//! Lets a controller store, per scene, the level a device jumps to and how
//! long it takes to get there.

use std::sync::Arc;

use zwctl_protocol::{
    CommandClassId, HandlerIdentity, OutboundEnvelope, SubcommandTag,
    SCENE_ACTUATOR_CONF_FLAG_OVERRIDE, SCENE_ACTUATOR_CONF_GET, SCENE_ACTUATOR_CONF_REPORT,
    SCENE_ACTUATOR_CONF_SET,
};

use super::CommandClassHandler;
use crate::adapter::TransactionAdapter;
use crate::config::HandlerConfig;
use crate::diagnostics::DiagnosticsSink;
use crate::table::{CommandClassDef, FieldDef, SlotDef, SubcommandDef};

/// Store a scene configuration.
pub const SCENE_CONF_SET: SubcommandTag = SubcommandTag(SCENE_ACTUATOR_CONF_SET);
/// Ask for a scene configuration.
pub const SCENE_CONF_GET: SubcommandTag = SubcommandTag(SCENE_ACTUATOR_CONF_GET);
/// Scene configuration report.
pub const SCENE_CONF_REPORT: SubcommandTag = SubcommandTag(SCENE_ACTUATOR_CONF_REPORT);

const SLOT_SCENE_ID: usize = 0;
const SLOT_LEVEL: usize = 1;
const SLOT_DIMMING_DURATION: usize = 2;

/// Class table for the scene actuator configuration handler.
pub static SCENE_ACTUATOR_CONF: CommandClassDef = CommandClassDef {
    identity: HandlerIdentity::CommandClass(CommandClassId::SCENE_ACTUATOR_CONF),
    name: "scene_actuator_conf",
    slots: &[
        SlotDef::value("scene_id"),
        SlotDef::value("level"),
        SlotDef::value("dimming_duration"),
    ],
    // Only the report carries state; set and get are request-only.
    subcommands: &[SubcommandDef {
        tag: SCENE_CONF_REPORT,
        name: "report",
        fields: &[
            FieldDef::uint(SLOT_SCENE_ID, 1, 1),
            FieldDef::uint(SLOT_LEVEL, 2, 1),
            FieldDef::uint(SLOT_DIMMING_DURATION, 3, 1),
        ],
    }],
};

/// Handler for the scene actuator configuration class on one node endpoint.
#[derive(Debug)]
pub struct SceneActuatorConfHandler {
    adapter: TransactionAdapter,
}

impl SceneActuatorConfHandler {
    /// Create a handler reporting to `sink`.
    pub fn new(config: &HandlerConfig, sink: Arc<dyn DiagnosticsSink>) -> Self {
        SceneActuatorConfHandler {
            adapter: TransactionAdapter::new(&SCENE_ACTUATOR_CONF, config, sink),
        }
    }

    /// Create a handler reporting through `tracing`.
    pub fn with_tracing(config: &HandlerConfig) -> Self {
        SceneActuatorConfHandler {
            adapter: TransactionAdapter::with_tracing(&SCENE_ACTUATOR_CONF, config),
        }
    }

    /// Build a set request.
    ///
    /// With `level` the device stores that level for the scene (override bit
    /// set); without it the device stores its current level.
    pub fn request_set(
        &self,
        scene_id: u8,
        dimming_duration: u8,
        level: Option<u8>,
    ) -> OutboundEnvelope {
        let (flags, level) = match level {
            Some(level) => (SCENE_ACTUATOR_CONF_FLAG_OVERRIDE, level),
            None => (0, 0),
        };
        self.adapter
            .build_request(SCENE_CONF_SET, &[scene_id, dimming_duration, flags, level])
    }

    /// Build a get request for `scene_id` (0 = the currently active scene).
    pub fn request_get(&self, scene_id: u8) -> OutboundEnvelope {
        self.adapter.build_request(SCENE_CONF_GET, &[scene_id])
    }

    /// Scene id of the last report.
    pub fn reported_scene(&self) -> Option<u8> {
        self.slot(SLOT_SCENE_ID)
    }

    /// Level of the last report.
    pub fn level(&self) -> Option<u8> {
        self.slot(SLOT_LEVEL)
    }

    /// Dimming duration of the last report.
    pub fn dimming_duration(&self) -> Option<u8> {
        self.slot(SLOT_DIMMING_DURATION)
    }

    /// Last subcommand decoded.
    pub fn last_subcommand(&self) -> Option<SubcommandTag> {
        self.adapter.state().last_subcommand()
    }

    fn slot(&self, slot: usize) -> Option<u8> {
        // single-byte fields
        self.adapter.state().get(slot).map(|value| value as u8)
    }
}

impl CommandClassHandler for SceneActuatorConfHandler {
    fn adapter(&self) -> &TransactionAdapter {
        &self.adapter
    }
}
