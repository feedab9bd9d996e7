//! Serialized names of handler identities.
//!
//! Persisted configuration refers to handlers by these names. The table lives
//! here, next to routing, rather than on each handler.

use zwctl_protocol::{CommandClassId, HandlerIdentity, SerialMessageClass};

/// Identity → serialized name.
pub const SERIALIZED_NAMES: &[(HandlerIdentity, &str)] = &[
    (
        HandlerIdentity::SerialApi(SerialMessageClass::SetupApi),
        "SERIAL_API_SETUP",
    ),
    (
        HandlerIdentity::CommandClass(CommandClassId::BASIC),
        "COMMAND_CLASS_BASIC",
    ),
    (
        HandlerIdentity::CommandClass(CommandClassId::SCENE_ACTIVATION),
        "COMMAND_CLASS_SCENE_ACTIVATION",
    ),
    (
        HandlerIdentity::CommandClass(CommandClassId::SCENE_ACTUATOR_CONF),
        "COMMAND_CLASS_SCENE_ACTUATOR_CONF",
    ),
    (
        HandlerIdentity::CommandClass(CommandClassId::CONFIGURATION),
        "COMMAND_CLASS_CONFIGURATION",
    ),
];

/// Serialized name for `identity`.
pub fn serialized_name(identity: HandlerIdentity) -> Option<&'static str> {
    SERIALIZED_NAMES
        .iter()
        .find(|(id, _)| *id == identity)
        .map(|(_, name)| *name)
}

/// Identity for a serialized name.
pub fn identity_for(name: &str) -> Option<HandlerIdentity> {
    SERIALIZED_NAMES
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lookup_both_ways() {
        let id = HandlerIdentity::CommandClass(CommandClassId::SCENE_ACTUATOR_CONF);
        assert_eq!(serialized_name(id), Some("COMMAND_CLASS_SCENE_ACTUATOR_CONF"));
        assert_eq!(identity_for("COMMAND_CLASS_SCENE_ACTUATOR_CONF"), Some(id));
        assert_eq!(identity_for("COMMAND_CLASS_NOPE"), None);
        assert_eq!(
            serialized_name(HandlerIdentity::CommandClass(CommandClassId(0xEE))),
            None
        );
    }

    #[test]
    fn test_table_is_one_to_one() {
        let ids: HashSet<_> = SERIALIZED_NAMES.iter().map(|(id, _)| *id).collect();
        let names: HashSet<_> = SERIALIZED_NAMES.iter().map(|(_, n)| *n).collect();
        assert_eq!(ids.len(), SERIALIZED_NAMES.len());
        assert_eq!(names.len(), SERIALIZED_NAMES.len());
    }
}
