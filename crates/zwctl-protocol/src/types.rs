//! Common types used in the protocol.

use crate::constants::*;
use std::fmt;

/// Subcommand identifier, unique within one command class.
///
/// Always carried at offset 0 of the request and response payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubcommandTag(pub u8);

impl SubcommandTag {
    /// Create a tag from its wire value.
    pub const fn new(value: u8) -> Self {
        SubcommandTag(value)
    }

    /// Get the wire value.
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for SubcommandTag {
    fn from(value: u8) -> Self {
        SubcommandTag(value)
    }
}

impl From<SubcommandTag> for u8 {
    fn from(tag: SubcommandTag) -> Self {
        tag.0
    }
}

impl fmt::Display for SubcommandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Command class code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandClassId(pub u8);

impl CommandClassId {
    /// Basic command class.
    pub const BASIC: CommandClassId = CommandClassId(COMMAND_CLASS_BASIC);
    /// Scene activation command class.
    pub const SCENE_ACTIVATION: CommandClassId = CommandClassId(COMMAND_CLASS_SCENE_ACTIVATION);
    /// Scene actuator configuration command class.
    pub const SCENE_ACTUATOR_CONF: CommandClassId =
        CommandClassId(COMMAND_CLASS_SCENE_ACTUATOR_CONF);
    /// Configuration command class.
    pub const CONFIGURATION: CommandClassId = CommandClassId(COMMAND_CLASS_CONFIGURATION);

    /// Get the wire value.
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CommandClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Serial message class (function id) of a controller frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerialMessageClass {
    /// Inbound command class frame from a node.
    ApplicationCommandHandler,
    /// Controller capabilities.
    SerialApiGetCapabilities,
    /// Serial API setup.
    SetupApi,
    /// Send data to a node.
    SendData,
    /// Library version.
    GetVersion,
    /// Any other function id.
    Other(u8),
}

impl SerialMessageClass {
    /// Get the function id.
    pub const fn code(self) -> u8 {
        match self {
            SerialMessageClass::ApplicationCommandHandler => FUNC_APPLICATION_COMMAND_HANDLER,
            SerialMessageClass::SerialApiGetCapabilities => FUNC_SERIAL_API_GET_CAPABILITIES,
            SerialMessageClass::SetupApi => FUNC_SERIAL_API_SETUP,
            SerialMessageClass::SendData => FUNC_SEND_DATA,
            SerialMessageClass::GetVersion => FUNC_GET_VERSION,
            SerialMessageClass::Other(code) => code,
        }
    }
}

impl From<u8> for SerialMessageClass {
    fn from(code: u8) -> Self {
        match code {
            FUNC_APPLICATION_COMMAND_HANDLER => SerialMessageClass::ApplicationCommandHandler,
            FUNC_SERIAL_API_GET_CAPABILITIES => SerialMessageClass::SerialApiGetCapabilities,
            FUNC_SERIAL_API_SETUP => SerialMessageClass::SetupApi,
            FUNC_SEND_DATA => SerialMessageClass::SendData,
            FUNC_GET_VERSION => SerialMessageClass::GetVersion,
            _ => SerialMessageClass::Other(code),
        }
    }
}

impl From<SerialMessageClass> for u8 {
    fn from(class: SerialMessageClass) -> Self {
        class.code()
    }
}

impl fmt::Display for SerialMessageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialMessageClass::ApplicationCommandHandler => write!(f, "ApplicationCommandHandler"),
            SerialMessageClass::SerialApiGetCapabilities => write!(f, "SerialApiGetCapabilities"),
            SerialMessageClass::SetupApi => write!(f, "SetupApi"),
            SerialMessageClass::SendData => write!(f, "SendData"),
            SerialMessageClass::GetVersion => write!(f, "GetVersion"),
            SerialMessageClass::Other(code) => write!(f, "Other(0x{:02X})", code),
        }
    }
}

/// Identity a handler is routed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerIdentity {
    /// Handler for a controller-level serial API message class.
    SerialApi(SerialMessageClass),
    /// Handler for a node command class.
    CommandClass(CommandClassId),
}

impl fmt::Display for HandlerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerIdentity::SerialApi(class) => write!(f, "serial-api:{}", class),
            HandlerIdentity::CommandClass(id) => write!(f, "command-class:{}", id),
        }
    }
}

/// Node identifier on the mesh (1..=232).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u8);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Endpoint on a node (0 = root device).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EndpointId(pub u8);

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Format bytes as a hex string (for logging).
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect::<Vec<_>>().join(" ")
}
