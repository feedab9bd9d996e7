//! Protocol constants
//!
//! These constants define the frame markers, serial message classes, command
//! class codes and subcommand values used by the controller's serial API.

// ============================================================================
// Frame Markers
// ============================================================================

/// Start of a data frame.
pub const SOF: u8 = 0x01;
/// Frame acknowledged.
pub const ACK: u8 = 0x06;
/// Frame rejected.
pub const NAK: u8 = 0x15;
/// Frame dropped (collision).
pub const CAN: u8 = 0x18;

/// Frame type for host → controller requests.
pub const FRAME_TYPE_REQUEST: u8 = 0x00;
/// Frame type for controller → host responses.
pub const FRAME_TYPE_RESPONSE: u8 = 0x01;

/// Initial value for the frame checksum.
pub const CHECKSUM_SEED: u8 = 0xFF;

// ============================================================================
// Serial Message Classes (function ids)
// ============================================================================

/// Get controller capabilities.
pub const FUNC_SERIAL_API_GET_CAPABILITIES: u8 = 0x07;
/// Serial API setup (subcommand multiplexed).
pub const FUNC_SERIAL_API_SETUP: u8 = 0x0B;
/// Application command handler (inbound command class frames).
pub const FUNC_APPLICATION_COMMAND_HANDLER: u8 = 0x04;
/// Send data to a node.
pub const FUNC_SEND_DATA: u8 = 0x13;
/// Get library version.
pub const FUNC_GET_VERSION: u8 = 0x15;

// ============================================================================
// Command Classes
// ============================================================================

/// Basic command class.
pub const COMMAND_CLASS_BASIC: u8 = 0x20;
/// Scene activation command class.
pub const COMMAND_CLASS_SCENE_ACTIVATION: u8 = 0x2B;
/// Scene actuator configuration command class.
pub const COMMAND_CLASS_SCENE_ACTUATOR_CONF: u8 = 0x2C;
/// Configuration command class.
pub const COMMAND_CLASS_CONFIGURATION: u8 = 0x70;

// ============================================================================
// Setup API Subcommands
// ============================================================================

/// Query which setup subcommands the controller supports.
pub const SETUPAPI_SUBCMD_QUERY: u8 = 0x01;
/// Enable or disable transmit status reports.
pub const SETUPAPI_SUBCMD_TXREPORT: u8 = 0x02;

/// Bit in the query response marking transmit report support.
pub const SETUPAPI_FLAG_TXREPORT: u8 = 0x02;

// ============================================================================
// Scene Actuator Configuration Subcommands
// ============================================================================

/// Configure the level a scene applies.
pub const SCENE_ACTUATOR_CONF_SET: u8 = 0x01;
/// Request the configuration of a scene.
pub const SCENE_ACTUATOR_CONF_GET: u8 = 0x02;
/// Scene configuration report.
pub const SCENE_ACTUATOR_CONF_REPORT: u8 = 0x03;

/// Override bit in the set request (use the supplied level).
pub const SCENE_ACTUATOR_CONF_FLAG_OVERRIDE: u8 = 0x80;

// ============================================================================
// Sizes
// ============================================================================

/// Maximum payload carried in one data frame.
pub const MAX_PAYLOAD_SIZE: usize = 250;
/// Largest field width the codec decodes.
pub const MAX_FIELD_WIDTH: usize = 4;
