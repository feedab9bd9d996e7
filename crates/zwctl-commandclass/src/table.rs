//! Declarative subcommand tables.
//!
//! A command class is described by data: the state slots it caches and, for
//! every response subcommand it understands, the fields to decode and the slot
//! each field writes. Adding a subcommand means adding a table row.

use zwctl_protocol::{HandlerIdentity, ProtocolError, SubcommandTag};

/// What a state slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Boolean capability or state flag.
    Flag,
    /// Unsigned integer value.
    Value,
}

/// A named state slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDef {
    /// Name used in snapshots and diagnostics.
    pub name: &'static str,
    /// Kind of value stored.
    pub kind: SlotKind,
}

impl SlotDef {
    /// Declare a flag slot.
    pub const fn flag(name: &'static str) -> Self {
        SlotDef {
            name,
            kind: SlotKind::Flag,
        }
    }

    /// Declare an integer slot.
    pub const fn value(name: &'static str) -> Self {
        SlotDef {
            name,
            kind: SlotKind::Value,
        }
    }
}

/// How a response field is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `byte & mask != 0`.
    Flag {
        /// Bit mask applied to the byte.
        mask: u8,
    },
    /// `byte != 0`.
    Bool,
    /// Unsigned big-endian integer of `width` bytes.
    Uint {
        /// Field width in bytes.
        width: usize,
    },
}

impl FieldKind {
    /// Number of payload bytes the field occupies.
    pub const fn width(&self) -> usize {
        match self {
            FieldKind::Flag { .. } | FieldKind::Bool => 1,
            FieldKind::Uint { width } => *width,
        }
    }
}

/// One decoded field: where it lives and which slot it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Index into the class's slot table.
    pub slot: usize,
    /// Byte offset in the response payload (the tag is at 0).
    pub offset: usize,
    /// Decoding rule.
    pub kind: FieldKind,
}

impl FieldDef {
    /// A masked flag at `offset`.
    pub const fn flag(slot: usize, offset: usize, mask: u8) -> Self {
        FieldDef {
            slot,
            offset,
            kind: FieldKind::Flag { mask },
        }
    }

    /// A boolean byte at `offset`.
    pub const fn bool(slot: usize, offset: usize) -> Self {
        FieldDef {
            slot,
            offset,
            kind: FieldKind::Bool,
        }
    }

    /// An unsigned integer of `width` bytes at `offset`.
    pub const fn uint(slot: usize, offset: usize, width: usize) -> Self {
        FieldDef {
            slot,
            offset,
            kind: FieldKind::Uint { width },
        }
    }

    /// First offset past the field.
    pub const fn end(&self) -> usize {
        self.offset + self.kind.width()
    }
}

/// A response subcommand the class understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubcommandDef {
    /// Tag at offset 0.
    pub tag: SubcommandTag,
    /// Name used in diagnostics.
    pub name: &'static str,
    /// Fields decoded from the response.
    pub fields: &'static [FieldDef],
}

impl SubcommandDef {
    /// Minimum response length this subcommand needs, tag included.
    pub fn min_len(&self) -> usize {
        self.fields
            .iter()
            .map(FieldDef::end)
            .max()
            .unwrap_or(1)
            .max(1)
    }
}

/// Complete description of a subcommand-multiplexed class.
#[derive(Debug)]
pub struct CommandClassDef {
    /// Routing identity.
    pub identity: HandlerIdentity,
    /// Handler name (snake case, used in logs and metric labels).
    pub name: &'static str,
    /// Cached state slots.
    pub slots: &'static [SlotDef],
    /// Response subcommands.
    pub subcommands: &'static [SubcommandDef],
}

impl CommandClassDef {
    /// Look up a response subcommand by tag.
    pub fn subcommand(&self, tag: SubcommandTag) -> Option<&'static SubcommandDef> {
        self.subcommands.iter().find(|def| def.tag == tag)
    }

    /// Look up a response subcommand, failing with
    /// [`ProtocolError::UnknownSubcommand`] for tags the class does not know.
    pub fn lookup(&self, tag: SubcommandTag) -> Result<&'static SubcommandDef, ProtocolError> {
        self.subcommand(tag).ok_or(ProtocolError::UnknownSubcommand(tag.value()))
    }
}
