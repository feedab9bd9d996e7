//! Capability state cache.
//!
//! One atomic per slot: readers on any thread see either the previous or the
//! new value of a slot, never a torn one. There is no cross-slot atomicity, so
//! a reader may see one slot of a response updated and another still stale.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

use serde::{Deserialize, Serialize};
use zwctl_protocol::SubcommandTag;

use crate::table::{SlotDef, SlotKind};

const NO_SUBCOMMAND: u16 = u16::MAX;

/// Cached values decoded from responses.
///
/// Written only by the dispatcher. Until a slot's subcommand has been decoded
/// at least once the slot reads as `0`/`false` and [`is_known`](Self::is_known)
/// returns `false`.
#[derive(Debug)]
pub struct CapabilityState {
    slots: &'static [SlotDef],
    values: Box<[AtomicU32]>,
    known: Box<[AtomicBool]>,
    last_subcommand: AtomicU16,
}

impl CapabilityState {
    /// Create an empty cache for the given slot table.
    pub fn new(slots: &'static [SlotDef]) -> Self {
        CapabilityState {
            slots,
            values: slots.iter().map(|_| AtomicU32::new(0)).collect(),
            known: slots.iter().map(|_| AtomicBool::new(false)).collect(),
            last_subcommand: AtomicU16::new(NO_SUBCOMMAND),
        }
    }

    /// Slot definitions backing this cache.
    pub fn slots(&self) -> &'static [SlotDef] {
        self.slots
    }

    /// Read a slot as a flag. Unknown or out-of-range slots read `false`.
    pub fn flag(&self, slot: usize) -> bool {
        self.value(slot) != 0
    }

    /// Read a slot as an integer. Unknown or out-of-range slots read `0`.
    pub fn value(&self, slot: usize) -> u32 {
        self.values
            .get(slot)
            .map_or(0, |value| value.load(Ordering::Acquire))
    }

    /// Read a slot, or `None` if it has never been decoded.
    pub fn get(&self, slot: usize) -> Option<u32> {
        if self.is_known(slot) {
            Some(self.value(slot))
        } else {
            None
        }
    }

    /// Whether the slot has been written by at least one decode.
    pub fn is_known(&self, slot: usize) -> bool {
        self.known
            .get(slot)
            .is_some_and(|known| known.load(Ordering::Acquire))
    }

    /// Tag of the last subcommand the dispatcher decoded.
    pub fn last_subcommand(&self) -> Option<SubcommandTag> {
        match self.last_subcommand.load(Ordering::Acquire) {
            NO_SUBCOMMAND => None,
            tag => Some(SubcommandTag(tag as u8)),
        }
    }

    /// Copy the current values into a serializable snapshot.
    ///
    /// Slots that have never been decoded are omitted.
    pub fn snapshot(&self) -> CapabilitySnapshot {
        let values = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, def)| {
                let value = self.get(index)?;
                let value = match def.kind {
                    SlotKind::Flag => SnapshotValue::Flag(value != 0),
                    SlotKind::Value => SnapshotValue::Value(value),
                };
                Some((def.name.to_string(), value))
            })
            .collect();

        CapabilitySnapshot {
            last_subcommand: self.last_subcommand().map(SubcommandTag::value),
            values,
        }
    }

    pub(crate) fn store(&self, slot: usize, value: u32) {
        if let (Some(cell), Some(known)) = (self.values.get(slot), self.known.get(slot)) {
            cell.store(value, Ordering::Release);
            known.store(true, Ordering::Release);
        }
    }

    pub(crate) fn set_last_subcommand(&self, tag: SubcommandTag) {
        self.last_subcommand
            .store(u16::from(tag.value()), Ordering::Release);
    }
}

/// A value in a [`CapabilitySnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotValue {
    /// Flag slot.
    Flag(bool),
    /// Integer slot.
    Value(u32),
}

/// Point-in-time copy of a handler's cached state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySnapshot {
    /// Last decoded subcommand tag.
    pub last_subcommand: Option<u8>,
    /// Decoded slots by name.
    pub values: BTreeMap<String, SnapshotValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOTS: &[SlotDef] = &[SlotDef::flag("supported"), SlotDef::value("level")];

    #[test]
    fn test_initial_state() {
        let state = CapabilityState::new(SLOTS);
        assert!(!state.flag(0));
        assert_eq!(state.value(1), 0);
        assert_eq!(state.get(0), None);
        assert!(!state.is_known(1));
        assert_eq!(state.last_subcommand(), None);
        assert_eq!(state.snapshot(), CapabilitySnapshot::default());
    }

    #[test]
    fn test_store_overwrites() {
        let state = CapabilityState::new(SLOTS);
        state.store(1, 42);
        assert_eq!(state.get(1), Some(42));
        state.store(1, 7);
        assert_eq!(state.get(1), Some(7));
        assert!(!state.is_known(0));
    }

    #[test]
    fn test_out_of_range_slot() {
        let state = CapabilityState::new(SLOTS);
        state.store(9, 1);
        assert_eq!(state.value(9), 0);
        assert!(!state.is_known(9));
    }

    #[test]
    fn test_last_subcommand() {
        let state = CapabilityState::new(SLOTS);
        state.set_last_subcommand(SubcommandTag(0x01));
        state.set_last_subcommand(SubcommandTag(0xFF));
        assert_eq!(state.last_subcommand(), Some(SubcommandTag(0xFF)));
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = CapabilityState::new(SLOTS);
        state.store(0, 1);
        state.set_last_subcommand(SubcommandTag(0x01));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.values.get("supported"), Some(&SnapshotValue::Flag(true)));
        assert!(!snapshot.values.contains_key("level"));

        let json = serde_json::to_string(&snapshot).expect("serialize");
        assert_eq!(json, r#"{"last_subcommand":1,"values":{"supported":true}}"#);
        let back: CapabilitySnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, snapshot);
    }
}
