//! Concrete command-class handlers.

mod scene_actuator_conf;
mod setup_api;

pub use scene_actuator_conf::*;
pub use setup_api::*;

use zwctl_protocol::HandlerIdentity;

use crate::adapter::TransactionAdapter;
use crate::state::CapabilitySnapshot;
use crate::transaction::Transaction;

/// Common surface of every handler, for registries that hold them by identity.
pub trait CommandClassHandler: Send + Sync {
    /// The adapter binding this handler to its node.
    fn adapter(&self) -> &TransactionAdapter;

    /// Routing identity.
    fn identity(&self) -> HandlerIdentity {
        self.adapter().identity()
    }

    /// Transport callback for a response belonging to this handler.
    fn on_response(&self, transaction: &dyn Transaction, raw: &[u8]) -> bool {
        self.adapter().on_response(transaction, raw)
    }

    /// Current cached state.
    fn snapshot(&self) -> CapabilitySnapshot {
        self.adapter().state().snapshot()
    }
}
