use std::sync::Arc;

use taskforce_core::AssignmentEngine;
use taskforce_store::MemoryStore;

#[derive(Clone)]
pub struct ApiState {
    pub engine: AssignmentEngine,
    pub store: Arc<MemoryStore>,
}
