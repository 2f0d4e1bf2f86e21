// ============================================================================
// Module : controller
// ============================================================================
// Sampling controller : timer + fetch (sampler) et état observable (state)
// ============================================================================

pub mod sampler; // Tâche timer et cycles de fetch
pub mod state;   // ControllerState et ControllerEvent

pub use sampler::{settle_cycle, spawn_sampler, SamplerHandle, MIN_PERIOD};
pub use state::{ControllerEvent, ControllerState};
