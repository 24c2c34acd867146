//! State shared between the controller thread and input producers.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Condvar, Mutex};

use salvo_core::commands::InputEvent;
use salvo_core::enums::StateId;
use salvo_core::state::GameSnapshot;
use salvo_sim::error::{SaveError, SimError};
use salvo_sim::{GameEngine, SaveMap};

/// Everything guarded by the controller lock.
pub(crate) struct SharedState {
    pub engine: GameEngine,
    /// The loop idles while set.
    pub stop_requested: bool,
    /// The loop exits at its next check.
    pub terminate_requested: bool,
    /// Set when an engine step fails; the loop stops after recording it.
    pub last_error: Option<String>,
}

pub(crate) struct Shared {
    pub state: Mutex<SharedState>,
    pub wake: Condvar,
    epoch: Instant,
}

impl Shared {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            state: Mutex::new(SharedState {
                engine,
                stop_requested: false,
                terminate_requested: false,
                last_error: None,
            }),
            wake: Condvar::new(),
            epoch: Instant::now(),
        }
    }

    /// Milliseconds since the controller was created.
    pub fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

/// Cheap, cloneable access to a running controller.
///
/// Input goes through the same lock the controller steps under, so a
/// handler never races a state transition.
#[derive(Clone)]
pub struct ControllerHandle {
    pub(crate) shared: Arc<Shared>,
}

impl ControllerHandle {
    /// Run the active state's input handler. The controller is woken only
    /// when the handler asks for it.
    pub fn send_input(&self, input: InputEvent) -> Result<bool, SimError> {
        let now = self.shared.now_ms();
        let wake = self.shared.state.lock().engine.handle_input(input, now)?;
        if wake {
            self.shared.wake.notify_all();
        }
        Ok(wake)
    }

    /// Current render view. Pending events are drained into it.
    pub fn snapshot(&self) -> GameSnapshot {
        let now = self.shared.now_ms();
        self.shared.state.lock().engine.snapshot(now)
    }

    pub fn state_id(&self) -> StateId {
        self.shared.state.lock().engine.state_id()
    }

    pub fn is_finished(&self) -> bool {
        self.shared.state.lock().engine.is_finished()
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.state.lock().stop_requested
    }

    /// The error that stopped the controller, if any.
    pub fn last_error(&self) -> Option<String> {
        self.shared.state.lock().last_error.clone()
    }

    pub fn save(&self) -> Result<SaveMap, SaveError> {
        self.shared.state.lock().engine.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salvo_sim::GameConfig;

    #[test]
    fn test_handle_before_first_step() {
        let engine = GameEngine::new(GameConfig::default()).unwrap();
        let handle = ControllerHandle {
            shared: Arc::new(Shared::new(engine)),
        };
        assert_eq!(handle.state_id(), StateId::TurnStart);
        assert!(!handle.is_finished());
        assert!(!handle.is_stopped());
        assert!(handle.last_error().is_none());
        let woke = handle
            .send_input(InputEvent::SetAngle { degrees: 90 })
            .unwrap();
        assert!(!woke, "input before the first state is entered is ignored");
    }
}
