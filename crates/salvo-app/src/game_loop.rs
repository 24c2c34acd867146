//! Controller thread: steps the engine and sleeps between steps.
//!
//! The engine lives behind one `parking_lot::Mutex`. Between steps the
//! thread waits on a condition variable for the active state's blocking
//! delay, or indefinitely when the state only reacts to input. Input
//! producers notify it through `ControllerHandle::send_input`.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, error, info};

use salvo_sim::{BlockingDelay, GameEngine, StepOutcome};

use crate::state::{ControllerHandle, Shared};

/// Owns the controller thread. Dropping it terminates the thread.
pub struct Controller {
    handle: ControllerHandle,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    /// Spawn the controller thread for `engine`.
    pub fn spawn(engine: GameEngine) -> std::io::Result<Self> {
        let shared = Arc::new(Shared::new(engine));
        let thread_shared = Arc::clone(&shared);
        let thread = std::thread::Builder::new()
            .name("salvo-controller".into())
            .spawn(move || run_controller(&thread_shared))?;
        info!("controller started");
        Ok(Self {
            handle: ControllerHandle { shared },
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> ControllerHandle {
        self.handle.clone()
    }

    /// Stop stepping at the next cancellation point.
    pub fn pause(&self) {
        self.handle.shared.state.lock().stop_requested = true;
        self.handle.shared.wake.notify_all();
        debug!("controller paused");
    }

    pub fn resume(&self) {
        self.handle.shared.state.lock().stop_requested = false;
        self.handle.shared.wake.notify_all();
        debug!("controller resumed");
    }

    /// Ask the thread to exit and wait for it.
    pub fn terminate(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        self.handle.shared.state.lock().terminate_requested = true;
        self.handle.shared.wake.notify_all();
        if thread.join().is_err() {
            error!("controller thread panicked");
        }
        info!("controller terminated");
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// The controller loop. Runs until terminate is requested.
fn run_controller(shared: &Shared) {
    let mut state = shared.state.lock();
    loop {
        if state.terminate_requested {
            return;
        }
        if state.stop_requested {
            shared.wake.wait(&mut state);
            continue;
        }

        let now = shared.now_ms();
        match state.engine.step(now) {
            Ok(StepOutcome::Continue) => {}
            Ok(StepOutcome::Wait(BlockingDelay::Millis(ms))) => {
                shared.wake.wait_for(&mut state, Duration::from_millis(ms));
            }
            Ok(StepOutcome::Wait(BlockingDelay::Indefinite)) => {
                shared.wake.wait(&mut state);
            }
            Ok(StepOutcome::GameOver) => {
                info!("game over, controller idling");
                state.stop_requested = true;
            }
            Err(err) => {
                error!(
                    error = %err,
                    state = ?state.engine.state_id(),
                    "engine step failed, stopping controller"
                );
                state.last_error = Some(err.to_string());
                state.stop_requested = true;
            }
        }
    }
}
