//! Scripted stand-in for a human at the keyboard, and a headless runner
//! that plays whole games on a virtual clock.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use salvo_core::commands::InputEvent;
use salvo_core::enums::{GameButton, PlayerKind, StateId, WeaponKind};
use salvo_core::events::GameEvent;
use salvo_core::state::{GameSnapshot, LeaderboardEntry};
use salvo_sim::error::SimError;
use salvo_sim::weapons::spec;
use salvo_sim::{BlockingDelay, GameEngine, StepOutcome};

/// Plays human seats with random aim and charge times.
#[derive(Debug)]
pub struct Autopilot {
    rng: ChaCha8Rng,
    release_at: Option<u64>,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            release_at: None,
        }
    }

    /// Fire release that has come due, if any.
    pub fn due(&mut self, now_ms: u64) -> Option<InputEvent> {
        match self.release_at {
            Some(at) if now_ms >= at => {
                self.release_at = None;
                Some(button(GameButton::ReleaseFire))
            }
            _ => None,
        }
    }

    /// Inputs for a state that is waiting on the player.
    pub fn on_idle(&mut self, snap: &GameSnapshot, now_ms: u64) -> Vec<InputEvent> {
        match snap.state {
            StateId::HumanMove if self.release_at.is_none() && snap.power_bar.is_none() => {
                self.take_shot(snap, now_ms)
            }
            StateId::BuyWeapons => {
                let mut inputs = self.shop(snap);
                inputs.push(button(GameButton::Done));
                inputs
            }
            StateId::Leaderboard | StateId::AnnounceWinner => vec![button(GameButton::Ok)],
            _ => Vec::new(),
        }
    }

    fn take_shot(&mut self, snap: &GameSnapshot, now_ms: u64) -> Vec<InputEvent> {
        let Some(me) = snap.players.get(snap.current_player) else {
            return Vec::new();
        };
        if !spec(me.weapon).is_projectile() {
            // Specials trigger on release.
            return vec![button(GameButton::ReleaseFire)];
        }
        let degrees = self.rng.gen_range(20..=160);
        let hold_ms = self.rng.gen_range(400..=2400);
        self.release_at = Some(now_ms + hold_ms);
        debug!(player = me.id, degrees, hold_ms, "autopilot shot");
        vec![
            InputEvent::SetAngle { degrees },
            button(GameButton::PressFire),
        ]
    }

    /// One random affordable purchase per human seat.
    fn shop(&mut self, snap: &GameSnapshot) -> Vec<InputEvent> {
        let mut inputs = Vec::new();
        for player in snap.players.iter().filter(|p| p.kind == PlayerKind::Human) {
            let Some(entry) = snap.leaderboard.iter().find(|e| e.player == player.id) else {
                continue;
            };
            let affordable: Vec<WeaponKind> = WeaponKind::ALL
                .iter()
                .copied()
                .filter(|&k| {
                    let s = spec(k);
                    s.is_selectable() && s.price > 0 && s.price <= entry.earnings
                })
                .collect();
            if affordable.is_empty() {
                continue;
            }
            let kind = affordable[self.rng.gen_range(0..affordable.len())];
            inputs.push(InputEvent::Buy {
                player: player.id,
                kind,
            });
        }
        inputs
    }
}

fn button(button: GameButton) -> InputEvent {
    InputEvent::Button { button }
}

/// Summary of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessReport {
    pub finished: bool,
    pub ticks: u64,
    pub virtual_ms: u64,
    pub rounds_played: u32,
    pub winner: Option<usize>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Play `engine` on a virtual clock until it finishes or `max_ticks` steps
/// have run. Waits never sleep: the clock jumps ahead instead.
pub fn run_headless(
    engine: &mut GameEngine,
    autopilot: &mut Autopilot,
    max_ticks: u64,
) -> Result<HeadlessReport, SimError> {
    let mut now = 0;
    let mut ticks = 0;
    let mut winner = None;
    let mut rounds_played = 0;

    while !engine.is_finished() && ticks < max_ticks {
        ticks += 1;
        if let Some(input) = autopilot.due(now) {
            engine.handle_input(input, now)?;
        }
        let outcome = engine.step(now)?;
        let snap = engine.snapshot(now);
        for event in &snap.events {
            match event {
                GameEvent::RoundOver { winner: round_winner } => {
                    rounds_played += 1;
                    info!(round = snap.round.round, ?round_winner, "round over");
                }
                GameEvent::GameOver { winner: w } => winner = *w,
                other => debug!(?other, "event"),
            }
        }
        match outcome {
            StepOutcome::Wait(BlockingDelay::Millis(ms)) => now += ms,
            StepOutcome::Wait(BlockingDelay::Indefinite) => {
                for input in autopilot.on_idle(&snap, now) {
                    engine.handle_input(input, now)?;
                }
                now += 1;
            }
            StepOutcome::Continue | StepOutcome::GameOver => {}
        }
    }

    Ok(HeadlessReport {
        finished: engine.is_finished(),
        ticks,
        virtual_ms: now,
        rounds_played,
        winner,
        leaderboard: engine.cosmos().leaderboard(engine.model().players()),
    })
}
