//! Game engine: the headless core of the game.
//!
//! `GameEngine` owns the round model, the cross-round cosmos, the active turn
//! state and the seeded RNG. It runs the state callbacks, routes input and
//! produces `GameSnapshot`s. Time is passed in by the caller, so a test can
//! drive a whole game on a virtual clock and get the same result every run.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use salvo_core::commands::InputEvent;
use salvo_core::enums::StateId;
use salvo_core::events::GameEvent;
use salvo_core::state::GameSnapshot;

use crate::brain::{Brain, EasyBrain};
use crate::config::GameConfig;
use crate::cosmos::Cosmos;
use crate::error::{SaveError, SimError};
use crate::model::Model;
use crate::player::Player;
use crate::projectile::Projectile;
use crate::save::SaveMap;
use crate::states::{BlockingDelay, GameState, StateContext, Transition, TurnStart};

/// What the controller should do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The state stayed put; sleep for at most this long.
    Wait(BlockingDelay),
    /// A transition happened; step again right away.
    Continue,
    GameOver,
}

pub struct GameEngine {
    config: GameConfig,
    model: Model,
    cosmos: Cosmos,
    state: GameState,
    /// Whether `on_enter` has run for `state`.
    entered: bool,
    finished: bool,
    rng: ChaCha8Rng,
    brain: Box<dyn Brain>,
    events: Vec<GameEvent>,
}

impl GameEngine {
    /// Start a new game at round one.
    pub fn new(config: GameConfig) -> Result<Self, SimError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let cosmos = Cosmos::new(config.num_players(), config.total_rounds, config.starting_cash);
        let model = Model::for_round(&config, 1, &mut rng);
        let round = cosmos.round_info();
        info!(
            seed = config.seed,
            players = config.num_players(),
            rounds = round.total_rounds,
            "new game"
        );
        Ok(Self {
            config,
            model,
            cosmos,
            state: GameState::TurnStart(TurnStart::new()),
            entered: false,
            finished: false,
            rng,
            brain: Box::new(EasyBrain::default()),
            events: vec![GameEvent::RoundStarted {
                round: round.round,
                total_rounds: round.total_rounds,
            }],
        })
    }

    /// Replace the computer opponents' brain.
    pub fn with_brain(mut self, brain: Box<dyn Brain>) -> Self {
        self.brain = brain;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn cosmos(&self) -> &Cosmos {
        &self.cosmos
    }

    /// Mutable cosmos access for tests that need to stock an armory.
    #[cfg(test)]
    pub(crate) fn cosmos_mut(&mut self) -> &mut Cosmos {
        &mut self.cosmos
    }

    pub fn state_id(&self) -> StateId {
        self.state.id()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Run `f` against the active state with a fresh context.
    fn with_state<R>(
        &mut self,
        now_ms: u64,
        f: impl FnOnce(&mut GameState, &mut StateContext<'_>) -> R,
    ) -> R {
        let mut ctx = StateContext {
            model: &mut self.model,
            cosmos: &mut self.cosmos,
            config: &self.config,
            brain: self.brain.as_ref(),
            rng: &mut self.rng,
            events: &mut self.events,
            now_ms,
        };
        f(&mut self.state, &mut ctx)
    }

    /// Advance the state machine once at time `now_ms`.
    ///
    /// Enters the active state if needed, runs its `main`, and on a
    /// transition runs `on_exit` and installs the next state.
    pub fn step(&mut self, now_ms: u64) -> Result<StepOutcome, SimError> {
        if self.finished {
            return Ok(StepOutcome::GameOver);
        }
        if !self.entered {
            self.with_state(now_ms, |state, ctx| state.on_enter(ctx))?;
            self.entered = true;
        }
        match self.with_state(now_ms, |state, ctx| state.main(ctx))? {
            Transition::Stay => Ok(StepOutcome::Wait(self.state.blocking_delay()?)),
            Transition::Next(next) => {
                self.with_state(now_ms, |state, ctx| state.on_exit(ctx))?;
                let (from, to) = (self.state.id(), next.id());
                if matches!(to, StateId::TurnStart) {
                    debug!(?from, ?to, "state transition");
                } else {
                    info!(?from, ?to, now_ms, "state transition");
                }
                self.state = next;
                self.entered = false;
                Ok(StepOutcome::Continue)
            }
            Transition::GameOver => {
                self.with_state(now_ms, |state, ctx| state.on_exit(ctx))?;
                info!(now_ms, "game over");
                self.finished = true;
                Ok(StepOutcome::GameOver)
            }
        }
    }

    /// Route `input` to the active state. Returns true if the controller
    /// should be woken.
    pub fn handle_input(&mut self, input: InputEvent, now_ms: u64) -> Result<bool, SimError> {
        if self.finished || !self.entered {
            return Ok(false);
        }
        self.with_state(now_ms, |state, ctx| state.on_input(ctx, input))
    }

    /// Build the render view and drain pending events.
    pub fn snapshot(&mut self, now_ms: u64) -> GameSnapshot {
        let leaderboard = if self.state.shows_leaderboard() {
            self.cosmos.leaderboard(self.model.players())
        } else {
            Vec::new()
        };
        GameSnapshot {
            state: self.state.id(),
            round: self.cosmos.round_info(),
            wind: self.model.wind(),
            current_player: self.model.current_player(),
            terrain: self.model.terrain().heights().to_vec(),
            players: self.model.players().iter().map(Player::view).collect(),
            projectiles: self.state.projectiles().iter().map(Projectile::view).collect(),
            explosions: self
                .state
                .explosions()
                .iter()
                .map(|e| e.view(now_ms))
                .collect(),
            power_bar: self.state.power_bar(now_ms),
            leaderboard,
            events: std::mem::take(&mut self.events),
            game_over: self.finished,
        }
    }

    /// Record everything needed to rebuild this engine.
    pub fn save(&self) -> Result<SaveMap, SaveError> {
        let mut map = SaveMap::new();
        self.state.save(&mut map)?;
        self.model.save(&mut map)?;
        self.cosmos.save(&mut map)?;
        map.put("rng_seed", self.rng.get_seed())?;
        map.put("rng_word_pos", self.rng.get_word_pos().to_string())?;
        map.put("game_over", self.finished)?;
        Ok(map)
    }

    /// Rebuild an engine from `map`. The saved state is entered afresh on
    /// the next step.
    ///
    /// Brains are code, not data, so none is saved: the restored engine
    /// plays computers with `EasyBrain`. Chain `with_brain` to put a custom
    /// brain back.
    pub fn restore(config: GameConfig, map: &SaveMap) -> Result<Self, SimError> {
        config.validate()?;
        let model = Model::restore(map, &config)?;
        let cosmos = Cosmos::restore(map, config.num_players())?;
        let state = GameState::restore(map)?;

        let seed: [u8; 32] = map.get("rng_seed")?;
        let word_pos: String = map.get("rng_word_pos")?;
        let word_pos: u128 = word_pos.parse().map_err(|e| SaveError::BadValue {
            key: "rng_word_pos".into(),
            reason: format!("{e}"),
        })?;
        let mut rng = ChaCha8Rng::from_seed(seed);
        rng.set_word_pos(word_pos);

        let finished = map.get_opt("game_over")?.unwrap_or(false);
        info!(state = ?state.id(), round = cosmos.round_info().round, "game restored");
        Ok(Self {
            config,
            model,
            cosmos,
            state,
            entered: false,
            finished,
            rng,
            brain: Box::new(EasyBrain::default()),
            events: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use salvo_core::enums::{GameButton, PlayerColor, PlayerKind, WeaponKind};

    use crate::brain::Move;
    use crate::config::PlayerConfig;
    use crate::weapons::Armory;

    /// Always lobs a small missile at 77 degrees.
    struct SteadyBrain;

    impl Brain for SteadyBrain {
        fn plan_move(&self, _model: &Model, _armory: &Armory, _rng: &mut dyn RngCore) -> Move {
            Move {
                angle_deg: 77,
                power: 600,
                weapon: WeaponKind::SmallMissile,
            }
        }
    }

    fn human_vs_computer() -> GameConfig {
        GameConfig {
            players: vec![
                PlayerConfig::new("Alice", PlayerKind::Human, PlayerColor::Red),
                PlayerConfig::new("Bot", PlayerKind::Computer, PlayerColor::Blue),
            ],
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_new_game_starts_at_turn_start() {
        let mut engine = GameEngine::new(human_vs_computer()).unwrap();
        assert_eq!(engine.state_id(), StateId::TurnStart);
        let snap = engine.snapshot(0);
        assert_eq!(snap.round.round, 1);
        assert!(matches!(
            snap.events.first(),
            Some(GameEvent::RoundStarted { round: 1, .. })
        ));
        assert!(engine.snapshot(0).events.is_empty(), "events are drained");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = human_vs_computer();
        config.players.truncate(1);
        assert!(matches!(GameEngine::new(config), Err(SimError::Config(_))));
    }

    #[test]
    fn test_first_turn_goes_to_human() {
        let mut engine = GameEngine::new(human_vs_computer()).unwrap();
        assert_eq!(engine.step(0).unwrap(), StepOutcome::Continue);
        assert_eq!(engine.state_id(), StateId::HumanMove);
        assert_eq!(
            engine.step(0).unwrap(),
            StepOutcome::Wait(BlockingDelay::Indefinite)
        );
    }

    #[test]
    fn test_input_ignored_before_enter() {
        let mut engine = GameEngine::new(human_vs_computer()).unwrap();
        engine.step(0).unwrap();
        let input = InputEvent::SetAngle { degrees: 90 };
        assert!(!engine.handle_input(input, 0).unwrap(), "HumanMove not entered yet");
        engine.step(0).unwrap();
        assert!(engine.handle_input(input, 0).unwrap());
        assert_eq!(engine.model().current().angle_deg(), 90);
    }

    #[test]
    fn test_fire_launches_ballistics() {
        let mut engine = GameEngine::new(human_vs_computer()).unwrap();
        engine.step(0).unwrap();
        engine.step(0).unwrap();
        let press = InputEvent::Button {
            button: GameButton::PressFire,
        };
        let release = InputEvent::Button {
            button: GameButton::ReleaseFire,
        };
        assert!(engine.handle_input(press, 10).unwrap());
        assert_eq!(engine.snapshot(1210).power_bar, Some(500));
        assert!(engine.handle_input(release, 1210).unwrap());
        assert_eq!(engine.step(1210).unwrap(), StepOutcome::Continue);
        assert_eq!(engine.state_id(), StateId::Ballistics);
        engine.step(1211).unwrap();
        let snap = engine.snapshot(1211);
        assert_eq!(snap.projectiles.len(), 1);
        assert!(snap
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Fired { power: 500, .. })));
    }

    #[test]
    fn test_restore_then_with_brain_keeps_custom_brain() {
        let config = GameConfig::computers_only(2, 3);
        let map = GameEngine::new(config.clone()).unwrap().save().unwrap();
        let mut engine = GameEngine::restore(config, &map)
            .unwrap()
            .with_brain(Box::new(SteadyBrain));
        assert_eq!(engine.step(0).unwrap(), StepOutcome::Continue);
        match &engine.state {
            GameState::ComputerMove(mv) => assert_eq!(mv.plan().angle_deg, 77),
            other => panic!("expected a computer move, got {:?}", other.id()),
        }
    }
}
