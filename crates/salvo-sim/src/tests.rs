//! Tests for the engine, the turn state machine, and save/restore.

use glam::Vec2;

use salvo_core::commands::InputEvent;
use salvo_core::enums::*;
use salvo_core::events::GameEvent;
use salvo_terrain::Terrain;

use crate::config::{GameConfig, PlayerConfig};
use crate::engine::{GameEngine, StepOutcome};
use crate::model::{Model, NextTurn};
use crate::player::Player;
use crate::projectile::Projectile;
use crate::save::SaveMap;
use crate::states::BlockingDelay;
use crate::weapons::{Armory, Stock};

fn button(button: GameButton) -> InputEvent {
    InputEvent::Button { button }
}

/// Step once on a virtual clock. Indefinite waits are answered with OK so
/// computer-only games run to the end.
fn tick(engine: &mut GameEngine, now: &mut u64) -> StepOutcome {
    let outcome = engine.step(*now).unwrap();
    match outcome {
        StepOutcome::Wait(BlockingDelay::Millis(ms)) => *now += ms.max(1),
        StepOutcome::Wait(BlockingDelay::Indefinite) => {
            engine.handle_input(button(GameButton::Ok), *now).unwrap();
            engine.handle_input(button(GameButton::Done), *now).unwrap();
            *now += 1;
        }
        StepOutcome::Continue | StepOutcome::GameOver => {}
    }
    outcome
}

fn human_vs_computer(seed: u64) -> GameConfig {
    GameConfig {
        seed,
        players: vec![
            PlayerConfig::new("Alice", PlayerKind::Human, PlayerColor::Red),
            PlayerConfig::new("Bot", PlayerKind::Computer, PlayerColor::Green),
        ],
        ..GameConfig::default()
    }
}

fn snapshot_json(engine: &mut GameEngine, now: u64) -> serde_json::Value {
    serde_json::to_value(engine.snapshot(now)).unwrap()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut a = GameEngine::new(GameConfig::computers_only(3, 777)).unwrap();
    let mut b = GameEngine::new(GameConfig::computers_only(3, 777)).unwrap();
    let (mut now_a, mut now_b) = (0, 0);

    for i in 0..20_000 {
        let out_a = tick(&mut a, &mut now_a);
        let out_b = tick(&mut b, &mut now_b);
        assert_eq!(out_a, out_b, "outcomes diverged at step {i}");
        if i % 500 == 0 {
            assert_eq!(
                snapshot_json(&mut a, now_a),
                snapshot_json(&mut b, now_b),
                "snapshots diverged with same seed at step {i}"
            );
        }
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut a = GameEngine::new(GameConfig::computers_only(2, 1)).unwrap();
    let mut b = GameEngine::new(GameConfig::computers_only(2, 2)).unwrap();
    assert_ne!(
        a.snapshot(0).terrain,
        b.snapshot(0).terrain,
        "different seeds should give different terrain"
    );
}

// ---- Turn order ----

fn line_of_players(n: usize) -> Model {
    let terrain = Terrain::flat(200);
    let players = (0..n)
        .map(|i| {
            let mut p = Player::new(i, format!("P{i}"), PlayerKind::Computer, PlayerColor::ALL[i], 100);
            p.place(30 + 100 * i as i32, &terrain);
            p
        })
        .collect();
    Model::new(terrain, players, 0, 0)
}

#[test]
fn test_next_turn_info_win_and_draw() {
    let mut model = line_of_players(3);
    assert_eq!(model.next_turn_info(), NextTurn::Next(1));

    model.players_mut()[1].take_damage(500);
    model.players_mut()[2].take_damage(500);
    assert_eq!(model.next_turn_info(), NextTurn::Won(0), "one survivor wins");

    model.players_mut()[0].take_damage(500);
    assert_eq!(model.next_turn_info(), NextTurn::Draw, "nobody left is a draw");
}

// ---- Weapons ----

#[test]
fn test_armory_cycle_closes() {
    let armory = Armory::from_entries([
        (WeaponKind::SmallMissile, Stock::Unlimited),
        (WeaponKind::Doomhammer, Stock::Count(1)),
        (WeaponKind::Roller, Stock::Count(3)),
        (WeaponKind::Teleporter, Stock::Count(2)),
    ])
    .unwrap();
    let owned: Vec<WeaponKind> = armory.iter().map(|(k, _)| k).collect();

    for &start in &owned {
        let mut seen = vec![start];
        let mut cur = armory.next_weapon(start).unwrap();
        while cur != start {
            assert!(!seen.contains(&cur), "{cur:?} visited twice before returning");
            seen.push(cur);
            cur = armory.next_weapon(cur).unwrap();
        }
        seen.sort();
        assert_eq!(seen, owned, "cycle from {start:?} should visit every owned weapon");
    }
}

// ---- Ballistics ----

#[test]
fn test_straight_drop_detonates_at_ground() {
    let terrain = Terrain::flat(200);
    let mut shell = Projectile::launch(WeaponKind::SmallMissile, Vec2::new(100.0, 50.0), Vec2::ZERO, 0);

    let mut steps = 0;
    loop {
        let exploded = shell.step(&terrain, &[]);
        let pos = shell.position();
        assert_eq!(pos.x, 100.0, "no wind and no horizontal speed means no drift");
        let lower_edge = pos.y as i32 + 4;
        if exploded {
            assert!(lower_edge > 200, "detonated above the ground at y={}", pos.y);
            break;
        }
        assert!(lower_edge <= 200, "should have detonated at y={}", pos.y);
        steps += 1;
        assert!(steps < 1000, "never reached the ground");
    }
}

#[test]
fn test_turn_passes_after_shot() {
    let mut engine = GameEngine::new(human_vs_computer(5)).unwrap();
    let mut now = 0;
    engine.step(now).unwrap();
    engine.step(now).unwrap();
    assert_eq!(engine.state_id(), StateId::HumanMove);

    engine.handle_input(InputEvent::SetAngle { degrees: 30 }, now).unwrap();
    engine.handle_input(button(GameButton::PressFire), now).unwrap();
    now += 1200;
    engine.handle_input(button(GameButton::ReleaseFire), now).unwrap();

    let mut events = Vec::new();
    let mut seen_ballistics = false;
    loop {
        tick(&mut engine, &mut now);
        events.extend(engine.snapshot(now).events);
        match engine.state_id() {
            StateId::Ballistics => seen_ballistics = true,
            StateId::ComputerMove | StateId::Leaderboard => break,
            _ => {}
        }
        assert!(now < 60_000, "turn never ended");
    }
    assert!(seen_ballistics);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Fired {
            player: 0,
            power: 500,
            ..
        }
    )));
    assert!(
        events.iter().any(|e| matches!(e, GameEvent::Detonated { .. })),
        "the shell must land somewhere"
    );
}

// ---- Specials ----

#[test]
fn test_teleport_two_players_moves_to_free_slot() {
    let mut config = human_vs_computer(9);
    config.random_placement = false;
    let mut engine = GameEngine::new(config).unwrap();
    let mut now = 0;
    engine.step(now).unwrap();
    engine.step(now).unwrap();

    let bot_x = engine.model().players()[1].x();
    let alice_x = engine.model().players()[0].x();
    engine.cosmos_mut().armory_mut(0).unwrap().buy(WeaponKind::Teleporter).unwrap();
    while engine.model().current().weapon() != WeaponKind::Teleporter {
        assert!(engine.handle_input(button(GameButton::ArmoryRight), now).unwrap());
    }
    engine.handle_input(button(GameButton::ReleaseFire), now).unwrap();
    assert_eq!(tick(&mut engine, &mut now), StepOutcome::Continue);
    assert_eq!(engine.state_id(), StateId::Teleport);

    let mut events = Vec::new();
    while engine.state_id() == StateId::Teleport {
        tick(&mut engine, &mut now);
        events.extend(engine.snapshot(now).events);
    }
    let players = engine.model().players();
    assert_eq!(players[1].x(), bot_x, "the other player stays put");
    assert_ne!(players[0].x(), alice_x);
    assert!(
        crate::model::starting_slots(3).contains(&players[0].x()),
        "teleporter lands on a three-player slot"
    );
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::Teleported { player: 0, .. })));
    assert_eq!(
        engine.cosmos().armory(0).unwrap().amount(WeaponKind::Teleporter),
        None,
        "teleporter is consumed"
    );
}

#[test]
fn test_extra_armor_rejected_at_full_life() {
    let mut config = human_vs_computer(3);
    config.starting_life = salvo_core::constants::MAX_LIFE;
    let mut engine = GameEngine::new(config).unwrap();
    engine.step(0).unwrap();
    engine.step(0).unwrap();
    engine.cosmos_mut().armory_mut(0).unwrap().buy(WeaponKind::ExtraArmor).unwrap();
    while engine.model().current().weapon() != WeaponKind::ExtraArmor {
        engine.handle_input(button(GameButton::ArmoryRight), 0).unwrap();
    }
    assert!(!engine.handle_input(button(GameButton::ReleaseFire), 0).unwrap());
    engine.step(1).unwrap();
    assert_eq!(engine.state_id(), StateId::HumanMove);
    assert_eq!(
        engine.cosmos().armory(0).unwrap().amount(WeaponKind::ExtraArmor),
        Some(Stock::Count(1)),
        "armor is not consumed when refused"
    );
}

// ---- Save / restore ----

#[test]
fn test_save_restore_equivalence() {
    let config = human_vs_computer(21);
    let mut original = GameEngine::new(config.clone()).unwrap();
    original.step(0).unwrap();
    original.step(0).unwrap();
    assert_eq!(original.state_id(), StateId::HumanMove);

    let map = original.save().unwrap();
    let text = map.to_json().unwrap();
    let map = SaveMap::from_json(&text).unwrap();
    let mut restored = GameEngine::restore(config, &map).unwrap();
    assert_eq!(restored.state_id(), StateId::HumanMove);
    restored.step(0).unwrap();

    original.snapshot(0);
    assert_eq!(
        snapshot_json(&mut original, 0),
        snapshot_json(&mut restored, 0),
        "restored snapshot differs"
    );

    let inputs = [
        InputEvent::SetAngle { degrees: 70 },
        button(GameButton::PressFire),
    ];
    for engine in [&mut original, &mut restored] {
        for input in inputs {
            engine.handle_input(input, 0).unwrap();
        }
        engine.handle_input(button(GameButton::ReleaseFire), 1500).unwrap();
    }
    let (mut now_a, mut now_b) = (1500, 1500);
    for i in 0..15_000 {
        let out_a = tick(&mut original, &mut now_a);
        let out_b = tick(&mut restored, &mut now_b);
        assert_eq!(out_a, out_b, "outcomes diverged at step {i}");
        if original.state_id() == StateId::HumanMove {
            break;
        }
    }
    assert_eq!(
        snapshot_json(&mut original, now_a),
        snapshot_json(&mut restored, now_b),
        "restored game played out differently"
    );
}

#[test]
fn test_restore_rejects_wrong_player_count() {
    let mut engine = GameEngine::new(human_vs_computer(1)).unwrap();
    engine.step(0).unwrap();
    let map = engine.save().unwrap();
    let three = GameConfig::computers_only(3, 1);
    assert!(GameEngine::restore(three, &map).is_err());
}

#[test]
fn test_restore_rejects_missing_state() {
    let engine = GameEngine::new(human_vs_computer(1)).unwrap();
    let mut map = engine.save().unwrap();
    map.remove("state");
    assert!(GameEngine::restore(human_vs_computer(1), &map).is_err());
}

// ---- Full games ----

#[test]
fn test_computer_game_reaches_game_over() {
    let mut config = GameConfig::computers_only(2, 2024);
    config.total_rounds = 2;
    config.starting_life = 10;
    let mut engine = GameEngine::new(config).unwrap();
    let mut now = 0;
    let mut rounds_started = 0;
    let mut game_over_event = false;

    while !engine.is_finished() {
        tick(&mut engine, &mut now);
        for event in engine.snapshot(now).events {
            match event {
                GameEvent::RoundStarted { .. } => rounds_started += 1,
                GameEvent::GameOver { .. } => game_over_event = true,
                _ => {}
            }
        }
        assert!(now < 20_000_000, "game did not finish");
    }
    assert_eq!(rounds_started, 2);
    assert!(game_over_event);
    assert_eq!(engine.step(now).unwrap(), StepOutcome::GameOver);
    assert_eq!(engine.cosmos().round_info().round, 2);
}
