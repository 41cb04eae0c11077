//! Headless demo: a guard patrols, spots the player and attacks, while a
//! trigger zone plays a dialogue and moves the story to the next stage.
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use glam::Vec3;
use log::{info, warn};
use vigil::combat::{GuardConfig, PatrolConfig};
use vigil::dialogue::{
    DialogueError, DialogueSequencer, DialogueSource, FsDialogueSource, LogPresenter,
};
use vigil::trigger::TriggerContext;
use vigil::world::SphereWorld;
use vigil::{
    init_logging, Body, ColliderId, CombatAgent, CombatConfig, EventBus, Health, InputGate,
    Interactable, InteractionType, Interactor, Inventory, Sighted, StageProgress, Target,
    TriggerConfig, TriggerZone, Weapon, DEFAULT_PLAYER_TAG,
};

const PLAYER: ColliderId = ColliderId(1);
const PILLAR: ColliderId = ColliderId(2);
const GUARD: ColliderId = ColliderId(3);
const PLAYER_RADIUS: f32 = 0.4;
const GUARD_RADIUS: f32 = 0.3;
const PLAYER_SPEED: f32 = 1.0;

const BUILT_IN_DIALOGUE: &str = r#"{
    "dialogues": [
        {
            "dialogueID": "intro",
            "speaker": "Mother",
            "typingSpeed": 0.05,
            "audioClip": "type_soft",
            "lines": [
                { "text": "Hush now. Someone is walking the hall." },
                { "text": "Take the lantern with you.", "waitForEvent": "item.picked_up" },
                { "text": "Go.", "speaker": "Father", "typingSpeed": 0.1 }
            ]
        }
    ]
}"#;

/// Runs a scripted encounter and logs what happens.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Dialogue document to play instead of the built-in one
    #[arg(long)]
    dialogue: Option<PathBuf>,
    /// Entry of the dialogue document to play
    #[arg(long, default_value = "intro")]
    dialogue_id: String,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 900)]
    ticks: u32,
    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

struct BuiltInDialogue;

impl DialogueSource for BuiltInDialogue {
    fn load(&self, _key: &str) -> Result<String, DialogueError> {
        Ok(BUILT_IN_DIALOGUE.to_owned())
    }
}

/// Splits a document path into a source directory and key.
fn file_source(path: &std::path::Path) -> Result<(FsDialogueSource, String)> {
    let key = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("dialogue path {} has no file name", path.display()))?;
    let root = path.parent().map(PathBuf::from).unwrap_or_default();
    Ok((FsDialogueSource::new(root), key.to_owned()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    if !(args.dt.is_finite() && args.dt > 0.0) {
        bail!("--dt must be a positive number of seconds, got {}", args.dt);
    }

    let mut bus = EventBus::new();
    let mut world = SphereWorld::new()
        .with_sphere(PILLAR, Vec3::new(0.0, 0.5, 3.0), 0.5)
        .with_sphere(PLAYER, Vec3::new(12.0, 0.0, 0.0), PLAYER_RADIUS);
    let mut player = Body::new(Vec3::new(12.0, 0.0, 0.0), Vec3::NEG_X);
    let mut health = Health::default();
    let mut weapon = Weapon::default();
    let mut inventory = Inventory::new();
    let mut hands = Interactor::new();
    let lantern = Interactable::new("Lantern", InteractionType::Pickup);
    let gate = InputGate::attach(&mut bus);
    let mut stages = StageProgress::default();
    stages.start_new(&mut bus);

    let mut guard_body = Body::default();
    let config = CombatConfig {
        guard: GuardConfig::Patrol(PatrolConfig::between(
            Vec3::new(-4.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
        )),
        ..CombatConfig::default()
    };
    let mut guard = CombatAgent::new("hall guard", config, &mut guard_body);
    world.insert(GUARD, guard_body.position, GUARD_RADIUS);

    let (source, key): (Box<dyn DialogueSource>, String) = match &args.dialogue {
        Some(path) => {
            let (files, stem) = file_source(path)?;
            (Box::new(files) as Box<dyn DialogueSource>, stem)
        }
        None => (
            Box::new(BuiltInDialogue) as Box<dyn DialogueSource>,
            "intro".to_owned(),
        ),
    };
    let mut sequencer = DialogueSequencer::with_presenter(LogPresenter::default());
    let mut zone = TriggerZone::new(TriggerConfig {
        dialogue_key: Some(key),
        dialogue_id: Some(args.dialogue_id.clone()),
        ..TriggerConfig::default()
    });
    let activation = zone.enter(
        DEFAULT_PLAYER_TAG,
        &mut TriggerContext {
            sequencer: &mut sequencer,
            source: source.as_ref(),
            stages: &mut stages,
            bus: &mut bus,
        },
    );
    info!("trigger zone: {activation:?}");

    let mut clock = 0.0_f64;
    for tick in 0..args.ticks {
        clock += f64::from(args.dt);

        if tick % 45 == 44 {
            sequencer.press();
        }
        if tick == 120 && !inventory.has_item(&lantern.name) {
            let picked = hands.press(&lantern, &mut inventory, &mut bus);
            info!("player reaches for the lantern: {picked:?}");
        }
        sequencer.tick(args.dt, &mut bus);
        zone.update(&mut stages, &mut bus);

        if !health.is_dead() && !gate.is_blocked() {
            player.position.x -= PLAYER_SPEED * args.dt;
            world.move_collider(PLAYER, player.position);
        }
        let sighted = Sighted {
            collider: PLAYER,
            position: player.position,
        };
        let target = if health.is_dead() {
            None
        } else {
            Some(Target::new(sighted, &mut health))
        };
        guard.tick(args.dt, &mut guard_body, target, &world);
        world.move_collider(GUARD, guard_body.position);
        let dealt = guard.outbox().damage_dealt();
        if dealt > 0.0 {
            info!("guard hit the player for {dealt:.0}");
        }
        for event in guard.drain_events() {
            info!("guard: {event:?}");
        }

        if guard.sees_target() {
            weapon.draw();
            let aim = (guard_body.position - player.position).normalize_or_zero();
            let muzzle = player.position + aim * (PLAYER_RADIUS + 0.1);
            if let Ok(shot) = weapon.trigger(clock, muzzle, aim, &world, &mut bus) {
                info!("player fires: {shot:?}");
            } else if weapon.ammo() == 0 {
                weapon.reload();
            }
        }
        weapon.tick(args.dt);

        if health.report_death(&mut bus) {
            warn!("player was killed at t={clock:.2}s");
        }
    }

    info!(
        "finished after {} ticks: guard {:?}, player health {:.0}/{:.0}, stage '{}', dialogue {:?}, items: {:?}",
        args.ticks,
        guard.state(),
        health.current(),
        health.max(),
        stages.current(),
        sequencer.phase(),
        inventory.items()
    );
    Ok(())
}
