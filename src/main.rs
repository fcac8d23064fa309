//! Pokeunity - command line driver
//!
//! Saves, loads and lists snapshots in a save directory, and plays overworld
//! interactions against a recording script host.

use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

use pokeunity::game::{Direction, EventPayload, EventRecord, TrainerProfile, Transform, Vec3};
use pokeunity::overworld::{smash_rock, waterfall, Interaction, Level, OverworldData, TilePos};
use pokeunity::pokemon::Pokemon;
use pokeunity::save::{SaveWorker, SnapshotRecord, SnapshotStore, WorkerEvent};
use pokeunity::script::ScriptLog;
use pokeunity::{config, GameConfig, GameContext, LoadOutcome, SaveManager};

const SAVE_TIMEOUT: Duration = Duration::from_secs(30);

const USAGE: &str = "\
usage: pokeunity [--config PATH] [--save-dir DIR] <command> [args]

commands:
  save [NAME]              save a demo game in the background
  load <INDEX>             load Save<INDEX> and print what was restored
  list [LIMIT]             list snapshots of this build, oldest first (0 = all)
  delete <INDEX>           delete Save<INDEX>
  events <INDEX> [SCENE]   print the scheduled events stored in Save<INDEX>
  smash [MAP] [COUNT]      smash COUNT rocks on MAP and print the scripts
  waterfall [HEIGHT] [--surf]
                           climb and descend a stack of waterfalls";

fn main() -> Result<()> {
    // Log to a file so command output stays readable
    let target = match OpenOptions::new().create(true).write(true).truncate(true).open("pokeunity.log") {
        Ok(file) => env_logger::Target::Pipe(Box::new(file)),
        Err(_) => env_logger::Target::Stderr,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(target)
        .init();

    log::info!("Starting pokeunity v{}", env!("CARGO_PKG_VERSION"));

    let args: Vec<String> = env::args().skip(1).collect();
    let result = run(&args);
    if let Err(ref e) = result {
        log::error!("Command failed: {:#}", e);
    }
    result
}

fn run(args: &[String]) -> Result<()> {
    let mut config_path = config::DEFAULT_CONFIG_PATH.to_string();
    let mut save_dir: Option<PathBuf> = None;
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            "--config" => {
                config_path = args.get(index + 1).context("missing value for --config")?.clone();
                index += 2;
            }
            "--save-dir" => {
                save_dir = Some(args.get(index + 1).context("missing value for --save-dir")?.into());
                index += 2;
            }
            _ => break,
        }
    }

    let mut config = GameConfig::load_or_default(&config_path);
    if save_dir.is_some() {
        config.save_dir = save_dir;
    }

    let command = args.get(index).ok_or_else(|| anyhow!("missing command\n\n{}", USAGE))?;
    let rest = &args[index + 1..];
    match command.as_str() {
        "save" => cmd_save(&config, rest.first().map(String::as_str).unwrap_or("Quick save")),
        "load" => cmd_load(&config, parse_arg(rest, 0, "INDEX")?),
        "list" => cmd_list(&config, parse_opt(rest, 0, "LIMIT")?.unwrap_or(0)),
        "delete" => cmd_delete(&config, parse_arg(rest, 0, "INDEX")?),
        "events" => cmd_events(&config, parse_arg(rest, 0, "INDEX")?, parse_opt(rest, 1, "SCENE")?),
        "smash" => cmd_smash(
            &config,
            rest.first().map(String::as_str).unwrap_or("route45.dat"),
            parse_opt(rest, 1, "COUNT")?.unwrap_or(10),
        ),
        "waterfall" => {
            let surfing = rest.iter().any(|a| a == "--surf");
            let height = rest.iter().find(|a| *a != "--surf").map(|h| h.parse::<i32>()).transpose()?;
            cmd_waterfall(&config, height.unwrap_or(3), surfing)
        }
        other => bail!("unknown command '{}'\n\n{}", other, USAGE),
    }
}

fn parse_arg<T: std::str::FromStr>(rest: &[String], pos: usize, name: &str) -> Result<T> {
    parse_opt(rest, pos, name)?.ok_or_else(|| anyhow!("missing {}", name))
}

fn parse_opt<T: std::str::FromStr>(rest: &[String], pos: usize, name: &str) -> Result<Option<T>> {
    rest.get(pos)
        .map(|value| value.parse::<T>().map_err(|_| anyhow!("invalid {} '{}'", name, value)))
        .transpose()
}

/// A mid-game state to save
fn demo_context() -> GameContext {
    let mut trainer = TrainerProfile::new("Ethan", 31_337, 4_242, true);
    trainer.badges.award(1);
    trainer.badges.award(8);
    trainer.pokedex.mark_caught(157);
    trainer.pokedex.mark_caught(130);

    let mut ctx = GameContext::new(trainer, 12);
    let party = [
        Pokemon::new(157, "Typhlosion", 36).with_nickname("Blaze").with_move("Rock Smash", 15),
        Pokemon::new(130, "Gyarados", 33).with_move("Waterfall", 15).with_move("Surf", 15),
        Pokemon::egg(175, "Togepi"),
    ];
    for mon in party {
        let _ = ctx.party.add(mon);
    }
    let _ = ctx.storage.deposit(Pokemon::new(19, "Rattata", 4));
    ctx.bag.add(4, 12);
    ctx.bag.add(17, 3);
    ctx.player = Transform::new(Vec3::new(12.0, 0.0, -7.0), Direction::Left);
    ctx.follower = Transform::new(Vec3::new(13.0, 0.0, -7.0), Direction::Left);
    ctx.register_event(EventRecord::new(12, 30, EventPayload::FlagSet { key: "met_rival".into(), value: true }));
    ctx.register_event(EventRecord::new(4, 10, EventPayload::ItemCollected { item_id: 17 }));
    ctx
}

fn cmd_save(config: &GameConfig, name: &str) -> Result<()> {
    let store = SnapshotStore::from_config(config);
    let worker = SaveWorker::new(store.clone());
    let record = SnapshotRecord::capture(&demo_context(), name, store.build_version());

    worker.request_save(record)?;
    match worker.wait(SAVE_TIMEOUT)? {
        WorkerEvent::Saved(result) => {
            let path = result?;
            println!("Saved \"{}\" to {}", name, path.display());
            Ok(())
        }
        WorkerEvent::Loaded { .. } => bail!("unexpected load result from save worker"),
    }
}

fn cmd_load(config: &GameConfig, index: u32) -> Result<()> {
    let manager = SaveManager::from_config(config);
    let mut ctx = GameContext::new(TrainerProfile::default(), 0);

    let mut outcome = manager.load(&mut ctx, index)?;
    if let LoadOutcome::SceneChange { scene_index } = outcome {
        println!("Snapshot is in scene {}, changing scene first", scene_index);
        ctx.finish_scene_transition(scene_index);
        outcome = manager
            .resume_pending(&mut ctx)
            .context("loaded snapshot was not applied after the scene change")?;
    }

    println!("{:?}: scene {}", outcome, ctx.active_scene());
    println!(
        "Trainer {} (ID {:05}), {} badges, played {}",
        ctx.trainer.name,
        ctx.trainer.trainer_id,
        ctx.trainer.badges.count(),
        ctx.trainer.playtime
    );
    for mon in ctx.party.iter() {
        println!("  {} Lv{}{}", mon.display_name(), mon.level, if mon.is_egg { " (egg)" } else { "" });
    }
    println!("{} in storage, {} bag stacks, {} events", ctx.storage.count(), ctx.bag.len(), ctx.events.len());
    Ok(())
}

fn cmd_list(config: &GameConfig, limit: usize) -> Result<()> {
    let manager = SaveManager::from_config(config);
    let snapshots = manager.list_snapshots(limit)?;
    if snapshots.is_empty() {
        println!("No saves for build {}", manager.build_version());
    }
    for record in snapshots {
        println!(
            "{:>15}  {:<24} {} scene {} party {}",
            record.time_created,
            record.save_name,
            record.trainer_name,
            record.scene_index,
            record.party.len()
        );
    }
    Ok(())
}

fn cmd_delete(config: &GameConfig, index: u32) -> Result<()> {
    let manager = SaveManager::from_config(config);
    if manager.delete(index)? {
        println!("Deleted save {}", index);
    } else {
        println!("No save {}", index);
    }
    Ok(())
}

fn cmd_events(config: &GameConfig, index: u32, scene: Option<u32>) -> Result<()> {
    let manager = SaveManager::from_config(config);
    let record = manager.store().read(index)?;
    let mut ctx = GameContext::new(TrainerProfile::default(), record.scene_index);
    ctx.events.replace(record.scheduled_events);

    let events = match scene {
        Some(scene) => manager.relevant_events(&ctx, scene),
        None => ctx.events.iter().collect(),
    };
    for event in events {
        println!("t={:<6} scene {:<4} {:?}", event.trigger_time, event.scene_index, event.payload);
    }
    Ok(())
}

fn cmd_smash(config: &GameConfig, map: &str, count: i32) -> Result<()> {
    let data = OverworldData::from_config(config);
    let mut ctx = demo_context();
    let mut level = Level::new(map, ctx.active_scene());
    let mut host = ScriptLog::new();

    for i in 0..count {
        let rock = level.spawn_smash_rock(&format!("rock_{}", i), TilePos::new(i, 0, 0));
        let mut it = Interaction::new(&mut ctx, &mut level, &mut host, &data);
        smash_rock::click(&mut it, rock);
        let outcome = smash_rock::result(&mut it, rock, 0);
        println!("rock_{}: {:?}", i, outcome);
        if let Some(script) = host.last_script() {
            println!("{}\n", script);
        }
        host.clear();
    }

    let removed = level.remove_marked();
    println!(
        "Removed {} rocks, \"{}\" = {}",
        removed.len(),
        smash_rock::SMASH_STATISTIC,
        ctx.statistics.get(smash_rock::SMASH_STATISTIC)
    );
    Ok(())
}

fn cmd_waterfall(config: &GameConfig, height: i32, surfing: bool) -> Result<()> {
    if height < 1 {
        bail!("waterfall height must be at least 1");
    }
    let data = OverworldData::from_config(config);
    let mut ctx = demo_context();
    let mut level = Level::new("falls.dat", ctx.active_scene());
    level.surfing = surfing;
    let tiles: Vec<_> = (0..height)
        .map(|y| level.spawn_waterfall(&format!("waterfall_{}", y), TilePos::new(0, y, 0), 0))
        .collect();
    let (Some(&bottom), Some(&top)) = (tiles.first(), tiles.last()) else {
        bail!("no waterfall tiles");
    };
    let mut host = ScriptLog::new();

    let blocked = waterfall::walk_against(&mut Interaction::new(&mut ctx, &mut level, &mut host, &data), bottom);
    println!("Walk against bottom: blocked = {}", blocked);
    waterfall::walk_onto(&mut Interaction::new(&mut ctx, &mut level, &mut host, &data), top);

    for script in host.scripts() {
        println!("{}\n", script);
    }
    Ok(())
}
