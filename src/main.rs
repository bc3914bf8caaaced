//! Partbreak demo runner
//!
//! Plays one encounter against a single enemy: a party member keeps hitting
//! it for a fixed amount, optionally aiming at one part, until the enemy
//! falls or the hit budget runs out. Prints the combat log or a JSON
//! summary.

use clap::Parser;
use partbreak::catalog::ArchetypeRegistry;
use partbreak::combat::{
    AttackerProfile, CombatContext, DamageEvent, Element, Enemy, PartView, StatBlock,
    WeaponCategory,
};
use partbreak::core::{EncounterId, EncounterKey, LocationId, PartDamageConfig, Result};
use partbreak::session::{BattleSession, DamageReport};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Partbreak - simulate part damage against one enemy
#[derive(Parser, Debug)]
#[command(name = "partbreak")]
#[command(about = "Run a seeded encounter through the part damage model")]
struct Args {
    /// Directory of archetype TOML files (built-in catalog if omitted)
    #[arg(long)]
    archetypes: Option<PathBuf>,

    /// Part damage config TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enemy archetype name
    #[arg(long, default_value = "Humanoid")]
    archetype: String,

    /// Enemy max HP
    #[arg(long, default_value_t = 300)]
    max_hp: i32,

    /// Enemy stat value for everything except HP
    #[arg(long, default_value_t = 20)]
    enemy_stat: i32,

    /// Attacker stat value
    #[arg(long, default_value_t = 25)]
    attacker_stat: i32,

    /// Attacker weapon family (sword, staff, bow, ...)
    #[arg(long, value_parser = parse_weapon)]
    weapon: Option<WeaponCategory>,

    /// Element of every hit (fire, ice, ...)
    #[arg(long, value_parser = parse_element)]
    element: Option<Element>,

    /// Damage per hit
    #[arg(long, default_value_t = 30)]
    damage: i32,

    /// Maximum number of hits
    #[arg(long, default_value_t = 12)]
    hits: u32,

    /// Part key to aim every attack at
    #[arg(long)]
    target: Option<String>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

fn parse_weapon(value: &str) -> std::result::Result<WeaponCategory, String> {
    serde_json::from_value(serde_json::Value::String(value.to_lowercase()))
        .map_err(|_| format!("unknown weapon category '{}'", value))
}

fn parse_element(value: &str) -> std::result::Result<Element, String> {
    serde_json::from_value(serde_json::Value::String(value.to_lowercase()))
        .map_err(|_| format!("unknown element '{}'", value))
}

/// JSON output structure
#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    archetype: String,
    hits: Vec<DamageReport>,
    defeated: bool,
    disabled_actions: Vec<u32>,
    parts: Vec<PartView>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("partbreak=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let config = match &args.config {
        Some(path) => PartDamageConfig::load(path)?,
        None => PartDamageConfig::default(),
    };
    config.validate()?;

    let registry = match &args.archetypes {
        Some(dir) => {
            let mut registry = ArchetypeRegistry::new();
            registry.load_directory(dir)?;
            registry
        }
        None => ArchetypeRegistry::builtin()?,
    };

    let mut session = BattleSession::new(Arc::new(registry), config);
    let mut enemies = vec![Enemy::new(
        &args.archetype,
        Some(&args.archetype),
        StatBlock::uniform(args.max_hp, args.enemy_stat),
    )];
    let key = EncounterKey::new(LocationId(1), EncounterId(1));
    session.begin_encounter(key, &mut enemies, &mut rng);

    let attacker = AttackerProfile::new(
        "Hero",
        args.weapon,
        StatBlock::uniform(100, args.attacker_stat),
    );
    let event = DamageEvent {
        amount: args.damage,
        element: args.element,
    };

    let mut hits = Vec::new();
    for _ in 0..args.hits {
        if enemies[0].is_defeated() {
            break;
        }

        let mut ctx = CombatContext::new(attacker.clone());
        if let Some(target) = &args.target {
            session.set_directed_target(&mut ctx, &enemies[0], target);
        }

        enemies[0].take_damage(event.amount);
        let report = session.on_damage_applied(&mut enemies, 0, &mut ctx, event, &mut rng);
        hits.extend(report);
        session.turn_ended(&mut enemies);
    }
    session.end_encounter();

    let enemy = &enemies[0];
    let parts = session.inspect(enemy, Some(&attacker));
    let mut disabled: Vec<u32> = enemy.disabled_action_ids().iter().map(|id| id.0).collect();
    disabled.sort_unstable();

    if args.format == "json" {
        let summary = RunSummary {
            seed,
            archetype: enemy
                .archetype()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            hits,
            defeated: enemy.is_defeated(),
            disabled_actions: disabled,
            parts,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("=== {} (seed {}) ===", enemy.name, seed);
    for (turn, report) in hits.iter().enumerate() {
        for line in report.messages() {
            println!("[{:>2}] {}", turn + 1, line);
        }
    }

    println!();
    println!("{:<12} {:>9} {:>6}", "Part", "Health", "Aim%");
    for view in &parts {
        let health = if view.destroyed {
            "broken".to_string()
        } else {
            format!("{}/{}", view.current_health, view.max_health)
        };
        let aim = view
            .hit_chance
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<12} {:>9} {:>6}", view.display_name, health, aim);
    }

    let penalties: Vec<String> = enemy
        .modifiers()
        .iter()
        .map(|(stat, delta)| format!("{} {:+}", stat, delta))
        .collect();
    if !penalties.is_empty() {
        println!("Penalties: {}", penalties.join(", "));
    }
    if !disabled.is_empty() {
        println!("Disabled actions: {:?}", disabled);
    }
    println!(
        "Outcome: {}",
        if enemy.is_defeated() { "defeated" } else { "still standing" }
    );

    Ok(())
}
