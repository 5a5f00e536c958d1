//! ability_sim - Headless driver for player abilities

mod cli;
mod simulation;

use ability_core::config::{load_ability_definitions, load_buff_catalog};
use ability_core::{default_abilities, default_buffs, ActorRef, PlayerAbility};
use anyhow::{Context, Result};
use simulation::{CastSimulation, ProjectileLauncher, SimPlayer, SimReport, SimSettings};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let abilities = match &args.abilities {
        Some(path) => load_ability_definitions(path)
            .with_context(|| format!("loading abilities from {}", path.display()))?,
        None => default_abilities(),
    };
    let catalog = match &args.buff_catalog {
        Some(path) => load_buff_catalog(path)
            .with_context(|| format!("loading buffs from {}", path.display()))?,
        None => default_buffs(),
    };

    if args.list {
        let mut names: Vec<_> = abilities.keys().collect();
        names.sort();
        println!("Abilities:");
        for name in names {
            println!("  {}", name);
        }
        let mut titles: Vec<_> = catalog.keys().collect();
        titles.sort();
        println!("Buffs:");
        for title in titles {
            println!("  {}", title);
        }
        return Ok(());
    }

    let definition = abilities
        .get(&args.ability)
        .cloned()
        .with_context(|| format!("unknown ability '{}'", args.ability))?;
    let buffs = args
        .buffs
        .iter()
        .map(|title| {
            catalog
                .get(title)
                .cloned()
                .with_context(|| format!("unknown buff '{}'", title))
        })
        .collect::<Result<Vec<_>>>()?;

    let players = vec![SimPlayer::new(1), SimPlayer::new(2)];
    let refs = players.iter().map(|p| p.clone() as ActorRef).collect();
    let mut ability =
        PlayerAbility::new(definition, refs, ProjectileLauncher::new(args.seed)).with_buffs(buffs);
    let validation = ability.initialize();
    if !validation.is_clean() {
        tracing::warn!(rejected = ?validation.rejected_titles(), "some buffs were not equipped");
    }
    ability.state_mut().attach_to(&*players[0]);

    let settings = SimSettings {
        duration: args.duration,
        tick: args.tick,
        down_at: args.down_at,
    };
    let report = CastSimulation::run(&mut ability, &players, &settings, &validation);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &SimReport) {
    println!("Ability: {}", report.ability);
    println!("  Simulated: {:.1}s", report.duration);
    println!(
        "  Casts: {} ({:.1}/min), denied polls: {}",
        report.casts,
        report.casts_per_minute(),
        report.denied_polls
    );
    if let Some(first) = report.first_cast_at {
        println!("  First cast at: {:.1}s", first);
    }
    println!(
        "  Projectiles: {} spawned, {} expired, {} live",
        report.projectiles_spawned, report.projectiles_expired, report.projectiles_live
    );
    for (player, spawned) in &report.spawned_by_player {
        println!("    player {}: {} spawned", player, spawned);
    }
    if !report.equipped_buffs.is_empty() {
        println!("  Buffs: {}", report.equipped_buffs.join(", "));
    }
    if !report.rejected_buffs.is_empty() {
        println!("  Rejected: {}", report.rejected_buffs.join(", "));
    }
    println!("  Attributes:");
    for attr in &report.attributes {
        match attr.max {
            Some(max) => println!(
                "    {:<20} base {:>7.2}  actual {:>7.2}  shown {:>6}  (max {})",
                attr.kind, attr.base, attr.actual, attr.shown, max
            ),
            None => println!(
                "    {:<20} base {:>7.2}  actual {:>7.2}  shown {:>6}",
                attr.kind, attr.base, attr.actual, attr.shown
            ),
        }
    }
}
