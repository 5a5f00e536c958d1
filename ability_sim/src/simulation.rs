//! Ability simulation utilities

use ability_core::prelude::*;
use ability_core::ValidationReport;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// A player whose downed state the simulation controls
pub struct SimPlayer {
    id: PlayerId,
    downed: Cell<bool>,
}

impl SimPlayer {
    pub fn new(id: u8) -> Rc<SimPlayer> {
        Rc::new(SimPlayer {
            id: PlayerId(id),
            downed: Cell::new(false),
        })
    }

    pub fn set_downed(&self, downed: bool) {
        self.downed.set(downed);
    }
}

impl Actor for SimPlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn is_downed(&self) -> bool {
        self.downed.get()
    }
}

/// A live projectile and the time it expires
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    pub expires_at: Seconds,
}

/// Cast behavior that fires projectiles with randomized lifetimes
///
/// Lifetime is the ability's DURATION stat scaled by 75%..125%, or one
/// second if the ability has no duration.
pub struct ProjectileLauncher {
    rng: ChaCha8Rng,
    live: Vec<Projectile>,
    last_now: Seconds,
    pub spawned: u32,
    pub expired: u32,
    /// Spawn counts keyed by casting player, shared casts excluded
    pub spawned_by_player: BTreeMap<u8, u32>,
}

impl ProjectileLauncher {
    pub fn new(seed: u64) -> Self {
        ProjectileLauncher {
            rng: ChaCha8Rng::seed_from_u64(seed),
            live: Vec::new(),
            last_now: 0.0,
            spawned: 0,
            expired: 0,
            spawned_by_player: BTreeMap::new(),
        }
    }

    pub fn live(&self) -> &[Projectile] {
        &self.live
    }

    fn launch(&mut self, ability: &mut AbilityState, owner: Option<PlayerId>, now: Seconds) {
        let duration = ability.get_stat_value(AttributeFlags::DURATION);
        let lifetime = if duration > 0.0 { duration } else { 1.0 };
        let scale: f64 = self.rng.gen_range(0.75..=1.25);

        self.live.push(Projectile {
            expires_at: now + lifetime * scale,
        });
        self.spawned += 1;
        if let Some(owner) = owner {
            *self.spawned_by_player.entry(owner.0).or_insert(0) += 1;
        }
        self.last_now = now;
        ability.on_projectile_spawned();
        ability.do_after_cast_handler(now);
    }

    /// Destroy every projectile whose lifetime is over
    pub fn expire(&mut self, ability: &mut AbilityState, now: Seconds) -> usize {
        let before = self.live.len();
        self.live.retain(|p| p.expires_at > now);
        let destroyed = before - self.live.len();
        for _ in 0..destroyed {
            ability.on_projectile_destroyed(now);
        }
        self.expired += destroyed as u32;
        self.last_now = now;
        destroyed
    }
}

impl AbilityBehavior for ProjectileLauncher {
    fn cast(&mut self, ability: &mut AbilityState, now: Seconds) {
        self.launch(ability, None, now);
    }

    fn cast_on_player(&mut self, ability: &mut AbilityState, player: &dyn Actor, now: Seconds) {
        self.launch(ability, Some(player.id()), now);
    }

    /// Disabling destroys every live projectile at the last time the
    /// launcher saw (its latest launch or expire), since the hook is not
    /// handed a clock.
    fn toggle_all_projectiles(&mut self, ability: &mut AbilityState, enabled: bool) {
        if enabled {
            return;
        }
        let now = self.last_now;
        for _ in self.live.drain(..) {
            ability.on_projectile_destroyed(now);
        }
    }
}

/// Settings for one simulation run
#[derive(Debug, Clone)]
pub struct SimSettings {
    pub duration: Seconds,
    pub tick: Seconds,
    /// Down the second player at this time
    pub down_at: Option<Seconds>,
}

/// Final value of one attribute
#[derive(Debug, Clone, Serialize)]
pub struct AttributeReport {
    pub kind: String,
    pub base: f64,
    pub actual: f64,
    pub shown: f64,
    pub max: Option<f64>,
}

/// Outcome of a simulation run
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub ability: String,
    pub duration: Seconds,
    pub casts: u32,
    pub denied_polls: u32,
    pub first_cast_at: Option<Seconds>,
    pub projectiles_spawned: u32,
    pub projectiles_expired: u32,
    pub projectiles_live: usize,
    pub spawned_by_player: BTreeMap<u8, u32>,
    pub equipped_buffs: Vec<String>,
    pub rejected_buffs: Vec<String>,
    pub attributes: Vec<AttributeReport>,
}

impl SimReport {
    /// Casts per simulated minute
    pub fn casts_per_minute(&self) -> f64 {
        if self.duration > 0.0 {
            self.casts as f64 / self.duration * 60.0
        } else {
            0.0
        }
    }
}

/// Poll-driven cast loop
pub struct CastSimulation;

impl CastSimulation {
    /// Poll the ability every tick, expiring projectiles before each poll
    pub fn run(
        ability: &mut PlayerAbility<ProjectileLauncher>,
        players: &[Rc<SimPlayer>],
        settings: &SimSettings,
        validation: &ValidationReport,
    ) -> SimReport {
        let mut casts = 0;
        let mut denied_polls = 0;
        let mut first_cast_at = None;

        let steps = if settings.tick > 0.0 {
            (settings.duration / settings.tick).floor() as u64
        } else {
            0
        };

        for step in 0..=steps {
            let now = step as f64 * settings.tick;

            if let (Some(down_at), Some(partner)) = (settings.down_at, players.get(1)) {
                if now >= down_at && !partner.is_downed() {
                    tracing::info!(time = now, "second player downed");
                    partner.set_downed(true);
                }
            }

            let (state, launcher) = ability.parts_mut();
            launcher.expire(state, now);

            if ability.try_cast_ability(now) {
                casts += 1;
                first_cast_at.get_or_insert(now);
            } else {
                denied_polls += 1;
            }
        }

        let state = ability.state();
        SimReport {
            ability: state.name().to_string(),
            duration: settings.duration,
            casts,
            denied_polls,
            first_cast_at,
            projectiles_spawned: ability.behavior().spawned,
            projectiles_expired: ability.behavior().expired,
            projectiles_live: ability.behavior().live().len(),
            spawned_by_player: ability.behavior().spawned_by_player.clone(),
            equipped_buffs: state.equipped_buffs().iter().map(|b| b.title.clone()).collect(),
            rejected_buffs: validation.rejected_titles().iter().map(|t| t.to_string()).collect(),
            attributes: state
                .attributes()
                .iter()
                .map(|a| AttributeReport {
                    kind: format!("{:?}", a.kind()),
                    base: a.base_value(),
                    actual: a.actual_value(),
                    shown: a.player_readable_value(),
                    max: a.max_value(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ability_core::AbilityDefinition;

    fn setup(def: AbilityDefinition, seed: u64) -> (PlayerAbility<ProjectileLauncher>, Vec<Rc<SimPlayer>>) {
        let players = vec![SimPlayer::new(1), SimPlayer::new(2)];
        let refs = players.iter().map(|p| p.clone() as ActorRef).collect();
        let mut ability = PlayerAbility::new(def, refs, ProjectileLauncher::new(seed));
        ability.initialize();
        (ability, players)
    }

    #[test]
    fn test_cooldown_limits_cast_rate() {
        let def = AbilityDefinition::new("bolt")
            .shared()
            .with_constraint(ActivationConstraint::CooldownOnCastEnd)
            .with_attribute(AttributeFlags::COOLDOWN, 2.0)
            .with_attribute(AttributeFlags::DURATION, 0.5);
        let (mut ability, players) = setup(def, 7);
        let settings = SimSettings {
            duration: 10.0,
            tick: 0.5,
            down_at: None,
        };

        let report = CastSimulation::run(&mut ability, &players, &settings, &ValidationReport::default());

        // Casts at 0, 2, 4, 6, 8, 10
        assert_eq!(report.casts, 6);
        assert_eq!(report.first_cast_at, Some(0.0));
        assert_eq!(report.projectiles_spawned, 6);
    }

    #[test]
    fn test_instances_cap_live_projectiles() {
        let def = AbilityDefinition::new("turret")
            .with_constraint(ActivationConstraint::NumberOfActiveInstances)
            .with_attribute(AttributeFlags::PROJECTILE_COUNT, 2.0)
            .with_attribute(AttributeFlags::DURATION, 100.0);
        let (mut ability, players) = setup(def, 3);
        let settings = SimSettings {
            duration: 5.0,
            tick: 1.0,
            down_at: None,
        };

        let report = CastSimulation::run(&mut ability, &players, &settings, &ValidationReport::default());

        // One poll casts for both players and fills both slots
        assert_eq!(report.casts, 1);
        assert_eq!(report.projectiles_spawned, 2);
        assert_eq!(report.projectiles_live, 2);
        assert_eq!(report.spawned_by_player.get(&1), Some(&1));
        assert_eq!(report.spawned_by_player.get(&2), Some(&1));
        assert_eq!(ability.behavior().live().len(), 2);
        assert_eq!(ability.state().active_projectiles(), 2);
    }

    #[test]
    fn test_expire_fires_projectile_destroyed_chain() {
        let def = AbilityDefinition::new("boomerang")
            .shared()
            .with_constraint(ActivationConstraint::CooldownOnProjectileDestroyed)
            .with_attribute(AttributeFlags::COOLDOWN, 3.0)
            .with_attribute(AttributeFlags::DURATION, 1.0);
        let (mut ability, _players) = setup(def, 11);

        assert!(ability.try_cast_ability(0.0));
        let (state, launcher) = ability.parts_mut();
        assert_eq!(launcher.expire(state, 2.0), 1);
        assert!(ability.state().is_on_cooldown(4.0));
        assert!(!ability.state().is_on_cooldown(5.0));
    }

    #[test]
    fn test_disable_clears_projectiles() {
        let (mut ability, _players) = setup(AbilityDefinition::new("dash"), 5);
        assert!(ability.try_cast_ability(0.0));
        assert_eq!(ability.state().active_projectiles(), 2);

        ability.set_ability_enabled(false);
        assert!(ability.behavior().live().is_empty());
        assert_eq!(ability.state().active_projectiles(), 0);
    }

    #[test]
    fn test_disable_destroys_at_last_seen_time() {
        let def = AbilityDefinition::new("boomerang")
            .shared()
            .with_constraint(ActivationConstraint::CooldownOnProjectileDestroyed)
            .with_attribute(AttributeFlags::COOLDOWN, 3.0)
            .with_attribute(AttributeFlags::DURATION, 100.0);
        let (mut ability, _players) = setup(def, 13);

        assert!(ability.try_cast_ability(0.0));
        let (state, launcher) = ability.parts_mut();
        assert_eq!(launcher.expire(state, 4.0), 0);

        // Cooldown starts at 4.0, the last expire pass
        ability.set_ability_enabled(false);
        assert_eq!(ability.state().active_projectiles(), 0);
        assert!(ability.state().is_on_cooldown(6.9));
        assert!(!ability.state().is_on_cooldown(7.0));
    }

    #[test]
    fn test_same_seed_same_report() {
        let def = ability_core::default_abilities()["boomerang_axe"].clone();
        let settings = SimSettings {
            duration: 20.0,
            tick: 0.1,
            down_at: Some(10.0),
        };

        let (mut a, players_a) = setup(def.clone(), 99);
        let (mut b, players_b) = setup(def, 99);
        let ra = CastSimulation::run(&mut a, &players_a, &settings, &ValidationReport::default());
        let rb = CastSimulation::run(&mut b, &players_b, &settings, &ValidationReport::default());

        assert_eq!(ra.casts, rb.casts);
        assert_eq!(ra.projectiles_spawned, rb.projectiles_spawned);
        assert!(ra.casts > 0);
    }
}
