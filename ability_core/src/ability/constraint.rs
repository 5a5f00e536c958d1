//! Activation constraint pipeline
//!
//! Turns an ability's declarative constraint list into three ordered chains:
//! availability checks, after-cast triggers and projectile-destroyed
//! triggers. The chains are built once and never rebuilt.

use crate::types::{ActivationConstraint, Seconds};

/// Ability state the availability checks read
pub trait CastConditions {
    fn is_enabled(&self) -> bool;
    fn is_on_cooldown(&self, now: Seconds) -> bool;
    fn active_instances(&self) -> u32;
    fn max_instances(&self) -> u32;
    fn is_player_active(&self) -> bool;
}

/// One predicate in the availability chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityCheck {
    Enabled,
    OffCooldown,
    BelowMaxInstances,
    PlayerActive,
}

impl AvailabilityCheck {
    /// Fold this check into the running result.
    ///
    /// A check can only turn `true` into `false`, never the reverse.
    pub fn apply(self, available: bool, conditions: &impl CastConditions, now: Seconds) -> bool {
        available
            && match self {
                AvailabilityCheck::Enabled => conditions.is_enabled(),
                AvailabilityCheck::OffCooldown => !conditions.is_on_cooldown(now),
                AvailabilityCheck::BelowMaxInstances => {
                    conditions.active_instances() < conditions.max_instances()
                }
                AvailabilityCheck::PlayerActive => conditions.is_player_active(),
            }
    }
}

/// Side effect fired by a trigger chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    BeginCooldown,
}

impl Trigger {
    pub fn fire(self, cooldown: &mut CooldownTimer, now: Seconds) {
        match self {
            Trigger::BeginCooldown => cooldown.begin(now),
        }
    }
}

/// Cooldown start time, polled against the external clock
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CooldownTimer {
    started_at: Option<Seconds>,
}

impl CooldownTimer {
    pub fn begin(&mut self, now: Seconds) {
        self.started_at = Some(now);
    }

    /// Forget the last start; the next check reports ready
    pub fn reset(&mut self) {
        self.started_at = None;
    }

    pub fn started_at(&self) -> Option<Seconds> {
        self.started_at
    }

    /// A cooldown that never started is never active
    pub fn is_active(&self, now: Seconds, duration: Seconds) -> bool {
        match self.started_at {
            Some(start) => now - start < duration,
            None => false,
        }
    }

    /// Seconds until ready, zero if already ready
    pub fn remaining(&self, now: Seconds, duration: Seconds) -> Seconds {
        match self.started_at {
            Some(start) => (duration - (now - start)).max(0.0),
            None => 0.0,
        }
    }
}

/// Availability and trigger chains for one ability instance
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintPipeline {
    availability: Vec<AvailabilityCheck>,
    after_cast: Vec<Trigger>,
    projectile_destroyed: Vec<Trigger>,
    requires_player_alive: bool,
}

impl ConstraintPipeline {
    /// Build the chains, in the order the constraints are listed
    pub fn build(constraints: &[ActivationConstraint]) -> Self {
        let mut pipeline = ConstraintPipeline {
            availability: vec![AvailabilityCheck::Enabled],
            after_cast: Vec::new(),
            projectile_destroyed: Vec::new(),
            requires_player_alive: false,
        };

        for constraint in constraints {
            match constraint {
                ActivationConstraint::CooldownOnProjectileDestroyed => {
                    pipeline.availability.push(AvailabilityCheck::OffCooldown);
                    pipeline.projectile_destroyed.push(Trigger::BeginCooldown);
                }
                ActivationConstraint::CooldownOnCastEnd => {
                    pipeline.availability.push(AvailabilityCheck::OffCooldown);
                    pipeline.after_cast.push(Trigger::BeginCooldown);
                }
                ActivationConstraint::NumberOfActiveInstances => {
                    pipeline.availability.push(AvailabilityCheck::BelowMaxInstances);
                }
                ActivationConstraint::PlayerIsActive => {
                    pipeline.requires_player_alive = true;
                    pipeline.availability.push(AvailabilityCheck::PlayerActive);
                }
            }
        }

        pipeline
    }

    pub fn availability(&self) -> &[AvailabilityCheck] {
        &self.availability
    }

    pub fn after_cast(&self) -> &[Trigger] {
        &self.after_cast
    }

    pub fn projectile_destroyed(&self) -> &[Trigger] {
        &self.projectile_destroyed
    }

    pub fn requires_player_alive(&self) -> bool {
        self.requires_player_alive
    }

    /// Logical AND of every availability check, starting from `true`
    pub fn is_available(&self, conditions: &impl CastConditions, now: Seconds) -> bool {
        self.availability
            .iter()
            .fold(true, |available, check| check.apply(available, conditions, now))
    }

    pub fn fire_after_cast(&self, cooldown: &mut CooldownTimer, now: Seconds) {
        for trigger in &self.after_cast {
            trigger.fire(cooldown, now);
        }
    }

    pub fn fire_projectile_destroyed(&self, cooldown: &mut CooldownTimer, now: Seconds) {
        for trigger in &self.projectile_destroyed {
            trigger.fire(cooldown, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Conditions {
        enabled: bool,
        cooldown: CooldownTimer,
        cooldown_duration: Seconds,
        active: u32,
        max: u32,
        player_active: bool,
    }

    impl Default for Conditions {
        fn default() -> Self {
            Conditions {
                enabled: true,
                cooldown: CooldownTimer::default(),
                cooldown_duration: 5.0,
                active: 0,
                max: 1,
                player_active: true,
            }
        }
    }

    impl CastConditions for Conditions {
        fn is_enabled(&self) -> bool {
            self.enabled
        }
        fn is_on_cooldown(&self, now: Seconds) -> bool {
            self.cooldown.is_active(now, self.cooldown_duration)
        }
        fn active_instances(&self) -> u32 {
            self.active
        }
        fn max_instances(&self) -> u32 {
            self.max
        }
        fn is_player_active(&self) -> bool {
            self.player_active
        }
    }

    #[test]
    fn test_chain_order_and_triggers() {
        let pipeline = ConstraintPipeline::build(&[
            ActivationConstraint::CooldownOnProjectileDestroyed,
            ActivationConstraint::NumberOfActiveInstances,
        ]);
        assert_eq!(
            pipeline.availability(),
            &[
                AvailabilityCheck::Enabled,
                AvailabilityCheck::OffCooldown,
                AvailabilityCheck::BelowMaxInstances
            ]
        );
        assert!(pipeline.after_cast().is_empty());
        assert_eq!(pipeline.projectile_destroyed(), &[Trigger::BeginCooldown]);
    }

    #[test]
    fn test_no_constraints_only_checks_enabled() {
        let pipeline = ConstraintPipeline::build(&[]);
        let mut conditions = Conditions::default();
        assert!(pipeline.is_available(&conditions, 0.0));

        conditions.enabled = false;
        assert!(!pipeline.is_available(&conditions, 0.0));
    }

    #[test]
    fn test_and_composition() {
        let pipeline = ConstraintPipeline::build(&[
            ActivationConstraint::CooldownOnCastEnd,
            ActivationConstraint::NumberOfActiveInstances,
        ]);
        let mut conditions = Conditions::default();
        assert!(pipeline.is_available(&conditions, 0.0));

        // Cooldown running, instances free
        conditions.cooldown.begin(0.0);
        assert!(!pipeline.is_available(&conditions, 1.0));

        // Cooldown over, instances full
        conditions.active = 1;
        assert!(!pipeline.is_available(&conditions, 10.0));

        // Both failing
        assert!(!pipeline.is_available(&conditions, 1.0));

        conditions.active = 0;
        assert!(pipeline.is_available(&conditions, 10.0));
    }

    #[test]
    fn test_checks_never_resurrect_false() {
        let conditions = Conditions::default();
        for check in [
            AvailabilityCheck::Enabled,
            AvailabilityCheck::OffCooldown,
            AvailabilityCheck::BelowMaxInstances,
            AvailabilityCheck::PlayerActive,
        ] {
            assert!(!check.apply(false, &conditions, 0.0));
        }
    }

    #[test]
    fn test_player_is_active_joins_chain() {
        let pipeline = ConstraintPipeline::build(&[ActivationConstraint::PlayerIsActive]);
        assert!(pipeline.requires_player_alive());

        let mut conditions = Conditions::default();
        assert!(pipeline.is_available(&conditions, 0.0));
        conditions.player_active = false;
        assert!(!pipeline.is_available(&conditions, 0.0));
    }

    #[test]
    fn test_cooldown_window() {
        let mut timer = CooldownTimer::default();
        assert!(!timer.is_active(0.0, 5.0));

        timer.begin(0.0);
        assert!(timer.is_active(4.9, 5.0));
        assert!(!timer.is_active(5.0, 5.0));
        assert!(!timer.is_active(7.5, 5.0));
        assert!((timer.remaining(3.0, 5.0) - 2.0).abs() < f64::EPSILON);
        assert!(timer.remaining(9.0, 5.0).abs() < f64::EPSILON);

        timer.reset();
        assert_eq!(timer.started_at(), None);
    }

    #[test]
    fn test_triggers_start_cooldown() {
        let pipeline = ConstraintPipeline::build(&[ActivationConstraint::CooldownOnCastEnd]);
        let mut timer = CooldownTimer::default();

        pipeline.fire_projectile_destroyed(&mut timer, 1.0);
        assert_eq!(timer.started_at(), None);

        pipeline.fire_after_cast(&mut timer, 2.0);
        assert_eq!(timer.started_at(), Some(2.0));
    }
}
