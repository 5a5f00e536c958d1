//! Actor - Read-only view of the players an ability is bound to

use crate::types::PlayerId;
use std::rc::Rc;

/// A player character as seen by an ability.
///
/// Abilities only read actor state; downing and reviving happen elsewhere.
pub trait Actor {
    fn id(&self) -> PlayerId;

    fn is_downed(&self) -> bool;

    fn is_same_player(&self, other: &dyn Actor) -> bool {
        self.id() == other.id()
    }
}

/// Shared handle to an actor owned by the game session
pub type ActorRef = Rc<dyn Actor>;
