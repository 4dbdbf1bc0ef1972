//! Gameplay system sets.
//!
//! ```text
//! FixedUpdate:     LifeCycle -> Environment -> Controls -> Motion -> Fire -> Latches
//! FixedPostUpdate: (after Avian collision messages)
//!                  Sense -> Rules -> Resolve -> Outcome -> Commit
//! ```
//!
//! Plugins put their systems into these sets; `core` chains them once so the
//! order of every tick is fixed regardless of registration order.

use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySystems {
    LifeCycle,
    Environment,
    Controls,
    Motion,
    Fire,
    Latches,
    Sense,
    Rules,
    Resolve,
    Outcome,
    Commit,
}
