//! Core state trait.
//!
//! This module defines the [`State`] trait, the unit of behavior driven by a
//! [`StateMachine`](crate::StateMachine). The trait is generic over a context
//! type `C` so hooks can read and mutate whatever world the owner exposes.

use core::fmt::Debug;

/// Exposes a cheap discriminant for a closed set of states.
///
/// Kept apart from [`State`] so membership checks do not depend on the
/// context type.
pub trait Kinded {
    /// Discriminant used by [`StateMachine::is_in_state`](crate::StateMachine::is_in_state).
    type Kind: Copy + Eq + Debug;

    /// Returns the discriminant of this state.
    fn kind(&self) -> Self::Kind;
}

/// A unit of behavior with enter/execute/exit hooks and message handling.
///
/// Every hook has an empty default, so a state only implements what it
/// reacts to. Fields owned by a state are transient: they are expected to be
/// reset in [`enter`](State::enter) and are meaningless after
/// [`exit`](State::exit).
pub trait State<C: ?Sized>: Kinded {
    /// Message type accepted by [`on_message`](State::on_message).
    type Message;

    /// Called once when the state becomes active.
    fn enter(&mut self, _ctx: &mut C) {}

    /// Called on every update while the state is active.
    fn execute(&mut self, _ctx: &mut C) {}

    /// Called once when the state is replaced.
    fn exit(&mut self, _ctx: &mut C) {}

    /// Offers a message to the state.
    ///
    /// Returns `true` when the message was consumed. Unconsumed messages fall
    /// through to the machine's global state, then are dropped.
    fn on_message(&mut self, _ctx: &mut C, _message: &Self::Message) -> bool {
        false
    }
}
