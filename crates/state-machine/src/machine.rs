//! The layered state machine.
//!
//! [`StateMachine`] drives a current state and an optional global state. The
//! global state is updated first and acts as the fallback receiver for
//! messages the current state does not consume.

use crate::{Kinded, State};

/// Owns the current (and optional global) state of one agent or entity.
#[derive(Debug, Clone)]
pub struct StateMachine<S> {
    current: S,
    global: Option<S>,
    started: bool,
    generation: u64,
}

impl<S> StateMachine<S> {
    /// Creates a machine with only a current state.
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            global: None,
            started: false,
            generation: 0,
        }
    }

    /// Creates a machine whose `global` state runs before the current one.
    pub fn with_global(initial: S, global: S) -> Self {
        Self {
            current: initial,
            global: Some(global),
            started: false,
            generation: 0,
        }
    }

    pub fn current(&self) -> &S {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut S {
        &mut self.current
    }

    pub fn global(&self) -> Option<&S> {
        self.global.as_ref()
    }

    /// Number of transitions performed so far.
    ///
    /// Work started by a state can capture this value and compare it later to
    /// detect that the issuing activation has been exited in the meantime.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the states have been entered.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Enters the global state, then the current state.
    ///
    /// Calling this more than once has no effect.
    pub fn start<C: ?Sized>(&mut self, ctx: &mut C)
    where
        S: State<C>,
    {
        if self.started {
            return;
        }
        self.started = true;
        if let Some(global) = self.global.as_mut() {
            global.enter(ctx);
        }
        self.current.enter(ctx);
    }

    /// Executes the global state, then the current state.
    pub fn update<C: ?Sized>(&mut self, ctx: &mut C)
    where
        S: State<C>,
    {
        self.start(ctx);
        if let Some(global) = self.global.as_mut() {
            global.execute(ctx);
        }
        self.current.execute(ctx);
    }

    /// Exits the current state, installs `next` and enters it.
    ///
    /// Transitions to a state of the same kind are full re-entries. Returns
    /// the state that was replaced.
    pub fn change_state<C: ?Sized>(&mut self, ctx: &mut C, next: S) -> S
    where
        S: State<C>,
    {
        self.start(ctx);
        self.current.exit(ctx);
        let previous = core::mem::replace(&mut self.current, next);
        self.generation = self.generation.wrapping_add(1);
        self.current.enter(ctx);
        previous
    }

    /// Offers `message` to the current state, then to the global state.
    ///
    /// Returns `false` when neither consumed it.
    pub fn handle_message<C: ?Sized>(
        &mut self,
        ctx: &mut C,
        message: &<S as State<C>>::Message,
    ) -> bool
    where
        S: State<C>,
    {
        self.start(ctx);
        if self.current.on_message(ctx, message) {
            return true;
        }
        match self.global.as_mut() {
            Some(global) => global.on_message(ctx, message),
            None => false,
        }
    }

    /// Returns `true` when the current state has discriminant `kind`.
    pub fn is_in_state(&self, kind: S::Kind) -> bool
    where
        S: Kinded,
    {
        self.current.kind() == kind
    }

    /// Discriminant of the current state.
    pub fn current_kind(&self) -> S::Kind
    where
        S: Kinded,
    {
        self.current.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct TestContext {
        log: Vec<String>,
        consumed_by_global: u32,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Counting,
        Silent,
        Global,
    }

    enum TestState {
        Counting { ticks: u32 },
        Silent,
        Global,
    }

    impl Kinded for TestState {
        type Kind = Kind;

        fn kind(&self) -> Kind {
            match self {
                TestState::Counting { .. } => Kind::Counting,
                TestState::Silent => Kind::Silent,
                TestState::Global => Kind::Global,
            }
        }
    }

    impl State<TestContext> for TestState {
        type Message = &'static str;

        fn enter(&mut self, ctx: &mut TestContext) {
            if let TestState::Counting { ticks } = self {
                *ticks = 0;
            }
            ctx.log.push(format!("enter {:?}", self.kind()));
        }

        fn execute(&mut self, ctx: &mut TestContext) {
            if let TestState::Counting { ticks } = self {
                *ticks += 1;
            }
            ctx.log.push(format!("execute {:?}", self.kind()));
        }

        fn exit(&mut self, ctx: &mut TestContext) {
            ctx.log.push(format!("exit {:?}", self.kind()));
        }

        fn on_message(&mut self, ctx: &mut TestContext, message: &&'static str) -> bool {
            match (self, *message) {
                (TestState::Counting { .. }, "count") => true,
                (TestState::Global, "global") => {
                    ctx.consumed_by_global += 1;
                    true
                }
                _ => false,
            }
        }
    }

    #[test]
    fn update_enters_before_first_execute() {
        let mut machine = StateMachine::with_global(TestState::Silent, TestState::Global);
        let mut ctx = TestContext::default();

        machine.update(&mut ctx);
        machine.update(&mut ctx);

        assert_eq!(
            ctx.log,
            [
                "enter Global",
                "enter Silent",
                "execute Global",
                "execute Silent",
                "execute Global",
                "execute Silent",
            ]
        );
    }

    #[test]
    fn change_state_exits_once_then_enters() {
        let mut machine = StateMachine::new(TestState::Silent);
        let mut ctx = TestContext::default();
        machine.start(&mut ctx);
        ctx.log.clear();

        let previous = machine.change_state(&mut ctx, TestState::Counting { ticks: 7 });

        assert!(matches!(previous, TestState::Silent));
        assert_eq!(ctx.log, ["exit Silent", "enter Counting"]);
        assert!(machine.is_in_state(Kind::Counting));
        assert_eq!(machine.generation(), 1);
    }

    #[test]
    fn change_to_same_kind_reenters_and_resets() {
        let mut machine = StateMachine::new(TestState::Counting { ticks: 0 });
        let mut ctx = TestContext::default();
        machine.update(&mut ctx);
        machine.update(&mut ctx);
        assert!(matches!(machine.current(), TestState::Counting { ticks: 2 }));

        ctx.log.clear();
        machine.change_state(&mut ctx, TestState::Counting { ticks: 40 });

        assert_eq!(ctx.log, ["exit Counting", "enter Counting"]);
        assert!(matches!(machine.current(), TestState::Counting { ticks: 0 }));
    }

    #[test]
    fn change_state_before_start_enters_initial_first() {
        let mut machine = StateMachine::new(TestState::Silent);
        let mut ctx = TestContext::default();

        machine.change_state(&mut ctx, TestState::Counting { ticks: 0 });

        assert_eq!(ctx.log, ["enter Silent", "exit Silent", "enter Counting"]);
    }

    #[test]
    fn messages_fall_back_to_global() {
        let mut machine =
            StateMachine::with_global(TestState::Counting { ticks: 0 }, TestState::Global);
        let mut ctx = TestContext::default();

        assert!(machine.handle_message(&mut ctx, &"count"));
        assert_eq!(ctx.consumed_by_global, 0);

        assert!(machine.handle_message(&mut ctx, &"global"));
        assert_eq!(ctx.consumed_by_global, 1);

        assert!(!machine.handle_message(&mut ctx, &"unknown"));
    }

    #[test]
    fn unconsumed_message_without_global_is_dropped() {
        let mut machine = StateMachine::new(TestState::Silent);
        let mut ctx = TestContext::default();

        assert!(!machine.handle_message(&mut ctx, &"count"));
    }
}
