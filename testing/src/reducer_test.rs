//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use helpdesk_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// Several actions may be queued with repeated `when_action` calls; they
/// are reduced in order and the effect assertions see the effects of the
/// last one.
///
/// # Example
///
/// ```ignore
/// use helpdesk_testing::ReducerTest;
///
/// ReducerTest::new(DeskReducer::new())
///     .with_env(test_environment())
///     .given_state(DeskState::default())
///     .when_action(DeskAction::AddCustomer { draft })
///     .then_state(|state| {
///         assert_eq!(state.customers.len(), 1);
///     })
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Queue an action to reduce (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the effects of the last action (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use helpdesk_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if effects is not empty.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_core::{smallvec, SmallVec};

    #[derive(Clone, Debug)]
    struct BacklogState {
        open: i32,
    }

    #[derive(Clone, Debug)]
    enum BacklogAction {
        Open,
        Resolve,
        ResolveLater,
    }

    struct BacklogReducer;

    struct BacklogEnv;

    impl Reducer for BacklogReducer {
        type State = BacklogState;
        type Action = BacklogAction;
        type Environment = BacklogEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                BacklogAction::Open => {
                    state.open += 1;
                    smallvec![Effect::None]
                },
                BacklogAction::Resolve => {
                    state.open -= 1;
                    SmallVec::new()
                },
                BacklogAction::ResolveLater => {
                    smallvec![Effect::Future(Box::pin(async { Some(BacklogAction::Resolve) }))]
                },
            }
        }
    }

    #[test]
    fn single_action() {
        ReducerTest::new(BacklogReducer)
            .with_env(BacklogEnv)
            .given_state(BacklogState { open: 0 })
            .when_action(BacklogAction::Open)
            .then_state(|state| {
                assert_eq!(state.open, 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn actions_are_reduced_in_order() {
        ReducerTest::new(BacklogReducer)
            .with_env(BacklogEnv)
            .given_state(BacklogState { open: 5 })
            .when_action(BacklogAction::Resolve)
            .when_action(BacklogAction::Resolve)
            .when_action(BacklogAction::Open)
            .then_state(|state| {
                assert_eq!(state.open, 4);
            })
            .run();
    }

    #[test]
    fn future_effects_are_visible() {
        ReducerTest::new(BacklogReducer)
            .with_env(BacklogEnv)
            .given_state(BacklogState { open: 1 })
            .when_action(BacklogAction::ResolveLater)
            .then_state(|state| assert_eq!(state.open, 1))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }
}
