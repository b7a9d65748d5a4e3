//! Single dispatch point that owns the current [`SkillMapState`].

use chrono::{DateTime, Utc};

use crate::state::{Action, SkillMapState, reduce};

/// Source of completion timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Holds the latest state snapshot; intents are applied one at a time, in
/// submission order.
#[derive(Debug, Clone)]
pub struct Store<C: Clock = SystemClock> {
    state: SkillMapState,
    clock: C,
}

impl Store<SystemClock> {
    pub fn new(state: SkillMapState) -> Self {
        Self::with_clock(state, SystemClock)
    }
}

impl<C: Clock> Store<C> {
    pub fn with_clock(state: SkillMapState, clock: C) -> Self {
        Self { state, clock }
    }

    pub fn state(&self) -> &SkillMapState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> &SkillMapState {
        self.state = reduce(&self.state, action, self.clock.now());
        &self.state
    }

    pub fn dispatch_all<I>(&mut self, actions: I) -> &SkillMapState
    where
        I: IntoIterator<Item = Action>,
    {
        for action in actions {
            self.dispatch(action);
        }
        &self.state
    }

    pub fn into_state(self) -> SkillMapState {
        self.state
    }
}
