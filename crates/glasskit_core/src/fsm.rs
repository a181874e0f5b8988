//! Finite state machines for widget interaction states
//!
//! States and events are plain `u32` identifiers; widgets declare their
//! transition tables up front through the builder and drive the machine by
//! sending events. Events with no transition from the current state are
//! ignored, which is what makes per-widget tables safe to feed from a
//! shared event stream.

/// State identifier
pub type StateId = u32;

/// Event identifier
pub type EventId = u32;

/// A single `(from, event) -> to` transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub event: EventId,
    pub to: StateId,
}

/// A finite state machine with a fixed transition table
#[derive(Clone, Debug)]
pub struct StateMachine {
    current: StateId,
    transitions: Vec<Transition>,
}

impl StateMachine {
    /// Start building a machine with the given initial state
    pub fn builder(initial: StateId) -> StateMachineBuilder {
        StateMachineBuilder {
            initial,
            transitions: Vec::new(),
        }
    }

    /// The current state
    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// Send an event to the machine
    ///
    /// Returns true if a transition fired. Events with no transition from
    /// the current state leave the machine unchanged.
    pub fn send(&mut self, event: EventId) -> bool {
        let next = self
            .transitions
            .iter()
            .find(|t| t.from == self.current && t.event == event)
            .map(|t| t.to);

        match next {
            Some(to) => {
                self.current = to;
                true
            }
            None => false,
        }
    }
}

/// Builder for declaring a transition table
pub struct StateMachineBuilder {
    initial: StateId,
    transitions: Vec<Transition>,
}

impl StateMachineBuilder {
    /// Declare a transition
    pub fn on(mut self, from: StateId, event: EventId, to: StateId) -> Self {
        self.transitions.push(Transition { from, event, to });
        self
    }

    /// Build the machine
    pub fn build(self) -> StateMachine {
        StateMachine {
            current: self.initial,
            transitions: self.transitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: StateId = 0;
    const ACTIVE: StateId = 1;

    const START: EventId = 100;
    const STOP: EventId = 101;

    #[test]
    fn test_transitions() {
        let mut fsm = StateMachine::builder(IDLE)
            .on(IDLE, START, ACTIVE)
            .on(ACTIVE, STOP, IDLE)
            .build();

        assert_eq!(fsm.current_state(), IDLE);

        assert!(fsm.send(START));
        assert_eq!(fsm.current_state(), ACTIVE);

        assert!(fsm.send(STOP));
        assert_eq!(fsm.current_state(), IDLE);
    }

    #[test]
    fn test_unknown_event_is_ignored() {
        let mut fsm = StateMachine::builder(IDLE).on(IDLE, START, ACTIVE).build();

        // STOP has no transition from IDLE
        assert!(!fsm.send(STOP));
        assert_eq!(fsm.current_state(), IDLE);

        // Repeated START from ACTIVE is also a no-op
        fsm.send(START);
        assert!(!fsm.send(START));
        assert_eq!(fsm.current_state(), ACTIVE);
    }
}
