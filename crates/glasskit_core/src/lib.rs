//! GlassKit Core
//!
//! Framework-independent primitives the GlassKit widgets are built on:
//!
//! - **Events**: discrete input events with propagation/default flags and
//!   a register/remove-paired dispatcher
//! - **State Machines**: declarative transition tables for widget
//!   interaction states
//! - **Timers**: one-shot deadlines driven by the host clock, cancellable
//!   and deterministic
//! - **Host Elements**: the capability surface for mutating the element a
//!   widget is attached to
//! - **Style Mapping**: pure configuration -> style-attribute mappings a
//!   host binds to its rendering layer
//!
//! # Example
//!
//! ```rust
//! use glasskit_core::fsm::StateMachine;
//!
//! const IDLE: u32 = 0;
//! const ACTIVE: u32 = 1;
//! const START: u32 = 100;
//!
//! let mut fsm = StateMachine::builder(IDLE).on(IDLE, START, ACTIVE).build();
//! assert!(fsm.send(START));
//! assert_eq!(fsm.current_state(), ACTIVE);
//! ```

pub mod color;
pub mod element;
pub mod events;
pub mod fsm;
pub mod style;
pub mod timer;

pub use color::Color;
pub use element::{shared_element, ElementState, HostElement, SharedElement};
pub use events::{
    event_types, Event, EventData, EventDispatcher, EventHandler, EventType, HandlerId,
    DOCUMENT_TARGET, PRIMARY_BUTTON,
};
pub use fsm::{EventId, StateId, StateMachine, StateMachineBuilder, Transition};
pub use style::{Shadow, StyleProps, Transform};
pub use timer::{TimerHandle, TimerQueue};
