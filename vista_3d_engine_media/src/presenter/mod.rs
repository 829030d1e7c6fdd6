//! Presenter pipeline.
//!
//! A presenter drives one action over time through a fixed tickle state
//! machine. Composites orchestrate child presenters for multi-actions,
//! media presenters consume chunk streams, control presenters turn
//! clicks into state selections. Presenters only change state inside a
//! tickle call.

mod action_control;
mod composite;
mod control;
mod events;
#[allow(clippy::module_inception)]
mod presenter;

pub use action_control::ActionControlPresenter;
pub use composite::{CompositeKind, CompositePresenter};
pub use control::{ControlPresenter, ControlStyle};
pub use events::{EngineEvent, EventQueue};
pub use presenter::{
    presenter_for_action, LeafPresenter, MediaPresenter, Presenter, PresenterClient,
    PresenterContext, PresenterCore, TickleState,
};
