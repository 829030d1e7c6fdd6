//! SI action model.
//!
//! Actions come out of SI files as trees: multi-actions (parallel,
//! serial, select) over media leaves. The tree is a tagged variant:
//! [`Action`] couples the shared [`ActionCore`] fields with an
//! [`ActionPayload`], and behaviour (durations, merging, id lookup)
//! lives in functions dispatching on the payload.

#[allow(clippy::module_inception)]
mod action;
mod deserialize;
mod media;

pub use action::{
    Action, ActionCore, ActionFlags, ActionPayload, MultiKind, DURATION_UNSET, FLOAT_UNSET,
    LOOP_UNSET, TIME_UNSET,
};
pub use deserialize::{deserialize_action, serialize_action, DeserializeContext, VariableTable};
pub use media::{MediaInfo, MediaKind, SUSTAIN_INDEFINITE};
