/// Composite presenters: orchestration of child presenters for
/// multi-actions.
///
/// Parallel composites run every child concurrently and end once all
/// children are done. Serial composites keep exactly one child out of
/// idle, promoting the next when its predecessor ends. Select behaves
/// like parallel over the single child the deserialiser kept.
///
/// Child coordination is notification-shaped: the composite observes
/// state transitions after each child tickle and reacts through
/// `on_child_end` / `on_child_state_changed`; it never reaches into
/// child internals.

use vista_3d_engine::engine_err;
use vista_3d_engine::error::Result;

use crate::action::{Action, ActionPayload, MultiKind};

use super::presenter::{presenter_for_action, Presenter, PresenterContext, PresenterCore, TickleState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    Parallel,
    Serial,
    Select,
}

pub struct CompositePresenter {
    core: PresenterCore,
    kind: CompositeKind,
    children: Vec<Box<dyn Presenter>>,
    /// Child states as of the previous pass, for transition detection
    prev_states: Vec<TickleState>,
    /// Children that have completed their action
    finished: Vec<bool>,
}

impl CompositePresenter {
    pub fn new() -> Self {
        Self {
            core: PresenterCore::new(),
            kind: CompositeKind::Parallel,
            children: Vec::new(),
            prev_states: Vec::new(),
            finished: Vec::new(),
        }
    }

    pub fn kind(&self) -> CompositeKind {
        self.kind
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> Option<&dyn Presenter> {
        self.children.get(index).map(Box::as_ref)
    }

    /// Whether child `index` has completed its action this run.
    pub fn finished_child(&self, index: usize) -> bool {
        self.finished.get(index).copied().unwrap_or(false)
    }

    /// Notification: child `index` finished its action.
    ///
    /// Serial composites promote the successor; when every child is
    /// finished the composite completes.
    pub fn on_child_end(&mut self, index: usize) {
        if index < self.finished.len() {
            self.finished[index] = true;
        }
        if self.kind == CompositeKind::Serial {
            self.promote_next_in_serial(index);
        }
        if self.finished.iter().all(|&done| done) {
            self.core_mut().set_state(TickleState::Done);
        }
    }

    /// Notification: child `index` moved to a new state. Pure signal;
    /// the base composite has nothing to do.
    pub fn on_child_state_changed(&mut self, _index: usize, _state: TickleState) {}

    /// Arm the child after `index` so the sequence continues.
    pub fn promote_next_in_serial(&mut self, index: usize) {
        if let Some(next) = self.children.get_mut(index + 1) {
            next.arm();
        }
    }

    /// Delegated state query up the composite chain. The base composite
    /// always allows.
    pub fn composite_state_query(&self) -> bool {
        true
    }
}

impl Default for CompositePresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for CompositePresenter {
    fn core(&self) -> &PresenterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PresenterCore {
        &mut self.core
    }

    /// Build one presenter per child action and schedule them according
    /// to the multi kind.
    fn start_action(&mut self, action: Action) -> Result<()> {
        let kind = match &action.payload {
            ActionPayload::Multi { kind, .. } => match kind {
                MultiKind::Parallel => CompositeKind::Parallel,
                MultiKind::Serial => CompositeKind::Serial,
                MultiKind::Select { .. } => CompositeKind::Select,
            },
            _ => {
                return Err(engine_err!(InvalidParameters, "vista3d::CompositePresenter",
                    "composite needs a multi-action"));
            }
        };

        let mut children = Vec::with_capacity(action.children().len());
        for child_action in action.children() {
            children.push(presenter_for_action(child_action)?);
        }

        // The factory arms every presenter; serial children past the
        // first wait for promotion
        if kind == CompositeKind::Serial {
            for child in children.iter_mut().skip(1) {
                child.disarm();
            }
        }

        self.kind = kind;
        self.prev_states = children.iter().map(|child| child.state()).collect();
        self.finished = vec![false; children.len()];
        self.children = children;
        self.set_action(action);
        self.arm();
        Ok(())
    }

    /// Composites are considered past a state only when every child is.
    fn has_tickle_state_passed(&self, state: TickleState) -> bool {
        if self.children.is_empty() {
            return self.state().has_passed(state);
        }
        self.children
            .iter()
            .enumerate()
            .all(|(index, child)| self.finished[index] || child.has_tickle_state_passed(state))
    }

    fn enable(&mut self, enabled: bool) {
        self.core_mut().enabled = enabled;
        for child in &mut self.children {
            child.enable(enabled);
        }
    }

    fn streaming_tickle(&mut self, ctx: &mut PresenterContext<'_>) -> Result<()> {
        if self.children.is_empty() {
            self.core_mut().set_state(TickleState::Done);
            return Ok(());
        }

        // Advance the children, then route transitions
        let mut transitions = Vec::new();
        for (index, child) in self.children.iter_mut().enumerate() {
            let before = self.prev_states[index];
            child.tickle(ctx)?;
            let after = child.state();
            if after != before {
                self.prev_states[index] = after;
                transitions.push((index, before, after));
            }
        }

        for (index, before, after) in transitions {
            self.on_child_state_changed(index, after);
            // Done fires once per run; a child cycling back to idle
            // afterwards is not a second completion
            if after == TickleState::Done && before != TickleState::Done {
                self.on_child_end(index);
            }
        }
        Ok(())
    }

    fn done_tickle(&mut self, ctx: &mut PresenterContext<'_>) -> Result<()> {
        // Give children that just reached done their final pass so their
        // own end notifications fire
        for child in &mut self.children {
            if child.state() == TickleState::Done {
                child.tickle(ctx)?;
            }
        }
        self.end_action(ctx);
        Ok(())
    }
}

#[cfg(test)]
#[path = "composite_tests.rs"]
mod tests;
