/// The tickle state machine and the presenter trait family.
///
/// Every presenter cycles `idle -> ready -> starting -> streaming ->
/// repeating -> freezing -> done -> idle`, advanced only from inside
/// `tickle`. States may be skipped (a zero-duration event goes straight
/// from starting to done) but never revisited within a run.

use std::sync::Arc;

use vista_3d_engine::error::Result;

use crate::action::{Action, ActionPayload, DURATION_UNSET};
use crate::chunk::ChunkBuffer;
use crate::stream::{ChunkStream, StreamingAction};
use crate::tickle::Tickle;

use super::composite::CompositePresenter;
use super::control::ControlPresenter;
use super::action_control::ActionControlPresenter;
use super::events::{EngineEvent, EventQueue};

/// Tickle states, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TickleState {
    Idle,
    Ready,
    Starting,
    Streaming,
    Repeating,
    Freezing,
    Done,
}

impl TickleState {
    /// Whether this state comes after `other` in the cycle.
    pub fn has_passed(self, other: TickleState) -> bool {
        self > other
    }
}

/// Per-tickle environment handed to presenters.
pub struct PresenterContext<'a> {
    pub now_ms: u32,
    pub events: &'a EventQueue,
}

/// State shared by every presenter implementation.
pub struct PresenterCore {
    state: TickleState,
    action: Option<Action>,
    /// Armed presenters leave idle on their next tickle
    armed: bool,
    pub(crate) enabled: bool,
}

impl PresenterCore {
    pub fn new() -> Self {
        Self { state: TickleState::Idle, action: None, armed: false, enabled: true }
    }

    pub fn state(&self) -> TickleState {
        self.state
    }

    /// Move the state machine. Presenters call this from their tickle
    /// hooks only.
    pub fn set_state(&mut self, state: TickleState) {
        self.state = state;
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn action_mut(&mut self) -> Option<&mut Action> {
        self.action.as_mut()
    }
}

impl Default for PresenterCore {
    fn default() -> Self {
        Self::new()
    }
}

/// A state-machine object driving one action over time.
///
/// Implementations embed a [`PresenterCore`] and override the per-state
/// tickle hooks they care about; the default hooks advance straight
/// through the cycle.
pub trait Presenter: Send {
    fn core(&self) -> &PresenterCore;
    fn core_mut(&mut self) -> &mut PresenterCore;

    fn state(&self) -> TickleState {
        self.core().state
    }

    fn has_tickle_state_passed(&self, state: TickleState) -> bool {
        self.state().has_passed(state)
    }

    fn is_enabled(&self) -> bool {
        self.core().enabled
    }

    fn enable(&mut self, enabled: bool) {
        self.core_mut().enabled = enabled;
    }

    /// Store the action without arming it; the owner decides when the
    /// presenter leaves idle.
    fn set_action(&mut self, action: Action) {
        self.core_mut().action = Some(action);
    }

    /// Allow the presenter to leave idle on its next tickle.
    fn arm(&mut self) {
        self.core_mut().armed = true;
    }

    /// Keep the presenter in idle until re-armed (used by serial
    /// composites on their not-yet-due children).
    fn disarm(&mut self) {
        self.core_mut().armed = false;
    }

    /// Adopt and arm an action in one step.
    fn start_action(&mut self, action: Action) -> Result<()> {
        self.set_action(action);
        self.arm();
        Ok(())
    }

    /// Release the current action and return to idle, reporting the end
    /// to the host.
    fn end_action(&mut self, ctx: &mut PresenterContext<'_>) {
        if let Some(action) = self.core_mut().action.take() {
            ctx.events.push(EngineEvent::ActionEnded { object_id: action.core.object_id });
        }
        let core = self.core_mut();
        core.armed = false;
        core.state = TickleState::Idle;
    }

    /// Hook for configuration parsed out of the action's extra data.
    fn parse_extra(&mut self) -> Result<()> {
        Ok(())
    }

    /// Advance the state machine one step. All transitions happen here.
    fn tickle(&mut self, ctx: &mut PresenterContext<'_>) -> Result<()> {
        match self.state() {
            TickleState::Idle => self.idle_tickle(ctx),
            TickleState::Ready => self.ready_tickle(ctx),
            TickleState::Starting => self.starting_tickle(ctx),
            TickleState::Streaming => {
                if self.is_enabled() {
                    self.streaming_tickle(ctx)
                } else {
                    Ok(())
                }
            }
            TickleState::Repeating => {
                if self.is_enabled() {
                    self.repeating_tickle(ctx)
                } else {
                    Ok(())
                }
            }
            TickleState::Freezing => self.freezing_tickle(ctx),
            TickleState::Done => self.done_tickle(ctx),
        }
    }

    fn idle_tickle(&mut self, _ctx: &mut PresenterContext<'_>) -> Result<()> {
        let core = self.core_mut();
        if core.armed && core.action.is_some() {
            core.armed = false;
            core.state = TickleState::Ready;
        }
        Ok(())
    }

    fn ready_tickle(&mut self, _ctx: &mut PresenterContext<'_>) -> Result<()> {
        self.parse_extra()?;
        self.core_mut().state = TickleState::Starting;
        Ok(())
    }

    fn starting_tickle(&mut self, _ctx: &mut PresenterContext<'_>) -> Result<()> {
        self.core_mut().state = TickleState::Streaming;
        Ok(())
    }

    fn streaming_tickle(&mut self, _ctx: &mut PresenterContext<'_>) -> Result<()> {
        self.core_mut().state = TickleState::Repeating;
        Ok(())
    }

    fn repeating_tickle(&mut self, _ctx: &mut PresenterContext<'_>) -> Result<()> {
        self.core_mut().state = TickleState::Freezing;
        Ok(())
    }

    fn freezing_tickle(&mut self, _ctx: &mut PresenterContext<'_>) -> Result<()> {
        self.core_mut().state = TickleState::Done;
        Ok(())
    }

    fn done_tickle(&mut self, ctx: &mut PresenterContext<'_>) -> Result<()> {
        self.end_action(ctx);
        Ok(())
    }
}

// ============================================================================
// Leaf presenter
// ============================================================================

/// Minimal presenter: walks the default cycle and ends.
pub struct LeafPresenter {
    core: PresenterCore,
}

impl LeafPresenter {
    pub fn new() -> Self {
        Self { core: PresenterCore::new() }
    }
}

impl Default for LeafPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for LeafPresenter {
    fn core(&self) -> &PresenterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PresenterCore {
        &mut self.core
    }
}

// ============================================================================
// Media presenter
// ============================================================================

/// Drives one media action from a chunk stream.
///
/// Chunks flow through a current/lookahead buffer pair; one chunk is
/// consumed per tickle. When the action's duration elapses the
/// presenter loops (`repeating`) while repeats remain, then sustains
/// (`freezing`) and completes.
pub struct MediaPresenter {
    core: PresenterCore,
    streaming: Option<StreamingAction>,
    feed: Option<Box<dyn ChunkStream>>,
    current: Option<ChunkBuffer>,
    lookahead: Option<ChunkBuffer>,
    chunks_consumed: usize,
    start_ms: Option<u32>,
    sustain_until: Option<u32>,
    stream_end_reported: bool,
}

impl MediaPresenter {
    pub fn new() -> Self {
        Self {
            core: PresenterCore::new(),
            streaming: None,
            feed: None,
            current: None,
            lookahead: None,
            chunks_consumed: 0,
            start_ms: None,
            sustain_until: None,
            stream_end_reported: false,
        }
    }

    /// Attach the chunk source this presenter consumes.
    pub fn with_feed(mut self, feed: Box<dyn ChunkStream>) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn set_feed(&mut self, feed: Box<dyn ChunkStream>) {
        self.feed = Some(feed);
    }

    /// Chunks handed to playback so far, current pass.
    pub fn chunks_consumed(&self) -> usize {
        self.chunks_consumed
    }

    pub fn streaming_action(&self) -> Option<&StreamingAction> {
        self.streaming.as_ref()
    }

    fn sustain_time(&self) -> i32 {
        self.core
            .action()
            .and_then(|action| action.media_info())
            .map(|info| info.sustain_time)
            .unwrap_or(0)
    }

    /// Shift the buffer pair and pull the lookahead full.
    fn pump_chunks(&mut self) -> Result<()> {
        if self.current.is_none() {
            self.current = self.lookahead.take();
        }
        if self.lookahead.is_none() {
            if let Some(feed) = self.feed.as_mut() {
                self.lookahead = feed.next_chunk()?;
            }
        }
        if self.current.take().is_some() {
            self.chunks_consumed += 1;
            if let Some(streaming) = self.streaming.as_mut() {
                streaming.bump_progress();
            }
        }
        Ok(())
    }

    /// True when the action's duration has elapsed on the tickle clock.
    fn duration_elapsed(&self, now_ms: u32) -> bool {
        let Some(action) = self.core.action() else {
            return true;
        };
        let duration = action.duration();
        if duration == DURATION_UNSET {
            // No fixed duration: the stream decides
            return self
                .feed
                .as_ref()
                .map(|feed| feed.exhausted() && self.lookahead.is_none())
                .unwrap_or(false);
        }
        match self.start_ms {
            Some(start) => now_ms.wrapping_sub(start) >= duration.max(0) as u32,
            None => false,
        }
    }

    fn loops_remain(&self) -> bool {
        self.streaming
            .as_ref()
            .map(|streaming| {
                let loops = streaming.inner().core.loop_count;
                loops > 0 || loops == -1
            })
            .unwrap_or(false)
    }

    /// Consume the elapsed pass: loop again or move on to sustain.
    fn finish_pass(&mut self, ctx: &mut PresenterContext<'_>) -> Result<()> {
        if self.core.action().map(|action| action.is_looping()).unwrap_or(false)
            && self.loops_remain()
        {
            if let Some(streaming) = self.streaming.as_mut() {
                streaming.advance_loop();
            }
            if let Some(feed) = self.feed.as_mut() {
                feed.rewind()?;
            }
            self.current = None;
            self.lookahead = None;
            self.chunks_consumed = 0;
            self.start_ms = Some(ctx.now_ms);
            self.core.state = TickleState::Repeating;
            return Ok(());
        }

        let sustain = self.sustain_time();
        if sustain == crate::action::SUSTAIN_INDEFINITE {
            self.sustain_until = None;
            self.core.state = TickleState::Freezing;
        } else if sustain > 0 {
            self.sustain_until = Some(ctx.now_ms.wrapping_add(sustain as u32));
            self.core.state = TickleState::Freezing;
        } else {
            self.core.state = TickleState::Done;
        }
        Ok(())
    }

    fn report_stream_end(&mut self, ctx: &mut PresenterContext<'_>) {
        if self.stream_end_reported {
            return;
        }
        if let Some(feed) = self.feed.as_ref() {
            if feed.exhausted() {
                if let Some(action) = self.core.action() {
                    ctx.events
                        .push(EngineEvent::StreamEnded { object_id: action.core.object_id });
                }
                self.stream_end_reported = true;
            }
        }
    }
}

impl Default for MediaPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for MediaPresenter {
    fn core(&self) -> &PresenterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PresenterCore {
        &mut self.core
    }

    fn start_action(&mut self, action: Action) -> Result<()> {
        self.streaming = Some(StreamingAction::new(action.clone(), 0));
        self.current = None;
        self.lookahead = None;
        self.chunks_consumed = 0;
        self.start_ms = None;
        self.sustain_until = None;
        self.stream_end_reported = false;
        self.set_action(action);
        self.arm();
        Ok(())
    }

    fn starting_tickle(&mut self, ctx: &mut PresenterContext<'_>) -> Result<()> {
        self.start_ms = Some(ctx.now_ms);
        if let Some(action) = self.core.action_mut() {
            action.set_start_timestamp(ctx.now_ms as i32);
        }
        self.core.state = TickleState::Streaming;
        Ok(())
    }

    fn streaming_tickle(&mut self, ctx: &mut PresenterContext<'_>) -> Result<()> {
        self.pump_chunks()?;
        self.report_stream_end(ctx);
        if self.duration_elapsed(ctx.now_ms) {
            self.finish_pass(ctx)?;
        }
        Ok(())
    }

    fn repeating_tickle(&mut self, ctx: &mut PresenterContext<'_>) -> Result<()> {
        // Loop passes behave like streaming with the repeat bookkeeping
        // already done
        self.pump_chunks()?;
        if self.duration_elapsed(ctx.now_ms) {
            self.finish_pass(ctx)?;
        }
        Ok(())
    }

    fn freezing_tickle(&mut self, ctx: &mut PresenterContext<'_>) -> Result<()> {
        match self.sustain_until {
            // Indefinite sustain: hold until the owner ends the action
            None => Ok(()),
            Some(deadline) => {
                if ctx.now_ms.wrapping_sub(deadline) < u32::MAX / 2 {
                    self.core.state = TickleState::Done;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// Tickle manager bridge
// ============================================================================

/// Adapts a presenter to the tickle manager's client interface.
pub struct PresenterClient {
    presenter: Box<dyn Presenter>,
    events: Arc<EventQueue>,
}

impl PresenterClient {
    pub fn new(presenter: Box<dyn Presenter>, events: Arc<EventQueue>) -> Self {
        Self { presenter, events }
    }

    pub fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }

    pub fn presenter_mut(&mut self) -> &mut Box<dyn Presenter> {
        &mut self.presenter
    }
}

impl Tickle for PresenterClient {
    fn tickle(&mut self, now_ms: u32) -> Result<()> {
        let mut ctx = PresenterContext { now_ms, events: self.events.as_ref() };
        self.presenter.tickle(&mut ctx)
    }
}

// ============================================================================
// Presenter factory
// ============================================================================

/// Instantiate the presenter matching an action's shape.
///
/// Multi-actions get composites, media actions a media presenter,
/// `style:`-configured actions a control presenter, `action:`-tagged
/// events an action-control presenter.
pub fn presenter_for_action(action: &Action) -> Result<Box<dyn Presenter>> {
    if action.core.extra.starts_with(b"style:") {
        let mut presenter = ControlPresenter::new();
        presenter.start_action(action.clone())?;
        return Ok(Box::new(presenter));
    }

    match &action.payload {
        ActionPayload::Multi { .. } => {
            let mut presenter = CompositePresenter::new();
            presenter.start_action(action.clone())?;
            Ok(Box::new(presenter))
        }
        ActionPayload::Media { .. } => {
            if action.core.extra.starts_with(b"action:") {
                let mut presenter = ActionControlPresenter::new();
                presenter.start_action(action.clone())?;
                return Ok(Box::new(presenter));
            }
            let mut presenter = MediaPresenter::new();
            presenter.start_action(action.clone())?;
            Ok(Box::new(presenter))
        }
        ActionPayload::Leaf => {
            let mut presenter = LeafPresenter::new();
            presenter.start_action(action.clone())?;
            Ok(Box::new(presenter))
        }
    }
}

#[cfg(test)]
#[path = "presenter_tests.rs"]
mod tests;
