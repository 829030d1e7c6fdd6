/// Streaming wrapper around an action.
///
/// Carries the byte cursor into the resource, two chunk-buffer slots
/// for split-chunk merging and lookahead, a streaming-progress counter
/// and the repeat-time accumulator used by looping playback.

use crate::action::{Action, DURATION_UNSET};
use crate::chunk::ChunkBuffer;

#[derive(Debug, Clone)]
pub struct StreamingAction {
    inner: Action,
    buffer_offset: u32,
    /// Chunks delivered so far for the current pass
    progress: i32,
    /// Split-merge slot and lookahead slot
    primary: Option<ChunkBuffer>,
    secondary: Option<ChunkBuffer>,
    /// Total duration consumed by completed loops, in ms
    accumulated_duration: i32,
}

impl StreamingAction {
    pub fn new(inner: Action, buffer_offset: u32) -> Self {
        Self {
            inner,
            buffer_offset,
            progress: 0,
            primary: None,
            secondary: None,
            accumulated_duration: 0,
        }
    }

    pub fn inner(&self) -> &Action {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut Action {
        &mut self.inner
    }

    pub fn object_id(&self) -> u32 {
        self.inner.core.object_id
    }

    /// Whether this wrapper or its inner action carries `object_id`.
    pub fn has_id(&self, object_id: u32) -> bool {
        self.inner.has_id(object_id)
    }

    pub fn buffer_offset(&self) -> u32 {
        self.buffer_offset
    }

    pub fn set_buffer_offset(&mut self, offset: u32) {
        self.buffer_offset = offset;
    }

    pub fn progress(&self) -> i32 {
        self.progress
    }

    pub fn bump_progress(&mut self) {
        self.progress += 1;
    }

    pub fn take_primary(&mut self) -> Option<ChunkBuffer> {
        self.primary.take()
    }

    pub fn set_primary(&mut self, chunk: Option<ChunkBuffer>) {
        self.primary = chunk;
    }

    pub fn take_secondary(&mut self) -> Option<ChunkBuffer> {
        self.secondary.take()
    }

    pub fn set_secondary(&mut self, chunk: Option<ChunkBuffer>) {
        self.secondary = chunk;
    }

    pub fn accumulated_duration(&self) -> i32 {
        self.accumulated_duration
    }

    /// Account for one finished loop: accumulate the pass duration,
    /// consume a repeat and rewind the byte cursor. Actions without a
    /// usable duration are left alone.
    pub fn advance_loop(&mut self) {
        let duration = self.inner.duration();
        if duration == DURATION_UNSET || duration < 0 {
            return;
        }
        self.accumulated_duration += duration;
        if self.inner.core.loop_count > 0 {
            self.inner.core.loop_count -= 1;
        }
        self.buffer_offset = 0;
        self.progress = 0;
    }
}

#[cfg(test)]
#[path = "streaming_action_tests.rs"]
mod tests;
