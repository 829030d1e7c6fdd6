/// Disk stream provider: worker-thread chunk streaming.
///
/// One dedicated worker serves a queue of streaming requests. A single
/// critical section (the work-state mutex) covers every queue mutation;
/// a counting semaphore signals the worker. Because there is exactly
/// one worker popping a FIFO queue, chunks reach any given sink in
/// on-disk order.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;

use vista_3d_engine::error::Result;
use vista_3d_engine::{engine_err, engine_warn};

use crate::action::Action;
use crate::chunk::{BufferPool, ChunkBuffer, ChunkHeader, ChunkStoreFlags, CHUNK_HEADER_SIZE};
use crate::sync::Semaphore;

use super::{ChunkStream, StreamProvider, StreamSink, StreamingAction};

/// Which queued requests a cancel call matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelMatch {
    /// Every queued request
    All,
    /// Requests whose action carries this object id
    ObjectId(u32),
    /// The single request identified by a token from `schedule`
    Request(u64),
}

struct WorkItem {
    token: u64,
    action: StreamingAction,
    sink: Arc<dyn StreamSink>,
    cancelled: bool,
}

struct WorkState {
    queue: VecDeque<WorkItem>,
    in_flight: usize,
    next_token: u64,
}

/// Read-only byte source the worker pulls from.
trait ChunkSource: Send + Sync {
    fn read_at(&self, offset: u64, len: usize, into: &mut Vec<u8>) -> Result<()>;
    fn len(&self) -> u64;
}

struct FileSource {
    file: Mutex<File>,
    len: u64,
}

impl ChunkSource for FileSource {
    fn read_at(&self, offset: u64, len: usize, into: &mut Vec<u8>) -> Result<()> {
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        file.seek(SeekFrom::Start(offset)).map_err(|error| {
            engine_err!(ResourceAllocation, "vista3d::DiskStream", "seek failed: {}", error)
        })?;
        into.resize(len, 0);
        file.read_exact(into).map_err(|error| {
            engine_err!(ResourceAllocation, "vista3d::DiskStream", "read failed: {}", error)
        })
    }

    fn len(&self) -> u64 {
        self.len
    }
}

struct MemorySource {
    data: Vec<u8>,
}

impl ChunkSource for MemorySource {
    fn read_at(&self, offset: u64, len: usize, into: &mut Vec<u8>) -> Result<()> {
        let start = offset as usize;
        if start + len > self.data.len() {
            return Err(engine_err!(ResourceAllocation, "vista3d::DiskStream",
                "read of {} bytes at {} overruns resource", len, start));
        }
        into.clear();
        into.extend_from_slice(&self.data[start..start + len]);
        Ok(())
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }
}

struct Shared {
    state: Mutex<WorkState>,
    idle: Condvar,
    work_signal: Semaphore,
    shutdown: AtomicBool,
    pool: Mutex<BufferPool>,
    source: Box<dyn ChunkSource>,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, WorkState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_pool(&self) -> MutexGuard<'_, BufferPool> {
        match self.pool.lock() {
            Ok(pool) => pool,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Streams chunks from disk through a dedicated worker thread.
pub struct DiskStreamProvider {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl DiskStreamProvider {
    /// Open a resource file for streaming and start the worker.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|error| {
            engine_err!(ResourceAllocation, "vista3d::DiskStream",
                "cannot open '{}': {}", path.display(), error)
        })?;
        let len = file
            .metadata()
            .map_err(|error| {
                engine_err!(ResourceAllocation, "vista3d::DiskStream",
                    "cannot stat '{}': {}", path.display(), error)
            })?
            .len();
        Self::with_source(Box::new(FileSource { file: Mutex::new(file), len }))
    }

    /// Serve an in-memory resource through the same worker machinery.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::with_source(Box::new(MemorySource { data }))
    }

    fn with_source(source: Box<dyn ChunkSource>) -> Result<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(WorkState { queue: VecDeque::new(), in_flight: 0, next_token: 1 }),
            idle: Condvar::new(),
            work_signal: Semaphore::new(0),
            shutdown: AtomicBool::new(false),
            pool: Mutex::new(BufferPool::new()),
            source,
        });

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name("disk-stream".to_string())
            .spawn(move || worker_loop(worker_shared))
            .map_err(|error| {
                engine_err!(ResourceAllocation, "vista3d::DiskStream",
                    "cannot spawn worker thread: {}", error)
            })?;

        Ok(Self { shared, worker: Some(worker) })
    }

    /// Enqueue a streaming request and wake the worker.
    ///
    /// The worker reads the next complete chunk at the action's cursor
    /// (merging split records) and delivers it through `sink`; at end of
    /// resource the sink gets an end-of-stream notification instead.
    /// The returned token identifies this request for
    /// [`CancelMatch::Request`].
    pub fn schedule(&self, action: StreamingAction, sink: Arc<dyn StreamSink>) -> u64 {
        let token = {
            let mut state = self.shared.lock_state();
            let token = state.next_token;
            state.next_token += 1;
            state.queue.push_back(WorkItem { token, action, sink, cancelled: false });
            token
        };
        self.shared.work_signal.release();
        token
    }

    /// Mark queued requests as cancelled, best-effort.
    ///
    /// Marked requests still run their reads, but their buffers go back
    /// to the pool instead of being delivered.
    pub fn cancel(&self, which: CancelMatch) {
        let mut state = self.shared.lock_state();
        for item in state.queue.iter_mut() {
            let matches = match which {
                CancelMatch::All => true,
                CancelMatch::ObjectId(object_id) => item.action.has_id(object_id),
                CancelMatch::Request(token) => item.token == token,
            };
            if matches {
                item.cancelled = true;
            }
        }
    }

    /// Block the calling thread until the queue is drained and no read
    /// is in flight.
    pub fn wait_for_work_to_complete(&self) {
        let mut state = self.shared.lock_state();
        while !(state.queue.is_empty() && state.in_flight == 0) {
            state = match self.shared.idle.wait(state) {
                Ok(state) => state,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    /// Buffers currently waiting in the recycle pool.
    pub fn pooled_buffer_count(&self) -> usize {
        self.shared.lock_pool().len()
    }
}

impl StreamProvider for DiskStreamProvider {
    fn file_size(&self) -> u32 {
        self.shared.source.len() as u32
    }

    fn stream_buffer_count(&self) -> i32 {
        (self.shared.source.len() / 0x10000) as i32 + 1
    }

    fn length_in_dwords(&self) -> u32 {
        (self.shared.source.len() / 4) as u32
    }

    fn dword_view(&self) -> &[u32] {
        // The disk provider keeps nothing resident
        &[]
    }
}

impl Drop for DiskStreamProvider {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        self.shared.work_signal.release();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        shared.work_signal.acquire();
        if shared.shutdown.load(Ordering::SeqCst) {
            break;
        }

        let item = {
            let mut state = shared.lock_state();
            match state.queue.pop_front() {
                Some(item) => {
                    state.in_flight += 1;
                    item
                }
                None => continue,
            }
        };

        process_item(&shared, item);

        let mut state = shared.lock_state();
        state.in_flight -= 1;
        if state.queue.is_empty() && state.in_flight == 0 {
            shared.idle.notify_all();
        }
    }
}

fn process_item(shared: &Shared, mut item: WorkItem) {
    match read_complete_chunk(shared, &mut item.action) {
        Ok(Some(chunk)) => {
            if item.cancelled {
                // Silent: the read completed, the buffer is recycled
                shared.lock_pool().recycle(chunk.body);
            } else {
                item.action.bump_progress();
                item.sink.on_chunk(&item.action, chunk);
            }
        }
        Ok(None) => {
            if !item.cancelled {
                item.sink.on_end_of_stream(&item.action);
            }
        }
        Err(error) => {
            engine_warn!("vista3d::DiskStream", "chunk read failed: {}", error);
        }
    }
}

/// Read records at the action's cursor until one complete chunk is
/// assembled. Split records accumulate in the action's primary buffer
/// slot. `None` reports end of resource.
fn read_complete_chunk(
    shared: &Shared,
    action: &mut StreamingAction,
) -> Result<Option<ChunkBuffer>> {
    const RECORD_PREFIX_SIZE: usize = 2;

    loop {
        let offset = action.buffer_offset() as u64;
        if offset >= shared.source.len() {
            return Ok(None);
        }

        let mut head = Vec::with_capacity(RECORD_PREFIX_SIZE + CHUNK_HEADER_SIZE);
        shared
            .source
            .read_at(offset, RECORD_PREFIX_SIZE + CHUNK_HEADER_SIZE, &mut head)?;
        let flags = ChunkStoreFlags::from_bits_truncate(u16::from_le_bytes([head[0], head[1]]));
        let header = ChunkHeader::read_from(&head[RECORD_PREFIX_SIZE..])?;

        let mut body = shared.lock_pool().acquire(header.body_len());
        shared.source.read_at(
            offset + (RECORD_PREFIX_SIZE + CHUNK_HEADER_SIZE) as u64,
            header.body_len(),
            &mut body,
        )?;

        action.set_buffer_offset(
            (offset as usize + RECORD_PREFIX_SIZE + CHUNK_HEADER_SIZE + header.body_len()) as u32,
        );

        let chunk = ChunkBuffer { flags, kind: header.kind, body };

        if let Some(mut pending) = action.take_primary() {
            pending.absorb_continuation(chunk);
            if pending.is_split() {
                action.set_primary(Some(pending));
                continue;
            }
            return Ok(Some(pending));
        }
        if chunk.is_split() {
            action.set_primary(Some(chunk));
            continue;
        }
        return Ok(Some(chunk));
    }
}

// ============================================================================
// Pull adapter for media presenters
// ============================================================================

struct QueueSinkState {
    ready: VecDeque<ChunkBuffer>,
    next_offset: u32,
    pending: bool,
    end_of_stream: bool,
}

struct QueueSink {
    state: Mutex<QueueSinkState>,
}

impl QueueSink {
    fn lock(&self) -> MutexGuard<'_, QueueSinkState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl StreamSink for QueueSink {
    fn on_chunk(&self, action: &StreamingAction, chunk: ChunkBuffer) {
        let mut state = self.lock();
        state.ready.push_back(chunk);
        state.next_offset = action.buffer_offset();
        state.pending = false;
    }

    fn on_end_of_stream(&self, _action: &StreamingAction) {
        let mut state = self.lock();
        state.end_of_stream = true;
        state.pending = false;
    }
}

/// [`ChunkStream`] over a [`DiskStreamProvider`]: non-blocking pulls
/// backed by asynchronous single-chunk requests.
pub struct DiskChunkStream {
    provider: Arc<DiskStreamProvider>,
    sink: Arc<QueueSink>,
    request_template: Action,
    start_offset: u32,
}

impl DiskChunkStream {
    pub fn new(provider: Arc<DiskStreamProvider>, request_template: Action, start_offset: u32) -> Self {
        let sink = Arc::new(QueueSink {
            state: Mutex::new(QueueSinkState {
                ready: VecDeque::new(),
                next_offset: start_offset,
                pending: false,
                end_of_stream: false,
            }),
        });
        Self { provider, sink, request_template, start_offset }
    }
}

impl ChunkStream for DiskChunkStream {
    fn next_chunk(&mut self) -> Result<Option<ChunkBuffer>> {
        let request = {
            let mut state = self.sink.lock();
            if let Some(chunk) = state.ready.pop_front() {
                return Ok(Some(chunk));
            }
            if state.end_of_stream || state.pending {
                return Ok(None);
            }
            state.pending = true;
            StreamingAction::new(self.request_template.clone(), state.next_offset)
        };

        self.provider.schedule(request, Arc::clone(&self.sink) as Arc<dyn StreamSink>);
        Ok(None)
    }

    fn rewind(&mut self) -> Result<()> {
        let mut state = self.sink.lock();
        state.ready.clear();
        state.next_offset = self.start_offset;
        state.end_of_stream = false;
        Ok(())
    }

    fn exhausted(&self) -> bool {
        let state = self.sink.lock();
        state.end_of_stream && state.ready.is_empty()
    }
}

#[cfg(test)]
#[path = "disk_tests.rs"]
mod tests;
