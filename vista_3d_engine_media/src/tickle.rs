/// Tickle manager: interval-based polling of registered clients.
///
/// The host loop calls [`TickleManager::tickle`] once per iteration;
/// the manager fans out to every registered client whose interval has
/// elapsed, in registration order. A client registered during a pass is
/// first visited on the next pass.

use std::sync::{Arc, Mutex};

use bitflags::bitflags;
use vista_3d_engine::engine_warn;
use vista_3d_engine::error::Result;

/// Sentinel returned by [`TickleManager::get_interval`] for unknown
/// clients.
pub const TICKLE_INTERVAL_NOT_FOUND: u32 = 0x8000_0000;

/// An object advanced by the tickle manager.
pub trait Tickle: Send {
    fn tickle(&mut self, now_ms: u32) -> Result<()>;
}

/// Shared handle under which clients are registered.
pub type TickleHandle = Arc<Mutex<dyn Tickle>>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct TickleClientFlags: u16 {
        /// Record is destroyed on the next pass
        const DESTROY = 0x01;
    }
}

struct TickleClient {
    client: TickleHandle,
    interval_ms: u32,
    last_update_ms: Option<u32>,
    flags: TickleClientFlags,
}

/// Polls registered clients at per-client intervals.
pub struct TickleManager {
    clients: Vec<TickleClient>,
}

impl TickleManager {
    pub fn new() -> Self {
        Self { clients: Vec::new() }
    }

    /// Register a client. Re-registering an already-registered client is
    /// a no-op; re-registering one that is marked for destruction revives
    /// it with the new interval.
    pub fn register(&mut self, client: TickleHandle, interval_ms: u32) {
        if let Some(existing) = self.find_mut(&client) {
            if existing.flags.contains(TickleClientFlags::DESTROY) {
                existing.flags.remove(TickleClientFlags::DESTROY);
                existing.interval_ms = interval_ms;
                existing.last_update_ms = None;
            }
            return;
        }
        self.clients.push(TickleClient {
            client,
            interval_ms,
            last_update_ms: None,
            flags: TickleClientFlags::empty(),
        });
    }

    /// Mark a client for removal on the next pass.
    pub fn unregister(&mut self, client: &TickleHandle) {
        if let Some(existing) = self.find_mut(client) {
            existing.flags.insert(TickleClientFlags::DESTROY);
        }
    }

    /// Change a registered client's interval. Clients marked for
    /// destruction are left alone.
    pub fn set_interval(&mut self, client: &TickleHandle, interval_ms: u32) {
        if let Some(existing) = self.find_mut(client) {
            if !existing.flags.contains(TickleClientFlags::DESTROY) {
                existing.interval_ms = interval_ms;
            }
        }
    }

    /// A client's interval, or [`TICKLE_INTERVAL_NOT_FOUND`].
    pub fn get_interval(&self, client: &TickleHandle) -> u32 {
        self.clients
            .iter()
            .find(|existing| Arc::ptr_eq(&existing.client, client))
            .filter(|existing| !existing.flags.contains(TickleClientFlags::DESTROY))
            .map(|existing| existing.interval_ms)
            .unwrap_or(TICKLE_INTERVAL_NOT_FOUND)
    }

    /// Number of live (not destruction-marked) records.
    pub fn client_count(&self) -> usize {
        self.clients
            .iter()
            .filter(|client| !client.flags.contains(TickleClientFlags::DESTROY))
            .count()
    }

    /// One pass: drop records marked on the previous pass, then visit
    /// every due client in registration order.
    pub fn tickle(&mut self, now_ms: u32) {
        self.clients.retain(|client| !client.flags.contains(TickleClientFlags::DESTROY));

        // Clients registered from inside a callback are not visited
        // until the next pass
        let count = self.clients.len();
        for index in 0..count {
            let record = &mut self.clients[index];
            if record.flags.contains(TickleClientFlags::DESTROY) {
                continue;
            }

            let due = match record.last_update_ms {
                None => true,
                Some(last) => now_ms.wrapping_sub(last) >= record.interval_ms,
            };
            if !due {
                continue;
            }

            record.last_update_ms = Some(now_ms);
            let client = Arc::clone(&record.client);
            let outcome = match client.lock() {
                Ok(mut client) => client.tickle(now_ms),
                Err(poisoned) => poisoned.into_inner().tickle(now_ms),
            };
            if let Err(error) = outcome {
                engine_warn!("vista3d::TickleManager", "client tickle failed: {}", error);
            }
        }
    }

    fn find_mut(&mut self, client: &TickleHandle) -> Option<&mut TickleClient> {
        self.clients.iter_mut().find(|existing| Arc::ptr_eq(&existing.client, client))
    }
}

impl Default for TickleManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tickle_tests.rs"]
mod tests;
