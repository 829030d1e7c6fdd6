/*!
# Vista 3D Engine media pipeline

Streaming media layer of the Vista3D engine: deserialises SI action
trees, instantiates presenters that drive them through a fixed tickle
state machine, and feeds them chunked media data from RAM or disk
stream providers.

## Architecture

- **atom**: interned script resource identifiers
- **tickle**: interval-based polling of registered clients
- **action**: the SI action tree (parallel / serial / select / media)
  and its binary deserialiser
- **chunk**: the SI chunk envelope and split-chunk reassembly
- **stream**: RAM and disk (worker thread) stream providers
- **presenter**: the tickle state machine and the composite / media /
  control presenters built on it

Scene-side types (ROIs, LOD lists, the renderer contract) come from the
companion `vista_3d_engine` crate, as do the error taxonomy and the
logging macros.
*/

// Interned script identifiers
pub mod atom;

// SI action model and deserialiser
pub mod action;

// SI chunk envelope and buffers
pub mod chunk;

// Presenter pipeline
pub mod presenter;

// Stream providers
pub mod stream;

// Synchronisation utilities
pub mod sync;

// Tickle manager
pub mod tickle;

// Re-export the shared error types
pub use vista_3d_engine::error::{Error, Result};
