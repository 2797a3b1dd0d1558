// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! ## How it works
//!
//! Data is written to and read from reusable, fixed-size (8KiB) chunks of
//! memory called *segments*. When a segment is consumed, it's returned to a
//! *pool*. To write data, segments are claimed from this pool; when the pool
//! is exhausted, new segments are allocated. [`pool::SharedPool`] is the
//! default pool: a single, process-wide pool of idle segments behind a
//! [`Mutex`](std::sync::Mutex), capped at [`pool::MAX_SIZE`] bytes so it can't
//! grow without bound. [`pool::LocalPool`] is an explicit opt-in alternative
//! for callers who'd rather keep a pool per thread and avoid the lock.
//!
//! ### Segments
//!
//! Segments are arranged in a ring buffer and behave as a continuous byte
//! deque: bytes are read from one end and written to the other, claiming new
//! segments from the pool as it fills. Memory within a segment can be owned
//! or shared between segments; shared memory is copy-on-write, readable by
//! multiple segments at once and copied only when one of them writes to it.
//! This is what makes moving data between two [`Buffer`]s usually a pointer
//! move rather than a copy.
//!
//! As segments are consumed they can develop gaps — partially read or
//! unfilled segments, called *voids*. Compacting on every write would be
//! wasteful, but leaving voids in place costs more allocations overall, so a
//! buffer compacts its ring once voids exceed a configurable threshold (see
//! [`BufferOptions`]).

mod buffer;
mod buffered_wrappers;
mod cursor;
mod error;
mod options;
mod peek;
pub mod streams;
mod segment;
pub mod pool;
mod byte_str;
pub mod std_io;

pub use buffered_wrappers::{buffer_sink, buffer_source, BufferedSink, BufferedSource};
pub use cursor::UnsafeCursor;
pub use error::*;
pub use buffer::*;
pub use options::{Options, TypedOptions};
pub use peek::PeekSource;
pub use segment::{Segment, SIZE as SEGMENT_SIZE};
pub use byte_str::*;
