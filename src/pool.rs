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

//! Segments are reused rather than freed: a pool holds a free list of idle
//! segments and hands them out on request. [`SharedPool`] is the default,
//! process-wide pool behind a single [`Mutex`](std::sync::Mutex); [`LocalPool`]
//! is a thread-local alternative for single-threaded hot paths that would
//! otherwise contend on the shared lock.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Mutex, OnceLock, PoisonError};
use thiserror::Error;
use tracing::trace;
use crate::segment::Segment;

/// The maximum number of idle segment byte-arrays a pool will hold onto. Past
/// this, recycled segments are simply dropped instead of freed back to the pool.
pub const MAX_SIZE: usize = 64 * 1024;

/// An error claiming or recycling a segment.
#[derive(Debug, Error)]
pub enum PoolError {
	#[error("segment pool lock was poisoned")]
	Poisoned,
}

impl<T> From<PoisonError<T>> for PoolError {
	fn from(_: PoisonError<T>) -> Self { Self::Poisoned }
}

/// A source of reusable [`Segment`]s.
pub trait Pool {
	/// Claims a single segment, allocating a fresh one if the pool is empty.
	fn claim_one(&self) -> Result<Segment, PoolError>;

	/// Claims `count` segments.
	fn claim_count(&self, count: usize) -> Result<Vec<Segment>, PoolError> {
		(0..count).map(|_| self.claim_one()).collect()
	}

	/// Recycles a single segment. Shared segments (still referenced elsewhere)
	/// are dropped instead of recycled, as are segments once the pool is at
	/// capacity.
	fn recycle_one(&self, segment: Segment) -> Result<(), PoolError>;

	/// Recycles many segments.
	fn recycle(&self, segments: impl IntoIterator<Item = Segment>) -> Result<(), PoolError> {
		for seg in segments {
			self.recycle_one(seg)?;
		}
		Ok(())
	}
}

fn recyclable(segment: &Segment) -> bool {
	!segment.is_shared()
}

/// A process-wide pool guarded by a single mutex, capped at [`MAX_SIZE`] bytes
/// of idle segments. This is the default pool used by [`Buffer::default`]
/// (`Buffer`: [`crate::Buffer`]).
#[derive(Clone, Default)]
pub struct SharedPool;

fn shared_pool() -> &'static Mutex<Vec<Segment>> {
	static POOL: OnceLock<Mutex<Vec<Segment>>> = OnceLock::new();
	POOL.get_or_init(Default::default)
}

impl Pool for SharedPool {
	fn claim_one(&self) -> Result<Segment, PoolError> {
		let mut idle = shared_pool().lock()?;
		Ok(idle.pop().unwrap_or_else(|| {
			trace!("segment pool exhausted, allocating a fresh segment");
			Segment::empty()
		}))
	}

	fn recycle_one(&self, mut segment: Segment) -> Result<(), PoolError> {
		if !recyclable(&segment) {
			return Ok(())
		}
		segment.clear();
		let mut idle = shared_pool().lock()?;
		if idle.len() * crate::segment::SIZE < MAX_SIZE {
			idle.push(segment);
		} else {
			trace!("segment pool at capacity, dropping recycled segment");
		}
		Ok(())
	}
}

/// A thread-local pool, avoiding lock contention at the cost of not sharing
/// segments across threads. Opt into this explicitly; [`SharedPool`] is the
/// crate default.
#[derive(Clone, Default)]
pub struct LocalPool {
	idle: Rc<RefCell<Vec<Segment>>>,
}

impl Pool for LocalPool {
	fn claim_one(&self) -> Result<Segment, PoolError> {
		Ok(
			self.idle
				.borrow_mut()
				.pop()
				.unwrap_or_else(Segment::empty)
		)
	}

	fn recycle_one(&self, mut segment: Segment) -> Result<(), PoolError> {
		if !recyclable(&segment) {
			return Ok(())
		}
		segment.clear();
		let mut idle = self.idle.borrow_mut();
		if idle.len() * crate::segment::SIZE < MAX_SIZE {
			idle.push(segment);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::panic;
	use std::sync::Mutex;
	use super::*;

	/// A poisoned lock must surface as [`PoolError::Poisoned`] (and, at the
	/// `streams` layer, [`crate::ErrorKind::Pool`]), never as a panic. Poisons
	/// a throwaway mutex rather than the real process-wide pool, so this
	/// doesn't corrupt `SharedPool` for every other test in the binary.
	#[test]
	fn poisoned_lock_errors_instead_of_panicking() {
		let lock: Mutex<Vec<Segment>> = Mutex::default();
		let _ = panic::catch_unwind(panic::AssertUnwindSafe(|| {
			let _guard = lock.lock().unwrap();
			panic!("poisoning this mutex for the test");
		}));

		let err = PoolError::from(lock.lock().unwrap_err());
		assert!(matches!(err, PoolError::Poisoned));
		assert!(matches!(
			crate::streams::Error::from(err).kind(),
			crate::streams::ErrorKind::Pool
		));
	}

	/// Recycling more segments than [`MAX_SIZE`] allows must not grow the idle
	/// list past the cap; the excess is dropped instead. Uses a [`LocalPool`]
	/// rather than [`SharedPool`] so this doesn't leak segments into the
	/// process-wide pool for every other test in the binary.
	#[test]
	fn recycling_never_grows_the_idle_list_past_max_size() {
		let pool = LocalPool::default();
		let cap = MAX_SIZE / crate::segment::SIZE;

		for _ in 0..cap + 10 {
			pool.recycle_one(Segment::empty()).unwrap();
		}

		assert_eq!(pool.idle.borrow().len(), cap);
	}
}
