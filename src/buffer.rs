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

mod options;
mod read;
mod write;

use std::cmp::min;
use tracing::trace;
use crate::ByteStr;
use crate::pool::{Pool, SharedPool};
use crate::segment::Segments;
use crate::streams::{BufStream, Error, Result};

pub use options::BufferOptions;

/// A mutable sequence of bytes backed by a ring of fixed-size [`Segment`]s,
/// the core data structure the whole crate is built around. Reads and writes
/// operate on whole segments where possible, so moving data between two
/// buffers (e.g. [`Source::read`](crate::streams::Source::read) from one
/// `Buffer` into another) is usually a pointer move rather than a copy.
pub struct Buffer<P: Pool = SharedPool> {
	pool: P,
	segments: Segments,
	options: BufferOptions,
	closed: bool,
	/// Bumped on every consuming read, so a [`crate::peek::PeekSource`] taken
	/// over this buffer can detect that its snapshot went stale.
	generation: u64,
}

impl<P: Pool + Default> Default for Buffer<P> {
	fn default() -> Self { Self::new(P::default()) }
}

impl<P: Pool> Buffer<P> {
	pub fn new(pool: P) -> Self { Self::with_options(pool, BufferOptions::default()) }

	pub fn with_options(pool: P, options: BufferOptions) -> Self {
		Self { pool, segments: Segments::new(), options, closed: false, generation: 0 }
	}

	/// The buffer's current generation, bumped on every consuming read.
	pub(crate) fn generation(&self) -> u64 { self.generation }

	pub(crate) fn bump_generation(&mut self) { self.generation = self.generation.wrapping_add(1); }

	/// Direct segment-ring access for [`crate::UnsafeCursor`].
	pub(crate) fn segments_mut(&mut self) -> &mut Segments { &mut self.segments }

	/// Claims a fresh writable tail with at least `min` bytes of spare
	/// capacity, for [`crate::UnsafeCursor::expand_buffer`].
	pub(crate) fn claim_writable_tail(&mut self, min: usize) -> Result<&mut crate::segment::Segment> {
		self.segments.writable_tail(min, &self.pool).map_err(Error::pool)
	}

	/// Shrinks the buffer by `n` bytes from the tail, for
	/// [`crate::UnsafeCursor::resize_buffer`].
	pub(crate) fn truncate_tail(&mut self, mut n: usize) -> Result {
		while n > 0 {
			let Some(mut seg) = self.segments.pop_last_laden() else { break };
			let len = seg.len();
			if len <= n {
				n -= len;
				seg.clear();
			} else {
				seg.truncate(n);
				n = 0;
			}
			self.segments.push(seg);
		}
		self.bump_generation();
		self.tidy().map_err(Error::with_op_buf_clear)
	}

	/// Returns the number of bytes currently buffered.
	pub fn count(&self) -> usize { self.segments.count() }

	/// Returns `true` if the buffer holds no data.
	pub fn is_empty(&self) -> bool { self.segments.is_empty() }

	pub fn options(&self) -> &BufferOptions { &self.options }

	/// Returns the byte count of the buffer's complete (fully laden) segments,
	/// i.e. bytes that can be moved to another buffer without copying.
	pub fn complete_segment_byte_count(&self) -> usize {
		let mut count = 0;
		for seg in &self.segments {
			if seg.is_full() { count += seg.len() } else { break }
		}
		count
	}

	/// Returns an immutable, zero-copy view of the buffer's entire current
	/// contents. Borrows the buffer, so it can't be mutated while the
	/// snapshot is alive; call `to_byte_string()` on it for an owned copy
	/// that outlives the buffer.
	pub fn snapshot(&self) -> ByteStr<'_> { ByteStr::from(&self.segments) }

	/// Like [`Self::snapshot`], but limited to the first `byte_count` bytes.
	pub fn snapshot_prefix(&self, byte_count: usize) -> ByteStr<'_> {
		let byte_count = min(byte_count, self.count());
		let mut data = Vec::new();
		let mut pos = 0;
		for seg in &self.segments {
			if pos >= byte_count { break }
			let len = seg.len();
			let take = min(len, byte_count - pos);
			data.push(&seg.data()[..take]);
			pos += take;
		}
		ByteStr::from(data)
	}

	/// Recycles all segments back to the pool, leaving the buffer empty.
	pub fn clear(&mut self) -> Result {
		if self.closed { return Ok(()) }
		self.segments.clear(&self.pool).map_err(Error::with_op_buf_clear)
	}

	/// Flushes and closes the buffer, recycling its segments. Idempotent.
	pub fn close(&mut self) -> Result {
		if self.closed { return Ok(()) }
		self.closed = true;
		self.clear()
	}

	/// Compacts the segment ring if fragmentation exceeds the configured
	/// [`BufferOptions::compact_threshold`].
	fn tidy(&mut self) -> Result {
		self.segments.trim(&self.pool).map_err(Error::with_op_buf_compact)?;

		let fragmentation = self.fragmentation();
		if fragmentation > self.options.compact_threshold() {
			trace!(fragmentation, threshold = self.options.compact_threshold(), "tidy: compacting");
			self.segments.compact(self.options.compact_threshold() == 0);
		}
		Ok(())
	}

	fn fragmentation(&self) -> usize {
		self.segments.into_iter()
			.filter(|seg| !seg.is_empty() && !seg.is_full())
			.map(|seg| seg.lim())
			.sum()
	}

	/// Returns the byte at the given logical offset without consuming it.
	fn byte_at(&self, index: usize) -> Option<u8> {
		let mut pos = 0;
		for seg in &self.segments {
			let len = seg.len();
			if index < pos + len {
				return Some(seg.data()[index - pos]);
			}
			pos += len;
		}
		None
	}

	/// Finds the offset of `byte` within `[from, to)`, or `None` if absent.
	pub fn index_of(&self, byte: u8, from: usize, to: usize) -> Option<usize> {
		let to = min(to, self.count());
		if from >= to { return None }

		let mut pos = 0;
		for seg in &self.segments {
			let seg_len = seg.len();
			let seg_end = pos + seg_len;
			if pos >= to { break }

			if seg_end > from {
				let lo = from.saturating_sub(pos);
				let hi = min(seg_len, to - pos);
				if let Some(i) = seg.data()[lo..hi].iter().position(|&b| b == byte) {
					return Some(pos + lo + i);
				}
			}

			pos = seg_end;
		}
		None
	}

	/// Finds the offset of the first byte in `elements` within `[from, to)`.
	pub fn index_of_element(&self, elements: &[u8], from: usize, to: usize) -> Option<usize> {
		let to = min(to, self.count());
		if from >= to { return None }

		let mut pos = 0;
		for seg in &self.segments {
			let seg_len = seg.len();
			let seg_end = pos + seg_len;
			if pos >= to { break }

			if seg_end > from {
				let lo = from.saturating_sub(pos);
				let hi = min(seg_len, to - pos);
				if let Some(i) = seg.data()[lo..hi].iter().position(|b| elements.contains(b)) {
					return Some(pos + lo + i);
				}
			}

			pos = seg_end;
		}
		None
	}

	/// Removes `byte_count` bytes from the front of the buffer, returning the
	/// number actually removed.
	pub fn skip(&mut self, byte_count: usize) -> Result<usize> {
		let count = min(byte_count, self.count());
		let mut remaining = count;
		while remaining > 0 {
			let Some(mut seg) = self.segments.pop_front() else { break };
			let n = min(remaining, seg.len());
			seg.consume(n);
			remaining -= n;
			self.segments.push(seg);
		}
		self.bump_generation();
		self.tidy().map_err(Error::with_op_buf_clear)?;
		Ok(count - remaining)
	}

	/// Returns the byte at `index` without consuming it, for inspection.
	pub fn get(&self, index: usize) -> Option<u8> { self.byte_at(index) }

	/// Copies bytes in `range` into `dst` without consuming them, for
	/// [`crate::peek::PeekSource`]. `dst.len()` must equal `range.len()`.
	pub(crate) fn peek_range(&self, range: std::ops::Range<usize>, dst: &mut [u8]) {
		let std::ops::Range { start, end } = range;
		let mut pos = 0;
		for seg in &self.segments {
			let seg_len = seg.len();
			let seg_end = pos + seg_len;
			if pos >= end { break }

			if seg_end > start {
				let lo = start.saturating_sub(pos);
				let hi = min(seg_len, end - pos);
				let dst_off = (pos + lo).saturating_sub(start);
				dst[dst_off..dst_off + (hi - lo)].copy_from_slice(&seg.data()[lo..hi]);
			}

			pos = seg_end;
		}
	}
}

impl<P: Pool> Drop for Buffer<P> {
	fn drop(&mut self) { let _ = self.close(); }
}

impl<P: Pool> BufStream for Buffer<P> {
	fn buf(&self) -> &Buffer<impl Pool> { self }
	fn buf_mut(&mut self) -> &mut Buffer<impl Pool> { self }
}
