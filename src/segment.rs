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

mod memory;

use std::collections::VecDeque;
use tracing::debug;
use crate::pool::{Pool, PoolError};

/// The fixed capacity of a single segment's backing array.
pub const SIZE: usize = 8192;

/// A group of [`Segment`]s ordered in a ring, with empty segments pushed to the
/// back and laden segments kept in front. To read and write, segments are
/// pushed and popped from either end; this realizes the buffer's logical
/// "circular doubly-linked list" of segments as an owned, arena-like container
/// rather than raw intrusive pointers.
#[derive(Default)]
pub struct Segments {
	/// Number of laden (non-empty) segments at the front of `ring`.
	len: usize,
	lim: usize,
	cnt: usize,
	ring: VecDeque<Segment>,
}

impl Segments {
	pub fn new() -> Self { Self::default() }

	/// Returns the number of bytes contained in all segments.
	pub fn count(&self) -> usize { self.cnt }
	/// Returns the number of bytes that can be written to the segments before
	/// the next claim operation.
	pub fn limit(&self) -> usize { self.lim }
	/// Returns `true` if there are no readable bytes.
	pub fn is_empty(&self) -> bool { self.cnt == 0 }

	/// Pushes a segment to the ring. Segments with data are appended after the
	/// last non-empty segment; empty segments are pushed to the back.
	pub fn push(&mut self, seg: Segment) {
		if seg.is_empty() {
			self.push_empty(seg);
		} else {
			self.push_laden(seg);
		}
	}

	/// Pops the back-most unfilled [`Segment`] from the ring. Used for writing.
	pub fn pop_back(&mut self) -> Option<Segment> {
		let seg = if self.has_empty() {
			self.ring.swap_remove_back(self.len)
		} else {
			self.ring.pop_back()
		};

		if let Some(seg) = &seg {
			if !seg.is_empty() {
				self.len -= 1;
			}
			self.cnt -= seg.len();
			self.lim -= seg.lim();
		}

		seg
	}

	/// Pops the front [`Segment`] from the ring. Used for reading.
	pub fn pop_front(&mut self) -> Option<Segment> {
		let seg = self.ring.pop_front()?;
		self.len -= 1;
		self.cnt -= seg.len();
		Some(seg)
	}

	/// Pushes a laden segment back to the very front of the ring, undoing a
	/// prior [`Self::pop_front`] (possibly after it was partially consumed).
	/// Unlike [`Self::push`], this never reorders it behind other laden
	/// segments still resident further back in the ring.
	pub(crate) fn push_front(&mut self, seg: Segment) {
		debug_assert!(!seg.is_empty(), "push_front is for laden segments only");
		self.cnt += seg.len();
		self.ring.push_front(seg);
		self.len += 1;
	}

	/// Returns a reference to the back-most laden segment, if any.
	pub fn back(&self) -> Option<&Segment> {
		if self.len == 0 { None } else { self.ring.get(self.len - 1) }
	}

	/// Returns a mutable reference to the tail segment available for writing
	/// (the first segment with spare capacity), claiming one from `pool` if
	/// needed so at least `min` bytes can be written.
	pub fn writable_tail(&mut self, min: usize, pool: &impl Pool) -> Result<&mut Segment, PoolError> {
		let need_fresh = self.ring.get(self.len)
							 .map_or(true, |seg| seg.lim() < min || seg.mem.is_shared());
		if need_fresh {
			self.push_empty(pool.claim_one()?);
		}
		Ok(&mut self.ring[self.len])
	}

	/// Reserves at least `count` bytes of segments, claiming fresh ones from
	/// `pool` as needed.
	pub fn reserve(&mut self, count: usize, pool: &impl Pool) -> Result<(), PoolError> {
		let have = self.lim;
		if have >= count { return Ok(()) }
		let need = count - have;
		let n = need / SIZE + (need % SIZE > 0) as usize;
		for seg in pool.claim_count(n)? {
			self.push_empty(seg);
		}
		Ok(())
	}

	/// Recycles all empty segments.
	pub fn trim(&mut self, pool: &impl Pool) -> Result<(), PoolError> {
		let removed: Vec<_> = self.ring.drain(self.len..).collect();
		self.lim -= removed.len() * SIZE;
		pool.recycle(removed)
	}

	/// Recycles all segments.
	pub fn clear(&mut self, pool: &impl Pool) -> Result<(), PoolError> {
		self.len = 0;
		self.lim = 0;
		self.cnt = 0;
		pool.recycle(self.ring.drain(..))
	}

	/// Pushes empty segments to the back of the ring.
	pub fn extend_empty(&mut self, segments: impl IntoIterator<Item = Segment>) {
		for seg in segments {
			self.push_empty(seg);
		}
	}

	/// Compacts partial segments to reclaim fragmentation, optionally forcing a
	/// copy of shared segments.
	pub fn compact(&mut self, force: bool) {
		debug!(force, "compacting segment ring");
		let mut dst = VecDeque::with_capacity(self.ring.len());
		let mut prev: Option<Segment> = None;
		let laden: Vec<_> = self.ring.drain(..self.len).collect();
		let empty: Vec<_> = self.ring.drain(..).collect();

		for mut curr in laden {
			match &mut prev {
				Some(base) if force || !base.mem.is_shared() => {
					base.shift();
					curr.move_into(base, curr.len());
					if curr.is_empty() {
						dst.push_back(prev.take().unwrap());
						prev = Some(curr);
					} else {
						dst.push_back(prev.replace(curr).unwrap());
					}
				}
				_ => {
					if let Some(base) = prev.replace(curr) {
						dst.push_back(base);
					}
				}
			}
		}

		if let Some(base) = prev {
			dst.push_back(base);
		}

		self.len = dst.len();
		self.lim = dst.back().map_or(0, Segment::lim);
		dst.extend(empty);
		self.lim += (dst.len() - self.len) * SIZE;
		self.ring = dst;
	}

	/// Pops the back-most laden segment, for truncating a buffer's tail. Used
	/// by [`crate::UnsafeCursor::resize_buffer`]. Unlike [`Self::pop_back`],
	/// this removes the last segment with readable bytes regardless of
	/// whether it's full.
	pub(crate) fn pop_last_laden(&mut self) -> Option<Segment> {
		if self.len == 0 { return None }
		let seg = self.ring.remove(self.len - 1)?;
		self.len -= 1;
		self.cnt -= seg.len();
		self.lim -= seg.lim();
		Some(seg)
	}

	/// Returns the laden segment covering readable offset `pos`, along with
	/// how far into that segment's own readable window `pos` falls. Used by
	/// [`crate::UnsafeCursor`] to position itself without popping segments
	/// off the ring.
	pub(crate) fn segment_for_mut(&mut self, pos: usize) -> Option<(&mut Segment, usize)> {
		let mut base = 0;
		for seg in self.ring.iter_mut().take(self.len) {
			let len = seg.len();
			if pos < base + len {
				return Some((seg, pos - base));
			}
			base += len;
		}
		None
	}

	fn has_empty(&self) -> bool { self.len < self.ring.len() }

	fn push_empty(&mut self, seg: Segment) {
		self.lim += seg.lim();
		self.ring.push_back(seg);
	}

	fn push_laden(&mut self, seg: Segment) {
		let cur_lim = self.back().map_or(0, Segment::lim);
		self.cnt += seg.len();
		self.lim += seg.lim();
		self.lim -= cur_lim;
		self.ring.insert(self.len, seg);
		self.len += 1;
	}
}

impl<'a> IntoIterator for &'a Segments {
	type Item = &'a Segment;
	type IntoIter = std::collections::vec_deque::Iter<'a, Segment>;

	fn into_iter(self) -> Self::IntoIter {
		self.ring.iter()
	}
}

/// A fixed-capacity ([`SIZE`]) buffer segment with a readable window
/// `[pos, pos+len)` and a writable tail `[pos+len, SIZE)`.
#[derive(Clone, Default)]
pub struct Segment {
	mem: memory::Memory,
}

impl Segment {
	fn new(mem: memory::Memory) -> Self { Self { mem } }

	/// Returns a new empty segment.
	pub fn empty() -> Self { Self::default() }

	/// Returns `true` if the underlying array is referenced by more than this
	/// segment; a shared segment must fork before it can be written to.
	pub fn is_shared(&self) -> bool { self.mem.is_shared() }

	/// Returns a new segment with copy-on-write shared memory from the current
	/// segment.
	pub fn share_all(&self) -> Self { Self::new(self.mem.share_all()) }

	/// Returns a new segment with copy-on-write shared memory of length
	/// `byte_count` from the current segment.
	pub fn share(&self, byte_count: usize) -> Self { Self::new(self.mem.share(byte_count)) }

	/// Returns `true` if the segment has no readable bytes.
	pub fn is_empty(&self) -> bool { self.len() == 0 }
	/// Returns `true` if the segment has no room left to write.
	pub fn is_full(&self) -> bool { self.lim() == 0 }

	/// Returns a slice of the data available for reading.
	pub fn data(&self) -> &[u8] { self.mem.data() }
	/// Returns a mutable slice of the data available for writing; forks shared
	/// memory first.
	pub fn data_mut(&mut self) -> &mut [u8] { self.mem.data_mut() }

	/// Returns the writable tail past the readable window, forking shared
	/// memory first.
	pub fn tail_mut(&mut self) -> &mut [u8] { self.mem.tail_mut() }

	/// Returns the position, from `[0, SIZE]`.
	pub fn pos(&self) -> usize { self.mem.off_start() }
	/// Returns the readable length, from `[0, SIZE]`.
	pub fn len(&self) -> usize { self.mem.len() }
	/// Returns the number of bytes that can still be written.
	pub fn lim(&self) -> usize { self.mem.lim() }

	/// Clears the segment back to empty.
	pub fn clear(&mut self) { self.mem.clear(); }

	/// Shifts data back such that `pos` is 0.
	pub fn shift(&mut self) { self.mem.shift(); }

	/// Consumes `n` bytes after reading.
	pub fn consume(&mut self, n: usize) { self.mem.consume(n); }

	/// Shrinks the readable window by `n` bytes from the back.
	pub fn truncate(&mut self, n: usize) { self.mem.truncate(n); }

	/// Marks `n` bytes as written.
	pub fn add(&mut self, n: usize) { self.mem.add(n); }

	/// Moves `byte_count` bytes into another segment, returning the number of
	/// bytes moved.
	pub fn move_into(&mut self, other: &mut Self, byte_count: usize) -> usize {
		self.mem.move_into(&mut other.mem, byte_count)
	}

	/// Pushes one byte to the segment, returning `true` if it could be written.
	pub fn push(&mut self, byte: u8) -> bool { self.mem.push(byte) }

	/// Pops one byte from the segment.
	pub fn pop(&mut self) -> Option<u8> { self.mem.pop() }

	/// Pushes a slice of bytes to the segment, returning the number of bytes
	/// written.
	pub fn push_slice(&mut self, bytes: &[u8]) -> usize { self.mem.push_slice(bytes) }

	/// Pops bytes into a slice from the segment, returning the number of bytes
	/// read.
	pub fn pop_into_slice(&mut self, bytes: &mut [u8]) -> usize { self.mem.pop_into_slice(bytes) }
}

impl From<[u8; SIZE]> for Segment {
	fn from(value: [u8; SIZE]) -> Self { Self::new(value.into()) }
}
