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

use std::cmp::min;
use std::ops::{Index, IndexMut, Range};
use std::rc::Rc;
use super::SIZE;

/// The readable/writable bounds of a segment's backing array: `[start, end)` is
/// readable, `[end, SIZE)` is writable.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
struct Loc {
	start: usize,
	end: usize,
}

impl Loc {
	fn len(&self) -> usize { self.end - self.start }
	fn lim(&self) -> usize { SIZE - self.end }

	fn shrink_left(&mut self, n: usize) { self.start += n; }
	fn grow_right(&mut self, n: usize) { self.end += n; }
	fn shrink_right(&mut self, n: usize) { self.end -= n; }

	fn reset(&mut self) { *self = Self::default(); }

	fn shift(&mut self) {
		let len = self.len();
		self.start = 0;
		self.end = len;
	}
}

#[derive(Clone, Debug)]
struct MemoryData {
	bytes: Box<[u8; SIZE]>,
}

impl Default for MemoryData {
	fn default() -> Self { Self { bytes: Box::new([0; SIZE]) } }
}

impl Index<Range<usize>> for MemoryData {
	type Output = [u8];
	fn index(&self, range: Range<usize>) -> &[u8] { &self.bytes[range] }
}

impl IndexMut<Range<usize>> for MemoryData {
	fn index_mut(&mut self, range: Range<usize>) -> &mut [u8] { &mut self.bytes[range] }
}

/// A segment's backing byte array, shared copy-on-write between segments. A
/// segment holding the sole reference may write directly; a shared segment
/// must fork (copy the data into a fresh, owned array) before writing.
#[derive(Clone, Debug, Default)]
pub struct Memory {
	data: Rc<MemoryData>,
	loc: Loc,
}

impl Memory {
	/// Returns `true` if this memory is referenced by more than one segment.
	pub fn is_shared(&self) -> bool { Rc::strong_count(&self.data) > 1 }

	fn fork(&mut self) {
		if self.is_shared() {
			let mut fresh = MemoryData::default();
			fresh[self.loc.start..self.loc.end]
				.copy_from_slice(&self.data[self.loc.start..self.loc.end]);
			self.data = Rc::new(fresh);
		}
	}

	/// Returns a new memory sharing this memory's full current window.
	pub fn share_all(&self) -> Self {
		Self { data: Rc::clone(&self.data), loc: self.loc }
	}

	/// Returns a new memory sharing the first `byte_count` bytes of this
	/// memory's readable window.
	pub fn share(&self, byte_count: usize) -> Self {
		let byte_count = min(byte_count, self.len());
		Self {
			data: Rc::clone(&self.data),
			loc: Loc { start: self.loc.start, end: self.loc.start + byte_count },
		}
	}

	pub fn off_start(&self) -> usize { self.loc.start }
	pub fn len(&self) -> usize { self.loc.len() }
	pub fn lim(&self) -> usize { self.loc.lim() }

	pub fn data(&self) -> &[u8] { &self.data[self.loc.start..self.loc.end] }

	pub fn data_mut(&mut self) -> &mut [u8] {
		self.fork();
		let Loc { start, end } = self.loc;
		let data = Rc::get_mut(&mut self.data).expect("memory should be owned after fork");
		&mut data[start..end]
	}

	/// Returns the writable tail `[end, SIZE)`, forking shared memory first.
	pub fn tail_mut(&mut self) -> &mut [u8] {
		self.fork();
		let end = self.loc.end;
		let data = Rc::get_mut(&mut self.data).expect("memory should be owned after fork");
		&mut data[end..SIZE]
	}

	pub fn clear(&mut self) { self.loc.reset(); }

	pub fn shift(&mut self) {
		if self.loc.start == 0 { return }
		self.fork();
		let Loc { start, end } = self.loc;
		let data = Rc::get_mut(&mut self.data).expect("memory should be owned after fork");
		data.bytes.copy_within(start..end, 0);
		self.loc.shift();
	}

	pub fn consume(&mut self, n: usize) {
		self.loc.shrink_left(min(n, self.len()));
	}

	/// Shrinks the readable window by `n` bytes from the back.
	pub fn truncate(&mut self, n: usize) {
		self.loc.shrink_right(min(n, self.len()));
	}

	pub fn add(&mut self, n: usize) {
		self.loc.grow_right(min(n, self.lim()));
	}

	/// Moves `byte_count` bytes from this memory into `other`, returning the
	/// number of bytes moved.
	pub fn move_into(&mut self, other: &mut Self, byte_count: usize) -> usize {
		let n = min(byte_count, min(self.len(), other.lim()));
		if n == 0 { return 0 }
		let bytes = self.data()[..n].to_vec();
		other.data_mut()[..n].copy_from_slice(&bytes);
		other.add(n);
		self.consume(n);
		n
	}

	pub fn push(&mut self, byte: u8) -> bool {
		if self.lim() == 0 { return false }
		let at = self.loc.end;
		self.fork();
		let data = Rc::get_mut(&mut self.data).expect("memory should be owned after fork");
		data.bytes[at] = byte;
		self.loc.grow_right(1);
		true
	}

	pub fn pop(&mut self) -> Option<u8> {
		if self.is_empty() { return None }
		let byte = self.data()[0];
		self.consume(1);
		Some(byte)
	}

	pub fn push_slice(&mut self, bytes: &[u8]) -> usize {
		let n = min(bytes.len(), self.lim());
		self.data_mut()[..n].copy_from_slice(&bytes[..n]);
		self.add(n);
		n
	}

	pub fn pop_into_slice(&mut self, bytes: &mut [u8]) -> usize {
		let n = min(bytes.len(), self.len());
		bytes[..n].copy_from_slice(&self.data()[..n]);
		self.consume(n);
		n
	}

	fn is_empty(&self) -> bool { self.len() == 0 }
}

impl From<[u8; SIZE]> for Memory {
	fn from(value: [u8; SIZE]) -> Self {
		Self {
			data: Rc::new(MemoryData { bytes: Box::new(value) }),
			loc: Loc { start: 0, end: SIZE },
		}
	}
}
