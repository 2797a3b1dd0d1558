// SPDX-License-Identifier: Apache-2.0

//! A reusable, low-level view directly onto a buffer's segment array, for
//! platform adapters (file descriptors, sockets) that need to read or write
//! without copying through an intermediate `&[u8]`/`&mut [u8]`.

use std::ptr::NonNull;
use crate::Buffer;
use crate::pool::{Pool, SharedPool};
use crate::streams::{Error, Result};
use crate::streams::OperationKind::Other;

/// A reusable scratch cursor over a [`Buffer`]'s segments. Detached cursors
/// hold no buffer reference and can be attached to (and reused across) many
/// buffers over their lifetime, one at a time.
///
/// # Safety
///
/// `data`/`start`/`end` describe a view into the buffer's backing storage
/// that's only valid until the next call to [`Self::seek`], [`Self::next`],
/// or [`Self::close`] (or until the buffer itself is mutated through another
/// handle). Writing through `data` when the cursor was attached read-only
/// (via [`Buffer::read_unsafe`]) is undefined behavior.
pub struct UnsafeCursor<'b, P: Pool = SharedPool> {
	buffer: Option<&'b mut Buffer<P>>,
	read_write: bool,
	offset: isize,
	pub data: Option<NonNull<u8>>,
	pub start: usize,
	pub end: usize,
}

impl<'b, P: Pool> UnsafeCursor<'b, P> {
	/// A fresh, detached cursor.
	pub fn new() -> Self {
		Self { buffer: None, read_write: false, offset: -1, data: None, start: 0, end: 0 }
	}

	pub fn is_attached(&self) -> bool { self.buffer.is_some() }

	fn attach(&mut self, buffer: &'b mut Buffer<P>, read_write: bool) -> Result {
		if self.buffer.is_some() {
			return Err(Error::invalid_state(Other("cursor already attached")))
		}
		self.buffer = Some(buffer);
		self.read_write = read_write;
		self.offset = -1;
		self.data = None;
		self.start = 0;
		self.end = 0;
		Ok(())
	}

	fn buffer_mut(&mut self) -> Result<&mut Buffer<P>> {
		self.buffer.as_deref_mut().ok_or_else(|| Error::invalid_state(Other("cursor not attached")))
	}

	/// Positions the cursor at absolute offset `offset`, or detaches its view
	/// (`data = None`) if `offset == -1`. Returns the number of contiguous
	/// bytes available from `offset` to the end of the segment covering it,
	/// or `-1` at the end of the buffer.
	pub fn seek(&mut self, offset: isize) -> Result<isize> {
		if offset == -1 {
			self.data = None;
			self.start = 0;
			self.end = 0;
			self.offset = -1;
			return Ok(-1)
		}

		let read_write = self.read_write;
		let buffer = self.buffer_mut()?;
		let size = buffer.count() as isize;
		if offset < 0 || offset > size {
			return Err(Error::invalid_argument(Other("cursor seek out of range")))
		}

		let Some((seg, local)) = buffer.segments_mut().segment_for_mut(offset as usize) else {
			// offset == size: at the end, nothing to view yet.
			self.data = None;
			self.start = 0;
			self.end = 0;
			self.offset = offset;
			return Ok(-1)
		};

		let ptr = if read_write {
			seg.data_mut().as_mut_ptr()
		} else {
			seg.data().as_ptr() as *mut u8
		};
		let len = seg.len();

		self.data = NonNull::new(ptr);
		self.start = local;
		self.end = len;
		self.offset = offset;
		Ok((len - local) as isize)
	}

	/// Advances the cursor to the start of the next segment.
	pub fn next(&mut self) -> Result<isize> {
		let advance = (self.end - self.start) as isize;
		let next_offset = self.offset + advance.max(0);
		self.seek(next_offset)
	}

	/// Appends a writable tail with at least `min_byte_count` bytes of spare
	/// capacity and positions the cursor at it, growing the buffer's
	/// reported size to include the appended capacity.
	pub fn expand_buffer(&mut self, min_byte_count: usize) -> Result<usize> {
		if !self.read_write {
			return Err(Error::invalid_state(Other("cursor is not read/write")))
		}

		let buffer = self.buffer_mut()?;
		let seg = buffer.claim_writable_tail(min_byte_count)?;
		let added = seg.lim();
		seg.add(added);

		let offset = (buffer.count() - added) as isize;
		self.seek(offset)?;
		Ok(added)
	}

	/// Grows or shrinks the buffer to exactly `byte_count` bytes. Growth
	/// appends uninitialized (zeroed) capacity; shrinking truncates from the
	/// end.
	pub fn resize_buffer(&mut self, byte_count: usize) -> Result<usize> {
		if !self.read_write {
			return Err(Error::invalid_state(Other("cursor is not read/write")))
		}

		let buffer = self.buffer_mut()?;
		let old_size = buffer.count();

		match byte_count.cmp(&old_size) {
			std::cmp::Ordering::Greater => {
				let mut remaining = byte_count - old_size;
				while remaining > 0 {
					let seg = buffer.claim_writable_tail(1)?;
					let n = seg.lim().min(remaining);
					seg.add(n);
					remaining -= n;
				}
			}
			std::cmp::Ordering::Less => {
				buffer.truncate_tail(old_size - byte_count)?;
			}
			std::cmp::Ordering::Equal => {}
		}

		self.seek(-1)?;
		Ok(byte_count)
	}

	/// Detaches the cursor, invalidating its view.
	pub fn close(&mut self) -> Result {
		self.data = None;
		self.start = 0;
		self.end = 0;
		self.offset = -1;
		self.buffer = None;
		Ok(())
	}
}

impl<'b, P: Pool> Default for UnsafeCursor<'b, P> {
	fn default() -> Self { Self::new() }
}

impl<'b, P: Pool> Drop for UnsafeCursor<'b, P> {
	fn drop(&mut self) { let _ = self.close(); }
}

impl<P: Pool> Buffer<P> {
	/// Attaches `cursor` to this buffer for reading. Fails `InvalidState` if
	/// the cursor is already attached.
	pub fn read_unsafe<'b>(&'b mut self, cursor: &mut UnsafeCursor<'b, P>) -> Result {
		cursor.attach(self, false)
	}

	/// Attaches `cursor` to this buffer for reading and writing. Fails
	/// `InvalidState` if the cursor is already attached.
	pub fn read_and_write_unsafe<'b>(&'b mut self, cursor: &mut UnsafeCursor<'b, P>) -> Result {
		cursor.attach(self, true)
	}
}
