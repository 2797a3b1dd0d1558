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
use std::io::Write;
use simdutf8::compat::from_utf8;
use crate::{Buffer, ByteString};
use crate::pool::Pool;
use crate::streams::{BufSource, Error, OffsetUtf8Error, Result, Sink, Source};
use crate::streams::OperationKind::BufRead;

/// A UTF-8 leading byte's expected sequence width in `[1, 4]`, or `0` for a
/// continuation byte or a byte that can never lead a valid sequence.
/// Mirrors the table `std` uses internally.
fn utf8_char_width(byte: u8) -> usize {
	match byte {
		0x00..=0x7F => 1,
		0xC2..=0xDF => 2,
		0xE0..=0xEF => 3,
		0xF0..=0xF4 => 4,
		_ => 0,
	}
}

/// The not-yet-resolved tail of a UTF-8 sequence split across a segment
/// boundary: a handful of bytes, confirmed valid so far, waiting on the next
/// segment's lead bytes to complete or invalidate them.
#[derive(Default)]
struct CharCarry {
	bytes: [u8; 4],
	len: usize,
}

impl CharCarry {
	fn is_empty(&self) -> bool { self.len == 0 }

	fn as_slice(&self) -> &[u8] { &self.bytes[..self.len] }

	/// The full width of the character this carry is partway through
	/// decoding, as declared by its first (already-known) byte.
	fn width(&self) -> usize { utf8_char_width(self.bytes[0]) }

	fn clear(&mut self) { self.len = 0; }

	/// Starts a new pending character from the trailing bytes of a decode
	/// attempt that ran out of segment before it could be resolved.
	fn start_from(&mut self, bytes: &[u8]) {
		self.bytes[..bytes.len()].copy_from_slice(bytes);
		self.len = bytes.len();
	}

	/// Appends bytes from the front of `src` until this character reaches
	/// its declared width or `src` runs out, returning how many were taken.
	fn fill(&mut self, src: &[u8]) -> usize {
		let need = self.width() - self.len;
		let take = min(need, src.len());
		self.bytes[self.len..self.len + take].copy_from_slice(&src[..take]);
		self.len += take;
		take
	}
}

/// Pushes as much of `seg` as decodes to UTF-8 onto `str`, replacing each
/// malformed byte run with U+FFFD, per the standard replacement-character
/// recovery policy. A sequence left incomplete by the end of `seg` is
/// stashed in `carry` rather than guessed at, so the next segment's lead
/// bytes can resolve it.
fn push_utf8_lossy(mut seg: &[u8], str: &mut String, carry: &mut CharCarry) {
	while !seg.is_empty() {
		match from_utf8(seg) {
			Ok(valid) => {
				str.push_str(valid);
				return
			}
			Err(err) => {
				let valid_up_to = err.valid_up_to();
				// Safety: `from_utf8` validated this prefix.
				str.push_str(unsafe { std::str::from_utf8_unchecked(&seg[..valid_up_to]) });

				let Some(bad_len) = err.error_len() else {
					// Incomplete trailing sequence; carry it into the next
					// segment's decode instead of guessing.
					carry.start_from(&seg[valid_up_to..]);
					return
				};
				str.push('\u{FFFD}');
				seg = &seg[valid_up_to + bad_len..];
			}
		}
	}
}

impl<P: Pool> Buffer<P> {
	/// Writes up to `count` buffered bytes into a [`std::io::Write`]r.
	pub(crate) fn read_std<W: Write>(&mut self, writer: &mut W, count: usize) -> Result<usize> {
		self.read_segments(count, |seg| {
			writer.write(seg).map_err(|err| Error::io(BufRead, err))
		})
	}

	/// Walks laden segments front-to-back, consuming up to `max_count` bytes
	/// total, calling `consume` with each segment's readable slice.
	fn read_segments(
		&mut self,
		mut max_count: usize,
		mut consume: impl FnMut(&[u8]) -> Result<usize>,
	) -> Result<usize> {
		let mut count = 0;
		let mut front = Vec::new();

		while max_count > 0 {
			let Some(mut seg) = self.segments.pop_front() else { break };
			let len = min(max_count, seg.len());
			let read = consume(&seg.data()[..len])?;
			seg.consume(read);
			count += read;
			max_count = max_count.saturating_sub(read);
			let done = read < len;
			front.push(seg);
			if done { break }
		}

		for seg in front.into_iter().rev() {
			if seg.is_empty() {
				self.segments.push(seg);
			} else {
				// At most the last segment touched can still hold data (every
				// earlier one was drained whole); putting it back via `push`
				// would insert it behind any untouched laden segments further
				// back in the ring instead of in front of them.
				self.segments.push_front(seg);
			}
		}

		self.bump_generation();
		self.tidy().map_err(Error::with_op_buf_read)?;
		Ok(count)
	}

	/// Reads UTF-8 text up to (and discarding) the next line terminator found
	/// within the currently buffered bytes, appending it to `str`. Returns
	/// whether a terminator was found; if not, all buffered bytes are consumed
	/// into `str` and the caller should refill and retry.
	pub(crate) fn read_utf8_line_raw(&mut self, str: &mut String) -> Result<bool> {
		if let Some(mut line_term) = self.index_of(b'\n', 0, self.count()) {
			let mut len = 1;

			if line_term > 0 {
				if let Some(b'\r') = self.byte_at(line_term - 1) {
					line_term -= 1;
					len += 1;
				}
			}

			self.read_utf8(str, line_term)?;
			self.skip(len)?;
			Ok(true)
		} else {
			self.read_utf8(str, usize::MAX)?;
			Ok(false)
		}
	}
}

impl<P: Pool> Source for Buffer<P> {
	fn read(&mut self, sink: &mut Buffer<impl Pool>, mut count: usize) -> Result<usize> {
		let mut read = 0;
		count = min(count, self.count());

		while count > 0 {
			let Some(mut seg) = self.segments.pop_front() else { break };
			let len = seg.len();

			if len <= count {
				// Move whole segments to the sink without copying.
				sink.segments.push(seg);
				count -= len;
				read += len;
			} else {
				// Share the requested prefix of the final partial segment,
				// keeping the remainder in this buffer.
				sink.segments.push(seg.share(count));
				seg.consume(count);
				self.segments.push(seg);
				read += count;
				count = 0;
			}
		}

		self.bump_generation();
		self.tidy().map_err(Error::with_op_buf_read)?;
		sink.tidy().map_err(Error::with_op_buf_write)?;

		Ok(read)
	}

	fn close_source(&mut self) -> Result { self.close() }
}

macro_rules! gen_int_reads {
	($($s_name:ident$s_le_name:ident$s_ty:ident$u_name:ident$u_le_name:ident$u_ty:ident),+) => {
		$(
		fn $s_name(&mut self) -> Result<$s_ty> {
			self.$u_name().map(|n| n as $s_ty)
		}

		fn $s_le_name(&mut self) -> Result<$s_ty> {
			self.$u_le_name().map(|n| n as $s_ty)
		}

		fn $u_name(&mut self) -> Result<$u_ty> {
			Ok($u_ty::from_be_bytes(self.read_array()?))
		}

		fn $u_le_name(&mut self) -> Result<$u_ty> {
			Ok($u_ty::from_le_bytes(self.read_array()?))
		}
		)+
	};
}

impl<P: Pool> BufSource for Buffer<P> {
	fn request(&mut self, byte_count: usize) -> Result<bool> {
		Ok(self.count() >= byte_count)
	}

	fn read_all(&mut self, sink: &mut impl Sink) -> Result<usize> {
		sink.write_all(self).map_err(Error::with_op_buf_read)
	}

	fn read_i8(&mut self) -> Result<i8> { self.read_u8().map(|n| n as i8) }

	fn read_u8(&mut self) -> Result<u8> {
		self.require(1)?;
		let Some(mut seg) = self.segments.pop_front() else {
			unreachable!("require(1) should guarantee a non-empty front segment")
		};
		let byte = seg.pop().expect("segment should have at least one byte");
		self.segments.push(seg);
		self.bump_generation();
		self.tidy().map_err(Error::with_op_buf_read)?;
		Ok(byte)
	}

	gen_int_reads! {
		read_i16   read_i16_le   i16   read_u16   read_u16_le u16,
		read_i32   read_i32_le   i32   read_u32   read_u32_le u32,
		read_i64   read_i64_le   i64   read_u64   read_u64_le u64,
		read_isize read_isize_le isize read_usize read_usize_le usize
	}

	fn read_byte_str(&mut self, byte_count: usize) -> Result<ByteString> {
		let len = min(byte_count, self.count());
		let mut dst = ByteString::with_capacity(len);
		self.read_segments(len, |seg| {
			dst.extend_from_slice(seg);
			Ok(seg.len())
		})?;
		Ok(dst)
	}

	fn read_into_slice(&mut self, dst: &mut [u8]) -> Result<usize> {
		let n = min(dst.len(), self.count());
		self.read_into_slice_exact(&mut dst[..n])?;
		Ok(n)
	}

	fn read_into_slice_exact(&mut self, dst: &mut [u8]) -> Result {
		let count = dst.len();
		self.require(count)?;

		let mut off = 0;
		self.read_segments(count, |seg| {
			let len = seg.len();
			dst[off..off + len].copy_from_slice(seg);
			off += len;
			Ok(len)
		})?;

		assert_eq!(off, dst.len(), "exact slice length should have been read");
		Ok(())
	}

	fn read_utf8(&mut self, str: &mut String, byte_count: usize) -> Result<usize> {
		let mut remaining = min(byte_count, self.count());
		let mut count = 0;
		let mut carry = CharCarry::default();
		let mut trailing = None;

		while remaining > 0 {
			let Some(mut seg) = self.segments.pop_front() else { break };
			let take = min(remaining, seg.len());
			let mut bytes = &seg.data()[..take];

			if !carry.is_empty() {
				let base = carry.len;
				let used = carry.fill(bytes);

				if carry.len == carry.width() {
					let keep_from_new = match from_utf8(carry.as_slice()) {
						Ok(valid) => { str.push_str(valid); used }
						Err(err) => {
							let error_len = err.error_len().expect(
								"a char carry filled to its declared width is always \
								 conclusively valid or invalid"
							);
							str.push('\u{FFFD}');
							error_len - base
						}
					};
					bytes = &bytes[keep_from_new..];
					carry.clear();
				} else {
					bytes = &bytes[used..];
				}
			}

			if carry.is_empty() {
				push_utf8_lossy(bytes, str, &mut carry);
			}

			seg.consume(take);
			count += take;
			remaining -= take;

			if seg.is_empty() {
				self.segments.push(seg);
			} else {
				// Only the final segment touched (`remaining` ran out mid-way
				// through it) can still hold data here.
				trailing = Some(seg);
			}
		}

		if !carry.is_empty() {
			// Ran out of buffered bytes with a character still incomplete;
			// nothing more is coming for this call, so it can't be resolved.
			str.push('\u{FFFD}');
		}

		if let Some(seg) = trailing {
			self.segments.push_front(seg);
		}

		self.bump_generation();
		self.tidy().map_err(Error::with_op_buf_read)?;
		Ok(count)
	}

	fn read_utf8_into_slice(&mut self, str: &mut str) -> Result<usize> {
		let mut off = 0;
		let mut written = 0;
		let total = str.len();
		// Safety: each written range is re-validated UTF-8 before copying.
		let bytes = unsafe { str.as_bytes_mut() };
		self.read_segments(total, |seg| {
			let utf8 = from_utf8(seg).map_err(|err|
				Error::invalid_utf8(BufRead, OffsetUtf8Error::new(err, off))
			)?;
			let n = utf8.len();
			bytes[written..written + n].copy_from_slice(utf8.as_bytes());
			written += n;
			off += seg.len();
			Ok(n)
		})
	}

	fn index_of(&mut self, byte: u8, from: usize, to: usize) -> Result<Option<usize>> {
		Ok(Buffer::index_of(self, byte, from, to))
	}
}
