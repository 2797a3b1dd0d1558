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

use crate::Buffer;
use crate::pool::{Pool, SharedPool};
use crate::streams::{
	BufSink, BufSource, BufStream, Error, Result, Seekable, SeekOffset, Sink, Source,
};
use crate::streams::OperationKind::{BufFlush, BufRead};
use crate::segment::SIZE;

pub fn buffer_source<S: Source>(source: S) -> BufferedSource<S> {
	BufferedSource { buffer: Buffer::default(), source, closed: false }
}

pub fn buffer_sink<S: Sink>(sink: S) -> BufferedSink<S> {
	BufferedSink { buffer: Buffer::default(), sink, closed: false }
}

/// Wraps a [`Source`] with an owned [`Buffer`], exposing the rich typed-read
/// API of [`BufSource`] over it.
pub struct BufferedSource<S: Source> {
	buffer: Buffer<SharedPool>,
	source: S,
	closed: bool,
}

impl<S: Source> BufferedSource<S> {
	/// Reads from the inner source, rounding up to the nearest segment size so
	/// a request for a few bytes doesn't result in many small reads.
	fn fill_buf(&mut self, byte_count: usize) -> Result<bool> {
		let count = self.buffer.count();
		let seg_count = (count + byte_count + SIZE - 1) / SIZE;
		let request = seg_count * SIZE - count;

		let n = self.source
					.read(&mut self.buffer, request)
					.map_err(Error::with_op_buf_read)?;
		Ok(n > 0)
	}
}

impl<S: Source> Source for BufferedSource<S> {
	fn read(&mut self, sink: &mut Buffer<impl Pool>, byte_count: usize) -> Result<usize> {
		if self.closed { return Err(Error::closed(BufRead)) }

		self.request(byte_count)?;
		self.buffer.read(sink, byte_count).map_err(Error::with_op_buf_read)
	}

	fn close_source(&mut self) -> Result {
		if self.closed { return Ok(()) }
		self.closed = true;
		let buf_close = self.buffer.close();
		let src_close = self.source.close_source();
		buf_close?;
		src_close
	}
}

impl<S: Source> BufStream for BufferedSource<S> {
	fn buf(&self) -> &Buffer<impl Pool> { &self.buffer }
	fn buf_mut(&mut self) -> &mut Buffer<impl Pool> { &mut self.buffer }
}

impl<S: Source> BufSource for BufferedSource<S> {
	fn request(&mut self, byte_count: usize) -> Result<bool> {
		if self.closed { return Ok(false) }
		if self.buffer.count() >= byte_count { return Ok(true) }

		while self.buffer.count() < byte_count {
			if !self.fill_buf(byte_count - self.buffer.count())? {
				return Ok(false)
			}
		}
		Ok(true)
	}

	fn read_all(&mut self, sink: &mut impl Sink) -> Result<usize> {
		loop {
			self.fill_buf(SIZE)?;
			if self.buffer.is_empty() { break }
		}
		sink.write_all(self.buf_mut()).map_err(Error::with_op_buf_read)
	}
}

impl<S: Source + Seekable> Seekable for BufferedSource<S> {
	fn seek(&mut self, offset: SeekOffset) -> Result<usize> {
		match offset {
			SeekOffset::Forward(0) | SeekOffset::Back(0) => self.seek_pos(),
			SeekOffset::Forward(off) if off <= self.buffer.count() => {
				self.buffer.skip(off)?;
				self.seek_pos()
			}
			SeekOffset::Forward(off) => {
				// Consume the rest of what's buffered, then seek the source
				// for the remainder relative to its own (ahead-of-logical)
				// position.
				let buffered = self.buffer.count();
				self.buffer.clear().map_err(Error::with_op_seek)?;
				self.source.seek(SeekOffset::Forward(off - buffered))
			}
			SeekOffset::Back(off) => {
				// The source sits `buffered` bytes ahead of the logical
				// position, so seeking back must account for that gap too.
				let buffered = self.buffer.count();
				self.buffer.clear().map_err(Error::with_op_seek)?;
				self.source.seek(SeekOffset::Back(off + buffered))
			}
			_ => {
				// Reset/FromStart/FromEnd are absolute; just discard the
				// buffer and seek the underlying source directly.
				self.buffer.clear().map_err(Error::with_op_seek)?;
				self.source.seek(offset)
			}
		}
	}

	fn seek_len(&mut self) -> Result<usize> { self.source.seek_len() }

	fn seek_pos(&mut self) -> Result<usize> {
		Ok(self.source.seek_pos()?.saturating_sub(self.buffer.count()))
	}
}

impl<S: Source> Drop for BufferedSource<S> {
	fn drop(&mut self) { let _ = self.close_source(); }
}

/// Wraps a [`Sink`] with an owned [`Buffer`], exposing the rich typed-write
/// API of [`BufSink`] over it. Every write immediately flushes to the inner
/// sink; the buffer exists to batch typed writes into whole-segment moves,
/// not to defer I/O.
pub struct BufferedSink<S: Sink> {
	buffer: Buffer<SharedPool>,
	sink: S,
	closed: bool,
}

impl<S: Sink> Sink for BufferedSink<S> {
	fn write(&mut self, source: &mut Buffer<impl Pool>, byte_count: usize) -> Result<usize> {
		let count = self.buffer.write(source, byte_count)?;
		self.flush()?;
		Ok(count)
	}

	fn flush(&mut self) -> Result {
		if self.closed { return Err(Error::closed(BufFlush)) }

		let write = self.sink.write_all(&mut self.buffer).map_err(Error::with_op_buf_flush);
		let flush = self.sink.flush().map_err(Error::with_op_buf_flush);
		write?;
		flush
	}

	fn close_sink(&mut self) -> Result {
		if self.closed { return Ok(()) }
		self.closed = true;
		let flush = self.flush();
		let close = self.sink.close_sink();
		let clear = self.buffer.close();
		flush?;
		close?;
		clear
	}
}

impl<S: Sink> BufStream for BufferedSink<S> {
	fn buf(&self) -> &Buffer<impl Pool> { &self.buffer }
	fn buf_mut(&mut self) -> &mut Buffer<impl Pool> { &mut self.buffer }
}

impl<S: Sink> BufSink for BufferedSink<S> {
	fn write_all(&mut self, source: &mut impl Source) -> Result<usize> {
		let count = source.read_all(self.buf_mut()).map_err(Error::with_op_buf_write)?;
		self.flush()?;
		Ok(count)
	}
}

impl<S: Sink + Seekable> Seekable for BufferedSink<S> {
	fn seek(&mut self, offset: SeekOffset) -> Result<usize> {
		self.flush().map_err(Error::with_op_seek)?;
		self.sink.seek(offset)
	}

	fn seek_len(&mut self) -> Result<usize> {
		Ok(self.buffer.count() + self.sink.seek_len()?)
	}
}

impl<S: Sink> Drop for BufferedSink<S> {
	fn drop(&mut self) { let _ = self.close_sink(); }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flush_empties_the_buffer_and_forwards_every_byte() {
		let mut sink = BufferedSink { buffer: Buffer::default(), sink: Vec::<u8>::new(), closed: false };
		sink.write_from_slice(b"hello world").unwrap();
		sink.flush().unwrap();

		assert_eq!(sink.buf().count(), 0);
		assert_eq!(sink.sink, b"hello world");
	}
}
