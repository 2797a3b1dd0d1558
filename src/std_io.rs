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

//! Bridges between this crate's [`Source`]/[`Sink`] and [`std::io::Read`]/
//! [`std::io::Write`]. Each direction gets its own concrete newtype rather
//! than a blanket impl: a blanket `impl<R: Read> Source for R` would clash
//! with this crate's own concrete `Source`/`Sink` impls (`&[u8]`, `Vec<u8>`,
//! `FileSource`, ...), and nightly specialization is off the table.

use std::io;
use std::io::{Read, Seek, SeekFrom, Write};
use crate::Buffer;
use crate::pool::{Pool, SharedPool};
use crate::streams::{Error, Result, Seekable, SeekOffset, Sink, Source};
use crate::streams::OperationKind::{BufFlush, Seek as SeekOp};

/// Adapts a [`std::io::Read`] into a [`Source`].
pub struct StdSource<R>(R);

impl<R> StdSource<R> {
	pub fn new(reader: R) -> Self { Self(reader) }
	pub fn into_inner(self) -> R { self.0 }
}

impl<R> From<R> for StdSource<R> {
	fn from(reader: R) -> Self { Self(reader) }
}

impl<R: Read> Source for StdSource<R> {
	fn read(&mut self, sink: &mut Buffer<impl Pool>, count: usize) -> Result<usize> {
		sink.write_std(&mut self.0, count).map_err(Error::with_op_buf_read)
	}
}

impl<R: Seek> Seekable for StdSource<R> {
	fn seek(&mut self, offset: SeekOffset) -> Result<usize> {
		Ok(Seek::seek(&mut self.0, offset.into_seek_from())
			.map_err(|err| Error::io(SeekOp, err))? as usize)
	}
}

/// Adapts a [`std::io::Write`] into a [`Sink`].
pub struct StdSink<W>(W);

impl<W> StdSink<W> {
	pub fn new(writer: W) -> Self { Self(writer) }
	pub fn into_inner(self) -> W { self.0 }
}

impl<W> From<W> for StdSink<W> {
	fn from(writer: W) -> Self { Self(writer) }
}

impl<W: Write> Sink for StdSink<W> {
	fn write(&mut self, source: &mut Buffer<impl Pool>, count: usize) -> Result<usize> {
		source.read_std(&mut self.0, count).map_err(Error::with_op_buf_write)
	}

	fn flush(&mut self) -> Result {
		Write::flush(&mut self.0).map_err(|err| Error::io(BufFlush, err))
	}
}

impl<W: Seek> Seekable for StdSink<W> {
	fn seek(&mut self, offset: SeekOffset) -> Result<usize> {
		Ok(Seek::seek(&mut self.0, offset.into_seek_from())
			.map_err(|err| Error::io(SeekOp, err))? as usize)
	}
}

/// A wrapper implementing [`Read`] for any [`Source`].
pub struct SourceReader<S: Source>(S);

impl<S: Source> From<S> for SourceReader<S> {
	fn from(value: S) -> Self { Self(value) }
}

impl<S: Source> SourceReader<S> {
	pub fn into_inner(self) -> S { self.0 }
}

impl<S: Source> Read for SourceReader<S> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let Self(source) = self;
		let mut buffer = Buffer::<SharedPool>::default();
		let count = source.read(&mut buffer, buf.len()).map_err(Error::into_io)?;
		buffer.read_into_slice_exact(&mut buf[..count]).map_err(Error::into_io)?;
		Ok(count)
	}
}

impl<S: Source + Seekable> Seek for SourceReader<S> {
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		Ok(self.0.seek(pos.into()).map_err(Error::into_io)? as u64)
	}
}

/// A wrapper implementing [`Write`] for any [`Sink`].
pub struct SinkWriter<S: Sink>(S);

impl<S: Sink> From<S> for SinkWriter<S> {
	fn from(value: S) -> Self { Self(value) }
}

impl<S: Sink> SinkWriter<S> {
	pub fn into_inner(self) -> S { self.0 }
}

impl<S: Sink> Write for SinkWriter<S> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		let Self(sink) = self;
		let mut buffer = Buffer::<SharedPool>::default();
		buffer.write_from_slice(buf).map_err(Error::into_io)?;
		sink.write_all(&mut buffer).map_err(Error::into_io)?;
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		self.0.flush().map_err(Error::into_io)
	}
}

impl<S: Sink + Seekable> Seek for SinkWriter<S> {
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		Ok(self.0.seek(pos.into()).map_err(Error::into_io)? as u64)
	}
}
