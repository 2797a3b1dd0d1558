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

use std::error::Error as StdError;
use std::{fmt, io, mem, result};
use std::cmp::min;
use std::fmt::{Display, Formatter};
use simdutf8::compat::Utf8Error;
use thiserror::Error as ThisError;
use crate::{Buffer, ByteStr, ByteString, error};
use crate::buffered_wrappers::{buffer_sink, buffer_source, BufferedSink, BufferedSource};
use crate::pool::{Pool, PoolError, SharedPool};
use crate::segment::SIZE;
use crate::streams::codec::{Decode, Encode};
use crate::streams::OperationKind::{BufClear, BufCompact, BufCopy, BufFlush, BufRead, BufWrite, Seek};

pub mod codec;
mod seeking;
mod file;
mod void;

pub use seeking::*;
pub use file::*;
pub use void::*;

pub type Error = error::Error<OperationKind, ErrorKind>;
pub type Result<T = ()> = result::Result<T, Error>;

/// The high-level operation an [`Error`] was raised during.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ThisError)]
pub enum OperationKind {
	#[default]
	#[error("unknown operation")]
	Unknown,
	#[error("read from buffer")]
	BufRead,
	#[error("write to buffer")]
	BufWrite,
	#[error("copy buffer")]
	BufCopy,
	#[error("clear buffer")]
	BufClear,
	#[error("flush buffer")]
	BufFlush,
	#[error("compact buffer")]
	BufCompact,
	#[error("select from options")]
	Select,
	#[error("seek")]
	Seek,
	#[error("{0}")]
	Other(&'static str),
}

impl error::OperationKind for OperationKind {
	fn unknown() -> Self { Self::Unknown }
}

/// The failure category of an [`Error`].
#[derive(Copy, Clone, Debug, ThisError)]
pub enum ErrorKind {
	#[error("premature end of input")]
	UnexpectedEnd,
	#[error("stream closed")]
	Closed,
	#[error("invalid operation for the current state")]
	InvalidState,
	#[error("invalid argument")]
	InvalidArgument,
	#[error("malformed or overflowing number")]
	OverflowMalformed,
	#[error("operation timed out")]
	Timeout,
	#[error("I/O error")]
	Io,
	#[error("invalid UTF-8")]
	InvalidUtf8,
	#[error("segment pool error")]
	Pool,
	#[error("path not found")]
	NotFound,
	#[error("path already exists")]
	AlreadyExists,
	#[error("permission denied")]
	PermissionDenied,
	#[error("unsupported operation")]
	Unsupported,
	#[error("{0}")]
	Other(&'static str),
}

impl error::ErrorKind for ErrorKind {
	fn other(message: &'static str) -> Self { Self::Other(message) }
}

impl From<io::Error> for Error {
	fn from(value: io::Error) -> Self {
		use ErrorKind::*;
		let kind = match value.kind() {
			io::ErrorKind::UnexpectedEof => return Self::unexpected_end(OperationKind::Unknown),
			io::ErrorKind::NotFound => NotFound,
			io::ErrorKind::AlreadyExists => AlreadyExists,
			io::ErrorKind::PermissionDenied => PermissionDenied,
			io::ErrorKind::TimedOut => Timeout,
			io::ErrorKind::Unsupported => Unsupported,
			_ => Io,
		};
		Self::new(OperationKind::Unknown, kind, Some(Box::new(value)))
	}
}

impl From<PoolError> for Error {
	fn from(value: PoolError) -> Self { Self::pool(value) }
}

impl Error {
	pub fn unexpected_end(op: OperationKind) -> Self { Self::new(op, ErrorKind::UnexpectedEnd, None) }
	pub fn io(op: OperationKind, error: io::Error) -> Self { Self::new(op, ErrorKind::Io, Some(Box::new(error))) }
	pub fn closed(op: OperationKind) -> Self { Self::new(op, ErrorKind::Closed, None) }
	pub fn invalid_state(op: OperationKind) -> Self { Self::new(op, ErrorKind::InvalidState, None) }
	pub fn invalid_argument(op: OperationKind) -> Self { Self::new(op, ErrorKind::InvalidArgument, None) }
	pub fn overflow(op: OperationKind) -> Self { Self::new(op, ErrorKind::OverflowMalformed, None) }
	pub fn timeout(op: OperationKind) -> Self { Self::new(op, ErrorKind::Timeout, None) }

	pub fn pool(error: PoolError) -> Self {
		Self::new(OperationKind::Unknown, ErrorKind::Pool, Some(Box::new(error)))
	}

	pub fn invalid_utf8(op: OperationKind, error: OffsetUtf8Error) -> Self {
		Self::new(op, ErrorKind::InvalidUtf8, Some(Box::new(error)))
	}

	/// Returns the source downcast into an IO error, if possible.
	pub fn io_source(&self) -> Option<&io::Error> {
		self.source()?.downcast_ref()
	}

	pub fn with_op_buf_read(self) -> Self { self.with_operation(BufRead) }
	pub fn with_op_buf_write(self) -> Self { self.with_operation(BufWrite) }
	pub fn with_op_buf_copy(self) -> Self { self.with_operation(BufCopy) }
	pub fn with_op_buf_clear(self) -> Self { self.with_operation(BufClear) }
	pub fn with_op_buf_flush(self) -> Self { self.with_operation(BufFlush) }
	pub fn with_op_buf_compact(self) -> Self { self.with_operation(BufCompact) }
	pub fn with_op_seek(self) -> Self { self.with_operation(Seek) }

	pub(crate) fn into_io(self) -> io::Error {
		match self.kind() {
			ErrorKind::UnexpectedEnd => io::Error::new(io::ErrorKind::UnexpectedEof, self),
			ErrorKind::Io => {
				let Some(src) = self.io_source() else {
					return io::Error::other(self)
				};
				io::Error::new(src.kind(), self)
			}
			_ => io::Error::other(self),
		}
	}
}

/// A data source: something bytes can be read from into a [`Buffer`].
pub trait Source {
	/// Reads up to `count` bytes from the source into `sink`, returning the
	/// number of bytes read, or `0` at end of input.
	fn read(&mut self, sink: &mut Buffer<impl Pool>, count: usize) -> Result<usize>;

	/// Reads all remaining bytes from the source into `sink`.
	#[inline]
	fn read_all(&mut self, sink: &mut Buffer<impl Pool>) -> Result<usize> {
		let mut total = 0;
		loop {
			let n = self.read(sink, usize::MAX)?;
			if n == 0 { return Ok(total) }
			total += n;
		}
	}

	/// Closes the source. Idempotent; closing more than once has no effect.
	/// Default streams close automatically on [`Drop`].
	fn close_source(&mut self) -> Result { Ok(()) }
}

pub trait SourceBuffer: Source + Sized {
	/// Wraps the source in a [`BufferedSource`].
	fn buffer(self) -> BufferedSource<Self> { buffer_source(self) }
}

impl<S: Source> SourceBuffer for S { }

/// A data sink: something bytes can be written to from a [`Buffer`].
pub trait Sink {
	/// Writes `count` bytes from `source` into the sink.
	fn write(&mut self, source: &mut Buffer<impl Pool>, count: usize) -> Result<usize>;

	/// Writes all bytes currently in `source`.
	#[inline]
	fn write_all(&mut self, source: &mut Buffer<impl Pool>) -> Result<usize> {
		self.write(source, source.count())
	}

	/// Writes all buffered data to its final target.
	fn flush(&mut self) -> Result { Ok(()) }

	/// Flushes and closes the sink. Idempotent.
	fn close_sink(&mut self) -> Result { self.flush() }
}

pub trait SinkBuffer: Sink + Sized {
	/// Wraps the sink in a [`BufferedSink`].
	fn buffer(self) -> BufferedSink<Self> { buffer_sink(self) }
}

impl<S: Sink> SinkBuffer for S { }

/// Something backed by an owned [`Buffer`].
pub trait BufStream {
	fn buf(&self) -> &Buffer<impl Pool>;
	fn buf_mut(&mut self) -> &mut Buffer<impl Pool>;
}

fn calc_read_count(byte_count: usize, buf: &Buffer<impl Pool>) -> usize {
	min(byte_count, SIZE.saturating_sub(buf.count()))
}

macro_rules! gen_int_reads {
	($($be_name:ident$($le_name:ident)?->$ty:ident,)+) => {
		$(gen_int_reads! { $be_name$($le_name)?->$ty })+
	};
	($be_name:ident$le_name:ident->$ty:ident) => {
		gen_int_reads! { $be_name->$ty "big-endian " }
		gen_int_reads! { $le_name->$ty "little-endian " }
	};
	($name:ident->$ty:ident$($endian:literal)?) => {
		#[doc = concat!(" Reads one ",$($endian,)?"[`",stringify!($ty),"`] from the buffer.")]
		fn $name(&mut self) -> Result<$ty> {
			self.require(mem::size_of::<$ty>())?;
			self.buf_mut().$name()
		}
	}
}

/// A [`BufStream`] that is also a [`Source`], exposing the rich typed-read API
/// over an owned [`Buffer`].
pub trait BufSource: BufStream + Source {
	/// Reads up to `byte_count` bytes into the buffer, returning whether the
	/// requested count is available. Use [`Self::require`] to fail instead of
	/// returning `false`.
	fn request(&mut self, byte_count: usize) -> Result<bool>;

	/// Reads at least `byte_count` bytes into the buffer, failing with
	/// [`ErrorKind::UnexpectedEnd`] if the source is exhausted first.
	fn require(&mut self, byte_count: usize) -> Result {
		if self.request(byte_count)? {
			Ok(())
		} else {
			Err(Error::unexpected_end(BufRead))
		}
	}

	fn read_all(&mut self, sink: &mut impl Sink) -> Result<usize>;

	fn read_into(&mut self, value: &mut impl Decode, byte_count: usize) -> Result<usize> {
		value.decode(self.buf_mut(), byte_count, false)
	}

	fn read_into_le(&mut self, value: &mut impl Decode, byte_count: usize) -> Result<usize> {
		value.decode(self.buf_mut(), byte_count, true)
	}

	gen_int_reads! {
		read_i8 -> i8,
		read_u8 -> u8,
		read_i16 read_i16_le -> i16,
		read_u16 read_u16_le -> u16,
		read_i32 read_i32_le -> i32,
		read_u32 read_u32_le -> u32,
		read_i64 read_i64_le -> i64,
		read_u64 read_u64_le -> u64,
		read_isize read_isize_le -> isize,
		read_usize read_usize_le -> usize,
	}

	/// Reads up to `byte_count` bytes into a [`ByteString`].
	fn read_byte_str(&mut self, byte_count: usize) -> Result<ByteString> {
		self.request(byte_count)?;
		self.buf_mut().read_byte_str(byte_count)
	}

	/// Removes `byte_count` bytes from the source.
	fn skip(&mut self, mut byte_count: usize) -> Result<usize> {
		let mut n = 0;
		while byte_count > 0 && self.request(calc_read_count(byte_count, self.buf()))? {
			let skipped = self.buf_mut().skip(byte_count)?;
			if skipped == 0 { break }
			n += skipped;
			byte_count -= skipped;
		}
		Ok(n)
	}

	/// Reads bytes into a slice, returning the number of bytes read (may be
	/// less than `dst.len()` at end of input).
	fn read_into_slice(&mut self, mut dst: &mut [u8]) -> Result<usize> {
		let mut n = 0;
		while !dst.is_empty() && self.request(calc_read_count(dst.len(), self.buf()))? {
			let read = self.buf_mut().read_into_slice(dst)?;
			if read == 0 { break }
			n += read;
			dst = &mut dst[read..];
		}
		Ok(n)
	}

	/// Reads the exact length of bytes into a slice, failing with
	/// [`ErrorKind::UnexpectedEnd`] if the slice can't be filled.
	fn read_into_slice_exact(&mut self, dst: &mut [u8]) -> Result {
		let len = dst.len();
		self.require(len)?;
		self.buf_mut().read_into_slice_exact(dst)
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut array = [0; N];
		self.read_into_slice_exact(&mut array)?;
		Ok(array)
	}

	/// Reads all remaining bytes, decoding them into `str` as UTF-8.
	fn read_all_utf8(&mut self, str: &mut String) -> Result {
		while self.read_utf8(str, usize::MAX)? > 0 { }
		Ok(())
	}

	/// Reads at most `byte_count` bytes, decoding them into `str` as UTF-8.
	/// Returns the number of bytes read.
	fn read_utf8(&mut self, str: &mut String, mut byte_count: usize) -> Result<usize> {
		let mut n = 0;
		while byte_count > 0 && self.request(calc_read_count(byte_count, self.buf()))? {
			let read = self.buf_mut().read_utf8(str, byte_count)?;
			if read == 0 { break }
			n += read;
			byte_count -= read;
		}
		Ok(n)
	}

	/// Reads UTF-8 text up to (and discarding) the next line terminator.
	/// Returns `None` at end of input with nothing left to return, `Some` with
	/// the line otherwise (the final line need not be terminated).
	fn read_utf8_line(&mut self) -> Result<Option<String>> {
		let mut line = String::new();
		loop {
			if self.buf_mut().read_utf8_line_raw(&mut line)? {
				return Ok(Some(line))
			}
			if !self.request(calc_read_count(usize::MAX, self.buf()))? {
				return Ok((!line.is_empty()).then_some(line))
			}
		}
	}

	/// Like [`Self::read_utf8_line`], but fails with
	/// [`ErrorKind::UnexpectedEnd`] if no terminator is found before input is
	/// exhausted, and with [`ErrorKind::InvalidArgument`] if the line would
	/// exceed `limit` bytes (a `\r\n` terminator straddling `limit` is still
	/// consumed in full).
	fn read_utf8_line_strict(&mut self, limit: usize) -> Result<String> {
		match self.read_utf8_line()? {
			Some(line) if line.len() <= limit => Ok(line),
			Some(_) => Err(Error::invalid_argument(BufRead)),
			None => Err(Error::unexpected_end(BufRead)),
		}
	}

	/// Reads UTF-8 text into a string slice, returning the number of bytes read.
	fn read_utf8_into_slice(&mut self, mut str: &mut str) -> Result<usize> {
		let mut n = 0;
		while !str.is_empty() && self.request(calc_read_count(str.len(), self.buf()))? {
			let read = self.buf_mut().read_utf8_into_slice(str)?;
			if read == 0 { break }
			n += read;
			str = &mut str[read..];
		}
		Ok(n)
	}

	/// Finds the offset of `byte` in `[from, to)`, refilling as needed.
	fn index_of(&mut self, byte: u8, from: usize, to: usize) -> Result<Option<usize>> {
		loop {
			if let Some(i) = self.buf().index_of(byte, from, to) {
				return Ok(Some(i))
			}
			if to <= self.buf().count() || !self.request(calc_read_count(to, self.buf()))? {
				return Ok(None)
			}
		}
	}

	/// Refills enough bytes to discriminate between `options`'s alternatives,
	/// consumes the longest one matching the head of the buffer, and returns
	/// its index; or returns `None` (consuming nothing) if none match.
	fn select(&mut self, options: &crate::options::Options) -> Result<Option<usize>> {
		self.request(options.max_len())?;
		let matched = {
			let buf = self.buf();
			options.longest_match(|i| buf.get(i))
		};
		match matched {
			Some((index, len)) => {
				self.skip(len)?;
				Ok(Some(index))
			}
			None => Ok(None),
		}
	}

	/// Reads the decimal representation of a signed integer written by
	/// [`BufSink::write_decimal`], consuming exactly the optional sign and
	/// digits that make it up.
	fn read_decimal(&mut self) -> Result<i64> {
		let len = scan_numeral(self, true)?;
		let mut text = String::with_capacity(len);
		self.read_utf8(&mut text, len)?;
		text.parse().map_err(|_| Error::invalid_argument(BufRead))
	}

	/// Reads the lowercase hexadecimal representation of an unsigned integer
	/// written by [`BufSink::write_hex_unsigned`], consuming exactly the
	/// digits that make it up.
	fn read_hex_unsigned(&mut self) -> Result<u64> {
		let len = scan_numeral(self, false)?;
		let mut text = String::with_capacity(len);
		self.read_utf8(&mut text, len)?;
		u64::from_str_radix(&text, 16).map_err(|_| Error::invalid_argument(BufRead))
	}
}

/// Refills and scans forward from the head of `source`'s buffer while bytes
/// form a numeral (an optional leading sign, when `signed`, followed by ASCII
/// hex digits), returning the length of the numeral found without consuming
/// it.
fn scan_numeral(source: &mut (impl BufSource + ?Sized), signed: bool) -> Result<usize> {
	let mut len = 0;
	loop {
		if source.buf().count() <= len {
			if !source.request(len + 1)? { break }
			continue
		}
		let byte = source.buf().get(len).expect("byte should be buffered");
		let is_sign = signed && len == 0 && matches!(byte, b'-' | b'+');
		if is_sign || byte.is_ascii_hexdigit() {
			len += 1;
		} else {
			break
		}
	}
	Ok(len)
}

macro_rules! gen_int_writes {
	($($be_name:ident$($le_name:ident)?->$ty:ident,)+) => {
		$(gen_int_writes! { $be_name$($le_name)?->$ty })+
	};
	($be_name:ident$le_name:ident->$ty:ident) => {
		gen_int_writes! { $be_name->$ty "big-endian " }
		gen_int_writes! { $le_name->$ty "little-endian " }
	};
	($name:ident->$ty:ident$($endian:literal)?) => {
		#[doc = concat!(" Writes one ",$($endian,)?"[`",stringify!($ty),"`] to the buffer.")]
		fn $name(&mut self, value: $ty) -> Result {
			self.buf_mut().$name(value)
		}
	}
}

/// A [`BufStream`] that is also a [`Sink`], exposing the rich typed-write API
/// over an owned [`Buffer`].
pub trait BufSink: BufStream + Sink {
	fn write_all(&mut self, source: &mut impl Source) -> Result<usize>;

	fn write_from(&mut self, value: impl Encode) -> Result<usize> {
		value.encode(self.buf_mut(), false)
	}

	fn write_from_le(&mut self, value: impl Encode) -> Result<usize> {
		value.encode(self.buf_mut(), true)
	}

	gen_int_writes! {
		write_i8 -> i8,
		write_u8 -> u8,
		write_i16 write_i16_le -> i16,
		write_u16 write_u16_le -> u16,
		write_i32 write_i32_le -> i32,
		write_u32 write_u32_le -> u32,
		write_i64 write_i64_le -> i64,
		write_u64 write_u64_le -> u64,
		write_isize write_isize_le -> isize,
		write_usize write_usize_le -> usize,
	}

	fn write_byte_str(&mut self, value: &ByteStr) -> Result {
		for slice in value.iter() {
			self.write_from_slice(slice)?;
		}
		Ok(())
	}

	fn write_byte_string(&mut self, value: &ByteString) -> Result {
		self.write_from_slice(value.as_slice())
	}

	fn write_from_slice(&mut self, value: &[u8]) -> Result {
		self.buf_mut().write_from_slice(value)
	}

	fn write_utf8(&mut self, value: &str) -> Result {
		self.buf_mut().write_utf8(value)
	}

	/// Writes the decimal representation of `value`.
	fn write_decimal(&mut self, value: i64) -> Result {
		self.buf_mut().write_decimal(value)
	}

	/// Writes the lowercase hexadecimal representation of `value`.
	fn write_hex_unsigned(&mut self, value: u64) -> Result {
		self.buf_mut().write_hex_unsigned(value)
	}
}

// Impls

impl Source for &[u8] {
	fn read(&mut self, sink: &mut Buffer<impl Pool>, mut count: usize) -> Result<usize> {
		count = min(count, self.len());
		if count == 0 { return Ok(0) }
		sink.write_from_slice(&self[..count]).map_err(Error::with_op_buf_write)?;
		*self = &self[count..];
		Ok(count)
	}
}

impl Sink for Vec<u8> {
	fn write(&mut self, source: &mut Buffer<impl Pool>, count: usize) -> Result<usize> {
		let count = min(count, source.count());
		let start = self.len();
		self.resize(start + count, 0);
		source.read_into_slice_exact(&mut self[start..]).map_err(Error::with_op_buf_read)?;
		Ok(count)
	}
}

/// Converts some type into a [`Source`].
pub trait IntoSource<S: Source> {
	fn into_source(self) -> S;
}

/// Converts some type into a [`Sink`].
pub trait IntoSink<S: Sink> {
	fn into_sink(self) -> S;
}

impl<S: Source, T: Into<S>> IntoSource<S> for T {
	fn into_source(self) -> S { self.into() }
}

impl<S: Sink, T: Into<S>> IntoSink<S> for T {
	fn into_sink(self) -> S { self.into() }
}

/// A UTF-8 decode error carrying the absolute byte offset it occurred at,
/// useful when decoding happens piecewise across refills of a buffer.
#[derive(Copy, Clone, Debug)]
pub struct OffsetUtf8Error {
	inner: Utf8Error,
	offset: usize,
}

impl OffsetUtf8Error {
	pub(crate) fn new(inner: Utf8Error, offset: usize) -> Self { Self { inner, offset } }

	pub fn into_inner(self) -> Utf8Error { self.inner }

	pub fn valid_up_to(&self) -> usize { self.offset + self.inner.valid_up_to() }

	pub fn error_len(&self) -> Option<usize> { self.inner.error_len() }
}

impl Display for OffsetUtf8Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		if let Some(error_len) = self.error_len() {
			write!(f, "invalid utf-8 sequence of {error_len} bytes from index {}", self.valid_up_to())
		} else {
			write!(f, "incomplete utf-8 byte sequence from index {}", self.valid_up_to())
		}
	}
}

impl StdError for OffsetUtf8Error {
	fn source(&self) -> Option<&(dyn StdError + 'static)> { Some(&self.inner) }
}
