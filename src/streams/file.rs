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

//! A thin file-system collaborator. This is intentionally minimal: it is out
//! of the core's hard scope (path handling, metadata, and positional I/O are
//! `std::fs`'s job), so this module only adapts [`File`] to [`Source`]/[`Sink`]
//! and [`Seekable`].

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek as StdSeek, SeekFrom, Write};
use std::path::Path;
use std::{cmp::min, io};
use tracing::debug;
use crate::Buffer;
use crate::pool::Pool;
use crate::segment::SIZE;
use crate::streams::{OperationKind, Result, SeekOffset, Seekable, Sink, Source};

/// A [`Source`] reading from a [`File`].
pub struct FileSource {
	file: File,
}

/// A [`Sink`] writing to a [`File`].
pub struct FileSink {
	file: File,
}

impl FileSource {
	pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
		debug!(path = %path.as_ref().display(), "opening file source");
		Ok(Self { file: File::open(path)? })
	}
}

impl FileSink {
	pub fn create<P: AsRef<Path>>(path: P, must_create: bool) -> io::Result<Self> {
		debug!(path = %path.as_ref().display(), must_create, "opening file sink");
		let file = OpenOptions::new()
			.write(true)
			.create(true)
			.create_new(must_create)
			.truncate(!must_create)
			.open(path)?;
		Ok(Self { file })
	}

	pub fn append<P: AsRef<Path>>(path: P, must_exist: bool) -> io::Result<Self> {
		let file = OpenOptions::new()
			.append(true)
			.create(!must_exist)
			.open(path)?;
		Ok(Self { file })
	}
}

impl From<File> for FileSource {
	fn from(file: File) -> Self { Self { file } }
}

impl From<File> for FileSink {
	fn from(file: File) -> Self { Self { file } }
}

impl Source for FileSource {
	fn read(&mut self, sink: &mut Buffer<impl Pool>, count: usize) -> Result<usize> {
		let mut total = 0;
		let mut tmp = [0u8; SIZE];
		while total < count {
			let n = min(count - total, SIZE);
			let read = self.file.read(&mut tmp[..n])
				.map_err(|e| crate::streams::Error::from(e).with_operation(OperationKind::BufRead))?;
			if read == 0 { break }
			sink.write_from_slice(&tmp[..read]).map_err(crate::streams::Error::with_op_buf_read)?;
			total += read;
		}
		Ok(total)
	}

	fn close_source(&mut self) -> Result { Ok(()) }
}

impl Sink for FileSink {
	fn write(&mut self, source: &mut Buffer<impl Pool>, count: usize) -> Result<usize> {
		let count = min(count, source.count());
		let bytes = source.read_byte_str(count)
						   .map_err(crate::streams::Error::with_op_buf_read)?;
		self.file.write_all(bytes.as_slice())
			.map_err(|e| crate::streams::Error::from(e).with_operation(OperationKind::BufWrite))?;
		Ok(count)
	}

	fn flush(&mut self) -> Result {
		self.file.flush().map_err(Into::into)
	}
}

impl Seekable for FileSource {
	fn seek(&mut self, offset: SeekOffset) -> Result<usize> {
		let pos = self.file.seek(offset.into_seek_from())?;
		Ok(pos as usize)
	}
}

impl Seekable for FileSink {
	fn seek(&mut self, offset: SeekOffset) -> Result<usize> {
		let pos = self.file.seek(offset.into_seek_from())?;
		Ok(pos as usize)
	}
}

fn _assert_seek_from(o: SeekOffset) -> SeekFrom { o.into_seek_from() }
