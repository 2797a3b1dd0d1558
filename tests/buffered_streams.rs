// SPDX-License-Identifier: Apache-2.0

mod dataset;

use std::cell::RefCell;
use std::cmp::min;
use std::rc::Rc;
use pretty_assertions::assert_eq;
use segmented_io::Buffer;
use segmented_io::pool::Pool;
use segmented_io::streams::{
	BufSink, BufSource, FileSource, Result, Sink, SinkBuffer, Source, SourceBuffer,
};
use crate::dataset::{Data, DATASET};

const DATA: Data = DATASET.fields;

#[test]
fn read_all() -> Result {
	let mut source = FileSource::open(DATA.path())?.buffer();
	let mut buffer = Buffer::default();
	let n = Source::read_all(&mut source, &mut buffer)?;
	assert_eq!(n, DATA.size);
	assert_eq!(buffer.count(), DATA.size);
	Ok(())
}

#[test]
fn read() -> Result {
	let mut source = FileSource::open(DATA.path())?.buffer();
	let mut string = String::with_capacity(32);
	assert_eq!(source.skip(1024)?, 1024);
	assert_eq!(source.read_utf8(&mut string, 32)?, string.len());
	Ok(())
}

/// A [`Sink`] that appends to a shared `Vec`, so a test can inspect what was
/// written after the [`BufferedSink`](segmented_io::BufferedSink) wrapping it
/// is done with.
#[derive(Default, Clone)]
struct VecSink {
	vec: Rc<RefCell<Vec<u8>>>,
}

impl Sink for VecSink {
	fn write(&mut self, source: &mut Buffer<impl Pool>, count: usize) -> Result<usize> {
		let count = min(count, source.count());
		let bytes = source.read_byte_str(count)?;
		self.vec.borrow_mut().extend_from_slice(bytes.as_slice());
		Ok(count)
	}
}

#[test]
fn write_all() -> Result {
	let mut file = FileSource::open(DATA.path())?;
	let vec_sink = VecSink::default();
	let mut sink = vec_sink.clone().buffer();
	let n = BufSink::write_all(&mut sink, &mut file)?;
	assert_eq!(n, DATA.size);
	assert_eq!(vec_sink.vec.borrow().len(), DATA.size);
	Ok(())
}

#[test]
fn write() -> Result {
	let mut source = FileSource::open(DATA.path())?.buffer();
	let mut staging = Buffer::default();
	source.read(&mut staging, 32)?;

	let vec_sink = VecSink::default();
	let mut sink = vec_sink.clone().buffer();
	let n = Sink::write(&mut sink, &mut staging, 32)?;
	assert_eq!(n, 32);
	assert_eq!(vec_sink.vec.borrow().len(), 32);
	Ok(())
}
