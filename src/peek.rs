// SPDX-License-Identifier: Apache-2.0

//! A non-consuming read window over a buffered source.

use std::cmp::min;
use crate::Buffer;
use crate::buffered_wrappers::BufferedSource;
use crate::pool::Pool;
use crate::streams::{BufSink, BufSource, BufStream, Error, Result, Source};
use crate::streams::OperationKind::BufRead;

/// A [`Source`] that reads the head of an upstream [`BufferedSource`] without
/// consuming it. Invalidated (failing `InvalidState` on any further read) if
/// the upstream buffer is consumed from elsewhere after this peek was taken.
pub struct PeekSource<'a, S: Source> {
	upstream: &'a mut BufferedSource<S>,
	offset: usize,
	generation: u64,
}

impl<'a, S: Source> PeekSource<'a, S> {
	pub(crate) fn new(upstream: &'a mut BufferedSource<S>) -> Self {
		let generation = upstream.buf().generation();
		Self { upstream, offset: 0, generation }
	}
}

impl<'a, S: Source> Source for PeekSource<'a, S> {
	fn read(&mut self, sink: &mut Buffer<impl Pool>, count: usize) -> Result<usize> {
		if self.upstream.buf().generation() != self.generation {
			return Err(Error::invalid_state(BufRead))
		}

		self.upstream.request(self.offset.saturating_add(count))?;

		let available = self.upstream.buf().count().saturating_sub(self.offset);
		let n = min(count, available);
		if n == 0 { return Ok(0) }

		let mut bytes = vec![0u8; n];
		self.upstream.buf().peek_range(self.offset..self.offset + n, &mut bytes);
		sink.write_from_slice(&bytes).map_err(Error::with_op_buf_read)?;
		self.offset += n;
		Ok(n)
	}
}

impl<S: Source> BufferedSource<S> {
	/// Returns a new buffered source over a non-consuming view of this
	/// source's current head. Reading from the peek source does not advance
	/// this source; reading from this source (directly, or from another
	/// peek) invalidates it.
	pub fn peek(&mut self) -> BufferedSource<PeekSource<'_, S>> {
		crate::buffered_wrappers::buffer_source(PeekSource::new(self))
	}
}
