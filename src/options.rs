// SPDX-License-Identifier: Apache-2.0

//! A precompiled matcher for a fixed set of byte-string alternatives, used by
//! [`BufSource::select`](crate::streams::BufSource::select). Built once from
//! a set of alternatives; matching is then a single forward walk with no
//! backtracking.

/// A node in the alternative trie: a byte-keyed fan-out to child nodes, plus
/// the index of the alternative that terminates here, if any.
#[derive(Default)]
struct Node {
	children: Vec<(u8, Node)>,
	result: Option<usize>,
}

impl Node {
	fn child(&self, byte: u8) -> Option<&Node> {
		self.children.iter().find(|(b, _)| *b == byte).map(|(_, n)| n)
	}

	fn child_mut(&mut self, byte: u8) -> &mut Node {
		if let Some(pos) = self.children.iter().position(|(b, _)| *b == byte) {
			&mut self.children[pos].1
		} else {
			self.children.push((byte, Node::default()));
			&mut self.children.last_mut().unwrap().1
		}
	}
}

/// A precompiled alternation matcher: given a fixed set of byte-string
/// alternatives, finds the longest one matching the head of a buffer.
///
/// Ties are broken by length first (longest wins), then by the order
/// alternatives were supplied in (earlier wins).
pub struct Options {
	root: Node,
	max_len: usize,
}

impl Options {
	/// Builds a matcher from a set of alternatives, in priority order.
	pub fn new<'a>(alternatives: impl IntoIterator<Item = &'a [u8]>) -> Self {
		let mut root = Node::default();
		let mut max_len = 0;

		for (index, bytes) in alternatives.into_iter().enumerate() {
			max_len = max_len.max(bytes.len());
			let mut node = &mut root;
			for &byte in bytes {
				node = node.child_mut(byte);
			}
			if node.result.is_none() {
				node.result = Some(index);
			}
		}

		Self { root, max_len }
	}

	/// The length of the longest alternative; matching never needs to look
	/// further ahead than this.
	pub fn max_len(&self) -> usize { self.max_len }

	/// Walks the trie against bytes produced by `byte_at(0), byte_at(1), ...`,
	/// stopping at the first byte that has no matching child (or that
	/// `byte_at` can't supply). Returns the `(index, matched length)` of the
	/// deepest alternative terminated along the path taken, if any.
	pub(crate) fn longest_match(&self, mut byte_at: impl FnMut(usize) -> Option<u8>) -> Option<(usize, usize)> {
		let mut node = &self.root;
		let mut pos = 0;
		let mut best = None;

		loop {
			if let Some(index) = node.result {
				best = Some((index, pos));
			}

			let Some(byte) = byte_at(pos) else { break };
			let Some(child) = node.child(byte) else { break };
			node = child;
			pos += 1;
		}

		best
	}
}

/// An [`Options`] matcher paired with a value per alternative, so a
/// successful match yields a value directly instead of an index.
pub struct TypedOptions<T> {
	options: Options,
	values: Vec<T>,
}

impl<T> TypedOptions<T> {
	/// Builds a matcher from alternatives paired with the value each should
	/// resolve to, in priority order.
	pub fn new(alternatives: impl IntoIterator<Item = (Vec<u8>, T)>) -> Self {
		let mut bytes = Vec::new();
		let mut values = Vec::new();
		for (alt, value) in alternatives {
			bytes.push(alt);
			values.push(value);
		}
		let options = Options::new(bytes.iter().map(Vec::as_slice));
		Self { options, values }
	}

	pub fn options(&self) -> &Options { &self.options }

	/// Looks up the value for a matched index, as returned by
	/// [`BufSource::select`](crate::streams::BufSource::select).
	pub fn value(&self, index: usize) -> Option<&T> { self.values.get(index) }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn matched(options: &Options, haystack: &[u8]) -> Option<(usize, usize)> {
		options.longest_match(|i| haystack.get(i).copied())
	}

	#[test]
	fn longest_alternative_wins() {
		let options = Options::new(["GET", "GETX"].map(str::as_bytes));
		assert_eq!(matched(&options, b"GETX /"), Some((1, 4)));
		assert_eq!(matched(&options, b"GET /"), Some((0, 3)));
	}

	#[test]
	fn no_match_returns_none() {
		let options = Options::new(["GET", "POST"].map(str::as_bytes));
		assert_eq!(matched(&options, b"PUT /"), None);
	}

	#[test]
	fn earlier_alternative_wins_ties() {
		let options = Options::new(["POST", "POST"].map(str::as_bytes));
		assert_eq!(matched(&options, b"POST /"), Some((0, 4)));
	}
}
