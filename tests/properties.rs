// SPDX-License-Identifier: Apache-2.0

//! Quickcheck-driven invariants, complementing the literal scenarios in
//! `scenarios.rs` and the typed-value round trips in `buffer.rs`.

#[macro_use]
mod common;

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use segmented_io::{Buffer, Options, SEGMENT_SIZE};
use segmented_io::streams::{BufSink, BufSource, Source};

#[quickcheck]
fn byte_slice_round_trip(bytes: Vec<u8>) -> TestResult {
	let mut buf = Buffer::default();
	buf.write_from_slice(&bytes).unwrap();
	let mut out = vec![0u8; bytes.len()];
	buf.read_into_slice_exact(&mut out).unwrap();
	qc_assert_eq!(bytes, out)
}

#[quickcheck]
fn cross_buffer_read_preserves_total_count(bytes: Vec<u8>, cut: usize) -> TestResult {
	if bytes.is_empty() { return TestResult::discard() }
	let n = cut % (bytes.len() + 1);

	let mut a = Buffer::default();
	a.write_from_slice(&bytes).unwrap();
	let total = a.count();
	let mut b = Buffer::default();

	let moved = Source::read(&mut a, &mut b, n).unwrap();

	if moved != n { return TestResult::error(format!("moved {moved}, wanted {n}")) }
	if a.count() + b.count() != total {
		return TestResult::error("a.count() + b.count() changed across the transfer".into())
	}
	qc_assert_eq!(b.snapshot().to_byte_string().as_slice(), &bytes[..n])
}

#[quickcheck]
fn snapshot_is_unaffected_by_later_writes(bytes: Vec<u8>, extra: Vec<u8>) -> TestResult {
	let mut buf = Buffer::default();
	buf.write_from_slice(&bytes).unwrap();
	let snapshot = buf.snapshot().to_byte_string();

	buf.write_from_slice(&extra).unwrap();

	qc_assert_eq!(snapshot.as_slice(), bytes.as_slice())
}

#[quickcheck]
fn select_agrees_with_a_naive_longest_prefix_scan(head: Vec<u8>) -> TestResult {
	let alternatives: [&[u8]; 5] = [b"GET", b"POST", b"PUT", b"PATCH", b"P"];
	let options = Options::new(alternatives);

	let want = alternatives.iter()
		.enumerate()
		.filter(|(_, alt)| head.starts_with(*alt))
		.max_by_key(|(i, alt)| (alt.len(), std::cmp::Reverse(*i)))
		.map(|(i, _)| i);

	let mut buf = Buffer::default();
	buf.write_from_slice(&head).unwrap();
	let got = buf.select(&options).unwrap();

	if got.is_none() {
		let before = buf.snapshot().to_byte_string();
		if before.as_slice() != head.as_slice() {
			return TestResult::error("buffer head changed despite no match".into())
		}
	}

	qc_assert_eq!(got, want)
}

#[quickcheck]
fn utf8_read_is_lossy_like_the_standard_library(bytes: Vec<u8>) -> TestResult {
	let mut buf = Buffer::default();
	buf.write_from_slice(&bytes).unwrap();
	let mut text = String::new();
	buf.read_utf8(&mut text, usize::MAX).unwrap();

	qc_assert_eq!(text, String::from_utf8_lossy(&bytes).into_owned())
}

#[quickcheck]
fn index_of_agrees_with_a_naive_scan_across_a_segment_boundary(prefix_len: u16, needle: u8, tail: Vec<u8>) -> TestResult {
	let prefix = vec![0xAAu8; SEGMENT_SIZE + (prefix_len as usize % 16)];
	let mut bytes = prefix;
	bytes.extend_from_slice(&tail);

	let mut buf = Buffer::default();
	buf.write_from_slice(&bytes).unwrap();

	let want = bytes.iter().position(|&b| b == needle);
	let got = buf.index_of(needle, 0, usize::MAX).unwrap();

	qc_assert_eq!(got, want)
}

#[quickcheck]
fn decimal_round_trip(value: i64) -> TestResult {
	let mut buf = Buffer::default();
	buf.write_decimal(value).unwrap();
	qc_assert_eq!(buf.read_decimal().unwrap(), value)
}

#[quickcheck]
fn hex_unsigned_round_trip(value: u64) -> TestResult {
	let mut buf = Buffer::default();
	buf.write_hex_unsigned(value).unwrap();
	qc_assert_eq!(buf.read_hex_unsigned().unwrap(), value)
}
