// SPDX-License-Identifier: Apache-2.0

//! Literal input/output scenarios and ambient-stack checks, one test per
//! case rather than a property grid.

use segmented_io::{Buffer, BufferOptions, Options, SEGMENT_SIZE};
use segmented_io::pool::SharedPool;
use segmented_io::streams::{BufSink, BufSource, BufStream, Source, SourceBuffer};
use segmented_io::std_io::{SinkWriter, SourceReader};

#[test]
fn s1_write_then_read_utf8_line() {
	let mut buf = Buffer::default();
	buf.write_utf8("Hello, World\n").unwrap();
	assert_eq!(buf.read_utf8_line().unwrap(), Some("Hello, World".to_string()));
	assert_eq!(buf.count(), 0);
}

#[test]
fn s2_big_and_little_endian_i32() {
	let mut buf = Buffer::default();
	buf.write_from_slice(&[0x00, 0x00, 0x00, 0x2A]).unwrap();
	assert_eq!(buf.read_i32().unwrap(), 42);
	assert_eq!(buf.count(), 0);

	buf.write_from_slice(&[0x00, 0x00, 0x00, 0x2A]).unwrap();
	assert_eq!(buf.read_i32_le().unwrap(), 704643072);
}

#[test]
fn s3_decimal_round_trip_i64_min() {
	let mut buf = Buffer::default();
	buf.write_utf8("-9223372036854775808").unwrap();
	assert_eq!(buf.read_decimal().unwrap(), i64::MIN);
	assert_eq!(buf.count(), 0);
}

#[test]
fn s4_hex_unsigned_round_trip() {
	let mut buf = Buffer::default();
	buf.write_hex_unsigned(0x7fff_ffff_ffff_ffffu64).unwrap();
	let mut text = String::new();
	buf.read_utf8(&mut text, usize::MAX).unwrap();
	assert_eq!(text, "7fffffffffffffff");
}

#[test]
fn s5_select_matches_longest_option() {
	let options = Options::new(["GET", "POST", "PUT"].map(str::as_bytes));
	let mut buf = Buffer::default();
	buf.write_utf8("PUT /").unwrap();

	assert_eq!(buf.select(&options).unwrap(), Some(2));

	let mut rest = String::new();
	buf.read_utf8(&mut rest, usize::MAX).unwrap();
	assert_eq!(rest, " /");
}

#[test]
fn s6_index_of_across_a_segment_boundary() {
	let mut buf = Buffer::default();
	buf.write_from_slice(&vec![b'a'; SEGMENT_SIZE]).unwrap();
	buf.write_utf8("bcd").unwrap();

	assert_eq!(buf.index_of(b'c', 0, usize::MAX), Some(SEGMENT_SIZE + 1));
	assert_eq!(buf.index_of_element(b"bcd", 0, usize::MAX), Some(SEGMENT_SIZE));
}

#[test]
fn s7_cross_buffer_transfer_preserves_bytes_and_total() {
	let data: Vec<u8> = (0..3 * SEGMENT_SIZE).map(|i| (i % 251) as u8).collect();

	let mut a = Buffer::default();
	a.write_from_slice(&data).unwrap();
	let mut b = Buffer::default();

	let want = 2 * SEGMENT_SIZE + 100;
	let n = Source::read(&mut a, &mut b, want).unwrap();

	assert_eq!(n, want);
	assert_eq!(a.count() + b.count(), data.len());
	assert_eq!(b.count(), want);
	assert_eq!(b.snapshot().to_byte_string().as_slice(), &data[..want]);
	assert_eq!(a.snapshot().to_byte_string().as_slice(), &data[want..]);
}

#[test]
fn s8_peek_does_not_advance_the_outer_source() {
	let bytes: &[u8] = b"abcde";
	let mut source = bytes.buffer();

	{
		let mut peek = source.peek();
		let mut peeked = String::new();
		peek.read_utf8(&mut peeked, 2).unwrap();
		assert_eq!(peeked, "ab");
	}

	source.request(5).unwrap();
	assert_eq!(source.buf().snapshot().to_byte_string().as_slice(), b"abcde");
}

#[test]
fn s9_utf8_read_stitches_a_character_split_across_a_segment_boundary() {
	let mut buf = Buffer::default();
	// em dash (—, U+2014) is 3 bytes; padding the buffer to one byte short of
	// a full segment lands its first byte as the segment's last and its
	// remaining two at the front of the next.
	buf.write_utf8(&"a".repeat(SEGMENT_SIZE - 1)).unwrap();
	buf.write_utf8("—World!").unwrap();

	let mut text = String::new();
	buf.read_utf8(&mut text, usize::MAX).unwrap();

	assert_eq!(text.len(), SEGMENT_SIZE - 1 + "—World!".len());
	assert!(text[..SEGMENT_SIZE - 1].chars().all(|c| c == 'a'));
	assert!(text.ends_with("—World!"));
}

#[test]
fn lean_options_share_and_compact_eagerly() {
	let lean = BufferOptions::lean();
	assert_eq!(lean.share_threshold(), 0);
	assert_eq!(lean.compact_threshold(), 0);

	// The aggressive thresholds shouldn't change write/read correctness.
	let mut buf = Buffer::with_options(SharedPool, lean);
	let payload = vec![b'z'; SEGMENT_SIZE + 100];
	buf.write_from_slice(&payload).unwrap();
	buf.skip(50).unwrap();
	let mut rest = vec![0u8; payload.len() - 50];
	buf.read_into_slice_exact(&mut rest).unwrap();
	assert_eq!(rest, &payload[50..]);
}

#[test]
fn std_io_bridge_round_trips_through_source_and_sink() {
	use std::io::{Read, Write};

	let mut writer = SinkWriter::from(Vec::<u8>::new());
	writer.write_all(b"round trip bytes").unwrap();
	writer.flush().unwrap();
	let written = writer.into_inner();
	assert_eq!(written, b"round trip bytes".to_vec());

	let mut reader = SourceReader::from(&written[..]);
	let mut out = String::new();
	reader.read_to_string(&mut out).unwrap();
	assert_eq!(out, "round trip bytes");
}
