// SPDX-License-Identifier: Apache-2.0

use segmented_io::ByteString;

fn bytes(s: &str) -> ByteString {
	ByteString::from(s.as_bytes())
}

#[test]
fn sha256_known_vectors() {
	assert_eq!(
		bytes("").sha256().hex_lower(),
		"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
	);
	assert_eq!(
		bytes("abc").sha256().hex_lower(),
		"ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
	);
}

#[test]
fn sha256_agrees_with_byte_str() {
	let data = bytes("the quick brown fox jumps over the lazy dog");
	assert_eq!(data.sha256(), data.as_byte_str().sha256());
}

#[test]
fn hash_of_equal_data_is_equal() {
	assert_eq!(bytes("hello").sha256(), bytes("hello").sha256());
	assert_ne!(bytes("hello").sha256(), bytes("world").sha256());
}

#[test]
fn starts_and_ends_with() {
	let data = bytes("hello world");
	assert!(data.starts_with(b"hello"));
	assert!(data.ends_with(b"world"));
	assert!(!data.starts_with(b"world"));
	assert!(!data.ends_with(b"hello"));
	assert!(data.starts_with(b""));
	assert!(!data.starts_with(b"hello world and more"));
}

#[test]
fn index_of_and_last_index_of() {
	let data = bytes("abcabc");
	assert_eq!(data.index_of(b'b', 0), Some(1));
	assert_eq!(data.index_of(b'b', 2), Some(4));
	assert_eq!(data.last_index_of(b'b', 6), Some(4));
	assert_eq!(data.index_of(b'z', 0), None);
}

#[test]
fn lexicographic_ordering() {
	assert!(bytes("abc") < bytes("abd"));
	assert!(bytes("abc") < bytes("abcd"));
	assert_eq!(bytes("abc"), bytes("abc"));
}
