// SPDX-License-Identifier: Apache-2.0

mod dataset;

use std::fs;
use pretty_assertions::assert_str_eq;
use segmented_io::streams::{BufSource, FileSource, SourceBuffer};
use crate::dataset::DATASET;

#[test]
fn file_source() {
	let data = DATASET.fields;
	let text = fs::read_to_string(data.path()).unwrap();
	let mut source = FileSource::open(data.path()).unwrap().buffer();
	let mut target = String::with_capacity(data.size);
	source.read_all_utf8(&mut target).unwrap();
	assert_str_eq!(target, text);
}
