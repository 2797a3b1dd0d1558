// SPDX-License-Identifier: Apache-2.0

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use segmented_io::{Segment, SEGMENT_SIZE};

const DATA: &[u8] = include_bytes!("../src/lib.rs");

fn fill(seg: &mut Segment) {
	while !seg.is_full() {
		if seg.push_slice(DATA) == 0 { break }
	}
}

fn push_slice(c: &mut Criterion) {
	c.bench_function("push_slice", |b| b.iter_batched(
		Segment::empty,
		|mut seg| { fill(&mut seg); seg },
		BatchSize::SmallInput,
	));
}

fn pop_into_slice(c: &mut Criterion) {
	let mut full = Segment::empty();
	fill(&mut full);
	let target = &mut [0u8; SEGMENT_SIZE][..];

	c.bench_function("pop_into_slice", |b| b.iter_batched_ref(
		|| full.clone(),
		|seg| { seg.pop_into_slice(target); },
		BatchSize::SmallInput,
	));
}

fn share(c: &mut Criterion) {
	let mut full = Segment::empty();
	fill(&mut full);

	c.bench_function("share_all", |b| b.iter(|| full.share_all()));
	c.bench_function("share_half", |b| b.iter(|| full.share(SEGMENT_SIZE / 2)));
}

fn push_byte(c: &mut Criterion) {
	c.bench_function("push_byte", |b| b.iter_batched(
		Segment::empty,
		|mut seg| {
			while seg.push(b'x') {}
			seg
		},
		BatchSize::SmallInput,
	));
}

criterion_group!(benches, push_slice, pop_into_slice, share, push_byte);
criterion_main!(benches);
