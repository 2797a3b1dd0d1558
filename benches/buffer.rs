// SPDX-License-Identifier: Apache-2.0

use std::mem;
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use segmented_io::{Buffer, SEGMENT_SIZE};
use segmented_io::streams::{BufSink, BufSource};

const DATA: &[u8] = include_bytes!("../src/lib.rs");

fn write_slice(c: &mut Criterion) {
	c.bench_function("write_from_slice", |b| b.iter(|| {
		let mut buf = Buffer::default();
		buf.write_from_slice(DATA).unwrap();
		buf
	}));
}

fn write_numbers(c: &mut Criterion) {
	let mut group = c.benchmark_group("write_numbers");
	let mut buffer = Buffer::default();

	macro_rules! gen {
		($($fn:ident $ty:ident),+) => {
			$(
			group.bench_function(stringify!($fn), |b| b.iter(|| {
				for _ in 0..SEGMENT_SIZE / mem::size_of::<$ty>() {
					let _ = black_box(buffer.$fn($ty::MAX));
				}
				buffer.clear().unwrap();
			}));
			)+
		};
	}

	gen!(
		write_u8 u8,
		write_u16 u16,
		write_u16_le u16,
		write_u32 u32,
		write_u32_le u32,
		write_u64 u64,
		write_u64_le u64
	);
	group.finish();
}

fn filled_buffer() -> Buffer {
	let mut buf = Buffer::default();
	buf.write_from_slice(DATA).unwrap();
	buf
}

fn read_slice(c: &mut Criterion) {
	let target = &mut vec![0u8; DATA.len()][..];
	c.bench_function("read_into_slice_exact", |b| b.iter_batched(
		filled_buffer,
		|mut buf| buf.read_into_slice_exact(target),
		BatchSize::SmallInput,
	));
}

fn read_numbers(c: &mut Criterion) {
	let mut group = c.benchmark_group("read_numbers");

	macro_rules! gen {
		($($fn:ident $ty:ident),+) => {
			$(
			group.bench_function(stringify!($fn), |b| b.iter_batched(
				filled_buffer,
				|mut buf| for _ in 0..SEGMENT_SIZE / mem::size_of::<$ty>() {
					let _ = black_box(buf.$fn());
				},
				BatchSize::SmallInput,
			));
			)+
		};
	}

	gen!(
		read_u8 u8,
		read_u16 u16,
		read_u16_le u16,
		read_u32 u32,
		read_u32_le u32,
		read_u64 u64,
		read_u64_le u64
	);
	group.finish();
}

fn skip(c: &mut Criterion) {
	let mut group = c.benchmark_group("skip");

	group.bench_function("skip all", |b| b.iter_batched(
		filled_buffer,
		|mut buf| buf.skip(DATA.len()),
		BatchSize::SmallInput,
	));
	group.bench_function("skip partial", |b| b.iter_batched(
		filled_buffer,
		|mut buf| buf.skip(4096),
		BatchSize::SmallInput,
	));
	group.finish();
}

fn index_of(c: &mut Criterion) {
	let buffer = filled_buffer();
	c.bench_function("index_of", |b| b.iter(|| buffer.index_of(b'\n', 0, usize::MAX)));
}

#[cfg(feature = "sha2")]
fn hash(c: &mut Criterion) {
	let buffer = filled_buffer();
	c.bench_function("hash", |b| b.iter(|| black_box(buffer.snapshot()).sha256()));
}

#[cfg(feature = "sha2")]
criterion_group!(read, read_slice, read_numbers, skip, index_of, hash);
#[cfg(not(feature = "sha2"))]
criterion_group!(read, read_slice, read_numbers, skip, index_of);
criterion_group!(write, write_slice, write_numbers);
criterion_main!(write, read);
