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

//! `Encode`/`Decode` let [`BufSink::write_from`]/[`BufSource::read_into`] work
//! generically over bytes, text, and every integer width. Each implementor is
//! concrete (no specialization): adding a new element type means writing one
//! more small `impl`, same as the numeric macro below.

use std::cmp::min;
use std::mem;
use crate::Buffer;
use crate::pool::Pool;
use crate::streams::Result;

/// Encodes a value into a buffer, in little-endian byte order if `le`.
pub trait Encode {
	fn encode(self, buf: &mut Buffer<impl Pool>, le: bool) -> Result<usize>;
}

/// Decodes a value from a buffer, in little-endian byte order if `le`.
pub trait Decode {
	fn decode(&mut self, buf: &mut Buffer<impl Pool>, byte_count: usize, le: bool) -> Result<usize>;
}

impl Encode for &[u8] {
	fn encode(self, buf: &mut Buffer<impl Pool>, _: bool) -> Result<usize> {
		let len = self.len();
		buf.write_from_slice(self)?;
		Ok(len)
	}
}

impl Decode for Vec<u8> {
	fn decode(&mut self, buf: &mut Buffer<impl Pool>, byte_count: usize, _: bool) -> Result<usize> {
		let len = min(byte_count, buf.count());
		self.resize(len, 0);
		buf.read_into_slice_exact(self)?;
		Ok(len)
	}
}

impl Encode for &str {
	fn encode(self, buf: &mut Buffer<impl Pool>, _: bool) -> Result<usize> {
		let n = self.len();
		buf.write_utf8(self)?;
		Ok(n)
	}
}

impl Encode for String {
	fn encode(self, buf: &mut Buffer<impl Pool>, _: bool) -> Result<usize> {
		let n = self.len();
		buf.write_utf8(&self)?;
		Ok(n)
	}
}

impl Decode for String {
	fn decode(&mut self, buf: &mut Buffer<impl Pool>, byte_count: usize, _: bool) -> Result<usize> {
		buf.read_utf8(self, byte_count)
	}
}

macro_rules! gen_num_codec {
	($($wfn:ident$rfn:ident$($wfn_le:ident$rfn_le:ident)?->$ty:ident,)+) => {
		$(gen_num_codec! { $wfn$rfn$($wfn_le$rfn_le)?$ty })+
	};
	($wfn:ident$rfn:ident$wfn_le:ident$rfn_le:ident$ty:ident) => {
		impl Encode for $ty {
			fn encode(self, buf: &mut Buffer<impl Pool>, le: bool) -> Result<usize> {
				if le { buf.$wfn_le(self)?; } else { buf.$wfn(self)?; }
				Ok(mem::size_of::<$ty>())
			}
		}
		impl Decode for $ty {
			fn decode(&mut self, buf: &mut Buffer<impl Pool>, byte_count: usize, le: bool) -> Result<usize> {
				if byte_count < mem::size_of::<$ty>() { return Ok(0) }
				*self = if le { buf.$rfn_le()? } else { buf.$rfn()? };
				Ok(mem::size_of::<$ty>())
			}
		}
	};
	($wfn:ident$rfn:ident$ty:ident) => {
		impl Encode for $ty {
			fn encode(self, buf: &mut Buffer<impl Pool>, _: bool) -> Result<usize> {
				buf.$wfn(self)?;
				Ok(1)
			}
		}
		impl Decode for $ty {
			fn decode(&mut self, buf: &mut Buffer<impl Pool>, byte_count: usize, _: bool) -> Result<usize> {
				if byte_count == 0 { return Ok(0) }
				*self = buf.$rfn()?;
				Ok(1)
			}
		}
	};
}

gen_num_codec! {
	write_i8 read_i8 -> i8,
	write_u8 read_u8 -> u8,
	write_i16 read_i16 write_i16_le read_i16_le -> i16,
	write_u16 read_u16 write_u16_le read_u16_le -> u16,
	write_i32 read_i32 write_i32_le read_i32_le -> i32,
	write_u32 read_u32 write_u32_le read_u32_le -> u32,
	write_i64 read_i64 write_i64_le read_i64_le -> i64,
	write_u64 read_u64 write_u64_le read_u64_le -> u64,
	write_isize read_isize write_isize_le read_isize_le -> isize,
	write_usize read_usize write_usize_le read_usize_le -> usize,
}
