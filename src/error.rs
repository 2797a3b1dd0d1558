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

//! A generic error type shared by every layer of the crate. Each layer picks its
//! own [`OperationKind`] and [`ErrorKind`] so a single `Error<O, K>` covers the
//! segment pool, the buffer, and the stream wrappers without one giant enum.

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::result;

/// A high-level operation an [`Error`] was raised during, distinct from the
/// failure category ([`Self::unknown`] is the default when no operation context
/// was attached).
pub trait OperationKind: Copy + Debug + Display {
	fn unknown() -> Self;
}

/// A failure category. Implementors provide a catch-all [`Self::other`] variant
/// for causes that don't fit elsewhere.
pub trait ErrorKind: Copy + Debug + Display {
	fn other(message: &'static str) -> Self;
}

/// An error tagged with the operation in flight and a failure kind, optionally
/// chaining a boxed source error.
pub struct Error<O: OperationKind, K: ErrorKind> {
	op: O,
	kind: K,
	source: Option<Box<dyn StdError + Send + Sync>>,
}

pub type Result<T, O, K> = result::Result<T, Error<O, K>>;

impl<O: OperationKind, K: ErrorKind> Error<O, K> {
	pub fn new(op: O, kind: K, source: Option<Box<dyn StdError + Send + Sync>>) -> Self {
		Self { op, kind, source }
	}

	/// Creates an error with no operation context, falling back to
	/// [`OperationKind::unknown`].
	pub fn of_kind(kind: K) -> Self {
		Self::new(O::unknown(), kind, None)
	}

	pub fn operation(&self) -> O { self.op }
	pub fn kind(&self) -> K { self.kind }

	/// Attaches (or replaces) the operation context of this error.
	pub fn with_operation(mut self, op: O) -> Self {
		self.op = op;
		self
	}
}

impl<O: OperationKind, K: ErrorKind> Debug for Error<O, K> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Error")
		 .field("op", &self.op)
		 .field("kind", &self.kind)
		 .field("source", &self.source)
		 .finish()
	}
}

impl<O: OperationKind, K: ErrorKind> Display for Error<O, K> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.op, self.kind)
	}
}

impl<O: OperationKind, K: ErrorKind> StdError for Error<O, K> {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		self.source.as_deref().map(|e| e as _)
	}
}
