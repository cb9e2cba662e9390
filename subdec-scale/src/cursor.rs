// Copyright 2019-2021 Parity Technologies (UK) Ltd.
// This file is part of subdec.
//
// subdec is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// subdec is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with subdec.  If not, see <http://www.gnu.org/licenses/>.

use crate::error::{DecodeError, DecodeErrorKind};

/// A sequential, bounds-checked reader over an immutable byte slice.
///
/// The cursor only ever moves forwards. Any read that would cross the end of
/// the buffer fails with [`DecodeErrorKind::OutOfBounds`] without consuming
/// anything, but a cursor that has returned an error should be considered
/// dead: callers abort the surrounding decode rather than retry.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> ByteCursor<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Self { data, pos: 0 }
	}

	/// Read a single byte, advancing the position.
	pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
		match self.data.get(self.pos) {
			Some(b) => {
				self.pos += 1;
				Ok(*b)
			}
			None => Err(DecodeErrorKind::OutOfBounds { needed: 1, remaining: 0 }.into()),
		}
	}

	/// Read `len` bytes, advancing the position.
	pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
		let remaining = self.remaining();
		if len > remaining {
			return Err(DecodeErrorKind::OutOfBounds { needed: len, remaining }.into());
		}
		let bytes = &self.data[self.pos..self.pos + len];
		self.pos += len;
		Ok(bytes)
	}

	/// Read a fixed-size array, advancing the position.
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
		let bytes = self.read_bytes(N)?;
		let mut out = [0u8; N];
		out.copy_from_slice(bytes);
		Ok(out)
	}

	/// Number of bytes consumed so far.
	pub fn position(&self) -> usize {
		self.pos
	}

	/// Number of bytes left to read.
	pub fn remaining(&self) -> usize {
		self.data.len() - self.pos
	}

	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_advance_monotonically() {
		let data = [1u8, 2, 3, 4];
		let mut cursor = ByteCursor::new(&data);
		assert_eq!(cursor.read_byte().unwrap(), 1);
		assert_eq!(cursor.read_bytes(2).unwrap(), &[2, 3]);
		assert_eq!(cursor.position(), 3);
		assert_eq!(cursor.remaining(), 1);
	}

	#[test]
	fn read_past_end_is_out_of_bounds() {
		let data = [1u8, 2];
		let mut cursor = ByteCursor::new(&data);
		let err = cursor.read_bytes(3).unwrap_err();
		assert_eq!(err.kind(), &DecodeErrorKind::OutOfBounds { needed: 3, remaining: 2 });
		// A failed read must not have consumed anything.
		assert_eq!(cursor.position(), 0);
	}
}
