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

//! Decoders for the SCALE primitives: fixed-width little-endian integers,
//! booleans, compact integers, length-prefixed text and bytes, and the
//! generic `Option`/`Vec` combinators everything else is assembled from.
//!
//! Every decoder either advances the cursor by exactly the bytes it consumed
//! and returns a value, or fails without leaving the cursor in a state worth
//! continuing from.

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeErrorKind};

macro_rules! fixed_width {
	($name:ident, $ty:ty) => {
		pub fn $name(cursor: &mut ByteCursor) -> Result<$ty, DecodeError> {
			Ok(<$ty>::from_le_bytes(cursor.read_array()?))
		}
	};
}

fixed_width!(decode_u16, u16);
fixed_width!(decode_u32, u32);
fixed_width!(decode_u64, u64);
fixed_width!(decode_u128, u128);
fixed_width!(decode_i8, i8);
fixed_width!(decode_i16, i16);
fixed_width!(decode_i32, i32);
fixed_width!(decode_i64, i64);
fixed_width!(decode_i128, i128);

pub fn decode_u8(cursor: &mut ByteCursor) -> Result<u8, DecodeError> {
	cursor.read_byte()
}

/// 256-bit integers are handed back as their 32 little-endian bytes; nothing
/// downstream does arithmetic on them.
pub fn decode_u256(cursor: &mut ByteCursor) -> Result<[u8; 32], DecodeError> {
	cursor.read_array()
}

pub fn decode_bool(cursor: &mut ByteCursor) -> Result<bool, DecodeError> {
	match cursor.read_byte()? {
		0x00 => Ok(false),
		0x01 => Ok(true),
		other => Err(DecodeErrorKind::InvalidBool(other).into()),
	}
}

/// Decode a SCALE compact integer. The two low bits of the first byte select
/// the width: 0 = the remaining six bits are the value, 1 = one more byte,
/// 2 = three more bytes, 3 = the remaining six bits are a byte count minus 4,
/// with that many little-endian payload bytes following.
pub fn decode_compact(cursor: &mut ByteCursor) -> Result<u128, DecodeError> {
	let first = cursor.read_byte()?;
	match first & 0b11 {
		0 => Ok((first >> 2) as u128),
		1 => {
			let second = cursor.read_byte()?;
			Ok(((first >> 2) as u128) | ((second as u128) << 6))
		}
		2 => {
			let rest = cursor.read_bytes(3)?;
			Ok(((first >> 2) as u128)
				| ((rest[0] as u128) << 6)
				| ((rest[1] as u128) << 14)
				| ((rest[2] as u128) << 22))
		}
		_ => {
			let len = ((first >> 2) + 4) as usize;
			// Substrate's widest compact on the wire is Compact<u128>.
			if len > 16 {
				return Err(DecodeErrorKind::CompactTooLarge(len).into());
			}
			let bytes = cursor.read_bytes(len)?;
			let mut value = 0u128;
			for (i, byte) in bytes.iter().enumerate() {
				value |= (*byte as u128) << (8 * i);
			}
			Ok(value)
		}
	}
}

/// Decode a compact length prefix, checking it against the bytes actually
/// remaining so a corrupt length fails here rather than as a huge allocation.
fn decode_len(cursor: &mut ByteCursor) -> Result<usize, DecodeError> {
	let length = decode_compact(cursor)?;
	let remaining = cursor.remaining();
	if length > remaining as u128 {
		return Err(DecodeErrorKind::MalformedLength { length, remaining }.into());
	}
	Ok(length as usize)
}

pub fn decode_bytes(cursor: &mut ByteCursor) -> Result<Vec<u8>, DecodeError> {
	let len = decode_len(cursor)?;
	Ok(cursor.read_bytes(len)?.to_vec())
}

pub fn decode_text(cursor: &mut ByteCursor) -> Result<String, DecodeError> {
	let len = decode_len(cursor)?;
	let bytes = cursor.read_bytes(len)?;
	String::from_utf8(bytes.to_vec()).map_err(|_| DecodeErrorKind::InvalidUtf8.into())
}

/// Decode an optional value: one presence byte (`0x00` absent, `0x01`
/// present, anything else an error) followed by the payload if present.
pub fn decode_option<'a, T>(
	cursor: &mut ByteCursor<'a>,
	decode: impl FnOnce(&mut ByteCursor<'a>) -> Result<T, DecodeError>,
) -> Result<Option<T>, DecodeError> {
	if decode_bool(cursor).map_err(|e| e.at("flag"))? {
		Ok(Some(decode(cursor)?))
	} else {
		Ok(None)
	}
}

/// Decode a compact-length-prefixed sequence of values.
pub fn decode_vec<'a, T>(
	cursor: &mut ByteCursor<'a>,
	mut decode: impl FnMut(&mut ByteCursor<'a>) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
	let len = decode_len(cursor).map_err(|e| e.at("length"))?;
	let mut out = Vec::with_capacity(len);
	for i in 0..len {
		out.push(decode(cursor).map_err(|e| e.at(i))?);
	}
	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;
	use codec::{Compact, Encode};

	#[test]
	fn compact_all_four_modes() {
		let cases: [(&[u8], u128); 6] = [
			(&[0x00], 0),
			(&[0xFC], 63),
			(&[0x01, 0x01], 64),
			(&[0xFD, 0xFF], 16383),
			(&[0x02, 0x00, 0x01, 0x00], 16384),
			(&[0x03, 0x00, 0x00, 0x00, 0x40], 1_073_741_824),
		];
		for (bytes, expected) in cases {
			let mut cursor = ByteCursor::new(bytes);
			assert_eq!(decode_compact(&mut cursor).unwrap(), expected, "bytes {bytes:?}");
			assert!(cursor.is_empty());
		}
	}

	#[test]
	fn compact_matches_parity_scale_codec() {
		for value in [0u128, 1, 63, 64, 16383, 16384, 1 << 32, u64::MAX as u128, u128::MAX] {
			let encoded = Compact(value).encode();
			let mut cursor = ByteCursor::new(&encoded);
			assert_eq!(decode_compact(&mut cursor).unwrap(), value);
			assert!(cursor.is_empty());
		}
	}

	#[test]
	fn compact_mode_one_truncated() {
		let mut cursor = ByteCursor::new(&[0x01]);
		let err = decode_compact(&mut cursor).unwrap_err();
		assert_eq!(err.kind(), &DecodeErrorKind::OutOfBounds { needed: 1, remaining: 0 });
	}

	#[test]
	fn compact_wider_than_u128_is_rejected() {
		// Mode 3 with a 17-byte payload.
		let mut bytes = vec![0b0011_0111];
		bytes.extend([0u8; 17]);
		let mut cursor = ByteCursor::new(&bytes);
		let err = decode_compact(&mut cursor).unwrap_err();
		assert_eq!(err.kind(), &DecodeErrorKind::CompactTooLarge(17));
	}

	#[test]
	fn fixed_width_integers_are_little_endian() {
		let mut cursor = ByteCursor::new(&[0x2A, 0x00, 0x00, 0x00]);
		assert_eq!(decode_u32(&mut cursor).unwrap(), 42);

		let value = (-5i64).encode();
		let mut cursor = ByteCursor::new(&value);
		assert_eq!(decode_i64(&mut cursor).unwrap(), -5);
	}

	#[test]
	fn bool_is_strict() {
		assert!(decode_bool(&mut ByteCursor::new(&[0x00])).unwrap() == false);
		assert!(decode_bool(&mut ByteCursor::new(&[0x01])).unwrap() == true);
		let err = decode_bool(&mut ByteCursor::new(&[0x02])).unwrap_err();
		assert_eq!(err.kind(), &DecodeErrorKind::InvalidBool(0x02));
	}

	#[test]
	fn text_and_bytes_are_length_prefixed() {
		let encoded = "hello".to_string().encode();
		let mut cursor = ByteCursor::new(&encoded);
		assert_eq!(decode_text(&mut cursor).unwrap(), "hello");

		let encoded = vec![1u8, 2, 3].encode();
		let mut cursor = ByteCursor::new(&encoded);
		assert_eq!(decode_bytes(&mut cursor).unwrap(), vec![1, 2, 3]);
	}

	#[test]
	fn length_beyond_buffer_is_malformed() {
		// Compact 32 followed by only two bytes of payload.
		let mut cursor = ByteCursor::new(&[0x80, 0xAA, 0xBB]);
		let err = decode_bytes(&mut cursor).unwrap_err();
		assert_eq!(err.kind(), &DecodeErrorKind::MalformedLength { length: 32, remaining: 2 });
	}

	#[test]
	fn option_roundtrip() {
		let mut cursor = ByteCursor::new(&[0x00]);
		assert_eq!(decode_option(&mut cursor, decode_u8).unwrap(), None);

		let mut cursor = ByteCursor::new(&[0x01, 0x2A]);
		assert_eq!(decode_option(&mut cursor, decode_u8).unwrap(), Some(42));

		let err = decode_option(&mut ByteCursor::new(&[0x05]), decode_u8).unwrap_err();
		assert_eq!(err.to_string(), "flag: invalid boolean byte 0x05");
	}

	#[test]
	fn vec_decodes_each_element() {
		let encoded = vec![1u32, 2, 3].encode();
		let mut cursor = ByteCursor::new(&encoded);
		assert_eq!(decode_vec(&mut cursor, decode_u32).unwrap(), vec![1, 2, 3]);

		let empty: Vec<u32> = Vec::new();
		let encoded = empty.encode();
		let mut cursor = ByteCursor::new(&encoded);
		assert_eq!(decode_vec(&mut cursor, decode_u32).unwrap(), empty);
	}

	#[test]
	fn vec_element_errors_carry_the_index() {
		// Three u32s announced, third one truncated.
		let mut bytes = Compact(3u32).encode();
		bytes.extend(1u32.encode());
		bytes.extend(2u32.encode());
		bytes.push(0xFF);
		let mut cursor = ByteCursor::new(&bytes);
		let err = decode_vec(&mut cursor, decode_u32).unwrap_err();
		assert_eq!(err.to_string(), "2: unexpected end of input: needed 4 byte(s) but only 1 remain");
	}
}
