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

//! Decode a value whose shape is only known as a type-name string.
//!
//! Pre-v14 metadata gives call and event argument types as free-form strings
//! like `Vec<Compact<Balance>>`. There is no registry to check them against,
//! so this decoder recognizes the wrapper syntaxes by prefix/suffix matching
//! and falls through to a fixed table of known names. It is inherently
//! best-effort: an unrecognized name is a terminal
//! [`UnsupportedType`](DecodeErrorKind::UnsupportedType) error.
//!
//! Producers are expected to canonicalize names first (`Balance`, not
//! `BalanceOf<T>`); nothing here parses arbitrary Rust generics.

use crate::system;
use subdec_scale::{codec, ByteCursor, DecodeError, DecodeErrorKind, Value};

/// Decode one value of type `type_name` from the cursor.
pub fn decode(cursor: &mut ByteCursor, type_name: &str) -> Result<Value, DecodeError> {
	let type_name = type_name.trim();
	log::trace!("decoding '{type_name}' at offset {}", cursor.position());

	if let Some(inner) = strip_wrapper(type_name, "Compact<") {
		// The inner type only affects the decoded width on the encoding
		// side; compact bytes carry their own width.
		let _ = inner;
		return Ok(Value::Uint(codec::decode_compact(cursor)?));
	}

	if let Some(inner) = strip_wrapper(type_name, "Vec<") {
		if inner == "u8" {
			return Ok(Value::Bytes(codec::decode_bytes(cursor)?));
		}
		let values = codec::decode_vec(cursor, |c| decode(c, inner))?;
		return Ok(Value::List(values));
	}

	if let Some(inner) = strip_wrapper(type_name, "Option<") {
		let value = codec::decode_option(cursor, |c| decode(c, inner))?;
		return Ok(value.unwrap_or(Value::Null));
	}

	if type_name.starts_with('(') && type_name.ends_with(')') {
		return decode_tuple(cursor, &type_name[1..type_name.len() - 1]);
	}

	if type_name.starts_with('[') && type_name.ends_with(']') {
		return decode_fixed_array(cursor, &type_name[1..type_name.len() - 1]);
	}

	let value = match type_name {
		"u8" => Value::Uint(codec::decode_u8(cursor)? as u128),
		"u16" => Value::Uint(codec::decode_u16(cursor)? as u128),
		"u32" | "BlockNumber" => Value::Uint(codec::decode_u32(cursor)? as u128),
		"u64" | "Moment" => Value::Uint(codec::decode_u64(cursor)? as u128),
		"u128" | "Balance" => Value::Uint(codec::decode_u128(cursor)?),
		"i8" => Value::Int(codec::decode_i8(cursor)? as i128),
		"i16" => Value::Int(codec::decode_i16(cursor)? as i128),
		"i32" => Value::Int(codec::decode_i32(cursor)? as i128),
		"i64" => Value::Int(codec::decode_i64(cursor)? as i128),
		"i128" => Value::Int(codec::decode_i128(cursor)?),
		"bool" => Value::Bool(codec::decode_bool(cursor)?),
		"Bytes" => Value::Bytes(codec::decode_bytes(cursor)?),
		"Text" | "String" => Value::Text(codec::decode_text(cursor)?),
		"AccountId" | "H256" | "Hash" => Value::Bytes(cursor.read_bytes(32)?.to_vec()),
		"Weight" => system::decode_weight(cursor)?,
		"DispatchInfo" => system::decode_dispatch_info(cursor)?,
		"DispatchError" => system::decode_dispatch_error(cursor)?,
		"DispatchResult" => system::decode_dispatch_result(cursor)?,
		"AccountData" => system::decode_account_data(cursor)?,
		"AccountInfo" => system::decode_account_info(cursor)?,
		other => return Err(DecodeErrorKind::UnsupportedType(other.to_string()).into()),
	};
	Ok(value)
}

fn strip_wrapper<'s>(type_name: &'s str, prefix: &str) -> Option<&'s str> {
	type_name
		.strip_prefix(prefix)
		.and_then(|rest| rest.strip_suffix('>'))
}

// Naive comma split: `(u32, Vec<(u8, u8)>)` would be cut at the wrong comma.
// Simple tuples like `(u32, bool)` are all the legacy chains use in practice.
fn decode_tuple(cursor: &mut ByteCursor, inner: &str) -> Result<Value, DecodeError> {
	let mut values = Vec::new();
	for (i, element) in inner.split(',').enumerate() {
		values.push(decode(cursor, element.trim()).map_err(|e| e.at(i))?);
	}
	Ok(Value::List(values))
}

fn decode_fixed_array(cursor: &mut ByteCursor, inner: &str) -> Result<Value, DecodeError> {
	let (element, len) = inner
		.split_once(';')
		.ok_or_else(|| DecodeErrorKind::UnsupportedType(format!("[{inner}]")))?;
	let element = element.trim();
	let len: usize = len
		.trim()
		.parse()
		.map_err(|_| DecodeErrorKind::UnsupportedType(format!("[{inner}]")))?;
	if element == "u8" {
		return Ok(Value::Bytes(cursor.read_bytes(len)?.to_vec()));
	}
	let mut values = Vec::with_capacity(len);
	for i in 0..len {
		values.push(decode(cursor, element).map_err(|e| e.at(i))?);
	}
	Ok(Value::List(values))
}
