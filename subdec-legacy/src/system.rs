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

//! Fixed-layout decoders for the frame-system types legacy metadata names by
//! string: dispatch info and errors, account data. These shapes are not in
//! the metadata at all pre-v14, so their layout is pinned here, following the
//! polkadot-js type definitions.

use subdec_scale::{codec, ByteCursor, DecodeError, DecodeErrorKind, Value};

pub fn decode_weight(cursor: &mut ByteCursor) -> Result<Value, DecodeError> {
	Ok(Value::Uint(codec::decode_u64(cursor)? as u128))
}

const DISPATCH_CLASSES: &[&str] = &["Normal", "Operational", "Mandatory"];
const PAYS_FEE: &[&str] = &["Yes", "No"];
const TOKEN_ERRORS: &[&str] = &[
	"NoFunds",
	"WouldDie",
	"BelowMinimum",
	"CannotCreate",
	"UnknownAsset",
	"Frozen",
	"Unsupported",
	"Underflow",
	"Overflow",
];
const ARITHMETIC_ERRORS: &[&str] = &["Underflow", "Overflow", "DivisionByZero"];
const TRANSACTIONAL_ERRORS: &[&str] = &["LimitReached", "NoLayer"];

fn decode_simple_enum(cursor: &mut ByteCursor, variants: &[&str]) -> Result<Value, DecodeError> {
	let index = cursor.read_byte()?;
	let name = variants.get(index as usize).ok_or(DecodeErrorKind::UnknownVariant {
		index,
		count: variants.len(),
	})?;
	Ok(Value::Text(name.to_string()))
}

pub fn decode_dispatch_info(cursor: &mut ByteCursor) -> Result<Value, DecodeError> {
	let weight = decode_weight(cursor).map_err(|e| e.at("weight"))?;
	let class = decode_simple_enum(cursor, DISPATCH_CLASSES).map_err(|e| e.at("class"))?;
	let pays_fee = decode_simple_enum(cursor, PAYS_FEE).map_err(|e| e.at("pays_fee"))?;
	Ok(Value::Record(vec![
		("weight".into(), weight),
		("class".into(), class),
		("pays_fee".into(), pays_fee),
	]))
}

pub fn decode_dispatch_error(cursor: &mut ByteCursor) -> Result<Value, DecodeError> {
	let tag = cursor.read_byte()?;
	let value = match tag {
		0 => Value::variant("Other", Value::Null),
		1 => Value::variant("CannotLookup", Value::Null),
		2 => Value::variant("BadOrigin", Value::Null),
		3 => {
			// Module error: pallet index plus a fixed 8-byte error blob.
			let index = cursor.read_byte().map_err(|e| e.at("index").at("Module"))?;
			let error = cursor.read_bytes(8).map_err(|e| e.at("error").at("Module"))?;
			Value::variant(
				"Module",
				Value::Record(vec![
					("index".into(), Value::Uint(index as u128)),
					("error".into(), Value::Bytes(error.to_vec())),
				]),
			)
		}
		4 => Value::variant("ConsumerRemaining", Value::Null),
		5 => Value::variant("NoProviders", Value::Null),
		6 => Value::variant("TooManyConsumers", Value::Null),
		7 => Value::variant(
			"Token",
			decode_simple_enum(cursor, TOKEN_ERRORS).map_err(|e| e.at("Token"))?,
		),
		8 => Value::variant(
			"Arithmetic",
			decode_simple_enum(cursor, ARITHMETIC_ERRORS).map_err(|e| e.at("Arithmetic"))?,
		),
		9 => Value::variant(
			"Transactional",
			decode_simple_enum(cursor, TRANSACTIONAL_ERRORS).map_err(|e| e.at("Transactional"))?,
		),
		10 => Value::variant("Exhausted", Value::Null),
		11 => Value::variant("Corruption", Value::Null),
		12 => Value::variant("Unavailable", Value::Null),
		other => {
			return Err(DecodeErrorKind::UnknownVariant { index: other, count: 13 }.into())
		}
	};
	Ok(value)
}

pub fn decode_dispatch_result(cursor: &mut ByteCursor) -> Result<Value, DecodeError> {
	match cursor.read_byte()? {
		0 => Ok(Value::variant("Ok", Value::Null)),
		1 => Ok(Value::variant("Err", decode_dispatch_error(cursor).map_err(|e| e.at("Err"))?)),
		other => Err(DecodeErrorKind::UnknownVariant { index: other, count: 2 }.into()),
	}
}

pub fn decode_account_data(cursor: &mut ByteCursor) -> Result<Value, DecodeError> {
	let free = codec::decode_u128(cursor).map_err(|e| e.at("free"))?;
	let reserved = codec::decode_u128(cursor).map_err(|e| e.at("reserved"))?;
	let misc_frozen = codec::decode_u128(cursor).map_err(|e| e.at("misc_frozen"))?;
	let fee_frozen = codec::decode_u128(cursor).map_err(|e| e.at("fee_frozen"))?;
	Ok(Value::Record(vec![
		("free".into(), Value::Uint(free)),
		("reserved".into(), Value::Uint(reserved)),
		("misc_frozen".into(), Value::Uint(misc_frozen)),
		("fee_frozen".into(), Value::Uint(fee_frozen)),
	]))
}

pub fn decode_account_info(cursor: &mut ByteCursor) -> Result<Value, DecodeError> {
	let nonce = codec::decode_u32(cursor).map_err(|e| e.at("nonce"))?;
	let consumers = codec::decode_u32(cursor).map_err(|e| e.at("consumers"))?;
	let providers = codec::decode_u32(cursor).map_err(|e| e.at("providers"))?;
	let sufficients = codec::decode_u32(cursor).map_err(|e| e.at("sufficients"))?;
	let data = decode_account_data(cursor).map_err(|e| e.at("data"))?;
	Ok(Value::Record(vec![
		("nonce".into(), Value::Uint(nonce as u128)),
		("consumers".into(), Value::Uint(consumers as u128)),
		("providers".into(), Value::Uint(providers as u128)),
		("sufficients".into(), Value::Uint(sufficients as u128)),
		("data".into(), data),
	]))
}

#[cfg(test)]
mod tests {
	use super::*;
	use ::codec::Encode;

	#[test]
	fn dispatch_info_is_weight_class_pays() {
		let mut bytes = 1_000_000u64.encode();
		bytes.push(1); // Operational
		bytes.push(0); // Yes
		let mut cursor = ByteCursor::new(&bytes);
		let value = decode_dispatch_info(&mut cursor).unwrap();
		assert!(cursor.is_empty());
		assert_eq!(
			value,
			Value::Record(vec![
				("weight".into(), Value::Uint(1_000_000)),
				("class".into(), Value::Text("Operational".into())),
				("pays_fee".into(), Value::Text("Yes".into())),
			])
		);
	}

	#[test]
	fn module_dispatch_error_carries_pallet_and_blob() {
		let mut bytes = vec![3u8, 5u8];
		bytes.extend([0xAA; 8]);
		let mut cursor = ByteCursor::new(&bytes);
		let value = decode_dispatch_error(&mut cursor).unwrap();
		assert_eq!(
			value,
			Value::variant(
				"Module",
				Value::Record(vec![
					("index".into(), Value::Uint(5)),
					("error".into(), Value::Bytes(vec![0xAA; 8])),
				])
			)
		);
	}

	#[test]
	fn dispatch_result_ok_and_err() {
		let mut cursor = ByteCursor::new(&[0u8]);
		assert_eq!(decode_dispatch_result(&mut cursor).unwrap(), Value::variant("Ok", Value::Null));

		// Err(Token(Frozen))
		let mut cursor = ByteCursor::new(&[1u8, 7u8, 5u8]);
		assert_eq!(
			decode_dispatch_result(&mut cursor).unwrap(),
			Value::variant("Err", Value::variant("Token", Value::Text("Frozen".into())))
		);
	}

	#[test]
	fn account_info_layout() {
		let bytes = (7u32, 1u32, 1u32, 0u32, 100u128, 0u128, 0u128, 0u128).encode();
		let mut cursor = ByteCursor::new(&bytes);
		let value = decode_account_info(&mut cursor).unwrap();
		assert!(cursor.is_empty());
		let Value::Record(fields) = value else { panic!("expected a record") };
		assert_eq!(fields[0], ("nonce".into(), Value::Uint(7)));
		assert_eq!(
			fields[4].1,
			Value::Record(vec![
				("free".into(), Value::Uint(100)),
				("reserved".into(), Value::Uint(0)),
				("misc_frozen".into(), Value::Uint(0)),
				("fee_frozen".into(), Value::Uint(0)),
			])
		);
	}
}
