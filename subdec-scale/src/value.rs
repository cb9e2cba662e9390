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

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// A dynamically-typed decoded value. Every decoder in this workspace,
/// schema-driven, registry-driven or type-name-driven, bottoms out in one of
/// these.
///
/// Integers up to 128 bits are widened into [`Value::Uint`]/[`Value::Int`];
/// 256-bit integers keep their raw little-endian bytes since no caller does
/// arithmetic on them. Record fields stay in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// The value of an absent `Option`, or of an empty/unit type.
	Null,
	Bool(bool),
	Uint(u128),
	Int(i128),
	/// An unsigned 256-bit integer as its 32 little-endian bytes.
	U256([u8; 32]),
	/// A signed 256-bit integer as its 32 little-endian bytes.
	I256([u8; 32]),
	Bytes(Vec<u8>),
	Text(String),
	List(Vec<Value>),
	/// A struct or composite, fields in declaration order.
	Record(Vec<(String, Value)>),
	/// An enum case together with its payload.
	Variant(Box<VariantValue>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantValue {
	pub name: String,
	pub value: Value,
}

impl Value {
	pub fn variant(name: impl Into<String>, value: Value) -> Self {
		Value::Variant(Box::new(VariantValue { name: name.into(), value }))
	}
}

impl Serialize for Value {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self {
			Value::Null => serializer.serialize_unit(),
			Value::Bool(b) => serializer.serialize_bool(*b),
			Value::Uint(n) => serializer.serialize_u128(*n),
			Value::Int(n) => serializer.serialize_i128(*n),
			Value::U256(bytes) | Value::I256(bytes) => {
				serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
			}
			Value::Bytes(bytes) => serializer.serialize_str(&format!("0x{}", hex::encode(bytes))),
			Value::Text(s) => serializer.serialize_str(s),
			Value::List(values) => {
				let mut seq = serializer.serialize_seq(Some(values.len()))?;
				for value in values {
					seq.serialize_element(value)?;
				}
				seq.end()
			}
			Value::Record(fields) => {
				let mut map = serializer.serialize_map(Some(fields.len()))?;
				for (name, value) in fields {
					map.serialize_entry(name, value)?;
				}
				map.end()
			}
			Value::Variant(v) => {
				let mut map = serializer.serialize_map(Some(1))?;
				map.serialize_entry(&v.name, &v.value)?;
				map.end()
			}
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => write!(f, "null"),
			Value::Bool(b) => write!(f, "{b}"),
			Value::Uint(n) => write!(f, "{n}"),
			Value::Int(n) => write!(f, "{n}"),
			Value::U256(bytes) | Value::I256(bytes) => write!(f, "0x{}", hex::encode(bytes)),
			Value::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
			Value::Text(s) => write!(f, "{s}"),
			Value::List(values) => {
				write!(f, "[")?;
				for (i, value) in values.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{value}")?;
				}
				write!(f, "]")
			}
			Value::Record(fields) => {
				write!(f, "{{")?;
				for (i, (name, value)) in fields.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{name}: {value}")?;
				}
				write!(f, "}}")
			}
			Value::Variant(v) => match &v.value {
				Value::Null => write!(f, "{}", v.name),
				value => write!(f, "{}({value})", v.name),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serializes_to_expected_json() {
		let value = Value::Record(vec![
			("who".into(), Value::Bytes(vec![0xde, 0xad])),
			("amount".into(), Value::Uint(100)),
			("kept".into(), Value::Bool(true)),
			("memo".into(), Value::Null),
		]);
		let json = serde_json::to_string(&value).unwrap();
		assert_eq!(json, r#"{"who":"0xdead","amount":100,"kept":true,"memo":null}"#);
	}

	#[test]
	fn variant_serializes_as_single_key_map() {
		let value = Value::variant("Transfer", Value::List(vec![Value::Uint(1), Value::Uint(2)]));
		let json = serde_json::to_string(&value).unwrap();
		assert_eq!(json, r#"{"Transfer":[1,2]}"#);
	}

	#[test]
	fn display_is_compact() {
		let value = Value::variant(
			"Some",
			Value::Record(vec![("id".into(), Value::Uint(7))]),
		);
		assert_eq!(value.to_string(), "Some({id: 7})");
		assert_eq!(Value::variant("None", Value::Null).to_string(), "None");
	}
}
