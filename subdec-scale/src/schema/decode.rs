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

use crate::codec;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::schema::SchemaType;
use crate::value::Value;

/// Resolves named type references that are not in the fixed primitive table.
pub trait TypeRegistry {
	fn resolve(&self, name: &str) -> Option<&SchemaType>;
}

/// A registry that resolves nothing. Useful when a schema is known to bottom
/// out in primitives only.
pub struct EmptyRegistry;

impl TypeRegistry for EmptyRegistry {
	fn resolve(&self, _name: &str) -> Option<&SchemaType> {
		None
	}
}

/// Decode one value shaped like `ty` from the cursor.
///
/// Dispatches purely on the schema node; any failure in a nested decode is
/// wrapped with the enclosing field/index/variant segment on the way out, so
/// the returned error names the full path from `ty` down to the byte that
/// could not be interpreted.
pub fn decode_with_schema(
	cursor: &mut ByteCursor,
	ty: &SchemaType,
	registry: &dyn TypeRegistry,
) -> Result<Value, DecodeError> {
	log::trace!("decoding {ty:?} at offset {}", cursor.position());
	match ty {
		SchemaType::Struct { fields } => {
			let mut record = Vec::with_capacity(fields.len());
			for field in fields {
				let value = decode_with_schema(cursor, &field.ty, registry)
					.map_err(|e| e.at(field.name.clone()))?;
				record.push((field.name.clone(), value));
			}
			Ok(Value::Record(record))
		}
		SchemaType::Tuple { fields } => {
			let mut values = Vec::with_capacity(fields.len());
			for (i, field) in fields.iter().enumerate() {
				values.push(decode_with_schema(cursor, field, registry).map_err(|e| e.at(i))?);
			}
			Ok(Value::List(values))
		}
		SchemaType::EnumSimple { variants } => {
			let index = cursor.read_byte().map_err(|e| e.at("index"))?;
			let name = variants.get(index as usize).ok_or(DecodeErrorKind::UnknownVariant {
				index,
				count: variants.len(),
			})?;
			Ok(Value::Text(name.clone()))
		}
		SchemaType::EnumComplex { variants } => {
			let index = cursor.read_byte().map_err(|e| e.at("index"))?;
			let variant = variants.get(index as usize).ok_or(DecodeErrorKind::UnknownVariant {
				index,
				count: variants.len(),
			})?;
			let payload = decode_with_schema(cursor, &variant.ty, registry)
				.map_err(|e| e.at(variant.name.clone()))?;
			Ok(Value::variant(variant.name.clone(), payload))
		}
		SchemaType::Sequence { element } => {
			// Byte sequences read as one block; same bytes, one value.
			if is_u8(element) {
				return Ok(Value::Bytes(codec::decode_bytes(cursor)?));
			}
			let values =
				codec::decode_vec(cursor, |c| decode_with_schema(c, element, registry))?;
			Ok(Value::List(values))
		}
		SchemaType::Optional { element } => {
			let value =
				codec::decode_option(cursor, |c| decode_with_schema(c, element, registry))?;
			Ok(value.unwrap_or(Value::Null))
		}
		SchemaType::FixedArray { element, length } => {
			if is_u8(element) {
				return Ok(Value::Bytes(cursor.read_bytes(*length)?.to_vec()));
			}
			let mut values = Vec::with_capacity(*length);
			for i in 0..*length {
				values
					.push(decode_with_schema(cursor, element, registry).map_err(|e| e.at(i))?);
			}
			Ok(Value::List(values))
		}
		SchemaType::Reference { name } => decode_reference(cursor, name, registry),
		SchemaType::Import { module, item } => Err(DecodeErrorKind::UnresolvedImport {
			module: module.clone(),
			item: item.clone(),
		}
		.into()),
		SchemaType::BitFlags { bit_length, flags } => {
			// The backing integer is the narrowest unsigned type the declared
			// bit length fits in.
			let raw: u128 = match bit_length {
				0..=8 => codec::decode_u8(cursor)?.into(),
				9..=16 => codec::decode_u16(cursor)?.into(),
				17..=32 => codec::decode_u32(cursor)?.into(),
				33..=64 => codec::decode_u64(cursor)?.into(),
				65..=128 => codec::decode_u128(cursor)?,
				129..=256 => {
					// Flag values are at most 64 bits wide, so the high half
					// of a 256-bit store can never match one.
					let bytes = codec::decode_u256(cursor)?;
					let mut low = [0u8; 16];
					low.copy_from_slice(&bytes[..16]);
					u128::from_le_bytes(low)
				}
				other => return Err(DecodeErrorKind::UnsupportedBitLength(*other).into()),
			};
			let record = flags
				.iter()
				.map(|flag| (flag.name.clone(), Value::Bool(raw & u128::from(flag.value) != 0)))
				.collect();
			Ok(Value::Record(record))
		}
	}
}

fn is_u8(ty: &SchemaType) -> bool {
	matches!(ty, SchemaType::Reference { name } if name == "u8")
}

fn decode_reference(
	cursor: &mut ByteCursor,
	name: &str,
	registry: &dyn TypeRegistry,
) -> Result<Value, DecodeError> {
	let value = match name {
		"u8" => Value::Uint(codec::decode_u8(cursor)? as u128),
		"u16" => Value::Uint(codec::decode_u16(cursor)? as u128),
		"u32" => Value::Uint(codec::decode_u32(cursor)? as u128),
		"u64" => Value::Uint(codec::decode_u64(cursor)? as u128),
		"u128" => Value::Uint(codec::decode_u128(cursor)?),
		"u256" => Value::U256(codec::decode_u256(cursor)?),
		"i8" => Value::Int(codec::decode_i8(cursor)? as i128),
		"i16" => Value::Int(codec::decode_i16(cursor)? as i128),
		"i32" => Value::Int(codec::decode_i32(cursor)? as i128),
		"i64" => Value::Int(codec::decode_i64(cursor)? as i128),
		"i128" => Value::Int(codec::decode_i128(cursor)?),
		"i256" => Value::I256(codec::decode_u256(cursor)?),
		"bool" => Value::Bool(codec::decode_bool(cursor)?),
		"compact" | "Compact" => Value::Uint(codec::decode_compact(cursor)?),
		"str" | "String" | "Text" => Value::Text(codec::decode_text(cursor)?),
		"Bytes" => Value::Bytes(codec::decode_bytes(cursor)?),
		// The unit type occupies no bytes.
		"empty" | "()" => Value::Null,
		other => match registry.resolve(other) {
			Some(ty) => decode_with_schema(cursor, ty, registry)?,
			None => return Err(DecodeErrorKind::UnsupportedType(other.to_string()).into()),
		},
	};
	Ok(value)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::{BitFlag, NamedMember};
	use std::collections::HashMap;

	fn decode(ty: &SchemaType, bytes: &[u8]) -> Result<Value, DecodeError> {
		let mut cursor = ByteCursor::new(bytes);
		decode_with_schema(&mut cursor, ty, &EmptyRegistry)
	}

	#[test]
	fn struct_fields_decode_in_order() {
		let ty = SchemaType::Struct {
			fields: vec![
				NamedMember::new("a", SchemaType::reference("u8")),
				NamedMember::new("b", SchemaType::reference("u8")),
			],
		};
		let value = decode(&ty, &[0x08, 0x10]).unwrap();
		assert_eq!(
			value,
			Value::Record(vec![("a".into(), Value::Uint(8)), ("b".into(), Value::Uint(16))])
		);
	}

	#[test]
	fn simple_enum_yields_variant_name() {
		let ty = SchemaType::EnumSimple {
			variants: vec!["Red".into(), "Green".into(), "Blue".into()],
		};
		assert_eq!(decode(&ty, &[0x01]).unwrap(), Value::Text("Green".into()));
	}

	#[test]
	fn simple_enum_rejects_out_of_range_index() {
		let ty = SchemaType::EnumSimple {
			variants: vec!["Red".into(), "Green".into(), "Blue".into()],
		};
		let err = decode(&ty, &[0x03]).unwrap_err();
		assert_eq!(err.kind(), &DecodeErrorKind::UnknownVariant { index: 3, count: 3 });
	}

	#[test]
	fn complex_enum_wraps_payload_in_variant() {
		let ty = SchemaType::EnumComplex {
			variants: vec![
				NamedMember::new("None", SchemaType::reference("empty")),
				NamedMember::new("Some", SchemaType::reference("u32")),
			],
		};
		assert_eq!(
			decode(&ty, &[0x01, 0x2A, 0x00, 0x00, 0x00]).unwrap(),
			Value::variant("Some", Value::Uint(42))
		);
		assert_eq!(decode(&ty, &[0x00]).unwrap(), Value::variant("None", Value::Null));
	}

	#[test]
	fn sequences_are_length_prefixed() {
		let ty = SchemaType::sequence(SchemaType::reference("u16"));
		assert_eq!(
			decode(&ty, &[0x08, 0x01, 0x00, 0x02, 0x00]).unwrap(),
			Value::List(vec![Value::Uint(1), Value::Uint(2)])
		);
		assert_eq!(decode(&ty, &[0x00]).unwrap(), Value::List(vec![]));
	}

	#[test]
	fn byte_sequences_are_a_single_block() {
		let ty = SchemaType::sequence(SchemaType::reference("u8"));
		assert_eq!(decode(&ty, &[0x08, 0x01, 0x02]).unwrap(), Value::Bytes(vec![1, 2]));

		let ty = SchemaType::fixed_array(SchemaType::reference("u8"), 3);
		assert_eq!(decode(&ty, &[1, 2, 3]).unwrap(), Value::Bytes(vec![1, 2, 3]));
	}

	#[test]
	fn optionals() {
		let ty = SchemaType::optional(SchemaType::reference("u8"));
		assert_eq!(decode(&ty, &[0x00]).unwrap(), Value::Null);
		assert_eq!(decode(&ty, &[0x01, 0x2A]).unwrap(), Value::Uint(42));
	}

	#[test]
	fn fixed_arrays_have_no_length_prefix() {
		let ty = SchemaType::fixed_array(SchemaType::reference("u16"), 2);
		assert_eq!(
			decode(&ty, &[0x01, 0x00, 0x02, 0x00]).unwrap(),
			Value::List(vec![Value::Uint(1), Value::Uint(2)])
		);
	}

	#[test]
	fn imports_fail_at_decode_time() {
		let ty = SchemaType::Import { module: "balances".into(), item: "VestingInfo".into() };
		let err = decode(&ty, &[0x00]).unwrap_err();
		assert_eq!(
			err.kind(),
			&DecodeErrorKind::UnresolvedImport {
				module: "balances".into(),
				item: "VestingInfo".into()
			}
		);
	}

	#[test]
	fn bit_flags_decode_to_a_boolean_per_flag() {
		let ty = SchemaType::BitFlags {
			bit_length: 8,
			flags: vec![
				BitFlag { name: "a".into(), value: 0b001 },
				BitFlag { name: "b".into(), value: 0b010 },
				BitFlag { name: "c".into(), value: 0b100 },
			],
		};
		assert_eq!(
			decode(&ty, &[0b101]).unwrap(),
			Value::Record(vec![
				("a".into(), Value::Bool(true)),
				("b".into(), Value::Bool(false)),
				("c".into(), Value::Bool(true)),
			])
		);
	}

	#[test]
	fn bit_flags_width_picks_the_backing_integer() {
		let ty = SchemaType::BitFlags {
			bit_length: 16,
			flags: vec![BitFlag { name: "high".into(), value: 1 << 15 }],
		};
		assert_eq!(
			decode(&ty, &[0x00, 0x80]).unwrap(),
			Value::Record(vec![("high".into(), Value::Bool(true))])
		);

		let ty = SchemaType::BitFlags { bit_length: 300, flags: vec![] };
		let err = decode(&ty, &[0x00]).unwrap_err();
		assert_eq!(err.kind(), &DecodeErrorKind::UnsupportedBitLength(300));
	}

	#[test]
	fn unknown_reference_is_unsupported() {
		let err = decode(&SchemaType::reference("MysteryType"), &[0x00]).unwrap_err();
		assert_eq!(err.kind(), &DecodeErrorKind::UnsupportedType("MysteryType".into()));
	}

	struct MapRegistry(HashMap<String, SchemaType>);

	impl TypeRegistry for MapRegistry {
		fn resolve(&self, name: &str) -> Option<&SchemaType> {
			self.0.get(name)
		}
	}

	#[test]
	fn references_resolve_through_the_registry() {
		let mut types = HashMap::new();
		types.insert(
			"Point".to_string(),
			SchemaType::Struct {
				fields: vec![
					NamedMember::new("x", SchemaType::reference("u8")),
					NamedMember::new("y", SchemaType::reference("u8")),
				],
			},
		);
		let registry = MapRegistry(types);
		let mut cursor = ByteCursor::new(&[0x01, 0x02]);
		let value =
			decode_with_schema(&mut cursor, &SchemaType::reference("Point"), &registry).unwrap();
		assert_eq!(
			value,
			Value::Record(vec![("x".into(), Value::Uint(1)), ("y".into(), Value::Uint(2))])
		);
	}

	#[test]
	fn nested_failure_reports_full_path() {
		let ty = SchemaType::Struct {
			fields: vec![NamedMember::new(
				"dest",
				SchemaType::sequence(SchemaType::reference("bool")),
			)],
		};
		// Two bools announced, second one is 0x02.
		let err = decode(&ty, &[0x08, 0x01, 0x02]).unwrap_err();
		assert_eq!(err.to_string(), "dest/1: invalid boolean byte 0x02");
	}
}
