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

//! Extrinsic and event decoding driven by the portable type registry.
//!
//! Every value here is decoded by structural recursion over [`Si1TypeDef`]:
//! the registry id tells us the shape, the shape tells us how many bytes to
//! consume. Calls and events are variant types owned by their pallet.

use crate::metadata::{Error, Metadata};
use crate::si::{Primitive, PortableRegistry, Si1TypeDef, TypeId};
use subdec_common::{
	Arg, DecodedExtrinsic, EventRecord, ExtrinsicSignature, MultiAddress, MultiSignature,
	PalletVariant, Phase,
};
use subdec_scale::{codec, ByteCursor, DecodeError, DecodeErrorKind, Value};

/// A registry field with no name, as in tuple structs.
const UNNAMED: &str = "unnamed";

#[derive(Debug, Clone, Copy)]
enum VariantKind {
	Call,
	Event,
}

/// Decode a single extrinsic blob.
pub fn decode_extrinsic(meta: &Metadata, bytes: &[u8]) -> Result<DecodedExtrinsic, Error> {
	let mut cursor = ByteCursor::new(bytes);
	decode_one_extrinsic(meta, &mut cursor)
}

/// Decode a block body: a compact count followed by each extrinsic.
pub fn decode_extrinsics(meta: &Metadata, bytes: &[u8]) -> Result<Vec<DecodedExtrinsic>, Error> {
	let mut cursor = ByteCursor::new(bytes);
	let count = codec::decode_compact(&mut cursor).map_err(|e| e.at("count"))?;
	let mut extrinsics = Vec::with_capacity(count as usize);
	for i in 0..count {
		let ext = decode_one_extrinsic(meta, &mut cursor).map_err(|e| match e {
			Error::Decode(inner) => Error::Decode(inner.at(i as usize)),
			other => other,
		})?;
		extrinsics.push(ext);
	}
	Ok(extrinsics)
}

fn decode_one_extrinsic(
	meta: &Metadata,
	cursor: &mut ByteCursor,
) -> Result<DecodedExtrinsic, Error> {
	// Each extrinsic starts with its own compact byte length. Informational
	// only; the registry-driven decoders consume exactly what the types say.
	codec::decode_compact(cursor).map_err(|e| e.at("length"))?;

	let format = cursor.read_byte().map_err(|e| e.at("format"))?;
	// High bit flags a signature; the low seven bits are the extrinsic
	// format version, which is not checked.
	let is_signed = format & 0b1000_0000 != 0;

	let signature = if is_signed {
		let address = MultiAddress::decode(cursor)?;
		let signature = MultiSignature::decode(cursor)?;
		// The signed-extension payloads follow in the order the metadata
		// declares them, each a registry id away from being decodable.
		let mut extensions = Vec::with_capacity(meta.extrinsic().signed_extensions.len());
		for ext in &meta.extrinsic().signed_extensions {
			let value = decode_value(meta.registry(), cursor, ext.ty)
				.map_err(|e| e.at(ext.identifier.clone()).at("extensions"))?;
			extensions.push((ext.identifier.clone(), value));
		}
		Some(ExtrinsicSignature { address, signature, extensions })
	} else {
		None
	};

	let call = decode_pallet_variant(meta, cursor, VariantKind::Call)?;
	Ok(DecodedExtrinsic { signature, call })
}

/// Decode a block's event vector.
pub fn decode_events(meta: &Metadata, bytes: &[u8]) -> Result<Vec<EventRecord>, Error> {
	let mut cursor = ByteCursor::new(bytes);
	let count = codec::decode_compact(&mut cursor).map_err(|e| e.at("count"))?;
	let mut records = Vec::with_capacity(count as usize);
	for i in 0..count {
		let record = decode_event_record(meta, &mut cursor).map_err(|e| match e {
			Error::Decode(inner) => Error::Decode(inner.at(i as usize)),
			other => other,
		})?;
		records.push(record);
	}
	Ok(records)
}

fn decode_event_record(meta: &Metadata, cursor: &mut ByteCursor) -> Result<EventRecord, Error> {
	let phase = Phase::decode(cursor)?;
	let event = decode_pallet_variant(meta, cursor, VariantKind::Event)?;

	// Topics are read to keep the cursor aligned, then dropped.
	codec::decode_vec(cursor, |c| c.read_array::<32>()).map_err(|e| e.at("topics"))?;

	Ok(EventRecord { phase, event })
}

/// Decode a pallet-index byte, a variant-index byte and the variant's fields
/// against the pallet's call or event type.
fn decode_pallet_variant(
	meta: &Metadata,
	cursor: &mut ByteCursor,
	kind: VariantKind,
) -> Result<PalletVariant, Error> {
	let pallet_index = cursor.read_byte().map_err(|e| e.at("pallet_index"))?;
	let variant_index = cursor.read_byte().map_err(|e| e.at("variant_index"))?;

	let pallet = meta.pallet_by_index(pallet_index)?;
	let type_id = match kind {
		VariantKind::Call => pallet.calls.ok_or_else(|| Error::NoCalls(pallet.name.clone()))?,
		VariantKind::Event => pallet.events.ok_or_else(|| Error::NoEvents(pallet.name.clone()))?,
	};
	let variants = meta.variants_of(pallet, type_id)?;

	// The discriminant is matched against each variant's declared index, not
	// its position in the list.
	let variant = variants
		.iter()
		.find(|v| v.index == variant_index)
		.ok_or_else(|| {
			DecodeError::from(DecodeErrorKind::UnknownVariantIndex {
				index: variant_index,
				type_id,
			})
		})?;
	log::trace!("decoding {}::{}", pallet.name, variant.name);

	let mut args = Vec::with_capacity(variant.fields.len());
	for field in &variant.fields {
		let name = field.name.clone().unwrap_or_else(|| UNNAMED.to_string());
		let value = decode_value(meta.registry(), cursor, field.ty)
			.map_err(|e| e.at(name.clone()).at(variant.name.clone()))?;
		args.push(Arg::new(name, value));
	}
	Ok(PalletVariant { pallet: pallet.name.clone(), variant: variant.name.clone(), args })
}

/// Decode a value of any registry type by structural recursion.
pub fn decode_value(
	registry: &PortableRegistry,
	cursor: &mut ByteCursor,
	id: TypeId,
) -> Result<Value, DecodeError> {
	let ty = registry.resolve(id)?;
	match &ty.def {
		Si1TypeDef::Composite { fields } => {
			let mut record = Vec::with_capacity(fields.len());
			for field in fields {
				let name = field.name.clone().unwrap_or_else(|| UNNAMED.to_string());
				let value = decode_value(registry, cursor, field.ty)
					.map_err(|e| e.at(name.clone()))?;
				record.push((name, value));
			}
			Ok(Value::Record(record))
		}
		Si1TypeDef::Variant { variants } => {
			let index = cursor.read_byte()?;
			let variant = variants.iter().find(|v| v.index == index).ok_or(
				DecodeErrorKind::UnknownVariantIndex { index, type_id: id },
			)?;
			let mut record = Vec::with_capacity(variant.fields.len());
			for field in &variant.fields {
				let name = field.name.clone().unwrap_or_else(|| UNNAMED.to_string());
				let value = decode_value(registry, cursor, field.ty)
					.map_err(|e| e.at(name.clone()).at(variant.name.clone()))?;
				record.push((name, value));
			}
			Ok(Value::variant(variant.name.clone(), Value::Record(record)))
		}
		Si1TypeDef::Sequence { element } if is_u8(registry, *element) => {
			Ok(Value::Bytes(codec::decode_bytes(cursor)?))
		}
		Si1TypeDef::Sequence { element } => {
			Ok(Value::List(codec::decode_vec(cursor, |c| {
				decode_value(registry, c, *element)
			})?))
		}
		Si1TypeDef::Array { len, element } if is_u8(registry, *element) => {
			Ok(Value::Bytes(cursor.read_bytes(*len as usize)?.to_vec()))
		}
		Si1TypeDef::Array { len, element } => {
			let mut items = Vec::with_capacity(*len as usize);
			for i in 0..*len {
				items.push(
					decode_value(registry, cursor, *element).map_err(|e| e.at(i as usize))?,
				);
			}
			Ok(Value::List(items))
		}
		Si1TypeDef::Tuple { elements } => {
			let mut items = Vec::with_capacity(elements.len());
			for (i, element) in elements.iter().enumerate() {
				items.push(decode_value(registry, cursor, *element).map_err(|e| e.at(i))?);
			}
			Ok(Value::List(items))
		}
		Si1TypeDef::Primitive(primitive) => decode_primitive_value(cursor, *primitive),
		Si1TypeDef::Compact { .. } => Ok(Value::Uint(codec::decode_compact(cursor)?)),
		Si1TypeDef::BitSequence { .. } => {
			// A compact count of bits, then the packed bit store.
			let bits = codec::decode_compact(cursor).map_err(|e| e.at("bits"))?;
			let bytes = usize::try_from(bits.div_ceil(8)).map_err(|_| {
				DecodeErrorKind::MalformedLength { length: bits, remaining: cursor.remaining() }
			})?;
			Ok(Value::Bytes(cursor.read_bytes(bytes)?.to_vec()))
		}
		Si1TypeDef::HistoricMetaCompat(type_name) => {
			Err(DecodeErrorKind::HistoricType(type_name.clone()).into())
		}
	}
}

fn decode_primitive_value(
	cursor: &mut ByteCursor,
	primitive: Primitive,
) -> Result<Value, DecodeError> {
	let value = match primitive {
		Primitive::Bool => Value::Bool(codec::decode_bool(cursor)?),
		// A single byte rendered as text, not a full unicode scalar.
		Primitive::Char => Value::Text((cursor.read_byte()? as char).to_string()),
		Primitive::Str => Value::Text(codec::decode_text(cursor)?),
		Primitive::U8 => Value::Uint(codec::decode_u8(cursor)? as u128),
		Primitive::U16 => Value::Uint(codec::decode_u16(cursor)? as u128),
		Primitive::U32 => Value::Uint(codec::decode_u32(cursor)? as u128),
		Primitive::U64 => Value::Uint(codec::decode_u64(cursor)? as u128),
		Primitive::U128 => Value::Uint(codec::decode_u128(cursor)?),
		Primitive::U256 => Value::U256(codec::decode_u256(cursor)?),
		Primitive::I8 => Value::Int(codec::decode_i8(cursor)? as i128),
		Primitive::I16 => Value::Int(codec::decode_i16(cursor)? as i128),
		Primitive::I32 => Value::Int(codec::decode_i32(cursor)? as i128),
		Primitive::I64 => Value::Int(codec::decode_i64(cursor)? as i128),
		Primitive::I128 => Value::Int(codec::decode_i128(cursor)?),
		Primitive::I256 => Value::I256(cursor.read_array::<32>()?),
	};
	Ok(value)
}

fn is_u8(registry: &PortableRegistry, id: TypeId) -> bool {
	matches!(
		registry.resolve(id).map(|ty| &ty.def),
		Ok(Si1TypeDef::Primitive(Primitive::U8))
	)
}
