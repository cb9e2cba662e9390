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

//! The portable type registry and its on-wire encoding.
//!
//! A registry is a list of `(id, type)` pairs; ids are compact-encoded on
//! the wire and referenced from pallets, fields and each other. Every id
//! referenced anywhere must itself be present in the registry; primitives
//! are the terminal kinds.

use subdec_scale::{codec, ByteCursor, DecodeError, DecodeErrorKind};

pub type TypeId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Si1Type {
	pub path: Vec<String>,
	pub params: Vec<Si1TypeParameter>,
	pub def: Si1TypeDef,
	pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Si1TypeParameter {
	pub name: String,
	pub ty: Option<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Si1Field {
	pub name: Option<String>,
	pub ty: TypeId,
	pub type_name: Option<String>,
	pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Si1Variant {
	pub name: String,
	pub fields: Vec<Si1Field>,
	/// The on-wire discriminant. Matched by value, not list position.
	pub index: u8,
	pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Si1TypeDef {
	Composite { fields: Vec<Si1Field> },
	Variant { variants: Vec<Si1Variant> },
	Sequence { element: TypeId },
	Array { len: u32, element: TypeId },
	Tuple { elements: Vec<TypeId> },
	Primitive(Primitive),
	Compact { inner: TypeId },
	BitSequence { store: TypeId, order: TypeId },
	/// A pre-v14 type-name string carried over verbatim when a chain
	/// upgrades. Present in some real registries; not decodable here.
	HistoricMetaCompat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
	Bool,
	Char,
	Str,
	U8,
	U16,
	U32,
	U64,
	U128,
	U256,
	I8,
	I16,
	I32,
	I64,
	I128,
	I256,
}

/// The numeric-ID-indexed type table decoded from v14 metadata.
#[derive(Debug, Clone, Default)]
pub struct PortableRegistry {
	types: Vec<(TypeId, Si1Type)>,
}

impl PortableRegistry {
	pub fn new(types: Vec<(TypeId, Si1Type)>) -> Self {
		Self { types }
	}

	/// Look up a type by id. The list is not assumed sorted or dense, so
	/// this is a scan for a matching id.
	pub fn resolve(&self, id: TypeId) -> Result<&Si1Type, DecodeError> {
		self.types
			.iter()
			.find(|(candidate, _)| *candidate == id)
			.map(|(_, ty)| ty)
			.ok_or_else(|| DecodeErrorKind::UnresolvedTypeId(id).into())
	}

	pub fn types(&self) -> &[(TypeId, Si1Type)] {
		&self.types
	}

	pub fn decode(cursor: &mut ByteCursor) -> Result<Self, DecodeError> {
		let types = codec::decode_vec(cursor, |c| {
			let id = decode_type_id(c).map_err(|e| e.at("id"))?;
			let ty = decode_type(c)?;
			Ok((id, ty))
		})
		.map_err(|e| e.at("types"))?;
		Ok(Self { types })
	}
}

/// Type ids are compact-encoded everywhere in the metadata.
pub fn decode_type_id(cursor: &mut ByteCursor) -> Result<TypeId, DecodeError> {
	Ok(codec::decode_compact(cursor)? as TypeId)
}

pub fn decode_type(cursor: &mut ByteCursor) -> Result<Si1Type, DecodeError> {
	let path = codec::decode_vec(cursor, codec::decode_text).map_err(|e| e.at("path"))?;
	let params = codec::decode_vec(cursor, decode_type_parameter).map_err(|e| e.at("params"))?;
	let def = decode_type_def(cursor).map_err(|e| e.at("def"))?;
	let docs = codec::decode_vec(cursor, codec::decode_text).map_err(|e| e.at("docs"))?;
	Ok(Si1Type { path, params, def, docs })
}

fn decode_type_parameter(cursor: &mut ByteCursor) -> Result<Si1TypeParameter, DecodeError> {
	let name = codec::decode_text(cursor).map_err(|e| e.at("name"))?;
	let ty = codec::decode_option(cursor, decode_type_id).map_err(|e| e.at("type"))?;
	Ok(Si1TypeParameter { name, ty })
}

pub fn decode_field(cursor: &mut ByteCursor) -> Result<Si1Field, DecodeError> {
	let name = codec::decode_option(cursor, codec::decode_text).map_err(|e| e.at("name"))?;
	let ty = decode_type_id(cursor).map_err(|e| e.at("type"))?;
	let type_name =
		codec::decode_option(cursor, codec::decode_text).map_err(|e| e.at("type_name"))?;
	let docs = codec::decode_vec(cursor, codec::decode_text).map_err(|e| e.at("docs"))?;
	Ok(Si1Field { name, ty, type_name, docs })
}

fn decode_variant(cursor: &mut ByteCursor) -> Result<Si1Variant, DecodeError> {
	let name = codec::decode_text(cursor).map_err(|e| e.at("name"))?;
	let fields = codec::decode_vec(cursor, decode_field).map_err(|e| e.at("fields"))?;
	let index = codec::decode_u8(cursor).map_err(|e| e.at("index"))?;
	let docs = codec::decode_vec(cursor, codec::decode_text).map_err(|e| e.at("docs"))?;
	Ok(Si1Variant { name, fields, index, docs })
}

fn decode_type_def(cursor: &mut ByteCursor) -> Result<Si1TypeDef, DecodeError> {
	let tag = cursor.read_byte()?;
	match tag {
		0 => Ok(Si1TypeDef::Composite {
			fields: codec::decode_vec(cursor, decode_field).map_err(|e| e.at("fields"))?,
		}),
		1 => Ok(Si1TypeDef::Variant {
			variants: codec::decode_vec(cursor, decode_variant).map_err(|e| e.at("variants"))?,
		}),
		2 => Ok(Si1TypeDef::Sequence { element: decode_type_id(cursor)? }),
		3 => {
			let len = codec::decode_u32(cursor).map_err(|e| e.at("len"))?;
			let element = decode_type_id(cursor)?;
			Ok(Si1TypeDef::Array { len, element })
		}
		4 => Ok(Si1TypeDef::Tuple {
			elements: codec::decode_vec(cursor, decode_type_id)?,
		}),
		5 => Ok(Si1TypeDef::Primitive(decode_primitive(cursor)?)),
		6 => Ok(Si1TypeDef::Compact { inner: decode_type_id(cursor)? }),
		7 => {
			let store = decode_type_id(cursor).map_err(|e| e.at("store"))?;
			let order = decode_type_id(cursor).map_err(|e| e.at("order"))?;
			Ok(Si1TypeDef::BitSequence { store, order })
		}
		8 => Ok(Si1TypeDef::HistoricMetaCompat(codec::decode_text(cursor)?)),
		other => Err(DecodeErrorKind::UnknownVariant { index: other, count: 9 }.into()),
	}
}

fn decode_primitive(cursor: &mut ByteCursor) -> Result<Primitive, DecodeError> {
	let tag = cursor.read_byte()?;
	let primitive = match tag {
		0 => Primitive::Bool,
		1 => Primitive::Char,
		2 => Primitive::Str,
		3 => Primitive::U8,
		4 => Primitive::U16,
		5 => Primitive::U32,
		6 => Primitive::U64,
		7 => Primitive::U128,
		8 => Primitive::U256,
		9 => Primitive::I8,
		10 => Primitive::I16,
		11 => Primitive::I32,
		12 => Primitive::I64,
		13 => Primitive::I128,
		14 => Primitive::I256,
		other => {
			return Err(DecodeErrorKind::UnknownVariant { index: other, count: 15 }.into())
		}
	};
	Ok(primitive)
}

#[cfg(test)]
mod tests {
	use super::*;
	use ::codec::{Compact, Encode};

	#[test]
	fn resolve_scans_by_id_not_position() {
		let registry = PortableRegistry::new(vec![
			(7, primitive_type(Primitive::U32)),
			(3, primitive_type(Primitive::Bool)),
		]);
		assert_eq!(registry.resolve(3).unwrap().def, Si1TypeDef::Primitive(Primitive::Bool));
		assert_eq!(registry.resolve(7).unwrap().def, Si1TypeDef::Primitive(Primitive::U32));
		let err = registry.resolve(4).unwrap_err();
		assert_eq!(err.kind(), &DecodeErrorKind::UnresolvedTypeId(4));
	}

	#[test]
	fn decodes_a_variant_type() {
		// path ["pallet_balances", "Call"], no params, Variant with one
		// case "transfer" at index 0 with one unnamed field of type 9.
		let bytes = (
			vec!["pallet_balances".to_string(), "Call".to_string()],
			Vec::<u8>::new(),
			1u8,
			vec![(
				"transfer".to_string(),
				vec![(None::<String>, Compact(9u32), None::<String>, Vec::<String>::new())],
				0u8,
				Vec::<String>::new(),
			)],
			Vec::<String>::new(),
		)
			.encode();
		let mut cursor = ByteCursor::new(&bytes);
		let ty = decode_type(&mut cursor).unwrap();
		assert!(cursor.is_empty());
		assert_eq!(ty.path, vec!["pallet_balances", "Call"]);
		let Si1TypeDef::Variant { variants } = ty.def else { panic!("expected variant") };
		assert_eq!(variants[0].name, "transfer");
		assert_eq!(variants[0].index, 0);
		assert_eq!(variants[0].fields[0].ty, 9);
	}

	#[test]
	fn decodes_registry_with_compact_ids() {
		// One entry: id 4, a u8 primitive.
		let bytes = (vec![(
			Compact(4u32),
			(Vec::<String>::new(), Vec::<u8>::new(), (5u8, 3u8), Vec::<String>::new()),
		)])
			.encode();
		let mut cursor = ByteCursor::new(&bytes);
		let registry = PortableRegistry::decode(&mut cursor).unwrap();
		assert!(cursor.is_empty());
		assert_eq!(registry.resolve(4).unwrap().def, Si1TypeDef::Primitive(Primitive::U8));
	}

	#[test]
	fn historic_compat_keeps_the_type_string() {
		let bytes = (8u8, "Vec<DeferredOffenceOf>".to_string()).encode();
		let mut cursor = ByteCursor::new(&bytes);
		let def = decode_type_def(&mut cursor).unwrap();
		assert_eq!(def, Si1TypeDef::HistoricMetaCompat("Vec<DeferredOffenceOf>".into()));
	}

	fn primitive_type(p: Primitive) -> Si1Type {
		Si1Type { path: vec![], params: vec![], def: Si1TypeDef::Primitive(p), docs: vec![] }
	}
}
