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

//! A closed model of value shapes, plus the decoder that walks it.
//!
//! A [`SchemaType`] describes what a byte sequence looks like without saying
//! anything about where the description came from; producers build these from
//! hand-authored type catalogs or from chain metadata, and the decoder in
//! [`decode`] turns bytes into [`Value`](crate::Value)s by structural
//! recursion over the model.

mod decode;

pub use decode::{decode_with_schema, EmptyRegistry, TypeRegistry};

/// The shape of a decodable value.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
	/// Named fields decoded in declaration order.
	Struct { fields: Vec<NamedMember> },
	/// Unnamed fields decoded in declaration order.
	Tuple { fields: Vec<SchemaType> },
	/// A C-like enum: one index byte selecting a variant with no payload.
	EnumSimple { variants: Vec<String> },
	/// An enum whose variants carry payloads; one index byte then the
	/// selected variant's payload.
	EnumComplex { variants: Vec<NamedMember> },
	/// Compact-length-prefixed homogeneous sequence.
	Sequence { element: Box<SchemaType> },
	/// One presence byte, then the payload if present.
	Optional { element: Box<SchemaType> },
	/// Exactly `length` elements with no length prefix on the wire.
	FixedArray { element: Box<SchemaType>, length: usize },
	/// A primitive or named type, resolved against the fixed primitive table
	/// and then a [`TypeRegistry`].
	Reference { name: String },
	/// A type defined in another module's catalog. Producers must substitute
	/// the real definition before decoding; hitting one at decode time is an
	/// error.
	Import { module: String, item: String },
	/// A fixed-width integer interpreted as a set of named flag bits.
	BitFlags { bit_length: usize, flags: Vec<BitFlag> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedMember {
	pub name: String,
	pub ty: SchemaType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BitFlag {
	pub name: String,
	pub value: u64,
}

impl SchemaType {
	pub fn reference(name: impl Into<String>) -> Self {
		SchemaType::Reference { name: name.into() }
	}

	pub fn sequence(element: SchemaType) -> Self {
		SchemaType::Sequence { element: Box::new(element) }
	}

	pub fn optional(element: SchemaType) -> Self {
		SchemaType::Optional { element: Box::new(element) }
	}

	pub fn fixed_array(element: SchemaType, length: usize) -> Self {
		SchemaType::FixedArray { element: Box::new(element), length }
	}
}

impl NamedMember {
	pub fn new(name: impl Into<String>, ty: SchemaType) -> Self {
		Self { name: name.into(), ty }
	}
}
