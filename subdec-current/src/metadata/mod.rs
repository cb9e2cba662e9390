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

//! The v14 metadata payload: portable registry, pallets, extrinsic format.
//!
//! Pallets address their calls and events through registry type ids; the
//! pointed-at type must be a variant type whose cases are the calls/events.

use crate::si::{self, PortableRegistry, Si1Type, Si1TypeDef, Si1Variant, TypeId};
use subdec_scale::{codec, ByteCursor, DecodeError, DecodeErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("pallet index {0} not found (metadata v14)")]
	PalletNotFound(u8),
	#[error("pallet {0} has no calls")]
	NoCalls(String),
	#[error("pallet {0} has no events")]
	NoEvents(String),
	#[error("type {type_id} for pallet {pallet} is not a variant type")]
	NotAVariantType { pallet: String, type_id: TypeId },
	#[error(transparent)]
	Decode(#[from] DecodeError),
}

#[derive(Debug, Clone)]
pub struct Metadata {
	registry: PortableRegistry,
	pallets: Vec<Pallet>,
	extrinsic: ExtrinsicMeta,
	/// The runtime's top-level type.
	pub runtime_type: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pallet {
	pub name: String,
	pub storage: Option<Storage>,
	/// Registry id of the variant type enumerating this pallet's calls.
	pub calls: Option<TypeId>,
	/// Registry id of the variant type enumerating this pallet's events.
	pub events: Option<TypeId>,
	pub constants: Vec<ConstantDef>,
	pub errors: Option<TypeId>,
	pub index: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantDef {
	pub name: String,
	pub ty: TypeId,
	pub value: Vec<u8>,
	pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrinsicMeta {
	pub ty: TypeId,
	pub version: u8,
	pub signed_extensions: Vec<SignedExtension>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedExtension {
	pub identifier: String,
	pub ty: TypeId,
	pub additional_signed: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storage {
	pub prefix: String,
	pub entries: Vec<StorageEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
	pub name: String,
	pub modifier: StorageModifier,
	pub ty: StorageType,
	pub fallback: Vec<u8>,
	pub docs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageModifier {
	Optional,
	Default,
	Required,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
	Plain(TypeId),
	Map { hashers: Vec<StorageHasher>, key: TypeId, value: TypeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageHasher {
	Blake2_128,
	Blake2_256,
	Blake2_128Concat,
	Twox128,
	Twox256,
	Twox64Concat,
	Identity,
}

impl Metadata {
	/// Decode a v14 metadata payload (after the magic marker and version
	/// byte).
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
		let mut cursor = ByteCursor::new(bytes);
		let registry =
			PortableRegistry::decode(&mut cursor).map_err(|e| e.at("lookup"))?;
		let pallets =
			codec::decode_vec(&mut cursor, decode_pallet).map_err(|e| e.at("pallets"))?;
		let extrinsic = decode_extrinsic_meta(&mut cursor).map_err(|e| e.at("extrinsic"))?;
		let runtime_type =
			si::decode_type_id(&mut cursor).map_err(|e| e.at("type"))?;
		log::debug!(
			"loaded v14 metadata with {} pallets and {} types",
			pallets.len(),
			registry.types().len()
		);
		Ok(Self { registry, pallets, extrinsic, runtime_type })
	}

	#[cfg(test)]
	pub(crate) fn from_parts(
		registry: PortableRegistry,
		pallets: Vec<Pallet>,
		extrinsic: ExtrinsicMeta,
		runtime_type: TypeId,
	) -> Self {
		Self { registry, pallets, extrinsic, runtime_type }
	}

	pub fn registry(&self) -> &PortableRegistry {
		&self.registry
	}

	pub fn pallets(&self) -> &[Pallet] {
		&self.pallets
	}

	pub fn extrinsic(&self) -> &ExtrinsicMeta {
		&self.extrinsic
	}

	pub fn pallet_by_index(&self, index: u8) -> Result<&Pallet, Error> {
		self.pallets
			.iter()
			.find(|p| p.index == index)
			.ok_or(Error::PalletNotFound(index))
	}

	/// The variant list of a pallet's call type.
	pub fn call_variants(&self, pallet: &Pallet) -> Result<&[Si1Variant], Error> {
		let type_id = pallet.calls.ok_or_else(|| Error::NoCalls(pallet.name.clone()))?;
		self.variants_of(pallet, type_id)
	}

	/// The variant list of a pallet's event type.
	pub fn event_variants(&self, pallet: &Pallet) -> Result<&[Si1Variant], Error> {
		let type_id = pallet.events.ok_or_else(|| Error::NoEvents(pallet.name.clone()))?;
		self.variants_of(pallet, type_id)
	}

	/// The variant list behind a registry id, with the owning pallet named in
	/// the error if the id points at anything but a variant type.
	pub fn variants_of(&self, pallet: &Pallet, type_id: TypeId) -> Result<&[Si1Variant], Error> {
		let ty: &Si1Type = self.registry.resolve(type_id)?;
		match &ty.def {
			Si1TypeDef::Variant { variants } => Ok(variants),
			_ => Err(Error::NotAVariantType { pallet: pallet.name.clone(), type_id }),
		}
	}
}

fn decode_pallet(cursor: &mut ByteCursor) -> Result<Pallet, DecodeError> {
	let name = codec::decode_text(cursor).map_err(|e| e.at("name"))?;
	let storage =
		codec::decode_option(cursor, decode_storage).map_err(|e| e.at("storage"))?;
	let calls = codec::decode_option(cursor, si::decode_type_id).map_err(|e| e.at("calls"))?;
	let events =
		codec::decode_option(cursor, si::decode_type_id).map_err(|e| e.at("events"))?;
	let constants =
		codec::decode_vec(cursor, decode_constant).map_err(|e| e.at("constants"))?;
	let errors = codec::decode_option(cursor, si::decode_type_id).map_err(|e| e.at("errors"))?;
	let index = codec::decode_u8(cursor).map_err(|e| e.at("index"))?;
	Ok(Pallet { name, storage, calls, events, constants, errors, index })
}

fn decode_constant(cursor: &mut ByteCursor) -> Result<ConstantDef, DecodeError> {
	let name = codec::decode_text(cursor).map_err(|e| e.at("name"))?;
	let ty = si::decode_type_id(cursor).map_err(|e| e.at("type"))?;
	let value = codec::decode_bytes(cursor).map_err(|e| e.at("value"))?;
	let docs = codec::decode_vec(cursor, codec::decode_text).map_err(|e| e.at("docs"))?;
	Ok(ConstantDef { name, ty, value, docs })
}

fn decode_extrinsic_meta(cursor: &mut ByteCursor) -> Result<ExtrinsicMeta, DecodeError> {
	let ty = si::decode_type_id(cursor).map_err(|e| e.at("type"))?;
	let version = codec::decode_u8(cursor).map_err(|e| e.at("version"))?;
	let signed_extensions = codec::decode_vec(cursor, |c| {
		let identifier = codec::decode_text(c).map_err(|e| e.at("identifier"))?;
		let ty = si::decode_type_id(c).map_err(|e| e.at("type"))?;
		let additional_signed =
			si::decode_type_id(c).map_err(|e| e.at("additional_signed"))?;
		Ok(SignedExtension { identifier, ty, additional_signed })
	})
	.map_err(|e| e.at("signed_extensions"))?;
	Ok(ExtrinsicMeta { ty, version, signed_extensions })
}

fn decode_storage(cursor: &mut ByteCursor) -> Result<Storage, DecodeError> {
	let prefix = codec::decode_text(cursor).map_err(|e| e.at("prefix"))?;
	let entries = codec::decode_vec(cursor, decode_storage_entry).map_err(|e| e.at("entries"))?;
	Ok(Storage { prefix, entries })
}

fn decode_storage_entry(cursor: &mut ByteCursor) -> Result<StorageEntry, DecodeError> {
	let name = codec::decode_text(cursor).map_err(|e| e.at("name"))?;
	let modifier = match cursor.read_byte().map_err(|e| e.at("modifier"))? {
		0 => StorageModifier::Optional,
		1 => StorageModifier::Default,
		2 => StorageModifier::Required,
		other => {
			return Err(DecodeError::from(DecodeErrorKind::UnknownVariant {
				index: other,
				count: 3,
			})
			.at("modifier"))
		}
	};
	let ty = decode_storage_type(cursor).map_err(|e| e.at("type"))?;
	let fallback = codec::decode_bytes(cursor).map_err(|e| e.at("fallback"))?;
	let docs = codec::decode_vec(cursor, codec::decode_text).map_err(|e| e.at("docs"))?;
	Ok(StorageEntry { name, modifier, ty, fallback, docs })
}

fn decode_storage_type(cursor: &mut ByteCursor) -> Result<StorageType, DecodeError> {
	match cursor.read_byte()? {
		0 => Ok(StorageType::Plain(si::decode_type_id(cursor)?)),
		1 => {
			let hashers =
				codec::decode_vec(cursor, decode_hasher).map_err(|e| e.at("hashers"))?;
			let key = si::decode_type_id(cursor).map_err(|e| e.at("key"))?;
			let value = si::decode_type_id(cursor).map_err(|e| e.at("value"))?;
			Ok(StorageType::Map { hashers, key, value })
		}
		other => Err(DecodeErrorKind::UnknownVariant { index: other, count: 2 }.into()),
	}
}

fn decode_hasher(cursor: &mut ByteCursor) -> Result<StorageHasher, DecodeError> {
	match cursor.read_byte()? {
		0 => Ok(StorageHasher::Blake2_128),
		1 => Ok(StorageHasher::Blake2_256),
		2 => Ok(StorageHasher::Blake2_128Concat),
		3 => Ok(StorageHasher::Twox128),
		4 => Ok(StorageHasher::Twox256),
		5 => Ok(StorageHasher::Twox64Concat),
		6 => Ok(StorageHasher::Identity),
		other => Err(DecodeErrorKind::UnknownVariant { index: other, count: 7 }.into()),
	}
}
