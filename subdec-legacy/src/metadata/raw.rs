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

//! Byte-level decoding of the v9-v13 metadata payloads.
//!
//! The generations share one module layout and differ in small increments:
//! v10 adds the `Blake2_128Concat` hasher, v11 adds `Identity` and the
//! trailing extrinsic section, v12 appends an explicit `index` byte to each
//! module, v13 adds the `NMap` storage kind. One decoder handles all five,
//! gated on the version.

use super::{
	CallArg, CallDef, ConstantDef, ErrorDef, EventDef, ExtrinsicMeta, Pallet, Storage,
	StorageEntry, StorageHasher, StorageModifier, StorageType,
};
use subdec_scale::{codec, ByteCursor, DecodeError, DecodeErrorKind};

pub fn decode_modules(cursor: &mut ByteCursor, version: u8) -> Result<Vec<Pallet>, DecodeError> {
	codec::decode_vec(cursor, |c| decode_module(c, version)).map_err(|e| e.at("modules"))
}

pub fn decode_extrinsic_meta(cursor: &mut ByteCursor) -> Result<ExtrinsicMeta, DecodeError> {
	let version = codec::decode_u8(cursor).map_err(|e| e.at("version").at("extrinsic"))?;
	let signed_extensions = codec::decode_vec(cursor, codec::decode_text)
		.map_err(|e| e.at("signed_extensions").at("extrinsic"))?;
	Ok(ExtrinsicMeta { version, signed_extensions })
}

fn decode_module(cursor: &mut ByteCursor, version: u8) -> Result<Pallet, DecodeError> {
	let name = codec::decode_text(cursor).map_err(|e| e.at("name"))?;
	let storage = codec::decode_option(cursor, |c| decode_storage(c, version))
		.map_err(|e| e.at("storage"))?;
	let calls = codec::decode_option(cursor, |c| codec::decode_vec(c, decode_call))
		.map_err(|e| e.at("calls"))?;
	let events = codec::decode_option(cursor, |c| codec::decode_vec(c, decode_event))
		.map_err(|e| e.at("events"))?;
	let constants =
		codec::decode_vec(cursor, decode_constant).map_err(|e| e.at("constants"))?;
	let errors = codec::decode_vec(cursor, decode_error_def).map_err(|e| e.at("errors"))?;
	let index = if version >= 12 {
		Some(codec::decode_u8(cursor).map_err(|e| e.at("index"))?)
	} else {
		None
	};
	Ok(Pallet { name, index, storage, calls, events, constants, errors })
}

fn decode_call(cursor: &mut ByteCursor) -> Result<CallDef, DecodeError> {
	let name = codec::decode_text(cursor).map_err(|e| e.at("name"))?;
	let args = codec::decode_vec(cursor, |c| {
		let name = codec::decode_text(c).map_err(|e| e.at("name"))?;
		let ty = codec::decode_text(c).map_err(|e| e.at("type"))?;
		Ok(CallArg { name, ty })
	})
	.map_err(|e| e.at("args"))?;
	let docs = codec::decode_vec(cursor, codec::decode_text).map_err(|e| e.at("docs"))?;
	Ok(CallDef { name, args, docs })
}

fn decode_event(cursor: &mut ByteCursor) -> Result<EventDef, DecodeError> {
	let name = codec::decode_text(cursor).map_err(|e| e.at("name"))?;
	let args = codec::decode_vec(cursor, codec::decode_text).map_err(|e| e.at("args"))?;
	let docs = codec::decode_vec(cursor, codec::decode_text).map_err(|e| e.at("docs"))?;
	Ok(EventDef { name, args, docs })
}

fn decode_constant(cursor: &mut ByteCursor) -> Result<ConstantDef, DecodeError> {
	let name = codec::decode_text(cursor).map_err(|e| e.at("name"))?;
	let ty = codec::decode_text(cursor).map_err(|e| e.at("type"))?;
	let value = codec::decode_bytes(cursor).map_err(|e| e.at("value"))?;
	let docs = codec::decode_vec(cursor, codec::decode_text).map_err(|e| e.at("docs"))?;
	Ok(ConstantDef { name, ty, value, docs })
}

fn decode_error_def(cursor: &mut ByteCursor) -> Result<ErrorDef, DecodeError> {
	let name = codec::decode_text(cursor).map_err(|e| e.at("name"))?;
	let docs = codec::decode_vec(cursor, codec::decode_text).map_err(|e| e.at("docs"))?;
	Ok(ErrorDef { name, docs })
}

fn decode_storage(cursor: &mut ByteCursor, version: u8) -> Result<Storage, DecodeError> {
	let prefix = codec::decode_text(cursor).map_err(|e| e.at("prefix"))?;
	let entries = codec::decode_vec(cursor, |c| decode_storage_entry(c, version))
		.map_err(|e| e.at("entries"))?;
	Ok(Storage { prefix, entries })
}

fn decode_storage_entry(cursor: &mut ByteCursor, version: u8) -> Result<StorageEntry, DecodeError> {
	let name = codec::decode_text(cursor).map_err(|e| e.at("name"))?;
	let modifier = decode_modifier(cursor).map_err(|e| e.at("modifier"))?;
	let ty = decode_storage_type(cursor, version).map_err(|e| e.at("type"))?;
	let fallback = codec::decode_bytes(cursor).map_err(|e| e.at("fallback"))?;
	let docs = codec::decode_vec(cursor, codec::decode_text).map_err(|e| e.at("docs"))?;
	Ok(StorageEntry { name, modifier, ty, fallback, docs })
}

fn decode_modifier(cursor: &mut ByteCursor) -> Result<StorageModifier, DecodeError> {
	match cursor.read_byte()? {
		0 => Ok(StorageModifier::Optional),
		1 => Ok(StorageModifier::Default),
		2 => Ok(StorageModifier::Required),
		other => Err(DecodeErrorKind::UnknownVariant { index: other, count: 3 }.into()),
	}
}

fn decode_storage_type(cursor: &mut ByteCursor, version: u8) -> Result<StorageType, DecodeError> {
	let tag = cursor.read_byte()?;
	match tag {
		0 => Ok(StorageType::Plain(codec::decode_text(cursor)?)),
		1 => {
			let hasher = decode_hasher(cursor, version).map_err(|e| e.at("hasher"))?;
			let key = codec::decode_text(cursor).map_err(|e| e.at("key"))?;
			let value = codec::decode_text(cursor).map_err(|e| e.at("value"))?;
			let linked = codec::decode_bool(cursor).map_err(|e| e.at("linked"))?;
			Ok(StorageType::Map { hasher, key, value, linked })
		}
		2 => {
			let hasher = decode_hasher(cursor, version).map_err(|e| e.at("hasher"))?;
			let key1 = codec::decode_text(cursor).map_err(|e| e.at("key1"))?;
			let key2 = codec::decode_text(cursor).map_err(|e| e.at("key2"))?;
			let value = codec::decode_text(cursor).map_err(|e| e.at("value"))?;
			let key2_hasher = decode_hasher(cursor, version).map_err(|e| e.at("key2_hasher"))?;
			Ok(StorageType::DoubleMap { hasher, key1, key2, value, key2_hasher })
		}
		3 if version >= 13 => {
			let keys = codec::decode_vec(cursor, codec::decode_text).map_err(|e| e.at("keys"))?;
			let hashers = codec::decode_vec(cursor, |c| decode_hasher(c, version))
				.map_err(|e| e.at("hashers"))?;
			let value = codec::decode_text(cursor).map_err(|e| e.at("value"))?;
			Ok(StorageType::NMap { keys, hashers, value })
		}
		other => {
			let count = if version >= 13 { 4 } else { 3 };
			Err(DecodeErrorKind::UnknownVariant { index: other, count }.into())
		}
	}
}

// v9 has no Blake2_128Concat, so the tags above it shift by one; Identity
// only exists from v11.
fn decode_hasher(cursor: &mut ByteCursor, version: u8) -> Result<StorageHasher, DecodeError> {
	let tag = cursor.read_byte()?;
	if version == 9 {
		return match tag {
			0 => Ok(StorageHasher::Blake2_128),
			1 => Ok(StorageHasher::Blake2_256),
			2 => Ok(StorageHasher::Twox128),
			3 => Ok(StorageHasher::Twox256),
			4 => Ok(StorageHasher::Twox64Concat),
			other => Err(DecodeErrorKind::UnknownVariant { index: other, count: 5 }.into()),
		};
	}
	match tag {
		0 => Ok(StorageHasher::Blake2_128),
		1 => Ok(StorageHasher::Blake2_256),
		2 => Ok(StorageHasher::Blake2_128Concat),
		3 => Ok(StorageHasher::Twox128),
		4 => Ok(StorageHasher::Twox256),
		5 => Ok(StorageHasher::Twox64Concat),
		6 if version >= 11 => Ok(StorageHasher::Identity),
		other => {
			let count = if version >= 11 { 7 } else { 6 };
			Err(DecodeErrorKind::UnknownVariant { index: other, count }.into())
		}
	}
}
