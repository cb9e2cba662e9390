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

//! Extrinsic and event envelope decoding against v9-v13 metadata.

use crate::metadata::{Error, Metadata};
use crate::type_name;
use subdec_common::{
	Arg, DecodedExtrinsic, EventRecord, ExtrinsicSignature, MultiAddress, MultiSignature,
	PalletVariant, Phase,
};
use subdec_scale::{codec, ByteCursor};

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
	// From v11 each extrinsic starts with its own compact byte length. The
	// value is informational here; the decoders below consume exactly the
	// bytes the metadata says they should.
	if meta.version() >= 11 {
		codec::decode_compact(cursor).map_err(|e| e.at("length"))?;
	}

	let format = cursor.read_byte().map_err(|e| e.at("format"))?;
	// High bit flags a signature; the low seven bits are the extrinsic
	// format version, which legacy runtimes never check.
	let is_signed = format & 0b1000_0000 != 0;

	let signature = if is_signed {
		let address = MultiAddress::decode(cursor)?;
		let signature = MultiSignature::decode(cursor)?;
		// Signed-extension payloads (era, nonce, tip) are named but not
		// typed well enough to decode pre-v14; any signed extrinsic that
		// carries them will fail on the call decode below.
		Some(ExtrinsicSignature { address, signature, extensions: vec![] })
	} else {
		None
	};

	let call = decode_call(meta, cursor)?;
	Ok(DecodedExtrinsic { signature, call })
}

fn decode_call(meta: &Metadata, cursor: &mut ByteCursor) -> Result<PalletVariant, Error> {
	let pallet_index = cursor.read_byte().map_err(|e| e.at("pallet_index"))?;
	let call_index = cursor.read_byte().map_err(|e| e.at("call_index"))?;

	let pallet = meta.pallet_for_call(pallet_index)?;
	let call = meta.call_def(pallet, call_index)?;
	log::trace!("decoding call {}::{}", pallet.name, call.name);

	let mut args = Vec::with_capacity(call.args.len());
	for arg in &call.args {
		let value = type_name::decode(cursor, &arg.ty)
			.map_err(|e| e.at(arg.name.clone()).at(call.name.clone()))?;
		args.push(Arg::new(arg.name.clone(), value));
	}
	Ok(PalletVariant { pallet: pallet.name.clone(), variant: call.name.clone(), args })
}

/// Decode a block's event vector.
pub fn decode_events(meta: &Metadata, bytes: &[u8]) -> Result<Vec<EventRecord>, Error> {
	let mut cursor = ByteCursor::new(bytes);
	let count = codec::decode_compact(&mut cursor).map_err(|e| e.at("count"))?;
	let mut records = Vec::with_capacity(count as usize);
	for i in 0..count {
		let record = decode_event_record(meta, &mut cursor)
			.map_err(|e| match e {
				Error::Decode(inner) => Error::Decode(inner.at(i as usize)),
				other => other,
			})?;
		records.push(record);
	}
	Ok(records)
}

fn decode_event_record(meta: &Metadata, cursor: &mut ByteCursor) -> Result<EventRecord, Error> {
	let phase = Phase::decode(cursor)?;

	let pallet_index = cursor.read_byte().map_err(|e| e.at("pallet_index"))?;
	let event_index = cursor.read_byte().map_err(|e| e.at("event_index"))?;

	let pallet = meta.pallet_for_event(pallet_index)?;
	let event = meta.event_def(pallet, event_index)?;
	log::trace!("decoding event {}::{}", pallet.name, event.name);

	// Event arguments have types but no names pre-v14.
	let mut args = Vec::with_capacity(event.args.len());
	for (i, ty) in event.args.iter().enumerate() {
		let name = format!("arg{i}");
		let value = type_name::decode(cursor, ty)
			.map_err(|e| e.at(name.clone()).at(event.name.clone()))?;
		args.push(Arg::new(name, value));
	}

	// Topics are read to keep the cursor aligned, then dropped.
	codec::decode_vec(cursor, |c| c.read_array::<32>()).map_err(|e| e.at("topics"))?;

	Ok(EventRecord {
		phase,
		event: PalletVariant { pallet: pallet.name.clone(), variant: event.name.clone(), args },
	})
}
