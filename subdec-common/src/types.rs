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

use crate::{MultiAddress, MultiSignature};
use serde::Serialize;
use subdec_scale::{codec, ByteCursor, DecodeError, Value};

/// A resolved pallet call or event: names from metadata, arguments decoded
/// from the wire in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PalletVariant {
	pub pallet: String,
	pub variant: String,
	pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arg {
	pub name: String,
	pub value: Value,
}

impl Arg {
	pub fn new(name: impl Into<String>, value: Value) -> Self {
		Self { name: name.into(), value }
	}
}

/// A fully decoded extrinsic: the signature block if the extrinsic was
/// signed, and the call it dispatches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedExtrinsic {
	pub signature: Option<ExtrinsicSignature>,
	pub call: PalletVariant,
}

/// The signature block of a signed extrinsic.
///
/// `extensions` holds the decoded signed-extension payloads keyed by their
/// metadata identifier. Only v14 metadata describes these well enough to
/// decode; the legacy paths leave the list empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtrinsicSignature {
	pub address: MultiAddress,
	pub signature: MultiSignature,
	pub extensions: Vec<(String, Value)>,
}

/// One event together with the phase of block execution that emitted it.
/// Topic hashes are consumed from the wire but not retained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
	pub phase: Phase,
	pub event: PalletVariant,
}

/// When in block execution an event was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Phase {
	/// During the extrinsic at this index in the block.
	ApplyExtrinsic(u32),
	Finalization,
	Initialization,
	/// An unrecognized phase tag. Event decoding keeps going rather than
	/// failing the whole block over one record's phase byte.
	Unknown,
}

impl Phase {
	/// Decode a phase tag. Unlike every other tagged union in this workspace
	/// an unknown tag is not an error; the record is kept with its phase
	/// marked unknown.
	pub fn decode(cursor: &mut ByteCursor) -> Result<Self, DecodeError> {
		let tag = cursor.read_byte().map_err(|e| e.at("phase"))?;
		let phase = match tag {
			0 => Phase::ApplyExtrinsic(codec::decode_u32(cursor).map_err(|e| e.at("phase"))?),
			1 => Phase::Finalization,
			2 => Phase::Initialization,
			other => {
				log::warn!("unknown event phase tag {other:#04x}, continuing");
				Phase::Unknown
			}
		};
		Ok(phase)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn phase_decodes_known_tags() {
		let mut cursor = ByteCursor::new(&[0x00, 0x07, 0x00, 0x00, 0x00]);
		assert_eq!(Phase::decode(&mut cursor).unwrap(), Phase::ApplyExtrinsic(7));

		let mut cursor = ByteCursor::new(&[0x01]);
		assert_eq!(Phase::decode(&mut cursor).unwrap(), Phase::Finalization);

		let mut cursor = ByteCursor::new(&[0x02]);
		assert_eq!(Phase::decode(&mut cursor).unwrap(), Phase::Initialization);
	}

	#[test]
	fn unknown_phase_tag_is_not_fatal() {
		let mut cursor = ByteCursor::new(&[0x09]);
		assert_eq!(Phase::decode(&mut cursor).unwrap(), Phase::Unknown);
	}

	#[test]
	fn truncated_apply_extrinsic_index_is_fatal() {
		let mut cursor = ByteCursor::new(&[0x00, 0x07]);
		let err = Phase::decode(&mut cursor).unwrap_err();
		assert_eq!(
			err.to_string(),
			"phase: unexpected end of input: needed 4 byte(s) but only 2 remain"
		);
	}
}
