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

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use subdec_scale::{ByteCursor, DecodeError, DecodeErrorKind};

/// The signature blob of a signed extrinsic. Only the structure is decoded;
/// nothing here verifies anything cryptographically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiSignature {
	Ed25519([u8; 64]),
	Sr25519([u8; 64]),
	/// Recoverable signature, one extra recovery byte.
	Ecdsa([u8; 65]),
}

impl MultiSignature {
	pub fn decode(cursor: &mut ByteCursor) -> Result<Self, DecodeError> {
		let tag = cursor.read_byte().map_err(|e| e.at("signature"))?;
		let signature = match tag {
			0 => MultiSignature::Ed25519(cursor.read_array()?),
			1 => MultiSignature::Sr25519(cursor.read_array()?),
			2 => MultiSignature::Ecdsa(cursor.read_array()?),
			other => {
				return Err(DecodeError::from(DecodeErrorKind::UnknownVariant {
					index: other,
					count: 3,
				})
				.at("signature"))
			}
		};
		Ok(signature)
	}
}

impl Serialize for MultiSignature {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let (name, hex) = match self {
			MultiSignature::Ed25519(bytes) => ("Ed25519", hex::encode(bytes)),
			MultiSignature::Sr25519(bytes) => ("Sr25519", hex::encode(bytes)),
			MultiSignature::Ecdsa(bytes) => ("Ecdsa", hex::encode(bytes)),
		};
		let mut map = serializer.serialize_map(Some(1))?;
		map.serialize_entry(name, &format!("0x{hex}"))?;
		map.end()
	}
}
