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
use subdec_scale::{codec, ByteCursor, DecodeError, DecodeErrorKind};

/// The sender address of a signed extrinsic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiAddress {
	/// A full 32-byte account id.
	Id([u8; 32]),
	/// A compact account index.
	Index(u128),
	/// Opaque, length-prefixed bytes.
	Raw(Vec<u8>),
	Address32([u8; 32]),
	Address20([u8; 20]),
}

impl MultiAddress {
	pub fn decode(cursor: &mut ByteCursor) -> Result<Self, DecodeError> {
		let tag = cursor.read_byte().map_err(|e| e.at("address"))?;
		let address = match tag {
			0 => MultiAddress::Id(cursor.read_array()?),
			1 => MultiAddress::Index(codec::decode_compact(cursor)?),
			2 => MultiAddress::Raw(codec::decode_bytes(cursor)?),
			3 => MultiAddress::Address32(cursor.read_array()?),
			4 => MultiAddress::Address20(cursor.read_array()?),
			other => {
				return Err(DecodeError::from(DecodeErrorKind::UnknownVariant {
					index: other,
					count: 5,
				})
				.at("address"))
			}
		};
		Ok(address)
	}
}

impl Serialize for MultiAddress {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let (name, hex) = match self {
			MultiAddress::Id(bytes) => ("Id", hex::encode(bytes)),
			MultiAddress::Index(index) => {
				let mut map = serializer.serialize_map(Some(1))?;
				map.serialize_entry("Index", index)?;
				return map.end();
			}
			MultiAddress::Raw(bytes) => ("Raw", hex::encode(bytes)),
			MultiAddress::Address32(bytes) => ("Address32", hex::encode(bytes)),
			MultiAddress::Address20(bytes) => ("Address20", hex::encode(bytes)),
		};
		let mut map = serializer.serialize_map(Some(1))?;
		map.serialize_entry(name, &format!("0x{hex}"))?;
		map.end()
	}
}
