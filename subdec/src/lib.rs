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

//! Facade crate for decoding block data against any metadata version (v9-v14).
//!
//! A [`Decoder`] holds one parsed metadata per runtime spec version. Metadata
//! blobs are registered once, then extrinsics and events from any block built
//! by that runtime decode against it. v9 through v13 go through the
//! type-name-driven legacy path, v14 through the portable type registry.

#![forbid(unsafe_code)]
#![deny(unused)]

mod error;

use std::collections::HashMap;

pub use error::Error;
pub use subdec_common::{
	Arg, DecodedExtrinsic, EventRecord, ExtrinsicSignature, MultiAddress, MultiSignature,
	PalletVariant, Phase, SpecVersion,
};
pub use subdec_scale::Value;

/// Every metadata blob starts with this marker, then one version byte.
const META_MAGIC: [u8; 4] = *b"meta";

enum VersionedMetadata {
	Legacy(subdec_legacy::Metadata),
	Current(subdec_current::Metadata),
}

/// Decodes extrinsics and events for every runtime version registered with it.
#[derive(Default)]
pub struct Decoder {
	versions: HashMap<SpecVersion, VersionedMetadata>,
}

impl Decoder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register the metadata a runtime publishes under `spec_version`. The
	/// blob is the raw SCALE bytes beginning with the `meta` magic marker.
	pub fn register_version(
		&mut self,
		spec_version: SpecVersion,
		bytes: &[u8],
	) -> Result<(), Error> {
		if bytes.len() < 5 || bytes[..4] != META_MAGIC {
			return Err(Error::BadMagic);
		}
		let version = bytes[4];
		let payload = &bytes[5..];
		let metadata = match version {
			9..=13 => VersionedMetadata::Legacy(subdec_legacy::Metadata::from_bytes(
				u32::from(version),
				payload,
			)?),
			14 => VersionedMetadata::Current(subdec_current::Metadata::from_bytes(payload)?),
			other => return Err(Error::UnsupportedVersion(other)),
		};
		log::debug!("registered metadata v{version} for spec version {spec_version}");
		self.versions.insert(spec_version, metadata);
		Ok(())
	}

	pub fn has_version(&self, spec_version: SpecVersion) -> bool {
		self.versions.contains_key(&spec_version)
	}

	/// Decode a single extrinsic blob against a registered runtime.
	pub fn decode_extrinsic(
		&self,
		spec_version: SpecVersion,
		bytes: &[u8],
	) -> Result<DecodedExtrinsic, Error> {
		match self.metadata(spec_version)? {
			VersionedMetadata::Legacy(meta) => Ok(subdec_legacy::decode_extrinsic(meta, bytes)?),
			VersionedMetadata::Current(meta) => Ok(subdec_current::decode_extrinsic(meta, bytes)?),
		}
	}

	/// Decode a block body: a compact count followed by each extrinsic.
	pub fn decode_extrinsics(
		&self,
		spec_version: SpecVersion,
		bytes: &[u8],
	) -> Result<Vec<DecodedExtrinsic>, Error> {
		match self.metadata(spec_version)? {
			VersionedMetadata::Legacy(meta) => Ok(subdec_legacy::decode_extrinsics(meta, bytes)?),
			VersionedMetadata::Current(meta) => {
				Ok(subdec_current::decode_extrinsics(meta, bytes)?)
			}
		}
	}

	/// Decode the `System.Events` storage value of a block.
	pub fn decode_events(
		&self,
		spec_version: SpecVersion,
		bytes: &[u8],
	) -> Result<Vec<EventRecord>, Error> {
		match self.metadata(spec_version)? {
			VersionedMetadata::Legacy(meta) => Ok(subdec_legacy::decode_events(meta, bytes)?),
			VersionedMetadata::Current(meta) => Ok(subdec_current::decode_events(meta, bytes)?),
		}
	}

	fn metadata(&self, spec_version: SpecVersion) -> Result<&VersionedMetadata, Error> {
		self.versions.get(&spec_version).ok_or(Error::SpecVersionNotFound(spec_version))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use codec::{Compact, Encode};

	// A v9 runtime with a single callable pallet:
	// Balances.transfer(dest: AccountId, value: Compact<Balance>).
	fn v9_metadata_bytes() -> Vec<u8> {
		let modules = vec![(
			"Balances".to_string(),
			None::<()>,
			Some(vec![(
				"transfer".to_string(),
				vec![
					("dest".to_string(), "AccountId".to_string()),
					("value".to_string(), "Compact<Balance>".to_string()),
				],
				Vec::<String>::new(),
			)]),
			None::<Vec<()>>,
			Vec::<u8>::new(),
			Vec::<u8>::new(),
		)];
		let mut bytes = META_MAGIC.to_vec();
		bytes.push(9);
		bytes.extend(modules.encode());
		bytes
	}

	// A v14 runtime with System.remark(value: u32) at pallet index 0.
	fn v14_metadata_bytes() -> Vec<u8> {
		let types = vec![
			(
				Compact(0u32),
				(Vec::<String>::new(), Vec::<u8>::new(), (5u8, 5u8), Vec::<String>::new()),
			)
				.encode(),
			(
				Compact(1u32),
				(
					vec!["pallet_system".to_string(), "Call".to_string()],
					Vec::<u8>::new(),
					(
						1u8,
						vec![(
							"remark".to_string(),
							vec![(
								Some("value".to_string()),
								Compact(0u32),
								None::<String>,
								Vec::<String>::new(),
							)],
							0u8,
							Vec::<String>::new(),
						)],
					),
					Vec::<String>::new(),
				),
			)
				.encode(),
		];
		let mut bytes = META_MAGIC.to_vec();
		bytes.push(14);
		bytes.extend(Compact(types.len() as u32).encode());
		for entry in types {
			bytes.extend(entry);
		}
		bytes.extend(Compact(1u32).encode());
		bytes.extend(
			(
				"System".to_string(),
				None::<()>,
				Some(Compact(1u32)),
				None::<()>,
				Vec::<u8>::new(),
				None::<()>,
				0u8,
			)
				.encode(),
		);
		bytes.extend((Compact(0u32), 4u8, Vec::<u8>::new(), Compact(0u32)).encode());
		bytes
	}

	#[test]
	fn rejects_blobs_without_the_magic_marker() {
		let mut decoder = Decoder::new();
		assert!(matches!(decoder.register_version(100, b"nope\x09"), Err(Error::BadMagic)));
		assert!(matches!(decoder.register_version(100, b"met"), Err(Error::BadMagic)));
	}

	#[test]
	fn rejects_metadata_versions_outside_the_window() {
		let mut decoder = Decoder::new();
		assert!(matches!(
			decoder.register_version(100, b"meta\x08"),
			Err(Error::UnsupportedVersion(8))
		));
		assert!(matches!(
			decoder.register_version(100, b"meta\x0f"),
			Err(Error::UnsupportedVersion(15))
		));
	}

	#[test]
	fn unregistered_spec_versions_are_an_error() {
		let decoder = Decoder::new();
		assert!(matches!(
			decoder.decode_extrinsic(42, &[0x04]),
			Err(Error::SpecVersionNotFound(42))
		));
	}

	#[test]
	fn dispatches_v9_blocks_to_the_legacy_path() {
		let mut decoder = Decoder::new();
		decoder.register_version(1020, &v9_metadata_bytes()).unwrap();
		assert!(decoder.has_version(1020));

		// v9 extrinsics carry no length prefix.
		let mut bytes = vec![0x04, 0x00, 0x00];
		bytes.extend([0x11; 32]);
		bytes.extend(Compact(1_000u128).encode());

		let ext = decoder.decode_extrinsic(1020, &bytes).unwrap();
		assert_eq!(ext.call.pallet, "Balances");
		assert_eq!(ext.call.variant, "transfer");
		assert_eq!(ext.call.args[1].value, Value::Uint(1_000));
	}

	#[test]
	fn dispatches_v14_blocks_to_the_registry_path() {
		let mut decoder = Decoder::new();
		decoder.register_version(9100, &v14_metadata_bytes()).unwrap();

		let payload = vec![0x04, 0x00, 0x00, 0x2A, 0x00, 0x00, 0x00];
		let mut bytes = Compact(payload.len() as u32).encode();
		bytes.extend(payload);

		let ext = decoder.decode_extrinsic(9100, &bytes).unwrap();
		assert_eq!(ext.call.pallet, "System");
		assert_eq!(ext.call.variant, "remark");
		assert_eq!(ext.call.args[0].name, "value");
		assert_eq!(ext.call.args[0].value, Value::Uint(42));
	}

	#[test]
	fn decoded_extrinsics_serialize_to_json() {
		let mut decoder = Decoder::new();
		decoder.register_version(1020, &v9_metadata_bytes()).unwrap();

		let mut bytes = vec![0x04, 0x00, 0x00];
		bytes.extend([0x11; 32]);
		bytes.extend(Compact(1_000u128).encode());

		let ext = decoder.decode_extrinsic(1020, &bytes).unwrap();
		let json = serde_json::to_value(&ext).unwrap();
		assert_eq!(json["call"]["pallet"], "Balances");
		assert_eq!(json["call"]["args"][0]["value"], format!("0x{}", "11".repeat(32)));
	}
}
