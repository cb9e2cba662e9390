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

//! The normalized view of v9-v13 metadata.
//!
//! Each generation is decoded by [`raw`] into the same [`Pallet`] shape;
//! what differs is how a pallet index on the wire maps to a pallet:
//!
//! - v9-v11 pallets carry no index. A call's pallet index counts through the
//!   subsequence of pallets that have calls at all, an event's through the
//!   subsequence that have events. Pallets with neither are invisible to the
//!   wire.
//! - v12-v13 pallets carry an explicit `index` byte, decoupled from list
//!   position.
//!
//! Both mappings are precomputed here when the metadata is loaded, so
//! lookups during block decoding are a slice/map access with no locking.

pub mod raw;

use std::collections::BTreeMap;
use subdec_scale::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("metadata version {0} is not a legacy version (9-13)")]
	UnsupportedVersion(u32),
	#[error("pallet index {index} not found (metadata v{version})")]
	PalletNotFound { index: u8, version: u8 },
	#[error("pallet {pallet} has no calls (metadata v{version})")]
	NoCalls { pallet: String, version: u8 },
	#[error("pallet {pallet} has no events (metadata v{version})")]
	NoEvents { pallet: String, version: u8 },
	#[error("call index {index} out of bounds for pallet {pallet} ({count} calls)")]
	CallNotFound { pallet: String, index: u8, count: usize },
	#[error("event index {index} out of bounds for pallet {pallet} ({count} events)")]
	EventNotFound { pallet: String, index: u8, count: usize },
	#[error(transparent)]
	Decode(#[from] DecodeError),
}

/// Metadata for one runtime, any generation from v9 to v13, with pallet
/// addressing resolved up front. Immutable once built; decoding only reads.
#[derive(Debug, Clone)]
pub struct Metadata {
	version: u8,
	pallets: Vec<Pallet>,
	extrinsic: Option<ExtrinsicMeta>,
	indexing: PalletIndexing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pallet {
	pub name: String,
	/// Explicit wire index, v12 onwards.
	pub index: Option<u8>,
	pub storage: Option<Storage>,
	pub calls: Option<Vec<CallDef>>,
	pub events: Option<Vec<EventDef>>,
	pub constants: Vec<ConstantDef>,
	pub errors: Vec<ErrorDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDef {
	pub name: String,
	pub args: Vec<CallArg>,
	pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArg {
	pub name: String,
	pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDef {
	pub name: String,
	/// Argument type names; events carry no argument names pre-v14.
	pub args: Vec<String>,
	pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantDef {
	pub name: String,
	pub ty: String,
	pub value: Vec<u8>,
	pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDef {
	pub name: String,
	pub docs: Vec<String>,
}

/// Extrinsic format information, present from v11 onwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrinsicMeta {
	pub version: u8,
	pub signed_extensions: Vec<String>,
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
	Plain(String),
	Map { hasher: StorageHasher, key: String, value: String, linked: bool },
	DoubleMap {
		hasher: StorageHasher,
		key1: String,
		key2: String,
		value: String,
		key2_hasher: StorageHasher,
	},
	/// v13 only.
	NMap { keys: Vec<String>, hashers: Vec<StorageHasher>, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageHasher {
	Blake2_128,
	Blake2_256,
	/// v10 onwards.
	Blake2_128Concat,
	Twox128,
	Twox256,
	Twox64Concat,
	/// v11 onwards.
	Identity,
}

/// How a wire pallet index maps into `pallets`.
#[derive(Debug, Clone)]
enum PalletIndexing {
	/// v9-v11: positions into the callable-only and eventful-only
	/// subsequences of the pallet list.
	Positional { callable: Vec<usize>, eventful: Vec<usize> },
	/// v12+: explicit index byte to list position.
	Explicit { by_index: BTreeMap<u8, usize> },
}

impl Metadata {
	/// Decode a legacy metadata payload. `bytes` is the version-specific
	/// payload, after the magic marker and version byte.
	pub fn from_bytes(version: u32, bytes: &[u8]) -> Result<Self, Error> {
		let mut cursor = subdec_scale::ByteCursor::new(bytes);
		let (pallets, extrinsic) = match version {
			9 | 10 => (raw::decode_modules(&mut cursor, version as u8)?, None),
			11 | 12 | 13 => {
				let pallets = raw::decode_modules(&mut cursor, version as u8)?;
				let extrinsic = raw::decode_extrinsic_meta(&mut cursor)?;
				(pallets, Some(extrinsic))
			}
			other => return Err(Error::UnsupportedVersion(other)),
		};
		Ok(Self::from_parts(version as u8, pallets, extrinsic))
	}

	/// Build metadata from already-decoded pallets, computing the index
	/// structures for the generation's addressing scheme.
	pub fn from_parts(version: u8, pallets: Vec<Pallet>, extrinsic: Option<ExtrinsicMeta>) -> Self {
		let indexing = if version >= 12 {
			let mut by_index = BTreeMap::new();
			for (pos, pallet) in pallets.iter().enumerate() {
				// Index is always set by the v12/v13 decoders.
				if let Some(index) = pallet.index {
					by_index.insert(index, pos);
				}
			}
			PalletIndexing::Explicit { by_index }
		} else {
			let mut callable = Vec::new();
			let mut eventful = Vec::new();
			for (pos, pallet) in pallets.iter().enumerate() {
				if pallet.calls.as_ref().is_some_and(|c| !c.is_empty()) {
					callable.push(pos);
				}
				if pallet.events.as_ref().is_some_and(|e| !e.is_empty()) {
					eventful.push(pos);
				}
			}
			PalletIndexing::Positional { callable, eventful }
		};
		log::debug!("loaded v{version} metadata with {} pallets", pallets.len());
		Self { version, pallets, extrinsic, indexing }
	}

	pub fn version(&self) -> u8 {
		self.version
	}

	pub fn pallets(&self) -> &[Pallet] {
		&self.pallets
	}

	pub fn extrinsic(&self) -> Option<&ExtrinsicMeta> {
		self.extrinsic.as_ref()
	}

	/// The pallet a wire pallet index refers to in call position.
	pub fn pallet_for_call(&self, index: u8) -> Result<&Pallet, Error> {
		let pos = match &self.indexing {
			PalletIndexing::Positional { callable, .. } => callable.get(index as usize).copied(),
			PalletIndexing::Explicit { by_index } => by_index.get(&index).copied(),
		};
		pos.map(|p| &self.pallets[p])
			.ok_or(Error::PalletNotFound { index, version: self.version })
	}

	/// The pallet a wire pallet index refers to in event position.
	pub fn pallet_for_event(&self, index: u8) -> Result<&Pallet, Error> {
		let pos = match &self.indexing {
			PalletIndexing::Positional { eventful, .. } => eventful.get(index as usize).copied(),
			PalletIndexing::Explicit { by_index } => by_index.get(&index).copied(),
		};
		pos.map(|p| &self.pallets[p])
			.ok_or(Error::PalletNotFound { index, version: self.version })
	}

	pub fn call_def<'a>(&self, pallet: &'a Pallet, index: u8) -> Result<&'a CallDef, Error> {
		let calls = pallet.calls.as_deref().ok_or_else(|| Error::NoCalls {
			pallet: pallet.name.clone(),
			version: self.version,
		})?;
		calls.get(index as usize).ok_or_else(|| Error::CallNotFound {
			pallet: pallet.name.clone(),
			index,
			count: calls.len(),
		})
	}

	pub fn event_def<'a>(&self, pallet: &'a Pallet, index: u8) -> Result<&'a EventDef, Error> {
		let events = pallet.events.as_deref().ok_or_else(|| Error::NoEvents {
			pallet: pallet.name.clone(),
			version: self.version,
		})?;
		events.get(index as usize).ok_or_else(|| Error::EventNotFound {
			pallet: pallet.name.clone(),
			index,
			count: events.len(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_suite;

	#[test]
	fn positional_indexing_skips_pallets_without_calls() {
		// First pallet has events only, second has calls only. A call tagged
		// with pallet index 0 must land on the second pallet.
		let meta = Metadata::from_parts(
			9,
			vec![
				test_suite::pallet("System", None, vec![], vec![("NewAccount", vec![])]),
				test_suite::pallet(
					"Balances",
					None,
					vec![("transfer", vec![("dest", "AccountId")])],
					vec![],
				),
			],
			None,
		);
		assert_eq!(meta.pallet_for_call(0).unwrap().name, "Balances");
		assert_eq!(meta.pallet_for_event(0).unwrap().name, "System");
		assert!(matches!(
			meta.pallet_for_call(1),
			Err(Error::PalletNotFound { index: 1, version: 9 })
		));
	}

	#[test]
	fn explicit_indexing_ignores_list_order() {
		let pallets = vec![
			test_suite::pallet("Balances", Some(5), vec![("transfer", vec![])], vec![]),
			test_suite::pallet("System", Some(0), vec![("remark", vec![])], vec![]),
		];
		let mut reversed = pallets.clone();
		reversed.reverse();

		let meta = Metadata::from_parts(12, pallets, None);
		let meta_reversed = Metadata::from_parts(12, reversed, None);
		for m in [&meta, &meta_reversed] {
			assert_eq!(m.pallet_for_call(5).unwrap().name, "Balances");
			assert_eq!(m.pallet_for_call(0).unwrap().name, "System");
		}
	}

	#[test]
	fn building_the_index_does_not_grow_the_pallet_list() {
		let meta = Metadata::from_parts(
			9,
			vec![test_suite::pallet("System", None, vec![("remark", vec![])], vec![])],
			None,
		);
		assert_eq!(meta.pallets().len(), 1);
	}

	#[test]
	fn call_index_equal_to_count_is_out_of_bounds() {
		let meta = Metadata::from_parts(
			9,
			vec![test_suite::pallet("System", None, vec![("remark", vec![])], vec![])],
			None,
		);
		let pallet = meta.pallet_for_call(0).unwrap();
		assert_eq!(meta.call_def(pallet, 0).unwrap().name, "remark");
		assert!(matches!(
			meta.call_def(pallet, 1),
			Err(Error::CallNotFound { index: 1, count: 1, .. })
		));
	}
}
