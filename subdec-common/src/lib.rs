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

//! Wire types and decoder output types shared by the legacy (v9-v13) and
//! current (v14) halves of subdec: extrinsic addresses and signatures, event
//! phases, and the pallet/variant structures both decoders produce.

mod address;
mod signature;
mod types;

pub use address::MultiAddress;
pub use signature::MultiSignature;
pub use types::{Arg, DecodedExtrinsic, EventRecord, ExtrinsicSignature, PalletVariant, Phase};

/// The runtime spec version, used to pick a registered metadata when decoding.
pub type SpecVersion = u32;
