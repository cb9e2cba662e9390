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

//! Extrinsic and event decoding for v14 metadata.
//!
//! v14 is the first self-describing generation: the metadata carries a
//! portable type registry mapping numeric IDs to full type definitions, and
//! every call/event argument and signed extension is a registry ID. Decoding
//! is structural recursion over the registry; no type-name strings are
//! involved.

pub mod decoder;
pub mod metadata;
pub mod si;

pub use decoder::{decode_events, decode_extrinsic, decode_extrinsics};
pub use metadata::{Error as MetadataError, Metadata};
pub use si::{PortableRegistry, Primitive, Si1Field, Si1Type, Si1TypeDef, Si1Variant, TypeId};
