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

//! Extrinsic and event decoding for metadata generations v9 through v13.
//!
//! Nothing in these generations is self-describing: call and event argument
//! types arrive as free-form strings like `Vec<Compact<Balance>>`, so
//! decoding is driven by [`type_name`]'s pattern matching rather than a type
//! registry. Pallet addressing also differs per generation; [`Metadata`]
//! normalizes all of it at load time so the decode path is a plain lookup.

pub mod decoder;
pub mod metadata;
pub mod system;
pub mod type_name;

#[cfg(test)]
pub(crate) mod test_suite;

pub use decoder::{decode_events, decode_extrinsic, decode_extrinsics};
pub use metadata::{Error as MetadataError, Metadata};
