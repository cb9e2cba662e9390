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

//! The SCALE plumbing every other subdec crate is built on: a bounds-checked
//! [`ByteCursor`], the primitive codec (fixed-width integers, compact
//! integers, length-prefixed text/bytes, `Option`/`Vec` combinators), the
//! dynamically-typed [`Value`] produced by all decoders, and a schema-driven
//! decoder for values whose shape is described by a [`schema::SchemaType`].
//!
//! Decoding never panics on malformed input; every failure is a
//! [`DecodeError`] carrying the path from the decode root down to the byte
//! that could not be interpreted.

#![forbid(unsafe_code)]
#![deny(unused)]

pub mod codec;
mod cursor;
mod error;
pub mod schema;
mod value;

pub use cursor::ByteCursor;
pub use error::{DecodeError, DecodeErrorKind, PathSegment};
pub use value::{Value, VariantValue};
