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

use std::fmt;

/// One step of the path from the decode root down to a failure: a struct
/// field or variant name, or an index into a tuple/sequence/array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
	Name(String),
	Index(usize),
}

impl fmt::Display for PathSegment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			// Bracket names that would be ambiguous inside a '/'-joined path.
			PathSegment::Name(name) if name.contains([' ', '/']) => write!(f, "[{name}]"),
			PathSegment::Name(name) => write!(f, "{name}"),
			PathSegment::Index(idx) => write!(f, "{idx}"),
		}
	}
}

impl From<&str> for PathSegment {
	fn from(name: &str) -> Self {
		PathSegment::Name(name.to_string())
	}
}

impl From<String> for PathSegment {
	fn from(name: String) -> Self {
		PathSegment::Name(name)
	}
}

impl From<usize> for PathSegment {
	fn from(idx: usize) -> Self {
		PathSegment::Index(idx)
	}
}

/// Everything that can go wrong while decoding SCALE bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeErrorKind {
	#[error("unexpected end of input: needed {needed} byte(s) but only {remaining} remain")]
	OutOfBounds { needed: usize, remaining: usize },
	#[error("length {length} is larger than the {remaining} byte(s) remaining")]
	MalformedLength { length: u128, remaining: usize },
	#[error("invalid boolean byte {0:#04x}")]
	InvalidBool(u8),
	#[error("bytes are not valid utf8")]
	InvalidUtf8,
	#[error("compact integer of {0} bytes does not fit in 128 bits")]
	CompactTooLarge(usize),
	#[error("enum index {index} out of bounds ({count} variants)")]
	UnknownVariant { index: u8, count: usize },
	#[error("variant index {index} not found for type {type_id}")]
	UnknownVariantIndex { index: u8, type_id: u32 },
	#[error("type id {0} not found in the portable registry")]
	UnresolvedTypeId(u32),
	#[error("unsupported type '{0}'")]
	UnsupportedType(String),
	#[error("import types are not resolvable at decode time: {module}.{item}")]
	UnresolvedImport { module: String, item: String },
	#[error("unsupported bit length {0}")]
	UnsupportedBitLength(usize),
	#[error("historic type '{0}' cannot be decoded through the portable registry")]
	HistoricType(String),
}

/// A decode failure together with the path at which it happened.
///
/// Each enclosing decode call wraps errors bubbling out of its children with
/// [`DecodeError::at`], so that by the time an error reaches the caller its
/// path spells out the full route from the decode root to the failing
/// primitive, e.g. `transfer/dest/0: unexpected end of input`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
	// Innermost segment first; rendered outermost-first by `Display`.
	path: Vec<PathSegment>,
	kind: DecodeErrorKind,
}

impl DecodeError {
	pub fn new(kind: DecodeErrorKind) -> Self {
		Self { path: Vec::new(), kind }
	}

	/// Prepend a path segment, marking where in the enclosing structure the
	/// inner error occurred.
	pub fn at(mut self, segment: impl Into<PathSegment>) -> Self {
		self.path.push(segment.into());
		self
	}

	pub fn kind(&self) -> &DecodeErrorKind {
		&self.kind
	}

	/// The accumulated path, outermost segment first.
	pub fn path(&self) -> impl Iterator<Item = &PathSegment> {
		self.path.iter().rev()
	}
}

impl From<DecodeErrorKind> for DecodeError {
	fn from(kind: DecodeErrorKind) -> Self {
		Self::new(kind)
	}
}

impl fmt::Display for DecodeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for segment in self.path() {
			if !first {
				write!(f, "/")?;
			}
			write!(f, "{segment}")?;
			first = false;
		}
		if !first {
			write!(f, ": ")?;
		}
		write!(f, "{}", self.kind)
	}
}

impl std::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn path_renders_outermost_first() {
		let err = DecodeError::new(DecodeErrorKind::InvalidBool(0x02))
			.at(2usize)
			.at("dest")
			.at("transfer");
		assert_eq!(err.to_string(), "transfer/dest/2: invalid boolean byte 0x02");
	}

	#[test]
	fn ambiguous_segments_are_bracketed() {
		let err = DecodeError::new(DecodeErrorKind::InvalidUtf8).at("some name");
		assert_eq!(err.to_string(), "[some name]: bytes are not valid utf8");
	}

	#[test]
	fn bare_error_has_no_path_prefix() {
		let err = DecodeError::new(DecodeErrorKind::UnresolvedTypeId(42));
		assert_eq!(err.to_string(), "type id 42 not found in the portable registry");
	}
}
