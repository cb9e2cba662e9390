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

use subdec_common::SpecVersion;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("metadata does not start with the 'meta' magic marker")]
	BadMagic,
	#[error("metadata v{0} is not supported (v9 through v14 are)")]
	UnsupportedVersion(u8),
	#[error("spec version {0} not registered with the decoder")]
	SpecVersionNotFound(SpecVersion),
	#[error(transparent)]
	Legacy(#[from] subdec_legacy::MetadataError),
	#[error(transparent)]
	Current(#[from] subdec_current::MetadataError),
}
