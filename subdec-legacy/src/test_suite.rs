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

//! Helpers for building mock metadata in tests.

use crate::metadata::{CallArg, CallDef, EventDef, Pallet};
use codec::Encode;

/// A pallet with the given calls `(name, [(arg_name, arg_type)])` and events
/// `(name, [arg_type])`. Empty lists become `None`, matching how a pallet
/// without calls or events appears on the wire.
pub fn pallet(
	name: &str,
	index: Option<u8>,
	calls: Vec<(&str, Vec<(&str, &str)>)>,
	events: Vec<(&str, Vec<&str>)>,
) -> Pallet {
	let calls = if calls.is_empty() {
		None
	} else {
		Some(
			calls
				.into_iter()
				.map(|(name, args)| CallDef {
					name: name.to_string(),
					args: args
						.into_iter()
						.map(|(name, ty)| CallArg { name: name.to_string(), ty: ty.to_string() })
						.collect(),
					docs: vec![],
				})
				.collect(),
		)
	};
	let events = if events.is_empty() {
		None
	} else {
		Some(
			events
				.into_iter()
				.map(|(name, args)| EventDef {
					name: name.to_string(),
					args: args.into_iter().map(str::to_string).collect(),
					docs: vec![],
				})
				.collect(),
		)
	};
	Pallet { name: name.to_string(), index, storage: None, calls, events, constants: vec![], errors: vec![] }
}

/// A two-module v9 payload: `System` with one event and no calls, `Balances`
/// with one call and no events.
pub fn encode_v9_modules() -> Vec<u8> {
	vec![
		(
			"System".to_string(),
			None::<()>,
			None::<()>,
			Some(vec![(
				"NewAccount".to_string(),
				vec!["AccountId".to_string()],
				Vec::<String>::new(),
			)]),
			Vec::<u8>::new(),
			Vec::<u8>::new(),
		)
			.encode(),
		(
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
			None::<()>,
			Vec::<u8>::new(),
			Vec::<u8>::new(),
		)
			.encode(),
	]
	.into_iter()
	.fold(codec::Compact(2u32).encode(), |mut acc, module| {
		acc.extend(module);
		acc
	})
}
