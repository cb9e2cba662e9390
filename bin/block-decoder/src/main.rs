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

//! Decode the extrinsics and events of one block from hex dumps on disk.
//!
//! The metadata file holds the runtime's metadata blob as one hex string,
//! the extrinsics file one hex-encoded extrinsic per line (as returned by
//! `chain_getBlock`), and the events file the raw `System.Events` storage
//! value of the block.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use subdec::{DecodedExtrinsic, Decoder, EventRecord, Phase, SpecVersion};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
	/// Hex dump of the runtime metadata, starting with the 'meta' marker.
	#[arg(long)]
	metadata: PathBuf,

	/// The runtime spec version the metadata belongs to.
	#[arg(long, default_value_t = 0)]
	spec_version: SpecVersion,

	/// Hex-encoded extrinsics of the block, one per line.
	#[arg(long)]
	extrinsics: Option<PathBuf>,

	/// Hex dump of the block's System.Events storage value.
	#[arg(long)]
	events: Option<PathBuf>,

	/// Print one JSON document instead of a line per item.
	#[arg(long)]
	json: bool,
}

#[derive(Serialize)]
struct DecodedBlock {
	extrinsics: Vec<DecodedExtrinsic>,
	events: Vec<EventRecord>,
}

fn main() -> Result<()> {
	pretty_env_logger::init();
	let args = Args::parse();

	let mut decoder = Decoder::new();
	let metadata = read_hex(&args.metadata)?;
	decoder
		.register_version(args.spec_version, &metadata)
		.context("failed to parse the metadata blob")?;

	let mut extrinsics = Vec::new();
	if let Some(path) = &args.extrinsics {
		for (i, bytes) in read_hex_lines(path)?.iter().enumerate() {
			let ext = decoder
				.decode_extrinsic(args.spec_version, bytes)
				.with_context(|| format!("failed to decode extrinsic {i}"))?;
			extrinsics.push(ext);
		}
	}

	let events = match &args.events {
		Some(path) => decoder
			.decode_events(args.spec_version, &read_hex(path)?)
			.context("failed to decode the event storage value")?,
		None => Vec::new(),
	};

	if args.json {
		let block = DecodedBlock { extrinsics, events };
		println!("{}", serde_json::to_string_pretty(&block)?);
		return Ok(());
	}

	for ext in &extrinsics {
		println!("extrinsic: {}: {}", ext.call.pallet, ext.call.variant);
	}
	for record in &events {
		let ctx = match record.phase {
			Phase::ApplyExtrinsic(idx) => match extrinsics.get(idx as usize) {
				Some(ext) => format!("(ext) {}: {}", ext.call.pallet, ext.call.variant),
				None => format!("(ext {idx})"),
			},
			Phase::Initialization => "init".to_string(),
			Phase::Finalization => "fin".to_string(),
			Phase::Unknown => "unknown".to_string(),
		};
		println!("event ({ctx}): {}: {}", record.event.pallet, record.event.variant);
	}
	Ok(())
}

fn read_hex(path: &Path) -> Result<Vec<u8>> {
	let text = fs::read_to_string(path)
		.with_context(|| format!("failed to read {}", path.display()))?;
	decode_hex(text.trim())
}

fn read_hex_lines(path: &Path) -> Result<Vec<Vec<u8>>> {
	let text = fs::read_to_string(path)
		.with_context(|| format!("failed to read {}", path.display()))?;
	text.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(decode_hex)
		.collect()
}

fn decode_hex(hex_str: &str) -> Result<Vec<u8>> {
	let stripped = hex_str.strip_prefix("0x").unwrap_or(hex_str);
	hex::decode(stripped).context("invalid hex")
}
