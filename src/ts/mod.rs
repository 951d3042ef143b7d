// SPDX-License-Identifier: PMPL-1.0-or-later

//! Qt Linguist TS format support

mod reader;
mod writer;

pub use reader::{decode, parse_str, read_file};
pub use writer::{escape_text, to_ts_string, write_file};
