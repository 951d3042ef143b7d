// SPDX-License-Identifier: PMPL-1.0-or-later

//! tslingo: Qt Linguist translation catalogs, read, checked and served.
//!
//! This crate reads and writes TS catalogs (the XML files `lupdate`
//! produces and translators edit), answers runtime lookups the way a Qt
//! translator does, and checks catalogs for the mistakes that break a
//! translated UI.
//!
//! MAIN PIECES:
//! 1. **ts**: lossless TS 1.1/2.0/2.1 reader and lupdate-style writer.
//! 2. **translator**: context/disambiguation lookup, plural form
//!    selection and `%n` substitution, with layered translators.
//! 3. **check** and **merge**: Linguist-style validation and
//!    template synchronisation.
//! 4. **report** and **sweep**: statistics, SARIF, directory scans.

pub mod check;
pub mod config;
pub mod error;
pub mod locale;
pub mod merge;
pub mod placeholder;
pub mod plural;
pub mod report;
pub mod sweep;
pub mod translator;
pub mod ts;
pub mod types;

pub use error::{Result, TsError};
