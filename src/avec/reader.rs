//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::{io::Read, vec::Vec};

use thiserror::Error;

use super::{SeriesDocument, slice};

extern crate std;

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// An error decoding the document.
    #[error(transparent)]
    Decode(#[from] slice::Error),
}

/// Decode a series data file from a reader into a document.
///
/// The offset arrays of a series data file hold absolute positions, so the
/// reader is drained before decoding starts.
///
/// This method is also re-exported as `goniometer::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(r: &mut impl Read) -> Result<SeriesDocument, Error> {
    let mut buffer = Vec::new();
    r.read_to_end(&mut buffer)?;

    Ok(slice::decode(&buffer)?)
}
