//! Slice-based decoder implementation.

use alloc::{string::String, vec::Vec};
use core::str;

use either::Either::{self, Left, Right};
use log::{debug, trace};
use thiserror::Error;

use crate::sans::{
    Decoder,
    element::{ElementError, Samples},
    header::{Series, SeriesHeaderError},
    offsets::{Extent, OffsetInner},
    tag::{Tag, TagError},
};

use super::{DataElement, Dimension, Element, ElementTag, SeriesDocument, SeriesHeader};

/// Errors occurring while decoding from a slice.
#[derive(Debug, Error)]
pub enum Error {
    /// Unexpectedly reached the end of the slice.
    #[error("Unexpectedly reached the end of the slice (reading at {at}).")]
    EndOfSlice { at: u64 },
    /// Incorrect series header.
    #[error("Incorrect series header: {0}")]
    Header(#[from] SeriesHeaderError),
    /// Dimension descriptor table not ending at the offset arrays.
    #[error("Dimension descriptor table ends at {found}, not at the offset arrays ({expected}).")]
    Misaligned { expected: u64, found: u64 },
    /// Descriptor text that is not valid UTF-8.
    #[error("Invalid descriptor text at {at}: {source}")]
    Text { at: u64, source: str::Utf8Error },
    /// Incorrect element tag.
    #[error("Incorrect element tag at {at}: {source}")]
    Tag { at: u64, source: TagError },
    /// Incorrect element header.
    #[error("Incorrect element header at {at}: {source}")]
    Element { at: u64, source: ElementError },
}

/// Decode a series data file from a slice into a document.
///
/// This method is also re-exported as `goniometer::avec::decode_slice`.
pub fn decode(r: &[u8]) -> Result<SeriesDocument, Error> {
    let i = &mut 0; // Counter of bytes read, used to read bytes from the tip.

    let (series, successor) = Decoder::advance(take(r, i)?)?;

    debug!(
        "decoded series header: {:?}, {:?} with {:?} tags, {} of {} elements valid",
        series.version,
        series.data_kind,
        series.tag_kind,
        series.valid_elements,
        series.total_elements,
    );

    match successor {
        Left(state) => decode_tail(state, series, r, i),
        Right(state) => decode_tail(state, series, r, i),
    }
}

/// Decode the remainder of a document, for an offset width.
fn decode_tail<T: OffsetInner<From = [u8; N]>, const N: usize>(
    state: Extent<T>,
    series: Series,
    r: &[u8],
    i: &mut usize,
) -> Result<SeriesDocument, Error> {
    let (offset_array_position, state) = state.advance(take(r, i)?);
    let (dimension_count, successor) = state.advance(take(r, i)?);

    let header = SeriesHeader {
        version: series.version,
        data_kind: series.data_kind,
        tag_kind: series.tag_kind,
        total_elements: series.total_elements,
        valid_elements: series.valid_elements,
        offset_array_position,
        dimension_count,
    };

    let Some(mut state) = successor else {
        aligned(offset_array_position, *i)?;

        return Ok(SeriesDocument {
            header,
            dimensions: Vec::new(),
            elements: Vec::new(),
        });
    };

    // Each descriptor spans at least its fixed fields.
    available(r, *i, dimension_count as u64 * 32)?;

    let mut dimensions = Vec::with_capacity(dimension_count as usize);

    let state = loop {
        let (fields, units_state) = state.advance(take(r, i)?);

        let description = text(r, i, fields.description_length)?;

        let (units_length, successor) = units_state.advance(take(r, i)?);

        let units = if units_length != 0 {
            Some(text(r, i, units_length)?)
        } else {
            None
        };

        trace!(
            "decoded dimension {}: {} elements",
            dimensions.len(),
            fields.size,
        );

        dimensions.push(Dimension {
            size: fields.size,
            calibration: fields.calibration,
            description,
            units,
        });

        state = match successor {
            Left(state) => break state,
            Right(state) => state,
        };
    };

    // The descriptor table must end exactly where the header located the
    // offset arrays; anything else is a corrupt or unsupported variant.
    aligned(offset_array_position, *i)?;

    debug!("decoded descriptor table: {} dimensions", dimension_count);

    available(r, *i, dimension_count as u64 * 2 * N as u64)?;

    let mut data_offsets = Vec::with_capacity(dimension_count as usize);
    let mut tag_offsets = Vec::with_capacity(dimension_count as usize);

    let mut data_state = state;
    let state = loop {
        let (position, successor) = data_state.advance(take(r, i)?);
        data_offsets.push(position);

        data_state = match successor {
            Left(state) => break state,
            Right(state) => state,
        };
    };

    let mut tag_state = state;
    let state = loop {
        let (position, successor) = tag_state.advance(take(r, i)?);
        tag_offsets.push(position);

        tag_state = match successor {
            Left(state) => break state,
            Right(state) => state,
        };
    };

    let mut elements = Vec::with_capacity(dimension_count as usize);
    let mut next = Some(state);

    while let Some(state) = next {
        let k = elements.len();

        let at = tag_offsets[k];
        seek(r, i, at)?;

        let (timestamp, successor) = state
            .advance(take(r, i)?)
            .map_err(|source| Error::Tag { at, source })?;

        let (position, successor) = match successor {
            Left(state) => {
                let (position, successor) = state.advance(take(r, i)?);
                (Some(position), successor)
            }
            Right(successor) => (None, successor),
        };

        let tag = ElementTag {
            timestamp,
            position,
        };

        let at = data_offsets[k];
        seek(r, i, at)?;

        let (data, successor) = match successor {
            Left(state) => {
                let (fields, successor) = state
                    .advance(take(r, i)?)
                    .map_err(|source| Error::Element { at, source })?;

                available(r, *i, fields.length as u64 * 2)?;
                let (samples, next) = collect(successor, fields.length as usize, r, i)?;

                let data = DataElement::Spectrum {
                    calibration: fields.calibration,
                    samples,
                };

                (data, next)
            }
            Right(state) => {
                let (fields, successor) = state
                    .advance(take(r, i)?)
                    .map_err(|source| Error::Element { at, source })?;

                let count = fields.width as u64 * fields.height as u64;

                available(r, *i, count * 2)?;
                let (samples, next) = collect(successor, count as usize, r, i)?;

                let data = DataElement::Image {
                    calibration: fields.calibration,
                    width: fields.width,
                    height: fields.height,
                    samples,
                };

                (data, next)
            }
        };

        trace!("decoded element {}: {} samples", k, data.samples().len());

        elements.push(Element { tag, data });
        next = successor;
    }

    debug!("decoded {} elements", elements.len());

    Ok(SeriesDocument {
        header,
        dimensions,
        elements,
    })
}

/// Collect an element's samples, returning them with the next tag state.
fn collect(
    successor: Either<Samples, Option<Tag>>,
    count: usize,
    r: &[u8],
    i: &mut usize,
) -> Result<(Vec<u16>, Option<Tag>), Error> {
    let mut state = match successor {
        Left(state) => state,
        Right(next) => return Ok((Vec::new(), next)),
    };

    let mut samples = Vec::with_capacity(count);

    loop {
        let (value, successor) = state.advance(take(r, i)?);
        samples.push(value);

        state = match successor {
            Left(next) => return Ok((samples, next)),
            Right(state) => state,
        };
    }
}

/// Check that the offset into a slice has reached the offset arrays.
fn aligned(expected: u64, i: usize) -> Result<(), Error> {
    let found = i as u64;

    if found != expected {
        Err(Error::Misaligned { expected, found })?;
    }

    Ok(())
}

/// Take an exact number of bytes from an offset in a slice, advancing the
/// offset.
fn take<const N: usize>(r: &[u8], i: &mut usize) -> Result<[u8; N], Error> {
    let s = *i;
    *i += N;

    Ok(r.get(s..*i)
        .ok_or(Error::EndOfSlice { at: s as u64 })?
        .try_into()
        .unwrap())
}

/// Take a length-prefixed text field from an offset in a slice, advancing
/// the offset.
fn text(r: &[u8], i: &mut usize, length: u32) -> Result<String, Error> {
    let s = *i;
    *i += length as usize;

    let bytes = r
        .get(s..*i)
        .ok_or(Error::EndOfSlice { at: s as u64 })?;

    let text = str::from_utf8(bytes).map_err(|source| Error::Text {
        at: s as u64,
        source,
    })?;

    Ok(text.into())
}

/// Move the offset into a slice to an absolute position.
fn seek(r: &[u8], i: &mut usize, to: u64) -> Result<(), Error> {
    if to > r.len() as u64 {
        Err(Error::EndOfSlice { at: to })?;
    }

    *i = to as usize;

    Ok(())
}

/// Check that a byte length is available past the offset into a slice.
fn available(r: &[u8], i: usize, needed: u64) -> Result<(), Error> {
    if needed > (r.len() - i) as u64 {
        Err(Error::EndOfSlice { at: i as u64 })?;
    }

    Ok(())
}
