//! States processing data elements.

use either::Either::{self, Left, Right};
use thiserror::Error;
use zerocopy::FromBytes;

use super::dimension::Calibration;
use super::header::{DataKind, TagKind};
use super::tag::Tag;

/// Sample-encoding code for unsigned 16-bit samples, the only encoding
/// written by the supported acquisition software.
const UNSIGNED_16: u16 = 2;

/// An error advancing over a data element header.
#[derive(Debug, Error)]
pub enum ElementError {
    /// Unsupported sample encoding.
    #[error("Unsupported sample encoding ({0}).")]
    UnsupportedEncoding(u16),
    /// Calibration offsets differing between the X and Y axes.
    #[error("Calibration offset differs between the X ({x}) and Y ({y}) axes.")]
    AnisotropicOffset { x: f64, y: f64 },
    /// Calibration deltas differing between the X and Y axes.
    #[error("Calibration delta differs between the X ({x}) and Y ({y}) axes.")]
    AnisotropicDelta { x: f64, y: f64 },
}

/// Fixed fields of a one-dimensional element header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumFields {
    /// Calibration of the sample axis.
    pub calibration: Calibration,
    /// Length of the element in samples.
    pub length: u32,
}

/// State token to decode a one-dimensional element header.
#[derive(Debug)]
pub struct Spectrum {
    pub(super) remaining: u32,
    pub(super) data_kind: DataKind,
    pub(super) tag_kind: TagKind,
}

impl Spectrum {
    /// Transition to another state by decoding a one-dimensional element
    /// header.
    ///
    /// Returns the element's fixed fields, and the successor state: a
    /// sample state, or, for an empty element, the next element's tag state
    /// (`None` after the last element).
    pub fn advance(
        self,
        r: [u8; 26],
    ) -> Result<(SpectrumFields, Either<Samples, Option<Tag>>), ElementError> {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct SpectrumHeader {
            offset: [u8; 8],
            delta: [u8; 8],
            element: [u8; 4],
            encoding: [u8; 2],
            length: [u8; 4],
        }

        let SpectrumHeader {
            offset,
            delta,
            element,
            encoding,
            length,
        } = zerocopy::transmute!(r);

        let encoding = u16::from_le_bytes(encoding);
        if encoding != UNSIGNED_16 {
            Err(ElementError::UnsupportedEncoding(encoding))?;
        }

        let fields = SpectrumFields {
            calibration: Calibration {
                offset: f64::from_le_bytes(offset),
                delta: f64::from_le_bytes(delta),
                element: u32::from_le_bytes(element),
            },
            length: u32::from_le_bytes(length),
        };

        let successor = samples(
            fields.length as u64,
            self.remaining,
            self.data_kind,
            self.tag_kind,
        );

        Ok((fields, successor))
    }
}

/// Fixed fields of a two-dimensional element header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFields {
    /// Calibrations of the X and Y pixel axes.
    pub calibration: [Calibration; 2],
    /// Width of the element in samples.
    pub width: u32,
    /// Height of the element in samples.
    pub height: u32,
}

/// State token to decode a two-dimensional element header.
#[derive(Debug)]
pub struct Image {
    pub(super) remaining: u32,
    pub(super) data_kind: DataKind,
    pub(super) tag_kind: TagKind,
}

impl Image {
    /// Transition to another state by decoding a two-dimensional element
    /// header.
    ///
    /// The X and Y axes must carry bit-identical calibration offsets and
    /// deltas (pixel calibration is isotropic). Returns the element's fixed
    /// fields, and the successor state: a sample state, or, for an empty
    /// element, the next element's tag state (`None` after the last
    /// element). Samples follow in row-major order.
    pub fn advance(
        self,
        r: [u8; 50],
    ) -> Result<(ImageFields, Either<Samples, Option<Tag>>), ElementError> {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct ImageHeader {
            offset_x: [u8; 8],
            delta_x: [u8; 8],
            element_x: [u8; 4],
            offset_y: [u8; 8],
            delta_y: [u8; 8],
            element_y: [u8; 4],
            encoding: [u8; 2],
            width: [u8; 4],
            height: [u8; 4],
        }

        let ImageHeader {
            offset_x,
            delta_x,
            element_x,
            offset_y,
            delta_y,
            element_y,
            encoding,
            width,
            height,
        } = zerocopy::transmute!(r);

        let x = Calibration {
            offset: f64::from_le_bytes(offset_x),
            delta: f64::from_le_bytes(delta_x),
            element: u32::from_le_bytes(element_x),
        };

        let y = Calibration {
            offset: f64::from_le_bytes(offset_y),
            delta: f64::from_le_bytes(delta_y),
            element: u32::from_le_bytes(element_y),
        };

        if x.offset.to_bits() != y.offset.to_bits() {
            Err(ElementError::AnisotropicOffset {
                x: x.offset,
                y: y.offset,
            })?;
        }

        if x.delta.to_bits() != y.delta.to_bits() {
            Err(ElementError::AnisotropicDelta {
                x: x.delta,
                y: y.delta,
            })?;
        }

        let encoding = u16::from_le_bytes(encoding);
        if encoding != UNSIGNED_16 {
            Err(ElementError::UnsupportedEncoding(encoding))?;
        }

        let fields = ImageFields {
            calibration: [x, y],
            width: u32::from_le_bytes(width),
            height: u32::from_le_bytes(height),
        };

        let successor = samples(
            fields.width as u64 * fields.height as u64,
            self.remaining,
            self.data_kind,
            self.tag_kind,
        );

        Ok((fields, successor))
    }
}

/// State token to decode a sample.
#[derive(Debug)]
pub struct Samples {
    pub(super) samples_remaining: u64,
    pub(super) remaining: u32,
    pub(super) data_kind: DataKind,
    pub(super) tag_kind: TagKind,
}

impl Samples {
    /// Transition to another state by decoding a sample.
    ///
    /// Returns the sample value, and the successor state: this element's
    /// next sample state, or the next element's tag state (`None` after the
    /// last element).
    pub fn advance(self, r: [u8; 2]) -> (u16, Either<Option<Tag>, Self>) {
        let value = u16::from_le_bytes(r);

        let successor = if self.samples_remaining == 1 {
            Left(next(self.remaining, self.data_kind, self.tag_kind))
        } else {
            Right(Self {
                samples_remaining: self.samples_remaining - 1,
                ..self
            })
        };

        (value, successor)
    }
}

/// Select the successor for an element with `count` samples to decode.
fn samples(
    count: u64,
    remaining: u32,
    data_kind: DataKind,
    tag_kind: TagKind,
) -> Either<Samples, Option<Tag>> {
    if count != 0 {
        Left(Samples {
            samples_remaining: count,
            remaining,
            data_kind,
            tag_kind,
        })
    } else {
        Right(next(remaining, data_kind, tag_kind))
    }
}

/// Select the tag state for the next element, if any remain.
fn next(remaining: u32, data_kind: DataKind, tag_kind: TagKind) -> Option<Tag> {
    if remaining != 0 {
        Some(Tag {
            remaining: remaining - 1,
            data_kind,
            tag_kind,
        })
    } else {
        None
    }
}
