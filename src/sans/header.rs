//! States processing the series header.

use core::marker::PhantomData;

use either::Either::{self, Left, Right};
use thiserror::Error;
use zerocopy::FromBytes;

use super::offsets::{Extent, Narrow, Wide};

/// Marker opening every little-endian series data file.
const BYTE_ORDER: u16 = 0x4949;
/// Series identifier following the byte-order marker.
const SERIES_ID: u16 = 0x0197;

/// An error advancing over a series header.
#[derive(Debug, Error)]
pub enum SeriesHeaderError {
    /// Unrecognized byte-order marker.
    #[error("Unrecognized byte-order marker ({0:#06x}).")]
    NotLittleEndian(u16),
    /// Incorrect series identifier.
    #[error("Incorrect series identifier ({0:#06x}).")]
    NotSeriesData(u16),
    /// Unknown series version.
    #[error("Unknown series version ({0:#06x}).")]
    UnknownVersion(u16),
    /// Unknown data kind marker.
    #[error("Unknown data kind marker ({0:#010x}).")]
    UnknownDataKind(u32),
    /// Unknown tag kind marker.
    #[error("Unknown tag kind marker ({0:#010x}).")]
    UnknownTagKind(u32),
    /// More valid elements than total elements.
    #[error("More valid elements ({valid}) than total elements ({total}).")]
    ElementCounts { total: u32, valid: u32 },
}

/// Revision of the series layout, determining the file-offset width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// Version code 0x0210, with 4-byte file offsets.
    V1,
    /// Version code 0x0220, with 8-byte file offsets.
    V2,
}

/// Dimensionality of the elements of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// One-dimensional elements (spectra).
    Spectra,
    /// Two-dimensional elements (images).
    Images,
}

/// Acquisition metadata attached to each element of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// A timestamp.
    Time,
    /// A timestamp and a stage position.
    TimeAndPosition,
}

impl TagKind {
    /// The marker identifying this tag kind on the wire.
    pub const fn marker(self) -> u32 {
        match self {
            Self::Time => 0x4152,
            Self::TimeAndPosition => 0x4142,
        }
    }
}

/// Global properties of a series, extracted from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Series {
    /// Revision of the series layout.
    pub version: Version,
    /// Dimensionality of the elements.
    pub data_kind: DataKind,
    /// Acquisition metadata attached to each element.
    pub tag_kind: TagKind,
    /// Number of elements the acquisition was configured to write.
    pub total_elements: u32,
    /// Number of elements completely written.
    pub valid_elements: u32,
}

/// State token to decode a series header.
#[derive(Debug)]
pub struct SeriesHeader;

impl SeriesHeader {
    /// Transition to another state by decoding a series header.
    ///
    /// Returns the global properties of the series, and a successor state
    /// token for the offset width selected by the series version.
    pub fn advance(
        r: [u8; 22],
    ) -> Result<(Series, Either<Extent<Narrow>, Extent<Wide>>), SeriesHeaderError> {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct FileHeader {
            byte_order: [u8; 2],
            series_id: [u8; 2],
            version: [u8; 2],
            data_kind: [u8; 4],
            tag_kind: [u8; 4],
            total_elements: [u8; 4],
            valid_elements: [u8; 4],
        }

        let FileHeader {
            byte_order,
            series_id,
            version,
            data_kind,
            tag_kind,
            total_elements,
            valid_elements,
        } = zerocopy::transmute!(r);

        let byte_order = u16::from_le_bytes(byte_order);
        if byte_order != BYTE_ORDER {
            Err(SeriesHeaderError::NotLittleEndian(byte_order))?;
        }

        let series_id = u16::from_le_bytes(series_id);
        if series_id != SERIES_ID {
            Err(SeriesHeaderError::NotSeriesData(series_id))?;
        }

        let version = match u16::from_le_bytes(version) {
            0x0210 => Version::V1,
            0x0220 => Version::V2,
            found => Err(SeriesHeaderError::UnknownVersion(found))?,
        };

        let data_kind = match u32::from_le_bytes(data_kind) {
            0x4120 => DataKind::Spectra,
            0x4122 => DataKind::Images,
            found => Err(SeriesHeaderError::UnknownDataKind(found))?,
        };

        let tag_kind = match u32::from_le_bytes(tag_kind) {
            0x4152 => TagKind::Time,
            0x4142 => TagKind::TimeAndPosition,
            found => Err(SeriesHeaderError::UnknownTagKind(found))?,
        };

        let total_elements = u32::from_le_bytes(total_elements);
        let valid_elements = u32::from_le_bytes(valid_elements);

        if total_elements < valid_elements {
            Err(SeriesHeaderError::ElementCounts {
                total: total_elements,
                valid: valid_elements,
            })?;
        }

        let series = Series {
            version,
            data_kind,
            tag_kind,
            total_elements,
            valid_elements,
        };

        let successor = match version {
            Version::V1 => Left(Extent {
                data_kind,
                tag_kind,
                _phantom: PhantomData,
            }),
            Version::V2 => Right(Extent {
                data_kind,
                tag_kind,
                _phantom: PhantomData,
            }),
        };

        Ok((series, successor))
    }
}
