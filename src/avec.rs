//! Convenience interfaces for common decoding patterns.
//!
//! The functions in this module decode a complete series data file into a
//! [`SeriesDocument`]: the series header, the dimension descriptor table,
//! and every element together with its acquisition tag, in acquisition
//! order.
//!
//! The offset arrays of a series data file hold absolute positions, so a
//! document can only be decoded from a fully buffered file; there is no
//! streaming interface.

use alloc::{string::String, vec::Vec};

pub use crate::sans::dimension::Calibration;
pub use crate::sans::header::{DataKind, TagKind, Version};

#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;

/// Global properties of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesHeader {
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
    /// Absolute file position of the offset arrays.
    pub offset_array_position: u64,
    /// Number of dimensions of the series indices (and of elements).
    pub dimension_count: u32,
}

/// A dimension of a series: one axis of the acquisition indices.
///
/// This indexes the elements of the series, not the samples of an
/// individual element.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    /// Number of elements along this dimension.
    pub size: u32,
    /// Calibration of this dimension's index axis.
    pub calibration: Calibration,
    /// Description of this dimension.
    pub description: String,
    /// Units of this dimension's calibrated values, if any.
    pub units: Option<String>,
}

/// Acquisition metadata attached to one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementTag {
    /// POSIX timestamp of the acquisition.
    pub timestamp: u32,
    /// Stage position at the acquisition, for series tagged with one.
    pub position: Option<(f64, f64)>,
}

/// The acquired data of one element.
#[derive(Debug, Clone, PartialEq)]
pub enum DataElement {
    /// A one-dimensional element.
    Spectrum {
        /// Calibration of the sample axis.
        calibration: Calibration,
        /// The samples.
        samples: Vec<u16>,
    },
    /// A two-dimensional element.
    Image {
        /// Calibrations of the X and Y pixel axes.
        calibration: [Calibration; 2],
        /// Width in samples.
        width: u32,
        /// Height in samples.
        height: u32,
        /// The samples, in row-major order.
        samples: Vec<u16>,
    },
}

impl DataElement {
    /// The element's samples (row-major for images).
    pub fn samples(&self) -> &[u16] {
        match self {
            Self::Spectrum { samples, .. } | Self::Image { samples, .. } => samples,
        }
    }

    /// One row of samples of an image element.
    ///
    /// Returns `None` for spectra, and for rows beyond the element's
    /// height.
    pub fn row(&self, index: u32) -> Option<&[u16]> {
        match self {
            Self::Image {
                width,
                height,
                samples,
                ..
            } if index < *height => {
                let width = *width as usize;
                let start = index as usize * width;

                samples.get(start..start + width)
            }
            _ => None,
        }
    }
}

/// One element of a series: its acquisition tag and its data.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// The element's acquisition tag.
    pub tag: ElementTag,
    /// The element's data.
    pub data: DataElement,
}

/// A decoded series data file.
///
/// Elements appear in offset-array index order, which is also acquisition
/// order: index `i` of [`elements`](Self::elements) and index `i` of the
/// offset arrays refer to the same acquisition event. For a series
/// reported incomplete by [`is_complete`](Self::is_complete), elements
/// beyond the header's valid count were not completely written and should
/// be treated as provisional.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDocument {
    /// Global properties of the series.
    pub header: SeriesHeader,
    /// The dimension descriptor table.
    pub dimensions: Vec<Dimension>,
    /// The elements, in acquisition order.
    pub elements: Vec<Element>,
}

impl SeriesDocument {
    /// The number of elements in the series.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the series holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// One element of the series.
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Whether every element of the series was completely written.
    pub fn is_complete(&self) -> bool {
        self.header.total_elements == self.header.valid_elements
    }
}
