//! States processing the dimension descriptor table.

use core::marker::PhantomData;

use either::Either::{self, Left, Right};
use zerocopy::FromBytes;

use super::header::{DataKind, TagKind};
use super::offsets::{DataOffsets, OffsetInner};

/// A linear mapping from array indices to physical values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Physical value at the reference index.
    pub offset: f64,
    /// Physical increment between adjacent indices.
    pub delta: f64,
    /// The reference index.
    pub element: u32,
}

impl Calibration {
    /// The physical value at an array index.
    pub fn value_at(&self, index: u32) -> f64 {
        self.offset + (index as f64 - self.element as f64) * self.delta
    }
}

/// Fixed fields of a dimension descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionFields {
    /// Number of elements along this dimension.
    pub size: u32,
    /// Calibration of this dimension's index axis.
    pub calibration: Calibration,
    /// Byte length of the descriptor's description string.
    pub description_length: u32,
}

/// State token to decode the fixed fields of a dimension descriptor.
#[derive(Debug)]
pub struct Dimension<T> {
    pub(super) elements: u32,
    pub(super) remaining: u32,
    pub(super) data_kind: DataKind,
    pub(super) tag_kind: TagKind,
    pub(super) _phantom: PhantomData<T>,
}

impl<T: OffsetInner> Dimension<T> {
    /// Transition to another state by decoding the fixed fields of a
    /// dimension descriptor.
    ///
    /// Returns the descriptor's fixed fields, and the successor state
    /// token. The descriptor's description string, whose byte length is
    /// carried by the returned fields, lies between the bytes consumed
    /// here and those consumed by the successor.
    pub fn advance(self, r: [u8; 28]) -> (DimensionFields, UnitsLength<T>) {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct Descriptor {
            size: [u8; 4],
            offset: [u8; 8],
            delta: [u8; 8],
            element: [u8; 4],
            description_length: [u8; 4],
        }

        let Descriptor {
            size,
            offset,
            delta,
            element,
            description_length,
        } = zerocopy::transmute!(r);

        let fields = DimensionFields {
            size: u32::from_le_bytes(size),
            calibration: Calibration {
                offset: f64::from_le_bytes(offset),
                delta: f64::from_le_bytes(delta),
                element: u32::from_le_bytes(element),
            },
            description_length: u32::from_le_bytes(description_length),
        };

        let successor = UnitsLength {
            elements: self.elements,
            remaining: self.remaining,
            data_kind: self.data_kind,
            tag_kind: self.tag_kind,
            _phantom: PhantomData,
        };

        (fields, successor)
    }
}

/// State token to decode the units length of a dimension descriptor.
#[derive(Debug)]
pub struct UnitsLength<T> {
    pub(super) elements: u32,
    pub(super) remaining: u32,
    pub(super) data_kind: DataKind,
    pub(super) tag_kind: TagKind,
    pub(super) _phantom: PhantomData<T>,
}

impl<T: OffsetInner> UnitsLength<T> {
    /// Transition to another state by decoding the units length of a
    /// dimension descriptor.
    ///
    /// Returns the byte length of the descriptor's units string (zero for a
    /// dimension carrying no units), and the successor state. The units
    /// string lies between the bytes consumed here and those consumed by
    /// the successor.
    pub fn advance(self, r: [u8; 4]) -> (u32, Either<DataOffsets<T>, Dimension<T>>) {
        let length = u32::from_le_bytes(r);

        let remaining = self.remaining - 1;

        let successor = if remaining == 0 {
            Left(DataOffsets {
                remaining: self.elements,
                elements: self.elements,
                data_kind: self.data_kind,
                tag_kind: self.tag_kind,
                _phantom: PhantomData,
            })
        } else {
            Right(Dimension {
                elements: self.elements,
                remaining,
                data_kind: self.data_kind,
                tag_kind: self.tag_kind,
                _phantom: PhantomData,
            })
        };

        (length, successor)
    }
}
