//! States processing the offset-array geometry and the offset arrays.

use core::marker::PhantomData;

use either::Either::{self, Left, Right};

use super::dimension::Dimension;
use super::header::{DataKind, TagKind};
use super::tag::Tag;

/// The width of a file offset, selected by the series version.
pub trait OffsetInner {
    /// The data storing an offset of this width.
    type From;

    /// Convert data of this width to an absolute file position.
    fn from(r: Self::From) -> u64;
}

/// 4-byte file offsets (series version 0x0210).
#[derive(Debug)]
pub struct Narrow;

impl OffsetInner for Narrow {
    type From = [u8; 4];

    fn from(r: Self::From) -> u64 {
        u32::from_le_bytes(r) as u64
    }
}

/// 8-byte file offsets (series version 0x0220).
#[derive(Debug)]
pub struct Wide;

impl OffsetInner for Wide {
    type From = [u8; 8];

    fn from(r: Self::From) -> u64 {
        u64::from_le_bytes(r)
    }
}

/// State token to decode the offset-array position.
#[derive(Debug)]
pub struct Extent<T> {
    pub(super) data_kind: DataKind,
    pub(super) tag_kind: TagKind,
    pub(super) _phantom: PhantomData<T>,
}

impl<T: OffsetInner> Extent<T> {
    /// Transition to another state by decoding the offset-array position.
    ///
    /// Returns the absolute file position of the offset arrays, and the
    /// successor state token.
    pub fn advance(self, r: T::From) -> (u64, DimensionCount<T>) {
        let position = T::from(r);

        let successor = DimensionCount {
            data_kind: self.data_kind,
            tag_kind: self.tag_kind,
            _phantom: PhantomData,
        };

        (position, successor)
    }
}

/// State token to decode the dimension count.
#[derive(Debug)]
pub struct DimensionCount<T> {
    pub(super) data_kind: DataKind,
    pub(super) tag_kind: TagKind,
    pub(super) _phantom: PhantomData<T>,
}

impl<T: OffsetInner> DimensionCount<T> {
    /// Transition to another state by decoding the dimension count.
    ///
    /// This is the number of dimensions of the series indices, and so also
    /// the number of elements. Returns the count, and a successor state
    /// token, or `None` for an empty series.
    pub fn advance(self, r: [u8; 4]) -> (u32, Option<Dimension<T>>) {
        let count = u32::from_le_bytes(r);

        let successor = if count != 0 {
            Some(Dimension {
                elements: count,
                remaining: count,
                data_kind: self.data_kind,
                tag_kind: self.tag_kind,
                _phantom: PhantomData,
            })
        } else {
            None
        };

        (count, successor)
    }
}

/// State token to decode an entry of the data offset array.
#[derive(Debug)]
pub struct DataOffsets<T> {
    pub(super) remaining: u32,
    pub(super) elements: u32,
    pub(super) data_kind: DataKind,
    pub(super) tag_kind: TagKind,
    pub(super) _phantom: PhantomData<T>,
}

impl<T: OffsetInner> DataOffsets<T> {
    /// Transition to another state by decoding an entry of the data offset
    /// array.
    ///
    /// Returns the absolute file position of an element's data, and the
    /// successor state.
    pub fn advance(self, r: T::From) -> (u64, Either<TagOffsets<T>, Self>) {
        let position = T::from(r);

        let remaining = self.remaining - 1;

        let successor = if remaining == 0 {
            Left(TagOffsets {
                remaining: self.elements,
                elements: self.elements,
                data_kind: self.data_kind,
                tag_kind: self.tag_kind,
                _phantom: PhantomData,
            })
        } else {
            Right(Self { remaining, ..self })
        };

        (position, successor)
    }
}

/// State token to decode an entry of the tag offset array.
#[derive(Debug)]
pub struct TagOffsets<T> {
    pub(super) remaining: u32,
    pub(super) elements: u32,
    pub(super) data_kind: DataKind,
    pub(super) tag_kind: TagKind,
    pub(super) _phantom: PhantomData<T>,
}

impl<T: OffsetInner> TagOffsets<T> {
    /// Transition to another state by decoding an entry of the tag offset
    /// array.
    ///
    /// Returns the absolute file position of an element's tag, and the
    /// successor state.
    pub fn advance(self, r: T::From) -> (u64, Either<Tag, Self>) {
        let position = T::from(r);

        let remaining = self.remaining - 1;

        let successor = if remaining == 0 {
            Left(Tag {
                remaining: self.elements - 1,
                data_kind: self.data_kind,
                tag_kind: self.tag_kind,
            })
        } else {
            Right(Self { remaining, ..self })
        };

        (position, successor)
    }
}
