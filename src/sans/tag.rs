//! States processing element tags.

use either::Either::{self, Left, Right};
use thiserror::Error;
use zerocopy::FromBytes;

use super::element::{Image, Spectrum};
use super::header::{DataKind, TagKind};

/// An error advancing over an element tag.
#[derive(Debug, Error)]
pub enum TagError {
    /// Tag kind marker disagreeing with the series header.
    #[error(
        "Tag kind marker ({found:#010x}) disagrees with the series header ({expected:#010x})."
    )]
    KindMismatch { expected: u32, found: u32 },
}

/// State token to decode an element tag.
#[derive(Debug)]
pub struct Tag {
    pub(super) remaining: u32,
    pub(super) data_kind: DataKind,
    pub(super) tag_kind: TagKind,
}

impl Tag {
    /// Transition to another state by decoding an element tag.
    ///
    /// The tag's own kind marker is re-validated against the series header.
    /// Returns the element's acquisition timestamp, and the successor
    /// state: a position state for series tagged with stage positions, or
    /// the element state directly.
    pub fn advance(
        self,
        r: [u8; 8],
    ) -> Result<(u32, Either<Position, Either<Spectrum, Image>>), TagError> {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct ElementTag {
            marker: [u8; 4],
            timestamp: [u8; 4],
        }

        let ElementTag { marker, timestamp } = zerocopy::transmute!(r);

        let found = u32::from_le_bytes(marker);
        let expected = self.tag_kind.marker();

        if found != expected {
            Err(TagError::KindMismatch { expected, found })?;
        }

        let timestamp = u32::from_le_bytes(timestamp);

        let successor = match self.tag_kind {
            TagKind::TimeAndPosition => Left(Position {
                remaining: self.remaining,
                data_kind: self.data_kind,
                tag_kind: self.tag_kind,
            }),
            TagKind::Time => Right(element(self.remaining, self.data_kind, self.tag_kind)),
        };

        Ok((timestamp, successor))
    }
}

/// State token to decode a stage position.
#[derive(Debug)]
pub struct Position {
    pub(super) remaining: u32,
    pub(super) data_kind: DataKind,
    pub(super) tag_kind: TagKind,
}

impl Position {
    /// Transition to another state by decoding a stage position.
    ///
    /// Returns the X and Y stage coordinates, and the successor state
    /// token.
    pub fn advance(self, r: [u8; 16]) -> ((f64, f64), Either<Spectrum, Image>) {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct StagePosition {
            x: [u8; 8],
            y: [u8; 8],
        }

        let StagePosition { x, y } = zerocopy::transmute!(r);

        let position = (f64::from_le_bytes(x), f64::from_le_bytes(y));

        (
            position,
            element(self.remaining, self.data_kind, self.tag_kind),
        )
    }
}

/// Select the element state matching the series data kind.
fn element(remaining: u32, data_kind: DataKind, tag_kind: TagKind) -> Either<Spectrum, Image> {
    match data_kind {
        DataKind::Spectra => Left(Spectrum {
            remaining,
            data_kind,
            tag_kind,
        }),
        DataKind::Images => Right(Image {
            remaining,
            data_kind,
            tag_kind,
        }),
    }
}
