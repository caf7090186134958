mod fixture;

use fixture::{Data, Dimension, Element, Series};
use goniometer::avec::{decode_slice, slice::Error};
use goniometer::sans::{element::ElementError, header::SeriesHeaderError, tag::TagError};

#[test]
fn rejects_bad_byte_order() {
    let mut data = spectra().build();
    data[0] = 0;

    let error = decode_slice(&data).unwrap_err();
    assert!(matches!(
        error,
        Error::Header(SeriesHeaderError::NotLittleEndian(_)),
    ));
}

#[test]
fn rejects_bad_series_id() {
    let mut data = spectra().build();
    data[2] ^= 0xFF;

    let error = decode_slice(&data).unwrap_err();
    assert!(matches!(
        error,
        Error::Header(SeriesHeaderError::NotSeriesData(_)),
    ));
}

#[test]
fn rejects_unknown_version() {
    let mut data = spectra().build();
    data[4..6].copy_from_slice(&0x0230u16.to_le_bytes());

    let error = decode_slice(&data).unwrap_err();
    assert!(matches!(
        error,
        Error::Header(SeriesHeaderError::UnknownVersion(0x0230)),
    ));
}

#[test]
fn rejects_unknown_data_kind() {
    let mut data = spectra().build();
    data[6..10].copy_from_slice(&0x4999u32.to_le_bytes());

    let error = decode_slice(&data).unwrap_err();
    assert!(matches!(
        error,
        Error::Header(SeriesHeaderError::UnknownDataKind(0x4999)),
    ));
}

#[test]
fn rejects_unknown_tag_kind() {
    let mut data = spectra().build();
    data[10..14].copy_from_slice(&0u32.to_le_bytes());

    let error = decode_slice(&data).unwrap_err();
    assert!(matches!(
        error,
        Error::Header(SeriesHeaderError::UnknownTagKind(0)),
    ));
}

#[test]
fn rejects_impossible_element_counts() {
    let mut series = spectra();
    series.total = 1;
    series.valid = 2;

    let error = decode_slice(&series.build()).unwrap_err();
    assert!(matches!(
        error,
        Error::Header(SeriesHeaderError::ElementCounts { total: 1, valid: 2 }),
    ));
}

#[test]
fn rejects_misaligned_descriptor_table() {
    let mut data = spectra().build();

    // Push the declared offset-array position past the end of the
    // descriptor table (it really ends at 68).
    data[22..26].copy_from_slice(&70u32.to_le_bytes());

    let error = decode_slice(&data).unwrap_err();
    assert!(matches!(
        error,
        Error::Misaligned {
            expected: 70,
            found: 68,
        },
    ));
}

#[test]
fn rejects_corrupt_description_length() {
    // The description length of the first descriptor sits at bytes 54..58.
    // Any corruption of it must fail the decode, never silently succeed.
    for position in 54..58 {
        let mut data = spectra().build();
        data[position] ^= 0xFF;

        assert!(decode_slice(&data).is_err(), "byte {position}");
    }
}

#[test]
fn rejects_tag_kind_mismatch() {
    let mut series = spectra();
    series.elements[0].marker = Some(fixture::TIME_AND_POSITION);

    let error = decode_slice(&series.build()).unwrap_err();
    assert!(matches!(
        error,
        Error::Tag {
            source: TagError::KindMismatch {
                expected: 0x4152,
                found: 0x4142,
            },
            ..
        },
    ));
}

#[test]
fn rejects_anisotropic_offset() {
    let series = images((1.0, 0.5, 0), (2.0, 0.5, 0), fixture::UNSIGNED_16);

    let error = decode_slice(&series.build()).unwrap_err();
    assert!(matches!(
        error,
        Error::Element {
            source: ElementError::AnisotropicOffset { .. },
            ..
        },
    ));
}

#[test]
fn rejects_bitwise_anisotropic_offset() {
    // Negative zero equals zero numerically, but not bitwise.
    let series = images((0.0, 0.5, 0), (-0.0, 0.5, 0), fixture::UNSIGNED_16);

    let error = decode_slice(&series.build()).unwrap_err();
    assert!(matches!(
        error,
        Error::Element {
            source: ElementError::AnisotropicOffset { .. },
            ..
        },
    ));
}

#[test]
fn rejects_anisotropic_delta() {
    let series = images((1.0, 0.5, 0), (1.0, 0.25, 0), fixture::UNSIGNED_16);

    let error = decode_slice(&series.build()).unwrap_err();
    assert!(matches!(
        error,
        Error::Element {
            source: ElementError::AnisotropicDelta { .. },
            ..
        },
    ));
}

#[test]
fn rejects_unsupported_spectrum_encoding() {
    let mut series = spectra();
    let Data::Spectrum { encoding, .. } = &mut series.elements[0].data else {
        unreachable!();
    };
    *encoding = 7;

    let error = decode_slice(&series.build()).unwrap_err();
    assert!(matches!(
        error,
        Error::Element {
            source: ElementError::UnsupportedEncoding(7),
            ..
        },
    ));
}

#[test]
fn rejects_unsupported_image_encoding() {
    let series = images((1.0, 0.5, 0), (1.0, 0.5, 0), 6);

    let error = decode_slice(&series.build()).unwrap_err();
    assert!(matches!(
        error,
        Error::Element {
            source: ElementError::UnsupportedEncoding(6),
            ..
        },
    ));
}

#[test]
fn rejects_truncation() {
    let data = spectra().build();

    for length in [10, 40, data.len() - 1] {
        let error = decode_slice(&data[..length]).unwrap_err();
        assert!(matches!(error, Error::EndOfSlice { .. }), "length {length}");
    }
}

#[test]
fn rejects_wild_data_offset() {
    let mut data = spectra().build();

    // The single data offset entry sits at the offset arrays (byte 68).
    data[68..72].copy_from_slice(&u32::MAX.to_le_bytes());

    let error = decode_slice(&data).unwrap_err();
    assert!(matches!(error, Error::EndOfSlice { .. }));
}

fn spectra() -> Series {
    Series {
        version: fixture::V1,
        data_kind: fixture::SPECTRA,
        tag_kind: fixture::TIME,
        total: 1,
        valid: 1,
        dimensions: vec![Dimension::default()],
        elements: vec![Element {
            marker: None,
            timestamp: 10,
            position: None,
            data: Data::Spectrum {
                offset: 0.0,
                delta: 1.0,
                element: 0,
                encoding: fixture::UNSIGNED_16,
                samples: vec![1, 2, 3],
            },
        }],
    }
}

fn images(x: (f64, f64, u32), y: (f64, f64, u32), encoding: u16) -> Series {
    Series {
        version: fixture::V1,
        data_kind: fixture::IMAGES,
        tag_kind: fixture::TIME,
        total: 1,
        valid: 1,
        dimensions: vec![Dimension::default()],
        elements: vec![Element {
            marker: None,
            timestamp: 10,
            position: None,
            data: Data::Image {
                x,
                y,
                encoding,
                width: 2,
                height: 1,
                samples: vec![1, 2],
            },
        }],
    }
}
