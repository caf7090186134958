//! In-memory builder for synthetic series data files.

#![allow(dead_code)]

pub const V1: u16 = 0x0210;
pub const V2: u16 = 0x0220;

pub const SPECTRA: u32 = 0x4120;
pub const IMAGES: u32 = 0x4122;

pub const TIME: u32 = 0x4152;
pub const TIME_AND_POSITION: u32 = 0x4142;

pub const UNSIGNED_16: u16 = 2;

/// A synthetic series data file.
pub struct Series {
    pub version: u16,
    pub data_kind: u32,
    pub tag_kind: u32,
    pub total: u32,
    pub valid: u32,
    pub dimensions: Vec<Dimension>,
    pub elements: Vec<Element>,
}

/// One dimension descriptor of a synthetic series.
pub struct Dimension {
    pub size: u32,
    pub offset: f64,
    pub delta: f64,
    pub element: u32,
    pub description: &'static str,
    pub units: &'static str,
}

impl Default for Dimension {
    fn default() -> Self {
        Self {
            size: 1,
            offset: 0.0,
            delta: 1.0,
            element: 0,
            description: "Number",
            units: "",
        }
    }
}

/// One element of a synthetic series.
pub struct Element {
    /// Overrides the series tag kind marker when set.
    pub marker: Option<u32>,
    pub timestamp: u32,
    pub position: Option<(f64, f64)>,
    pub data: Data,
}

/// The data section of a synthetic element.
pub enum Data {
    Spectrum {
        offset: f64,
        delta: f64,
        element: u32,
        encoding: u16,
        samples: Vec<u16>,
    },
    Image {
        x: (f64, f64, u32),
        y: (f64, f64, u32),
        encoding: u16,
        width: u32,
        height: u32,
        samples: Vec<u16>,
    },
}

impl Series {
    /// Assemble the series into its file layout.
    pub fn build(&self) -> Vec<u8> {
        assert_eq!(
            self.dimensions.len(),
            self.elements.len(),
            "offset arrays are sized by the dimension count",
        );

        let wide = self.version == V2;
        let width = if wide { 8 } else { 4 };

        // Lay out the descriptor table first to learn where the offset
        // arrays will land.
        let mut table = Vec::new();
        for d in &self.dimensions {
            table.extend_from_slice(&d.size.to_le_bytes());
            table.extend_from_slice(&d.offset.to_le_bytes());
            table.extend_from_slice(&d.delta.to_le_bytes());
            table.extend_from_slice(&d.element.to_le_bytes());
            table.extend_from_slice(&(d.description.len() as u32).to_le_bytes());
            table.extend_from_slice(d.description.as_bytes());
            table.extend_from_slice(&(d.units.len() as u32).to_le_bytes());
            table.extend_from_slice(d.units.as_bytes());
        }

        let offset_arrays = (26 + width + table.len()) as u64;
        let blobs_start = offset_arrays + self.elements.len() as u64 * 2 * width as u64;

        // Tag and data blobs, with the positions they will land at.
        let mut blobs = Vec::new();
        let mut data_offsets = Vec::new();
        let mut tag_offsets = Vec::new();

        for e in &self.elements {
            tag_offsets.push(blobs_start + blobs.len() as u64);
            blobs.extend_from_slice(&e.marker.unwrap_or(self.tag_kind).to_le_bytes());
            blobs.extend_from_slice(&e.timestamp.to_le_bytes());
            if let Some((x, y)) = e.position {
                blobs.extend_from_slice(&x.to_le_bytes());
                blobs.extend_from_slice(&y.to_le_bytes());
            }

            data_offsets.push(blobs_start + blobs.len() as u64);
            match &e.data {
                Data::Spectrum {
                    offset,
                    delta,
                    element,
                    encoding,
                    samples,
                } => {
                    blobs.extend_from_slice(&offset.to_le_bytes());
                    blobs.extend_from_slice(&delta.to_le_bytes());
                    blobs.extend_from_slice(&element.to_le_bytes());
                    blobs.extend_from_slice(&encoding.to_le_bytes());
                    blobs.extend_from_slice(&(samples.len() as u32).to_le_bytes());
                    for s in samples {
                        blobs.extend_from_slice(&s.to_le_bytes());
                    }
                }
                Data::Image {
                    x,
                    y,
                    encoding,
                    width,
                    height,
                    samples,
                } => {
                    blobs.extend_from_slice(&x.0.to_le_bytes());
                    blobs.extend_from_slice(&x.1.to_le_bytes());
                    blobs.extend_from_slice(&x.2.to_le_bytes());
                    blobs.extend_from_slice(&y.0.to_le_bytes());
                    blobs.extend_from_slice(&y.1.to_le_bytes());
                    blobs.extend_from_slice(&y.2.to_le_bytes());
                    blobs.extend_from_slice(&encoding.to_le_bytes());
                    blobs.extend_from_slice(&width.to_le_bytes());
                    blobs.extend_from_slice(&height.to_le_bytes());
                    for s in samples {
                        blobs.extend_from_slice(&s.to_le_bytes());
                    }
                }
            }
        }

        let mut r = Vec::new();
        r.extend_from_slice(&0x4949u16.to_le_bytes());
        r.extend_from_slice(&0x0197u16.to_le_bytes());
        r.extend_from_slice(&self.version.to_le_bytes());
        r.extend_from_slice(&self.data_kind.to_le_bytes());
        r.extend_from_slice(&self.tag_kind.to_le_bytes());
        r.extend_from_slice(&self.total.to_le_bytes());
        r.extend_from_slice(&self.valid.to_le_bytes());
        push_offset(&mut r, wide, offset_arrays);
        r.extend_from_slice(&(self.dimensions.len() as u32).to_le_bytes());
        r.extend_from_slice(&table);
        for &o in &data_offsets {
            push_offset(&mut r, wide, o);
        }
        for &o in &tag_offsets {
            push_offset(&mut r, wide, o);
        }
        r.extend_from_slice(&blobs);

        r
    }
}

fn push_offset(r: &mut Vec<u8>, wide: bool, offset: u64) {
    if wide {
        r.extend_from_slice(&offset.to_le_bytes());
    } else {
        r.extend_from_slice(&(offset as u32).to_le_bytes());
    }
}
