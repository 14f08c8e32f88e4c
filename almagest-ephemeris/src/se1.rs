//! Reader for the segmented per-planet SE1 format.
//!
//! An SE1 file carries one body. A 96-byte header is followed by a table
//! of segment byte offsets and the segments themselves; each segment holds
//! Chebyshev series for ecliptic longitude, latitude and distance over a
//! span of `seg_days` days (typically 32).
//!
//! Header layout:
//!
//! | Offset | Type  | Field      |
//! |-------:|-------|------------|
//! |  0     | i32   | index_pos  |
//! |  4     | i32   | flags      |
//! |  8     | i32   | n_coeffs   |
//! | 12     | i32   | rmax x1000 |
//! | 16     | f64   | start_jd   |
//! | 24     | f64   | end_jd     |
//! | 32     | f64   | seg_days   |
//! | 40     | f64x7 | epoch + mean orbital elements |
//!
//! Byte order is detected by sanity-checking `n_coeffs` (1..=99) under
//! little- then big-endian interpretation; files that satisfy neither are
//! refused outright.

use crate::bytes::Endian;
use crate::error::{EphemerisError, EphemerisResult};
use memmap2::Mmap;
use std::cell::RefCell;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

const HEADER_SIZE: usize = 96;

/// Parsed SE1 header.
#[derive(Debug, Clone, PartialEq)]
pub struct Se1Header {
    pub index_pos: u32,
    pub flags: i32,
    pub n_coeffs: usize,
    /// Distance normalization, as read (raw field is rmax scaled by 1000).
    pub rmax: f64,
    pub start_jd: f64,
    pub end_jd: f64,
    pub seg_days: f64,
    /// Epoch plus six mean orbital elements.
    pub orbital: [f64; 7],
    /// Byte order observed in the file, kept for diagnostics.
    pub byte_order: Endian,
}

impl Se1Header {
    /// Number of entries in the segment-offset index.
    pub fn segment_count(&self) -> usize {
        ((self.end_jd - self.start_jd + 0.1) / self.seg_days) as usize
    }
}

/// One decoded segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Se1Record {
    pub start_jd: f64,
    pub end_jd: f64,
    pub lon_coeffs: Vec<f64>,
    pub lat_coeffs: Vec<f64>,
    pub dist_coeffs: Vec<f64>,
}

/// Memory-mapped SE1 file with a parsed header and segment index.
///
/// The single-slot record cache lives behind a `RefCell`, which makes the
/// reader `!Sync` on purpose: share a file across threads by cloning the
/// reader (clones share the mapping, not the cache).
#[derive(Debug)]
pub struct Se1Reader {
    mmap: Arc<Mmap>,
    header: Se1Header,
    index: Vec<u32>,
    cache: RefCell<Option<(usize, Se1Record)>>,
}

impl Clone for Se1Reader {
    fn clone(&self) -> Self {
        Self {
            mmap: Arc::clone(&self.mmap),
            header: self.header.clone(),
            index: self.index.clone(),
            cache: RefCell::new(None),
        }
    }
}

fn detect_endian(bytes: &[u8]) -> EphemerisResult<Endian> {
    for endian in [Endian::Little, Endian::Big] {
        let n_coeffs = endian.read_i32(&bytes[8..12]);
        if (1..=99).contains(&n_coeffs) {
            return Ok(endian);
        }
    }
    Err(EphemerisError::BadEndianness(
        "coefficient count is implausible in both byte orders".into(),
    ))
}

fn parse_header(bytes: &[u8]) -> EphemerisResult<Se1Header> {
    if bytes.len() < HEADER_SIZE {
        return Err(EphemerisError::CorruptHeader(format!(
            "file is {} bytes, smaller than the {HEADER_SIZE}-byte header",
            bytes.len()
        )));
    }
    let endian = detect_endian(bytes)?;

    let index_pos = endian.read_i32(&bytes[0..4]);
    let flags = endian.read_i32(&bytes[4..8]);
    let n_coeffs = endian.read_i32(&bytes[8..12]);
    let rmax_millis = endian.read_i32(&bytes[12..16]);
    let start_jd = endian.read_f64(&bytes[16..24]);
    let end_jd = endian.read_f64(&bytes[24..32]);
    let seg_days = endian.read_f64(&bytes[32..40]);
    let mut orbital = [0.0; 7];
    for (i, slot) in orbital.iter_mut().enumerate() {
        *slot = endian.read_f64(&bytes[40 + 8 * i..48 + 8 * i]);
    }

    if !(1..=99).contains(&n_coeffs) {
        return Err(EphemerisError::CorruptHeader(format!(
            "coefficient count {n_coeffs} outside 1..=99"
        )));
    }
    if !(start_jd > 0.0) {
        return Err(EphemerisError::CorruptHeader(format!(
            "start JD {start_jd} must be positive"
        )));
    }
    if !(end_jd > start_jd) {
        return Err(EphemerisError::CorruptHeader(format!(
            "end JD {end_jd} does not follow start JD {start_jd}"
        )));
    }
    if !(1.0..=10_000.0).contains(&seg_days) {
        return Err(EphemerisError::CorruptHeader(format!(
            "segment length {seg_days} days outside [1, 10000]"
        )));
    }
    if index_pos < HEADER_SIZE as i32 {
        return Err(EphemerisError::CorruptHeader(format!(
            "index position {index_pos} points into the header"
        )));
    }

    Ok(Se1Header {
        index_pos: index_pos as u32,
        flags,
        n_coeffs: n_coeffs as usize,
        rmax: rmax_millis as f64 / 1000.0,
        start_jd,
        end_jd,
        seg_days,
        orbital,
        byte_order: endian,
    })
}

impl Se1Reader {
    pub fn open<P: AsRef<Path>>(path: P) -> EphemerisResult<Self> {
        let file = File::open(path.as_ref())?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| EphemerisError::Io(e.to_string()))?;
        Self::from_mmap(Arc::new(mmap))
    }

    fn from_mmap(mmap: Arc<Mmap>) -> EphemerisResult<Self> {
        let header = parse_header(&mmap)?;

        let count = header.segment_count();
        let index_pos = header.index_pos as usize;
        let index_end = index_pos + 4 * count;
        if index_end > mmap.len() {
            return Err(EphemerisError::CorruptHeader(format!(
                "segment index [{index_pos}, {index_end}) exceeds the {}-byte file",
                mmap.len()
            )));
        }
        let index = header
            .byte_order
            .read_i32_slice(&mmap, index_pos, count)
            .into_iter()
            .map(|offset| offset as u32)
            .collect();

        Ok(Self {
            mmap,
            header,
            index,
            cache: RefCell::new(None),
        })
    }

    pub fn header(&self) -> &Se1Header {
        &self.header
    }

    pub fn segment_count(&self) -> usize {
        self.index.len()
    }

    /// True when `jd` lies inside the span the header declares.
    pub fn covers(&self, jd: f64) -> bool {
        jd >= self.header.start_jd && jd <= self.header.end_jd
    }

    fn segment_byte_len(&self) -> usize {
        16 + 3 * 8 * self.header.n_coeffs
    }

    fn decode_segment(&self, k: usize) -> EphemerisResult<Se1Record> {
        let offset = self.index[k] as usize;
        let end = offset + self.segment_byte_len();
        if offset < HEADER_SIZE || end > self.mmap.len() {
            return Err(EphemerisError::CorruptHeader(format!(
                "segment {k} at byte {offset} runs past the file"
            )));
        }
        let endian = self.header.byte_order;
        let bytes = &self.mmap[..];
        let n = self.header.n_coeffs;
        Ok(Se1Record {
            start_jd: endian.read_f64(&bytes[offset..]),
            end_jd: endian.read_f64(&bytes[offset + 8..]),
            lon_coeffs: endian.read_f64_slice(bytes, offset + 16, n),
            lat_coeffs: endian.read_f64_slice(bytes, offset + 16 + 8 * n, n),
            dist_coeffs: endian.read_f64_slice(bytes, offset + 16 + 16 * n, n),
        })
    }

    /// Read segment `k`, going through the single-slot record cache.
    pub fn read_record(&self, k: usize) -> EphemerisResult<Se1Record> {
        if k >= self.index.len() {
            return Err(EphemerisError::JdOutOfRange {
                jd: f64::NAN,
                start: self.header.start_jd,
                end: self.header.end_jd,
            });
        }
        if let Some((cached_k, record)) = self.cache.borrow().as_ref() {
            if *cached_k == k {
                return Ok(record.clone());
            }
        }
        let record = self.decode_segment(k)?;
        *self.cache.borrow_mut() = Some((k, record.clone()));
        Ok(record)
    }

    /// Locate the segment containing `jd` by binary search over segment
    /// start times. `None` when `jd` falls in a gap or outside the file.
    pub fn find_record(&self, jd: f64) -> EphemerisResult<Option<Se1Record>> {
        if self.index.is_empty() || !self.covers(jd) {
            return Ok(None);
        }
        // Rightmost segment whose start time is at or before jd.
        let mut lo = 0usize;
        let mut hi = self.index.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            let start = self.decode_segment(mid)?.start_jd;
            if start <= jd {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo == 0 {
            return Ok(None);
        }
        let record = self.read_record(lo - 1)?;
        if jd >= record.start_jd && jd <= record.end_jd {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }
}
