//! Reader for JPL development-ephemeris record files.
//!
//! Record 1 is the header; data records follow contiguously, each holding
//! `[rec_start_jd, rec_end_jd]` plus body-indexed Chebyshev sub-interval
//! coefficients. The index table carries thirteen `(offset, n_coeffs,
//! n_intervals)` triples: eleven bodies (Mercury through Sun), nutations
//! (two components) and librations (three components).
//!
//! Byte order is detected by sanity-checking the interval field: a value
//! outside [1, 200] days in one order is retried in the other.

use crate::bytes::Endian;
use crate::chebyshev;
use crate::error::{EphemerisError, EphemerisResult};
use memmap2::Mmap;
use std::cell::RefCell;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Index-table rows, in table order.
pub mod table {
    pub const MERCURY: usize = 0;
    pub const VENUS: usize = 1;
    pub const EARTH_MOON_BARYCENTER: usize = 2;
    pub const MARS: usize = 3;
    pub const JUPITER: usize = 4;
    pub const SATURN: usize = 5;
    pub const URANUS: usize = 6;
    pub const NEPTUNE: usize = 7;
    pub const PLUTO: usize = 8;
    pub const MOON: usize = 9;
    pub const SUN: usize = 10;
    pub const NUTATION: usize = 11;
    pub const LIBRATION: usize = 12;
}

const TITLE_LEN: usize = 252;
const CONSTANT_NAMES: usize = 400;
const CONSTANT_NAME_LEN: usize = 6;
const EPOCHS_OFFSET: usize = 2652;
const N_CONSTANTS_OFFSET: usize = 2676;
const AU_OFFSET: usize = 2680;
const EMRAT_OFFSET: usize = 2688;
const INDEX_OFFSET: usize = 2696;
const DE_NUMBER_OFFSET: usize = 2840;
const LIBRATION_OFFSET: usize = 2844;
const HEADER_MIN_BYTES: usize = 2856;

/// One `(offset, n_coeffs, n_intervals)` index triple. The offset is
/// 1-based into the record's doubles, as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexTriple {
    pub offset: i32,
    pub n_coeffs: i32,
    pub n_intervals: i32,
}

impl IndexTriple {
    /// Components per sub-interval for the triple at `table_index`.
    pub fn components(table_index: usize) -> usize {
        if table_index == table::NUTATION {
            2
        } else {
            3
        }
    }
}

/// Parsed header of a JPL record file.
#[derive(Debug, Clone, PartialEq)]
pub struct JplHeader {
    pub title: String,
    pub de_number: i32,
    pub start_jd: f64,
    pub end_jd: f64,
    pub interval_days: f64,
    pub au_km: f64,
    pub earth_moon_ratio: f64,
    pub n_constants: i32,
    pub constant_names: Vec<String>,
    pub index: [IndexTriple; 13],
    pub record_size_bytes: usize,
    pub byte_order: Endian,
}

impl JplHeader {
    pub fn doubles_per_record(&self) -> usize {
        self.record_size_bytes / 8
    }

    pub fn record_count(&self) -> usize {
        ((self.end_jd - self.start_jd) / self.interval_days + 0.5) as usize
    }
}

/// Coefficients for one body over one sub-interval of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct SubIntervalCoefficients {
    pub sub_start_jd: f64,
    pub sub_end_jd: f64,
    /// One coefficient array per component (3 for bodies and librations,
    /// 2 for nutations).
    pub components: Vec<Vec<f64>>,
}

/// Memory-mapped JPL file with a parsed header.
///
/// A single-slot cache retains the most recently decoded record; the
/// `RefCell` makes the reader `!Sync`, so concurrent use means one clone
/// per thread (clones share the mapping and header, not the cache).
#[derive(Debug)]
pub struct JplReader {
    mmap: Arc<Mmap>,
    header: Arc<JplHeader>,
    cache: RefCell<Option<(usize, Arc<Vec<f64>>)>>,
}

impl Clone for JplReader {
    fn clone(&self) -> Self {
        Self {
            mmap: Arc::clone(&self.mmap),
            header: Arc::clone(&self.header),
            cache: RefCell::new(None),
        }
    }
}

fn detect_endian(bytes: &[u8]) -> EphemerisResult<Endian> {
    for endian in [Endian::Little, Endian::Big] {
        let interval = endian.read_f64(&bytes[EPOCHS_OFFSET + 16..]);
        if interval.is_finite() && (1.0..=200.0).contains(&interval) {
            return Ok(endian);
        }
    }
    Err(EphemerisError::BadEndianness(
        "interval field is implausible in both byte orders".into(),
    ))
}

fn ascii_trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

/// Record size from the index table: find the body with the largest start
/// position, count its doubles to the end, and apply the legacy 1546->1652
/// word-size adjustment one historical ephemeris needs.
fn compute_record_size(index: &[IndexTriple; 13]) -> EphemerisResult<usize> {
    let mut kmx = 0i32;
    let mut km = 0usize;
    for (i, triple) in index.iter().enumerate() {
        if triple.offset > kmx {
            kmx = triple.offset;
            km = i;
        }
    }
    if kmx < 3 {
        return Err(EphemerisError::CorruptHeader(
            "index table has no data pointers".into(),
        ));
    }
    let triple = index[km];
    let nc = IndexTriple::components(km) as i32;
    let n_doubles = kmx + nc * triple.n_coeffs * triple.n_intervals - 1;
    let mut ksize = 2 * n_doubles;
    if ksize == 1546 {
        ksize = 1652;
    }
    if ksize <= 0 {
        return Err(EphemerisError::CorruptHeader(format!(
            "computed record size {ksize} words is not positive"
        )));
    }
    Ok(ksize as usize * 4)
}

fn parse_header(bytes: &[u8]) -> EphemerisResult<JplHeader> {
    if bytes.len() < HEADER_MIN_BYTES {
        return Err(EphemerisError::CorruptHeader(format!(
            "file is {} bytes, smaller than the {HEADER_MIN_BYTES}-byte header",
            bytes.len()
        )));
    }
    let endian = detect_endian(bytes)?;

    let title = ascii_trimmed(&bytes[..TITLE_LEN]);
    let mut constant_names = Vec::with_capacity(CONSTANT_NAMES);
    for i in 0..CONSTANT_NAMES {
        let at = TITLE_LEN + i * CONSTANT_NAME_LEN;
        constant_names.push(ascii_trimmed(&bytes[at..at + CONSTANT_NAME_LEN]));
    }

    let start_jd = endian.read_f64(&bytes[EPOCHS_OFFSET..]);
    let end_jd = endian.read_f64(&bytes[EPOCHS_OFFSET + 8..]);
    let interval_days = endian.read_f64(&bytes[EPOCHS_OFFSET + 16..]);
    let n_constants = endian.read_i32(&bytes[N_CONSTANTS_OFFSET..]);
    let au_km = endian.read_f64(&bytes[AU_OFFSET..]);
    let earth_moon_ratio = endian.read_f64(&bytes[EMRAT_OFFSET..]);

    if !(end_jd > start_jd) {
        return Err(EphemerisError::CorruptHeader(format!(
            "end JD {end_jd} does not follow start JD {start_jd}"
        )));
    }
    if !(0..=10_000).contains(&n_constants) {
        return Err(EphemerisError::CorruptHeader(format!(
            "constant count {n_constants} outside 0..=10000"
        )));
    }
    if !(1.49e8..=1.50e8).contains(&au_km) {
        return Err(EphemerisError::CorruptHeader(format!(
            "astronomical unit {au_km} km outside [1.49e8, 1.50e8]"
        )));
    }
    if !(80.0..=82.0).contains(&earth_moon_ratio) {
        return Err(EphemerisError::CorruptHeader(format!(
            "earth/moon mass ratio {earth_moon_ratio} outside [80, 82]"
        )));
    }

    let raw = endian.read_i32_slice(bytes, INDEX_OFFSET, 36);
    let libration = endian.read_i32_slice(bytes, LIBRATION_OFFSET, 3);
    let mut index = [IndexTriple {
        offset: 0,
        n_coeffs: 0,
        n_intervals: 0,
    }; 13];
    for i in 0..12 {
        index[i] = IndexTriple {
            offset: raw[3 * i],
            n_coeffs: raw[3 * i + 1],
            n_intervals: raw[3 * i + 2],
        };
    }
    index[table::LIBRATION] = IndexTriple {
        offset: libration[0],
        n_coeffs: libration[1],
        n_intervals: libration[2],
    };

    let de_number = endian.read_i32(&bytes[DE_NUMBER_OFFSET..]);
    let record_size_bytes = compute_record_size(&index)?;

    Ok(JplHeader {
        title,
        de_number,
        start_jd,
        end_jd,
        interval_days,
        au_km,
        earth_moon_ratio,
        n_constants,
        constant_names,
        index,
        record_size_bytes,
        byte_order: endian,
    })
}

impl JplReader {
    pub fn open<P: AsRef<Path>>(path: P) -> EphemerisResult<Self> {
        let file = File::open(path.as_ref())?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| EphemerisError::Io(e.to_string()))?;
        let header = parse_header(&mmap)?;
        if mmap.len() < header.record_size_bytes {
            return Err(EphemerisError::CorruptHeader(format!(
                "file is {} bytes but one record needs {}",
                mmap.len(),
                header.record_size_bytes
            )));
        }
        Ok(Self {
            mmap: Arc::new(mmap),
            header: Arc::new(header),
            cache: RefCell::new(None),
        })
    }

    pub fn header(&self) -> &JplHeader {
        &self.header
    }

    pub fn covers(&self, jd: f64) -> bool {
        jd >= self.header.start_jd && jd <= self.header.end_jd
    }

    /// Data-record number for `jd`.
    pub fn find_record(&self, jd: f64) -> EphemerisResult<usize> {
        if !self.covers(jd) {
            return Err(EphemerisError::JdOutOfRange {
                jd,
                start: self.header.start_jd,
                end: self.header.end_jd,
            });
        }
        let n = ((jd - self.header.start_jd) / self.header.interval_days) as usize;
        Ok(n.min(self.header.record_count().saturating_sub(1)))
    }

    /// Decode data record `n`, reusing the cached buffer when the same
    /// record is requested twice in a row.
    pub fn read_record(&self, n: usize) -> EphemerisResult<Arc<Vec<f64>>> {
        if let Some((cached_n, doubles)) = self.cache.borrow().as_ref() {
            if *cached_n == n {
                return Ok(Arc::clone(doubles));
            }
        }

        // Record 1 is the header; data records follow it contiguously.
        let record_bytes = self.header.record_size_bytes;
        let offset = record_bytes * (n + 1);
        if offset + record_bytes > self.mmap.len() {
            return Err(EphemerisError::JdOutOfRange {
                jd: f64::NAN,
                start: self.header.start_jd,
                end: self.header.end_jd,
            });
        }
        let doubles = Arc::new(self.header.byte_order.read_f64_slice(
            &self.mmap,
            offset,
            self.header.doubles_per_record(),
        ));
        *self.cache.borrow_mut() = Some((n, Arc::clone(&doubles)));
        Ok(doubles)
    }

    /// Slice the coefficients for one table row out of a decoded record.
    pub fn extract_coefficients(
        &self,
        record: &[f64],
        table_index: usize,
        jd: f64,
    ) -> EphemerisResult<SubIntervalCoefficients> {
        let rec_start = record[0];
        let rec_end = record[1];
        if jd < rec_start || jd > rec_end {
            return Err(EphemerisError::JdOutOfRange {
                jd,
                start: rec_start,
                end: rec_end,
            });
        }

        let triple = self.header.index[table_index];
        if triple.offset < 1 || triple.n_coeffs < 1 || triple.n_intervals < 1 {
            return Err(EphemerisError::EmptyCoefficients);
        }
        let ncf = triple.n_coeffs as usize;
        let ni = triple.n_intervals as usize;
        let n_components = IndexTriple::components(table_index);

        let duration = (rec_end - rec_start) / ni as f64;
        let raw_idx = ((jd - rec_start) / duration) as usize;
        let sub_idx = raw_idx.min(ni - 1);

        let base = (triple.offset - 1) as usize + sub_idx * ncf * n_components;
        if base + ncf * n_components > record.len() {
            return Err(EphemerisError::CorruptHeader(format!(
                "coefficients for table row {table_index} run past the record"
            )));
        }

        let components = (0..n_components)
            .map(|c| record[base + c * ncf..base + (c + 1) * ncf].to_vec())
            .collect();
        Ok(SubIntervalCoefficients {
            sub_start_jd: rec_start + sub_idx as f64 * duration,
            sub_end_jd: rec_start + (sub_idx + 1) as f64 * duration,
            components,
        })
    }

    /// Position and velocity of a table row at `jd`, in the file's native
    /// units (km, km per day) and frame.
    pub fn state(&self, table_index: usize, jd: f64) -> EphemerisResult<([f64; 3], [f64; 3])> {
        let record = self.read_record(self.find_record(jd)?)?;
        let coeffs = self.extract_coefficients(&record, table_index, jd)?;
        if coeffs.components.len() != 3 {
            return Err(EphemerisError::EmptyCoefficients);
        }

        let x = chebyshev::normalize(jd, coeffs.sub_start_jd, coeffs.sub_end_jd)?;
        let rate = 2.0 / (coeffs.sub_end_jd - coeffs.sub_start_jd);

        let mut pos = [0.0; 3];
        let mut vel = [0.0; 3];
        for axis in 0..3 {
            let (value, slope) = chebyshev::evaluate_both(x, &coeffs.components[axis])?;
            pos[axis] = value;
            vel[axis] = slope * rate;
        }
        Ok((pos, vel))
    }

    /// Barycentric Earth from the EMB and geocentric Moon rows.
    pub fn earth_state(&self, jd: f64) -> EphemerisResult<([f64; 3], [f64; 3])> {
        let (emb_pos, emb_vel) = self.state(table::EARTH_MOON_BARYCENTER, jd)?;
        let (moon_pos, moon_vel) = self.state(table::MOON, jd)?;
        let factor = 1.0 / (1.0 + self.header.earth_moon_ratio);
        let mut pos = [0.0; 3];
        let mut vel = [0.0; 3];
        for axis in 0..3 {
            pos[axis] = emb_pos[axis] - moon_pos[axis] * factor;
            vel[axis] = emb_vel[axis] - moon_vel[axis] * factor;
        }
        Ok((pos, vel))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn open_bytes(bytes: &[u8]) -> JplReader {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("de990.eph");
        std::fs::write(&path, bytes).unwrap();
        JplReader::open(&path).unwrap()
    }

    fn plain_file(big_endian: bool) -> Vec<u8> {
        build_jpl(big_endian, 2, |r, doubles| {
            // Mars at a fixed point, different per record and sub-interval.
            for sub in 0..TEST_NI {
                let value = 100.0 * (r as f64 + 1.0) + 10.0 * sub as f64;
                stamp_constant(doubles, table::MARS, sub, 0, value);
                stamp_constant(doubles, table::MARS, sub, 1, -value);
                stamp_constant(doubles, table::MARS, sub, 2, 0.5 * value);
            }
        })
    }

    #[test]
    fn parses_header() {
        let reader = open_bytes(&plain_file(false));
        let header = reader.header();
        assert_eq!(header.byte_order, Endian::Little);
        assert_eq!(header.de_number, 990);
        assert_eq!(header.title, "Test ephemeris DE990");
        assert_eq!(header.start_jd, TEST_START);
        assert_eq!(header.interval_days, TEST_INTERVAL);
        assert_eq!(header.n_constants, 4);
        assert!((header.au_km - 149_597_870.7).abs() < 1e-3);
        assert!((header.earth_moon_ratio - 81.3).abs() < 0.01);
        assert_eq!(header.constant_names.len(), 400);
        assert_eq!(header.record_count(), 2);
    }

    #[test]
    fn record_size_matches_the_layout() {
        let reader = open_bytes(&plain_file(false));
        assert_eq!(
            reader.header().record_size_bytes,
            8 * test_doubles_per_record()
        );
    }

    #[test]
    fn big_endian_files_read_identically() {
        let le = open_bytes(&plain_file(false));
        let be = open_bytes(&plain_file(true));
        assert_eq!(be.header().byte_order, Endian::Big);
        assert_eq!(be.header().de_number, le.header().de_number);

        let jd = TEST_START + 5.0;
        let (pos_le, _) = le.state(table::MARS, jd).unwrap();
        let (pos_be, _) = be.state(table::MARS, jd).unwrap();
        assert_eq!(pos_le, pos_be);
    }

    #[test]
    fn legacy_word_count_is_padded() {
        // A table whose largest row ends at double 773 computes to the
        // historical 1546-word record and must pad to 1652.
        let mut index = [IndexTriple {
            offset: 0,
            n_coeffs: 0,
            n_intervals: 0,
        }; 13];
        index[0] = IndexTriple {
            offset: 3,
            n_coeffs: 7,
            n_intervals: 2,
        };
        index[1] = IndexTriple {
            offset: 732,
            n_coeffs: 7,
            n_intervals: 2,
        };
        // 732 + 42 - 1 = 773 doubles -> 1546 words -> legacy pad.
        assert_eq!(compute_record_size(&index).unwrap(), 1652 * 4);
    }

    #[test]
    fn refuses_corrupt_headers() {
        let dir = tempfile::tempdir().unwrap();

        let mut bytes = plain_file(false);
        bytes[AU_OFFSET..AU_OFFSET + 8].copy_from_slice(&1.0e8f64.to_le_bytes());
        let path = dir.path().join("bad_au.eph");
        std::fs::write(&path, &bytes).unwrap();
        assert!(matches!(
            JplReader::open(&path),
            Err(EphemerisError::CorruptHeader(_))
        ));

        let mut bytes = plain_file(false);
        bytes[EMRAT_OFFSET..EMRAT_OFFSET + 8].copy_from_slice(&50.0f64.to_le_bytes());
        let path = dir.path().join("bad_emrat.eph");
        std::fs::write(&path, &bytes).unwrap();
        assert!(matches!(
            JplReader::open(&path),
            Err(EphemerisError::CorruptHeader(_))
        ));

        let path = dir.path().join("tiny.eph");
        std::fs::write(&path, [0u8; 100]).unwrap();
        assert!(matches!(
            JplReader::open(&path),
            Err(EphemerisError::CorruptHeader(_))
        ));
    }

    #[test]
    fn refuses_unknown_byte_order() {
        let mut bytes = plain_file(false);
        let at = EPOCHS_OFFSET + 16;
        bytes[at..at + 8].copy_from_slice(&1.0e9f64.to_le_bytes());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_endian.eph");
        std::fs::write(&path, &bytes).unwrap();
        assert!(matches!(
            JplReader::open(&path),
            Err(EphemerisError::BadEndianness(_))
        ));
    }

    #[test]
    fn find_record_maps_time_to_records() {
        let reader = open_bytes(&plain_file(false));
        assert_eq!(reader.find_record(TEST_START).unwrap(), 0);
        assert_eq!(reader.find_record(TEST_START + 31.9).unwrap(), 0);
        assert_eq!(reader.find_record(TEST_START + 32.0).unwrap(), 1);
        // The span end belongs to the last record.
        assert_eq!(reader.find_record(TEST_START + 64.0).unwrap(), 1);

        assert!(matches!(
            reader.find_record(TEST_START - 0.1),
            Err(EphemerisError::JdOutOfRange { .. })
        ));
        assert!(reader.find_record(TEST_START + 64.1).is_err());
    }

    #[test]
    fn extracts_sub_interval_coefficients() {
        let reader = open_bytes(&plain_file(false));
        let record = reader.read_record(0).unwrap();

        // First sub-interval (days 0..16 of the record).
        let coeffs = reader
            .extract_coefficients(&record, table::MARS, TEST_START + 2.0)
            .unwrap();
        assert_eq!(coeffs.sub_start_jd, TEST_START);
        assert_eq!(coeffs.sub_end_jd, TEST_START + 16.0);
        assert_eq!(coeffs.components.len(), 3);
        assert_eq!(coeffs.components[0][0], 200.0); // doubled constant 100

        // Second sub-interval.
        let coeffs = reader
            .extract_coefficients(&record, table::MARS, TEST_START + 20.0)
            .unwrap();
        assert_eq!(coeffs.sub_start_jd, TEST_START + 16.0);
        assert_eq!(coeffs.components[0][0], 220.0);

        // Out of the record's own span.
        assert!(reader
            .extract_coefficients(&record, table::MARS, TEST_START + 40.0)
            .is_err());
    }

    #[test]
    fn nutation_row_has_two_components() {
        let bytes = build_jpl(false, 1, |_, doubles| {
            stamp_constant(doubles, table::NUTATION, 0, 0, 1.25);
            stamp_constant(doubles, table::NUTATION, 0, 1, -0.5);
        });
        let reader = open_bytes(&bytes);
        let record = reader.read_record(0).unwrap();
        let coeffs = reader
            .extract_coefficients(&record, table::NUTATION, TEST_START + 1.0)
            .unwrap();
        assert_eq!(coeffs.components.len(), 2);
        assert_eq!(coeffs.components[0][0], 2.5);
    }

    #[test]
    fn state_for_constant_series_has_zero_velocity() {
        let reader = open_bytes(&plain_file(false));
        let (pos, vel) = reader.state(table::MARS, TEST_START + 3.0).unwrap();
        assert_eq!(pos, [100.0, -100.0, 50.0]);
        assert_eq!(vel, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn state_velocity_scales_by_sub_interval() {
        // Linear series: component value = t_norm over a 16-day
        // sub-interval, so the daily rate is 2/16.
        let bytes = build_jpl(false, 1, |_, doubles| {
            let offsets = test_offsets();
            let base = offsets[table::VENUS] - 1;
            doubles[base + 1] = 1.0; // c1 of x component, sub-interval 0
        });
        let reader = open_bytes(&bytes);
        let (pos, vel) = reader.state(table::VENUS, TEST_START + 8.0).unwrap();
        assert!(pos[0].abs() < 1e-12); // t_norm = 0 at mid sub-interval
        assert!((vel[0] - 2.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn earth_state_differences_emb_and_moon() {
        let bytes = build_jpl(false, 1, |_, doubles| {
            for sub in 0..TEST_NI {
                stamp_constant(doubles, table::EARTH_MOON_BARYCENTER, sub, 0, 1000.0);
                stamp_constant(doubles, table::MOON, sub, 0, 82.30056907419062);
            }
        });
        let reader = open_bytes(&bytes);
        let (pos, _) = reader.earth_state(TEST_START + 1.0).unwrap();
        // moon / (1 + emrat) = 82.3005... / 82.3005... = 1.
        assert!((pos[0] - 999.0).abs() < 1e-9);
        assert_eq!(pos[1], 0.0);
    }

    #[test]
    fn cache_reuses_the_same_record() {
        let reader = open_bytes(&plain_file(false));
        let a = reader.read_record(0).unwrap();
        let b = reader.read_record(0).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        // Different record evicts the slot.
        let c = reader.read_record(1).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        let d = reader.read_record(0).unwrap();
        assert_eq!(*a, *d);
    }

    #[test]
    fn clones_share_the_file_not_the_cache() {
        let reader = open_bytes(&plain_file(false));
        let _ = reader.read_record(1).unwrap();
        let clone = reader.clone();
        assert!(clone.cache.borrow().is_none());
        let (pos_a, _) = reader.state(table::MARS, TEST_START + 3.0).unwrap();
        let (pos_b, _) = clone.state(table::MARS, TEST_START + 3.0).unwrap();
        assert_eq!(pos_a, pos_b);
    }
}
