//! WOFF 1.0 font containers
//!
//! A WOFF file carries the tables of a TrueType/OpenType (sfnt) font, each
//! optionally zlib-compressed, behind a 44 byte header and a table
//! directory. `fontdb` only parses sfnt data, so [`decode`] rebuilds the
//! sfnt offset table and table records before a face is registered.
//!
//! Extended metadata and private data blocks are not needed to render the
//! font and are skipped.

use std::cmp::Ordering;
use std::io::Read;

use flate2::read::ZlibDecoder;
use thiserror::Error;

const HEADER_LEN: usize = 44;
const TABLE_ENTRY_LEN: usize = 20;
const SFNT_HEADER_LEN: usize = 12;
const SFNT_RECORD_LEN: usize = 16;

/// Largest table count whose sfnt search parameters fit in 16 bits
pub const MAX_TABLES: u16 = 4095;

/// Upper bound on the size of a decoded font
pub const MAX_SFNT_SIZE: usize = 64 * 1024 * 1024;

/// Font file container, told apart by its leading signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Container {
    /// Plain TrueType/OpenType data (or anything unrecognized)
    Sfnt,
    Woff,
    Woff2,
}

impl Container {
    pub fn detect(bytes: &[u8]) -> Self {
        match bytes.get(..4) {
            Some(b"wOFF") => Self::Woff,
            Some(b"wOF2") => Self::Woff2,
            _ => Self::Sfnt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WoffError {
    #[error("Missing WOFF signature")]
    Signature,

    #[error("WOFF data is truncated")]
    Truncated,

    #[error("WOFF header declares {declared} bytes but the file has {actual}")]
    Length { declared: usize, actual: usize },

    #[error("WOFF table count {0} is out of range")]
    TableCount(u16),

    #[error("WOFF table '{tag}' is malformed")]
    Table { tag: String },

    #[error("Decoded font would exceed {max} bytes")]
    TooLarge { max: usize },
}

fn be_u16(bytes: &[u8], at: usize) -> Option<u16> {
    bytes.get(at..at + 2)?.try_into().ok().map(u16::from_be_bytes)
}

fn be_u32(bytes: &[u8], at: usize) -> Option<u32> {
    bytes.get(at..at + 4)?.try_into().ok().map(u32::from_be_bytes)
}

struct TableEntry {
    tag: [u8; 4],
    offset: usize,
    comp_length: usize,
    orig_length: u32,
    checksum: u32,
}

impl TableEntry {
    fn read(woff: &[u8], at: usize) -> Option<Self> {
        Some(Self {
            tag: woff.get(at..at + 4)?.try_into().ok()?,
            offset: be_u32(woff, at + 4)? as usize,
            comp_length: be_u32(woff, at + 8)? as usize,
            orig_length: be_u32(woff, at + 12)?,
            checksum: be_u32(woff, at + 16)?,
        })
    }

    fn len(&self) -> usize {
        self.orig_length as usize
    }

    fn malformed(&self) -> WoffError {
        WoffError::Table {
            tag: String::from_utf8_lossy(&self.tag).into_owned(),
        }
    }

    /// Table data as stored in the sfnt, without padding
    fn inflate(&self, woff: &[u8]) -> Result<Vec<u8>, WoffError> {
        let data = self
            .offset
            .checked_add(self.comp_length)
            .and_then(|end| woff.get(self.offset..end))
            .ok_or_else(|| self.malformed())?;

        let table = match self.comp_length.cmp(&self.len()) {
            Ordering::Equal => data.to_vec(),
            Ordering::Less => {
                let mut table = Vec::with_capacity(self.len());
                // One byte past the declared size is enough to notice overlong streams
                ZlibDecoder::new(data)
                    .take(u64::from(self.orig_length) + 1)
                    .read_to_end(&mut table)
                    .map_err(|_| self.malformed())?;
                table
            }
            Ordering::Greater => return Err(self.malformed()),
        };

        if table.len() == self.len() {
            Ok(table)
        } else {
            Err(self.malformed())
        }
    }
}

/// `searchRange`, `entrySelector` and `rangeShift` of an sfnt offset table
fn search_params(num_tables: u16) -> [u16; 3] {
    let entry_selector = num_tables.ilog2();
    let search_range = 16u16 << entry_selector;
    [
        search_range,
        // ilog2 of a u16 is below 16
        u16::try_from(entry_selector).unwrap_or(0),
        num_tables * 16 - search_range,
    ]
}

/// Unpacks a WOFF 1.0 file into sfnt data that `fontdb` can parse.
pub fn decode(woff: &[u8]) -> Result<Vec<u8>, WoffError> {
    if Container::detect(woff) != Container::Woff {
        return Err(WoffError::Signature);
    }
    if woff.len() < HEADER_LEN {
        return Err(WoffError::Truncated);
    }

    let flavor = be_u32(woff, 4).ok_or(WoffError::Truncated)?;
    let declared = be_u32(woff, 8).ok_or(WoffError::Truncated)? as usize;
    if declared != woff.len() {
        return Err(WoffError::Length {
            declared,
            actual: woff.len(),
        });
    }
    let num_tables = be_u16(woff, 12).ok_or(WoffError::Truncated)?;
    if num_tables == 0 || num_tables > MAX_TABLES {
        return Err(WoffError::TableCount(num_tables));
    }

    let mut entries = (0..usize::from(num_tables))
        .map(|i| TableEntry::read(woff, HEADER_LEN + i * TABLE_ENTRY_LEN))
        .collect::<Option<Vec<_>>>()
        .ok_or(WoffError::Truncated)?;
    entries.sort_by_key(|entry| entry.tag);

    let too_large = WoffError::TooLarge { max: MAX_SFNT_SIZE };
    let data_start = SFNT_HEADER_LEN + entries.len() * SFNT_RECORD_LEN;
    let size = entries
        .iter()
        .try_fold(data_start, |size, entry| {
            size.checked_add(entry.len().next_multiple_of(4))
        })
        .filter(|&size| size <= MAX_SFNT_SIZE)
        .ok_or_else(|| too_large.clone())?;

    let mut sfnt = Vec::with_capacity(size);
    sfnt.extend_from_slice(&flavor.to_be_bytes());
    sfnt.extend_from_slice(&num_tables.to_be_bytes());
    for field in search_params(num_tables) {
        sfnt.extend_from_slice(&field.to_be_bytes());
    }

    let mut offset = data_start;
    for entry in &entries {
        let table_offset = u32::try_from(offset).map_err(|_| too_large.clone())?;
        sfnt.extend_from_slice(&entry.tag);
        sfnt.extend_from_slice(&entry.checksum.to_be_bytes());
        sfnt.extend_from_slice(&table_offset.to_be_bytes());
        sfnt.extend_from_slice(&entry.orig_length.to_be_bytes());
        offset += entry.len().next_multiple_of(4);
    }

    for entry in &entries {
        sfnt.extend_from_slice(&entry.inflate(woff)?);
        sfnt.resize(sfnt.len().next_multiple_of(4), 0);
    }

    Ok(sfnt)
}
