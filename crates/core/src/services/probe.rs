//! Binary-kind detection for PE images.
//!
//! Decides whether an image is native, IL-only managed, or mixed-mode by
//! looking at the CLR runtime header and its COR20 flags.

use goblin::pe::PE;
use thiserror::Error;

use crate::model::BinaryKind;

/// `COMIMAGE_FLAGS_ILONLY` in the COR20 header.
pub const COMIMAGE_FLAGS_ILONLY: u32 = 0x0000_0001;

/// Raw data pointers are rounded down to this boundary by the loader.
const MIN_FILE_ALIGNMENT_MASK: u32 = 0x1ff;

/// Offset of the `Flags` field inside the COR20 header.
const COR20_FLAGS_OFFSET: usize = 16;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Not a PE image: {0}")]
    NotPe(String),
    #[error("Malformed CLR header: {0}")]
    Malformed(String),
}

/// Minimal view of a section header used for RVA translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub virtual_address: u32,
    pub virtual_size: u32,
    pub pointer_to_raw_data: u32,
    pub size_of_raw_data: u32,
}

/// Translate a relative virtual address into a file offset.
pub fn rva_to_offset(rva: u32, sections: &[SectionSpan]) -> Option<usize> {
    sections.iter().find_map(|sec| {
        let extent = sec.virtual_size.max(sec.size_of_raw_data);
        let start = sec.virtual_address;
        let end = start.checked_add(extent)?;
        if rva < start || rva >= end {
            return None;
        }
        let delta = rva - start;
        if delta >= sec.size_of_raw_data {
            return None;
        }
        let raw_start = sec.pointer_to_raw_data & !MIN_FILE_ALIGNMENT_MASK;
        Some(raw_start as usize + delta as usize)
    })
}

/// Read the COR20 `Flags` field from a header located at `offset`.
pub fn cor20_flags(bytes: &[u8], offset: usize) -> Result<u32, ProbeError> {
    let start = offset
        .checked_add(COR20_FLAGS_OFFSET)
        .ok_or_else(|| ProbeError::Malformed("header offset overflows".into()))?;
    let raw = bytes.get(start..start.saturating_add(4)).ok_or_else(|| {
        ProbeError::Malformed(format!("COR20 header at {offset:#x} is truncated"))
    })?;
    Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Classify COR20 flags: IL-only images are managed, the rest mixed-mode.
pub fn kind_from_cor20_flags(flags: u32) -> BinaryKind {
    if flags & COMIMAGE_FLAGS_ILONLY != 0 {
        BinaryKind::Managed
    } else {
        BinaryKind::Mixed
    }
}

/// Detect the binary kind of a PE image.
pub fn probe_binary_kind(bytes: &[u8]) -> Result<BinaryKind, ProbeError> {
    let pe = PE::parse(bytes).map_err(|e| ProbeError::NotPe(e.to_string()))?;
    let Some(optional) = pe.header.optional_header.as_ref() else {
        return Ok(BinaryKind::Native);
    };
    let Some(clr) = optional.data_directories.get_clr_runtime_header() else {
        return Ok(BinaryKind::Native);
    };
    if clr.virtual_address == 0 || clr.size == 0 {
        return Ok(BinaryKind::Native);
    }

    let sections: Vec<SectionSpan> = pe
        .sections
        .iter()
        .map(|s| SectionSpan {
            virtual_address: s.virtual_address,
            virtual_size: s.virtual_size,
            pointer_to_raw_data: s.pointer_to_raw_data,
            size_of_raw_data: s.size_of_raw_data,
        })
        .collect();
    let offset = rva_to_offset(clr.virtual_address, &sections).ok_or_else(|| {
        ProbeError::Malformed(format!(
            "CLR header RVA {:#x} is not backed by any section",
            clr.virtual_address
        ))
    })?;

    Ok(kind_from_cor20_flags(cor20_flags(bytes, offset)?))
}
