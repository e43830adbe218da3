//! Minimal PE32+ image builder for kind-detection tests.
//!
//! Layout: DOS header with `e_lfanew = 0x80`, one `.text` section mapped at
//! RVA 0x1000 backed by file bytes 0x200..0x400, total size 0x400.
#![allow(dead_code)]

pub const TEXT_RVA: u32 = 0x1000;
pub const TEXT_FILE_OFFSET: usize = 0x200;

const PE_OFFSET: usize = 0x80;
const OPTIONAL_HEADER: usize = PE_OFFSET + 4 + 20;
const DATA_DIRECTORIES: usize = OPTIONAL_HEADER + 112;
const SECTION_TABLE: usize = OPTIONAL_HEADER + 0xF0;
const CLR_DIRECTORY_INDEX: usize = 14;
const IMAGE_SIZE: usize = 0x400;

fn put_u16(buf: &mut [u8], at: usize, value: u16) {
    buf[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_u64(buf: &mut [u8], at: usize, value: u64) {
    buf[at..at + 8].copy_from_slice(&value.to_le_bytes());
}

/// Build an x64 PE image. `clr` is the CLR runtime header directory
/// `(rva, size)`; when it points at `TEXT_RVA`, a COR20 header with
/// `cor20_flags` is written there.
pub fn pe32_plus_image(clr: Option<(u32, u32)>, cor20_flags: u32) -> Vec<u8> {
    let mut img = vec![0u8; IMAGE_SIZE];

    // DOS header.
    img[0..2].copy_from_slice(b"MZ");
    put_u32(&mut img, 0x3c, PE_OFFSET as u32);

    // PE signature + COFF header.
    img[PE_OFFSET..PE_OFFSET + 4].copy_from_slice(b"PE\0\0");
    let coff = PE_OFFSET + 4;
    put_u16(&mut img, coff, 0x8664);
    put_u16(&mut img, coff + 2, 1);
    put_u16(&mut img, coff + 16, 0xF0);
    put_u16(&mut img, coff + 18, 0x0022);

    // Optional header (PE32+).
    let opt = OPTIONAL_HEADER;
    put_u16(&mut img, opt, 0x20b);
    img[opt + 2] = 14;
    put_u32(&mut img, opt + 4, 0x200);
    put_u32(&mut img, opt + 16, TEXT_RVA);
    put_u32(&mut img, opt + 20, TEXT_RVA);
    put_u64(&mut img, opt + 24, 0x1_4000_0000);
    put_u32(&mut img, opt + 32, 0x1000);
    put_u32(&mut img, opt + 36, 0x200);
    put_u16(&mut img, opt + 40, 6);
    put_u16(&mut img, opt + 48, 6);
    put_u32(&mut img, opt + 56, 0x2000);
    put_u32(&mut img, opt + 60, 0x200);
    put_u16(&mut img, opt + 68, 3);
    put_u16(&mut img, opt + 70, 0x8160);
    put_u64(&mut img, opt + 72, 0x10_0000);
    put_u64(&mut img, opt + 80, 0x1000);
    put_u64(&mut img, opt + 88, 0x10_0000);
    put_u64(&mut img, opt + 96, 0x1000);
    put_u32(&mut img, opt + 108, 16);

    if let Some((rva, size)) = clr {
        let dir = DATA_DIRECTORIES + CLR_DIRECTORY_INDEX * 8;
        put_u32(&mut img, dir, rva);
        put_u32(&mut img, dir + 4, size);
    }

    // .text section header.
    let sec = SECTION_TABLE;
    img[sec..sec + 5].copy_from_slice(b".text");
    put_u32(&mut img, sec + 8, 0x200);
    put_u32(&mut img, sec + 12, TEXT_RVA);
    put_u32(&mut img, sec + 16, 0x200);
    put_u32(&mut img, sec + 20, TEXT_FILE_OFFSET as u32);
    put_u32(&mut img, sec + 36, 0x6000_0020);

    // COR20 header at the start of .text.
    if matches!(clr, Some((rva, _)) if rva == TEXT_RVA) {
        let cor = TEXT_FILE_OFFSET;
        put_u32(&mut img, cor, 0x48);
        put_u16(&mut img, cor + 4, 2);
        put_u16(&mut img, cor + 6, 5);
        put_u32(&mut img, cor + 16, cor20_flags);
    }

    img
}
