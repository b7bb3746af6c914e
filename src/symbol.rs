use std::fmt;
use std::io::Read;

use byteorder::ByteOrder;

use crate::consts::*;
use crate::errors::Result;
use crate::reader::EndianReader;

/// What a symbol table entry refers to, decoded from its `n_type` field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    /// undefined, resolved by the dynamic linker
    Undefined,
    /// absolute, `n_value` is not relocated
    Absolute,
    /// defined in section number `section`
    Defined { section: u8 },
    /// prebound undefined (defined in a dylib)
    Prebound,
    /// indirect, `n_value` is a string table index of the real name
    Indirect,
    /// a symbolic debugging entry
    Debug,
    Unknown(u8),
}

/// One entry of the symbol table.
///
/// Entries are 12 bytes in both 32-bit and 64-bit files: string index (4),
/// type (1), section (1), descriptor (2), value (4). The descriptor is read
/// but not kept.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SymbolTableEntry {
    /// index into the string table, relative to `stroff`
    pub n_strx: i32,
    /// type flag
    pub n_type: u8,
    /// section number or NO_SECT
    pub n_sect: u8,
    /// value of this symbol (or stab offset)
    pub n_value: u32,
}

impl SymbolTableEntry {
    pub const SIZE: usize = 12;

    pub fn parse<R: Read, O: ByteOrder>(buf: &mut EndianReader<R, O>) -> Result<SymbolTableEntry> {
        let n_strx = buf.read_i32()?;
        let n_type = buf.read_u8()?;
        let n_sect = buf.read_u8()?;
        let _n_desc = buf.read_u16()?;
        let n_value = buf.read_u32()?;

        Ok(SymbolTableEntry {
            n_strx,
            n_type,
            n_sect,
            n_value,
        })
    }

    /// Reads `nsyms` consecutive entries from the current position.
    pub fn parse_table<R: Read, O: ByteOrder>(buf: &mut EndianReader<R, O>, nsyms: u32) -> Result<Vec<SymbolTableEntry>> {
        trace!("parsing {} symbol table entries", nsyms);

        (0..nsyms).map(|_| Self::parse(buf)).collect()
    }

    /// The absolute file offset of this entry's name in a string table at `stroff`.
    pub fn name_offset(&self, stroff: u32) -> Option<usize> {
        let offset = i64::from(stroff) + i64::from(self.n_strx);

        if offset < 0 {
            None
        } else {
            Some(offset as usize)
        }
    }

    pub fn kind(&self) -> SymbolKind {
        if self.n_type & N_STAB != 0 {
            return SymbolKind::Debug;
        }

        match self.n_type & N_TYPE {
            N_UNDF => SymbolKind::Undefined,
            N_ABS => SymbolKind::Absolute,
            N_SECT => SymbolKind::Defined { section: self.n_sect },
            N_PBUD => SymbolKind::Prebound,
            N_INDR => SymbolKind::Indirect,
            typ => SymbolKind::Unknown(typ),
        }
    }

    pub fn is_external(&self) -> bool {
        self.n_type & N_EXT == N_EXT
    }

    pub fn is_private_external(&self) -> bool {
        self.n_type & N_PEXT == N_PEXT
    }
}

impl fmt::Display for SymbolTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let external = self.is_external();
        let tag = |c: char| if external { c.to_ascii_uppercase() } else { c };

        match self.kind() {
            SymbolKind::Undefined | SymbolKind::Prebound => write!(f, "         {}", tag('u')),
            SymbolKind::Absolute => write!(f, "{:08x} {}", self.n_value, tag('a')),
            SymbolKind::Defined { .. } => write!(f, "{:08x} {}", self.n_value, tag('d')),
            SymbolKind::Indirect => write!(f, "         {}", tag('i')),
            SymbolKind::Debug => write!(f, "{:08x} -", self.n_value),
            SymbolKind::Unknown(_) => write!(f, "{:08x} ?", self.n_value),
        }
    }
}
