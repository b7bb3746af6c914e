use std::fs::File;
use std::io::{self, Cursor, ErrorKind, Read, Seek, Write};
use std::ops::Deref;

use memmap::Mmap;

use crate::commands::LoadCommand;
use crate::errors::{MachError, Result};
use crate::loader::{is_mach_magic, parse_mach_file, read_magic, MachCommand, MachHeader};
use crate::reader::read_cstr_at;
use crate::symbol::SymbolTableEntry;

/// A binary file format that can recognize and load its own files.
pub trait BinaryFormat {
    type Object: BinaryObject;

    /// Checks the leading magic without decoding anything else.
    fn supported<R: Read + Seek>(&self, file: &mut R) -> Result<bool>;

    /// Decodes `file` and maps it for the later symbol queries.
    fn load(&self, file: &File) -> Result<Self::Object>;
}

/// A loaded binary file.
pub trait BinaryObject {
    type Segment;

    fn segments(&self) -> &[Self::Segment];

    fn disassemble<W: Write>(&self, w: &mut W) -> io::Result<()>;

    fn symbols(&self) -> Vec<String>;

    fn get_symbol(&self, name: &str) -> Option<&[u8]>;
}

/// The Mach-O file format.
#[derive(Debug, Default, Copy, Clone)]
pub struct MachO;

impl BinaryFormat for MachO {
    type Object = MachObject<Mmap>;

    fn supported<R: Read + Seek>(&self, file: &mut R) -> Result<bool> {
        match read_magic(file) {
            Ok(magic) => Ok(is_mach_magic(magic)),
            Err(MachError::IoError(ref err)) if err.kind() == ErrorKind::UnexpectedEof => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn load(&self, file: &File) -> Result<Self::Object> {
        let mmap = unsafe { Mmap::map(file)? };

        MachObject::parse(mmap)
    }
}

/// A decoded Mach-O file together with the bytes it was decoded from.
///
/// The load commands are decoded once; symbol names and contents are looked
/// up in `data` on every query.
#[derive(Debug)]
pub struct MachObject<B = Mmap> {
    header: MachHeader,
    commands: Vec<MachCommand>,
    data: B,
}

impl<B: Deref<Target = [u8]>> MachObject<B> {
    pub fn parse(data: B) -> Result<Self> {
        let (header, commands) = parse_mach_file(&mut Cursor::new(&data[..]))?;

        Ok(MachObject { header, commands, data })
    }

    pub fn header(&self) -> &MachHeader {
        &self.header
    }

    pub fn commands(&self) -> &[MachCommand] {
        &self.commands
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Every symbol table entry whose name resolves, paired with that name,
    /// in the order of the symbol tables and their entries.
    pub fn symbol_entries(&self) -> impl Iterator<Item = (String, &SymbolTableEntry)> + '_ {
        let data = &self.data[..];

        self.commands
            .iter()
            .filter_map(|cmd| match cmd.0 {
                LoadCommand::SymTab {
                    stroff, ref symbols, ..
                } => Some((stroff, symbols)),
                _ => None,
            })
            .flat_map(move |(stroff, symbols)| {
                symbols.iter().filter_map(move |entry| {
                    match entry.name_offset(stroff).and_then(|offset| read_cstr_at(data, offset)) {
                        Some(name) => Some((name, entry)),
                        None => {
                            trace!("symbol name at 0x{:x}{:+} is out of the file", stroff, entry.n_strx);

                            None
                        }
                    }
                })
            })
    }
}

impl<B: Deref<Target = [u8]>> BinaryObject for MachObject<B> {
    type Segment = MachCommand;

    fn segments(&self) -> &[MachCommand] {
        &self.commands
    }

    fn disassemble<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for (i, cmd) in self.commands.iter().enumerate() {
            writeln!(w, "Load command {}", i)?;
            write!(w, "{}", cmd)?;
        }

        Ok(())
    }

    fn symbols(&self) -> Vec<String> {
        self.symbol_entries().map(|(name, _)| name).collect()
    }

    fn get_symbol(&self, name: &str) -> Option<&[u8]> {
        let (_, entry) = self.symbol_entries().find(|(symbol, _)| symbol == name)?;

        if entry.n_value as usize > self.data.len() {
            trace!("symbol {} points at 0x{:x}, out of the file", name, entry.n_value);

            return None;
        }

        self.data.get(entry.n_value as usize..)
    }
}
