#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;

mod commands;
mod consts;
mod display;
mod errors;
mod loader;
mod object;
mod reader;
mod symbol;

#[cfg(test)]
mod testdata;

pub use crate::commands::{DyLib, LcString, LinkEditData, LoadCommand, Section, SectionFlags, SourceVersionTag, VersionTag};
pub use crate::consts::*;
pub use crate::errors::{MachError, Result};
pub use crate::loader::{is_mach_magic, parse_mach_file, CpuSubType, CpuType, FileType, MachCommand, MachHeader};
pub use crate::object::{BinaryFormat, BinaryObject, MachO, MachObject};
pub use crate::reader::{read_cstr_at, EndianReader, ReadStringExt, SeekExt};
pub use crate::symbol::{SymbolKind, SymbolTableEntry};
