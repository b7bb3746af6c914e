use std::fmt;
use std::io::{Read, Seek, SeekFrom};
use std::ops::Deref;

use byteorder::ByteOrder;
use uuid::Uuid;

use crate::consts::*;
use crate::errors::{MachError, Result};
use crate::reader::{EndianReader, ReadStringExt, SeekExt};
use crate::symbol::SymbolTableEntry;

/// The encoded version.
///
///  X.Y.Z is encoded in nibbles xxxx.yy.zz
///
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct VersionTag(pub u32);

impl VersionTag {
    pub fn major(self) -> u32 {
        self.0 >> 16
    }

    pub fn minor(self) -> u32 {
        (self.0 >> 8) & 0xFF
    }

    pub fn release(self) -> u32 {
        self.0 & 0xFF
    }
}

impl From<VersionTag> for u32 {
    fn from(tag: VersionTag) -> u32 {
        tag.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.release() == 0 {
            write!(f, "{}.{}", self.major(), self.minor())
        } else {
            write!(f, "{}.{}.{}", self.major(), self.minor(), self.release())
        }
    }
}

/// The packed version.
///
/// A.B.C.D.E packed as a24.b10.c10.d10.e10
///
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SourceVersionTag(pub u64);

impl SourceVersionTag {
    pub fn parts(self) -> (u32, u32, u32, u32, u32) {
        (
            ((self.0 >> 40) & 0xFFFFFF) as u32,
            ((self.0 >> 30) & 0x3FF) as u32,
            ((self.0 >> 20) & 0x3FF) as u32,
            ((self.0 >> 10) & 0x3FF) as u32,
            (self.0 & 0x3FF) as u32,
        )
    }
}

impl From<SourceVersionTag> for u64 {
    fn from(tag: SourceVersionTag) -> u64 {
        tag.0
    }
}

impl fmt::Display for SourceVersionTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (a, b, c, d, e) = self.parts();

        if e != 0 {
            write!(f, "{}.{}.{}.{}.{}", a, b, c, d, e)
        } else if d != 0 {
            write!(f, "{}.{}.{}.{}", a, b, c, d)
        } else if c != 0 {
            write!(f, "{}.{}.{}", a, b, c)
        } else {
            write!(f, "{}.{}", a, b)
        }
    }
}

/// A variable length string in a load command is represented by an `LcString` structure.
///
/// The strings are stored just after the load command structure and
/// the offset is from the start of the load command structure.  The size
/// of the string is reflected in the cmdsize field of the load command.
///
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LcString(pub usize, pub String);

impl LcString {
    pub fn offset(&self) -> usize {
        self.0
    }

    pub fn as_str(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for LcString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.1)
    }
}

impl Deref for LcString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.1.as_str()
    }
}

/// Dynamically linked shared libraries are identified by two things.
///
/// The pathname (the name of the library as found for execution), and the
/// compatibility version number.  The pathname must match and the compatibility
/// number in the user of the library must be greater than or equal to the
/// library being used.  The time stamp is used to record the time a library was
/// built and copied into user so it can be use to determined if the library used
/// at runtime is exactly the same as used to built the program.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DyLib {
    /// library's path name
    pub name: LcString,
    /// library's build time stamp
    pub timestamp: u32,
    /// library's current version number
    pub current_version: VersionTag,
    /// library's compatibility vers number
    pub compatibility_version: VersionTag,
}

/// The `LinkEditData` contains the offsets and sizes of a blob
/// of data in the __LINKEDIT segment.
///
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkEditData {
    /// file offset of data in __LINKEDIT segment
    pub off: u32,
    /// file size of data in __LINKEDIT segment
    pub size: u32,
}

/// The flags field of a section structure is separated into two parts a section
/// type and section attributes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SectionFlags(pub u32);

impl SectionFlags {
    pub fn sect_type(self) -> u32 {
        self.0 & SECTION_TYPE
    }

    pub fn sect_attrs(self) -> u32 {
        self.0 & SECTION_ATTRIBUTES
    }
}

impl From<SectionFlags> for u32 {
    fn from(flags: SectionFlags) -> u32 {
        flags.0
    }
}

/// A segment is made up of zero or more sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// name of this section
    pub sectname: String,
    /// segment this section goes in
    pub segname: String,
    /// memory address of this section
    pub addr: u64,
    /// size in bytes of this section
    pub size: u64,
    /// file offset of this section
    pub offset: u32,
    /// section alignment (power of 2)
    pub align: u32,
    /// file offset of relocation entries
    pub reloff: u32,
    /// number of relocation entries
    pub nreloc: u32,
    // flags (section type and attributes)
    pub flags: SectionFlags,
    /// reserved (for offset or index)
    pub reserved1: u32,
    /// reserved (for count or sizeof)
    pub reserved2: u32,
    /// reserved, only present in `section_64`
    pub reserved3: u32,
}

const SECTION_SIZE: usize = 68;
const SECTION_64_SIZE: usize = 80;

impl Section {
    fn parse<R: Read, O: ByteOrder>(buf: &mut EndianReader<R, O>, is_64bit: bool) -> Result<Section> {
        let sectname = buf.read_fixed_size_string(16)?;
        let segname = buf.read_fixed_size_string(16)?;
        let (addr, size) = if is_64bit {
            (buf.read_u64()?, buf.read_u64()?)
        } else {
            (u64::from(buf.read_u32()?), u64::from(buf.read_u32()?))
        };

        Ok(Section {
            sectname,
            segname,
            addr,
            size,
            offset: buf.read_u32()?,
            align: buf.read_u32()?,
            reloff: buf.read_u32()?,
            nreloc: buf.read_u32()?,
            flags: SectionFlags(buf.read_u32()?),
            reserved1: buf.read_u32()?,
            reserved2: buf.read_u32()?,
            reserved3: if is_64bit { buf.read_u32()? } else { 0 },
        })
    }
}

/// The load commands directly follow the mach header.
///
/// Only the commands below are understood; any other `cmd` rejects the file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadCommand {
    /// The segment load command indicates that a part of this file is to be
    /// mapped into the task's address space.
    ///
    /// The size of this segment in memory, vmsize, maybe equal to or
    /// larger than the amount to map from this file, filesize.
    /// The file is mapped starting at fileoff to the beginning of
    /// the segment in memory, vmaddr.  The rest of the memory of the segment,
    /// if any, is allocated zero fill on demand.
    ///
    Segment {
        /// segment name, cut at the first NUL
        segname: String,
        /// memory address of this segment
        vmaddr: u64,
        /// memory size of this segment
        vmsize: u64,
        /// file offset of this segment
        fileoff: u64,
        /// amount to map from the file
        filesize: u64,
        /// maximum VM protection
        maxprot: vm_prot_t,
        /// initial VM protection
        initprot: vm_prot_t,
        /// number of sections declared in the segment
        nsects: u32,
        /// flags
        flags: SegmentFlags,
        /// the sections that fit within `cmdsize`
        sections: Vec<Section>,
    },
    /// The 64-bit segment load command, same layout with 8-byte address and size fields.
    Segment64 {
        segname: String,
        vmaddr: u64,
        vmsize: u64,
        fileoff: u64,
        filesize: u64,
        maxprot: vm_prot_t,
        initprot: vm_prot_t,
        nsects: u32,
        flags: SegmentFlags,
        sections: Vec<Section>,
    },

    /// dynamically linked shared lib ident
    IdDyLib(DyLib),
    /// load a dynamically linked shared library
    LoadDyLib(DyLib),

    /// The symtab_command contains the offsets and sizes of the link-edit 4.3BSD
    /// "stab" style symbol table information, along with the entries it points to.
    ///
    SymTab {
        /// symbol table offset
        symoff: u32,
        /// number of symbol table entries
        nsyms: u32,
        /// string table offset
        stroff: u32,
        /// string table size in bytes
        strsize: u32,
        /// the decoded symbol table
        symbols: Vec<SymbolTableEntry>,
    },
    /// The dynamic symbol table; its indexes are consumed but not kept.
    DySymTab,

    /// The uuid load command contains a single 128-bit unique random number that
    /// identifies an object produced by the static link editor.
    ///
    Uuid(Uuid),

    /// compressed table of function start addresses
    FunctionStarts(LinkEditData),
    /// table of non-instructions in __text
    DataInCode(LinkEditData),

    /// The min OS X version on which this binary was built to run.
    VersionMin {
        /// X.Y.Z is encoded in nibbles xxxx.yy.zz
        version: VersionTag,
        /// X.Y.Z is encoded in nibbles xxxx.yy.zz
        sdk: VersionTag,
    },

    /// The dyld_info_command contains the file offsets and sizes of
    /// the new compressed form of the information dyld needs to
    /// load the image.
    DyldInfo {
        /// file offset to rebase info
        rebase_off: u32,
        /// size of rebase info
        rebase_size: u32,
        /// file offset to binding info
        bind_off: u32,
        /// size of binding info
        bind_size: u32,
        /// file offset to weak binding info
        weak_bind_off: u32,
        /// size of weak binding info
        weak_bind_size: u32,
        /// file offset to lazy binding info
        lazy_bind_off: u32,
        /// size of lazy binding infs
        lazy_bind_size: u32,
        /// file offset to lazy binding info
        export_off: u32,
        /// size of lazy binding infs
        export_size: u32,
    },

    /// The source version used to build the binary.
    SourceVersion(SourceVersionTag),
}

const LOAD_COMMAND_HEADER_SIZE: u32 = 8; // cmd + cmdsize

const SEGMENT_COMMAND_SIZE: usize = 56;
const SEGMENT_COMMAND_64_SIZE: usize = 72;

// ilocalsym through nlocrel
const DYSYMTAB_FIELDS: usize = 18;

impl LoadCommand {
    /// Decodes the command at the current position and leaves the stream at
    /// the start of the next one, `cmdsize` bytes after this one began.
    pub fn parse<R: Read + Seek, O: ByteOrder>(buf: &mut EndianReader<R, O>) -> Result<(LoadCommand, usize)> {
        let begin = buf.seek(SeekFrom::Current(0))?;
        let cmd = buf.read_u32()?;
        let cmdsize = buf.read_u32()?;

        if cmdsize < LOAD_COMMAND_HEADER_SIZE {
            return Err(MachError::InvalidCommandSize(cmdsize));
        }

        let command = match cmd {
            LC_SEGMENT | LC_SEGMENT_64 => Self::read_segment(cmd, cmdsize, buf)?,
            LC_ID_DYLIB => LoadCommand::IdDyLib(Self::read_dylib(begin, buf)?),
            LC_LOAD_DYLIB => LoadCommand::LoadDyLib(Self::read_dylib(begin, buf)?),
            LC_DYLD_INFO_ONLY => LoadCommand::DyldInfo {
                rebase_off: buf.read_u32()?,
                rebase_size: buf.read_u32()?,
                bind_off: buf.read_u32()?,
                bind_size: buf.read_u32()?,
                weak_bind_off: buf.read_u32()?,
                weak_bind_size: buf.read_u32()?,
                lazy_bind_off: buf.read_u32()?,
                lazy_bind_size: buf.read_u32()?,
                export_off: buf.read_u32()?,
                export_size: buf.read_u32()?,
            },
            LC_SYMTAB => {
                let symoff = buf.read_u32()?;
                let nsyms = buf.read_u32()?;
                let stroff = buf.read_u32()?;
                let strsize = buf.read_u32()?;

                let symbols = buf.peek_at(u64::from(symoff), |buf| {
                    SymbolTableEntry::parse_table(buf, nsyms)
                })?;

                LoadCommand::SymTab {
                    symoff,
                    nsyms,
                    stroff,
                    strsize,
                    symbols,
                }
            }
            LC_DYSYMTAB => {
                for _ in 0..DYSYMTAB_FIELDS {
                    buf.read_u32()?;
                }

                LoadCommand::DySymTab
            }
            LC_UUID => {
                let mut uuid = [0; 16];

                buf.read_exact(&mut uuid)?;

                LoadCommand::Uuid(Uuid::from_bytes(uuid))
            }
            LC_VERSION_MIN_MACOSX => LoadCommand::VersionMin {
                version: VersionTag(buf.read_u32()?),
                sdk: VersionTag(buf.read_u32()?),
            },
            LC_SOURCE_VERSION => LoadCommand::SourceVersion(SourceVersionTag(buf.read_u64()?)),
            LC_FUNCTION_STARTS => LoadCommand::FunctionStarts(Self::read_linkedit_data(buf)?),
            LC_DATA_IN_CODE => LoadCommand::DataInCode(Self::read_linkedit_data(buf)?),
            _ => return Err(MachError::UnknownCommand(cmd)),
        };

        let read = buf.seek(SeekFrom::Current(0))? - begin;

        debug!("parsed {} command with {}/{} bytes", command.name(), read, cmdsize);

        if read > u64::from(cmdsize) {
            warn!(
                "{} command at 0x{:x} read {} bytes past its cmdsize",
                command.name(),
                begin,
                read - u64::from(cmdsize)
            );
        }

        buf.seek(SeekFrom::Start(begin + u64::from(cmdsize)))?;

        Ok((command, cmdsize as usize))
    }

    fn read_segment<R: Read, O: ByteOrder>(cmd: u32, cmdsize: u32, buf: &mut EndianReader<R, O>) -> Result<LoadCommand> {
        let is_64bit = cmd == LC_SEGMENT_64;
        let segname = buf.read_fixed_size_string(16)?;
        let (vmaddr, vmsize, fileoff, filesize) = if is_64bit {
            (buf.read_u64()?, buf.read_u64()?, buf.read_u64()?, buf.read_u64()?)
        } else {
            (
                u64::from(buf.read_u32()?),
                u64::from(buf.read_u32()?),
                u64::from(buf.read_u32()?),
                u64::from(buf.read_u32()?),
            )
        };
        let maxprot = buf.read_i32()?;
        let initprot = buf.read_i32()?;
        let nsects = buf.read_u32()?;
        let flags = SegmentFlags::from_bits_truncate(buf.read_u32()?);

        let (header_size, section_size) = if is_64bit {
            (SEGMENT_COMMAND_64_SIZE, SECTION_64_SIZE)
        } else {
            (SEGMENT_COMMAND_SIZE, SECTION_SIZE)
        };
        let fits = (cmdsize as usize).saturating_sub(header_size) / section_size;

        if (nsects as usize) > fits {
            warn!(
                "segment {} declares {} sections but only {} fit in {} bytes",
                segname, nsects, fits, cmdsize
            );
        }

        let sections = (0..(nsects as usize).min(fits))
            .map(|_| Section::parse(buf, is_64bit))
            .collect::<Result<Vec<_>>>()?;

        Ok(if is_64bit {
            LoadCommand::Segment64 {
                segname,
                vmaddr,
                vmsize,
                fileoff,
                filesize,
                maxprot,
                initprot,
                nsects,
                flags,
                sections,
            }
        } else {
            LoadCommand::Segment {
                segname,
                vmaddr,
                vmsize,
                fileoff,
                filesize,
                maxprot,
                initprot,
                nsects,
                flags,
                sections,
            }
        })
    }

    fn read_dylib<R: Read + Seek, O: ByteOrder>(begin: u64, buf: &mut EndianReader<R, O>) -> Result<DyLib> {
        let off = buf.read_u32()?;
        let name = buf.peek_at(begin + u64::from(off), |buf| Ok(buf.read_cstr()?))?;

        Ok(DyLib {
            name: LcString(off as usize, name),
            timestamp: buf.read_u32()?,
            current_version: VersionTag(buf.read_u32()?),
            compatibility_version: VersionTag(buf.read_u32()?),
        })
    }

    fn read_linkedit_data<R: Read, O: ByteOrder>(buf: &mut EndianReader<R, O>) -> Result<LinkEditData> {
        Ok(LinkEditData {
            off: buf.read_u32()?,
            size: buf.read_u32()?,
        })
    }

    pub fn cmd(&self) -> u32 {
        match *self {
            LoadCommand::Segment { .. } => LC_SEGMENT,
            LoadCommand::Segment64 { .. } => LC_SEGMENT_64,
            LoadCommand::IdDyLib(_) => LC_ID_DYLIB,
            LoadCommand::LoadDyLib(_) => LC_LOAD_DYLIB,
            LoadCommand::SymTab { .. } => LC_SYMTAB,
            LoadCommand::DySymTab => LC_DYSYMTAB,
            LoadCommand::Uuid(_) => LC_UUID,
            LoadCommand::FunctionStarts(_) => LC_FUNCTION_STARTS,
            LoadCommand::DataInCode(_) => LC_DATA_IN_CODE,
            LoadCommand::VersionMin { .. } => LC_VERSION_MIN_MACOSX,
            LoadCommand::DyldInfo { .. } => LC_DYLD_INFO_ONLY,
            LoadCommand::SourceVersion(_) => LC_SOURCE_VERSION,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            LoadCommand::Segment { .. } => "LC_SEGMENT",
            LoadCommand::Segment64 { .. } => "LC_SEGMENT_64",
            LoadCommand::IdDyLib(_) => "LC_ID_DYLIB",
            LoadCommand::LoadDyLib(_) => "LC_LOAD_DYLIB",
            LoadCommand::SymTab { .. } => "LC_SYMTAB",
            LoadCommand::DySymTab => "LC_DYSYMTAB",
            LoadCommand::Uuid(_) => "LC_UUID",
            LoadCommand::FunctionStarts(_) => "LC_FUNCTION_STARTS",
            LoadCommand::DataInCode(_) => "LC_DATA_IN_CODE",
            LoadCommand::VersionMin { .. } => "LC_VERSION_MIN_MACOSX",
            LoadCommand::DyldInfo { .. } => "LC_DYLD_INFO_ONLY",
            LoadCommand::SourceVersion(_) => "LC_SOURCE_VERSION",
        }
    }
}

#[cfg(test)]
pub mod tests {
    use std::io::{Cursor, Seek, SeekFrom};

    use byteorder::{BigEndian, LittleEndian};

    use super::*;
    use crate::symbol::SymbolKind;
    use crate::testdata::MachBuilder;

    /// Parses the first command of the built image, returning it with its
    /// `cmdsize` and the stream position the parser left behind.
    fn parse_first(b: &MachBuilder) -> Result<(LoadCommand, usize, u64)> {
        let data = b.build();
        let mut cur = Cursor::new(&data[..]);

        cur.seek(SeekFrom::Start(b.header_size() as u64)).unwrap();

        let (cmd, cmdsize) = if b.little_endian {
            LoadCommand::parse(&mut EndianReader::<_, LittleEndian>::new(&mut cur))?
        } else {
            LoadCommand::parse(&mut EndianReader::<_, BigEndian>::new(&mut cur))?
        };

        Ok((cmd, cmdsize, cur.position()))
    }

    fn segment_payload(b: &MachBuilder, segname: &str, fields: [u64; 4], nsects: u32) -> Vec<u8> {
        let mut name = [0u8; 16];

        name[..segname.len()].copy_from_slice(segname.as_bytes());

        let mut payload = name.to_vec();

        for &v in &fields {
            payload.extend(b.addr(v));
        }

        payload.extend(b.words(&[7, 5, nsects, SegmentFlags::SG_NORELOC.bits()]));
        payload
    }

    fn section_payload(b: &MachBuilder, sectname: &str, segname: &str, addr: u64, size: u64) -> Vec<u8> {
        let mut payload = Vec::new();

        for name in &[sectname, segname] {
            let mut buf = [0u8; 16];

            buf[..name.len()].copy_from_slice(name.as_bytes());
            payload.extend_from_slice(&buf);
        }

        payload.extend(b.addr(addr));
        payload.extend(b.addr(size));
        payload.extend(b.words(&[0x1000, 4, 0, 0, 0x80000400, 0, 0]));

        if b.is_64bit {
            payload.extend(b.u32(0));
        }

        payload
    }

    #[test]
    fn test_parse_segment64() {
        let b = MachBuilder::new(true, true);
        let mut payload = segment_payload(&b, SEG_TEXT, [0x100000000, 0x1000, 0, 0x1000], 1);

        payload.extend(section_payload(&b, SECT_TEXT, SEG_TEXT, 0x100000f50, 0x3a));

        let b = b.command(LC_SEGMENT_64, &payload);

        let (cmd, cmdsize, pos) = parse_first(&b).unwrap();

        assert_eq!(cmdsize, 72 + 80);
        assert_eq!(pos, 32 + 72 + 80);

        if let LoadCommand::Segment64 {
            ref segname,
            vmaddr,
            vmsize,
            fileoff,
            filesize,
            maxprot,
            initprot,
            nsects,
            flags,
            ref sections,
        } = cmd
        {
            assert_eq!(segname, SEG_TEXT);
            assert_eq!(vmaddr, 0x100000000);
            assert_eq!(vmsize, 0x1000);
            assert_eq!(fileoff, 0);
            assert_eq!(filesize, 0x1000);
            assert_eq!(maxprot, 7);
            assert_eq!(initprot, 5);
            assert_eq!(nsects, 1);
            assert_eq!(flags, SegmentFlags::SG_NORELOC);
            assert_eq!(sections.len(), 1);
            assert_eq!(sections[0].sectname, SECT_TEXT);
            assert_eq!(sections[0].segname, SEG_TEXT);
            assert_eq!(sections[0].addr, 0x100000f50);
            assert_eq!(sections[0].size, 0x3a);
            assert_eq!(sections[0].offset, 0x1000);
            assert_eq!(sections[0].align, 4);
            assert_eq!(sections[0].flags.sect_type(), 0);
            assert_eq!(sections[0].flags.sect_attrs(), 0x80000400);
        } else {
            panic!("unexpected command: {:?}", cmd);
        }
    }

    #[test]
    fn test_parse_segment32_big_endian() {
        let b = MachBuilder::new(false, false);
        let payload = segment_payload(&b, SEG_PAGEZERO, [0, 0x1000, 0, 0], 0);
        let b = b.command(LC_SEGMENT, &payload);

        let (cmd, cmdsize, pos) = parse_first(&b).unwrap();

        assert_eq!(cmdsize, 56);
        assert_eq!(pos, 28 + 56);

        match cmd {
            LoadCommand::Segment {
                ref segname,
                vmsize,
                ref sections,
                ..
            } => {
                assert_eq!(segname, SEG_PAGEZERO);
                assert_eq!(vmsize, 0x1000);
                assert!(sections.is_empty());
            }
            _ => panic!("unexpected command: {:?}", cmd),
        }
    }

    #[test]
    fn test_segment_sections_bounded_by_cmdsize() {
        // claims three sections but cmdsize only leaves room for one
        let b = MachBuilder::new(false, true);
        let mut payload = segment_payload(&b, SEG_DATA, [0x2000, 0x1000, 0x1000, 0x1000], 3);

        payload.extend(section_payload(&b, "__data", SEG_DATA, 0x2000, 0x10));

        let b = b.command(LC_SEGMENT, &payload);

        let (cmd, cmdsize, pos) = parse_first(&b).unwrap();

        assert_eq!(cmdsize, 56 + 68);
        assert_eq!(pos, 28 + 56 + 68);

        match cmd {
            LoadCommand::Segment { nsects, ref sections, .. } => {
                assert_eq!(nsects, 3);
                assert_eq!(sections.len(), 1);
            }
            _ => panic!("unexpected command: {:?}", cmd),
        }
    }

    #[test]
    fn test_parse_dylib_command() {
        for &little_endian in &[false, true] {
            let b = MachBuilder::new(true, little_endian);
            let mut payload = b.words(&[24, 2, 0x04ca0a01, 0x00010000]);

            payload.extend_from_slice(b"/usr/lib/libSystem.B.dylib\0");

            let b = b.padded_command(LC_LOAD_DYLIB, 56, &payload);

            let (cmd, cmdsize, pos) = parse_first(&b).unwrap();

            assert_eq!(cmdsize, 56);
            assert_eq!(pos, 32 + 56);

            if let LoadCommand::LoadDyLib(ref dylib) = cmd {
                assert_eq!(dylib.name, LcString(24, String::from("/usr/lib/libSystem.B.dylib")));
                assert_eq!(dylib.timestamp, 2);
                assert_eq!(dylib.current_version.to_string(), "1226.10.1");
                assert_eq!(dylib.compatibility_version.to_string(), "1.0");
            } else {
                panic!("unexpected command: {:?}", cmd);
            }
        }
    }

    #[test]
    fn test_parse_id_dylib_command() {
        let b = MachBuilder::new(false, true).filetype(MH_DYLIB);
        let mut payload = b.words(&[24, 0, 0x00010203, 0x00010000]);

        payload.extend_from_slice(b"libfoo.dylib\0");

        let b = b.padded_command(LC_ID_DYLIB, 40, &payload);

        let (cmd, _, pos) = parse_first(&b).unwrap();

        assert_eq!(pos, 28 + 40);

        match cmd {
            LoadCommand::IdDyLib(ref dylib) => {
                assert_eq!(dylib.name.as_str(), "libfoo.dylib");
                assert_eq!(dylib.name.offset(), 24);
                assert_eq!(dylib.current_version.to_string(), "1.2.3");
            }
            _ => panic!("unexpected command: {:?}", cmd),
        }
    }

    #[test]
    fn test_parse_dyld_info_command() {
        let b = MachBuilder::new(true, true);
        let payload = b.words(&[
            0x1f5000, 3368, 0x1f5d28, 80, 0x1f5d78, 24, 0x1f5d90, 1688, 0x1f6428, 34856,
        ]);
        let b = b.command(LC_DYLD_INFO_ONLY, &payload);

        let (cmd, cmdsize, pos) = parse_first(&b).unwrap();

        assert_eq!(cmdsize, 48);
        assert_eq!(pos, 32 + 48);
        assert_eq!(
            cmd,
            LoadCommand::DyldInfo {
                rebase_off: 0x1f5000,
                rebase_size: 3368,
                bind_off: 0x1f5d28,
                bind_size: 80,
                weak_bind_off: 0x1f5d78,
                weak_bind_size: 24,
                lazy_bind_off: 0x1f5d90,
                lazy_bind_size: 1688,
                export_off: 0x1f6428,
                export_size: 34856,
            }
        );
    }

    #[test]
    fn test_dyld_info_requires_dyld_bit() {
        let b = MachBuilder::new(true, true);
        let payload = b.words(&[0; 10]);
        let b = b.command(LC_DYLD_INFO, &payload);

        match parse_first(&b) {
            Err(MachError::UnknownCommand(LC_DYLD_INFO)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_symtab_command() {
        let b = MachBuilder::new(false, true);
        let symoff = 0x100;
        let stroff = 0x200;
        let mut symbols = b.nlist(1, N_SECT | N_EXT, 1, 0, 0x1f50);

        symbols.extend(b.nlist(7, N_UNDF | N_EXT, 0, 0x100, 0));

        let payload = b.words(&[symoff, 2, stroff, 16]);
        let b = b
            .command(LC_SYMTAB, &payload)
            .blob(symoff as usize, &symbols)
            .blob(stroff as usize, b"\0_main\0_puts\0\0\0\0");

        let (cmd, cmdsize, pos) = parse_first(&b).unwrap();

        assert_eq!(cmdsize, 24);
        assert_eq!(pos, 28 + 24);

        if let LoadCommand::SymTab {
            symoff,
            nsyms,
            stroff,
            strsize,
            ref symbols,
        } = cmd
        {
            assert_eq!(symoff, 0x100);
            assert_eq!(nsyms, 2);
            assert_eq!(stroff, 0x200);
            assert_eq!(strsize, 16);
            assert_eq!(symbols.len(), 2);
            assert_eq!(symbols[0].n_strx, 1);
            assert_eq!(symbols[0].n_value, 0x1f50);
            assert_eq!(symbols[0].kind(), SymbolKind::Defined { section: 1 });
            assert!(symbols[0].is_external());
            assert_eq!(symbols[1].n_strx, 7);
            assert_eq!(symbols[1].kind(), SymbolKind::Undefined);
        } else {
            panic!("unexpected command: {:?}", cmd);
        }
    }

    #[test]
    fn test_parse_symtab_command_64() {
        // the string table directly follows the single 12-byte entry
        let b = MachBuilder::new(true, false);
        let symbols = b.nlist(0, N_SECT | N_EXT, 1, 0, 0x1000);
        let payload = b.words(&[0x100, 1, 0x10c, 8]);
        let b = b.command(LC_SYMTAB, &payload).blob(0x100, &symbols).blob(0x10c, b"main\0");

        let (cmd, _, pos) = parse_first(&b).unwrap();

        assert_eq!(pos, 32 + 24);

        match cmd {
            LoadCommand::SymTab { ref symbols, .. } => {
                assert_eq!(symbols.len(), 1);
                assert_eq!(symbols[0].n_strx, 0);
                assert_eq!(symbols[0].n_value, 0x1000);
            }
            _ => panic!("unexpected command: {:?}", cmd),
        }
    }

    #[test]
    fn test_truncated_symtab_is_io_error() {
        let b = MachBuilder::new(false, true);
        let payload = b.words(&[0x100, 1000, 0x200, 8]);
        let b = b.command(LC_SYMTAB, &payload).blob(0x100, &[0; 12]);

        match parse_first(&b) {
            Err(MachError::IoError(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_dysymtab_command() {
        let b = MachBuilder::new(true, true);
        let payload = b.words(&[
            0, 35968, 35968, 746, 36714, 83, 0, 0, 0, 0, 0, 0, 2689368, 167, 0, 0, 0, 0,
        ]);
        let b = b.command(LC_DYSYMTAB, &payload);

        let (cmd, cmdsize, pos) = parse_first(&b).unwrap();

        assert_eq!(cmd, LoadCommand::DySymTab);
        assert_eq!(cmdsize, 80);
        assert_eq!(pos, 32 + 80);
    }

    #[test]
    fn test_parse_uuid_command() {
        let b = MachBuilder::new(true, true);
        let uuid = [
            0x92, 0xe3, 0xcf, 0x1f, 0x20, 0xda, 0x33, 0x73, 0xa9, 0x8c, 0x85, 0x13, 0x66, 0xd3, 0x53, 0xbf,
        ];
        let b = b.command(LC_UUID, &uuid);

        let (cmd, cmdsize, _) = parse_first(&b).unwrap();

        assert_eq!(cmdsize, 24);

        if let LoadCommand::Uuid(ref uuid) = cmd {
            assert_eq!(uuid.hyphenated().to_string(), "92e3cf1f-20da-3373-a98c-851366d353bf");
        } else {
            panic!("unexpected command: {:?}", cmd);
        }
    }

    #[test]
    fn test_parse_min_version_command() {
        let b = MachBuilder::new(true, true);
        let payload = b.words(&[0x000a0b00, 0x000a0b00]);
        let b = b.command(LC_VERSION_MIN_MACOSX, &payload);

        let (cmd, cmdsize, _) = parse_first(&b).unwrap();

        assert_eq!(cmdsize, 16);

        if let LoadCommand::VersionMin { version, sdk } = cmd {
            assert_eq!(version.to_string(), "10.11");
            assert_eq!(sdk.to_string(), "10.11");
        } else {
            panic!("unexpected command: {:?}", cmd);
        }
    }

    #[test]
    fn test_parse_source_version_command() {
        let b = MachBuilder::new(true, false);
        let payload = b.u64((602 << 40) | (1 << 30) | (2 << 20));
        let b = b.command(LC_SOURCE_VERSION, &payload);

        let (cmd, cmdsize, _) = parse_first(&b).unwrap();

        assert_eq!(cmdsize, 16);

        if let LoadCommand::SourceVersion(version) = cmd {
            assert_eq!(version.to_string(), "602.1.2");
        } else {
            panic!("unexpected command: {:?}", cmd);
        }
    }

    #[test]
    fn test_parse_link_edit_data_command() {
        let b = MachBuilder::new(true, true);
        let payload = b.words(&[0x1fec50, 8504]);
        let b = b.command(LC_FUNCTION_STARTS, &payload);

        let (cmd, cmdsize, _) = parse_first(&b).unwrap();

        assert_eq!(cmdsize, 16);
        assert_eq!(
            cmd,
            LoadCommand::FunctionStarts(LinkEditData {
                off: 0x1fec50,
                size: 8504
            })
        );

        let b = MachBuilder::new(true, true);
        let payload = b.words(&[0x200d88, 0]);
        let b = b.command(LC_DATA_IN_CODE, &payload);

        let (cmd, _, _) = parse_first(&b).unwrap();

        assert_eq!(cmd, LoadCommand::DataInCode(LinkEditData { off: 0x200d88, size: 0 }));
    }

    #[test]
    fn test_padding_is_skipped() {
        let b = MachBuilder::new(true, true);
        let payload = b.words(&[0x1000, 0x10]);
        let b = b.padded_command(LC_DATA_IN_CODE, 64, &payload);

        let (cmd, cmdsize, pos) = parse_first(&b).unwrap();

        assert_eq!(cmd.name(), "LC_DATA_IN_CODE");
        assert_eq!(cmdsize, 64);
        assert_eq!(pos, 32 + 64);
    }

    #[test]
    fn test_short_cmdsize_resynchronizes() {
        // the parser reads past the declared size, the stream still lands on cmdsize
        let b = MachBuilder::new(true, true);
        let payload = b.words(&[0x1000, 0x10, 0xdead, 0xbeef]);
        let b = b.raw_command(LC_FUNCTION_STARTS, 12, &payload);

        let (_, cmdsize, pos) = parse_first(&b).unwrap();

        assert_eq!(cmdsize, 12);
        assert_eq!(pos, 32 + 12);
    }

    #[test]
    fn test_unknown_command() {
        let b = MachBuilder::new(false, false);
        let b = b.command(0xFFFFFFF0, &[0; 8]);

        match parse_first(&b) {
            Err(MachError::UnknownCommand(0xFFFFFFF0)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_command_size() {
        let b = MachBuilder::new(false, true);
        let b = b.raw_command(LC_UUID, 4, &[0; 16]);

        match parse_first(&b) {
            Err(MachError::InvalidCommandSize(4)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_command_names() {
        let cmd = LoadCommand::SourceVersion(SourceVersionTag::default());

        assert_eq!(cmd.cmd(), LC_SOURCE_VERSION);
        assert_eq!(cmd.name(), "LC_SOURCE_VERSION");
        assert_eq!(LoadCommand::DySymTab.name(), "LC_DYSYMTAB");
    }
}
