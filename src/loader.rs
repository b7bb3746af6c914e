use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};

use crate::commands::LoadCommand;
use crate::consts::*;
use crate::errors::{MachError, Result};
use crate::reader::EndianReader;

/// The machine a Mach-O file was built for.
///
/// Codes missing from the table decode as `Unknown` carrying the raw value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CpuType {
    Any,
    Vax,
    Mc680x0,
    X86,
    X86_64,
    Mips,
    Mc98000,
    Hppa,
    Arm,
    Arm64,
    Mc88000,
    Sparc,
    I860,
    Alpha,
    PowerPc,
    PowerPc64,
    Unknown(cpu_type_t),
}

impl From<cpu_type_t> for CpuType {
    fn from(cputype: cpu_type_t) -> Self {
        match cputype {
            CPU_TYPE_ANY => CpuType::Any,
            CPU_TYPE_VAX => CpuType::Vax,
            CPU_TYPE_MC680X0 => CpuType::Mc680x0,
            CPU_TYPE_X86 => CpuType::X86,
            CPU_TYPE_X86_64 => CpuType::X86_64,
            CPU_TYPE_MIPS => CpuType::Mips,
            CPU_TYPE_MC98000 => CpuType::Mc98000,
            CPU_TYPE_HPPA => CpuType::Hppa,
            CPU_TYPE_ARM => CpuType::Arm,
            CPU_TYPE_ARM64 => CpuType::Arm64,
            CPU_TYPE_MC88000 => CpuType::Mc88000,
            CPU_TYPE_SPARC => CpuType::Sparc,
            CPU_TYPE_I860 => CpuType::I860,
            CPU_TYPE_ALPHA => CpuType::Alpha,
            CPU_TYPE_POWERPC => CpuType::PowerPc,
            CPU_TYPE_POWERPC64 => CpuType::PowerPc64,
            _ => CpuType::Unknown(cputype),
        }
    }
}

impl From<CpuType> for cpu_type_t {
    fn from(cputype: CpuType) -> Self {
        match cputype {
            CpuType::Any => CPU_TYPE_ANY,
            CpuType::Vax => CPU_TYPE_VAX,
            CpuType::Mc680x0 => CPU_TYPE_MC680X0,
            CpuType::X86 => CPU_TYPE_X86,
            CpuType::X86_64 => CPU_TYPE_X86_64,
            CpuType::Mips => CPU_TYPE_MIPS,
            CpuType::Mc98000 => CPU_TYPE_MC98000,
            CpuType::Hppa => CPU_TYPE_HPPA,
            CpuType::Arm => CPU_TYPE_ARM,
            CpuType::Arm64 => CPU_TYPE_ARM64,
            CpuType::Mc88000 => CPU_TYPE_MC88000,
            CpuType::Sparc => CPU_TYPE_SPARC,
            CpuType::I860 => CPU_TYPE_I860,
            CpuType::Alpha => CPU_TYPE_ALPHA,
            CpuType::PowerPc => CPU_TYPE_POWERPC,
            CpuType::PowerPc64 => CPU_TYPE_POWERPC64,
            CpuType::Unknown(cputype) => cputype,
        }
    }
}

/// The machine variant, interpreted relative to its `CpuType`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CpuSubType {
    X86All,
    X86Arch1,
    X86_64Haswell,
    ArmAll,
    ArmV7,
    ArmV7s,
    Arm64All,
    Arm64V8,
    Arm64E,
    PowerPcAll,
    Unknown(cpu_subtype_t),
}

impl CpuSubType {
    /// Looks up `cpusubtype` for the given machine, ignoring the capability bits.
    pub fn new(cputype: CpuType, cpusubtype: cpu_subtype_t) -> Self {
        let subtype = get_cpu_subtype_type(cpusubtype);

        match (cputype, subtype) {
            (CpuType::X86, CPU_SUBTYPE_X86_ALL) | (CpuType::X86_64, CPU_SUBTYPE_X86_64_ALL) => CpuSubType::X86All,
            (CpuType::X86, CPU_SUBTYPE_X86_ARCH1) => CpuSubType::X86Arch1,
            (CpuType::X86_64, CPU_SUBTYPE_X86_64_H) => CpuSubType::X86_64Haswell,
            (CpuType::Arm, CPU_SUBTYPE_ARM_ALL) => CpuSubType::ArmAll,
            (CpuType::Arm, CPU_SUBTYPE_ARM_V7) => CpuSubType::ArmV7,
            (CpuType::Arm, CPU_SUBTYPE_ARM_V7S) => CpuSubType::ArmV7s,
            (CpuType::Arm64, CPU_SUBTYPE_ARM64_ALL) => CpuSubType::Arm64All,
            (CpuType::Arm64, CPU_SUBTYPE_ARM64_V8) => CpuSubType::Arm64V8,
            (CpuType::Arm64, CPU_SUBTYPE_ARM64E) => CpuSubType::Arm64E,
            (CpuType::PowerPc, CPU_SUBTYPE_POWERPC_ALL) | (CpuType::PowerPc64, CPU_SUBTYPE_POWERPC_ALL) => {
                CpuSubType::PowerPcAll
            }
            _ => CpuSubType::Unknown(subtype),
        }
    }
}

/// The usage of the file, from the `filetype` field of the header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FileType {
    Object,
    Execute,
    FvmLib,
    Core,
    Preload,
    DyLib,
    DyLinker,
    Bundle,
    DyLibStub,
    Dsym,
    KextBundle,
    Unknown(u32),
}

impl From<u32> for FileType {
    fn from(filetype: u32) -> Self {
        match filetype {
            MH_OBJECT => FileType::Object,
            MH_EXECUTE => FileType::Execute,
            MH_FVMLIB => FileType::FvmLib,
            MH_CORE => FileType::Core,
            MH_PRELOAD => FileType::Preload,
            MH_DYLIB => FileType::DyLib,
            MH_DYLINKER => FileType::DyLinker,
            MH_BUNDLE => FileType::Bundle,
            MH_DYLIB_STUB => FileType::DyLibStub,
            MH_DSYM => FileType::Dsym,
            MH_KEXT_BUNDLE => FileType::KextBundle,
            _ => FileType::Unknown(filetype),
        }
    }
}

impl From<FileType> for u32 {
    fn from(filetype: FileType) -> Self {
        match filetype {
            FileType::Object => MH_OBJECT,
            FileType::Execute => MH_EXECUTE,
            FileType::FvmLib => MH_FVMLIB,
            FileType::Core => MH_CORE,
            FileType::Preload => MH_PRELOAD,
            FileType::DyLib => MH_DYLIB,
            FileType::DyLinker => MH_DYLINKER,
            FileType::Bundle => MH_BUNDLE,
            FileType::DyLibStub => MH_DYLIB_STUB,
            FileType::Dsym => MH_DSYM,
            FileType::KextBundle => MH_KEXT_BUNDLE,
            FileType::Unknown(filetype) => filetype,
        }
    }
}

pub trait MachArch {
    const IS_64BIT: bool;

    fn parse_mach_header<R: Read, O: ByteOrder>(magic: u32, buf: &mut EndianReader<R, O>) -> Result<MachHeader> {
        let cputype = buf.read_i32()?;
        let cpusubtype = buf.read_i32()?;
        let filetype = buf.read_u32()?;
        let ncmds = buf.read_u32()?;
        let sizeofcmds = buf.read_u32()?;
        let flags = buf.read_u32()?;

        if Self::IS_64BIT {
            // reserved
            buf.read_u32()?;
        }

        Ok(MachHeader {
            magic,
            cputype: CpuType::from(cputype),
            cpusubtype: CpuSubType::new(CpuType::from(cputype), cpusubtype),
            raw_cpusubtype: cpusubtype,
            filetype: FileType::from(filetype),
            ncmds,
            sizeofcmds,
            flags,
        })
    }
}

pub enum Arch32 {}
pub enum Arch64 {}

impl MachArch for Arch32 {
    const IS_64BIT: bool = false;
}

impl MachArch for Arch64 {
    const IS_64BIT: bool = true;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachHeader {
    pub magic: u32,
    pub cputype: CpuType,
    pub cpusubtype: CpuSubType,
    /// the subtype as stored, including the capability bits
    pub raw_cpusubtype: cpu_subtype_t,
    pub filetype: FileType,
    pub ncmds: u32,
    pub sizeofcmds: u32,
    pub flags: u32,
}

impl MachHeader {
    pub fn is_64bit(&self) -> bool {
        self.magic == MH_MAGIC_64 || self.magic == MH_CIGAM_64
    }

    pub fn is_bigend(&self) -> bool {
        self.magic == MH_MAGIC || self.magic == MH_MAGIC_64
    }

    /// The capability bits of the CPU subtype, such as `CPU_SUBTYPE_LIB64 >> 24`.
    pub fn capabilities(&self) -> cpu_subtype_t {
        get_cpu_subtype_feature(self.raw_cpusubtype)
    }

    /// Size of the header itself; the first load command starts right after it.
    pub fn size(&self) -> usize {
        if self.is_64bit() {
            32
        } else {
            28
        }
    }
}

/// A decoded load command together with its declared `cmdsize`.
#[derive(Debug, Clone)]
pub struct MachCommand(pub LoadCommand, pub usize);

impl MachCommand {
    pub fn command(&self) -> &LoadCommand {
        &self.0
    }

    pub fn cmdsize(&self) -> usize {
        self.1
    }
}

pub fn is_mach_magic(magic: u32) -> bool {
    magic == MH_MAGIC || magic == MH_CIGAM || magic == MH_MAGIC_64 || magic == MH_CIGAM_64
}

/// Reads the magic at offset 0, the magic is always compared in its big-endian form.
pub fn read_magic<R: Read + Seek>(buf: &mut R) -> Result<u32> {
    buf.seek(SeekFrom::Start(0))?;

    Ok(buf.read_u32::<BigEndian>()?)
}

/// Decodes the header and all the load commands of a Mach-O file.
pub fn parse_mach_file<R: Read + Seek>(buf: &mut R) -> Result<(MachHeader, Vec<MachCommand>)> {
    let magic = read_magic(buf)?;

    match magic {
        MH_MAGIC => parse_commands::<Arch32, BigEndian, R>(magic, buf),
        MH_CIGAM => parse_commands::<Arch32, LittleEndian, R>(magic, buf),
        MH_MAGIC_64 => parse_commands::<Arch64, BigEndian, R>(magic, buf),
        MH_CIGAM_64 => parse_commands::<Arch64, LittleEndian, R>(magic, buf),
        _ => Err(MachError::BadMagic(magic)),
    }
}

fn parse_commands<A: MachArch, O: ByteOrder, R: Read + Seek>(
    magic: u32,
    buf: &mut R,
) -> Result<(MachHeader, Vec<MachCommand>)> {
    let mut buf = EndianReader::<_, O>::new(buf);

    let header = A::parse_mach_header(magic, &mut buf)?;

    debug!("parsed mach-o file header: {:?}", header);

    let mut commands = Vec::new();

    for _ in 0..header.ncmds {
        let (cmd, cmdsize) = LoadCommand::parse(&mut buf)?;

        commands.push(MachCommand(cmd, cmdsize));
    }

    debug!("parsed {} load commands", commands.len());

    Ok((header, commands))
}
