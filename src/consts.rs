#![allow(non_camel_case_types)]

pub type cpu_type_t = i32;
pub type cpu_subtype_t = i32;
pub type vm_prot_t = i32;

// Capability bits used in the definition of cpu_type.
//

/// mask for architecture bits
pub const CPU_ARCH_MASK: cpu_type_t = 0xff000000u64 as cpu_type_t;
/// 64 bit ABI
pub const CPU_ARCH_ABI64: cpu_type_t = 0x01000000u64 as cpu_type_t;

//  Machine types known by all.
//

pub const CPU_TYPE_ANY: cpu_type_t = -1;

pub const CPU_TYPE_VAX: cpu_type_t = 1;
pub const CPU_TYPE_MC680X0: cpu_type_t = 6;
pub const CPU_TYPE_X86: cpu_type_t = 7;
pub const CPU_TYPE_I386: cpu_type_t = CPU_TYPE_X86;
pub const CPU_TYPE_X86_64: cpu_type_t = CPU_TYPE_X86 | CPU_ARCH_ABI64;
pub const CPU_TYPE_MIPS: cpu_type_t = 8;
pub const CPU_TYPE_MC98000: cpu_type_t = 10;
pub const CPU_TYPE_HPPA: cpu_type_t = 11;
pub const CPU_TYPE_ARM: cpu_type_t = 12;
pub const CPU_TYPE_ARM64: cpu_type_t = CPU_TYPE_ARM | CPU_ARCH_ABI64;
pub const CPU_TYPE_MC88000: cpu_type_t = 13;
pub const CPU_TYPE_SPARC: cpu_type_t = 14;
pub const CPU_TYPE_I860: cpu_type_t = 15;
pub const CPU_TYPE_ALPHA: cpu_type_t = 16;
pub const CPU_TYPE_POWERPC: cpu_type_t = 18;
pub const CPU_TYPE_POWERPC64: cpu_type_t = CPU_TYPE_POWERPC | CPU_ARCH_ABI64;

// Capability bits used in the definition of cpu_subtype.
//

/// mask for feature flags
pub const CPU_SUBTYPE_MASK: cpu_subtype_t = 0xff000000u64 as cpu_subtype_t;
/// 64 bit libraries
pub const CPU_SUBTYPE_LIB64: cpu_subtype_t = 0x80000000u64 as cpu_subtype_t;

pub const CPU_SUBTYPE_X86_ALL: cpu_subtype_t = 3;
pub const CPU_SUBTYPE_X86_64_ALL: cpu_subtype_t = 3;
pub const CPU_SUBTYPE_X86_ARCH1: cpu_subtype_t = 4;
/// Haswell feature subset
pub const CPU_SUBTYPE_X86_64_H: cpu_subtype_t = 8;

pub const CPU_SUBTYPE_ARM_ALL: cpu_subtype_t = 0;
pub const CPU_SUBTYPE_ARM_V7: cpu_subtype_t = 9;
pub const CPU_SUBTYPE_ARM_V7S: cpu_subtype_t = 11;

pub const CPU_SUBTYPE_ARM64_ALL: cpu_subtype_t = 0;
pub const CPU_SUBTYPE_ARM64_V8: cpu_subtype_t = 1;
pub const CPU_SUBTYPE_ARM64E: cpu_subtype_t = 2;

pub const CPU_SUBTYPE_POWERPC_ALL: cpu_subtype_t = 0;

#[inline]
pub fn get_cpu_subtype_type(subtype: cpu_subtype_t) -> cpu_subtype_t {
    subtype & !CPU_SUBTYPE_MASK
}

#[inline]
pub fn get_cpu_subtype_feature(subtype: cpu_subtype_t) -> cpu_subtype_t {
    ((subtype & CPU_SUBTYPE_MASK) as u32 >> 24) as cpu_subtype_t
}

// Constant for the magic field of the mach_header (32-bit architectures)
//

/// the mach magic number
pub const MH_MAGIC: u32 = 0xfeedface;
/// NXSwapInt(MH_MAGIC)
pub const MH_CIGAM: u32 = 0xcefaedfe;

// Constant for the magic field of the mach_header_64 (64-bit architectures)
//

/// the 64-bit mach magic number
pub const MH_MAGIC_64: u32 = 0xfeedfacf;
/// NXSwapInt(MH_MAGIC_64)
pub const MH_CIGAM_64: u32 = 0xcffaedfe;

// Constants for the filetype field of the mach_header
//

/// relocatable object file
pub const MH_OBJECT: u32 = 0x1;
/// demand paged executable file
pub const MH_EXECUTE: u32 = 0x2;
/// fixed VM shared library file
pub const MH_FVMLIB: u32 = 0x3;
/// core file
pub const MH_CORE: u32 = 0x4;
/// preloaded executable file
pub const MH_PRELOAD: u32 = 0x5;
/// dynamically bound shared library
pub const MH_DYLIB: u32 = 0x6;
/// dynamic link editor
pub const MH_DYLINKER: u32 = 0x7;
/// dynamically bound bundle file
pub const MH_BUNDLE: u32 = 0x8;
/// shared library stub for static linking only, no section contents
pub const MH_DYLIB_STUB: u32 = 0x9;
/// companion file with only debug sections
pub const MH_DSYM: u32 = 0xa;
/// x86_64 kexts
pub const MH_KEXT_BUNDLE: u32 = 0xb;

// After MacOS X 10.1 when a new load command is added that is required to be
// understood by the dynamic linker for the image to execute properly the
// LC_REQ_DYLD bit will be or'ed into the load command constant.
//
pub const LC_REQ_DYLD: u32 = 0x80000000;

// Constants for the cmd field of the load commands this crate understands.
pub const LC_SEGMENT: u32 = 0x1; /* segment of this file to be mapped */
pub const LC_SYMTAB: u32 = 0x2; /* link-edit stab symbol table info */
pub const LC_DYSYMTAB: u32 = 0xb; /* dynamic link-edit symbol table info */
pub const LC_LOAD_DYLIB: u32 = 0xc; /* load a dynamically linked shared library */
pub const LC_ID_DYLIB: u32 = 0xd; /* dynamically linked shared lib ident */
pub const LC_SEGMENT_64: u32 = 0x19; /* 64-bit segment of this file to be mapped */
pub const LC_UUID: u32 = 0x1b; /* the uuid */
pub const LC_DYLD_INFO: u32 = 0x22; /* compressed dyld information */
pub const LC_DYLD_INFO_ONLY: u32 = 0x22 | LC_REQ_DYLD; /* compressed dyld information only */
pub const LC_VERSION_MIN_MACOSX: u32 = 0x24; /* build for MacOSX min OS version */
pub const LC_FUNCTION_STARTS: u32 = 0x26; /* compressed table of function start addresses */
pub const LC_DATA_IN_CODE: u32 = 0x29; /* table of non-instructions in __text */
pub const LC_SOURCE_VERSION: u32 = 0x2A; /* source version used to build binary */

// Constants for the flags field of the segment_command

bitflags! {
    pub struct SegmentFlags: u32 {
        /// the file contents for this segment is for the high part of the VM space,
        /// the low part is zero filled (for stacks in core files)
        const SG_HIGHVM = 0x1;
        /// this segment is the VM that is allocated by a fixed VM library,
        /// for overlap checking in the link editor
        const SG_FVMLIB = 0x2;
        /// this segment has nothing that was relocated in it and nothing relocated to it,
        /// that is it maybe safely replaced without relocation
        const SG_NORELOC = 0x4;
        /// This segment is protected.  If the segment starts at file offset 0,
        /// the first page of the segment is not protected.
        /// All other pages of the segment are protected.
        const SG_PROTECTED_VERSION_1 = 0x8;
        /// This segment is made read-only after fixups
        const SG_READ_ONLY = 0x10;
    }
}

// The flags field of a section structure is separated into two parts a section
// type and section attributes.
//

/// 256 section types
pub const SECTION_TYPE: u32 = 0x000000ff;
/// 24 section attributes
pub const SECTION_ATTRIBUTES: u32 = 0xffffff00;

/// section with only non-lazy symbol pointers
pub const S_NON_LAZY_SYMBOL_POINTERS: u32 = 0x6;
/// section with only lazy symbol pointers
pub const S_LAZY_SYMBOL_POINTERS: u32 = 0x7;
/// section with only symbol stubs, byte size of stub in the reserved2 field
pub const S_SYMBOL_STUBS: u32 = 0x8;
/// section with only lazy symbol pointers to lazy loaded dylibs
pub const S_LAZY_DYLIB_SYMBOL_POINTERS: u32 = 0x10;

pub const SEG_PAGEZERO: &str = "__PAGEZERO";
pub const SEG_TEXT: &str = "__TEXT";
pub const SEG_DATA: &str = "__DATA";
pub const SEG_LINKEDIT: &str = "__LINKEDIT";

pub const SECT_TEXT: &str = "__text";

// The n_type field really contains four fields:
//  unsigned char N_STAB:3,
//            N_PEXT:1,
//            N_TYPE:3,
//            N_EXT:1;
// which are used via the following masks.
//
pub const N_STAB: u8 = 0xe0; /* if any of these bits set, a symbolic debugging entry */
pub const N_PEXT: u8 = 0x10; /* private external symbol bit */
pub const N_TYPE: u8 = 0x0e; /* mask for the type bits */
pub const N_EXT: u8 = 0x01; /* external symbol bit, set for external symbols */

// Values for N_TYPE bits of the n_type field.
//
pub const N_UNDF: u8 = 0x0; /* undefined, n_sect == NO_SECT */
pub const N_ABS: u8 = 0x2; /* absolute, n_sect == NO_SECT */
pub const N_SECT: u8 = 0xe; /* defined in section number n_sect */
pub const N_PBUD: u8 = 0xc; /* prebound undefined (defined in a dylib) */
pub const N_INDR: u8 = 0xa; /* indirect */
