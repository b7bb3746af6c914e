//! Builds synthetic Mach-O images for the unit tests.

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::consts::*;
use crate::loader::{CpuSubType, CpuType, FileType, MachHeader};

pub struct MachBuilder {
    pub is_64bit: bool,
    pub little_endian: bool,
    cputype: cpu_type_t,
    cpusubtype: cpu_subtype_t,
    filetype: u32,
    flags: u32,
    ncmds: u32,
    commands: Vec<u8>,
    blobs: Vec<(usize, Vec<u8>)>,
}

impl MachBuilder {
    pub fn new(is_64bit: bool, little_endian: bool) -> Self {
        MachBuilder {
            is_64bit,
            little_endian,
            cputype: if is_64bit { CPU_TYPE_X86_64 } else { CPU_TYPE_X86 },
            cpusubtype: CPU_SUBTYPE_X86_ALL,
            filetype: MH_EXECUTE,
            flags: 0,
            ncmds: 0,
            commands: Vec::new(),
            blobs: Vec::new(),
        }
    }

    pub fn cputype(mut self, cputype: cpu_type_t) -> Self {
        self.cputype = cputype;
        self
    }

    pub fn cpusubtype(mut self, cpusubtype: cpu_subtype_t) -> Self {
        self.cpusubtype = cpusubtype;
        self
    }

    pub fn filetype(mut self, filetype: u32) -> Self {
        self.filetype = filetype;
        self
    }

    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// The header `parse_mach_file` is expected to decode from `build()`.
    pub fn header(&self) -> MachHeader {
        let magic = match (self.is_64bit, self.little_endian) {
            (false, false) => MH_MAGIC,
            (false, true) => MH_CIGAM,
            (true, false) => MH_MAGIC_64,
            (true, true) => MH_CIGAM_64,
        };

        MachHeader {
            magic,
            cputype: CpuType::from(self.cputype),
            cpusubtype: CpuSubType::new(CpuType::from(self.cputype), self.cpusubtype),
            raw_cpusubtype: self.cpusubtype,
            filetype: FileType::from(self.filetype),
            ncmds: self.ncmds,
            sizeofcmds: self.commands.len() as u32,
            flags: self.flags,
        }
    }

    pub fn u16(&self, v: u16) -> Vec<u8> {
        let mut buf = Vec::new();

        if self.little_endian {
            buf.write_u16::<LittleEndian>(v).unwrap();
        } else {
            buf.write_u16::<BigEndian>(v).unwrap();
        }

        buf
    }

    pub fn u32(&self, v: u32) -> Vec<u8> {
        let mut buf = Vec::new();

        if self.little_endian {
            buf.write_u32::<LittleEndian>(v).unwrap();
        } else {
            buf.write_u32::<BigEndian>(v).unwrap();
        }

        buf
    }

    pub fn u64(&self, v: u64) -> Vec<u8> {
        let mut buf = Vec::new();

        if self.little_endian {
            buf.write_u64::<LittleEndian>(v).unwrap();
        } else {
            buf.write_u64::<BigEndian>(v).unwrap();
        }

        buf
    }

    /// A pointer-sized field: 8 bytes in 64-bit images, 4 otherwise.
    pub fn addr(&self, v: u64) -> Vec<u8> {
        if self.is_64bit {
            self.u64(v)
        } else {
            self.u32(v as u32)
        }
    }

    pub fn words(&self, values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|&v| self.u32(v)).collect()
    }

    /// A 12-byte symbol table entry, the same in either image width.
    pub fn nlist(&self, n_strx: i32, n_type: u8, n_sect: u8, n_desc: u16, n_value: u32) -> Vec<u8> {
        let mut buf = self.u32(n_strx as u32);

        buf.push(n_type);
        buf.push(n_sect);
        buf.extend(self.u16(n_desc));
        buf.extend(self.u32(n_value));

        buf
    }

    /// Appends a command whose `cmdsize` covers exactly its payload.
    pub fn command(self, cmd: u32, payload: &[u8]) -> Self {
        let cmdsize = (8 + payload.len()) as u32;

        self.raw_command(cmd, cmdsize, payload)
    }

    /// Appends a command zero-padded up to `cmdsize`.
    pub fn padded_command(self, cmd: u32, cmdsize: u32, payload: &[u8]) -> Self {
        let mut payload = payload.to_vec();

        payload.resize(cmdsize as usize - 8, 0);

        self.raw_command(cmd, cmdsize, &payload)
    }

    /// Appends a command with whatever `cmdsize` and payload given.
    pub fn raw_command(mut self, cmd: u32, cmdsize: u32, payload: &[u8]) -> Self {
        let mut buf = self.u32(cmd);

        buf.extend(self.u32(cmdsize));
        buf.extend_from_slice(payload);

        self.commands.extend(buf);
        self.ncmds += 1;
        self
    }

    pub fn header_size(&self) -> usize {
        if self.is_64bit {
            32
        } else {
            28
        }
    }

    /// Places `bytes` at the absolute file offset `offset`.
    pub fn blob(mut self, offset: usize, bytes: &[u8]) -> Self {
        self.blobs.push((offset, bytes.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let magic = if self.is_64bit { MH_MAGIC_64 } else { MH_MAGIC };

        let mut data = self.u32(magic);

        data.extend(self.u32(self.cputype as u32));
        data.extend(self.u32(self.cpusubtype as u32));
        data.extend(self.u32(self.filetype));
        data.extend(self.u32(self.ncmds));
        data.extend(self.u32(self.commands.len() as u32));
        data.extend(self.u32(self.flags));

        if self.is_64bit {
            data.extend(self.u32(0));
        }

        data.extend_from_slice(&self.commands);

        for (offset, bytes) in &self.blobs {
            let end = offset + bytes.len();

            if data.len() < end {
                data.resize(end, 0);
            }

            data[*offset..end].copy_from_slice(bytes);
        }

        data
    }
}
