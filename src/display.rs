use std::fmt;

use crate::commands::{LinkEditData, LoadCommand};
use crate::consts::*;
use crate::loader::{MachCommand, MachHeader};

impl fmt::Display for MachHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Mach header")?;
        writeln!(
            f,
            "      magic cputype cpusubtype  caps    filetype ncmds sizeofcmds      flags"
        )?;
        writeln!(
            f,
            " 0x{:08x} {:7} {:10}  0x{:02x}  {:10} {:5} {:10} 0x{:08x}",
            if self.is_64bit() { MH_MAGIC_64 } else { MH_MAGIC },
            cpu_type_t::from(self.cputype),
            get_cpu_subtype_type(self.raw_cpusubtype),
            self.capabilities(),
            u32::from(self.filetype),
            self.ncmds,
            self.sizeofcmds,
            self.flags
        )
    }
}

#[cfg(feature = "display")]
fn format_timestamp(timestamp: u32) -> Result<String, fmt::Error> {
    let format = time::macros::format_description!(
        "[weekday repr:short] [month repr:short] [day padding:space] [hour]:[minute]:[second] [year]"
    );

    time::OffsetDateTime::from_unix_timestamp(i64::from(timestamp))
        .map_err(|_| fmt::Error)?
        .format(format)
        .map_err(|_| fmt::Error)
}

impl MachCommand {
    fn print_segment_command(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let MachCommand(ref cmd, cmdsize) = *self;

        match *cmd {
            LoadCommand::Segment {
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
            }
            | LoadCommand::Segment64 {
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
            } => {
                let is_64bit = cmd.cmd() == LC_SEGMENT_64;

                writeln!(f, "      cmd {}", cmd.name())?;
                writeln!(f, "  cmdsize {}", cmdsize)?;
                writeln!(f, "  segname {}", segname)?;
                if is_64bit {
                    writeln!(f, "   vmaddr 0x{:016x}", vmaddr)?;
                    writeln!(f, "   vmsize 0x{:016x}", vmsize)?;
                } else {
                    writeln!(f, "   vmaddr 0x{:08x}", vmaddr)?;
                    writeln!(f, "   vmsize 0x{:08x}", vmsize)?;
                }
                writeln!(f, "  fileoff {}", fileoff)?;
                writeln!(f, " filesize {}", filesize)?;
                writeln!(f, "  maxprot 0x{:08x}", maxprot)?;
                writeln!(f, " initprot 0x{:08x}", initprot)?;
                writeln!(f, "   nsects {}", nsects)?;
                writeln!(f, "    flags 0x{:x}", flags.bits())?;

                for section in sections {
                    writeln!(f, "Section")?;
                    writeln!(f, "  sectname {}", section.sectname)?;
                    writeln!(
                        f,
                        "   segname {}{}",
                        section.segname,
                        if *segname != section.segname {
                            " (does not match segment)"
                        } else {
                            ""
                        }
                    )?;
                    if is_64bit {
                        writeln!(f, "      addr 0x{:016x}", section.addr)?;
                        writeln!(f, "      size 0x{:016x}", section.size)?;
                    } else {
                        writeln!(f, "      addr 0x{:08x}", section.addr)?;
                        writeln!(f, "      size 0x{:08x}", section.size)?;
                    }
                    writeln!(f, "    offset {}", section.offset)?;
                    writeln!(f, "     align 2^{} ({})", section.align, 1u64 << section.align.min(63))?;
                    writeln!(f, "    reloff {}", section.reloff)?;
                    writeln!(f, "    nreloc {}", section.nreloc)?;
                    writeln!(f, "     flags 0x{:08x}", u32::from(section.flags))?;
                    writeln!(
                        f,
                        " reserved1 {}{}",
                        section.reserved1,
                        match section.flags.sect_type() {
                            S_SYMBOL_STUBS
                            | S_LAZY_SYMBOL_POINTERS
                            | S_LAZY_DYLIB_SYMBOL_POINTERS
                            | S_NON_LAZY_SYMBOL_POINTERS => " (index into indirect symbol table)",
                            _ => "",
                        }
                    )?;
                    writeln!(
                        f,
                        " reserved2 {}{}",
                        section.reserved2,
                        if section.flags.sect_type() == S_SYMBOL_STUBS {
                            " (size of stubs)"
                        } else {
                            ""
                        }
                    )?;
                }

                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn print_dyld_info_command(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let MachCommand(ref cmd, cmdsize) = *self;

        if let LoadCommand::DyldInfo {
            rebase_off,
            rebase_size,
            bind_off,
            bind_size,
            weak_bind_off,
            weak_bind_size,
            lazy_bind_off,
            lazy_bind_size,
            export_off,
            export_size,
        } = *cmd
        {
            writeln!(f, "            cmd {}", cmd.name())?;
            writeln!(f, "        cmdsize {}", cmdsize)?;
            writeln!(f, "     rebase_off 0x{:08x}", rebase_off)?;
            writeln!(f, "    rebase_size {}", rebase_size)?;
            writeln!(f, "       bind_off 0x{:08x}", bind_off)?;
            writeln!(f, "      bind_size {}", bind_size)?;
            writeln!(f, "  weak_bind_off 0x{:08x}", weak_bind_off)?;
            writeln!(f, " weak_bind_size {}", weak_bind_size)?;
            writeln!(f, "  lazy_bind_off 0x{:08x}", lazy_bind_off)?;
            writeln!(f, " lazy_bind_size {}", lazy_bind_size)?;
            writeln!(f, "     export_off 0x{:08x}", export_off)?;
            writeln!(f, "    export_size {}", export_size)?;
        }

        Ok(())
    }

    fn print_symtab_command(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let MachCommand(ref cmd, cmdsize) = *self;

        if let LoadCommand::SymTab {
            symoff,
            nsyms,
            stroff,
            strsize,
            ..
        } = *cmd
        {
            writeln!(f, "     cmd {}", cmd.name())?;
            writeln!(f, " cmdsize {}", cmdsize)?;
            writeln!(f, "  symoff {}", symoff)?;
            writeln!(f, "   nsyms {}", nsyms)?;
            writeln!(f, "  stroff {}", stroff)?;
            writeln!(f, " strsize {}", strsize)?;
        }

        Ok(())
    }

    fn print_dysymtab_command(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "            cmd {}", self.0.name())?;
        writeln!(f, "        cmdsize {}", self.1)
    }

    fn print_dylib_command(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let MachCommand(ref cmd, cmdsize) = *self;

        match *cmd {
            LoadCommand::IdDyLib(ref dylib) | LoadCommand::LoadDyLib(ref dylib) => {
                writeln!(f, "          cmd {}", cmd.name())?;
                writeln!(f, "      cmdsize {}", cmdsize)?;
                writeln!(f, "         name {} (offset {})", dylib.name, dylib.name.offset())?;

                #[cfg(feature = "display")]
                writeln!(
                    f,
                    "   time stamp {} {}",
                    dylib.timestamp,
                    format_timestamp(dylib.timestamp)?
                )?;
                #[cfg(not(feature = "display"))]
                writeln!(f, "   time stamp {}", dylib.timestamp)?;

                writeln!(
                    f,
                    "      current version {}.{}.{}",
                    dylib.current_version.major(),
                    dylib.current_version.minor(),
                    dylib.current_version.release()
                )?;
                writeln!(
                    f,
                    "compatibility version {}.{}.{}",
                    dylib.compatibility_version.major(),
                    dylib.compatibility_version.minor(),
                    dylib.compatibility_version.release()
                )
            }
            _ => Ok(()),
        }
    }

    fn print_version_min_command(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let MachCommand(ref cmd, cmdsize) = *self;

        if let LoadCommand::VersionMin { version, sdk } = *cmd {
            writeln!(f, "      cmd {}", cmd.name())?;
            writeln!(f, "  cmdsize {}", cmdsize)?;
            writeln!(f, "  version {}", version)?;
            writeln!(f, "      sdk {}", sdk)?;
        }

        Ok(())
    }

    fn print_source_version_command(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let MachCommand(ref cmd, cmdsize) = *self;

        if let LoadCommand::SourceVersion(version) = *cmd {
            writeln!(f, "      cmd {}", cmd.name())?;
            writeln!(f, "  cmdsize {}", cmdsize)?;
            writeln!(f, "  version {}", version)?;
        }

        Ok(())
    }

    fn print_uuid_command(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let MachCommand(ref cmd, cmdsize) = *self;

        if let LoadCommand::Uuid(ref uuid) = *cmd {
            writeln!(f, "     cmd {}", cmd.name())?;
            writeln!(f, " cmdsize {}", cmdsize)?;
            writeln!(f, "    uuid {}", uuid.hyphenated().to_string().to_uppercase())?;
        }

        Ok(())
    }

    fn print_linkedit_data_command(&self, f: &mut fmt::Formatter, data: &LinkEditData) -> fmt::Result {
        writeln!(f, "      cmd {}", self.0.name())?;
        writeln!(f, "  cmdsize {}", self.1)?;
        writeln!(f, "  dataoff {}", data.off)?;
        writeln!(f, " datasize {}", data.size)
    }
}

impl fmt::Display for MachCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            LoadCommand::Segment { .. } | LoadCommand::Segment64 { .. } => self.print_segment_command(f),
            LoadCommand::DyldInfo { .. } => self.print_dyld_info_command(f),
            LoadCommand::SymTab { .. } => self.print_symtab_command(f),
            LoadCommand::DySymTab => self.print_dysymtab_command(f),
            LoadCommand::IdDyLib(_) | LoadCommand::LoadDyLib(_) => self.print_dylib_command(f),
            LoadCommand::VersionMin { .. } => self.print_version_min_command(f),
            LoadCommand::SourceVersion(_) => self.print_source_version_command(f),
            LoadCommand::Uuid(_) => self.print_uuid_command(f),
            LoadCommand::FunctionStarts(ref data) | LoadCommand::DataInCode(ref data) => {
                self.print_linkedit_data_command(f, data)
            }
        }
    }
}
