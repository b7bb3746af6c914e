use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MachError {
    #[error("unexpected magic value 0x{0:08x}.")]
    BadMagic(u32),
    #[error("unexpected load command 0x{0:x}.")]
    UnknownCommand(u32),
    #[error("load command size {0} is smaller than the command header.")]
    InvalidCommandSize(u32),
    #[error("fail to do I/O operations, {0}.")]
    IoError(#[from] io::Error),
}

impl MachError {
    /// Whether the file was rejected for its content rather than for failing to read it.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, MachError::IoError(_))
    }
}

pub type Result<T> = ::std::result::Result<T, MachError>;
