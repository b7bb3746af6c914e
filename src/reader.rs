use std::io::{self, Read, Seek, SeekFrom};
use std::marker::PhantomData;

use byteorder::{ByteOrder, ReadBytesExt};

use crate::errors::Result;

/// A reader that interprets every multi-byte value in the byte order `O`.
///
/// It is a pure decorator: it keeps no buffer of its own and does not care
/// where the underlying stream is positioned, so `Seek` is passed straight
/// through to the wrapped reader.
#[derive(Debug)]
pub struct EndianReader<R, O> {
    inner: R,
    order: PhantomData<O>,
}

impl<R, O: ByteOrder> EndianReader<R, O> {
    pub fn new(inner: R) -> Self {
        EndianReader {
            inner,
            order: PhantomData,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read, O: ByteOrder> EndianReader<R, O> {
    pub fn read_u8(&mut self) -> io::Result<u8> {
        self.inner.read_u8()
    }

    pub fn read_i8(&mut self) -> io::Result<i8> {
        self.inner.read_i8()
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        self.inner.read_u16::<O>()
    }

    pub fn read_i16(&mut self) -> io::Result<i16> {
        self.inner.read_i16::<O>()
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        self.inner.read_u32::<O>()
    }

    pub fn read_i32(&mut self) -> io::Result<i32> {
        self.inner.read_i32::<O>()
    }

    pub fn read_u64(&mut self) -> io::Result<u64> {
        self.inner.read_u64::<O>()
    }

    pub fn read_i64(&mut self) -> io::Result<i64> {
        self.inner.read_i64::<O>()
    }

    pub fn read_f32(&mut self) -> io::Result<f32> {
        self.inner.read_f32::<O>()
    }

    pub fn read_f64(&mut self) -> io::Result<f64> {
        self.inner.read_f64::<O>()
    }
}

impl<R: Read, O> Read for EndianReader<R, O> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Seek, O> Seek for EndianReader<R, O> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

pub trait ReadStringExt: Read {
    /// Reads bytes up to and including the next NUL, returning the bytes before it.
    fn read_cstr(&mut self) -> io::Result<String> {
        let mut v = Vec::new();

        loop {
            let mut b = [0u8; 1];

            self.read_exact(&mut b)?;

            if b[0] == 0 {
                break;
            }

            v.push(b[0]);
        }

        Ok(String::from_utf8_lossy(&v).into_owned())
    }

    /// Reads a fixed-size, NUL-padded name field, cut at the first NUL.
    fn read_fixed_size_string(&mut self, len: usize) -> io::Result<String> {
        let mut buf = vec![0u8; len];

        self.read_exact(&mut buf)?;

        let name = buf.split(|&b| b == 0).next().unwrap_or_default();

        Ok(String::from_utf8_lossy(name).into_owned())
    }
}

impl<R: Read + ?Sized> ReadStringExt for R {}

/// Reads the NUL-terminated string starting at `offset` in `data`.
///
/// A string running off the end of `data` is returned as far as it goes;
/// an `offset` outside of `data` yields `None`.
pub fn read_cstr_at(data: &[u8], offset: usize) -> Option<String> {
    let bytes = data.get(offset..)?;
    let s = bytes.split(|&b| b == 0).next().unwrap_or_default();

    Some(String::from_utf8_lossy(s).into_owned())
}

pub trait SeekExt: Seek {
    /// Runs `f` with the stream moved to the absolute offset `pos`,
    /// then puts the stream back where it was, whether or not `f` succeeded.
    fn peek_at<T, F>(&mut self, pos: u64, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let mark = self.seek(SeekFrom::Current(0))?;

        trace!("seek from 0x{:x} to 0x{:x}", mark, pos);

        let res = match self.seek(SeekFrom::Start(pos)) {
            Ok(_) => f(self),
            Err(err) => Err(err.into()),
        };

        self.seek(SeekFrom::Start(mark))?;

        res
    }
}

impl<S: Seek + ?Sized> SeekExt for S {}
