//! Direction-fixed binary stream.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use hfx_core::{HfxError, Result};
use tracing::trace;

use crate::Serializable;

/// Whether a [`BinarySerializer`] writes values out or reads them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializerAction {
    Write,
    Read,
}

enum Stream<'a> {
    Reader(Box<dyn Read + 'a>),
    Writer(Box<dyn Write + 'a>),
}

/// One serializer instance owns one stream and one direction for its whole
/// life. Every value goes through [`BinarySerializer::serialize`], which
/// writes it or overwrites it in place with what was read.
pub struct BinarySerializer<'a> {
    stream: Stream<'a>,
}

impl BinarySerializer<'static> {
    /// Open `path` for the given direction. Writing truncates the file.
    pub fn open(action: SerializerAction, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |source| HfxError::Open {
            path: path.to_path_buf(),
            source,
        };

        trace!(path = %path.display(), ?action, "opening binary stream");
        let serializer = match action {
            SerializerAction::Write => {
                Self::from_writer(BufWriter::new(File::create(path).map_err(open_error)?))
            }
            SerializerAction::Read => {
                Self::from_reader(BufReader::new(File::open(path).map_err(open_error)?))
            }
        };
        Ok(serializer)
    }
}

impl<'a> BinarySerializer<'a> {
    pub fn from_reader(reader: impl Read + 'a) -> Self {
        Self {
            stream: Stream::Reader(Box::new(reader)),
        }
    }

    pub fn from_writer(writer: impl Write + 'a) -> Self {
        Self {
            stream: Stream::Writer(Box::new(writer)),
        }
    }

    pub fn action(&self) -> SerializerAction {
        match self.stream {
            Stream::Reader(_) => SerializerAction::Read,
            Stream::Writer(_) => SerializerAction::Write,
        }
    }

    pub fn is_reading(&self) -> bool {
        self.action() == SerializerAction::Read
    }

    /// Write `value`, or replace it with the next value in the stream.
    pub fn serialize<T: Serializable + ?Sized>(&mut self, value: &mut T) -> Result<()> {
        value.serialize(self)
    }

    /// Copy raw bytes to or from the stream.
    pub fn bytes(&mut self, bytes: &mut [u8]) -> Result<()> {
        match &mut self.stream {
            Stream::Reader(reader) => reader.read_exact(bytes)?,
            Stream::Writer(writer) => writer.write_all(bytes)?,
        }
        Ok(())
    }

    /// Write `len` as a 32-bit prefix, or read a prefix and return it.
    pub fn length(&mut self, len: usize) -> Result<usize> {
        let mut prefix = u32::try_from(len).map_err(|_| HfxError::LengthOverflow(len))?;
        self.serialize(&mut prefix)?;
        Ok(prefix as usize)
    }

    /// Flush buffered output and close the stream.
    pub fn finish(self) -> Result<()> {
        if let Stream::Writer(mut writer) = self.stream {
            writer.flush()?;
        }
        trace!("closed binary stream");
        Ok(())
    }
}
