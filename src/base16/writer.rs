use std::hash::Hasher;
use std::io;

use crc24::Crc24Hasher;

use crate::errors::{Error, Result};
use crate::ser::Serialize;

/// Narrowest line that still holds one octet: "nnn: " + "XX " + "CCCCCC".
pub const MIN_OUTPUT_WIDTH: usize = 14;

/// Number of octets per line for the given line width.
pub fn line_items(output_width: usize) -> Result<usize> {
    if output_width < MIN_OUTPUT_WIDTH {
        return Err(Error::InvalidOutputWidth {
            width: output_width,
            min: MIN_OUTPUT_WIDTH,
        });
    }

    Ok((output_width - 5 - 6) / 3)
}

/// Writes `source` as base16 lines, preceded by the given comment lines.
pub fn write(
    source: &impl Serialize,
    writer: &mut impl io::Write,
    output_width: usize,
    comments: &[String],
) -> Result<()> {
    let line_items = line_items(output_width)?;

    for comment in comments {
        if comment.is_empty() {
            writer.write_all(b"#\n")?;
        } else {
            writeln!(writer, "# {}", comment)?;
        }
    }
    if !comments.is_empty() {
        writer.write_all(b"\n")?;
    }

    let mut enc = LineEncoder::new(writer, line_items);
    source.to_writer(&mut enc)?;
    enc.finish()?;

    Ok(())
}

/// Turns written octets into numbered, checksummed lines.
struct LineEncoder<'a, W: io::Write> {
    w: &'a mut W,
    line_items: usize,
    /// Octets written so far.
    offset: usize,
    /// Number of the current line, 0 before the first one.
    line: usize,
    line_crc: Crc24Hasher,
    all_crc: Crc24Hasher,
}

impl<'a, W: io::Write> LineEncoder<'a, W> {
    fn new(w: &'a mut W, line_items: usize) -> Self {
        LineEncoder {
            w,
            line_items,
            offset: 0,
            line: 0,
            line_crc: Crc24Hasher::new(),
            all_crc: Crc24Hasher::new(),
        }
    }

    /// Terminates the last data line and writes the line with the checksum over everything.
    fn finish(self) -> io::Result<()> {
        if self.line > 0 {
            writeln!(self.w, "{:06X}", crc(&self.line_crc))?;
        }
        writeln!(self.w, "{:3}: {:06X}", self.line + 1, crc(&self.all_crc))?;
        self.w.flush()
    }
}

impl<W: io::Write> io::Write for LineEncoder<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for b in buf {
            if self.offset % self.line_items == 0 {
                if self.line > 0 {
                    writeln!(self.w, "{:06X}", crc(&self.line_crc))?;
                    self.line_crc = Crc24Hasher::new();
                }
                self.line += 1;
                write!(self.w, "{:3}: ", self.line)?;
            }

            write!(self.w, "{:02X} ", b)?;
            self.line_crc.write_u8(*b);
            self.offset += 1;
        }
        self.all_crc.write(buf);

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.w.flush()
    }
}

fn crc(hasher: &Crc24Hasher) -> u32 {
    (hasher.finish() as u32) & 0x00FF_FFFF
}
