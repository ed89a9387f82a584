use std::io::{ErrorKind, Read};

use super::format::{ContainerFormat, HEADER_LEN, Header, PALETTE_CODE};
use super::palette::{PALETTE_LEN, Palette};
use super::{Container, ContainerFrame, DevicePoint, PointColor};
use crate::foundation::core::Rgb8;
use crate::foundation::error::{LaserError, LaserResult};

/// Frame-by-frame container decoder.
///
/// Yields geometry frames in file order and stops at the terminator record or at a clean end
/// of input on a header boundary. Color-table records are absorbed into [`FrameReader::palette`].
/// Any malformed record ends iteration with an error.
pub struct FrameReader<R> {
    inner: R,
    palette: Option<Palette>,
    done: bool,
}

impl<R: Read> FrameReader<R> {
    /// Reader over a container byte stream.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            palette: None,
            done: false,
        }
    }

    /// Most recent color table seen so far.
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Last color table seen, if any.
    pub fn into_palette(self) -> Option<Palette> {
        self.palette
    }

    /// Decode the next geometry frame, or `None` at end of stream.
    pub fn next_frame(&mut self) -> LaserResult<Option<ContainerFrame>> {
        while !self.done {
            let Some(header) = self.read_header()? else {
                self.done = true;
                break;
            };
            if header.format_code == PALETTE_CODE {
                self.palette = Some(self.read_palette(&header)?);
                continue;
            }
            let format = ContainerFormat::from_code(header.format_code)?;
            if header.is_terminator() {
                self.done = true;
                break;
            }
            let points = self.read_points(format, &header)?;
            return Ok(Some(ContainerFrame {
                format,
                name: header.name,
                company: header.company,
                frame_number: header.frame_number,
                total_frames: header.total_frames,
                projector: header.projector,
                points,
            }));
        }
        Ok(None)
    }

    fn read_header(&mut self) -> LaserResult<Option<Header>> {
        let mut block = [0u8; HEADER_LEN];
        let got = read_up_to(&mut self.inner, &mut block)?;
        if got == 0 {
            return Ok(None);
        }
        if got < HEADER_LEN {
            return Err(LaserError::format(format!(
                "truncated header: {got} of {HEADER_LEN} bytes"
            )));
        }
        Header::decode(&block).map(Some)
    }

    fn read_palette(&mut self, header: &Header) -> LaserResult<Palette> {
        let mut data = vec![0u8; usize::from(header.record_count) * 3];
        self.read_records(&mut data, "color table")?;
        let entries = data
            .chunks_exact(3)
            .take(PALETTE_LEN)
            .map(|c| Rgb8::new(c[0], c[1], c[2]))
            .collect();
        Ok(Palette::from_entries(entries))
    }

    fn read_points(&mut self, format: ContainerFormat, header: &Header) -> LaserResult<Vec<DevicePoint>> {
        let len = format.record_len();
        let mut data = vec![0u8; usize::from(header.record_count) * len];
        self.read_records(&mut data, "point records")?;
        Ok(data
            .chunks_exact(len)
            .map(|rec| decode_point(format, rec))
            .collect())
    }

    fn read_records(&mut self, buf: &mut [u8], what: &str) -> LaserResult<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(LaserError::format(format!(
                "truncated {what}: expected {} bytes",
                buf.len()
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = LaserResult<ContainerFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_frame() {
            Ok(frame) => frame.map(Ok),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Decode a whole container. Any malformed record fails the read.
pub fn read_container<R: Read>(inner: R) -> LaserResult<Container> {
    let mut reader = FrameReader::new(inner);
    let mut frames = Vec::new();
    while let Some(frame) = reader.next_frame()? {
        frames.push(frame);
    }
    Ok(Container {
        frames,
        palette: reader.into_palette(),
    })
}

fn read_up_to<R: Read>(r: &mut R, buf: &mut [u8]) -> LaserResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

fn decode_point(format: ContainerFormat, rec: &[u8]) -> DevicePoint {
    let word = |i: usize| i16::from_be_bytes([rec[i], rec[i + 1]]);
    let (z, tail) = if format.has_z() { (word(4), 6) } else { (0, 4) };
    let color = if format.is_truecolor() {
        PointColor::Rgb(Rgb8::new(rec[tail + 1], rec[tail + 2], rec[tail + 3]))
    } else {
        PointColor::Indexed(rec[tail + 1])
    };
    DevicePoint {
        x: word(0),
        y: word(2),
        z,
        status: rec[tail],
        color,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/reader.rs"]
mod tests;
