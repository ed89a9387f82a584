use std::io::Write;

use super::format::{ContainerFormat, HEADER_LEN, Header};
use super::palette::Palette;
use super::{ContainerFrame, DevicePoint, PointColor};
use crate::foundation::error::{LaserError, LaserResult};

/// Encode one frame record: header plus point records.
///
/// `number` and `total` go into the header verbatim. The last-point bit is set on the final
/// record and cleared everywhere else. Point colors are converted to the frame's color profile
/// through `palette` when the kinds disagree.
pub fn encode_frame(
    frame: &ContainerFrame,
    number: u16,
    total: u16,
    palette: &Palette,
) -> LaserResult<Vec<u8>> {
    let count = u16::try_from(frame.points.len()).map_err(|_| {
        LaserError::format(format!(
            "frame '{}' has {} points; a record holds at most {}",
            frame.name,
            frame.points.len(),
            u16::MAX
        ))
    })?;
    let header = Header {
        format_code: frame.format.code(),
        name: frame.name.clone(),
        company: frame.company.clone(),
        record_count: count,
        frame_number: number,
        total_frames: total,
        projector: frame.projector,
    };
    if header.reads_as_terminator() {
        return Err(LaserError::format(
            "an empty frame needs a name or company tag to be distinguishable from the terminator",
        ));
    }

    let mut out = Vec::with_capacity(HEADER_LEN + frame.points.len() * frame.format.record_len());
    out.extend_from_slice(&header.encode());
    let last = frame.points.len().saturating_sub(1);
    for (i, p) in frame.points.iter().enumerate() {
        encode_point(&mut out, frame.format, p.with_last(i == last), palette);
    }
    Ok(out)
}

/// The end-of-stream record: zero points, empty name and company.
pub fn encode_terminator(format: ContainerFormat, total: u16, projector: u8) -> [u8; HEADER_LEN] {
    Header {
        format_code: format.code(),
        name: String::new(),
        company: String::new(),
        record_count: 0,
        frame_number: total,
        total_frames: total,
        projector,
    }
    .encode()
}

/// Write every frame in order followed by the terminator. Returns bytes written.
///
/// Frame numbers are the positions in `frames`; total frames is `frames.len()`.
pub fn write_container<W: Write>(mut out: W, frames: &[ContainerFrame]) -> LaserResult<u64> {
    let total = u16::try_from(frames.len()).map_err(|_| {
        LaserError::format(format!(
            "{} frames exceed the container limit of {}",
            frames.len(),
            u16::MAX
        ))
    })?;
    let palette = Palette::standard();
    let mut written = 0u64;
    for (i, frame) in frames.iter().enumerate() {
        let block = encode_frame(frame, i as u16, total, &palette)?;
        out.write_all(&block)?;
        written += block.len() as u64;
    }
    let (format, projector) = frames
        .last()
        .map(|f| (f.format, f.projector))
        .unwrap_or_default();
    out.write_all(&encode_terminator(format, total, projector))?;
    out.flush()?;
    Ok(written + HEADER_LEN as u64)
}

fn encode_point(out: &mut Vec<u8>, format: ContainerFormat, p: DevicePoint, palette: &Palette) {
    out.extend_from_slice(&p.x.to_be_bytes());
    out.extend_from_slice(&p.y.to_be_bytes());
    if format.has_z() {
        out.extend_from_slice(&p.z.to_be_bytes());
    }
    out.push(p.status);
    if format.is_truecolor() {
        let c = match p.color {
            PointColor::Rgb(c) => c,
            PointColor::Indexed(i) => palette.get(i),
        };
        out.extend_from_slice(&[c.r, c.g, c.b]);
    } else {
        let i = match p.color {
            PointColor::Indexed(i) => i,
            PointColor::Rgb(c) => palette.nearest(c),
        };
        out.push(i);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/writer.rs"]
mod tests;
