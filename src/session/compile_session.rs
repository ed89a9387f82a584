use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use rayon::prelude::*;

use crate::compile::normalize::{Normalization, sequence_bounds};
use crate::compile::{FrameEncoder, FrameStats};
use crate::config::{CompileConfig, CompileOpts, MissingFramePolicy};
use crate::container::ContainerFrame;
use crate::container::format::HEADER_LEN;
use crate::container::writer::{encode_frame, encode_terminator, write_container};
use crate::foundation::core::Rect;
use crate::foundation::error::{GeometryWarning, LaserError, LaserResult, Stage};
use crate::geometry::filter::{OuterFrameRule, is_noise, is_outer_frame};
use crate::geometry::polyline::Frame;
use crate::source::FrameSource;

/// Upper bound on encoded frames waiting in the writer's reorder buffer.
const MAX_REORDER_BUFFER_BYTES: u64 = 64 * 1024 * 1024;

/// Cooperative cancellation predicate, polled at frame boundaries.
pub type CancelFn<'a> = &'a (dyn Fn() -> bool + Sync);

/// Summary of a finished compile.
#[derive(Clone, Debug, PartialEq)]
pub struct CompileReport {
    /// Frames compiled.
    pub frames: usize,
    /// Points over every frame.
    pub total_points: usize,
    /// Per-frame point ceiling in effect.
    pub ceiling: usize,
    /// Frames cut short by the ceiling.
    pub truncated_frames: usize,
    /// Source points lost to the ceiling.
    pub dropped_points: usize,
    /// Frames that only carry the never-empty placeholder point.
    pub synthetic_frames: usize,
    /// Device-space border strokes removed across all frames.
    pub border_strokes: usize,
    /// Mapping used for every frame.
    pub normalization: Normalization,
    /// Recoverable problems, in frame order.
    pub warnings: Vec<GeometryWarning>,
    /// Container bytes, terminator included. Zero until written.
    pub bytes_written: u64,
}

impl CompileReport {
    fn new(ceiling: usize, normalization: Normalization, warnings: Vec<GeometryWarning>) -> Self {
        Self {
            frames: 0,
            total_points: 0,
            ceiling,
            truncated_frames: 0,
            dropped_points: 0,
            synthetic_frames: 0,
            border_strokes: 0,
            normalization,
            warnings,
            bytes_written: 0,
        }
    }

    fn record(&mut self, stats: &FrameStats) {
        self.frames += 1;
        self.total_points += stats.points;
        self.dropped_points += stats.dropped;
        if stats.dropped > 0 {
            self.truncated_frames += 1;
        }
        if stats.synthetic {
            self.synthetic_frames += 1;
        }
        self.border_strokes += stats.border_strokes;
    }
}

/// A fully encoded sequence held in memory.
#[derive(Clone, Debug)]
pub struct CompiledSequence {
    /// Encoded frames in sequence order.
    pub frames: Vec<ContainerFrame>,
    /// Totals for the run.
    pub report: CompileReport,
}

impl CompiledSequence {
    /// Serialize every frame plus the terminator. Returns bytes written.
    pub fn write_to<W: Write>(&self, out: W) -> LaserResult<u64> {
        write_container(out, &self.frames)
    }
}

/// Two-phase sequence compiler.
///
/// Phase one extracts every frame independently. At the barrier the sequence bounds fix one
/// [`Normalization`] and the relative filters run. Phase two normalizes, budgets and encodes
/// each frame against that frozen state; encoded frames reach the output in index order.
pub struct CompileSession {
    cfg: CompileConfig,
    opts: CompileOpts,
}

struct Prepared {
    frames: Vec<Frame>,
    encoder: FrameEncoder,
    warnings: Vec<GeometryWarning>,
}

#[derive(Debug)]
struct EncodedMsg {
    index: usize,
    bytes: Vec<u8>,
    stats: FrameStats,
}

impl CompileSession {
    /// Session after validating both config halves.
    pub fn new(cfg: CompileConfig, opts: CompileOpts) -> LaserResult<Self> {
        cfg.validate()?;
        opts.validate()?;
        Ok(Self { cfg, opts })
    }

    /// Validated compile config.
    pub fn config(&self) -> &CompileConfig {
        &self.cfg
    }

    /// Compile the whole source into memory.
    #[tracing::instrument(skip_all, fields(frames = source.frame_count()))]
    pub fn compile(
        &self,
        source: &dyn FrameSource,
        cancel: CancelFn<'_>,
    ) -> LaserResult<CompiledSequence> {
        let pool = self.pool()?;
        let prepared = self.prepare(source, cancel, pool.as_ref())?;
        let encoder = &prepared.encoder;

        let encode_one = |(i, frame): (usize, &Frame)| -> LaserResult<(ContainerFrame, FrameStats)> {
            check_cancel(cancel)?;
            let (cf, stats) = encoder.encode(frame);
            log_truncation(i, &stats, encoder.ceiling());
            Ok((cf, stats))
        };
        let encoded: Vec<(ContainerFrame, FrameStats)> = match pool.as_ref() {
            Some(pool) => pool.install(|| {
                prepared
                    .frames
                    .par_iter()
                    .enumerate()
                    .map(encode_one)
                    .collect::<LaserResult<_>>()
            })?,
            None => prepared
                .frames
                .iter()
                .enumerate()
                .map(encode_one)
                .collect::<LaserResult<_>>()?,
        };

        let mut report = CompileReport::new(
            encoder.ceiling(),
            *encoder.normalization(),
            prepared.warnings,
        );
        let mut frames = Vec::with_capacity(encoded.len());
        for (cf, stats) in encoded {
            report.record(&stats);
            frames.push(cf);
        }
        Ok(CompiledSequence { frames, report })
    }

    /// Compile and write the container to `out`.
    ///
    /// Bytes go to `<out>.partial` first and are renamed into place only after the terminator
    /// is flushed. On error or cancellation the partial file is removed.
    #[tracing::instrument(skip_all, fields(frames = source.frame_count(), out = %out.display()))]
    pub fn export(
        &self,
        source: &dyn FrameSource,
        out: &Path,
        cancel: CancelFn<'_>,
    ) -> LaserResult<CompileReport> {
        let pool = self.pool()?;
        let prepared = self.prepare(source, cancel, pool.as_ref())?;

        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = partial_path(out);
        let mut guard = TempFileGuard(Some(tmp.clone()));
        let file = BufWriter::new(File::create(&tmp)?);

        let total = prepared.frames.len();
        let terminator = encode_terminator(self.cfg.format, total as u16, self.cfg.projector);
        let cap = self.opts.channel_capacity.max(1);
        let encoder = &prepared.encoder;
        let bytes_per_frame = (HEADER_LEN as u64).saturating_add(
            (encoder.ceiling() as u64).saturating_mul(self.cfg.format.record_len() as u64),
        );
        let chunk_size = reorder_chunk_size(self.opts.chunk_size, bytes_per_frame, total);

        let (bytes, stats) = std::thread::scope(|scope| -> LaserResult<(u64, Vec<FrameStats>)> {
            let (tx, rx) = mpsc::sync_channel::<EncodedMsg>(cap);
            let writer = scope.spawn(move || write_ordered(file, rx, total, &terminator));

            let produce = |tx: &mut mpsc::SyncSender<EncodedMsg>,
                           (i, frame): (usize, &Frame)|
             -> LaserResult<()> {
                check_cancel(cancel)?;
                let (cf, stats) = encoder.encode(frame);
                log_truncation(i, &stats, encoder.ceiling());
                let bytes = encode_frame(&cf, i as u16, total as u16, encoder.palette())
                    .map_err(|e| e.in_frame(i, Stage::Encode))?;
                tx.send(EncodedMsg {
                    index: i,
                    bytes,
                    stats,
                })
                .map_err(|_| LaserError::Other(anyhow::anyhow!("writer thread stopped accepting frames")))
            };
            let produce_res = match pool.as_ref() {
                // Each chunk drains before the next is dispatched, so the writer never holds
                // more than one chunk out of order.
                Some(pool) => prepared
                    .frames
                    .chunks(chunk_size)
                    .enumerate()
                    .try_for_each(|(c, chunk)| {
                        let start = c * chunk_size;
                        pool.install(|| {
                            chunk
                                .par_iter()
                                .enumerate()
                                .try_for_each_with(tx.clone(), |tx, (j, frame)| {
                                    produce(tx, (start + j, frame))
                                })
                        })
                    }),
                None => {
                    let mut tx = tx.clone();
                    prepared
                        .frames
                        .iter()
                        .enumerate()
                        .try_for_each(|item| produce(&mut tx, item))
                }
            };
            drop(tx);

            let write_res = writer
                .join()
                .map_err(|_| LaserError::Other(anyhow::anyhow!("writer thread panicked")))?;
            produce_res?;
            write_res
        })?;
        check_cancel(cancel)?;

        std::fs::rename(&tmp, out).map_err(|e| {
            LaserError::Other(anyhow::Error::new(e).context(format!("rename to {}", out.display())))
        })?;
        guard.0 = None;

        let mut report = CompileReport::new(
            encoder.ceiling(),
            *encoder.normalization(),
            prepared.warnings,
        );
        for s in &stats {
            report.record(s);
        }
        report.bytes_written = bytes;
        tracing::info!(
            path = %out.display(),
            frames = report.frames,
            points = report.total_points,
            bytes,
            "container written"
        );
        Ok(report)
    }

    fn pool(&self) -> LaserResult<Option<rayon::ThreadPool>> {
        if self.opts.parallel {
            build_thread_pool(self.opts.threads).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Phase one plus the barrier.
    fn prepare(
        &self,
        source: &dyn FrameSource,
        cancel: CancelFn<'_>,
        pool: Option<&rayon::ThreadPool>,
    ) -> LaserResult<Prepared> {
        let n = source.frame_count();
        if n > usize::from(u16::MAX) {
            return Err(LaserError::validation(format!(
                "{n} frames exceed the container limit of {}",
                u16::MAX
            )));
        }
        tracing::info!(
            frames = n,
            ceiling = self.cfg.budget.ceiling(),
            format = ?self.cfg.format,
            parallel = pool.is_some(),
            "compile started"
        );

        let extract = |i: usize| self.extract_frame(source, i, cancel);
        let frames: Vec<Frame> = match pool {
            Some(pool) => pool.install(|| {
                (0..n)
                    .into_par_iter()
                    .map(extract)
                    .collect::<LaserResult<_>>()
            })?,
            None => (0..n).map(extract).collect::<LaserResult<_>>()?,
        };
        check_cancel(cancel)?;

        let mut frames = frames;
        if let Some(bad) = frames.iter().find(|f| {
            f.polylines
                .iter()
                .flat_map(|pl| pl.points())
                .any(|p| !p.is_finite())
        }) {
            return Err(LaserError::validation("non-finite coordinates in frame geometry")
                .in_frame(bad.index, Stage::Normalize));
        }
        let bounds = sequence_bounds(&frames);
        if bounds.is_none() {
            tracing::warn!("sequence has no geometry; using identity normalization");
        }
        if let Some(global) = bounds {
            for frame in &mut frames {
                self.apply_relative_filters(frame, global);
            }
        }
        let norm = Normalization::from_bounds(bounds, self.cfg.fit_axis, self.cfg.fill_ratio)
            .with_invert_y(self.cfg.invert_y);
        tracing::debug!(
            center_x = norm.center.x,
            center_y = norm.center.y,
            scale = norm.scale,
            "normalization fixed"
        );

        let warnings = frames
            .iter()
            .flat_map(|f| f.warnings.iter().cloned())
            .collect();
        Ok(Prepared {
            encoder: FrameEncoder::new(&self.cfg, norm),
            frames,
            warnings,
        })
    }

    fn extract_frame(
        &self,
        source: &dyn FrameSource,
        index: usize,
        cancel: CancelFn<'_>,
    ) -> LaserResult<Frame> {
        check_cancel(cancel)?;
        match source.extract(index, &self.cfg) {
            Ok(mut frame) => {
                frame.index = index;
                if frame.name.is_none() {
                    frame.name = source.frame_name(index);
                }
                tracing::debug!(
                    frame = index,
                    polylines = frame.polylines.len(),
                    "frame extracted"
                );
                Ok(frame)
            }
            Err(err) if err.is_resource() && self.cfg.missing_frame == MissingFramePolicy::Empty => {
                tracing::warn!(frame = index, error = %err, "substituting empty frame");
                let mut frame = Frame::new(index);
                frame.name = source.frame_name(index);
                frame.warnings.push(GeometryWarning::new(index, &err));
                Ok(frame)
            }
            Err(err) => Err(err.in_frame(index, Stage::Extract)),
        }
    }

    fn apply_relative_filters(&self, frame: &mut Frame, global: Rect) {
        let rule = OuterFrameRule::default();
        let before = frame.polylines.len();
        frame.polylines.retain(|pl| {
            !is_noise(pl, global, self.cfg.min_rel_size)
                && !(self.cfg.remove_outer_frame && is_outer_frame(pl, global, rule))
        });
        let removed = before - frame.polylines.len();
        if removed > 0 {
            tracing::debug!(frame = frame.index, removed, "filtered polylines");
        }
    }
}

fn check_cancel(cancel: CancelFn<'_>) -> LaserResult<()> {
    if cancel() {
        tracing::info!("compile canceled");
        return Err(LaserError::Canceled);
    }
    Ok(())
}

fn log_truncation(frame: usize, stats: &FrameStats, ceiling: usize) {
    if stats.dropped > 0 {
        tracing::info!(frame, dropped = stats.dropped, ceiling, "frame truncated to budget");
    }
}

/// Drain encoded frames and write them strictly in index order, then the terminator.
fn write_ordered<W: Write>(
    mut out: W,
    rx: mpsc::Receiver<EncodedMsg>,
    total: usize,
    terminator: &[u8; HEADER_LEN],
) -> LaserResult<(u64, Vec<FrameStats>)> {
    let mut next = 0usize;
    let mut pending = HashMap::<usize, EncodedMsg>::new();
    let mut stats = Vec::with_capacity(total);
    let mut written = 0u64;
    while next < total {
        if let Some(msg) = pending.remove(&next) {
            out.write_all(&msg.bytes)
                .map_err(|e| LaserError::from(e).in_frame(next, Stage::Write))?;
            written += msg.bytes.len() as u64;
            stats.push(msg.stats);
            next += 1;
            continue;
        }
        let msg = rx.recv().map_err(|_| {
            LaserError::Other(anyhow::anyhow!("encoder channel disconnected unexpectedly"))
        })?;
        pending.insert(msg.index, msg);
    }
    out.write_all(terminator)?;
    out.flush()?;
    Ok((written + HEADER_LEN as u64, stats))
}

/// Frames per parallel dispatch: the requested size, capped so one chunk of worst-case frames
/// fits the reorder budget and never larger than the sequence.
fn reorder_chunk_size(requested: usize, bytes_per_frame: u64, total: usize) -> usize {
    let by_mem = (MAX_REORDER_BUFFER_BYTES / bytes_per_frame.max(1)).max(1);
    let by_mem = usize::try_from(by_mem).unwrap_or(usize::MAX);
    requested.max(1).min(by_mem).min(total.max(1))
}

fn partial_path(out: &Path) -> PathBuf {
    let mut name = OsString::from(out.as_os_str());
    name.push(".partial");
    PathBuf::from(name)
}

fn build_thread_pool(threads: Option<usize>) -> LaserResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LaserError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        LaserError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
    })
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/compile_session.rs"]
mod tests;
