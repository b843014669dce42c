//! Frame consumers: GPU-ready vertices, log summaries and JSON export.
//!
//! `VertexSink` is the renderer-facing side: it packs each frame's outline
//! into `LineVertex` values a line-strip pipeline can upload as raw bytes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use tracing::{debug, info, trace};

use crate::engine::Frame;
use crate::error::Result;

/// Line-strip vertex (position + emission intensity)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub intensity: f32,
}

/// Pack an outline into vertices sharing one intensity
pub fn line_vertices(points: &[Vec3], intensity: f32) -> Vec<LineVertex> {
    points
        .iter()
        .map(|p| LineVertex {
            position: p.to_array(),
            intensity,
        })
        .collect()
}

/// Anything that consumes engine frames (renderer, logger, recorder)
pub trait FrameSink {
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

/// Logs a one-line summary per frame
///
/// Every frame goes out at trace level; every `every`-th frame at debug.
pub struct TracingSink {
    every: u64,
}

impl TracingSink {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameSink for TracingSink {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        if frame.index % self.every == 0 {
            debug!(
                frame = frame.index,
                time_s = frame.time_s,
                amplitude = frame.amplitude.amplitude,
                emission = frame.emission,
                points = frame.outline.len(),
                markers = frame.markers.len(),
                "frame"
            );
        } else {
            trace!(frame = frame.index, "frame");
        }
        Ok(())
    }
}

/// Keeps the latest frame's outline as packed line-strip vertices
///
/// Vertex intensity is the frame's emission.
#[derive(Default)]
pub struct VertexSink {
    vertices: Vec<LineVertex>,
}

impl VertexSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    /// Vertex buffer contents, ready for upload
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl FrameSink for VertexSink {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.vertices = line_vertices(&frame.outline, frame.emission);
        Ok(())
    }
}

/// Collects frames in memory for export
#[derive(Default)]
pub struct JsonSink {
    frames: Vec<Frame>,
}

impl JsonSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Write every collected frame as one JSON array
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &self.frames)?;
        writer.flush()?;
        info!(path = %path.display(), frames = self.frames.len(), "exported frames");
        Ok(())
    }
}

impl FrameSink for JsonSink {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
