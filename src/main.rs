//! Kochwave - Audio-reactive Koch fractal outline generator
//!
//! Runs the engine over a WAV file at a fixed tick rate, logging each frame
//! and optionally exporting every frame as JSON.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kochwave::audio::{SpectrumExtractor, WavSource};
use kochwave::cli::Args;
use kochwave::params::audio_constants::SPECTRUM_BINS;
use kochwave::sink::{FrameSink, JsonSink, TracingSink, VertexSink};
use kochwave::{KochEngine, Result};

/// Ticks to run without a WAV file or `--frames`
const DEFAULT_SILENT_SECONDS: f32 = 1.0;

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level())),
        )
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = args.build_config()?;
    let dt = args.dt()?;

    let mut source = match &args.wav {
        Some(path) => {
            let source = WavSource::open(path)?;
            config.fft.sample_rate_hz = source.sample_rate();
            Some(source)
        }
        None => {
            info!("No WAV file given, analyzing silence");
            None
        }
    };

    let duration_s = source
        .as_ref()
        .map_or(DEFAULT_SILENT_SECONDS, WavSource::duration_s);
    let frames = args
        .frames
        .unwrap_or_else(|| (duration_s / dt).ceil() as u64);

    let mut extractor = SpectrumExtractor::new(&config.fft)?;
    let mut engine = KochEngine::new(config)?;
    let mut log_sink = TracingSink::new(args.fps.round() as u64);
    let mut vertex_sink = VertexSink::new();
    let mut json_sink = args.export.as_ref().map(|_| JsonSink::new());

    info!(
        frames,
        dt,
        sides = engine.fractal().sides(),
        points = engine.fractal().target().len(),
        "Starting"
    );

    let mut window = vec![0.0; extractor.fft_size()];
    let mut spectrum = [0.0; SPECTRUM_BINS];
    for _ in 0..frames {
        if let Some(source) = &mut source {
            source.advance(dt);
            source.window(&mut window);
        }
        extractor.process(&window, &mut spectrum);

        let frame = engine.tick(dt, &spectrum)?;
        log_sink.present(&frame)?;
        vertex_sink.present(&frame)?;
        if let Some(sink) = &mut json_sink {
            sink.present(&frame)?;
        }
    }

    if let (Some(sink), Some(path)) = (&json_sink, &args.export) {
        sink.write_to(path)?;
    }

    let skipped = engine.trails().map_or(0, |t| t.skipped_steps());
    info!(
        frames,
        skipped_steps = skipped,
        vertex_bytes = vertex_sink.bytes().len(),
        "Done"
    );
    Ok(())
}
