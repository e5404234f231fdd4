use std::{fs::File, io::ErrorKind, path::Path};

use anyhow::Context;
use hound::{SampleFormat, WavSpec, WavWriter};
use symphonia::core::{
    audio::SampleBuffer,
    codecs::{DecoderOptions, CODEC_TYPE_NULL},
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};
use tracing::{debug, warn};

use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: u64,
}

/// Decodes the first audio track of `src` and writes it to `dest` as 16-bit PCM WAV.
///
/// The container is probed from content; the extension is only a hint.
/// Packets that fail to decode are skipped.
pub fn decode_to_wav<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> Result<DecodedAudio> {
    let src: &Path = src.as_ref();
    let dest: &Path = dest.as_ref();

    let file: File =
        File::open(src).with_context(|| format!("Failed to open media file: {:?}", src))?;

    let mss: MediaSourceStream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint: Hint = Hint::new();

    if let Some(ext) = src.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL && t.codec_params.sample_rate.is_some())
        .with_context(|| format!("No audio track found in {:?}", src))?;
    let track_id = track.id;

    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut writer: Option<WavWriter<_>> = None;
    let mut summary = DecodedAudio {
        sample_rate: 0,
        channels: 0,
        frames: 0,
    };

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err)) if err.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(err.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                warn!(timestamp = packet.ts, "Skipping undecodable packet: {msg}");
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let spec = *decoded.spec();
        if writer.is_none() {
            summary.sample_rate = spec.rate;
            summary.channels = spec.channels.count() as u16;
            writer = Some(WavWriter::create(
                dest,
                WavSpec {
                    channels: summary.channels,
                    sample_rate: summary.sample_rate,
                    bits_per_sample: 16,
                    sample_format: SampleFormat::Int,
                },
            )?);
        }

        summary.frames += decoded.frames() as u64;

        let mut buffer = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);

        if let Some(w) = writer.as_mut() {
            for sample in buffer.samples() {
                w.write_sample(*sample)?;
            }
        }
    }

    let writer = writer.with_context(|| format!("No audio could be decoded from {:?}", src))?;
    writer.finalize()?;

    debug!(
        "Decoded audio: sample_rate={}, channels={}, frames={}",
        summary.sample_rate, summary.channels, summary.frames
    );

    Ok(summary)
}
