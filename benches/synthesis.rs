//! Benchmarks for track selection and argument synthesis
//!
//! Probing is served from memory so only the pure per-file work is measured.

use batchforge_av::args::{synthesize, AudioMode, EncodeSettings, EncoderProfile};
use batchforge_av::probe::{StreamKind, StreamProbe};
use batchforge_av::selection::select_tracks;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::path::Path;

struct MemoryProbe {
    audio: usize,
    subtitles: usize,
}

impl StreamProbe for MemoryProbe {
    fn count_streams(&self, _file: &Path, kind: StreamKind) -> usize {
        match kind {
            StreamKind::Audio => self.audio,
            StreamKind::Subtitle => self.subtitles,
        }
    }

    fn audio_channels(&self, _file: &Path, index: usize) -> u32 {
        if index % 2 == 0 {
            6
        } else {
            2
        }
    }
}

fn bench_select_tracks(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_tracks");

    group.bench_function("unset", |b| {
        b.iter(|| select_tracks(black_box(None), black_box(4), StreamKind::Audio));
    });

    group.bench_function("mixed_valid_invalid", |b| {
        b.iter(|| select_tracks(black_box(Some("5,1,3,x,0")), black_box(4), StreamKind::Audio));
    });

    let long_list: String = (1..=64).map(|i| i.to_string()).collect::<Vec<_>>().join(",");
    group.bench_function("64_tokens", |b| {
        b.iter(|| select_tracks(black_box(Some(&long_list)), black_box(32), StreamKind::Subtitle));
    });

    group.finish();
}

fn bench_synthesize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize");
    let file = Path::new("/media/movies/Example (2020)/Example.mkv");

    let copy = EncodeSettings::default();
    let transcode = EncodeSettings {
        profile: EncoderProfile::Av1,
        audio_mode: AudioMode::Transcode,
        audio_tracks: Some("3,1,2".into()),
        subtitle_tracks: Some("2,1".into()),
        ..Default::default()
    };

    for (name, probe) in [
        ("small", MemoryProbe { audio: 1, subtitles: 0 }),
        ("large", MemoryProbe { audio: 8, subtitles: 24 }),
    ] {
        group.bench_with_input(BenchmarkId::new("copy", name), &probe, |b, probe| {
            b.iter(|| synthesize(black_box(&copy), probe, black_box(file)));
        });
        group.bench_with_input(BenchmarkId::new("transcode", name), &probe, |b, probe| {
            b.iter(|| synthesize(black_box(&transcode), probe, black_box(file)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select_tracks, bench_synthesize);
criterion_main!(benches);
