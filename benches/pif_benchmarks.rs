//! # pif Benchmarks
//!
//! - **Scheduling**: rotation and frequency passes over growing song lists
//! - **Song file**: parsing lines and loading/saving the store
//!
//! ```bash
//! cargo bench
//! cargo bench scheduling
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pif::rotation::RotationState;
use pif::scheduler::{plan_day, select_frequency_due, select_rotation_due, SECONDS_PER_DAY};
use pif::song::SongRecord;
use pif::store::SongStore;
use std::collections::HashMap;
use std::hint::black_box;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Every third song in rotation, every third on a frequency, the rest untagged.
fn create_test_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 3 {
            0 => format!("song_{i:04} rot"),
            1 => format!("song_{i:04} {}", i % 14 + 1),
            _ => format!("song_{i:04}"),
        })
        .collect()
}

fn create_test_songs(count: usize) -> Vec<SongRecord> {
    create_test_lines(count)
        .iter()
        .map(|line| SongRecord::parse_line(line))
        .collect()
}

fn create_practice_log(songs: &[SongRecord], now: SystemTime) -> HashMap<String, SystemTime> {
    songs
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 2 == 0)
        .map(|(i, song)| {
            let ago = Duration::from_secs((i as u64 % 20) * SECONDS_PER_DAY);
            (song.name.clone(), now - ago)
        })
        .collect()
}

fn benchmark_scheduling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduling");
    let now = SystemTime::now();

    for size in [10usize, 100, 1000] {
        let songs = create_test_songs(size);
        let log = create_practice_log(&songs, now);

        group.bench_with_input(BenchmarkId::new("rotation", size), &songs, |b, songs| {
            b.iter(|| select_rotation_due(black_box(songs), RotationState::new(3, 7)))
        });

        group.bench_with_input(BenchmarkId::new("frequency", size), &songs, |b, songs| {
            b.iter(|| select_frequency_due(black_box(songs), now, &log))
        });

        group.bench_with_input(BenchmarkId::new("plan_day", size), &songs, |b, songs| {
            b.iter(|| plan_day(black_box(songs), RotationState::default(), now, &log))
        });
    }

    group.finish();
}

fn benchmark_song_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("song_file");
    let lines = create_test_lines(500);

    group.bench_function("parse_lines", |b| {
        b.iter(|| {
            black_box(&lines)
                .iter()
                .map(|line| SongRecord::parse_line(line))
                .collect::<Vec<_>>()
        })
    });

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = SongStore::new(temp_dir.path().join(".pif"));
    store.save(&lines).expect("Failed to seed song file");

    group.bench_function("load_records", |b| {
        b.iter(|| black_box(store.records().expect("load")))
    });

    group.bench_function("save", |b| {
        b.iter(|| store.save(black_box(&lines)).expect("save"))
    });

    group.finish();
}

criterion_group!(benches, benchmark_scheduling, benchmark_song_file);
criterion_main!(benches);
