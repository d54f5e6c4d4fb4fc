use doppel::config::CompareMode;
use doppel::{mirror_once, Config, PassStats};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct BenchResult {
    hash: Vec<Duration>,
    byte: Vec<Duration>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let watched = match args.next() {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("Usage: cargo run --bin mirror_bench -- <watched_dir> [runs]");
            std::process::exit(2);
        }
    };

    let runs: usize = args.next().and_then(|v| v.parse().ok()).unwrap_or(5);

    let copy_root = env::temp_dir().join(format!("doppel_bench_{}", std::process::id()));
    fs::create_dir_all(&copy_root)?;

    println!(
        "Benchmarking steady-state passes on {}\nRuns: {}",
        watched.display(),
        runs
    );

    // First pass populates the copy; it echoes one line per entry.
    println!("\nPopulating copy at {}", copy_root.display());
    mirror_once(config_for(&watched, &copy_root, CompareMode::Hash))?;

    // Warm up both oracles once to reduce first-run noise.
    let hash_stats = mirror_once(config_for(&watched, &copy_root, CompareMode::Hash))?;
    let byte_stats = mirror_once(config_for(&watched, &copy_root, CompareMode::ByteByByte))?;
    assert_steady("hash", &hash_stats)?;
    assert_steady("byte", &byte_stats)?;

    let mut result = BenchResult {
        hash: Vec::with_capacity(runs),
        byte: Vec::with_capacity(runs),
    };

    for i in 0..runs {
        let hash_start = Instant::now();
        let hash_stats = mirror_once(config_for(&watched, &copy_root, CompareMode::Hash))?;
        let hash_elapsed = hash_start.elapsed();

        let byte_start = Instant::now();
        let byte_stats = mirror_once(config_for(&watched, &copy_root, CompareMode::ByteByByte))?;
        let byte_elapsed = byte_start.elapsed();

        assert_steady("hash", &hash_stats)?;
        assert_steady("byte", &byte_stats)?;

        result.hash.push(hash_elapsed);
        result.byte.push(byte_elapsed);

        println!(
            "run {:>2}: hash={:>8.3} ms  byte={:>8.3} ms",
            i + 1,
            hash_elapsed.as_secs_f64() * 1000.0,
            byte_elapsed.as_secs_f64() * 1000.0
        );
    }

    let hash_avg = average_ms(&result.hash);
    let byte_avg = average_ms(&result.byte);
    let ratio = if byte_avg > 0.0 {
        hash_avg / byte_avg
    } else {
        0.0
    };

    println!("\nSummary");
    println!("  hash mode avg: {:>8.3} ms", hash_avg);
    println!("  byte mode avg: {:>8.3} ms", byte_avg);
    println!("  hash/byte    : {:>8.2}x", ratio);

    fs::remove_dir_all(&copy_root)?;
    Ok(())
}

fn config_for(watched: &Path, copy: &Path, compare_mode: CompareMode) -> Config {
    Config {
        watched_dir: watched.to_path_buf(),
        copy_dir: copy.to_path_buf(),
        log_dir: None,
        interval: Duration::from_secs(10),
        compare_mode,
        once: true,
    }
}

fn average_ms(values: &[Duration]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum_ms: f64 = values.iter().map(|d| d.as_secs_f64() * 1000.0).sum();
    sum_ms / values.len() as f64
}

fn assert_steady(mode: &str, stats: &PassStats) -> Result<(), String> {
    if !stats.is_noop() {
        return Err(format!(
            "{} pass changed the copy during steady state: {:?}",
            mode, stats
        ));
    }
    Ok(())
}
