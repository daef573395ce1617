//! Comparison harness running one writer thread and N-1 reader threads
//! against a [`Slot`], reporting per-thread sentinel values and elapsed
//! wall-clock time.
//!
//! ```text
//! cargo run --release --example benchmark -- 4 100000 1000
//! ```

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use ptr_sync::handle::StrongHandle;
use ptr_sync::payload::Payload;
use ptr_sync::slot::Slot;

fn usage(progname: &str) {
    println!(
        "usage: {progname} threads iter w_iter

threads ... number of threads
iter    ... total number of iterations in each thread
w_iter  ... number of reads per write in the writer thread"
    );
}

fn parse_args() -> Option<(usize, u64, u64)> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 3 {
        return None;
    }
    let threads: usize = args[0].parse().ok()?;
    let iter: u64 = args[1].parse().ok()?;
    let w_iter: u64 = args[2].parse().ok()?;
    if threads < 1 || iter < 1 || w_iter < 1 {
        return None;
    }
    Some((threads, iter, w_iter))
}

fn main() -> ExitCode {
    let progname = env::args().next().unwrap_or_else(|| "benchmark".into());
    let Some((threads, iter, w_iter)) = parse_args() else {
        usage(&progname);
        return ExitCode::FAILURE;
    };

    let slot: Slot<u64> = Slot::with_initial(Payload::new(0));
    // serializes the per-thread sentinel lines
    let stdout = Mutex::new(io::stdout());

    let started = Instant::now();
    thread::scope(|scope| {
        // writer: publishes every `w_iter` iterations, reads on every one
        scope.spawn(|| {
            let mut handle = StrongHandle::new(&slot);
            let mut target = 0u64;
            for i in 0..iter {
                if i % w_iter == 0 {
                    slot.publish(Payload::new(i));
                }
                if let Some(value) = handle.get_raw() {
                    target = *value;
                }
            }
            let mut out = stdout.lock().expect("stdout lock poisoned");
            writeln!(out, "target={target}").expect("failed to write report");
        });

        for _ in 1..threads {
            scope.spawn(|| {
                let mut handle = StrongHandle::new(&slot);
                let mut target = 0u64;
                for _ in 0..iter {
                    if let Some(value) = handle.get_raw() {
                        target = *value;
                    }
                }
                let mut out = stdout.lock().expect("stdout lock poisoned");
                writeln!(out, "target={target}").expect("failed to write report");
            });
        }
    });
    let elapsed = started.elapsed();

    println!("time={}.{:06}", elapsed.as_secs(), elapsed.subsec_micros());
    ExitCode::SUCCESS
}
