use clap::Parser;
use shacrack::{
    estimate_time, format_duration, format_number, format_speed, keyspace, SearchConfig,
    SearchOutcome, Searcher, Sha1Digest,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "shacrack")]
#[command(about = "Brute-force SHA-1 preimage search over lowercase words", long_about = None)]
struct Cli {
    /// Target SHA-1 digest as a 40-character hex string
    #[arg(value_name = "SHA1_HEX", required_unless_present = "benchmark")]
    target: Option<String>,

    /// Number of worker threads (default: all CPU cores)
    #[arg(short = 't', long, value_name = "N")]
    threads: Option<usize>,

    /// Give up after searching words of this length
    #[arg(long = "max-length", value_name = "L", default_value_t = shacrack::DEFAULT_MAX_LENGTH)]
    max_length: usize,

    /// Run benchmark mode (5 second hash-rate test)
    #[arg(long = "benchmark")]
    benchmark: bool,

    /// Use the Metal GPU backend instead of CPU workers
    #[cfg(feature = "gpu")]
    #[arg(long = "gpu")]
    use_gpu: bool,
}

fn main() {
    // clap exits 2 on usage errors by default; the CLI contract is exit 1
    // for a wrong argument count, with 0 reserved for help/version
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    let num_threads = cli.threads.unwrap_or_else(num_cpus::get).max(1);

    if cli.benchmark {
        run_benchmark(num_threads);
        return;
    }

    let target: Sha1Digest = match cli.target.as_deref().unwrap_or_default().parse() {
        Ok(digest) => digest,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    let mut config = SearchConfig::new(target);
    config.max_length = cli.max_length;
    config.num_threads = num_threads;
    config.show_progress = true;

    // Setup Ctrl+C handler
    let interrupt = Arc::new(AtomicBool::new(false));
    let flag = interrupt.clone();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let on_length = |length: usize, total: u128| {
        println!(
            "\nTrying length {} ({} combinations)...",
            length,
            format_number(total)
        );
    };

    #[cfg(feature = "gpu")]
    if cli.use_gpu {
        if !shacrack::is_gpu_available() {
            eprintln!("Error: GPU acceleration requested but Metal is not available on this system");
            std::process::exit(1);
        }
        if config.max_length > shacrack::gpu::MAX_GPU_WORD_LENGTH {
            println!(
                "Note: GPU backend supports word lengths up to {}, capping search there",
                shacrack::gpu::MAX_GPU_WORD_LENGTH
            );
            config.max_length = shacrack::gpu::MAX_GPU_WORD_LENGTH;
        }
        println!("Starting search on Metal GPU...");
        match shacrack::run_search_gpu(&config, &interrupt, on_length) {
            Ok(outcome) => std::process::exit(report(&outcome)),
            Err(err) => {
                eprintln!("\nGPU search failed: {}", err);
                std::process::exit(1);
            }
        }
    }

    println!("Starting search using {} CPU cores...", config.num_threads);

    let searcher = match Searcher::new(config) {
        Ok(searcher) => searcher,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    let outcome = searcher.run_with_observer(&interrupt, on_length);
    std::process::exit(report(&outcome));
}

/// Print the terminal outcome and pick the process exit code
fn report(outcome: &SearchOutcome) -> i32 {
    match outcome {
        SearchOutcome::Found { word, elapsed } => {
            println!("\nSHA-1 input: {}", word);
            println!("Time for breaking: {}", format_duration(*elapsed));
            0
        }
        SearchOutcome::Exhausted { elapsed } => {
            println!("\nNo match found");
            println!("Time searched: {}", format_duration(*elapsed));
            0
        }
        SearchOutcome::Interrupted { .. } => {
            println!("\nSearch interrupted by user");
            130
        }
    }
}

/// Run benchmark mode: measure the CPU hash rate, then estimate how long an
/// exhaustive search of each word length would take at that rate.
fn run_benchmark(num_threads: usize) {
    const BENCH_WORD_LENGTH: usize = 8;
    const BATCH: u64 = 10_000;

    println!("shacrack - Benchmark Mode");
    println!("=========================");
    println!();
    println!("Running 5-second benchmark with {} threads...", num_threads);
    println!();

    let start = Instant::now();
    let duration = Duration::from_secs(5);
    let hashes_done = Arc::new(std::sync::atomic::AtomicU64::new(0));
    let stop_flag = Arc::new(AtomicBool::new(false));

    // Spawn worker threads
    let mut handles = vec![];
    for thread_id in 0..num_threads {
        let hashes = hashes_done.clone();
        let stop = stop_flag.clone();

        let handle = std::thread::spawn(move || {
            let mut count = 0u64;
            let mut word = [0u8; BENCH_WORD_LENGTH];
            // Spread threads across the keyspace so they hash distinct words
            let mut index = thread_id as u128 * keyspace::combinations(BENCH_WORD_LENGTH)
                / num_threads.max(1) as u128;

            while !stop.load(Ordering::Relaxed) {
                for _ in 0..BATCH {
                    keyspace::nth_into(&mut word, index % keyspace::combinations(BENCH_WORD_LENGTH));
                    let _ = shacrack::sha1(&word);
                    index += 1;
                    count += 1;
                }
            }

            hashes.fetch_add(count, Ordering::Relaxed);
        });
        handles.push(handle);
    }

    // Wait for duration
    std::thread::sleep(duration);
    stop_flag.store(true, Ordering::Relaxed);

    // Wait for all threads
    for handle in handles {
        let _ = handle.join();
    }

    let elapsed = start.elapsed();
    let total_hashes = hashes_done.load(Ordering::Relaxed);
    let rate = (total_hashes as f64 / elapsed.as_secs_f64()) as u64;

    println!("Benchmark Results:");
    println!("  Hashes computed: {}", format_number(total_hashes as u128));
    println!("  Time:            {:.1}s", elapsed.as_secs_f64());
    println!("  Average speed:   {} hashes/sec", format_speed(rate));
    println!();

    println!("Estimated time to exhaust each word length:");
    for length in 4..=10 {
        let combos = keyspace::combinations(length);
        println!(
            "  {:>2} chars:  {}",
            length,
            format_duration(estimate_time(combos, rate))
        );
    }
}
