//! Verifies the Metal SHA-1 kernel against the CPU digest engine.
//!
//! The kernel is an independent implementation of SHA-1, so before its
//! results drive a search it must reproduce the CPU engine exactly: for a
//! target produced by the CPU, the kernel must locate the same preimage.

#![cfg(feature = "gpu")]

use shacrack::gpu::{initialize, Sha1Kernel};
use shacrack::{combinations, is_gpu_available, run_search_gpu, sha1, ProgressState, SearchConfig, SearchOutcome};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[test]
fn test_kernel_finds_cpu_targets() {
    if !is_gpu_available() {
        println!("Metal not available, skipping consistency test");
        return;
    }

    let context = initialize().expect("Failed to initialize GPU context");
    let kernel = Sha1Kernel::new(context).expect("Failed to create SHA-1 kernel");
    let interrupt = AtomicBool::new(false);

    // Edge candidates: first index, interior words, and the last index of a
    // length, all hashed by the CPU engine and recovered by the kernel
    for word in ["a", "aaa", "cab", "mzq", "zzzz"] {
        let target = sha1(word.as_bytes());
        let state = ProgressState::new(word.len(), combinations(word.len()));

        let found = kernel
            .search_length(word.len(), &target, &interrupt, &state)
            .expect("kernel dispatch failed");

        assert_eq!(found.as_deref(), Some(word), "kernel diverged on {word:?}");
    }
}

#[test]
fn test_kernel_reports_no_match_cleanly() {
    if !is_gpu_available() {
        println!("Metal not available, skipping consistency test");
        return;
    }

    let context = initialize().expect("Failed to initialize GPU context");
    let kernel = Sha1Kernel::new(context).expect("Failed to create SHA-1 kernel");
    let interrupt = AtomicBool::new(false);

    // Target has a length-5 preimage; scanning length 3 must exhaust
    let target = sha1(b"whale");
    let state = ProgressState::new(3, combinations(3));
    let found = kernel
        .search_length(3, &target, &interrupt, &state)
        .expect("kernel dispatch failed");

    assert!(found.is_none());
    assert_eq!(state.completed() as u128, combinations(3));
}

#[test]
fn test_gpu_search_end_to_end() {
    if !is_gpu_available() {
        println!("Metal not available, skipping consistency test");
        return;
    }

    let mut config = SearchConfig::new(sha1(b"dog"));
    config.max_length = 3;
    config.show_progress = false;
    let interrupt = Arc::new(AtomicBool::new(false));

    match run_search_gpu(&config, &interrupt, |_, _| {}) {
        Ok(SearchOutcome::Found { word, .. }) => assert_eq!(word, "dog"),
        other => panic!("expected Found(\"dog\"), got {other:?}"),
    }
}
