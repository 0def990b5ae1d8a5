//! End-to-end chain properties: determinism across backends and
//! restarts, crash truncation, and golden regression vectors.

use std::sync::mpsc;

use hashclock::core::{
    BackendId, BackendRegistry, ChainEngine, ChainParams, ChainState, Digest,
};
use hashclock::log::{Checkpoint, CheckpointLog};
use hashclock::{Driver, DriverConfig};

/// Digest after 10 steps from genesis under standard parameters.
const STEP_10: [u32; 8] = [
    0xbb17f2e6, 0x439c6471, 0x5c674f4f, 0xda2da7ff, 0x2b1dc5ed, 0x5e00096f, 0x4eb670e5, 0x73706df3,
];

fn engine(id: BackendId) -> ChainEngine {
    let backend = BackendRegistry::builtin().resolve(id).unwrap();
    ChainEngine::new(ChainParams::standard(), backend)
}

fn config(id: BackendId, batch_size: u64, max_batches: u64) -> DriverConfig {
    DriverConfig {
        batch_size,
        backend: Some(id),
        max_batches: Some(max_batches),
    }
}

#[test]
fn driver_golden_first_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let log = CheckpointLog::open(dir.path().join("chain.log")).unwrap();
    let mut driver = Driver::new(config(BackendId::ACCELERATED, 10, 1), log).unwrap();

    let (_tx, rx) = mpsc::channel();
    let summary = driver.run(&rx).unwrap();

    assert_eq!(summary.final_step, 10);
    assert_eq!(summary.final_digest, Digest::from_words(STEP_10));
}

#[test]
fn driver_resume_matches_uninterrupted_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chain.log");
    let (_tx, rx) = mpsc::channel();

    // 5 batches in one run.
    {
        let log = CheckpointLog::open(&path).unwrap();
        let mut driver = Driver::new(config(BackendId::PORTABLE, 50, 5), log).unwrap();
        driver.run(&rx).unwrap();
    }

    // 2 + 3 batches across a restart on a second log.
    let split_path = dir.path().join("split.log");
    for max in [2, 3] {
        let log = CheckpointLog::open(&split_path).unwrap();
        let mut driver = Driver::new(config(BackendId::PORTABLE, 50, max), log).unwrap();
        driver.run(&rx).unwrap();
    }

    let whole = CheckpointLog::open(&path).unwrap().recover().unwrap();
    let split = CheckpointLog::open(&split_path).unwrap().recover().unwrap();
    assert_eq!(whole, split);
    assert_eq!(whole.unwrap().step, 250);
}

#[test]
fn backends_produce_identical_chains() {
    let dir = tempfile::tempdir().unwrap();
    let (_tx, rx) = mpsc::channel();
    let mut trailing = Vec::new();

    for id in [BackendId::PORTABLE, BackendId::ACCELERATED] {
        let path = dir.path().join(format!("chain-{id}.log"));
        let log = CheckpointLog::open(&path).unwrap();
        let mut driver = Driver::new(config(id, 25, 4), log).unwrap();
        driver.run(&rx).unwrap();
        trailing.push(CheckpointLog::open(&path).unwrap().recover().unwrap());
    }

    assert_eq!(trailing[0], trailing[1]);
}

#[test]
fn crash_between_checkpoints_truncates_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chain.log");
    let engine = engine(BackendId::PORTABLE);

    // Commit two batches of 100.
    let mut log = CheckpointLog::open(&path).unwrap();
    let mut state = engine.genesis();
    for _ in 0..2 {
        engine.advance_n(&mut state, 100);
        log.append(&Checkpoint::from_state(&state)).unwrap();
    }

    // Crash mid-batch: 37 more in-memory steps that never reach the log.
    engine.advance_n(&mut state, 37);
    drop(log);

    // Recovery yields exactly the last committed checkpoint, none of
    // the in-flight steps.
    let recovered = CheckpointLog::open(&path)
        .unwrap()
        .recover()
        .unwrap()
        .expect("committed checkpoint survives the crash");
    assert_eq!(recovered.step, 200);

    // Resuming reproduces the same chain the uncrashed run would have:
    // the restarted chain is a true prefix continuation, never a fork.
    let mut resumed = recovered.to_state();
    engine.advance_n(&mut resumed, 100);

    let mut continuous = engine.genesis();
    engine.advance_n(&mut continuous, 300);
    assert_eq!(resumed, continuous);
}

#[test]
fn independent_chains_advance_in_parallel() {
    // Distinct chains own disjoint state: no synchronization, same
    // digests as a single-threaded run.
    let handles: Vec<_> = [BackendId::PORTABLE, BackendId::ACCELERATED]
        .into_iter()
        .map(|id| {
            std::thread::spawn(move || {
                let engine = engine(id);
                let mut state = engine.genesis();
                engine.advance_n(&mut state, 200);
                *state.digest()
            })
        })
        .collect();

    let digests: Vec<Digest> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let reference = engine(BackendId::PORTABLE);
    let mut expected = reference.genesis();
    reference.advance_n(&mut expected, 200);

    assert_eq!(digests[0], *expected.digest());
    assert_eq!(digests[1], *expected.digest());
}

#[test]
fn recovered_state_rederives_block_invariant() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chain.log");
    let engine = engine(BackendId::ACCELERATED);

    let mut log = CheckpointLog::open(&path).unwrap();
    let mut state = engine.genesis();
    engine.advance_n(&mut state, 64);
    log.append(&Checkpoint::from_state(&state)).unwrap();
    drop(log);

    let recovered: ChainState = CheckpointLog::open(&path)
        .unwrap()
        .recover()
        .unwrap()
        .unwrap()
        .to_state();
    assert!(recovered.block().duplicates(recovered.digest()));
    assert_eq!(recovered, state);
}
