use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nbdoc_async::{Error, PoolConfig, QueuePolicy, WorkerPool};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_jobs_never_exceed_the_bound() {
    const BOUND: usize = 2;
    const JOBS: usize = 8;

    let pool = Arc::new(WorkerPool::new(PoolConfig::new(BOUND)));
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::new();
    for _ in 0..JOBS {
        let pool = Arc::clone(&pool);
        let running = Arc::clone(&running);
        let peak = Arc::clone(&peak);
        tasks.push(tokio::spawn(async move {
            pool.run(move || {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(40));
                running.fetch_sub(1, Ordering::SeqCst);
            })
            .await
        }));
    }

    for task in tasks {
        task.await.expect("task join").expect("pool run");
    }

    assert!(peak.load(Ordering::SeqCst) <= BOUND);
    assert_eq!(running.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reject_policy_fails_fast_when_saturated() {
    let pool = Arc::new(WorkerPool::new(
        PoolConfig::new(1).with_policy(QueuePolicy::Reject),
    ));

    let busy = {
        let pool = Arc::clone(&pool);
        tokio::spawn(async move {
            pool.run(|| std::thread::sleep(Duration::from_millis(300)))
                .await
        })
    };

    // Give the first job time to occupy the only slot.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = pool.run(|| ()).await.unwrap_err();
    assert!(matches!(err, Error::PoolSaturated));

    busy.await.expect("task join").expect("pool run");

    // The slot is free again once the busy job finishes.
    pool.run(|| ()).await.expect("pool has capacity again");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn collaborator_errors_cross_the_bridge_intact() {
    let pool = WorkerPool::new(PoolConfig::new(1));

    let err = pool
        .run_result(|| Err::<(), nbdoc::Error>(nbdoc::Error::MissingField("cells")))
        .await
        .unwrap_err();
    // Kind and message both survive the bridge.
    assert_eq!(
        err.to_string(),
        nbdoc::Error::MissingField("cells").to_string()
    );
    match err {
        Error::Document(nbdoc::Error::MissingField(field)) => assert_eq!(field, "cells"),
        other => panic!("expected the collaborator error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn abandoned_work_releases_its_slot_when_it_finishes() {
    let pool = Arc::new(WorkerPool::new(
        PoolConfig::new(1).with_policy(QueuePolicy::Reject),
    ));
    let finished = Arc::new(AtomicUsize::new(0));

    let abandoned = {
        let pool = Arc::clone(&pool);
        let finished = Arc::clone(&finished);
        tokio::spawn(async move {
            pool.run(move || {
                std::thread::sleep(Duration::from_millis(100));
                finished.fetch_add(1, Ordering::SeqCst);
            })
            .await
        })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;

    // Cancel the awaiting caller; the blocking job itself is not killed.
    abandoned.abort();
    assert!(matches!(
        pool.run(|| ()).await.unwrap_err(),
        Error::PoolSaturated
    ));

    // Once the abandoned job runs to completion, its slot frees up.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    pool.run(|| ()).await.expect("slot released");
}

#[tokio::test]
async fn shared_pool_is_created_lazily_and_reused() {
    let first = WorkerPool::shared() as *const WorkerPool;
    let second = WorkerPool::shared() as *const WorkerPool;
    assert_eq!(first, second);
    assert!(WorkerPool::shared().workers() >= 1);
}
