use std::sync::Arc;
use tokio::time::{sleep, timeout, Duration};
use tokio_util::sync::CancellationToken;
use triedns_jobs::{JobRunner, ResolverStatsJob};

mod helpers;
use helpers::{MockCache, MockResolverStats};

fn job(stats: &Arc<MockResolverStats>) -> ResolverStatsJob {
    ResolverStatsJob::new(stats.clone(), Arc::new(MockCache))
}

#[tokio::test]
async fn test_report_reads_both_sources() {
    let stats = Arc::new(MockResolverStats::new());
    let job = job(&stats);

    job.report();

    assert_eq!(stats.call_count(), 1);
    assert_eq!(job.reports_emitted(), 1);
}

#[tokio::test]
async fn test_job_reports_on_interval() {
    let stats = Arc::new(MockResolverStats::new());
    let job = Arc::new(job(&stats).with_interval(1));

    tokio::spawn(job.clone().start());
    sleep(Duration::from_millis(1100)).await;

    assert!(job.reports_emitted() >= 1, "report should have fired once");
}

#[tokio::test]
async fn test_zero_interval_disables_job() {
    let stats = Arc::new(MockResolverStats::new());
    let job = Arc::new(job(&stats).with_interval(0));

    timeout(Duration::from_millis(100), job.clone().start())
        .await
        .expect("disabled job returns immediately");

    assert_eq!(job.reports_emitted(), 0);
}

#[tokio::test]
async fn test_cancellation_stops_job() {
    let stats = Arc::new(MockResolverStats::new());
    let token = CancellationToken::new();
    let job = Arc::new(job(&stats).with_interval(3600).with_cancellation(token.clone()));

    let handle = tokio::spawn(job.start());
    token.cancel();

    timeout(Duration::from_secs(1), handle)
        .await
        .expect("job should stop after cancellation")
        .unwrap();
}

#[tokio::test]
async fn test_runner_spawns_configured_jobs() {
    assert!(JobRunner::new().start().is_empty());

    let stats = Arc::new(MockResolverStats::new());
    let token = CancellationToken::new();
    let handles = JobRunner::new()
        .with_resolver_stats(job(&stats).with_interval(3600))
        .with_shutdown_token(token.clone())
        .start();
    assert_eq!(handles.len(), 1);

    token.cancel();
    for handle in handles {
        timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    }
}
