//! Command implementations

use crate::collector::SignalCollector;
use crate::report;
use crate::scenarios;
use crate::score_log::{ScoreLog, ScoreRecord};
use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use gh_client::{GhCliClient, OctocrabClient, PullRequestSource, RepoRef};
use gh_pr_pulse_config::{AppConfig, SourceKind};
use gh_pr_pulse_scorer::Scorer;
use log::{error, info, warn};
use std::future::Future;
use std::time::Duration;

/// Options of the `run` command
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub append_to_log: bool,
    pub interval_minutes: Option<u64>,
}

/// Build the repository reference from config
pub fn repo_ref(config: &AppConfig) -> Result<RepoRef> {
    let slug = config.repository.as_deref().context(
        "No repository configured. Set `repository` in .gh-pr-pulse.toml or pass --repo OWNER/NAME",
    )?;
    Ok(RepoRef::parse(
        slug,
        config.base_branch.clone(),
        config.host.clone(),
    )?)
}

/// Create the configured pull request source
async fn build_source(config: &AppConfig) -> Result<Box<dyn PullRequestSource>> {
    info!("Using {} source", config.source);
    let source: Box<dyn PullRequestSource> = match config.source {
        SourceKind::Gh => Box::new(GhCliClient::new(config.fetch_limit)),
        SourceKind::Api => Box::new(
            OctocrabClient::connect(config.host.as_deref(), config.fetch_limit).await?,
        ),
    };
    Ok(source)
}

/// Fetch, score, print and optionally log; once or periodically
pub async fn run(config: &AppConfig, options: RunOptions) -> Result<()> {
    let scorer = Scorer::new(config.weights);
    let collector = SignalCollector::new(
        build_source(config).await?,
        repo_ref(config)?,
        config.awaiting_approval_label.clone(),
        config.ready_for_merge_label.clone(),
    );
    let score_log = if options.append_to_log {
        Some(ScoreLog::new(config.log_file_path()?))
    } else {
        None
    };

    let Some(minutes) = options.interval_minutes else {
        evaluate(&collector, &scorer, score_log.as_ref()).await?;
        return Ok(());
    };

    info!(
        "Evaluating {} every {} minute(s)",
        collector.repo().slug(),
        minutes
    );
    let period = interval_period(minutes)?;
    run_periodically(
        || evaluate(&collector, &scorer, score_log.as_ref()),
        period,
        ctrl_c(),
    )
    .await;
    Ok(())
}

fn interval_period(minutes: u64) -> Result<Duration> {
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .with_context(|| format!("Interval of {} minutes is too large", minutes))
}

/// Resolves on Ctrl-C; never, if the handler cannot be installed
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Run `cycle` every `period` until `shutdown` resolves
///
/// `shutdown` is raced against the running cycle as well as the sleep, so an
/// interrupt is never lost while a cycle is in flight.
async fn run_periodically<C, Fut, T>(
    mut cycle: C,
    period: Duration,
    shutdown: impl Future<Output = ()>,
) where
    C: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            result = cycle() => {
                // A failed cycle does not end the loop
                if let Err(e) = result {
                    error!("Evaluation failed: {:#}", e);
                    eprintln!("Error: {:#}", e);
                }
            }
            _ = &mut shutdown => {
                info!("Interrupted, stopping");
                return;
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(period) => {}
            _ = &mut shutdown => {
                info!("Interrupted, stopping");
                return;
            }
        }
    }
}

/// One evaluation cycle
async fn evaluate(
    collector: &SignalCollector,
    scorer: &Scorer,
    score_log: Option<&ScoreLog>,
) -> Result<ScoreRecord> {
    evaluate_at(collector, scorer, score_log, Utc::now()).await
}

async fn evaluate_at(
    collector: &SignalCollector,
    scorer: &Scorer,
    score_log: Option<&ScoreLog>,
    now: DateTime<Utc>,
) -> Result<ScoreRecord> {
    let signals = collector.collect(now).await?;
    let score = scorer.evaluate(&signals);

    println!("{}", report::render(&signals, &score));

    let record = ScoreRecord::new(now.with_timezone(&Local).naive_local(), signals, score);
    if let Some(score_log) = score_log {
        score_log.append(&record)?;
    }
    Ok(record)
}

/// Print the built-in scenarios
pub fn show_scenarios(config: &AppConfig) -> Result<()> {
    let scorer = Scorer::new(config.weights);
    print!("{}", scenarios::render_all(&scorer)?);
    Ok(())
}

/// Print the last `limit` log records
pub fn show_history(config: &AppConfig, limit: usize) -> Result<()> {
    let score_log = ScoreLog::new(config.log_file_path()?);
    let records = score_log.read_recent(limit)?;

    if records.is_empty() {
        println!("No records in {}", score_log.path().display());
        return Ok(());
    }

    for record in &records {
        println!("{}", report::render_history_line(record));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::fake::FakeSource;
    use crate::score_log::HEADER;
    use chrono::TimeZone;
    use gh_client::{MergedPullRequest, PullRequestSummary};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_evaluate_appends_record() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let pr = |number, hours_ago| PullRequestSummary {
            number,
            created_at: now - chrono::Duration::hours(hours_ago),
        };
        let mut labeled = HashMap::new();
        labeled.insert("Awaiting Approval".to_string(), vec![pr(1, 30), pr(2, 4)]);
        let source = FakeSource {
            last_merged: Some(MergedPullRequest {
                number: 9,
                merged_at: now - chrono::Duration::hours(2),
            }),
            open: vec![pr(1, 30), pr(2, 4), pr(3, 1)],
            labeled,
            ..Default::default()
        };
        let collector = SignalCollector::new(
            Box::new(source),
            RepoRef::parse("octocat/Hello-World", "main", None).unwrap(),
            "Awaiting Approval",
            "Ready For Merge",
        );
        let scorer = Scorer::new(AppConfig::default().weights);
        let dir = tempfile::tempdir().unwrap();
        let score_log = ScoreLog::new(dir.path().join("logs").join("pulse.csv"));

        let record = evaluate_at(&collector, &scorer, Some(&score_log), now)
            .await
            .unwrap();

        assert_eq!(record.timestamp, now.with_timezone(&Local).naive_local());
        assert_eq!(record.signals.open_pr_count(), 3);
        assert_eq!(record.signals.time_since_last_merge(), 2.0);
        assert_eq!(record.signals.oldest_waiting_age(), 30.0);
        assert_eq!(record.signals.oldest_ready_age(), 0.0);
        // 2.0 * 3 + 1.5 * 2 + 1.5 * 30 + 1.0 * 0
        assert_eq!(record.score.risk_basis, 54.0);

        let content = std::fs::read_to_string(score_log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], HEADER.join(","));
        let expected_prefix = format!(
            "{},3,2,30,0,54,",
            record.timestamp.format(crate::score_log::RECORD_TIME_FORMAT)
        );
        assert!(lines[1].starts_with(&expected_prefix), "row was {}", lines[1]);

        assert_eq!(score_log.read_recent(10).unwrap(), vec![record]);
    }

    #[tokio::test]
    async fn test_evaluate_failure_leaves_log_untouched() {
        let collector = SignalCollector::new(
            Box::new(FakeSource::default()),
            RepoRef::parse("octocat/Hello-World", "main", None).unwrap(),
            "Awaiting Approval",
            "Ready For Merge",
        );
        let scorer = Scorer::new(AppConfig::default().weights);
        let dir = tempfile::tempdir().unwrap();
        let score_log = ScoreLog::new(dir.path().join("pulse.csv"));

        assert!(evaluate(&collector, &scorer, Some(&score_log)).await.is_err());
        assert!(!score_log.path().exists());
    }

    #[test]
    fn test_interval_period() {
        assert_eq!(interval_period(15).unwrap(), Duration::from_secs(900));
        let err = interval_period(u64::MAX).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_running_cycle() {
        let mut calls = 0;
        let stopped = tokio::time::timeout(
            Duration::from_secs(5),
            run_periodically(
                || {
                    calls += 1;
                    std::future::pending::<Result<()>>()
                },
                Duration::from_secs(3600),
                async {},
            ),
        )
        .await;

        assert!(stopped.is_ok());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_failed_cycles_keep_running_until_shutdown() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let mut tx = Some(tx);
        let mut calls = 0;

        run_periodically(
            || {
                calls += 1;
                if calls == 3 {
                    if let Some(tx) = tx.take() {
                        let _ = tx.send(());
                    }
                }
                std::future::ready(Err::<(), _>(anyhow::anyhow!("cycle failed")))
            },
            Duration::from_millis(1),
            async {
                let _ = rx.await;
            },
        )
        .await;

        assert_eq!(calls, 3);
    }

    #[test]
    fn test_repo_ref_requires_repository() {
        let err = repo_ref(&AppConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("No repository configured"));
    }

    #[test]
    fn test_repo_ref_from_config() {
        let config = AppConfig::from_toml_str(
            r#"
                repository = "octocat/Hello-World"
                base_branch = "prod"
                host = "ghe.example.com"
            "#,
        )
        .unwrap();

        let repo = repo_ref(&config).unwrap();
        assert_eq!(repo.slug(), "octocat/Hello-World");
        assert_eq!(repo.base_branch, "prod");
        assert_eq!(repo.host.as_deref(), Some("ghe.example.com"));
    }

    #[test]
    fn test_repo_ref_rejects_bad_slug() {
        let config = AppConfig::from_toml_str("repository = \"just-a-name\"").unwrap();
        assert!(repo_ref(&config).is_err());
    }

    #[test]
    fn test_history_with_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.log_file = Some(dir.path().join("pulse.csv"));
        assert!(show_history(&config, 5).is_ok());
    }
}
