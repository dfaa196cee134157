//! Full runs against a mock Salesforce org

mod common;

use apexlog_dl::{Error, LogId, RunOutcome, Session, list_logs, run, run_with_session};
use common::{MockOrg, SAMPLE_LOGS, apex_log_row, log_body, mock_config};

#[tokio::test]
async fn three_logs_are_listed_downloaded_and_written() {
    let org = MockOrg::start().await;
    org.with_logs(
        500,
        SAMPLE_LOGS
            .iter()
            .map(|(id, len)| apex_log_row(id, *len))
            .collect(),
    )
    .await;
    for (id, _) in SAMPLE_LOGS {
        org.with_body(id, log_body(id), 1).await;
    }

    let (config, _temp_dir) = mock_config(&org, 500);
    let outcome = run(&config).await.unwrap();

    let RunOutcome::Completed(summary) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed(), 0);
    assert!(summary.is_complete());

    // Written in descending length order, one file per id
    let expected: Vec<_> = SAMPLE_LOGS
        .iter()
        .map(|(id, _)| config.output_dir.join(format!("apex_log-{id}.log")))
        .collect();
    assert_eq!(summary.files, expected);
    for (id, _) in SAMPLE_LOGS {
        let written = std::fs::read(config.output_dir.join(format!("apex_log-{id}.log"))).unwrap();
        assert_eq!(written, log_body(id));
    }
    assert_eq!(std::fs::read_dir(&config.output_dir).unwrap().count(), 3);
}

#[tokio::test]
async fn empty_listing_exits_cleanly_without_downloads() {
    let org = MockOrg::start().await;
    org.with_logs(500, vec![]).await;

    let (config, _temp_dir) = mock_config(&org, 500);
    let outcome = run(&config).await.unwrap();

    assert_eq!(outcome, RunOutcome::NothingToDownload);
    assert!(!config.output_dir.exists());
    org.assert_no_downloads().await;
}

#[tokio::test]
async fn one_failed_download_does_not_stop_the_rest() {
    let org = MockOrg::start().await;
    org.with_logs(
        500,
        SAMPLE_LOGS
            .iter()
            .map(|(id, len)| apex_log_row(id, *len))
            .collect(),
    )
    .await;
    let (first, _) = SAMPLE_LOGS[0];
    let (middle, _) = SAMPLE_LOGS[1];
    let (last, _) = SAMPLE_LOGS[2];
    org.with_body(first, log_body(first), 1).await;
    org.with_failing_body(middle, 503).await;
    org.with_body(last, log_body(last), 1).await;

    let (config, _temp_dir) = mock_config(&org, 500);
    let RunOutcome::Completed(summary) = run(&config).await.unwrap() else {
        panic!("expected a completed run");
    };

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].id, LogId::from(middle));
    assert!(
        !config
            .output_dir
            .join(format!("apex_log-{middle}.log"))
            .exists()
    );
}

#[tokio::test]
async fn wrong_token_is_fatal_and_touches_nothing() {
    let org = MockOrg::start().await;

    let (mut config, _temp_dir) = mock_config(&org, 500);
    config.auth_token = "expired-token".into();

    // The mock only accepts TEST_TOKEN, so validation falls through to a 404
    let err = run(&config).await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)), "got {err:?}");
    assert!(err.is_fatal());
    assert_eq!(err.exit_code(), 1);
    assert!(!config.output_dir.exists());
    org.assert_no_downloads().await;
}

#[tokio::test]
async fn rerun_overwrites_and_uses_txt_extension() {
    let org = MockOrg::start().await;
    let (id, len) = SAMPLE_LOGS[0];
    org.with_body(id, log_body(id), 1).await;

    let (mut config, _temp_dir) = mock_config(&org, 500);
    config.file_extension = "txt".into();
    std::fs::create_dir(&config.output_dir).unwrap();
    let target = config.output_dir.join(format!("apex_log-{id}.txt"));
    std::fs::write(&target, b"stale content from an earlier run").unwrap();

    let session = Session::login(&config).await.unwrap();
    assert!(session.is_sandbox());

    org.with_logs(500, vec![apex_log_row(id, len)]).await;
    let outcome = run_with_session(&session, &config).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Completed(ref s) if s.succeeded == 1));
    assert_eq!(std::fs::read(&target).unwrap(), log_body(id));
}

#[tokio::test]
async fn listing_is_reusable_on_its_own() {
    let org = MockOrg::start().await;
    org.with_logs(
        13860,
        vec![
            apex_log_row("07LUE000009slSz2AI", 13864),
            apex_log_row("07LUE000009shu62AA", 13861),
        ],
    )
    .await;

    let (config, _temp_dir) = mock_config(&org, 13860);
    let session = Session::login(&config).await.unwrap();
    let logs = list_logs(&session, 13860).await.unwrap();

    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|l| l.length > 13860));
    assert!(logs.windows(2).all(|w| w[0].length >= w[1].length));
}
