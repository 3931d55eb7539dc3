#[cfg(test)]
mod tests {
    use crate::models::SlotDto;
    use crate::service::{MockSlotApi, SlotApiError};
    use crate::submission::{
        BatchSubmitter, PacingConfig, SubmissionOptions, SubmissionStrategy, MAX_RETRY_AFTER,
    };
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
    use planify_config::{SubmissionConfig, SubmissionPolicy};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    fn slot(hour: u32) -> SlotDto {
        let start: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap();
        SlotDto::active(start, start + ChronoDuration::minutes(30))
    }

    fn http_error(status: u16) -> SlotApiError {
        SlotApiError::Http {
            status,
            body: json!({ "message": format!("status {status}") }),
            retry_after: None,
        }
    }

    fn sequential() -> SubmissionOptions {
        SubmissionOptions {
            strategy: SubmissionStrategy::Sequential,
            dry_run: false,
        }
    }

    #[test]
    fn test_min_delay_for_three_requests_per_second() {
        assert_eq!(PacingConfig::default().min_delay(), Duration::from_millis(354));
        let one = PacingConfig {
            max_requests_per_second: 1,
            ..PacingConfig::default()
        };
        assert_eq!(one.min_delay(), Duration::from_millis(1020));
        let zero = PacingConfig {
            max_requests_per_second: 0,
            ..PacingConfig::default()
        };
        assert_eq!(zero.min_delay(), Duration::from_millis(1020));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let pacing = PacingConfig::default();
        let waits: Vec<u128> = (0..6)
            .map(|attempt| pacing.backoff(attempt, None).as_millis())
            .collect();
        assert_eq!(waits, vec![1000, 2000, 4000, 5000, 5000, 5000]);
        assert_eq!(pacing.backoff(40, None), Duration::from_millis(5000));
    }

    #[test]
    fn test_backoff_honors_positive_retry_after() {
        let pacing = PacingConfig::default();
        assert_eq!(
            pacing.backoff(0, Some(Duration::from_secs(7))),
            Duration::from_secs(7)
        );
        assert_eq!(
            pacing.backoff(1, Some(Duration::ZERO)),
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn test_backoff_bounds_server_hint() {
        let pacing = PacingConfig::default();
        let absurd = Some(Duration::from_secs(u64::from(u32::MAX)));
        assert_eq!(pacing.backoff(0, absurd), MAX_RETRY_AFTER);

        let patient = PacingConfig {
            max_backoff: Duration::from_secs(120),
            ..PacingConfig::default()
        };
        assert_eq!(patient.backoff(0, absurd), Duration::from_secs(120));
        assert_eq!(
            patient.backoff(0, Some(Duration::from_secs(90))),
            Duration::from_secs(90)
        );
    }

    #[test]
    fn test_options_from_config() {
        let config = SubmissionConfig {
            policy: SubmissionPolicy::Sequential,
            ..SubmissionConfig::default()
        };
        assert_eq!(
            SubmissionOptions::from(&config).strategy,
            SubmissionStrategy::Sequential
        );
        let paced = SubmissionOptions::from(&SubmissionConfig::default());
        assert_eq!(
            paced.strategy,
            SubmissionStrategy::Paced(PacingConfig::default())
        );
        assert!(!paced.dry_run);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_going() {
        let failing = slot(10);
        let mut api = MockSlotApi::new();
        api.expect_create_slot().times(3).returning(move |dto| {
            if dto.start_time == failing.start_time {
                Err(http_error(500))
            } else {
                Ok(json!({ "id": dto.start_time.to_rfc3339() }))
            }
        });

        let submitter = BatchSubmitter::new(Arc::new(api), sequential());
        let result = submitter.submit(&[slot(9), slot(10), slot(11)]).await;

        assert_eq!(result.successes.len(), 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].dto, slot(10));
        assert_eq!(result.failures[0].status_code, 500);
        assert_eq!(result.failures[0].error["message"], "status 500");
        // Outcomes keep submission order
        assert_eq!(result.successes[0].dto, slot(9));
        assert_eq!(result.successes[1].dto, slot(11));
    }

    #[tokio::test]
    async fn test_network_failure_has_status_zero() {
        let mut api = MockSlotApi::new();
        api.expect_create_slot()
            .returning(|_| Err(SlotApiError::Network("connection refused".into())));

        let result = BatchSubmitter::new(Arc::new(api), sequential())
            .submit(&[slot(9)])
            .await;
        assert_eq!(result.failures[0].status_code, 0);
        assert!(result.failures[0].error["message"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }

    #[tokio::test]
    async fn test_sequential_does_not_retry_rate_limit() {
        let mut api = MockSlotApi::new();
        api.expect_create_slot()
            .times(1)
            .returning(|_| Err(http_error(429)));

        let result = BatchSubmitter::new(Arc::new(api), sequential())
            .submit(&[slot(9)])
            .await;
        assert_eq!(result.failures[0].status_code, 429);
    }

    #[tokio::test]
    async fn test_empty_batch_and_dry_run_send_nothing() {
        let mut api = MockSlotApi::new();
        api.expect_create_slot().never();
        let api = Arc::new(api);

        let empty = BatchSubmitter::new(api.clone(), SubmissionOptions::default())
            .submit(&[])
            .await;
        assert_eq!(empty.total(), 0);
        assert!(!empty.dry_run);

        let dry = BatchSubmitter::new(
            api,
            SubmissionOptions {
                dry_run: true,
                ..SubmissionOptions::default()
            },
        )
        .submit(&[slot(9), slot(10)])
        .await;
        assert_eq!(dry.total(), 0);
        assert!(dry.is_success());
        assert!(dry.dry_run);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhaustion_becomes_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut api = MockSlotApi::new();
        api.expect_create_slot().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(http_error(429))
        });

        let started = Instant::now();
        let result = BatchSubmitter::new(Arc::new(api), SubmissionOptions::default())
            .submit(&[slot(9)])
            .await;

        // First attempt plus five retries
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].status_code, 429);
        // 1 + 2 + 4 + 5 + 5 seconds of backoff
        assert!(started.elapsed() >= Duration::from_secs(17));
        assert!(started.elapsed() < Duration::from_secs(18));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_slot_recovers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut api = MockSlotApi::new();
        api.expect_create_slot().returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(SlotApiError::Http {
                    status: 429,
                    body: json!({}),
                    retry_after: Some(Duration::from_secs(2)),
                })
            } else {
                Ok(json!({ "ok": true }))
            }
        });

        let started = Instant::now();
        let result = BatchSubmitter::new(Arc::new(api), SubmissionOptions::default())
            .submit(&[slot(9)])
            .await;

        assert_eq!(result.successes.len(), 1);
        assert!(result.failures.is_empty());
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(started.elapsed() < Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_spaces_requests() {
        let sent_at = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = sent_at.clone();
        let mut api = MockSlotApi::new();
        api.expect_create_slot().returning(move |_| {
            log.lock().unwrap().push(Instant::now());
            Ok(json!({}))
        });

        let started = Instant::now();
        let result = BatchSubmitter::new(Arc::new(api), SubmissionOptions::default())
            .submit(&[slot(9), slot(10), slot(11)])
            .await;

        assert_eq!(result.successes.len(), 3);
        let sent_at = sent_at.lock().unwrap();
        // The first request goes out immediately
        assert!(sent_at[0] - started < Duration::from_millis(1));
        for pair in sent_at.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(354));
        }
        assert!(started.elapsed() >= Duration::from_millis(708));
    }
}
