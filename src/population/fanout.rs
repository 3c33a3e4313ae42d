//! Bounded concurrent population lookups with an overall deadline.
//!
//! Lookups are independent, so each runs as its own job on a dedicated
//! rayon pool of `jobs` threads and sends its result over a channel. The
//! caller collects until every result arrived or the deadline passed;
//! countries still pending at the deadline are reported as
//! [`PopulationError::TimedOut`]. Jobs that start after the deadline give up
//! immediately instead of hitting the network.

use super::{PopulationError, PopulationSource, DEFAULT_POPULATION_YEAR};
use crate::config::retry::{retry_until, RetryConfig};
use crate::country::CountryKey;
use crate::progress::ProgressConfig;
use crossbeam::channel;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FanoutSettings {
    pub year: i32,
    pub jobs: usize,
    /// Overall deadline for the whole fan-out
    pub timeout: Duration,
    pub retry: RetryConfig,
    pub progress: ProgressConfig,
}

impl Default for FanoutSettings {
    fn default() -> Self {
        Self {
            year: DEFAULT_POPULATION_YEAR,
            jobs: 4,
            timeout: Duration::from_secs(60),
            retry: RetryConfig::default(),
            progress: ProgressConfig { quiet_mode: true },
        }
    }
}

type LookupResult = (CountryKey, Result<u64, PopulationError>);

/// Fetch every key from `source`. Returns one result per distinct key, in
/// key order.
pub fn fetch_all(
    source: Arc<dyn PopulationSource>,
    keys: &[CountryKey],
    settings: &FanoutSettings,
) -> Vec<LookupResult> {
    let keys: Vec<CountryKey> = keys
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if keys.is_empty() {
        return Vec::new();
    }

    let started = Instant::now();
    // Unrepresentable deadlines mean no deadline
    let deadline = started.checked_add(settings.timeout);
    let (tx, rx) = channel::unbounded::<LookupResult>();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.jobs.max(1))
        .thread_name(|i| format!("population-{i}"))
        .build();
    if let Err(e) = &pool {
        tracing::warn!("population pool unavailable, using global pool: {e}");
    }

    for key in &keys {
        let tx = tx.clone();
        let source = Arc::clone(&source);
        let retry = settings.retry.clone();
        let year = settings.year;
        let key = key.clone();

        let job = move || {
            let result = if deadline.is_some_and(|d| Instant::now() >= d) {
                Err(PopulationError::TimedOut)
            } else {
                retry_until(&retry, deadline, PopulationError::is_retryable, || {
                    source.fetch(&key, year)
                })
            };
            // The receiver is gone once the deadline passed
            let _ = tx.send((key, result));
        };

        match &pool {
            Ok(pool) => pool.spawn(job),
            Err(_) => rayon::spawn(job),
        }
    }
    drop(tx);

    let bar = settings.progress.lookup_bar(keys.len() as u64);
    let mut results: BTreeMap<CountryKey, Result<u64, PopulationError>> = BTreeMap::new();
    while results.len() < keys.len() {
        let received = match deadline {
            Some(deadline) => rx.recv_deadline(deadline).ok(),
            None => rx.recv().ok(),
        };
        match received {
            Some((key, result)) => {
                if let Err(error) = &result {
                    tracing::warn!(%key, %error, "population lookup failed");
                }
                results.insert(key, result);
                bar.inc(1);
            }
            None => break,
        }
    }
    bar.finish_and_clear();

    let mut timed_out = 0;
    for key in &keys {
        results.entry(key.clone()).or_insert_with(|| {
            timed_out += 1;
            Err(PopulationError::TimedOut)
        });
    }
    if timed_out > 0 {
        tracing::warn!(
            timed_out,
            timeout_secs = settings.timeout.as_secs_f64(),
            "population lookups still pending at deadline"
        );
    }
    tracing::debug!(
        lookups = keys.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "population fan-out finished"
    );

    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::StaticSource;
    use std::collections::HashSet;

    fn key(code: &str) -> CountryKey {
        CountryKey::parse(code).unwrap()
    }

    struct SlowFor {
        slow: HashSet<CountryKey>,
        delay: Duration,
    }

    impl PopulationSource for SlowFor {
        fn name(&self) -> &str {
            "slow"
        }

        fn fetch(&self, key: &CountryKey, _year: i32) -> Result<u64, PopulationError> {
            if self.slow.contains(key) {
                std::thread::sleep(self.delay);
            }
            Ok(1_000)
        }
    }

    #[test]
    fn test_fetch_all_returns_one_result_per_key_in_order() {
        let source: Arc<dyn PopulationSource> = Arc::new(
            StaticSource::new("static")
                .with(key("SWE"), 10_000_000)
                .with(key("AUT"), 9_000_000),
        );
        let results = fetch_all(
            source,
            &[key("SWE"), key("AUT"), key("XKX")],
            &FanoutSettings::default(),
        );

        let keys: Vec<_> = results.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["AUT", "SWE", "XKX"]);
        assert_eq!(results[0].1, Ok(9_000_000));
        assert!(results[2].1.is_err());
    }

    #[test]
    fn test_pending_lookups_time_out() {
        let source: Arc<dyn PopulationSource> = Arc::new(SlowFor {
            slow: [key("POL")].into_iter().collect(),
            delay: Duration::from_secs(2),
        });
        let settings = FanoutSettings {
            timeout: Duration::from_millis(300),
            jobs: 2,
            ..FanoutSettings::default()
        };

        let started = Instant::now();
        let results = fetch_all(source, &[key("POL"), key("PRT")], &settings);
        assert!(started.elapsed() < Duration::from_secs(2));

        let by_key: BTreeMap<_, _> = results.into_iter().collect();
        assert_eq!(by_key[&key("PRT")], Ok(1_000));
        assert_eq!(by_key[&key("POL")], Err(PopulationError::TimedOut));
    }

    #[test]
    fn test_empty_request() {
        let source: Arc<dyn PopulationSource> = Arc::new(StaticSource::new("static"));
        assert!(fetch_all(source, &[], &FanoutSettings::default()).is_empty());
    }

    #[test]
    fn test_unbounded_timeout_waits_for_every_result() {
        let source: Arc<dyn PopulationSource> = Arc::new(
            StaticSource::new("static")
                .with(key("EST"), 1_300_000)
                .with(key("LVA"), 1_900_000),
        );
        let settings = FanoutSettings {
            timeout: Duration::MAX,
            ..FanoutSettings::default()
        };

        let results = fetch_all(source, &[key("EST"), key("LVA")], &settings);
        assert_eq!(
            results,
            vec![(key("EST"), Ok(1_300_000)), (key("LVA"), Ok(1_900_000))]
        );
    }
}
