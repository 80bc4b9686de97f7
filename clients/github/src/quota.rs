use collector::api::QuotaState;
use log::debug;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Keeps the quota announced by the `x-ratelimit-*` headers of the latest response.
#[derive(Clone, Default)]
pub struct QuotaTracker {
    quota: Arc<Mutex<Option<QuotaState>>>,
}

impl QuotaTracker {
    pub async fn last_observed(&self) -> Option<QuotaState> {
        *self.quota.lock().await
    }

    pub(crate) async fn observe(&self, headers: &HeaderMap<HeaderValue>) {
        let limit = read_header::<u32>(headers, "x-ratelimit-limit");
        let remaining = read_header::<u32>(headers, "x-ratelimit-remaining");
        let reset = read_header::<i64>(headers, "x-ratelimit-reset");
        if let (Some(limit), Some(remaining), Some(reset)) = (limit, remaining, reset) {
            let quota = QuotaState::new(limit, remaining, reset);
            debug!("Updated limits: {:?}", quota);
            *self.quota.lock().await = Some(quota);
        }
    }
}

fn read_header<T: FromStr>(headers: &HeaderMap<HeaderValue>, header: &str) -> Option<T> {
    headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<T>().ok())
}

#[tokio::test]
async fn observe_headers_test() -> anyhow::Result<()> {
    let tracker = QuotaTracker::default();
    assert_eq!(tracker.last_observed().await, None);

    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", HeaderValue::from_str("5000")?);
    headers.insert("x-ratelimit-remaining", HeaderValue::from_str("4999")?);
    headers.insert("x-ratelimit-reset", HeaderValue::from_str("1700000000")?);
    tracker.observe(&headers).await;
    assert_eq!(tracker.last_observed().await, Some(QuotaState::new(5000, 4999, 1700000000)));

    let mut partial = HeaderMap::new();
    partial.insert("x-ratelimit-remaining", HeaderValue::from_str("12")?);
    tracker.observe(&partial).await;
    assert_eq!(
        tracker.last_observed().await.map(|quota| quota.remaining),
        Some(4999),
        "Incomplete headers should leave the last quota untouched"
    );

    Ok(())
}
