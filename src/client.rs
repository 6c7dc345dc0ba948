//! Blocking client for the public superhero API.
//!
//! Every request goes through [`SuperHeroClient::get_json`], which applies the retry policy and
//! folds the HTTP status into a [`FetchOutcome`].  Callers never see transport errors as `Err`;
//! they match on the outcome and decide whether to skip or continue.

use std::thread;
use std::time::Duration;

use log::{debug, error, warn, Level};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::logging::{LogConfig, CLIENT_TARGET};
use crate::model::{ApiBiography, ApiHero, HeroRecord};

/// Base URL of the public superhero API.
pub const DEFAULT_BASE_URL: &str = "https://akabab.github.io/superhero-api/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that make a single lookup fail permanently.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{route} returned status {status}")]
    Status { status: u16, route: String },

    #[error("Failed to decode response from {route}: {source}")]
    Decode {
        route: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result of a single lookup against the data source.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// The resource exists and was decoded.
    Found(T),
    /// The identifier does not exist upstream.
    NotFound,
    /// The retry budget ran out on gateway errors or connection failures.
    TransientFailure {
        status: Option<u16>,
        attempts: u32,
    },
    /// A non-retryable failure.
    PermanentFailure(FetchError),
}

impl<T> FetchOutcome<T> {
    /// Maps the found value, leaving the other outcomes untouched.
    pub fn map<U, F>(self, f: F) -> FetchOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            FetchOutcome::Found(value) => FetchOutcome::Found(f(value)),
            FetchOutcome::NotFound => FetchOutcome::NotFound,
            FetchOutcome::TransientFailure { status, attempts } => {
                FetchOutcome::TransientFailure { status, attempts }
            }
            FetchOutcome::PermanentFailure(err) => FetchOutcome::PermanentFailure(err),
        }
    }
}

/// The two lookups the fetch loop needs from a data source.
pub trait HeroSource {
    /// Looks up the lightweight biography for `id`.
    fn biography(&self, id: u32) -> FetchOutcome<ApiBiography>;

    /// Looks up the full record for `id`.
    fn hero(&self, id: u32) -> FetchOutcome<HeroRecord>;
}

/// Retry settings applied to gateway errors and connection failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and base backoff.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Returns the total number of attempts per request.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the given retry (1-based): `backoff * 2^(retry - 1)`.
    pub fn delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.backoff * (1u32 << exponent)
    }
}

/// How a response status is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    NotFound,
    Retryable,
    Failure,
    /// Anything else, treated as an absent resource.
    Absent,
}

/// Classifies a response status.
pub fn classify_status(status: StatusCode) -> StatusClass {
    match status.as_u16() {
        200 => StatusClass::Success,
        404 => StatusClass::NotFound,
        502 | 503 | 504 => StatusClass::Retryable,
        code if code >= 400 => StatusClass::Failure,
        _ => StatusClass::Absent,
    }
}

/// Blocking client for the superhero API.
#[derive(Clone)]
pub struct SuperHeroClient {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
    log: LogConfig,
}

impl SuperHeroClient {
    /// Builds a client against [`DEFAULT_BASE_URL`].
    pub fn new(log: LogConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            log,
        })
    }

    /// Points the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replaces the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the API root the client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the biography of a hero.
    pub fn get_biography(&self, hero_id: u32) -> FetchOutcome<ApiBiography> {
        self.get_json(&format!("/biography/{hero_id}.json"))
    }

    /// Fetches every section of a hero.
    pub fn get_super_hero(&self, hero_id: u32) -> FetchOutcome<ApiHero> {
        self.get_json(&format!("/id/{hero_id}.json"))
    }

    /// Sends a GET request for `route` and decodes the JSON body.
    pub fn get_json<T: DeserializeOwned>(&self, route: &str) -> FetchOutcome<T> {
        let url = format!("{}{}", self.base_url, route);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let can_retry = attempt < self.retry.max_attempts();

            let response = match self.http.get(&url).send() {
                Ok(response) => response,
                Err(err) if err.is_connect() || err.is_timeout() => {
                    if can_retry {
                        self.back_off(route, attempt, &err.to_string());
                        continue;
                    }
                    error!(target: CLIENT_TARGET, "Giving up on {route}: {err}");
                    return FetchOutcome::TransientFailure {
                        status: None,
                        attempts: attempt,
                    };
                }
                Err(err) => return FetchOutcome::PermanentFailure(FetchError::Http(err)),
            };

            let status = response.status();
            match classify_status(status) {
                StatusClass::Success => {
                    let body = match response.text() {
                        Ok(body) => body,
                        Err(err) => return FetchOutcome::PermanentFailure(FetchError::Http(err)),
                    };
                    if self.log.enabled(Level::Debug) {
                        debug!(target: CLIENT_TARGET, "Response: {body}");
                    }
                    return match serde_json::from_str(&body) {
                        Ok(value) => FetchOutcome::Found(value),
                        Err(source) => FetchOutcome::PermanentFailure(FetchError::Decode {
                            route: route.to_string(),
                            source,
                        }),
                    };
                }
                StatusClass::NotFound => {
                    if self.log.enabled(Level::Debug) {
                        debug!(target: CLIENT_TARGET, "{route} not found!");
                    }
                    return FetchOutcome::NotFound;
                }
                StatusClass::Retryable if can_retry => {
                    self.back_off(route, attempt, &format!("status {}", status.as_u16()));
                }
                StatusClass::Retryable => {
                    error!(target: CLIENT_TARGET, "Received a {} error!", status.as_u16());
                    return FetchOutcome::TransientFailure {
                        status: Some(status.as_u16()),
                        attempts: attempt,
                    };
                }
                StatusClass::Failure => {
                    error!(target: CLIENT_TARGET, "Received a {} error!", status.as_u16());
                    if self.log.enabled(Level::Debug) {
                        if let Ok(details) = response.text() {
                            debug!(target: CLIENT_TARGET, "Details: {details}");
                        }
                    }
                    return FetchOutcome::PermanentFailure(FetchError::Status {
                        status: status.as_u16(),
                        route: route.to_string(),
                    });
                }
                StatusClass::Absent => return FetchOutcome::NotFound,
            }
        }
    }

    fn back_off(&self, route: &str, attempt: u32, reason: &str) {
        let delay = self.retry.delay(attempt);
        warn!(
            target: CLIENT_TARGET,
            "Request to {route} failed ({reason}), retrying after {}ms...",
            delay.as_millis()
        );
        thread::sleep(delay);
    }
}

impl HeroSource for SuperHeroClient {
    fn biography(&self, id: u32) -> FetchOutcome<ApiBiography> {
        self.get_biography(id)
    }

    fn hero(&self, id: u32) -> FetchOutcome<HeroRecord> {
        self.get_super_hero(id).map(HeroRecord::from_api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Serves `responses` in order, one connection each, and returns how many requests it
    /// answered once the list is exhausted.
    fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<usize>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));

        let handle = thread::spawn(move || {
            let mut answered = 0;
            for (status, body) in responses {
                let (stream, _) = listener.accept().expect("accept request");
                let mut reader = BufReader::new(stream);
                let mut line = String::new();
                loop {
                    line.clear();
                    let read = reader.read_line(&mut line).expect("read request");
                    if read == 0 || line == "\r\n" {
                        break;
                    }
                }

                let reason = StatusCode::from_u16(status)
                    .ok()
                    .and_then(|code| code.canonical_reason())
                    .unwrap_or("Unknown");
                let mut stream = reader.into_inner();
                write!(
                    stream,
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                )
                .expect("write response");
                stream.flush().expect("flush response");
                answered += 1;
            }
            answered
        });

        (base_url, handle)
    }

    fn client_for(base_url: &str) -> SuperHeroClient {
        SuperHeroClient::new(LogConfig::default())
            .expect("client builds")
            .with_base_url(base_url)
            .with_retry_policy(RetryPolicy::new(5, Duration::ZERO))
    }

    #[test]
    fn gateway_errors_exhaust_the_retry_budget() {
        let (base_url, server) = serve(vec![(503, ""); 5]);
        let outcome = client_for(&base_url).get_biography(1);

        match outcome {
            FetchOutcome::TransientFailure { status, attempts } => {
                assert_eq!(status, Some(503));
                assert_eq!(attempts, 5);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(server.join().expect("server thread"), 5);
    }

    #[test]
    fn gateway_error_then_success_is_retried() {
        let (base_url, server) = serve(vec![
            (502, ""),
            (504, ""),
            (200, r#"{"fullName": "Bruce Wayne", "publisher": "DC Comics"}"#),
        ]);

        match client_for(&base_url).get_biography(70) {
            FetchOutcome::Found(biography) => {
                assert_eq!(biography.full_name, "Bruce Wayne");
                assert_eq!(biography.publisher.as_deref(), Some("DC Comics"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(server.join().expect("server thread"), 3);
    }

    #[test]
    fn server_error_is_not_retried() {
        let (base_url, server) = serve(vec![(500, "boom")]);

        match client_for(&base_url).get_biography(1) {
            FetchOutcome::PermanentFailure(FetchError::Status { status, route }) => {
                assert_eq!(status, 500);
                assert_eq!(route, "/biography/1.json");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(server.join().expect("server thread"), 1);
    }

    #[test]
    fn missing_hero_is_not_found() {
        let (base_url, server) = serve(vec![(404, "")]);

        assert!(matches!(
            client_for(&base_url).get_super_hero(9999),
            FetchOutcome::NotFound
        ));
        assert_eq!(server.join().expect("server thread"), 1);
    }

    #[test]
    fn malformed_body_is_a_decode_failure() {
        let (base_url, server) = serve(vec![(200, "not json")]);

        assert!(matches!(
            client_for(&base_url).get_biography(1),
            FetchOutcome::PermanentFailure(FetchError::Decode { .. })
        ));
        assert_eq!(server.join().expect("server thread"), 1);
    }

    #[test]
    fn classifies_statuses() {
        assert_eq!(classify_status(StatusCode::OK), StatusClass::Success);
        assert_eq!(classify_status(StatusCode::NOT_FOUND), StatusClass::NotFound);
        assert_eq!(classify_status(StatusCode::BAD_GATEWAY), StatusClass::Retryable);
        assert_eq!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE),
            StatusClass::Retryable
        );
        assert_eq!(
            classify_status(StatusCode::GATEWAY_TIMEOUT),
            StatusClass::Retryable
        );
        assert_eq!(classify_status(StatusCode::FORBIDDEN), StatusClass::Failure);
        assert_eq!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR),
            StatusClass::Failure
        );
        assert_eq!(classify_status(StatusCode::NO_CONTENT), StatusClass::Absent);
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.delay(1), Duration::from_secs(1));
        assert_eq!(policy.delay(2), Duration::from_secs(2));
        assert_eq!(policy.delay(4), Duration::from_secs(8));
    }

    #[test]
    fn retry_policy_allows_at_least_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[test]
    fn map_preserves_failures() {
        let outcome: FetchOutcome<u32> = FetchOutcome::TransientFailure {
            status: Some(503),
            attempts: 5,
        };
        match outcome.map(|value| value + 1) {
            FetchOutcome::TransientFailure { status, attempts } => {
                assert_eq!(status, Some(503));
                assert_eq!(attempts, 5);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert!(matches!(
            FetchOutcome::Found(41).map(|value| value + 1),
            FetchOutcome::Found(42)
        ));
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = SuperHeroClient::new(LogConfig::default())
            .expect("client builds")
            .with_base_url("http://localhost:8080/api/");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }
}
