//! Best-effort retrieval of live data, with a static fallback.
use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The default timeout for fetching a data set
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// The ways in which fetching a data set can fail
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The request could not be sent or the response could not be read
    #[error("network error: {0}")]
    Network(String),
    /// The server responded with an unsuccessful status code
    #[error("server responded with status {0}")]
    NonSuccessStatus(u16),
    /// No response arrived within the time limit
    #[error("request timed out")]
    Timeout,
    /// The response did not contain a valid data set
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Something which can retrieve the body of a document given its URL
pub trait Fetcher {
    /// Fetch the document at `url`, returning the response body
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches documents over HTTP(S), giving up after a fixed timeout
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a new [`HttpFetcher`] with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))?;

        Ok(Self { client })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::NonSuccessStatus(status.as_u16()));
        }

        Ok(response.text()?)
    }
}

/// Fetch the document at `url` and parse it as JSON
pub fn fetch_json<T, F>(fetcher: &F, url: &str) -> Result<T, FetchError>
where
    T: DeserializeOwned,
    F: Fetcher + ?Sized,
{
    let body = fetcher.fetch(url)?;
    serde_json::from_str(&body).map_err(|err| FetchError::MalformedPayload(err.to_string()))
}

/// Where a data set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Retrieved from a live endpoint
    Live,
    /// Substituted from built-in values
    Fallback,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// A data set along with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    /// The data itself
    pub data: T,
    /// Whether the data is live or a fallback
    pub source: DataSource,
}

/// Use the fetched data if the fetch succeeded, otherwise substitute the fallback.
///
/// Every kind of [`FetchError`] is handled the same way. `fetched` is `None` when no fetch was
/// attempted (e.g. when running offline).
///
/// # Arguments
///
/// * `name` - Name of the data set (for log messages)
/// * `fetched` - The result of trying to fetch the data, if a fetch was attempted
/// * `fallback` - Produces the built-in data
pub fn load_or_fallback<T>(
    name: &str,
    fetched: Option<Result<T, FetchError>>,
    fallback: impl FnOnce() -> T,
) -> Sourced<T> {
    match fetched {
        Some(Ok(data)) => {
            info!("Using live data for {name}");
            Sourced {
                data,
                source: DataSource::Live,
            }
        }
        Some(Err(err)) => {
            info!("Could not fetch {name} ({err}): using built-in data");
            Sourced {
                data: fallback(),
                source: DataSource::Fallback,
            }
        }
        None => Sourced {
            data: fallback(),
            source: DataSource::Fallback,
        },
    }
}
