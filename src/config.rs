use std::{env, time::Duration};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOAD_WAIT: Duration = Duration::from_millis(2000);
pub const DEFAULT_CATALOG_URL: &str =
    "https://servicodados.ibge.gov.br/api/v3/agregados?periodo=P5[202001]";
/// SIDRA table 1419 (IPCA), every period and category, restricted to ten groups.
pub const DEFAULT_INDEX_URL: &str = "https://apisidra.ibge.gov.br/values/t/1419/n1/all/v/all/p/all/c315/7169,7170,7445,7486,7558,7625,7660,7712,7766,7786";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub catalog_url: String,
    pub index_url: String,
    pub fetch_timeout: Option<Duration>,
    /// How long a page request waits for its view's load before rendering the loading state.
    pub load_wait: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let fetch_timeout = lookup("FETCH_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let load_wait = lookup("LOAD_WAIT_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_LOAD_WAIT);

        Self {
            port,
            catalog_url: lookup("CATALOG_URL").unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
            index_url: lookup("INDEX_URL").unwrap_or_else(|| DEFAULT_INDEX_URL.to_string()),
            fetch_timeout,
            load_wait,
        }
    }
}
