//! HTTP utilities for the Premier League pulse API

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};

pub const PULSE_BASE_URL: &str = "https://footballapi.pulselive.com/football";

const SITE: &str = "https://www.premierleague.com";
const AGENT: &str = concat!("epl-analytics/", env!("CARGO_PKG_VERSION"));

/// Headers the pulse API expects from browser clients.
///
/// Requests without a premierleague.com origin are rejected.
pub fn pulse_header_map() -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static("application/json"));
    h.insert(ORIGIN, HeaderValue::from_static(SITE));
    h.insert(REFERER, HeaderValue::from_static("https://www.premierleague.com/"));
    h.insert(USER_AGENT, HeaderValue::from_static(AGENT));
    h
}
