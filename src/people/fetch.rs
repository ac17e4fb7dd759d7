use anyhow::{Context, Result};

use super::graph::SocialGraph;
use super::parse::parse_snapshot;

/// One-shot snapshot load from a local file or an http(s) endpoint.
pub fn load_snapshot(source: &str) -> Result<SocialGraph> {
    let raw = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_url(source)?
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read graph snapshot from {source}"))?
    };

    parse_snapshot(&raw).with_context(|| format!("failed to parse graph snapshot from {source}"))
}

fn fetch_url(url: &str) -> Result<String> {
    reqwest::blocking::get(url)
        .with_context(|| format!("failed to fetch graph snapshot from {url}"))?
        .error_for_status()
        .with_context(|| format!("graph snapshot endpoint {url} returned an error status"))?
        .text()
        .with_context(|| format!("failed to read graph snapshot body from {url}"))
}
