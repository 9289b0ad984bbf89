//! NIP-11 relay information document fetch for `info`. Rewrites the relay's
//! `ws(s)://` scheme to `http(s)://` and asks for `application/nostr+json`.

use serde::{Deserialize, Serialize};

use crate::error::CliError;

#[derive(Debug, Serialize, Deserialize)]
pub struct RelayInfo {
    pub name: Option<String>,
    pub description: Option<String>,
    pub pubkey: Option<String>,
    pub contact: Option<String>,
    #[serde(default, rename = "supported_nips")]
    pub supported_nips: Vec<u32>,
    pub software: Option<String>,
    pub version: Option<String>,
}

pub async fn fetch(relay_url: &str) -> Result<RelayInfo, CliError> {
    let url = to_http_url(relay_url)?;
    let client = reqwest::Client::new();
    let info = client
        .get(url)
        .header("Accept", "application/nostr+json")
        .send()
        .await?
        .error_for_status()?
        .json::<RelayInfo>()
        .await?;
    Ok(info)
}

fn to_http_url(relay_url: &str) -> Result<url::Url, CliError> {
    let mut url = url::Url::parse(relay_url).map_err(|e| CliError::InvalidUrl(e.to_string()))?;
    let scheme = match url.scheme() {
        "ws" => "http",
        "wss" => "https",
        other => other,
    };
    url.set_scheme(scheme)
        .map_err(|()| CliError::InvalidUrl(format!("cannot rewrite scheme of '{relay_url}'")))?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_wss_to_https() {
        let url = to_http_url("wss://relay.example/path").unwrap();
        assert_eq!(url.as_str(), "https://relay.example/path");
    }

    #[test]
    fn rewrites_ws_to_http() {
        let url = to_http_url("ws://relay.example").unwrap();
        assert_eq!(url.scheme(), "http");
    }
}
