use anyhow::{anyhow, Result};
use reqwest::Url;

pub fn validate_country_code(value: &str) -> Result<()> {
    if value.len() != 2 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(anyhow!("country code '{}' must be two ASCII letters", value));
    }
    Ok(())
}

pub fn validate_upstream_url(value: &str) -> Result<Url> {
    let url = Url::parse(value.trim()).map_err(|err| anyhow!("invalid upstream_base_url: {}", err))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow!("upstream_base_url must be http or https"));
    }
    Ok(url)
}
