pub mod chat;
pub mod embedding;

use color_eyre::Result;
use reqwest::header::{HeaderMap, AUTHORIZATION};

pub fn auth_headers(api_key: &str) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	Ok(headers)
}
