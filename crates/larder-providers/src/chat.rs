use std::time::Duration;

use color_eyre::{eyre, Result};
use reqwest::Client;
use serde_json::Value;

/// Chat completion constrained to a JSON reply. The content may legitimately
/// be a bare array (alias generation) or an object (substitutions, recipe
/// parsing), so any JSON value is accepted.
pub async fn complete(cfg: &larder_config::ChatProviderConfig, messages: &[Value]) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);

	for _ in 0..3 {
		let body = serde_json::json!({
			"model": cfg.model,
			"temperature": cfg.temperature,
			"messages": messages,
		});
		let res = client
			.post(&url)
			.headers(crate::auth_headers(&cfg.api_key)?)
			.json(&body)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;
		if let Ok(parsed) = parse_chat_json(json) {
			return Ok(parsed);
		}
	}

	Err(eyre::eyre!("Chat response is not valid JSON."))
}

fn parse_chat_json(json: Value) -> Result<Value> {
	if let Some(content) = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
	{
		let parsed: Value = serde_json::from_str(content)
			.map_err(|_| eyre::eyre!("Chat content is not valid JSON."))?;

		return Ok(parsed);
	}

	if json.is_object() {
		return Ok(json);
	}

	Err(eyre::eyre!("Chat response is missing JSON content."))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_object_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "{\"substitutes\": []}" } }
			]
		});
		let parsed = parse_chat_json(json).expect("parse failed");
		assert!(parsed.get("substitutes").is_some());
	}

	#[test]
	fn parses_bare_array_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "[\"tomatoes\", \"roma tomato\"]" } }
			]
		});
		let parsed = parse_chat_json(json).expect("parse failed");
		assert_eq!(parsed.as_array().map(Vec::len), Some(2));
	}

	#[test]
	fn rejects_prose_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "Sure! Here are some ideas." } }
			]
		});
		assert!(parse_chat_json(json).is_err());
	}
}
