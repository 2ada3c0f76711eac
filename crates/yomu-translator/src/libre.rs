use serde::Serialize;

use crate::{LanguageCode, TranslateError, Translation, Translator};

/// LibreTranslate-compatible HTTP provider.
#[derive(Clone)]
pub struct LibreTranslator {
    client: reqwest::Client,
    api_url: String,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

impl LibreTranslator {
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Translator for LibreTranslator {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        let request = TranslateRequest {
            q: text,
            source: &from,
            target: &to,
            format: "text",
        };

        let response = self
            .client
            .post(format!("{}/translate", self.api_url))
            .json(&request)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::ApiError(format!("Failed to parse response: {}", e)))?;

        let translated_text = json["translatedText"]
            .as_str()
            .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))?;

        Ok(Translation {
            text: translated_text.to_string(),
            from,
            to,
            provider: "libretranslate".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped_from_api_url() {
        let t = LibreTranslator::new("https://libretranslate.com/".to_string());
        assert_eq!(t.api_url, "https://libretranslate.com");
    }
}
