use std::time::Duration;

mod libre;

pub use libre::LibreTranslator;

pub type LanguageCode = String;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text from source to target language
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError>;
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Translation timeout")]
    Timeout,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// One translation call with the run's per-call timeout.
///
/// Whitespace-only input short-circuits without touching the provider; there
/// is nothing to translate and nothing to render. No retries here; retry
/// policy belongs to the orchestrator.
pub async fn translate_with_timeout(
    translator: &dyn Translator,
    text: &str,
    from: &str,
    to: &str,
    timeout: Duration,
) -> Result<String, TranslateError> {
    if text.trim().is_empty() {
        return Ok(String::new());
    }

    match tokio::time::timeout(
        timeout,
        translator.translate(text, from.to_string(), to.to_string()),
    )
    .await
    {
        Ok(result) => result.map(|t| t.text),
        Err(_) => Err(TranslateError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SlowTranslator {
        delay: Duration,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Translator for SlowTranslator {
        async fn translate(
            &self,
            text: &str,
            from: LanguageCode,
            to: LanguageCode,
        ) -> Result<Translation, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(Translation {
                text: format!("{text}!"),
                from,
                to,
                provider: "test".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn empty_input_never_reaches_the_provider() {
        let translator = SlowTranslator {
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        };

        let out = translate_with_timeout(&translator, "   \n\t", "ja", "en", Duration::from_secs(1))
            .await
            .unwrap();

        assert!(out.is_empty());
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn slow_provider_maps_to_timeout() {
        let translator = SlowTranslator {
            delay: Duration::from_millis(200),
            calls: AtomicUsize::new(0),
        };

        let result =
            translate_with_timeout(&translator, "hello", "ja", "en", Duration::from_millis(10))
                .await;

        assert!(matches!(result, Err(TranslateError::Timeout)));
    }

    #[tokio::test]
    async fn fast_provider_returns_text() {
        let translator = SlowTranslator {
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        };

        let out = translate_with_timeout(&translator, "hello", "ja", "en", Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(out, "hello!");
    }
}
