use std::sync::Arc;

use crate::{
    error::AppResult,
    models::Language,
    services::providers::LanguageModel,
};

/// Near-deterministic sampling for translations
pub const TRANSLATION_TEMPERATURE: f32 = 0.1;

const PREAMBLE_MARKER: &str = "Here's the translation";

#[derive(Clone)]
pub struct Translator {
    model: Arc<dyn LanguageModel>,
}

impl Translator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Translates `text` into `language`, keeping its layout.
    ///
    /// Unsupported languages are rejected before the model is called.
    pub async fn translate(&self, text: &str, language: &str) -> AppResult<String> {
        let language: Language = language.parse()?;

        let prompt = format!(
            "Translate the following text to {}. Return ONLY the translated text with the same \
             formatting and structure, no introduction:\n\n{}",
            language, text
        );

        tracing::info!(
            language = %language,
            text_chars = text.chars().count(),
            provider = self.model.name(),
            "Translating text"
        );

        let response = self.model.generate(&prompt, TRANSLATION_TEMPERATURE).await?;
        Ok(strip_preamble(&response))
    }
}

/// Drops a leading "Here's the translation ...:" framing if the model added one.
///
/// Best effort: everything up to the marker and through the next colon is
/// removed. Text without the marker is returned unchanged.
pub fn strip_preamble(response: &str) -> String {
    match response.split_once(PREAMBLE_MARKER) {
        Some((_, after)) => after
            .split_once(':')
            .map_or(after, |(_, rest)| rest)
            .trim()
            .to_string(),
        None => response.to_string(),
    }
}
