use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    domain::tts::{
        dto::{DEFAULT_LANG, DEFAULT_RESPONSE_TYPE},
        RateLimitedSynthesizer, SynthesizeRequest, SynthesizeResponse, TtsServiceApi,
    },
    error::{AppError, AppResult},
    infrastructure::http::RequestId,
};

pub struct TtsController {
    synthesizer: Arc<RateLimitedSynthesizer>,
    max_text_chars: usize,
}

/// Request after validation
#[derive(Debug, PartialEq)]
struct ValidatedRequest {
    text: String,
    lang: String,
}

impl TtsController {
    pub fn new(synthesizer: Arc<RateLimitedSynthesizer>, max_text_chars: usize) -> Self {
        Self {
            synthesizer,
            max_text_chars,
        }
    }

    /// POST /synthesize - Convert text to speech, returned as a base64 data URI
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        Extension(RequestId(request_id)): Extension<RequestId>,
        payload: Result<Json<SynthesizeRequest>, JsonRejection>,
    ) -> AppResult<Json<SynthesizeResponse>> {
        let Json(request) = payload.map_err(|rejection| AppError::InvalidJson(rejection.body_text()))?;
        let request = controller.validate(request)?;

        tracing::info!(
            request_id = %request_id,
            lang = %request.lang,
            text_length = request.text.len(),
            "TTS synthesis request"
        );

        let audio = controller
            .synthesizer
            .synthesize(&request.text, &request.lang)
            .await
            .map_err(|e| {
                tracing::error!(
                    request_id = %request_id,
                    error = %e,
                    lang = %request.lang,
                    text_length = request.text.len(),
                    attempts = e.attempts,
                    "TTS synthesis failed"
                );
                AppError::from(e)
            })?;

        Ok(Json(SynthesizeResponse {
            audio_base64: audio.to_data_uri(),
        }))
    }

    fn validate(&self, request: SynthesizeRequest) -> AppResult<ValidatedRequest> {
        let text = match request.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(AppError::BadRequest("Text parameter is required".to_string())),
        };

        let response_type = request
            .response_type
            .unwrap_or_else(|| DEFAULT_RESPONSE_TYPE.to_string());
        if response_type != DEFAULT_RESPONSE_TYPE {
            return Err(AppError::UnsupportedResponseType(response_type));
        }

        if text.chars().count() > self.max_text_chars {
            return Err(AppError::PayloadTooLarge(format!(
                "Text must be {} characters or less",
                self.max_text_chars
            )));
        }

        let lang = request
            .lang
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Ok(ValidatedRequest { text, lang })
    }
}
