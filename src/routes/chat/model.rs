use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Tried in order until one answers; not every deployment region serves the
/// same model set, so 404s are expected.
pub const MODEL_FALLBACK: &[&str] = &[
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "gemini-pro",
    "gemini-flash-latest",
    "gemini-pro-latest",
];

const SYSTEM_PREAMBLE: &str = "أنت مساعد مكتبة راوي الإلكترونية. أجب عن أسئلة القراء حول الكتب \
والقراءة والتوصيات الأدبية باللغة العربية وبإيجاز. إذا سُئلت عن شيء خارج عالم الكتب فاعتذر بلطف.";

pub const EMPTY_REPLY_FALLBACK: &str = "عذراً، لم أستطع فهم ذلك.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn build_request(message: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: format!("{}\n\n{}", SYSTEM_PREAMBLE, message),
            }],
        }],
    }
}

fn extract_reply(response: GenerateResponse) -> Option<String> {
    response
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()
        .map(|p| p.text)
}

/// Outcome of one relay attempt across the whole fallback list.
#[derive(Debug)]
pub enum RelayOutcome {
    Reply(String),
    RateLimited,
    Failed(String),
}

/// Walks the model list in order: first success wins, 429 is surfaced to the
/// caller as-is, anything else is remembered and the next model is tried.
/// No backoff, no circuit breaker.
pub async fn relay(http: &reqwest::Client, api_key: &str, message: &str) -> RelayOutcome {
    let body = build_request(message);
    let mut last_error = String::new();

    for model in MODEL_FALLBACK {
        let url = format!("{}/{}:generateContent?key={}", GEMINI_API_BASE, model, api_key);

        let response = match http.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Request to {} failed: {}", model, e);
                last_error = e.to_string();
                continue;
            }
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return RelayOutcome::RateLimited;
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if status == StatusCode::NOT_FOUND {
                tracing::warn!("Model {} not found, trying next", model);
            } else {
                tracing::warn!("Model {} returned {}: {}", model, status, text);
            }
            last_error = text;
            continue;
        }

        match response.json::<GenerateResponse>().await {
            Ok(parsed) => {
                let reply =
                    extract_reply(parsed).unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string());
                tracing::debug!("Model {} answered", model);
                return RelayOutcome::Reply(reply);
            }
            Err(e) => {
                tracing::warn!("Failed to parse response from {}: {}", model, e);
                last_error = e.to_string();
            }
        }
    }

    RelayOutcome::Failed(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_embeds_preamble_and_message() {
        let request = build_request("ما أفضل رواية عربية؟");
        let text = &request.contents[0].parts[0].text;
        assert!(text.starts_with(SYSTEM_PREAMBLE));
        assert!(text.ends_with("ما أفضل رواية عربية؟"));
    }

    #[test]
    fn fallback_list_starts_with_flash() {
        assert_eq!(MODEL_FALLBACK[0], "gemini-1.5-flash");
        assert_eq!(MODEL_FALLBACK.len(), 5);
    }

    #[test]
    fn reply_is_extracted_from_first_candidate() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "أهلاً بك"}, {"text": "تابع"}]}},
                {"content": {"parts": [{"text": "آخر"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(extract_reply(response).as_deref(), Some("أهلاً بك"));
    }

    #[test]
    fn missing_candidates_yield_none() {
        let empty: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(extract_reply(empty).is_none());

        let no_content: GenerateResponse =
            serde_json::from_value(serde_json::json!({"candidates": [{}]})).unwrap();
        assert!(extract_reply(no_content).is_none());
    }
}
