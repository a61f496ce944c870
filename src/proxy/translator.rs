// Request/Response translator between OpenAI and NIM chat completion formats

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_TEMPERATURE: f64 = 0.6;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_STREAM: bool = false;

const THINK_OPEN: &str = "<think>\n";
const THINK_CLOSE: &str = "\n</think>\n\n";

/// Start-time switches that change how requests and responses are shaped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationOptions {
    /// Prepend upstream `reasoning_content` to the visible answer
    pub show_reasoning: bool,
    /// Ask the upstream chat template to emit reasoning
    pub enable_thinking_mode: bool,
}

/// OpenAI chat completion request as sent by the client.
///
/// Every field is carried as raw JSON and forwarded without validation.
/// Explicit nulls behave like absent fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionRequest {
    #[serde(default)]
    pub model: Option<Value>,
    #[serde(default)]
    pub messages: Option<Value>,
    #[serde(default)]
    pub temperature: Option<Value>,
    #[serde(default)]
    pub max_tokens: Option<Value>,
    #[serde(default)]
    pub stream: Option<Value>,
}

impl ChatCompletionRequest {
    /// The requested alias, when `model` is a string
    pub fn alias(&self) -> Option<&str> {
        self.model.as_ref().and_then(Value::as_str)
    }
}

/// Body posted to `{NIM_API_BASE}/chat/completions`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NimChatRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Value>,
    pub temperature: Value,
    pub max_tokens: Value,
    pub stream: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_body: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NimChatResponse {
    pub choices: Vec<NimChoice>,
    #[serde(default)]
    pub usage: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NimChoice {
    pub message: NimMessage,
    #[serde(default)]
    pub finish_reason: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NimMessage {
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub reasoning_content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: &'static str,
    pub created: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<Value>,
    pub choices: Vec<ChatChoice>,
    pub usage: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatChoice {
    pub index: usize,
    pub message: AssistantMessage,
    pub finish_reason: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantMessage {
    pub role: &'static str,
    pub content: Value,
}

/// Translate a client request into the NIM payload
pub fn openai_to_nim_request(
    request: &ChatCompletionRequest,
    nim_model: &str,
    options: TranslationOptions,
) -> NimChatRequest {
    NimChatRequest {
        model: nim_model.to_string(),
        messages: request.messages.clone(),
        temperature: request.temperature.clone().unwrap_or_else(|| json!(DEFAULT_TEMPERATURE)),
        max_tokens: request.max_tokens.clone().unwrap_or_else(|| json!(DEFAULT_MAX_TOKENS)),
        stream: request.stream.clone().unwrap_or_else(|| json!(DEFAULT_STREAM)),
        extra_body: options.enable_thinking_mode.then(thinking_extra_body),
    }
}

fn thinking_extra_body() -> Value {
    json!({
        "chat_template_kwargs": {
            "thinking": true
        }
    })
}

/// Translate a NIM response back into an OpenAI chat completion.
/// `model` is the value the client sent, not the NIM identifier.
pub fn nim_to_openai_response(
    response: NimChatResponse,
    model: Option<Value>,
    options: TranslationOptions,
    now: DateTime<Utc>,
) -> ChatCompletionResponse {
    let choices = response
        .choices
        .into_iter()
        .enumerate()
        .map(|(index, choice)| ChatChoice {
            index,
            message: AssistantMessage {
                role: "assistant",
                content: visible_content(choice.message, options.show_reasoning),
            },
            finish_reason: choice.finish_reason,
        })
        .collect();

    ChatCompletionResponse {
        id: format!("chatcmpl-{}", now.timestamp_millis()),
        object: "chat.completion",
        created: now.timestamp(),
        model,
        choices,
        usage: response.usage.unwrap_or_else(|| json!({})),
    }
}

/// Content shown to the client. Reasoning is wrapped in `<think>` markers and
/// put in front of the answer only when enabled and non-empty. A non-string
/// answer is rendered as its JSON text (`null` stays `null`).
pub fn visible_content(message: NimMessage, show_reasoning: bool) -> Value {
    match message.reasoning_content {
        Some(reasoning) if show_reasoning && !reasoning.is_empty() => {
            let answer = match message.content {
                Value::String(text) => text,
                other => other.to_string(),
            };
            Value::String(format!("{THINK_OPEN}{reasoning}{THINK_CLOSE}{answer}"))
        }
        _ => message.content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(body: Value) -> ChatCompletionRequest {
        serde_json::from_value(body).unwrap()
    }

    fn message(content: Value, reasoning: Option<&str>) -> NimMessage {
        NimMessage {
            content,
            reasoning_content: reasoning.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults_when_absent() {
        let req = request(json!({"model": "gpt-4", "messages": []}));
        let nim = openai_to_nim_request(&req, "qwen/qwen3-coder-480b-a35b-instruct", TranslationOptions::default());

        assert_eq!(nim.temperature, json!(0.6));
        assert_eq!(nim.max_tokens, json!(2048));
        assert_eq!(nim.stream, json!(false));
        assert!(nim.extra_body.is_none());
    }

    #[test]
    fn test_defaults_when_null() {
        let req = request(json!({
            "model": "gpt-4",
            "messages": [],
            "temperature": null,
            "max_tokens": null,
            "stream": null
        }));
        let nim = openai_to_nim_request(&req, "x", TranslationOptions::default());

        assert_eq!(nim.temperature, json!(0.6));
        assert_eq!(nim.max_tokens, json!(2048));
        assert_eq!(nim.stream, json!(false));
    }

    #[test]
    fn test_zero_values_are_kept() {
        let req = request(json!({"messages": [], "temperature": 0, "max_tokens": 0, "stream": true}));
        let nim = openai_to_nim_request(&req, "x", TranslationOptions::default());

        assert_eq!(nim.temperature, json!(0));
        assert_eq!(nim.max_tokens, json!(0));
        assert_eq!(nim.stream, json!(true));

        let body = serde_json::to_value(&nim).unwrap();
        assert_eq!(body["temperature"], json!(0));
        assert_eq!(body["max_tokens"], json!(0));
    }

    #[test]
    fn test_numeric_values_forwarded_as_sent() {
        let req = request(json!({"messages": [], "temperature": 1, "max_tokens": 512.0}));
        let body = serde_json::to_value(openai_to_nim_request(&req, "x", TranslationOptions::default())).unwrap();

        assert_eq!(body["temperature"], json!(1));
        assert_eq!(body["max_tokens"], json!(512.0));
    }

    #[test]
    fn test_non_string_model_has_no_alias() {
        let req = request(json!({"model": 42, "messages": []}));
        assert_eq!(req.alias(), None);
        assert_eq!(req.model, Some(json!(42)));

        let req = request(json!({"model": "gpt-4"}));
        assert_eq!(req.alias(), Some("gpt-4"));
    }

    #[test]
    fn test_messages_pass_through_untouched() {
        let messages = json!([
            {"role": "system", "content": "be brief"},
            {"role": "user", "content": [{"type": "text", "text": "hi"}]},
            {"role": "assistant", "content": "hello", "name": "bot"}
        ]);
        let req = request(json!({"model": "gpt-4o", "messages": messages.clone()}));
        let nim = openai_to_nim_request(&req, "deepseek-ai/deepseek-v3.1", TranslationOptions::default());

        assert_eq!(nim.messages, Some(messages));
    }

    #[test]
    fn test_missing_messages_are_omitted() {
        let req = request(json!({"model": "gpt-4"}));
        let nim = openai_to_nim_request(&req, "x", TranslationOptions::default());
        let body = serde_json::to_value(&nim).unwrap();

        assert!(body.get("messages").is_none());
        assert!(body.get("extra_body").is_none());
    }

    #[test]
    fn test_thinking_mode_adds_extra_body() {
        let options = TranslationOptions {
            enable_thinking_mode: true,
            ..Default::default()
        };
        let req = request(json!({"model": "gemini-pro", "messages": []}));
        let body = serde_json::to_value(openai_to_nim_request(&req, "x", options)).unwrap();

        assert_eq!(
            body["extra_body"],
            json!({"chat_template_kwargs": {"thinking": true}})
        );
    }

    #[test]
    fn test_reasoning_hidden_when_disabled() {
        let msg = message(json!("42"), Some("let me think"));
        assert_eq!(visible_content(msg, false), json!("42"));
    }

    #[test]
    fn test_reasoning_wrapped_when_enabled() {
        let msg = message(json!("42"), Some("6 * 7"));
        assert_eq!(
            visible_content(msg, true),
            json!("<think>\n6 * 7\n</think>\n\n42")
        );
    }

    #[test]
    fn test_empty_reasoning_not_wrapped() {
        let msg = message(json!("42"), Some(""));
        assert_eq!(visible_content(msg, true), json!("42"));

        let msg = message(json!("42"), None);
        assert_eq!(visible_content(msg, true), json!("42"));
    }

    #[test]
    fn test_null_content_passes_through() {
        let msg = message(Value::Null, None);
        assert_eq!(visible_content(msg, false), Value::Null);
    }

    #[test]
    fn test_null_content_rendered_after_reasoning() {
        let msg = message(Value::Null, Some("calling a tool"));
        assert_eq!(
            visible_content(msg, true),
            json!("<think>\ncalling a tool\n</think>\n\nnull")
        );
    }

    #[test]
    fn test_response_reshape() {
        let upstream: NimChatResponse = serde_json::from_value(json!({
            "id": "nim-123",
            "model": "qwen/qwen3-coder-480b-a35b-instruct",
            "choices": [
                {"index": 7, "message": {"role": "assistant", "content": "first"}, "finish_reason": "stop"},
                {"message": {"content": "second", "reasoning_content": "hmm"}, "finish_reason": "length"}
            ],
            "usage": {"prompt_tokens": 3, "completion_tokens": 5, "total_tokens": 8}
        }))
        .unwrap();
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

        let resp = nim_to_openai_response(upstream, Some(json!("gpt-4")), TranslationOptions::default(), now);
        let body = serde_json::to_value(&resp).unwrap();

        assert_eq!(body["id"], "chatcmpl-1700000000123");
        assert_eq!(body["object"], "chat.completion");
        assert_eq!(body["created"], 1_700_000_000);
        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["choices"][0]["index"], 0);
        assert_eq!(body["choices"][0]["message"], json!({"role": "assistant", "content": "first"}));
        assert_eq!(body["choices"][0]["finish_reason"], "stop");
        assert_eq!(body["choices"][1]["index"], 1);
        assert_eq!(body["choices"][1]["message"]["content"], "second");
        assert_eq!(body["choices"][1]["finish_reason"], "length");
        assert_eq!(body["usage"]["total_tokens"], 8);
    }

    #[test]
    fn test_missing_usage_becomes_empty_object() {
        let upstream: NimChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "ok"}}],
            "usage": null
        }))
        .unwrap();

        let resp = nim_to_openai_response(upstream, None, TranslationOptions::default(), Utc::now());
        let body = serde_json::to_value(&resp).unwrap();

        assert_eq!(body["usage"], json!({}));
        assert!(body.get("model").is_none());
        assert_eq!(body["choices"][0]["finish_reason"], Value::Null);
    }

    #[test]
    fn test_missing_choices_is_rejected() {
        let parsed = serde_json::from_value::<NimChatResponse>(json!({"usage": {}}));
        assert!(parsed.is_err());
    }
}
