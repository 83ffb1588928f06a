//! Upstream language-model calls and prompt dispatch.
//!
//! The proxy owns all prompt construction; clients only name an action.
//! Provider responses are reduced to a single content string, with any
//! upstream failure collapsed to a short error message suitable for the
//! `{ "error": .. }` reply body.

use serde_json::{Value, json};
use tracing::error;

use crate::bridge::BridgeAction;

pub const DEEPSEEK_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// System and user prompt pair for one request.
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Deck generation prompt for the `/api/generate` endpoint.
pub fn deck_prompt(topic: &str, pages: u32) -> Prompt {
    let system = format!(
        "You are a social-media content creator who makes engaging text \
         cards. Generate Markdown for a card deck about the user's topic.\n\
         Hard limits: the cover page holds a single `#` title of at most a \
         few words and nothing else; every other page stays under 60 words; \
         at most 5 bullet points per page, each short. Prefer more pages \
         over crowded ones.\n\
         Format: separate pages with `---` on its own line surrounded by \
         blank lines; one `##` subtitle plus 2-4 concise lines per page; \
         use **bold** for key points; generate {pages} pages including the \
         cover; end with a summary or call to action."
    );
    Prompt {
        system,
        user: format!("Create card deck content for this topic: {topic}"),
    }
}

/// Prompt for one bridge action, or `None` when the action/payload
/// combination is invalid.
pub fn action_prompt(
    action: BridgeAction,
    text: Option<&str>,
    topic: Option<&str>,
    thread_mode: bool,
) -> Option<Prompt> {
    const PLAIN_TEXT: &str = "Important: reply with plain text only. No Markdown \
         formatting (no ** bold, no * italics, no # headings). Plain text plus emoji.";

    let prompt = match action {
        BridgeAction::Summarize => Prompt {
            system: "You are a professional editor. Summarize the provided text \
                     concisely while keeping the key points."
                .to_string(),
            user: text?.to_string(),
        },
        BridgeAction::Improve => Prompt {
            system: "You are a professional copywriter. Rewrite the provided text \
                     to be clearer and more engaging. Keep the meaning, improve \
                     the flow."
                .to_string(),
            user: text?.to_string(),
        },
        BridgeAction::FixGrammar => Prompt {
            system: "You are a strict proofreader. Fix all grammar, spelling, and \
                     punctuation mistakes. Do not change the style, only fix errors."
                .to_string(),
            user: text?.to_string(),
        },
        BridgeAction::MakeSocial => Prompt {
            system: "You are a social media manager. Rewrite the text for \
                     Instagram or LinkedIn: emoji, short paragraphs, a strong hook."
                .to_string(),
            user: text?.to_string(),
        },
        BridgeAction::FromTopic => Prompt {
            system: "You are a content creator known for viral, beautifully \
                     structured blog posts."
                .to_string(),
            user: format!(
                "Write a short post about \"{}\" in Markdown with a title, \
                 subtitles, bullet points, and a quote.",
                topic?
            ),
        },
        BridgeAction::SocialCaption => {
            let text = text?;
            let user = if thread_mode {
                format!(
                    "Content: {text}\n\nTurn this into a thread-style series of \
                     social posts. {PLAIN_TEXT} Split it into connected parts: a \
                     strong hook first, a call to action last. Separate parts \
                     with \"|||\". Keep each part under 500 characters."
                )
            } else {
                format!(
                    "Content: {text}\n\nTurn this into one engaging \
                     Instagram/LinkedIn caption. {PLAIN_TEXT} Include a hook, a \
                     valuable body, and a call to action."
                )
            };
            Prompt {
                system: format!(
                    "You are a viral social media expert. You output clean plain \
                     text. {PLAIN_TEXT}"
                ),
                user,
            }
        }
    };
    Some(prompt)
}

/// Call a DeepSeek-style chat completions endpoint.
pub async fn chat_completion(
    http: &reqwest::Client,
    url: &str,
    api_key: &str,
    prompt: &Prompt,
) -> Result<String, String> {
    let body = json!({
        "model": "deepseek-chat",
        "messages": [
            { "role": "system", "content": prompt.system },
            { "role": "user", "content": prompt.user },
        ],
        "temperature": 0.7,
        "max_tokens": 2000,
    });

    let response = http
        .post(url)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            error!("chat completion request failed: {e}");
            "generation failed".to_string()
        })?;

    if !response.status().is_success() {
        error!("chat completion upstream status: {}", response.status());
        return Err("generation failed".to_string());
    }

    let data: Value = response
        .json()
        .await
        .map_err(|_| "generation failed".to_string())?;
    Ok(data["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or_default()
        .to_string())
}

/// Call a Gemini-style generateContent endpoint.
pub async fn generate_content(
    http: &reqwest::Client,
    url: &str,
    api_key: &str,
    prompt: &Prompt,
) -> Result<String, String> {
    let body = json!({
        "contents": [ { "parts": [ { "text": prompt.user } ] } ],
        "systemInstruction": { "parts": [ { "text": prompt.system } ] },
        "generationConfig": { "temperature": 0.7 },
    });

    let response = http
        .post(format!("{url}?key={api_key}"))
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            error!("generate content request failed: {e}");
            "generation failed".to_string()
        })?;

    if !response.status().is_success() {
        error!("generate content upstream status: {}", response.status());
        return Err("generation failed".to_string());
    }

    let data: Value = response
        .json()
        .await
        .map_err(|_| "generation failed".to_string())?;
    Ok(data["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_actions_require_text() {
        assert!(action_prompt(BridgeAction::Summarize, None, None, false).is_none());
        assert!(action_prompt(BridgeAction::Summarize, Some("hi"), None, false).is_some());
    }

    #[test]
    fn from_topic_requires_topic() {
        assert!(action_prompt(BridgeAction::FromTopic, Some("x"), None, false).is_none());
        assert!(action_prompt(BridgeAction::FromTopic, None, Some("rust"), false).is_some());
    }

    #[test]
    fn thread_mode_changes_caption_prompt() {
        let single = action_prompt(BridgeAction::SocialCaption, Some("t"), None, false).unwrap();
        let thread = action_prompt(BridgeAction::SocialCaption, Some("t"), None, true).unwrap();
        assert!(thread.user.contains("|||"));
        assert!(!single.user.contains("|||"));
    }
}
