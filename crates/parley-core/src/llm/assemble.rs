//! Final message-list assembly for a completion call.
//!
//! The caller supplies context messages (usually the rendered persona as a
//! system message followed by the conversation window) and the pending user
//! turn. The user turn is
//! appended unless the context already ends with that exact user message, so
//! a caller whose context includes the pending turn never submits it twice.

use tracing::debug;

use parley_types::config::SystemPromptPolicy;
use parley_types::llm::{CompletionRequest, LlmError};
use parley_types::message::{Message, MessageRole};

use super::client::CompletionClient;

/// Build the ordered message list sent to the completion endpoint.
///
/// With [`SystemPromptPolicy::Leading`] the list opens with exactly one
/// system-role message: the system prompt, followed by the content of a
/// leading system message in `context` when there is one. With
/// [`SystemPromptPolicy::Legacy`] the prompt follows the appended user turn as
/// a user-role message, and is omitted when the user turn was deduplicated.
pub fn assemble_messages(
    user_message: &str,
    context: &[Message],
    policy: SystemPromptPolicy,
    system_prompt: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(context.len() + 2);

    match (policy, context.split_first()) {
        (SystemPromptPolicy::Leading, Some((first, rest))) if first.role == MessageRole::System => {
            messages.push(Message::system(merge_system(system_prompt, &first.content)));
            messages.extend_from_slice(rest);
        }
        (SystemPromptPolicy::Leading, _) => {
            messages.push(Message::system(system_prompt));
            messages.extend_from_slice(context);
        }
        (SystemPromptPolicy::Legacy, _) => messages.extend_from_slice(context),
    }

    let already_pending = context
        .last()
        .is_some_and(|m| m.role == MessageRole::User && m.content == user_message);

    if !already_pending {
        messages.push(Message::user(user_message));
        if policy == SystemPromptPolicy::Legacy {
            messages.push(Message::user(system_prompt));
        }
    }

    messages
}

/// Join the system prompt and persona instructions, skipping empty parts.
fn merge_system(system_prompt: &str, persona: &str) -> String {
    match (system_prompt.trim().is_empty(), persona.trim().is_empty()) {
        (true, _) => persona.to_string(),
        (false, true) => system_prompt.to_string(),
        (false, false) => format!("{system_prompt}\n\n{persona}"),
    }
}

/// Assemble the request for `client` and perform one completion call.
pub async fn converse<C: CompletionClient>(
    client: &C,
    user_message: &str,
    context: &[Message],
    policy: SystemPromptPolicy,
    system_prompt: &str,
) -> Result<String, LlmError> {
    let request = CompletionRequest {
        model: client.model().to_string(),
        messages: assemble_messages(user_message, context, policy, system_prompt),
    };

    debug!(
        client = client.name(),
        model = %request.model,
        messages = request.messages.len(),
        "Sending completion request"
    );

    client.complete(&request).await
}
