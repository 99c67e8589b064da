//! Persona template rendering.
//!
//! Templates reference persona attributes with `{{ name }}`-style
//! placeholders. Only the names in [`Placeholder`] are recognised; any other
//! placeholder is copied through unchanged so templates can carry optional
//! fields that older personas do not define.

use std::fmt;

use parley_types::message::Message;
use parley_types::persona::Persona;

/// Text substituted for `{{history}}` when the window is empty.
pub const NO_HISTORY: &str = "No previous conversation.";

/// Built-in template used when no custom template is configured.
pub const DEFAULT_TEMPLATE: &str = "\
<identity>
You are {{name}}. {{description}}
</identity>

<system>
{{system}}
</system>

<bio>
{{bio}}
</bio>

<lore>
{{lore}}
</lore>

<knowledge>
{{knowledge}}
</knowledge>

<style>
{{style}}
</style>

<adjectives>
{{adjectives}}
</adjectives>

<conversation_history>
{{history}}
</conversation_history>

<instructions>
{{instructions}}
Stay in character as {{name}} and answer the latest user message.
</instructions>";

/// Recognised template placeholder names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Name,
    Description,
    /// Spelled `system` or `specialty` in templates.
    System,
    Bio,
    Lore,
    Knowledge,
    Style,
    Adjectives,
    Instructions,
    History,
}

impl Placeholder {
    /// Map the text between the braces to a placeholder. Surrounding
    /// whitespace is ignored; matching is case-sensitive.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "name" => Some(Self::Name),
            "description" => Some(Self::Description),
            "system" | "specialty" => Some(Self::System),
            "bio" => Some(Self::Bio),
            "lore" => Some(Self::Lore),
            "knowledge" => Some(Self::Knowledge),
            "style" => Some(Self::Style),
            "adjectives" => Some(Self::Adjectives),
            "instructions" => Some(Self::Instructions),
            "history" => Some(Self::History),
            _ => None,
        }
    }

    fn value(self, persona: &Persona, history_text: &str) -> String {
        match self {
            Self::Name => persona.name.clone(),
            Self::Description => persona.description.clone(),
            Self::System => persona.system_prompt.clone(),
            Self::Bio => persona.bio.join("\n"),
            Self::Lore => persona.lore.join("\n"),
            Self::Knowledge => persona.knowledge.join("\n"),
            Self::Style => persona.style.join("\n"),
            Self::Adjectives => persona.adjectives.join("\n"),
            Self::Instructions => persona.instructions.clone(),
            Self::History => history_text.to_string(),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::System => "system",
            Self::Bio => "bio",
            Self::Lore => "lore",
            Self::Knowledge => "knowledge",
            Self::Style => "style",
            Self::Adjectives => "adjectives",
            Self::Instructions => "instructions",
            Self::History => "history",
        };
        write!(f, "{name}")
    }
}

/// A persona prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Substitute persona attributes and `history_text` into the template.
    ///
    /// Single pass: substituted values are never scanned for placeholders.
    /// Unrecognised placeholders and an unclosed `{{` are copied verbatim.
    pub fn render(&self, persona: &Persona, history_text: &str) -> String {
        let mut rendered = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();

        while let Some(start) = rest.find("{{") {
            rendered.push_str(&rest[..start]);
            let Some(end_offset) = rest[start..].find("}}") else {
                rendered.push_str(&rest[start..]);
                rest = "";
                break;
            };

            match Placeholder::parse(&rest[start + 2..start + end_offset]) {
                Some(placeholder) => {
                    rendered.push_str(&placeholder.value(persona, history_text));
                    rest = &rest[start + end_offset + 2..];
                }
                None => {
                    // Literal braces; a placeholder may still open inside the span.
                    rendered.push_str("{{");
                    rest = &rest[start + 2..];
                }
            }
        }

        rendered.push_str(rest);
        rendered
    }
}

/// Serialize a conversation window for the `{{history}}` placeholder.
///
/// One `"<role>: <content>"` line per message, oldest first, each terminated
/// by a newline. An empty window yields [`NO_HISTORY`].
pub fn format_history(messages: &[Message]) -> String {
    if messages.is_empty() {
        return NO_HISTORY.to_string();
    }

    messages.iter().fold(String::new(), |mut out, m| {
        out.push_str(&format!("{}: {}\n", m.role, m.content));
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eko() -> Persona {
        Persona {
            name: "Eko".to_string(),
            description: "A tea sommelier.".to_string(),
            system_prompt: "Recommend teas.".to_string(),
            bio: vec!["Grew up in Uji.".to_string(), "Runs a tea house.".to_string()],
            adjectives: vec!["calm".to_string(), "precise".to_string()],
            instructions: "Keep answers short.".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_history_empty() {
        assert_eq!(format_history(&[]), "No previous conversation.");
    }

    #[test]
    fn test_format_history_lines() {
        let messages = vec![Message::user("hi"), Message::assistant("yo")];
        assert_eq!(format_history(&messages), "user: hi\nassistant: yo\n");
        // Pure: same input, same output.
        assert_eq!(format_history(&messages), format_history(&messages));
    }

    #[test]
    fn test_render_name() {
        let template = PromptTemplate::new("{{name}}");
        assert_eq!(template.render(&eko(), ""), "Eko");
    }

    #[test]
    fn test_render_keeps_unknown_placeholder() {
        let template = PromptTemplate::new("Hi {{name}}, {{foo}}!");
        assert_eq!(template.render(&eko(), ""), "Hi Eko, {{foo}}!");
    }

    #[test]
    fn test_render_tolerates_inner_whitespace() {
        let template = PromptTemplate::new("{{ name }} / {{  specialty }}");
        assert_eq!(template.render(&eko(), ""), "Eko / Recommend teas.");
    }

    #[test]
    fn test_render_joins_sequences_in_order() {
        let template = PromptTemplate::new("{{bio}}|{{adjectives}}|{{lore}}");
        assert_eq!(
            template.render(&eko(), ""),
            "Grew up in Uji.\nRuns a tea house.|calm\nprecise|"
        );
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let persona = Persona {
            name: "{{history}}".to_string(),
            ..Default::default()
        };
        let template = PromptTemplate::new("{{name}} then {{history}}");
        assert_eq!(
            template.render(&persona, "user: {{name}}\n"),
            "{{history}} then user: {{name}}\n"
        );
    }

    #[test]
    fn test_render_stray_braces_before_placeholder() {
        let template = PromptTemplate::new("Use {{ braces like {{name}} here");
        assert_eq!(template.render(&eko(), ""), "Use {{ braces like Eko here");

        let template = PromptTemplate::new("{{foo}} and {{ name }}");
        assert_eq!(template.render(&eko(), ""), "{{foo}} and Eko");
    }

    #[test]
    fn test_render_unclosed_placeholder() {
        let template = PromptTemplate::new("prefix {{name");
        assert_eq!(template.render(&eko(), ""), "prefix {{name");
    }

    #[test]
    fn test_render_history_text() {
        let history = format_history(&[Message::user("hello")]);
        let template = PromptTemplate::new("History:\n{{history}}");
        assert_eq!(template.render(&eko(), &history), "History:\nuser: hello\n");
    }

    #[test]
    fn test_default_template_covers_every_placeholder() {
        let rendered = PromptTemplate::default().render(&eko(), NO_HISTORY);
        assert!(!rendered.contains("{{"));
        assert!(rendered.contains("You are Eko. A tea sommelier."));
        assert!(rendered.contains("Recommend teas."));
        assert!(rendered.contains(NO_HISTORY));
        assert!(rendered.contains("Keep answers short."));
    }

    #[test]
    fn test_placeholder_parse() {
        assert_eq!(Placeholder::parse("specialty"), Some(Placeholder::System));
        assert_eq!(Placeholder::parse(" history "), Some(Placeholder::History));
        assert_eq!(Placeholder::parse("Name"), None);
        assert_eq!(Placeholder::parse("foo"), None);
        assert_eq!(Placeholder::System.to_string(), "system");
    }
}
