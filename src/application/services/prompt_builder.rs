use crate::domain::PromptStyle;

const TEXT_PLACEHOLDER: &str = "{text}";

/// Renders the per-chunk ("map") and final ("combine") prompts for one
/// wording style.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    style: PromptStyle,
    map_template: String,
    combine_template: String,
}

impl PromptBuilder {
    pub fn new(style: PromptStyle) -> Self {
        let (map_adjective, map_focus, map_label) = match style {
            PromptStyle::Concise => ("very concise", "most crucial", "CONCISE"),
            PromptStyle::Detailed => ("detailed", "key", "DETAILED"),
        };
        let (combine_adjective, combine_focus, combine_label) = match style {
            PromptStyle::Concise => ("highly condensed", "essential", "CONDENSED"),
            PromptStyle::Detailed => ("comprehensive", "key", "COMPREHENSIVE"),
        };

        let map_template = format!(
            "Write a {map_adjective} summary of the following text, focusing on the {map_focus} points:\n\"{TEXT_PLACEHOLDER}\"\n{map_label} SUMMARY:"
        );
        let combine_template = format!(
            "Write a {combine_adjective} summary of the following text, capturing the {combine_focus} points and main ideas:\n\"{TEXT_PLACEHOLDER}\"\n{combine_label} SUMMARY:"
        );

        Self {
            style,
            map_template,
            combine_template,
        }
    }

    pub fn style(&self) -> PromptStyle {
        self.style
    }

    pub fn map_prompt(&self, text: &str) -> String {
        self.map_template.replace(TEXT_PLACEHOLDER, text)
    }

    pub fn combine_prompt(&self, text: &str) -> String {
        self.combine_template.replace(TEXT_PLACEHOLDER, text)
    }
}
