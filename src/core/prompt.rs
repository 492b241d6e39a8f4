// prompt templates - one per style, plus the reserved refine pass

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Casual,
    Formal,
}

impl Style {
    pub const ALL: [Style; 2] = [Style::Casual, Style::Formal];

    pub fn name(self) -> &'static str {
        match self {
            Style::Casual => "casual",
            Style::Formal => "formal",
        }
    }

    /// Template used by the generation pipeline.
    pub fn template(self) -> &'static Template {
        match self {
            Style::Casual => &CASUAL,
            Style::Formal => &FORMAL,
        }
    }

    /// Second-pass refinement template. Not part of the pipeline.
    pub fn refine_template(self) -> &'static Template {
        match self {
            Style::Casual => &CASUAL_REFINE,
            Style::Formal => &FORMAL_REFINE,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed prompt with a single `{placeholder}` slot.
#[derive(Debug, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    pub body: &'static str,
    pub placeholder: &'static str,
}

impl Template {
    /// Substitute the placeholder with `value` as-is. No escaping or trimming.
    pub fn render(&self, value: &str) -> String {
        let slot = format!("{{{}}}", self.placeholder);
        self.body.replace(&slot, value)
    }
}

pub const CASUAL: Template = Template {
    name: "casual",
    placeholder: "query",
    body: r#"You are a friendly, knowledgeable buddy explaining complex topics in a simple, fun way.
Explain {query} like you're chatting with a curious friend over coffee.
Use analogies, keep it light, and avoid jargon. Aim for 100-150 words."#,
};

pub const CASUAL_REFINE: Template = Template {
    name: "casual_refine",
    placeholder: "initial_response",
    body: r#"Take this response: "{initial_response}" and make it more concise, lively, and engaging.
Keep the casual, friendly tone, use an analogy if possible, and aim for 80-120 words.
Avoid overly technical terms."#,
};

pub const FORMAL: Template = Template {
    name: "formal",
    placeholder: "query",
    body: r#"You are an academic expert writing for a scholarly audience.
Provide a clear, precise, and structured explanation of {query}.
Use formal language, include key technical details, and organize the response with an introduction, explanation, and conclusion.
Aim for 150-200 words."#,
};

pub const FORMAL_REFINE: Template = Template {
    name: "formal_refine",
    placeholder: "initial_response",
    body: r#"Take this response: "{initial_response}" and summarize it to 100-150 words while maintaining a formal, academic tone.
Ensure clarity, precision, and logical structure, retaining key technical details."#,
};
