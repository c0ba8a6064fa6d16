//! Card is a question/answer pair belonging to one user
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardType {
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "phone number")]
    PhoneNumber,
    #[serde(rename = "self assesment")]
    SelfAssessment,
    #[serde(rename = "multiple choice")]
    MultipleChoice,
    #[serde(rename = "true or false")]
    TrueOrFalse,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub id: String,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub answer: String,
    #[serde(rename = "type", default)]
    pub card_type: CardType,
}

impl Card {
    /// A text card without an id; the store assigns one on creation.
    pub fn text(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            question: question.into(),
            hint: None,
            answer: answer.into(),
            card_type: CardType::Text,
        }
    }
}
