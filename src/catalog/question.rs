use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// One catalog question.
///
/// Fresh from the scraper exactly one of `question_text` /
/// `question_image_url` is set; after the OCR pass image questions carry
/// both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "questionNumber")]
    pub question_number: u32,
    #[serde(rename = "questionText", skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    #[serde(rename = "questionImageUrl", skip_serializing_if = "Option::is_none")]
    pub question_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub answers: Vec<Answer>,
}

impl Question {
    /// Index of the answer flagged correct, if the question has exactly one.
    pub fn correct_answer_index(&self) -> Option<usize> {
        let mut correct = self.answers.iter().enumerate().filter(|(_, a)| a.is_correct);
        match (correct.next(), correct.next()) {
            (Some((i, _)), None) => Some(i),
            _ => None,
        }
    }
}

/// The full catalog: the general pool plus the per-state pools.
///
/// `BTreeMap` keeps the state keys in a stable order in the output file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCatalog {
    #[serde(rename = "generalQuestions")]
    pub general_questions: Vec<Question>,
    #[serde(rename = "stateQuestions")]
    pub state_questions: BTreeMap<String, Vec<Question>>,
}

impl QuestionCatalog {
    pub fn available_states(&self) -> Vec<String> {
        self.state_questions.keys().cloned().collect()
    }

    /// General questions followed by the state-specific ones, or `None` when
    /// the state is unknown.
    pub fn questions_for_state(&self, state: &str) -> Option<Vec<Question>> {
        let state_questions = self.state_questions.get(state)?;
        let mut questions = self.general_questions.clone();
        questions.extend(state_questions.iter().cloned());
        Some(questions)
    }

    fn all_questions(&self) -> impl Iterator<Item = &Question> {
        self.general_questions
            .iter()
            .chain(self.state_questions.values().flatten())
    }
}

/// A question file on disk: either a full catalog object or, in the simpler
/// variant, a flat question array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionFile {
    Catalog(QuestionCatalog),
    Flat(Vec<Question>),
}

impl QuestionFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read question file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("cannot parse question file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("cannot write question file: {}", path.display()))
    }

    pub fn available_states(&self) -> Vec<String> {
        match self {
            QuestionFile::Catalog(catalog) => catalog.available_states(),
            QuestionFile::Flat(_) => Vec::new(),
        }
    }

    /// Question list for the given state. A flat file ignores the state and
    /// always yields its whole list.
    pub fn questions_for_state(&self, state: Option<&str>) -> Option<Vec<Question>> {
        match self {
            QuestionFile::Catalog(catalog) => catalog.questions_for_state(state?),
            QuestionFile::Flat(questions) => Some(questions.clone()),
        }
    }

    /// Question numbers whose answer list does not contain exactly one
    /// `isCorrect` answer. The scraper trusts the site here, so real output
    /// is validated after the fact.
    pub fn one_correct_violations(&self) -> Vec<u32> {
        let check = |q: &Question| {
            if q.correct_answer_index().is_none() {
                Some(q.question_number)
            } else {
                None
            }
        };
        match self {
            QuestionFile::Catalog(catalog) => catalog.all_questions().filter_map(check).collect(),
            QuestionFile::Flat(questions) => questions.iter().filter_map(check).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str, is_correct: bool) -> Answer {
        Answer {
            text: text.to_string(),
            is_correct,
        }
    }

    fn question(number: u32) -> Question {
        Question {
            question_number: number,
            question_text: Some(format!("Frage {number}")),
            question_image_url: None,
            explanation: None,
            answers: vec![answer("a", false), answer("b", true)],
        }
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let q = Question {
            question_number: 7,
            question_text: None,
            question_image_url: Some("https://example.org/bild.png".to_string()),
            explanation: Some("weil".to_string()),
            answers: vec![answer("ja", true)],
        };

        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["questionNumber"], 7);
        assert_eq!(json["questionImageUrl"], "https://example.org/bild.png");
        assert_eq!(json["explanation"], "weil");
        assert_eq!(json["answers"][0]["isCorrect"], true);
        // Unset optionals must not appear in the file at all.
        assert!(json.get("questionText").is_none());
    }

    #[test]
    fn parses_catalog_and_flat_variants() {
        let catalog = r#"{"generalQuestions":[],"stateQuestions":{"Hessen":[]}}"#;
        let flat = r#"[{"questionNumber":1,"questionText":"x","answers":[]}]"#;

        match serde_json::from_str::<QuestionFile>(catalog).unwrap() {
            QuestionFile::Catalog(c) => assert_eq!(c.available_states(), vec!["Hessen"]),
            QuestionFile::Flat(_) => panic!("parsed catalog as flat list"),
        }
        match serde_json::from_str::<QuestionFile>(flat).unwrap() {
            QuestionFile::Flat(qs) => assert_eq!(qs.len(), 1),
            QuestionFile::Catalog(_) => panic!("parsed flat list as catalog"),
        }
    }

    #[test]
    fn questions_for_state_appends_state_pool() {
        let mut catalog = QuestionCatalog {
            general_questions: vec![question(1), question(2)],
            ..Default::default()
        };
        catalog
            .state_questions
            .insert("Hessen".to_string(), vec![question(301)]);

        let questions = catalog.questions_for_state("Hessen").unwrap();
        let numbers: Vec<u32> = questions.iter().map(|q| q.question_number).collect();
        assert_eq!(numbers, vec![1, 2, 301]);

        assert!(catalog.questions_for_state("Atlantis").is_none());
    }

    #[test]
    fn flags_questions_without_exactly_one_correct_answer() {
        let mut none_correct = question(5);
        none_correct.answers = vec![answer("a", false), answer("b", false)];
        let mut two_correct = question(6);
        two_correct.answers = vec![answer("a", true), answer("b", true)];

        let file = QuestionFile::Flat(vec![question(4), none_correct, two_correct]);
        assert_eq!(file.one_correct_violations(), vec![5, 6]);
    }
}
