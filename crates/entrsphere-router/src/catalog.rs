// SPDX-FileCopyrightText: 2026 EntrSphere Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The structured discovery questionnaire.
//!
//! A catalog is immutable reference data: an ordered list of questions, each
//! with options that contribute to zero or more signal categories. The
//! built-in catalog is used unless `routing.catalog_path` points at a TOML
//! replacement.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::signals::Category;

/// Errors raised while loading or validating a question catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("question catalog is empty")]
    Empty,

    #[error("duplicate question id `{0}`")]
    DuplicateQuestion(String),

    #[error("question `{question}` has duplicate option id `{option}`")]
    DuplicateOption { question: String, option: String },

    #[error("question `{0}` has no options")]
    NoOptions(String),

    #[error("failed to parse question catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read question catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<CatalogError> for entrsphere_core::EntrsphereError {
    fn from(err: CatalogError) -> Self {
        entrsphere_core::EntrsphereError::Config(err.to_string())
    }
}

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionOption {
    pub id: String,
    pub label: String,
    /// Categories this answer contributes one unit of signal to.
    #[serde(default)]
    pub signals: Vec<Category>,
}

/// A multiple-choice interview question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub subtext: Option<String>,
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Ordered, validated set of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Validate and wrap `questions`.
    ///
    /// Requires at least one question, unique question ids, and at least one
    /// option per question with ids unique within that question.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
            if question.options.is_empty() {
                return Err(CatalogError::NoOptions(question.id.clone()));
            }
            let mut option_ids = HashSet::new();
            for option in &question.options {
                if !option_ids.insert(option.id.as_str()) {
                    return Err(CatalogError::DuplicateOption {
                        question: question.id.clone(),
                        option: option.id.clone(),
                    });
                }
            }
        }

        Ok(Self { questions })
    }

    /// Parse a catalog from TOML (`[[questions]]` tables with nested `[[questions.options]]`).
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.questions)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }
}

impl Default for QuestionCatalog {
    /// The production five-question discovery catalog.
    fn default() -> Self {
        Self {
            questions: builtin_questions(),
        }
    }
}

fn option(id: &str, label: &str, signals: &[Category]) -> QuestionOption {
    QuestionOption {
        id: id.to_string(),
        label: label.to_string(),
        signals: signals.to_vec(),
    }
}

fn builtin_questions() -> Vec<Question> {
    use Category::{A, B, C, D};

    vec![
        Question {
            id: "situation".to_string(),
            prompt: "Which of these sounds most like where you are right now?".to_string(),
            subtext: Some("Go with your gut. There is no wrong answer.".to_string()),
            options: vec![
                option("clear_goal", "I have a clear goal and need it built", &[A]),
                option("exploring", "I have an idea but I'm still exploring it", &[B]),
                option("complicated", "It's complicated. There's a lot going on", &[C]),
                option(
                    "connect_systems",
                    "I need something to work with systems we already have",
                    &[D],
                ),
            ],
        },
        Question {
            id: "requirements".to_string(),
            prompt: "How well do you know what needs to be built?".to_string(),
            subtext: None,
            options: vec![
                option("know_exactly", "I know exactly what I want", &[A]),
                option("rough_idea", "I have a rough idea", &[B]),
                option(
                    "its_complicated",
                    "Different people want different things",
                    &[C],
                ),
                option(
                    "depends_on_systems",
                    "It depends on what our current systems can do",
                    &[D],
                ),
            ],
        },
        Question {
            id: "integration".to_string(),
            prompt: "How does this fit with the tools and systems you use today?".to_string(),
            subtext: Some("Think about data, logins, and anything it has to talk to.".to_string()),
            options: vec![
                option("standalone", "It stands on its own", &[]),
                option("not_sure", "I'm not sure yet", &[B, C]),
                option("few_connections", "It connects to one or two tools", &[D]),
                option(
                    "deeply_connected",
                    "It has to work with several existing systems",
                    &[D],
                ),
            ],
        },
        Question {
            id: "decision".to_string(),
            prompt: "Who decides what gets built?".to_string(),
            subtext: None,
            options: vec![
                option("my_call", "It's my call", &[]),
                option("small_team", "A small team, and we usually agree", &[B]),
                option(
                    "different_opinions",
                    "Several people, with different opinions",
                    &[C],
                ),
                option(
                    "outside_approval",
                    "It needs approval from outside my team",
                    &[C, D],
                ),
            ],
        },
        Question {
            id: "candor".to_string(),
            prompt: "When we dig into details, how open can the conversation be?".to_string(),
            subtext: Some("Some projects have topics people would rather not touch.".to_string()),
            options: vec![
                option("ask_anything", "Ask me anything", &[]),
                option("some_unknowns", "There are things I just don't know yet", &[B]),
                option("avoid_topics", "There are topics we tend to avoid", &[C]),
                option(
                    "technical_debt",
                    "Some of our systems are fragile and hard to discuss",
                    &[D],
                ),
            ],
        },
    ]
}
