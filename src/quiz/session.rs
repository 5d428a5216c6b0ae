//! Quiz state machine.
//!
//! Owns the question list, the display order and the current selection.
//! Front-ends only render what the session exposes and forward commands.

use anyhow::{bail, Result};

use crate::catalog::Question;
use crate::quiz::store::StatsStore;

/// Display ordering of the questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    /// Catalog insertion order.
    Sequential,
    /// Ascending success score (correct minus incorrect), so the worst-known
    /// questions come first. Ties keep their insertion order.
    Practice,
}

/// Result of submitting an answer.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub explanation: Option<String>,
}

pub struct QuizSession<S: StatsStore> {
    questions: Vec<Question>,
    /// Indices into `questions`, in display order.
    order: Vec<usize>,
    /// Cursor into `order`.
    current: usize,
    /// Answer index picked for the current question; locks the question.
    selected: Option<usize>,
    mode: QuizMode,
    store: S,
}

impl<S: StatsStore> QuizSession<S> {
    pub fn new(questions: Vec<Question>, store: S) -> Self {
        let order = (0..questions.len()).collect();
        Self {
            questions,
            order,
            current: 0,
            selected: None,
            mode: QuizMode::Sequential,
            store,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    /// 1-based cursor position and total count, for rendering.
    pub fn position(&self) -> (usize, usize) {
        (self.current + 1, self.order.len())
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.order.get(self.current).map(|&i| &self.questions[i])
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.selected
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.order.len()
    }

    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    /// Submit an answer for the current question.
    ///
    /// The first selection locks the question and records the result; any
    /// further selection on the same question is rejected.
    pub fn select_answer(&mut self, answer_index: usize) -> Result<AnswerOutcome> {
        let Some(question) = self.current_question() else {
            bail!("no question to answer");
        };
        if self.selected.is_some() {
            bail!("question {} is already answered", question.question_number);
        }
        let Some(answer) = question.answers.get(answer_index) else {
            bail!(
                "question {} has no answer {}",
                question.question_number,
                answer_index + 1
            );
        };

        let correct = answer.is_correct;
        let question_number = question.question_number;
        let explanation = question.explanation.clone();

        self.store.record_answer(question_number, correct)?;
        self.selected = Some(answer_index);

        Ok(AnswerOutcome {
            correct,
            explanation,
        })
    }

    /// Move to the next question. No-op at the last index.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current += 1;
        self.selected = None;
        true
    }

    /// Move to the previous question. No-op at the first index.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.current -= 1;
        self.selected = None;
        true
    }

    /// Switch the display ordering and reset navigation to the first
    /// element of the new order.
    pub fn set_mode(&mut self, mode: QuizMode) -> Result<()> {
        self.order = match mode {
            QuizMode::Sequential => (0..self.questions.len()).collect(),
            QuizMode::Practice => self.practice_order()?,
        };
        self.mode = mode;
        self.current = 0;
        self.selected = None;
        Ok(())
    }

    /// Hand the store back, e.g. to rebuild the session for another region.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Insertion order, stably re-sorted by ascending success score.
    /// Questions never answered score 0.
    fn practice_order(&self) -> Result<Vec<usize>> {
        let mut scores = Vec::with_capacity(self.questions.len());
        for question in &self.questions {
            let score = self
                .store
                .get(question.question_number)?
                .map(|stat| stat.success_score())
                .unwrap_or(0);
            scores.push(score);
        }

        let mut order: Vec<usize> = (0..self.questions.len()).collect();
        order.sort_by_key(|&i| scores[i]);
        Ok(order)
    }
}
