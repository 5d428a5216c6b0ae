use serde::{Deserialize, Serialize};

/// Per-question answer statistics, keyed by the question number.
///
/// Created lazily the first time a question is answered and kept forever;
/// counters only ever grow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionStat {
    #[serde(rename = "questionNumber")]
    pub question_number: u32,
    #[serde(rename = "correctCount")]
    pub correct_count: u32,
    #[serde(rename = "incorrectCount")]
    pub incorrect_count: u32,
}

impl QuestionStat {
    pub fn new(question_number: u32) -> Self {
        Self {
            question_number,
            correct_count: 0,
            incorrect_count: 0,
        }
    }

    /// Success score: correct minus incorrect, not a ratio.
    ///
    /// The subtraction keeps questions that were guessed right once but
    /// missed often near the front of the practice order.
    pub fn success_score(&self) -> i64 {
        i64::from(self.correct_count) - i64::from(self.incorrect_count)
    }

    pub fn record(&mut self, is_correct: bool) {
        if is_correct {
            self.correct_count += 1;
        } else {
            self.incorrect_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_increments_exactly_one_counter() {
        let mut stat = QuestionStat::new(12);

        stat.record(true);
        assert_eq!((stat.correct_count, stat.incorrect_count), (1, 0));

        stat.record(false);
        assert_eq!((stat.correct_count, stat.incorrect_count), (1, 1));
    }

    #[test]
    fn success_score_is_signed() {
        let mut stat = QuestionStat::new(1);
        stat.record(false);
        stat.record(false);
        stat.record(true);
        assert_eq!(stat.success_score(), -1);
    }
}
