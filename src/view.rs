// src/view.rs

use serde::Serialize;

use crate::models::result::Marker;
use crate::workflow::{Attempt, AttemptState};

/// One ordinal's verdict, in question order.
#[derive(Debug, Serialize)]
pub struct QuestionMark {
    pub number: u32,
    pub marker: Marker,
}

/// What a graded attempt shows: score, roll number, per-question marks.
#[derive(Debug, Serialize)]
pub struct ResultView {
    pub score: i64,
    pub roll_no: String,
    pub answers: Vec<String>,
    pub marks: Vec<QuestionMark>,
}

impl ResultView {
    /// Projects a graded attempt. Anything short of `Graded` yields
    /// nothing at all — never a zero-score placeholder.
    pub fn project(attempt: &Attempt) -> Option<ResultView> {
        let AttemptState::Graded { report, .. } = &attempt.state else {
            return None;
        };

        let marks = report
            .marked_questions
            .iter()
            .enumerate()
            .map(|(i, question)| QuestionMark {
                number: i as u32 + 1,
                marker: question.marker,
            })
            .collect();

        Some(ResultView {
            score: report.score,
            roll_no: report.roll_no.clone(),
            answers: report.answers.clone(),
            marks,
        })
    }
}
