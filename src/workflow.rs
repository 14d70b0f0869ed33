// src/workflow.rs

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    error::AppError,
    grading::GradingService,
    models::result::{GradeReport, StoredResult},
    persist::ResultRecorder,
};

/// Attempts abandoned longer than this are pruned when new ones open.
const ATTEMPT_TTL_SECS: i64 = 3600;

/// The uploaded sheet photo as received from the browser.
#[derive(Clone)]
pub struct SheetImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl fmt::Debug for SheetImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetImage")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One grading attempt's position in the submission workflow.
///
/// `Submitting` is entered before the grading call goes out and left when
/// it resolves, so at most one request is ever in flight per attempt.
#[derive(Debug, Clone, Default)]
pub enum AttemptState {
    #[default]
    Idle,
    SubjectChosen {
        subject: String,
    },
    ImageSelected {
        subject: String,
        image: SheetImage,
    },
    Submitting {
        subject: String,
        image: SheetImage,
    },
    Graded {
        subject: String,
        image: SheetImage,
        report: GradeReport,
    },
}

impl AttemptState {
    pub fn label(&self) -> &'static str {
        match self {
            AttemptState::Idle => "idle",
            AttemptState::SubjectChosen { .. } => "subject_chosen",
            AttemptState::ImageSelected { .. } => "image_selected",
            AttemptState::Submitting { .. } => "submitting",
            AttemptState::Graded { .. } => "graded",
        }
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            AttemptState::Idle => None,
            AttemptState::SubjectChosen { subject }
            | AttemptState::ImageSelected { subject, .. }
            | AttemptState::Submitting { subject, .. }
            | AttemptState::Graded { subject, .. } => Some(subject),
        }
    }
}

/// One end-to-end scan cycle. Created Idle, discarded on reset.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub id: Uuid,
    pub state: AttemptState,
    pub created_at: DateTime<Utc>,
}

impl Attempt {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: AttemptState::Idle,
            created_at: Utc::now(),
        }
    }

    /// Chooses (or re-chooses) the subject. A previously selected image
    /// is cleared: the sheet must be captured again for the new subject.
    pub fn choose_subject(&mut self, subject: String) {
        self.state = AttemptState::SubjectChosen { subject };
    }

    /// Attaches the sheet photo. Requires a chosen subject first;
    /// re-selecting before submit replaces the previous photo.
    pub fn select_image(&mut self, image: SheetImage) -> Result<(), AppError> {
        let subject = match &self.state {
            AttemptState::SubjectChosen { subject }
            | AttemptState::ImageSelected { subject, .. } => subject.clone(),
            AttemptState::Idle => {
                return Err(AppError::Validation(
                    "Please select a subject first".to_string(),
                ));
            }
            AttemptState::Submitting { .. } => {
                return Err(AppError::Conflict("Grading is in progress".to_string()));
            }
            AttemptState::Graded { .. } => {
                return Err(AppError::Validation(
                    "Attempt already graded; reset to scan another sheet".to_string(),
                ));
            }
        };

        self.state = AttemptState::ImageSelected { subject, image };
        Ok(())
    }

    /// Moves the attempt into `Submitting`, handing back what the grading
    /// call needs. Rejects a second call while one is already in flight.
    fn begin_submit(&mut self) -> Result<(String, SheetImage), AppError> {
        match &self.state {
            AttemptState::ImageSelected { subject, image } => {
                let subject = subject.clone();
                let image = image.clone();
                self.state = AttemptState::Submitting {
                    subject: subject.clone(),
                    image: image.clone(),
                };
                Ok((subject, image))
            }
            AttemptState::Submitting { .. } => Err(AppError::Conflict(
                "A grading request is already in flight for this attempt".to_string(),
            )),
            AttemptState::Idle | AttemptState::SubjectChosen { .. } => Err(AppError::Validation(
                "Select a subject and a sheet image before submitting".to_string(),
            )),
            AttemptState::Graded { .. } => Err(AppError::Validation(
                "Attempt already graded; reset to scan another sheet".to_string(),
            )),
        }
    }

    /// Grading succeeded. Returns false when a racing reset discarded the
    /// attempt first, in which case the report is dropped.
    fn complete_submit(&mut self, report: GradeReport) -> bool {
        match std::mem::take(&mut self.state) {
            AttemptState::Submitting { subject, image } => {
                self.state = AttemptState::Graded {
                    subject,
                    image,
                    report,
                };
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Grading failed; the image is kept so the user can retry without
    /// re-picking the file.
    fn fail_submit(&mut self) {
        if let AttemptState::Submitting { subject, image } = std::mem::take(&mut self.state) {
            self.state = AttemptState::ImageSelected { subject, image };
        }
    }

    /// Discards the whole attempt.
    pub fn reset(&mut self) {
        self.state = AttemptState::Idle;
    }
}

impl Default for Attempt {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns every live attempt and drives each one through the grading
/// cycle: subject choice, image selection, submission, result,
/// best-effort persistence, reset.
#[derive(Clone)]
pub struct SubmissionWorkflow {
    attempts: Arc<Mutex<HashMap<Uuid, Attempt>>>,
    grader: Arc<dyn GradingService>,
    recorder: ResultRecorder,
}

impl SubmissionWorkflow {
    pub fn new(grader: Arc<dyn GradingService>, recorder: ResultRecorder) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(HashMap::new())),
            grader,
            recorder,
        }
    }

    /// Opens a fresh Idle attempt, pruning abandoned ones along the way.
    pub async fn create_attempt(&self) -> Attempt {
        let mut attempts = self.attempts.lock().await;
        let cutoff = Utc::now() - chrono::Duration::seconds(ATTEMPT_TTL_SECS);
        attempts.retain(|_, attempt| {
            attempt.created_at > cutoff
                || matches!(attempt.state, AttemptState::Submitting { .. })
        });

        let attempt = Attempt::new();
        attempts.insert(attempt.id, attempt.clone());
        attempt
    }

    pub async fn get(&self, id: Uuid) -> Result<Attempt, AppError> {
        self.attempts
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(attempt_not_found)
    }

    pub async fn choose_subject(&self, id: Uuid, subject: String) -> Result<Attempt, AppError> {
        let mut attempts = self.attempts.lock().await;
        let attempt = attempts.get_mut(&id).ok_or_else(attempt_not_found)?;
        if matches!(attempt.state, AttemptState::Submitting { .. }) {
            return Err(AppError::Conflict("Grading is in progress".to_string()));
        }
        attempt.choose_subject(subject);
        Ok(attempt.clone())
    }

    pub async fn select_image(&self, id: Uuid, image: SheetImage) -> Result<Attempt, AppError> {
        let mut attempts = self.attempts.lock().await;
        let attempt = attempts.get_mut(&id).ok_or_else(attempt_not_found)?;
        attempt.select_image(image)?;
        Ok(attempt.clone())
    }

    /// Runs one grading round trip.
    ///
    /// The registry lock is released while the request is in flight; the
    /// `Submitting` state is what keeps a second submit out, not the
    /// lock. A failure puts the attempt back in `ImageSelected` with the
    /// image retained so the user can retry.
    pub async fn submit(&self, id: Uuid) -> Result<GradeReport, AppError> {
        let (subject, image) = {
            let mut attempts = self.attempts.lock().await;
            let attempt = attempts.get_mut(&id).ok_or_else(attempt_not_found)?;
            attempt.begin_submit()?
        };

        let outcome = self.grader.grade(&subject, &image).await;

        let mut attempts = self.attempts.lock().await;
        let attempt = attempts.get_mut(&id).ok_or_else(attempt_not_found)?;

        match outcome {
            Ok(report) => {
                let graded = attempt.complete_submit(report.clone());
                drop(attempts);

                if graded {
                    // Persistence is best-effort: the user keeps their
                    // result on screen even when the write fails.
                    let stored = StoredResult {
                        subject,
                        score: report.score,
                        roll_no: report.roll_no.clone(),
                        answers: report.answers.clone(),
                        marked_questions: report.marked_questions.clone(),
                        graded_at: Utc::now(),
                    };
                    if let Err(e) = self.recorder.record(&stored).await {
                        tracing::error!(
                            "Failed to save result for roll number {}: {:?}",
                            stored.roll_no,
                            e
                        );
                    }
                }

                Ok(report)
            }
            Err(e) => {
                attempt.fail_submit();
                Err(e)
            }
        }
    }

    /// Discards the attempt and returns it to Idle.
    pub async fn reset(&self, id: Uuid) -> Result<Attempt, AppError> {
        let mut attempts = self.attempts.lock().await;
        let attempt = attempts.get_mut(&id).ok_or_else(attempt_not_found)?;
        attempt.reset();
        Ok(attempt.clone())
    }
}

fn attempt_not_found() -> AppError {
    AppError::NotFound("Attempt not found".to_string())
}
