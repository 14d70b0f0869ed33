use std::sync::Arc;

use axum::extract::FromRef;

use crate::catalog::SubjectCatalog;
use crate::config::Config;
use crate::grading::GradingService;
use crate::identity::IdentityProvider;
use crate::keystore::AnswerKeyStore;
use crate::persist::ResultRecorder;
use crate::store::DocumentStore;
use crate::workflow::SubmissionWorkflow;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub catalog: SubjectCatalog,
    pub answer_keys: AnswerKeyStore,
    pub results: ResultRecorder,
    pub workflow: SubmissionWorkflow,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        grader: Arc<dyn GradingService>,
    ) -> Self {
        let catalog = SubjectCatalog::new(store.clone());
        let answer_keys = AnswerKeyStore::new(store.clone());
        let results = ResultRecorder::new(store.clone());
        let workflow = SubmissionWorkflow::new(grader, results.clone());

        Self {
            config,
            store,
            identity,
            catalog,
            answer_keys,
            results,
            workflow,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for SubjectCatalog {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

impl FromRef<AppState> for AnswerKeyStore {
    fn from_ref(state: &AppState) -> Self {
        state.answer_keys.clone()
    }
}

impl FromRef<AppState> for ResultRecorder {
    fn from_ref(state: &AppState) -> Self {
        state.results.clone()
    }
}

impl FromRef<AppState> for SubmissionWorkflow {
    fn from_ref(state: &AppState) -> Self {
        state.workflow.clone()
    }
}
