use futures::join;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::Notice;
use shared_resource::ConsultationApiClient;

use crate::error::DashboardError;
use crate::models::{EnrichedConsultation, Pipeline, Psychologist, Row, User, ViewSelector};
use crate::services::join as joins;
use crate::services::normalizer::{self, PayloadShape};
use crate::services::table::{self, TableView};
use crate::services::view_state::{Action, DashboardState, Effect, Loaded, Ticket};

/// How a view transition ended, as seen by whoever triggered it.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    Applied,
    /// Already converted to a notice; returned for the caller's information only.
    Failed(DashboardError),
    /// Another selection happened while the fetch was out; the result was dropped.
    Superseded,
    NoFetch,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    #[serde(flatten)]
    pub table: TableView,
    pub notices: Vec<Notice>,
}

/// Owns the dashboard state and runs the fetch pipelines its transitions ask for.
///
/// The state lock is never held across a fetch, so selections made while a
/// request is outstanding go through immediately.
pub struct DashboardController {
    pub(crate) client: ConsultationApiClient,
    pub(crate) state: RwLock<DashboardState>,
}

impl DashboardController {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(ConsultationApiClient::new(config))
    }

    pub fn with_client(client: ConsultationApiClient) -> Self {
        Self {
            client,
            state: RwLock::new(DashboardState::new()),
        }
    }

    pub async fn dispatch(&self, action: Action) -> Effect {
        self.state.write().await.reduce(action)
    }

    /// Reads the current state without draining anything.
    pub async fn inspect<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        let state = self.state.read().await;
        f(&state)
    }

    pub async fn select_view(&self, view: ViewSelector) -> TransitionOutcome {
        match self.dispatch(Action::Select(view)).await {
            Effect::Fetch(ticket) => self.perform(ticket).await,
            _ => TransitionOutcome::NoFetch,
        }
    }

    /// Drill-down into one psychologist's consultations. No network traffic.
    pub async fn view_consultations_for(&self, psychologist_id: &str) {
        self.dispatch(Action::ViewConsultationsFor(psychologist_id.to_string())).await;
    }

    pub async fn logout(&self) {
        self.dispatch(Action::Logout).await;
    }

    /// Current table plus any notices raised since the last snapshot.
    pub async fn snapshot(&self) -> DashboardSnapshot {
        let mut state = self.state.write().await;
        let table = table::build(&state);
        let notices = state.drain_notices();
        DashboardSnapshot { table, notices }
    }

    async fn perform(&self, ticket: Ticket) -> TransitionOutcome {
        let Some(pipeline) = ticket.view.pipeline() else {
            return TransitionOutcome::NoFetch;
        };

        let result = self.run(pipeline).await;
        if let Err(err) = &result {
            error!("Error loading {}: {}", ticket.view, err);
        }

        let mut state = self.state.write().await;
        let outcome = if !state.is_current(&ticket) {
            TransitionOutcome::Superseded
        } else {
            match &result {
                Ok(_) => TransitionOutcome::Applied,
                Err(err) => TransitionOutcome::Failed(err.clone()),
            }
        };
        state.reduce(Action::Settled { ticket, result });
        outcome
    }

    pub async fn run(&self, pipeline: Pipeline) -> Result<Loaded, DashboardError> {
        match pipeline {
            Pipeline::PsychologistsWithCounts => self.load_psychologists().await.map(Loaded::Psychologists),
            Pipeline::UsersWithChildCounts => self.load_users().await.map(Loaded::Users),
            Pipeline::EnrichedConsultations => self.load_consultations().await.map(Loaded::Consultations),
        }
    }

    async fn load_psychologists(&self) -> Result<Vec<Row<Psychologist>>, DashboardError> {
        let psychologists = normalizer::psychologists(self.client.fetch_psychologists().await?)?;
        let consultations = normalizer::consultations(self.client.fetch_consultations().await?)?;

        debug!(
            "Counting {} consultations across {} psychologists",
            consultations.len(),
            psychologists.len()
        );
        Ok(joins::attach_consultation_counts(psychologists, &consultations))
    }

    async fn load_users(&self) -> Result<Vec<Row<User>>, DashboardError> {
        let users = normalizer::users(self.client.fetch_users().await?)?;
        Ok(joins::attach_child_counts(users))
    }

    /// All three requests go out together; any failure fails the whole load.
    async fn load_consultations(&self) -> Result<Vec<Row<EnrichedConsultation>>, DashboardError> {
        let (consultations, users, psychologists) = join!(
            self.client.fetch_consultations(),
            self.client.fetch_users(),
            self.client.fetch_psychologists(),
        );
        let (consultations, users, psychologists) = (consultations?, users?, psychologists?);

        let consultations = normalizer::consultations(consultations)?;
        let users = normalizer::normalize(users, PayloadShape::OptionalDataField, "users")?;
        let psychologists =
            normalizer::normalize(psychologists, PayloadShape::OptionalDataField, "psychologists")?;

        Ok(joins::enrich_consultations(consultations, &users, &psychologists))
    }
}
