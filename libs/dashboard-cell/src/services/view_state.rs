//! Dashboard state and its transitions.
//!
//! `DashboardState::reduce` takes an action and returns the side effect the
//! caller has to perform. It never does I/O itself.

use tracing::{debug, info, warn};

use shared_models::Notice;
use shared_resource::FetchError;

use crate::error::DashboardError;
use crate::models::{EnrichedConsultation, Psychologist, Row, User, ViewSelector};

pub const INACTIVATED_MESSAGE: &str = "Psychologist has been successfully inactivated.";
pub const INACTIVATE_FAILED_MESSAGE: &str = "Failed to inactivate psychologist. Please try again.";
pub const LOGGED_OUT_MESSAGE: &str = "You have successfully logged out.";

/// Identifies one issued transition. Results carrying a stale epoch are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub epoch: u64,
    pub view: ViewSelector,
}

/// Output of a completed fetch+join pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Psychologists(Vec<Row<Psychologist>>),
    Users(Vec<Row<User>>),
    Consultations(Vec<Row<EnrichedConsultation>>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Select(ViewSelector),
    ViewConsultationsFor(String),
    Settled {
        ticket: Ticket,
        result: Result<Loaded, DashboardError>,
    },
    DeactivateRequested(String),
    DeactivateSettled {
        psychologist_id: String,
        session: u64,
        result: Result<(), FetchError>,
    },
    Logout,
}

/// The side effect the caller must carry out after a reduction.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Fetch(Ticket),
    /// Carries the session it was issued in; a settlement from an earlier
    /// session is ignored.
    Deactivate { psychologist_id: String, session: u64 },
}

#[derive(Debug, Default)]
pub struct DashboardState {
    view: ViewSelector,
    epoch: u64,
    /// Bumped on logout.
    session: u64,
    in_flight: Option<Ticket>,
    pending_mutations: usize,
    psychologists: Vec<Row<Psychologist>>,
    users: Vec<Row<User>>,
    consultations: Vec<Row<EnrichedConsultation>>,
    filtered_consultations: Vec<Row<EnrichedConsultation>>,
    notices: Vec<Notice>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ViewSelector {
        self.view
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some() || self.pending_mutations > 0
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.epoch == self.epoch && ticket.view == self.view
    }

    pub fn psychologists(&self) -> &[Row<Psychologist>] {
        &self.psychologists
    }

    pub fn users(&self) -> &[Row<User>] {
        &self.users
    }

    pub fn consultations(&self) -> &[Row<EnrichedConsultation>] {
        &self.consultations
    }

    pub fn filtered_consultations(&self) -> &[Row<EnrichedConsultation>] {
        &self.filtered_consultations
    }

    pub fn pending_notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn enter(&mut self, view: ViewSelector) -> Ticket {
        self.epoch += 1;
        self.view = view;
        Ticket {
            epoch: self.epoch,
            view,
        }
    }

    pub fn reduce(&mut self, action: Action) -> Effect {
        match action {
            Action::Select(view) => {
                let ticket = self.enter(view);
                if view.fetches() {
                    debug!("Entering {} view (epoch {})", view, ticket.epoch);
                    self.in_flight = Some(ticket);
                    Effect::Fetch(ticket)
                } else {
                    self.in_flight = None;
                    Effect::None
                }
            }
            Action::ViewConsultationsFor(psychologist_id) => {
                self.filtered_consultations = self.consultations
                    .iter()
                    .filter(|row| row.record.consultation.is_with(&psychologist_id))
                    .cloned()
                    .collect();
                debug!(
                    "Showing {} consultations for psychologist {}",
                    self.filtered_consultations.len(),
                    psychologist_id
                );
                self.enter(ViewSelector::FilteredConsultations);
                self.in_flight = None;
                Effect::None
            }
            Action::Settled { ticket, result } => {
                if !self.is_current(&ticket) {
                    warn!(
                        "Discarding superseded {} result (epoch {}, current {})",
                        ticket.view, ticket.epoch, self.epoch
                    );
                    return Effect::None;
                }
                self.in_flight = None;
                match result {
                    Ok(Loaded::Psychologists(rows)) => self.psychologists = rows,
                    Ok(Loaded::Users(rows)) => self.users = rows,
                    Ok(Loaded::Consultations(rows)) => self.consultations = rows,
                    Err(err) => {
                        warn!("Transition to {} failed: {}", ticket.view, err);
                        self.notices.push(Notice::error(format!("Failed to load {}", ticket.view)));
                    }
                }
                Effect::None
            }
            Action::DeactivateRequested(psychologist_id) => {
                self.pending_mutations += 1;
                Effect::Deactivate {
                    psychologist_id,
                    session: self.session,
                }
            }
            Action::DeactivateSettled { psychologist_id, session, .. } if session != self.session => {
                debug!("Ignoring inactivation of {} settled after logout", psychologist_id);
                Effect::None
            }
            Action::DeactivateSettled { psychologist_id, result, .. } => {
                self.pending_mutations = self.pending_mutations.saturating_sub(1);
                match result {
                    Ok(()) => {
                        match self.psychologists.iter_mut().find(|row| row.record.id == psychologist_id) {
                            Some(row) => row.record.is_active = false,
                            None => warn!("Inactivated psychologist {} is not in the loaded list", psychologist_id),
                        }
                        info!("Psychologist {} inactivated", psychologist_id);
                        self.notices.push(Notice::success(INACTIVATED_MESSAGE));
                    }
                    Err(err) => {
                        warn!("Inactivating psychologist {} failed: {}", psychologist_id, err);
                        self.notices.push(Notice::error(INACTIVATE_FAILED_MESSAGE));
                    }
                }
                Effect::None
            }
            Action::Logout => {
                let notices = self.drain_notices();
                *self = Self {
                    epoch: self.epoch + 1,
                    session: self.session + 1,
                    notices,
                    ..Self::default()
                };
                self.notices.push(Notice::success(LOGGED_OUT_MESSAGE));
                Effect::None
            }
        }
    }
}
