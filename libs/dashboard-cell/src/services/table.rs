use serde::{Deserialize, Serialize};

use serde_json::Value;

use crate::models::lenient::is_truthy;
use crate::models::{EnrichedConsultation, Psychologist, Row, User, ViewSelector, NOT_AVAILABLE};
use crate::services::view_state::DashboardState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    ViewConsultations,
    Inactivate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub key: String,
    pub cells: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub title: String,
    pub view: ViewSelector,
    pub loading: bool,
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

const PSYCHOLOGIST_COLUMNS: [Column; 5] = [
    Column { key: "username", title: "Username" },
    Column { key: "email", title: "Email" },
    Column { key: "specialization", title: "Specialization" },
    Column { key: "totalConsultations", title: "Total Consultations" },
    Column { key: "isActive", title: "Active" },
];

const USER_COLUMNS: [Column; 3] = [
    Column { key: "username", title: "Username" },
    Column { key: "email", title: "Email" },
    Column { key: "totalChildren", title: "Total Children" },
];

const CONSULTATION_COLUMNS: [Column; 12] = [
    Column { key: "userName", title: "User Name" },
    Column { key: "userEmail", title: "User Email" },
    Column { key: "psychologistName", title: "Psychologist Name" },
    Column { key: "psychologistEmail", title: "Psychologist Email" },
    Column { key: "status", title: "Status" },
    Column { key: "startTime", title: "Start Time" },
    Column { key: "endTime", title: "End Time" },
    Column { key: "meetLink", title: "Meet Link" },
    Column { key: "verifiedByUser", title: "Verified By User" },
    Column { key: "CompletedByPsychologist", title: "Completed By Psychologist" },
    Column { key: "rating", title: "Rating" },
    Column { key: "feedback", title: "Feedback" },
];

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn or_not_available(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE).to_string()
}

fn yes_no(flag: Option<bool>) -> String {
    let label = if flag.unwrap_or(false) { "Yes" } else { "No" };
    label.to_string()
}

/// Falsy values (zero included) render as `N/A`; strings render unquoted.
fn value_or_not_available(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(value) if is_truthy(value) => value.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn psychologist_row(row: &Row<Psychologist>) -> TableRow {
    let p = &row.record;
    let mut actions = vec![RowAction::ViewConsultations];
    if p.is_active {
        actions.push(RowAction::Inactivate);
    }

    TableRow {
        key: row.key.clone(),
        cells: vec![
            text(p.username.as_deref()),
            text(p.email.as_deref()),
            text(p.specialization.as_deref()),
            p.total_consultations.map(|n| n.to_string()).unwrap_or_default(),
            if p.is_active { "Active" } else { "Inactive" }.to_string(),
        ],
        actions,
    }
}

fn user_row(row: &Row<User>) -> TableRow {
    let u = &row.record;
    TableRow {
        key: row.key.clone(),
        cells: vec![
            text(u.username.as_deref()),
            text(u.email.as_deref()),
            u.total_children.map(|n| n.to_string()).unwrap_or_default(),
        ],
        actions: Vec::new(),
    }
}

fn consultation_row(row: &Row<EnrichedConsultation>) -> TableRow {
    let e = &row.record;
    let c = &e.consultation;
    let slot = c.time_slot.as_ref();

    TableRow {
        key: row.key.clone(),
        cells: vec![
            e.user_name.clone(),
            e.user_email.clone(),
            e.psychologist_name.clone(),
            e.psychologist_email.clone(),
            text(c.status.as_deref()),
            or_not_available(slot.and_then(|s| s.start_time.as_deref())),
            or_not_available(slot.and_then(|s| s.end_time.as_deref())),
            or_not_available(c.meet_link.as_deref()),
            yes_no(c.verified_by_user),
            yes_no(c.completed_by_psychologist),
            value_or_not_available(c.rating.as_ref()),
            or_not_available(c.feedback.as_deref()),
        ],
        actions: Vec::new(),
    }
}

/// Describes the table for the active view.
pub fn build(state: &DashboardState) -> TableView {
    let view = state.view();
    let (columns, rows): (&[Column], Vec<TableRow>) = match view {
        ViewSelector::Psychologists => (
            &PSYCHOLOGIST_COLUMNS[..],
            state.psychologists().iter().map(psychologist_row).collect(),
        ),
        ViewSelector::Users => (&USER_COLUMNS[..], state.users().iter().map(user_row).collect()),
        ViewSelector::Consultations => (
            &CONSULTATION_COLUMNS[..],
            state.consultations().iter().map(consultation_row).collect(),
        ),
        ViewSelector::FilteredConsultations => (
            &CONSULTATION_COLUMNS[..],
            state.filtered_consultations().iter().map(consultation_row).collect(),
        ),
    };

    TableView {
        title: view.title(),
        view,
        loading: state.is_loading(),
        columns: columns.to_vec(),
        rows,
    }
}
