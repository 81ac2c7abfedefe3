//! Client-side joins across the three collections. Every function here is
//! total: no input row is dropped and only derived fields are added.

use std::collections::HashMap;

use crate::models::{
    Consultation, EnrichedConsultation, ForeignKey, Psychologist, Record, Row, User, NOT_AVAILABLE,
};

/// Sets `totalConsultations` on each psychologist to the number of
/// consultations referencing it.
pub fn attach_consultation_counts(
    psychologists: Vec<Row<Psychologist>>,
    consultations: &[Row<Consultation>],
) -> Vec<Row<Psychologist>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for consultation in consultations {
        if let Some(id) = consultation.record.psychologist_id.as_ref().and_then(ForeignKey::id) {
            *counts.entry(id).or_default() += 1;
        }
    }

    psychologists
        .into_iter()
        .map(|mut row| {
            let total = counts.get(row.record.id.as_str()).copied().unwrap_or(0);
            row.record.total_consultations = Some(total);
            row
        })
        .collect()
}

/// Sets `totalChildren` on each user: the length of `children` when it is a
/// list, otherwise 0.
pub fn attach_child_counts(users: Vec<Row<User>>) -> Vec<Row<User>> {
    users
        .into_iter()
        .map(|mut row| {
            let total = row.record.children
                .as_ref()
                .and_then(|children| children.as_array())
                .map_or(0, Vec::len);
            row.record.total_children = Some(total);
            row
        })
        .collect()
}

/// First record per identifier, so lookups behave like a first-match scan.
fn index_by_id<T: Record>(rows: &[Row<T>]) -> HashMap<&str, &T> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(row.record.id()).or_insert(&row.record);
    }
    index
}

/// Resolves display name and email for one foreign key.
///
/// Email falls back from the joined record, to an email embedded in the
/// foreign key itself, to `N/A`.
fn resolve(
    key: Option<&ForeignKey>,
    lookup: impl Fn(&str) -> Option<(Option<String>, Option<String>)>,
) -> (String, String) {
    let joined = key.and_then(ForeignKey::id).and_then(lookup);
    let (joined_name, joined_email) = joined.unwrap_or((None, None));

    let name = joined_name.unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let email = joined_email
        .or_else(|| key.and_then(ForeignKey::embedded_email).map(str::to_string))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    (name, email)
}

pub fn enrich_consultations(
    consultations: Vec<Row<Consultation>>,
    users: &[Row<User>],
    psychologists: &[Row<Psychologist>],
) -> Vec<Row<EnrichedConsultation>> {
    let users_by_id = index_by_id(users);
    let psychologists_by_id = index_by_id(psychologists);

    consultations
        .into_iter()
        .map(|row| {
            let consultation = row.record;

            let (user_name, user_email) = resolve(consultation.user_id.as_ref(), |id| {
                users_by_id.get(id).map(|u| (u.username.clone(), u.email.clone()))
            });
            let (psychologist_name, psychologist_email) =
                resolve(consultation.psychologist_id.as_ref(), |id| {
                    psychologists_by_id.get(id).map(|p| (p.username.clone(), p.email.clone()))
                });

            Row {
                key: row.key,
                record: EnrichedConsultation {
                    consultation,
                    user_name,
                    user_email,
                    psychologist_name,
                    psychologist_email,
                },
            }
        })
        .collect()
}
