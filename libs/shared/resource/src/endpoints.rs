//! Paths of the consultation management API, relative to the configured base URL.

pub const PSYCHOLOGISTS: &str = "/consultationManagement/psychologists";
pub const USERS: &str = "/consultationManagement/getUser";
pub const CONSULTATIONS: &str = "/consultationManagement/getConsultations";
pub const LOGIN_ADMIN: &str = "/loginAdmin";

pub fn inactivate_psychologist(psychologist_id: &str) -> String {
    format!("{}/inactivate/{}", PSYCHOLOGISTS, psychologist_id)
}
