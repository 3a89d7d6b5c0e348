use crate::{model::InvitationModel, serde_implementations::datetime_utc, validation::ContactDetails};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

pub const GUEST: &str = "Guest";

///Name shown to the visitor, taken from the `invite` query parameter.
pub fn invitee_display_name(invite: Option<&str>) -> String {
    match invite {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => GUEST.to_owned(),
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationStatus {
    Accepted,
    Declined,
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Accepted => "Accepted",
                Self::Declined => "Declined",
            }
        )
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InvitationRecord {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    message: String,
    status: InvitationStatus,
    #[serde(with = "datetime_utc")]
    submitted_at: DateTime<Utc>,
}

impl InvitationRecord {
    pub fn declined(name: String, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email: String::new(),
            phone: String::new(),
            message: String::new(),
            status: InvitationStatus::Declined,
            submitted_at,
        }
    }

    pub fn accepted(name: String, details: ContactDetails, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email: details.get_email().to_owned(),
            phone: details.get_phone().to_owned(),
            message: details.get_message().to_owned(),
            status: InvitationStatus::Accepted,
            submitted_at,
        }
    }

    pub fn to_model(&self) -> InvitationModel {
        InvitationModel::new(
            self.id.to_string(),
            self.name.to_owned(),
            self.email.to_owned(),
            self.phone.to_owned(),
            self.message.to_owned(),
            self.status.to_string(),
            self.submitted_at.to_rfc3339(),
        )
    }

    pub fn get_id(&self) -> &Uuid {
        &self.id
    }
    pub fn get_name(&self) -> &String {
        &self.name
    }
    pub fn get_email(&self) -> &String {
        &self.email
    }
    pub fn get_phone(&self) -> &String {
        &self.phone
    }
    pub fn get_message(&self) -> &String {
        &self.message
    }
    pub fn get_status(&self) -> InvitationStatus {
        self.status
    }
    pub fn get_submitted_at(&self) -> &DateTime<Utc> {
        &self.submitted_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ContactForm;
    use chrono::TimeZone;

    #[test]
    fn display_name_defaults_to_guest() {
        assert_eq!(invitee_display_name(Some("Alice")), "Alice");
        assert_eq!(invitee_display_name(Some("")), "Guest");
        assert_eq!(invitee_display_name(None), "Guest");
    }

    #[test]
    fn declined_record_has_empty_contact_fields() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let record = InvitationRecord::declined("Alice".to_string(), now);
        assert_eq!(record.get_status(), InvitationStatus::Declined);
        assert!(record.get_email().is_empty());
        assert!(record.get_phone().is_empty());
        assert!(record.get_message().is_empty());
        assert_eq!(record.get_submitted_at(), &now);
    }

    #[test]
    fn record_serializes_iso_timestamp_and_status_literal() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 30, 5).unwrap();
        let details = ContactForm::new("a@b.com", "1234567890", "hi")
            .validate()
            .unwrap();
        let record = InvitationRecord::accepted("Guest".to_string(), details, now);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "Accepted");
        assert_eq!(json["submitted_at"], "2026-10-16T12:30:05+00:00");
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["message"], "hi");
    }
}
