use crate::{
    error::{Error, RegistrationError},
    invitation::InvitationRecord,
    r#trait::InvitationGateway,
    session::RegistrationState,
    validation::{ContactForm, FieldError},
};
use chrono::{DateTime, Utc};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Decline,
    Accept,
    Submit(ContactForm),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Decline => "Decline",
            Self::Accept => "Accept",
            Self::Submit(_) => "Submit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Declined(InvitationRecord),
    ContactFormOpened,
    Rejected {
        form: ContactForm,
        errors: Vec<FieldError>,
    },
    Registered(InvitationRecord),
}

/// Applies one visitor action to a session in `state`.
///
/// Returns the next state together with what happened. An `Err` never comes
/// with a state change: the caller keeps `state` as it was. Declining and a
/// valid submission each perform exactly one `insert`; everything else
/// performs none.
pub fn apply(
    state: RegistrationState,
    invitee: &str,
    action: Action,
    gateway: &dyn InvitationGateway,
    now: DateTime<Utc>,
) -> Result<(RegistrationState, Outcome), Error> {
    match (state, action) {
        (RegistrationState::Initial, Action::Decline) => {
            let record = InvitationRecord::declined(invitee.to_owned(), now);
            gateway.insert(&record)?;
            info!("Invitation declined by {}", invitee);
            Ok((RegistrationState::DeclinedSubmitted, Outcome::Declined(record)))
        }
        (
            RegistrationState::Initial | RegistrationState::AwaitingContactDetails,
            Action::Accept,
        ) => Ok((
            RegistrationState::AwaitingContactDetails,
            Outcome::ContactFormOpened,
        )),
        (RegistrationState::AwaitingContactDetails, Action::Submit(form)) => {
            match form.validate() {
                Ok(details) => {
                    let record = InvitationRecord::accepted(invitee.to_owned(), details, now);
                    gateway.insert(&record)?;
                    info!("Invitation accepted by {}", invitee);
                    Ok((
                        RegistrationState::AcceptedSubmitted,
                        Outcome::Registered(record),
                    ))
                }
                Err(errors) => Ok((
                    RegistrationState::AwaitingContactDetails,
                    Outcome::Rejected { form, errors },
                )),
            }
        }
        (state, action) => Err(Error::Registration(
            RegistrationError::ActionNotAvailable {
                action: action.name(),
                state,
            },
        )),
    }
}
