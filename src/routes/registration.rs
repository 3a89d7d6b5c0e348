use crate::{
    error::{Error, RegistrationError},
    flows::registration::{Action, Outcome},
    registration_manager::RegistrationManager,
    response::{Notice, Page, PageResponse},
    session::Session,
    validation::ContactForm,
};
use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::{headers::Cookie, TypedHeader};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct InviteQuery {
    pub invite: Option<String>,
}

fn session_id_from_cookies(
    cookies: &Option<TypedHeader<Cookie>>,
    cookie_name: &str,
) -> Option<Uuid> {
    let TypedHeader(cookies) = cookies.as_ref()?;
    Uuid::parse_str(cookies.get(cookie_name)?).ok()
}

pub async fn index_route(
    Extension(registration_manager): Extension<Arc<RegistrationManager>>,
    cookies: Option<TypedHeader<Cookie>>,
    Query(query): Query<InviteQuery>,
) -> impl IntoResponse {
    let existing = session_id_from_cookies(&cookies, registration_manager.cookie.get_name());
    let (session_id, session) = registration_manager.view(existing, query.invite.as_deref());
    if existing != Some(session_id) {
        info!("Opened session {} for {}", session_id, session.get_invitee());
    }
    let page = Page::new(
        &registration_manager.project,
        session.get_invitee(),
        session.get_state(),
        Notice::None,
    );
    PageResponse::new(StatusCode::OK, &page).with_session(
        &registration_manager.cookie,
        &session_id,
        registration_manager.get_session_lifetime(),
    )
}

async fn perform_action(
    registration_manager: Arc<RegistrationManager>,
    session_id: Uuid,
    action: Action,
) -> Result<(Session, Outcome), Error> {
    match tokio::task::spawn_blocking(move || registration_manager.perform(&session_id, action))
        .await
    {
        Ok(result) => result,
        Err(err) => Err(Error::Registration(
            RegistrationError::BlockingTaskFailed(err.to_string()),
        )),
    }
}

/// Shared tail of every POST: runs the action and renders whatever the
/// session looks like afterwards.
///
/// `retained_form` is shown again if the submission could not be saved.
async fn action_route(
    registration_manager: Arc<RegistrationManager>,
    cookies: Option<TypedHeader<Cookie>>,
    action: Action,
    retained_form: Option<ContactForm>,
) -> Response {
    let session_id = match session_id_from_cookies(&cookies, registration_manager.cookie.get_name())
    {
        Some(session_id) => session_id,
        None => return Redirect::to("/").into_response(),
    };
    match perform_action(registration_manager.to_owned(), session_id, action).await {
        Ok((session, outcome)) => {
            let (status, notice, form) = match outcome {
                Outcome::Declined(_) | Outcome::Registered(_) => (StatusCode::OK, Notice::None, None),
                Outcome::ContactFormOpened => (StatusCode::OK, Notice::ContactFormOpened, None),
                Outcome::Rejected { form, errors } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Notice::Errors(errors.iter().map(|error| error.to_string()).collect()),
                    Some(form),
                ),
            };
            let mut page = Page::new(
                &registration_manager.project,
                session.get_invitee(),
                session.get_state(),
                notice,
            );
            if let Some(form) = form {
                page = page.with_form(form);
            }
            PageResponse::new(status, &page).into_response()
        }
        Err(err) => {
            warn!("{}", err);
            let (status, notice) = match err {
                Error::Registration(RegistrationError::SessionNotFound) => {
                    return Redirect::to("/").into_response()
                }
                Error::Registration(RegistrationError::ActionNotAvailable { .. }) => {
                    (StatusCode::CONFLICT, Notice::ActionUnavailable)
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, Notice::SubmissionFailed),
            };
            let session: Session = match registration_manager.session(&session_id) {
                Some(session) => session,
                None => return Redirect::to("/").into_response(),
            };
            let mut page = Page::new(
                &registration_manager.project,
                session.get_invitee(),
                session.get_state(),
                notice,
            );
            if let Some(form) = retained_form {
                page = page.with_form(form);
            }
            PageResponse::new(status, &page).into_response()
        }
    }
}

pub async fn decline_route(
    Extension(registration_manager): Extension<Arc<RegistrationManager>>,
    cookies: Option<TypedHeader<Cookie>>,
) -> Response {
    action_route(registration_manager, cookies, Action::Decline, None).await
}

pub async fn accept_route(
    Extension(registration_manager): Extension<Arc<RegistrationManager>>,
    cookies: Option<TypedHeader<Cookie>>,
) -> Response {
    action_route(registration_manager, cookies, Action::Accept, None).await
}

pub async fn register_route(
    Extension(registration_manager): Extension<Arc<RegistrationManager>>,
    cookies: Option<TypedHeader<Cookie>>,
    Form(contact_form): Form<ContactForm>,
) -> Response {
    let retained_form = contact_form.to_owned();
    action_route(
        registration_manager,
        cookies,
        Action::Submit(contact_form),
        Some(retained_form),
    )
    .await
}
