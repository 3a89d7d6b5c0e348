use crate::{
    config::ProjectContent, registration_manager::CookieConfig, session::RegistrationState,
    validation::ContactForm,
};
use axum::{
    body::Body,
    http::{
        header::{CACHE_CONTROL, CONTENT_SECURITY_POLICY, CONTENT_TYPE, SET_COOKIE},
        response::Builder,
        StatusCode,
    },
    response::{IntoResponse, Response},
};
use chrono::Duration;
use cookie::{CookieBuilder, SameSite};
use std::fmt::Write;
use tracing::warn;
use uuid::Uuid;

pub const FORM_OPENED: &str = "Please complete the registration form.";
pub const DECLINE_RECORDED: &str = "Your response has been recorded.";
pub const REGISTRATION_SUCCESSFUL: &str = "Registration successful. Thank you!";
pub const SUBMISSION_FAILED: &str = "Your submission could not be saved. Please try again.";
pub const ACTION_UNAVAILABLE: &str = "That action is no longer available.";

fn create_baseline_response() -> Builder {
    let csp_data: &str = "default-src 'none'; \
        style-src 'unsafe-inline'; \
        img-src 'self'; \
        form-action 'self'; \
        frame-ancestors 'none'; \
        base-uri 'none'";
    Response::builder()
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_SECURITY_POLICY, csp_data)
        .header(CACHE_CONTROL, "no-store")
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    None,
    ContactFormOpened,
    Errors(Vec<String>),
    SubmissionFailed,
    ActionUnavailable,
}

pub struct Page<'a> {
    project: &'a ProjectContent,
    invitee: &'a str,
    state: RegistrationState,
    notice: Notice,
    form: Option<ContactForm>,
}

impl<'a> Page<'a> {
    pub fn new(
        project: &'a ProjectContent,
        invitee: &'a str,
        state: RegistrationState,
        notice: Notice,
    ) -> Self {
        Self {
            project,
            invitee,
            state,
            notice,
            form: None,
        }
    }

    ///Prefills the contact form, used when it is shown again with errors.
    pub fn with_form(mut self, form: ContactForm) -> Self {
        self.form = Some(form);
        self
    }

    pub fn render(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{page_title}</title>\n</head>\n<body>\n<main>\n\
             <h1>{title}</h1>\n<h2>{subtitle}</h2>\n",
            page_title = escape_html(&self.project.page_title),
            title = escape_html(&self.project.title),
            subtitle = escape_html(&self.project.subtitle),
        );
        let _ = write!(
            html,
            "<p class=\"invitee\">Hello, <strong>{invitee}</strong>!</p>\n\
             <p>Welcome to the official registration portal for <strong>{title}</strong>.</p>\n\
             <p>If you're interested in collaborating on this robotics initiative, \
             please submit your details below.</p>\n",
            invitee = escape_html(self.invitee),
            title = escape_html(&self.project.title),
        );
        let _ = write!(
            html,
            "<section>\n<h3>About the Project</h3>\n<p>{title} focuses on designing and developing \
             a modular multi-legged robotic system integrating:</p>\n<ul>\n\
             <li>Robotics engineering</li>\n<li>Embedded systems</li>\n\
             <li>Intelligent control systems</li>\n<li>Real-time decision-making</li>\n</ul>\n\
             </section>\n",
            title = escape_html(&self.project.title),
        );

        html.push_str("<section>\n<h3>Your Response</h3>\n");
        self.render_notice(&mut html);
        match self.state {
            RegistrationState::Initial => html.push_str(
                "<form method=\"post\" action=\"/decline\">\
                 <button type=\"submit\">Not Interested</button></form>\n\
                 <form method=\"post\" action=\"/accept\">\
                 <button type=\"submit\">Register / Accept Invitation</button></form>\n",
            ),
            RegistrationState::AwaitingContactDetails => self.render_contact_form(&mut html),
            RegistrationState::DeclinedSubmitted => {
                let _ = writeln!(html, "<p class=\"success\">{}</p>", DECLINE_RECORDED);
                html.push_str("</section>\n</main>\n</body>\n</html>\n");
                return html;
            }
            RegistrationState::AcceptedSubmitted => {
                let _ = writeln!(html, "<p class=\"success\">{}</p>", REGISTRATION_SUCCESSFUL);
            }
        }
        html.push_str("</section>\n");

        let _ = write!(
            html,
            "<hr>\n<footer><small>Project Lead: {lead} | {title}</small></footer>\n\
             </main>\n</body>\n</html>\n",
            lead = escape_html(&self.project.lead),
            title = escape_html(&self.project.title),
        );
        html
    }

    fn render_notice(&self, html: &mut String) {
        match &self.notice {
            Notice::None => {}
            Notice::ContactFormOpened => {
                let _ = writeln!(html, "<p class=\"success\">{}</p>", FORM_OPENED);
            }
            Notice::Errors(errors) => {
                html.push_str("<ul class=\"errors\">\n");
                for error in errors {
                    let _ = writeln!(html, "<li class=\"error\">{}</li>", escape_html(error));
                }
                html.push_str("</ul>\n");
            }
            Notice::SubmissionFailed => {
                let _ = writeln!(html, "<p class=\"error\">{}</p>", SUBMISSION_FAILED);
            }
            Notice::ActionUnavailable => {
                let _ = writeln!(html, "<p class=\"error\">{}</p>", ACTION_UNAVAILABLE);
            }
        }
    }

    fn render_contact_form(&self, html: &mut String) {
        let form = self.form.to_owned().unwrap_or_default();
        let _ = write!(
            html,
            "<form method=\"post\" action=\"/register\">\n\
             <label>Email Address *<input type=\"email\" name=\"email\" value=\"{email}\"></label>\n\
             <label>Phone Number * (10 digits)<input type=\"tel\" name=\"phone\" value=\"{phone}\"></label>\n\
             <label>Optional Message<textarea name=\"message\">{message}</textarea></label>\n\
             <button type=\"submit\">Submit Registration</button>\n</form>\n",
            email = escape_html(&form.email),
            phone = escape_html(&form.phone),
            message = escape_html(&form.message),
        );
    }
}

pub struct PageResponse {
    status: StatusCode,
    html: String,
    cookie: Option<String>,
}

impl PageResponse {
    pub fn new(status: StatusCode, page: &Page) -> Self {
        Self {
            status,
            html: page.render(),
            cookie: None,
        }
    }

    ///Attaches the session cookie.
    pub fn with_session(
        mut self,
        cookie: &CookieConfig,
        session_id: &Uuid,
        lifetime: Duration,
    ) -> Self {
        self.cookie = Some(
            CookieBuilder::new(cookie.get_name().to_owned(), session_id.to_string())
                .http_only(true)
                .secure(cookie.is_secure())
                .path("/")
                .same_site(SameSite::Lax)
                .max_age(cookie::time::Duration::seconds(lifetime.num_seconds()))
                .build()
                .to_string(),
        );
        self
    }
}

impl IntoResponse for PageResponse {
    fn into_response(self) -> Response {
        let mut response_builder = create_baseline_response().status(self.status);
        if let Some(cookie) = self.cookie {
            response_builder = response_builder.header(SET_COOKIE, cookie);
        }
        match response_builder.body(Body::from(self.html)) {
            Ok(response) => response,
            Err(err) => {
                warn!("{err}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
