use core::fmt;
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration as StdDuration,
};

use axum::{
    routing::{get, post},
    Extension, Router,
};
use chrono::Duration;
use tokio::{net::TcpListener, sync::Notify};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::{
    config::{validate_session_lifetime, Config, ProjectContent},
    error::{Error, StartupError, StdIoError},
    r#trait::InvitationGateway,
    registration_manager::{CookieConfig, RegistrationManager},
    routes::{
        base::health_route,
        registration::{accept_route, decline_route, index_route, register_route},
    },
};

pub struct Signals {
    pub stop: Arc<AtomicBool>,
    pub stop_notify: Arc<Notify>,
}

impl Signals {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.stop_notify.notify_waiters();
    }

    pub fn stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub enum RequiredProperties {
    BindAddress,
    Gateway,
}

impl fmt::Display for RequiredProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::BindAddress => "BindAddress",
                Self::Gateway => "Gateway",
            }
        )
    }
}

pub fn build_router(registration_manager: Arc<RegistrationManager>) -> Router {
    Router::new()
        .route("/", get(index_route))
        .route("/decline", post(decline_route))
        .route("/accept", post(accept_route))
        .route("/register", post(register_route))
        .route("/health", get(health_route))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(registration_manager))
}

async fn start_server(registration_server: Arc<RegistrationServer>, listener: TcpListener) {
    let app = build_router(registration_server.registration_manager.to_owned());

    tokio::select! {
        result = async { axum::serve(listener, app).await } => {
            if let Err(err) = result {
                error!("{}", err);
            }
        }
        _ = registration_server.signals.stop_notify.notified() => {},
    }
    info!("REST endpoint stopped");
}

async fn sweep_sessions(registration_server: Arc<RegistrationServer>, interval: StdDuration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = registration_server.registration_manager.remove_expired_sessions();
                if removed > 0 {
                    debug!("Removed {} expired sessions", removed);
                }
            }
            _ = registration_server.signals.stop_notify.notified() => break,
        }
        if registration_server.signals.stopped() {
            break;
        }
    }
}

pub struct Builder {
    //required
    bind_address: Option<SocketAddr>,
    gateway: Option<Arc<dyn InvitationGateway>>,

    //optional
    cookie_name: String,
    secure_cookies: bool,
    session_lifetime_seconds: i64,
    session_sweep_interval_seconds: u64,
    project: ProjectContent,
    stop: Option<Arc<AtomicBool>>,
    stop_notify: Option<Arc<Notify>>,
}

impl Default for Builder {
    fn default() -> Self {
        let config = Config::default();
        Self {
            bind_address: None,
            gateway: None,
            cookie_name: config.cookie_name,
            secure_cookies: config.secure_cookies,
            session_lifetime_seconds: config.session_lifetime_seconds,
            session_sweep_interval_seconds: config.session_sweep_interval_seconds,
            project: config.project,
            stop: None,
            stop_notify: None,
        }
    }
}

impl Builder {
    ///Copies every server setting from `config`; the gateway is still required.
    pub fn config(mut self, config: &Config) -> Result<Self, Error> {
        self.bind_address = Some(config.socket_addr()?);
        self.cookie_name = config.cookie_name.to_owned();
        self.secure_cookies = config.secure_cookies;
        self.session_lifetime_seconds = config.session_lifetime_seconds;
        self.session_sweep_interval_seconds = config.session_sweep_interval_seconds;
        self.project = config.project.to_owned();
        Ok(self)
    }

    pub fn bind_address(mut self, bind_address: SocketAddr) -> Self {
        self.bind_address = Some(bind_address);
        self
    }

    pub fn gateway(mut self, gateway: Arc<dyn InvitationGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn cookie_name(mut self, cookie_name: String) -> Self {
        self.cookie_name = cookie_name;
        self
    }

    pub fn secure_cookies(mut self, secure_cookies: bool) -> Self {
        self.secure_cookies = secure_cookies;
        self
    }

    pub fn session_lifetime_seconds(mut self, session_lifetime_seconds: i64) -> Self {
        self.session_lifetime_seconds = session_lifetime_seconds;
        self
    }

    pub fn project(mut self, project: ProjectContent) -> Self {
        self.project = project;
        self
    }

    pub fn stop(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn stop_notify(mut self, stop_notify: Arc<Notify>) -> Self {
        self.stop_notify = Some(stop_notify);
        self
    }

    fn into_parts(
        self,
    ) -> Result<(SocketAddr, Arc<RegistrationManager>, Signals, StdDuration), Error> {
        let mut missing_properties: Vec<RequiredProperties> = Vec::new();
        if self.bind_address.is_none() {
            missing_properties.push(RequiredProperties::BindAddress);
        }
        if self.gateway.is_none() {
            missing_properties.push(RequiredProperties::Gateway);
        }
        let (bind_address, gateway) = match (self.bind_address, self.gateway) {
            (Some(bind_address), Some(gateway)) => (bind_address, gateway),
            _ => {
                return Err(StartupError::MissingProperties(format!(
                    "{:?}",
                    missing_properties
                ))
                .into())
            }
        };
        validate_session_lifetime(self.session_lifetime_seconds)?;
        let registration_manager = Arc::new(RegistrationManager::new(
            gateway,
            CookieConfig::new(self.cookie_name, self.secure_cookies),
            self.project,
            Duration::seconds(self.session_lifetime_seconds),
        ));
        let signals = Signals {
            stop: self.stop.unwrap_or(Arc::new(AtomicBool::new(false))),
            stop_notify: self.stop_notify.unwrap_or(Arc::new(Notify::new())),
        };
        Ok((
            bind_address,
            registration_manager,
            signals,
            StdDuration::from_secs(self.session_sweep_interval_seconds.max(1)),
        ))
    }

    pub async fn start_server(self) -> Result<Arc<RegistrationServer>, Error> {
        let (bind_address, registration_manager, signals, sweep_interval) = self.into_parts()?;
        let listener = match TcpListener::bind(bind_address).await {
            Ok(listener) => listener,
            Err(err) => return Err(StartupError::BindListener(StdIoError(err)).into()),
        };
        let local_addr = listener.local_addr().unwrap_or(bind_address);
        info!("REST endpoint listening on {}", local_addr);

        let registration_server: Arc<RegistrationServer> = Arc::new(RegistrationServer {
            registration_manager,
            signals,
            local_addr,
        });

        let registration_server_ = registration_server.to_owned();
        tokio::spawn(async move { start_server(registration_server_, listener).await });
        let registration_server_ = registration_server.to_owned();
        tokio::spawn(async move { sweep_sessions(registration_server_, sweep_interval).await });

        Ok(registration_server)
    }
}

pub struct RegistrationServer {
    pub registration_manager: Arc<RegistrationManager>,
    pub signals: Signals,
    local_addr: SocketAddr,
}

impl RegistrationServer {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}
