//! HTTP server for the course browser.
//!
//! Requests are dispatched on [`Route`]: pages are rendered per session,
//! `/api/*` returns JSON, anything else is looked up under the content root.

mod lifecycle;
mod response;

use crate::{
    app::App,
    config::cfg,
    core::Route,
    debug, log, page,
    session::{SESSION_COOKIE, SessionHandle, SessionStore, session_id_from_cookie},
    utils::{mime::types::CSS, text::plural_count},
};
use anyhow::{Context, Result};
use crossbeam::channel::{self, Sender};
use response::Cookie;
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    workers: usize,
}

/// Bind the HTTP server without starting the request loop
pub fn bind_server() -> Result<BoundServer> {
    let config = cfg();
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server_for_shutdown(Arc::clone(&server));

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        workers: config.serve.workers,
    })
}

impl BoundServer {
    /// Start the request loop (blocking). Returns after Ctrl+C once
    /// in-flight requests have finished.
    pub fn run(self, app: Arc<App>) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("syllabus-worker-{i}"))
            .build()
            .context("failed to create thread pool")?;

        let (done_tx, done_rx) = channel::unbounded::<()>();
        run_request_loop(&self.server, &pool, &app, &done_tx);

        drop(done_tx);
        lifecycle::wait_for_drain(done_rx);
        log!(
            "serve";
            "stopped ({}, {} cached)",
            plural_count(app.sessions.len(), "session"),
            plural_count(app.metadata.len(), "metadata lookup")
        );
        Ok(())
    }
}

fn run_request_loop(server: &Server, pool: &rayon::ThreadPool, app: &Arc<App>, done: &Sender<()>) {
    for request in server.incoming_requests() {
        let app = Arc::clone(app);
        // Held until the request finishes; the drain waits for every clone
        let guard = done.clone();
        pool.spawn(move || {
            let url = request.url().to_string();
            if let Err(e) = handle_request(request, &app) {
                log!("serve"; "request error for {}: {:#}", url, e);
            }
            drop(guard);
        });
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, app: &App) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }
    if !response::is_read_request(&request) {
        return response::respond_method_not_allowed(request);
    }

    let route = Route::parse(request.url());
    debug!("serve"; "{} {} -> {:?}", request.method(), request.url(), route);

    // Static files and the stylesheet do not need a session
    match &route {
        Route::Stylesheet => {
            return response::respond_embedded(request, CSS, crate::embed::serve::STYLE_CSS);
        }
        Route::Resource(path) => {
            if let Some(file) = app.root.locate_url(path) {
                return response::respond_file(request, &file);
            }
        }
        _ => {}
    }

    let (session, cookie) = session_for(&request, app, &route);

    match route {
        Route::Home => response::respond_page(request, page::home(app, &session), cookie),
        Route::Course { id } => {
            response::respond_page(request, page::course(app, &session, &id), cookie)
        }
        Route::File { target, view } => {
            response::respond_page(request, page::file(app, &session, &target, view), cookie)
        }
        Route::Toggle { week, back, .. } => {
            page::toggle_week(&session, &week);
            response::respond_redirect(request, &back, cookie)
        }
        Route::ApiCatalog => {
            let body = serde_json::to_vec(app.catalog.as_ref())?;
            response::respond_json(request, body, cookie)
        }
        Route::ApiSession => {
            let snapshot = session.lock().snapshot();
            let body = serde_json::to_vec(&snapshot)?;
            response::respond_json(request, body, cookie)
        }
        Route::Resource(path) => {
            let page = page::path_not_found(app, &session, &path);
            response::respond_page(request, page, cookie)
        }
        Route::Stylesheet => unreachable!("handled before session lookup"),
    }
}

/// Routes that change session state. Only these create sessions.
fn writes_session(route: &Route) -> bool {
    matches!(
        route,
        Route::Course { .. } | Route::File { .. } | Route::Toggle { .. }
    )
}

/// Find the request's session.
///
/// Read-only routes never store a new session: without a known cookie they
/// render from a transient one. Other routes create one (and its cookie)
/// when needed.
fn session_for(request: &Request, app: &App, route: &Route) -> (SessionHandle, Cookie) {
    let cookie_id = request
        .headers()
        .iter()
        .filter(|h| h.field.equiv("Cookie"))
        .find_map(|h| session_id_from_cookie(h.value.as_str()));

    if !writes_session(route) {
        let session = cookie_id
            .and_then(|id| app.sessions.lookup(id))
            .unwrap_or_else(SessionStore::transient);
        return (session, None);
    }

    let (id, session, created) = app.sessions.obtain(cookie_id);
    if created {
        debug!("session"; "new session {} ({} live)", id, app.sessions.len());
    }
    let cookie = created.then(|| session_cookie(&id));
    (session, cookie)
}

fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}
