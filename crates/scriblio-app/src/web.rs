//! WebAssembly entry point and platform-specific code.
//!
//! The browser build has two routes: the landing view at `/` (create a new
//! board) and the canvas view at `/board/:boardId`. Board ids are generated
//! client-side and carry no server-side meaning.

use scriblio_core::board::BoardId;
use wasm_bindgen::prelude::*;

/// Client-side route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Board-creation landing view.
    Landing,
    /// Canvas view for a board.
    Board(BoardId),
}

/// Parse a location pathname into a route.
///
/// Anything that is not a well-formed `/board/:id` path falls back to the
/// landing view.
pub fn parse_route(pathname: &str) -> Route {
    let mut segments = pathname.split('/').filter(|s| !s.is_empty());
    match (segments.next(), segments.next(), segments.next()) {
        (Some("board"), Some(id), None) => match BoardId::parse(id) {
            Some(board_id) => Route::Board(board_id),
            None => Route::Landing,
        },
        _ => Route::Landing,
    }
}

/// Read the current route from the browser location.
pub fn current_route() -> Route {
    let Some(window) = web_sys::window() else {
        return Route::Landing;
    };
    match window.location().pathname() {
        Ok(path) => parse_route(&path),
        Err(_) => Route::Landing,
    }
}

/// The full URL of the current page (what Share Board copies).
pub fn current_url() -> Option<String> {
    web_sys::window()?.location().href().ok()
}

/// Push a board path onto the history so the URL is shareable.
pub fn navigate_to_board(id: &BoardId) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(&id.path())) {
        log::warn!("Failed to push board URL: {:?}", e);
    }
}

/// Write text to the clipboard via the async browser API.
///
/// Fire-and-forget: failures are logged, never surfaced as errors.
pub fn write_clipboard(text: String) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let clipboard = window.navigator().clipboard();
    wasm_bindgen_futures::spawn_local(async move {
        let promise = clipboard.write_text(&text);
        if wasm_bindgen_futures::JsFuture::from(promise).await.is_err() {
            log::warn!("Clipboard write failed");
        }
    });
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(log::Level::Info).expect("Failed to initialize logger");

    log::info!("Starting Scriblio (WASM)");

    match current_route() {
        Route::Landing => log::info!("Route: landing"),
        Route::Board(ref id) => log::info!("Route: board {}", id),
    }

    crate::App::run().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_board_route() {
        let route = parse_route("/board/k3j9x0a1zq");
        assert_eq!(
            route,
            Route::Board(BoardId::parse("k3j9x0a1zq").unwrap())
        );
    }

    #[test]
    fn test_parse_landing_routes() {
        assert_eq!(parse_route("/"), Route::Landing);
        assert_eq!(parse_route(""), Route::Landing);
        assert_eq!(parse_route("/about"), Route::Landing);
        assert_eq!(parse_route("/board/"), Route::Landing);
        assert_eq!(parse_route("/board/NOT-VALID"), Route::Landing);
        assert_eq!(parse_route("/board/abc/extra"), Route::Landing);
    }
}
