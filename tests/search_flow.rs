use serde_json::json;
use std::collections::BTreeMap;
use zsplash::api::HttpRequest;
use zsplash::worker::{WorkerMessage, WorkerResponse};
use zsplash::{handle_event, initialize, Action, AppState, Config, Event, Focus, Route};

const USER: &str = r#"{"user": {"_id": "u1", "name": "Ann", "email": "ann@example.com"}}"#;

fn plugin() -> AppState {
    let mut state = initialize(&Config {
        api_url: "https://api.test/api/".to_string(),
        ..Config::default()
    });
    send(&mut state, Event::Resized { rows: 24, cols: 80 });
    state
}

fn send(state: &mut AppState, event: Event) -> Vec<Action> {
    handle_event(state, &event).unwrap().1
}

fn requests(actions: &[Action]) -> Vec<HttpRequest> {
    actions
        .iter()
        .filter_map(|action| match action {
            Action::WebRequest(request) => Some(request.clone()),
            _ => None,
        })
        .collect()
}

fn respond(state: &mut AppState, request: &HttpRequest, status: u16, body: &str) -> Vec<Action> {
    send(
        state,
        Event::HttpResponse {
            status,
            headers: BTreeMap::new(),
            body: body.as_bytes().to_vec(),
            context: request.context.clone(),
        },
    )
}

fn type_text(state: &mut AppState, text: &str) {
    for c in text.chars() {
        send(state, Event::Char(c));
    }
}

fn page(number: u32, size: usize) -> String {
    let images: Vec<_> = (0..size)
        .map(|i| {
            json!({
                "id": format!("p{number}-{i}"),
                "thumb": format!("https://img.test/p{number}-{i}.jpg"),
                "alt": format!("cat {i}"),
                "author": "Ann",
            })
        })
        .collect();
    json!({
        "term": "cats",
        "images": images,
        "total": 50,
        "currentPage": number,
        "totalPages": 3,
    })
    .to_string()
}

/// Moves the grid cursor down until a request is issued, returning it.
fn scroll_until_request(state: &mut AppState) -> Option<HttpRequest> {
    for _ in 0..state.search.images().len() {
        let sent = requests(&send(state, Event::CursorDown));
        if let Some(request) = sent.into_iter().next() {
            return Some(request);
        }
    }
    None
}

fn sign_in(state: &mut AppState, cookie: Option<&str>) -> Vec<Action> {
    let actions = send(state, Event::PermissionsResult { granted: true });
    assert_eq!(actions, vec![Action::PostToWorker(WorkerMessage::load_session())]);

    let actions = send(
        state,
        Event::WorkerResponse(WorkerResponse::SessionLoaded {
            cookie: cookie.map(String::from),
        }),
    );
    let probe = requests(&actions).remove(0);
    assert_eq!(probe.url, "https://api.test/api/auth/user");
    respond(state, &probe, 200, USER)
}

#[test]
fn cats_scenario_accumulates_three_pages() {
    let mut state = plugin();
    let home = requests(&sign_in(&mut state, Some("connect.sid=abc")));
    assert!(state.home_ready());
    assert_eq!(home.len(), 2);
    assert!(home
        .iter()
        .all(|request| request.headers.get("Cookie").map(String::as_str) == Some("connect.sid=abc")));

    respond(&mut state, &home[0], 200, r#"[{"term": "cats", "count": 3}]"#);
    respond(
        &mut state,
        &home[1],
        200,
        r#"[{"_id": "h1", "term": "dogs", "timestamp": "2024-03-20T11:00:00.000Z"}]"#,
    );
    assert_eq!(state.top_searches.len(), 1);
    assert_eq!(state.history.len(), 1);

    assert_eq!(state.focus, Focus::SearchInput);
    type_text(&mut state, "cats");
    let search = requests(&send(&mut state, Event::Submit)).remove(0);
    assert!(search.url.ends_with("/search"));
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&search.body).unwrap(),
        json!({"term": "cats", "page": 1})
    );

    let actions = respond(&mut state, &search, 200, &page(1, 20));
    assert_eq!(state.search.images().len(), 20);
    assert!(state.search.has_more());
    assert_eq!(state.focus, Focus::Results);
    assert_eq!(requests(&actions).len(), 1, "only the history refresh is sent");

    let second = scroll_until_request(&mut state).expect("page 2 is requested while scrolling");
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&second.body).unwrap(),
        json!({"term": "cats", "page": 2})
    );
    assert!(scroll_until_request(&mut state).is_none(), "no second fetch while one is in flight");

    respond(&mut state, &second, 200, &page(2, 20));
    assert_eq!(state.search.images().len(), 40);
    assert!(state.search.has_more());

    let third = scroll_until_request(&mut state).expect("page 3 is requested while scrolling");
    respond(&mut state, &third, 200, &page(3, 10));
    assert_eq!(state.search.images().len(), 50);
    assert!(!state.search.has_more());
    assert_eq!(state.search.images()[40].id, "p3-0");

    assert!(scroll_until_request(&mut state).is_none());
    assert_eq!(state.cursor, 49);
}

#[test]
fn selection_survives_paging_and_resets_on_new_search() {
    let mut state = plugin();
    let home = requests(&sign_in(&mut state, Some("connect.sid=abc")));
    for request in &home {
        respond(&mut state, request, 200, "[]");
    }

    type_text(&mut state, "cats");
    let search = requests(&send(&mut state, Event::Submit)).remove(0);
    respond(&mut state, &search, 200, &page(1, 20));

    send(&mut state, Event::ToggleSelection);
    send(&mut state, Event::CursorDown);
    send(&mut state, Event::Submit);
    assert_eq!(state.search.selection_len(), 2);

    send(&mut state, Event::ToggleSelection);
    assert_eq!(state.search.selection_len(), 1);

    send(&mut state, Event::FocusSearch);
    type_text(&mut state, "dogs");
    let search = requests(&send(&mut state, Event::Submit)).remove(0);
    respond(&mut state, &search, 200, &page(1, 5));
    assert_eq!(state.search.selection_len(), 0);
    assert_eq!(state.search.images().len(), 5);
}

#[test]
fn pasted_cookie_signs_in_from_login_view() {
    let mut state = plugin();
    let actions = send(&mut state, Event::PermissionsResult { granted: true });
    assert_eq!(actions.len(), 1);

    let actions = send(
        &mut state,
        Event::WorkerResponse(WorkerResponse::SessionLoaded { cookie: None }),
    );
    let probe = requests(&actions).remove(0);
    assert!(!probe.headers.contains_key("Cookie"));

    let actions = respond(&mut state, &probe, 401, "");
    let refresh = requests(&actions).remove(0);
    let actions = respond(&mut state, &refresh, 401, "");
    assert_eq!(state.route, Route::Login);
    let login_probe = requests(&actions).remove(0);

    let actions = send(&mut state, Event::Submit);
    assert!(matches!(&actions[..], [Action::OpenUrl(url)] if url == "https://api.test/api/auth/google"));
    assert_eq!(state.focus, Focus::CookieInput);

    type_text(&mut state, "connect.sid=xyz");
    let actions = send(&mut state, Event::Submit);
    assert_eq!(
        actions[0],
        Action::PostToWorker(WorkerMessage::save_session("connect.sid=xyz".to_string()))
    );
    let verify = requests(&actions).remove(0);
    assert_eq!(verify.headers.get("Cookie").map(String::as_str), Some("connect.sid=xyz"));

    // the probe issued when the login view mounted settles late and is ignored
    let actions = respond(&mut state, &login_probe, 401, "");
    let late_refresh = requests(&actions).remove(0);
    let actions = respond(&mut state, &late_refresh, 401, "");
    assert!(actions.is_empty());
    assert_eq!(state.route, Route::Login);
    assert!(state.login.verifying);

    let actions = respond(&mut state, &verify, 200, USER);
    assert_eq!(state.route, Route::Home);
    let home_probe = requests(&actions).remove(0);
    respond(&mut state, &home_probe, 200, USER);
    assert!(state.home_ready());
}
