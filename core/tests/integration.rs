//! End-to-end calls through `UreqTransport` against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in a background tokio runtime,
//! then drives the blocking client over real HTTP. Covers the default
//! transport, status mapping, header and auth propagation, timeouts, and the
//! free functions backed by the default client.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use httpkit::{global, Client, Context, Error, ErrorKind, Header};
use mock_server::{Created, Echo};
use serde::Serialize;

#[derive(Serialize)]
struct NewItem {
    name: String,
}

/// Start the mock server on a random port and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client() -> Client {
    Client::new(Duration::from_secs(5), None)
}

fn bg() -> Context {
    Context::background()
}

#[test]
fn post_json_returns_created_item() {
    let addr = start_server();
    let item = NewItem {
        name: "a".to_string(),
    };

    let resp = client()
        .post_json(&bg(), &format!("http://{addr}/items"), &item, &[])
        .unwrap();

    assert_eq!(resp.status, 200);
    assert!(resp.header("content-type").unwrap().starts_with("application/json"));
    assert_eq!(resp.text().unwrap(), r#"{"id":1}"#);
}

#[test]
fn not_found_becomes_status_error_with_body() {
    let addr = start_server();
    let item = NewItem {
        name: "a".to_string(),
    };

    let err = client()
        .post_json(&bg(), &format!("http://{addr}/status/404"), &item, &[])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Status);
    assert_eq!(err.status_code(), Some(404));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn only_200_counts_as_success() {
    let addr = start_server();
    let c = client();

    for (code, body) in [(201, "created"), (400, "bad request"), (500, "internal server error")] {
        let err = c
            .get(&bg(), &format!("http://{addr}/status/{code}"), &[])
            .unwrap_err();
        let status = err.as_status().unwrap();
        assert_eq!(status.status_code(), code);
        assert_eq!(status.message(), body);
    }

    let resp = c.get(&bg(), &format!("http://{addr}/status/200"), &[]).unwrap();
    assert_eq!(resp.text().unwrap(), "ok");
}

#[test]
fn headers_reach_the_server_with_repeats() {
    let addr = start_server();
    let headers = [
        Header::new("X-Tag", "a"),
        Header::new("X-Tag", "b"),
        Header::new("X-Request-Id", "42"),
    ];

    let resp = client()
        .put(&bg(), &format!("http://{addr}/echo"), "payload", &headers)
        .unwrap();
    let echo: Echo = resp.json().unwrap();

    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.header_values("x-tag"), vec!["a", "b"]);
    assert_eq!(echo.header_values("x-request-id"), vec!["42"]);
    assert_eq!(echo.body, "payload");
}

#[test]
fn json_helpers_send_content_type_and_auth() {
    let addr = start_server();
    let c = client();
    let url = format!("http://{addr}/echo");

    let echo: Echo = c
        .put_json_with_auth(&bg(), &url, "tok-1", &serde_json::json!({"done": true}), &[])
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.header_values("authorization"), vec!["tok-1"]);
    assert!(echo.header_values("content-type").contains(&"application/json"));
    assert_eq!(echo.body, r#"{"done":true}"#);

    let echo: Echo = c
        .post_json(
            &bg(),
            &url,
            &serde_json::json!({}),
            &[Header::new("Content-Type", "text/plain")],
        )
        .unwrap()
        .json()
        .unwrap();
    let content_types = echo.header_values("content-type");
    assert!(content_types.contains(&"application/json"));
    assert!(!content_types.contains(&"text/plain"));

    let echo: Echo = c.delete_json(&bg(), &url, &[]).unwrap().json().unwrap();
    assert_eq!(echo.method, "DELETE");
    assert!(echo.body.is_empty());
}

#[test]
fn auth_token_is_sent_verbatim() {
    let addr = start_server();
    let url = format!("http://{addr}/auth");

    let resp = client().get_with_auth(&bg(), &url, "abc123", &[]).unwrap();
    assert_eq!(resp.text().unwrap(), "abc123");

    let err = client().get(&bg(), &url, &[]).unwrap_err();
    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.as_status().unwrap().message(), "missing authorization");
}

#[test]
fn caller_content_type_does_not_override_json() {
    let addr = start_server();
    let item = NewItem {
        name: "a".to_string(),
    };

    let created: Created = client()
        .post_json(
            &bg(),
            &format!("http://{addr}/items"),
            &item,
            &[Header::new("Content-Type", "text/plain")],
        )
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(created, Created { id: 1 });
}

#[test]
fn extension_methods_reach_the_server() {
    let addr = start_server();

    let echo: Echo = client()
        .request(&bg(), "PROPFIND", &format!("http://{addr}/echo"), Vec::new(), &[])
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(echo.method, "PROPFIND");
}

#[test]
fn cancel_abandons_an_in_flight_call() {
    let addr = start_server();
    let c = Client::new(Duration::from_secs(10), None);
    let (ctx, token) = bg().with_cancel();

    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        token.cancel();
    });

    let started = Instant::now();
    let err = c
        .get(&ctx, &format!("http://{addr}/slow/3000"), &[])
        .unwrap_err();
    let elapsed = started.elapsed();
    canceller.join().unwrap();

    assert!(elapsed < Duration::from_secs(1), "returned after {elapsed:?}");
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.to_string(), "send request error: context canceled");
    assert!(!err.is_timeout());
}

#[test]
fn cancellable_context_still_returns_responses() {
    let addr = start_server();
    let (ctx, _token) = bg().with_cancel();

    let resp = client()
        .get(&ctx, &format!("http://{addr}/status/200"), &[])
        .unwrap();
    assert_eq!(resp.text().unwrap(), "ok");

    let err = client()
        .get(&ctx, &format!("http://{addr}/status/404"), &[])
        .unwrap_err();
    assert_eq!(err.status_code(), Some(404));
}

#[test]
fn client_timeout_bounds_the_call() {
    let addr = start_server();
    let c = Client::new(Duration::from_millis(200), None);

    let err = c
        .get(&bg(), &format!("http://{addr}/slow/2000"), &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_timeout(), "{err}");
}

#[test]
fn context_deadline_bounds_the_call() {
    let addr = start_server();
    let ctx = bg().with_timeout(Duration::from_millis(200));

    let err = client()
        .get(&ctx, &format!("http://{addr}/slow/2000"), &[])
        .unwrap_err();
    assert!(matches!(err, Error::Send(_)));
    assert!(err.is_timeout(), "{err}");
}

#[test]
fn connection_refused_is_a_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let err = client()
        .get(&bg(), &format!("http://{addr}/echo"), &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().starts_with("send request error: "));
}

#[test]
fn free_functions_use_the_default_client() {
    let addr = start_server();
    let item = NewItem {
        name: "b".to_string(),
    };

    let created: Created = global::post_json(&bg(), &format!("http://{addr}/items"), &item, &[])
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(created, Created { id: 1 });

    let echo: Echo = global::get_json_with_auth(&bg(), &format!("http://{addr}/echo"), "t", &[])
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.header_values("authorization"), vec!["t"]);

    let err = global::delete(&bg(), &format!("http://{addr}/status/204"), &[]).unwrap_err();
    assert_eq!(err.status_code(), Some(204));
}
