//! Full round trip against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then executes requests built by
//! `ApiCore` over real HTTP using ureq. Validates that the core's request
//! building and response parsing work end-to-end with the actual server.

use api_core::{
    ApiCore, ApiError, HelloMessage, HttpMethod, HttpRequest, HttpResponse, RequestOptions,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u64,
    name: String,
}

#[derive(Debug, Serialize)]
struct NewUser<'a> {
    name: &'a str,
}

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let result = match req.method {
        HttpMethod::Get | HttpMethod::Delete => {
            let mut builder = if req.method == HttpMethod::Get {
                agent.get(&req.url)
            } else {
                agent.delete(&req.url)
            };
            for (name, value) in &req.headers {
                builder = builder.header(name, value);
            }
            builder.call()
        }
        HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
            let mut builder = match req.method {
                HttpMethod::Post => agent.post(&req.url),
                HttpMethod::Put => agent.put(&req.url),
                _ => agent.patch(&req.url),
            };
            for (name, value) in &req.headers {
                builder = builder.header(name, value);
            }
            match &req.body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    };
    let mut response = result.expect("HTTP transport error");

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers,
        body,
    }
}

fn start_server() -> std::net::SocketAddr {
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

#[test]
fn crud_lifecycle() {
    let addr = start_server();
    let core = ApiCore::new(format!("http://{addr}/api")).unwrap();

    // Step 1: hello.
    let hello: HelloMessage = core.parse_response(execute(core.build_get("/hello"))).unwrap();
    assert_eq!(hello.message, "Hello from the mock API!");

    // Step 2: the seeded user.
    let user: User = core.parse_response(execute(core.build_get("/users/1"))).unwrap();
    assert_eq!(
        user,
        User {
            id: 1,
            name: "Ana".to_string()
        }
    );

    // Step 3: create.
    let req = core.build_post("/users", &NewUser { name: "Bo" }).unwrap();
    let created: User = core.parse_response(execute(req)).unwrap();
    assert_eq!(created.name, "Bo");
    let id = created.id;

    // Step 4: replace.
    let req = core
        .build_put(&format!("/users/{id}"), &NewUser { name: "Bea" })
        .unwrap();
    let replaced: User = core.parse_response(execute(req)).unwrap();
    assert_eq!(replaced.name, "Bea");
    assert_eq!(replaced.id, id);

    // Step 5: delete. The server answers with the removed user.
    let req = core.build_delete(&format!("/users/{id}"));
    let removed: User = core.parse_response(execute(req)).unwrap();
    assert_eq!(
        removed,
        User {
            id,
            name: "Bea".to_string()
        }
    );

    // Step 6: get after delete.
    let err = core
        .parse_response::<User>(execute(core.build_get(&format!("/users/{id}"))))
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
}

#[test]
fn headers_and_body_reach_the_server() {
    let addr = start_server();
    let core = ApiCore::new(format!("http://{addr}/api")).unwrap();

    let req = core.build_request(
        "/echo",
        RequestOptions::new()
            .method(HttpMethod::Post)
            .header("Content-Type", "text/plain")
            .header("X-Request-Id", "42")
            .body("verbatim"),
    );
    let echo: serde_json::Value = core.parse_response(execute(req)).unwrap();
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["headers"]["content-type"], "text/plain");
    assert_eq!(echo["headers"]["x-request-id"], "42");
    assert_eq!(echo["body"], "verbatim");
}

#[test]
fn failure_modes() {
    let addr = start_server();
    let core = ApiCore::new(format!("http://{addr}/api")).unwrap();

    let err = core
        .parse_response::<serde_json::Value>(execute(core.build_get("/status/500")))
        .unwrap_err();
    assert_eq!(err.status(), Some(500));

    let err = core
        .parse_response::<User>(execute(core.build_get("/malformed")))
        .unwrap_err();
    assert!(err.is_decode());
}
