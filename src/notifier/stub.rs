//! Local HTTP server standing in for the chat APIs in tests.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use actix_web::{
    dev::ServerHandle,
    http::{header, StatusCode},
    web, App, HttpRequest, HttpResponse, HttpServer,
};

#[derive(Debug, Clone)]
pub struct Captured {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

type Log = Arc<Mutex<Vec<Captured>>>;

#[derive(Debug, Clone)]
struct Reply(StatusCode, serde_json::Value);

pub struct StubServer {
    addr: SocketAddr,
    handle: ServerHandle,
    log: Log,
}

async fn capture(
    req: HttpRequest,
    body: web::Bytes,
    log: web::Data<Log>,
    reply: web::Data<Reply>,
) -> HttpResponse {
    let header_value = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    log.lock().unwrap().push(Captured {
        path: req.path().to_owned(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });
    HttpResponse::build(reply.0).json(&reply.1)
}

impl StubServer {
    /// Answers every POST with `{"ok": true}`.
    pub async fn start() -> Self {
        Self::replying(StatusCode::OK, serde_json::json!({ "ok": true })).await
    }

    pub async fn replying(status: StatusCode, body: serde_json::Value) -> Self {
        let log = Log::default();
        let data = web::Data::new(log.clone());
        let reply = web::Data::new(Reply(status, body));
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .app_data(reply.clone())
                .default_service(web::post().to(capture))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self { addr, handle, log }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.log.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}
