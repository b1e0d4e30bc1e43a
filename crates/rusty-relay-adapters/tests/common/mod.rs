#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value};
use tiny_http::{Method, Response, Server, StatusCode};

pub const TOPIC: &str = "wc-topic-fixture";
pub const ACCOUNT: &str = "eip155:1:0x1000000000000000000000000000000000000001";
pub const BLOCKHASH: &str = "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N";

/// `(method, path, body)` of every request the mock received.
pub type Calls = Arc<Mutex<Vec<(String, String, Value)>>>;

/// `x-project-id` header of every request the mock received.
pub type ProjectIds = Arc<Mutex<Vec<Option<String>>>>;

pub fn spawn_mock_server(calls: Calls) -> (String, thread::JoinHandle<()>) {
    spawn_recording_server(calls, Arc::new(Mutex::new(Vec::new())))
}

pub fn spawn_recording_server(
    calls: Calls,
    project_ids: ProjectIds,
) -> (String, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").expect("start server");
    let addr = format!("http://{}", server.server_addr());

    let join = thread::spawn(move || {
        for _ in 0..32 {
            let mut req = match server.recv() {
                Ok(r) => r,
                Err(_) => break,
            };
            let method = req.method().clone();
            let path = req.url().to_owned();
            let project_id = req
                .headers()
                .iter()
                .find(|h| h.field.equiv("x-project-id"))
                .map(|h| h.value.as_str().to_owned());
            if let Ok(mut g) = project_ids.lock() {
                g.push(project_id);
            }
            let mut raw = String::new();
            let _ = req.as_reader().read_to_string(&mut raw);
            let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
            if let Ok(mut g) = calls.lock() {
                g.push((method.to_string(), path.clone(), body.clone()));
            }

            let (code, payload) = route(&method, &path, &body);
            let response =
                Response::from_string(payload.to_string()).with_status_code(StatusCode(code));
            let _ = req.respond(response);
        }
    });

    (addr, join)
}

fn route(method: &Method, path: &str, body: &Value) -> (u16, Value) {
    let session_request = format!("/session/{TOPIC}/request");
    let session_ping = format!("/session/{TOPIC}/ping");
    let session = format!("/session/{TOPIC}");

    match (method, path) {
        (Method::Post, p) if p == session_request => {
            match body["request"]["method"].as_str().unwrap_or_default() {
                "personal_sign" => (200, json!({ "result": "0xsignature" })),
                "eth_sign" => (
                    200,
                    json!({ "error": { "code": 5000, "message": "User rejected." } }),
                ),
                _ => (500, json!({ "error": "bridge exploded" })),
            }
        }
        (Method::Post, p) if p == session_ping => (200, json!({ "result": true })),
        (Method::Get, p) if p == session => (
            200,
            json!({ "topic": TOPIC, "accounts": [ACCOUNT] }),
        ),
        (Method::Post, "/rpc") => (200, rpc_reply(body)),
        _ => (404, json!({ "error": "not found" })),
    }
}

fn rpc_reply(body: &Value) -> Value {
    let id = body["id"].clone();
    let result = match body["method"].as_str().unwrap_or_default() {
        "eth_gasPrice" => json!("0x4a817c800"),
        "eth_getTransactionCount" => json!("0x7"),
        "eth_getBalance" => json!("0xde0b6b3a7640000"),
        "getLatestBlockhash" => json!({
            "context": { "slot": 1 },
            "value": { "blockhash": BLOCKHASH, "lastValidBlockHeight": 2 }
        }),
        other => {
            return json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("method {other} not found") }
            })
        }
    };
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}
