use minic_service::server::{run, ANALYZE_PATH};
use minic_service::AnalyzeResponse;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn start() -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(run(listener, true));
    addr
}

async fn send(addr: std::net::SocketAddr, method: &str, path: &str, body: &str) -> (String, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{} {} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        method,
        path,
        body.len(),
        body
    );
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    let (head, body) = raw.split_once("\r\n\r\n").unwrap();
    (head.to_string(), body.to_string())
}

#[tokio::test]
async fn analyze_endpoint_returns_report() {
    let addr = start().await;
    let payload = serde_json::json!({ "source": "int x = 10;\nif (x > 5) {\n  int y = x + 1;\n}\nint z = y;" });
    let (head, body) = send(addr, "POST", ANALYZE_PATH, &payload.to_string()).await;
    assert!(head.starts_with("HTTP/1.1 200 OK"), "{}", head);
    assert!(head.contains("Content-Type: application/json"));

    let response: AnalyzeResponse = serde_json::from_str(&body).unwrap();
    assert!(response.syntax_errors.is_empty());
    assert_eq!(response.semantic_errors, vec!["Line 5: undefined or out-of-scope reference to y".to_string()]);
    let names: Vec<&str> = response.symbol_table.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["x", "y", "z"]);
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let addr = start().await;
    let mut handles = Vec::new();
    for i in 0..8 {
        handles.push(tokio::spawn(async move {
            let source = format!("int v{} = {};\nw = v{};", i, i, i);
            let payload = serde_json::json!({ "source": source });
            let (_, body) = send(addr, "POST", ANALYZE_PATH, &payload.to_string()).await;
            let response: AnalyzeResponse = serde_json::from_str(&body).unwrap();
            (i, response)
        }));
    }
    for handle in handles {
        let (i, response) = handle.await.unwrap();
        assert_eq!(response.symbol_table.len(), 1);
        assert_eq!(response.symbol_table[0].name, format!("v{}", i));
        assert_eq!(response.semantic_errors.len(), 1);
    }
}

#[tokio::test]
async fn bad_requests_get_error_statuses() {
    let addr = start().await;
    let (head, body) = send(addr, "POST", ANALYZE_PATH, "{not json").await;
    assert!(head.starts_with("HTTP/1.1 400"), "{}", head);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("Invalid JSON"));

    let (head, _) = send(addr, "POST", "/nope", "{}").await;
    assert!(head.starts_with("HTTP/1.1 404"), "{}", head);

    let (head, _) = send(addr, "GET", ANALYZE_PATH, "").await;
    assert!(head.starts_with("HTTP/1.1 405"), "{}", head);
}

#[tokio::test]
async fn server_survives_deeply_nested_source() {
    let addr = start().await;
    let source = format!("int x = {}1{};", "(".repeat(20_000), ")".repeat(20_000));
    let payload = serde_json::json!({ "source": source });
    let (head, body) = send(addr, "POST", ANALYZE_PATH, &payload.to_string()).await;
    assert!(head.starts_with("HTTP/1.1 200 OK"), "{}", head);
    let response: AnalyzeResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.syntax_errors.len(), 1);

    // the same listener keeps answering
    let payload = serde_json::json!({ "source": "int y = 1;" });
    let (head, _) = send(addr, "POST", ANALYZE_PATH, &payload.to_string()).await;
    assert!(head.starts_with("HTTP/1.1 200 OK"), "{}", head);
}
