//! HTTP endpoint: `POST /api/analyze` with a JSON body `{ "source": "..." }`.
//!
//! A deliberately small HTTP/1.1 front: one request per connection, answered
//! with `Connection: close`. Every connection is handled on its own task.

use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use minic_syntax::error::{Error, Result};

use crate::report::AnalyzeRequest;

pub const ANALYZE_PATH: &str = "/api/analyze";
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

const MAX_HEAD_BYTES: usize = 64 * 1024;
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    /// Suppress per-request log lines.
    pub quiet: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            quiet: false,
        }
    }
}

/// A parsed request head plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    fn json(status: u16, body: String) -> Self {
        Self { status, body }
    }

    fn error(status: u16, msg: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": msg }).to_string())
    }

    pub fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            413 => "Payload Too Large",
            431 => "Request Header Fields Too Large",
            _ => "Internal Server Error",
        }
    }
}

/// Bind `config.addr` and serve until the process exits.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(&config.addr)
        .await
        .map_err(|e| Error::new(format!("Failed to bind {}: {}", config.addr, e)))?;
    if !config.quiet {
        let local = listener.local_addr()?;
        eprintln!(
            "{} listening on http://{}{}",
            "[minic]".green().bold(),
            local,
            ANALYZE_PATH
        );
    }
    run(listener, config.quiet).await
}

/// Accept loop over an already bound listener.
pub async fn run(listener: TcpListener, quiet: bool) -> Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, quiet).await {
                if !quiet {
                    eprintln!("{} {}: {}", "[minic]".red().bold(), peer, e.msg.red());
                }
            }
        });
    }
}

async fn handle_connection(stream: TcpStream, quiet: bool) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let response = match read_request(reader).await {
        Ok(request) => {
            let response = route(&request);
            if !quiet {
                log_request(&request, &response);
            }
            response
        }
        Err(rejection) => rejection,
    };
    write_response(&mut writer, &response).await
}

fn log_request(request: &Request, response: &Response) {
    let status = if response.status == 200 {
        response.status.green().to_string()
    } else {
        response.status.yellow().to_string()
    };
    eprintln!(
        "{} {} {} {} ({} bytes in, {} bytes out)",
        "[minic]".cyan(),
        request.method,
        request.path,
        status,
        request.body.len(),
        response.body.len()
    );
}

/// Dispatch a request to the analysis endpoint.
pub fn route(request: &Request) -> Response {
    let path = request.path.split('?').next().unwrap_or_default();
    if path != ANALYZE_PATH {
        return Response::error(404, "not found");
    }
    if request.method != "POST" {
        return Response::error(405, "use POST");
    }
    let parsed: std::result::Result<AnalyzeRequest, Error> =
        serde_json::from_slice(&request.body).map_err(Error::from);
    match parsed {
        Ok(req) => {
            let result = crate::analyze(&req.source);
            match serde_json::to_string(&result.to_response()) {
                Ok(body) => Response::json(200, body),
                Err(e) => Response::error(500, &e.to_string()),
            }
        }
        Err(e) => Response::error(400, &e.to_string()),
    }
}

/// Read one request. Malformed or oversized input is answered with the
/// rejection returned in `Err`.
pub async fn read_request<R: AsyncRead + Unpin>(reader: R) -> std::result::Result<Request, Response> {
    let mut reader = BufReader::new(reader);
    let mut head_bytes = 0usize;

    let request_line = read_head_line(&mut reader, &mut head_bytes).await?;
    let mut parts = request_line.split_whitespace();
    let (method, path) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(p), Some(v)) if v.starts_with("HTTP/") => (m.to_string(), p.to_string()),
        _ => return Err(Response::error(400, "malformed request line")),
    };

    let mut content_length = 0usize;
    loop {
        let line = read_head_line(&mut reader, &mut head_bytes).await?;
        if line.is_empty() {
            break;
        }
        let Some((name, value)) = line.split_once(':') else {
            return Err(Response::error(400, "malformed header"));
        };
        if name.trim().eq_ignore_ascii_case("content-length") {
            content_length = value
                .trim()
                .parse()
                .map_err(|_| Response::error(400, "invalid Content-Length"))?;
        }
    }
    if content_length > MAX_BODY_BYTES {
        return Err(Response::error(413, "request body too large"));
    }

    let mut body = vec![0u8; content_length];
    reader
        .read_exact(&mut body)
        .await
        .map_err(|_| Response::error(400, "request body shorter than Content-Length"))?;
    Ok(Request { method, path, body })
}

async fn read_head_line<R: AsyncRead + Unpin>(
    reader: &mut BufReader<R>,
    head_bytes: &mut usize,
) -> std::result::Result<String, Response> {
    // one byte past the remaining budget tells an oversized head apart
    let budget = MAX_HEAD_BYTES.saturating_sub(*head_bytes) + 1;
    let mut raw = Vec::new();
    let n = (&mut *reader)
        .take(budget as u64)
        .read_until(b'\n', &mut raw)
        .await
        .map_err(|_| Response::error(400, "unreadable request head"))?;
    if n == 0 {
        return Err(Response::error(400, "connection closed before end of request head"));
    }
    *head_bytes += n;
    if *head_bytes > MAX_HEAD_BYTES {
        return Err(Response::error(431, "request head too large"));
    }
    let line = String::from_utf8(raw).map_err(|_| Response::error(400, "request head is not UTF-8"))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) -> Result<()> {
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        response.reason(),
        response.body.len()
    );
    writer.write_all(head.as_bytes()).await?;
    writer.write_all(response.body.as_bytes()).await?;
    writer.flush().await?;
    writer.shutdown().await?;
    Ok(())
}
