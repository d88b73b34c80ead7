use crate::http::{self, RequestLine, Response, TEXT_HTML};
use crate::{MimeMap, ServeError, ShutdownSignal};
use anyhow::Result;
use std::fs;
use std::io::{self, Read};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(40);
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);
const READ_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    Silent,
    Minimal,
    Verbose,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub root_dir: PathBuf,
    pub mime: MimeMap,
    pub progress: ProgressMode,
}

/// A bound, single-threaded static file server.
#[derive(Debug)]
pub struct StaticServer {
    config: ServerConfig,
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl StaticServer {
    pub fn bind(config: ServerConfig) -> Result<Self, ServeError> {
        let root_dir = config
            .root_dir
            .canonicalize()
            .map_err(|source| ServeError::RootDir {
                path: config.root_dir.clone(),
                source,
            })?;
        if !root_dir.is_dir() {
            return Err(ServeError::NotADirectory { path: root_dir });
        }

        let listener = TcpListener::bind((config.host.as_str(), config.port)).map_err(|source| {
            ServeError::Bind {
                addr: format!("{}:{}", config.host, config.port),
                source,
            }
        })?;
        listener.set_nonblocking(true).map_err(ServeError::Listener)?;
        let local_addr = listener.local_addr().map_err(ServeError::Listener)?;

        if matches!(config.progress, ProgressMode::Verbose) {
            eprintln!(
                "[sitekit] listening on {local_addr} (root={}, requested port {})",
                root_dir.display(),
                config.port
            );
        }

        Ok(Self {
            config: ServerConfig { root_dir, ..config },
            listener,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn root_dir(&self) -> &Path {
        &self.config.root_dir
    }

    /// Root URL for a browser. Unspecified bind addresses map to `localhost`.
    pub fn url(&self) -> String {
        let ip = self.local_addr.ip();
        let host = if ip.is_unspecified() {
            "localhost".to_string()
        } else if ip.is_ipv6() {
            format!("[{ip}]")
        } else {
            ip.to_string()
        };
        format!("http://{host}:{}/", self.local_addr.port())
    }

    /// Accepts and answers connections one at a time until `shutdown` fires.
    pub fn serve_until(&self, shutdown: &ShutdownSignal) {
        while !shutdown.is_triggered() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if let Err(err) = self.handle_connection(stream) {
                        eprintln!("error: request from {peer} failed: {err:#}");
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    eprintln!("error: web server listener failed: {err}");
                    thread::sleep(ACCEPT_ERROR_BACKOFF);
                }
            }
        }
        if matches!(self.config.progress, ProgressMode::Verbose) {
            eprintln!("[sitekit] accept loop stopped");
        }
    }

    fn handle_connection(&self, mut stream: TcpStream) -> Result<()> {
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(READ_TIMEOUT))?;

        let mut buffer = [0_u8; 16_384];
        let read = stream.read(&mut buffer)?;
        if read == 0 {
            return Ok(());
        }

        let raw = String::from_utf8_lossy(&buffer[..read]);
        let Some(request) = http::parse_request_line(&raw) else {
            return Ok(());
        };

        let response = self.respond(&request);
        self.log_request(&request, response.status);
        http::write_http_response(&mut stream, &response, request.is_head())?;
        Ok(())
    }

    /// Builds the response for one request from the current state of the
    /// document root.
    pub fn respond(&self, request: &RequestLine<'_>) -> Response {
        if !request.is_supported() {
            return Response::plain(501);
        }

        let request_path = request.path();
        let Some(target) = http::resolve_request_path(&self.config.root_dir, request_path) else {
            return Response::plain(400);
        };

        if target.is_dir() {
            if !request_path.ends_with('/') {
                let location = match request.query() {
                    Some(query) => format!("{request_path}/?{query}"),
                    None => format!("{request_path}/"),
                };
                return Response::redirect(location);
            }
            return self.respond_with_directory(&target, request_path);
        }

        self.respond_with_file(&target)
    }

    fn respond_with_directory(&self, dir: &Path, request_path: &str) -> Response {
        if let Some(index) = INDEX_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
        {
            return self.respond_with_file(&index);
        }

        match http::directory_listing(dir, request_path) {
            Ok(html) => Response::ok(TEXT_HTML, html.into_bytes()),
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => Response::plain(404),
            Err(err) => {
                eprintln!("error: failed listing {}: {err}", dir.display());
                Response::plain(500)
            }
        }
    }

    fn respond_with_file(&self, path: &Path) -> Response {
        match fs::read(path) {
            Ok(body) => Response::ok(self.config.mime.content_type_for(path), body),
            Err(_) => Response::plain(404),
        }
    }

    fn log_request(&self, request: &RequestLine<'_>, status: u16) {
        if matches!(self.config.progress, ProgressMode::Silent) {
            return;
        }
        eprintln!(
            "[sitekit] {} {} -> {status}",
            request.method, request.target
        );
    }
}
