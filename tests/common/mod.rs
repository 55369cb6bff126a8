//! Shared test infrastructure for integration tests.
//!
//! Serves a registry from an in-process HTTP listener and runs the built
//! `pdfx` binary against a temporary project.
#![allow(dead_code)]

use serde_json::json;
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use tempfile::TempDir;

pub const COMPONENT_DIR: &str = "src/components/pdfx";

/// Canned registry responses keyed by request path.
#[derive(Default, Clone)]
pub struct RegistryFixture {
    index: Vec<serde_json::Value>,
    routes: BTreeMap<String, (u16, String)>,
}

impl RegistryFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single-file component listed in the index.
    pub fn component(mut self, name: &str, deps: &[&str], content: &str) -> Self {
        self.index.push(json!({
            "name": name,
            "description": format!("The {name} component"),
        }));
        let body = json!({
            "name": name,
            "files": [{
                "path": format!("components/pdfx/{name}/pdfx-{name}.tsx"),
                "content": content,
                "type": "registry:ui",
            }],
            "dependencies": deps,
        });
        self.routes
            .insert(format!("/r/{name}.json"), (200, body.to_string()));
        self
    }

    /// Override the response for a raw path under `/r/`.
    pub fn route(mut self, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert(format!("/r/{path}"), (status, body.to_string()));
        self
    }

    pub fn serve(self) -> TestRegistry {
        let mut routes = self.routes;
        routes
            .entry("/r/index.json".to_string())
            .or_insert_with(|| (200, json!({ "items": self.index }).to_string()));

        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test registry");
        let addr = listener.local_addr().expect("registry address");
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else {
                    continue;
                };
                respond(stream, &routes);
            }
        });
        TestRegistry { addr }
    }
}

fn respond(mut stream: TcpStream, routes: &BTreeMap<String, (u16, String)>) {
    let Ok(reader_stream) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(reader_stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) | Err(_) => break,
            Ok(_) if header == "\r\n" || header == "\n" => break,
            Ok(_) => {}
        }
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let (status, body) = routes
        .get(path)
        .cloned()
        .unwrap_or_else(|| (404, "not found".to_string()));
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

pub struct TestRegistry {
    addr: SocketAddr,
}

impl TestRegistry {
    pub fn url(&self) -> String {
        format!("http://{}/r", self.addr)
    }
}

/// A URL on which nothing is listening.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{addr}/r")
}

/// A listener that accepts connections but never answers. Keep it alive for
/// the duration of the test.
pub fn silent_registry() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("address");
    (listener, format!("http://{addr}/r"))
}

/// Temporary consumer project.
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// Project with a `pdfx.json` pointing at `registry_url`.
    pub fn with_config(registry_url: &str) -> Self {
        let project = Self::bare();
        let config = json!({
            "componentDir": COMPONENT_DIR,
            "registry": registry_url,
            "theme": "src/lib/pdfx-theme.ts",
        });
        std::fs::write(
            project.root().join("pdfx.json"),
            serde_json::to_string_pretty(&config).expect("serialize config"),
        )
        .expect("write pdfx.json");
        project
    }

    /// Project without any config.
    pub fn bare() -> Self {
        Self {
            dir: TempDir::new().expect("temp project"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn component_file(&self, name: &str) -> PathBuf {
        self.root()
            .join(COMPONENT_DIR)
            .join(name)
            .join(format!("pdfx-{name}.tsx"))
    }

    pub fn write_component_file(&self, name: &str, content: &str) {
        let path = self.component_file(name);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, content).expect("write component file");
    }

    pub fn read_component_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.component_file(name)).expect("read component file")
    }

    /// Run `pdfx` with `--cwd` pointed at this project.
    pub fn run(&self, args: &[&str]) -> RunOutput {
        let output = Command::new(env!("CARGO_BIN_EXE_pdfx"))
            .arg("--cwd")
            .arg(self.root())
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .expect("run pdfx");
        RunOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

#[derive(Debug)]
pub struct RunOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|err| panic!("stdout is not JSON ({err}): {}", self.stdout))
    }
}
