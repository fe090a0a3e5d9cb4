// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers: an isolated socket/data directory per spec and fluent
//! assertions over `brain` invocations.

use std::path::PathBuf;
use std::process::{Child, Command as StdCommand, Output, Stdio};
use std::sync::Once;
use std::time::{Duration, Instant};

use tempfile::TempDir;

/// Upper bound for polling waits in specs.
pub const SPEC_WAIT_MAX_MS: u64 = 5_000;

static BUILD: Once = Once::new();

/// Path to the `brain` binary, building it if this test run has not.
pub fn brain_bin() -> PathBuf {
    let path = assert_cmd::cargo::cargo_bin("brain");
    BUILD.call_once(|| {
        if !path.exists() {
            let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
            let status = StdCommand::new(cargo)
                .args(["build", "-p", "brain-cli", "--bin", "brain"])
                .status()
                .expect("cargo build should run");
            assert!(status.success(), "building brain failed");
        }
    });
    path
}

/// Poll `check` until it passes or `max_ms` elapses.
pub fn wait_for(max_ms: u64, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    check()
}

/// `brain` with no isolation, for specs that never touch sockets.
pub fn cli() -> CliBuilder {
    CliBuilder::new(StdCommand::new(brain_bin()))
}

/// Isolated socket and data directories; daemons started here die with it.
pub struct Sandbox {
    dir: TempDir,
    daemons: Vec<Child>,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            daemons: Vec::new(),
        }
    }

    pub fn socket_dir(&self) -> PathBuf {
        self.dir.path().join("sockets")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn socket(&self, name: &str) -> PathBuf {
        self.socket_dir().join(format!("{}.sock", name))
    }

    pub fn log(&self, name: &str) -> String {
        std::fs::read_to_string(self.data_dir().join(format!("{}.log", name)))
            .unwrap_or_default()
    }

    fn command(&self) -> StdCommand {
        let mut cmd = StdCommand::new(brain_bin());
        cmd.env("BRAIN_SOCKET_DIR", self.socket_dir())
            .env("BRAIN_DATA_DIR", self.data_dir())
            .env("BRAIN_PEER_TIMEOUT_MS", "1000")
            .env("BRAIN_PROBE_TIMEOUT_MS", "500")
            .env("BRAIN_STALE_PROBE_MS", "500")
            .env_remove("BRAIN_LOG")
            .env_remove("BRAIN_LOG_FILE")
            .env("NO_COLOR", "1");
        cmd
    }

    pub fn brain(&self) -> CliBuilder {
        CliBuilder::new(self.command())
    }

    /// Start `brain serve --name NAME` and wait until its socket is accepting.
    pub fn serve(&mut self, name: &str) {
        let child = self
            .command()
            .args(["serve", "--name", name])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        self.daemons.push(child);

        let socket = self.socket(name);
        let up = wait_for(SPEC_WAIT_MAX_MS, || {
            std::os::unix::net::UnixStream::connect(&socket).is_ok()
        });
        assert!(up, "daemon {} should start listening at {}", name, socket.display());
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        for child in &mut self.daemons {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

pub struct CliBuilder {
    cmd: StdCommand,
}

impl CliBuilder {
    fn new(cmd: StdCommand) -> Self {
        Self { cmd }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    fn run(mut self) -> Output {
        self.cmd.stdin(Stdio::null()).output().unwrap()
    }

    /// Run and expect a zero exit status.
    pub fn passes(self) -> RunAssert {
        let output = self.run();
        let run = RunAssert { output };
        assert!(run.output.status.success(), "expected success\n{}", run.describe());
        run
    }

    /// Run and expect a non-zero exit status.
    pub fn fails(self) -> RunAssert {
        let output = self.run();
        let run = RunAssert { output };
        assert!(!run.output.status.success(), "expected failure\n{}", run.describe());
        run
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout missing {:?}\n{}", needle, self.describe());
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout().contains(needle), "stdout has {:?}\n{}", needle, self.describe());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr missing {:?}\n{}", needle, self.describe());
        self
    }

    pub fn code(self, expected: i32) -> Self {
        assert_eq!(self.output.status.code(), Some(expected), "{}", self.describe());
        self
    }

    fn describe(&self) -> String {
        format!("--- stdout ---\n{}--- stderr ---\n{}", self.stdout(), self.stderr())
    }
}
