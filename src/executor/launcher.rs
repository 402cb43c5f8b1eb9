use std::io;
use std::os::fd::OwnedFd;
use std::process::{Child, Command, Stdio};

use log::debug;
use nix::fcntl::OFlag;

use super::argv::ArgVector;
use super::executor::{EXEC_FAILURE_STATUS, ExecStatus, exit_code};
use crate::error::ExecError;

/// Where a child's standard input or output is connected.
#[derive(Debug)]
pub enum Endpoint {
    Inherit,
    Channel(OwnedFd),
}

impl From<Endpoint> for Stdio {
    fn from(endpoint: Endpoint) -> Self {
        match endpoint {
            Endpoint::Inherit => Stdio::inherit(),
            Endpoint::Channel(fd) => Stdio::from(fd),
        }
    }
}

/// A unidirectional byte stream between two pipeline stages.
#[derive(Debug)]
pub struct Channel {
    pub read: OwnedFd,
    pub write: OwnedFd,
}

impl Channel {
    /// Both ends are close-on-exec, so only the stage an end is handed to
    /// ever holds it after exec.
    pub fn open() -> Result<Self, ExecError> {
        let (read, write) = nix::unistd::pipe2(OFlag::O_CLOEXEC)
            .map_err(|e| ExecError::Channel(io::Error::from(e)))?;
        Ok(Channel { read, write })
    }
}

/// A launched stage, still to be reaped.
#[derive(Debug)]
pub enum Launched {
    Running { command: String, child: Child },
    /// The program could not be executed; nothing is left to wait for.
    Failed { command: String, status: i32 },
}

impl Launched {
    pub fn command(&self) -> &str {
        match self {
            Launched::Running { command, .. } | Launched::Failed { command, .. } => command,
        }
    }

    /// Blocks until the child exits. Consumes the handle so a child is
    /// waited for exactly once.
    pub fn wait(self) -> ExecStatus {
        match self {
            Launched::Running { command, mut child } => {
                let status = child
                    .wait()
                    .map_err(|source| ExecError::Wait { command: command.clone(), source })?;
                let code = exit_code(status);
                debug!("{} (pid {}) exited with status {}", command, child.id(), code);
                Ok(code)
            }
            Launched::Failed { status, .. } => Ok(status),
        }
    }
}

/// Starts one command with the given stream endpoints.
///
/// The endpoints are moved into the launch and closed in the parent as soon
/// as the child exists.
pub fn launch(argv: &ArgVector<'_>, stdin: Endpoint, stdout: Endpoint) -> Result<Launched, ExecError> {
    let program = argv.program();
    let mut command = Command::new(program);
    command
        .args(argv.args())
        .stdin(Stdio::from(stdin))
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::inherit());

    match command.spawn() {
        Ok(child) => {
            debug!("launched {} as pid {}", program, child.id());
            Ok(Launched::Running {
                command: program.to_string(),
                child,
            })
        }
        Err(source) if is_exec_failure(&source) => {
            let err = ExecError::Exec {
                command: program.to_string(),
                source,
            };
            eprintln!("pipesh: {}", err);
            Ok(Launched::Failed {
                command: program.to_string(),
                status: EXEC_FAILURE_STATUS,
            })
        }
        Err(source) => Err(ExecError::Resource {
            command: program.to_string(),
            source,
        }),
    }
}

/// Launches one command and waits for it.
pub fn run(argv: &ArgVector<'_>, stdin: Endpoint, stdout: Endpoint) -> ExecStatus {
    launch(argv, stdin, stdout)?.wait()
}

fn is_exec_failure(err: &io::Error) -> bool {
    match err.raw_os_error() {
        Some(errno) => matches!(
            errno,
            libc::ENOENT
                | libc::EACCES
                | libc::ENOEXEC
                | libc::ENOTDIR
                | libc::ELOOP
                | libc::ENAMETOOLONG
        ),
        // A name or argument with an interior NUL never reaches exec.
        None => err.kind() == io::ErrorKind::InvalidInput,
    }
}
