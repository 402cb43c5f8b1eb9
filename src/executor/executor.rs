use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use crate::ast::SyntaxNode;
use crate::error::ExecError;

pub type ExecStatus = Result<i32, ExecError>;

/// Status of a child whose program could not be executed.
pub const EXEC_FAILURE_STATUS: i32 = 1;

/// Reserved statuses for failures inside the evaluator itself.
pub const STATUS_INVALID_NODE: i32 = -1;
pub const STATUS_RESOURCE: i32 = -2;
pub const STATUS_INTERNAL: i32 = -3;

pub trait Executor {
    fn exec(&mut self, node: &SyntaxNode) -> ExecStatus;
}

/// Maps an evaluation failure onto the status handed back to the read loop.
pub fn status_for(err: &ExecError) -> i32 {
    match err {
        ExecError::Structural { .. } => STATUS_INVALID_NODE,
        ExecError::Resource { .. } | ExecError::Channel(_) | ExecError::Wait { .. } => {
            STATUS_RESOURCE
        }
        ExecError::Exec { .. } => EXEC_FAILURE_STATUS,
        ExecError::ArgumentCountMismatch { .. } => STATUS_INTERNAL,
    }
}

/// Exit code of a finished child; death by signal N reads as 128 + N.
pub fn exit_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_status_for_errors() {
        assert_eq!(status_for(&ExecError::Structural { kind: "parameter" }), STATUS_INVALID_NODE);
        assert_eq!(
            status_for(&ExecError::Channel(io::Error::from_raw_os_error(libc::EMFILE))),
            STATUS_RESOURCE
        );
        assert_eq!(
            status_for(&ExecError::ArgumentCountMismatch {
                command: "ls".into(),
                expected: 2,
                actual: 1,
            }),
            STATUS_INTERNAL
        );
    }

    #[test]
    fn test_exit_code_from_raw_status() {
        assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
        assert_eq!(exit_code(ExitStatus::from_raw(libc::SIGKILL)), 128 + libc::SIGKILL);
    }
}
