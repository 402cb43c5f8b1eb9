use log::debug;

use super::argv::ArgVector;
use super::builtins::BuiltinManager;
use super::executor::{ExecStatus, Executor, status_for};
use super::launcher::{self, Endpoint};
use super::pipeline::{PipelineHandler, PipelineReport};
use crate::ast::{Command, SyntaxNode};
use crate::config::Config;
use crate::error::ExecError;

pub struct DefaultExecutor {
    builtins: BuiltinManager,
    pipelines: PipelineHandler,
}

impl Default for DefaultExecutor {
    fn default() -> Self {
        DefaultExecutor::new()
    }
}

impl Executor for DefaultExecutor {
    fn exec(&mut self, node: &SyntaxNode) -> ExecStatus {
        match node {
            SyntaxNode::Command(cmd) => self.exec_command(cmd),
            SyntaxNode::Pipeline(_) => self.exec_pipeline(node).map(|report| report.status()),
            other => Err(ExecError::Structural { kind: other.kind() }),
        }
    }
}

impl DefaultExecutor {
    pub fn new() -> Self {
        DefaultExecutor {
            builtins: BuiltinManager::new(),
            pipelines: PipelineHandler::new(true),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        DefaultExecutor {
            builtins: BuiltinManager::new(),
            pipelines: PipelineHandler::new(config.warn_upstream),
        }
    }

    pub fn with_builtins(mut self, builtins: BuiltinManager) -> Self {
        self.builtins = builtins;
        self
    }

    /// Evaluates a tree and reduces any failure to a status code, reporting
    /// it on stderr. The tree itself is left to the caller.
    pub fn evaluate(&mut self, root: &SyntaxNode) -> i32 {
        match self.exec(root) {
            Ok(status) => status,
            Err(err) => {
                eprintln!("pipesh: {}", err);
                status_for(&err)
            }
        }
    }

    pub fn exec_pipeline(&mut self, node: &SyntaxNode) -> Result<PipelineReport, ExecError> {
        self.pipelines.exec_pipeline(node)
    }

    fn exec_command(&mut self, cmd: &Command) -> ExecStatus {
        debug!("evaluating command {}", cmd.name);
        let argv = ArgVector::materialize(cmd)?;
        debug!("{} has {} parameters", cmd.name, argv.args().len());

        if let Some(builtin) = self.builtins.get(&cmd.name) {
            return Ok(builtin.run(argv.args()));
        }
        launcher::run(&argv, Endpoint::Inherit, Endpoint::Inherit)
    }
}

/// Evaluates a tree with no builtins and default settings.
pub fn evaluate(root: &SyntaxNode) -> i32 {
    DefaultExecutor::new().evaluate(root)
}
