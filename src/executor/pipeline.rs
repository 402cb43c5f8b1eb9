use log::{debug, warn};

use super::argv::ArgVector;
use super::launcher::{Channel, Endpoint, Launched, launch};
use crate::ast::{Command, SyntaxNode};
use crate::error::ExecError;

/// Outcome of a pipeline: one status per stage, in stage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub statuses: Vec<i32>,
    pub channels: usize,
}

impl PipelineReport {
    /// The last stage decides the status of the whole pipeline.
    pub fn status(&self) -> i32 {
        self.statuses.last().copied().unwrap_or(0)
    }
}

/// Collects the stages of a pipeline, left to right, flattening nested
/// pipelines on either side.
pub fn flatten_pipeline<'a>(node: &'a SyntaxNode, stages: &mut Vec<&'a Command>) -> Result<(), ExecError> {
    let mut current = Some(node);
    while let Some(node) = current {
        match node {
            SyntaxNode::Pipeline(pipeline) => {
                flatten_pipeline(&pipeline.command, stages)?;
                current = pipeline.pipe.as_deref();
            }
            SyntaxNode::Command(cmd) => {
                stages.push(cmd);
                current = None;
            }
            other => return Err(ExecError::Structural { kind: other.kind() }),
        }
    }
    Ok(())
}

pub struct PipelineHandler {
    pub warn_upstream: bool,
}

impl PipelineHandler {
    pub fn new(warn_upstream: bool) -> Self {
        PipelineHandler { warn_upstream }
    }

    pub fn exec_pipeline(&self, node: &SyntaxNode) -> Result<PipelineReport, ExecError> {
        debug!("evaluating pipeline");
        let mut stages = Vec::new();
        flatten_pipeline(node, &mut stages)?;
        self.exec_stages(&stages)
    }

    pub fn exec_stages(&self, stages: &[&Command]) -> Result<PipelineReport, ExecError> {
        self.exec_stages_with(stages, launch)
    }

    /// Runs the stages, starting each one through `launch_fn`.
    pub fn exec_stages_with<F>(&self, stages: &[&Command], mut launch_fn: F) -> Result<PipelineReport, ExecError>
    where
        F: FnMut(&ArgVector<'_>, Endpoint, Endpoint) -> Result<Launched, ExecError>,
    {
        let argvs = stages
            .iter()
            .map(|cmd| ArgVector::materialize(cmd))
            .collect::<Result<Vec<_>, _>>()?;
        let n = argvs.len();
        if n == 0 {
            return Ok(PipelineReport { statuses: Vec::new(), channels: 0 });
        }

        // All channels exist before the first stage starts, so a failure here
        // leaves nothing running.
        let mut channels = Vec::with_capacity(n - 1);
        for _ in 1..n {
            channels.push(Channel::open()?);
        }
        let channel_count = channels.len();

        let mut endpoints: Vec<(Endpoint, Endpoint)> =
            (0..n).map(|_| (Endpoint::Inherit, Endpoint::Inherit)).collect();
        for (i, channel) in channels.into_iter().enumerate() {
            endpoints[i].1 = Endpoint::Channel(channel.write);
            endpoints[i + 1].0 = Endpoint::Channel(channel.read);
        }

        let mut launched = Vec::with_capacity(n);
        let mut pending = endpoints.into_iter();
        for argv in &argvs {
            let Some((stdin, stdout)) = pending.next() else {
                break;
            };
            match launch_fn(argv, stdin, stdout) {
                Ok(stage) => launched.push(stage),
                Err(err) => {
                    // Close the ends meant for later stages first, otherwise a
                    // running upstream stage may never see EOF or EPIPE.
                    drop(pending);
                    if let Err(wait_err) = reap(launched) {
                        warn!("while aborting pipeline: {}", wait_err);
                    }
                    return Err(err);
                }
            }
        }

        let statuses = reap(launched)?;
        if self.warn_upstream {
            for (i, (status, cmd)) in statuses.iter().zip(stages).enumerate().take(n - 1) {
                if *status != 0 {
                    warn!("pipeline stage {} ({}) exited with status {}", i, cmd.name, status);
                }
            }
        }
        Ok(PipelineReport {
            statuses,
            channels: channel_count,
        })
    }
}

/// Waits for every launched stage, even after a wait on an earlier one fails.
fn reap(launched: Vec<Launched>) -> Result<Vec<i32>, ExecError> {
    let mut statuses = Vec::with_capacity(launched.len());
    let mut first_err = None;
    for stage in launched {
        let command = stage.command().to_string();
        match stage.wait() {
            Ok(status) => statuses.push(status),
            Err(err) => {
                debug!("failed to reap {}: {}", command, err);
                first_err.get_or_insert(err);
            }
        }
    }
    match first_err {
        Some(err) => Err(err),
        None => Ok(statuses),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Parameter, Parameters, Pipeline};

    fn cmd(name: &str, args: &[&str]) -> Command {
        Command::new(name, Parameters::from_words(args.iter().copied()))
    }

    fn names(stages: &[&Command]) -> Vec<String> {
        stages.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_flatten_single_command() {
        let node = SyntaxNode::from(cmd("ls", &[]));
        let mut stages = Vec::new();
        flatten_pipeline(&node, &mut stages).unwrap();
        assert_eq!(names(&stages), vec!["ls"]);
    }

    #[test]
    fn test_flatten_right_chain() {
        // a | b | c
        let node = SyntaxNode::from(Pipeline::new(
            cmd("a", &[]),
            Some(Pipeline::new(cmd("b", &[]), Some(Pipeline::new(cmd("c", &[]), None).into())).into()),
        ));
        let mut stages = Vec::new();
        flatten_pipeline(&node, &mut stages).unwrap();
        assert_eq!(names(&stages), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_flatten_nested_left_and_bare_right() {
        // (a | b) | c, with the last stage given as a bare command
        let left = Pipeline::new(cmd("a", &[]), Some(cmd("b", &[]).into()));
        let node = SyntaxNode::from(Pipeline::new(left, Some(cmd("c", &["-x"]).into())));
        let mut stages = Vec::new();
        flatten_pipeline(&node, &mut stages).unwrap();
        assert_eq!(names(&stages), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_flatten_rejects_parameter_stage() {
        let node = SyntaxNode::from(Pipeline::new(
            cmd("a", &[]),
            Some(Parameter::new("oops").into()),
        ));
        let mut stages = Vec::new();
        let err = flatten_pipeline(&node, &mut stages).unwrap_err();
        assert!(matches!(err, ExecError::Structural { kind: "parameter" }));
    }

    #[test]
    fn test_report_status_is_last_stage() {
        let report = PipelineReport { statuses: vec![1, 0, 3], channels: 2 };
        assert_eq!(report.status(), 3);
        let empty = PipelineReport { statuses: vec![], channels: 0 };
        assert_eq!(empty.status(), 0);
    }
}
