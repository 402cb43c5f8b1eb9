//! A minimal line splitter that builds syntax trees for the interactive
//! front end: words are separated by whitespace and stages by `|`. No
//! quoting, expansion, or redirection.

use thiserror::Error;

use crate::ast::{Command, Parameters, Pipeline, SyntaxNode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command at position {pos}")]
    EmptyStage { pos: usize },
}

/// Parses one input line. A blank line yields `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<SyntaxNode>, ParseError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut stages = Vec::new();
    let mut pos = 0;
    for segment in line.split('|') {
        let mut words = segment.split_whitespace();
        let Some(name) = words.next() else {
            return Err(ParseError::EmptyStage { pos });
        };
        let args: Vec<&str> = words.collect();
        stages.push(Command::new(name, Parameters::from_words(args)));
        pos += segment.len() + 1;
    }

    if stages.len() == 1 {
        return Ok(stages.pop().map(SyntaxNode::from));
    }
    // Reduce from the right: the last stage ends the chain with no pipe.
    Ok(stages
        .into_iter()
        .rev()
        .fold(None, |rest, stage| Some(Pipeline::new(stage, rest).into())))
}
