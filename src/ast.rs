use std::fmt;
use std::io::{self, Write};

/// One element of a parsed command line.
///
/// Every child is moved into its parent when the parent is built, so a tree
/// has exactly one owner and is torn down top-down when the root is dropped.
#[derive(Debug, PartialEq)]
pub enum SyntaxNode {
    Command(Command),
    Pipeline(Pipeline),
    Parameter(Parameter),
    Parameters(Parameters),
}

#[derive(Debug, PartialEq)]
pub struct Command {
    pub name: String,
    pub params: Option<Box<Parameters>>,
}

/// A pipeline stage and the rest of the pipeline to its right.
#[derive(Debug, PartialEq)]
pub struct Pipeline {
    pub command: Box<SyntaxNode>,
    pub pipe: Option<Box<SyntaxNode>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub value: String,
}

/// Right-extending argument chain: `first` is always a leaf, `second` is the
/// rest of the chain.
#[derive(Debug, PartialEq)]
pub struct Parameters {
    pub first: Parameter,
    pub second: Option<Box<Parameters>>,
}

impl Command {
    pub fn new(name: impl Into<String>, params: Option<Parameters>) -> Self {
        Command {
            name: name.into(),
            params: params.map(Box::new),
        }
    }

    /// Arguments in chain order, command name excluded.
    pub fn args(&self) -> Args<'_> {
        Args {
            next: self.params.as_deref(),
        }
    }
}

impl Pipeline {
    pub fn new(command: impl Into<SyntaxNode>, pipe: Option<SyntaxNode>) -> Self {
        Pipeline {
            command: Box::new(command.into()),
            pipe: pipe.map(Box::new),
        }
    }
}

impl Parameter {
    pub fn new(value: impl Into<String>) -> Self {
        Parameter { value: value.into() }
    }
}

impl Parameters {
    pub fn new(first: Parameter, second: Option<Parameters>) -> Self {
        Parameters {
            first,
            second: second.map(Box::new),
        }
    }

    /// Builds a chain from a list of words, preserving their order.
    ///
    /// Returns `None` for an empty list, which is how a command with no
    /// arguments is represented.
    pub fn from_words<I, S>(words: I) -> Option<Parameters>
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: DoubleEndedIterator,
        S: Into<String>,
    {
        // Reduce right-to-left, the way a right-recursive grammar would.
        words
            .into_iter()
            .rev()
            .fold(None, |rest, word| Some(Parameters::new(Parameter::new(word), rest)))
    }

    pub fn iter(&self) -> Args<'_> {
        Args { next: Some(self) }
    }
}

/// Iterator over the strings of a `Parameters` chain.
#[derive(Debug, Clone)]
pub struct Args<'a> {
    next: Option<&'a Parameters>,
}

impl<'a> Iterator for Args<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.second.as_deref();
        Some(node.first.value.as_str())
    }
}

// Long chains are unlinked iteratively so dropping them never recurses
// once per node.
impl Drop for Parameters {
    fn drop(&mut self) {
        let mut next = self.second.take();
        while let Some(mut node) = next {
            next = node.second.take();
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        let mut next = self.pipe.take();
        while let Some(node) = next {
            next = match *node {
                SyntaxNode::Pipeline(mut rest) => rest.pipe.take(),
                _ => None,
            };
        }
    }
}

impl From<Command> for SyntaxNode {
    fn from(cmd: Command) -> Self {
        SyntaxNode::Command(cmd)
    }
}

impl From<Pipeline> for SyntaxNode {
    fn from(pipeline: Pipeline) -> Self {
        SyntaxNode::Pipeline(pipeline)
    }
}

impl From<Parameter> for SyntaxNode {
    fn from(param: Parameter) -> Self {
        SyntaxNode::Parameter(param)
    }
}

impl From<Parameters> for SyntaxNode {
    fn from(params: Parameters) -> Self {
        SyntaxNode::Parameters(params)
    }
}

impl SyntaxNode {
    pub fn kind(&self) -> &'static str {
        match self {
            SyntaxNode::Command(_) => "command",
            SyntaxNode::Pipeline(_) => "pipeline",
            SyntaxNode::Parameter(_) => "parameter",
            SyntaxNode::Parameters(_) => "parameters",
        }
    }
}

/// Writes the tree one element per line, with `|` between pipeline stages.
pub fn print_tree<W: Write>(node: &SyntaxNode, out: &mut W) -> io::Result<()> {
    match node {
        SyntaxNode::Command(cmd) => {
            writeln!(out, "{}", cmd.name)?;
            for arg in cmd.args() {
                writeln!(out, "{}", arg)?;
            }
        }
        SyntaxNode::Pipeline(pipeline) => {
            print_tree(&pipeline.command, out)?;
            if let Some(rest) = &pipeline.pipe {
                writeln!(out, "|")?;
                print_tree(rest, out)?;
            }
        }
        SyntaxNode::Parameter(param) => writeln!(out, "{}", param.value)?,
        SyntaxNode::Parameters(params) => {
            for arg in params.iter() {
                writeln!(out, "{}", arg)?;
            }
        }
    }
    Ok(())
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxNode::Command(cmd) => write!(f, "{}", cmd),
            SyntaxNode::Pipeline(pipeline) => {
                write!(f, "{}", pipeline.command)?;
                if let Some(rest) = &pipeline.pipe {
                    write!(f, " | {}", rest)?;
                }
                Ok(())
            }
            SyntaxNode::Parameter(param) => write!(f, "{}", param.value),
            SyntaxNode::Parameters(params) => {
                let words: Vec<&str> = params.iter().collect();
                write!(f, "{}", words.join(" "))
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in self.args() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
