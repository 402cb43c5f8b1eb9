use std::iter;

use crate::ast::{Command, Parameters};
use crate::error::ExecError;

/// Number of arguments in a chain; an absent chain has none.
pub fn count_args(params: Option<&Parameters>) -> usize {
    let mut count = 0;
    let mut current = params;
    while let Some(node) = current {
        count += 1;
        current = node.second.as_deref();
    }
    count
}

/// The argument vector of one command: the command name followed by its
/// arguments in chain order.
///
/// Strings are borrowed from the syntax tree, so the vector cannot outlive the
/// `Command` it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgVector<'a> {
    argv: Vec<&'a str>,
}

impl<'a> ArgVector<'a> {
    pub fn materialize(cmd: &'a Command) -> Result<Self, ExecError> {
        let expected = count_args(cmd.params.as_deref());
        let mut argv = Vec::with_capacity(expected + 1);
        argv.push(cmd.name.as_str());
        argv.extend(cmd.args());

        let actual = argv.len() - 1;
        if actual != expected {
            return Err(ExecError::ArgumentCountMismatch {
                command: cmd.name.clone(),
                expected,
                actual,
            });
        }
        Ok(ArgVector { argv })
    }

    pub fn program(&self) -> &'a str {
        self.argv[0]
    }

    pub fn args(&self) -> &[&'a str] {
        &self.argv[1..]
    }

    pub fn as_slice(&self) -> &[&'a str] {
        &self.argv
    }

    /// Name, arguments, then the `None` terminator expected by exec.
    pub fn slots(&self) -> impl Iterator<Item = Option<&'a str>> + '_ {
        self.argv.iter().copied().map(Some).chain(iter::once(None))
    }

    pub fn slot_count(&self) -> usize {
        self.argv.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(name: &str, args: &[&str]) -> Command {
        Command::new(name, Parameters::from_words(args.iter().copied()))
    }

    #[test]
    fn test_count_args_absent() {
        assert_eq!(count_args(None), 0);
    }

    #[test]
    fn test_count_args_chain() {
        for n in 0..8 {
            let words: Vec<String> = (0..n).map(|i| format!("arg{}", i)).collect();
            let params = Parameters::from_words(words);
            assert_eq!(count_args(params.as_ref()), n);
        }
    }

    #[test]
    fn test_materialize_no_args() {
        let ls = cmd("ls", &[]);
        let argv = ArgVector::materialize(&ls).unwrap();
        assert_eq!(argv.slots().collect::<Vec<_>>(), vec![Some("ls"), None]);
        assert_eq!(argv.slot_count(), 2);
        assert!(argv.args().is_empty());
    }

    #[test]
    fn test_materialize_with_args() {
        let ls = cmd("ls", &["-l", "/tmp"]);
        let argv = ArgVector::materialize(&ls).unwrap();
        assert_eq!(
            argv.slots().collect::<Vec<_>>(),
            vec![Some("ls"), Some("-l"), Some("/tmp"), None]
        );
        assert_eq!(argv.program(), "ls");
        assert_eq!(argv.args(), &["-l", "/tmp"]);
    }

    #[test]
    fn test_slot_count_is_n_plus_two() {
        for n in 0..16 {
            let words: Vec<String> = (0..n).map(|i| i.to_string()).collect();
            let c = Command::new("prog", Parameters::from_words(words.clone()));
            let argv = ArgVector::materialize(&c).unwrap();
            assert_eq!(argv.slot_count(), n + 2);
            assert_eq!(argv.args(), words.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
