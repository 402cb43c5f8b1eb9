use std::collections::HashMap;

/// A command run inside the shell process instead of as a child.
pub trait BuiltinCommand {
    fn name(&self) -> &'static str;
    fn run(&self, args: &[&str]) -> i32;
}

/// Name lookup consulted before a plain command is launched.
#[derive(Default)]
pub struct BuiltinManager {
    commands: HashMap<String, Box<dyn BuiltinCommand>>,
}

impl BuiltinManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut mgr = BuiltinManager::new();
        mgr.register(Box::new(CdCommand));
        mgr
    }

    pub fn register(&mut self, cmd: Box<dyn BuiltinCommand>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn BuiltinCommand> {
        self.commands.get(name).map(|cmd| cmd.as_ref())
    }
}

pub struct CdCommand;

impl BuiltinCommand for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn run(&self, args: &[&str]) -> i32 {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/".to_string());
        let target = args.first().copied().unwrap_or(home.as_str());
        match std::env::set_current_dir(target) {
            Ok(_) => 0,
            Err(e) => {
                eprintln!("cd: {}: {}", target, e);
                1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Answer;

    impl BuiltinCommand for Answer {
        fn name(&self) -> &'static str {
            "answer"
        }
        fn run(&self, args: &[&str]) -> i32 {
            42 + args.len() as i32
        }
    }

    #[test]
    fn test_empty_manager() {
        let mgr = BuiltinManager::new();
        assert!(!mgr.is_builtin("cd"));
        assert!(mgr.get("cd").is_none());
    }

    #[test]
    fn test_register_and_run() {
        let mut mgr = BuiltinManager::new();
        mgr.register(Box::new(Answer));
        assert!(mgr.is_builtin("answer"));
        assert_eq!(mgr.get("answer").unwrap().run(&["x"]), 43);
    }

    #[test]
    fn test_defaults_include_cd() {
        let mgr = BuiltinManager::with_defaults();
        assert!(mgr.is_builtin("cd"));
    }

    #[test]
    fn test_cd_to_missing_dir_fails() {
        let mgr = BuiltinManager::with_defaults();
        let status = mgr.get("cd").unwrap().run(&["/definitely/not/a/dir"]);
        assert_eq!(status, 1);
    }
}
