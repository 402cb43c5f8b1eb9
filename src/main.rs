fn main() {
    use log::{debug, warn};
    use pipesh::ast::print_tree;
    use pipesh::config::ConfigLoader;
    use pipesh::executor::{BuiltinManager, DefaultExecutor};
    use pipesh::parser::parse_line;
    use pipesh::prompt::ShellPrompt;

    env_logger::init();

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("ignoring config file: {}", e);
            ConfigLoader::default_config()
        }
    };
    let prompt = ShellPrompt::new(config.prompt.clone());
    let mut executor = DefaultExecutor::from_config(&config).with_builtins(BuiltinManager::with_defaults());

    loop {
        if let Err(e) = prompt.show_prompt() {
            eprintln!("pipesh: {}", e);
            break;
        }
        let line = match prompt.read_line() {
            Ok(Some(line)) => line,
            // End with EOF (e.g. Ctrl+D)
            Ok(None) => break,
            Err(e) => {
                eprintln!("pipesh: error reading input: {}", e);
                break;
            }
        };
        if line.trim() == "exit" {
            break;
        }

        let root = match parse_line(&line) {
            Ok(Some(root)) => root,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("pipesh: {}", e);
                continue;
            }
        };

        if config.print_tree {
            if let Err(e) = print_tree(&root, &mut std::io::stderr()) {
                eprintln!("pipesh: {}", e);
            }
        }
        let status = executor.evaluate(&root);
        debug!("`{}` finished with status {}", root, status);
    }
}
