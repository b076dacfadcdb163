use std::{path::{Path, PathBuf}, rc::Rc};

use ks_core::{
    environment::prelude::Value,
    eval::prelude::{EvalConfig, Interpreter},
    runner::run_source,
    utils::prelude::StdConsoleIO
};

use crate::cli::{print_error, read_line};

const DEFAULT_INPUT_HEAD: &str = "{Username}@{CurrentDirectoryWithSimplifyIfHome} # ";

/// Where the prompt placeholders come from.
pub struct PromptContext {
    pub username: String,
    pub current_dir: PathBuf,
    pub home: Option<PathBuf>,
}

impl PromptContext {
    pub fn from_process() -> Self {
        let username = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_default();

        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from);

        Self {
            username,
            current_dir: std::env::current_dir().unwrap_or_default(),
            home,
        }
    }
}

pub fn render_prompt(format: &str, context: &PromptContext) -> String {
    let current_dir = context.current_dir.display().to_string();

    let simplified = match &context.home {
        Some(home) if home == &context.current_dir => "~".to_string(),
        _ => current_dir.clone()
    };

    format
        .replace("{Username}", &context.username)
        .replace("{CurrentDirectoryWithSimplifyIfHome}", &simplified)
        .replace("{CurrentDirectory}", &current_dir)
}

/// Runs the interactive session; returns the value passed to `exit`, if any.
pub fn start(config: EvalConfig, print_result: bool) -> std::io::Result<Option<Value>> {
    let mut interpreter = Interpreter::new(config, Rc::new(StdConsoleIO));
    let path = Path::new("<shell>");

    tracing::debug!("shell session started");

    loop {
        let format = interpreter.env_vars()
            .get("ShellInputHead")
            .cloned()
            .unwrap_or_else(|| DEFAULT_INPUT_HEAD.to_string());

        let prompt = render_prompt(&format, &PromptContext::from_process());

        let input = match read_line(&prompt)? {
            Some(input) => input,
            None => return Ok(None)
        };

        match input.trim() {
            "" => continue,
            ".exit" => return Ok(None),
            _ => {}
        }

        match run_source(path, &input, &mut interpreter) {
            Ok(value) => {
                if interpreter.is_terminated() {
                    return Ok(Some(value));
                }

                let echo = print_result || interpreter.env_vars()
                    .get("PrintResult")
                    .is_some_and(|flag| flag == "1");

                if echo {
                    println!("{}", value.repr());
                }
            },
            Err(error) => print_error(&error)
        }
    }
}
