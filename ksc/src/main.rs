mod cli;
mod rlpl;
mod rppl;
mod shell;

use std::{path::PathBuf, process::ExitCode, rc::Rc};

use clap::{Args, Parser};
use cli::{exit_status, print_checked, print_checking, print_error, print_finished, print_running};
use ks_core::{
    eval::prelude::{EvalConfig, Interpreter, DEFAULT_MAX_CALL_DEPTH},
    runner::{check, load_env_file, parse_env_pair, run, Error},
    utils::prelude::StdConsoleIO
};

#[derive(Parser)]
#[command(name = "ksc", version, about = "KS Scripting interpreter")]
enum Command {
    /// Runs a script file
    Run {
        /// Path of source file
        path: PathBuf,
        #[command(flatten)]
        session: SessionArgs,
        /// Print status lines and timings on stderr
        #[arg(short, long, default_value_t = false)]
        verbose: bool
    },
    /// Performs lexical and syntactical analysis only
    Check {
        /// Path of source file
        path: PathBuf,
        /// Print ast instead of parsed source code
        #[arg(long, default_value_t = false)]
        print_ast: bool
    },
    /// Starts an interactive session
    Shell {
        #[command(flatten)]
        session: SessionArgs,
        /// Echo the value of every entered line
        #[arg(long, default_value_t = false)]
        print_result: bool
    },
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl {
        /// Print ast instead of parsed source code
        #[arg(long, default_value_t = false)]
        print_ast: bool
    }
}

#[derive(Args)]
struct SessionArgs {
    /// Maximum nesting of script function calls
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,
    /// Session variable visible through `env`, may be repeated
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_arg)]
    env: Vec<(String, String)>,
    /// File with one KEY=VALUE per line, may be repeated
    #[arg(long = "env-file", value_name = "PATH")]
    env_file: Vec<PathBuf>,
}

impl SessionArgs {
    /// Env files in order, then `--env` flags on top.
    fn config(self) -> Result<EvalConfig, Error> {
        let mut config = EvalConfig::default().with_max_call_depth(self.max_depth);

        for path in self.env_file {
            tracing::debug!(path = %path.display(), "loading env file");
            config = config.with_env_vars(load_env_file(path)?);
        }

        Ok(config.with_env_vars(self.env))
    }
}

fn parse_env_arg(arg: &str) -> Result<(String, String), String> {
    parse_env_pair(arg).ok_or_else(|| format!("expected KEY=VALUE, found `{arg}`"))
}

/// Logging is off unless `KS_LOG` holds a filter, e.g. `KS_LOG=debug`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Ok(filter) = EnvFilter::try_from_env("KS_LOG") {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();

    match Command::parse() {
        Command::Run { path, session, verbose } => {
            let config = match session.config() {
                Ok(config) => config,
                Err(err) => {
                    print_error(&err);
                    return ExitCode::FAILURE;
                }
            };

            tracing::debug!(max_depth = config.max_call_depth, vars = config.env_vars.len(), "session configured");

            if verbose {
                print_running(&path.display().to_string());
            }
            let start = std::time::Instant::now();

            let mut interpreter = Interpreter::new(config, Rc::new(StdConsoleIO));

            let result = run(path, &mut interpreter);

            tracing::debug!(elapsed = ?start.elapsed(), ok = result.is_ok(), "run finished");

            match result {
                Ok(_) => {
                    if verbose {
                        print_finished(start.elapsed());
                    }

                    ExitCode::from(exit_status(interpreter.exit_value()))
                },
                Err(err) => {
                    print_error(&err);
                    ExitCode::FAILURE
                }
            }
        },
        Command::Check { path, print_ast } => {
            print_checking(&path.display().to_string());
            let start = std::time::Instant::now();

            match check(path) {
                Ok(program) => {
                    if print_ast {
                        println!("{program:#?}");
                    } else {
                        println!("{program}");
                    }

                    print_checked(start.elapsed());
                    ExitCode::SUCCESS
                },
                Err(err) => {
                    print_error(&err);
                    ExitCode::FAILURE
                }
            }
        },
        Command::Shell { session, print_result } => {
            let config = match session.config() {
                Ok(config) => config,
                Err(err) => {
                    print_error(&err);
                    return ExitCode::FAILURE;
                }
            };

            if let Err(err) = ctrlc::set_handler(|| {
                eprintln!();
                std::process::exit(130);
            }) {
                tracing::warn!(%err, "could not install the Ctrl-C handler");
            }

            match shell::start(config, print_result) {
                Ok(value) => ExitCode::from(exit_status(value.as_ref())),
                Err(err) => {
                    print_error(&Error::from(err));
                    ExitCode::FAILURE
                }
            }
        },
        Command::Rlpl => report_io(rlpl::start()),
        Command::Rppl { print_ast } => report_io(rppl::start(print_ast))
    }
}

fn report_io(result: std::io::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(&Error::from(err));
            ExitCode::FAILURE
        }
    }
}
