use std::{
    io::{BufRead, IsTerminal, Write},
    time::Duration,
};
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

use ks_core::{environment::prelude::Value, runner::Error};

pub(crate) fn print_checking(text: &str) {
    print_colourful_prefix("Checking", Color::Magenta, text)
}

pub(crate) fn print_checked(duration: Duration) {
    print_colourful_prefix("Checked", Color::Green, &format!("in {}", seconds(duration)))
}

pub(crate) fn print_running(text: &str) {
    print_colourful_prefix("Running", Color::Cyan, text)
}

pub(crate) fn print_finished(duration: Duration) {
    print_colourful_prefix("Finished", Color::Green, &format!("in {}", seconds(duration)))
}

pub fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_millis() as f32 / 1000.)
}

pub fn print_colourful_prefix(prefix: &str, color: Color, text: &str) {
    if let Err(err) = write_colourful_prefix(prefix, color, text) {
        tracing::warn!(%err, "failed to write status line");
    }
}

fn write_colourful_prefix(prefix: &str, color: Color, text: &str) -> std::io::Result<()> {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();
    buffer.set_color(
        ColorSpec::new()
            .set_intense(true)
            .set_bold(true)
            .set_fg(Some(color)),
    )?;
    write!(buffer, "{prefix: >11}")?;
    buffer.set_color(&ColorSpec::new())?;
    writeln!(buffer, " {text}")?;
    buffer_writer.print(&buffer)
}

/// Renders the diagnostic of `error` on stderr.
pub fn print_error(error: &Error) {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();

    let written = error.pretty(&mut buffer)
        .and_then(|_| buffer_writer.print(&buffer));

    if written.is_err() {
        eprintln!("{}", error.summary());
    }
}

/// The process status for the value passed to `exit`. Numbers are
/// truncated and wrapped into `0..=255`, so `exit(-1)` gives 255 and
/// `exit(300)` gives 44. Anything else is a success.
pub fn exit_status(value: Option<&Value>) -> u8 {
    match value {
        Some(Value::Number { value }) => (value.trunc() as i64 & 0xff) as u8,
        _ => 0
    }
}

/// Prints `prompt` and reads one line without its line ending; `None` at
/// end of input.
pub fn read_line(prompt: &str) -> std::io::Result<Option<String>> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut input = String::new();

    if std::io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(None);
    }

    if let Some('\n') = input.chars().next_back() {
        input.pop();
    }
    if let Some('\r') = input.chars().next_back() {
        input.pop();
    }

    Ok(Some(input))
}

pub fn stderr_buffer_writer() -> BufferWriter {
    BufferWriter::stderr(color_choice())
}

fn colour_forced() -> bool {
    if let Ok(force) = std::env::var("FORCE_COLOR") {
        !force.is_empty()
    } else {
        false
    }
}

fn color_choice() -> ColorChoice {
    if colour_forced() {
        ColorChoice::Always
    } else if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
