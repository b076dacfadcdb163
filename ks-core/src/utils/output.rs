use std::{
    collections::VecDeque,
    io::{BufRead, Write},
    sync::{Arc, RwLock},
};

/// The I/O collaborator behind `print` and `input`.
///
/// The interpreter never touches stdin/stdout directly; the host decides
/// where lines go and where they come from.
pub trait ConsoleIO {
    fn write_line(&self, line: &str);
    fn read_line(&self) -> Option<String>;
}

#[derive(Debug, Clone, Copy)]
pub struct StdConsoleIO;

impl ConsoleIO for StdConsoleIO {
    fn write_line(&self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        // a closed stdout is not the script's problem
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.flush();
    }

    fn read_line(&self) -> Option<String> {
        let mut buf = String::new();

        match std::io::stdin().lock().read_line(&mut buf) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                if buf.ends_with('\n') {
                    buf.pop();
                }
                if buf.ends_with('\r') {
                    buf.pop();
                }

                Some(buf)
            }
        }
    }
}

/// Captures output in memory and serves queued input lines.
#[derive(Debug, Default, Clone)]
pub struct VectorConsoleIO {
    pub lines: Arc<RwLock<Vec<String>>>,
    pub input: Arc<RwLock<VecDeque<String>>>,
}

impl VectorConsoleIO {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<I, S>(input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let io = Self::new();
        io.input
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend(input.into_iter().map(Into::into));
        io
    }

    pub fn take(&self) -> Vec<String> {
        let mut lines = self.write_lock();
        std::mem::take(&mut *lines)
    }

    pub fn output(&self) -> String {
        self.lines
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|line| format!("{line}\n"))
            .collect()
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Vec<String>> {
        self.lines
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ConsoleIO for VectorConsoleIO {
    fn write_line(&self, line: &str) {
        self.write_lock().push(line.to_string());
    }

    fn read_line(&self) -> Option<String> {
        self.input
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }
}
