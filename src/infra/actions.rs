//! GitHub Actions workflow commands: collapsible log groups, error
//! annotations and step outputs.

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};

use tracing::debug;

use crate::error::AppResult;

/// Grouped progress log. A `::group::` is opened whenever the group name
/// changes and closed before the next one starts. Messages are written to the
/// same output as the group markers so they land inside their group.
pub struct ActionLog {
    out: Box<dyn Write + Send>,
    current_group: Option<String>,
}

impl ActionLog {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Box::new(out),
            current_group: None,
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn log(&mut self, group: &str, message: &str) {
        if self.current_group.as_deref() != Some(group) {
            self.end_group();
            let _ = writeln!(self.out, "::group::{}", escape_data(group));
            let _ = self.out.flush();
            self.current_group = Some(group.to_string());
        }
        let _ = writeln!(self.out, "{message}");
        let _ = self.out.flush();
        debug!("{message}");
    }

    pub fn end_group(&mut self) {
        if self.current_group.take().is_some() {
            let _ = writeln!(self.out, "::endgroup::");
            let _ = self.out.flush();
        }
    }
}

impl Drop for ActionLog {
    fn drop(&mut self) {
        self.end_group();
    }
}

/// Reports a failure as an error annotation on the workflow run.
pub fn report_error(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Sets a step output, falling back to the legacy command outside a runner
/// that provides `GITHUB_OUTPUT`.
pub fn set_output(name: &str, value: &str) -> AppResult<()> {
    match env::var_os("GITHUB_OUTPUT").filter(|path| !path.is_empty()) {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{name}={value}")?;
        }
        None => println!("::set-output name={name}::{}", escape_data(value)),
    }
    Ok(())
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn opens_a_group_per_name_change() {
        let buffer = SharedBuffer::default();
        let mut log = ActionLog::new(buffer.clone());

        log.log("Start", "one");
        log.log("Start", "two");
        log.log("List commits", "three");
        drop(log);

        assert_eq!(
            buffer.contents(),
            "::group::Start\none\ntwo\n::endgroup::\n::group::List commits\nthree\n::endgroup::\n"
        );
    }

    #[test]
    fn end_group_without_group_writes_nothing() {
        let buffer = SharedBuffer::default();
        let mut log = ActionLog::new(buffer.clone());
        log.end_group();
        assert_eq!(buffer.contents(), "");
    }

    #[test]
    fn escapes_command_data() {
        assert_eq!(escape_data("50% done\nnext"), "50%25 done%0Anext");
    }
}
