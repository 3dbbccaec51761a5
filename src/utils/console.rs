use std::io::{self, BufRead, Write};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::app_error::FinderError;

/// Interactive terminal the flow talks through.
#[async_trait]
pub trait Console: Send {
    /// Shows `message` without a newline and returns the next input line with
    /// its line ending removed. End of input counts as the user quitting.
    async fn prompt(&mut self, message: &str) -> Result<String, FinderError>;

    fn say(&mut self, line: &str);

    /// Gives the user a moment to read before the next prompt.
    async fn pause(&mut self, duration: Duration);
}

/// Terminal console. Input lines are read on their own OS thread, so a
/// pending prompt can be dropped without holding up runtime shutdown.
pub struct StdConsole {
    lines: mpsc::Receiver<io::Result<String>>,
    pacing: bool,
}

impl StdConsole {
    pub fn new(pacing: bool) -> Self {
        Self::from_reader(io::BufReader::new(io::stdin()), pacing)
    }

    pub fn from_reader(reader: impl BufRead + Send + 'static, pacing: bool) -> Self {
        let (tx, rx) = mpsc::channel(1);
        std::thread::spawn(move || read_lines(reader, tx));

        StdConsole { lines: rx, pacing }
    }
}

fn read_lines(mut reader: impl BufRead, tx: mpsc::Sender<io::Result<String>>) {
    loop {
        let mut line = String::new();
        let next = match reader.read_line(&mut line) {
            Ok(0) => return,
            Ok(_) => Ok(strip_line_ending(line)),
            Err(e) => Err(e),
        };
        let failed = next.is_err();
        if tx.blocking_send(next).is_err() || failed {
            return;
        }
    }
}

fn strip_line_ending(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}

#[async_trait]
impl Console for StdConsole {
    async fn prompt(&mut self, message: &str) -> Result<String, FinderError> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", message)?;
        stdout.flush()?;

        match self.lines.recv().await {
            Some(line) => Ok(line?),
            None => Err(FinderError::Cancelled),
        }
    }

    fn say(&mut self, line: &str) {
        println!("{}", line);
    }

    async fn pause(&mut self, duration: Duration) {
        if self.pacing {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Console fed from a fixed list of answers, recording everything shown.
#[cfg(test)]
pub struct ScriptedConsole {
    inputs: std::collections::VecDeque<String>,
    pub output: Vec<String>,
}

#[cfg(test)]
impl ScriptedConsole {
    pub fn new(inputs: &[&str]) -> Self {
        ScriptedConsole {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            output: Vec::new(),
        }
    }

    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn count(&self, line: &str) -> usize {
        self.output.iter().filter(|l| l.as_str() == line).count()
    }
}

#[cfg(test)]
#[async_trait]
impl Console for ScriptedConsole {
    async fn prompt(&mut self, message: &str) -> Result<String, FinderError> {
        self.output.push(message.to_string());
        self.inputs.pop_front().ok_or(FinderError::Cancelled)
    }

    fn say(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    async fn pause(&mut self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_unix_and_windows_line_endings() {
        assert_eq!(strip_line_ending("hospital\n".to_string()), "hospital");
        assert_eq!(strip_line_ending("hospital\r\n".to_string()), "hospital");
        assert_eq!(strip_line_ending(" 1 \n".to_string()), " 1 ");
        assert_eq!(strip_line_ending(String::new()), "");
    }

    #[tokio::test]
    async fn scripted_console_ends_like_closed_stdin() {
        let mut console = ScriptedConsole::new(&["y"]);

        assert_eq!(console.prompt("Continue? (y/n): ").await.unwrap(), "y");
        assert!(matches!(
            console.prompt("again? ").await,
            Err(FinderError::Cancelled)
        ));
        assert_eq!(console.output, vec!["Continue? (y/n): ", "again? "]);
    }

    /// Input that never arrives until the test lets go of `_hold`.
    struct SilentInput(std::sync::mpsc::Receiver<()>);

    impl io::Read for SilentInput {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[tokio::test]
    async fn std_console_reads_lines_until_end_of_input() {
        let input = io::Cursor::new("y\r\n hospital \n2\n");
        let mut console = StdConsole::from_reader(input, false);

        assert_eq!(console.prompt("").await.unwrap(), "y");
        assert_eq!(console.prompt("").await.unwrap(), " hospital ");
        assert_eq!(console.prompt("").await.unwrap(), "2");
        assert!(matches!(
            console.prompt("").await,
            Err(FinderError::Cancelled)
        ));
    }

    #[test]
    fn abandoned_prompt_does_not_hold_up_shutdown() {
        let (_hold, blocked) = std::sync::mpsc::channel::<()>();
        let started = std::time::Instant::now();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let result = runtime.block_on(async {
            let mut console =
                StdConsole::from_reader(io::BufReader::new(SilentInput(blocked)), false);

            tokio::select! {
                answer = console.prompt("Continue? (y/n): ") => answer,
                _ = tokio::time::sleep(Duration::from_millis(50)) => Err(FinderError::Cancelled),
            }
        });
        drop(runtime);

        assert!(matches!(result, Err(FinderError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
