//! 콘솔 리포터 포트 구현 어댑터.
//! stdout은 프롬프트 본문 전용이므로 진행 상황은 stderr로 출력한다.

use std::io::{self, IsTerminal};

use crate::application::ports::Reporter;

/// 콘솔 전용 리포터 어댑터.
pub struct ConsoleReporter {
    colored: bool,
    quiet: bool,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ConsoleReporter {
    /// stderr가 TTY일 때만 색상을 사용한다.
    pub fn new(quiet: bool) -> Self {
        Self {
            colored: io::stderr().is_terminal(),
            quiet,
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.colored {
            format!("\x1b[2m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, name: &str) {
        if self.quiet {
            return;
        }
        eprintln!();
        eprintln!("{}", self.dim(&format!("==================== {name} ====================")));
    }

    fn kv(&self, key: &str, value: &str) {
        if self.quiet {
            return;
        }
        eprintln!("{:<12}: {}", key, value);
    }

    fn status(&self, scope: &str, message: &str) {
        if self.quiet {
            return;
        }
        eprintln!("[{:<12}] {}", scope, message);
    }
}
