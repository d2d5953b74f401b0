// Copyright 2026 The gitlit Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The pair of output sinks command handlers write through: stdout for
//! normal output, stderr for diagnostics. No color, no pager — both are
//! external collaborators this crate doesn't implement.

use std::io;
use std::io::Write as _;

pub struct Ui {
    stdout: Box<dyn io::Write>,
    stderr: Box<dyn io::Write>,
}

impl Ui {
    pub fn for_terminal() -> Self {
        Self {
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
        }
    }

    #[cfg(test)]
    pub fn for_test(stdout: Box<dyn io::Write>, stderr: Box<dyn io::Write>) -> Self {
        Self { stdout, stderr }
    }

    pub fn write_stdout(&mut self, text: &str) {
        let _ = self.stdout.write_all(text.as_bytes());
    }

    pub fn println_stdout(&mut self, text: &str) {
        self.write_stdout(text);
        self.write_stdout("\n");
    }

    pub fn println_stderr(&mut self, text: &str) {
        let _ = self.stderr.write_all(text.as_bytes());
        let _ = self.stderr.write_all(b"\n");
    }
}
