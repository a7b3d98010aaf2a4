// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Interactive collection of a filename and a size

use std::{
    io::{BufRead, Write},
    num::IntErrorKind,
    path::PathBuf,
};

use log::debug;

use crate::{Error, FileSize, InvalidSize, PromptError};

const FILENAME_PROMPT: &str = "Enter filename (e.g. output.bin): ";
const SIZE_PROMPT: &str = "Enter file size in KB: ";

/// Parse a size in kibibytes as typed by a user
pub fn parse_size_kib(line: &str) -> Result<FileSize, InvalidSize> {
    let value = line.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => InvalidSize::TooLarge,
        IntErrorKind::NegOverflow => InvalidSize::NotPositive,
        _ => InvalidSize::NotAnInteger,
    })?;
    if value <= 0 {
        return Err(InvalidSize::NotPositive);
    }

    FileSize::from_kib(value as u64).map_err(|e| match e {
        Error::ZeroSize => InvalidSize::NotPositive,
        _ => InvalidSize::TooLarge,
    })
}

/// Line oriented prompt over any reader/writer pair
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R, W> Prompt<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for the target filename
    pub fn filename(&mut self) -> Result<PathBuf, PromptError> {
        let line = self.ask(FILENAME_PROMPT)?;
        Ok(PathBuf::from(line.trim()))
    }

    /// Ask for the size in KB until a positive integer is entered
    pub fn size(&mut self) -> Result<FileSize, PromptError> {
        loop {
            let line = self.ask(SIZE_PROMPT)?;
            match parse_size_kib(&line) {
                Ok(size) => return Ok(size),
                Err(e) => {
                    debug!("Rejected size input {:?}: {:?}", line.trim(), e);
                    writeln!(self.output, "{e}")?;
                }
            }
        }
    }

    /// Write a line of output
    pub fn say(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(line)
    }

    /// Consume the prompt, returning the writer with everything shown so far
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use test_log::test;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), vec![])
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse_size_kib("1").unwrap().bytes(), 1024);
        assert_eq!(parse_size_kib("  10240\n").unwrap().bytes(), 10_485_760);
        assert_eq!(parse_size_kib("abc"), Err(InvalidSize::NotAnInteger));
        assert_eq!(parse_size_kib("1.5"), Err(InvalidSize::NotAnInteger));
        assert_eq!(parse_size_kib(""), Err(InvalidSize::NotAnInteger));
        assert_eq!(parse_size_kib("0"), Err(InvalidSize::NotPositive));
        assert_eq!(parse_size_kib("-12"), Err(InvalidSize::NotPositive));
        assert_eq!(parse_size_kib(&i64::MAX.to_string()), Err(InvalidSize::TooLarge));
        assert_eq!(parse_size_kib("99999999999999999999"), Err(InvalidSize::TooLarge));
        assert_eq!(parse_size_kib("-99999999999999999999"), Err(InvalidSize::NotPositive));
    }

    #[test]
    fn test_size_too_large_reprompts() {
        let mut p = prompt("99999999999999999999\n9223372036854775807\n5\n");
        assert_eq!(p.size().unwrap(), FileSize::from_kib(5).unwrap());

        let output = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(output.matches(SIZE_PROMPT).count(), 3);
        assert_eq!(output.matches("Size is too large. Try again.").count(), 2);
    }

    #[test]
    fn test_filename_trimmed() {
        let mut p = prompt("  output.bin \n");
        assert_eq!(p.filename().unwrap(), PathBuf::from("output.bin"));
        let output = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(output, FILENAME_PROMPT);
    }

    #[test]
    fn test_size_reprompts() {
        let mut p = prompt("ten\n0\n-4\n3\n");
        assert_eq!(p.size().unwrap(), FileSize::from_kib(3).unwrap());

        let output = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(output.matches(SIZE_PROMPT).count(), 4);
        assert_eq!(output.matches("Invalid input. Please enter an integer.").count(), 1);
        assert_eq!(output.matches("Size must be a positive number. Try again.").count(), 2);
    }

    #[test]
    fn test_closed_input() {
        let mut p = prompt("nope\n");
        assert!(matches!(p.size(), Err(PromptError::Closed)));

        let mut p = prompt("");
        assert!(matches!(p.filename(), Err(PromptError::Closed)));
    }
}
