//! # Console
//!
//! Line-oriented prompting over any `BufRead` / `Write` pair. The binary
//! wires it to locked stdin/stdout; tests feed it a byte slice and capture
//! a `Vec<u8>`.
//!
//! Every prompt re-asks until the input is usable. End of input surfaces
//! as [`CliError::InputClosed`] so the menu loop can stop cleanly.

use std::io::{self, BufRead, Write};

use cvs_core::validation::validate_quantity;

use crate::error::{CliError, CliResult};

pub struct Console<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Console { reader, writer }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Writes `text` followed by a newline.
    pub fn say(&mut self, text: impl AsRef<str>) -> CliResult<()> {
        writeln!(self.writer, "{}", text.as_ref())?;
        Ok(())
    }

    /// Prints `label` and reads one trimmed line.
    pub fn prompt_line(&mut self, label: &str) -> CliResult<String> {
        write!(self.writer, "{label}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(CliError::InputClosed);
        }

        Ok(line.trim().to_string())
    }

    /// Reads an integer, re-asking on anything else.
    pub fn prompt_i64(&mut self, label: &str) -> CliResult<i64> {
        loop {
            let line = self.prompt_line(label)?;
            match line.parse::<i64>() {
                Ok(value) => return Ok(value),
                Err(_) => self.say("Please enter a number.")?,
            }
        }
    }

    /// Reads a line quantity (1..=9999), re-asking until it is valid.
    pub fn prompt_quantity(&mut self, label: &str) -> CliResult<i64> {
        loop {
            let qty = self.prompt_i64(label)?;
            match validate_quantity(qty) {
                Ok(()) => return Ok(qty),
                Err(e) => self.say(e.to_string())?,
            }
        }
    }

    /// Picks an item by its 1-based position in `items`.
    pub fn select_by_index<'a, T>(&mut self, label: &str, items: &'a [T]) -> CliResult<&'a T> {
        ensure_choices(items)?;

        loop {
            let n = self.prompt_i64(label)?;
            if n >= 1 && (n as usize) <= items.len() {
                return Ok(&items[n as usize - 1]);
            }
            self.say(format!("Please choose a number from 1 to {}.", items.len()))?;
        }
    }

    /// Picks an item by the ID `id_of` reads from it. IDs that are not in
    /// `items` are refused.
    pub fn select_by_id<'a, T>(
        &mut self,
        label: &str,
        items: &'a [T],
        id_of: impl Fn(&T) -> i64,
    ) -> CliResult<&'a T> {
        ensure_choices(items)?;

        loop {
            let id = self.prompt_i64(label)?;
            if let Some(item) = items.iter().find(|item| id_of(item) == id) {
                return Ok(item);
            }
            self.say(format!("ID {id} is not in the list above."))?;
        }
    }

    /// Yes/no question; only `y` or `yes` (any case) count as yes.
    pub fn confirm(&mut self, label: &str) -> CliResult<bool> {
        let answer = self.prompt_line(label)?.to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

fn ensure_choices<T>(items: &[T]) -> CliResult<()> {
    if items.is_empty() {
        return Err(CliError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "nothing to choose from",
        )));
    }
    Ok(())
}
