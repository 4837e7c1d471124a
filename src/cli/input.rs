//! Prompt helpers: free text, numbered choices, dates, and yes/no.
//!
//! Invalid answers are reported and the question repeats until a valid one
//! arrives; validation failures never reach the caller.

use anyhow::Result;
use chrono::NaiveDate;
use std::fmt::Display;

use super::console::Console;
use crate::models::DayMonthYear;

/// Format accepted by [`InputHandler::get_date`]
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const KEEP_HINT: &str = "leave blank to keep";

/// Parse strict `YYYY-MM-DD` text into a calendar date
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

pub struct InputHandler<C> {
    console: C,
}

impl<C: Console> InputHandler<C> {
    pub fn new(console: C) -> Self {
        Self { console }
    }

    pub fn console(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Read a line of text. With a default, an empty answer returns the default.
    pub fn get_string(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(current) => {
                let answer = self
                    .console
                    .ask(&format!("{} (current: {}, {}): ", prompt, current, KEEP_HINT))?;
                if answer.is_empty() {
                    Ok(current.to_string())
                } else {
                    Ok(answer)
                }
            }
            None => self.console.ask(prompt),
        }
    }

    /// Show `options` as a 1-based numbered list and read a selection.
    ///
    /// Returns `None` only when `allow_empty` is set and the answer is blank
    /// (meaning "no change"), or when there is nothing to choose from.
    pub fn get_choice<'o, T: Display>(
        &mut self,
        prompt: &str,
        options: &'o [T],
        current: Option<&str>,
        allow_empty: bool,
    ) -> Result<Option<&'o T>> {
        if options.is_empty() {
            self.console.say("No options available.");
            return Ok(None);
        }

        self.console.say(prompt);
        for (i, option) in options.iter().enumerate() {
            self.console.say(&format!("{}. {}", i + 1, option));
        }

        let mut input_prompt = format!("Enter a number (1-{}", options.len());
        if let Some(current) = current.filter(|c| !c.is_empty()) {
            input_prompt.push_str(&format!(", current: {}", current));
        }
        if allow_empty {
            input_prompt.push_str(&format!(", {}", KEEP_HINT));
        }
        input_prompt.push_str("): ");

        loop {
            let answer = self.console.ask(&input_prompt)?;
            let answer = answer.trim();

            if allow_empty && answer.is_empty() {
                return Ok(None);
            }

            match answer.parse::<i64>() {
                Ok(n) if n >= 1 && n as usize <= options.len() => {
                    return Ok(Some(&options[n as usize - 1]));
                }
                Ok(_) => self.console.say("Invalid option. Try again."),
                Err(_) => self.console.say("Invalid input. Enter a number."),
            }
        }
    }

    /// Read a `YYYY-MM-DD` date as day, month and year.
    ///
    /// With `allow_empty`, a blank answer returns [`DayMonthYear::empty`].
    pub fn get_date(
        &mut self,
        prompt: &str,
        current: Option<NaiveDate>,
        allow_empty: bool,
    ) -> Result<DayMonthYear> {
        let mut input_prompt = format!("{} (YYYY-MM-DD", prompt);
        if let Some(date) = current {
            input_prompt.push_str(&format!(", current: {}", date.format(DATE_FORMAT)));
        }
        if allow_empty {
            input_prompt.push_str(&format!(", {}", KEEP_HINT));
        }
        input_prompt.push_str("): ");

        loop {
            let answer = self.console.ask(&input_prompt)?;

            if allow_empty && answer.trim().is_empty() {
                return Ok(DayMonthYear::empty());
            }

            match parse_date(&answer) {
                Some(date) => return Ok(date.into()),
                None => self.console.say("Invalid date format. Use YYYY-MM-DD."),
            }
        }
    }

    /// Ask until the answer is `y` or `n`, in either case
    pub fn get_yes_no(&mut self, prompt: &str) -> Result<bool> {
        let question = format!("{} (y/n): ", prompt);
        loop {
            let answer = self.console.ask(&question)?.trim().to_lowercase();
            match answer.as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => self
                    .console
                    .say("Invalid input. Enter 'y' for yes or 'n' for no."),
            }
        }
    }
}
