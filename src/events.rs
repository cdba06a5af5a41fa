use std::io::{BufRead, Lines};
use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::models::{SimParams, TTASK_RANGE, UMAX_RANGE};

const MISSING_LINE: &str = "<missing>";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TickInput {
    Arrivals(u64),
    /// Negative, non-numeric or unreadable line.
    Malformed(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TickEvent {
    pub tick: u64,
    pub input: TickInput,
}

/// Line-oriented input: two parameter lines, then one arrival count per
/// tick until end of stream or the first blank line.
pub struct InputStream<R> {
    lines: Lines<R>,
    tick: u64,
    done: bool,
}

impl<R: BufRead> InputStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            tick: 0,
            done: false,
        }
    }

    pub fn read_params(&mut self) -> Result<SimParams> {
        let ttask = self.read_bounded(&TTASK_RANGE).map_err(Error::InvalidTtask)?;
        let umax = self.read_bounded(&UMAX_RANGE).map_err(Error::InvalidUmax)?;
        SimParams::new(ttask, umax)
    }

    fn read_bounded(&mut self, range: &RangeInclusive<u32>) -> std::result::Result<u32, String> {
        match self.lines.next() {
            Some(Ok(line)) => parse_bounded(&line, range).ok_or_else(|| line.trim().to_string()),
            Some(Err(err)) => Err(err.to_string()),
            None => Err(MISSING_LINE.to_string()),
        }
    }
}

impl<R: BufRead> Iterator for InputStream<R> {
    type Item = TickEvent;

    fn next(&mut self) -> Option<TickEvent> {
        if self.done {
            return None;
        }
        let input = match self.lines.next() {
            Some(Ok(line)) => match parse_tick_line(&line) {
                Some(input) => input,
                None => {
                    self.done = true;
                    return None;
                }
            },
            Some(Err(err)) => TickInput::Malformed(err.to_string()),
            None => {
                self.done = true;
                return None;
            }
        };
        self.tick += 1;
        Some(TickEvent {
            tick: self.tick,
            input,
        })
    }
}

/// Classifies one tick line; `None` for a blank line, which ends the run.
pub fn parse_tick_line(line: &str) -> Option<TickInput> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let input = match trimmed.parse::<i64>() {
        Ok(value) if value >= 0 => TickInput::Arrivals(value as u64),
        _ => TickInput::Malformed(trimmed.to_string()),
    };
    Some(input)
}

pub fn parse_bounded(line: &str, range: &RangeInclusive<u32>) -> Option<u32> {
    line.trim()
        .parse::<u32>()
        .ok()
        .filter(|value| range.contains(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stream(text: &str) -> InputStream<Cursor<&str>> {
        InputStream::new(Cursor::new(text))
    }

    #[test]
    fn tick_lines_are_trimmed() {
        assert_eq!(parse_tick_line("  7 \t"), Some(TickInput::Arrivals(7)));
        assert_eq!(parse_tick_line("0"), Some(TickInput::Arrivals(0)));
    }

    #[test]
    fn negative_and_text_lines_are_malformed() {
        assert_eq!(
            parse_tick_line("-5"),
            Some(TickInput::Malformed("-5".to_string()))
        );
        assert_eq!(
            parse_tick_line("two"),
            Some(TickInput::Malformed("two".to_string()))
        );
    }

    #[test]
    fn blank_line_ends_stream() {
        assert_eq!(parse_tick_line("   "), None);
    }

    #[test]
    fn bounded_values_respect_range() {
        assert_eq!(parse_bounded(" 10 ", &TTASK_RANGE), Some(10));
        assert_eq!(parse_bounded("0", &TTASK_RANGE), None);
        assert_eq!(parse_bounded("11", &UMAX_RANGE), None);
        assert_eq!(parse_bounded("-3", &UMAX_RANGE), None);
        assert_eq!(parse_bounded("three", &UMAX_RANGE), None);
    }

    #[test]
    fn read_params_reports_which_line_failed() {
        let err = stream("11\n2\n").read_params().unwrap_err();
        assert!(matches!(err, Error::InvalidTtask(ref value) if value == "11"));

        let err = stream("4\nabc\n").read_params().unwrap_err();
        assert!(matches!(err, Error::InvalidUmax(ref value) if value == "abc"));

        let err = stream("4\n").read_params().unwrap_err();
        assert!(matches!(err, Error::InvalidUmax(ref value) if value == "<missing>"));

        let err = stream("").read_params().unwrap_err();
        assert!(matches!(err, Error::InvalidTtask(_)));
    }

    #[test]
    fn events_are_numbered_from_one_and_stop_at_blank_line() {
        let mut input = stream("4\n2\n1\n3\n-1\n\n5\n");
        let params = input.read_params().expect("params should parse");
        assert_eq!(params, SimParams { ttask: 4, umax: 2 });

        let events: Vec<TickEvent> = input.collect();
        assert_eq!(
            events,
            vec![
                TickEvent {
                    tick: 1,
                    input: TickInput::Arrivals(1)
                },
                TickEvent {
                    tick: 2,
                    input: TickInput::Arrivals(3)
                },
                TickEvent {
                    tick: 3,
                    input: TickInput::Malformed("-1".to_string())
                },
            ]
        );
    }
}
