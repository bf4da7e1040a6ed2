// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Positional placeholder substitution.
//!
//! Templates use composite format items: `{index}`, `{index,alignment}` and
//! `{index:format}`. A positive alignment right-aligns the argument in a field of that
//! width, a negative one left-aligns it. Alignments are limited to fewer than a million
//! characters. The format part is accepted and ignored: arguments are rendered with their
//! [`Display`] implementation, independent of any locale. Literal braces are written as
//! `{{` and `}}`.

use crate::error::Error;
use std::fmt::{Display, Write};

const MAX_ALIGNMENT: usize = 1_000_000;

/// Substitute `args` into `template`
pub fn format(template: &str, args: &[&dyn Display]) -> Result<String, Error> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(Error::Format("unmatched `}`")),
            '{' => {
                let mut item = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') => return Err(Error::Format("unexpected `{` in format item")),
                        Some(c) => item.push(c),
                        None => return Err(Error::Format("unterminated format item")),
                    }
                }
                write_item(&mut out, &item, args)?;
            }
            c => out.push(c),
        }
    }

    Ok(out)
}

/// Write a single format item (the text between the braces)
fn write_item(out: &mut String, item: &str, args: &[&dyn Display]) -> Result<(), Error> {
    let head = item.split_once(':').map_or(item, |(head, _)| head);
    let (index, alignment) = match head.split_once(',') {
        Some((index, alignment)) => (index, Some(alignment)),
        None => (head, None),
    };

    let index: usize = index
        .trim_end()
        .parse()
        .map_err(|_| Error::Format("invalid argument index"))?;
    let arg = args
        .get(index)
        .ok_or(Error::Format("argument index out of range"))?;

    let start = out.len();
    write!(out, "{arg}").map_err(|_| Error::Format("argument failed to format"))?;

    if let Some(alignment) = alignment {
        let width: i32 = alignment
            .trim()
            .parse()
            .map_err(|_| Error::Format("invalid alignment"))?;
        let size = width.unsigned_abs() as usize;
        if size >= MAX_ALIGNMENT {
            return Err(Error::Format("alignment too large"));
        }
        let padding = " ".repeat(size.saturating_sub(out[start..].chars().count()));
        if width < 0 {
            out.push_str(&padding);
        } else {
            out.insert_str(start, &padding);
        }
    }
    Ok(())
}
