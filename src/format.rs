//! Output Formatter (I): renders a `SearchResult` the way POSIX `grep` does,
//! and derives the process exit code from it (§4.6, §6, §7).

use std::collections::HashSet;
use std::io::{self, Write};

use crate::options::OptionContext;
use crate::types::SearchResult;

pub const EXIT_MATCH: i32 = 0;
pub const EXIT_NO_MATCH: i32 = 1;
pub const EXIT_FATAL: i32 = 2;
pub const EXIT_CANCELLED: i32 = 130;

/// Render `result` to `out` under `options`, returning the exit code.
///
/// Mode selection (checked in order, first match wins): silent, count-only,
/// files-with-matches, normal.
pub fn render(out: &mut impl Write, result: &SearchResult, options: &OptionContext) -> io::Result<i32> {
    let any_matches = result.total_matches() > 0;

    for fr in &result.file_results {
        if fr.has_error {
            log::warn!(
                "{}: {}",
                fr.file_name,
                fr.error_message.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if options.silent {
        return Ok(exit_for(any_matches));
    }

    if options.count_only {
        render_count_only(out, result, options)?;
        return Ok(exit_for(any_matches));
    }

    if options.files_with_matches {
        render_files_with_matches(out, result)?;
        return Ok(exit_for(any_matches));
    }

    render_normal(out, result, options)?;
    Ok(exit_for(any_matches))
}

fn exit_for(any_matches: bool) -> i32 {
    if any_matches {
        EXIT_MATCH
    } else {
        EXIT_NO_MATCH
    }
}

/// Whether a file name prefix should be shown, based on the set of processed
/// files rather than the number of input tokens (§4.6's filename-visibility
/// fix), so a recursive search rooted at one directory still prints names.
fn show_filename(result: &SearchResult, options: &OptionContext) -> bool {
    if options.no_filename {
        return false;
    }
    result.total_files() > 1 || options.files_with_matches
}

fn render_count_only(
    out: &mut impl Write,
    result: &SearchResult,
    options: &OptionContext,
) -> io::Result<()> {
    // §4.6: bare `<count>` when either (a) exactly one file was *named by the
    // user* and `-h`/`--no-filename` is set, or (b) exactly one file was
    // *processed* and `-l`/`--files-with-matches` is not set. These two
    // cardinalities diverge under `-r`, where one named directory can expand
    // to many processed files.
    let named_one = options.paths.len() == 1;
    let processed_one = result.total_files() == 1;
    let bare_count = (named_one && options.no_filename) || (processed_one && !options.files_with_matches);
    for fr in &result.file_results {
        if fr.has_error {
            continue;
        }
        if bare_count {
            writeln!(out, "{}", fr.total_matches())?;
        } else {
            writeln!(out, "{}:{}", fr.file_name, fr.total_matches())?;
        }
    }
    Ok(())
}

fn render_files_with_matches(out: &mut impl Write, result: &SearchResult) -> io::Result<()> {
    for fr in &result.file_results {
        if !fr.has_error && fr.total_matches() > 0 {
            writeln!(out, "{}", fr.file_name)?;
        }
    }
    Ok(())
}

fn render_normal(
    out: &mut impl Write,
    result: &SearchResult,
    options: &OptionContext,
) -> io::Result<()> {
    let with_name = show_filename(result, options);

    for fr in &result.file_results {
        if fr.has_error {
            continue;
        }

        if let Some(contextual) = &fr.contextual_matches {
            render_contextual_file(out, contextual, with_name, options)?;
        } else {
            for m in &fr.matches {
                let mut parts = Vec::new();
                if with_name {
                    parts.push(m.file_name.clone());
                }
                if options.line_number {
                    parts.push(m.line_number.to_string());
                }
                parts.push(m.full_line.clone());
                writeln!(out, "{}", parts.join(":"))?;
            }
        }
    }
    Ok(())
}

/// Emit a file's contextual matches: context lines separated by `-`, matched
/// lines by `:`, a `--` group separator between disjoint context windows,
/// and no line re-emitted once it has already been printed.
fn render_contextual_file(
    out: &mut impl Write,
    contextual: &[crate::types::ContextualMatch],
    with_name: bool,
    options: &OptionContext,
) -> io::Result<()> {
    let mut emitted: HashSet<u64> = HashSet::new();
    let mut last_emitted_line: Option<u64> = None;

    for (i, cm) in contextual.iter().enumerate() {
        let first_line = cm
            .before
            .first()
            .map_or(cm.r#match.line_number, |b| b.line_number);
        if i > 0 {
            let contiguous = last_emitted_line == Some(first_line.saturating_sub(1));
            if !contiguous {
                writeln!(out, "--")?;
            }
        }

        for line in &cm.before {
            if emitted.insert(line.line_number) {
                write_line(out, with_name, options, &line.file_name, line.line_number, '-', &line.content)?;
                last_emitted_line = Some(line.line_number);
            }
        }

        if emitted.insert(cm.r#match.line_number) {
            write_line(
                out,
                with_name,
                options,
                &cm.r#match.file_name,
                cm.r#match.line_number,
                ':',
                &cm.r#match.full_line,
            )?;
        }
        last_emitted_line = Some(cm.r#match.line_number);

        for line in &cm.after {
            if emitted.insert(line.line_number) {
                write_line(out, with_name, options, &line.file_name, line.line_number, '-', &line.content)?;
                last_emitted_line = Some(line.line_number);
            }
        }
    }
    Ok(())
}

fn write_line(
    out: &mut impl Write,
    with_name: bool,
    options: &OptionContext,
    file_name: &str,
    line_number: u64,
    separator: char,
    content: &str,
) -> io::Result<()> {
    let mut parts = Vec::new();
    if with_name {
        parts.push(file_name.to_string());
    }
    if options.line_number {
        parts.push(line_number.to_string());
    }
    parts.push(content.to_string());
    writeln!(out, "{}", parts.join(&separator.to_string()))
}
