//! CLI Front End (A0, SPEC_FULL.md §4.0): tokenizes argv into an `OptionContext`.
//!
//! Kept deliberately thin — no custom help text, no validation beyond what
//! `clap` derives for free. Everything that decides *how matching behaves*
//! lives in the strategy/engine/formatter modules, not here.

use clap::Parser;

use crate::options::OptionContext;

#[derive(Parser, Debug)]
#[command(name = "grepcore", about = "A POSIX-compatible grep replacement")]
pub struct Cli {
    /// Pattern to search for. Prefer `-e` when the pattern itself starts with `-`.
    pattern: Option<String>,

    /// Files or directories to search. `-` means standard input.
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    #[arg(short = 'e', long = "regexp", value_name = "PATTERN")]
    regexp: Option<String>,

    #[arg(short = 'i', long = "ignore-case")]
    ignore_case: bool,

    #[arg(short = 'v', long = "invert-match")]
    invert_match: bool,

    #[arg(short = 'n', long = "line-number")]
    line_number: bool,

    #[arg(short = 'c', long = "count")]
    count: bool,

    #[arg(short = 'l', long = "files-with-matches")]
    files_with_matches: bool,

    #[arg(short = 'h', long = "no-filename")]
    no_filename: bool,

    #[arg(short = 'q', long = "quiet", alias = "silent")]
    quiet: bool,

    #[arg(short = 'E', long = "extended-regexp")]
    extended_regexp: bool,

    #[arg(short = 'F', long = "fixed-strings")]
    fixed_strings: bool,

    #[arg(short = 'w', long = "word-regexp")]
    word_regexp: bool,

    #[arg(short = 'r', visible_short_alias = 'R', long = "recursive")]
    recursive: bool,

    #[arg(short = 'm', long = "max-count", value_name = "N")]
    max_count: Option<usize>,

    #[arg(short = 'A', long = "after-context", value_name = "N")]
    after_context: Option<usize>,

    #[arg(short = 'B', long = "before-context", value_name = "N")]
    before_context: Option<usize>,

    #[arg(short = 'C', long = "context", value_name = "N")]
    context: Option<usize>,

    #[arg(long = "include", value_name = "GLOB", action = clap::ArgAction::Append)]
    include: Vec<String>,

    #[arg(long = "exclude", value_name = "GLOB", action = clap::ArgAction::Append)]
    exclude: Vec<String>,
}

impl Cli {
    /// Parse process arguments. Clap maps a parse failure to exit 2 on its own.
    #[must_use]
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Convert the parsed CLI into the immutable `OptionContext` the core
    /// reads. Returns `Err` when no pattern was supplied at all.
    pub fn into_option_context(self) -> Result<OptionContext, String> {
        let pattern = self
            .regexp
            .or(self.pattern)
            .ok_or_else(|| "no pattern provided".to_string())?;

        let (context_before, context_after) = match self.context {
            Some(n) => (
                self.before_context.unwrap_or(n),
                self.after_context.unwrap_or(n),
            ),
            None => (
                self.before_context.unwrap_or(0),
                self.after_context.unwrap_or(0),
            ),
        };

        Ok(OptionContext {
            pattern,
            paths: self.files,
            ignore_case: self.ignore_case,
            invert_match: self.invert_match,
            line_number: self.line_number,
            count_only: self.count,
            files_with_matches: self.files_with_matches,
            no_filename: self.no_filename,
            silent: self.quiet,
            extended_regexp: self.extended_regexp,
            fixed_strings: self.fixed_strings,
            word_regexp: self.word_regexp,
            recursive: self.recursive,
            max_count: self.max_count,
            context_before,
            context_after,
            include: OptionContext::normalize_multi_valued(&self.include),
            exclude: OptionContext::normalize_multi_valued(&self.exclude),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_context_fills_before_and_after() {
        let cli = Cli::parse_from(["grepcore", "pat", "f.txt", "-C", "2"]);
        let ctx = cli.into_option_context().unwrap();
        assert_eq!(ctx.context_before, 2);
        assert_eq!(ctx.context_after, 2);
    }

    #[test]
    fn explicit_before_after_override_symmetric_default() {
        let cli = Cli::parse_from(["grepcore", "pat", "f.txt", "-C", "2", "-A", "5"]);
        let ctx = cli.into_option_context().unwrap();
        assert_eq!(ctx.context_before, 2);
        assert_eq!(ctx.context_after, 5);
    }

    #[test]
    fn regexp_flag_wins_over_positional_pattern() {
        let cli = Cli::parse_from(["grepcore", "ignored", "-e", "real", "f.txt"]);
        let ctx = cli.into_option_context().unwrap();
        assert_eq!(ctx.pattern, "real");
    }
}
