//! User-facing console lines.
//! Colors are enabled only when the stream is a TTY; logs go through tracing instead.

use owo_colors::OwoColorize;

use crate::tree::TreeSummary;

fn stdout_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn stderr_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

pub fn print_info(msg: &str) {
    if stdout_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {msg}");
    }
}

pub fn print_warn(msg: &str) {
    if stderr_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {msg}");
    }
}

pub fn print_error(msg: &str) {
    if stderr_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {msg}");
    }
}

pub fn print_success(msg: &str) {
    if stdout_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {msg}");
    }
}

/// Plain line without prefix, for output users may script against.
pub fn print_user(msg: &str) {
    println!("{msg}");
}

/// One-line description of a normalization pass.
pub fn summary_line(s: &TreeSummary, dry_run: bool) -> String {
    let verb = if dry_run { "would rename" } else { "renamed" };
    let mut line = format!(
        "{verb} {} file(s) and {} dir(s), merged {} dir(s), {} collision(s)",
        s.files_renamed, s.dirs_renamed, s.dirs_merged, s.collisions
    );
    if s.degenerate > 0 {
        line.push_str(&format!(", {} placeholder name(s)", s.degenerate));
    }
    if s.recovered > 0 {
        line.push_str(&format!(", {} interrupted rename(s) finished", s.recovered));
    }
    line
}

/// Print the pass summary; failures and leftovers go to stderr as warnings.
pub fn print_summary(s: &TreeSummary, dry_run: bool) {
    if s.changes() == 0 && s.failures == 0 {
        print_success("names already normalized");
    } else {
        print_success(&summary_line(s, dry_run));
    }
    if s.failures > 0 {
        print_warn(&format!("{} entr(ies) could not be processed; see log", s.failures));
    }
    if s.merge_leftovers > 0 {
        print_warn(&format!(
            "{} merged director(ies) could not be removed afterwards",
            s.merge_leftovers
        ));
    }
}
