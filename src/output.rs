//! Terminal output for search results

use crate::search::SearchSource;
use std::io;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn choice(color: bool) -> ColorChoice {
    if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Print matching file refs to stdout, one per line, sorted
pub fn print_files(files: &[String], color: bool) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice(color));
    write_files(&mut stdout, files)
}

pub fn write_files<W: WriteColor>(out: &mut W, files: &[String]) -> io::Result<()> {
    let mut sorted: Vec<&String> = files.iter().collect();
    sorted.sort();

    for file in sorted {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{}", file)?;
        out.reset()?;
        writeln!(out)?;
    }

    Ok(())
}

/// Print a one-line summary to stderr so stdout stays pipeable
pub fn print_summary(
    count: usize,
    source: SearchSource,
    duration_ms: f64,
    cached: bool,
    color: bool,
) -> io::Result<()> {
    let mut stderr = StandardStream::stderr(choice(color));
    write_summary(&mut stderr, count, source, duration_ms, cached)
}

pub fn write_summary<W: WriteColor>(
    out: &mut W,
    count: usize,
    source: SearchSource,
    duration_ms: f64,
    cached: bool,
) -> io::Result<()> {
    let source = match source {
        SearchSource::Index => "index",
        SearchSource::Scan => "scan",
    };

    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "{}", count)?;
    out.reset()?;
    write!(
        out,
        " file{} ({}, {:.1} ms",
        if count == 1 { "" } else { "s" },
        source,
        duration_ms
    )?;
    if cached {
        write!(out, ", cached")?;
    }
    writeln!(out, ")")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    #[test]
    fn test_files_are_sorted() {
        let mut out = NoColor::new(Vec::new());
        let files = vec!["b".to_string(), "a/c".to_string(), "a".to_string()];
        write_files(&mut out, &files).unwrap();
        assert_eq!(String::from_utf8(out.into_inner()).unwrap(), "a\na/c\nb\n");
    }

    #[test]
    fn test_summary() {
        let mut out = NoColor::new(Vec::new());
        write_summary(&mut out, 1, SearchSource::Index, 0.4, true).unwrap();
        assert_eq!(
            String::from_utf8(out.into_inner()).unwrap(),
            "1 file (index, 0.4 ms, cached)\n"
        );

        let mut out = NoColor::new(Vec::new());
        write_summary(&mut out, 0, SearchSource::Scan, 12.0, false).unwrap();
        assert_eq!(
            String::from_utf8(out.into_inner()).unwrap(),
            "0 files (scan, 12.0 ms)\n"
        );
    }
}
