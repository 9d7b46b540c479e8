//! Colored terminal output honoring verbose and quiet modes.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use std::io::{self, Write};

/// Writes user-facing messages to the terminal.
///
/// Status messages go to stdout, warnings and errors to stderr. Color is
/// enabled automatically when the stream is a terminal.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Returns true in verbose mode.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Returns true in quiet mode.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn write_colored(
        &self,
        mut stream: StandardStream,
        color: Option<Color>,
        bold: bool,
        prefix: &str,
        message: &str,
    ) -> io::Result<()> {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        stream.set_color(&spec)?;
        write!(stream, "{}", prefix)?;
        stream.reset()?;
        writeln!(stream, "{}", message)?;
        stream.flush()
    }

    fn stdout() -> StandardStream {
        StandardStream::stdout(ColorChoice::Auto)
    }

    fn stderr() -> StandardStream {
        StandardStream::stderr(ColorChoice::Auto)
    }

    /// Prints a message in verbose mode only.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        self.write_colored(Self::stdout(), Some(Color::Cyan), false, "  ", message)
    }

    /// Prints a progress message unless quiet.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_colored(Self::stdout(), Some(Color::Blue), true, "→ ", message)
    }

    /// Prints a success message unless quiet.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_colored(Self::stdout(), Some(Color::Green), true, "✓ ", message)
    }

    /// Prints a warning unless quiet.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_colored(Self::stderr(), Some(Color::Yellow), true, "⚠ ", message)
    }

    /// Prints an error, even in quiet mode.
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.write_colored(Self::stderr(), Some(Color::Red), true, "✗ ", message)
    }

    /// Prints a section header unless quiet.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stream = Self::stdout();
        writeln!(stream)?;
        self.write_colored(stream, Some(Color::White), true, "", title)
    }

    /// Prints an indented line unless quiet.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_colored(Self::stdout(), None, false, "    ", message)
    }
}
