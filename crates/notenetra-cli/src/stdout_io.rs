use std::io::{self, Write};

/// Writes `text` to stdout. A reader that hangs up early is not an error.
pub fn write_stdout_text(text: &str) -> io::Result<()> {
    write_stdout(text, false)
}

/// Like [`write_stdout_text`], followed by a newline.
pub fn write_stdout_line(text: &str) -> io::Result<()> {
    write_stdout(text, true)
}

fn write_stdout(text: &str, newline: bool) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    tolerate_broken_pipe(stdout.write_all(text.as_bytes()))?;
    if newline {
        tolerate_broken_pipe(stdout.write_all(b"\n"))?;
    }
    tolerate_broken_pipe(stdout.flush())
}

fn tolerate_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
