use std::io::{self, BufRead, Write};

/// Prompt and line input for the interactive loop.
pub struct ShellPrompt {
    prompt: String,
}

impl ShellPrompt {
    pub fn new(prompt: impl Into<String>) -> Self {
        ShellPrompt { prompt: prompt.into() }
    }

    pub fn show_prompt(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", self.prompt)?;
        stdout.flush()
    }

    pub fn read_line(&self) -> io::Result<Option<String>> {
        let line = read_command_line(&mut io::stdin().lock())?;
        if line.is_none() {
            // Leave the terminal on a fresh line after Ctrl-D.
            println!();
        }
        Ok(line)
    }
}

/// Reads one command line without its line terminator; `None` at end of input.
pub fn read_command_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    let end = buf.trim_end_matches(['\n', '\r']).len();
    buf.truncate(end);
    Ok(Some(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_lines_until_eof() {
        let mut input = Cursor::new("ls -l\r\nwc -l  \n");
        assert_eq!(read_command_line(&mut input).unwrap().as_deref(), Some("ls -l"));
        // Trailing blanks are left for the parser.
        assert_eq!(read_command_line(&mut input).unwrap().as_deref(), Some("wc -l  "));
        assert_eq!(read_command_line(&mut input).unwrap(), None);
    }

    #[test]
    fn test_last_line_without_newline() {
        let mut input = Cursor::new("true");
        assert_eq!(read_command_line(&mut input).unwrap().as_deref(), Some("true"));
        assert_eq!(read_command_line(&mut input).unwrap(), None);
    }
}
