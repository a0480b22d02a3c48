//! Incremental printing of streamed replies.

use std::io::{self, Write};

use crate::models::Message;

/// Prints a reply as it grows.
///
/// Each progress update carries the whole text so far; only the part not
/// yet printed is written.
#[derive(Debug, Default)]
pub struct Renderer {
    printed: String,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print whatever `text` adds to what is already on screen.
    pub fn progress<W: Write>(&mut self, out: &mut W, text: &str) -> io::Result<()> {
        match text.strip_prefix(self.printed.as_str()) {
            Some(delta) => out.write_all(delta.as_bytes())?,
            None => {
                // The server rewrote earlier text; start over on a new line
                writeln!(out)?;
                out.write_all(text.as_bytes())?;
            }
        }
        out.flush()?;
        self.printed = text.to_string();
        Ok(())
    }

    /// Print the rest of the final reply and end the line.
    pub fn finish<W: Write>(&mut self, out: &mut W, text: &str) -> io::Result<()> {
        self.progress(out, text)?;
        writeln!(out)?;
        self.printed.clear();
        Ok(())
    }

    /// End the line after an interrupted reply.
    pub fn abort<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if !self.printed.is_empty() {
            writeln!(out)?;
            self.printed.clear();
        }
        Ok(())
    }
}

/// Print the conversation, one message per line.
pub fn print_history<W: Write>(out: &mut W, history: &[Message]) -> io::Result<()> {
    if history.is_empty() {
        return writeln!(out, "(no messages)");
    }
    for message in history {
        writeln!(out, "[{}] {}", message.role, message.text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_progress_prints_deltas() {
        let mut renderer = Renderer::new();
        let mut out = Vec::new();

        renderer.progress(&mut out, "Hel").unwrap();
        renderer.progress(&mut out, "Hello").unwrap();
        renderer.progress(&mut out, "Hello").unwrap();
        renderer.finish(&mut out, "Hello!").unwrap();

        assert_eq!(output(out), "Hello!\n");
    }

    #[test]
    fn test_rewritten_text_starts_new_line() {
        let mut renderer = Renderer::new();
        let mut out = Vec::new();

        renderer.progress(&mut out, "abc").unwrap();
        renderer.progress(&mut out, "xyz").unwrap();

        assert_eq!(output(out), "abc\nxyz");
    }

    #[test]
    fn test_finish_resets_for_next_reply() {
        let mut renderer = Renderer::new();
        let mut out = Vec::new();

        renderer.finish(&mut out, "one").unwrap();
        renderer.progress(&mut out, "two").unwrap();

        assert_eq!(output(out), "one\ntwo");
    }

    #[test]
    fn test_abort() {
        let mut renderer = Renderer::new();
        let mut out = Vec::new();

        renderer.abort(&mut out).unwrap();
        renderer.progress(&mut out, "part").unwrap();
        renderer.abort(&mut out).unwrap();

        assert_eq!(output(out), "part\n");
    }

    #[test]
    fn test_print_history() {
        let mut out = Vec::new();
        print_history(&mut out, &[]).unwrap();
        print_history(
            &mut out,
            &[Message::new(Role::User, "hi"), Message::new(Role::Assistant, "hello")],
        )
        .unwrap();

        assert_eq!(output(out), "(no messages)\n[user] hi\n[assistant] hello\n");
    }
}
