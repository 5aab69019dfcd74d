//! Interactive prompt: send a file or quit.

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::warn;

use crate::error::ClientError;

/// How the menu loop ended.
#[derive(Debug)]
pub enum MenuExit {
    /// Option 2, or end of input.
    Quit,
    /// A setup failure the client cannot continue after.
    Fatal(ClientError),
}

/// Run the menu until the user quits.
///
/// `send` performs one exchange for a file path and returns the report.
/// Failed exchanges are printed and the menu is shown again.
pub fn run_menu<R, W, F>(input: R, mut output: W, mut send: F) -> io::Result<MenuExit>
where
    R: BufRead,
    W: Write,
    F: FnMut(&Path) -> Result<String, ClientError>,
{
    let mut lines = input.lines();

    loop {
        writeln!(output, "1. Send File\n2. Quit")?;
        output.flush()?;
        let Some(choice) = lines.next().transpose()? else {
            return Ok(MenuExit::Quit);
        };

        match choice.trim() {
            "1" => {
                write!(output, "Enter path to file: ")?;
                output.flush()?;
                let Some(path) = lines.next().transpose()? else {
                    return Ok(MenuExit::Quit);
                };

                match send(Path::new(path.trim())) {
                    Ok(report) => writeln!(output, "{}", report)?,
                    Err(e) if e.is_fatal() => return Ok(MenuExit::Fatal(e)),
                    Err(e) => {
                        warn!("Send failed: {}", e);
                        writeln!(output, "Error: {}", e)?;
                    }
                }
            }
            "2" => return Ok(MenuExit::Quit),
            _ => writeln!(output, "Please enter 1 or 2")?,
        }
        writeln!(output)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::path::PathBuf;

    use tally_transfer::TransferError;

    fn run(input: &str, send: impl FnMut(&Path) -> Result<String, ClientError>) -> (MenuExit, String) {
        let mut output = Vec::new();
        let exit = run_menu(Cursor::new(input), &mut output, send).unwrap();
        (exit, String::from_utf8(output).unwrap())
    }

    #[test]
    fn quit_immediately() {
        let (exit, output) = run("2\n", |_| unreachable!());
        assert!(matches!(exit, MenuExit::Quit));
        assert_eq!(output, "1. Send File\n2. Quit\n");
    }

    #[test]
    fn invalid_choice_reprompts() {
        let (exit, output) = run("x\n\n2\n", |_| unreachable!());
        assert!(matches!(exit, MenuExit::Quit));
        assert_eq!(output.matches("Please enter 1 or 2").count(), 2);
        assert_eq!(output.matches("1. Send File").count(), 3);
    }

    #[test]
    fn send_prints_report() {
        let mut paths = Vec::new();
        let (exit, output) = run("1\n  notes.txt \n2\n", |path| {
            paths.push(path.to_path_buf());
            Ok("Word Count: 1 | Char Count: 4\n".into())
        });
        assert!(matches!(exit, MenuExit::Quit));
        assert!(output.contains("Enter path to file: "));
        assert!(output.contains("Word Count: 1 | Char Count: 4"));
        assert_eq!(paths, vec![PathBuf::from("notes.txt")]);
    }

    #[test]
    fn transfer_error_returns_to_menu() {
        let (exit, output) = run("1\nempty.txt\n2\n", |path| {
            Err(ClientError::EmptyFile {
                path: path.to_path_buf(),
            })
        });
        assert!(matches!(exit, MenuExit::Quit));
        assert!(output.contains("Error: empty.txt is empty"));
    }

    #[test]
    fn resolve_error_is_fatal() {
        let (exit, _) = run("1\nnotes.txt\n2\n", |_| {
            Err(ClientError::Transfer(TransferError::Resolve {
                address: "nowhere:1".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "no addresses found"),
            }))
        });
        assert!(matches!(exit, MenuExit::Fatal(_)));
    }

    #[test]
    fn end_of_input_quits() {
        let (exit, _) = run("", |_| unreachable!());
        assert!(matches!(exit, MenuExit::Quit));

        let (exit, _) = run("1\n", |_| unreachable!());
        assert!(matches!(exit, MenuExit::Quit));
    }
}
