//! Interactive yes/no confirmation.

use std::io::{self, BufRead, Write};

/// Ask a yes/no question on the terminal.
pub fn ask_yes_no(question: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    ask_yes_no_with(question, &mut stdin.lock(), &mut stdout.lock())
}

/// Ask a yes/no question until the answer is `y`/`yes` or `n`/`no`.
///
/// End of input counts as "no".
pub fn ask_yes_no_with<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    let mut line = String::new();
    loop {
        write!(output, "{} (y/n): ", question)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please enter 'y' or 'n'.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(answers: &str) -> (bool, String) {
        let mut output = Vec::new();
        let answer = ask_yes_no_with("Continue?", &mut Cursor::new(answers), &mut output).unwrap();
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_yes_and_no() {
        assert!(ask("y\n").0);
        assert!(ask(" YES \n").0);
        assert!(!ask("n\n").0);
        assert!(!ask("No\n").0);
    }

    #[test]
    fn test_reasks_on_invalid_answer() {
        let (answer, output) = ask("maybe\ny\n");
        assert!(answer);
        assert_eq!(output.matches("Continue? (y/n): ").count(), 2);
        assert!(output.contains("Please enter 'y' or 'n'."));
    }

    #[test]
    fn test_end_of_input_is_no() {
        assert!(!ask("").0);
        assert!(!ask("what\n").0);
    }
}
