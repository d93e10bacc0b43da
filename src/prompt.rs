//! Interactive confirmation shown before a crawl starts

use std::io::{self, BufRead, Write};

/// Shows the banner and asks the operator to confirm the run
///
/// `Y` or `y` confirms, `N` declines, anything else asks again. End of input
/// counts as declining.
pub fn confirm<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    workbook_path: &str,
) -> io::Result<bool> {
    loop {
        writeln!(output, "Company-Census {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(output)?;
        writeln!(output, "Requirements:")?;
        writeln!(output, "\t - a working Internet connection")?;
        writeln!(output, "\t - the workbook {} next to the program", workbook_path)?;
        writeln!(output)?;
        write!(output, "Continue? (Y/N): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        match line.trim() {
            "Y" | "y" => return Ok(true),
            "N" => return Ok(false),
            _ => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let confirmed = confirm(input.as_bytes(), &mut output, "companies.xlsx").unwrap();
        (confirmed, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_yes_confirms() {
        assert!(answer("Y\n").0);
        assert!(answer("y\n").0);
    }

    #[test]
    fn test_no_declines() {
        assert!(!answer("N\n").0);
    }

    #[test]
    fn test_other_input_asks_again() {
        let (confirmed, output) = answer("maybe\nn\nY\n");
        assert!(confirmed);
        assert_eq!(output.matches("Continue? (Y/N): ").count(), 3);
    }

    #[test]
    fn test_end_of_input_declines() {
        let (confirmed, output) = answer("");
        assert!(!confirmed);
        assert!(output.contains("companies.xlsx"));
    }
}
