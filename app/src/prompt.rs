//! Interactive query entry for the `scrape` command.

use anyhow::bail;
use placescout_core::SearchQuery;
use std::io::{BufRead, Write};

/// Line-based prompt over any reader/writer pair.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for a search query. Empty input is rejected.
    pub fn ask_query(&mut self) -> anyhow::Result<SearchQuery> {
        writeln!(
            self.output,
            "\nWhat would you like to search for? (e.g., \"dentist chicago\" or \"restaurants paris\")"
        )?;
        let Some(answer) = self.ask("Enter search query: ")? else {
            bail!("no search query provided");
        };
        Ok(SearchQuery::new(answer)?)
    }

    /// Show what is about to be searched.
    pub fn show_plan(&mut self, query: &SearchQuery, search_url: &str) -> std::io::Result<()> {
        writeln!(self.output, "\nFormatted search query: {}", query.formatted())?;
        writeln!(self.output, "Full URL: {search_url}")
    }

    /// Ask a yes/no question; anything starting with `y` counts as yes.
    pub fn confirm(&mut self, question: &str) -> std::io::Result<bool> {
        let answer = self.ask(&format!("\n{question} (y/n): "))?;
        Ok(answer.is_some_and(|a| a.trim().to_lowercase().starts_with('y')))
    }

    /// Print `message` and read one line. `None` at end of input.
    fn ask(&mut self, message: &str) -> std::io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string()))
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placescout_core::CoreError;
    use std::io::Cursor;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_ask_query() {
        let mut p = prompt("dentist   chicago\n");
        let query = p.ask_query().expect("query");
        assert_eq!(query.formatted(), "dentist+chicago");

        let output = String::from_utf8(p.into_output()).expect("utf8");
        assert!(output.contains("Enter search query: "));
    }

    #[test]
    fn test_blank_query_rejected() {
        let err = prompt("   \n").ask_query().expect_err("blank query");
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::EmptyQuery)
        ));
    }

    #[test]
    fn test_query_at_end_of_input() {
        assert!(prompt("").ask_query().is_err());
    }

    #[test]
    fn test_confirm_answers() {
        assert!(prompt("y\n").confirm("Is this correct?").expect("confirm"));
        assert!(prompt("Yes please\n").confirm("Is this correct?").expect("confirm"));
        assert!(!prompt("n\n").confirm("Is this correct?").expect("confirm"));
        assert!(!prompt("\n").confirm("Is this correct?").expect("confirm"));
        assert!(!prompt("").confirm("Is this correct?").expect("confirm"));
    }

    #[test]
    fn test_show_plan() {
        let mut p = prompt("");
        let query = SearchQuery::new("pizza brooklyn").expect("query");
        p.show_plan(&query, "https://www.google.com/maps/search/pizza+brooklyn/")
            .expect("write");

        let output = String::from_utf8(p.into_output()).expect("utf8");
        assert!(output.contains("Formatted search query: pizza+brooklyn"));
        assert!(output.contains("Full URL: https://www.google.com/maps/search/pizza+brooklyn/"));
    }
}
