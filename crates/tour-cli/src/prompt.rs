//! Interactive choice parsing.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Zero-based position in the offer.
    Pick(usize),
    Redraw,
    Quit,
}

/// Parse a line typed at the candidate prompt. Candidates are shown numbered
/// from 1; `r` re-draws and `q` quits.
pub fn parse_choice(input: &str, offered: usize) -> Result<Choice, String> {
    let input = input.trim();
    match input.to_ascii_lowercase().as_str() {
        "r" | "redraw" => return Ok(Choice::Redraw),
        "q" | "quit" => return Ok(Choice::Quit),
        _ => {}
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=offered).contains(&n) => Ok(Choice::Pick(n - 1)),
        Ok(n) => Err(format!("{} is not between 1 and {}", n, offered)),
        Err(_) => Err(format!(
            "enter a number 1-{}, 'r' to re-draw or 'q' to quit",
            offered
        )),
    }
}
