const DELIMITERS: [char; 3] = [' ', '\t', '\n'];
const BACKGROUND_MARKER: &str = "&";

/// One command line split into its argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// `argv[0]` is the command name; never empty.
    pub argv: Vec<String>,
    pub background: bool,
}

/// Whitespace tokenizer with an optional cap on the number of tokens.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    capacity: usize,
}

impl Tokenizer {
    /// `capacity == 0` keeps every token.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Returns `None` for a line without a command, including a lone `&`.
    ///
    /// The trailing `&` is looked for before extra tokens are dropped, so
    /// it always selects background execution.
    pub fn tokenize(&self, line: &str) -> Option<ParsedLine> {
        let mut argv: Vec<String> = line
            .split(DELIMITERS)
            .filter(|token| !token.is_empty())
            .map(String::from)
            .collect();

        let background = argv.last().is_some_and(|last| last == BACKGROUND_MARKER);
        if background {
            argv.pop();
        }

        if self.capacity > 0 && argv.len() > self.capacity {
            log::debug!("dropping {} tokens over the limit", argv.len() - self.capacity);
            argv.truncate(self.capacity);
        }

        if argv.is_empty() {
            return None;
        }
        Some(ParsedLine { argv, background })
    }
}
