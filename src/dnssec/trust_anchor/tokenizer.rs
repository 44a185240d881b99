/// Whitespace separated word splitter for anchor lines.
///
/// Single or double quotes group text containing whitespace (`"a b"` is one
/// word `a b`), and may appear in the middle of a word. A backslash takes the
/// next character literally; [`next_escaped_word`](Words::next_escaped_word)
/// keeps the backslash for fields with their own escape syntax, like domain
/// names.
#[derive(Debug, Clone)]
pub struct Words<'a> {
    rest: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordError {
    UnbalancedQuote,
    TrailingBackslash,
}

impl<'a> Words<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    /// Extract the next word, or `None` once the line is exhausted
    pub fn next_word(&mut self) -> Result<Option<String>, WordError> {
        self.extract(false)
    }

    /// Like [`next_word`](Self::next_word) but escape sequences are passed
    /// through untouched, e.g. `a\.b` stays `a\.b`
    pub fn next_escaped_word(&mut self) -> Result<Option<String>, WordError> {
        self.extract(true)
    }

    fn extract(&mut self, retain_escapes: bool) -> Result<Option<String>, WordError> {
        let s = self.rest.trim_start();
        if s.is_empty() {
            self.rest = s;
            return Ok(None);
        }

        let mut word = String::new();
        let mut quote: Option<char> = None;
        let mut chars = s.char_indices();
        let mut end = s.len();

        while let Some((i, c)) = chars.next() {
            match (quote, c) {
                (_, '\\') => match chars.next() {
                    Some((_, escaped)) => {
                        if retain_escapes {
                            word.push('\\');
                        }
                        word.push(escaped);
                    }
                    None => return Err(WordError::TrailingBackslash),
                },
                (Some(q), c) if c == q => quote = None,
                (Some(_), c) => word.push(c),
                (None, '"' | '\'') => quote = Some(c),
                (None, c) if c.is_whitespace() => {
                    end = i;
                    break;
                }
                (None, c) => word.push(c),
            }
        }

        if quote.is_some() {
            return Err(WordError::UnbalancedQuote);
        }

        self.rest = &s[end..];
        Ok(Some(word))
    }

    /// Extract up to `N` words. The returned count tells how many were found.
    pub fn next_words<const N: usize>(&mut self) -> Result<(usize, [String; N]), WordError> {
        let mut words: [String; N] = std::array::from_fn(|_| String::new());
        let mut found = 0;

        for slot in words.iter_mut() {
            match self.next_word()? {
                Some(word) => {
                    *slot = word;
                    found += 1;
                }
                None => break,
            }
        }

        Ok((found, words))
    }

    /// Whether nothing but whitespace remains
    pub fn is_exhausted(&self) -> bool {
        self.rest.trim().is_empty()
    }

    pub fn remainder(&self) -> &'a str {
        self.rest.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(line: &str) -> Result<Vec<String>, WordError> {
        let mut words = Words::new(line);
        let mut out = Vec::new();
        while let Some(word) = words.next_word()? {
            out.push(word);
        }
        Ok(out)
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(
            collect("  example.com   IN\tDS 1 ").unwrap(),
            vec!["example.com", "IN", "DS", "1"]
        );
        assert!(collect("").unwrap().is_empty());
        assert!(collect("   ").unwrap().is_empty());
    }

    #[test]
    fn test_quoted_words() {
        assert_eq!(
            collect(r#""example.com" 'two words' mid"dle"x"#).unwrap(),
            vec!["example.com", "two words", "middlex"]
        );
        assert_eq!(collect(r#""""#).unwrap(), vec![""]);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(collect(r"a\ b c").unwrap(), vec!["a b", "c"]);
        assert_eq!(collect(r"a\"), Err(WordError::TrailingBackslash));
    }

    #[test]
    fn test_escaped_word_keeps_backslashes() {
        let mut words = Words::new(r#"a\.b\ c.example "q\"d" IN"#);
        assert_eq!(
            words.next_escaped_word().unwrap().as_deref(),
            Some(r"a\.b\ c.example")
        );
        assert_eq!(words.next_escaped_word().unwrap().as_deref(), Some(r#"q\"d"#));
        assert_eq!(words.next_word().unwrap().as_deref(), Some("IN"));
        assert_eq!(
            Words::new(r"x\").next_escaped_word(),
            Err(WordError::TrailingBackslash)
        );
    }

    #[test]
    fn test_unbalanced_quote() {
        assert_eq!(collect(r#""example.com"#), Err(WordError::UnbalancedQuote));
    }

    #[test]
    fn test_next_words_counts() {
        let mut words = Words::new("IN DS");
        let (n, [class, rtype, extra]) = words.next_words::<3>().unwrap();
        assert_eq!(n, 2);
        assert_eq!(class, "IN");
        assert_eq!(rtype, "DS");
        assert!(extra.is_empty());
        assert!(words.is_exhausted());
    }

    #[test]
    fn test_remainder() {
        let mut words = Words::new("example.com trailing stuff ");
        words.next_word().unwrap();
        assert!(!words.is_exhausted());
        assert_eq!(words.remainder(), "trailing stuff");
    }
}
