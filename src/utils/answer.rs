/// Reply to a `(y/n)` prompt. Anything outside the accepted spellings is
/// `Unrecognized`, which callers treat per prompt rather than as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Unrecognized,
}

impl Answer {
    pub fn parse(input: &str) -> Self {
        match input {
            "y" | "Y" | "yes" | "Yes" | "YES" => Answer::Yes,
            "n" | "N" | "no" | "No" | "NO" => Answer::No,
            _ => Answer::Unrecognized,
        }
    }

    pub fn is_yes(self) -> bool {
        self == Answer::Yes
    }
}
