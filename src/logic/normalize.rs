#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Digit,
    Letter,
    Bracket,
}

/// Rewrite a raw logic expression into its canonical token stream.
///
/// The text is lowercased and a space is inserted wherever the character
/// class changes (digit, letter, bracket) and between two consecutive
/// brackets. Characters outside those classes, whitespace included, take the
/// class of the character before them. Runs of spaces collapse to one and
/// the result is trimmed.
///
/// ```
/// assert_eq!(fitrule::normalize("13       and (15     )"), "13 and ( 15 )");
/// assert_eq!(fitrule::normalize("(1AND2)OR not3"), "( 1 and 2 ) or not 3");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut spaced = String::with_capacity(lowered.len() * 2);
    let mut prev: Option<CharClass> = None;

    for c in lowered.chars() {
        let c = if c.is_whitespace() { ' ' } else { c };
        let class = match c {
            '0'..='9' => Some(CharClass::Digit),
            'a'..='z' => Some(CharClass::Letter),
            '(' | ')' => Some(CharClass::Bracket),
            _ => prev,
        };
        if class != prev || class == Some(CharClass::Bracket) {
            spaced.push(' ');
        }
        spaced.push(c);
        prev = class;
    }

    spaced
        .split(' ')
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
