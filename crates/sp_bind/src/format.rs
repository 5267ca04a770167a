/// How enum constant names are spelled on the wire.
///
/// Names are split into words at `_`, `-`, spaces and case changes, then
/// joined again in the chosen style.
///
/// ```
/// use sp_bind::NameFormat;
///
/// assert_eq!(NameFormat::Snake.apply("DarkRed"), "dark_red");
/// assert_eq!(NameFormat::ScreamingSnake.apply("darkRed"), "DARK_RED");
/// assert_eq!(NameFormat::Kebab.apply("HTTPServer"), "http-server");
/// assert_eq!(NameFormat::Camel.apply("dark_red"), "darkRed");
/// assert_eq!(NameFormat::Verbatim.apply("Dark_Red"), "Dark_Red");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NameFormat {
    /// Names as declared.
    #[default]
    Verbatim,
    /// `darkred`
    Lower,
    /// `DARKRED`
    Upper,
    /// `dark_red`
    Snake,
    /// `DARK_RED`
    ScreamingSnake,
    /// `dark-red`
    Kebab,
    /// `darkRed`
    Camel,
    /// `DarkRed`
    Pascal,
}

impl NameFormat {
    pub fn apply(self, name: &str) -> String {
        match self {
            NameFormat::Verbatim => name.to_owned(),
            NameFormat::Lower => name.to_lowercase(),
            NameFormat::Upper => name.to_uppercase(),
            NameFormat::Snake => join(name, "_", str::to_lowercase),
            NameFormat::ScreamingSnake => join(name, "_", str::to_uppercase),
            NameFormat::Kebab => join(name, "-", str::to_lowercase),
            NameFormat::Camel => {
                let mut out = String::with_capacity(name.len());
                for (i, word) in words(name).into_iter().enumerate() {
                    if i == 0 {
                        out.push_str(&word.to_lowercase());
                    } else {
                        capitalize_into(&mut out, word);
                    }
                }
                out
            }
            NameFormat::Pascal => {
                let mut out = String::with_capacity(name.len());
                for word in words(name) {
                    capitalize_into(&mut out, word);
                }
                out
            }
        }
    }
}

fn join(name: &str, separator: &str, case: fn(&str) -> String) -> String {
    let parts: Vec<String> = words(name).into_iter().map(case).collect();
    parts.join(separator)
}

fn capitalize_into(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(&chars.as_str().to_lowercase());
    }
}

/// Splits an identifier into words.
///
/// An upper-case letter starts a new word after a lower-case letter or a
/// digit, and inside an upper-case run when a lower-case letter follows
/// (`HTTPServer` is `HTTP` + `Server`).
fn words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let mut start: Option<usize> = None;

    for (i, &(offset, c)) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | ' ') {
            if let Some(s) = start.take() {
                words.push(&name[s..offset]);
            }
            continue;
        }
        if let Some(s) = start
            && c.is_uppercase()
            && i > 0
        {
            let prev = chars[i - 1].1;
            let next_lower = chars.get(i + 1).is_some_and(|&(_, n)| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                words.push(&name[s..offset]);
                start = Some(offset);
                continue;
            }
        }
        if start.is_none() {
            start = Some(offset);
        }
    }
    if let Some(s) = start {
        words.push(&name[s..]);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::{NameFormat, words};

    #[test]
    fn word_boundaries() {
        assert_eq!(words("dark_red"), ["dark", "red"]);
        assert_eq!(words("DarkRed"), ["Dark", "Red"]);
        assert_eq!(words("HTTPServer2Go"), ["HTTP", "Server2", "Go"]);
        assert_eq!(words("__a--b "), ["a", "b"]);
        assert!(words("").is_empty());
    }

    #[test]
    fn every_style() {
        let name = "lightBlue";
        assert_eq!(NameFormat::Lower.apply(name), "lightblue");
        assert_eq!(NameFormat::Upper.apply(name), "LIGHTBLUE");
        assert_eq!(NameFormat::Snake.apply(name), "light_blue");
        assert_eq!(NameFormat::ScreamingSnake.apply(name), "LIGHT_BLUE");
        assert_eq!(NameFormat::Kebab.apply(name), "light-blue");
        assert_eq!(NameFormat::Camel.apply("LIGHT_BLUE"), "lightBlue");
        assert_eq!(NameFormat::Pascal.apply(name), "LightBlue");
    }
}
