//! Identifier case conversion used by the template helpers.

/// `my_awesome_app`
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// `my-awesome-app`
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// `MyAwesomeApp`
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// `My Awesome App`
pub fn to_title_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::new();
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Split on `_`, `-`, whitespace, camelCase transitions and acronym ends
/// (`HTTPServer` -> `http`, `server`). Words come back lowercased.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(next) = chars.peek() {
            let lower_to_upper = c.is_lowercase() && next.is_uppercase();
            let acronym_end = c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(char::is_lowercase);
            if lower_to_upper || acronym_end {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_common_shapes() {
        assert_eq!(to_snake_case("myAwesomeApp"), "my_awesome_app");
        assert_eq!(to_kebab_case("my awesome_app"), "my-awesome-app");
        assert_eq!(to_pascal_case("user-service"), "UserService");
        assert_eq!(to_title_case("user_service"), "User Service");
    }

    #[test]
    fn splits_acronyms() {
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_pascal_case("XMLHttpRequest"), "XmlHttpRequest");
    }
}
