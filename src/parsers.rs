#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::BTreeMap;

/// Decodes the hex digits of a `\x`, `\u` or `\U` escape.
fn char_from_hex(digits: &str) -> Result<char, &'static str> {
    u32::from_str_radix(digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or("valid unicode escape")
}

peg::parser! {
    /// grammars for the Python literals found in exported step tables.
    pub grammar parser() for str {
        /// matches any number of whitespace characters
        rule whitespace() = quiet!{[' ' | '\n' | '\t' | '\r']*}

        /// matches a single hex digit
        rule hex_digit() = ['0'..='9' | 'a'..='f' | 'A'..='F']

        /// parses a backslash escape as written by Python's `repr`
        rule escape() -> char
            = "\\" c:(
                "n" { '\n' }
                / "t" { '\t' }
                / "r" { '\r' }
                / "0" { '\0' }
                / "\\" { '\\' }
                / "'" { '\'' }
                / "\"" { '"' }
                / "x" h:$(hex_digit()*<2>) {? char_from_hex(h) }
                / "u" h:$(hex_digit()*<4>) {? char_from_hex(h) }
                / "U" h:$(hex_digit()*<8>) {? char_from_hex(h) }
            )
            { c }

        /// parses a single quoted string
        rule single_quoted() -> String
            = "'" s:(escape() / c:[^ '\'' | '\\'] { c })* "'"
            { s.into_iter().collect() }

        /// parses a double quoted string
        rule double_quoted() -> String
            = "\"" s:(escape() / c:[^ '"' | '\\'] { c })* "\""
            { s.into_iter().collect() }

        /// parses a string literal in either quote style
        rule string() -> String
            = single_quoted() / double_quoted()

        /// parses one `key: value` pair
        rule entry() -> (String, String)
            = whitespace() k:string() whitespace() ":" whitespace() v:string() whitespace()
            { (k, v) }

        /// parses a dict literal mapping strings to strings, e.g.
        /// `{'python3': 'print(1)\n'}`
        pub rule string_dict() -> BTreeMap<String, String>
            = whitespace() "{" entries:(entry() ** ",") ","? whitespace() "}" whitespace()
            { entries.into_iter().collect() }
    }
}
