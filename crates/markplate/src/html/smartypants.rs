//! Typographic substitutions for text nodes.
//!
//! Converts straight quotes, dashes, ellipses, symbols and simple fractions
//! into their typographic HTML entities while escaping everything else.
//!
//! | Input | Output |
//! |-------|--------|
//! | `"quoted"` | `&ldquo;quoted&rdquo;` |
//! | `it's` | `it&rsquo;s` |
//! | `--` | `&ndash;` (LaTeX rules) or `&mdash;` |
//! | `---` | `&mdash;` (LaTeX rules) |
//! | ` - ` | ` &ndash; ` (without LaTeX rules) |
//! | `...` | `&hellip;` |
//! | `(c)` `(r)` `(tm)` | `&copy;` `&reg;` `&trade;` |
//! | `1/2` `1/4` `3/4` | `&frac12;` `&frac14;` `&frac34;` |
//! | `5/16` (fractions on) | `<sup>5</sup>&frasl;<sub>16</sub>` |

/// Which substitution rules apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmartyRules {
    pub latex_dashes: bool,
    pub fractions: bool,
}

const SYMBOLS: &[(&str, &str)] = &[("(c)", "&copy;"), ("(r)", "&reg;"), ("(tm)", "&trade;")];

/// Appends the typographically converted and escaped `text` to `out`.
pub fn smarten(out: &mut String, text: &str, rules: SmartyRules) {
    let mut prev: Option<char> = None;
    let mut i = 0;

    while let Some(c) = text[i..].chars().next() {
        let rest = &text[i..];
        let consumed = match c {
            '"' => {
                out.push_str(if opens_quote(prev) { "&ldquo;" } else { "&rdquo;" });
                1
            }
            '\'' => {
                out.push_str(if opens_quote(prev) { "&lsquo;" } else { "&rsquo;" });
                1
            }
            '-' => dash(out, rest, prev, rules),
            '.' if rest.starts_with("...") => {
                out.push_str("&hellip;");
                3
            }
            '.' if rest.starts_with(". . .") => {
                out.push_str("&hellip;");
                5
            }
            '(' => match symbol(rest) {
                Some((len, entity)) => {
                    out.push_str(entity);
                    len
                }
                None => {
                    out.push('(');
                    1
                }
            },
            '0'..='9' if !prev.is_some_and(|p| p.is_alphanumeric()) => {
                fraction(out, rest, rules)
            }
            '&' => {
                out.push_str("&amp;");
                1
            }
            '<' => {
                out.push_str("&lt;");
                1
            }
            '>' => {
                out.push_str("&gt;");
                1
            }
            _ => {
                out.push(c);
                c.len_utf8()
            }
        };
        prev = text[..i + consumed].chars().next_back();
        i += consumed;
    }
}

fn opens_quote(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(p) => p.is_whitespace() || matches!(p, '(' | '[' | '{' | '-' | '\u{2014}'),
    }
}

fn dash(out: &mut String, rest: &str, prev: Option<char>, rules: SmartyRules) -> usize {
    if rules.latex_dashes {
        if rest.starts_with("---") {
            out.push_str("&mdash;");
            return 3;
        }
        if rest.starts_with("--") {
            out.push_str("&ndash;");
            return 2;
        }
    } else {
        if rest.starts_with("--") {
            out.push_str("&mdash;");
            return 2;
        }
        let spaced_before = prev.is_some_and(char::is_whitespace);
        let spaced_after = rest[1..].starts_with(char::is_whitespace);
        if spaced_before && spaced_after {
            out.push_str("&ndash;");
            return 1;
        }
    }
    out.push('-');
    1
}

fn symbol(rest: &str) -> Option<(usize, &'static str)> {
    SYMBOLS.iter().find_map(|(pattern, entity)| {
        let candidate = rest.get(..pattern.len())?;
        candidate
            .eq_ignore_ascii_case(pattern)
            .then_some((pattern.len(), *entity))
    })
}

/// Handles a digit run starting a word. Always consumes at least one byte.
fn fraction(out: &mut String, rest: &str, rules: SmartyRules) -> usize {
    let digits = |s: &str| s.bytes().take_while(u8::is_ascii_digit).count();

    let num_len = digits(rest);
    let after_num = &rest[num_len..];
    let den_len = if after_num.starts_with('/') {
        digits(&after_num[1..])
    } else {
        0
    };

    if den_len > 0 {
        let total = num_len + 1 + den_len;
        let at_boundary = match rest[total..].chars().next() {
            None => true,
            Some(next) => !next.is_alphanumeric() && next != '/',
        };
        if at_boundary {
            let num = &rest[..num_len];
            let den = &rest[num_len + 1..total];
            if rules.fractions {
                out.push_str("<sup>");
                out.push_str(num);
                out.push_str("</sup>&frasl;<sub>");
                out.push_str(den);
                out.push_str("</sub>");
                return total;
            }
            let entity = match (num, den) {
                ("1", "2") => Some("&frac12;"),
                ("1", "4") => Some("&frac14;"),
                ("3", "4") => Some("&frac34;"),
                _ => None,
            };
            if let Some(entity) = entity {
                out.push_str(entity);
                return total;
            }
        }
    }

    out.push_str(&rest[..num_len]);
    num_len
}
