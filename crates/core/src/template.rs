pub const MAX_COUNTER_WIDTH: usize = 16;
pub const MAX_RANDOM_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Literal(String),
    Tag(Tag),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    FullName(Range),
    Stem(Range),
    Extension(Range),
    ParentDir(Range),
    GrandparentDir(Range),
    Counter(CounterWidth),
    RandomHex { uppercase: bool, width: usize },
    DateTime(DateField),
    MetaTag(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterWidth {
    /// Use the width from the profile's counter settings.
    Profile,
    /// Width of the largest counter value reached across the batch.
    Auto,
    Fixed(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Year,
    ShortYear,
    Month,
    MonthName,
    Day,
    Hour,
    Minute,
    Second,
    LocaleDate,
    LocaleTime,
}

impl DateField {
    pub fn chrono_spec(self) -> &'static str {
        match self {
            Self::Year => "%Y",
            Self::ShortYear => "%y",
            Self::Month => "%m",
            Self::MonthName => "%b",
            Self::Day => "%d",
            Self::Hour => "%H",
            Self::Minute => "%M",
            Self::Second => "%S",
            Self::LocaleDate => "%x",
            Self::LocaleTime => "%X",
        }
    }

    fn from_code(code: char) -> Option<Self> {
        match code {
            'Y' => Some(Self::Year),
            'y' => Some(Self::ShortYear),
            'm' => Some(Self::Month),
            'b' => Some(Self::MonthName),
            'd' => Some(Self::Day),
            'H' => Some(Self::Hour),
            'M' => Some(Self::Minute),
            'S' => Some(Self::Second),
            'x' => Some(Self::LocaleDate),
            'X' => Some(Self::LocaleTime),
            _ => None,
        }
    }
}

/// Character range attached to a name/extension/directory tag.
///
/// Indexes count Unicode code points. Negative offsets count from the
/// end of the string; `to <= 0` is an offset from the end with 0
/// meaning "to the end".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub from: isize,
    pub to: isize,
}

impl Range {
    fn with_len(from: isize, len: usize) -> Self {
        let to = from.saturating_add_unsigned(len);
        Range {
            from,
            to: if from < 0 && to > 0 { 0 } else { to },
        }
    }

    pub fn substr(&self, src: &str) -> Option<String> {
        let src: Vec<char> = src.chars().collect();
        let src_len = src.len();
        let begin = if self.from < 0 {
            src_len.saturating_add_signed(self.from)
        } else {
            self.from as usize
        };

        if begin >= src_len {
            return None;
        }
        let end = if self.to > 0 {
            self.to as usize
        } else {
            src_len.saturating_add_signed(self.to)
        }
        .clamp(begin, src_len);
        Some(src[begin..end].iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    parts: Vec<TemplatePart>,
}

impl Template {
    /// Compiles a template string. Never fails: malformed fragments
    /// degrade to literal text and stay in the output verbatim.
    pub fn compile(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '$' => match scan_dollar(&chars, i) {
                    Some((tag, next)) => {
                        if let Some(tag) = tag {
                            flush_literal(&mut parts, &mut literal);
                            parts.push(TemplatePart::Tag(tag));
                        } else {
                            literal.push('$');
                        }
                        i = next;
                    }
                    None => {
                        literal.push('$');
                        i += 1;
                    }
                },
                '%' => match chars.get(i + 1) {
                    Some('%') => {
                        literal.push('%');
                        i += 2;
                    }
                    Some(&code) => match DateField::from_code(code) {
                        Some(field) => {
                            flush_literal(&mut parts, &mut literal);
                            parts.push(TemplatePart::Tag(Tag::DateTime(field)));
                            i += 2;
                        }
                        None => {
                            literal.push('%');
                            i += 1;
                        }
                    },
                    None => {
                        literal.push('%');
                        i += 1;
                    }
                },
                ch => {
                    literal.push(ch);
                    i += 1;
                }
            }
        }

        flush_literal(&mut parts, &mut literal);
        Template { parts }
    }

    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }
}

fn flush_literal(parts: &mut Vec<TemplatePart>, literal: &mut String) {
    if !literal.is_empty() {
        parts.push(TemplatePart::Literal(std::mem::take(literal)));
    }
}

/// Scans a `$`-tag starting at `start` (which points at the `$`).
/// Returns the parsed tag (`None` for the `$$` escape) and the index
/// past the consumed text, or `None` when the text is not a tag.
fn scan_dollar(chars: &[char], start: usize) -> Option<(Option<Tag>, usize)> {
    let code = *chars.get(start + 1)?;
    let mut i = start + 2;
    match code {
        '$' => Some((None, i)),
        'n' | 'N' | 'e' | 'p' | 'g' => {
            let range = match scan_parenthesized(chars, i)
                .and_then(|(text, next)| parse_range(&text).map(|range| (range, next)))
            {
                Some((range, next)) => {
                    i = next;
                    range
                }
                None => Range::default(),
            };
            let tag = match code {
                'n' => Tag::Stem(range),
                'N' => Tag::FullName(range),
                'e' => Tag::Extension(range),
                'p' => Tag::ParentDir(range),
                _ => Tag::GrandparentDir(range),
            };
            Some((Some(tag), i))
        }
        'c' => {
            let width = match scan_parenthesized(chars, i) {
                Some((text, next)) if text == "a" => {
                    i = next;
                    CounterWidth::Auto
                }
                Some((text, next)) => match text.parse::<usize>() {
                    Ok(value) => {
                        i = next;
                        CounterWidth::Fixed(value.min(MAX_COUNTER_WIDTH))
                    }
                    Err(_) => CounterWidth::Profile,
                },
                None => CounterWidth::Profile,
            };
            Some((Some(Tag::Counter(width)), i))
        }
        'x' | 'X' => {
            let width = match scan_parenthesized(chars, i) {
                Some((text, next)) => match text.parse::<usize>() {
                    Ok(value) => {
                        i = next;
                        if value > 0 {
                            value.min(MAX_RANDOM_WIDTH)
                        } else {
                            MAX_RANDOM_WIDTH
                        }
                    }
                    Err(_) => MAX_RANDOM_WIDTH,
                },
                // A dangling `$x(` stays literal.
                None if chars.get(i) == Some(&'(') => return None,
                None => MAX_RANDOM_WIDTH,
            };
            Some((
                Some(Tag::RandomHex {
                    uppercase: code == 'X',
                    width,
                }),
                i,
            ))
        }
        'T' => {
            let (text, next) = scan_parenthesized(chars, i)?;
            if is_tag_id(&text) {
                Some((Some(Tag::MetaTag(text)), next))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Consumes `(text)` at `start`, returning the inner text and the index
/// past the closing paren. `None` when there is no opening paren or the
/// paren is never closed.
fn scan_parenthesized(chars: &[char], start: usize) -> Option<(String, usize)> {
    if chars.get(start) != Some(&'(') {
        return None;
    }
    let mut text = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        if chars[i] == ')' {
            return Some((text, i + 1));
        }
        text.push(chars[i]);
        i += 1;
    }
    None
}

/// Accepted range forms: `from:to`, `from:`, `:to`, `:`, `from,len`
/// and a bare `from`. Empty sides default to 0.
fn parse_range(text: &str) -> Option<Range> {
    if let Some((from, to)) = text.split_once(':') {
        let from = parse_index(from)?;
        let to = parse_index(to)?;
        return Some(Range { from, to });
    }
    if let Some((from, len)) = text.split_once(',') {
        let from = from.parse::<isize>().ok()?;
        let len = len.parse::<usize>().ok()?;
        return Some(Range::with_len(from, len));
    }
    let from = text.parse::<isize>().ok()?;
    Some(Range { from, to: 0 })
}

fn parse_index(text: &str) -> Option<isize> {
    if text.is_empty() {
        Some(0)
    } else {
        text.parse().ok()
    }
}

/// Metadata tag ids look like `Audio.Title`: dot-separated identifier
/// groups, at least two of them.
fn is_tag_id(text: &str) -> bool {
    let mut groups = 0;
    for group in text.split('.') {
        let mut chars = group.chars();
        let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_alpha || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return false;
        }
        groups += 1;
    }
    groups >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(s: &str) -> TemplatePart {
        TemplatePart::Literal(s.to_string())
    }

    #[test]
    fn compile_mixed_template() {
        let template = Template::compile("new$$-$c-$n.$e(1:3)");
        assert_eq!(
            template.parts(),
            &[
                literal("new$-"),
                TemplatePart::Tag(Tag::Counter(CounterWidth::Profile)),
                literal("-"),
                TemplatePart::Tag(Tag::Stem(Range::default())),
                literal("."),
                TemplatePart::Tag(Tag::Extension(Range { from: 1, to: 3 })),
            ]
        );
    }

    #[test]
    fn compile_ranges() {
        let template = Template::compile("$n(:3)$n(5:)$N(-4)$p(2,3)");
        assert_eq!(
            template.parts(),
            &[
                TemplatePart::Tag(Tag::Stem(Range { from: 0, to: 3 })),
                TemplatePart::Tag(Tag::Stem(Range { from: 5, to: 0 })),
                TemplatePart::Tag(Tag::FullName(Range { from: -4, to: 0 })),
                TemplatePart::Tag(Tag::ParentDir(Range { from: 2, to: 5 })),
            ]
        );
    }

    #[test]
    fn compile_counter_widths() {
        let template = Template::compile("$c$c(3)$c(a)$c(99)");
        assert_eq!(
            template.parts(),
            &[
                TemplatePart::Tag(Tag::Counter(CounterWidth::Profile)),
                TemplatePart::Tag(Tag::Counter(CounterWidth::Fixed(3))),
                TemplatePart::Tag(Tag::Counter(CounterWidth::Auto)),
                TemplatePart::Tag(Tag::Counter(CounterWidth::Fixed(MAX_COUNTER_WIDTH))),
            ]
        );
    }

    #[test]
    fn compile_random_tags() {
        let template = Template::compile("$x(4)$X$x(0)");
        assert_eq!(
            template.parts(),
            &[
                TemplatePart::Tag(Tag::RandomHex {
                    uppercase: false,
                    width: 4
                }),
                TemplatePart::Tag(Tag::RandomHex {
                    uppercase: true,
                    width: MAX_RANDOM_WIDTH
                }),
                TemplatePart::Tag(Tag::RandomHex {
                    uppercase: false,
                    width: MAX_RANDOM_WIDTH
                }),
            ]
        );
    }

    #[test]
    fn compile_metatags() {
        let template = Template::compile("$T(Audio.AlbumArtist) - $T(Audio.Title).$e");
        assert_eq!(
            template.parts(),
            &[
                TemplatePart::Tag(Tag::MetaTag("Audio.AlbumArtist".to_string())),
                literal(" - "),
                TemplatePart::Tag(Tag::MetaTag("Audio.Title".to_string())),
                literal("."),
                TemplatePart::Tag(Tag::Extension(Range::default())),
            ]
        );
    }

    #[test]
    fn compile_date_codes() {
        let template = Template::compile("$n-%Y%m%d-%q.%e");
        assert_eq!(
            template.parts(),
            &[
                TemplatePart::Tag(Tag::Stem(Range::default())),
                literal("-"),
                TemplatePart::Tag(Tag::DateTime(DateField::Year)),
                TemplatePart::Tag(Tag::DateTime(DateField::Month)),
                TemplatePart::Tag(Tag::DateTime(DateField::Day)),
                literal("-%q.%e"),
            ]
        );
    }

    #[test]
    fn malformed_fragments_stay_literal() {
        assert_eq!(Template::compile("$r$z").parts(), &[literal("$r$z")]);
        assert_eq!(
            Template::compile("$T(broken").parts(),
            &[literal("$T(broken")]
        );
        assert_eq!(
            Template::compile("$T(noDot)").parts(),
            &[literal("$T(noDot)")]
        );
        assert_eq!(
            Template::compile("$n(abc)").parts(),
            &[
                TemplatePart::Tag(Tag::Stem(Range::default())),
                literal("(abc)"),
            ]
        );
        assert_eq!(
            Template::compile("$x(unterminated").parts(),
            &[literal("$x(unterminated")]
        );
        assert_eq!(Template::compile("100%").parts(), &[literal("100%")]);
        assert_eq!(Template::compile("50%%off").parts(), &[literal("50%off")]);
        assert_eq!(Template::compile("$").parts(), &[literal("$")]);
    }

    #[test]
    fn compile_never_panics_on_junk() {
        let junk = [
            "",
            "$",
            "$$",
            "$(",
            "$c(",
            "$x(((",
            "$T(",
            "$T()",
            "$n(1:",
            "$n(-)",
            "%",
            "%%%",
            "$T(a.b,opt",
            "日本語$n(1:2)テスト",
            "\u{0}$c\u{7f}%",
        ];
        for source in junk {
            let _ = Template::compile(source);
        }
    }

    #[test]
    fn range_substr_counts_code_points() {
        assert_eq!(
            Range::default().substr("Hello, World!").as_deref(),
            Some("Hello, World!")
        );
        assert_eq!(
            Range { from: -4, to: 0 }.substr("Привет, Мир!").as_deref(),
            Some("Мир!")
        );
        assert_eq!(
            Range { from: 6, to: 7 }.substr("Привет, Мир!").as_deref(),
            Some(",")
        );
        assert_eq!(
            Range { from: -4, to: -1 }.substr("Привет, Мир!").as_deref(),
            Some("Мир")
        );
        assert_eq!(Range { from: 40, to: 42 }.substr("Hello"), None);
        // An end index equal to the string length means "to the end".
        assert_eq!(
            Range { from: 0, to: 5 }.substr("Hello").as_deref(),
            Some("Hello")
        );
    }
}
