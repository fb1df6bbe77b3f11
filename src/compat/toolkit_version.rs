// Mozilla toolkit version comparison
//
// A version is a list of dot-separated parts. Each part has the shape
// <number-a><string-b><number-c><string-d>, e.g. "0b3pre" or "30.0a1".
// "*" as a part means "any", i.e. larger than every number.

use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
struct VersionPart {
    num_a: i64,
    str_b: Option<String>,
    num_c: i64,
    extra_d: Option<String>,
}

impl VersionPart {
    fn parse(part: &str) -> Self {
        if part == "*" {
            return Self {
                num_a: i64::MAX,
                str_b: None,
                num_c: 0,
                extra_d: None,
            };
        }

        let (num_a, rest) = take_number(part);
        let (mut num_a, mut str_b, rest) = (num_a, None, rest);

        if let Some(after_plus) = rest.strip_prefix('+') {
            // "1+" is shorthand for "2pre"
            num_a = num_a.saturating_add(1);
            str_b = Some("pre".to_string());
            return Self {
                num_a,
                str_b,
                num_c: 0,
                extra_d: non_empty(after_plus),
            };
        }

        let string_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '-')
            .unwrap_or(rest.len());
        if string_end > 0 {
            str_b = Some(rest[..string_end].to_string());
        }
        let (num_c, extra) = take_number(&rest[string_end..]);

        Self {
            num_a,
            str_b,
            num_c,
            extra_d: non_empty(extra),
        }
    }
}

impl Ord for VersionPart {
    fn cmp(&self, other: &Self) -> Ordering {
        self.num_a
            .cmp(&other.num_a)
            .then_with(|| compare_strings(&self.str_b, &other.str_b))
            .then_with(|| self.num_c.cmp(&other.num_c))
            .then_with(|| compare_strings(&self.extra_d, &other.extra_d))
    }
}

impl PartialOrd for VersionPart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A missing string sorts after any present one ("1.0" > "1.0a1").
fn compare_strings(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

/// Parse a leading (optionally negative) integer, returning it and the remainder.
fn take_number(s: &str) -> (i64, &str) {
    let sign_len = usize::from(s.starts_with('-'));
    let digits_end = s[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| i + sign_len)
        .unwrap_or(s.len());

    if digits_end == sign_len {
        return (0, s);
    }

    // Overlong numbers saturate rather than failing
    let value = s[..digits_end].parse::<i64>().unwrap_or(if sign_len == 1 {
        i64::MIN
    } else {
        i64::MAX
    });
    (value, &s[digits_end..])
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Compare two toolkit version strings
///
/// # Examples
/// ```ignore
/// assert_eq!(compare("10.0", "10.1"), Ordering::Less);
/// assert_eq!(compare("57.0", "56.*"), Ordering::Greater);
/// assert_eq!(compare("30.0a1", "30.0"), Ordering::Less);
/// ```
pub fn compare(a: &str, b: &str) -> Ordering {
    let mut left = a.trim().split('.');
    let mut right = b.trim().split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (l, r) => {
                let l = VersionPart::parse(l.unwrap_or("0"));
                let r = VersionPart::parse(r.unwrap_or("0"));
                match l.cmp(&r) {
                    Ordering::Equal => continue,
                    unequal => return unequal,
                }
            }
        }
    }
}

pub fn is_below(version: &str, bound: &str) -> bool {
    compare(version, bound) == Ordering::Less
}

pub fn is_above(version: &str, bound: &str) -> bool {
    compare(version, bound) == Ordering::Greater
}
