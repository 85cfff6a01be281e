//! Identifier normalization for generated Go code.
//!
//! Schema names may contain separators, spaces and inconsistently cased
//! initialisms. The functions here turn them into identifiers that read like
//! hand-written Go.

use xsdgo_schema::is_primitive_name;

/// Initialisms rewritten to their all-caps form.
///
/// The input is scanned left to right; at each position the first entry in
/// table order that matches is rewritten and the scan resumes after it.
/// `Https` is listed before `Http` and `Uid` before `Ui` so the longer
/// spelling wins.
pub const INITIALISMS: [(&str, &str); 36] = [
    ("Api", "API"),
    ("Ascii", "ASCII"),
    ("Cpu", "CPU"),
    ("Css", "CSS"),
    ("Dns", "DNS"),
    ("Eof", "EOF"),
    ("Guid", "GUID"),
    ("Html", "HTML"),
    ("Https", "HTTPS"),
    ("Http", "HTTP"),
    ("Id", "ID"),
    ("Ip", "IP"),
    ("Json", "JSON"),
    ("Lhs", "LHS"),
    ("Qps", "QPS"),
    ("Ram", "RAM"),
    ("Rhs", "RHS"),
    ("Rpc", "RPC"),
    ("Sla", "SLA"),
    ("Smtp", "SMTP"),
    ("Sql", "SQL"),
    ("Ssh", "SSH"),
    ("Tcp", "TCP"),
    ("Tls", "TLS"),
    ("Ttl", "TTL"),
    ("Udp", "UDP"),
    ("Uid", "UID"),
    ("Ui", "UI"),
    ("Uuid", "UUID"),
    ("Uri", "URI"),
    ("Url", "URL"),
    ("Utf8", "UTF8"),
    ("Vm", "VM"),
    ("Xml", "XML"),
    ("Xsrf", "XSRF"),
    ("Xss", "XSS"),
];

/// Normalizes a raw schema name into a Go identifier.
///
/// Initialisms are canonicalized first, then spaces are removed, then `-` and
/// `_` separated words are folded into camel case. The case of the first
/// character is left alone.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let squished = canonicalize_initialisms(raw).replace(' ', "");
    fold_separator(&fold_separator(&squished, '-'), '_')
}

/// Normalizes a raw schema name into an exported Go identifier.
#[must_use]
pub fn normalize_title(raw: &str) -> String {
    normalize(&title_case(raw))
}

/// Resolves the declared name of a generated type.
///
/// Primitive names pass through untouched. Other names get the prefix, are
/// optionally forced to upper case and are then normalized.
#[must_use]
pub fn type_name(name: &str, prefix: &str, exported: bool) -> String {
    if is_primitive_name(name) {
        return name.to_string();
    }

    let mut resolved = if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{}", title_case(name))
    };
    if exported {
        resolved = title_case(&resolved);
    }
    normalize(&resolved)
}

/// Upper-cases the first letter of every word.
///
/// A word starts after any character that is not a letter, a digit or `_`.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev = ' ';

    for c in s.chars() {
        if is_word_separator(prev) {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        prev = c;
    }

    result
}

fn is_word_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    c.is_whitespace()
}

/// Replaces initialism spellings in one left-to-right pass.
fn canonicalize_initialisms(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    'scan: while !rest.is_empty() {
        for (from, to) in INITIALISMS {
            if let Some(tail) = rest.strip_prefix(from) {
                result.push_str(to);
                rest = tail;
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            result.push(c);
        }
        rest = chars.as_str();
    }

    result
}

/// Drops `sep` and title-cases every piece after the first.
fn fold_separator(s: &str, sep: char) -> String {
    let mut pieces = s.split(sep);
    let mut result = String::with_capacity(s.len());

    if let Some(first) = pieces.next() {
        result.push_str(first);
    }
    for piece in pieces {
        result.push_str(&title_case(piece));
    }

    result
}
