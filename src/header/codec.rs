//! Header detection, stripping and rendering.
//!
//! A generated header is the leading comment block of a file whose body
//! carries the `@Description` tag. Any other leading comment (a license
//! banner, a file-level doc comment) is foreign and never consumed.

use chrono::NaiveDateTime;
use tracing::debug;

use super::delimiter::DelimiterProfile;

/// Display format for both header timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header fields, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Description,
    Author,
    Developer,
    Date,
    LastEditTime,
}

impl HeaderField {
    pub const ALL: [HeaderField; 5] = [
        HeaderField::Description,
        HeaderField::Author,
        HeaderField::Developer,
        HeaderField::Date,
        HeaderField::LastEditTime,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            HeaderField::Description => "Description",
            HeaderField::Author => "Author",
            HeaderField::Developer => "Developer",
            HeaderField::Date => "Date",
            HeaderField::LastEditTime => "LastEditTime",
        }
    }
}

/// Marks a leading comment as one this tool wrote.
pub const DESCRIPTION_TAG: &str = "@Description";

/// Provenance for one file, resolved fresh on every commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitMetadataRecord {
    pub description: String,
    pub author: String,
    pub developer: String,
    pub created_at: NaiveDateTime,
    pub last_edited_at: NaiveDateTime,
}

impl GitMetadataRecord {
    pub fn value(&self, field: HeaderField) -> String {
        match field {
            HeaderField::Description => self.description.clone(),
            HeaderField::Author => self.author.clone(),
            HeaderField::Developer => self.developer.clone(),
            HeaderField::Date => self.created_at.format(TIMESTAMP_FORMAT).to_string(),
            HeaderField::LastEditTime => self.last_edited_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Remove a previously generated header, if the file starts with one.
///
/// Returns `content` unchanged when there is no leading comment, when the
/// leading comment is foreign, or when it is never closed. After a stripped
/// header the separator whitespace is dropped; the rest of the file is kept
/// byte for byte.
pub fn strip<'a>(content: &'a str, profile: &DelimiterProfile) -> &'a str {
    let body = content.trim_start();
    if !body.starts_with(profile.open.as_str()) {
        return content;
    }

    let after_open = profile.open.len();
    let Some(close_at) = body[after_open..].find(profile.close.as_str()) else {
        debug!(file_type = %profile.file_type, "Unterminated leading comment, leaving content as is");
        return content;
    };
    let end = after_open + close_at + profile.close.len();

    let candidate = body[..end].trim();
    if candidate.contains(DESCRIPTION_TAG) {
        body[end..].trim_start()
    } else {
        content
    }
}

/// Render a header block, including the blank separator line.
pub fn render(metadata: &GitMetadataRecord, profile: &DelimiterProfile) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(&profile.open);
    out.push('\n');
    for field in HeaderField::ALL {
        out.push_str(" * @");
        out.push_str(field.tag());
        out.push_str(": ");
        out.push_str(&render_value(&metadata.value(field), profile));
        out.push('\n');
    }
    out.push_str(&profile.rendered_close());
    out.push_str("\n\n");
    out
}

/// A field value made safe to sit inside the comment: the close marker is
/// broken up and continuation lines keep the ` * ` prefix.
fn render_value(value: &str, profile: &DelimiterProfile) -> String {
    let close = profile.close.as_str();
    let broken = broken_close(close);
    let mut safe = value.to_string();
    while broken != close && safe.contains(close) {
        safe = safe.replace(close, &broken);
    }

    let mut lines = safe.lines();
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push_str("\n *");
        if !line.is_empty() {
            out.push(' ');
            out.push_str(line);
        }
    }
    out
}

/// `*/` becomes `* /`, `-->` becomes `-- >`.
fn broken_close(close: &str) -> String {
    match close.char_indices().last() {
        Some((i, _)) if i > 0 => format!("{} {}", &close[..i], &close[i..]),
        _ => close.to_string(),
    }
}

/// Replace any generated header with a freshly rendered one.
pub fn inject(content: &str, metadata: &GitMetadataRecord, profile: &DelimiterProfile) -> String {
    let mut out = render(metadata, profile);
    out.push_str(strip(content, profile));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::DelimiterCatalog;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 7)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn make_record(description: &str, edited: NaiveDateTime) -> GitMetadataRecord {
        GitMetadataRecord {
            description: description.to_string(),
            author: "alice".to_string(),
            developer: "bob".to_string(),
            created_at: at(1, 23, 46),
            last_edited_at: edited,
        }
    }

    fn ts() -> DelimiterProfile {
        DelimiterCatalog::builtin().lookup("ts").unwrap().clone()
    }

    fn vue() -> DelimiterProfile {
        DelimiterCatalog::builtin().lookup("vue").unwrap().clone()
    }

    #[test]
    fn test_render_block_comment() {
        let header = render(&make_record("feat: x", at(9, 0, 0)), &ts());
        assert_eq!(
            header,
            "/*\n * @Description: feat: x\n * @Author: alice\n * @Developer: bob\n \
             * @Date: 2023-01-07 01:23:46\n * @LastEditTime: 2023-01-07 09:00:00\n */\n\n"
        );
    }

    #[test]
    fn test_render_markup_comment() {
        let header = render(&make_record("feat: x", at(9, 0, 0)), &vue());
        assert!(header.starts_with("<!--\n * @Description: feat: x\n"));
        assert!(header.ends_with("\n * @LastEditTime: 2023-01-07 09:00:00\n-->\n\n"));
        assert!(!header.contains(" -->"));
    }

    #[test]
    fn test_strip_without_leading_comment() {
        let content = "import a from 'a';\n";
        assert_eq!(strip(content, &ts()), content);
    }

    #[test]
    fn test_strip_generated_header() {
        let content = "/*\n * @Description: old msg\n */\n\nconst a = 1;\n";
        assert_eq!(strip(content, &ts()), "const a = 1;\n");
    }

    #[test]
    fn test_strip_keeps_foreign_comment() {
        let content = "/* Copyright 2023 Example Corp. MIT License */\n\nconst a = 1;\n";
        assert_eq!(strip(content, &ts()), content);
    }

    #[test]
    fn test_strip_unterminated_comment() {
        let content = "/* @Description: never closed\nconst a = 1;\n";
        assert_eq!(strip(content, &ts()), content);
    }

    #[test]
    fn test_strip_tolerates_leading_whitespace() {
        let content = "\n\n<!--\n * @Description: old\n-->\n\n<template></template>\n";
        assert_eq!(strip(content, &vue()), "<template></template>\n");
    }

    #[test]
    fn test_strip_only_first_block() {
        let content = "/*\n * @Description: old\n */\n\n/* keep me */\nconst a = 1;\n";
        assert_eq!(strip(content, &ts()), "/* keep me */\nconst a = 1;\n");
    }

    #[test]
    fn test_inject_is_idempotent() {
        let profile = ts();
        let original = "export const a = 1;\n";

        let once = inject(original, &make_record("feat: a", at(9, 0, 0)), &profile);
        let twice = inject(&once, &make_record("feat: b", at(10, 0, 0)), &profile);

        assert_eq!(twice.matches(DESCRIPTION_TAG).count(), 1);
        assert!(twice.contains("@Description: feat: b"));
        assert!(!twice.contains("feat: a"));
        assert_eq!(strip(&once, &profile), strip(&twice, &profile));
        assert_eq!(strip(&twice, &profile), original);
    }

    #[test]
    fn test_inject_preserves_license_banner() {
        let profile = ts();
        let original = "/*\n * Licensed under MIT\n */\nexport {};\n";

        let once = inject(original, &make_record("one", at(9, 0, 0)), &profile);
        let twice = inject(&once, &make_record("two", at(10, 0, 0)), &profile);

        assert!(twice.ends_with(original));
        assert_eq!(twice.matches("Licensed under MIT").count(), 1);
        assert_eq!(twice.matches(DESCRIPTION_TAG).count(), 1);
    }

    #[test]
    fn test_close_marker_in_description_is_neutralized() {
        let profile = ts();
        let record = make_record("fix: glob src/**/*.ts", at(9, 0, 0));

        let header = render(&record, &profile);
        assert!(header.contains(" * @Description: fix: glob src/** /*.ts\n"));
        assert_eq!(header.matches("*/").count(), 1);

        let once = inject("let a;\n", &record, &profile);
        let twice = inject(&once, &make_record("second", at(10, 0, 0)), &profile);
        assert_eq!(twice.matches("@Author").count(), 1);
        assert_eq!(strip(&twice, &profile), "let a;\n");
    }

    #[test]
    fn test_markup_close_marker_in_description() {
        let profile = vue();
        let once = inject("<template/>\n", &make_record("a --> b", at(9, 0, 0)), &profile);
        assert!(once.contains("@Description: a -- > b\n"));

        let twice = inject(&once, &make_record("next", at(10, 0, 0)), &profile);
        assert_eq!(twice.matches("@Author").count(), 1);
        assert!(twice.ends_with("-->\n\n<template/>\n"));
    }

    #[test]
    fn test_multiline_description_keeps_prefix() {
        let header = render(
            &make_record("feat: x\n\nLonger body\nsecond line", at(9, 0, 0)),
            &ts(),
        );
        assert!(header.starts_with(
            "/*\n * @Description: feat: x\n *\n * Longer body\n * second line\n * @Author: alice\n"
        ));
    }
}
