//! Typst markup generation for the resume PDF.
//!
//! Layout: centered name, contact line, rule, then one block per non-empty
//! section. Body lines are classified as bullets, sub-headings (anything
//! containing `|`, e.g. "Engineer | Acme | 2020-2023") or paragraphs.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const BULLET_MARKERS: &[char] = &['•', '-', '*', '–'];
const TYPST_SPECIAL: &[char] = &[
    '\\', '#', '*', '_', '`', '$', '<', '>', '@', '[', ']', '~', '/', '=', '-', '+',
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub education: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Bullet(&'a str),
    SubHeading(&'a str),
    Paragraph(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if line.starts_with(BULLET_MARKERS) {
        let trimmed = line.trim_start_matches(|c: char| BULLET_MARKERS.contains(&c) || c == ' ');
        Line::Bullet(trimmed.trim())
    } else if line.contains('|') {
        Line::SubHeading(line)
    } else {
        Line::Paragraph(line)
    }
}

/// Backslash-escapes every character Typst markup would interpret.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if TYPST_SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Like `escape_markup`, but also stops "1. foo" from becoming a numbered list.
fn escape_line(line: &str) -> String {
    let mut out = escape_markup(line);
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && line[digits..].starts_with('.') {
        out.insert(digits, '\\');
    }
    out
}

fn escape_string_literal(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn push_section(out: &mut String, heading: &str, body: &str) {
    if body.trim().is_empty() {
        return;
    }

    out.push_str(&format!(
        "#v(6pt)\n#text(size: 12pt, weight: \"bold\")[{}]\n#line(length: 100%, stroke: 0.5pt)\n\n",
        escape_markup(&heading.to_uppercase())
    ));

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match classify(line) {
            Line::Bullet(text) => out.push_str(&format!("- {}\n", escape_line(text))),
            Line::SubHeading(text) => out.push_str(&format!("\n*{}*\n\n", escape_line(text))),
            Line::Paragraph(text) => out.push_str(&format!("{}\n\n", escape_line(text))),
        }
    }
    out.push('\n');
}

pub fn render_typst_source(doc: &ResumeDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "#set document(title: \"Resume - {}\")\n",
        escape_string_literal(&doc.name)
    ));
    out.push_str("#set page(paper: \"us-letter\", margin: (x: 0.7in, y: 0.5in))\n");
    out.push_str("#set text(size: 10pt)\n");
    out.push_str("#set par(justify: false)\n\n");

    out.push_str(&format!(
        "#align(center)[#text(size: 20pt, weight: \"bold\")[{}]]\n",
        escape_markup(doc.name.trim())
    ));

    let contact: Vec<String> = [doc.email.trim(), doc.phone.trim()]
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(escape_markup)
        .collect();
    if !contact.is_empty() {
        out.push_str(&format!("#align(center)[{}]\n", contact.join(" | ")));
    }
    out.push_str("#line(length: 100%)\n\n");

    push_section(&mut out, "Professional Summary", &doc.summary);
    push_section(&mut out, "Skills", &doc.skills);
    push_section(&mut out, "Professional Experience", &doc.experience);
    push_section(&mut out, "Education", &doc.education);
    out
}

/// Replaces anything outside `[A-Za-z0-9_-]` with `_` and trims leading and
/// trailing underscores. Falls back to "resume".
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        "resume".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn output_filename(name: &str, at: NaiveDateTime) -> String {
    format!(
        "resume_{}_{}.pdf",
        sanitize_filename(name),
        at.format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn doc() -> ResumeDocument {
        ResumeDocument {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: String::new(),
            summary: "Backend engineer focused on #reliability.".into(),
            skills: "Rust, Go, SQL".into(),
            experience: "Engineer | Acme | 2020-2023\n• Built APIs\n- Cut latency 40%".into(),
            education: "  ".into(),
        }
    }

    #[test]
    fn test_sections_in_order_and_empty_skipped() {
        let src = render_typst_source(&doc());
        let summary = src.find("PROFESSIONAL SUMMARY").unwrap();
        let skills = src.find("SKILLS").unwrap();
        let experience = src.find("PROFESSIONAL EXPERIENCE").unwrap();
        assert!(summary < skills && skills < experience);
        assert!(!src.contains("EDUCATION"));
    }

    #[test]
    fn test_line_classification() {
        assert_eq!(classify("• Built APIs"), Line::Bullet("Built APIs"));
        assert_eq!(classify("– Led migration"), Line::Bullet("Led migration"));
        assert_eq!(
            classify("Engineer | Acme | 2020"),
            Line::SubHeading("Engineer | Acme | 2020")
        );
        assert_eq!(classify("Plain text"), Line::Paragraph("Plain text"));
    }

    #[test]
    fn test_bullets_and_subheadings_rendered() {
        let src = render_typst_source(&doc());
        assert!(src.contains("- Built APIs\n"));
        assert!(src.contains("- Cut latency 40%\n"));
        assert!(src.contains("*Engineer | Acme | 2020\\-2023*"));
    }

    #[test]
    fn test_special_characters_escaped() {
        assert_eq!(escape_markup("#a *b* $c @d"), "\\#a \\*b\\* \\$c \\@d");
        assert_eq!(escape_markup("C// x"), "C\\/\\/ x");
        let src = render_typst_source(&doc());
        assert!(src.contains("\\#reliability"));
    }

    #[test]
    fn test_numbered_paragraph_not_turned_into_list() {
        assert_eq!(escape_line("1. Shipped v2"), "1\\. Shipped v2");
        assert_eq!(escape_line("2024 was busy"), "2024 was busy");
    }

    #[test]
    fn test_contact_line_skips_empty_parts() {
        let src = render_typst_source(&doc());
        assert!(src.contains("#align(center)[jane\\@example.com]\n"));
        let with_phone = ResumeDocument {
            phone: "555-0100".into(),
            ..doc()
        };
        assert!(render_typst_source(&with_phone).contains("jane\\@example.com | 555\\-0100"));
    }

    #[test]
    fn test_title_string_escaped() {
        let d = ResumeDocument {
            name: "A \"Q\" B".into(),
            ..Default::default()
        };
        assert!(render_typst_source(&d).contains("title: \"Resume - A \\\"Q\\\" B\""));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Jane Doe"), "Jane_Doe");
        assert_eq!(sanitize_filename("  ../etc/passwd "), "etc_passwd");
        assert_eq!(sanitize_filename("José-Ana"), "Jos_-Ana");
        assert_eq!(sanitize_filename("***"), "resume");
        assert_eq!(sanitize_filename(""), "resume");
    }

    #[test]
    fn test_output_filename_has_timestamp() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();
        assert_eq!(
            output_filename("Jane Doe", at),
            "resume_Jane_Doe_20240309_140507.pdf"
        );
    }
}
