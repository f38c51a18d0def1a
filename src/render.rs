use owo_colors::OwoColorize;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

#[derive(Default)]
struct Style {
    heading: Option<HeadingLevel>,
    strong: usize,
    emphasis: usize,
}

impl Style {
    fn paint(&self, text: &str, color: bool) -> String {
        if !color {
            return text.to_string();
        }
        if let Some(level) = self.heading {
            return match level {
                HeadingLevel::H1 | HeadingLevel::H2 => text.bold().cyan().to_string(),
                _ => text.bold().to_string(),
            };
        }
        match (self.strong > 0, self.emphasis > 0) {
            (true, true) => text.bold().italic().to_string(),
            (true, false) => text.bold().to_string(),
            (false, true) => text.italic().to_string(),
            (false, false) => text.to_string(),
        }
    }
}

/// Converts Markdown into terminal text, with ANSI styling when `color` is
/// set. Headings, emphasis, lists, links and code are styled; anything else
/// passes through as plain text.
pub fn markdown_for_terminal(markdown: &str, color: bool) -> String {
    let mut output = String::with_capacity(markdown.len() * 2);
    let mut style = Style::default();
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut links: Vec<String> = Vec::new();
    let mut in_code_block = false;

    for event in Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => style.heading = Some(level),
            Event::End(TagEnd::Heading(_)) => {
                style.heading = None;
                output.push_str("\n\n");
            }
            Event::End(TagEnd::Paragraph) => {
                output.push_str(if lists.is_empty() { "\n\n" } else { "\n" });
            }
            Event::Start(Tag::List(start)) => {
                if !lists.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                if lists.is_empty() {
                    output.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                output.push_str(&"  ".repeat(lists.len().saturating_sub(1)));
                match lists.last_mut() {
                    Some(Some(number)) => {
                        output.push_str(&format!("{number}. "));
                        *number += 1;
                    }
                    _ => output.push_str("• "),
                }
            }
            Event::End(TagEnd::Item) => {
                if !output.ends_with('\n') {
                    output.push('\n');
                }
            }
            Event::Start(Tag::Strong) => style.strong += 1,
            Event::End(TagEnd::Strong) => style.strong = style.strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => style.emphasis += 1,
            Event::End(TagEnd::Emphasis) => style.emphasis = style.emphasis.saturating_sub(1),
            Event::Start(Tag::Link { dest_url, .. }) => links.push(dest_url.to_string()),
            Event::End(TagEnd::Link) => {
                if let Some(url) = links.pop() {
                    let suffix = format!(" ({url})");
                    if color {
                        output.push_str(&suffix.dimmed().to_string());
                    } else {
                        output.push_str(&suffix);
                    }
                }
            }
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                output.push('\n');
            }
            Event::Text(text) if in_code_block => {
                for line in text.lines() {
                    output.push_str("    ");
                    if color {
                        output.push_str(&line.yellow().to_string());
                    } else {
                        output.push_str(line);
                    }
                    output.push('\n');
                }
            }
            Event::Text(text) => output.push_str(&style.paint(&text, color)),
            Event::Code(code) => {
                if color {
                    output.push_str(&code.yellow().to_string());
                } else {
                    output.push('`');
                    output.push_str(&code);
                    output.push('`');
                }
            }
            Event::SoftBreak => output.push(' '),
            Event::HardBreak => output.push('\n'),
            Event::Rule => output.push_str("────────────────────\n\n"),
            _ => {}
        }
    }

    format!("{}\n", output.trim_end())
}
