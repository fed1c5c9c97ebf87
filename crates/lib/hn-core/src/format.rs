//! Projection of upstream items into display records and their text layout.
//!
//! `clean_text` is deliberately narrow: it decodes four entities and strips
//! anything shaped like a tag. It is not an HTML sanitizer; other entities pass
//! through verbatim and malformed markup may leave fragments behind.

use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;

use crate::models::{Comment, FormattedComment, FormattedStory, Story};

pub const NO_STORIES: &str = "No stories found.";
pub const NO_COMMENTS: &str = "No comments found.";
pub const MISSING_URL: &str = "N/A";
pub const UNKNOWN_AUTHOR: &str = "unknown";
const DIVIDER: &str = "---";

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("tag pattern is a valid regex"));

/// Entity replacements, applied in this exact order.
const ENTITIES: [(&str, &str); 4] = [("&gt;", ">"), ("&lt;", "<"), ("&amp;", "&"), ("&quot;", "\"")];

/// Decodes `&gt; &lt; &amp; &quot;` and then strips tag-like substrings.
///
/// Decoding runs first, so escaped markup becomes real markup and is stripped
/// along with everything else.
#[must_use]
pub fn clean_text(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    let decoded = ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, replacement)| {
            acc.replace(entity, replacement)
        });
    TAG_PATTERN.replace_all(&decoded, "").into_owned()
}

/// Renders unix seconds in the local time zone, e.g. `4/4/2007, 7:16:40 PM`.
#[must_use]
pub fn format_timestamp(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0).map_or_else(
        || unix_seconds.to_string(),
        |utc| {
            utc.with_timezone(&Local)
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string()
        },
    )
}

#[must_use]
pub fn to_formatted_story(story: &Story) -> FormattedStory {
    FormattedStory {
        id: story.id,
        title: story.title.clone(),
        by: author(story.by.as_deref()),
        time: format_timestamp(story.time),
        url: story.url.clone(),
        score: story.score,
        comments_count: story.kids.as_ref().map_or(0, Vec::len),
    }
}

#[must_use]
pub fn to_formatted_comment(comment: &Comment) -> FormattedComment {
    FormattedComment {
        id: comment.id,
        by: author(comment.by.as_deref()),
        time: format_timestamp(comment.time),
        text: clean_text(comment.text.as_deref()),
        replies: comment.kids.as_ref().map_or(0, Vec::len),
    }
}

fn author(by: Option<&str>) -> String {
    by.filter(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string()
}

/// Numbered story blocks separated by dividers, or `No stories found.`.
#[must_use]
pub fn render_story_list(stories: &[FormattedStory]) -> String {
    if stories.is_empty() {
        return NO_STORIES.to_string();
    }
    stories
        .iter()
        .enumerate()
        .map(|(index, story)| {
            format!(
                "{}. {}\n   ID: {}\n   By: {}\n   Published: {}\n   Score: {}\n   Comments: {}\n   URL: {}\n{DIVIDER}",
                index + 1,
                story.title,
                story.id,
                story.by,
                story.time,
                story.score,
                story.comments_count,
                story.url.as_deref().unwrap_or(MISSING_URL),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Single-story layout; `content` is the already-cleaned story text.
#[must_use]
pub fn render_story_detail(story: &FormattedStory, content: Option<&str>) -> String {
    let mut out = format!(
        "Title: {}\nID: {}\nBy: {}\nPublished: {}\nScore: {}\nComments: {}\nURL: {}",
        story.title,
        story.id,
        story.by,
        story.time,
        story.score,
        story.comments_count,
        story.url.as_deref().unwrap_or(MISSING_URL),
    );
    if let Some(content) = content {
        out.push_str("\n\nContent:\n");
        out.push_str(content);
    }
    out
}

#[must_use]
pub fn render_comment_list(title: &str, comments: &[FormattedComment]) -> String {
    if comments.is_empty() {
        return NO_COMMENTS.to_string();
    }
    let blocks = comments
        .iter()
        .enumerate()
        .map(|(index, comment)| {
            format!(
                "{}. {} ({}):\n\"{}\"\n{}\n{DIVIDER}",
                index + 1,
                comment.by,
                comment.time,
                comment.text,
                replies_label(comment.replies),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "Comments for \"{title}\" ({} shown):\n\n{blocks}",
        comments.len()
    )
}

fn replies_label(replies: usize) -> String {
    match replies {
        0 => "no replies".to_string(),
        1 => "1 reply".to_string(),
        n => format!("{n} replies"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: u64, kids: Option<Vec<u64>>) -> Story {
        Story {
            id,
            by: Some("pg".to_string()),
            time: 1_175_714_200,
            title: format!("Story {id}"),
            url: None,
            score: 57,
            kids,
            text: None,
        }
    }

    #[test]
    fn clean_text_decodes_then_strips() {
        assert_eq!(clean_text(Some("A &amp; B <i>ok</i>")), "A & B ok");
        assert_eq!(clean_text(Some("<p>&amp;</p>")), "&");
        assert_eq!(clean_text(Some("&lt;b&gt;hi&lt;/b&gt;")), "hi");
        assert_eq!(clean_text(Some("say &quot;hi&quot;")), "say \"hi\"");
    }

    #[test]
    fn clean_text_is_not_a_full_entity_decoder() {
        assert_eq!(clean_text(Some("it&#x27;s")), "it&#x27;s");
        assert_eq!(clean_text(Some("&amp;lt;")), "&lt;");
    }

    #[test]
    fn clean_text_leaves_plain_text_alone() {
        let plain = "nothing to see here";
        assert_eq!(clean_text(Some(plain)), plain);
        assert_eq!(clean_text(Some(&clean_text(Some(plain)))), plain);
        assert_eq!(clean_text(None), "");
    }

    #[test]
    fn comments_count_uses_direct_kids_only() {
        assert_eq!(to_formatted_story(&story(1, Some(vec![2, 3, 4]))).comments_count, 3);
        assert_eq!(to_formatted_story(&story(1, None)).comments_count, 0);
    }

    #[test]
    fn comment_projection_cleans_text() {
        let comment = Comment {
            id: 9,
            by: None,
            time: 0,
            text: Some("<p>x &gt; y".to_string()),
            kids: Some(vec![10]),
        };
        let formatted = to_formatted_comment(&comment);
        assert_eq!(formatted.by, UNKNOWN_AUTHOR);
        assert_eq!(formatted.text, "x > y");
        assert_eq!(formatted.replies, 1);
    }

    #[test]
    fn empty_lists_render_fixed_messages() {
        assert_eq!(render_story_list(&[]), "No stories found.");
        assert_eq!(render_comment_list("anything", &[]), "No comments found.");
    }

    #[test]
    fn story_list_layout() {
        let mut first = to_formatted_story(&story(1, Some(vec![5])));
        first.url = Some("https://example.com".to_string());
        let second = to_formatted_story(&story(2, None));
        let time = format_timestamp(1_175_714_200);

        let rendered = render_story_list(&[first, second]);
        let expected = format!(
            "1. Story 1\n   ID: 1\n   By: pg\n   Published: {time}\n   Score: 57\n   Comments: 1\n   URL: https://example.com\n---\n\n\
             2. Story 2\n   ID: 2\n   By: pg\n   Published: {time}\n   Score: 57\n   Comments: 0\n   URL: N/A\n---"
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn story_detail_appends_content_when_present() {
        let formatted = to_formatted_story(&story(8, None));
        let without = render_story_detail(&formatted, None);
        assert!(without.starts_with("Title: Story 8\nID: 8\nBy: pg\n"));
        assert!(without.ends_with("URL: N/A"));

        let with = render_story_detail(&formatted, Some("body"));
        assert!(with.ends_with("URL: N/A\n\nContent:\nbody"));
    }

    #[test]
    fn story_detail_keeps_content_that_cleans_to_nothing() {
        let mut source = story(8, None);
        source.text = Some("<p></p>".to_string());
        let content = clean_text(source.text.as_deref());

        let rendered = render_story_detail(&to_formatted_story(&source), Some(&content));
        assert!(rendered.ends_with("URL: N/A\n\nContent:\n"));
    }

    #[test]
    fn comment_list_layout() {
        let comments = vec![
            FormattedComment {
                id: 1,
                by: "alice".to_string(),
                time: "then".to_string(),
                text: "first".to_string(),
                replies: 0,
            },
            FormattedComment {
                id: 2,
                by: "bob".to_string(),
                time: "later".to_string(),
                text: "second".to_string(),
                replies: 2,
            },
        ];

        let rendered = render_comment_list("Title", &comments);
        assert_eq!(
            rendered,
            "Comments for \"Title\" (2 shown):\n\n\
             1. alice (then):\n\"first\"\nno replies\n---\n\n\
             2. bob (later):\n\"second\"\n2 replies\n---"
        );
    }

    #[test]
    fn timestamp_out_of_range_falls_back_to_raw_seconds() {
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
        assert!(!format_timestamp(0).is_empty());
    }
}
