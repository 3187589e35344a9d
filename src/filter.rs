//! Query filtering over a note snapshot.
//!
//! A query is a whitespace-separated list of tokens. `#name` tokens require a
//! tag equal to `name`; every other token must appear in the message or the
//! file path. Matching is case-insensitive and all tokens must match.

use crate::models::Note;

/// A parsed search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    text: Vec<String>,
    tags: Vec<String>,
}

impl Query {
    /// Parses raw input into lower-cased text and tag filters.
    ///
    /// # Examples
    ///
    /// ```
    /// use notes::filter::Query;
    ///
    /// let query = Query::parse("  Bug #Urgent # ");
    /// assert_eq!(query.text_filters(), ["bug", "#"]);
    /// assert_eq!(query.tag_filters(), ["urgent"]);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let mut query = Query::default();
        for token in raw.split_whitespace() {
            match token.strip_prefix('#') {
                Some(tag) if !tag.is_empty() => query.tags.push(tag.to_lowercase()),
                _ => query.text.push(token.to_lowercase()),
            }
        }
        query
    }

    /// Returns true when the query has no filters and matches everything.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.tags.is_empty()
    }

    pub fn text_filters(&self) -> &[String] {
        &self.text
    }

    pub fn tag_filters(&self) -> &[String] {
        &self.tags
    }

    /// Returns true if `note` satisfies every filter.
    pub fn matches(&self, note: &Note) -> bool {
        if self.is_empty() {
            return true;
        }

        let message = note.message.to_lowercase();
        let file = note.file.as_deref().unwrap_or_default().to_lowercase();

        let text_ok = self
            .text
            .iter()
            .all(|t| message.contains(t.as_str()) || file.contains(t.as_str()));

        text_ok
            && self
                .tags
                .iter()
                .all(|wanted| note.tags.iter().any(|tag| tag.to_lowercase() == *wanted))
    }
}

/// Returns the notes of `all` that match `raw`, in snapshot order.
///
/// An empty or whitespace-only query returns every note.
pub fn filter_notes(all: &[Note], raw: &str) -> Vec<Note> {
    let query = Query::parse(raw);
    all.iter().filter(|n| query.matches(n)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteBuilder;

    fn sample() -> Vec<Note> {
        vec![
            NoteBuilder::new()
                .message("Fix bug in parser")
                .file("src/Parser.rs")
                .tags(vec!["Urgent".into(), "bug".into()])
                .build(),
            NoteBuilder::new().message("refactor").build(),
            NoteBuilder::new()
                .message("write docs")
                .file("docs/bug-report.md")
                .build(),
            NoteBuilder::new()
                .message("another bug")
                .tags(vec!["later".into()])
                .build(),
        ]
    }

    fn messages(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.message.as_str()).collect()
    }

    #[test]
    fn empty_query_is_identity() {
        let all = sample();
        assert_eq!(filter_notes(&all, ""), all);
        assert_eq!(filter_notes(&all, "   \t "), all);
    }

    #[test]
    fn text_filter_matches_message_or_file() {
        let all = sample();
        let result = filter_notes(&all, "BUG");
        assert_eq!(
            messages(&result),
            vec!["Fix bug in parser", "write docs", "another bug"]
        );

        let result = filter_notes(&all, "parser.rs");
        assert_eq!(messages(&result), vec!["Fix bug in parser"]);
    }

    #[test]
    fn text_and_tag_filters_are_conjunctive() {
        let all = sample();
        let result = filter_notes(&all, "bug #urgent");
        assert_eq!(messages(&result), vec!["Fix bug in parser"]);

        let result = filter_notes(&all, "docs #urgent");
        assert!(result.is_empty());
    }

    #[test]
    fn tag_filter_is_whole_tag_not_substring() {
        let all = sample();
        assert!(filter_notes(&all, "#urg").is_empty());
        assert_eq!(messages(&filter_notes(&all, "#LATER")), vec!["another bug"]);
    }

    #[test]
    fn multiple_tag_filters_all_required() {
        let all = sample();
        assert_eq!(
            messages(&filter_notes(&all, "#bug #urgent")),
            vec!["Fix bug in parser"]
        );
        assert!(filter_notes(&all, "#bug #later").is_empty());
    }

    #[test]
    fn bare_hash_is_a_text_filter() {
        let all = vec![
            NoteBuilder::new().message("issue # 4").build(),
            NoteBuilder::new().message("no marker").build(),
        ];
        assert_eq!(messages(&filter_notes(&all, "#")), vec!["issue # 4"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let all = sample();
        for query in ["", "bug", "#urgent", "bug #urgent", "docs", "zzz"] {
            let once = filter_notes(&all, query);
            let twice = filter_notes(&once, query);
            assert_eq!(once, twice, "query {query:?}");
        }
    }

    #[test]
    fn tagged_scenario_and_clearing_restores_all() {
        let all = vec![
            NoteBuilder::new()
                .message("fix bug")
                .tags(vec!["urgent".into()])
                .build(),
            NoteBuilder::new().message("refactor").build(),
        ];

        assert_eq!(messages(&filter_notes(&all, "#urgent")), vec!["fix bug"]);
        assert_eq!(filter_notes(&all, ""), all);
    }
}
