use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Chapter, RewriteOutline};

/// Used when the response carries no `TITLE:` line.
pub const DEFAULT_TITLE: &str = "Generated Thesis Title";

fn chapter_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"^CHAPTER\s+\d+:\s*(.*)$").expect("literal pattern"))
}

/// Best-effort decomposition of a rewrite response into a title and ordered
/// chapters. The external model is merely asked to follow the `TITLE:` /
/// `CHAPTER n:` convention; lines that fit nowhere are silently dropped.
pub fn parse_rewrite(text: &str) -> RewriteOutline {
    let mut title = String::new();
    let mut chapters: Vec<Chapter> = Vec::new();
    let mut current: Option<Chapter> = None;

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("TITLE:") {
            title = rest.trim().to_string();
        } else if let Some(captures) = chapter_marker().captures(line) {
            if let Some(done) = current.take() {
                chapters.push(finish(done));
            }
            current = Some(Chapter {
                title: captures[1].trim().to_string(),
                content: String::new(),
            });
        } else if let Some(chapter) = current.as_mut() {
            // Body lines accumulate; blank lines are skipped.
            if !line.trim().is_empty() {
                chapter.content.push_str(line);
                chapter.content.push('\n');
            }
        }
    }
    if let Some(done) = current.take() {
        chapters.push(finish(done));
    }

    RewriteOutline {
        title: if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title
        },
        chapters,
    }
}

fn finish(mut chapter: Chapter) -> Chapter {
    chapter.content = chapter.content.trim_end().to_string();
    chapter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_title_and_ordered_chapters() {
        let blob = "TITLE:  Adaptive Grid Control \n\
                    \n\
                    CHAPTER 1: Introduction\n\
                    Grid operators face volatility.\n\
                    Forecasting helps.\n\
                    \n\
                    CHAPTER 2: Methods\n\
                    We model demand with ensembles.\n";
        let outline = parse_rewrite(blob);
        assert_eq!(outline.title, "Adaptive Grid Control");
        assert_eq!(outline.chapters.len(), 2);
        assert_eq!(outline.chapters[0].title, "Introduction");
        assert_eq!(
            outline.chapters[0].content,
            "Grid operators face volatility.\nForecasting helps."
        );
        assert_eq!(outline.chapters[1].title, "Methods");
        assert_eq!(outline.chapters[1].content, "We model demand with ensembles.");
    }

    #[test]
    fn chapter_count_matches_marker_count() {
        let blob = "TITLE: T\nCHAPTER 1: A\nbody\nCHAPTER 2: B\nbody\nCHAPTER 3: C\nbody\n";
        let outline = parse_rewrite(blob);
        assert_eq!(outline.chapters.len(), 3);
    }

    #[test]
    fn no_markers_yields_default_title_and_no_chapters() {
        let outline = parse_rewrite("The model ignored the requested format entirely.");
        assert_eq!(outline.title, DEFAULT_TITLE);
        assert!(outline.chapters.is_empty());
    }

    #[test]
    fn empty_input_yields_default_outline() {
        let outline = parse_rewrite("");
        assert_eq!(outline.title, DEFAULT_TITLE);
        assert!(outline.chapters.is_empty());
    }

    #[test]
    fn lines_outside_any_chapter_are_dropped() {
        let blob = "preamble chatter\nTITLE: T\nmore chatter\nCHAPTER 1: Only\nkept\n";
        let outline = parse_rewrite(blob);
        assert_eq!(outline.title, "T");
        assert_eq!(outline.chapters.len(), 1);
        assert_eq!(outline.chapters[0].content, "kept");
    }

    #[test]
    fn marker_without_title_text_keeps_empty_title() {
        let outline = parse_rewrite("CHAPTER 1:\nbody\n");
        assert_eq!(outline.chapters.len(), 1);
        assert_eq!(outline.chapters[0].title, "");
        assert_eq!(outline.chapters[0].content, "body");
    }

    #[test]
    fn mid_line_markers_are_not_chapter_starts() {
        let blob = "CHAPTER 1: Real\nsee CHAPTER 2: in the appendix\n";
        let outline = parse_rewrite(blob);
        assert_eq!(outline.chapters.len(), 1);
        assert_eq!(
            outline.chapters[0].content,
            "see CHAPTER 2: in the appendix"
        );
    }
}
