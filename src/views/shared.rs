use crate::types::parse_timestamp;
use comrak::plugins::syntect::SyntectAdapter;
use comrak::{ComrakOptions, ComrakPlugins, markdown_to_html_with_plugins};
use once_cell::sync::Lazy;
use time::{UtcOffset, format_description::FormatItem, macros::format_description};

static MARKDOWN_OPTIONS: Lazy<ComrakOptions> = Lazy::new(|| {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    options
});

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

const DUE_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");

/// Assistant replies are markdown. Raw HTML in them is escaped.
pub fn markdown_to_html(md: &str) -> String {
    let adapter = SyntectAdapter::new(Some("base16-ocean.dark"));
    let mut plugins = ComrakPlugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&adapter);
    markdown_to_html_with_plugins(md, &MARKDOWN_OPTIONS, &plugins)
}

/// `hh:mm AM` in local time, or nothing for an unparseable timestamp.
pub fn format_message_time(raw: &str) -> Option<String> {
    let mut datetime = parse_timestamp(raw)?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

/// Due dates are calendar days, so they are shown without a zone shift.
pub fn format_due_date(raw: &str) -> Option<String> {
    parse_timestamp(raw)?.date().format(DUE_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_markdown() {
        let html = markdown_to_html("**done** and ~~dropped~~");
        assert!(html.contains("<strong>done</strong>"));
        assert!(html.contains("<del>dropped</del>"));
    }

    #[test]
    fn raw_html_is_not_passed_through() {
        let html = markdown_to_html("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn message_time_shape() {
        let formatted = format_message_time("2024-05-01T13:05:00Z").unwrap();
        assert!(formatted.ends_with("AM") || formatted.ends_with("PM"));
        assert_eq!(formatted.len(), "01:05 PM".len());
        assert!(format_message_time("garbage").is_none());
    }

    #[test]
    fn due_date_display() {
        assert_eq!(
            format_due_date("2024-05-01T00:00:00Z").as_deref(),
            Some("May 1, 2024")
        );
        assert!(format_due_date("").is_none());
    }
}
