use super::{Classification, DiffEntry, HistoryResult, RevisionRange};
use crate::utils::{escape_markup, strip_ansi, to_markup_lines};
use chrono::{DateTime, Local};
use comfy_table::Table;
use std::io::{self, Write};

pub const NO_OLD_VERSION: &str = "—";
pub const NEW_DEPENDENCY: &str = "NEW WIDGET";
const HEADER: [&str; 4] = ["MODULE", "OLD", "NEW", "HISTORY"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub old: String,
    pub new: String,
    pub history: String,
}

#[derive(Debug, Clone)]
pub struct ChangelogReport {
    range: RevisionRange,
    generated_at: DateTime<Local>,
    rows: Vec<ReportRow>,
}

impl ChangelogReport {
    pub fn new(range: RevisionRange, generated_at: DateTime<Local>) -> Self {
        ChangelogReport {
            range,
            generated_at,
            rows: Vec::new(),
        }
    }

    /// Rows in diff order; unchanged dependencies are skipped.
    pub fn build(
        range: RevisionRange,
        generated_at: DateTime<Local>,
        entries: &[DiffEntry],
        histories: &[HistoryResult],
    ) -> Self {
        let mut report = ChangelogReport::new(range, generated_at);
        for entry in entries {
            match entry.classification {
                Classification::Unchanged => {}
                Classification::New => report.push_new(entry),
                Classification::Changed => {
                    match histories.iter().find(|h| h.name == entry.name) {
                        Some(history) => report.push_changed(entry, history),
                        None => report.push_row(entry, String::new()),
                    }
                }
            }
        }
        report
    }

    pub fn push_new(&mut self, entry: &DiffEntry) {
        self.rows.push(ReportRow {
            name: entry.name.clone(),
            old: NO_OLD_VERSION.to_owned(),
            new: entry.new_version.clone(),
            history: NEW_DEPENDENCY.to_owned(),
        });
    }

    pub fn push_changed(&mut self, entry: &DiffEntry, history: &HistoryResult) {
        let text = match &history.error {
            Some(err) => format!("history unavailable: {}", err),
            None => strip_ansi(&history.lines.join("\n")),
        };
        self.push_row(entry, text);
    }

    fn push_row(&mut self, entry: &DiffEntry, history: String) {
        self.rows.push(ReportRow {
            name: entry.name.clone(),
            old: entry
                .old_version
                .clone()
                .unwrap_or_else(|| NO_OLD_VERSION.to_owned()),
            new: entry.new_version.clone(),
            history,
        });
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn range(&self) -> &RevisionRange {
        &self.range
    }

    pub fn title(&self) -> String {
        format!(
            "CHANGELOG BETWEEN {} and {} REVISIONS OF {}",
            self.range.from,
            self.range.to,
            self.generated_at.format("%a %b %d %Y %H:%M:%S GMT%z")
        )
    }

    pub fn to_table(&self) -> String {
        let mut table = Table::new();
        table.set_header(HEADER.to_vec());
        for row in &self.rows {
            table.add_row(vec![
                row.name.as_str(),
                row.old.as_str(),
                row.new.as_str(),
                row.history.as_str(),
            ]);
        }
        table.to_string()
    }

    pub fn write_table<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.title())?;
        writeln!(out, "{}", self.to_table())
    }

    pub fn to_markup(&self) -> String {
        format!(
            "<b>{}</b><br/>{}",
            escape_markup(&self.title()),
            self.table_markup()
        )
    }

    /// The HTML table alone, without the timestamped title.
    pub fn table_markup(&self) -> String {
        let mut out = String::from("<table border='1'><tr>");
        for column in HEADER.iter() {
            out.push_str(&format!("<th>{}</th>", column));
        }
        out.push_str("</tr>");
        for row in &self.rows {
            out.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_markup(&row.name),
                escape_markup(&row.old),
                escape_markup(&row.new),
                to_markup_lines(&row.history)
            ));
        }
        out.push_str("</table>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChangelogError;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn range() -> RevisionRange {
        RevisionRange {
            from: "v1".to_owned(),
            to: "v2".to_owned(),
        }
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
    }

    fn entry(name: &str, classification: Classification, old: Option<&str>, new: &str) -> DiffEntry {
        DiffEntry {
            name: name.to_owned(),
            classification,
            old_version: old.map(str::to_owned),
            new_version: new.to_owned(),
            repository: None,
        }
    }

    fn sample() -> ChangelogReport {
        let entries = vec![
            entry("dwx-a", Classification::Changed, Some("v1"), "v2"),
            entry("dwx-same", Classification::Unchanged, Some("v1"), "v1"),
            entry("dwx-b", Classification::New, None, "v1"),
            entry("dwx-c", Classification::Changed, Some("1.0"), "2.0"),
        ];
        let histories = vec![
            HistoryResult {
                name: "dwx-a".to_owned(),
                lines: vec![
                    "a1 | 2024-05-01 | use <grid> & co [Ann]".to_owned(),
                    "\x1b[31ma0\x1b[39m | 2024-04-30 | init [Bob]".to_owned(),
                ],
                error: None,
            },
            HistoryResult {
                name: "dwx-c".to_owned(),
                lines: Vec::new(),
                error: Some(ChangelogError::HistoryRetrieval {
                    name: "dwx-c".to_owned(),
                    reason: "clone failed".to_owned(),
                }),
            },
        ];
        ChangelogReport::build(range(), at(), &entries, &histories)
    }

    #[test]
    fn rows_follow_diff_order_without_unchanged() {
        let report = sample();
        assert_eq!(
            report.rows()[1],
            ReportRow {
                name: "dwx-b".to_owned(),
                old: NO_OLD_VERSION.to_owned(),
                new: "v1".to_owned(),
                history: NEW_DEPENDENCY.to_owned(),
            }
        );
        let names: Vec<_> = report.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["dwx-a", "dwx-b", "dwx-c"]);
        assert_eq!(
            report.rows()[0].history,
            "a1 | 2024-05-01 | use <grid> & co [Ann]\na0 | 2024-04-30 | init [Bob]"
        );
        assert!(report.rows()[2].history.starts_with("history unavailable: "));
    }

    #[test]
    fn title_names_both_revisions() {
        let title = sample().title();
        assert!(title.starts_with("CHANGELOG BETWEEN v1 and v2 REVISIONS OF Mon May 06 2024 07:08:09"));
    }

    #[test]
    fn markup_is_an_escaped_html_table() {
        let markup = sample().to_markup();
        assert!(markup.starts_with("<b>CHANGELOG BETWEEN v1 and v2"));
        assert!(markup.contains(
            "<tr><th>MODULE</th><th>OLD</th><th>NEW</th><th>HISTORY</th></tr>"
        ));
        assert!(markup.contains(
            "<tr><td>dwx-a</td><td>v1</td><td>v2</td><td>a1 | 2024-05-01 | use &lt;grid&gt; &amp; co [Ann]<br/>a0 | 2024-04-30 | init [Bob]</td></tr>"
        ));
        assert!(markup.contains("<td>dwx-b</td><td>—</td><td>v1</td><td>NEW WIDGET</td>"));
        assert!(markup.ends_with("</table>"));
        assert!(markup.ends_with(&sample().table_markup()));
        assert!(!markup.contains("dwx-same"));
    }

    #[test]
    fn table_has_header_and_rows() {
        let table = sample().to_table();
        for needle in &["MODULE", "HISTORY", "dwx-a", "dwx-b", "NEW WIDGET", "dwx-c"] {
            assert!(table.contains(needle), "missing {}", needle);
        }
        assert!(!table.contains("dwx-same"));
    }

    #[test]
    fn writes_title_and_table_to_a_writer() {
        let mut out = Vec::new();
        sample().write_table(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("CHANGELOG BETWEEN v1 and v2"));
        assert!(out.contains("NEW WIDGET"));
    }
}
