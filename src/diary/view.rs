//! Diary list rendering.

use chrono::NaiveDate;
use serde::Serialize;

use super::model::DiaryEntry;
use crate::record::{LocalId, Record};

#[derive(Debug, Clone, Serialize)]
pub struct DiaryEntryView {
    pub id: LocalId,
    pub date: NaiveDate,
    pub text: String,
    pub saved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiaryView {
    /// The date filter applied, if any.
    pub date: Option<NaiveDate>,
    pub entries: Vec<DiaryEntryView>,
}

pub fn render_entries(entries: &[Record<DiaryEntry>], date: Option<NaiveDate>) -> DiaryView {
    DiaryView {
        date,
        entries: entries
            .iter()
            .filter(|r| date.is_none_or(|d| r.data.date == d))
            .map(|r| DiaryEntryView {
                id: r.local_id,
                date: r.data.date,
                text: r.data.text.clone(),
                saved: r.is_saved(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RemoteId;

    #[test]
    fn dates_serialize_as_iso() {
        let entries = vec![Record::saved(
            RemoteId(1),
            DiaryEntry {
                date: NaiveDate::from_ymd_opt(2026, 10, 5).unwrap(),
                text: "x".into(),
            },
        )];
        let json = serde_json::to_value(render_entries(&entries, None)).unwrap();
        assert_eq!(json["entries"][0]["date"], "2026-10-05");
        assert!(json["date"].is_null());
    }
}
