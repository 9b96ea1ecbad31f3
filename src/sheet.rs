use crate::errors::AppError;
use crate::models::{Field, RowView, VisitorRow};
use crate::notify::{Notifier, Toast, ToastKind};
use crate::storage::{sheet_key, LocalStore};
use serde_json::Value;
use std::time::Instant;
use tracing::warn;

pub const MIN_ROWS: usize = 20;
pub const SPARE_ROWS: usize = 5;

/// Rows to build for a sheet holding `records` saved rows.
pub fn target_rows(records: usize) -> usize {
    (records + SPARE_ROWS).max(MIN_ROWS)
}

/// The active date and its rows. The page only ever renders what this holds.
#[derive(Debug, Default)]
pub struct SheetState {
    date: Option<String>,
    rows: Vec<VisitorRow>,
}

impl SheetState {
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn select_date(&mut self, date: Option<String>) {
        self.date = date.filter(|value| !value.is_empty());
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn add_rows(&mut self, count: usize) {
        self.rows
            .extend(std::iter::repeat_with(VisitorRow::default).take(count));
    }

    pub fn rows(&self) -> Vec<RowView> {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| RowView {
                number: idx + 1,
                fields: row.clone(),
            })
            .collect()
    }

    pub fn edit(&mut self, row: usize, field: Field, text: impl Into<String>) -> Result<(), AppError> {
        let count = self.rows.len();
        let target = self
            .rows
            .get_mut(row)
            .ok_or_else(|| AppError::bad_request(format!("row {row} out of range (0..{count})")))?;
        target.set(field, text);
        Ok(())
    }

    /// Trimmed copy of every row, blank rows included.
    pub fn snapshot(&self) -> Vec<VisitorRow> {
        self.rows.iter().map(VisitorRow::trimmed).collect()
    }

    /// Writes the current rows under the active date. Returns `Ok(None)` both
    /// for silent saves and when no date is selected.
    pub fn save(
        &self,
        store: &mut LocalStore,
        silent: bool,
        notifier: &mut Notifier,
        now: Instant,
    ) -> Result<Option<Toast>, AppError> {
        let Some(date) = self.date.as_deref() else {
            return Ok(None);
        };

        let payload = serde_json::to_string(&self.snapshot())?;
        store.set_item(sheet_key(date), payload);

        if silent {
            return Ok(None);
        }
        Ok(Some(notifier.show("Saved successfully!", ToastKind::Success, now)))
    }

    /// Rebuilds the rows for the active date from `store`.
    pub fn load(&mut self, store: &LocalStore, notifier: &mut Notifier, now: Instant) -> Option<Toast> {
        let date = self.date.clone()?;
        self.rows.clear();

        let Some(saved) = store.get_item(&sheet_key(&date)) else {
            self.add_rows(MIN_ROWS);
            return None;
        };

        let records = match parse_records(saved) {
            Ok(records) => records,
            Err(err) => {
                warn!("stored records for {date} are unreadable: {err}");
                self.add_rows(MIN_ROWS);
                return Some(notifier.show(
                    format!("Could not read saved records for {date}"),
                    ToastKind::Error,
                    now,
                ));
            }
        };

        self.add_rows(target_rows(records.len()));
        for (slot, record) in self.rows.iter_mut().zip(records) {
            *slot = record;
        }

        Some(notifier.show(format!("Loaded records for {date}"), ToastKind::Info, now))
    }
}

/// A sheet is unreadable only when the stored text is not a JSON array.
/// Elements that are not objects load as blank rows.
fn parse_records(saved: &str) -> Result<Vec<VisitorRow>, serde_json::Error> {
    let values: Vec<Value> = serde_json::from_str(saved)?;
    Ok(values.into_iter().map(VisitorRow::from_value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(store: &mut LocalStore, date: &str, count: usize) {
        let rows: Vec<VisitorRow> = (0..count)
            .map(|idx| {
                let mut row = VisitorRow::default();
                row.set(Field::Name, format!("visitor {idx}"));
                row
            })
            .collect();
        store.set_item(sheet_key(date), serde_json::to_string(&rows).unwrap());
    }

    fn loaded(store: &LocalStore, date: &str) -> (SheetState, Option<Toast>) {
        let mut sheet = SheetState::default();
        sheet.select_date(Some(date.to_string()));
        let toast = sheet.load(store, &mut Notifier::default(), Instant::now());
        (sheet, toast)
    }

    #[test]
    fn target_rows_pads_to_minimum() {
        assert_eq!(target_rows(0), 20);
        assert_eq!(target_rows(15), 20);
        assert_eq!(target_rows(18), 23);
        assert_eq!(target_rows(30), 35);
    }

    #[test]
    fn unknown_date_loads_twenty_blank_rows_silently() {
        let (sheet, toast) = loaded(&LocalStore::default(), "2024-03-01");
        assert_eq!(sheet.row_count(), 20);
        assert!(sheet.rows().iter().all(|view| view.fields.is_blank()));
        assert!(toast.is_none());
    }

    #[test]
    fn saved_rows_load_with_spare_rows() {
        let mut store = LocalStore::default();
        stored(&mut store, "2024-01-15", 18);
        let (sheet, toast) = loaded(&store, "2024-01-15");

        assert_eq!(sheet.row_count(), 23);
        let rows = sheet.rows();
        assert_eq!(rows[17].fields.name, "visitor 17");
        assert!(rows[18..].iter().all(|view| view.fields.is_blank()));
        let toast = toast.expect("load notice");
        assert_eq!(toast.kind, ToastKind::Info);
        assert_eq!(toast.message, "Loaded records for 2024-01-15");
    }

    #[test]
    fn large_sheet_gets_five_spare_rows() {
        let mut store = LocalStore::default();
        stored(&mut store, "2024-01-16", 30);
        let (sheet, _) = loaded(&store, "2024-01-16");
        assert_eq!(sheet.row_count(), 35);
    }

    #[test]
    fn row_numbers_are_contiguous_from_one() {
        let mut sheet = SheetState::default();
        sheet.add_rows(3);
        sheet.add_rows(2);
        let numbers: Vec<usize> = sheet.rows().iter().map(|view| view.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn missing_remarks_loads_blank() {
        let mut store = LocalStore::default();
        store.set_item(
            sheet_key("2024-04-02"),
            r#"[{"timeIn":"08:30","name":"Lin","visiting":"4B","address":"","purpose":"delivery","timeOut":""}]"#,
        );
        let (sheet, _) = loaded(&store, "2024-04-02");
        let first = &sheet.rows()[0].fields;
        assert_eq!(first.purpose, "delivery");
        assert_eq!(first.remarks, "");
    }

    #[test]
    fn typing_into_first_cell_persists_record() {
        let mut store = LocalStore::default();
        let mut notifier = Notifier::default();
        let (mut sheet, _) = loaded(&store, "2024-01-15");

        sheet.edit(0, Field::TimeIn, "09:00").unwrap();
        let toast = sheet.save(&mut store, true, &mut notifier, Instant::now()).unwrap();
        assert!(toast.is_none());

        let saved: Vec<VisitorRow> =
            serde_json::from_str(store.get_item("visitors_2024-01-15").unwrap()).unwrap();
        assert_eq!(saved.len(), 20);
        let expected = VisitorRow {
            time_in: "09:00".to_string(),
            ..VisitorRow::default()
        };
        assert_eq!(saved[0], expected);
    }

    #[test]
    fn save_trims_and_round_trips() {
        let mut store = LocalStore::default();
        let mut notifier = Notifier::default();
        let (mut sheet, _) = loaded(&store, "2024-05-05");
        sheet.edit(2, Field::Name, "  Alan Turing  ").unwrap();
        sheet.edit(2, Field::Remarks, "\tbadge 12\n").unwrap();
        sheet.save(&mut store, true, &mut notifier, Instant::now()).unwrap();

        let (reloaded, _) = loaded(&store, "2024-05-05");
        let row = &reloaded.rows()[2].fields;
        assert_eq!(row.name, "Alan Turing");
        assert_eq!(row.remarks, "badge 12");
        assert_eq!(reloaded.row_count(), 25);
    }

    #[test]
    fn repeated_save_is_idempotent() {
        let mut store = LocalStore::default();
        let mut notifier = Notifier::default();
        let (mut sheet, _) = loaded(&store, "2024-06-01");
        sheet.edit(0, Field::Purpose, "meeting").unwrap();

        sheet.save(&mut store, true, &mut notifier, Instant::now()).unwrap();
        let first = store.get_item("visitors_2024-06-01").unwrap().to_string();
        sheet.save(&mut store, true, &mut notifier, Instant::now()).unwrap();
        assert_eq!(store.get_item("visitors_2024-06-01").unwrap(), first);
    }

    #[test]
    fn explicit_save_reports_success() {
        let mut store = LocalStore::default();
        let mut notifier = Notifier::default();
        let (sheet, _) = loaded(&store, "2024-06-02");
        let toast = sheet
            .save(&mut store, false, &mut notifier, Instant::now())
            .unwrap()
            .expect("success notice");
        assert_eq!(toast.kind, ToastKind::Success);
        assert!(notifier.visible(Instant::now()).is_some());
    }

    #[test]
    fn no_date_makes_save_and_load_no_ops() {
        let mut store = LocalStore::default();
        let mut notifier = Notifier::default();
        let mut sheet = SheetState::default();
        sheet.select_date(Some(String::new()));
        sheet.add_rows(2);

        assert!(sheet.load(&store, &mut notifier, Instant::now()).is_none());
        assert_eq!(sheet.row_count(), 2);
        assert!(sheet.save(&mut store, false, &mut notifier, Instant::now()).unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_record_loads_blank_sheet_with_error_notice() {
        let mut store = LocalStore::default();
        store.set_item(sheet_key("2024-07-07"), "[{broken");
        let (sheet, toast) = loaded(&store, "2024-07-07");
        assert_eq!(sheet.row_count(), 20);
        assert_eq!(toast.expect("error notice").kind, ToastKind::Error);
    }

    #[test]
    fn switching_to_unsaved_date_clears_previous_rows() {
        let mut store = LocalStore::default();
        let mut notifier = Notifier::default();
        stored(&mut store, "2024-01-15", 18);
        let (mut sheet, _) = loaded(&store, "2024-01-15");
        assert_eq!(sheet.row_count(), 23);

        sheet.select_date(Some("2024-01-16".to_string()));
        let toast = sheet.load(&store, &mut notifier, Instant::now());

        assert!(toast.is_none());
        assert!(notifier.visible(Instant::now()).is_none());
        assert_eq!(sheet.row_count(), 20);
        assert!(sheet.rows().iter().all(|view| view.fields.is_blank()));
        assert!(store.get_item("visitors_2024-01-16").is_none());
    }

    #[test]
    fn stray_element_blanks_only_its_row() {
        let mut store = LocalStore::default();
        store.set_item(
            sheet_key("2024-07-08"),
            r#"[1,{"name":"Ada"},null,{"name":"Grace","remarks":0}]"#,
        );
        let (sheet, toast) = loaded(&store, "2024-07-08");
        let rows = sheet.rows();

        assert_eq!(toast.expect("load notice").kind, ToastKind::Info);
        assert_eq!(sheet.row_count(), 20);
        assert!(rows[0].fields.is_blank());
        assert_eq!(rows[1].fields.name, "Ada");
        assert!(rows[2].fields.is_blank());
        assert_eq!(rows[3].fields.name, "Grace");
        assert_eq!(rows[3].fields.remarks, "");
    }

    #[test]
    fn non_array_record_is_unreadable() {
        let mut store = LocalStore::default();
        store.set_item(sheet_key("2024-07-09"), r#"{"name":"Ada"}"#);
        let (sheet, toast) = loaded(&store, "2024-07-09");
        assert_eq!(sheet.row_count(), 20);
        assert_eq!(toast.expect("error notice").kind, ToastKind::Error);
    }

    #[test]
    fn edit_rejects_rows_past_the_end() {
        let mut sheet = SheetState::default();
        sheet.add_rows(1);
        assert!(sheet.edit(1, Field::Name, "x").is_err());
    }
}
