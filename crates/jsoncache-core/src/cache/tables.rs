//! Lookups over "tables": top-level sequences of row mappings.

use serde_json::Value;

use super::Store;
use crate::utils::eq_ignore_case;

fn column_matches(row: &Value, column: &str, value: &Value, ignore_case: bool) -> bool {
    match (row.get(column), value) {
        (Some(Value::String(cell)), Value::String(wanted)) if ignore_case => {
            eq_ignore_case(cell, wanted)
        }
        (Some(cell), wanted) => cell == wanted,
        (None, _) => false,
    }
}

/// First row of `rows` whose `column` equals `value`
pub fn find_row<'a>(rows: &'a Value, column: &str, value: &Value, ignore_case: bool) -> Option<&'a Value> {
    rows.as_array()?
        .iter()
        .find(|row| column_matches(row, column, value, ignore_case))
}

/// Index of the first row of `rows` whose `column` equals `value`
pub fn row_index(rows: &Value, column: &str, value: &Value) -> Option<usize> {
    rows.as_array()?
        .iter()
        .position(|row| column_matches(row, column, value, false))
}

impl Store {
    /// Top-level member `name` of the dataset
    pub fn get_table(&self, name: &str) -> Option<Value> {
        self.read_data().get(name).cloned()
    }

    pub fn find_table_row(
        &self,
        table: &str,
        column: &str,
        value: &Value,
        ignore_case: bool,
    ) -> Option<Value> {
        let data = self.read_data();
        let row = find_row(data.get(table)?, column, value, ignore_case)?.clone();
        Some(row)
    }

    pub fn table_row_index(&self, table: &str, column: &str, value: &Value) -> Option<usize> {
        let data = self.read_data();
        row_index(data.get(table)?, column, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Value {
        json!([
            {"id": 1, "name": "Alpha"},
            {"id": 2, "name": "Bravo"},
            {"id": 3, "name": "bravo"},
            {"id": 4}
        ])
    }

    #[test]
    fn test_find_row_first_match_wins() {
        let rows = rows();
        assert_eq!(find_row(&rows, "name", &json!("bravo"), false).unwrap()["id"], 3);
        assert_eq!(find_row(&rows, "name", &json!("bravo"), true).unwrap()["id"], 2);
        assert_eq!(find_row(&rows, "id", &json!(4), false).unwrap()["id"], 4);
    }

    #[test]
    fn test_find_row_no_match() {
        let rows = rows();
        assert!(find_row(&rows, "name", &json!("Charlie"), true).is_none());
        assert!(find_row(&rows, "missing", &json!(1), false).is_none());
        // Not a sequence
        assert!(find_row(&json!({"id": 1}), "id", &json!(1), false).is_none());
    }

    #[test]
    fn test_ignore_case_only_applies_to_strings() {
        let rows = json!([{"code": 7}, {"code": "7"}]);
        assert_eq!(find_row(&rows, "code", &json!("7"), true).unwrap(), &json!({"code": "7"}));
    }

    #[test]
    fn test_row_index() {
        let rows = rows();
        assert_eq!(row_index(&rows, "name", &json!("Bravo")), Some(1));
        assert_eq!(row_index(&rows, "name", &json!("Zulu")), None);
        assert_eq!(row_index(&json!(null), "name", &json!("Bravo")), None);
    }
}
