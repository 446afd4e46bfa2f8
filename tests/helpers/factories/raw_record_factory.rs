use crate::engine::types::RawRecord;
use indexmap::IndexMap;

/// Builds order rows shaped like the cleaned order extract.
pub struct RawRecordFactory {
    fields: IndexMap<String, String>,
}

impl RawRecordFactory {
    pub fn new() -> Self {
        let mut fields = IndexMap::new();
        for (k, v) in [
            ("codcli", "1001"),
            ("genrecli", "M"),
            ("nomcli", "DUPONT"),
            ("prenomcli", "JEAN"),
            ("cpcli", "53000"),
            ("villecli", "LAVAL"),
            ("codcde", "A1"),
            ("datcde", "2008-05-14"),
            ("timbrecli", "0"),
            ("timbrecde", "1.5"),
            ("qte", "3"),
        ] {
            fields.insert(k.to_string(), v.to_string());
        }
        Self { fields }
    }

    /// A row with no fields at all.
    pub fn empty() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.fields.insert(field.to_string(), value.to_string());
        self
    }

    pub fn without(mut self, field: &str) -> Self {
        self.fields.shift_remove(field);
        self
    }

    /// Order line: city, quantity, stamp, order code.
    pub fn order(city: &str, qte: &str, timbre: &str, codcde: &str) -> RawRecord {
        Self::new()
            .with("villecli", city)
            .with("qte", qte)
            .with("timbrecde", timbre)
            .with("codcde", codcde)
            .create()
    }

    pub fn create(self) -> RawRecord {
        RawRecord::from_pairs(self.fields)
    }
}
