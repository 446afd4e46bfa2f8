use crate::engine::source::ScanRow;

pub struct ScanRowFactory {
    row_key: Vec<u8>,
    family: String,
    cells: Vec<(Vec<u8>, Vec<u8>)>,
}

impl ScanRowFactory {
    pub fn new(row_key: &str) -> Self {
        Self {
            row_key: row_key.as_bytes().to_vec(),
            family: "data_fro".to_string(),
            cells: Vec::new(),
        }
    }

    pub fn with_family(mut self, family: &str) -> Self {
        self.family = family.to_string();
        self
    }

    pub fn cell(mut self, qualifier: &str, value: &str) -> Self {
        self.cells.push((
            format!("{}:{}", self.family, qualifier).into_bytes(),
            value.as_bytes().to_vec(),
        ));
        self
    }

    pub fn raw_cell(mut self, key: &[u8], value: &[u8]) -> Self {
        self.cells.push((key.to_vec(), value.to_vec()));
        self
    }

    pub fn create(self) -> ScanRow {
        ScanRow {
            row_key: self.row_key,
            cells: self.cells,
        }
    }
}
