use indexmap::IndexMap;
use serde_json::{Value, json};

/// Storage type of an indexed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Keyword,
    /// `format` uses the index's date pattern syntax, e.g. `yyyy-MM-dd`.
    Date { format: String },
    Float,
    Boolean,
}

impl FieldType {
    pub fn date(format: &str) -> Self {
        FieldType::Date {
            format: format.to_string(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            FieldType::Integer => json!({ "type": "integer" }),
            FieldType::Keyword => json!({ "type": "keyword" }),
            FieldType::Date { format } => json!({ "type": "date", "format": format }),
            FieldType::Float => json!({ "type": "float" }),
            FieldType::Boolean => json!({ "type": "boolean" }),
        }
    }
}

/// Ordered field declarations of a search index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMapping {
    fields: IndexMap<String, FieldType>,
}

impl IndexMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, field_type: FieldType) -> Self {
        self.fields.insert(name.to_string(), field_type);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldType)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The mapping of the denormalized order/client/item table.
    pub fn orders() -> Self {
        use FieldType::*;
        Self::new()
            .field("codcli", Integer)
            .field("genrecli", Keyword)
            .field("nomcli", Keyword)
            .field("prenomcli", Keyword)
            .field("cpcli", Keyword)
            .field("villecli", Keyword)
            .field("codcde", Integer)
            .field("datcde", FieldType::date("yyyy-MM-dd"))
            .field("timbrecli", Float)
            .field("timbrecde", Float)
            .field("Nbcolis", Integer)
            .field("cheqcli", Float)
            .field("barchive", Boolean)
            .field("bstock", Boolean)
            .field("codobj", Integer)
            .field("qte", Integer)
            .field("Colis", Integer)
            .field("libobj", Keyword)
            .field("Tailleobj", Keyword)
            .field("Poidsobj", Float)
            .field("points", Integer)
            .field("indispobj", Boolean)
            .field("libcondit", Keyword)
            .field("prixcond", Float)
            .field("puobj", Float)
    }

    /// Index-creation body: settings plus field properties.
    pub fn to_json(&self, shards: u32, replicas: u32) -> Value {
        let properties: serde_json::Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, ty)| (name.clone(), ty.to_json()))
            .collect();
        json!({
            "settings": {
                "number_of_shards": shards,
                "number_of_replicas": replicas,
            },
            "mappings": { "properties": properties },
        })
    }
}
