use std::collections::BTreeMap;

use crate::ids::ItemId;
use crate::item::TableItem;
use crate::value::PropertyValue;

/// Schemaless row for collections that arrive as loose key/value records.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    pub id: ItemId,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub fields: BTreeMap<String, PropertyValue>,
}

impl Record {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) {
        self.fields.insert(key.into(), value.into());
    }
}

impl TableItem for Record {
    fn id(&self) -> ItemId {
        self.id.clone()
    }

    fn property(&self, key: &str) -> Option<PropertyValue> {
        if key == "id" {
            return Some(match &self.id {
                ItemId::Number(n) => PropertyValue::from(*n),
                ItemId::Text(s) => PropertyValue::from(s.as_str()),
            });
        }
        self.fields.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_read_as_none() {
        let record = Record::new(4).with("title", "Dune");
        assert_eq!(record.property("title"), Some("Dune".into()));
        assert_eq!(record.property("year"), None);
        assert_eq!(record.property("id"), Some(PropertyValue::Number(4.0)));
    }
}
