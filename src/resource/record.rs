//! Resource records and the sink that collects them

use super::kind::ResourceKind;
use serde::Serialize;

/// One discovered resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRecord {
    /// Raw ARM id, used as the import id
    pub id: String,
    pub name: String,
    pub kind: ResourceKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl ResourceRecord {
    pub fn new(id: &str, name: &str, kind: ResourceKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            depends_on: Vec::new(),
        }
    }

    /// Terraform resource type for this record
    pub fn terraform_type(&self) -> &'static str {
        self.kind.terraform_type()
    }
}

/// Append-only, ordered record collection
#[derive(Debug, Default)]
pub struct RecordSink {
    records: Vec<ResourceRecord>,
}

impl RecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ResourceRecord) {
        tracing::trace!("record {} {}", record.kind, record.id);
        self.records.push(record);
    }

    pub fn records(&self) -> &[ResourceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<ResourceRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_keeps_append_order_without_dedup() {
        let mut sink = RecordSink::new();
        sink.append(ResourceRecord::new("/a", "a", ResourceKind::StorageAccount));
        sink.append(ResourceRecord::new("/b", "b", ResourceKind::AppService));
        sink.append(ResourceRecord::new("/a", "a", ResourceKind::StorageAccount));

        let ids: Vec<_> = sink.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["/a", "/b", "/a"]);
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_record_serialization_omits_empty_dependencies() {
        let record = ResourceRecord::new("/x", "x", ResourceKind::ApiManagementBackend);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "api-management-backend");
        assert!(json.get("depends_on").is_none());
        assert_eq!(record.terraform_type(), "azurerm_api_management_backend");
    }
}
