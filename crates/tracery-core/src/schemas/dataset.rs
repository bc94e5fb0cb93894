//! Datasets and the examples they hold

use super::KvMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type DatasetId = Uuid;
pub type ExampleId = Uuid;

/// Shape of the examples in a dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    Kv,
    Llm,
    Chat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub data_type: DataType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub data_type: DataType,
}

impl DatasetCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            data_type: DataType::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }
}

/// A dataset record supplying inputs and, optionally, reference outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub id: ExampleId,
    pub dataset_id: DatasetId,
    #[serde(default)]
    pub inputs: KvMap,
    #[serde(default)]
    pub outputs: Option<KvMap>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ExampleId>,
    pub dataset_id: DatasetId,
    pub inputs: KvMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<KvMap>,
}

impl ExampleCreate {
    pub fn new(dataset_id: DatasetId, inputs: KvMap) -> Self {
        Self {
            id: None,
            dataset_id,
            inputs,
            outputs: None,
        }
    }

    pub fn with_outputs(mut self, outputs: KvMap) -> Self {
        self.outputs = Some(outputs);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExampleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<KvMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<KvMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<DatasetId>,
}
