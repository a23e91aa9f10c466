//! Record types returned by the collection endpoints

use pipeline_admin_listview::{FieldKey, FieldValue, ListViewConfig, Record, SortState};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A collection exposed by the backend
pub trait Resource: Record + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Path segment under the API version, e.g. `scenarios`
    const PATH: &'static str;

    /// Singular name used in user-facing messages
    const LABEL: &'static str;

    /// List view defaults for this collection
    fn list_config() -> ListViewConfig<Self::Field>;
}

fn optional(value: &Option<String>) -> FieldValue<'_> {
    FieldValue::from(value.as_ref())
}

fn timestamp(value: &Option<String>) -> FieldValue<'_> {
    match value {
        Some(value) => FieldValue::Timestamp(value),
        None => FieldValue::Missing,
    }
}

/// Generated user-behaviour scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub method_group: Vec<String>,
    #[serde(default)]
    pub target_method: String,
    #[serde(default)]
    pub negative_method_group: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioField {
    #[serde(rename = "ID")]
    Id,
    #[serde(rename = "state")]
    State,
    #[serde(rename = "method_group")]
    MethodGroup,
    #[serde(rename = "target_method")]
    TargetMethod,
    #[serde(rename = "negative_method_group")]
    NegativeMethodGroup,
}

impl FieldKey for ScenarioField {
    fn name(self) -> &'static str {
        match self {
            ScenarioField::Id => "ID",
            ScenarioField::State => "state",
            ScenarioField::MethodGroup => "method_group",
            ScenarioField::TargetMethod => "target_method",
            ScenarioField::NegativeMethodGroup => "negative_method_group",
        }
    }

    fn all() -> &'static [Self] {
        &[
            ScenarioField::Id,
            ScenarioField::State,
            ScenarioField::MethodGroup,
            ScenarioField::TargetMethod,
            ScenarioField::NegativeMethodGroup,
        ]
    }
}

impl Record for Scenario {
    type Field = ScenarioField;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: ScenarioField) -> FieldValue<'_> {
        match field {
            ScenarioField::Id => FieldValue::from(&self.id),
            ScenarioField::State => FieldValue::from(&self.state),
            ScenarioField::MethodGroup => FieldValue::from(&self.method_group),
            ScenarioField::TargetMethod => FieldValue::from(&self.target_method),
            ScenarioField::NegativeMethodGroup => FieldValue::from(&self.negative_method_group),
        }
    }
}

impl Resource for Scenario {
    const PATH: &'static str = "scenarios";
    const LABEL: &'static str = "scenario";

    fn list_config() -> ListViewConfig<ScenarioField> {
        use ScenarioField::*;
        ListViewConfig::new(
            vec![State, TargetMethod, Id],
            vec![State, TargetMethod, Id],
            SortState::asc(State),
        )
        .with_facets(vec![MethodGroup, NegativeMethodGroup])
    }
}

/// Scenario after preprocessing, ready for triplet formation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedScenario {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Scenario_ID", default)]
    pub scenario_id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub method_group: Vec<String>,
    #[serde(default)]
    pub negative_method_group: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessedScenarioField {
    #[serde(rename = "ID")]
    Id,
    #[serde(rename = "Scenario_ID")]
    ScenarioId,
    #[serde(rename = "state")]
    State,
    #[serde(rename = "method_group")]
    MethodGroup,
    #[serde(rename = "negative_method_group")]
    NegativeMethodGroup,
}

impl FieldKey for ProcessedScenarioField {
    fn name(self) -> &'static str {
        match self {
            ProcessedScenarioField::Id => "ID",
            ProcessedScenarioField::ScenarioId => "Scenario_ID",
            ProcessedScenarioField::State => "state",
            ProcessedScenarioField::MethodGroup => "method_group",
            ProcessedScenarioField::NegativeMethodGroup => "negative_method_group",
        }
    }

    fn all() -> &'static [Self] {
        &[
            ProcessedScenarioField::Id,
            ProcessedScenarioField::ScenarioId,
            ProcessedScenarioField::State,
            ProcessedScenarioField::MethodGroup,
            ProcessedScenarioField::NegativeMethodGroup,
        ]
    }
}

impl Record for ProcessedScenario {
    type Field = ProcessedScenarioField;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: ProcessedScenarioField) -> FieldValue<'_> {
        match field {
            ProcessedScenarioField::Id => FieldValue::from(&self.id),
            ProcessedScenarioField::ScenarioId => FieldValue::from(&self.scenario_id),
            ProcessedScenarioField::State => FieldValue::from(&self.state),
            ProcessedScenarioField::MethodGroup => FieldValue::from(&self.method_group),
            ProcessedScenarioField::NegativeMethodGroup => {
                FieldValue::from(&self.negative_method_group)
            }
        }
    }
}

impl Resource for ProcessedScenario {
    const PATH: &'static str = "processed-scenarios";
    const LABEL: &'static str = "processed scenario";

    fn list_config() -> ListViewConfig<ProcessedScenarioField> {
        use ProcessedScenarioField::*;
        ListViewConfig::new(
            vec![State, Id, ScenarioId, MethodGroup, NegativeMethodGroup],
            vec![State, Id],
            SortState::asc(State),
        )
    }
}

/// Anchor / positive / negative training example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triplet {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "TrainingReadyScenario_ID", default)]
    pub training_ready_scenario_id: String,
    #[serde(default)]
    pub anchor: String,
    #[serde(default)]
    pub positive: String,
    #[serde(default)]
    pub negative: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripletField {
    #[serde(rename = "ID")]
    Id,
    #[serde(rename = "TrainingReadyScenario_ID")]
    TrainingReadyScenarioId,
    #[serde(rename = "anchor")]
    Anchor,
    #[serde(rename = "positive")]
    Positive,
    #[serde(rename = "negative")]
    Negative,
    #[serde(rename = "created_at")]
    CreatedAt,
}

impl FieldKey for TripletField {
    fn name(self) -> &'static str {
        match self {
            TripletField::Id => "ID",
            TripletField::TrainingReadyScenarioId => "TrainingReadyScenario_ID",
            TripletField::Anchor => "anchor",
            TripletField::Positive => "positive",
            TripletField::Negative => "negative",
            TripletField::CreatedAt => "created_at",
        }
    }

    fn all() -> &'static [Self] {
        &[
            TripletField::Id,
            TripletField::TrainingReadyScenarioId,
            TripletField::Anchor,
            TripletField::Positive,
            TripletField::Negative,
            TripletField::CreatedAt,
        ]
    }
}

impl Record for Triplet {
    type Field = TripletField;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: TripletField) -> FieldValue<'_> {
        match field {
            TripletField::Id => FieldValue::from(&self.id),
            TripletField::TrainingReadyScenarioId => {
                FieldValue::from(&self.training_ready_scenario_id)
            }
            TripletField::Anchor => FieldValue::from(&self.anchor),
            TripletField::Positive => FieldValue::from(&self.positive),
            TripletField::Negative => FieldValue::from(&self.negative),
            TripletField::CreatedAt => timestamp(&self.created_at),
        }
    }
}

impl Resource for Triplet {
    const PATH: &'static str = "triplets";
    const LABEL: &'static str = "triplet";

    fn list_config() -> ListViewConfig<TripletField> {
        use TripletField::*;
        ListViewConfig::new(
            vec![Anchor, Positive, Negative, Id, TrainingReadyScenarioId],
            vec![Anchor, Id, CreatedAt],
            SortState::desc(CreatedAt),
        )
    }
}

/// Model produced by a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "Dataset_ID", default)]
    pub dataset_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainedModelField {
    #[serde(rename = "ID")]
    Id,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "Dataset_ID")]
    DatasetId,
    #[serde(rename = "description")]
    Description,
    #[serde(rename = "file_path")]
    FilePath,
    #[serde(rename = "created_at")]
    CreatedAt,
}

impl FieldKey for TrainedModelField {
    fn name(self) -> &'static str {
        match self {
            TrainedModelField::Id => "ID",
            TrainedModelField::Name => "name",
            TrainedModelField::DatasetId => "Dataset_ID",
            TrainedModelField::Description => "description",
            TrainedModelField::FilePath => "file_path",
            TrainedModelField::CreatedAt => "created_at",
        }
    }

    fn all() -> &'static [Self] {
        &[
            TrainedModelField::Id,
            TrainedModelField::Name,
            TrainedModelField::DatasetId,
            TrainedModelField::Description,
            TrainedModelField::FilePath,
            TrainedModelField::CreatedAt,
        ]
    }
}

impl Record for TrainedModel {
    type Field = TrainedModelField;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: TrainedModelField) -> FieldValue<'_> {
        match field {
            TrainedModelField::Id => FieldValue::from(&self.id),
            TrainedModelField::Name => FieldValue::from(&self.name),
            TrainedModelField::DatasetId => FieldValue::from(&self.dataset_id),
            TrainedModelField::Description => optional(&self.description),
            TrainedModelField::FilePath => optional(&self.file_path),
            TrainedModelField::CreatedAt => timestamp(&self.created_at),
        }
    }
}

impl Resource for TrainedModel {
    const PATH: &'static str = "models";
    const LABEL: &'static str = "model";

    fn list_config() -> ListViewConfig<TrainedModelField> {
        use TrainedModelField::*;
        ListViewConfig::new(
            vec![Name, Description, DatasetId, Id],
            vec![Name, CreatedAt],
            SortState::desc(CreatedAt),
        )
    }
}

/// Named collection of triplets used for training or evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(rename = "Triplet_ids", default)]
    pub triplet_ids: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetField {
    #[serde(rename = "ID")]
    Id,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "description")]
    Description,
    #[serde(rename = "type")]
    Kind,
    #[serde(rename = "created_at")]
    CreatedAt,
}

impl FieldKey for DatasetField {
    fn name(self) -> &'static str {
        match self {
            DatasetField::Id => "ID",
            DatasetField::Name => "name",
            DatasetField::Description => "description",
            DatasetField::Kind => "type",
            DatasetField::CreatedAt => "created_at",
        }
    }

    fn all() -> &'static [Self] {
        &[
            DatasetField::Id,
            DatasetField::Name,
            DatasetField::Description,
            DatasetField::Kind,
            DatasetField::CreatedAt,
        ]
    }
}

impl Record for Dataset {
    type Field = DatasetField;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: DatasetField) -> FieldValue<'_> {
        match field {
            DatasetField::Id => FieldValue::from(&self.id),
            DatasetField::Name => FieldValue::from(&self.name),
            DatasetField::Description => optional(&self.description),
            DatasetField::Kind => optional(&self.kind),
            DatasetField::CreatedAt => timestamp(&self.created_at),
        }
    }
}

impl Resource for Dataset {
    const PATH: &'static str = "datasets";
    const LABEL: &'static str = "dataset";

    fn list_config() -> ListViewConfig<DatasetField> {
        use DatasetField::*;
        ListViewConfig::new(
            vec![Name, Description, Kind, Id],
            vec![Name, CreatedAt],
            SortState::desc(CreatedAt),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scenario_from_backend_json() {
        let scenario: Scenario = serde_json::from_value(json!({
            "ID": "s-1",
            "state": "On Product Page",
            "method_group": ["addToCart", "viewCart"],
            "target_method": "addToCart",
            "negative_method_group": ["checkout"]
        }))
        .unwrap();
        assert_eq!(scenario.id(), "s-1");
        assert!(scenario.field(ScenarioField::MethodGroup).contains_folded("viewcart"));
        assert_eq!(scenario.created_at, None);
    }

    #[test]
    fn test_triplet_without_created_at() {
        let triplet: Triplet = serde_json::from_value(json!({
            "ID": "t-1",
            "TrainingReadyScenario_ID": "p-1",
            "anchor": "a",
            "positive": "p",
            "negative": "n"
        }))
        .unwrap();
        assert_eq!(triplet.field(TripletField::CreatedAt), FieldValue::Missing);
        assert_eq!(
            Triplet::list_config().default_sort,
            SortState::desc(TripletField::CreatedAt)
        );
    }

    #[test]
    fn test_dataset_type_field() {
        let dataset: Dataset = serde_json::from_value(json!({
            "ID": "d-1",
            "name": "train-set",
            "description": null,
            "type": "training",
            "Triplet_ids": ["t-1", "t-2"],
            "created_at": "2024-05-01T12:00:00"
        }))
        .unwrap();
        assert_eq!(dataset.kind.as_deref(), Some("training"));
        assert_eq!(dataset.field(DatasetField::Description), FieldValue::Missing);
        assert_eq!(dataset.triplet_ids.len(), 2);
    }

    #[test]
    fn test_field_names_parse() {
        assert_eq!(ScenarioField::parse("target_method"), Some(ScenarioField::TargetMethod));
        assert_eq!(ProcessedScenarioField::parse("id"), Some(ProcessedScenarioField::Id));
        assert_eq!(TrainedModelField::parse("Dataset_ID"), Some(TrainedModelField::DatasetId));
        assert_eq!(DatasetField::parse("type"), Some(DatasetField::Kind));
        assert_eq!(TripletField::parse("bogus"), None);
    }

    #[test]
    fn test_list_configs_match_views() {
        let config = Scenario::list_config();
        assert_eq!(config.facets.len(), 2);
        assert!(!config.is_sortable(ScenarioField::MethodGroup));

        let config = ProcessedScenario::list_config();
        assert!(config.is_sortable(ProcessedScenarioField::Id));
        assert!(!config.is_sortable(ProcessedScenarioField::ScenarioId));

        assert_eq!(
            TrainedModel::list_config().sortable,
            vec![TrainedModelField::Name, TrainedModelField::CreatedAt]
        );
        assert_eq!(
            Dataset::list_config().searchable,
            vec![
                DatasetField::Name,
                DatasetField::Description,
                DatasetField::Kind,
                DatasetField::Id
            ]
        );
    }
}
