// Public modules
pub mod api;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod filtering;
pub mod grouping;
pub mod io;
pub mod mailing_list;
pub mod models;
pub mod normalize;
pub mod options;
pub mod reengagement;
pub mod report;
pub mod resource;
pub mod schema_validation;
pub mod selection;
pub mod serialize;
pub mod sorting;
pub mod validation;
pub mod view;
pub mod window;

// Re-export commonly used types for convenience
pub use api::{ApiConfig, ApiRequest, Endpoint};
pub use debounce::Debouncer;
pub use engine::{FilterEngine, FilterListener, NoopListener, SessionPhase};
pub use error::{FilterError, Result};
pub use filtering::{has_query, matches, visible_indices};
pub use grouping::{group_by_key, group_by_letter, resolve_group_config, IndexBucket};
pub use io::{load_filter_map, load_options, save_filter_map};
pub use mailing_list::{is_valid_email, parse_emails, MailingList};
pub use models::{
    FilterItem, FilterMap, FilterState, GroupId, GroupItem, ItemKey, KeyedMap, RawFilterShape, ShapeKind,
    SubItem, ALL_BUCKET,
};
pub use normalize::{checked_labels, flatten, shape_from_value, to_flat_array, to_original_shape};
pub use options::{EngineOptions, WindowConfig};
pub use reengagement::{PayoutSplit, ReengagementConfig, Targeting};
pub use report::{Delivery, Frequency, ReportDraft, RequestMode};
pub use resource::{RequestTicket, Resource, ResourceState};
pub use schema_validation::validate_against_schema;
pub use selection::{SelectionGroup, SelectionMode};
pub use serialize::serialize_group;
pub use sorting::normalize_for_sorting;
pub use validation::validate_filter_map;
pub use view::{IndexStyle, RowMetrics, SearchView, ViewRow};
pub use window::VisibleWindow;
