pub mod app_config;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod grouping;
pub mod history;
pub mod providers;
pub mod session;
pub mod store;
pub mod view;
pub mod visibility;

pub use app_config::{AppConfig, BoundingBox, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use dataset::{load_providers, read_providers, write_providers, Dataset};
pub use error::{ConfigError, DatasetError, StoreError};
pub use geo::{haversine_km, rank_by_distance, GeoPoint, RankedProvider};
pub use grouping::{group_by_location, LocationGroup, LocationKey};
pub use history::{SearchHistory, MAX_SEARCH_HISTORY};
pub use providers::{Coordinate, MappedProvider, ProviderRecord};
pub use session::{reduce, SearchPoint, Session, SessionAction, SessionState};
pub use store::{FileStateStore, MemoryStateStore, StateStore};
pub use view::{build_map_view, MapView, Marker, NearbyRow};
pub use visibility::{Visibility, VisibilityMap};
