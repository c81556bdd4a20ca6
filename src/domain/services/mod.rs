mod map_layout;
mod node_lookup;

pub use map_layout::{
    MapLayout, MapMarker, MapView, MarkerNode, PlotStats, DEFAULT_CENTER, DEFAULT_ZOOM,
    SINGLE_MARKER_ZOOM,
};
pub use node_lookup::{shorten_id, LookupResult, LookupStatus, NodeFinder, NOT_AVAILABLE};
