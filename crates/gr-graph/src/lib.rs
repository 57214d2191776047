//! `gr-graph` — the routable graph data model, spatial index, vertex
//! clusterer, and edge builder (spec §4.2, §4.4, §4.5).
//!
//! | Module      | Contents                                        |
//! |-------------|---------------------------------------------------|
//! | [`graph`]   | `Graph`, `NodeData`, `EdgeData`                 |
//! | [`index`]   | `PointIndex`, `LineIndex`                       |
//! | [`cluster`] | `cluster_twice`                                 |
//! | [`build`]   | `prepare`                                       |
//! | [`error`]   | `GraphError`, `GraphResult`                     |

pub mod build;
pub mod cluster;
pub mod error;
pub mod graph;
pub mod index;

pub use build::prepare;
pub use cluster::{cluster_twice, ClusterTable, DEFAULT_CLUSTER_THRESHOLD_M};
pub use error::{GraphError, GraphResult};
pub use graph::{EdgeData, Graph, NodeData};
pub use index::{LineHit, LineIndex, PointIndex};
