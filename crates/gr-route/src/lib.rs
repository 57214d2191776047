//! `gr-route` — per-request graph specialization, splicing, shortest-path
//! routing, and the request orchestrator (spec §4.6-§4.9).
//!
//! | Module         | Contents                                      |
//! |----------------|-------------------------------------------------|
//! | [`specialize`]  | `specialize`: exclusion clipping + renumbering |
//! | [`splice`]      | `splice`: nearest-edge insertion of a new node |
//! | [`route`]       | `route`, `to_geojson`: Dijkstra + GeoJSON      |
//! | [`orchestrate`] | `handle`, `GeofenceCatalog`                    |
//! | [`error`]       | `RouteError`, `RouteResult`                    |

pub mod error;
pub mod orchestrate;
pub mod route;
pub mod specialize;
pub mod splice;

pub use error::{RouteError, RouteResult};
pub use orchestrate::handle;
pub use route::{route as shortest_path, to_geojson, Route};
pub use specialize::specialize;
pub use splice::{splice, SpliceResult};
