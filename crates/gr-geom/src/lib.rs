//! `gr-geom` — UTM projection and the property-group geometry cleaner
//! (spec §4.1, §4.3).
//!
//! | Module        | Contents                                   |
//! |---------------|---------------------------------------------|
//! | [`projector`]  | `UtmProjection`: WGS84 ↔ metric transforms |
//! | [`clean`]      | `tweeze`, `lint_roll`, `clean_geometries`  |
//! | [`error`]      | `GeomError`, `GeomResult`                  |

pub mod clean;
pub mod error;
pub mod projector;

pub use clean::{clean_geometries, lint_roll, tweeze, write_feature_collection};
pub use error::{GeomError, GeomResult};
pub use projector::UtmProjection;
