//! Delimited text readers for the tabular borehole sources.
//!
//! Columns are looked up by header name (case-insensitive), with the common aliases of each column accepted:
//!
//! | Column | Accepted headers |
//! |---|---|
//! | well id | `well_id`, `id`, `hole_id`, `name`, `well` |
//! | collar altitude | `altitude`, `z` |
//! | measured depth | `md`, `depth` |
//! | inclination | `inc`, `inclination` |
//! | dip | `dip` |
//! | azimuth | `azi`, `azimuth` |
//! | interval top | `top`, `from` |
//! | interval base | `base`, `to` |
//! | lithology | `component_lith`, `lith`, `lithology` |
//! | assay basis | `basis`, `depth`, `from` |

mod delimited;
pub use self::delimited::*;

mod readers;
pub use self::readers::*;
