mod bounds;
pub use self::bounds::*;

mod quantile;
pub use self::quantile::*;
