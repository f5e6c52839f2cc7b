pub mod io;
pub mod raster;
pub mod traits;

pub use self::raster::Raster;
pub use self::traits::{ImageView, ImageViewMut, Rows};
