pub mod bezrealitky;
pub mod fetch;
pub mod parse;
pub mod sreality;
pub mod traits;

pub use bezrealitky::BezrealitkySource;
pub use fetch::{BrowserFetcher, HttpFetcher, PageFetcher};
pub use sreality::SrealitySource;
pub use traits::AdSource;
