pub mod company;
pub mod price;
pub mod request;
pub mod trend;

pub use company::*;
pub use price::*;
pub use request::*;
pub use trend::*;
