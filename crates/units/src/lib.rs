pub mod mass;
pub mod temperature;


pub use mass::{Mass, SOLAR_MASS_KG};
pub use temperature::Temperature;
