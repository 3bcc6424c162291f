//! Quote providers scraping the two public price pages

pub mod investing;
pub mod sagha;
pub mod util;

pub use investing::InvestingOunceProvider;
pub use sagha::SaghaRateProvider;
