mod month_year;
mod price;
mod service_name;

pub use month_year::MonthYear;
pub use price::Price;
pub use service_name::ServiceName;
