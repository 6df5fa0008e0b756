pub mod rating;
pub mod rent_vs_buy;
pub mod rental_property;
