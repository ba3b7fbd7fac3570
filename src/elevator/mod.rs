pub mod car;

#[cfg(test)]
mod car_tests;

pub use car::Car;
